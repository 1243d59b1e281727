use axum::http::StatusCode;
use tower::ServiceExt;

mod common;
use common::*;

#[tokio::test]
async fn test_health_reports_ok_and_version() {
    let state = create_test_app_state();

    let response = test_app(state)
        .oneshot(get("/health", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_needs_no_admin_token() {
    let state = create_test_app_state();

    let response = test_app(state)
        .oneshot(get("/health", Some("garbage")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
