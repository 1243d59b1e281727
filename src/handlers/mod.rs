pub mod admin;
pub mod public;

use axum::{Router, middleware};

use crate::db::AppState;
use crate::middleware::log_requests;

/// Build the full application: public and admin routes behind the request logger.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(public::router())
        .merge(admin::router(&state))
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}
