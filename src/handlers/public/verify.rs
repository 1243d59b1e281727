use axum::{
    Extension, Json,
    extract::State,
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{AppState, queries};
use crate::error::{AppError, ErrorDetail, Result};
use crate::extractors::JsonBody;
use crate::middleware::RequestSummary;
use crate::models::Redemption;

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub message: String,
}

impl From<Redemption> for VerifyResponse {
    fn from(redemption: Redemption) -> Self {
        let (valid, message) = match redemption {
            Redemption::Redeemed(_) => (true, "Code is valid".to_string()),
            Redemption::NotFound => (false, "Code not found".to_string()),
            Redemption::Expired { expires_at } => (
                false,
                format!(
                    "Code expired at {}",
                    expires_at.to_rfc3339_opts(SecondsFormat::Secs, true)
                ),
            ),
            Redemption::LimitReached { max_uses } => (
                false,
                format!("Code has reached its maximum usage limit of {}", max_uses),
            ),
        };
        VerifyResponse { valid, message }
    }
}

/// Error answer on the verify route. Carries `valid: false` next to the
/// usual `error` text so clients reading `valid` still get an answer.
#[derive(Debug)]
pub struct VerifyFailure(pub AppError);

impl From<AppError> for VerifyFailure {
    fn from(err: AppError) -> Self {
        VerifyFailure(err)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyErrorResponse {
    pub valid: bool,
    pub message: String,
    pub error: String,
}

impl IntoResponse for VerifyFailure {
    fn into_response(self) -> Response {
        let detail = self.0.to_string();
        let mut response = (
            self.0.status_code(),
            Json(VerifyErrorResponse {
                valid: false,
                message: "Verification failed".into(),
                error: detail.clone(),
            }),
        )
            .into_response();
        response.extensions_mut().insert(ErrorDetail(detail));
        response
    }
}

/// POST /api/verify - Redeem a serial code
///
/// Unknown, expired and used-up codes are ordinary negative answers (200 with
/// `valid: false`), not errors. A successful answer consumes one use.
pub async fn verify_serial(
    State(state): State<AppState>,
    body: std::result::Result<JsonBody<VerifyRequest>, AppError>,
) -> std::result::Result<(Extension<RequestSummary>, Json<VerifyResponse>), VerifyFailure> {
    let JsonBody(req) = body?;
    Ok(redeem(&state, req)?)
}

fn redeem(
    state: &AppState,
    req: VerifyRequest,
) -> Result<(Extension<RequestSummary>, Json<VerifyResponse>)> {
    if req.code.is_empty() {
        return Err(AppError::BadRequest("Code is required".into()));
    }

    let mut conn = state.db.get()?;
    let redemption = queries::redeem_serial_code(&mut conn, &req.code, Utc::now())?;

    if let Redemption::Redeemed(serial) = &redemption {
        tracing::debug!(
            code = %serial.code,
            uses_count = serial.uses_count,
            max_uses = serial.max_uses,
            "serial code redeemed"
        );
    }

    let response = VerifyResponse::from(redemption);
    Ok((
        Extension(RequestSummary::Verified {
            valid: response.valid,
        }),
        Json(response),
    ))
}
