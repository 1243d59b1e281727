use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::AdminToken;
use crate::error::AppError;

use super::AuthVerdict;

/// Header carrying the shared admin credential.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

impl AuthVerdict {
    /// Judge the `X-Admin-Token` header value against the configured token.
    pub fn evaluate(expected: &AdminToken, presented: Option<&HeaderValue>) -> Self {
        let Some(value) = presented.filter(|v| !v.is_empty()) else {
            return AuthVerdict::MissingToken;
        };

        match value.to_str() {
            Ok(token) if expected.matches(token) => AuthVerdict::Accepted,
            Ok(token) => AuthVerdict::InvalidToken(token.to_string()),
            Err(_) => AuthVerdict::InvalidToken(String::from_utf8_lossy(value.as_bytes()).into_owned()),
        }
    }

    /// The error a handler should return for this verdict, if any.
    pub fn rejection(&self) -> Option<AppError> {
        match self {
            AuthVerdict::Accepted => None,
            AuthVerdict::MissingToken => Some(AppError::Unauthorized(
                "Unauthorized: Missing X-Admin-Token header".into(),
            )),
            AuthVerdict::InvalidToken(_) => Some(AppError::Forbidden(
                "Forbidden: Invalid X-Admin-Token".into(),
            )),
        }
    }

    pub fn ensure_accepted(&self) -> Result<(), AppError> {
        match self.rejection() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Gate admin routes on the `X-Admin-Token` header.
///
/// Rejected requests are answered here (401 missing, 403 mismatch) and never
/// reach the handler. The verdict is attached to the response either way so
/// the request logger can report it; accepted requests also carry it in the
/// request extensions.
pub async fn require_admin_token(
    State(admin_token): State<AdminToken>,
    mut request: Request,
    next: Next,
) -> Response {
    let verdict = AuthVerdict::evaluate(&admin_token, request.headers().get(ADMIN_TOKEN_HEADER));

    if let Some(err) = verdict.rejection() {
        tracing::debug!(auth = %verdict, "admin token rejected");
        let mut response = err.into_response();
        response.extensions_mut().insert(verdict);
        return response;
    }

    request.extensions_mut().insert(verdict.clone());
    let mut response = next.run(request).await;
    response.extensions_mut().insert(verdict);
    response
}
