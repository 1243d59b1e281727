//! Custom extractors that return JSON errors instead of plain text.
//!
//! The JSON body extractors read the raw body and parse it themselves, so a
//! client that omits `Content-Type: application/json` is still understood.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}

/// Parse a body that must be a JSON object. Arrays and scalars are rejected.
fn parse_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, AppError> {
    let invalid = |e: serde_json::Error| AppError::BadRequest(format!("Invalid request body: {}", e));

    let value: serde_json::Value = serde_json::from_slice(bytes).map_err(invalid)?;
    if !value.is_object() {
        return Err(AppError::BadRequest(
            "Invalid request body: expected a JSON object".into(),
        ));
    }
    serde_json::from_value(value).map_err(invalid)
}

/// Required JSON body. An empty or malformed body is a 400.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await?;
        if is_blank(&bytes) {
            return Err(AppError::BadRequest(
                "Invalid request body: body is empty".into(),
            ));
        }
        parse_body(&bytes).map(JsonBody)
    }
}

/// Optional JSON body. An empty body yields `None`; a malformed one is a 400.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionalJsonBody<T>(pub Option<T>);

impl<S, T> FromRequest<S> for OptionalJsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await?;
        if is_blank(&bytes) {
            return Ok(OptionalJsonBody(None));
        }
        parse_body(&bytes).map(|body| OptionalJsonBody(Some(body)))
    }
}

/// Query extractor that returns `AppError` on failure.
///
/// Use this instead of `axum::extract::Query` to get JSON error responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct Query<T>(pub T);

impl<S, T> FromRequestParts<S> for Query<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let result = axum::extract::Query::<T>::from_request_parts(parts, state).await?;
        Ok(Query(result.0))
    }
}

impl<T> std::ops::Deref for Query<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
