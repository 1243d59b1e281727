//! Request logging middleware.
//!
//! Emits exactly one structured line per request once the wrapped chain has
//! produced its response. Route-specific detail is not scraped from the body:
//! handlers attach a [`RequestSummary`] to the response, the auth layer
//! attaches its [`AuthVerdict`], and `AppError` attaches an [`ErrorDetail`].

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::{Level, field::display};

use crate::error::ErrorDetail;

use super::AuthVerdict;

/// Per-route outcome reported by a handler alongside its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestSummary {
    Verified { valid: bool },
    Created,
    Listed { count: usize },
}

impl RequestSummary {
    pub fn verify_success(&self) -> Option<bool> {
        match self {
            RequestSummary::Verified { valid } => Some(*valid),
            _ => None,
        }
    }

    pub fn created_success(&self) -> Option<bool> {
        matches!(self, RequestSummary::Created).then_some(true)
    }

    pub fn serials_count(&self) -> Option<u64> {
        match self {
            RequestSummary::Listed { count } => Some(*count as u64),
            _ => None,
        }
    }
}

pub async fn log_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let version = request.version();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();
    let auth = response.extensions().get::<AuthVerdict>();
    let summary = response.extensions().get::<RequestSummary>();
    let error = response.extensions().get::<ErrorDetail>();

    // `Option` fields that are `None` are left out of the line entirely.
    macro_rules! request_line {
        ($level:expr) => {
            tracing::event!(
                $level,
                method = %method,
                uri = %uri,
                version = ?version,
                status = status.as_u16(),
                latency = ?latency,
                auth = auth.map(display),
                verify_success = summary.and_then(RequestSummary::verify_success),
                created_success = summary.and_then(RequestSummary::created_success),
                serials_count = summary.and_then(RequestSummary::serials_count),
                error = error.map(|e| display(&e.0)),
                "[{}] {} {:?} {}",
                method,
                uri,
                version,
                status.as_u16()
            )
        };
    }

    if status.is_server_error() {
        request_line!(Level::ERROR);
    } else if status.is_client_error() {
        request_line!(Level::WARN);
    } else {
        request_line!(Level::INFO);
    }

    response
}
