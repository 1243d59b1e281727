use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::code::{CODE_LENGTH, generate_code};
use crate::db::{AppState, queries};
use crate::error::{AppError, Result};
use crate::extractors::OptionalJsonBody;
use crate::middleware::{AuthVerdict, RequestSummary};
use crate::models::{CreateSerialCode, DEFAULT_MAX_USES, Expiry, default_ttl};

#[derive(Debug, Default, Deserialize)]
pub struct CreateSerialRequest {
    /// Explicit code; generated when absent or empty
    #[serde(default)]
    pub code: Option<String>,
    /// Lifetime such as `7d` or `12h`; 7 days when absent or empty
    #[serde(default)]
    pub expiry: Option<String>,
    /// Non-positive values fall back to the default of 1
    #[serde(default)]
    pub max_uses: Option<i64>,
}

impl CreateSerialRequest {
    /// Resolve the request into a concrete insert created at `now`, applying defaults.
    pub fn resolve(self, now: DateTime<Utc>) -> Result<CreateSerialCode> {
        let code = self
            .code
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| generate_code(CODE_LENGTH));

        let ttl = match self.expiry.as_deref() {
            None | Some("") => default_ttl(),
            Some(raw) => {
                raw.parse::<Expiry>()
                    .map_err(|e| AppError::BadRequest(format!("Invalid expiry format: {}", e)))?
                    .0
            }
        };

        let max_uses = self
            .max_uses
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_USES);

        CreateSerialCode::starting_at(code, now, ttl, max_uses).ok_or_else(|| {
            AppError::BadRequest("Invalid expiry format: expiry is too far in the future".into())
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSerialResponse {
    pub code: String,
    pub message: String,
    pub expires_at: String,
    pub max_uses: i64,
}

/// POST /api/create - Issue a new serial code
pub async fn create_serial(
    State(state): State<AppState>,
    Extension(verdict): Extension<AuthVerdict>,
    OptionalJsonBody(body): OptionalJsonBody<CreateSerialRequest>,
) -> Result<(StatusCode, Extension<RequestSummary>, Json<CreateSerialResponse>)> {
    // The auth layer already answered rejected requests; never persist for them.
    verdict.ensure_accepted()?;

    let input = body.unwrap_or_default().resolve(Utc::now())?;

    let conn = state.db.get()?;
    let serial = queries::create_serial_code(&conn, &input)?;

    let expires_at = serial
        .expires_at
        .to_rfc3339_opts(SecondsFormat::Secs, true);

    tracing::debug!(
        code = %serial.code,
        expires_at = %expires_at,
        max_uses = serial.max_uses,
        "serial code created"
    );

    Ok((
        StatusCode::CREATED,
        Extension(RequestSummary::Created),
        Json(CreateSerialResponse {
            message: format!(
                "Serial code created successfully. Expires at: {}, Max uses: {}",
                expires_at, serial.max_uses
            ),
            code: serial.code,
            expires_at,
            max_uses: serial.max_uses,
        }),
    ))
}
