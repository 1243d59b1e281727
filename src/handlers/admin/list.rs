use axum::{Extension, Json, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{AppState, queries};
use crate::error::Result;
use crate::extractors::Query;
use crate::middleware::{AuthVerdict, RequestSummary};
use crate::models::SerialCode;

#[derive(Debug, Default, Deserialize)]
pub struct ListSerialsQuery {
    #[serde(default)]
    pub all: Option<String>,
}

impl ListSerialsQuery {
    /// `all` absent, empty or `false` means active codes only.
    pub fn include_all(&self) -> bool {
        matches!(self.all.as_deref(), Some(v) if !v.is_empty() && v != "false")
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SerialInfo {
    pub id: i64,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub max_uses: i64,
    pub uses_count: i64,
    /// Validity at the time of listing, independent of the filter used
    pub is_valid: bool,
}

impl SerialInfo {
    fn at(serial: SerialCode, now: DateTime<Utc>) -> Self {
        let is_valid = serial.is_valid_at(now);
        SerialInfo {
            id: serial.id,
            code: serial.code,
            created_at: serial.created_at,
            expires_at: serial.expires_at,
            max_uses: serial.max_uses,
            uses_count: serial.uses_count,
            is_valid,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListSerialsResponse {
    pub serials: Vec<SerialInfo>,
    pub count: usize,
}

/// GET /api/serials - List serial codes, newest first
pub async fn list_serials(
    State(state): State<AppState>,
    Extension(verdict): Extension<AuthVerdict>,
    Query(query): Query<ListSerialsQuery>,
) -> Result<(Extension<RequestSummary>, Json<ListSerialsResponse>)> {
    verdict.ensure_accepted()?;

    let now = Utc::now();
    let conn = state.db.get()?;
    let serials: Vec<SerialInfo> = queries::list_serial_codes(&conn, query.include_all(), now)?
        .into_iter()
        .map(|serial| SerialInfo::at(serial, now))
        .collect();

    let count = serials.len();
    Ok((
        Extension(RequestSummary::Listed { count }),
        Json(ListSerialsResponse { serials, count }),
    ))
}
