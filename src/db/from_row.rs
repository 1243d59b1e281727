//! Row mapping trait and helpers for reducing boilerplate in queries.
//!
//! This module provides a `FromRow` trait that models can implement to
//! define how they are constructed from database rows, plus helper functions
//! for common query patterns.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, ToSql};

use crate::models::SerialCode;

/// Read a unix-seconds column as a UTC timestamp.
///
/// Out-of-range values become a rusqlite error rather than a panic, so a
/// corrupted row surfaces as a storage error.
fn timestamp_col(row: &Row, col: usize, col_name: &str) -> rusqlite::Result<DateTime<Utc>> {
    let secs: i64 = row.get(col)?;
    DateTime::from_timestamp(secs, 0).ok_or_else(|| {
        rusqlite::Error::InvalidColumnType(col, col_name.to_string(), rusqlite::types::Type::Integer)
    })
}

/// Trait for constructing a type from a database row.
///
/// Implementing this trait allows using the `query_one` and `query_all`
/// helper functions, reducing repetitive row mapping closures.
pub trait FromRow: Sized {
    /// Construct an instance from a database row.
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}

/// Query for a single optional result.
pub fn query_one<T: FromRow>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> crate::error::Result<Option<T>> {
    conn.query_row(sql, params, T::from_row)
        .optional()
        .map_err(Into::into)
}

/// Query for multiple results.
pub fn query_all<T: FromRow>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> crate::error::Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, T::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub const SERIAL_CODE_COLS: &str = "id, code, created_at, expires_at, max_uses, uses_count";

impl FromRow for SerialCode {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(SerialCode {
            id: row.get(0)?,
            code: row.get(1)?,
            created_at: timestamp_col(row, 2, "created_at")?,
            expires_at: timestamp_col(row, 3, "expires_at")?,
            max_uses: row.get(4)?,
            uses_count: row.get(5)?,
        })
    }
}
