use chrono::{DateTime, Utc};
use rusqlite::{Connection, TransactionBehavior, params};

use crate::error::{AppError, Result};
use crate::models::*;

use super::from_row::{SERIAL_CODE_COLS, query_all, query_one};

// ============ Serial Codes ============

/// Insert a new serial code. Fails with a database error if `code` already exists.
pub fn create_serial_code(conn: &Connection, input: &CreateSerialCode) -> Result<SerialCode> {
    conn.execute(
        "INSERT INTO serial_codes (code, created_at, expires_at, max_uses, uses_count)
         VALUES (?1, ?2, ?3, ?4, 0)",
        params![
            &input.code,
            input.created_at.timestamp(),
            input.expires_at.timestamp(),
            input.max_uses
        ],
    )?;

    Ok(SerialCode {
        id: conn.last_insert_rowid(),
        code: input.code.clone(),
        created_at: input.created_at,
        expires_at: input.expires_at,
        max_uses: input.max_uses,
        uses_count: 0,
    })
}

pub fn get_serial_code_by_code(conn: &Connection, code: &str) -> Result<Option<SerialCode>> {
    query_one(
        conn,
        &format!("SELECT {} FROM serial_codes WHERE code = ?1", SERIAL_CODE_COLS),
        &[&code],
    )
}

/// List serial codes, newest first.
///
/// Unless `include_all` is set, only codes that are unexpired and have uses
/// left at `now` are returned.
pub fn list_serial_codes(
    conn: &Connection,
    include_all: bool,
    now: DateTime<Utc>,
) -> Result<Vec<SerialCode>> {
    if include_all {
        query_all(
            conn,
            &format!("SELECT {} FROM serial_codes ORDER BY id DESC", SERIAL_CODE_COLS),
            &[],
        )
    } else {
        query_all(
            conn,
            &format!(
                "SELECT {} FROM serial_codes WHERE expires_at > ?1 AND uses_count < max_uses ORDER BY id DESC",
                SERIAL_CODE_COLS
            ),
            &[&now.timestamp()],
        )
    }
}

/// Atomically redeem a serial code.
///
/// The lookup and the increment run in one IMMEDIATE transaction, which takes
/// the SQLite write lock up front so concurrent redemptions of the same code
/// are serialized. The UPDATE repeats the eligibility predicate and the
/// affected row count is checked, so `uses_count` can never pass `max_uses`.
pub fn redeem_serial_code(
    conn: &mut Connection,
    code: &str,
    now: DateTime<Utc>,
) -> Result<Redemption> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let Some(serial) = query_one::<SerialCode>(
        &tx,
        &format!("SELECT {} FROM serial_codes WHERE code = ?1", SERIAL_CODE_COLS),
        &[&code],
    )?
    else {
        return Ok(Redemption::NotFound);
    };

    if serial.is_expired_at(now) {
        return Ok(Redemption::Expired {
            expires_at: serial.expires_at,
        });
    }

    if serial.is_exhausted() {
        return Ok(Redemption::LimitReached {
            max_uses: serial.max_uses,
        });
    }

    let affected = tx.execute(
        "UPDATE serial_codes SET uses_count = uses_count + 1
         WHERE id = ?1 AND expires_at > ?2 AND uses_count < max_uses",
        params![serial.id, now.timestamp()],
    )?;

    if affected != 1 {
        return Err(AppError::Internal(format!(
            "serial code {} changed during redemption",
            serial.code
        )));
    }

    tx.commit()?;

    Ok(Redemption::Redeemed(SerialCode {
        uses_count: serial.uses_count + 1,
        ..serial
    }))
}
