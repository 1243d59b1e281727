use rusqlite::Connection;

/// Initialize the serial code schema. Safe to run on every startup.
pub fn init_db(conn: &Connection) -> rusqlite::Result<()> {
    // Timestamps are INTEGER unix seconds (UTC); there is no other encoding.
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;

        CREATE TABLE IF NOT EXISTS serial_codes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            code TEXT NOT NULL UNIQUE,
            created_at INTEGER NOT NULL,
            expires_at INTEGER NOT NULL,
            max_uses INTEGER NOT NULL DEFAULT 1 CHECK (max_uses > 0),
            uses_count INTEGER NOT NULL DEFAULT 0
                CHECK (uses_count >= 0 AND uses_count <= max_uses)
        );
        CREATE INDEX IF NOT EXISTS idx_serial_codes_expires ON serial_codes(expires_at);
        "#,
    )?;
    Ok(())
}
