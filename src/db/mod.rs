mod from_row;
mod schema;
pub mod queries;

pub use from_row::{FromRow, SERIAL_CODE_COLS, query_all, query_one};
pub use schema::init_db;

use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::config::AdminToken;

pub type DbPool = Pool<SqliteConnectionManager>;

/// How long a connection waits on a locked database before failing.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Serial code database pool
    pub db: DbPool,
    /// Credential required by the admin routes
    pub admin_token: AdminToken,
}

pub fn create_pool(database_path: &str) -> Result<DbPool, r2d2::Error> {
    let manager = SqliteConnectionManager::file(database_path)
        .with_init(|conn| conn.busy_timeout(BUSY_TIMEOUT));
    Pool::builder().max_size(10).build(manager)
}
