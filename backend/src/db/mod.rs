//! Persistence gateway.
//!
//! Handlers never hold a process-wide connection. They receive a [`Store`]
//! through `web::Data<dyn Store>` and ask it for a fresh connection per
//! operation; queries, statements and transactions then go through plain
//! `rusqlite`. Tests swap in their own `Store` implementations.

pub mod schema;

use crate::error::ApiError;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How long a connection waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub trait Store: Send + Sync {
    fn connect(&self) -> Result<Connection, ApiError>;
}

/// File-backed SQLite store. Every connection shares the same database file,
/// so concurrent requests see each other's committed writes.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `path` and brings the
    /// schema up to date.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
        };
        let conn = store.connect()?;
        schema::bootstrap(&conn)?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Store for SqliteStore {
    fn connect(&self) -> Result<Connection, ApiError> {
        let conn = Connection::open(&self.path)
            .map_err(ApiError::persistence("Error opening database"))?;
        conn.busy_timeout(BUSY_TIMEOUT)
            .map_err(ApiError::persistence("Error configuring database"))?;
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(ApiError::persistence("Error configuring database"))?;
        Ok(conn)
    }
}
