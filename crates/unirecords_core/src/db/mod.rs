//! SQLite storage bootstrap, connection ownership and transaction scopes.
//!
//! # Responsibility
//! - Open and configure the backing SQLite file.
//! - Own the single live connection and release it on demand.
//! - Group repository operations into one commit/rollback boundary.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Only `ConnectionProvider` opens the backing file.
//! - Application data is never read before the schema bootstrap succeeds.

use std::path::PathBuf;

pub mod migrations;
mod open;
mod provider;
mod session;

pub use open::{open_db, open_db_in_memory, ConnectionOptions};
pub use provider::ConnectionProvider;
pub use session::UnitOfWork;

pub type DbResult<T> = Result<T, DbError>;

/// Storage-level failure; wraps the SQLite error when there is one.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("failed to open database `{}`: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("failed to release database connection: {0}")]
    Close(#[source] rusqlite::Error),
    #[error("database schema version {db_version} is newer than supported {latest_supported}")]
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// The unit of work was committed or rolled back already.
    #[error("unit of work has ended; start a new one")]
    SessionClosed,
}
