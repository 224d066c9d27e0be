//! Application error taxonomy.
//!
//! # Responsibility
//! - Provide one root error type so callers can match broadly or narrowly.
//! - Keep low-level SQLite and crypto errors attached as `source()`.
//!
//! # Invariants
//! - `EntityNotFound` always carries the entity name and the requested id.
//! - Configuration and crypto failures are fatal; everything else is
//!   recoverable by the caller and never retried internally.

use crate::db::DbError;
use crate::encryption::CryptoError;
use std::path::PathBuf;

pub type RecordsResult<T> = Result<T, RecordsError>;

/// Root error for every persistence-layer failure.
#[derive(Debug, thiserror::Error)]
pub enum RecordsError {
    /// Invalid or inaccessible configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Connection, transaction or constraint failure.
    #[error(transparent)]
    Database(#[from] DbError),
    /// Requested identity does not exist.
    #[error("{entity} with ID {id} not found")]
    EntityNotFound { entity: &'static str, id: i64 },
    /// Caller-supplied data failed a contract check before reaching storage.
    #[error("validation error for '{field}': {message}")]
    Validation { field: String, message: String },
    /// Encrypted sidecar could not be produced or opened.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    /// File-system step of the encryption lifecycle failed.
    #[error("failed to {action} `{}`: {source}", .path.display())]
    FileSystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RecordsError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub(crate) fn file_system(
        action: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            action,
            path: path.into(),
            source,
        }
    }

    /// Returns whether the process must not continue after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::Crypto(_))
    }
}

impl From<rusqlite::Error> for RecordsError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Database(DbError::Sqlite(value))
    }
}

#[cfg(test)]
mod tests {
    use super::RecordsError;
    use crate::encryption::CryptoError;
    use std::error::Error;

    #[test]
    fn not_found_message_names_entity_and_id() {
        let err = RecordsError::EntityNotFound {
            entity: "student",
            id: 42,
        };
        assert_eq!(err.to_string(), "student with ID 42 not found");
        assert!(!err.is_fatal());
    }

    #[test]
    fn crypto_failures_are_fatal() {
        let err = RecordsError::from(CryptoError::Authentication);
        assert!(err.is_fatal());
        assert!(RecordsError::Configuration("missing dir".to_string()).is_fatal());
    }

    #[test]
    fn database_error_keeps_sqlite_source() {
        let err = RecordsError::from(rusqlite::Error::InvalidQuery);
        assert!(err.source().is_some());
    }
}
