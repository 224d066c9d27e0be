//! Owner of the single live connection to the backing file.

use super::open::{open_db, ConnectionOptions};
use super::{DbError, DbResult};
use crate::config::Settings;
use log::{error, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Lazily opened, explicitly disposed handle to the backing SQLite file.
///
/// # Invariants
/// - At most one connection is open at a time.
/// - After `dispose()` no OS handle to the file remains; `get()` reopens.
/// - A broken connection is reported, never silently reopened.
#[derive(Debug)]
pub struct ConnectionProvider {
    path: PathBuf,
    options: ConnectionOptions,
    conn: Option<Connection>,
}

impl ConnectionProvider {
    pub fn new(settings: &Settings) -> Self {
        Self::with_options(&settings.database_path, ConnectionOptions::from(settings))
    }

    pub fn with_options(path: impl Into<PathBuf>, options: ConnectionOptions) -> Self {
        Self {
            path: path.into(),
            options,
            conn: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Returns the cached connection, opening it on first use.
    pub fn get(&mut self) -> DbResult<&Connection> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => open_db(&self.path, &self.options)?,
        };
        Ok(self.conn.insert(conn))
    }

    /// Closes the connection and releases its file handle.
    ///
    /// # Errors
    /// - `DbError::Close` when SQLite refuses to close; the handle is
    ///   dropped anyway and the provider resets.
    pub fn dispose(&mut self) -> DbResult<()> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };

        match conn.close() {
            Ok(()) => {
                info!("event=db_dispose module=db status=ok");
                Ok(())
            }
            Err((_conn, err)) => {
                error!(
                    "event=db_dispose module=db status=error error_code=db_close_failed error={}",
                    err
                );
                Err(DbError::Close(err))
            }
        }
    }
}

impl Drop for ConnectionProvider {
    fn drop(&mut self) {
        if let Err(err) = self.dispose() {
            error!(
                "event=db_dispose module=db status=error phase=drop error={}",
                err
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ConnectionProvider;
    use crate::config::Settings;

    #[test]
    fn get_caches_and_dispose_resets() {
        let dir = tempfile::tempdir().unwrap();
        let mut provider = ConnectionProvider::new(&Settings::new(dir.path().join("records.db")));
        assert!(!provider.is_open());

        provider
            .get()
            .unwrap()
            .execute("INSERT INTO department (name) VALUES ('Physics')", [])
            .unwrap();
        assert!(provider.is_open());

        provider.dispose().unwrap();
        assert!(!provider.is_open());
        provider.dispose().unwrap();

        let count: i64 = provider
            .get()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM department", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
