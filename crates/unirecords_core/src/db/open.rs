//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Apply per-connection pragmas and hooks from settings.
//! - Run the schema bootstrap before returning a usable connection.
//!
//! # Invariants
//! - `foreign_keys` matches `ConnectionOptions::foreign_keys` on every
//!   returned connection.
//! - Returned connections have migrations fully applied.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use crate::config::Settings;
use log::{debug, error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Per-connection configuration applied by the bootstrap hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionOptions {
    pub foreign_keys: bool,
    pub echo_sql: bool,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            foreign_keys: true,
            echo_sql: false,
        }
    }
}

impl From<&Settings> for ConnectionOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            foreign_keys: settings.foreign_keys_enabled,
            echo_sql: settings.echo_sql,
        }
    }
}

/// Opens (or creates) a SQLite file and bootstraps it.
///
/// # Side effects
/// - Creates the file when missing.
/// - Emits `db_open` events with duration and status.
pub fn open_db(path: impl AsRef<Path>, options: &ConnectionOptions) -> DbResult<Connection> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=file");

    let conn = Connection::open(path).map_err(|source| {
        error!(
            "event=db_open module=db status=error mode=file duration_ms={} error_code=db_open_failed error={}",
            started_at.elapsed().as_millis(),
            source
        );
        DbError::Open {
            path: path.to_path_buf(),
            source,
        }
    })?;

    finish_open(conn, options, "file", started_at)
}

/// Opens an in-memory database with default options.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode=memory");
    let conn = Connection::open_in_memory()?;
    finish_open(conn, &ConnectionOptions::default(), "memory", started_at)
}

fn finish_open(
    mut conn: Connection,
    options: &ConnectionOptions,
    mode: &str,
    started_at: Instant,
) -> DbResult<Connection> {
    match bootstrap_connection(&mut conn, options) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={} foreign_keys={} echo_sql={} duration_ms={}",
                mode,
                options.foreign_keys,
                options.echo_sql,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection, options: &ConnectionOptions) -> DbResult<()> {
    let pragma = if options.foreign_keys {
        "PRAGMA foreign_keys = ON;"
    } else {
        "PRAGMA foreign_keys = OFF;"
    };
    conn.execute_batch(pragma)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    if options.echo_sql {
        conn.trace(Some(trace_sql));
    }
    apply_migrations(conn)?;
    Ok(())
}

fn trace_sql(sql: &str) {
    debug!("event=sql_trace module=db sql={}", sql.replace(['\n', '\r'], " "));
}

#[cfg(test)]
mod tests {
    use super::{open_db, ConnectionOptions};

    fn foreign_keys(conn: &rusqlite::Connection) -> i64 {
        conn.query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn foreign_key_flag_is_applied() {
        let dir = tempfile::tempdir().unwrap();

        let enforced = open_db(dir.path().join("on.db"), &ConnectionOptions::default()).unwrap();
        assert_eq!(foreign_keys(&enforced), 1);

        let relaxed = open_db(
            dir.path().join("off.db"),
            &ConnectionOptions {
                foreign_keys: false,
                echo_sql: true,
            },
        )
        .unwrap();
        assert_eq!(foreign_keys(&relaxed), 0);
    }
}
