//! Unit of work: one transaction shared by a group of repositories.
//!
//! # Invariants
//! - A unit of work owns exactly one open transaction until `commit()` or
//!   `rollback()`; afterwards every call fails with `DbError::SessionClosed`.
//! - Dropping an unfinished unit of work rolls back, including on unwind.

use super::{DbError, DbResult};
use crate::error::RecordsResult;
use log::{debug, warn};
use rusqlite::{Connection, Transaction};
use std::cell::RefCell;

/// Transaction-scoped handle over a borrowed connection.
#[derive(Debug)]
pub struct UnitOfWork<'c> {
    tx: RefCell<Option<Transaction<'c>>>,
}

impl<'c> UnitOfWork<'c> {
    /// Starts a deferred transaction on `conn`.
    pub fn begin(conn: &'c Connection) -> DbResult<Self> {
        let tx = conn.unchecked_transaction()?;
        debug!("event=uow_begin module=db status=ok");
        Ok(Self {
            tx: RefCell::new(Some(tx)),
        })
    }

    /// Runs `work` in a fresh unit of work.
    ///
    /// Commits when `work` returns `Ok`, rolls back when it returns `Err`
    /// (the original error is returned), and rolls back on panic through
    /// the transaction's drop.
    pub fn scope<T, F>(conn: &'c Connection, work: F) -> RecordsResult<T>
    where
        F: FnOnce(&UnitOfWork<'c>) -> RecordsResult<T>,
    {
        let uow = Self::begin(conn)?;
        match work(&uow) {
            Ok(value) => {
                if uow.is_active() {
                    uow.commit()?;
                }
                Ok(value)
            }
            Err(err) => {
                if uow.is_active() {
                    if let Err(rollback_err) = uow.rollback() {
                        warn!(
                            "event=uow_rollback module=db status=error phase=scope error={}",
                            rollback_err
                        );
                    }
                }
                Err(err)
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// Runs `op` against the open transaction.
    pub(crate) fn with_connection<T, E, F>(&self, op: F) -> Result<T, E>
    where
        E: From<DbError>,
        F: FnOnce(&Connection) -> Result<T, E>,
    {
        let guard = self.tx.borrow();
        let tx = guard.as_ref().ok_or(DbError::SessionClosed)?;
        op(tx)
    }

    /// Persists every pending write and ends the unit of work.
    pub fn commit(&self) -> DbResult<()> {
        self.finish()?.commit()?;
        debug!("event=uow_commit module=db status=ok");
        Ok(())
    }

    /// Discards every pending write and ends the unit of work.
    pub fn rollback(&self) -> DbResult<()> {
        self.finish()?.rollback()?;
        debug!("event=uow_rollback module=db status=ok");
        Ok(())
    }

    fn finish(&self) -> DbResult<Transaction<'c>> {
        self.tx.borrow_mut().take().ok_or(DbError::SessionClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::UnitOfWork;
    use crate::db::{open_db_in_memory, DbError};
    use crate::error::RecordsError;

    fn department_count(conn: &rusqlite::Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM department", [], |row| row.get(0))
            .unwrap()
    }

    fn insert_department(uow: &UnitOfWork<'_>) -> Result<(), RecordsError> {
        uow.with_connection(|conn| {
            conn.execute("INSERT INTO department (name) VALUES ('Maths')", [])?;
            Ok(())
        })
    }

    #[test]
    fn commit_persists_and_closes() {
        let conn = open_db_in_memory().unwrap();
        let uow = UnitOfWork::begin(&conn).unwrap();
        insert_department(&uow).unwrap();
        uow.commit().unwrap();

        assert!(!uow.is_active());
        assert_eq!(department_count(&conn), 1);
        assert!(matches!(
            insert_department(&uow),
            Err(RecordsError::Database(DbError::SessionClosed))
        ));
        assert!(matches!(uow.commit(), Err(DbError::SessionClosed)));
    }

    #[test]
    fn rollback_discards_writes() {
        let conn = open_db_in_memory().unwrap();
        let uow = UnitOfWork::begin(&conn).unwrap();
        insert_department(&uow).unwrap();
        uow.rollback().unwrap();
        assert_eq!(department_count(&conn), 0);
    }

    #[test]
    fn drop_without_commit_rolls_back() {
        let conn = open_db_in_memory().unwrap();
        {
            let uow = UnitOfWork::begin(&conn).unwrap();
            insert_department(&uow).unwrap();
        }
        assert_eq!(department_count(&conn), 0);
    }

    #[test]
    fn scope_commits_on_ok_and_rolls_back_on_err() {
        let conn = open_db_in_memory().unwrap();

        UnitOfWork::scope(&conn, insert_department).unwrap();
        assert_eq!(department_count(&conn), 1);

        let err = UnitOfWork::scope(&conn, |uow| -> Result<(), RecordsError> {
            insert_department(uow)?;
            Err(RecordsError::validation("name", "rejected by caller"))
        })
        .unwrap_err();
        assert!(matches!(err, RecordsError::Validation { .. }));
        assert_eq!(department_count(&conn), 1);
    }

    #[test]
    fn scope_rolls_back_on_panic() {
        let conn = open_db_in_memory().unwrap();
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = UnitOfWork::scope(&conn, |uow| -> Result<(), RecordsError> {
                insert_department(uow)?;
                panic!("caller bug");
            });
        }));
        assert!(outcome.is_err());
        assert_eq!(department_count(&conn), 0);
        assert!(conn.is_autocommit());
    }
}
