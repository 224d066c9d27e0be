//! Generic CRUD repository over any [`Entity`].
//!
//! # Responsibility
//! - Give every table the same get/list/exists/count/create/update/delete
//!   contract on top of a shared unit of work.
//! - Offer row-mapping helpers to entity-specific query extensions.
//!
//! # Invariants
//! - Field maps are validated before any SQL runs.
//! - `create` and `update` return the row as re-read from storage.
//! - Every statement goes through the unit of work's transaction.

use crate::db::UnitOfWork;
use crate::error::{RecordsError, RecordsResult};
use crate::model::{Entity, EntityId, Fields};
use log::debug;
use rusqlite::types::ToSql;
use rusqlite::{params_from_iter, Connection, Params};
use std::marker::PhantomData;
use std::rc::Rc;

/// Repository binding entity type `E` to a shared unit of work.
pub struct Repository<'c, E: Entity> {
    uow: Rc<UnitOfWork<'c>>,
    _entity: PhantomData<fn() -> E>,
}

impl<'c, E: Entity> Repository<'c, E> {
    pub fn new(uow: Rc<UnitOfWork<'c>>) -> Self {
        Self {
            uow,
            _entity: PhantomData,
        }
    }

    pub fn unit_of_work(&self) -> &UnitOfWork<'c> {
        &self.uow
    }

    /// Returns the entity with primary key `id`.
    ///
    /// # Errors
    /// - `EntityNotFound` when no row has that id.
    pub fn get_by_id(&self, id: EntityId) -> RecordsResult<E> {
        self.find_by_id(id)?.ok_or(RecordsError::EntityNotFound {
            entity: E::TABLE,
            id,
        })
    }

    /// Like [`Self::get_by_id`] but absent rows are `None`.
    pub fn find_by_id(&self, id: EntityId) -> RecordsResult<Option<E>> {
        let sql = format!("SELECT * FROM {} WHERE {} = ?1", E::TABLE, E::PRIMARY_KEY);
        self.query_optional(&sql, [id])
    }

    /// Returns every row, ordered by primary key.
    pub fn get_all(&self) -> RecordsResult<Vec<E>> {
        let sql = format!("SELECT * FROM {} ORDER BY {}", E::TABLE, E::PRIMARY_KEY);
        self.query_list(&sql, [])
    }

    pub fn exists(&self, id: EntityId) -> RecordsResult<bool> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ?1)",
            E::TABLE,
            E::PRIMARY_KEY
        );
        self.with_sql(|conn| conn.query_row(&sql, [id], |row| row.get(0)))
    }

    pub fn count(&self) -> RecordsResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", E::TABLE);
        let count: i64 = self.with_sql(|conn| conn.query_row(&sql, [], |row| row.get(0)))?;
        Ok(count.max(0).unsigned_abs())
    }

    /// Inserts a row and returns it with its generated id.
    ///
    /// # Errors
    /// - `Validation` when `fields` is empty or violates the schema; nothing
    ///   touches storage in that case.
    /// - `Database` for constraint violations.
    pub fn create(&self, fields: &Fields) -> RecordsResult<E> {
        let checked = fields.validate_for::<E>("create")?;
        let columns: Vec<&str> = checked.iter().map(|(name, _)| *name).collect();
        let placeholders: Vec<String> = (1..=checked.len()).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            E::TABLE,
            columns.join(", "),
            placeholders.join(", ")
        );

        let id = self.with_sql(|conn| {
            conn.execute(&sql, params_from_iter(checked.iter().map(|(_, value)| *value)))?;
            Ok(conn.last_insert_rowid())
        })?;
        debug!(
            "event=repo_create module=repo status=ok table={} id={} fields={}",
            E::TABLE,
            id,
            checked.len()
        );
        self.get_by_id(id)
    }

    /// Applies `fields` to row `id` and returns the re-read row.
    ///
    /// # Errors
    /// - `Validation` when `fields` is empty or violates the schema.
    /// - `EntityNotFound` when no row has that id.
    pub fn update(&self, id: EntityId, fields: &Fields) -> RecordsResult<E> {
        let checked = fields.validate_for::<E>("update")?;
        let assignments: Vec<String> = checked
            .iter()
            .enumerate()
            .map(|(index, (name, _))| format!("{name} = ?{}", index + 1))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?{}",
            E::TABLE,
            assignments.join(", "),
            E::PRIMARY_KEY,
            checked.len() + 1
        );

        let mut bind: Vec<&dyn ToSql> = checked
            .iter()
            .map(|(_, value)| *value as &dyn ToSql)
            .collect();
        bind.push(&id);

        let changed = self.with_sql(|conn| conn.execute(&sql, bind.as_slice()))?;
        if changed == 0 {
            return Err(RecordsError::EntityNotFound {
                entity: E::TABLE,
                id,
            });
        }
        debug!(
            "event=repo_update module=repo status=ok table={} id={} fields={}",
            E::TABLE,
            id,
            checked.len()
        );
        self.get_by_id(id)
    }

    /// Deletes row `id`; `false` when it did not exist.
    pub fn delete(&self, id: EntityId) -> RecordsResult<bool> {
        let sql = format!("DELETE FROM {} WHERE {} = ?1", E::TABLE, E::PRIMARY_KEY);
        let changed = self.with_sql(|conn| conn.execute(&sql, [id]))?;
        debug!(
            "event=repo_delete module=repo status=ok table={} id={} removed={}",
            E::TABLE,
            id,
            changed > 0
        );
        Ok(changed > 0)
    }

    /// Repository for another entity type over the same unit of work.
    pub(crate) fn sibling<T: Entity>(&self) -> Repository<'c, T> {
        Repository::new(Rc::clone(&self.uow))
    }

    pub(crate) fn ensure_exists(&self, id: EntityId) -> RecordsResult<()> {
        if self.exists(id)? {
            Ok(())
        } else {
            Err(RecordsError::EntityNotFound {
                entity: E::TABLE,
                id,
            })
        }
    }

    /// Creates a `T` row owned by entity `parent_id` of this repository.
    ///
    /// `parent_field` is set from `parent_id`; passing it in `fields` too is
    /// a validation error.
    pub(crate) fn create_child<T: Entity>(
        &self,
        parent_field: &'static str,
        parent_id: EntityId,
        fields: &Fields,
    ) -> RecordsResult<T> {
        self.ensure_exists(parent_id)?;
        let mut owned = Fields::new().set(parent_field, parent_id);
        for (name, value) in fields.iter() {
            owned.push(name, value.clone());
        }
        self.sibling::<T>().create(&owned)
    }

    pub(crate) fn query_list<P: Params>(&self, sql: &str, params: P) -> RecordsResult<Vec<E>> {
        self.query_related::<E, P>(sql, params)
    }

    pub(crate) fn query_optional<P: Params>(
        &self,
        sql: &str,
        params: P,
    ) -> RecordsResult<Option<E>> {
        Ok(self.query_list(sql, params)?.into_iter().next())
    }

    /// Maps rows of any table reachable from this repository.
    pub(crate) fn query_related<T: Entity, P: Params>(
        &self,
        sql: &str,
        params: P,
    ) -> RecordsResult<Vec<T>> {
        self.with_sql(|conn| {
            let mut stmt = conn.prepare(sql)?;
            let rows = stmt.query_map(params, |row| T::from_row(row))?;
            rows.collect()
        })
    }

    /// Runs a write statement; returns the changed row count.
    pub(crate) fn execute<P: Params>(&self, sql: &str, params: P) -> RecordsResult<usize> {
        self.with_sql(|conn| conn.execute(sql, params))
    }

    fn with_sql<T, F>(&self, op: F) -> RecordsResult<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        self.uow.with_connection(|conn| Ok(op(conn)?))
    }
}

/// Builds a case-insensitive `LIKE` pattern matching `term` anywhere.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::contains_pattern;

    #[test]
    fn contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("ada"), "%ada%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
    }
}
