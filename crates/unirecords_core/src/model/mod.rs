//! Record types and their static table schemas.
//!
//! # Responsibility
//! - Define one flat struct per table, keyed by a single integer id.
//! - Describe every writable column so field maps are checked before SQL.
//!
//! # Invariants
//! - Identity is the primary key; relationships are plain foreign-key ids,
//!   resolved by a second repository call, never by nested objects.
//! - SQL identifiers are only ever taken from the static schemas below.

use crate::error::{RecordsError, RecordsResult};
use rusqlite::types::{ToSql, ToSqlOutput, Value};
use rusqlite::Row;

pub mod course;
pub mod department;
pub mod lecturer;
pub mod programme;
pub mod research;
pub mod staff;
pub mod student;

pub use course::{Course, CourseMaterial};
pub use department::{Department, DepartmentResearchArea};
pub use lecturer::{
    Lecturer, LecturerExpertise, LecturerQualification, LecturerResearchInterest, Publication,
};
pub use programme::Programme;
pub use research::{ProjectFunding, ProjectOutcome, ResearchProject};
pub use staff::NonAcademicStaff;
pub use student::{DisciplinaryRecord, Student, StudentGrade};

/// Primary-key value of every record.
pub type EntityId = i64;

/// Storage class accepted by a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    /// Also accepts integer values.
    Real,
    Text,
}

/// One writable, non-key column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub required: bool,
}

impl Column {
    pub const fn required(name: &'static str, kind: ColumnKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: ColumnKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

/// A record type mapped to one table.
pub trait Entity: Sized {
    /// Table name; also used as the entity name in errors.
    const TABLE: &'static str;
    const PRIMARY_KEY: &'static str;
    /// Writable columns, primary key excluded.
    const COLUMNS: &'static [Column];

    fn id(&self) -> EntityId;

    /// Builds the record from a `SELECT *` row.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// Typed scalar accepted by `create` / `update`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl FieldValue {
    fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Text(_) => "text",
        }
    }

    fn fits(&self, kind: ColumnKind) -> bool {
        matches!(
            (self, kind),
            (Self::Null, _)
                | (Self::Integer(_), ColumnKind::Integer | ColumnKind::Real)
                | (Self::Real(_), ColumnKind::Real)
                | (Self::Text(_), ColumnKind::Text)
        )
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl ToSql for FieldValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Self::Null => ToSqlOutput::Owned(Value::Null),
            Self::Integer(value) => ToSqlOutput::from(*value),
            Self::Real(value) => ToSqlOutput::from(*value),
            Self::Text(value) => ToSqlOutput::from(value.as_str()),
        })
    }
}

/// Ordered `(field, value)` pairs for one write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    entries: Vec<(String, FieldValue)>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.entries.push((name.into(), value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries
            .iter()
            .map(|(field, value)| (field.as_str(), value))
    }

    /// Checks every entry against `E`'s schema.
    ///
    /// Returns the matching static column names paired with their values,
    /// in caller order.
    ///
    /// # Errors
    /// - `Validation` for an empty map, the primary key, an unknown or
    ///   repeated field, a value of the wrong kind, or null in a required
    ///   column.
    pub fn validate_for<E: Entity>(
        &self,
        operation: &str,
    ) -> RecordsResult<Vec<(&'static str, &FieldValue)>> {
        if self.entries.is_empty() {
            return Err(RecordsError::validation(
                "fields",
                format!("no fields provided for {operation}"),
            ));
        }

        let mut checked: Vec<(&'static str, &FieldValue)> = Vec::with_capacity(self.len());
        for (field, value) in &self.entries {
            if field == E::PRIMARY_KEY {
                return Err(RecordsError::validation(
                    field.as_str(),
                    format!("primary key of {} is generated and cannot be set", E::TABLE),
                ));
            }
            let column = E::COLUMNS
                .iter()
                .find(|column| column.name == field)
                .ok_or_else(|| {
                    RecordsError::validation(
                        field.as_str(),
                        format!("unknown field for {}", E::TABLE),
                    )
                })?;
            if checked.iter().any(|(name, _)| *name == column.name) {
                return Err(RecordsError::validation(
                    field.as_str(),
                    "field given more than once",
                ));
            }
            if *value == FieldValue::Null && column.required {
                return Err(RecordsError::validation(field.as_str(), "field is required"));
            }
            if !value.fits(column.kind) {
                return Err(RecordsError::validation(
                    field.as_str(),
                    format!("expected {:?} value, got {}", column.kind, value.kind_name()),
                ));
            }
            checked.push((column.name, value));
        }
        Ok(checked)
    }
}

impl<K, V> FromIterator<(K, V)> for Fields
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (name, value) in iter {
            fields.push(name, value);
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::{Department, FieldValue, Fields, Student};
    use crate::error::RecordsError;

    fn field_of(err: RecordsError) -> String {
        match err {
            RecordsError::Validation { field, .. } => field,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn valid_fields_keep_caller_order() {
        let fields = Fields::new()
            .set("year_of_study", 2)
            .set("name", "Ada")
            .set("advisor_id", None::<i64>);
        let checked = fields.validate_for::<Student>("create").unwrap();
        let names: Vec<&str> = checked.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, ["year_of_study", "name", "advisor_id"]);
        assert_eq!(*checked[2].1, FieldValue::Null);
    }

    #[test]
    fn empty_map_is_rejected() {
        let err = Fields::new().validate_for::<Department>("update").unwrap_err();
        assert!(err.to_string().contains("no fields provided for update"));
    }

    #[test]
    fn schema_violations_name_the_field() {
        let cases = [
            (Fields::new().set("dept_id", 4), "dept_id"),
            (Fields::new().set("nickname", "x"), "nickname"),
            (Fields::new().set("name", "a").set("name", "b"), "name"),
            (Fields::new().set("name", None::<String>), "name"),
            (Fields::new().set("name", 12), "name"),
        ];
        for (fields, expected) in cases {
            let err = fields.validate_for::<Department>("create").unwrap_err();
            assert_eq!(field_of(err), expected);
        }
    }

    #[test]
    fn integers_are_accepted_for_real_columns() {
        let fields = Fields::new().set("name", "Kim").set("salary", 52_000);
        fields
            .validate_for::<crate::model::NonAcademicStaff>("create")
            .unwrap();
    }

    #[test]
    fn collect_builds_fields() {
        let fields: Fields = [("name", "Physics"), ("faculty", "Science")]
            .into_iter()
            .collect();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("faculty"), Some(&FieldValue::from("Science")));
    }
}
