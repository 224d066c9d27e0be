//! Academic programme record.

use super::{Column, ColumnKind, Entity, EntityId};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Programme {
    pub programme_id: EntityId,
    pub name: String,
    pub degree_awarded: Option<String>,
    pub duration_years: Option<i64>,
    pub enrolment_details: Option<String>,
}

impl Entity for Programme {
    const TABLE: &'static str = "programme";
    const PRIMARY_KEY: &'static str = "programme_id";
    const COLUMNS: &'static [Column] = &[
        Column::required("name", ColumnKind::Text),
        Column::optional("degree_awarded", ColumnKind::Text),
        Column::optional("duration_years", ColumnKind::Integer),
        Column::optional("enrolment_details", ColumnKind::Text),
    ];

    fn id(&self) -> EntityId {
        self.programme_id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            programme_id: row.get("programme_id")?,
            name: row.get("name")?,
            degree_awarded: row.get("degree_awarded")?,
            duration_years: row.get("duration_years")?,
            enrolment_details: row.get("enrolment_details")?,
        })
    }
}
