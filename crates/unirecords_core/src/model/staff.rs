//! Non-academic staff record.

use super::{Column, ColumnKind, Entity, EntityId};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonAcademicStaff {
    pub staff_id: EntityId,
    pub name: String,
    pub job_title: Option<String>,
    pub dept_id: Option<EntityId>,
    /// e.g. `full_time`, `part_time`, `contract`.
    pub employment_type: Option<String>,
    pub contract_details: Option<String>,
    pub salary: Option<f64>,
    pub emergency_contact: Option<String>,
}

impl Entity for NonAcademicStaff {
    const TABLE: &'static str = "non_academic_staff";
    const PRIMARY_KEY: &'static str = "staff_id";
    const COLUMNS: &'static [Column] = &[
        Column::required("name", ColumnKind::Text),
        Column::optional("job_title", ColumnKind::Text),
        Column::optional("dept_id", ColumnKind::Integer),
        Column::optional("employment_type", ColumnKind::Text),
        Column::optional("contract_details", ColumnKind::Text),
        Column::optional("salary", ColumnKind::Real),
        Column::optional("emergency_contact", ColumnKind::Text),
    ];

    fn id(&self) -> EntityId {
        self.staff_id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            staff_id: row.get("staff_id")?,
            name: row.get("name")?,
            job_title: row.get("job_title")?,
            dept_id: row.get("dept_id")?,
            employment_type: row.get("employment_type")?,
            contract_details: row.get("contract_details")?,
            salary: row.get("salary")?,
            emergency_contact: row.get("emergency_contact")?,
        })
    }
}
