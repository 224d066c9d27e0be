//! Department and research-area records.

use super::{Column, ColumnKind, Entity, EntityId};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub dept_id: EntityId,
    pub name: String,
    pub faculty: Option<String>,
}

impl Entity for Department {
    const TABLE: &'static str = "department";
    const PRIMARY_KEY: &'static str = "dept_id";
    const COLUMNS: &'static [Column] = &[
        Column::required("name", ColumnKind::Text),
        Column::optional("faculty", ColumnKind::Text),
    ];

    fn id(&self) -> EntityId {
        self.dept_id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            dept_id: row.get("dept_id")?,
            name: row.get("name")?,
            faculty: row.get("faculty")?,
        })
    }
}

/// A research area a department is active in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentResearchArea {
    pub area_id: EntityId,
    pub dept_id: EntityId,
    pub area: String,
}

impl Entity for DepartmentResearchArea {
    const TABLE: &'static str = "department_research_area";
    const PRIMARY_KEY: &'static str = "area_id";
    const COLUMNS: &'static [Column] = &[
        Column::required("dept_id", ColumnKind::Integer),
        Column::required("area", ColumnKind::Text),
    ];

    fn id(&self) -> EntityId {
        self.area_id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            area_id: row.get("area_id")?,
            dept_id: row.get("dept_id")?,
            area: row.get("area")?,
        })
    }
}
