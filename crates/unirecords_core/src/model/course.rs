//! Course and course-material records.

use super::{Column, ColumnKind, Entity, EntityId};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub course_id: EntityId,
    /// Unique, e.g. `CS101`.
    pub course_code: String,
    pub name: String,
    pub description: Option<String>,
    pub dept_id: Option<EntityId>,
    pub level: Option<String>,
    pub credits: Option<i64>,
    pub schedule: Option<String>,
}

impl Entity for Course {
    const TABLE: &'static str = "course";
    const PRIMARY_KEY: &'static str = "course_id";
    const COLUMNS: &'static [Column] = &[
        Column::required("course_code", ColumnKind::Text),
        Column::required("name", ColumnKind::Text),
        Column::optional("description", ColumnKind::Text),
        Column::optional("dept_id", ColumnKind::Integer),
        Column::optional("level", ColumnKind::Text),
        Column::optional("credits", ColumnKind::Integer),
        Column::optional("schedule", ColumnKind::Text),
    ];

    fn id(&self) -> EntityId {
        self.course_id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            course_id: row.get("course_id")?,
            course_code: row.get("course_code")?,
            name: row.get("name")?,
            description: row.get("description")?,
            dept_id: row.get("dept_id")?,
            level: row.get("level")?,
            credits: row.get("credits")?,
            schedule: row.get("schedule")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseMaterial {
    pub material_id: EntityId,
    pub course_id: EntityId,
    pub title: String,
    pub material_type: Option<String>,
    pub url: Option<String>,
}

impl Entity for CourseMaterial {
    const TABLE: &'static str = "course_material";
    const PRIMARY_KEY: &'static str = "material_id";
    const COLUMNS: &'static [Column] = &[
        Column::required("course_id", ColumnKind::Integer),
        Column::required("title", ColumnKind::Text),
        Column::optional("material_type", ColumnKind::Text),
        Column::optional("url", ColumnKind::Text),
    ];

    fn id(&self) -> EntityId {
        self.material_id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            material_id: row.get("material_id")?,
            course_id: row.get("course_id")?,
            title: row.get("title")?,
            material_type: row.get("material_type")?,
            url: row.get("url")?,
        })
    }
}
