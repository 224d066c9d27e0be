//! Student records with their grades and disciplinary history.

use super::{Column, ColumnKind, Entity, EntityId};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub student_id: EntityId,
    pub name: String,
    /// ISO `YYYY-MM-DD`.
    pub date_of_birth: Option<String>,
    pub contact_info: Option<String>,
    pub programme_id: Option<EntityId>,
    pub year_of_study: Option<i64>,
    pub graduation_status: Option<String>,
    /// Advising lecturer.
    pub advisor_id: Option<EntityId>,
}

impl Entity for Student {
    const TABLE: &'static str = "student";
    const PRIMARY_KEY: &'static str = "student_id";
    const COLUMNS: &'static [Column] = &[
        Column::required("name", ColumnKind::Text),
        Column::optional("date_of_birth", ColumnKind::Text),
        Column::optional("contact_info", ColumnKind::Text),
        Column::optional("programme_id", ColumnKind::Integer),
        Column::optional("year_of_study", ColumnKind::Integer),
        Column::optional("graduation_status", ColumnKind::Text),
        Column::optional("advisor_id", ColumnKind::Integer),
    ];

    fn id(&self) -> EntityId {
        self.student_id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            student_id: row.get("student_id")?,
            name: row.get("name")?,
            date_of_birth: row.get("date_of_birth")?,
            contact_info: row.get("contact_info")?,
            programme_id: row.get("programme_id")?,
            year_of_study: row.get("year_of_study")?,
            graduation_status: row.get("graduation_status")?,
            advisor_id: row.get("advisor_id")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentGrade {
    pub grade_id: EntityId,
    pub student_id: EntityId,
    pub course_id: EntityId,
    pub assessment_type: Option<String>,
    pub grade: Option<i64>,
    pub date_recorded: Option<String>,
}

impl Entity for StudentGrade {
    const TABLE: &'static str = "student_grade";
    const PRIMARY_KEY: &'static str = "grade_id";
    const COLUMNS: &'static [Column] = &[
        Column::required("student_id", ColumnKind::Integer),
        Column::required("course_id", ColumnKind::Integer),
        Column::optional("assessment_type", ColumnKind::Text),
        Column::optional("grade", ColumnKind::Integer),
        Column::optional("date_recorded", ColumnKind::Text),
    ];

    fn id(&self) -> EntityId {
        self.grade_id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            grade_id: row.get("grade_id")?,
            student_id: row.get("student_id")?,
            course_id: row.get("course_id")?,
            assessment_type: row.get("assessment_type")?,
            grade: row.get("grade")?,
            date_recorded: row.get("date_recorded")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisciplinaryRecord {
    pub record_id: EntityId,
    pub student_id: EntityId,
    pub incident_date: Option<String>,
    pub description: Option<String>,
    pub action_taken: Option<String>,
}

impl Entity for DisciplinaryRecord {
    const TABLE: &'static str = "disciplinary_record";
    const PRIMARY_KEY: &'static str = "record_id";
    const COLUMNS: &'static [Column] = &[
        Column::required("student_id", ColumnKind::Integer),
        Column::optional("incident_date", ColumnKind::Text),
        Column::optional("description", ColumnKind::Text),
        Column::optional("action_taken", ColumnKind::Text),
    ];

    fn id(&self) -> EntityId {
        self.record_id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            record_id: row.get("record_id")?,
            student_id: row.get("student_id")?,
            incident_date: row.get("incident_date")?,
            description: row.get("description")?,
            action_taken: row.get("action_taken")?,
        })
    }
}
