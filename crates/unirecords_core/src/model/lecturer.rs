//! Lecturer records and the per-lecturer detail tables.

use super::{Column, ColumnKind, Entity, EntityId};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lecturer {
    pub lecturer_id: EntityId,
    pub name: String,
    pub dept_id: Option<EntityId>,
    pub course_load: Option<i64>,
}

impl Entity for Lecturer {
    const TABLE: &'static str = "lecturer";
    const PRIMARY_KEY: &'static str = "lecturer_id";
    const COLUMNS: &'static [Column] = &[
        Column::required("name", ColumnKind::Text),
        Column::optional("dept_id", ColumnKind::Integer),
        Column::optional("course_load", ColumnKind::Integer),
    ];

    fn id(&self) -> EntityId {
        self.lecturer_id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            lecturer_id: row.get("lecturer_id")?,
            name: row.get("name")?,
            dept_id: row.get("dept_id")?,
            course_load: row.get("course_load")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub publication_id: EntityId,
    pub lecturer_id: EntityId,
    pub title: String,
    pub journal: Option<String>,
    pub publication_date: Option<String>,
}

impl Entity for Publication {
    const TABLE: &'static str = "publication";
    const PRIMARY_KEY: &'static str = "publication_id";
    const COLUMNS: &'static [Column] = &[
        Column::required("lecturer_id", ColumnKind::Integer),
        Column::required("title", ColumnKind::Text),
        Column::optional("journal", ColumnKind::Text),
        Column::optional("publication_date", ColumnKind::Text),
    ];

    fn id(&self) -> EntityId {
        self.publication_id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            publication_id: row.get("publication_id")?,
            lecturer_id: row.get("lecturer_id")?,
            title: row.get("title")?,
            journal: row.get("journal")?,
            publication_date: row.get("publication_date")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LecturerQualification {
    pub qualification_id: EntityId,
    pub lecturer_id: EntityId,
    pub qualification_name: String,
    pub institution: Option<String>,
    pub year_awarded: Option<i64>,
}

impl Entity for LecturerQualification {
    const TABLE: &'static str = "lecturer_qualification";
    const PRIMARY_KEY: &'static str = "qualification_id";
    const COLUMNS: &'static [Column] = &[
        Column::required("lecturer_id", ColumnKind::Integer),
        Column::required("qualification_name", ColumnKind::Text),
        Column::optional("institution", ColumnKind::Text),
        Column::optional("year_awarded", ColumnKind::Integer),
    ];

    fn id(&self) -> EntityId {
        self.qualification_id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            qualification_id: row.get("qualification_id")?,
            lecturer_id: row.get("lecturer_id")?,
            qualification_name: row.get("qualification_name")?,
            institution: row.get("institution")?,
            year_awarded: row.get("year_awarded")?,
        })
    }
}

/// A subject area a lecturer is an expert in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LecturerExpertise {
    pub expertise_id: EntityId,
    pub lecturer_id: EntityId,
    pub area: String,
}

impl Entity for LecturerExpertise {
    const TABLE: &'static str = "lecturer_expertise";
    const PRIMARY_KEY: &'static str = "expertise_id";
    const COLUMNS: &'static [Column] = &[
        Column::required("lecturer_id", ColumnKind::Integer),
        Column::required("area", ColumnKind::Text),
    ];

    fn id(&self) -> EntityId {
        self.expertise_id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            expertise_id: row.get("expertise_id")?,
            lecturer_id: row.get("lecturer_id")?,
            area: row.get("area")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LecturerResearchInterest {
    pub interest_id: EntityId,
    pub lecturer_id: EntityId,
    pub interest: String,
}

impl Entity for LecturerResearchInterest {
    const TABLE: &'static str = "lecturer_research_interest";
    const PRIMARY_KEY: &'static str = "interest_id";
    const COLUMNS: &'static [Column] = &[
        Column::required("lecturer_id", ColumnKind::Integer),
        Column::required("interest", ColumnKind::Text),
    ];

    fn id(&self) -> EntityId {
        self.interest_id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            interest_id: row.get("interest_id")?,
            lecturer_id: row.get("lecturer_id")?,
            interest: row.get("interest")?,
        })
    }
}
