//! Research project records with their funding and outcomes.

use super::{Column, ColumnKind, Entity, EntityId};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchProject {
    pub project_id: EntityId,
    pub title: String,
    pub head_lecturer_id: EntityId,
    pub dept_id: Option<EntityId>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl Entity for ResearchProject {
    const TABLE: &'static str = "research_project";
    const PRIMARY_KEY: &'static str = "project_id";
    const COLUMNS: &'static [Column] = &[
        Column::required("title", ColumnKind::Text),
        Column::required("head_lecturer_id", ColumnKind::Integer),
        Column::optional("dept_id", ColumnKind::Integer),
        Column::optional("start_date", ColumnKind::Text),
        Column::optional("end_date", ColumnKind::Text),
    ];

    fn id(&self) -> EntityId {
        self.project_id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            project_id: row.get("project_id")?,
            title: row.get("title")?,
            head_lecturer_id: row.get("head_lecturer_id")?,
            dept_id: row.get("dept_id")?,
            start_date: row.get("start_date")?,
            end_date: row.get("end_date")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFunding {
    pub funding_id: EntityId,
    pub project_id: EntityId,
    pub source_name: String,
    pub amount: Option<f64>,
}

impl Entity for ProjectFunding {
    const TABLE: &'static str = "project_funding";
    const PRIMARY_KEY: &'static str = "funding_id";
    const COLUMNS: &'static [Column] = &[
        Column::required("project_id", ColumnKind::Integer),
        Column::required("source_name", ColumnKind::Text),
        Column::optional("amount", ColumnKind::Real),
    ];

    fn id(&self) -> EntityId {
        self.funding_id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            funding_id: row.get("funding_id")?,
            project_id: row.get("project_id")?,
            source_name: row.get("source_name")?,
            amount: row.get("amount")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectOutcome {
    pub outcome_id: EntityId,
    pub project_id: EntityId,
    pub description: String,
    pub outcome_date: Option<String>,
}

impl Entity for ProjectOutcome {
    const TABLE: &'static str = "project_outcome";
    const PRIMARY_KEY: &'static str = "outcome_id";
    const COLUMNS: &'static [Column] = &[
        Column::required("project_id", ColumnKind::Integer),
        Column::required("description", ColumnKind::Text),
        Column::optional("outcome_date", ColumnKind::Text),
    ];

    fn id(&self) -> EntityId {
        self.outcome_id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            outcome_id: row.get("outcome_id")?,
            project_id: row.get("project_id")?,
            description: row.get("description")?,
            outcome_date: row.get("outcome_date")?,
        })
    }
}
