//! Research project queries, membership, funding and outcomes.

use super::base::{contains_pattern, Repository};
use crate::error::RecordsResult;
use crate::model::{EntityId, Fields, ProjectFunding, ProjectOutcome, ResearchProject, Student};

pub type ResearchProjectRepository<'c> = Repository<'c, ResearchProject>;

impl<'c> Repository<'c, ResearchProject> {
    pub fn get_by_department(&self, dept_id: EntityId) -> RecordsResult<Vec<ResearchProject>> {
        self.query_list(
            "SELECT * FROM research_project WHERE dept_id = ?1 ORDER BY project_id",
            [dept_id],
        )
    }

    pub fn get_by_head_lecturer(
        &self,
        lecturer_id: EntityId,
    ) -> RecordsResult<Vec<ResearchProject>> {
        self.query_list(
            "SELECT * FROM research_project WHERE head_lecturer_id = ?1 ORDER BY project_id",
            [lecturer_id],
        )
    }

    pub fn search(&self, term: &str) -> RecordsResult<Vec<ResearchProject>> {
        self.query_list(
            "SELECT * FROM research_project WHERE title LIKE ?1 ESCAPE '\\' ORDER BY project_id",
            [contains_pattern(term)],
        )
    }

    pub fn get_funding(&self, project_id: EntityId) -> RecordsResult<Vec<ProjectFunding>> {
        self.query_related(
            "SELECT * FROM project_funding WHERE project_id = ?1 ORDER BY funding_id",
            [project_id],
        )
    }

    /// Outcomes of `project_id`, most recent first.
    pub fn get_outcomes(&self, project_id: EntityId) -> RecordsResult<Vec<ProjectOutcome>> {
        self.query_related(
            "SELECT * FROM project_outcome WHERE project_id = ?1
             ORDER BY outcome_date IS NULL, outcome_date DESC, outcome_id",
            [project_id],
        )
    }

    pub fn add_member(&self, project_id: EntityId, student_id: EntityId) -> RecordsResult<()> {
        self.ensure_exists(project_id)?;
        self.sibling::<Student>().ensure_exists(student_id)?;
        self.execute(
            "INSERT INTO research_project_member (project_id, student_id) VALUES (?1, ?2)",
            [project_id, student_id],
        )?;
        Ok(())
    }

    pub fn remove_member(&self, project_id: EntityId, student_id: EntityId) -> RecordsResult<bool> {
        let removed = self.execute(
            "DELETE FROM research_project_member WHERE project_id = ?1 AND student_id = ?2",
            [project_id, student_id],
        )?;
        Ok(removed > 0)
    }

    pub fn add_funding(&self, project_id: EntityId, fields: &Fields) -> RecordsResult<ProjectFunding> {
        self.create_child("project_id", project_id, fields)
    }

    pub fn add_outcome(&self, project_id: EntityId, fields: &Fields) -> RecordsResult<ProjectOutcome> {
        self.create_child("project_id", project_id, fields)
    }
}
