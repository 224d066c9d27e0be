//! Department lookups and research areas.

use super::base::{contains_pattern, Repository};
use crate::error::RecordsResult;
use crate::model::{Department, DepartmentResearchArea, EntityId, Fields};

pub type DepartmentRepository<'c> = Repository<'c, Department>;

impl<'c> Repository<'c, Department> {
    /// Exact-name lookup; names are not unique, so the lowest id wins.
    pub fn get_by_name(&self, name: &str) -> RecordsResult<Option<Department>> {
        self.query_optional(
            "SELECT * FROM department WHERE name = ?1 ORDER BY dept_id LIMIT 1",
            [name],
        )
    }

    pub fn get_by_faculty(&self, faculty: &str) -> RecordsResult<Vec<Department>> {
        self.query_list(
            "SELECT * FROM department WHERE faculty = ?1 ORDER BY name",
            [faculty],
        )
    }

    pub fn search(&self, term: &str) -> RecordsResult<Vec<Department>> {
        self.query_list(
            "SELECT * FROM department
             WHERE name LIKE ?1 ESCAPE '\\' OR faculty LIKE ?1 ESCAPE '\\'
             ORDER BY name",
            [contains_pattern(term)],
        )
    }

    pub fn get_research_areas(
        &self,
        dept_id: EntityId,
    ) -> RecordsResult<Vec<DepartmentResearchArea>> {
        self.query_related(
            "SELECT * FROM department_research_area WHERE dept_id = ?1 ORDER BY area, area_id",
            [dept_id],
        )
    }

    /// Departments with a research area containing `area`, ignoring case.
    pub fn get_departments_with_research_area(
        &self,
        area: &str,
    ) -> RecordsResult<Vec<Department>> {
        self.query_list(
            "SELECT DISTINCT d.* FROM department d
             JOIN department_research_area dra ON dra.dept_id = d.dept_id
             WHERE dra.area LIKE ?1 ESCAPE '\\'
             ORDER BY d.name, d.dept_id",
            [contains_pattern(area)],
        )
    }

    pub fn add_research_area(
        &self,
        dept_id: EntityId,
        area: &str,
    ) -> RecordsResult<DepartmentResearchArea> {
        self.create_child("dept_id", dept_id, &Fields::new().set("area", area))
    }
}
