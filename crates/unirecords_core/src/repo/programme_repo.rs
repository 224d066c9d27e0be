//! Programme lookups and their course lists.

use super::base::Repository;
use crate::error::RecordsResult;
use crate::model::{Course, EntityId, Programme};

pub type ProgrammeRepository<'c> = Repository<'c, Programme>;

impl<'c> Repository<'c, Programme> {
    pub fn get_by_name(&self, name: &str) -> RecordsResult<Option<Programme>> {
        self.query_optional(
            "SELECT * FROM programme WHERE name = ?1 ORDER BY programme_id LIMIT 1",
            [name],
        )
    }

    /// Programmes awarding `degree` (for example `"BSc"`).
    pub fn get_by_degree(&self, degree: &str) -> RecordsResult<Vec<Programme>> {
        self.query_list(
            "SELECT * FROM programme WHERE degree_awarded = ?1 ORDER BY name",
            [degree],
        )
    }

    /// Courses making up `programme_id`, optionally only the required ones.
    pub fn get_programme_courses(
        &self,
        programme_id: EntityId,
        required_only: bool,
    ) -> RecordsResult<Vec<Course>> {
        self.sibling::<Course>().get_by_programme(programme_id, required_only)
    }
}
