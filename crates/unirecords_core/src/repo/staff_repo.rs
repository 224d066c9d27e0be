//! Non-academic staff lookups.

use super::base::Repository;
use crate::error::RecordsResult;
use crate::model::{EntityId, NonAcademicStaff};

pub type StaffRepository<'c> = Repository<'c, NonAcademicStaff>;

impl<'c> Repository<'c, NonAcademicStaff> {
    pub fn get_by_department(&self, dept_id: EntityId) -> RecordsResult<Vec<NonAcademicStaff>> {
        self.query_list(
            "SELECT * FROM non_academic_staff WHERE dept_id = ?1 ORDER BY staff_id",
            [dept_id],
        )
    }

    pub fn get_by_job_title(&self, job_title: &str) -> RecordsResult<Vec<NonAcademicStaff>> {
        self.query_list(
            "SELECT * FROM non_academic_staff WHERE job_title = ?1 ORDER BY staff_id",
            [job_title],
        )
    }

    pub fn get_by_employment_type(
        &self,
        employment_type: &str,
    ) -> RecordsResult<Vec<NonAcademicStaff>> {
        self.query_list(
            "SELECT * FROM non_academic_staff WHERE employment_type = ?1 ORDER BY staff_id",
            [employment_type],
        )
    }
}
