//! Lecturer queries, teaching assignments and per-lecturer details.

use super::base::{contains_pattern, Repository};
use crate::error::RecordsResult;
use crate::model::{
    Course, EntityId, Fields, Lecturer, LecturerExpertise, LecturerQualification,
    LecturerResearchInterest, Publication,
};

pub type LecturerRepository<'c> = Repository<'c, Lecturer>;

impl<'c> Repository<'c, Lecturer> {
    pub fn get_by_department(&self, dept_id: EntityId) -> RecordsResult<Vec<Lecturer>> {
        self.query_list(
            "SELECT * FROM lecturer WHERE dept_id = ?1 ORDER BY lecturer_id",
            [dept_id],
        )
    }

    /// Lecturers assigned to teach course `course_id`.
    pub fn get_by_course(&self, course_id: EntityId) -> RecordsResult<Vec<Lecturer>> {
        self.query_list(
            "SELECT l.* FROM lecturer l
             JOIN lecturer_course lc ON lc.lecturer_id = l.lecturer_id
             WHERE lc.course_id = ?1
             ORDER BY l.lecturer_id",
            [course_id],
        )
    }

    /// Lecturers with an expertise area containing `area`, ignoring case.
    pub fn get_by_expertise(&self, area: &str) -> RecordsResult<Vec<Lecturer>> {
        self.query_list(
            "SELECT DISTINCT l.* FROM lecturer l
             JOIN lecturer_expertise le ON le.lecturer_id = l.lecturer_id
             WHERE le.area LIKE ?1 ESCAPE '\\'
             ORDER BY l.name, l.lecturer_id",
            [contains_pattern(area)],
        )
    }

    pub fn search(&self, term: &str) -> RecordsResult<Vec<Lecturer>> {
        self.query_list(
            "SELECT * FROM lecturer WHERE name LIKE ?1 ESCAPE '\\' ORDER BY lecturer_id",
            [contains_pattern(term)],
        )
    }

    /// Publications by `lecturer_id`, newest first; undated entries last.
    pub fn get_publications(&self, lecturer_id: EntityId) -> RecordsResult<Vec<Publication>> {
        self.query_related(
            "SELECT * FROM publication WHERE lecturer_id = ?1
             ORDER BY publication_date IS NULL, publication_date DESC, publication_id",
            [lecturer_id],
        )
    }

    /// Qualifications of `lecturer_id`, most recently awarded first.
    pub fn get_qualifications(
        &self,
        lecturer_id: EntityId,
    ) -> RecordsResult<Vec<LecturerQualification>> {
        self.query_related(
            "SELECT * FROM lecturer_qualification WHERE lecturer_id = ?1
             ORDER BY year_awarded IS NULL, year_awarded DESC, qualification_id",
            [lecturer_id],
        )
    }

    pub fn get_expertise(&self, lecturer_id: EntityId) -> RecordsResult<Vec<LecturerExpertise>> {
        self.query_related(
            "SELECT * FROM lecturer_expertise WHERE lecturer_id = ?1 ORDER BY area, expertise_id",
            [lecturer_id],
        )
    }

    pub fn get_research_interests(
        &self,
        lecturer_id: EntityId,
    ) -> RecordsResult<Vec<LecturerResearchInterest>> {
        self.query_related(
            "SELECT * FROM lecturer_research_interest WHERE lecturer_id = ?1
             ORDER BY interest, interest_id",
            [lecturer_id],
        )
    }

    pub fn assign_to_course(&self, lecturer_id: EntityId, course_id: EntityId) -> RecordsResult<()> {
        self.ensure_exists(lecturer_id)?;
        self.sibling::<Course>().ensure_exists(course_id)?;
        self.execute(
            "INSERT INTO lecturer_course (lecturer_id, course_id) VALUES (?1, ?2)",
            [lecturer_id, course_id],
        )?;
        Ok(())
    }

    pub fn unassign_from_course(
        &self,
        lecturer_id: EntityId,
        course_id: EntityId,
    ) -> RecordsResult<bool> {
        let removed = self.execute(
            "DELETE FROM lecturer_course WHERE lecturer_id = ?1 AND course_id = ?2",
            [lecturer_id, course_id],
        )?;
        Ok(removed > 0)
    }

    pub fn add_publication(
        &self,
        lecturer_id: EntityId,
        fields: &Fields,
    ) -> RecordsResult<Publication> {
        self.create_child("lecturer_id", lecturer_id, fields)
    }

    pub fn add_qualification(
        &self,
        lecturer_id: EntityId,
        fields: &Fields,
    ) -> RecordsResult<LecturerQualification> {
        self.create_child("lecturer_id", lecturer_id, fields)
    }

    pub fn add_expertise(&self, lecturer_id: EntityId, area: &str) -> RecordsResult<LecturerExpertise> {
        self.create_child("lecturer_id", lecturer_id, &Fields::new().set("area", area))
    }

    pub fn add_research_interest(
        &self,
        lecturer_id: EntityId,
        interest: &str,
    ) -> RecordsResult<LecturerResearchInterest> {
        self.create_child(
            "lecturer_id",
            lecturer_id,
            &Fields::new().set("interest", interest),
        )
    }
}
