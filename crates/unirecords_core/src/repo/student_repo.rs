//! Student queries and enrolment links.
//!
//! # Invariants
//! - List queries order by `student_id` so results are stable.
//! - Link writes check both ends exist and report `EntityNotFound` first.

use super::base::{contains_pattern, Repository};
use crate::error::RecordsResult;
use crate::model::{Course, DisciplinaryRecord, EntityId, Fields, Student, StudentGrade};
use rusqlite::params;

pub type StudentRepository<'c> = Repository<'c, Student>;

impl<'c> Repository<'c, Student> {
    /// Students advised by lecturer `lecturer_id`.
    pub fn get_by_advisor(&self, lecturer_id: EntityId) -> RecordsResult<Vec<Student>> {
        self.query_list(
            "SELECT * FROM student WHERE advisor_id = ?1 ORDER BY student_id",
            [lecturer_id],
        )
    }

    pub fn get_by_programme(&self, programme_id: EntityId) -> RecordsResult<Vec<Student>> {
        self.query_list(
            "SELECT * FROM student WHERE programme_id = ?1 ORDER BY student_id",
            [programme_id],
        )
    }

    /// Students enrolled in course `course_id`.
    pub fn get_by_course(&self, course_id: EntityId) -> RecordsResult<Vec<Student>> {
        self.query_list(
            "SELECT s.* FROM student s
             JOIN student_course sc ON sc.student_id = s.student_id
             WHERE sc.course_id = ?1
             ORDER BY s.student_id",
            [course_id],
        )
    }

    /// Students enrolled in any course taught by `lecturer_id`.
    pub fn get_in_course_by_lecturer(&self, lecturer_id: EntityId) -> RecordsResult<Vec<Student>> {
        self.query_list(
            "SELECT DISTINCT s.* FROM student s
             JOIN student_course sc ON sc.student_id = s.student_id
             JOIN lecturer_course lc ON lc.course_id = sc.course_id
             WHERE lc.lecturer_id = ?1
             ORDER BY s.student_id",
            [lecturer_id],
        )
    }

    pub fn get_by_research_project(&self, project_id: EntityId) -> RecordsResult<Vec<Student>> {
        self.query_list(
            "SELECT s.* FROM student s
             JOIN research_project_member m ON m.student_id = s.student_id
             WHERE m.project_id = ?1
             ORDER BY s.student_id",
            [project_id],
        )
    }

    /// Case-insensitive substring match on name or contact info.
    pub fn search(&self, term: &str) -> RecordsResult<Vec<Student>> {
        let pattern = contains_pattern(term);
        self.query_list(
            "SELECT * FROM student
             WHERE name LIKE ?1 ESCAPE '\\' OR contact_info LIKE ?1 ESCAPE '\\'
             ORDER BY student_id",
            [pattern],
        )
    }

    pub fn get_grades(&self, student_id: EntityId) -> RecordsResult<Vec<StudentGrade>> {
        self.query_related(
            "SELECT * FROM student_grade WHERE student_id = ?1 ORDER BY grade_id",
            [student_id],
        )
    }

    /// Disciplinary history of `student_id`, most recent incident first.
    pub fn get_disciplinary_records(
        &self,
        student_id: EntityId,
    ) -> RecordsResult<Vec<DisciplinaryRecord>> {
        self.query_related(
            "SELECT * FROM disciplinary_record WHERE student_id = ?1
             ORDER BY incident_date IS NULL, incident_date DESC, record_id",
            [student_id],
        )
    }

    /// Enrols a student in a course.
    ///
    /// # Errors
    /// - `EntityNotFound` when either side is missing.
    /// - `Database` when the student is already enrolled.
    pub fn enrol_in_course(
        &self,
        student_id: EntityId,
        course_id: EntityId,
        semester: Option<&str>,
        enrolment_date: Option<&str>,
    ) -> RecordsResult<()> {
        self.ensure_exists(student_id)?;
        self.sibling::<Course>().ensure_exists(course_id)?;
        self.execute(
            "INSERT INTO student_course (student_id, course_id, semester, enrolment_date)
             VALUES (?1, ?2, ?3, ?4)",
            params![student_id, course_id, semester, enrolment_date],
        )?;
        Ok(())
    }

    pub fn unenrol_from_course(
        &self,
        student_id: EntityId,
        course_id: EntityId,
    ) -> RecordsResult<bool> {
        let removed = self.execute(
            "DELETE FROM student_course WHERE student_id = ?1 AND course_id = ?2",
            [student_id, course_id],
        )?;
        Ok(removed > 0)
    }

    /// Records a grade for `student_id`; `fields` holds the grade columns
    /// other than `student_id`.
    pub fn add_grade(&self, student_id: EntityId, fields: &Fields) -> RecordsResult<StudentGrade> {
        self.create_child("student_id", student_id, fields)
    }

    pub fn add_disciplinary_record(
        &self,
        student_id: EntityId,
        fields: &Fields,
    ) -> RecordsResult<DisciplinaryRecord> {
        self.create_child("student_id", student_id, fields)
    }
}
