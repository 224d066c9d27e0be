//! Course catalogue queries, prerequisites and programme membership.
//!
//! # Invariants
//! - A course is never its own prerequisite.
//! - Programme membership carries an `is_required` flag stored as 0/1.

use super::base::{contains_pattern, Repository};
use crate::error::{RecordsError, RecordsResult};
use crate::model::{Course, CourseMaterial, EntityId, Fields, Programme};
use rusqlite::params;

pub type CourseRepository<'c> = Repository<'c, Course>;

impl<'c> Repository<'c, Course> {
    pub fn get_by_department(&self, dept_id: EntityId) -> RecordsResult<Vec<Course>> {
        self.query_list(
            "SELECT * FROM course WHERE dept_id = ?1 ORDER BY course_code",
            [dept_id],
        )
    }

    /// Courses taught by `lecturer_id`.
    pub fn get_by_lecturer(&self, lecturer_id: EntityId) -> RecordsResult<Vec<Course>> {
        self.query_list(
            "SELECT c.* FROM course c
             JOIN lecturer_course lc ON lc.course_id = c.course_id
             WHERE lc.lecturer_id = ?1
             ORDER BY c.course_code",
            [lecturer_id],
        )
    }

    /// Courses taught by any lecturer belonging to `dept_id`.
    pub fn get_by_department_lecturers(&self, dept_id: EntityId) -> RecordsResult<Vec<Course>> {
        self.query_list(
            "SELECT DISTINCT c.* FROM course c
             JOIN lecturer_course lc ON lc.course_id = c.course_id
             JOIN lecturer l ON l.lecturer_id = lc.lecturer_id
             WHERE l.dept_id = ?1
             ORDER BY c.course_code",
            [dept_id],
        )
    }

    /// Courses `student_id` is enrolled in.
    pub fn get_by_student(&self, student_id: EntityId) -> RecordsResult<Vec<Course>> {
        self.query_list(
            "SELECT c.* FROM course c
             JOIN student_course sc ON sc.course_id = c.course_id
             WHERE sc.student_id = ?1
             ORDER BY c.course_code",
            [student_id],
        )
    }

    /// Courses in a programme, optionally only the required ones.
    pub fn get_by_programme(
        &self,
        programme_id: EntityId,
        required_only: bool,
    ) -> RecordsResult<Vec<Course>> {
        self.query_list(
            "SELECT c.* FROM course c
             JOIN programme_course pc ON pc.course_id = c.course_id
             WHERE pc.programme_id = ?1 AND (?2 = 0 OR pc.is_required = 1)
             ORDER BY c.course_code",
            params![programme_id, required_only],
        )
    }

    /// Direct prerequisites of `course_id`.
    pub fn get_prerequisites(&self, course_id: EntityId) -> RecordsResult<Vec<Course>> {
        self.query_list(
            "SELECT c.* FROM course c
             JOIN course_prerequisite p ON p.prerequisite_id = c.course_id
             WHERE p.course_id = ?1
             ORDER BY c.course_code",
            [course_id],
        )
    }

    pub fn get_by_level(&self, level: &str) -> RecordsResult<Vec<Course>> {
        self.query_list(
            "SELECT * FROM course WHERE level = ?1 ORDER BY course_code",
            [level],
        )
    }

    /// Looks a course up by its unique code; `None` when absent.
    pub fn get_by_code(&self, course_code: &str) -> RecordsResult<Option<Course>> {
        self.query_optional("SELECT * FROM course WHERE course_code = ?1", [course_code])
    }

    /// Substring match on code, name or description.
    pub fn search(&self, term: &str) -> RecordsResult<Vec<Course>> {
        self.query_list(
            "SELECT * FROM course
             WHERE course_code LIKE ?1 ESCAPE '\\'
                OR name LIKE ?1 ESCAPE '\\'
                OR description LIKE ?1 ESCAPE '\\'
             ORDER BY course_code",
            [contains_pattern(term)],
        )
    }

    pub fn get_materials(&self, course_id: EntityId) -> RecordsResult<Vec<CourseMaterial>> {
        self.query_related(
            "SELECT * FROM course_material WHERE course_id = ?1 ORDER BY material_id",
            [course_id],
        )
    }

    /// Makes `prerequisite_id` a prerequisite of `course_id`.
    ///
    /// # Errors
    /// - `Validation` when both ids are the same course.
    /// - `EntityNotFound` when either course is missing.
    pub fn add_prerequisite(
        &self,
        course_id: EntityId,
        prerequisite_id: EntityId,
    ) -> RecordsResult<()> {
        if course_id == prerequisite_id {
            return Err(RecordsError::validation(
                "prerequisite_id",
                "a course cannot be its own prerequisite",
            ));
        }
        self.ensure_exists(course_id)?;
        self.ensure_exists(prerequisite_id)?;
        self.execute(
            "INSERT INTO course_prerequisite (course_id, prerequisite_id) VALUES (?1, ?2)",
            [course_id, prerequisite_id],
        )?;
        Ok(())
    }

    pub fn remove_prerequisite(
        &self,
        course_id: EntityId,
        prerequisite_id: EntityId,
    ) -> RecordsResult<bool> {
        let removed = self.execute(
            "DELETE FROM course_prerequisite WHERE course_id = ?1 AND prerequisite_id = ?2",
            [course_id, prerequisite_id],
        )?;
        Ok(removed > 0)
    }

    /// Adds a course to a programme, or updates its required flag when it
    /// is already part of it.
    pub fn add_to_programme(
        &self,
        course_id: EntityId,
        programme_id: EntityId,
        is_required: bool,
    ) -> RecordsResult<()> {
        self.ensure_exists(course_id)?;
        self.sibling::<Programme>().ensure_exists(programme_id)?;
        self.execute(
            "INSERT INTO programme_course (programme_id, course_id, is_required)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (programme_id, course_id) DO UPDATE SET is_required = excluded.is_required",
            params![programme_id, course_id, is_required],
        )?;
        Ok(())
    }

    pub fn remove_from_programme(
        &self,
        course_id: EntityId,
        programme_id: EntityId,
    ) -> RecordsResult<bool> {
        let removed = self.execute(
            "DELETE FROM programme_course WHERE programme_id = ?1 AND course_id = ?2",
            [programme_id, course_id],
        )?;
        Ok(removed > 0)
    }

    pub fn add_material(&self, course_id: EntityId, fields: &Fields) -> RecordsResult<CourseMaterial> {
        self.create_child("course_id", course_id, fields)
    }
}
