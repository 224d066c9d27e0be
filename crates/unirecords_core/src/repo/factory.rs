//! Facade handing out per-entity repositories over one unit of work.
//!
//! # Invariants
//! - Each accessor returns the same cached repository for the facade's
//!   lifetime.
//! - All repositories of one facade see each other's uncommitted writes.
//! - After `commit()` or `rollback()` the unit of work is closed; further
//!   repository calls fail with `DbError::SessionClosed`.

use super::{
    CourseRepository, DepartmentRepository, LecturerRepository, ProgrammeRepository, Repository,
    ResearchProjectRepository, StaffRepository, StudentRepository,
};
use crate::db::{DbResult, UnitOfWork};
use crate::model::Entity;
use log::{debug, warn};
use once_cell::unsync::OnceCell;
use rusqlite::Connection;
use std::rc::Rc;

pub struct RepositoryFacade<'c> {
    uow: Rc<UnitOfWork<'c>>,
    students: OnceCell<StudentRepository<'c>>,
    lecturers: OnceCell<LecturerRepository<'c>>,
    staff: OnceCell<StaffRepository<'c>>,
    courses: OnceCell<CourseRepository<'c>>,
    departments: OnceCell<DepartmentRepository<'c>>,
    programmes: OnceCell<ProgrammeRepository<'c>>,
    research_projects: OnceCell<ResearchProjectRepository<'c>>,
}

impl<'c> RepositoryFacade<'c> {
    /// Begins a unit of work on `conn`.
    pub fn new(conn: &'c Connection) -> DbResult<Self> {
        Ok(Self::from_unit_of_work(UnitOfWork::begin(conn)?))
    }

    pub fn from_unit_of_work(uow: UnitOfWork<'c>) -> Self {
        Self {
            uow: Rc::new(uow),
            students: OnceCell::new(),
            lecturers: OnceCell::new(),
            staff: OnceCell::new(),
            courses: OnceCell::new(),
            departments: OnceCell::new(),
            programmes: OnceCell::new(),
            research_projects: OnceCell::new(),
        }
    }

    pub fn unit_of_work(&self) -> &UnitOfWork<'c> {
        &self.uow
    }

    pub fn students(&self) -> &StudentRepository<'c> {
        self.cached(&self.students)
    }

    pub fn lecturers(&self) -> &LecturerRepository<'c> {
        self.cached(&self.lecturers)
    }

    pub fn staff(&self) -> &StaffRepository<'c> {
        self.cached(&self.staff)
    }

    pub fn courses(&self) -> &CourseRepository<'c> {
        self.cached(&self.courses)
    }

    pub fn departments(&self) -> &DepartmentRepository<'c> {
        self.cached(&self.departments)
    }

    pub fn programmes(&self) -> &ProgrammeRepository<'c> {
        self.cached(&self.programmes)
    }

    pub fn research_projects(&self) -> &ResearchProjectRepository<'c> {
        self.cached(&self.research_projects)
    }

    /// Uncached repository for any entity type, including the child tables
    /// without a dedicated accessor.
    pub fn repository<E: Entity>(&self) -> Repository<'c, E> {
        Repository::new(Rc::clone(&self.uow))
    }

    /// Persists every write made through this facade.
    pub fn commit(&self) -> DbResult<()> {
        self.uow.commit()
    }

    /// Discards every uncommitted write made through this facade.
    pub fn rollback(&self) -> DbResult<()> {
        self.uow.rollback()
    }

    /// Releases the facade, rolling back anything uncommitted.
    pub fn close(self) -> DbResult<()> {
        if self.uow.is_active() {
            warn!("event=facade_close module=repo status=ok pending=rolled_back");
            return self.uow.rollback();
        }
        debug!("event=facade_close module=repo status=ok pending=none");
        Ok(())
    }

    fn cached<'a, E: Entity>(&self, cell: &'a OnceCell<Repository<'c, E>>) -> &'a Repository<'c, E> {
        cell.get_or_init(|| Repository::new(Rc::clone(&self.uow)))
    }
}

#[cfg(test)]
mod tests {
    use super::RepositoryFacade;
    use crate::db::open_db_in_memory;
    use crate::model::Fields;

    #[test]
    fn accessors_return_cached_instances() {
        let conn = open_db_in_memory().unwrap();
        let facade = RepositoryFacade::new(&conn).unwrap();
        assert!(std::ptr::eq(facade.students(), facade.students()));
        assert!(std::ptr::eq(facade.courses(), facade.courses()));
    }

    #[test]
    fn close_rolls_back_pending_writes() {
        let conn = open_db_in_memory().unwrap();
        let facade = RepositoryFacade::new(&conn).unwrap();
        facade
            .departments()
            .create(&Fields::new().set("name", "History"))
            .unwrap();
        facade.close().unwrap();

        let facade = RepositoryFacade::new(&conn).unwrap();
        assert_eq!(facade.departments().count().unwrap(), 0);
    }
}
