//! Repository layer over the university records schema.
//!
//! # Responsibility
//! - Provide one generic CRUD contract for every entity table.
//! - Add relationship queries and link maintenance per entity.
//! - Group repositories behind a facade that shares one unit of work.
//!
//! # Invariants
//! - Repository writes validate field maps before touching storage.
//! - Repositories return semantic errors (`EntityNotFound`, `Validation`)
//!   in addition to database errors.

mod base;
pub mod course_repo;
pub mod department_repo;
pub mod factory;
pub mod lecturer_repo;
pub mod programme_repo;
pub mod research_repo;
pub mod staff_repo;
pub mod student_repo;

pub use base::Repository;
pub use course_repo::CourseRepository;
pub use department_repo::DepartmentRepository;
pub use factory::RepositoryFacade;
pub use lecturer_repo::LecturerRepository;
pub use programme_repo::ProgrammeRepository;
pub use research_repo::ResearchProjectRepository;
pub use staff_repo::StaffRepository;
pub use student_repo::StudentRepository;
