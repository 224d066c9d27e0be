//! Persistence core for university records.
//! Owns the schema, the encrypted-at-rest backing file and the repositories
//! every front end goes through.

pub mod config;
pub mod context;
pub mod db;
pub mod encryption;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;

pub use config::{get_settings, Passphrase, Settings};
pub use context::AppContext;
pub use db::{ConnectionProvider, DbError, UnitOfWork};
pub use encryption::{EncryptionLifecycle, FileState, ShutdownOutcome, StartupReport};
pub use error::{RecordsError, RecordsResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::{
    Course, CourseMaterial, Department, DepartmentResearchArea, DisciplinaryRecord, Entity,
    EntityId, FieldValue, Fields, Lecturer, LecturerExpertise, LecturerQualification,
    LecturerResearchInterest, NonAcademicStaff, Programme, ProjectFunding, ProjectOutcome,
    Publication, ResearchProject, Student, StudentGrade,
};
pub use repo::{Repository, RepositoryFacade};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
