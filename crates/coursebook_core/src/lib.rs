//! Core persistence for the Coursebook catalog demo.
//!
//! Courses, students, reviews, passports and the employee hierarchy are
//! stored in embedded SQLite behind hand-written repositories: explicit
//! SQL, transaction blocks, versioned migrations, and audit stamping done
//! in code rather than by a framework.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::course::{Course, CourseId};
pub use model::employee::{Employee, EmployeeGrade, EmployeeId};
pub use model::review::{Review, ReviewId, ReviewRating};
pub use model::student::{Passport, PassportId, Student, StudentId};
pub use model::ValidationError;
pub use repo::course_repo::{
    named_query, CourseRepository, RepoError, RepoResult, SqliteCourseRepository,
};
pub use repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
pub use repo::page::{CourseSort, CourseSortField, Page, PageRequest, SortDirection};
pub use repo::student_repo::{SqliteStudentRepository, StudentRepository};
pub use service::catalog_service::CatalogService;
pub use service::enrollment_service::EnrollmentService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
