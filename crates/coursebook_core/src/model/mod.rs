//! Domain model for the course catalog.
//!
//! # Responsibility
//! - Define canonical persistent records: courses, reviews, students,
//!   passports and the employee hierarchy.
//! - Own field-level validation applied before any SQL mutation.
//!
//! # Invariants
//! - Records carry `id: Option<i64>`; `None` means not yet persisted, ids
//!   are assigned by the database on insert.
//! - Required text fields are non-blank, enforced by `validate()` on every
//!   write path.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod course;
pub mod employee;
pub mod review;
pub mod student;

/// Field-level validation failure raised before persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    BlankCourseName,
    BlankFirstName,
    BlankLastName,
    BlankPassportNumber,
    BlankEmployeeName,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankCourseName => write!(f, "course name must not be blank"),
            Self::BlankFirstName => write!(f, "student first name must not be blank"),
            Self::BlankLastName => write!(f, "student last name must not be blank"),
            Self::BlankPassportNumber => write!(f, "passport number must not be blank"),
            Self::BlankEmployeeName => write!(f, "employee name must not be blank"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
