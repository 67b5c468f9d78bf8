//! Student and passport records.
//!
//! # Responsibility
//! - Define the student record, its one-to-one passport link, and the
//!   passport record itself.
//!
//! # Invariants
//! - `first_name` and `last_name` are non-blank.
//! - A passport row must exist before a student may reference it; the
//!   repository persists the passport first.
//! - One passport belongs to at most one student (UNIQUE on the link).

use serde::{Deserialize, Serialize};

use crate::model::{is_blank, ValidationError};

/// Database-generated student identifier.
pub type StudentId = i64;
/// Database-generated passport identifier.
pub type PassportId = i64;

/// Passport record, inverse side of the student link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passport {
    /// `None` until the row is inserted.
    pub id: Option<PassportId>,
    pub passport_number: String,
}

impl Passport {
    /// Creates an unsaved passport.
    pub fn new(passport_number: impl Into<String>) -> Self {
        Self {
            id: None,
            passport_number: passport_number.into(),
        }
    }

    /// Checks write-path invariants before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.passport_number) {
            return Err(ValidationError::BlankPassportNumber);
        }
        Ok(())
    }
}

/// Student record with an optional one-to-one passport link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// `None` until the row is inserted.
    pub id: Option<StudentId>,
    pub first_name: String,
    pub last_name: String,
    /// Owning side of the one-to-one passport relationship.
    pub passport_id: Option<PassportId>,
}

impl Student {
    /// Creates an unsaved student without a passport.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            passport_id: None,
        }
    }

    /// Checks write-path invariants before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.first_name) {
            return Err(ValidationError::BlankFirstName);
        }
        if is_blank(&self.last_name) {
            return Err(ValidationError::BlankLastName);
        }
        Ok(())
    }

    /// Full display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
