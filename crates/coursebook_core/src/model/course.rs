//! Course aggregate root.
//!
//! # Responsibility
//! - Define the course record with audit timestamps and owned reviews.
//!
//! # Invariants
//! - `name` is non-blank.
//! - `created_at` is written once on insert and never changes afterwards.
//! - `updated_at` strictly advances on every persisted mutation.
//! - Reviews held in `reviews` are persisted together with the course
//!   (cascade on save), never on their own.

use crate::model::review::Review;
use crate::model::{is_blank, ValidationError};
use serde::{Deserialize, Serialize};

/// Database-generated course identifier.
pub type CourseId = i64;

/// Course record with audit timestamps and cascaded reviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// `None` until the row is inserted.
    pub id: Option<CourseId>,
    pub name: String,
    /// Epoch milliseconds, set by the repository on insert.
    pub created_at: Option<i64>,
    /// Epoch milliseconds, advanced by the repository on every save.
    pub updated_at: Option<i64>,
    /// Owned reviews, saved through the course (cascade).
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl Course {
    /// Creates an unsaved course with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            created_at: None,
            updated_at: None,
            reviews: Vec::new(),
        }
    }

    /// Attaches a review for cascade persistence on the next save.
    pub fn add_review(&mut self, review: Review) {
        self.reviews.push(review);
    }

    /// Checks write-path invariants before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.name) {
            return Err(ValidationError::BlankCourseName);
        }
        Ok(())
    }
}
