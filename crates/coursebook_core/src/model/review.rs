//! Course review record.
//!
//! # Responsibility
//! - Define the review child record and its rating scale.
//!
//! # Invariants
//! - `rating` is always present; the type makes a missing rating
//!   unrepresentable.
//! - A persisted review always references an existing course row.

use serde::{Deserialize, Serialize};

use crate::model::course::CourseId;

/// Database-generated review identifier.
pub type ReviewId = i64;

/// Five-point rating scale for course reviews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewRating {
    One,
    Two,
    Three,
    Four,
    Five,
}

/// Review child record, owned by a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// `None` until the row is inserted.
    pub id: Option<ReviewId>,
    /// Set by the repository when the owning course cascades the save.
    pub course_id: Option<CourseId>,
    /// Free-form review text, optional.
    pub content: Option<String>,
    pub rating: ReviewRating,
}

impl Review {
    /// Creates an unsaved review; the owning course assigns `course_id`
    /// during cascade save.
    pub fn new(content: Option<String>, rating: ReviewRating) -> Self {
        Self {
            id: None,
            course_id: None,
            content,
            rating,
        }
    }
}
