//! Employee hierarchy stored in a single table.
//!
//! # Responsibility
//! - Define the employee record whose full-time/part-time split is a Rust
//!   sum type backed by a discriminator column.
//!
//! # Invariants
//! - `name` is non-blank.
//! - Exactly one pay field is persisted per row: salary for full-time,
//!   hourly wage for part-time. Money is integer cents.

use serde::{Deserialize, Serialize};

use crate::model::{is_blank, ValidationError};

/// Database-generated employee identifier.
pub type EmployeeId = i64;

/// Pay grade of an employee; maps to the `employee_type` discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "employee_type")]
pub enum EmployeeGrade {
    FullTime { salary_cents: i64 },
    PartTime { hourly_wage_cents: i64 },
}

/// Employee record, one row per person regardless of grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// `None` until the row is inserted.
    pub id: Option<EmployeeId>,
    pub name: String,
    #[serde(flatten)]
    pub grade: EmployeeGrade,
}

impl Employee {
    /// Creates an unsaved full-time employee with an annual salary in cents.
    pub fn full_time(name: impl Into<String>, salary_cents: i64) -> Self {
        Self {
            id: None,
            name: name.into(),
            grade: EmployeeGrade::FullTime { salary_cents },
        }
    }

    /// Creates an unsaved part-time employee with an hourly wage in cents.
    pub fn part_time(name: impl Into<String>, hourly_wage_cents: i64) -> Self {
        Self {
            id: None,
            name: name.into(),
            grade: EmployeeGrade::PartTime { hourly_wage_cents },
        }
    }

    /// Checks write-path invariants before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.name) {
            return Err(ValidationError::BlankEmployeeName);
        }
        Ok(())
    }
}
