//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for the catalog.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes must run model `validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.
//! - Every repository verifies schema readiness in `try_new` before use.

use rusqlite::Connection;
use std::time::{SystemTime, UNIX_EPOCH};

pub mod course_repo;
pub mod employee_repo;
pub mod page;
pub mod student_repo;

use course_repo::RepoResult;

/// Current wall clock in epoch milliseconds.
pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}

/// Audit stamp for an update: the wall clock, but always strictly past the
/// previous stamp even when the clock has not visibly advanced.
pub(crate) fn next_updated_at(previous: i64, now_ms: i64) -> i64 {
    now_ms.max(previous + 1)
}

pub(crate) fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

pub(crate) fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
