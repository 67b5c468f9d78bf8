//! Demo fixture rows for tests and local exploration.
//!
//! # Responsibility
//! - Seed a fully migrated connection with the canonical demo data set:
//!   four courses, two reviews, two students with passports, one
//!   enrollment link.
//!
//! # Invariants
//! - Applied in a single transaction; a partially seeded database is never
//!   observable.
//! - Exactly one course name contains "fun", one contains "delete", and
//!   exactly one passport number contains "1234". Finder tests depend on
//!   these cardinalities.

use log::info;
use rusqlite::Connection;

use super::DbResult;

const FIXTURE_SQL: &str = include_str!("fixture.sql");

/// Well-known fixture ids shared with the test suite.
pub const FIRST_COURSE_ID: i64 = 10001;
pub const SECOND_COURSE_ID: i64 = 10002;
pub const FUN_COURSE_ID: i64 = 10003;
pub const DOOMED_COURSE_ID: i64 = 9999;

/// Seeds the demo data set on a migrated connection.
///
/// Expects an empty database; seeding twice violates primary keys.
pub fn apply_fixture(conn: &mut Connection) -> DbResult<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(FIXTURE_SQL)?;
    tx.commit()?;
    info!("event=fixture_applied module=db status=ok");
    Ok(())
}
