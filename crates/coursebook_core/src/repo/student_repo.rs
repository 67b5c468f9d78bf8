//! Student/passport repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist students, their one-to-one passports, and the many-to-many
//!   enrollment links to courses.
//!
//! # Invariants
//! - A passport row is persisted before the student row that references it.
//! - Enrollment writes both the student and the course, then the link row,
//!   in one transaction.
//! - Write paths call model `validate()` before SQL mutations.

use crate::model::course::Course;
use crate::model::student::{Passport, PassportId, Student, StudentId};
use crate::repo::course_repo::{
    ensure_schema_version, save_course_in_tx, RepoError, RepoResult,
};
use crate::repo::{now_epoch_ms, table_exists, table_has_column};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const STUDENT_SELECT_SQL: &str =
    "SELECT id, first_name, last_name, passport_id FROM students";

/// Repository interface for student, passport and enrollment operations.
pub trait StudentRepository {
    /// Returns one student; `None` for an unknown id.
    fn find_by_id(&self, id: StudentId) -> RepoResult<Option<Student>>;
    /// Inserts when `id` is `None`, updates otherwise.
    fn save(&mut self, student: Student) -> RepoResult<Student>;
    /// Persists the passport first, then the student referencing it.
    fn save_with_passport(&mut self, student: Student, passport: Passport)
        -> RepoResult<Student>;
    /// Persists both sides and links them in the enrollment table.
    fn save_enrollment(
        &mut self,
        student: Student,
        course: Course,
    ) -> RepoResult<(Student, Course)>;
    /// Deletes one student; returns `false` when no such row existed.
    fn delete_by_id(&mut self, id: StudentId) -> RepoResult<bool>;
    /// Returns the passport linked to a student, if any.
    fn find_passport(&self, student_id: StudentId) -> RepoResult<Option<Passport>>;
    /// Course ids the student is enrolled in, in stable order.
    fn course_ids_for_student(&self, student_id: StudentId) -> RepoResult<Vec<i64>>;
    /// Students whose passport number matches a LIKE pattern.
    fn find_by_passport_number_like(&self, pattern: &str) -> RepoResult<Vec<Student>>;
}

/// SQLite-backed student repository.
pub struct SqliteStudentRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteStudentRepository<'conn> {
    /// Constructs a repository from a migrated, ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_enrollment_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl StudentRepository for SqliteStudentRepository<'_> {
    fn find_by_id(&self, id: StudentId) -> RepoResult<Option<Student>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STUDENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_student_row(row)?));
        }
        Ok(None)
    }

    fn save(&mut self, student: Student) -> RepoResult<Student> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let saved = save_student_in_tx(&tx, student)?;
        tx.commit()?;
        Ok(saved)
    }

    fn save_with_passport(
        &mut self,
        mut student: Student,
        passport: Passport,
    ) -> RepoResult<Student> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        // The passport row must exist before the student references it.
        let passport = save_passport_in_tx(&tx, passport)?;
        student.passport_id = passport.id;
        let saved = save_student_in_tx(&tx, student)?;

        tx.commit()?;
        Ok(saved)
    }

    fn save_enrollment(
        &mut self,
        student: Student,
        course: Course,
    ) -> RepoResult<(Student, Course)> {
        let now_ms = now_epoch_ms();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let student = save_student_in_tx(&tx, student)?;
        let course = save_course_in_tx(&tx, course, now_ms)?;

        if let (Some(student_id), Some(course_id)) = (student.id, course.id) {
            // Re-enrolling an already linked pair is a no-op.
            tx.execute(
                "INSERT OR IGNORE INTO course_students (course_id, student_id)
                 VALUES (?1, ?2);",
                params![course_id, student_id],
            )?;
        }

        tx.commit()?;
        Ok((student, course))
    }

    fn delete_by_id(&mut self, id: StudentId) -> RepoResult<bool> {
        // Enrollment links go with the student via FK cascade.
        let changed = self
            .conn
            .execute("DELETE FROM students WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn find_passport(&self, student_id: StudentId) -> RepoResult<Option<Passport>> {
        let passport = self
            .conn
            .query_row(
                "SELECT p.id, p.passport_number
                 FROM passports p
                 INNER JOIN students s ON s.passport_id = p.id
                 WHERE s.id = ?1;",
                [student_id],
                |row| {
                    Ok(Passport {
                        id: Some(row.get(0)?),
                        passport_number: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(passport)
    }

    fn course_ids_for_student(&self, student_id: StudentId) -> RepoResult<Vec<i64>> {
        let mut stmt = self.conn.prepare(
            "SELECT course_id
             FROM course_students
             WHERE student_id = ?1
             ORDER BY course_id ASC;",
        )?;
        let mut rows = stmt.query([student_id])?;
        let mut course_ids = Vec::new();
        while let Some(row) = rows.next()? {
            course_ids.push(row.get(0)?);
        }
        Ok(course_ids)
    }

    fn find_by_passport_number_like(&self, pattern: &str) -> RepoResult<Vec<Student>> {
        let mut stmt = self.conn.prepare(&format!(
            "{STUDENT_SELECT_SQL}
             WHERE passport_id IN (
                SELECT id FROM passports WHERE passport_number LIKE ?1
             )
             ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query([pattern])?;
        let mut students = Vec::new();
        while let Some(row) = rows.next()? {
            students.push(parse_student_row(row)?);
        }
        Ok(students)
    }
}

fn save_student_in_tx(tx: &Transaction<'_>, mut student: Student) -> RepoResult<Student> {
    student.validate()?;

    match student.id {
        None => {
            tx.execute(
                "INSERT INTO students (first_name, last_name, passport_id)
                 VALUES (?1, ?2, ?3);",
                params![
                    student.first_name.as_str(),
                    student.last_name.as_str(),
                    student.passport_id
                ],
            )?;
            student.id = Some(tx.last_insert_rowid());
        }
        Some(id) => {
            let changed = tx.execute(
                "UPDATE students SET first_name = ?1, last_name = ?2, passport_id = ?3
                 WHERE id = ?4;",
                params![
                    student.first_name.as_str(),
                    student.last_name.as_str(),
                    student.passport_id,
                    id
                ],
            )?;
            if changed == 0 {
                return Err(RepoError::NotFound {
                    entity: "student",
                    id,
                });
            }
        }
    }

    Ok(student)
}

fn save_passport_in_tx(tx: &Transaction<'_>, mut passport: Passport) -> RepoResult<Passport> {
    passport.validate()?;

    match passport.id {
        None => {
            tx.execute(
                "INSERT INTO passports (passport_number) VALUES (?1);",
                [passport.passport_number.as_str()],
            )?;
            passport.id = Some(tx.last_insert_rowid());
        }
        Some(id) => {
            let changed = tx.execute(
                "UPDATE passports SET passport_number = ?1 WHERE id = ?2;",
                params![passport.passport_number.as_str(), id],
            )?;
            if changed == 0 {
                return Err(RepoError::NotFound {
                    entity: "passport",
                    id,
                });
            }
        }
    }

    Ok(passport)
}

fn parse_student_row(row: &Row<'_>) -> RepoResult<Student> {
    let student = Student {
        id: Some(row.get("id")?),
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        passport_id: row.get::<_, Option<PassportId>>("passport_id")?,
    };
    student.validate()?;
    Ok(student)
}

fn ensure_enrollment_connection_ready(conn: &Connection) -> RepoResult<()> {
    ensure_schema_version(conn)?;

    for table in ["students", "passports", "course_students", "courses"] {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    for column in ["id", "first_name", "last_name", "passport_id"] {
        if !table_has_column(conn, "students", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "students",
                column,
            });
        }
    }

    for column in ["id", "passport_number"] {
        if !table_has_column(conn, "passports", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "passports",
                column,
            });
        }
    }

    for column in ["course_id", "student_id"] {
        if !table_has_column(conn, "course_students", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "course_students",
                column,
            });
        }
    }

    Ok(())
}
