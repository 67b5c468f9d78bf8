//! Course repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the full CRUD + finder surface over `courses`, including
//!   audit stamping, pagination, sorting, and cascade of owned reviews.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `Course::validate()` before SQL mutations.
//! - `created_at` is never touched after insert; `updated_at` is advanced
//!   strictly on every save.
//! - Reviews are only written inside the owning course's transaction.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::course::{Course, CourseId};
use crate::model::review::{Review, ReviewRating};
use crate::model::ValidationError;
use crate::repo::page::{CourseSort, CourseSortField, Page, PageRequest, SortDirection};
use crate::repo::{next_updated_at, now_epoch_ms, table_exists, table_has_column};
use rusqlite::types::Value;
use rusqlite::{
    params, params_from_iter, Connection, OptionalExtension, Row, Transaction,
    TransactionBehavior,
};
use std::error::Error;
use std::fmt::{Display, Formatter};

const COURSE_SELECT_SQL: &str = "SELECT id, name, created_at, updated_at FROM courses";

/// LIKE pattern behind every "fun courses" query variant.
const FUN_COURSES_PATTERN: &str = "%fun%";

/// Hand-written SQL variant of the fun-courses query.
const FUN_COURSES_RAW_SQL: &str = "SELECT id, name, created_at, updated_at
     FROM courses
     WHERE LOWER(name) LIKE '%fun%'
     ORDER BY id ASC;";

/// Registry name of the fun-courses named query.
const FUN_COURSES_QUERY_NAME: &str = "courses.find_fun";

/// Named queries registered at compile time, looked up by stable name.
const NAMED_QUERIES: &[(&str, &str)] = &[(
    FUN_COURSES_QUERY_NAME,
    "SELECT id, name, created_at, updated_at
     FROM courses
     WHERE name LIKE '%fun%' COLLATE NOCASE
     ORDER BY id ASC;",
)];

/// Looks up a registered named query by its stable name.
pub fn named_query(name: &str) -> Option<&'static str> {
    NAMED_QUERIES
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, sql)| *sql)
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for catalog persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound { entity: &'static str, id: i64 },
    InvalidData(String),
    UninitializedConnection { expected_version: u32, actual_version: u32 },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn { table: &'static str, column: &'static str },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; run migrations first"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for course CRUD and finder operations.
pub trait CourseRepository {
    /// Returns one course with its reviews; `None` for an unknown id.
    fn find_by_id(&self, id: CourseId) -> RepoResult<Option<Course>>;
    /// Returns all courses, optionally sorted.
    fn find_all(&self, sort: Option<CourseSort>) -> RepoResult<Vec<Course>>;
    /// Returns one page of courses in stable id order.
    fn find_page(&self, request: PageRequest) -> RepoResult<Page<Course>>;
    /// Inserts when `id` is `None`, updates otherwise; cascades reviews.
    fn save(&mut self, course: Course) -> RepoResult<Course>;
    /// Deletes one course; returns `false` when no such row existed.
    fn delete_by_id(&mut self, id: CourseId) -> RepoResult<bool>;
    /// Exact-name finder.
    fn find_by_name(&self, name: &str) -> RepoResult<Vec<Course>>;
    /// Case-insensitive LIKE finder.
    fn find_by_name_like_ignore_case(&self, pattern: &str) -> RepoResult<Vec<Course>>;
    /// Deletes by case-insensitive LIKE and returns the deleted rows.
    fn delete_by_name_like_ignore_case(&mut self, pattern: &str) -> RepoResult<Vec<Course>>;
    /// Fun courses via the derived-style finder.
    fn find_fun_courses(&self) -> RepoResult<Vec<Course>>;
    /// Fun courses via a hand-written SQL string.
    fn find_fun_courses_raw(&self) -> RepoResult<Vec<Course>>;
    /// Fun courses via the named-query registry.
    fn find_fun_courses_named(&self) -> RepoResult<Vec<Course>>;
}

/// SQLite-backed course repository.
pub struct SqliteCourseRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteCourseRepository<'conn> {
    /// Constructs a repository from a migrated, ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_catalog_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CourseRepository for SqliteCourseRepository<'_> {
    fn find_by_id(&self, id: CourseId) -> RepoResult<Option<Course>> {
        find_course_by_id(&*self.conn, id)
    }

    fn find_all(&self, sort: Option<CourseSort>) -> RepoResult<Vec<Course>> {
        let order_by = sort.map_or("id ASC", order_by_clause);
        let sql = format!("{COURSE_SELECT_SQL} ORDER BY {order_by};");
        query_courses(&*self.conn, &sql, Vec::new())
    }

    fn find_page(&self, request: PageRequest) -> RepoResult<Page<Course>> {
        let total: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM courses;", [], |row| row.get(0))?;

        let sql = format!("{COURSE_SELECT_SQL} ORDER BY id ASC LIMIT ? OFFSET ?;");
        let bind_values = vec![
            Value::Integer(i64::from(request.size())),
            Value::Integer(request.offset()),
        ];
        let items = query_courses(&*self.conn, &sql, bind_values)?;

        Ok(Page::new(items, request, total as u64))
    }

    fn save(&mut self, course: Course) -> RepoResult<Course> {
        let now_ms = now_epoch_ms();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let saved = save_course_in_tx(&tx, course, now_ms)?;
        tx.commit()?;
        Ok(saved)
    }

    fn delete_by_id(&mut self, id: CourseId) -> RepoResult<bool> {
        // Reviews and enrollment links go with the course via FK cascade.
        let changed = self.conn.execute("DELETE FROM courses WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Vec<Course>> {
        let sql = format!("{COURSE_SELECT_SQL} WHERE name = ? ORDER BY id ASC;");
        query_courses(&*self.conn, &sql, vec![Value::Text(name.to_string())])
    }

    fn find_by_name_like_ignore_case(&self, pattern: &str) -> RepoResult<Vec<Course>> {
        let sql = format!("{COURSE_SELECT_SQL} WHERE LOWER(name) LIKE LOWER(?) ORDER BY id ASC;");
        query_courses(&*self.conn, &sql, vec![Value::Text(pattern.to_string())])
    }

    fn delete_by_name_like_ignore_case(&mut self, pattern: &str) -> RepoResult<Vec<Course>> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let sql = format!("{COURSE_SELECT_SQL} WHERE LOWER(name) LIKE LOWER(?) ORDER BY id ASC;");
        let doomed = query_courses(&tx, &sql, vec![Value::Text(pattern.to_string())])?;
        tx.execute(
            "DELETE FROM courses WHERE LOWER(name) LIKE LOWER(?1);",
            [pattern],
        )?;

        tx.commit()?;
        Ok(doomed)
    }

    fn find_fun_courses(&self) -> RepoResult<Vec<Course>> {
        self.find_by_name_like_ignore_case(FUN_COURSES_PATTERN)
    }

    fn find_fun_courses_raw(&self) -> RepoResult<Vec<Course>> {
        query_courses(&*self.conn, FUN_COURSES_RAW_SQL, Vec::new())
    }

    fn find_fun_courses_named(&self) -> RepoResult<Vec<Course>> {
        let sql = named_query(FUN_COURSES_QUERY_NAME).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "named query `{FUN_COURSES_QUERY_NAME}` is not registered"
            ))
        })?;
        query_courses(&*self.conn, sql, Vec::new())
    }
}

/// Inserts or updates one course plus its reviews inside `tx`.
///
/// Shared with the student repository, which persists courses as part of
/// enrollment in its own transaction.
pub(crate) fn save_course_in_tx(
    tx: &Transaction<'_>,
    mut course: Course,
    now_ms: i64,
) -> RepoResult<Course> {
    course.validate()?;

    let course_id = match course.id {
        None => {
            tx.execute(
                "INSERT INTO courses (name, created_at, updated_at) VALUES (?1, ?2, ?2);",
                params![course.name.as_str(), now_ms],
            )?;
            let id = tx.last_insert_rowid();
            course.created_at = Some(now_ms);
            course.updated_at = Some(now_ms);
            course.id = Some(id);
            id
        }
        Some(id) => {
            let stamps: Option<(i64, i64)> = tx
                .query_row(
                    "SELECT created_at, updated_at FROM courses WHERE id = ?1;",
                    [id],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;
            let Some((created_at, previous_updated_at)) = stamps else {
                return Err(RepoError::NotFound {
                    entity: "course",
                    id,
                });
            };

            let updated_at = next_updated_at(previous_updated_at, now_ms);
            tx.execute(
                "UPDATE courses SET name = ?1, updated_at = ?2 WHERE id = ?3;",
                params![course.name.as_str(), updated_at, id],
            )?;
            course.created_at = Some(created_at);
            course.updated_at = Some(updated_at);
            id
        }
    };

    for review in &mut course.reviews {
        review.course_id = Some(course_id);
        match review.id {
            None => {
                tx.execute(
                    "INSERT INTO reviews (course_id, content, rating) VALUES (?1, ?2, ?3);",
                    params![
                        course_id,
                        review.content.as_deref(),
                        rating_to_db(review.rating)
                    ],
                )?;
                review.id = Some(tx.last_insert_rowid());
            }
            Some(review_id) => {
                let changed = tx.execute(
                    "UPDATE reviews SET content = ?1, rating = ?2
                     WHERE id = ?3 AND course_id = ?4;",
                    params![
                        review.content.as_deref(),
                        rating_to_db(review.rating),
                        review_id,
                        course_id
                    ],
                )?;
                if changed == 0 {
                    return Err(RepoError::NotFound {
                        entity: "review",
                        id: review_id,
                    });
                }
            }
        }
    }

    Ok(course)
}

pub(crate) fn find_course_by_id(conn: &Connection, id: CourseId) -> RepoResult<Option<Course>> {
    let mut stmt = conn.prepare(&format!("{COURSE_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        let mut course = parse_course_row(row)?;
        course.reviews = load_reviews_for_course(conn, id)?;
        return Ok(Some(course));
    }
    Ok(None)
}

fn query_courses(conn: &Connection, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Course>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params_from_iter(bind_values))?;
    let mut courses = Vec::new();
    while let Some(row) = rows.next()? {
        courses.push(parse_course_row(row)?);
    }

    for course in &mut courses {
        if let Some(id) = course.id {
            course.reviews = load_reviews_for_course(conn, id)?;
        }
    }

    Ok(courses)
}

fn parse_course_row(row: &Row<'_>) -> RepoResult<Course> {
    let course = Course {
        id: Some(row.get("id")?),
        name: row.get("name")?,
        created_at: Some(row.get("created_at")?),
        updated_at: Some(row.get("updated_at")?),
        reviews: Vec::new(),
    };
    course.validate()?;
    Ok(course)
}

fn load_reviews_for_course(conn: &Connection, course_id: CourseId) -> RepoResult<Vec<Review>> {
    let mut stmt = conn.prepare(
        "SELECT id, course_id, content, rating
         FROM reviews
         WHERE course_id = ?1
         ORDER BY id ASC;",
    )?;
    let mut rows = stmt.query([course_id])?;
    let mut reviews = Vec::new();
    while let Some(row) = rows.next()? {
        let rating_text: String = row.get("rating")?;
        let rating = parse_rating(&rating_text).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid rating value `{rating_text}` in reviews.rating"
            ))
        })?;
        reviews.push(Review {
            id: Some(row.get("id")?),
            course_id: Some(row.get("course_id")?),
            content: row.get("content")?,
            rating,
        });
    }
    Ok(reviews)
}

fn order_by_clause(sort: CourseSort) -> &'static str {
    match (sort.field, sort.direction) {
        (CourseSortField::Name, SortDirection::Ascending) => "name ASC, id ASC",
        (CourseSortField::Name, SortDirection::Descending) => "name DESC, id ASC",
        (CourseSortField::CreatedAt, SortDirection::Ascending) => "created_at ASC, id ASC",
        (CourseSortField::CreatedAt, SortDirection::Descending) => "created_at DESC, id ASC",
        (CourseSortField::UpdatedAt, SortDirection::Ascending) => "updated_at ASC, id ASC",
        (CourseSortField::UpdatedAt, SortDirection::Descending) => "updated_at DESC, id ASC",
    }
}

pub(crate) fn rating_to_db(rating: ReviewRating) -> &'static str {
    match rating {
        ReviewRating::One => "one",
        ReviewRating::Two => "two",
        ReviewRating::Three => "three",
        ReviewRating::Four => "four",
        ReviewRating::Five => "five",
    }
}

pub(crate) fn parse_rating(value: &str) -> Option<ReviewRating> {
    match value {
        "one" => Some(ReviewRating::One),
        "two" => Some(ReviewRating::Two),
        "three" => Some(ReviewRating::Three),
        "four" => Some(ReviewRating::Four),
        "five" => Some(ReviewRating::Five),
        _ => None,
    }
}

pub(crate) fn ensure_schema_version(conn: &Connection) -> RepoResult<()> {
    let expected = crate::db::migrations::latest_version();
    let actual: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual != expected {
        return Err(RepoError::UninitializedConnection {
            expected_version: expected,
            actual_version: actual,
        });
    }
    Ok(())
}

fn ensure_catalog_connection_ready(conn: &Connection) -> RepoResult<()> {
    ensure_schema_version(conn)?;

    for table in ["courses", "reviews"] {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    for column in ["id", "name", "created_at", "updated_at"] {
        if !table_has_column(conn, "courses", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "courses",
                column,
            });
        }
    }

    for column in ["id", "course_id", "content", "rating"] {
        if !table_has_column(conn, "reviews", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "reviews",
                column,
            });
        }
    }

    Ok(())
}
