//! Employee repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist the employee hierarchy in its single table, mapping the
//!   `employee_type` discriminator to the Rust sum type.
//!
//! # Invariants
//! - Exactly one pay column is written per row, matching the grade.
//! - Write paths call `Employee::validate()` before SQL mutations.
//! - Read paths reject rows whose discriminator and pay columns disagree.

use crate::model::employee::{Employee, EmployeeGrade, EmployeeId};
use crate::repo::course_repo::{ensure_schema_version, RepoError, RepoResult};
use crate::repo::{table_exists, table_has_column};
use rusqlite::{params, Connection, Row};

const EMPLOYEE_SELECT_SQL: &str =
    "SELECT id, name, employee_type, salary_cents, hourly_wage_cents FROM employees";

const FULL_TIME_DISCRIMINATOR: &str = "full_time";
const PART_TIME_DISCRIMINATOR: &str = "part_time";

/// Repository interface for the employee hierarchy.
pub trait EmployeeRepository {
    /// Returns one employee; `None` for an unknown id.
    fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>>;
    /// Inserts when `id` is `None`, updates otherwise.
    fn save(&mut self, employee: Employee) -> RepoResult<Employee>;
    /// All employees regardless of grade, in stable id order.
    fn list_all(&self) -> RepoResult<Vec<Employee>>;
    /// Full-time employees only.
    fn list_full_time(&self) -> RepoResult<Vec<Employee>>;
    /// Part-time employees only.
    fn list_part_time(&self) -> RepoResult<Vec<Employee>>;
    /// Deletes one employee; returns `false` when no such row existed.
    fn delete_by_id(&mut self, id: EmployeeId) -> RepoResult<bool>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Constructs a repository from a migrated, ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_employee_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EMPLOYEE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_employee_row(row)?));
        }
        Ok(None)
    }

    fn save(&mut self, mut employee: Employee) -> RepoResult<Employee> {
        employee.validate()?;

        let (discriminator, salary_cents, hourly_wage_cents) = grade_columns(employee.grade);

        match employee.id {
            None => {
                self.conn.execute(
                    "INSERT INTO employees (name, employee_type, salary_cents, hourly_wage_cents)
                     VALUES (?1, ?2, ?3, ?4);",
                    params![
                        employee.name.as_str(),
                        discriminator,
                        salary_cents,
                        hourly_wage_cents
                    ],
                )?;
                employee.id = Some(self.conn.last_insert_rowid());
            }
            Some(id) => {
                let changed = self.conn.execute(
                    "UPDATE employees
                     SET name = ?1, employee_type = ?2, salary_cents = ?3, hourly_wage_cents = ?4
                     WHERE id = ?5;",
                    params![
                        employee.name.as_str(),
                        discriminator,
                        salary_cents,
                        hourly_wage_cents,
                        id
                    ],
                )?;
                if changed == 0 {
                    return Err(RepoError::NotFound {
                        entity: "employee",
                        id,
                    });
                }
            }
        }

        Ok(employee)
    }

    fn list_all(&self) -> RepoResult<Vec<Employee>> {
        self.query_employees(&format!("{EMPLOYEE_SELECT_SQL} ORDER BY id ASC;"), None)
    }

    fn list_full_time(&self) -> RepoResult<Vec<Employee>> {
        self.query_employees(
            &format!("{EMPLOYEE_SELECT_SQL} WHERE employee_type = ?1 ORDER BY id ASC;"),
            Some(FULL_TIME_DISCRIMINATOR),
        )
    }

    fn list_part_time(&self) -> RepoResult<Vec<Employee>> {
        self.query_employees(
            &format!("{EMPLOYEE_SELECT_SQL} WHERE employee_type = ?1 ORDER BY id ASC;"),
            Some(PART_TIME_DISCRIMINATOR),
        )
    }

    fn delete_by_id(&mut self, id: EmployeeId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM employees WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }
}

impl SqliteEmployeeRepository<'_> {
    fn query_employees(
        &self,
        sql: &str,
        discriminator: Option<&str>,
    ) -> RepoResult<Vec<Employee>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = match discriminator {
            Some(value) => stmt.query([value])?,
            None => stmt.query([])?,
        };
        let mut employees = Vec::new();
        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }
        Ok(employees)
    }
}

fn grade_columns(grade: EmployeeGrade) -> (&'static str, Option<i64>, Option<i64>) {
    match grade {
        EmployeeGrade::FullTime { salary_cents } => {
            (FULL_TIME_DISCRIMINATOR, Some(salary_cents), None)
        }
        EmployeeGrade::PartTime { hourly_wage_cents } => {
            (PART_TIME_DISCRIMINATOR, None, Some(hourly_wage_cents))
        }
    }
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let discriminator: String = row.get("employee_type")?;
    let salary_cents: Option<i64> = row.get("salary_cents")?;
    let hourly_wage_cents: Option<i64> = row.get("hourly_wage_cents")?;

    let grade = match (discriminator.as_str(), salary_cents, hourly_wage_cents) {
        (d, Some(salary_cents), None) if d == FULL_TIME_DISCRIMINATOR => {
            EmployeeGrade::FullTime { salary_cents }
        }
        (d, None, Some(hourly_wage_cents)) if d == PART_TIME_DISCRIMINATOR => {
            EmployeeGrade::PartTime { hourly_wage_cents }
        }
        _ => {
            return Err(RepoError::InvalidData(format!(
                "inconsistent employee row: type `{discriminator}`, salary {salary_cents:?}, wage {hourly_wage_cents:?}"
            )));
        }
    };

    let employee = Employee {
        id: Some(row.get("id")?),
        name: row.get("name")?,
        grade,
    };
    employee.validate()?;
    Ok(employee)
}

fn ensure_employee_connection_ready(conn: &Connection) -> RepoResult<()> {
    ensure_schema_version(conn)?;

    if !table_exists(conn, "employees")? {
        return Err(RepoError::MissingRequiredTable("employees"));
    }

    for column in [
        "id",
        "name",
        "employee_type",
        "salary_cents",
        "hourly_wage_cents",
    ] {
        if !table_has_column(conn, "employees", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "employees",
                column,
            });
        }
    }

    Ok(())
}
