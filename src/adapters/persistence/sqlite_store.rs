//! SQLite-backed entity store via libsql. Implements StorePort.
//!
//! One database file (university.db) in the given base directory, one
//! long-lived connection opened at startup. Every statement is parameterized;
//! the UNIQUE constraints on students.email and registrations
//! (student_id, course_id) are the authoritative duplicate guards.

use crate::domain::{
    Course, DomainError, EnrichedRegistration, NewCourse, NewStudent, Registration, Student,
};
use crate::ports::StorePort;
use chrono::{DateTime, NaiveDate, Utc};
use libsql::{Connection, Row, params};
use std::path::Path;
use tracing::info;

const STUDENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS students (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    phone TEXT NOT NULL,
    date_of_birth TEXT NOT NULL,
    registered_at INTEGER NOT NULL
)"#;

const COURSES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS courses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    code TEXT NOT NULL,
    name TEXT NOT NULL,
    credits INTEGER NOT NULL,
    department TEXT NOT NULL,
    semester TEXT NOT NULL
)"#;

const REGISTRATIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS registrations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    student_id INTEGER NOT NULL REFERENCES students (id),
    course_id INTEGER NOT NULL REFERENCES courses (id),
    enrolled_at INTEGER NOT NULL,
    grade TEXT,
    UNIQUE (student_id, course_id)
)"#;

const REGISTRATIONS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_registrations_student ON registrations (student_id)";

/// Columns of the enriched view, in SELECT order.
const ENRICHED_QUERY: &str = r#"
SELECT r.id, r.student_id, r.course_id, r.enrolled_at, r.grade,
       s.first_name, s.last_name, s.email, s.phone, s.date_of_birth, s.registered_at,
       c.code, c.name, c.credits, c.department, c.semester
FROM registrations r
INNER JOIN students s ON r.student_id = s.id
INNER JOIN courses c ON r.course_id = c.id
ORDER BY s.last_name, s.first_name, c.code
"#;

/// SQLite entity store. One database file (university.db) in the given base
/// directory; the single connection is shared via Arc.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Connect to (or create) the SQLite database and ensure the schema
    /// exists. Call this once at startup; a failure here is fatal to startup.
    ///
    /// Sets WAL mode and synchronous=NORMAL for concurrent read/write
    /// without sacrificing durability.
    pub async fn connect(base_dir: impl AsRef<Path>) -> Result<Self, DomainError> {
        let base = base_dir.as_ref();
        std::fs::create_dir_all(base).map_err(|e| DomainError::Store(e.to_string()))?;
        let db_path = base.join("university.db");
        let store = Self::open(&db_path.to_string_lossy()).await?;
        info!(path = %db_path.display(), "SQLite connected with WAL mode");
        Ok(store)
    }

    /// Ephemeral in-memory database for tests.
    pub(crate) async fn in_memory() -> Result<Self, DomainError> {
        Self::open(":memory:").await
    }

    async fn open(path: &str) -> Result<Self, DomainError> {
        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;
        let conn = db.connect().map_err(|e| DomainError::Store(e.to_string()))?;

        // PRAGMA returns a row (the new value); use query and consume rows
        // (execute fails when rows are returned).
        let mut wal_rows = conn
            .query("PRAGMA journal_mode=WAL", ())
            .await
            .map_err(|e| DomainError::Store(format!("WAL pragma failed: {}", e)))?;
        while wal_rows
            .next()
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?
            .is_some()
        {}
        let mut sync_rows = conn
            .query("PRAGMA synchronous=NORMAL", ())
            .await
            .map_err(|e| DomainError::Store(format!("synchronous pragma failed: {}", e)))?;
        while sync_rows
            .next()
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?
            .is_some()
        {}

        // Enforce the REFERENCES clauses on registrations.
        conn.execute("PRAGMA foreign_keys=ON", ())
            .await
            .map_err(|e| DomainError::Store(format!("foreign_keys pragma failed: {}", e)))?;

        conn.execute(STUDENTS_TABLE, ())
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;
        conn.execute(COURSES_TABLE, ())
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;
        conn.execute(REGISTRATIONS_TABLE, ())
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;
        conn.execute(REGISTRATIONS_INDEX, ())
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;

        Ok(Self { conn })
    }

    /// Map a row of (id, first_name, last_name, email, phone, date_of_birth,
    /// registered_at).
    fn student_from_row(row: &Row) -> Result<Student, DomainError> {
        let dob: String = row.get(5).map_err(|e| DomainError::Store(e.to_string()))?;
        let registered_at: i64 = row.get(6).map_err(|e| DomainError::Store(e.to_string()))?;
        Ok(Student {
            id: row.get(0).map_err(|e| DomainError::Store(e.to_string()))?,
            first_name: row.get(1).map_err(|e| DomainError::Store(e.to_string()))?,
            last_name: row.get(2).map_err(|e| DomainError::Store(e.to_string()))?,
            email: row.get(3).map_err(|e| DomainError::Store(e.to_string()))?,
            phone: row.get(4).map_err(|e| DomainError::Store(e.to_string()))?,
            date_of_birth: parse_stored_date(&dob)?,
            registered_at: timestamp_to_datetime(registered_at)?,
        })
    }

    /// Map a row of (id, code, name, credits, department, semester).
    fn course_from_row(row: &Row) -> Result<Course, DomainError> {
        let credits: i64 = row.get(3).map_err(|e| DomainError::Store(e.to_string()))?;
        Ok(Course {
            id: row.get(0).map_err(|e| DomainError::Store(e.to_string()))?,
            code: row.get(1).map_err(|e| DomainError::Store(e.to_string()))?,
            name: row.get(2).map_err(|e| DomainError::Store(e.to_string()))?,
            credits: credits as u32,
            department: row.get(4).map_err(|e| DomainError::Store(e.to_string()))?,
            semester: row.get(5).map_err(|e| DomainError::Store(e.to_string()))?,
        })
    }

    async fn count(&self, sql: &str, params: impl libsql::params::IntoParams) -> Result<i64, DomainError> {
        let mut rows = self
            .conn
            .query(sql, params)
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;
        match rows
            .next()
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?
        {
            Some(row) => row.get(0).map_err(|e| DomainError::Store(e.to_string())),
            None => Ok(0),
        }
    }
}

fn parse_stored_date(value: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| DomainError::Store(format!("invalid stored date {value}: {e}")))
}

fn timestamp_to_datetime(secs: i64) -> Result<DateTime<Utc>, DomainError> {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .ok_or_else(|| DomainError::Store(format!("invalid stored timestamp {secs}")))
}

#[async_trait::async_trait]
impl StorePort for SqliteStore {
    async fn create_student(&self, student: &NewStudent) -> Result<i64, DomainError> {
        let now = Utc::now().timestamp();
        self.conn
            .execute(
                r#"
                INSERT INTO students (first_name, last_name, email, phone, date_of_birth, registered_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    student.first_name.as_str(),
                    student.last_name.as_str(),
                    student.email.as_str(),
                    student.phone.as_str(),
                    student.date_of_birth.format("%Y-%m-%d").to_string(),
                    now
                ],
            )
            .await
            .map_err(|e| {
                let msg = e.to_string();
                if msg.contains("UNIQUE constraint failed: students.email") {
                    DomainError::DuplicateEmail(student.email.clone())
                } else {
                    DomainError::Store(msg)
                }
            })?;
        let id = self.conn.last_insert_rowid();
        info!(id, email = %student.email, "student created");
        Ok(id)
    }

    async fn create_course(&self, course: &NewCourse) -> Result<i64, DomainError> {
        self.conn
            .execute(
                r#"
                INSERT INTO courses (code, name, credits, department, semester)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    course.code.as_str(),
                    course.name.as_str(),
                    course.credits as i64,
                    course.department.as_str(),
                    course.semester.as_str()
                ],
            )
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;
        let id = self.conn.last_insert_rowid();
        info!(id, code = %course.code, "course created");
        Ok(id)
    }

    async fn create_registration(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<i64, DomainError> {
        let now = Utc::now().timestamp();
        let result = self
            .conn
            .execute(
                "INSERT INTO registrations (student_id, course_id, enrolled_at) VALUES (?1, ?2, ?3)",
                params![student_id, course_id, now],
            )
            .await;
        if let Err(e) = result {
            let msg = e.to_string();
            if msg.contains("UNIQUE constraint failed") {
                return Err(DomainError::AlreadyRegistered {
                    student_id,
                    course_id,
                });
            }
            if msg.contains("FOREIGN KEY constraint failed") {
                if self.get_student(student_id).await?.is_none() {
                    return Err(DomainError::StudentNotFound(student_id));
                }
                return Err(DomainError::CourseNotFound(course_id));
            }
            return Err(DomainError::Store(msg));
        }
        let id = self.conn.last_insert_rowid();
        info!(id, student_id, course_id, "registration created");
        Ok(id)
    }

    async fn get_student(&self, id: i64) -> Result<Option<Student>, DomainError> {
        let mut rows = self
            .conn
            .query(
                r#"
                SELECT id, first_name, last_name, email, phone, date_of_birth, registered_at
                FROM students WHERE id = ?1
                "#,
                params![id],
            )
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;
        match rows
            .next()
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?
        {
            Some(row) => Ok(Some(Self::student_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn list_students(&self) -> Result<Vec<Student>, DomainError> {
        let mut rows = self
            .conn
            .query(
                r#"
                SELECT id, first_name, last_name, email, phone, date_of_birth, registered_at
                FROM students ORDER BY last_name, first_name
                "#,
                (),
            )
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;
        let mut students = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?
        {
            students.push(Self::student_from_row(&row)?);
        }
        Ok(students)
    }

    async fn get_course(&self, id: i64) -> Result<Option<Course>, DomainError> {
        let mut rows = self
            .conn
            .query(
                r#"
                SELECT id, code, name, credits, department, semester
                FROM courses WHERE id = ?1
                "#,
                params![id],
            )
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;
        match rows
            .next()
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?
        {
            Some(row) => Ok(Some(Self::course_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn list_courses(&self) -> Result<Vec<Course>, DomainError> {
        let mut rows = self
            .conn
            .query(
                r#"
                SELECT id, code, name, credits, department, semester
                FROM courses ORDER BY code
                "#,
                (),
            )
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;
        let mut courses = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?
        {
            courses.push(Self::course_from_row(&row)?);
        }
        Ok(courses)
    }

    async fn list_enriched(&self) -> Result<Vec<EnrichedRegistration>, DomainError> {
        let mut rows = self
            .conn
            .query(ENRICHED_QUERY, ())
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;
        let mut enriched = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?
        {
            let student_id: i64 = row.get(1).map_err(|e| DomainError::Store(e.to_string()))?;
            let course_id: i64 = row.get(2).map_err(|e| DomainError::Store(e.to_string()))?;
            let enrolled_at: i64 = row.get(3).map_err(|e| DomainError::Store(e.to_string()))?;
            let grade: Option<String> = row.get(4).ok();
            let registration = Registration {
                id: row.get(0).map_err(|e| DomainError::Store(e.to_string()))?,
                student_id,
                course_id,
                enrolled_at: timestamp_to_datetime(enrolled_at)?,
                grade,
            };

            let dob: String = row.get(9).map_err(|e| DomainError::Store(e.to_string()))?;
            let registered_at: i64 =
                row.get(10).map_err(|e| DomainError::Store(e.to_string()))?;
            let student = Student {
                id: student_id,
                first_name: row.get(5).map_err(|e| DomainError::Store(e.to_string()))?,
                last_name: row.get(6).map_err(|e| DomainError::Store(e.to_string()))?,
                email: row.get(7).map_err(|e| DomainError::Store(e.to_string()))?,
                phone: row.get(8).map_err(|e| DomainError::Store(e.to_string()))?,
                date_of_birth: parse_stored_date(&dob)?,
                registered_at: timestamp_to_datetime(registered_at)?,
            };

            let credits: i64 = row.get(13).map_err(|e| DomainError::Store(e.to_string()))?;
            let course = Course {
                id: course_id,
                code: row.get(11).map_err(|e| DomainError::Store(e.to_string()))?,
                name: row.get(12).map_err(|e| DomainError::Store(e.to_string()))?,
                credits: credits as u32,
                department: row.get(14).map_err(|e| DomainError::Store(e.to_string()))?,
                semester: row.get(15).map_err(|e| DomainError::Store(e.to_string()))?,
            };

            enriched.push(EnrichedRegistration {
                registration,
                student,
                course,
            });
        }
        Ok(enriched)
    }

    async fn courses_for_student(&self, student_id: i64) -> Result<Vec<Course>, DomainError> {
        let mut rows = self
            .conn
            .query(
                r#"
                SELECT c.id, c.code, c.name, c.credits, c.department, c.semester
                FROM registrations r
                INNER JOIN courses c ON r.course_id = c.id
                WHERE r.student_id = ?1
                ORDER BY c.code
                "#,
                params![student_id],
            )
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?;
        let mut courses = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DomainError::Store(e.to_string()))?
        {
            courses.push(Self::course_from_row(&row)?);
        }
        Ok(courses)
    }

    async fn registration_exists(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<bool, DomainError> {
        let count = self
            .count(
                "SELECT COUNT(*) FROM registrations WHERE student_id = ?1 AND course_id = ?2",
                params![student_id, course_id],
            )
            .await?;
        Ok(count > 0)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        let count = self
            .count(
                "SELECT COUNT(*) FROM students WHERE email = ?1",
                params![email],
            )
            .await?;
        Ok(count > 0)
    }
}
