//! Domain entities. Pure data structures for the core business.
//!
//! No SQL/IO types here — these are mapped from adapters.

use chrono::{DateTime, NaiveDate, Utc};

/// A registered student. Store-assigned `id` and `registered_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: NaiveDate,
    pub registered_at: DateTime<Utc>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Student fields collected from the operator, before the store assigns an id.
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: NaiveDate,
}

/// A course offering. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub credits: u32,
    pub department: String,
    pub semester: String,
}

/// Course fields collected from the operator.
#[derive(Debug, Clone)]
pub struct NewCourse {
    pub code: String,
    pub name: String,
    pub credits: u32,
    pub department: String,
    pub semester: String,
}

/// A student's enrollment in a course. The (student_id, course_id) pair is
/// unique; `grade` is carried by the schema but never written in scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub enrolled_at: DateTime<Utc>,
    pub grade: Option<String>,
}

/// One row of the enriched view: a registration joined with its student and
/// course. All reporting consumes a snapshot of these.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRegistration {
    pub registration: Registration,
    pub student: Student,
    pub course: Course,
}
