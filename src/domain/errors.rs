//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("student {0} not found")]
    StudentNotFound(i64),

    #[error("course {0} not found")]
    CourseNotFound(i64),

    #[error("a student with email {0} already exists")]
    DuplicateEmail(String),

    #[error("student {student_id} is already registered for course {course_id}")]
    AlreadyRegistered { student_id: i64, course_id: i64 },

    #[error("store error: {0}")]
    Store(String),

    #[error("input error: {0}")]
    Input(String),
}
