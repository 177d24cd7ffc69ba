//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{
    Course, DomainError, EnrichedRegistration, NewCourse, NewStudent, Student,
};

/// Entity store port. Persists students, courses and registrations and
/// enforces the uniqueness constraints (student email, student+course pair).
#[async_trait::async_trait]
pub trait StorePort: Send + Sync {
    /// Insert a student and return the assigned id.
    /// Fails with `DuplicateEmail` on the email uniqueness constraint.
    async fn create_student(&self, student: &NewStudent) -> Result<i64, DomainError>;

    /// Insert a course and return the assigned id.
    async fn create_course(&self, course: &NewCourse) -> Result<i64, DomainError>;

    /// Insert a registration and return the assigned id.
    /// Fails with `AlreadyRegistered` on the (student, course) uniqueness
    /// constraint; this is the authoritative backstop behind the engine's
    /// advisory pre-check.
    async fn create_registration(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<i64, DomainError>;

    async fn get_student(&self, id: i64) -> Result<Option<Student>, DomainError>;

    /// All students ordered by (last name, first name).
    async fn list_students(&self) -> Result<Vec<Student>, DomainError>;

    async fn get_course(&self, id: i64) -> Result<Option<Course>, DomainError>;

    /// All courses ordered by code.
    async fn list_courses(&self) -> Result<Vec<Course>, DomainError>;

    /// The enriched view: registrations joined with student and course,
    /// ordered by (student last name, first name, course code).
    async fn list_enriched(&self) -> Result<Vec<EnrichedRegistration>, DomainError>;

    /// Courses a student is registered for, ordered by code.
    async fn courses_for_student(&self, student_id: i64) -> Result<Vec<Course>, DomainError>;

    async fn registration_exists(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<bool, DomainError>;

    async fn email_exists(&self, email: &str) -> Result<bool, DomainError>;
}
