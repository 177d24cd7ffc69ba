//! Enrollment rules: existence checks, duplicate rejection, insert.
//!
//! The duplicate pre-check here is advisory; the store's UNIQUE
//! (student_id, course_id) constraint backstops concurrent writers.

use crate::domain::{Course, DomainError};
use crate::ports::StorePort;
use std::sync::Arc;
use tracing::{info, warn};

pub struct EnrollmentService {
    store: Arc<dyn StorePort>,
}

impl EnrollmentService {
    pub fn new(store: Arc<dyn StorePort>) -> Self {
        Self { store }
    }

    /// Register a student for a course. Returns the new registration id.
    ///
    /// Fails with `StudentNotFound`/`CourseNotFound` for unknown ids and
    /// `AlreadyRegistered` for a duplicate pair; no row is written in any
    /// failure case.
    pub async fn register(&self, student_id: i64, course_id: i64) -> Result<i64, DomainError> {
        if self.store.get_student(student_id).await?.is_none() {
            return Err(DomainError::StudentNotFound(student_id));
        }
        if self.store.get_course(course_id).await?.is_none() {
            return Err(DomainError::CourseNotFound(course_id));
        }
        if self.store.registration_exists(student_id, course_id).await? {
            warn!(student_id, course_id, "duplicate registration rejected");
            return Err(DomainError::AlreadyRegistered {
                student_id,
                course_id,
            });
        }
        let id = self.store.create_registration(student_id, course_id).await?;
        info!(id, student_id, course_id, "student registered for course");
        Ok(id)
    }

    pub async fn is_registered(&self, student_id: i64, course_id: i64) -> Result<bool, DomainError> {
        self.store.registration_exists(student_id, course_id).await
    }

    /// A student's current courses, ordered by code.
    pub async fn courses_for_student(&self, student_id: i64) -> Result<Vec<Course>, DomainError> {
        if self.store.get_student(student_id).await?.is_none() {
            return Err(DomainError::StudentNotFound(student_id));
        }
        self.store.courses_for_student(student_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::persistence::SqliteStore;
    use crate::domain::{NewCourse, NewStudent};
    use chrono::NaiveDate;

    struct Fixture {
        store: Arc<SqliteStore>,
        service: EnrollmentService,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(SqliteStore::in_memory().await.unwrap());
        let service = EnrollmentService::new(store.clone());
        Fixture { store, service }
    }

    async fn seed_student(store: &SqliteStore, email: &str) -> i64 {
        store
            .create_student(&NewStudent {
                first_name: "Alice".to_string(),
                last_name: "Smith".to_string(),
                email: email.to_string(),
                phone: "0712345678".to_string(),
                date_of_birth: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            })
            .await
            .unwrap()
    }

    async fn seed_course(store: &SqliteStore, code: &str) -> i64 {
        store
            .create_course(&NewCourse {
                code: code.to_string(),
                name: format!("{code} name"),
                credits: 3,
                department: "CS".to_string(),
                semester: "Fall2024".to_string(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_register_then_exists() {
        let f = fixture().await;
        let sid = seed_student(&f.store, "alice@x.com").await;
        let cid = seed_course(&f.store, "CS101").await;

        let reg_id = f.service.register(sid, cid).await.unwrap();
        assert!(reg_id > 0);
        assert!(f.service.is_registered(sid, cid).await.unwrap());
    }

    #[tokio::test]
    async fn test_double_register_rejected() {
        let f = fixture().await;
        let sid = seed_student(&f.store, "alice@x.com").await;
        let cid = seed_course(&f.store, "CS101").await;

        f.service.register(sid, cid).await.unwrap();
        let err = f.service.register(sid, cid).await.unwrap_err();
        assert!(matches!(err, DomainError::AlreadyRegistered { .. }));
        assert_eq!(f.store.list_enriched().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_ids_rejected_without_writes() {
        let f = fixture().await;
        let sid = seed_student(&f.store, "alice@x.com").await;
        let cid = seed_course(&f.store, "CS101").await;

        assert!(matches!(
            f.service.register(sid + 99, cid).await.unwrap_err(),
            DomainError::StudentNotFound(_)
        ));
        assert!(matches!(
            f.service.register(sid, cid + 99).await.unwrap_err(),
            DomainError::CourseNotFound(_)
        ));
        assert!(f.store.list_enriched().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_courses_for_student() {
        let f = fixture().await;
        let sid = seed_student(&f.store, "alice@x.com").await;
        let math = seed_course(&f.store, "MATH201").await;
        let cs = seed_course(&f.store, "CS101").await;
        f.service.register(sid, math).await.unwrap();
        f.service.register(sid, cs).await.unwrap();

        let codes: Vec<String> = f
            .service
            .courses_for_student(sid)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.code)
            .collect();
        assert_eq!(codes, vec!["CS101", "MATH201"]);

        assert!(matches!(
            f.service.courses_for_student(sid + 99).await.unwrap_err(),
            DomainError::StudentNotFound(_)
        ));
    }
}
