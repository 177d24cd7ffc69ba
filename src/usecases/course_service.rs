//! Course administration: validated creation and catalog queries.

use crate::domain::{Course, DomainError, NewCourse, validate};
use crate::ports::StorePort;
use std::sync::Arc;
use tracing::info;

pub struct CourseService {
    store: Arc<dyn StorePort>,
}

impl CourseService {
    pub fn new(store: Arc<dyn StorePort>) -> Self {
        Self { store }
    }

    /// Validate all fields then insert. Courses are immutable once created.
    pub async fn add_course(&self, new: NewCourse) -> Result<Course, DomainError> {
        validate::new_course(&new)?;
        let id = self.store.create_course(&new).await?;
        let course = self
            .store
            .get_course(id)
            .await?
            .ok_or_else(|| DomainError::Store(format!("course {id} missing after insert")))?;
        info!(id, code = %course.code, "course added");
        Ok(course)
    }

    /// Catalog ordered by course code.
    pub async fn list_courses(&self) -> Result<Vec<Course>, DomainError> {
        self.store.list_courses().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::persistence::SqliteStore;

    fn cs101() -> NewCourse {
        NewCourse {
            code: "CS101".to_string(),
            name: "Intro to Programming".to_string(),
            credits: 3,
            department: "CS".to_string(),
            semester: "Fall2024".to_string(),
        }
    }

    async fn service() -> CourseService {
        let store = SqliteStore::in_memory().await.unwrap();
        CourseService::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_add_course() {
        let service = service().await;
        let course = service.add_course(cs101()).await.unwrap();
        assert!(course.id > 0);
        assert_eq!(course.credits, 3);
        assert_eq!(service.list_courses().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_zero_credit_course_rejected() {
        let service = service().await;
        let mut bad = cs101();
        bad.credits = 0;
        assert!(matches!(
            service.add_course(bad).await.unwrap_err(),
            DomainError::Validation(_)
        ));
        assert!(service.list_courses().await.unwrap().is_empty());
    }
}
