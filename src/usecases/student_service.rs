//! Student administration: validated creation and roster queries.
//!
//! The email pre-check is advisory; the store's UNIQUE constraint is the
//! authoritative guard.

use crate::domain::{DomainError, NewStudent, Student, validate};
use crate::ports::StorePort;
use std::sync::Arc;
use tracing::info;

pub struct StudentService {
    store: Arc<dyn StorePort>,
}

impl StudentService {
    pub fn new(store: Arc<dyn StorePort>) -> Self {
        Self { store }
    }

    /// Validate all fields, reject a duplicate email, then insert.
    /// Nothing is written when any check fails.
    pub async fn create_student(&self, new: NewStudent) -> Result<Student, DomainError> {
        validate::new_student(&new)?;
        if self.store.email_exists(&new.email).await? {
            return Err(DomainError::DuplicateEmail(new.email));
        }
        let id = self.store.create_student(&new).await?;
        let student = self
            .store
            .get_student(id)
            .await?
            .ok_or_else(|| DomainError::Store(format!("student {id} missing after insert")))?;
        info!(id, name = %student.full_name(), "student registered");
        Ok(student)
    }

    /// Roster ordered by (last name, first name).
    pub async fn list_students(&self) -> Result<Vec<Student>, DomainError> {
        self.store.list_students().await
    }

    pub async fn get_student(&self, id: i64) -> Result<Option<Student>, DomainError> {
        self.store.get_student(id).await
    }
}
