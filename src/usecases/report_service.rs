//! Reporting facade: fetches one snapshot of the enriched view and delegates
//! to the pure aggregate functions in `domain::reports`.
//!
//! Each report returns `None` when there is no registration data.

use crate::domain::DomainError;
use crate::domain::reports::{
    self, EnrollmentReport, RegistrationStats, RegistrationsOverview,
};
use crate::ports::StorePort;
use std::sync::Arc;

pub struct ReportService {
    store: Arc<dyn StorePort>,
}

impl ReportService {
    pub fn new(store: Arc<dyn StorePort>) -> Self {
        Self { store }
    }

    pub async fn registrations_overview(
        &self,
    ) -> Result<Option<RegistrationsOverview>, DomainError> {
        let snapshot = self.store.list_enriched().await?;
        Ok(reports::registrations_overview(&snapshot))
    }

    pub async fn registration_stats(&self) -> Result<Option<RegistrationStats>, DomainError> {
        let snapshot = self.store.list_enriched().await?;
        Ok(reports::registration_stats(&snapshot))
    }

    pub async fn enrollment_report(&self) -> Result<Option<EnrollmentReport>, DomainError> {
        let snapshot = self.store.list_enriched().await?;
        Ok(reports::enrollment_report(&snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::persistence::SqliteStore;
    use crate::domain::{DomainError, NewCourse, NewStudent};
    use crate::usecases::{CourseService, EnrollmentService, StudentService};
    use chrono::NaiveDate;

    /// Full flow: register Alice, assign CS101, reject the duplicate,
    /// check the rollup.
    #[tokio::test]
    async fn test_end_to_end_alice() {
        let store = Arc::new(SqliteStore::in_memory().await.unwrap());
        let students = StudentService::new(store.clone());
        let courses = CourseService::new(store.clone());
        let enrollment = EnrollmentService::new(store.clone());
        let reports = ReportService::new(store.clone());

        let alice = students
            .create_student(NewStudent {
                first_name: "Alice".to_string(),
                last_name: "Smith".to_string(),
                email: "alice@x.com".to_string(),
                phone: "0712345678".to_string(),
                date_of_birth: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            })
            .await
            .unwrap();
        let cs101 = courses
            .add_course(NewCourse {
                code: "CS101".to_string(),
                name: "Intro to Programming".to_string(),
                credits: 3,
                department: "CS".to_string(),
                semester: "Fall2024".to_string(),
            })
            .await
            .unwrap();

        enrollment.register(alice.id, cs101.id).await.unwrap();
        let err = enrollment.register(alice.id, cs101.id).await.unwrap_err();
        assert!(matches!(err, DomainError::AlreadyRegistered { .. }));

        let overview = reports.registrations_overview().await.unwrap().unwrap();
        assert_eq!(overview.rollups.len(), 1);
        assert_eq!(overview.rollups[0].course_count, 1);
        assert_eq!(overview.rollups[0].total_credits, 3);
        assert_eq!(overview.total_registrations, 1);

        let report = reports.enrollment_report().await.unwrap().unwrap();
        assert_eq!(report.most_popular.course.code, "CS101");
        assert!(report.least_popular.is_none());
    }

    #[tokio::test]
    async fn test_reports_empty_store_is_no_data() {
        let store = Arc::new(SqliteStore::in_memory().await.unwrap());
        let reports = ReportService::new(store);

        assert!(reports.registrations_overview().await.unwrap().is_none());
        assert!(reports.registration_stats().await.unwrap().is_none());
        assert!(reports.enrollment_report().await.unwrap().is_none());
    }
}
