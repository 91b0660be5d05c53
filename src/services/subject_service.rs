//! Subject service.
//!
//! A new subject picks up every student already registered for its course
//! and academic year.

use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{Enrollment, NewSubject, Subject};
use crate::repositories::{AccountStore, EnrollmentStore, SubjectFilter, SubjectStore};

#[derive(Clone)]
pub struct SubjectService {
    subjects: Arc<dyn SubjectStore>,
    enrollments: Arc<dyn EnrollmentStore>,
    accounts: Arc<dyn AccountStore>,
}

impl SubjectService {
    pub fn new(
        subjects: Arc<dyn SubjectStore>,
        enrollments: Arc<dyn EnrollmentStore>,
        accounts: Arc<dyn AccountStore>,
    ) -> Self {
        Self {
            subjects,
            enrollments,
            accounts,
        }
    }

    /// Creates a subject and enrolls the matching students.
    ///
    /// Enrollment failures are logged and leave the subject in place with
    /// no students; students registered later still pick it up.
    ///
    /// # Returns
    /// The subject and the number of students enrolled in it
    pub async fn create(&self, new_subject: NewSubject) -> AppResult<(Subject, usize)> {
        let subject = self.subjects.insert(new_subject).await?;

        let enrolled = match self.enroll_matching_students(&subject).await {
            Ok(enrolled) => enrolled,
            Err(e) => {
                tracing::warn!(
                    subject_code = %subject.subject_code,
                    error = %e,
                    "Failed to enroll students in new subject, subject kept"
                );
                0
            }
        };

        tracing::info!(
            subject_code = %subject.subject_code,
            course_id = subject.course_id,
            year = subject.year,
            enrolled,
            "Subject created"
        );
        Ok((subject, enrolled))
    }

    async fn enroll_matching_students(&self, subject: &Subject) -> AppResult<usize> {
        let links: Vec<Enrollment> = self
            .accounts
            .find_student_ids(subject.course_id, subject.year)
            .await?
            .into_iter()
            .map(|account_id| Enrollment {
                account_id,
                subject_id: subject.id,
            })
            .collect();
        self.enrollments.enroll(&links).await
    }

    pub async fn list(&self, filter: &SubjectFilter) -> AppResult<Vec<Subject>> {
        self.subjects.list(filter).await
    }

    /// Deletes subjects by id.
    ///
    /// An empty id list is a `BadRequest`; deleting nothing is `NotFound`.
    pub async fn delete_many(&self, ids: &[i32]) -> AppResult<usize> {
        if ids.is_empty() {
            return Err(AppError::BadRequest {
                message: "At least one id is required".to_string(),
            });
        }

        let deleted = self.subjects.delete_many(ids).await?;
        if deleted == 0 {
            return Err(AppError::not_found("subject", "id", format!("{ids:?}")));
        }
        tracing::info!(requested = ids.len(), deleted, "Subjects deleted");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Role;
    use crate::models::NewAccount;
    use crate::repositories::memory::InMemoryStore;
    use serde_json::json;

    fn service(store: &Arc<InMemoryStore>) -> SubjectService {
        SubjectService::new(store.clone(), store.clone(), store.clone())
    }

    fn new_subject(code: &str, course_id: i32, year: i32) -> NewSubject {
        NewSubject {
            subject_code: code.to_string(),
            name: "Data Structures".to_string(),
            course_id,
            year,
            semester: Some(2 * year - 1),
            total_lectures: None,
            credits: Some(4),
            subject_type: Some("theory".to_string()),
            created_by: None,
        }
    }

    async fn add_student(store: &InMemoryStore, username: &str, course_id: i32, year: i32) -> i32 {
        let account = AccountStore::insert(
            store,
            NewAccount {
                role: Role::Student,
                username: username.to_string(),
                name: "Asha".to_string(),
                email: format!("{username}@x.edu"),
                password: "hash".to_string(),
                course_id,
                joining_year: 2024,
                academic_year: Some(year),
                contact_number: None,
                avatar: None,
                profile: json!({}),
                password_updated: false,
            },
        )
        .await
        .unwrap();
        account.id
    }

    #[tokio::test]
    async fn test_create_enrolls_only_students_of_course_and_year() {
        let store = Arc::new(InMemoryStore::new());
        let first_a = add_student(&store, "STU202401000", 1, 1).await;
        let first_b = add_student(&store, "STU202401001", 1, 1).await;
        let second = add_student(&store, "STU202301002", 1, 2).await;
        let other_course = add_student(&store, "STU202402000", 2, 1).await;

        let (subject, enrolled) = service(&store)
            .create(new_subject("BCA101", 1, 1))
            .await
            .unwrap();

        assert_eq!(enrolled, 2);
        assert_eq!(store.enrollments_of(first_a), vec![subject.id]);
        assert_eq!(store.enrollments_of(first_b), vec![subject.id]);
        assert!(store.enrollments_of(second).is_empty());
        assert!(store.enrollments_of(other_course).is_empty());
    }

    #[tokio::test]
    async fn test_enrollment_failure_keeps_subject() {
        let store = Arc::new(InMemoryStore::new());
        let student = add_student(&store, "STU202401000", 1, 1).await;
        store.fail_enrollments();

        let (subject, enrolled) = service(&store)
            .create(new_subject("BCA101", 1, 1))
            .await
            .unwrap();

        assert_eq!(enrolled, 0);
        assert!(store.enrollments_of(student).is_empty());
        let listed = service(&store)
            .list(&SubjectFilter::default())
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, subject.id);
    }

    #[tokio::test]
    async fn test_duplicate_subject_code_is_rejected() {
        let store = Arc::new(InMemoryStore::new());
        let service = service(&store);
        service.create(new_subject("BCA101", 1, 1)).await.unwrap();

        let err = service.create(new_subject("BCA101", 1, 2)).await.unwrap_err();
        assert!(err.is_duplicate_of("subject_code"));
    }

    #[tokio::test]
    async fn test_delete_many_requires_ids() {
        let store = Arc::new(InMemoryStore::new());
        let err = service(&store).delete_many(&[]).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest { .. }));
    }

    #[tokio::test]
    async fn test_delete_many_of_unknown_ids_is_not_found() {
        let store = Arc::new(InMemoryStore::new());
        let service = service(&store);
        let (subject, _) = service.create(new_subject("BCA101", 1, 1)).await.unwrap();

        let err = service.delete_many(&[subject.id + 1]).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
        assert_eq!(service.delete_many(&[subject.id]).await.unwrap(), 1);
    }
}
