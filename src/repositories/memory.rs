//! In-memory stores for service tests.
//!
//! Enforces the same uniqueness rules as the PostgreSQL schema so that
//! collisions surface as `AppError::Duplicate` exactly like the database.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::{AppError, AppResult};
use crate::identity::Role;
use crate::models::{
    Account, Course, Enrollment, NewAccount, NewCourse, NewNotice, NewSubject, Notice,
    StudentIdentifiers, Subject,
};
use crate::repositories::{
    AccountStore, CourseStore, EnrollmentStore, NoticeStore, SubjectFilter, SubjectStore,
};

#[derive(Default)]
struct State {
    courses: Vec<Course>,
    accounts: Vec<Account>,
    enrollments: Vec<Enrollment>,
    subjects: Vec<Subject>,
    notices: Vec<Notice>,
    /// Counts handed out ahead of the real one, to stage races
    stale_counts: VecDeque<u64>,
    fail_enrollments: bool,
    course_count_reads: usize,
    account_count_reads: usize,
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Makes the next `count_by_course` calls return these values.
    pub fn stage_stale_counts(&self, counts: impl IntoIterator<Item = u64>) {
        self.state().stale_counts.extend(counts);
    }

    /// Adds a subject with a fixed id, bypassing `SubjectStore::insert`.
    pub fn add_subject(&self, subject_id: i32, course_id: i32, academic_year: i32) {
        self.state().subjects.push(Subject {
            id: subject_id,
            subject_code: format!("SUB{subject_id}"),
            name: format!("Subject {subject_id}"),
            course_id,
            year: academic_year,
            semester: None,
            total_lectures: None,
            credits: None,
            subject_type: None,
            created_by: None,
            created_at: Utc::now().naive_utc(),
        });
    }

    /// Makes every later enrollment write fail.
    pub fn fail_enrollments(&self) {
        self.state().fail_enrollments = true;
    }

    pub fn remove_account(&self, username: &str) {
        self.state().accounts.retain(|a| a.username != username);
    }

    pub fn accounts(&self) -> Vec<Account> {
        self.state().accounts.clone()
    }

    pub fn enrollments_of(&self, account_id: i32) -> Vec<i32> {
        self.state()
            .enrollments
            .iter()
            .filter(|e| e.account_id == account_id)
            .map(|e| e.subject_id)
            .collect()
    }

    pub fn account_count_reads(&self) -> usize {
        self.state().account_count_reads
    }

    pub fn course_count_reads(&self) -> usize {
        self.state().course_count_reads
    }
}

#[async_trait]
impl CourseStore for InMemoryStore {
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Course>> {
        Ok(self.state().courses.iter().find(|c| c.name == name).cloned())
    }

    async fn count(&self) -> AppResult<u64> {
        let mut state = self.state();
        state.course_count_reads += 1;
        Ok(state.courses.len() as u64)
    }

    async fn insert(&self, course: NewCourse) -> AppResult<Course> {
        let mut state = self.state();
        if state.courses.iter().any(|c| c.name == course.name) {
            return Err(AppError::duplicate("courses", "name", &course.name));
        }
        if state.courses.iter().any(|c| c.course_code == course.course_code) {
            return Err(AppError::duplicate("courses", "course_code", &course.course_code));
        }
        let id = state.courses.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        let created = Course {
            id,
            name: course.name,
            course_code: course.course_code,
            created_at: Utc::now().naive_utc(),
        };
        state.courses.push(created.clone());
        Ok(created)
    }

    async fn list_all(&self) -> AppResult<Vec<Course>> {
        Ok(self.state().courses.clone())
    }

    async fn delete_by_name(&self, name: &str) -> AppResult<usize> {
        let mut state = self.state();
        let Some(course) = state.courses.iter().find(|c| c.name == name).cloned() else {
            return Ok(0);
        };
        if state.accounts.iter().any(|a| a.course_id == course.id)
            || state.subjects.iter().any(|s| s.course_id == course.id)
        {
            return Err(AppError::Validation {
                field: "course_id".to_string(),
                reason: format!("course '{}' is still referenced", course.name),
            });
        }
        state.courses.retain(|c| c.id != course.id);
        Ok(1)
    }
}

#[async_trait]
impl AccountStore for InMemoryStore {
    async fn count_by_course(&self, role: Role, course_id: i32) -> AppResult<u64> {
        let mut state = self.state();
        state.account_count_reads += 1;
        if let Some(stale) = state.stale_counts.pop_front() {
            return Ok(stale);
        }
        Ok(state
            .accounts
            .iter()
            .filter(|a| a.role == role && a.course_id == course_id)
            .count() as u64)
    }

    async fn insert(&self, account: NewAccount) -> AppResult<Account> {
        let mut state = self.state();
        if state.accounts.iter().any(|a| a.username == account.username) {
            return Err(AppError::duplicate("accounts", "username", &account.username));
        }
        if state
            .accounts
            .iter()
            .any(|a| a.role == account.role && a.email == account.email)
        {
            return Err(AppError::duplicate(
                "accounts",
                "role, email",
                format!("{}, {}", account.role, account.email),
            ));
        }
        let now = Utc::now().naive_utc();
        let id = state.accounts.iter().map(|a| a.id).max().unwrap_or(0) + 1;
        let created = Account {
            id,
            role: account.role,
            username: account.username,
            name: account.name,
            email: account.email,
            password: account.password,
            course_id: account.course_id,
            joining_year: account.joining_year,
            academic_year: account.academic_year,
            contact_number: account.contact_number,
            avatar: account.avatar,
            profile: account.profile,
            password_updated: account.password_updated,
            created_at: now,
            updated_at: now,
        };
        state.accounts.push(created.clone());
        Ok(created)
    }

    async fn find_by_email(&self, role: Role, email: &str) -> AppResult<Option<Account>> {
        Ok(self
            .state()
            .accounts
            .iter()
            .find(|a| a.role == role && a.email == email)
            .cloned())
    }

    async fn find_student_by_identifiers(
        &self,
        identifiers: &StudentIdentifiers,
    ) -> AppResult<Option<Account>> {
        Ok(self
            .state()
            .accounts
            .iter()
            .filter(|a| a.role == Role::Student)
            .find(|a| StudentIdentifiers::of(a).shared_with(identifiers).is_some())
            .cloned())
    }

    async fn find_student_ids(&self, course_id: i32, academic_year: i32) -> AppResult<Vec<i32>> {
        Ok(self
            .state()
            .accounts
            .iter()
            .filter(|a| {
                a.role == Role::Student
                    && a.course_id == course_id
                    && a.academic_year == Some(academic_year)
            })
            .map(|a| a.id)
            .collect())
    }
}

#[async_trait]
impl SubjectStore for InMemoryStore {
    async fn insert(&self, subject: NewSubject) -> AppResult<Subject> {
        let mut state = self.state();
        if state.subjects.iter().any(|s| s.subject_code == subject.subject_code) {
            return Err(AppError::duplicate("subjects", "subject_code", &subject.subject_code));
        }
        let id = state.subjects.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        let created = Subject {
            id,
            subject_code: subject.subject_code,
            name: subject.name,
            course_id: subject.course_id,
            year: subject.year,
            semester: subject.semester,
            total_lectures: subject.total_lectures,
            credits: subject.credits,
            subject_type: subject.subject_type,
            created_by: subject.created_by,
            created_at: Utc::now().naive_utc(),
        };
        state.subjects.push(created.clone());
        Ok(created)
    }

    async fn list(&self, filter: &SubjectFilter) -> AppResult<Vec<Subject>> {
        let mut subjects: Vec<Subject> = self
            .state()
            .subjects
            .iter()
            .filter(|s| filter.course_id.is_none_or(|c| s.course_id == c))
            .filter(|s| filter.year.is_none_or(|y| s.year == y))
            .filter(|s| filter.semester.is_none_or(|n| s.semester == Some(n)))
            .filter(|s| {
                filter
                    .subject_type
                    .as_deref()
                    .is_none_or(|t| s.subject_type.as_deref() == Some(t))
            })
            .cloned()
            .collect();
        subjects.sort_by(|a, b| a.subject_code.cmp(&b.subject_code));
        Ok(subjects)
    }

    async fn delete_many(&self, ids: &[i32]) -> AppResult<usize> {
        let mut state = self.state();
        let before = state.subjects.len();
        state.subjects.retain(|s| !ids.contains(&s.id));
        state.enrollments.retain(|e| !ids.contains(&e.subject_id));
        Ok(before - state.subjects.len())
    }
}

#[async_trait]
impl EnrollmentStore for InMemoryStore {
    async fn enroll(&self, links: &[Enrollment]) -> AppResult<usize> {
        let mut state = self.state();
        if state.fail_enrollments {
            return Err(AppError::Internal {
                source: anyhow::anyhow!("enrollments table unavailable"),
            });
        }
        let mut added = 0;
        for link in links {
            if !state.enrollments.contains(link) {
                state.enrollments.push(*link);
                added += 1;
            }
        }
        Ok(added)
    }

    async fn enroll_in_matching_subjects(
        &self,
        account_id: i32,
        course_id: i32,
        academic_year: i32,
    ) -> AppResult<usize> {
        let links: Vec<Enrollment> = self
            .state()
            .subjects
            .iter()
            .filter(|s| s.course_id == course_id && s.year == academic_year)
            .map(|s| Enrollment {
                account_id,
                subject_id: s.id,
            })
            .collect();
        self.enroll(&links).await
    }
}

#[async_trait]
impl NoticeStore for InMemoryStore {
    async fn insert(&self, notice: NewNotice) -> AppResult<Notice> {
        let mut state = self.state();
        if state.notices.iter().any(|n| {
            n.topic == notice.topic
                && n.content == notice.content
                && n.notice_date == notice.notice_date
        }) {
            return Err(AppError::duplicate(
                "notices",
                "topic, content, notice_date",
                format!("{}, {}", notice.topic, notice.notice_date),
            ));
        }
        let id = state.notices.iter().map(|n| n.id).max().unwrap_or(0) + 1;
        let created = Notice {
            id,
            topic: notice.topic,
            content: notice.content,
            notice_date: notice.notice_date,
            author: notice.author,
            notice_for: notice.notice_for,
            created_at: Utc::now().naive_utc(),
        };
        state.notices.push(created.clone());
        Ok(created)
    }

    async fn list(&self, offset: i64, limit: i64) -> AppResult<(Vec<Notice>, i64)> {
        let state = self.state();
        let mut notices = state.notices.clone();
        notices.sort_by(|a, b| {
            (b.notice_date, b.created_at, b.id).cmp(&(a.notice_date, a.created_at, a.id))
        });
        let total = notices.len() as i64;
        let page = notices
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{Clock, CourseCode, FixedClock, allocate_username};
    use serde_json::json;

    fn new_student(username: &str, email: &str) -> NewAccount {
        NewAccount {
            role: Role::Student,
            username: username.to_string(),
            name: "Asha".to_string(),
            email: email.to_string(),
            password: "hash".to_string(),
            course_id: 1,
            joining_year: 2024,
            academic_year: Some(1),
            contact_number: None,
            avatar: None,
            profile: json!({}),
            password_updated: false,
        }
    }

    #[tokio::test]
    async fn test_concurrent_readers_collide_and_store_rejects_second() {
        let store = InMemoryStore::new();
        let code: CourseCode = "01".parse().unwrap();
        let year = FixedClock(2024).current_year();

        // Both registrations read the scope count before either writes.
        store.stage_stale_counts([5, 5]);
        let first_count = store.count_by_course(Role::Student, 1).await.unwrap();
        let second_count = store.count_by_course(Role::Student, 1).await.unwrap();
        let first = allocate_username(Role::Student, &code, first_count, year).unwrap();
        let second = allocate_username(Role::Student, &code, second_count, year).unwrap();
        assert_eq!(first, "STU202401005");
        assert_eq!(first, second);

        AccountStore::insert(&store, new_student(&first, "a@x.edu")).await.unwrap();
        let err = AccountStore::insert(&store, new_student(&second, "b@x.edu")).await.unwrap_err();
        assert!(err.is_duplicate_of("username"));
        assert_eq!(store.accounts().len(), 1);
    }

    #[tokio::test]
    async fn test_count_is_scoped_by_role_and_course() {
        let store = InMemoryStore::new();
        AccountStore::insert(&store, new_student("STU202401000", "a@x.edu")).await.unwrap();
        let mut other_course = new_student("STU202402000", "b@x.edu");
        other_course.course_id = 2;
        AccountStore::insert(&store, other_course).await.unwrap();

        assert_eq!(store.count_by_course(Role::Student, 1).await.unwrap(), 1);
        assert_eq!(store.count_by_course(Role::Faculty, 1).await.unwrap(), 0);
        assert_eq!(store.count_by_course(Role::Student, 2).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_email_unique_per_role() {
        let store = InMemoryStore::new();
        AccountStore::insert(&store, new_student("STU202401000", "a@x.edu")).await.unwrap();
        let err = AccountStore::insert(&store, new_student("STU202401001", "a@x.edu"))
            .await
            .unwrap_err();
        assert!(!err.is_duplicate_of("username"));
        assert!(matches!(err, AppError::Duplicate { .. }));
    }
}
