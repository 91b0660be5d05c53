//! Storage seams used by the services.
//!
//! The diesel repositories implement these against PostgreSQL; tests run
//! the same workflows against an in-memory store.

use async_trait::async_trait;

use crate::error::AppResult;
use crate::identity::Role;
use crate::models::{
    Account, Course, Enrollment, NewAccount, NewCourse, NewNotice, NewSubject, Notice,
    StudentIdentifiers, Subject,
};
use crate::repositories::SubjectFilter;

#[async_trait]
pub trait CourseStore: Send + Sync {
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Course>>;

    /// Number of courses ever persisted and not deleted
    async fn count(&self) -> AppResult<u64>;

    /// Fails with `AppError::Duplicate` on a name or course code collision
    async fn insert(&self, course: NewCourse) -> AppResult<Course>;

    /// All courses in creation order
    async fn list_all(&self) -> AppResult<Vec<Course>>;

    /// Returns the number of deleted rows (0 or 1)
    async fn delete_by_name(&self, name: &str) -> AppResult<usize>;
}

/// Account persistence, always scoped by role.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Accounts of `role` registered under `course_id`
    async fn count_by_course(&self, role: Role, course_id: i32) -> AppResult<u64>;

    /// Fails with `AppError::Duplicate { field: "username", .. }` when the
    /// username is already taken.
    async fn insert(&self, account: NewAccount) -> AppResult<Account>;

    async fn find_by_email(&self, role: Role, email: &str) -> AppResult<Option<Account>>;

    /// A student sharing any of `identifiers`
    async fn find_student_by_identifiers(
        &self,
        identifiers: &StudentIdentifiers,
    ) -> AppResult<Option<Account>>;

    /// Ids of the students of `course_id` in `academic_year`
    async fn find_student_ids(&self, course_id: i32, academic_year: i32) -> AppResult<Vec<i32>>;
}

#[async_trait]
pub trait SubjectStore: Send + Sync {
    /// Fails with `AppError::Duplicate` when the subject code is taken
    async fn insert(&self, subject: NewSubject) -> AppResult<Subject>;

    /// Ordered by subject code
    async fn list(&self, filter: &SubjectFilter) -> AppResult<Vec<Subject>>;

    /// Returns the number of deleted rows
    async fn delete_many(&self, ids: &[i32]) -> AppResult<usize>;
}

#[async_trait]
pub trait EnrollmentStore: Send + Sync {
    /// Inserts the links, skipping ones that already exist. Returns the
    /// number of new links.
    async fn enroll(&self, links: &[Enrollment]) -> AppResult<usize>;

    /// Links the student to every subject of `course_id` taught in
    /// `academic_year`. Returns the number of new links.
    async fn enroll_in_matching_subjects(
        &self,
        account_id: i32,
        course_id: i32,
        academic_year: i32,
    ) -> AppResult<usize>;
}

#[async_trait]
pub trait NoticeStore: Send + Sync {
    /// Fails with `AppError::Duplicate` when a notice with the same topic,
    /// content and date exists.
    async fn insert(&self, notice: NewNotice) -> AppResult<Notice>;

    /// Newest first, with the total count
    async fn list(&self, offset: i64, limit: i64) -> AppResult<(Vec<Notice>, i64)>;
}
