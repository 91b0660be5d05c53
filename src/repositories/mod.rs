//! Repository layer for data access operations.
//!
//! Provides async CRUD operations for all domain entities.

mod account_repo;
mod course_repo;
#[cfg(test)]
pub(crate) mod memory;
mod notice_repo;
mod notification_log_repo;
mod store;
mod subject_repo;

pub use account_repo::{AccountFilter, AccountRepository};
pub use course_repo::CourseRepository;
pub use notice_repo::NoticeRepository;
pub use notification_log_repo::NotificationLogRepository;
pub use store::{AccountStore, CourseStore, EnrollmentStore, NoticeStore, SubjectStore};
pub use subject_repo::{SubjectFilter, SubjectRepository};

use crate::db::AsyncDbPool;

/// Aggregates all repositories for convenient access.
///
/// Since `AsyncDbPool` uses `Arc` internally, cloning is cheap.
#[derive(Clone)]
pub struct Repositories {
    pub courses: CourseRepository,
    pub accounts: AccountRepository,
    pub subjects: SubjectRepository,
    pub notices: NoticeRepository,
    pub notification_logs: NotificationLogRepository,
}

impl Repositories {
    /// Creates a new Repositories instance with all repositories initialized.
    ///
    /// # Arguments
    /// * `pool` - The async database connection pool
    pub fn new(pool: AsyncDbPool) -> Self {
        Self {
            courses: CourseRepository::new(pool.clone()),
            accounts: AccountRepository::new(pool.clone()),
            subjects: SubjectRepository::new(pool.clone()),
            notices: NoticeRepository::new(pool.clone()),
            notification_logs: NotificationLogRepository::new(pool),
        }
    }
}
