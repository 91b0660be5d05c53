//! Service layer for business logic operations.
//!
//! Services encapsulate business logic and coordinate between
//! repositories and handlers.

mod account_service;
mod course_service;
pub mod credentials;
mod notice_service;
pub mod notifications;
mod registration_service;
mod subject_service;

pub use account_service::{AccountService, ProfileChanges};
pub use course_service::CourseService;
pub use credentials::{Argon2Issuer, CredentialIssuer};
pub use notice_service::NoticeService;
pub use notifications::{NotificationService, Notifier};
pub use registration_service::{
    ALLOCATION_CONFLICT, Registration, RegistrationRequest, RegistrationService,
};
pub use subject_service::SubjectService;

use std::sync::Arc;

use crate::config::{NotifierConfig, RegistrationConfig};
use crate::identity::SystemClock;
use crate::repositories::Repositories;

/// Aggregates all services for convenient access.
///
/// This struct is designed to be used as Axum application state.
/// Cloning is cheap since underlying pools use `Arc` internally.
#[derive(Clone)]
pub struct Services {
    pub accounts: AccountService,
    pub courses: CourseService,
    pub registration: RegistrationService,
    pub subjects: SubjectService,
    pub notices: NoticeService,
    pub notifications: NotificationService,
}

impl Services {
    /// Creates a new Services instance from Repositories.
    ///
    /// # Arguments
    /// * `repos` - Diesel-backed repositories
    /// * `registration` - Password and retry settings for new accounts
    /// * `notifier` - Delivery backend for welcome messages
    pub fn new(
        repos: Repositories,
        registration: &RegistrationConfig,
        notifier: &NotifierConfig,
    ) -> Self {
        let notifications = NotificationService::new(
            notifications::provider_from_config(notifier),
            repos.notification_logs.clone(),
        );
        let courses = Arc::new(repos.courses.clone());
        let accounts = Arc::new(repos.accounts.clone());
        let subjects = Arc::new(repos.subjects.clone());

        Self {
            accounts: AccountService::new(repos.accounts.clone()),
            courses: CourseService::new(courses.clone(), registration.max_allocation_attempts),
            registration: RegistrationService::new(
                courses,
                accounts.clone(),
                subjects.clone(),
                Arc::new(Argon2Issuer),
                Arc::new(notifications.clone()),
                Arc::new(SystemClock),
                registration.clone(),
            ),
            subjects: SubjectService::new(subjects.clone(), subjects, accounts),
            notices: NoticeService::new(Arc::new(repos.notices)),
            notifications,
        }
    }
}
