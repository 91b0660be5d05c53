//! Account registration.
//!
//! Allocates the username, persists the account and, for students, runs the
//! follow-up steps (subject enrollment and the welcome message). The unique
//! index on `accounts.username` decides allocation races: a collision re-reads
//! the scope count and tries again, up to `max_allocation_attempts`.

use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::config::RegistrationConfig;
use crate::error::{AppError, AppResult};
use crate::identity::{Clock, CourseCode, Role, allocate_username, next_ordinal};
use crate::models::{Account, Course, NewAccount, StudentIdentifiers};
use crate::repositories::{AccountStore, CourseStore, EnrollmentStore};
use crate::services::credentials::CredentialIssuer;
use crate::services::notifications::Notifier;
use crate::utils::password::generate_one_time_password;

/// Message returned when every allocation attempt collided
pub const ALLOCATION_CONFLICT: &str = "could not create account, please retry";

/// Validated input for a new account
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub role: Role,
    /// Course name; the course must already exist
    pub course: String,
    pub name: String,
    pub email: String,
    /// Defaults to the current year
    pub joining_year: Option<i32>,
    /// Required for students, ignored otherwise
    pub academic_year: Option<i32>,
    pub contact_number: Option<String>,
    pub avatar: Option<String>,
    pub profile: JsonValue,
}

/// Outcome of a successful registration.
#[derive(Debug, Clone)]
pub struct Registration {
    pub account: Account,
    /// Plaintext initial password, shown once to the caller
    pub one_time_password: String,
}

#[derive(Clone)]
pub struct RegistrationService {
    courses: Arc<dyn CourseStore>,
    accounts: Arc<dyn AccountStore>,
    enrollments: Arc<dyn EnrollmentStore>,
    credentials: Arc<dyn CredentialIssuer>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    config: RegistrationConfig,
}

impl RegistrationService {
    pub fn new(
        courses: Arc<dyn CourseStore>,
        accounts: Arc<dyn AccountStore>,
        enrollments: Arc<dyn EnrollmentStore>,
        credentials: Arc<dyn CredentialIssuer>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        config: RegistrationConfig,
    ) -> Self {
        Self {
            courses,
            accounts,
            enrollments,
            credentials,
            notifier,
            clock,
            config,
        }
    }

    /// Registers a new account of `request.role`.
    ///
    /// # Returns
    /// The persisted account and its one-time password
    ///
    /// # Errors
    /// * `Duplicate` when the email is already used within the role, or a
    ///   student shares any identifier with an existing student
    /// * `Validation` (field `course`) when the course does not exist
    /// * `Conflict` when every allocation attempt collided
    pub async fn register(&self, request: RegistrationRequest) -> AppResult<Registration> {
        let role = request.role;

        if role == Role::Student && request.academic_year.is_none() {
            return Err(AppError::Validation {
                field: "academic_year".to_string(),
                reason: "Academic year is required for students".to_string(),
            });
        }

        self.ensure_not_registered(&request).await?;

        let course = self.resolve_course(&request.course).await?;
        let code = CourseCode::parse(course.course_code.clone())?;

        let one_time_password = if self.config.generate_one_time_password {
            generate_one_time_password()
        } else {
            self.config.default_password.clone()
        };
        let password = self.credentials.hash(&one_time_password).await?;

        let year = self.clock.current_year();
        let template = NewAccount {
            role,
            username: String::new(),
            name: request.name,
            email: request.email,
            password,
            course_id: course.id,
            joining_year: request.joining_year.unwrap_or(year),
            academic_year: if role == Role::Student {
                request.academic_year
            } else {
                None
            },
            contact_number: request.contact_number,
            avatar: request.avatar,
            profile: request.profile,
            password_updated: false,
        };

        let account = self.insert_with_retry(template, &code, year).await?;
        tracing::info!(
            role = %role,
            username = %account.username,
            course = %course.name,
            "Account registered"
        );

        if role == Role::Student {
            self.after_student_created(&account, &one_time_password).await;
        }

        Ok(Registration {
            account,
            one_time_password,
        })
    }

    /// Students must not share any identifier with an existing student;
    /// other roles only need an unused email within the role.
    async fn ensure_not_registered(&self, request: &RegistrationRequest) -> AppResult<()> {
        if request.role != Role::Student {
            if self
                .accounts
                .find_by_email(request.role, &request.email)
                .await?
                .is_some()
            {
                return Err(AppError::duplicate("accounts", "email", &request.email));
            }
            return Ok(());
        }

        let identifiers = StudentIdentifiers::new(
            &request.email,
            request.contact_number.as_deref(),
            &request.profile,
        );
        let Some(existing) = self
            .accounts
            .find_student_by_identifiers(&identifiers)
            .await?
        else {
            return Ok(());
        };
        let (field, value) = identifiers
            .shared_with(&StudentIdentifiers::of(&existing))
            .unwrap_or(("email", request.email.clone()));
        tracing::debug!(
            existing = %existing.username,
            field,
            "Student already registered"
        );
        Err(AppError::duplicate("accounts", field, value))
    }

    async fn resolve_course(&self, name: &str) -> AppResult<Course> {
        self.courses
            .find_by_name(name)
            .await?
            .ok_or_else(|| AppError::Validation {
                field: "course".to_string(),
                reason: format!("Course '{name}' does not exist"),
            })
    }

    async fn insert_with_retry(
        &self,
        template: NewAccount,
        code: &CourseCode,
        year: i32,
    ) -> AppResult<Account> {
        let role = template.role;
        let max_attempts = self.config.max_allocation_attempts.max(1);
        let mut previous = None;

        for attempt in 1..=max_attempts {
            let scope_count = self
                .accounts
                .count_by_course(role, template.course_id)
                .await?;
            let ordinal = next_ordinal(scope_count, previous);
            let username = allocate_username(role, code, ordinal, year)?;

            let candidate = NewAccount {
                username: username.clone(),
                ..template.clone()
            };
            match self.accounts.insert(candidate).await {
                Ok(account) => return Ok(account),
                Err(e) if e.is_duplicate_of("username") => {
                    tracing::warn!(
                        role = %role,
                        username = %username,
                        attempt,
                        max_attempts,
                        "Username already taken, retrying allocation"
                    );
                    previous = Some(ordinal);
                }
                Err(e) => return Err(e),
            }
        }

        tracing::error!(
            role = %role,
            course_id = template.course_id,
            max_attempts,
            "Username allocation exhausted"
        );
        Err(AppError::Conflict {
            message: ALLOCATION_CONFLICT.to_string(),
        })
    }

    /// Enrollment and the welcome message. Neither undoes the account.
    async fn after_student_created(&self, account: &Account, one_time_password: &str) {
        if let Some(academic_year) = account.academic_year {
            match self
                .enrollments
                .enroll_in_matching_subjects(account.id, account.course_id, academic_year)
                .await
            {
                Ok(enrolled) => tracing::debug!(
                    username = %account.username,
                    enrolled,
                    "Student enrolled in course subjects"
                ),
                Err(e) => tracing::warn!(
                    username = %account.username,
                    error = %e,
                    "Failed to enroll student in course subjects"
                ),
            }
        }

        if let Err(e) = self.notifier.welcome(account, one_time_password).await {
            tracing::warn!(
                username = %account.username,
                error = %e,
                "Welcome notification failed, account kept"
            );
        }
    }
}
