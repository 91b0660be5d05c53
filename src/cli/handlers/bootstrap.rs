//! Bootstrap command handler
//!
//! Creates the first course and admin so the API has someone to log in as.

use crate::config::settings::Settings;
use crate::db::establish_async_connection_pool;
use crate::error::{AppError, AppResult};
use crate::identity::Role;
use crate::models::Course;
use crate::repositories::Repositories;
use crate::services::{CourseService, Registration, RegistrationRequest, Services};

/// Arguments of `campus-records bootstrap`
#[derive(Debug, Clone)]
pub struct BootstrapArgs {
    pub course: String,
    pub name: String,
    pub email: String,
}

pub struct BootstrapCommandHandler {
    config: Settings,
}

impl BootstrapCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Connects to the database and registers the first admin.
    ///
    /// # Errors
    /// - Database connection errors
    /// - `Duplicate` when an admin with this email exists
    /// - `Conflict` when every username allocation attempt collided
    pub async fn execute(&self, args: BootstrapArgs) -> AppResult<()> {
        self.config.database.validate()?;
        let pool = establish_async_connection_pool(&self.config.database).await?;
        let services = Services::new(
            Repositories::new(pool),
            &self.config.registration,
            &self.config.notifier,
        );

        let registration = bootstrap(&services, args).await?;
        println!("✓ Admin account created");
        println!("  username:           {}", registration.account.username);
        println!("  one-time password:  {}", registration.one_time_password);
        println!("Change the password after the first login.");
        Ok(())
    }
}

/// Finds or creates the course, then registers an admin in it.
pub async fn bootstrap(services: &Services, args: BootstrapArgs) -> AppResult<Registration> {
    let course = find_or_create_course(&services.courses, &args.course).await?;
    tracing::info!(course = %course.name, code = %course.course_code, "Bootstrapping first admin");

    services
        .registration
        .register(RegistrationRequest {
            role: Role::Admin,
            course: course.name,
            name: args.name,
            email: args.email,
            joining_year: None,
            academic_year: None,
            contact_number: None,
            avatar: None,
            profile: serde_json::json!({}),
        })
        .await
}

async fn find_or_create_course(courses: &CourseService, name: &str) -> AppResult<Course> {
    match courses.find_by_name(name).await {
        Ok(course) => Ok(course),
        Err(AppError::NotFound { .. }) => courses.create(name).await,
        Err(e) => Err(e),
    }
}
