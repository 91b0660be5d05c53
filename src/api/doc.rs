use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub const AUTH_TAG: &str = "Auth";
pub const ME_TAG: &str = "Me";
pub const ACCOUNT_TAG: &str = "Accounts";
pub const COURSE_TAG: &str = "Courses";
pub const SUBJECT_TAG: &str = "Subjects";
pub const NOTICE_TAG: &str = "Notices";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Campus Records",
        description = "Accounts, courses, subjects and notices for a college campus",
    ),
    modifiers(&SecurityAddon),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::identity::Role,
            crate::models::StudentProfile,
            crate::models::FacultyProfile,
        )
    ),
    tags(
        (name = AUTH_TAG, description = "Login and token refresh"),
        (name = ME_TAG, description = "The signed-in account"),
        (name = ACCOUNT_TAG, description = "Admin, faculty and student registration"),
        (name = COURSE_TAG, description = "Course catalogue"),
        (name = SUBJECT_TAG, description = "Subjects and enrollment"),
        (name = NOTICE_TAG, description = "Notice board"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer Token Authentication"))
                        .build(),
                ),
            )
        }
    }
}
