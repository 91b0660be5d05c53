use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::Course;

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateCourseRequest {
    #[validate(length(min = 1, max = 255, message = "Course name must be 1-255 characters"))]
    #[schema(example = "BCA")]
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseResponse {
    pub id: i32,
    pub name: String,
    /// Two-digit code embedded in usernames, frozen at creation
    #[schema(example = "01")]
    pub course_code: String,
    #[schema(example = "2024-01-15T10:30:00.000Z")]
    pub created_at: String,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            name: course.name,
            course_code: course.course_code,
            created_at: course.created_at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        }
    }
}
