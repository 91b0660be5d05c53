//! HTTP request handlers for API endpoints.
//!
//! This module contains all request handlers organized by resource type.

pub mod accounts;
pub mod auth;
pub mod courses;
pub mod health;
pub mod me;
pub mod notices;
pub mod subjects;

use crate::error::{AppError, AppResult};
use crate::models::Course;
use crate::state::AppState;

/// Turns an optional `course` query parameter into a course id filter.
/// An unknown name is `NotFound`.
async fn resolve_course_filter(state: &AppState, name: Option<&str>) -> AppResult<Option<i32>> {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => Ok(Some(state.services.courses.find_by_name(name).await?.id)),
        None => Ok(None),
    }
}

/// Looks up the course named in a request body. An unknown name is the
/// caller's input error, reported against the `course` field.
async fn require_course(state: &AppState, name: &str) -> AppResult<Course> {
    match state.services.courses.find_by_name(name).await {
        Err(AppError::NotFound { .. }) => Err(AppError::Validation {
            field: "course".to_string(),
            reason: format!("Course '{name}' does not exist"),
        }),
        other => other,
    }
}
