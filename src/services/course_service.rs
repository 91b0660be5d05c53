//! Course management.
//!
//! Course codes come from the running course count and are frozen at
//! creation, like usernames. The unique index on `courses.course_code`
//! settles races between concurrent creations.

use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::identity::{allocate_course_code, next_ordinal};
use crate::models::{Course, NewCourse};
use crate::repositories::CourseStore;

#[derive(Clone)]
pub struct CourseService {
    store: Arc<dyn CourseStore>,
    max_attempts: u32,
}

impl CourseService {
    pub fn new(store: Arc<dyn CourseStore>, max_attempts: u32) -> Self {
        Self {
            store,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Creates a course and allocates its code.
    ///
    /// # Errors
    /// * `Duplicate` when a course with this name exists
    /// * `Conflict` when every code allocation attempt collided
    pub async fn create(&self, name: &str) -> AppResult<Course> {
        if self.store.find_by_name(name).await?.is_some() {
            return Err(AppError::duplicate("courses", "name", name));
        }

        let mut previous = None;
        for attempt in 1..=self.max_attempts {
            let existing = self.store.count().await?;
            let ordinal = next_ordinal(existing, previous);
            let code = allocate_course_code(ordinal);

            let new_course = NewCourse {
                name: name.to_string(),
                course_code: code.to_string(),
            };
            match self.store.insert(new_course).await {
                Ok(course) => {
                    tracing::info!(
                        name = %course.name,
                        course_code = %course.course_code,
                        "Course created"
                    );
                    return Ok(course);
                }
                Err(e) if e.is_duplicate_of("course_code") => {
                    tracing::warn!(
                        name,
                        course_code = %code,
                        attempt,
                        "Course code already taken, retrying allocation"
                    );
                    previous = Some(ordinal);
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::Conflict {
            message: "could not create course, please retry".to_string(),
        })
    }

    pub async fn find_by_name(&self, name: &str) -> AppResult<Course> {
        self.store
            .find_by_name(name)
            .await?
            .ok_or_else(|| AppError::not_found("course", "name", name))
    }

    pub async fn list(&self) -> AppResult<Vec<Course>> {
        self.store.list_all().await
    }

    /// Deletes a course by name.
    ///
    /// A course still referenced by accounts or subjects cannot be removed
    /// and yields `Conflict`.
    pub async fn delete(&self, name: &str) -> AppResult<()> {
        match self.store.delete_by_name(name).await {
            Ok(0) => Err(AppError::not_found("course", "name", name)),
            Ok(_) => {
                tracing::info!(name, "Course deleted");
                Ok(())
            }
            Err(AppError::Validation { field, .. }) if field == "course_id" => {
                Err(AppError::Conflict {
                    message: format!("Course '{name}' still has accounts or subjects"),
                })
            }
            Err(e) => Err(e),
        }
    }
}
