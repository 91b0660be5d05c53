//! Course repository for async database operations.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{Course, NewCourse};
use crate::repositories::CourseStore;

#[derive(Clone)]
pub struct CourseRepository {
    pool: AsyncDbPool,
}

impl CourseRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, course_id: i32) -> AppResult<Option<Course>> {
        use crate::schema::courses::dsl::*;
        let mut conn = self.pool.get().await?;

        courses
            .filter(id.eq(course_id))
            .select(Course::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }
}

#[async_trait]
impl CourseStore for CourseRepository {
    async fn find_by_name(&self, course_name: &str) -> AppResult<Option<Course>> {
        use crate::schema::courses::dsl::*;
        let mut conn = self.pool.get().await?;

        courses
            .filter(name.eq(course_name))
            .select(Course::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn count(&self) -> AppResult<u64> {
        use crate::schema::courses::dsl::*;
        let mut conn = self.pool.get().await?;

        let total: i64 = courses
            .count()
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)?;
        Ok(total.max(0) as u64)
    }

    async fn insert(&self, new_course: NewCourse) -> AppResult<Course> {
        use crate::schema::courses::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(courses)
            .values(&new_course)
            .returning(Course::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn list_all(&self) -> AppResult<Vec<Course>> {
        use crate::schema::courses::dsl::*;
        let mut conn = self.pool.get().await?;

        courses
            .order(id.asc())
            .select(Course::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn delete_by_name(&self, course_name: &str) -> AppResult<usize> {
        use crate::schema::courses::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::delete(courses.filter(name.eq(course_name)))
            .execute(&mut conn)
            .await
            .map_err(AppError::from)
    }
}
