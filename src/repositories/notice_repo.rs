//! Notice repository for async database operations.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{NewNotice, Notice};
use crate::repositories::NoticeStore;

#[derive(Clone)]
pub struct NoticeRepository {
    pool: AsyncDbPool,
}

impl NoticeRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoticeStore for NoticeRepository {
    async fn insert(&self, new_notice: NewNotice) -> AppResult<Notice> {
        use crate::schema::notices::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(notices)
            .values(&new_notice)
            .returning(Notice::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn list(&self, offset: i64, limit: i64) -> AppResult<(Vec<Notice>, i64)> {
        use crate::schema::notices::dsl::*;
        let mut conn = self.pool.get().await?;

        let rows = notices
            .order((notice_date.desc(), created_at.desc()))
            .offset(offset)
            .limit(limit)
            .select(Notice::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)?;

        let total = notices
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(AppError::from)?;

        Ok((rows, total))
    }
}
