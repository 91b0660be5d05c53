//! Notification log repository for async database operations.
//!
//! Provides operations for notification_logs table.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{NewNotificationLog, NotificationLog};

/// Notification log repository
#[derive(Clone)]
pub struct NotificationLogRepository {
    pool: AsyncDbPool,
}

impl NotificationLogRepository {
    /// Creates a new NotificationLogRepository with the given connection pool.
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    /// Creates a new notification log entry
    ///
    /// # Arguments
    /// * `new_log` - The log data to insert
    ///
    /// # Returns
    /// The created notification log with generated id and timestamp
    pub async fn create(&self, new_log: NewNotificationLog) -> AppResult<NotificationLog> {
        use crate::schema::notification_logs::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(notification_logs)
            .values(&new_log)
            .returning(NotificationLog::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Finds logs for one account, newest first
    ///
    /// # Returns
    /// Tuple of (logs, total count for the account)
    pub async fn find_by_account_id(
        &self,
        aid: i32,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<NotificationLog>, i64)> {
        use crate::schema::notification_logs::dsl::*;
        let mut conn = self.pool.get().await?;

        let logs = notification_logs
            .filter(account_id.eq(aid))
            .order(sent_at.desc())
            .offset(offset)
            .limit(limit)
            .select(NotificationLog::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)?;

        let total = notification_logs
            .filter(account_id.eq(aid))
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(AppError::from)?;

        Ok((logs, total))
    }
}
