//! Notification history DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{NotificationLog, NotificationStatus};

/// One delivery attempt
#[derive(Debug, Serialize, ToSchema)]
pub struct LogResponse {
    pub id: i64,
    #[schema(example = "webhook")]
    pub provider: String,
    pub message: String,
    pub status: NotificationStatus,
    pub error_message: Option<String>,
    #[schema(example = "2024-01-20T14:45:30.000Z")]
    pub sent_at: String,
}

impl From<NotificationLog> for LogResponse {
    fn from(log: NotificationLog) -> Self {
        Self {
            id: log.id,
            provider: log.provider,
            message: log.message,
            status: log.status,
            error_message: log.error_message,
            sent_at: log.sent_at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        }
    }
}
