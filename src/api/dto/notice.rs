use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{NewNotice, Notice, NoticeAudience};

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateNoticeRequest {
    #[validate(length(min = 1, max = 255, message = "Topic must be 1-255 characters"))]
    pub topic: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    #[schema(value_type = String, format = Date, example = "2024-08-01")]
    pub notice_date: NaiveDate,
    pub notice_for: NoticeAudience,
}

impl CreateNoticeRequest {
    /// The author is the signed-in account's username.
    pub fn into_new_notice(self, author: String) -> NewNotice {
        NewNotice {
            topic: self.topic,
            content: self.content,
            notice_date: self.notice_date,
            author,
            notice_for: self.notice_for,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NoticeResponse {
    pub id: i32,
    pub topic: String,
    pub content: String,
    #[schema(value_type = String, format = Date)]
    pub notice_date: NaiveDate,
    pub author: String,
    pub notice_for: NoticeAudience,
    pub created_at: String,
}

impl From<Notice> for NoticeResponse {
    fn from(notice: Notice) -> Self {
        Self {
            id: notice.id,
            topic: notice.topic,
            content: notice.content,
            notice_date: notice.notice_date,
            author: notice.author,
            notice_for: notice.notice_for,
            created_at: notice.created_at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        }
    }
}
