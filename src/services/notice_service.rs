use std::sync::Arc;

use crate::error::AppResult;
use crate::models::{NewNotice, Notice};
use crate::repositories::NoticeStore;

/// Notice board.
///
/// Duplicates of (topic, content, notice_date) are rejected by the store
/// and surface as `AppError::Duplicate`.
#[derive(Clone)]
pub struct NoticeService {
    store: Arc<dyn NoticeStore>,
}

impl NoticeService {
    pub fn new(store: Arc<dyn NoticeStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, new_notice: NewNotice) -> AppResult<Notice> {
        let notice = self.store.insert(new_notice).await?;
        tracing::info!(
            id = notice.id,
            author = %notice.author,
            notice_for = ?notice.notice_for,
            "Notice published"
        );
        Ok(notice)
    }

    /// Newest first.
    ///
    /// # Returns
    /// A tuple of (notices, total_count)
    pub async fn list(&self, offset: i64, limit: i64) -> AppResult<(Vec<Notice>, i64)> {
        self.store.list(offset, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::middleware::error_to_status_code;
    use crate::models::NoticeAudience;
    use crate::repositories::memory::InMemoryStore;
    use axum::http::StatusCode;
    use chrono::NaiveDate;

    fn notice(topic: &str, day: u32) -> NewNotice {
        NewNotice {
            topic: topic.to_string(),
            content: "Classes resume on Monday".to_string(),
            notice_date: NaiveDate::from_ymd_opt(2024, 7, day).unwrap(),
            author: "ADM20240100".to_string(),
            notice_for: NoticeAudience::All,
        }
    }

    #[tokio::test]
    async fn test_repeated_notice_is_a_conflict() {
        let service = NoticeService::new(Arc::new(InMemoryStore::new()));
        service.create(notice("Holiday", 1)).await.unwrap();

        let err = service.create(notice("Holiday", 1)).await.unwrap_err();
        assert!(matches!(err, crate::error::AppError::Duplicate { .. }));
        assert_eq!(error_to_status_code(&err), StatusCode::CONFLICT);

        // Same text on another day is a new notice.
        service.create(notice("Holiday", 2)).await.unwrap();
        let (_, total) = service.list(0, 10).await.unwrap();
        assert_eq!(total, 2);
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_paged() {
        let service = NoticeService::new(Arc::new(InMemoryStore::new()));
        for (topic, day) in [("Fees", 3), ("Exams", 9), ("Sports", 5)] {
            service.create(notice(topic, day)).await.unwrap();
        }

        let (page, total) = service.list(0, 2).await.unwrap();
        let topics: Vec<&str> = page.iter().map(|n| n.topic.as_str()).collect();
        assert_eq!(topics, vec!["Exams", "Sports"]);
        assert_eq!(total, 3);

        let (rest, _) = service.list(2, 2).await.unwrap();
        assert_eq!(rest[0].topic, "Fees");
    }
}
