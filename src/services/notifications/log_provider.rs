//! Provider that only emits a tracing event. Default for development.

use super::provider::{NotificationMessage, NotificationProvider, NotificationResult};
use crate::error::AppResult;
use async_trait::async_trait;

pub struct LogProvider;

#[async_trait]
impl NotificationProvider for LogProvider {
    async fn send(&self, message: &NotificationMessage) -> AppResult<NotificationResult> {
        tracing::info!(
            title = message.title.as_deref().unwrap_or_default(),
            recipient = message.metadata.get("email").map(String::as_str).unwrap_or_default(),
            "Notification delivered to log"
        );
        Ok(NotificationResult {
            success: true,
            status_code: None,
            response: None,
            duration_ms: 0,
        })
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_log_provider_always_succeeds() {
        let message = NotificationMessage {
            title: Some("Welcome".to_string()),
            body: "hello".to_string(),
            metadata: HashMap::new(),
        };
        let result = LogProvider.send(&message).await.unwrap();
        assert!(result.success);
        assert_eq!(LogProvider.name(), "log");
        assert!(LogProvider.validate_config().await.is_ok());
    }
}
