//! Webhook notification provider implementation.
//!
//! Sends HTTP requests to the configured webhook URL using the global HTTP_CLIENT.

use super::provider::{NotificationMessage, NotificationProvider, NotificationResult};
use crate::config::WebhookSettings;
use crate::error::{AppError, AppResult};
use crate::external::client::HTTP_CLIENT;
use async_trait::async_trait;
use reqwest::{Method, Url};
use serde_json::json;
use std::time::{Duration, Instant};

/// Webhook notification provider
///
/// # Example
/// ```ignore
/// let provider = WebhookProvider::new(settings.notifier.webhook.clone());
/// let result = provider.send(&message).await?;
/// ```
pub struct WebhookProvider {
    config: WebhookSettings,
}

impl WebhookProvider {
    pub fn new(config: WebhookSettings) -> Self {
        Self { config }
    }

    fn parse_method(&self) -> Result<Method, AppError> {
        self.config
            .method
            .to_uppercase()
            .parse()
            .map_err(|_| AppError::Validation {
                field: "method".to_string(),
                reason: format!("Invalid HTTP method: {}", self.config.method),
            })
    }
}

#[async_trait]
impl NotificationProvider for WebhookProvider {
    /// Sends the message as a JSON body with the configured method, headers
    /// and timeout.
    async fn send(&self, message: &NotificationMessage) -> AppResult<NotificationResult> {
        let start = Instant::now();

        let method = self.parse_method()?;
        let mut request = HTTP_CLIENT
            .request(method, &self.config.url)
            .timeout(Duration::from_secs(self.config.timeout_seconds))
            .json(&json!({
                "title": message.title,
                "body": message.body,
                "metadata": message.metadata,
            }));

        for (key, value) in &self.config.headers {
            request = request.header(key, value);
        }

        let response = request.send().await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match response {
            Ok(resp) => {
                let status_code = resp.status().as_u16();
                let success = resp.status().is_success();
                let response_text = resp.text().await.ok();

                Ok(NotificationResult {
                    success,
                    status_code: Some(status_code),
                    response: response_text,
                    duration_ms,
                })
            }
            // Reported as a failed attempt so the log row keeps the error
            Err(e) => Ok(NotificationResult {
                success: false,
                status_code: None,
                response: Some(e.to_string()),
                duration_ms,
            }),
        }
    }

    fn name(&self) -> &'static str {
        "webhook"
    }

    /// Checks the URL is http(s) and the method parses.
    async fn validate_config(&self) -> AppResult<()> {
        let url = Url::parse(&self.config.url).map_err(|_| AppError::Validation {
            field: "url".to_string(),
            reason: "Invalid URL format".to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::Validation {
                field: "url".to_string(),
                reason: "Only HTTP(S) URLs are allowed".to_string(),
            });
        }

        self.parse_method()?;

        Ok(())
    }
}
