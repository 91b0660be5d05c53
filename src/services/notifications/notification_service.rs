//! Welcome notifications for newly registered accounts.
//!
//! Every attempt is written to `notification_logs`, successful or not. A
//! failed log write is reported on its own and never changes the delivery
//! outcome.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::log_provider::LogProvider;
use super::provider::{NotificationMessage, NotificationProvider};
use super::webhook_provider::WebhookProvider;
use crate::config::{NotifierConfig, NotifierProvider};
use crate::error::{AppError, AppResult};
use crate::models::{Account, NewNotificationLog, NotificationLog, NotificationStatus};
use crate::repositories::NotificationLogRepository;

/// Delivers the welcome message for a freshly created account.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn welcome(&self, account: &Account, one_time_password: &str) -> AppResult<()>;
}

/// Builds the welcome message carrying the allocated username and the
/// one-time password.
pub fn welcome_message(account: &Account, one_time_password: &str) -> NotificationMessage {
    let body = format!(
        "Hello {}, your {} account has been created.\n\
         Username: {}\n\
         One-time password: {}\n\
         Please change your password after the first login.",
        account.name, account.role, account.username, one_time_password
    );

    let mut metadata = HashMap::new();
    metadata.insert("email".to_string(), account.email.clone());
    metadata.insert("username".to_string(), account.username.clone());
    metadata.insert("role".to_string(), account.role.to_string());

    NotificationMessage {
        title: Some("Welcome to Campus Records".to_string()),
        body,
        metadata,
    }
}

/// Picks the provider named in configuration
pub fn provider_from_config(config: &NotifierConfig) -> Arc<dyn NotificationProvider> {
    match config.provider {
        NotifierProvider::Log => Arc::new(LogProvider),
        NotifierProvider::Webhook => Arc::new(WebhookProvider::new(config.webhook.clone())),
    }
}

#[derive(Clone)]
pub struct NotificationService {
    provider: Arc<dyn NotificationProvider>,
    log_repo: NotificationLogRepository,
}

impl NotificationService {
    pub fn new(
        provider: Arc<dyn NotificationProvider>,
        log_repo: NotificationLogRepository,
    ) -> Self {
        Self { provider, log_repo }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Checks the configured provider, used at startup.
    pub async fn validate(&self) -> AppResult<()> {
        self.provider.validate_config().await
    }

    /// Notification history for one account, newest first
    pub async fn history(
        &self,
        account_id: i32,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<NotificationLog>, i64)> {
        self.log_repo.find_by_account_id(account_id, offset, limit).await
    }
}

#[async_trait]
impl Notifier for NotificationService {
    async fn welcome(&self, account: &Account, one_time_password: &str) -> AppResult<()> {
        let message = welcome_message(account, one_time_password);

        let (status, error_message) = match self.provider.send(&message).await {
            Ok(result) if result.success => (NotificationStatus::Sent, None),
            Ok(result) => (
                NotificationStatus::Failed,
                Some(result.response.unwrap_or_else(|| {
                    format!("status {}", result.status_code.unwrap_or_default())
                })),
            ),
            Err(e) => (NotificationStatus::Failed, Some(e.to_string())),
        };

        // The stored body omits the password
        let stored = format!("{} <{}>", message.title.unwrap_or_default(), account.username);
        let log_entry = NewNotificationLog {
            account_id: Some(account.id),
            provider: self.provider.name().to_string(),
            message: stored,
            status,
            error_message: error_message.clone(),
        };
        if let Err(e) = self.log_repo.create(log_entry).await {
            tracing::warn!(
                username = %account.username,
                provider = self.provider.name(),
                delivered = error_message.is_none(),
                error = %e,
                "Failed to record notification attempt"
            );
        }

        match error_message {
            None => Ok(()),
            Some(reason) => Err(AppError::Internal {
                source: anyhow::anyhow!(
                    "{} notification to {} failed: {}",
                    self.provider.name(),
                    account.username,
                    reason
                ),
            }),
        }
    }
}
