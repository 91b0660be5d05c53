//! Notification system with pluggable providers.
//!
//! `NotificationProvider` abstracts the delivery channel; `NotificationService`
//! uses it to send welcome messages and record each attempt.

mod log_provider;
mod provider;
mod webhook_provider;

pub mod notification_service;

pub use log_provider::LogProvider;
pub use notification_service::{
    NotificationService, Notifier, provider_from_config, welcome_message,
};
pub use provider::{NotificationMessage, NotificationProvider, NotificationResult};
pub use webhook_provider::WebhookProvider;
