//! Configuration validation logic
//!
//! This module provides validation methods for all configuration structures
//! to ensure configuration values are within acceptable ranges and formats.

use crate::config::error::ConfigError;
use crate::config::settings::{
    DatabaseConfig, FileSettings, LoggerSettings, NotifierConfig, NotifierProvider,
    RegistrationConfig, ServerConfig, Settings,
};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

/// Valid webhook methods
const VALID_WEBHOOK_METHODS: &[&str] = &["POST", "PUT", "PATCH"];

/// Upper bound for `registration.max_allocation_attempts`
const MAX_ALLOCATION_ATTEMPTS: u32 = 10;

impl ServerConfig {
    /// Validate server configuration
    ///
    /// # Validation Rules
    /// - Port must be between 1 and 65535
    /// - Request timeout must be greater than 0
    /// - Keep-alive timeout must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        if self.keep_alive_timeout == 0 {
            return Err(ConfigError::validation(
                "server.keep_alive_timeout",
                "Keep-alive timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl DatabaseConfig {
    /// Validate database configuration
    ///
    /// # Validation Rules
    /// - URL must be a PostgreSQL connection string
    /// - Min and max connections must be greater than 0, min not above max
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::validation(
                "database.url",
                "Database URL is required. Please specify a valid database connection string.",
            ));
        }

        if !(self.url.starts_with("postgres://") || self.url.starts_with("postgresql://")) {
            return Err(ConfigError::validation(
                "database.url",
                "Invalid database URL format. Expected format: postgres://[user:password@]host[:port]/database",
            ));
        }

        if self.max_connections == 0 {
            return Err(ConfigError::validation(
                "database.max_connections",
                "Max connections must be greater than 0.",
            ));
        }

        if self.min_connections == 0 {
            return Err(ConfigError::validation(
                "database.min_connections",
                "Min connections must be greater than 0.",
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(ConfigError::ValidationError {
                field: "database.min_connections".to_string(),
                message: format!(
                    "Min connections ({}) cannot exceed max connections ({}).",
                    self.min_connections, self.max_connections
                ),
            });
        }

        Ok(())
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        self.file.validate()
    }
}

impl RegistrationConfig {
    /// Validate registration settings
    ///
    /// # Validation Rules
    /// - A default password is required unless passwords are generated
    /// - Allocation attempts must be between 1 and 10
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.generate_one_time_password && self.default_password.len() < 8 {
            return Err(ConfigError::validation(
                "registration.default_password",
                "Default password must be at least 8 characters.",
            ));
        }

        if self.max_allocation_attempts == 0
            || self.max_allocation_attempts > MAX_ALLOCATION_ATTEMPTS
        {
            return Err(ConfigError::ValidationError {
                field: "registration.max_allocation_attempts".to_string(),
                message: format!(
                    "Allocation attempts must be between 1 and {}.",
                    MAX_ALLOCATION_ATTEMPTS
                ),
            });
        }

        Ok(())
    }
}

impl NotifierConfig {
    /// Validate notifier settings. Webhook fields are only checked when the
    /// webhook provider is selected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider != NotifierProvider::Webhook {
            return Ok(());
        }

        let url = self.webhook.url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::validation(
                "notifier.webhook.url",
                "Webhook URL must start with http:// or https://",
            ));
        }

        if !VALID_WEBHOOK_METHODS.contains(&self.webhook.method.to_uppercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "notifier.webhook.method".to_string(),
                message: format!(
                    "Invalid webhook method '{}'. Valid methods are: {}",
                    self.webhook.method,
                    VALID_WEBHOOK_METHODS.join(", ")
                ),
            });
        }

        if self.webhook.timeout_seconds == 0 {
            return Err(ConfigError::validation(
                "notifier.webhook.timeout_seconds",
                "Webhook timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl Settings {
    /// Validate all configuration settings
    ///
    /// Returns the first validation error encountered. JWT settings are
    /// validated separately when the server starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.logger.validate()?;
        self.registration.validate()?;
        self.notifier.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.database.url = "postgres://localhost/campus".to_string();
        settings
    }

    #[test]
    fn test_server_config_invalid_port_zero() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.field(), Some("server.port"));
    }

    #[test]
    fn test_database_config_requires_postgres() {
        let mut config = DatabaseConfig::default();
        assert_eq!(config.validate().unwrap_err().field(), Some("database.url"));

        config.url = "mysql://localhost/db".to_string();
        assert_eq!(config.validate().unwrap_err().field(), Some("database.url"));

        for url in ["postgres://localhost/db", "postgresql://u:p@host:5432/db"] {
            config.url = url.to_string();
            assert!(config.validate().is_ok(), "{url} should be accepted");
        }
    }

    #[test]
    fn test_database_config_min_exceeds_max() {
        let config = DatabaseConfig {
            url: "postgres://localhost/db".to_string(),
            max_connections: 2,
            min_connections: 5,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.field(), Some("database.min_connections"));
        assert!(err.to_string().contains("cannot exceed"));
    }

    #[test]
    fn test_logger_settings_invalid_level_and_format() {
        let mut settings = LoggerSettings {
            level: "loud".to_string(),
            ..Default::default()
        };
        assert_eq!(settings.validate().unwrap_err().field(), Some("logger.level"));

        settings.level = "INFO".to_string();
        settings.file.format = "xml".to_string();
        assert_eq!(
            settings.validate().unwrap_err().field(),
            Some("logger.file.format")
        );
    }

    #[test]
    fn test_logger_settings_file_enabled_empty_path() {
        let mut settings = LoggerSettings::default();
        settings.file.enabled = true;
        settings.file.path = "  ".to_string();
        assert_eq!(settings.validate().unwrap_err().field(), Some("logger.file.path"));
    }

    #[test]
    fn test_registration_attempt_bounds() {
        let mut config = RegistrationConfig::default();
        assert!(config.validate().is_ok());

        config.max_allocation_attempts = 0;
        assert!(config.validate().is_err());
        config.max_allocation_attempts = 11;
        assert!(config.validate().is_err());
        config.max_allocation_attempts = 10;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_registration_short_password_allowed_when_generated() {
        let mut config = RegistrationConfig {
            default_password: "abc".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.validate().unwrap_err().field(),
            Some("registration.default_password")
        );
        config.generate_one_time_password = true;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_notifier_webhook_requires_http_url() {
        let mut config = NotifierConfig::default();
        assert!(config.validate().is_ok());

        config.provider = NotifierProvider::Webhook;
        assert_eq!(
            config.validate().unwrap_err().field(),
            Some("notifier.webhook.url")
        );

        config.webhook.url = "https://hooks.example.com/welcome".to_string();
        assert!(config.validate().is_ok());

        config.webhook.method = "GET".to_string();
        assert_eq!(
            config.validate().unwrap_err().field(),
            Some("notifier.webhook.method")
        );
    }

    #[test]
    fn test_settings_valid_and_invalid() {
        let mut settings = valid_settings();
        assert!(settings.validate().is_ok());

        settings.registration.max_allocation_attempts = 0;
        assert_eq!(
            settings.validate().unwrap_err().field(),
            Some("registration.max_allocation_attempts")
        );
    }
}
