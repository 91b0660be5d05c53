//! Serve command handler
//!
//! Only the dry run is handled here; the server itself is started by
//! `main` once command handling returns.

use crate::config::settings::Settings;
use crate::error::AppResult;

pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Validates the configuration without binding or connecting.
    ///
    /// # Errors
    /// Returns the first configuration or JWT validation failure
    pub fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;
        self.config.jwt.validate()?;
        self.config.logger.clone().into_logger_config()?;

        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", self.config.server.address());
        println!(
            "✓ Usernames allocated with up to {} attempt(s)",
            self.config.registration.max_allocation_attempts
        );
        println!(
            "✓ Welcome messages sent via the '{}' notifier",
            self.config.notifier.provider.as_str()
        );
        println!("Dry run completed successfully - configuration is ready for deployment");
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Settings {
        let mut config = Settings::default();
        config.database.url = "postgres://localhost/campus_test".to_string();
        config.jwt.secret = "serve_dry_run_secret_0123456789abcdef".to_string();
        config
    }

    #[test]
    fn test_dry_run_accepts_valid_config() {
        let handler = ServeCommandHandler::new(valid_config());
        assert!(handler.validate_only().is_ok());
    }

    #[test]
    fn test_dry_run_rejects_port_zero() {
        let mut config = valid_config();
        config.server.port = 0;
        let handler = ServeCommandHandler::new(config);
        assert!(handler.validate_only().is_err());
    }

    #[test]
    fn test_dry_run_rejects_short_jwt_secret() {
        let mut config = valid_config();
        config.jwt.secret = "short".to_string();
        assert!(ServeCommandHandler::new(config).validate_only().is_err());
    }
}
