//! Configuration merger for CLI arguments and config files
//!
//! CLI arguments override file and environment configuration. The merged
//! settings are validated once more before use.

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, Environment, settings::Settings};
use std::path::Path;

/// Applies CLI overrides on top of file-based configuration
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Loads the base configuration for `cli`.
    ///
    /// `--config` selects a single file, otherwise the layered loader is
    /// used. `--env` replaces the environment read from `CAMPUS_APP_ENV`.
    ///
    /// # Errors
    /// Returns ConfigError if configuration loading or validation fails
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let loader = match cli.config.as_deref() {
            Some(path) => {
                Self::validate_config_file_access(path)?;
                ConfigLoader::from_file(path)
            }
            None => ConfigLoader::new()?,
        };

        let loader = match cli.env {
            Some(env) => loader.with_environment(Environment::from(env)),
            None => loader,
        };

        Ok(Self::new(loader.load()?))
    }

    fn validate_config_file_access(path: &Path) -> Result<(), ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::ValidationError {
                field: "config_file".to_string(),
                message: format!("Configuration file does not exist: '{}'", path.display()),
            });
        }

        std::fs::File::open(path)
            .map(|_| ())
            .map_err(|e| ConfigError::ValidationError {
                field: "config_file".to_string(),
                message: format!("Cannot read configuration file '{}': {}", path.display(), e),
            })
    }

    /// Merge CLI arguments with the base configuration
    ///
    /// Precedence, highest first:
    /// 1. Command-specific flags (`serve --log-level`)
    /// 2. Global flags (`--verbose`, `--quiet`)
    /// 3. Configuration file and environment values
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        if let Some(Commands::Serve {
            host,
            port,
            log_level,
            ..
        }) = &cli.command
        {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
            if let Some(level) = log_level {
                config.logger.level = level.clone().into();
            }
        }

        config.validate()?;

        Ok(config)
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn merger() -> ConfigurationMerger {
        let mut config = Settings::default();
        config.database.url = "postgres://localhost/campus_test".to_string();
        ConfigurationMerger::new(config)
    }

    fn merge(args: &[&str]) -> Settings {
        let cli = Cli::try_parse_from(args).unwrap();
        merger().merge_cli_args(&cli).unwrap()
    }

    #[test]
    fn test_global_log_flags() {
        assert_eq!(merge(&["campus-records", "--verbose"]).logger.level, "debug");
        assert_eq!(merge(&["campus-records", "--quiet"]).logger.level, "error");
    }

    #[test]
    fn test_serve_overrides_host_and_port() {
        let config = merge(&[
            "campus-records",
            "serve",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
        ]);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_command_log_level_overrides_global() {
        let config = merge(&["campus-records", "--verbose", "serve", "--log-level", "warn"]);
        assert_eq!(config.logger.level, "warn");
    }

    #[test]
    fn test_bootstrap_keeps_file_settings() {
        let config = merge(&[
            "campus-records",
            "bootstrap",
            "--course",
            "BCA",
            "--name",
            "Asha Rao",
            "--email",
            "asha@college.edu",
        ]);
        assert_eq!(config, *merger().config());
    }

    #[test]
    fn test_missing_config_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");

        let result = ConfigurationMerger::validate_config_file_access(&missing);
        assert!(matches!(
            result,
            Err(ConfigError::ValidationError { ref field, .. }) if field == "config_file"
        ));
    }
}
