//! CLI argument parsing with clap
//!
//! This module defines the command-line interface structure using clap,
//! including all commands, arguments, and their documentation.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::build;

/// Campus records server: accounts, courses, subjects and notices
#[derive(Parser, Debug)]
#[command(name = "campus-records")]
#[command(about = "Campus records server: accounts, courses, subjects and notices")]
#[command(long_about = "
campus-records serves the college records API. It registers admins, faculty
and students under role-prefixed usernames, keeps the course and subject
catalogue, and publishes notices.

EXAMPLES:
    # Start the server with default configuration
    campus-records serve

    # Start server on custom host and port
    campus-records serve --host 0.0.0.0 --port 8080

    # Use custom configuration file
    campus-records --config /etc/campus-records/production.toml serve

    # Check configuration without starting server
    campus-records serve --dry-run

    # Run database migrations
    campus-records migrate

    # Preview pending migrations
    campus-records migrate --dry-run

    # Create the first course and admin account
    campus-records bootstrap --course BCA --name 'Asha Rao' --email asha@college.edu
")]
#[command(version = build::CLAP_LONG_VERSION)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// Loads a single TOML file instead of the layered `config/` directory.
    /// `CAMPUS_*` environment variables still override it.
    ///
    /// Example: --config /etc/campus-records/production.toml
    #[arg(
        short,
        long,
        value_name = "FILE",
        value_parser = super::validation::validate_config_file_path
    )]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Selects which `{environment}.toml` layer is loaded. Takes precedence
    /// over `CAMPUS_APP_ENV`.
    ///
    /// Available values: development (dev), production (prod), test
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose logging (debug level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web server (default)
    ///
    /// Examples:
    ///   campus-records serve                           # Start with defaults
    ///   campus-records serve --host 0.0.0.0 --port 80 # Bind to all interfaces on port 80
    ///   campus-records serve --dry-run                 # Validate config without starting
    Serve {
        /// Host address to bind to
        ///
        /// Use 127.0.0.1 for localhost only, or 0.0.0.0 to accept connections from any interface.
        #[arg(
            long,
            value_name = "ADDRESS",
            value_parser = super::validation::validate_host_address
        )]
        host: Option<String>,

        /// Port number to listen on
        #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
        port: Option<u16>,

        /// Log level override
        ///
        /// Overrides both configuration file settings and global --verbose/--quiet flags.
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate configuration and exit
        #[arg(long)]
        dry_run: bool,
    },
    /// Database migration operations
    ///
    /// Examples:
    ///   campus-records migrate                    # Apply all pending migrations
    ///   campus-records migrate --dry-run          # Show pending migrations without applying
    ///   campus-records migrate --rollback 3       # Rollback the last 3 migrations
    Migrate {
        /// Show pending migrations without applying
        #[arg(long, conflicts_with = "rollback")]
        dry_run: bool,

        /// Number of migrations to rollback (1-100)
        ///
        /// Reverting migrations drops tables and the records in them.
        #[arg(
            long,
            value_name = "STEPS",
            conflicts_with = "dry_run",
            value_parser = super::validation::validate_rollback_steps
        )]
        rollback: Option<u32>,
    },
    /// Create the first course and admin account
    ///
    /// The course is created only if no course with that name exists. The
    /// admin's username and one-time password are printed once.
    ///
    /// Example:
    ///   campus-records bootstrap --course BCA --name 'Asha Rao' --email asha@college.edu
    Bootstrap {
        /// Course name for the first admin
        #[arg(long, value_name = "NAME", value_parser = super::validation::validate_non_empty)]
        course: String,

        /// Admin's full name
        #[arg(long, value_name = "NAME", value_parser = super::validation::validate_non_empty)]
        name: String,

        /// Admin's email address
        #[arg(long, value_name = "EMAIL", value_parser = super::validation::validate_email)]
        email: String,
    },
}

/// Environment options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "production", alias = "prod")]
    Production,
    #[value(name = "test")]
    Test,
}

/// Log level options
#[derive(ValueEnum, Clone, Debug)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

impl Cli {
    /// Checks argument combinations clap cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(Commands::Migrate {
            dry_run: true,
            rollback: Some(_),
        }) = self.command
        {
            return Err("Cannot use --dry-run and --rollback together".to_string());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use --verbose and --quiet together".to_string());
        }

        Ok(())
    }

    /// True when the server should be started after command handling.
    pub fn starts_server(&self) -> bool {
        matches!(
            self.command,
            None | Some(Commands::Serve { dry_run: false, .. })
        )
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => "error".to_string(),
            LogLevel::Warn => "warn".to_string(),
            LogLevel::Info => "info".to_string(),
            LogLevel::Debug => "debug".to_string(),
            LogLevel::Trace => "trace".to_string(),
        }
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Production => crate::config::Environment::Production,
            Environment::Test => crate::config::Environment::Test,
        }
    }
}
