//! Command executor for dispatching CLI commands
//!
//! Runs after parsing and configuration loading. `serve` without
//! `--dry-run` is left to `main`, which owns the server lifecycle.

use super::handlers::{
    BootstrapArgs, BootstrapCommandHandler, MigrateCommandHandler, ServeCommandHandler,
};
use super::parser::{Cli, Commands};
use crate::config::settings::Settings;
use crate::error::{AppError, AppResult};

/// Execute a CLI command with the given settings
///
/// # Errors
/// Returns argument validation failures and errors from command handlers
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<()> {
    validate_command_args(cli)?;

    match &cli.command {
        Some(Commands::Serve { dry_run: true, .. }) => {
            ServeCommandHandler::new(settings).validate_only()
        }
        Some(Commands::Serve { .. }) | None => Ok(()),
        Some(Commands::Migrate { dry_run, rollback }) => {
            MigrateCommandHandler::new(settings)
                .execute(*dry_run, *rollback)
                .await
        }
        Some(Commands::Bootstrap {
            course,
            name,
            email,
        }) => {
            BootstrapCommandHandler::new(settings)
                .execute(BootstrapArgs {
                    course: course.clone(),
                    name: name.clone(),
                    email: email.clone(),
                })
                .await
        }
    }
}

fn validate_command_args(cli: &Cli) -> AppResult<()> {
    cli.validate().map_err(|reason| AppError::Validation {
        field: "cli_arguments".to_string(),
        reason,
    })?;

    match &cli.command {
        Some(Commands::Serve {
            host: Some(host),
            port: Some(port),
            ..
        }) if *port < 1024 && host == "0.0.0.0" => {
            eprintln!(
                "Warning: Binding to 0.0.0.0 on port {} requires root privileges",
                port
            );
        }
        Some(Commands::Migrate {
            rollback: Some(steps),
            ..
        }) if *steps > 50 => {
            eprintln!(
                "Warning: Rolling back {} migrations is a large operation. Consider using smaller steps.",
                steps
            );
        }
        _ => {}
    }

    Ok(())
}
