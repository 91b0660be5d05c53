//! Command handlers for CLI operations
//!
//! Each handler owns the merged settings and performs one subcommand.

pub mod bootstrap;
pub mod migrate;
pub mod serve;

pub use bootstrap::{BootstrapArgs, BootstrapCommandHandler};
pub use migrate::MigrateCommandHandler;
pub use serve::ServeCommandHandler;
