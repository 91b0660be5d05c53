use campus_records::cli::{
    Cli, execute_command, init_logger_from_settings, load_and_merge_config,
};
use campus_records::config::Environment;
use campus_records::server::Server;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_and_merge_config(&cli)?;
    let _log_handle = init_logger_from_settings(&settings)?;

    execute_command(&cli, settings.clone()).await?;

    if cli.starts_server() {
        let environment = cli.env.map_or_else(Environment::from_env, Environment::from);
        Server::new(settings, environment).run().await?;
    }

    Ok(())
}
