//! `roster` entry point.

use clap::Parser;

use roster_cli::{cli::Cli, commands, config::Config};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli);

    roster_observability::init(&config.log);
    tracing::debug!(
        store = %config.store,
        data = %config.data_path.display(),
        "configuration loaded"
    );

    if let Err(e) = commands::execute(cli.command, &config).await {
        tracing::error!("command failed: {e:#}");
        std::process::exit(1);
    }
}
