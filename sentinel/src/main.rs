// sentinel/src/main.rs

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod server;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Setup Logging (Tracing)
    // RUST_LOG=debug sentinel serve ... pour voir les requêtes warehouse
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config_dir = cli.config_dir;

    match cli.command {
        Commands::Serve { bind } => commands::serve::execute(&config_dir, bind).await,
        Commands::Render { page, out } => commands::render::execute(&config_dir, page.into(), &out).await,
        Commands::Status { check } => commands::status::execute(&config_dir, check).await,
        Commands::Seed {
            db_path,
            last_load_minutes,
        } => commands::seed::execute(&config_dir, db_path, last_load_minutes),
    }
}
