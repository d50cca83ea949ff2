//! Market signal CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use signal_config::load_config;
use signal_engine::RunMode;
use signal_monitor::setup_logging;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Commands::ValidateConfig = cli.command {
        return cli::commands::validate::run(&cli.config).await;
    }

    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

    let level = cli
        .log_level
        .map(|l| l.as_str().to_string())
        .unwrap_or_else(|| config.logging.level.clone());
    let json = cli.json_logs || config.logging.is_json();
    let log_dir = config.logging.file.as_deref().map(Path::new);
    let _guard = setup_logging(&level, json, log_dir)
        .with_context(|| format!("failed to open log directory {:?}", log_dir))?;

    config.validate()?;

    match cli.command {
        Commands::Run(args) => cli::commands::run_loop::run(args, &config, None).await,
        Commands::Watch(args) => {
            cli::commands::run_loop::run(args, &config, Some(RunMode::Continuous)).await
        }
        Commands::Signal(args) => cli::commands::run_loop::run(args, &config, Some(RunMode::Confirm)).await,
        Commands::Analyze(args) => cli::commands::analyze::run(args, &config).await,
        Commands::Gainers(args) => cli::commands::gainers::run(args, &config).await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config).await,
    }
}
