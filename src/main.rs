// Medcart - Prescription cart pricing engine
// Copyright (c) 2025 Medcart Contributors
// Licensed under the MIT License

use clap::Parser;
use medcart::cli::{Cli, Commands};
use medcart::config::{load_config, LoggingConfig};
use medcart::logging::init_logging;
use std::path::Path;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Logging settings come from the config file when it loads; a broken
    // file is reported by the command itself.
    let config = Path::new(&cli.config)
        .exists()
        .then(|| load_config(&cli.config).ok())
        .flatten();
    let logging_config = config
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_else(LoggingConfig::default);
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| config.as_ref().map(|c| c.application.log_level.clone()))
        .unwrap_or_else(|| "info".to_string());

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        "Medcart - Prescription cart pricing engine"
    );

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5 // Fatal error exit code
        }
    };

    // process::exit skips destructors, so flush file logs first
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Init(args) => args.execute().await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Seed(args) => args.execute(&cli.config).await,
        Commands::ImportPrescription(args) => args.execute(&cli.config).await,
        Commands::BuildCart(args) => args.execute(&cli.config).await,
        Commands::PlaceOrder(args) => args.execute(&cli.config).await,
        Commands::Inventory(args) => args.execute(&cli.config).await,
        Commands::PricingRules(args) => args.execute(&cli.config).await,
    }
}
