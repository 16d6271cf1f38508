//! Init command implementation
//!
//! Writes a starter `medcart.toml`.

use crate::cli::commands::context::{EXIT_CONFIG, EXIT_FATAL, EXIT_OK};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "medcart.toml")]
    pub output: String,

    /// Include comments explaining every setting
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Medcart configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        let content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your vendors and location", self.output);
                println!("  2. Optionally set MEDCART_QUOTE_API_KEY for the quote service");
                println!("  3. Validate configuration: medcart validate-config");
                println!("  4. Seed vendor data: medcart seed");
                println!();
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }

    fn generate_minimal_config() -> String {
        r#"# Medcart Configuration File

[application]
log_level = "info"
currency = "INR"

[vendors]
ids = ["site-a", "site-b", "site-c"]

[store]
snapshot_path = "./data/medcart.json"
max_concurrent_reads = 16

# [quote]
# base_url = "https://quotes.example.com"
# api_key = "${MEDCART_QUOTE_API_KEY}"
# timeout_seconds = 15

[delivery]
customer_lat = 19.076
customer_lng = 72.8777
average_speed_kmh = 25.0
window_minutes = 20

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    fn generate_config_with_examples() -> String {
        r#"# Medcart Configuration File
#
# Every setting has a default, so any section may be omitted.
# Values of the form ${VAR} are read from the environment, and
# MEDCART_<SECTION>_<KEY> variables override the file.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Currency every cart is priced in (3-letter ISO code)
currency = "INR"

# ============================================================================
# Vendors
# ============================================================================
[vendors]
# Canonical vendor order. On equal totals or equal unit prices the
# vendor listed first wins.
ids = ["site-a", "site-b", "site-c"]

# ============================================================================
# Document Store
# ============================================================================
[store]
# JSON snapshot loaded on start and rewritten after each command.
# Remove to keep everything in memory.
snapshot_path = "./data/medcart.json"

# Maximum inventory reads in flight at once (1-256)
max_concurrent_reads = 16

# ============================================================================
# Real-time Quote Service
# ============================================================================
# Leave base_url unset to always price locally.
[quote]
# base_url = "https://quotes.example.com"

# Bearer token (use an environment variable)
# api_key = "${MEDCART_QUOTE_API_KEY}"

# Request timeout in seconds (1-60)
timeout_seconds = 15

# ============================================================================
# Delivery Estimation
# ============================================================================
[delivery]
# Customer location in decimal degrees
customer_lat = 19.076
customer_lng = 72.8777

# Average courier speed
average_speed_kmh = 25.0

# Width of the promised delivery window in minutes
window_minutes = 20

# ============================================================================
# Logging
# ============================================================================
[logging]
# JSON log files in addition to console output
local_enabled = false

# Log directory
local_path = "./logs"

# Rotation (daily or hourly)
local_rotation = "daily"
"#
        .to_string()
    }
}
