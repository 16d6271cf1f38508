//! Validate config command implementation

use crate::cli::commands::context::{EXIT_CONFIG, EXIT_OK};
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// Loading already validates, so a loaded configuration is a valid one.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(EXIT_CONFIG);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Currency: {}", config.application.currency);
        println!("  Vendors: {}", config.vendors.ids.join(", "));
        println!(
            "  Store: {}",
            config
                .store
                .snapshot_path
                .as_deref()
                .unwrap_or("in-memory only")
        );
        println!("  Max Concurrent Reads: {}", config.store.max_concurrent_reads);
        match config.quote.base_url.as_deref() {
            Some(url) if config.quote.is_enabled() => {
                println!("  Quote Service: {url}");
                println!(
                    "  Quote API Key: {}",
                    if config.quote.api_key.is_some() { "set" } else { "not set" }
                );
            }
            _ => println!("  Quote Service: disabled (local pricing)"),
        }
        println!(
            "  Customer Location: {}, {}",
            config.delivery.customer_lat, config.delivery.customer_lng
        );
        println!("  Courier Speed: {} km/h", config.delivery.average_speed_kmh);
        println!();
        Ok(EXIT_OK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_validate_reports_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[vendors]\nids = []\n").unwrap();
        file.flush().unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, EXIT_CONFIG);
    }

    #[tokio::test]
    async fn test_validate_accepts_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, EXIT_OK);
    }

    #[tokio::test]
    async fn test_validate_missing_file() {
        let code = ValidateArgs {}
            .execute("does-not-exist-medcart.toml")
            .await
            .unwrap();
        assert_eq!(code, EXIT_CONFIG);
    }
}
