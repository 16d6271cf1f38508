//! Configuration management for Medcart.
//!
//! Medcart reads an optional TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `MEDCART_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use medcart::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("medcart.toml")?;
//! println!("Vendors: {:?}", config.vendors.ids);
//! println!("Quote service enabled: {}", config.quote.is_enabled());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and cart currency
//! - [`VendorsConfig`] - Canonical vendor order
//! - [`StoreConfig`] - Snapshot file and read fan-out
//! - [`QuoteConfig`] - Real-time quote service
//! - [`DeliveryConfig`] - Customer location and courier speed
//! - [`LoggingConfig`] - Local JSON log files
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//! currency = "INR"
//!
//! [vendors]
//! ids = ["site-a", "site-b", "site-c"]
//!
//! [store]
//! snapshot_path = "./medcart-data.json"
//!
//! [quote]
//! base_url = "https://quotes.example.com"
//! api_key = "${MEDCART_QUOTE_API_KEY}"
//! timeout_seconds = 15
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, load_config_or_default, parse_config};
pub use schema::{
    ApplicationConfig, DeliveryConfig, LoggingConfig, MedcartConfig, QuoteConfig, StoreConfig,
    VendorsConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
