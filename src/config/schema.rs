//! Configuration schema types
//!
//! This module defines the configuration structure for Medcart. Every
//! section has defaults, so an empty file is a valid configuration.

use crate::config::SecretString;
use crate::domain::{GeoPoint, VendorId};
use serde::{Deserialize, Serialize};

/// Main Medcart configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MedcartConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Canonical vendor list
    #[serde(default)]
    pub vendors: VendorsConfig,

    /// Document store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Real-time quote service settings
    #[serde(default)]
    pub quote: QuoteConfig,

    /// Delivery estimation settings
    #[serde(default)]
    pub delivery: DeliveryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl MedcartConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.vendors.validate()?;
        self.store.validate()?;
        self.quote.validate()?;
        self.delivery.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Currency all carts are priced in
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            currency: default_currency(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(format!(
                "Invalid currency '{}'. Expected a 3-letter ISO code",
                self.currency
            ));
        }
        Ok(())
    }
}

/// Canonical vendor list
///
/// The order of `ids` is the tie-break order: among equal totals or equal
/// unit prices, the vendor listed first wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorsConfig {
    #[serde(default = "default_vendor_ids")]
    pub ids: Vec<String>,
}

impl Default for VendorsConfig {
    fn default() -> Self {
        Self {
            ids: default_vendor_ids(),
        }
    }
}

impl VendorsConfig {
    /// Parses the configured ids in canonical order
    ///
    /// # Errors
    ///
    /// Returns an error if an id is empty.
    pub fn vendor_ids(&self) -> Result<Vec<VendorId>, String> {
        self.ids.iter().map(VendorId::new).collect()
    }

    fn validate(&self) -> Result<(), String> {
        if self.ids.is_empty() {
            return Err("vendors.ids must list at least one vendor".to_string());
        }
        let ids = self.vendor_ids()?;
        for (i, id) in ids.iter().enumerate() {
            if ids[..i].contains(id) {
                return Err(format!("vendors.ids contains duplicate '{id}'"));
            }
        }
        Ok(())
    }
}

/// Document store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON snapshot backing the in-memory store; absent = purely in-memory
    #[serde(default)]
    pub snapshot_path: Option<String>,

    /// Maximum inventory point reads in flight at once
    #[serde(default = "default_max_concurrent_reads")]
    pub max_concurrent_reads: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            snapshot_path: None,
            max_concurrent_reads: default_max_concurrent_reads(),
        }
    }
}

impl StoreConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_concurrent_reads == 0 || self.max_concurrent_reads > 256 {
            return Err(format!(
                "store.max_concurrent_reads must be between 1 and 256, got {}",
                self.max_concurrent_reads
            ));
        }
        Ok(())
    }
}

/// Real-time quote service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteConfig {
    /// Base URL of the quote service; absent means local pricing only
    #[serde(default)]
    pub base_url: Option<String>,

    /// Bearer token sent with each request (optional)
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_quote_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout_seconds: default_quote_timeout_seconds(),
        }
    }
}

impl QuoteConfig {
    /// Whether a quote endpoint is configured
    pub fn is_enabled(&self) -> bool {
        self.base_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }

    fn validate(&self) -> Result<(), String> {
        if let Some(ref base_url) = self.base_url {
            if !base_url.trim().is_empty() {
                let parsed = url::Url::parse(base_url)
                    .map_err(|e| format!("quote.base_url '{base_url}' is not a valid URL: {e}"))?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(format!(
                        "quote.base_url must use http or https, got '{}'",
                        parsed.scheme()
                    ));
                }
            }
        }
        if self.timeout_seconds == 0 || self.timeout_seconds > 60 {
            return Err(format!(
                "quote.timeout_seconds must be between 1 and 60, got {}",
                self.timeout_seconds
            ));
        }
        Ok(())
    }
}

/// Delivery estimation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Customer latitude used for distance estimates
    #[serde(default = "default_customer_lat")]
    pub customer_lat: f64,

    /// Customer longitude used for distance estimates
    #[serde(default = "default_customer_lng")]
    pub customer_lng: f64,

    /// Average courier speed
    #[serde(default = "default_average_speed_kmh")]
    pub average_speed_kmh: f64,

    /// Width of the promised delivery window
    #[serde(default = "default_window_minutes")]
    pub window_minutes: i64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            customer_lat: default_customer_lat(),
            customer_lng: default_customer_lng(),
            average_speed_kmh: default_average_speed_kmh(),
            window_minutes: default_window_minutes(),
        }
    }
}

impl DeliveryConfig {
    /// Customer location as a point
    pub fn customer_location(&self) -> GeoPoint {
        GeoPoint::new(self.customer_lat, self.customer_lng)
    }

    fn validate(&self) -> Result<(), String> {
        if !(-90.0..=90.0).contains(&self.customer_lat) {
            return Err(format!(
                "delivery.customer_lat must be within -90..90, got {}",
                self.customer_lat
            ));
        }
        if !(-180.0..=180.0).contains(&self.customer_lng) {
            return Err(format!(
                "delivery.customer_lng must be within -180..180, got {}",
                self.customer_lng
            ));
        }
        if !self.average_speed_kmh.is_finite() || self.average_speed_kmh <= 0.0 {
            return Err("delivery.average_speed_kmh must be > 0".to_string());
        }
        if self.window_minutes < 0 {
            return Err("delivery.window_minutes cannot be negative".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path is required when local logging is enabled".to_string());
        }
        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_vendor_ids() -> Vec<String> {
    vec![
        "site-a".to_string(),
        "site-b".to_string(),
        "site-c".to_string(),
    ]
}

fn default_max_concurrent_reads() -> usize {
    16
}

fn default_quote_timeout_seconds() -> u64 {
    15
}

fn default_customer_lat() -> f64 {
    19.076
}

fn default_customer_lng() -> f64 {
    72.8777
}

fn default_average_speed_kmh() -> f64 {
    25.0
}

fn default_window_minutes() -> i64 {
    20
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = MedcartConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.application.currency, "INR");
        assert_eq!(config.vendors.ids, vec!["site-a", "site-b", "site-c"]);
        assert!(!config.quote.is_enabled());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: MedcartConfig = toml::from_str("").unwrap();
        assert_eq!(config.store.max_concurrent_reads, 16);
        assert_eq!(config.quote.timeout_seconds, 15);
        assert_eq!(config.delivery.window_minutes, 20);
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = MedcartConfig::default();
        config.application.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_vendor_ids_rejected() {
        let mut config = MedcartConfig::default();
        config.vendors.ids = vec!["site-a".to_string(), "site-a".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_quote_config_validation() {
        let mut config = QuoteConfig {
            base_url: Some("not a url".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.base_url = Some("https://quotes.example.com".to_string());
        assert!(config.validate().is_ok());
        assert!(config.is_enabled());

        config.timeout_seconds = 120;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_quote_url_is_disabled() {
        let config = QuoteConfig {
            base_url: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(!config.is_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_delivery_config_validation() {
        let mut config = DeliveryConfig::default();
        config.average_speed_kmh = 0.0;
        assert!(config.validate().is_err());

        let mut config = DeliveryConfig::default();
        config.customer_lat = 95.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_rotation_validation() {
        let config = LoggingConfig {
            local_rotation: "size".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
