//! Shared setup for commands that touch the store
//!
//! Loads configuration, opens the document store and maps domain errors
//! onto process exit codes.

use crate::adapters::store::{create_store, PharmacyStore};
use crate::config::{load_config_or_default, MedcartConfig};
use crate::core::cart::CartBuilder;
use crate::core::clock::{Clock, SystemClock};
use crate::domain::{MedcartError, VendorId};
use crate::log_error_with_context;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

pub const EXIT_OK: i32 = 0;
pub const EXIT_CONFIG: i32 = 2;
pub const EXIT_INPUT: i32 = 3;
pub const EXIT_FATAL: i32 = 5;

/// Exit code for a domain error
pub fn exit_code(error: &MedcartError) -> i32 {
    match error {
        MedcartError::Configuration(_) => EXIT_CONFIG,
        MedcartError::MissingData(_) | MedcartError::Validation(_) => EXIT_INPUT,
        _ => EXIT_FATAL,
    }
}

/// Report a failed command on stderr and in the log
pub fn report(error: &MedcartError, context: &str) -> i32 {
    log_error_with_context!(error, context);
    eprintln!("❌ {context}");
    eprintln!("   Error: {error}");
    exit_code(error)
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<(), MedcartError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Parse a vendor id argument
pub fn parse_vendor(value: &str) -> Result<VendorId, MedcartError> {
    VendorId::new(value).map_err(MedcartError::Validation)
}

/// Configuration plus an open store
pub struct AppContext {
    pub config: MedcartConfig,
    pub store: Arc<dyn PharmacyStore>,
}

impl AppContext {
    /// Load configuration and open the store
    ///
    /// A missing configuration file falls back to defaults plus
    /// `MEDCART_*` overrides.
    pub async fn open(config_path: &str) -> Result<Self, MedcartError> {
        let path = Path::new(config_path);
        let config = load_config_or_default(path.exists().then_some(path))?;
        if !path.exists() {
            tracing::debug!(config_path, "Configuration file not found, using defaults");
        }
        let store = create_store(&config.store).await?;
        Ok(Self { config, store })
    }

    /// Configured vendors in canonical order
    pub fn vendor_ids(&self) -> Result<Vec<VendorId>, MedcartError> {
        self.config
            .vendors
            .vendor_ids()
            .map_err(MedcartError::Configuration)
    }

    /// Cart builder wired to this context's store
    ///
    /// Uses the system clock unless `clock` is given.
    pub fn cart_builder(
        &self,
        clock: Option<Arc<dyn Clock>>,
    ) -> Result<CartBuilder, MedcartError> {
        let clock = clock.unwrap_or_else(|| Arc::new(SystemClock));
        CartBuilder::from_config(&self.config, self.store.clone(), clock)
    }

    /// Write the store snapshot, if the store has one
    pub async fn persist(&self) -> Result<(), MedcartError> {
        self.store.persist().await
    }
}
