//! Logging and observability
//!
//! Structured logging built on `tracing`:
//! - Human-readable console output
//! - Optional JSON file logs with rotation
//! - Helper macros for the events every cart build emits
//!
//! # Example
//!
//! ```no_run
//! use medcart::logging::init_logging;
//! use medcart::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(vendor = "site-a", "Vendor seeded");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log a completed cart build
///
/// # Example
///
/// ```no_run
/// use medcart::log_cart_built;
///
/// log_cart_built!("rx-1", "site-b", "127.00", "dynamic");
/// ```
#[macro_export]
macro_rules! log_cart_built {
    ($prescription_id:expr, $vendor:expr, $total:expr, $source:expr) => {
        tracing::info!(
            prescription_id = %$prescription_id,
            vendor = %$vendor,
            total = %$total,
            source = %$source,
            "Cart built"
        );
    };
}

/// Log a real-time quote that fell back to local pricing
///
/// # Example
///
/// ```no_run
/// use medcart::log_quote_fallback;
///
/// log_quote_fallback!("site-a", "status 503");
/// ```
#[macro_export]
macro_rules! log_quote_fallback {
    ($vendor:expr, $reason:expr) => {
        tracing::warn!(
            vendor = %$vendor,
            reason = %$reason,
            "Quote service unavailable, using local total"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use medcart::log_error_with_context;
/// use medcart::domain::MedcartError;
///
/// let error = MedcartError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
