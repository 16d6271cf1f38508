//! Domain error types
//!
//! This module defines the error hierarchy for Medcart.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Medcart error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum MedcartError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Required upstream data (prescription, extraction result) is absent
    #[error("Missing data: {0}")]
    MissingData(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Document store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Real-time quote service errors
    #[error("Quote service error: {0}")]
    Quote(#[from] QuoteError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Document store errors
///
/// Errors that occur when reading or writing vendor, inventory, customer,
/// cart and order documents.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Document not found where one is required
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Failed to read a document
    #[error("Failed to read document: {0}")]
    ReadFailed(String),

    /// Failed to write a document
    #[error("Failed to write document: {0}")]
    WriteFailed(String),

    /// Stored document does not match the expected shape
    #[error("Invalid document {id}: {message}")]
    InvalidDocument { id: String, message: String },

    /// Snapshot file could not be loaded or saved
    #[error("Snapshot error: {0}")]
    Snapshot(String),
}

/// Real-time quote service errors
///
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// No quote endpoint configured
    #[error("Quote service is not configured")]
    NotConfigured,

    /// Failed to connect to the quote service
    #[error("Failed to connect to quote service: {0}")]
    ConnectionFailed(String),

    /// Request exceeded the configured timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Non-2xx response
    #[error("Quote service returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body is not usable JSON
    #[error("Invalid response from quote service: {0}")]
    InvalidResponse(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for MedcartError {
    fn from(err: std::io::Error) -> Self {
        MedcartError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for MedcartError {
    fn from(err: serde_json::Error) -> Self {
        MedcartError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for MedcartError {
    fn from(err: toml::de::Error) -> Self {
        MedcartError::Configuration(format!("TOML parse error: {err}"))
    }
}
