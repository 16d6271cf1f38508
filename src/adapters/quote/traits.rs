//! Real-time quote service abstraction

use crate::domain::ids::VendorId;
use crate::domain::money::Money;
use crate::domain::QuoteError;
use async_trait::async_trait;
use serde::Serialize;

/// Body of a `POST /quote` request
///
/// Money travels as JSON numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub selected_vendor: VendorId,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Money,
    #[serde(with = "rust_decimal::serde::float")]
    pub delivery_fee: Money,
    pub currency: String,
}

/// External service that prices a single-vendor order in real time
///
/// Implementations return the raw JSON object so the caller can coerce
/// each field independently.
#[async_trait]
pub trait QuoteService: Send + Sync {
    /// Request a quote
    ///
    /// # Errors
    ///
    /// Returns a [`QuoteError`] for transport failures, timeouts, non-2xx
    /// statuses and bodies that are not JSON objects.
    async fn quote(&self, request: &QuoteRequest) -> Result<serde_json::Value, QuoteError>;
}
