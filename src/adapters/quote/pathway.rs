//! HTTP client for the Pathway real-time quote service
//!
//! One attempt per call, bounded by the configured timeout. Callers fall
//! back to local pricing on any error, so there is no retry loop here.

use super::traits::{QuoteRequest, QuoteService};
use crate::config::QuoteConfig;
use crate::domain::{MedcartError, QuoteError, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use std::sync::Arc;
use std::time::Duration;

/// Pathway quote client
///
/// # Example
///
/// ```no_run
/// use medcart::adapters::quote::PathwayQuoteClient;
/// use medcart::config::QuoteConfig;
///
/// let config = QuoteConfig {
///     base_url: Some("https://quotes.example.com".to_string()),
///     ..Default::default()
/// };
/// let client = PathwayQuoteClient::new(&config).unwrap();
/// assert_eq!(client.endpoint(), "https://quotes.example.com/quote");
/// ```
pub struct PathwayQuoteClient {
    endpoint: String,
    client: Client,
    bearer: Option<String>,
}

impl PathwayQuoteClient {
    /// Build a client from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no base URL is set or the HTTP
    /// client cannot be constructed.
    pub fn new(config: &QuoteConfig) -> Result<Self> {
        let base_url = config
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| MedcartError::Quote(QuoteError::NotConfigured))?;

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                MedcartError::Configuration(format!("Failed to build quote HTTP client: {e}"))
            })?;

        let bearer = config
            .api_key
            .as_ref()
            .filter(|key| !key.expose_secret().is_empty())
            .map(|key| format!("Bearer {}", key.expose_secret().as_ref()));

        Ok(Self {
            endpoint: format!("{}/quote", base_url.trim_end_matches('/')),
            client,
            bearer,
        })
    }

    /// Build a shareable quote service if one is configured
    ///
    /// # Errors
    ///
    /// Returns an error only if a configured client cannot be built.
    pub fn from_config(config: &QuoteConfig) -> Result<Option<Arc<dyn QuoteService>>> {
        if !config.is_enabled() {
            return Ok(None);
        }
        Ok(Some(Arc::new(Self::new(config)?)))
    }

    /// Full URL requests are posted to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl QuoteService for PathwayQuoteClient {
    async fn quote(
        &self,
        request: &QuoteRequest,
    ) -> std::result::Result<serde_json::Value, QuoteError> {
        tracing::debug!(
            vendor = %request.selected_vendor,
            subtotal = %request.subtotal,
            delivery_fee = %request.delivery_fee,
            "Requesting real-time quote"
        );

        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(ref bearer) = self.bearer {
            builder = builder.header("Authorization", bearer);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                QuoteError::Timeout(e.to_string())
            } else {
                QuoteError::ConnectionFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QuoteError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                QuoteError::Timeout(e.to_string())
            } else {
                QuoteError::InvalidResponse(e.to_string())
            }
        })?;

        if !body.is_object() {
            return Err(QuoteError::InvalidResponse(format!(
                "expected a JSON object, got {body}"
            )));
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use crate::domain::VendorId;
    use mockito::Matcher;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn request() -> QuoteRequest {
        QuoteRequest {
            selected_vendor: VendorId::new("site-b").unwrap(),
            subtotal: Decimal::from(102),
            delivery_fee: Decimal::from(25),
            currency: "INR".to_string(),
        }
    }

    fn config(base_url: String) -> QuoteConfig {
        QuoteConfig {
            base_url: Some(base_url),
            api_key: None,
            timeout_seconds: 5,
        }
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let client =
            PathwayQuoteClient::new(&config("https://q.example.com/".to_string())).unwrap();
        assert_eq!(client.endpoint(), "https://q.example.com/quote");
    }

    #[test]
    fn test_new_requires_base_url() {
        let result = PathwayQuoteClient::new(&QuoteConfig::default());
        assert!(matches!(
            result,
            Err(MedcartError::Quote(QuoteError::NotConfigured))
        ));
        assert!(PathwayQuoteClient::from_config(&QuoteConfig::default())
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_quote_posts_camel_case_body_with_bearer() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/quote")
            .match_header("authorization", "Bearer qk-123")
            .match_body(Matcher::Json(json!({
                "selectedVendor": "site-b",
                "subtotal": 102.0,
                "deliveryFee": 25.0,
                "currency": "INR"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"total": 120.5, "deliveryFee": 18}"#)
            .create_async()
            .await;

        let mut cfg = config(server.url());
        cfg.api_key = Some(secret_string("qk-123".to_string()));
        let client = PathwayQuoteClient::new(&cfg).unwrap();

        let body = client.quote(&request()).await.unwrap();
        assert_eq!(body["total"], json!(120.5));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_quote_non_success_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/quote")
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;

        let client = PathwayQuoteClient::new(&config(server.url())).unwrap();
        let err = client.quote(&request()).await.unwrap_err();
        assert!(matches!(err, QuoteError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_quote_rejects_non_object_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/quote")
            .with_status(200)
            .with_body("[1, 2, 3]")
            .create_async()
            .await;

        let client = PathwayQuoteClient::new(&config(server.url())).unwrap();
        let err = client.quote(&request()).await.unwrap_err();
        assert!(matches!(err, QuoteError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_quote_rejects_non_json_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/quote")
            .with_status(200)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let client = PathwayQuoteClient::new(&config(server.url())).unwrap();
        let err = client.quote(&request()).await.unwrap_err();
        assert!(matches!(err, QuoteError::InvalidResponse(_)));
    }
}
