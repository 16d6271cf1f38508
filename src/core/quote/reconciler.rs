//! Real-time quote reconciliation
//!
//! Asks the external quote service for an authoritative single-vendor
//! total and coerces whatever comes back into money. This path never
//! fails: a missing service, a transport error or an unusable field all
//! fall back to the locally computed value.

use crate::adapters::quote::{QuoteRequest, QuoteService};
use crate::core::allocation::VendorQuote;
use crate::domain::money::{clamp_money, money_from_f64, Money};
use crate::domain::{PricingSource, QuoteError, VendorId, VendorTotal};
use crate::log_quote_fallback;
use futures::future::join_all;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;

/// Result of reconciling one quote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledQuote {
    pub total: Money,
    pub delivery_fee: Money,
    pub currency: String,
    /// `Pathway` when the service answered, `Local` otherwise
    pub source: PricingSource,
}

impl ReconciledQuote {
    fn local(subtotal: Money, delivery_fee: Money, currency: &str) -> Self {
        Self {
            total: clamp_money(subtotal + delivery_fee),
            delivery_fee: clamp_money(delivery_fee),
            currency: currency.to_string(),
            source: PricingSource::Local,
        }
    }
}

/// Coerce a JSON number or numeric string into money
fn coerce_money(value: Option<&Value>) -> Option<Money> {
    match value? {
        Value::Number(n) => Decimal::from_str(&n.to_string())
            .ok()
            .map(clamp_money)
            .or_else(|| n.as_f64().and_then(money_from_f64)),
        Value::String(s) => {
            let s = s.trim();
            Decimal::from_str(s)
                .ok()
                .map(clamp_money)
                .or_else(|| s.parse::<f64>().ok().and_then(money_from_f64))
        }
        _ => None,
    }
}

fn coerce_currency(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

/// Reconciles local totals against the real-time quote service
#[derive(Clone, Default)]
pub struct QuoteReconciler {
    service: Option<Arc<dyn QuoteService>>,
}

impl QuoteReconciler {
    pub fn new(service: Option<Arc<dyn QuoteService>>) -> Self {
        Self { service }
    }

    /// Reconciler that always uses local totals
    pub fn disabled() -> Self {
        Self { service: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.service.is_some()
    }

    /// Quote `subtotal + delivery_fee` for one vendor
    ///
    /// Each of `total`, `deliveryFee` and `currency` in the response falls
    /// back to the local value independently when absent or unusable. A
    /// body that is not a JSON object is a failed quote.
    pub async fn reconcile(
        &self,
        vendor: &VendorId,
        subtotal: Money,
        delivery_fee: Money,
        currency: &str,
    ) -> ReconciledQuote {
        let local = ReconciledQuote::local(subtotal, delivery_fee, currency);

        let Some(service) = self.service.as_ref() else {
            return local;
        };

        let request = QuoteRequest {
            selected_vendor: vendor.clone(),
            subtotal: clamp_money(subtotal),
            delivery_fee: clamp_money(delivery_fee),
            currency: currency.to_string(),
        };

        let response = service.quote(&request).await.and_then(|body| {
            if body.is_object() {
                Ok(body)
            } else {
                Err(QuoteError::InvalidResponse(format!(
                    "expected a JSON object, got {body}"
                )))
            }
        });

        match response {
            Ok(body) => ReconciledQuote {
                total: coerce_money(body.get("total")).unwrap_or(local.total),
                delivery_fee: coerce_money(body.get("deliveryFee")).unwrap_or(local.delivery_fee),
                currency: coerce_currency(body.get("currency")).unwrap_or(local.currency),
                source: PricingSource::Pathway,
            },
            Err(err) => {
                log_quote_fallback!(vendor, err);
                local
            }
        }
    }

    /// Per-vendor comparison totals, in the order given
    ///
    /// Vendors that cannot supply every line get `None`; the rest are
    /// quoted concurrently.
    pub async fn compare_vendors(
        &self,
        quotes: &[VendorQuote],
        currency: &str,
    ) -> Vec<VendorTotal> {
        join_all(quotes.iter().map(|quote| async move {
            let total = match quote.total {
                Some(_) => Some(
                    self.reconcile(&quote.vendor, quote.subtotal, quote.delivery_fee, currency)
                        .await
                        .total,
                ),
                None => None,
            };
            VendorTotal {
                vendor: quote.vendor.clone(),
                total,
            }
        }))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::quote::PathwayQuoteClient;
    use crate::config::QuoteConfig;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn vendor(id: &str) -> VendorId {
        VendorId::new(id).unwrap()
    }

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    /// Canned service that counts calls
    struct StubService {
        response: std::result::Result<Value, String>,
        calls: AtomicUsize,
    }

    impl StubService {
        fn answering(body: Value) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(body),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                response: Err("connection refused".to_string()),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl QuoteService for StubService {
        async fn quote(&self, _request: &QuoteRequest) -> std::result::Result<Value, QuoteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.clone().map_err(QuoteError::ConnectionFailed)
        }
    }

    #[test]
    fn test_coerce_money_accepts_numbers_and_numeric_strings() {
        assert_eq!(coerce_money(Some(&json!(120.5))), Some(dec("120.50")));
        assert_eq!(coerce_money(Some(&json!(" 99.999 "))), Some(dec("100.00")));
        assert_eq!(coerce_money(Some(&json!("1e2"))), Some(dec("100")));
        assert_eq!(coerce_money(Some(&json!(-3))), Some(Decimal::ZERO));
        assert_eq!(coerce_money(Some(&json!("abc"))), None);
        assert_eq!(coerce_money(Some(&json!(null))), None);
        assert_eq!(coerce_money(None), None);
    }

    #[tokio::test]
    async fn test_disabled_reconciler_returns_local_total() {
        let quote = QuoteReconciler::disabled()
            .reconcile(&vendor("site-b"), Decimal::from(102), Decimal::from(25), "INR")
            .await;
        assert_eq!(quote.total, Decimal::from(127));
        assert_eq!(quote.source, PricingSource::Local);
    }

    #[tokio::test]
    async fn test_service_total_overrides_local() {
        let service = StubService::answering(json!({"total": 120, "deliveryFee": "18.5"}));
        let reconciler = QuoteReconciler::new(Some(service.clone()));

        let quote = reconciler
            .reconcile(&vendor("site-b"), Decimal::from(102), Decimal::from(25), "INR")
            .await;

        assert_eq!(quote.total, Decimal::from(120));
        assert_eq!(quote.delivery_fee, dec("18.5"));
        assert_eq!(quote.currency, "INR");
        assert_eq!(quote.source, PricingSource::Pathway);
        assert_eq!(service.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unusable_fields_fall_back_individually() {
        let service = StubService::answering(json!({"total": "n/a", "currency": "USD"}));
        let reconciler = QuoteReconciler::new(Some(service));

        let quote = reconciler
            .reconcile(&vendor("site-a"), Decimal::from(100), Decimal::from(35), "INR")
            .await;

        assert_eq!(quote.total, Decimal::from(135));
        assert_eq!(quote.delivery_fee, Decimal::from(35));
        assert_eq!(quote.currency, "USD");
        assert_eq!(quote.source, PricingSource::Pathway);
    }

    #[tokio::test]
    async fn test_non_object_body_falls_back_to_local() {
        for body in [json!([]), json!("ok"), json!(130)] {
            let reconciler = QuoteReconciler::new(Some(StubService::answering(body)));
            let quote = reconciler
                .reconcile(&vendor("site-a"), Decimal::from(100), Decimal::from(35), "INR")
                .await;
            assert_eq!(quote.total, Decimal::from(135));
            assert_eq!(quote.source, PricingSource::Local);
        }
    }

    #[tokio::test]
    async fn test_service_error_falls_back_to_local() {
        let reconciler = QuoteReconciler::new(Some(StubService::failing()));
        let quote = reconciler
            .reconcile(&vendor("site-a"), Decimal::from(100), Decimal::from(35), "INR")
            .await;
        assert_eq!(quote.total, Decimal::from(135));
        assert_eq!(quote.source, PricingSource::Local);
    }

    #[tokio::test]
    async fn test_compare_vendors_skips_incomplete_vendors() {
        let service = StubService::answering(json!({"total": 1}));
        let reconciler = QuoteReconciler::new(Some(service.clone()));
        let quotes = vec![
            VendorQuote {
                vendor: vendor("site-a"),
                subtotal: Decimal::from(108),
                delivery_fee: Decimal::from(35),
                total: Some(Decimal::from(143)),
            },
            VendorQuote {
                vendor: vendor("site-b"),
                subtotal: Decimal::ZERO,
                delivery_fee: Decimal::from(25),
                total: None,
            },
        ];

        let totals = reconciler.compare_vendors(&quotes, "INR").await;

        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].vendor, vendor("site-a"));
        assert_eq!(totals[0].total, Some(Decimal::ONE));
        assert_eq!(totals[1].total, None);
        assert_eq!(service.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_http_503_falls_back_to_local() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/quote")
            .with_status(503)
            .create_async()
            .await;

        let config = QuoteConfig {
            base_url: Some(server.url()),
            api_key: None,
            timeout_seconds: 5,
        };
        let reconciler = QuoteReconciler::new(PathwayQuoteClient::from_config(&config).unwrap());

        let quote = reconciler
            .reconcile(&vendor("site-b"), Decimal::from(102), Decimal::from(25), "INR")
            .await;

        assert_eq!(quote.total, Decimal::from(127));
        assert_eq!(quote.source, PricingSource::Local);
        mock.assert_async().await;
    }
}
