//! Cart assembly
//!
//! # Build sequence
//!
//! 1. Ensure vendor seed data exists
//! 2. Load the prescription record and its extracted medications
//! 3. Load vendor profiles, dropping inactive vendors
//! 4. Fetch every candidate inventory record in one bounded fan-out
//! 5. Plan the vendor allocation
//! 6. Estimate delivery and apply dynamic pricing
//! 7. Quote every fully stocked vendor for comparison, and the chosen
//!    vendor once more when the cart is not split
//! 8. Merge the cart document into the store
//!
//! A rebuild recomputes everything from upstream state. Unless the request
//! names a vendor or `auto`, it reuses the stored `preferredVendorId`, so
//! previews and order placement allocate the same way.

use crate::adapters::quote::PathwayQuoteClient;
use crate::adapters::store::PharmacyStore;
use crate::config::MedcartConfig;
use crate::core::allocation::AllocationPlanner;
use crate::core::clock::Clock;
use crate::core::delivery::DeliveryEstimator;
use crate::core::inventory::InventoryIndex;
use crate::core::pricing::{DynamicPricingEngine, PricingMode, PricingRequest};
use crate::core::quote::QuoteReconciler;
use crate::core::vendors::ensure_vendor_seed;
use crate::domain::{
    Cart, CartStatus, GeoPoint, MedcartError, PrescriptionId, PricingSource, Result, VendorId,
    VendorProfile,
};
use crate::log_cart_built;
use chrono::Utc;
use futures::future::try_join_all;
use rust_decimal::Decimal;
use std::sync::Arc;

const DEFAULT_MAX_CONCURRENT_READS: usize = 16;

/// Where a build takes its preferred vendor from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VendorPreference {
    /// Whatever `preferredVendorId` the stored cart document carries
    #[default]
    Stored,
    /// No preference; clears a stored one
    Auto,
    /// This vendor, stored for later rebuilds
    Vendor(VendorId),
}

impl VendorPreference {
    /// Parse a CLI value: `auto` or a vendor id
    pub fn parse(value: &str) -> std::result::Result<Self, String> {
        if value.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        VendorId::new(value).map(Self::Vendor)
    }
}

/// Parameters of one cart build
#[derive(Debug, Clone)]
pub struct CartBuildRequest {
    pub prescription_id: PrescriptionId,
    /// A preferred vendor is used exclusively when it is known and can
    /// supply every line
    pub preference: VendorPreference,
    pub mode: PricingMode,
}

impl CartBuildRequest {
    /// Preview build honouring the stored preference
    pub fn preview(prescription_id: PrescriptionId) -> Self {
        Self {
            prescription_id,
            preference: VendorPreference::Stored,
            mode: PricingMode::Preview,
        }
    }

    /// Prefer `vendor`, or fall back to the stored preference on `None`
    pub fn with_preferred_vendor(self, vendor: Option<VendorId>) -> Self {
        self.with_preference(vendor.map_or(VendorPreference::Stored, VendorPreference::Vendor))
    }

    pub fn with_preference(mut self, preference: VendorPreference) -> Self {
        self.preference = preference;
        self
    }

    pub fn with_mode(mut self, mode: PricingMode) -> Self {
        self.mode = mode;
        self
    }
}

/// `preferredVendorId` left on a stored cart document, if it is a valid id
pub(crate) fn stored_preferred_vendor(document: Option<&serde_json::Value>) -> Option<VendorId> {
    document?
        .get("preferredVendorId")?
        .as_str()
        .and_then(|id| VendorId::new(id).ok())
}

/// Builds and persists priced carts
pub struct CartBuilder {
    store: Arc<dyn PharmacyStore>,
    pricing: DynamicPricingEngine,
    reconciler: QuoteReconciler,
    estimator: DeliveryEstimator,
    clock: Arc<dyn Clock>,
    vendor_ids: Vec<VendorId>,
    currency: String,
    max_concurrent_reads: usize,
}

impl CartBuilder {
    /// `vendor_ids` is the canonical vendor order used for every tie-break
    pub fn new(
        store: Arc<dyn PharmacyStore>,
        reconciler: QuoteReconciler,
        clock: Arc<dyn Clock>,
        vendor_ids: Vec<VendorId>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            pricing: DynamicPricingEngine::new(store.clone()),
            store,
            reconciler,
            estimator: DeliveryEstimator::default(),
            clock,
            vendor_ids,
            currency: currency.into(),
            max_concurrent_reads: DEFAULT_MAX_CONCURRENT_READS,
        }
    }

    /// Wire a builder from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid vendor list or a quote
    /// client that cannot be built.
    pub fn from_config(
        config: &MedcartConfig,
        store: Arc<dyn PharmacyStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let vendor_ids = config
            .vendors
            .vendor_ids()
            .map_err(MedcartError::Configuration)?;
        let reconciler = QuoteReconciler::new(PathwayQuoteClient::from_config(&config.quote)?);

        Ok(Self::new(
            store,
            reconciler,
            clock,
            vendor_ids,
            config.application.currency.clone(),
        )
        .with_estimator(DeliveryEstimator::from_config(&config.delivery))
        .with_max_concurrent_reads(config.store.max_concurrent_reads))
    }

    pub fn with_estimator(mut self, estimator: DeliveryEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn with_max_concurrent_reads(mut self, max_concurrent_reads: usize) -> Self {
        self.max_concurrent_reads = max_concurrent_reads.max(1);
        self
    }

    pub fn store(&self) -> &Arc<dyn PharmacyStore> {
        &self.store
    }

    pub fn vendor_ids(&self) -> &[VendorId] {
        &self.vendor_ids
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Build, price and persist the cart of a prescription
    ///
    /// # Errors
    ///
    /// * `MedcartError::MissingData` if the prescription or its extraction
    ///   result is absent
    /// * `MedcartError::Validation` if the extraction has no usable
    ///   medications
    /// * store errors
    ///
    /// Quote service failures never surface here.
    pub async fn build(&self, request: &CartBuildRequest) -> Result<Cart> {
        let prescription_id = &request.prescription_id;
        tracing::debug!(prescription_id = %prescription_id, "Building cart");

        ensure_vendor_seed(self.store.as_ref(), &self.vendor_ids, &self.currency).await?;

        let prescription = self
            .store
            .get_prescription(prescription_id)
            .await?
            .ok_or_else(|| {
                MedcartError::MissingData(format!("prescription {prescription_id}"))
            })?;
        let extraction = self
            .store
            .get_extraction(prescription_id)
            .await?
            .ok_or_else(|| {
                MedcartError::MissingData(format!("extraction result for {prescription_id}"))
            })?;
        extraction.validate().map_err(MedcartError::Validation)?;
        let lines = &extraction.medications;

        let vendors = self.active_vendors().await?;
        let vendor_ids: Vec<VendorId> = vendors.iter().map(|(id, _)| id.clone()).collect();

        let index = InventoryIndex::fetch(
            self.store.as_ref(),
            &vendor_ids,
            lines,
            self.max_concurrent_reads,
        )
        .await?;

        let planner = AllocationPlanner::new(
            vendor_ids.clone(),
            vendors.iter().map(|(id, profile)| {
                let fee = profile
                    .as_ref()
                    .map(|p| p.base_delivery_fee)
                    .unwrap_or(Decimal::ZERO);
                (id.clone(), fee)
            }),
        );
        let preferred_vendor = self.preferred_vendor(request).await?;
        let plan = planner.plan(lines, &index, preferred_vendor.as_ref());

        let now = self.clock.now();
        let locations: Vec<(VendorId, Option<GeoPoint>)> = vendors
            .iter()
            .map(|(id, profile)| (id.clone(), profile.as_ref().map(|p| p.location)))
            .collect();
        let delivery = self
            .estimator
            .estimate_cart(&locations, &plan.vendors_used, now.with_timezone(&Utc));

        let mut pricing = self
            .pricing
            .price(&PricingRequest {
                customer_id: prescription.customer_id.clone(),
                vendor_ids: plan.vendors_used.clone(),
                currency: self.currency.clone(),
                base_subtotal: plan.base_subtotal,
                delivery_fee: plan.delivery_fee,
                now,
                mode: request.mode.clone(),
            })
            .await?;

        let totals_by_vendor = self
            .reconciler
            .compare_vendors(&plan.vendor_quotes, &self.currency)
            .await;

        if let [vendor] = plan.vendors_used.as_slice() {
            let quote = self
                .reconciler
                .reconcile(
                    vendor,
                    pricing.subtotal_after_discounts,
                    pricing.delivery_fee,
                    &self.currency,
                )
                .await;
            if quote.source == PricingSource::Pathway {
                pricing.delivery_fee = quote.delivery_fee;
                pricing.total = quote.total;
                pricing.source = PricingSource::Pathway;
            }
        }

        let cart = Cart {
            prescription_id: prescription_id.clone(),
            status: CartStatus::Confirmed,
            items: plan.items.clone(),
            vendor: plan.cart_vendor(),
            preferred_vendor_id: preferred_vendor,
            vendors_used: plan.vendors_used.clone(),
            pricing,
            delivery,
            totals_by_vendor,
            priced_at: now.with_timezone(&Utc),
        };

        let mut document = serde_json::to_value(&cart)?;
        if request.preference == VendorPreference::Auto {
            if let Some(fields) = document.as_object_mut() {
                fields.insert("preferredVendorId".to_string(), serde_json::Value::Null);
            }
        }
        self.store
            .merge_cart_document(prescription_id, document)
            .await?;

        log_cart_built!(
            prescription_id,
            cart.vendor,
            cart.pricing.total,
            cart.pricing.source
        );
        tracing::debug!(
            prescription_id = %prescription_id,
            strategy = %plan.strategy,
            unavailable = cart.unavailable_items().count(),
            "Cart persisted"
        );

        Ok(cart)
    }

    async fn preferred_vendor(&self, request: &CartBuildRequest) -> Result<Option<VendorId>> {
        Ok(match &request.preference {
            VendorPreference::Stored => stored_preferred_vendor(
                self.store
                    .get_cart_document(&request.prescription_id)
                    .await?
                    .as_ref(),
            ),
            VendorPreference::Auto => None,
            VendorPreference::Vendor(vendor) => Some(vendor.clone()),
        })
    }

    /// Configured vendors minus those whose profile is marked inactive
    ///
    /// A vendor without a profile stays in, with no fee and no location.
    async fn active_vendors(&self) -> Result<Vec<(VendorId, Option<VendorProfile>)>> {
        let profiles = try_join_all(
            self.vendor_ids
                .iter()
                .map(|vendor_id| self.store.get_vendor(vendor_id)),
        )
        .await?;

        Ok(self
            .vendor_ids
            .iter()
            .cloned()
            .zip(profiles)
            .filter(|(vendor_id, profile)| match profile {
                Some(p) if !p.active => {
                    tracing::debug!(vendor_id = %vendor_id, "Skipping inactive vendor");
                    false
                }
                _ => true,
            })
            .collect())
    }
}
