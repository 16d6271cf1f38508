//! Store-backed dynamic pricing
//!
//! Loads the pricing rules of the vendors involved and the customer
//! account, computes the breakdown, and on commit deducts loyalty points
//! exactly once per redemption key.

use crate::adapters::store::PharmacyStore;
use crate::core::pricing::discounts::{compute_breakdown, DiscountSelection};
use crate::domain::money::Money;
use crate::domain::{
    CustomerAccount, CustomerId, LoyaltyRedemption, PricingBreakdown, Result, VendorId,
    VendorPricingRule,
};
use chrono::{DateTime, FixedOffset, Timelike};
use futures::future::try_join_all;
use std::sync::Arc;

/// Whether pricing may change stored balances
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PricingMode {
    /// Compute only; nothing is written
    #[default]
    Preview,
    /// Deduct the loyalty points used, at most once per `redemption_key`
    Commit { redemption_key: String },
}

impl PricingMode {
    pub fn commit(redemption_key: impl Into<String>) -> Self {
        PricingMode::Commit {
            redemption_key: redemption_key.into(),
        }
    }

    pub fn is_commit(&self) -> bool {
        matches!(self, PricingMode::Commit { .. })
    }
}

/// Inputs to one pricing run
#[derive(Debug, Clone)]
pub struct PricingRequest {
    pub customer_id: Option<CustomerId>,
    /// Vendors whose rules compete for the best discount
    pub vendor_ids: Vec<VendorId>,
    pub currency: String,
    pub base_subtotal: Money,
    pub delivery_fee: Money,
    /// Off-peak windows are checked against this instant's local hour
    pub now: DateTime<FixedOffset>,
    pub mode: PricingMode,
}

/// Dynamic pricing engine
pub struct DynamicPricingEngine {
    store: Arc<dyn PharmacyStore>,
}

impl DynamicPricingEngine {
    pub fn new(store: Arc<dyn PharmacyStore>) -> Self {
        Self { store }
    }

    /// Price a cart
    ///
    /// Vendors without a stored rule contribute no discounts. An unknown
    /// customer gets neither insurance nor loyalty.
    ///
    /// # Errors
    ///
    /// Returns an error if a store read fails, or if a commit cannot
    /// record the loyalty redemption.
    pub async fn price(&self, request: &PricingRequest) -> Result<PricingBreakdown> {
        let rules = self.load_rules(&request.vendor_ids).await?;
        let customer = self.load_customer(request.customer_id.as_ref()).await?;

        let selection =
            DiscountSelection::select(&rules, request.now.hour(), request.base_subtotal);
        let breakdown = compute_breakdown(
            &selection,
            customer.as_ref(),
            &request.currency,
            request.base_subtotal,
            request.delivery_fee,
        );

        tracing::debug!(
            vendors = request.vendor_ids.len(),
            rules = rules.len(),
            discounts = breakdown.discounts.len(),
            total = %breakdown.total,
            commit = request.mode.is_commit(),
            "Priced cart"
        );

        if let (PricingMode::Commit { redemption_key }, Some(account)) =
            (&request.mode, customer.as_ref())
        {
            if breakdown.loyalty_points_used > 0 {
                self.commit_loyalty(account, breakdown.loyalty_points_used, redemption_key)
                    .await?;
            }
        }

        Ok(breakdown)
    }

    async fn load_rules(&self, vendor_ids: &[VendorId]) -> Result<Vec<VendorPricingRule>> {
        let rules = try_join_all(
            vendor_ids
                .iter()
                .map(|vendor_id| self.store.get_pricing_rule(vendor_id)),
        )
        .await?;
        Ok(rules.into_iter().flatten().collect())
    }

    async fn load_customer(
        &self,
        customer_id: Option<&CustomerId>,
    ) -> Result<Option<CustomerAccount>> {
        match customer_id {
            Some(id) => self.store.get_customer(id).await,
            None => Ok(None),
        }
    }

    async fn commit_loyalty(
        &self,
        account: &CustomerAccount,
        points: u64,
        redemption_key: &str,
    ) -> Result<()> {
        match self
            .store
            .redeem_loyalty_points(&account.id, points, redemption_key)
            .await?
        {
            LoyaltyRedemption::Applied { remaining } => {
                tracing::info!(
                    customer_id = %account.id,
                    points,
                    remaining,
                    redemption_key,
                    "Redeemed loyalty points"
                );
            }
            LoyaltyRedemption::AlreadyApplied => {
                tracing::info!(
                    customer_id = %account.id,
                    redemption_key,
                    "Loyalty redemption already applied"
                );
            }
        }
        Ok(())
    }
}
