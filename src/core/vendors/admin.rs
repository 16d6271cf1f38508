//! Vendor-facing inventory and pricing-rule maintenance

use crate::adapters::store::PharmacyStore;
use crate::core::inventory::inventory_key;
use crate::core::vendors::seed::ensure_vendor_seed;
use crate::domain::money::Money;
use crate::domain::{
    InventoryRecord, MedcartError, PricingRulePatch, Result, VendorId, VendorPricingRule,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Stock and price update for one medication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemUpdate {
    pub name: String,
    pub stock_qty: u32,
    pub unit_price: Money,
    /// Defaults to the configured currency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl InventoryItemUpdate {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("inventory item name cannot be empty".to_string());
        }
        if self.unit_price < Decimal::ZERO {
            return Err(format!("unitPrice for '{}' cannot be negative", self.name));
        }
        Ok(())
    }
}

/// Inventory and pricing-rule administration for the configured vendors
pub struct VendorAdmin {
    store: Arc<dyn PharmacyStore>,
    vendor_ids: Vec<VendorId>,
    currency: String,
}

impl VendorAdmin {
    pub fn new(
        store: Arc<dyn PharmacyStore>,
        vendor_ids: Vec<VendorId>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            store,
            vendor_ids,
            currency: currency.into(),
        }
    }

    fn check_vendor(&self, vendor_id: &VendorId) -> Result<()> {
        if self.vendor_ids.contains(vendor_id) {
            Ok(())
        } else {
            Err(MedcartError::Validation(format!(
                "unknown vendor '{vendor_id}'"
            )))
        }
    }

    async fn prepare(&self, vendor_id: &VendorId) -> Result<()> {
        self.check_vendor(vendor_id)?;
        ensure_vendor_seed(self.store.as_ref(), &self.vendor_ids, &self.currency).await?;
        Ok(())
    }

    /// Create or update inventory records for a vendor
    ///
    /// Every item is validated before anything is written.
    ///
    /// # Errors
    ///
    /// Returns `MedcartError::Validation` for an unknown vendor or an
    /// invalid item, or a store error.
    pub async fn upsert_inventory(
        &self,
        vendor_id: &VendorId,
        items: &[InventoryItemUpdate],
    ) -> Result<usize> {
        self.prepare(vendor_id).await?;
        for item in items {
            item.validate().map_err(MedcartError::Validation)?;
        }

        for item in items {
            let currency = item.currency.as_deref().unwrap_or(&self.currency);
            let record = InventoryRecord::new(
                vendor_id.clone(),
                item.name.as_str(),
                item.stock_qty,
                item.unit_price,
                currency,
            );
            self.store
                .upsert_inventory(&inventory_key(vendor_id, &item.name), record)
                .await?;
        }

        tracing::info!(vendor_id = %vendor_id, items = items.len(), "Updated inventory");
        Ok(items.len())
    }

    /// All inventory records of a vendor
    pub async fn list_inventory(&self, vendor_id: &VendorId) -> Result<Vec<InventoryRecord>> {
        self.prepare(vendor_id).await?;
        self.store.list_inventory(vendor_id).await
    }

    /// A vendor's pricing rule, if one is stored
    pub async fn pricing_rule(&self, vendor_id: &VendorId) -> Result<Option<VendorPricingRule>> {
        self.prepare(vendor_id).await?;
        self.store.get_pricing_rule(vendor_id).await
    }

    /// Apply a partial update to a vendor's pricing rule
    ///
    /// # Errors
    ///
    /// Returns `MedcartError::Validation` if the patched rule is out of range;
    /// nothing is written in that case.
    pub async fn patch_pricing_rule(
        &self,
        vendor_id: &VendorId,
        patch: &PricingRulePatch,
    ) -> Result<VendorPricingRule> {
        self.prepare(vendor_id).await?;

        let mut rule = self
            .store
            .get_pricing_rule(vendor_id)
            .await?
            .unwrap_or_else(|| VendorPricingRule::none(vendor_id.clone()));
        rule.apply_patch(patch);
        rule.validate().map_err(MedcartError::Validation)?;

        self.store.put_pricing_rule(rule.clone()).await?;
        tracing::info!(vendor_id = %vendor_id, "Updated pricing rule");
        Ok(rule)
    }
}
