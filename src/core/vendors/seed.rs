//! Idempotent vendor seeding
//!
//! Makes sure every configured vendor has a profile, a pricing rule and a
//! starter inventory before any cart is priced. Existing documents are
//! never overwritten, so vendor edits survive re-seeding.

use crate::adapters::store::PharmacyStore;
use crate::core::inventory::inventory_key;
use crate::domain::{
    GeoPoint, InventoryRecord, PromoCode, Result, VendorId, VendorPricingRule, VendorProfile,
};
use rust_decimal::Decimal;
use serde::Serialize;

const MUMBAI: GeoPoint = GeoPoint::new(19.076, 72.8777);
const PUNE: GeoPoint = GeoPoint::new(18.5204, 73.8567);
const DELHI: GeoPoint = GeoPoint::new(28.6139, 77.209);

const BULK_MIN_SUBTOTAL: i64 = 499;
const PROMO_PERCENT: i64 = 10;

/// Starter catalogue: name, stock, prices for site-a / site-b / everyone else
const STARTER_INVENTORY: [(&str, u32, [i64; 3]); 9] = [
    ("Cetirizine 10mg", 80, [12, 11, 13]),
    ("Metformin 500mg", 60, [32, 30, 34]),
    ("Atorvastatin 10mg", 40, [75, 72, 79]),
    ("Omeprazole 20mg", 50, [48, 45, 52]),
    ("Augmentin 625 mg", 30, [220, 210, 235]),
    ("Enzflam", 50, [42, 39, 45]),
    ("Paracetamol 500 mg", 120, [18, 17, 19]),
    ("Pan-D 40 mg", 40, [78, 74, 82]),
    ("Hexigel gum paint", 25, [95, 92, 99]),
];

/// Documents created by one seeding pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub vendors_created: usize,
    pub pricing_rules_created: usize,
    pub inventory_created: usize,
}

impl SeedReport {
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

fn price_column(vendor_id: &VendorId) -> usize {
    match vendor_id.as_str() {
        "site-a" => 0,
        "site-b" => 1,
        _ => 2,
    }
}

fn seed_profile(vendor_id: &VendorId, currency: &str) -> VendorProfile {
    let (fee, location) = match vendor_id.as_str() {
        "site-a" => (35, MUMBAI),
        "site-b" => (35, PUNE),
        "site-c" => (50, DELHI),
        _ => (35, DELHI),
    };
    VendorProfile {
        id: vendor_id.clone(),
        name: vendor_id.as_str().to_uppercase(),
        active: true,
        currency: currency.to_string(),
        base_delivery_fee: Decimal::from(fee),
        location,
    }
}

fn seed_pricing_rule(vendor_id: &VendorId) -> VendorPricingRule {
    let mut rule = VendorPricingRule::none(vendor_id.clone());
    rule.off_peak_percent = Decimal::from(if vendor_id.as_str() == "site-b" { 6 } else { 4 });
    rule.bulk_min_subtotal = Decimal::from(BULK_MIN_SUBTOTAL);
    rule.bulk_percent = Decimal::from(if vendor_id.as_str() == "site-a" { 5 } else { 3 });
    rule.promo_codes = vec![PromoCode {
        code: format!("{}10", vendor_id.as_str().to_uppercase()),
        percent: Decimal::from(PROMO_PERCENT),
        active: vendor_id.as_str() == "site-c",
    }];
    rule
}

/// Ensure every vendor in `vendor_ids` has its seed documents
///
/// Returns once all writes have completed. Safe to call before every
/// cart build.
///
/// # Errors
///
/// Returns an error if a store read or write fails.
pub async fn ensure_vendor_seed(
    store: &dyn PharmacyStore,
    vendor_ids: &[VendorId],
    currency: &str,
) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    for vendor_id in vendor_ids {
        if store
            .insert_vendor_if_absent(seed_profile(vendor_id, currency))
            .await?
        {
            report.vendors_created += 1;
        }

        if store
            .insert_pricing_rule_if_absent(seed_pricing_rule(vendor_id))
            .await?
        {
            report.pricing_rules_created += 1;
        }

        let column = price_column(vendor_id);
        for (name, stock, prices) in STARTER_INVENTORY {
            let record = InventoryRecord::new(
                vendor_id.clone(),
                name,
                stock,
                Decimal::from(prices[column]),
                currency,
            );
            if store
                .insert_inventory_if_absent(&inventory_key(vendor_id, name), record)
                .await?
            {
                report.inventory_created += 1;
            }
        }
    }

    if !report.is_noop() {
        tracing::info!(
            vendors = report.vendors_created,
            pricing_rules = report.pricing_rules_created,
            inventory = report.inventory_created,
            "Seeded vendor data"
        );
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::store::InMemoryStore;

    fn vendor(id: &str) -> VendorId {
        VendorId::new(id).unwrap()
    }

    fn default_vendors() -> Vec<VendorId> {
        vec![vendor("site-a"), vendor("site-b"), vendor("site-c")]
    }

    #[tokio::test]
    async fn test_seed_creates_everything_once() {
        let store = InMemoryStore::new();

        let first = ensure_vendor_seed(&store, &default_vendors(), "INR").await.unwrap();
        assert_eq!(first.vendors_created, 3);
        assert_eq!(first.pricing_rules_created, 3);
        assert_eq!(first.inventory_created, 27);

        let second = ensure_vendor_seed(&store, &default_vendors(), "INR").await.unwrap();
        assert!(second.is_noop());
    }

    #[tokio::test]
    async fn test_seed_values() {
        let store = InMemoryStore::new();
        ensure_vendor_seed(&store, &default_vendors(), "INR").await.unwrap();

        let c = store.get_vendor(&vendor("site-c")).await.unwrap().unwrap();
        assert_eq!(c.name, "SITE-C");
        assert_eq!(c.base_delivery_fee, Decimal::from(50));
        assert_eq!(c.location, DELHI);

        let b_rule = store.get_pricing_rule(&vendor("site-b")).await.unwrap().unwrap();
        assert_eq!(b_rule.off_peak_percent, Decimal::from(6));
        assert_eq!(b_rule.bulk_percent, Decimal::from(3));
        assert_eq!(b_rule.promo_codes[0].code, "SITE-B10");
        assert!(!b_rule.promo_codes[0].active);

        let c_rule = store.get_pricing_rule(&vendor("site-c")).await.unwrap().unwrap();
        assert!(c_rule.promo_codes[0].active);

        let para = store
            .get_inventory(&inventory_key(&vendor("site-b"), "Paracetamol 500 mg"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(para.unit_price, Decimal::from(17));
        assert_eq!(para.stock_qty, 120);
    }

    #[tokio::test]
    async fn test_seed_never_overwrites_vendor_changes() {
        let store = InMemoryStore::new();
        let a = vendor("site-a");
        let key = inventory_key(&a, "Enzflam");
        store
            .upsert_inventory(
                &key,
                InventoryRecord::new(a.clone(), "Enzflam", 0, Decimal::from(99), "INR"),
            )
            .await
            .unwrap();

        let report = ensure_vendor_seed(&store, &[a.clone()], "INR").await.unwrap();
        assert_eq!(report.inventory_created, 8);

        let record = store.get_inventory(&key).await.unwrap().unwrap();
        assert_eq!(record.stock_qty, 0);
        assert_eq!(record.unit_price, Decimal::from(99));
    }

    #[tokio::test]
    async fn test_unknown_vendor_gets_generic_defaults() {
        let store = InMemoryStore::new();
        let d = vendor("site-d");
        ensure_vendor_seed(&store, &[d.clone()], "INR").await.unwrap();

        let profile = store.get_vendor(&d).await.unwrap().unwrap();
        assert_eq!(profile.base_delivery_fee, Decimal::from(35));
        let rule = store.get_pricing_rule(&d).await.unwrap().unwrap();
        assert_eq!(rule.off_peak_percent, Decimal::from(4));
        assert_eq!(rule.promo_codes[0].code, "SITE-D10");
    }
}
