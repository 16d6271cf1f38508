//! Vendor, inventory and pricing-rule documents

use crate::domain::ids::VendorId;
use crate::domain::money::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Static vendor profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorProfile {
    pub id: VendorId,

    /// Display name
    pub name: String,

    /// Inactive vendors are skipped by cart assembly
    #[serde(default = "default_true")]
    pub active: bool,

    pub currency: String,

    /// Flat delivery fee charged once per order leg
    pub base_delivery_fee: Money,

    pub location: GeoPoint,
}

/// Stock and price for one medication at one vendor
///
/// Keyed by `vendorId__slug(name)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecord {
    pub vendor_id: VendorId,

    /// Name as entered by the vendor
    pub name: String,

    /// Lowercased, trimmed name
    #[serde(default)]
    pub name_lower: String,

    pub stock_qty: u32,

    pub unit_price: Money,

    pub currency: String,
}

impl InventoryRecord {
    /// Creates a record, deriving `name_lower`
    pub fn new(
        vendor_id: VendorId,
        name: impl Into<String>,
        stock_qty: u32,
        unit_price: Money,
        currency: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            vendor_id,
            name_lower: name.trim().to_lowercase(),
            name,
            stock_qty,
            unit_price,
            currency: currency.into(),
        }
    }

    /// Whether `quantity` units can be supplied
    pub fn can_supply(&self, quantity: u32) -> bool {
        self.stock_qty >= quantity
    }
}

/// Vendor promo code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromoCode {
    pub code: String,
    pub percent: Decimal,
    /// Codes explicitly marked inactive are ignored
    #[serde(default = "default_true")]
    pub active: bool,
}

/// Per-vendor discount configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorPricingRule {
    pub vendor_id: VendorId,

    /// First off-peak hour (0-23, inclusive)
    #[serde(default = "default_off_peak_start")]
    pub off_peak_start_hour: u8,

    /// End of the off-peak window (0-23, exclusive); wraps midnight when <= start
    #[serde(default = "default_off_peak_end")]
    pub off_peak_end_hour: u8,

    #[serde(default)]
    pub off_peak_percent: Decimal,

    /// Threshold checked against the pre-discount subtotal
    #[serde(default)]
    pub bulk_min_subtotal: Money,

    #[serde(default)]
    pub bulk_percent: Decimal,

    #[serde(default)]
    pub promo_codes: Vec<PromoCode>,
}

impl VendorPricingRule {
    /// A rule that grants no discounts
    pub fn none(vendor_id: VendorId) -> Self {
        Self {
            vendor_id,
            off_peak_start_hour: default_off_peak_start(),
            off_peak_end_hour: default_off_peak_end(),
            off_peak_percent: Decimal::ZERO,
            bulk_min_subtotal: Decimal::ZERO,
            bulk_percent: Decimal::ZERO,
            promo_codes: Vec::new(),
        }
    }

    /// Whether `hour` falls inside the `[start, end)` off-peak window
    ///
    /// When `start < end` the window is same-day; otherwise it wraps midnight.
    pub fn is_off_peak(&self, hour: u32) -> bool {
        let start = u32::from(self.off_peak_start_hour);
        let end = u32::from(self.off_peak_end_hour);
        if start < end {
            hour >= start && hour < end
        } else {
            hour >= start || hour < end
        }
    }

    /// Applies a partial update, leaving absent fields untouched
    pub fn apply_patch(&mut self, patch: &PricingRulePatch) {
        if let Some(start) = patch.off_peak_start_hour {
            self.off_peak_start_hour = start;
        }
        if let Some(end) = patch.off_peak_end_hour {
            self.off_peak_end_hour = end;
        }
        if let Some(pct) = patch.off_peak_percent {
            self.off_peak_percent = pct;
        }
        if let Some(min) = patch.bulk_min_subtotal {
            self.bulk_min_subtotal = min;
        }
        if let Some(pct) = patch.bulk_percent {
            self.bulk_percent = pct;
        }
        if let Some(ref codes) = patch.promo_codes {
            self.promo_codes = codes.clone();
        }
    }

    /// Validates hour and percentage ranges
    ///
    /// # Errors
    ///
    /// Returns a message describing the first out-of-range field.
    pub fn validate(&self) -> Result<(), String> {
        if self.off_peak_start_hour > 23 || self.off_peak_end_hour > 23 {
            return Err("off-peak hours must be within 0-23".to_string());
        }
        let in_range = |p: Decimal| p >= Decimal::ZERO && p <= Decimal::ONE_HUNDRED;
        if !in_range(self.off_peak_percent) || !in_range(self.bulk_percent) {
            return Err("discount percentages must be within 0-100".to_string());
        }
        if self.bulk_min_subtotal < Decimal::ZERO {
            return Err("bulkMinSubtotal cannot be negative".to_string());
        }
        if let Some(code) = self.promo_codes.iter().find(|p| !in_range(p.percent)) {
            return Err(format!("promo code {} percent must be within 0-100", code.code));
        }
        Ok(())
    }
}

/// Partial update of a [`VendorPricingRule`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRulePatch {
    pub off_peak_start_hour: Option<u8>,
    pub off_peak_end_hour: Option<u8>,
    pub off_peak_percent: Option<Decimal>,
    pub bulk_min_subtotal: Option<Money>,
    pub bulk_percent: Option<Decimal>,
    pub promo_codes: Option<Vec<PromoCode>>,
}

fn default_true() -> bool {
    true
}

fn default_off_peak_start() -> u8 {
    22
}

fn default_off_peak_end() -> u8 {
    6
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn night_rule() -> VendorPricingRule {
        VendorPricingRule::none(VendorId::new("site-a").unwrap())
    }

    #[test_case(22, true; "start hour")]
    #[test_case(23, true; "before midnight")]
    #[test_case(0, true; "midnight")]
    #[test_case(3, true; "small hours")]
    #[test_case(5, true; "last hour")]
    #[test_case(6, false; "end is exclusive")]
    #[test_case(12, false; "noon")]
    #[test_case(21, false; "evening")]
    fn test_wrapping_off_peak_window(hour: u32, expected: bool) {
        assert_eq!(night_rule().is_off_peak(hour), expected);
    }

    #[test]
    fn test_wrapping_window_covers_exactly_eight_hours() {
        let rule = night_rule();
        let in_window: Vec<u32> = (0..24).filter(|h| rule.is_off_peak(*h)).collect();
        assert_eq!(in_window, vec![0, 1, 2, 3, 4, 5, 22, 23]);
    }

    #[test]
    fn test_same_day_window() {
        let mut rule = night_rule();
        rule.off_peak_start_hour = 13;
        rule.off_peak_end_hour = 16;
        assert!(!rule.is_off_peak(12));
        assert!(rule.is_off_peak(13));
        assert!(rule.is_off_peak(15));
        assert!(!rule.is_off_peak(16));
    }

    #[test]
    fn test_rule_defaults_from_sparse_document() {
        let rule: VendorPricingRule =
            serde_json::from_str(r#"{"vendorId": "site-b", "bulkPercent": 3}"#).unwrap();
        assert_eq!(rule.off_peak_start_hour, 22);
        assert_eq!(rule.off_peak_end_hour, 6);
        assert_eq!(rule.bulk_percent, Decimal::from(3));
        assert!(rule.promo_codes.is_empty());
    }

    #[test]
    fn test_promo_code_active_defaults_true() {
        let code: PromoCode = serde_json::from_str(r#"{"code": "X10", "percent": 10}"#).unwrap();
        assert!(code.active);
    }

    #[test]
    fn test_apply_patch_only_touches_given_fields() {
        let mut rule = night_rule();
        rule.apply_patch(&PricingRulePatch {
            bulk_percent: Some(Decimal::from(7)),
            ..Default::default()
        });
        assert_eq!(rule.bulk_percent, Decimal::from(7));
        assert_eq!(rule.off_peak_start_hour, 22);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut rule = night_rule();
        rule.off_peak_percent = Decimal::from(101);
        assert!(rule.validate().is_err());

        let mut rule = night_rule();
        rule.off_peak_end_hour = 24;
        assert!(rule.validate().is_err());
    }

    #[test]
    fn test_inventory_record_derives_lowercase_name() {
        let rec = InventoryRecord::new(
            VendorId::new("site-a").unwrap(),
            " Paracetamol 500 mg ",
            10,
            Decimal::from(18),
            "INR",
        );
        assert_eq!(rec.name_lower, "paracetamol 500 mg");
        assert!(rec.can_supply(10));
        assert!(!rec.can_supply(11));
    }
}
