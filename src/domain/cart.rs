//! Cart documents and pricing breakdowns
//!
//! A [`Cart`] is the persisted, fully priced allocation of one
//! prescription's medications to vendors. It is keyed 1:1 by prescription
//! id and rewritten with merge semantics on every build.

use crate::domain::ids::{PrescriptionId, VendorId};
use crate::domain::medication::MedicationLine;
use crate::domain::money::Money;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cart lifecycle status; `Confirmed` is the only state this engine produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CartStatus {
    Confirmed,
}

/// One priced cart line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub name: String,
    pub strength: Option<String>,
    pub form: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub duration_days: Option<u32>,
    pub quantity: Option<u32>,
    pub instructions: Option<String>,

    /// Fulfilling vendor; `None` when no vendor can supply the line
    pub vendor: Option<VendorId>,

    /// Stock snapshot at the resolved vendor
    pub stock_qty: u32,

    pub available: bool,

    /// Unit price snapshot; `None` when unavailable
    pub unit_price: Option<Money>,
}

impl CartItem {
    /// Builds an item for `line` fulfilled by `vendor` at `unit_price`
    pub fn fulfilled(
        line: &MedicationLine,
        vendor: VendorId,
        stock_qty: u32,
        unit_price: Money,
    ) -> Self {
        let mut item = Self::unavailable(line, stock_qty);
        item.vendor = Some(vendor);
        item.available = true;
        item.unit_price = Some(unit_price);
        item
    }

    /// Builds an unavailable item; it carries no vendor and no price
    pub fn unavailable(line: &MedicationLine, stock_qty: u32) -> Self {
        Self {
            name: line.name.clone(),
            strength: line.strength.clone(),
            form: line.form.clone(),
            dosage: line.dosage.clone(),
            frequency: line.frequency.clone(),
            duration_days: line.duration_days,
            quantity: line.quantity,
            instructions: line.special_instructions.clone(),
            vendor: None,
            stock_qty,
            available: false,
            unit_price: None,
        }
    }

    /// Units requested, defaulting to 1
    pub fn requested_quantity(&self) -> u32 {
        self.quantity.unwrap_or(1)
    }

    /// `unit_price * quantity`, or `None` for unavailable lines
    pub fn line_total(&self) -> Option<Money> {
        if !self.available {
            return None;
        }
        self.unit_price
            .map(|price| price * Decimal::from(self.requested_quantity()))
    }
}

/// One applied discount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountLine {
    pub code: String,
    pub label: String,
    pub amount: Money,
}

/// Where the final total came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingSource {
    /// Local dynamic pricing
    Dynamic,
    /// Overridden by the real-time quote service
    Pathway,
    /// Plain local `subtotal + deliveryFee` fallback
    Local,
}

impl fmt::Display for PricingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingSource::Dynamic => write!(f, "dynamic"),
            PricingSource::Pathway => write!(f, "pathway"),
            PricingSource::Local => write!(f, "local"),
        }
    }
}

/// Discount-adjusted price of a cart
///
/// Invariants: `subtotal_after_discounts = base_subtotal - sum(discounts)`
/// and, unless overridden by a real-time quote,
/// `total = subtotal_after_discounts + delivery_fee`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingBreakdown {
    pub currency: String,
    pub base_subtotal: Money,
    pub discounts: Vec<DiscountLine>,
    pub subtotal_after_discounts: Money,
    pub delivery_fee: Money,
    pub total: Money,
    pub loyalty_points_used: u64,
    pub source: PricingSource,
}

impl PricingBreakdown {
    /// Sum of all discount amounts
    pub fn total_discount(&self) -> Money {
        self.discounts.iter().map(|d| d.amount).sum()
    }

    /// Finds a discount line by code
    pub fn discount(&self, code: &str) -> Option<&DiscountLine> {
        self.discounts.iter().find(|d| d.code == code)
    }
}

/// Distance and ETA from one vendor to the customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorDelivery {
    pub vendor: VendorId,
    pub distance_km: f64,
    pub eta_minutes: f64,
}

/// Delivery estimate for the whole cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryEstimate {
    /// Slowest leg among the vendors used
    pub eta_minutes: f64,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    /// Legs for the vendors actually used
    pub per_vendor: Vec<VendorDelivery>,
    /// ETA for every known vendor, in canonical order
    pub eta_by_vendor: Vec<VendorDelivery>,
}

/// Comparison total for one vendor fulfilling the whole prescription
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorTotal {
    pub vendor: VendorId,
    /// `None` when the vendor cannot fulfil every line
    pub total: Option<Money>,
}

/// Vendor assignment of a cart: one vendor, or a split across several
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CartVendor {
    Single(VendorId),
    Multi,
}

const MULTI_VENDOR: &str = "multi";

impl From<CartVendor> for String {
    fn from(vendor: CartVendor) -> Self {
        match vendor {
            CartVendor::Single(id) => id.into_inner(),
            CartVendor::Multi => MULTI_VENDOR.to_string(),
        }
    }
}

impl TryFrom<String> for CartVendor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == MULTI_VENDOR {
            Ok(CartVendor::Multi)
        } else {
            VendorId::new(value).map(CartVendor::Single)
        }
    }
}

impl fmt::Display for CartVendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartVendor::Single(id) => write!(f, "{id}"),
            CartVendor::Multi => write!(f, "{MULTI_VENDOR}"),
        }
    }
}

/// Persisted cart document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub prescription_id: PrescriptionId,
    pub status: CartStatus,
    pub items: Vec<CartItem>,
    pub vendor: CartVendor,

    /// Preference the build allocated with; an `auto` build stores null
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_vendor_id: Option<VendorId>,

    pub vendors_used: Vec<VendorId>,
    pub pricing: PricingBreakdown,
    pub delivery: DeliveryEstimate,
    pub totals_by_vendor: Vec<VendorTotal>,
    pub priced_at: DateTime<Utc>,
}

impl Cart {
    /// Whether the cart is split across more than one vendor
    pub fn is_split(&self) -> bool {
        self.vendors_used.len() > 1
    }

    /// Lines no vendor could supply
    pub fn unavailable_items(&self) -> impl Iterator<Item = &CartItem> {
        self.items.iter().filter(|item| !item.available)
    }
}
