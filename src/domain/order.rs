//! Orders and vendor fulfillment requests

use crate::domain::cart::CartVendor;
use crate::domain::ids::{OrderId, PrescriptionId, VendorId};
use crate::domain::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    PlacedWithPharmacy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FulfillmentStatus {
    Pending,
    Accepted,
    Rejected,
}

/// Line forwarded to a vendor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Money,
}

/// Portion of an order handled by one vendor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorOrder {
    pub vendor: VendorId,
    pub lines: Vec<OrderLine>,
}

/// Placed order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub created_at: DateTime<Utc>,
    pub prescription_id: PrescriptionId,
    /// Carts share the prescription id
    pub cart_id: PrescriptionId,
    pub status: OrderStatus,
    pub payment_provider: String,
    pub payment_ref: String,
    pub vendor: CartVendor,
    pub vendors_used: Vec<VendorId>,
    pub vendor_orders: Vec<VendorOrder>,
    pub currency: String,
    pub total: Money,
    pub loyalty_points_used: u64,
}

/// Work item shown to a vendor for an order leg
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillmentRequest {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub order_id: OrderId,
    pub prescription_id: PrescriptionId,
    pub vendor_id: VendorId,
    pub status: FulfillmentStatus,
    pub lines: Vec<OrderLine>,
}
