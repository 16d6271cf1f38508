//! Document store abstraction
//!
//! This module defines the trait the cart engine uses for every read and
//! write of vendor, customer, prescription, cart and order documents.

use crate::domain::ids::{CustomerId, OrderId, PrescriptionId, VendorId};
use crate::domain::{
    CustomerAccount, FulfillmentRequest, InventoryRecord, LoyaltyRedemption, Order,
    PrescriptionExtraction, PrescriptionRecord, Result, VendorPricingRule, VendorProfile,
};
use async_trait::async_trait;

/// Document store used by the cart engine
///
/// Implementations must be safe to share across tasks; inventory point
/// reads are issued concurrently during a cart build.
#[async_trait]
pub trait PharmacyStore: Send + Sync {
    /// Load a vendor profile
    ///
    /// # Returns
    ///
    /// Returns `Ok(None)` if the vendor has no profile.
    async fn get_vendor(&self, vendor_id: &VendorId) -> Result<Option<VendorProfile>>;

    /// Create or replace a vendor profile
    async fn put_vendor(&self, profile: VendorProfile) -> Result<()>;

    /// Create a vendor profile unless one already exists
    ///
    /// # Returns
    ///
    /// Returns `true` if the profile was written.
    async fn insert_vendor_if_absent(&self, profile: VendorProfile) -> Result<bool>;

    /// Load a vendor's pricing rule
    async fn get_pricing_rule(&self, vendor_id: &VendorId) -> Result<Option<VendorPricingRule>>;

    /// Create or replace a vendor's pricing rule
    async fn put_pricing_rule(&self, rule: VendorPricingRule) -> Result<()>;

    /// Create a pricing rule unless one already exists
    async fn insert_pricing_rule_if_absent(&self, rule: VendorPricingRule) -> Result<bool>;

    /// Point read of an inventory record by composite key `vendorId__slug`
    async fn get_inventory(&self, key: &str) -> Result<Option<InventoryRecord>>;

    /// Create or replace the inventory record stored under `key`
    async fn upsert_inventory(&self, key: &str, record: InventoryRecord) -> Result<()>;

    /// Create an inventory record unless `key` is already taken
    async fn insert_inventory_if_absent(&self, key: &str, record: InventoryRecord)
        -> Result<bool>;

    /// All inventory records of a vendor, ordered by key
    async fn list_inventory(&self, vendor_id: &VendorId) -> Result<Vec<InventoryRecord>>;

    /// Load a customer account
    async fn get_customer(&self, customer_id: &CustomerId) -> Result<Option<CustomerAccount>>;

    /// Create or replace a customer account
    async fn put_customer(&self, account: CustomerAccount) -> Result<()>;

    /// Deduct `points` from a customer's balance at most once per `redemption_key`
    ///
    /// The deduction never takes the balance below zero. Replaying a key
    /// leaves the balance untouched and reports
    /// [`LoyaltyRedemption::AlreadyApplied`].
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the customer does not exist.
    async fn redeem_loyalty_points(
        &self,
        customer_id: &CustomerId,
        points: u64,
        redemption_key: &str,
    ) -> Result<LoyaltyRedemption>;

    /// Load a prescription record
    async fn get_prescription(&self, id: &PrescriptionId) -> Result<Option<PrescriptionRecord>>;

    /// Create or replace a prescription record
    async fn put_prescription(&self, record: PrescriptionRecord) -> Result<()>;

    /// Load the extraction result of a prescription
    async fn get_extraction(&self, id: &PrescriptionId) -> Result<Option<PrescriptionExtraction>>;

    /// Store the extraction result of a prescription
    async fn put_extraction(
        &self,
        id: &PrescriptionId,
        extraction: PrescriptionExtraction,
    ) -> Result<()>;

    /// Raw cart document for a prescription
    async fn get_cart_document(&self, id: &PrescriptionId) -> Result<Option<serde_json::Value>>;

    /// Merge `document` into the stored cart
    ///
    /// Top-level keys present in `document` replace the stored ones; keys
    /// absent from it are preserved.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidDocument` if `document` is not a JSON object.
    async fn merge_cart_document(
        &self,
        id: &PrescriptionId,
        document: serde_json::Value,
    ) -> Result<()>;

    /// Persist an order
    async fn put_order(&self, order: Order) -> Result<()>;

    /// Load an order
    async fn get_order(&self, id: &OrderId) -> Result<Option<Order>>;

    /// Persist a vendor fulfillment request
    async fn put_fulfillment_request(&self, request: FulfillmentRequest) -> Result<()>;

    /// Fulfillment requests addressed to a vendor, oldest first
    async fn list_fulfillment_requests(
        &self,
        vendor_id: &VendorId,
    ) -> Result<Vec<FulfillmentRequest>>;

    /// Flush state to durable storage, if the backend has any
    async fn persist(&self) -> Result<()>;
}
