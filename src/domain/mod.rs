//! Domain models and types for Medcart.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`VendorId`], [`PrescriptionId`], [`CustomerId`], [`OrderId`])
//! - **Input models** ([`MedicationLine`], [`PrescriptionExtraction`])
//! - **Vendor data** ([`VendorProfile`], [`InventoryRecord`], [`VendorPricingRule`])
//! - **Output models** ([`Cart`], [`PricingBreakdown`], [`Order`])
//! - **Error types** ([`MedcartError`], [`StoreError`], [`QuoteError`])
//!
//! Optional values (strength, vendor, unit price) are `Option`s; an
//! unavailable line never contributes a zero price to any total.
//!
//! ```rust
//! use medcart::domain::{MedicationLine, VendorId};
//!
//! let line = MedicationLine::new("Paracetamol 500 mg").with_quantity(6);
//! assert_eq!(line.requested_quantity(), 6);
//! assert!(VendorId::new("").is_err());
//! ```

pub mod cart;
pub mod customer;
pub mod errors;
pub mod ids;
pub mod medication;
pub mod money;
pub mod order;
pub mod result;
pub mod vendor;

// Re-export commonly used types for convenience
pub use cart::{
    Cart, CartItem, CartStatus, CartVendor, DeliveryEstimate, DiscountLine, PricingBreakdown,
    PricingSource, VendorDelivery, VendorTotal,
};
pub use customer::{CustomerAccount, LoyaltyRedemption, PrescriptionRecord};
pub use errors::{MedcartError, QuoteError, StoreError};
pub use ids::{CustomerId, OrderId, PrescriptionId, VendorId};
pub use medication::{MedicationLine, PrescriptionExtraction};
pub use money::Money;
pub use order::{FulfillmentRequest, FulfillmentStatus, Order, OrderLine, OrderStatus, VendorOrder};
pub use result::Result;
pub use vendor::{
    GeoPoint, InventoryRecord, PricingRulePatch, PromoCode, VendorPricingRule, VendorProfile,
};
