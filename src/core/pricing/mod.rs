//! Dynamic pricing
//!
//! [`discounts`] holds the pure discount chain; [`engine`] wires it to the
//! store for rule lookup and loyalty redemption.

pub mod discounts;
pub mod engine;

pub use discounts::{
    compute_breakdown, DiscountSelection, BULK_CODE, INSURANCE_CODE, LOYALTY_CODE, OFF_PEAK_CODE,
    PROMO_CODE_PREFIX,
};
pub use engine::{DynamicPricingEngine, PricingMode, PricingRequest};
