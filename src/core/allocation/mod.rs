//! Vendor allocation: single-vendor versus split fulfilment

pub mod planner;

pub use planner::{AllocationPlan, AllocationPlanner, AllocationStrategy, VendorQuote};
