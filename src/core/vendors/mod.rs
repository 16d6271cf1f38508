//! Vendor data: seeding and administration

pub mod admin;
pub mod seed;

pub use admin::{InventoryItemUpdate, VendorAdmin};
pub use seed::{ensure_vendor_seed, SeedReport};
