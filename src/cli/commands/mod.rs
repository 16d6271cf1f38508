//! CLI command implementations
//!
//! Each command exposes `execute`, which returns the process exit code.

pub mod build_cart;
pub mod context;
pub mod import;
pub mod init;
pub mod inventory;
pub mod place_order;
pub mod pricing_rules;
pub mod seed;
pub mod validate;
