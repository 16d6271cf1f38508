//! Cart assembly orchestration

pub mod builder;

pub use builder::{CartBuildRequest, CartBuilder, VendorPreference};
