//! Core business logic for Medcart.
//!
//! # Modules
//!
//! - [`inventory`] - Fuzzy medication-name to inventory-record resolution
//! - [`allocation`] - Single-vendor vs split allocation planning
//! - [`delivery`] - Haversine distance and ETA estimation
//! - [`pricing`] - Sequential discount chain and loyalty redemption
//! - [`quote`] - Real-time quote reconciliation with local fallback
//! - [`cart`] - Cart assembly orchestration
//! - [`order`] - Cash-on-delivery order placement
//! - [`vendors`] - Vendor seeding and administration
//! - [`clock`] - Injectable time source
//!
//! # Cart Workflow
//!
//! 1. **Seed**: Make sure every configured vendor has its documents
//! 2. **Resolve**: Fetch candidate inventory records for every vendor
//! 3. **Allocate**: Pick the cheapest single vendor or a per-line split
//! 4. **Estimate**: Delivery ETA of the slowest vendor leg
//! 5. **Price**: Off-peak, bulk, promo, insurance and loyalty discounts
//! 6. **Reconcile**: Optional real-time quote for single-vendor carts
//! 7. **Persist**: Merge the cart document
//!
//! # Example
//!
//! ```rust,no_run
//! use medcart::adapters::store::create_store;
//! use medcart::config::load_config;
//! use medcart::core::cart::{CartBuildRequest, CartBuilder};
//! use medcart::core::clock::SystemClock;
//! use medcart::domain::PrescriptionId;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("medcart.toml")?;
//! let store = create_store(&config.store).await?;
//! let builder = CartBuilder::from_config(&config, store, Arc::new(SystemClock))?;
//!
//! let cart = builder
//!     .build(&CartBuildRequest::preview(PrescriptionId::new("rx-1")?))
//!     .await?;
//!
//! println!("{} via {}", cart.pricing.total, cart.vendor);
//! # Ok(())
//! # }
//! ```

pub mod allocation;
pub mod cart;
pub mod clock;
pub mod delivery;
pub mod inventory;
pub mod order;
pub mod pricing;
pub mod quote;
pub mod vendors;
