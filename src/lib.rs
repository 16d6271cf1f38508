// Medcart - Prescription cart pricing engine
// Copyright (c) 2025 Medcart Contributors
// Licensed under the MIT License

//! # Medcart - Prescription Cart Pricing
//!
//! Medcart turns a parsed prescription into a priced cart across a small
//! set of pharmacy vendors.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Resolving** free-text medication names against vendor inventory
//! - **Allocating** lines to the cheapest single vendor, or splitting per line
//! - **Estimating** delivery time from vendor and customer locations
//! - **Pricing** with off-peak, bulk, promo, insurance and loyalty discounts
//! - **Reconciling** against an optional real-time quote service
//! - **Placing** cash-on-delivery orders with per-vendor fulfillment requests
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (resolution, allocation, pricing, carts, orders)
//! - [`adapters`] - Document store and quote service integrations
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use medcart::adapters::store::create_store;
//! use medcart::config::load_config;
//! use medcart::core::cart::{CartBuildRequest, CartBuilder};
//! use medcart::core::clock::SystemClock;
//! use medcart::domain::{PrescriptionId, VendorId};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("medcart.toml")?;
//!     let store = create_store(&config.store).await?;
//!     let builder = CartBuilder::from_config(&config, store, Arc::new(SystemClock))?;
//!
//!     let request = CartBuildRequest::preview(PrescriptionId::new("rx-1")?)
//!         .with_preferred_vendor(Some(VendorId::new("site-a")?));
//!     let cart = builder.build(&request).await?;
//!
//!     println!("{} {} via {}", cart.pricing.total, cart.pricing.currency, cart.vendor);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`domain::MedcartError`]:
//!
//! ```rust,no_run
//! use medcart::domain::MedcartError;
//!
//! fn example() -> Result<(), MedcartError> {
//!     let config = medcart::config::load_config("medcart.toml")?;
//!     println!("{:?}", config.vendors.ids);
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Medcart uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! tracing::info!(prescription_id = "rx-1", "Building cart");
//! tracing::warn!(vendor = "site-a", "Quote service unavailable");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
