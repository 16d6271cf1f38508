//! External system integrations for Medcart.
//!
//! - [`store`] - Document store abstraction and the in-memory backend
//! - [`quote`] - Real-time quote service client
//!
//! Core components depend on the traits ([`store::PharmacyStore`],
//! [`quote::QuoteService`]) so tests can substitute in-memory or mock
//! implementations.

pub mod quote;
pub mod store;
