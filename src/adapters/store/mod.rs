//! Document store abstraction layer
//!
//! The cart engine talks to storage only through [`PharmacyStore`], so the
//! in-memory backend can be swapped for a networked document database
//! without touching core code.

pub mod factory;
pub mod memory;
pub mod traits;

pub use factory::create_store;
pub use memory::InMemoryStore;
pub use traits::PharmacyStore;
