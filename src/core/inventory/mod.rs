//! Inventory resolution
//!
//! Maps extracted medication lines onto vendor inventory records.

pub mod resolver;

pub use resolver::{
    candidate_names, inventory_key, resolve, slugify_medication_name, InventoryIndex,
};
