//! Real-time quote service integration

pub mod pathway;
pub mod traits;

pub use pathway::PathwayQuoteClient;
pub use traits::{QuoteRequest, QuoteService};
