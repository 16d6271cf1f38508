//! Real-time quote reconciliation

pub mod reconciler;

pub use reconciler::{QuoteReconciler, ReconciledQuote};
