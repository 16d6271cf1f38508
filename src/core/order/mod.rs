//! Order placement

pub mod placement;

pub use placement::{OrderService, COD_PAYMENT_TYPE, COD_PROVIDER};
