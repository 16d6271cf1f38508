//! Place-order command implementation

use crate::cli::commands::context::{print_json, report, AppContext, EXIT_OK};
use crate::core::order::OrderService;
use crate::domain::{MedcartError, PrescriptionId};
use clap::Args;
use std::sync::Arc;

/// Arguments for the place-order command
#[derive(Args, Debug)]
pub struct PlaceOrderArgs {
    /// Prescription whose cart should be ordered
    #[arg(long)]
    pub prescription_id: String,
}

impl PlaceOrderArgs {
    /// Execute the place-order command
    ///
    /// Places a cash-on-delivery order against a freshly priced cart.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        match self.run(config_path).await {
            Ok(()) => Ok(EXIT_OK),
            Err(e) => Ok(report(&e, "Failed to place order")),
        }
    }

    async fn run(&self, config_path: &str) -> Result<(), MedcartError> {
        let prescription_id =
            PrescriptionId::new(&self.prescription_id).map_err(MedcartError::Validation)?;

        let ctx = AppContext::open(config_path).await?;
        let service = OrderService::new(Arc::new(ctx.cart_builder(None)?));
        let order = service.place_cash_on_delivery(&prescription_id).await?;
        ctx.persist().await?;

        eprintln!(
            "✅ Order {} placed: {} {} ({})",
            order.id, order.total, order.currency, order.payment_ref
        );
        print_json(&order)
    }
}
