//! Build-cart command implementation
//!
//! Builds (or rebuilds) the cart for a prescription in preview mode and
//! prints it. Preview builds never touch loyalty balances.

use crate::cli::commands::context::{print_json, report, AppContext, EXIT_OK};
use crate::core::cart::{CartBuildRequest, VendorPreference};
use crate::core::clock::{Clock, FixedClock};
use crate::domain::{MedcartError, PrescriptionId};
use clap::Args;
use std::sync::Arc;

/// Arguments for the build-cart command
#[derive(Args, Debug)]
pub struct BuildCartArgs {
    /// Prescription to build the cart for
    #[arg(long)]
    pub prescription_id: String,

    /// Vendor to use when it can supply every line, or `auto` to clear a
    /// stored preference. Without it the stored preference applies.
    #[arg(long)]
    pub preferred_vendor: Option<String>,

    /// Price as of this RFC 3339 instant instead of now
    #[arg(long)]
    pub at: Option<String>,
}

impl BuildCartArgs {
    /// Execute the build-cart command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        match self.run(config_path).await {
            Ok(()) => Ok(EXIT_OK),
            Err(e) => Ok(report(&e, "Failed to build cart")),
        }
    }

    async fn run(&self, config_path: &str) -> Result<(), MedcartError> {
        let prescription_id =
            PrescriptionId::new(&self.prescription_id).map_err(MedcartError::Validation)?;
        let preference = self
            .preferred_vendor
            .as_deref()
            .map(VendorPreference::parse)
            .transpose()
            .map_err(MedcartError::Validation)?
            .unwrap_or_default();
        let clock = self
            .at
            .as_deref()
            .map(|at| FixedClock::parse(at).map(|c| Arc::new(c) as Arc<dyn Clock>))
            .transpose()
            .map_err(MedcartError::Validation)?;

        let ctx = AppContext::open(config_path).await?;
        let builder = ctx.cart_builder(clock)?;
        let cart = builder
            .build(
                &CartBuildRequest::preview(prescription_id).with_preference(preference),
            )
            .await?;
        ctx.persist().await?;

        eprintln!(
            "✅ Cart {} via {}: {} {}",
            cart.prescription_id, cart.vendor, cart.pricing.total, cart.pricing.currency
        );
        for item in cart.unavailable_items() {
            eprintln!("   ⚠️  Unavailable: {}", item.name);
        }
        print_json(&cart)
    }
}
