//! Seed command implementation
//!
//! Creates the starter profile, pricing rule and inventory for every
//! configured vendor. Existing documents are never overwritten.

use crate::cli::commands::context::{print_json, report, AppContext, EXIT_OK};
use crate::core::vendors::ensure_vendor_seed;
use crate::domain::MedcartError;
use clap::Args;

/// Arguments for the seed command
#[derive(Args, Debug)]
pub struct SeedArgs {}

impl SeedArgs {
    /// Execute the seed command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        match self.run(config_path).await {
            Ok(()) => Ok(EXIT_OK),
            Err(e) => Ok(report(&e, "Failed to seed vendor data")),
        }
    }

    async fn run(&self, config_path: &str) -> Result<(), MedcartError> {
        let ctx = AppContext::open(config_path).await?;
        let vendor_ids = ctx.vendor_ids()?;

        let report = ensure_vendor_seed(
            ctx.store.as_ref(),
            &vendor_ids,
            &ctx.config.application.currency,
        )
        .await?;
        ctx.persist().await?;

        if report.is_noop() {
            eprintln!("✅ Vendor data already present");
        } else {
            eprintln!("✅ Vendor data seeded");
        }
        print_json(&report)
    }
}
