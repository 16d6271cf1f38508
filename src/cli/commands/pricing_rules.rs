//! Pricing-rules command implementation

use crate::cli::commands::context::{parse_vendor, print_json, report, AppContext, EXIT_OK};
use crate::core::vendors::VendorAdmin;
use crate::domain::{MedcartError, PricingRulePatch, PromoCode};
use clap::{Args, Subcommand};
use rust_decimal::Decimal;

/// Arguments for the pricing-rules command
#[derive(Args, Debug)]
pub struct PricingRulesArgs {
    #[command(subcommand)]
    pub action: PricingRulesAction,
}

#[derive(Subcommand, Debug)]
pub enum PricingRulesAction {
    /// Print a vendor's pricing rule
    Show {
        /// Vendor id
        #[arg(long)]
        vendor: String,
    },

    /// Update fields of a vendor's pricing rule
    Set {
        /// Vendor id
        #[arg(long)]
        vendor: String,

        /// First off-peak hour (0-23)
        #[arg(long)]
        off_peak_start: Option<u8>,

        /// Hour the off-peak window ends (0-23, exclusive)
        #[arg(long)]
        off_peak_end: Option<u8>,

        /// Off-peak discount percentage
        #[arg(long)]
        off_peak_percent: Option<Decimal>,

        /// Minimum pre-discount subtotal for the bulk discount
        #[arg(long)]
        bulk_min_subtotal: Option<Decimal>,

        /// Bulk discount percentage
        #[arg(long)]
        bulk_percent: Option<Decimal>,

        /// Promo code as CODE=PERCENT, or CODE=PERCENT:inactive (repeatable;
        /// replaces the stored list)
        #[arg(long = "promo", value_parser = parse_promo)]
        promos: Vec<PromoCode>,

        /// Remove every promo code
        #[arg(long, conflicts_with = "promos")]
        clear_promos: bool,
    },
}

impl PricingRulesArgs {
    /// Execute the pricing-rules command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        match self.run(config_path).await {
            Ok(()) => Ok(EXIT_OK),
            Err(e) => Ok(report(&e, "Pricing-rules command failed")),
        }
    }

    async fn run(&self, config_path: &str) -> Result<(), MedcartError> {
        let ctx = AppContext::open(config_path).await?;
        let admin = VendorAdmin::new(
            ctx.store.clone(),
            ctx.vendor_ids()?,
            ctx.config.application.currency.clone(),
        );

        match &self.action {
            PricingRulesAction::Show { vendor } => {
                let vendor_id = parse_vendor(vendor)?;
                let rule = admin.pricing_rule(&vendor_id).await?.ok_or_else(|| {
                    MedcartError::MissingData(format!("pricing rule for {vendor_id}"))
                })?;
                ctx.persist().await?;
                print_json(&rule)
            }
            PricingRulesAction::Set { vendor, .. } => {
                let vendor_id = parse_vendor(vendor)?;
                let rule = admin.patch_pricing_rule(&vendor_id, &self.patch()).await?;
                ctx.persist().await?;
                eprintln!("✅ Updated pricing rule for {vendor_id}");
                print_json(&rule)
            }
        }
    }

    fn patch(&self) -> PricingRulePatch {
        match &self.action {
            PricingRulesAction::Show { .. } => PricingRulePatch::default(),
            PricingRulesAction::Set {
                off_peak_start,
                off_peak_end,
                off_peak_percent,
                bulk_min_subtotal,
                bulk_percent,
                promos,
                clear_promos,
                ..
            } => PricingRulePatch {
                off_peak_start_hour: *off_peak_start,
                off_peak_end_hour: *off_peak_end,
                off_peak_percent: *off_peak_percent,
                bulk_min_subtotal: *bulk_min_subtotal,
                bulk_percent: *bulk_percent,
                promo_codes: if *clear_promos {
                    Some(Vec::new())
                } else if promos.is_empty() {
                    None
                } else {
                    Some(promos.clone())
                },
            },
        }
    }
}

/// Parse `CODE=PERCENT` or `CODE=PERCENT:inactive`
fn parse_promo(value: &str) -> Result<PromoCode, String> {
    let (code, rest) = value
        .split_once('=')
        .ok_or_else(|| format!("expected CODE=PERCENT, got '{value}'"))?;
    let (percent, active) = match rest.split_once(':') {
        Some((percent, "inactive")) => (percent, false),
        Some((_, flag)) => return Err(format!("unknown promo flag '{flag}'")),
        None => (rest, true),
    };
    let code = code.trim();
    if code.is_empty() {
        return Err("promo code cannot be empty".to_string());
    }
    let percent: Decimal = percent
        .trim()
        .parse()
        .map_err(|e| format!("invalid promo percent '{percent}': {e}"))?;
    Ok(PromoCode {
        code: code.to_string(),
        percent,
        active,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(subcommand)]
        action: PricingRulesAction,
    }

    fn patch_from(argv: &[&str]) -> PricingRulePatch {
        let harness = Harness::parse_from(argv.iter().copied());
        PricingRulesArgs {
            action: harness.action,
        }
        .patch()
    }

    #[test]
    fn test_parse_promo() {
        let promo = parse_promo("FESTIVE10=10").unwrap();
        assert_eq!(promo.code, "FESTIVE10");
        assert_eq!(promo.percent, Decimal::from(10));
        assert!(promo.active);

        let inactive = parse_promo("OLD=2.5:inactive").unwrap();
        assert_eq!(inactive.percent, Decimal::new(25, 1));
        assert!(!inactive.active);

        assert!(parse_promo("NOPERCENT").is_err());
        assert!(parse_promo("=5").is_err());
        assert!(parse_promo("X=5:paused").is_err());
    }

    #[test]
    fn test_patch_from_flags() {
        let patch = patch_from(&[
            "medcart",
            "set",
            "--vendor",
            "site-a",
            "--bulk-percent",
            "7",
            "--promo",
            "A=5",
            "--promo",
            "B=6",
        ]);
        assert_eq!(patch.bulk_percent, Some(Decimal::from(7)));
        assert_eq!(patch.off_peak_percent, None);
        assert_eq!(patch.promo_codes.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_clear_promos_sends_empty_list() {
        let patch = patch_from(&["medcart", "set", "--vendor", "site-a", "--clear-promos"]);
        assert_eq!(patch.promo_codes, Some(Vec::new()));
    }
}
