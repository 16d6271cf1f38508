//! Discount selection and the sequential discount chain
//!
//! Discounts compound: each one is a percentage of the running subtotal
//! left by the previous ones, applied in a fixed order:
//! off-peak, bulk, promo, insurance, loyalty.

use crate::domain::money::{clamp_money, clamp_percent, percent_of, whole_units, Money};
use crate::domain::{
    CustomerAccount, DiscountLine, PricingBreakdown, PricingSource, VendorPricingRule,
};
use rust_decimal::Decimal;

pub const OFF_PEAK_CODE: &str = "OFF_PEAK";
pub const BULK_CODE: &str = "BULK";
pub const PROMO_CODE_PREFIX: &str = "PROMO_";
pub const INSURANCE_CODE: &str = "INSURANCE";
pub const LOYALTY_CODE: &str = "LOYALTY";

/// Best percentages available across the vendors of a cart
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiscountSelection {
    pub off_peak_percent: Decimal,
    pub bulk_percent: Decimal,
    /// Highest active promo as `(code, percent)`
    pub promo: Option<(String, Decimal)>,
}

impl DiscountSelection {
    /// Pick the best off-peak, bulk and promo discounts
    ///
    /// * off-peak: highest percent among rules whose window holds `hour`
    /// * bulk: highest percent whose threshold is met by `base_subtotal`
    ///   (always the pre-discount amount)
    /// * promo: highest active code; on equal percents the first seen wins
    pub fn select(rules: &[VendorPricingRule], hour: u32, base_subtotal: Money) -> Self {
        let off_peak_percent = rules
            .iter()
            .filter(|rule| rule.is_off_peak(hour))
            .map(|rule| rule.off_peak_percent)
            .max()
            .unwrap_or(Decimal::ZERO);

        let bulk_percent = rules
            .iter()
            .filter(|rule| base_subtotal >= rule.bulk_min_subtotal)
            .map(|rule| rule.bulk_percent)
            .max()
            .unwrap_or(Decimal::ZERO);

        let promo = rules
            .iter()
            .flat_map(|rule| rule.promo_codes.iter())
            .filter(|promo| promo.active)
            .fold(None::<(String, Decimal)>, |best, promo| match best {
                Some((_, pct)) if promo.percent <= pct => best,
                _ => Some((promo.code.clone(), promo.percent)),
            });

        Self {
            off_peak_percent,
            bulk_percent,
            promo,
        }
    }
}

/// Running subtotal plus the discount lines applied so far
struct DiscountChain {
    running: Money,
    lines: Vec<DiscountLine>,
}

impl DiscountChain {
    fn new(base_subtotal: Money) -> Self {
        Self {
            running: clamp_money(base_subtotal),
            lines: Vec::new(),
        }
    }

    fn apply_percent(&mut self, code: String, label: String, pct: Decimal) {
        if pct <= Decimal::ZERO {
            return;
        }
        let amount = percent_of(self.running, pct);
        self.push(code, label, amount);
    }

    fn push(&mut self, code: String, label: String, amount: Money) {
        if amount <= Decimal::ZERO {
            return;
        }
        self.lines.push(DiscountLine {
            code,
            label,
            amount,
        });
        self.running = clamp_money(self.running - amount);
    }
}

/// Percentage as shown in labels: `4`, `5.5`
fn display_percent(pct: Decimal) -> String {
    clamp_percent(pct).normalize().to_string()
}

/// Compute a breakdown from already-selected discounts
///
/// `customer` supplies insurance coverage and the loyalty balance; with
/// no customer neither applies. The result is tagged
/// [`PricingSource::Dynamic`].
pub fn compute_breakdown(
    selection: &DiscountSelection,
    customer: Option<&CustomerAccount>,
    currency: &str,
    base_subtotal: Money,
    delivery_fee: Money,
) -> PricingBreakdown {
    let mut chain = DiscountChain::new(base_subtotal);

    chain.apply_percent(
        OFF_PEAK_CODE.to_string(),
        format!(
            "Off-peak discount ({}%)",
            display_percent(selection.off_peak_percent)
        ),
        selection.off_peak_percent,
    );

    chain.apply_percent(
        BULK_CODE.to_string(),
        format!("Bulk discount ({}%)", display_percent(selection.bulk_percent)),
        selection.bulk_percent,
    );

    if let Some((ref code, pct)) = selection.promo {
        chain.apply_percent(
            format!("{PROMO_CODE_PREFIX}{code}"),
            format!("Promo applied ({code})"),
            pct,
        );
    }

    let insurance_pct = customer
        .map(|c| clamp_percent(c.insurance_coverage_pct))
        .unwrap_or(Decimal::ZERO);
    chain.apply_percent(
        INSURANCE_CODE.to_string(),
        format!("Insurance coverage ({}%)", display_percent(insurance_pct)),
        insurance_pct,
    );

    let loyalty_points = customer.map(|c| c.loyalty_points).unwrap_or(0);
    let loyalty_used = loyalty_points.min(whole_units(chain.running));
    chain.push(
        LOYALTY_CODE.to_string(),
        "Loyalty points".to_string(),
        Decimal::from(loyalty_used),
    );

    let delivery_fee = clamp_money(delivery_fee);
    let subtotal_after_discounts = chain.running;

    PricingBreakdown {
        currency: currency.to_string(),
        base_subtotal: clamp_money(base_subtotal),
        discounts: chain.lines,
        subtotal_after_discounts,
        delivery_fee,
        total: clamp_money(subtotal_after_discounts + delivery_fee),
        loyalty_points_used: loyalty_used,
        source: PricingSource::Dynamic,
    }
}
