//! Money helpers
//!
//! Every monetary value is a [`Decimal`]. Intermediate values are rounded to
//! cents and clamped to zero at each step, so a chain of discounts can never
//! drift below zero or accumulate sub-cent residue.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Monetary amount in the cart currency
pub type Money = Decimal;

/// Rounds to 2 decimal places (half away from zero) and clamps to >= 0
pub fn clamp_money(amount: Decimal) -> Decimal {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.max(Decimal::ZERO)
}

/// Clamps a percentage into `[0, 100]`
pub fn clamp_percent(pct: Decimal) -> Decimal {
    pct.max(Decimal::ZERO).min(Decimal::ONE_HUNDRED)
}

/// Computes `pct` percent of `amount`, clamping the percentage first
pub fn percent_of(amount: Decimal, pct: Decimal) -> Decimal {
    clamp_money(amount * clamp_percent(pct) / Decimal::ONE_HUNDRED)
}

/// Converts a floating point number into money, rejecting NaN and infinities
pub fn money_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value).map(clamp_money)
}

/// Whole currency units contained in `amount` (floor)
pub fn whole_units(amount: Decimal) -> u64 {
    amount.floor().to_u64().unwrap_or(0)
}
