//! Vendor allocation planner
//!
//! Decides whether a prescription is fulfilled by a single vendor or split
//! per medication across vendors, whichever costs less.
//!
//! # Decision
//!
//! 1. Every vendor gets an all-in quote: the subtotal and total if it can
//!    supply every line. A vendor missing any line has no total.
//! 2. The single best vendor is the one with the lowest total. Ties go to
//!    the vendor listed first.
//! 3. The split plan gives each line to the vendor with the lowest unit
//!    price among those with enough stock (ties to the first listed).
//!    Each vendor used charges its delivery fee once. A line nobody can
//!    supply makes the split infeasible.
//! 4. A valid, fully stocked preferred vendor wins outright. Otherwise the
//!    split is used only if it is strictly cheaper than the single best.
//!
//! "No total" is modelled as `None` and always loses a comparison.

use crate::core::inventory::InventoryIndex;
use crate::domain::money::Money;
use crate::domain::{CartItem, CartVendor, MedicationLine, VendorId};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// How the chosen vendors were selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationStrategy {
    /// Caller-forced vendor, optimisation skipped
    Preferred,
    /// Cheapest vendor able to supply every line
    SingleBest,
    /// Per-line cheapest vendor
    Split,
}

impl fmt::Display for AllocationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationStrategy::Preferred => write!(f, "preferred"),
            AllocationStrategy::SingleBest => write!(f, "single"),
            AllocationStrategy::Split => write!(f, "split"),
        }
    }
}

/// What one vendor would charge to supply the whole prescription
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorQuote {
    pub vendor: VendorId,
    /// Sum of `unit_price * quantity`; meaningful only when `total` is set
    pub subtotal: Money,
    pub delivery_fee: Money,
    /// `subtotal + delivery_fee`, or `None` if any line is missing
    pub total: Option<Money>,
}

impl VendorQuote {
    pub fn is_complete(&self) -> bool {
        self.total.is_some()
    }
}

/// Outcome of planning
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationPlan {
    pub strategy: AllocationStrategy,
    /// All-in quotes in canonical vendor order
    pub vendor_quotes: Vec<VendorQuote>,
    /// Total of the split plan, `None` when infeasible
    pub split_total: Option<Money>,
    /// Distinct vendors carrying at least one line, in first-use order
    pub vendors_used: Vec<VendorId>,
    pub items: Vec<CartItem>,
    /// Sum over available items only
    pub base_subtotal: Money,
    /// Each used vendor's fee, counted once
    pub delivery_fee: Money,
}

impl AllocationPlan {
    /// Vendor label stored on the cart
    pub fn cart_vendor(&self) -> CartVendor {
        match (self.strategy, self.vendors_used.first()) {
            (AllocationStrategy::Split, _) => CartVendor::Multi,
            (_, Some(vendor)) => CartVendor::Single(vendor.clone()),
            (_, None) => CartVendor::Multi,
        }
    }

    /// All-in quote of one vendor
    pub fn quote_for(&self, vendor: &VendorId) -> Option<&VendorQuote> {
        self.vendor_quotes.iter().find(|q| &q.vendor == vendor)
    }
}

/// Compares optional totals where `None` means "cannot fulfil"
fn compare_totals(a: Option<Money>, b: Option<Money>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn line_cost(unit_price: Money, quantity: u32) -> Money {
    unit_price * Decimal::from(quantity)
}

/// Plans vendor allocation over a canonical, ordered vendor list
///
/// # Example
///
/// ```
/// use medcart::core::allocation::{AllocationPlanner, AllocationStrategy};
/// use medcart::core::inventory::{inventory_key, InventoryIndex};
/// use medcart::domain::{InventoryRecord, MedicationLine, VendorId};
/// use rust_decimal::Decimal;
///
/// let a = VendorId::new("site-a").unwrap();
/// let planner = AllocationPlanner::new(vec![a.clone()], [(a.clone(), Decimal::from(35))]);
/// let index = InventoryIndex::from_records([(
///     inventory_key(&a, "Enzflam"),
///     InventoryRecord::new(a.clone(), "Enzflam", 5, Decimal::from(42), "INR"),
/// )]);
///
/// let plan = planner.plan(&[MedicationLine::new("Enzflam")], &index, None);
/// assert_eq!(plan.strategy, AllocationStrategy::SingleBest);
/// assert_eq!(plan.base_subtotal + plan.delivery_fee, Decimal::from(77));
/// ```
#[derive(Debug, Clone)]
pub struct AllocationPlanner {
    vendor_ids: Vec<VendorId>,
    delivery_fees: HashMap<VendorId, Money>,
}

impl AllocationPlanner {
    /// `vendor_ids` order is the tie-break order. Vendors without a fee
    /// entry deliver for free.
    pub fn new(
        vendor_ids: Vec<VendorId>,
        delivery_fees: impl IntoIterator<Item = (VendorId, Money)>,
    ) -> Self {
        Self {
            vendor_ids,
            delivery_fees: delivery_fees.into_iter().collect(),
        }
    }

    pub fn vendor_ids(&self) -> &[VendorId] {
        &self.vendor_ids
    }

    fn fee(&self, vendor: &VendorId) -> Money {
        self.delivery_fees
            .get(vendor)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// All-in quote for every vendor, in canonical order
    pub fn vendor_quotes(
        &self,
        lines: &[MedicationLine],
        index: &InventoryIndex,
    ) -> Vec<VendorQuote> {
        self.vendor_ids
            .iter()
            .map(|vendor| {
                let delivery_fee = self.fee(vendor);
                let mut subtotal = Decimal::ZERO;
                let mut complete = true;
                for line in lines {
                    let quantity = line.requested_quantity();
                    match index.resolve(vendor, line) {
                        Some(record) if record.can_supply(quantity) => {
                            subtotal += line_cost(record.unit_price, quantity);
                        }
                        _ => {
                            complete = false;
                            break;
                        }
                    }
                }
                VendorQuote {
                    vendor: vendor.clone(),
                    subtotal,
                    delivery_fee,
                    total: complete.then_some(subtotal + delivery_fee),
                }
            })
            .collect()
    }

    /// Cheapest stocked vendor per line; `None` where no vendor has stock
    fn split_choices(
        &self,
        lines: &[MedicationLine],
        index: &InventoryIndex,
    ) -> Vec<Option<VendorId>> {
        lines
            .iter()
            .map(|line| {
                let quantity = line.requested_quantity();
                let mut best: Option<(&VendorId, Money)> = None;
                for vendor in &self.vendor_ids {
                    let Some(record) = index.resolve(vendor, line) else {
                        continue;
                    };
                    if !record.can_supply(quantity) {
                        continue;
                    }
                    if best.map_or(true, |(_, price)| record.unit_price < price) {
                        best = Some((vendor, record.unit_price));
                    }
                }
                best.map(|(vendor, _)| vendor.clone())
            })
            .collect()
    }

    fn split_total(
        &self,
        lines: &[MedicationLine],
        index: &InventoryIndex,
        choices: &[Option<VendorId>],
    ) -> Option<Money> {
        let mut subtotal = Decimal::ZERO;
        for (line, choice) in lines.iter().zip(choices) {
            let vendor = choice.as_ref()?;
            let record = index.resolve(vendor, line)?;
            subtotal += line_cost(record.unit_price, line.requested_quantity());
        }
        let fees: Money = distinct(choices.iter().flatten())
            .iter()
            .map(|vendor| self.fee(vendor))
            .sum();
        Some(subtotal + fees)
    }

    /// Produce the allocation for `lines`
    pub fn plan(
        &self,
        lines: &[MedicationLine],
        index: &InventoryIndex,
        preferred: Option<&VendorId>,
    ) -> AllocationPlan {
        let vendor_quotes = self.vendor_quotes(lines, index);

        // Strictly-less scan keeps the first vendor on ties
        let single_best = vendor_quotes
            .iter()
            .fold(None::<&VendorQuote>, |best, quote| match best {
                Some(b) if compare_totals(quote.total, b.total) != Ordering::Less => Some(b),
                _ => Some(quote),
            });

        let split_choices = self.split_choices(lines, index);
        let split_total = self.split_total(lines, index, &split_choices);

        let preferred_quote = preferred.and_then(|vendor| {
            vendor_quotes
                .iter()
                .find(|q| &q.vendor == vendor && q.is_complete())
        });

        let (strategy, assignments): (AllocationStrategy, Vec<Option<VendorId>>) =
            if let Some(quote) = preferred_quote {
                (
                    AllocationStrategy::Preferred,
                    vec![Some(quote.vendor.clone()); lines.len()],
                )
            } else if compare_totals(split_total, single_best.and_then(|q| q.total))
                == Ordering::Less
            {
                (AllocationStrategy::Split, split_choices)
            } else {
                let vendor = single_best.map(|q| q.vendor.clone());
                (AllocationStrategy::SingleBest, vec![vendor; lines.len()])
            };

        if let Some(vendor) = preferred {
            if strategy != AllocationStrategy::Preferred {
                tracing::info!(
                    preferred_vendor = %vendor,
                    "Preferred vendor unknown or cannot supply every line, optimising instead"
                );
            }
        }

        let vendors_used = match strategy {
            AllocationStrategy::Split => distinct(assignments.iter().flatten()),
            _ => distinct(assignments.iter().take(1).flatten()),
        };

        let items: Vec<CartItem> = lines
            .iter()
            .zip(&assignments)
            .map(|(line, assignment)| self.cart_item(line, assignment.as_ref(), index))
            .collect();

        let base_subtotal: Money = items.iter().filter_map(CartItem::line_total).sum();
        let delivery_fee: Money = vendors_used.iter().map(|v| self.fee(v)).sum();

        tracing::debug!(
            strategy = %strategy,
            vendors_used = vendors_used.len(),
            base_subtotal = %base_subtotal,
            delivery_fee = %delivery_fee,
            "Allocation planned"
        );

        AllocationPlan {
            strategy,
            vendor_quotes,
            split_total,
            vendors_used,
            items,
            base_subtotal,
            delivery_fee,
        }
    }

    fn cart_item(
        &self,
        line: &MedicationLine,
        vendor: Option<&VendorId>,
        index: &InventoryIndex,
    ) -> CartItem {
        let quantity = line.requested_quantity();
        let record = vendor.and_then(|v| index.resolve(v, line).map(|r| (v, r)));
        match record {
            Some((vendor, record)) if record.can_supply(quantity) => {
                CartItem::fulfilled(line, vendor.clone(), record.stock_qty, record.unit_price)
            }
            Some((_, record)) => CartItem::unavailable(line, record.stock_qty),
            None => CartItem::unavailable(line, 0),
        }
    }
}

/// Distinct vendors in first-appearance order
fn distinct<'a>(vendors: impl IntoIterator<Item = &'a VendorId>) -> Vec<VendorId> {
    let mut seen: Vec<VendorId> = Vec::new();
    for vendor in vendors {
        if !seen.contains(vendor) {
            seen.push(vendor.clone());
        }
    }
    seen
}
