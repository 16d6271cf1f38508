//! Fuzzy medication-name to inventory-record resolution
//!
//! Extracted medication names rarely match a vendor's catalogue exactly.
//! Each line is expanded into an ordered list of name candidates and the
//! first candidate whose `vendorId__slug` key exists wins. The candidate
//! order is the tie-break policy; reordering it changes vendor selection.

use crate::adapters::store::PharmacyStore;
use crate::domain::{InventoryRecord, MedicationLine, Result, VendorId};
use futures::stream::{self, StreamExt, TryStreamExt};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

const MAX_SLUG_LEN: usize = 80;

fn strength_unit_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b\d+(?:\.\d+)?\s*(?:mg|mcg|g|ml|iu)\b")
            .expect("strength pattern is valid")
    })
}

fn multi_space_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s{2,}").expect("whitespace pattern is valid"))
}

fn non_alphanumeric_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("slug pattern is valid"))
}

/// Ordered, de-duplicated lookup names for a medication line
///
/// 1. the raw name
/// 2. raw name + strength, when the strength is not already in the name
/// 3. the name with strength/unit tokens removed, when that differs
///
/// # Example
///
/// ```
/// use medcart::core::inventory::candidate_names;
/// use medcart::domain::MedicationLine;
///
/// let line = MedicationLine::new("Metformin 500mg").with_strength("500mg");
/// assert_eq!(candidate_names(&line), vec!["Metformin 500mg", "Metformin"]);
/// ```
pub fn candidate_names(line: &MedicationLine) -> Vec<String> {
    let raw = line.name.trim();
    if raw.is_empty() {
        return Vec::new();
    }

    let mut candidates = vec![raw.to_string()];

    if let Some(strength) = line.strength.as_deref().map(str::trim) {
        if !strength.is_empty() && !raw.to_lowercase().contains(&strength.to_lowercase()) {
            candidates.push(format!("{raw} {strength}"));
        }
    }

    let stripped = strength_unit_pattern().replace_all(raw, "");
    let stripped = multi_space_pattern().replace_all(&stripped, " ");
    let stripped = stripped.trim();
    if !stripped.is_empty() && stripped.to_lowercase() != raw.to_lowercase() {
        candidates.push(stripped.to_string());
    }

    let mut unique: Vec<String> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !unique.contains(&candidate) {
            unique.push(candidate);
        }
    }
    unique
}

/// Lowercase, hyphen-separated catalogue slug, at most 80 characters
pub fn slugify_medication_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let slug = non_alphanumeric_pattern().replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');
    // The slug is ASCII here, so byte truncation is char-safe
    slug[..slug.len().min(MAX_SLUG_LEN)].to_string()
}

/// Composite inventory key `vendorId__slug(name)`
pub fn inventory_key(vendor_id: &VendorId, name: &str) -> String {
    format!("{}__{}", vendor_id, slugify_medication_name(name))
}

/// Resolve one line at one vendor with sequential point reads
///
/// Stops at the first candidate that exists.
///
/// # Errors
///
/// Propagates store read failures.
pub async fn resolve(
    store: &dyn PharmacyStore,
    vendor_id: &VendorId,
    line: &MedicationLine,
) -> Result<Option<InventoryRecord>> {
    for name in candidate_names(line) {
        if let Some(record) = store.get_inventory(&inventory_key(vendor_id, &name)).await? {
            return Ok(Some(record));
        }
    }
    Ok(None)
}

/// Snapshot of every inventory record a cart build may need
///
/// Built from one bounded fan-out of point reads, then queried
/// synchronously by the planner.
#[derive(Debug, Clone, Default)]
pub struct InventoryIndex {
    records: HashMap<String, InventoryRecord>,
}

impl InventoryIndex {
    /// Fetch all `vendor x line x candidate` keys from the store
    ///
    /// At most `max_concurrent_reads` reads are in flight at once. All
    /// reads complete before this returns.
    ///
    /// # Errors
    ///
    /// Returns the first store error encountered.
    pub async fn fetch(
        store: &dyn PharmacyStore,
        vendor_ids: &[VendorId],
        lines: &[MedicationLine],
        max_concurrent_reads: usize,
    ) -> Result<Self> {
        let mut keys: Vec<String> = Vec::new();
        for line in lines {
            let names = candidate_names(line);
            for vendor_id in vendor_ids {
                for name in &names {
                    let key = inventory_key(vendor_id, name);
                    if !keys.contains(&key) {
                        keys.push(key);
                    }
                }
            }
        }

        tracing::debug!(
            keys = keys.len(),
            vendors = vendor_ids.len(),
            lines = lines.len(),
            "Fetching inventory records"
        );

        let fetched: Vec<(String, Option<InventoryRecord>)> = stream::iter(keys)
            .map(|key| async move {
                let record = store.get_inventory(&key).await?;
                Ok::<_, crate::domain::MedcartError>((key, record))
            })
            .buffer_unordered(max_concurrent_reads.max(1))
            .try_collect()
            .await?;

        let records = fetched
            .into_iter()
            .filter_map(|(key, record)| record.map(|r| (key, r)))
            .collect();

        Ok(Self { records })
    }

    /// Build an index from already-keyed records
    pub fn from_records(records: impl IntoIterator<Item = (String, InventoryRecord)>) -> Self {
        Self {
            records: records.into_iter().collect(),
        }
    }

    /// First record matching a name candidate of `line` at `vendor_id`
    pub fn resolve(
        &self,
        vendor_id: &VendorId,
        line: &MedicationLine,
    ) -> Option<&InventoryRecord> {
        candidate_names(line)
            .iter()
            .find_map(|name| self.records.get(&inventory_key(vendor_id, name)))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
