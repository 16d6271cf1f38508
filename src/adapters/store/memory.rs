//! In-memory document store with optional JSON snapshot
//!
//! Collections live behind a single `tokio::sync::RwLock`. When a snapshot
//! path is configured the store is loaded from it on open and written back
//! by [`PharmacyStore::persist`], which keeps the CLI stateful across runs.

use super::traits::PharmacyStore;
use crate::domain::ids::{CustomerId, OrderId, PrescriptionId, VendorId};
use crate::domain::{
    CustomerAccount, FulfillmentRequest, InventoryRecord, LoyaltyRedemption, Order,
    PrescriptionExtraction, PrescriptionRecord, Result, StoreError, VendorPricingRule,
    VendorProfile,
};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Collections {
    #[serde(default)]
    vendors: BTreeMap<String, VendorProfile>,
    #[serde(default)]
    pricing_rules: BTreeMap<String, VendorPricingRule>,
    #[serde(default)]
    inventory: BTreeMap<String, InventoryRecord>,
    #[serde(default)]
    customers: BTreeMap<String, CustomerAccount>,
    #[serde(default)]
    prescriptions: BTreeMap<String, PrescriptionRecord>,
    #[serde(default)]
    extractions: BTreeMap<String, PrescriptionExtraction>,
    #[serde(default)]
    carts: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    orders: BTreeMap<String, Order>,
    #[serde(default)]
    fulfillment_requests: BTreeMap<String, FulfillmentRequest>,
}

/// [`PharmacyStore`] kept in process memory
///
/// # Example
///
/// ```
/// use medcart::adapters::store::{InMemoryStore, PharmacyStore};
/// use medcart::domain::VendorId;
///
/// # async fn example() -> medcart::domain::Result<()> {
/// let store = InMemoryStore::new();
/// let vendor = VendorId::new("site-a").unwrap();
/// assert!(store.get_vendor(&vendor).await?.is_none());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: RwLock<Collections>,
    snapshot_path: Option<PathBuf>,
}

impl InMemoryStore {
    /// Creates an empty store with no snapshot file
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a store backed by the snapshot at `path`
    ///
    /// A missing file yields an empty store; it is created on the first
    /// [`PharmacyStore::persist`].
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Snapshot` if the file exists but cannot be read
    /// or parsed.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let collections = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                StoreError::Snapshot(format!("Failed to parse {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Collections::default(),
            Err(e) => {
                return Err(StoreError::Snapshot(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                ))
                .into())
            }
        };

        tracing::debug!(path = %path.display(), "Opened snapshot store");

        Ok(Self {
            collections: RwLock::new(collections),
            snapshot_path: Some(path),
        })
    }

    /// Path of the backing snapshot, if any
    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }
}

fn insert_if_absent<T>(map: &mut BTreeMap<String, T>, key: &str, value: T) -> bool {
    if map.contains_key(key) {
        return false;
    }
    map.insert(key.to_string(), value);
    true
}

#[async_trait]
impl PharmacyStore for InMemoryStore {
    async fn get_vendor(&self, vendor_id: &VendorId) -> Result<Option<VendorProfile>> {
        Ok(self.collections.read().await.vendors.get(vendor_id.as_str()).cloned())
    }

    async fn put_vendor(&self, profile: VendorProfile) -> Result<()> {
        let mut guard = self.collections.write().await;
        guard.vendors.insert(profile.id.to_string(), profile);
        Ok(())
    }

    async fn insert_vendor_if_absent(&self, profile: VendorProfile) -> Result<bool> {
        let mut guard = self.collections.write().await;
        let key = profile.id.to_string();
        Ok(insert_if_absent(&mut guard.vendors, &key, profile))
    }

    async fn get_pricing_rule(&self, vendor_id: &VendorId) -> Result<Option<VendorPricingRule>> {
        Ok(self
            .collections
            .read()
            .await
            .pricing_rules
            .get(vendor_id.as_str())
            .cloned())
    }

    async fn put_pricing_rule(&self, rule: VendorPricingRule) -> Result<()> {
        let mut guard = self.collections.write().await;
        guard.pricing_rules.insert(rule.vendor_id.to_string(), rule);
        Ok(())
    }

    async fn insert_pricing_rule_if_absent(&self, rule: VendorPricingRule) -> Result<bool> {
        let mut guard = self.collections.write().await;
        let key = rule.vendor_id.to_string();
        Ok(insert_if_absent(&mut guard.pricing_rules, &key, rule))
    }

    async fn get_inventory(&self, key: &str) -> Result<Option<InventoryRecord>> {
        Ok(self.collections.read().await.inventory.get(key).cloned())
    }

    async fn upsert_inventory(&self, key: &str, record: InventoryRecord) -> Result<()> {
        let mut guard = self.collections.write().await;
        guard.inventory.insert(key.to_string(), record);
        Ok(())
    }

    async fn insert_inventory_if_absent(
        &self,
        key: &str,
        record: InventoryRecord,
    ) -> Result<bool> {
        let mut guard = self.collections.write().await;
        Ok(insert_if_absent(&mut guard.inventory, key, record))
    }

    async fn list_inventory(&self, vendor_id: &VendorId) -> Result<Vec<InventoryRecord>> {
        let guard = self.collections.read().await;
        Ok(guard
            .inventory
            .values()
            .filter(|record| &record.vendor_id == vendor_id)
            .cloned()
            .collect())
    }

    async fn get_customer(&self, customer_id: &CustomerId) -> Result<Option<CustomerAccount>> {
        Ok(self
            .collections
            .read()
            .await
            .customers
            .get(customer_id.as_str())
            .cloned())
    }

    async fn put_customer(&self, account: CustomerAccount) -> Result<()> {
        let mut guard = self.collections.write().await;
        guard.customers.insert(account.id.to_string(), account);
        Ok(())
    }

    async fn redeem_loyalty_points(
        &self,
        customer_id: &CustomerId,
        points: u64,
        redemption_key: &str,
    ) -> Result<LoyaltyRedemption> {
        let mut guard = self.collections.write().await;
        let account = guard
            .customers
            .get_mut(customer_id.as_str())
            .ok_or_else(|| StoreError::NotFound(format!("customer {customer_id}")))?;

        if account.applied_redemptions.iter().any(|k| k == redemption_key) {
            return Ok(LoyaltyRedemption::AlreadyApplied);
        }

        account.loyalty_points = account.loyalty_points.saturating_sub(points);
        account.applied_redemptions.push(redemption_key.to_string());
        account.updated_at = Some(Utc::now());

        Ok(LoyaltyRedemption::Applied {
            remaining: account.loyalty_points,
        })
    }

    async fn get_prescription(&self, id: &PrescriptionId) -> Result<Option<PrescriptionRecord>> {
        Ok(self
            .collections
            .read()
            .await
            .prescriptions
            .get(id.as_str())
            .cloned())
    }

    async fn put_prescription(&self, record: PrescriptionRecord) -> Result<()> {
        let mut guard = self.collections.write().await;
        guard.prescriptions.insert(record.id.to_string(), record);
        Ok(())
    }

    async fn get_extraction(&self, id: &PrescriptionId) -> Result<Option<PrescriptionExtraction>> {
        Ok(self
            .collections
            .read()
            .await
            .extractions
            .get(id.as_str())
            .cloned())
    }

    async fn put_extraction(
        &self,
        id: &PrescriptionId,
        extraction: PrescriptionExtraction,
    ) -> Result<()> {
        let mut guard = self.collections.write().await;
        guard.extractions.insert(id.to_string(), extraction);
        Ok(())
    }

    async fn get_cart_document(&self, id: &PrescriptionId) -> Result<Option<serde_json::Value>> {
        Ok(self.collections.read().await.carts.get(id.as_str()).cloned())
    }

    async fn merge_cart_document(
        &self,
        id: &PrescriptionId,
        document: serde_json::Value,
    ) -> Result<()> {
        let serde_json::Value::Object(fields) = document else {
            return Err(StoreError::InvalidDocument {
                id: id.to_string(),
                message: "cart document must be a JSON object".to_string(),
            }
            .into());
        };

        let mut guard = self.collections.write().await;
        let stored = guard
            .carts
            .entry(id.to_string())
            .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));

        match stored.as_object_mut() {
            Some(existing) => {
                for (key, value) in fields {
                    existing.insert(key, value);
                }
            }
            None => *stored = serde_json::Value::Object(fields),
        }
        Ok(())
    }

    async fn put_order(&self, order: Order) -> Result<()> {
        let mut guard = self.collections.write().await;
        guard.orders.insert(order.id.to_string(), order);
        Ok(())
    }

    async fn get_order(&self, id: &OrderId) -> Result<Option<Order>> {
        Ok(self.collections.read().await.orders.get(id.as_str()).cloned())
    }

    async fn put_fulfillment_request(&self, request: FulfillmentRequest) -> Result<()> {
        let mut guard = self.collections.write().await;
        guard
            .fulfillment_requests
            .insert(request.id.clone(), request);
        Ok(())
    }

    async fn list_fulfillment_requests(
        &self,
        vendor_id: &VendorId,
    ) -> Result<Vec<FulfillmentRequest>> {
        let guard = self.collections.read().await;
        let mut requests: Vec<FulfillmentRequest> = guard
            .fulfillment_requests
            .values()
            .filter(|request| &request.vendor_id == vendor_id)
            .cloned()
            .collect();
        requests.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(requests)
    }

    async fn persist(&self) -> Result<()> {
        let Some(ref path) = self.snapshot_path else {
            return Ok(());
        };

        let guard = self.collections.read().await;
        let json = serde_json::to_string_pretty(&*guard)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StoreError::Snapshot(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        // Write-then-rename so a crash never leaves a truncated snapshot
        let tmp_path = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, json).await.map_err(|e| {
            StoreError::Snapshot(format!("Failed to write {}: {}", tmp_path.display(), e))
        })?;
        tokio::fs::rename(&tmp_path, path).await.map_err(|e| {
            StoreError::Snapshot(format!("Failed to replace {}: {}", path.display(), e))
        })?;

        tracing::debug!(path = %path.display(), "Snapshot written");
        Ok(())
    }
}
