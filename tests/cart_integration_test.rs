//! End-to-end cart assembly against the in-memory store

use medcart::adapters::store::{InMemoryStore, PharmacyStore};
use medcart::core::cart::{CartBuildRequest, CartBuilder};
use medcart::core::clock::FixedClock;
use medcart::core::inventory::inventory_key;
use medcart::core::quote::QuoteReconciler;
use medcart::core::vendors::ensure_vendor_seed;
use medcart::domain::{
    CartVendor, InventoryRecord, MedicationLine, PrescriptionExtraction, PrescriptionId,
    PrescriptionRecord, PricingSource, VendorId,
};
use rust_decimal::Decimal;
use std::sync::Arc;

const AFTERNOON: &str = "2026-03-01T14:00:00+05:30";

fn vendor(id: &str) -> VendorId {
    VendorId::new(id).unwrap()
}

fn rx() -> PrescriptionId {
    PrescriptionId::new("rx-100").unwrap()
}

fn vendors() -> Vec<VendorId> {
    vec![vendor("site-a"), vendor("site-b"), vendor("site-c")]
}

/// Seeded store with delivery fees overridden per vendor
async fn seeded_store(fees: [i64; 3], lines: Vec<MedicationLine>) -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    ensure_vendor_seed(store.as_ref(), &vendors(), "INR")
        .await
        .unwrap();

    for (vendor_id, fee) in vendors().iter().zip(fees) {
        let mut profile = store.get_vendor(vendor_id).await.unwrap().unwrap();
        profile.base_delivery_fee = Decimal::from(fee);
        store.put_vendor(profile).await.unwrap();
    }

    store
        .put_prescription(PrescriptionRecord::new(rx(), None))
        .await
        .unwrap();
    store
        .put_extraction(&rx(), PrescriptionExtraction::from_medications(lines))
        .await
        .unwrap();
    store
}

async fn set_inventory(
    store: &InMemoryStore,
    vendor_id: &str,
    name: &str,
    stock: u32,
    price: i64,
) {
    let vendor_id = vendor(vendor_id);
    store
        .upsert_inventory(
            &inventory_key(&vendor_id, name),
            InventoryRecord::new(vendor_id.clone(), name, stock, Decimal::from(price), "INR"),
        )
        .await
        .unwrap();
}

fn builder_with(store: Arc<InMemoryStore>, vendor_ids: Vec<VendorId>) -> CartBuilder {
    CartBuilder::new(
        store,
        QuoteReconciler::disabled(),
        Arc::new(FixedClock::parse(AFTERNOON).unwrap()),
        vendor_ids,
        "INR",
    )
}

fn paracetamol() -> Vec<MedicationLine> {
    vec![MedicationLine::new("Paracetamol 500 mg").with_quantity(6)]
}

#[tokio::test]
async fn test_cheapest_single_vendor_wins() {
    let store = seeded_store([35, 25, 15], paracetamol()).await;

    let cart = builder_with(store.clone(), vendors())
        .build(&CartBuildRequest::preview(rx()))
        .await
        .unwrap();

    // 17 x 6 + 25
    assert_eq!(cart.vendor, CartVendor::Single(vendor("site-b")));
    assert_eq!(cart.pricing.base_subtotal, Decimal::from(102));
    assert!(cart.pricing.discounts.is_empty());
    assert_eq!(cart.pricing.total, Decimal::from(127));
    assert_eq!(cart.pricing.source, PricingSource::Local);

    let totals: Vec<_> = cart.totals_by_vendor.iter().map(|t| t.total).collect();
    assert_eq!(
        totals,
        vec![
            Some(Decimal::from(143)),
            Some(Decimal::from(127)),
            Some(Decimal::from(129)),
        ]
    );

    let stored = store.get_cart_document(&rx()).await.unwrap().unwrap();
    assert_eq!(stored["vendor"], "site-b");
}

#[tokio::test]
async fn test_out_of_stock_vendor_falls_to_next_best() {
    let store = seeded_store([35, 25, 15], paracetamol()).await;
    set_inventory(&store, "site-b", "Paracetamol 500 mg", 0, 17).await;

    let cart = builder_with(store, vendors())
        .build(&CartBuildRequest::preview(rx()))
        .await
        .unwrap();

    // site-a 143, site-c 129
    assert_eq!(cart.vendor, CartVendor::Single(vendor("site-c")));
    assert_eq!(cart.pricing.base_subtotal, Decimal::from(114));
    assert_eq!(cart.totals_by_vendor[1].total, None);
    assert!(cart.items.iter().all(|item| item.available));
}

#[tokio::test]
async fn test_bulk_discount_on_pre_discount_subtotal() {
    let lines = vec![MedicationLine::new("Drug Bulk").with_quantity(6)];
    let store = seeded_store([35, 35, 50], lines).await;
    set_inventory(&store, "site-a", "Drug Bulk", 10, 100).await;

    let cart = builder_with(store, vendors())
        .build(&CartBuildRequest::preview(rx()))
        .await
        .unwrap();

    assert_eq!(cart.vendor, CartVendor::Single(vendor("site-a")));
    let bulk = cart.pricing.discount("BULK").unwrap();
    assert_eq!(bulk.amount, Decimal::from(30));
    assert_eq!(bulk.label, "Bulk discount (5%)");
    assert_eq!(cart.pricing.subtotal_after_discounts, Decimal::from(570));
    assert_eq!(cart.pricing.total, Decimal::from(605));
}

#[tokio::test]
async fn test_split_when_no_vendor_has_everything() {
    let store = seeded_store(
        [35, 35, 50],
        vec![MedicationLine::new("Drug X"), MedicationLine::new("Drug Y")],
    )
    .await;
    set_inventory(&store, "site-a", "Drug X", 5, 10).await;
    set_inventory(&store, "site-b", "Drug Y", 5, 10).await;

    let cart = builder_with(store, vendors())
        .build(&CartBuildRequest::preview(rx()))
        .await
        .unwrap();

    assert_eq!(cart.vendor, CartVendor::Multi);
    assert!(cart.is_split());
    assert_eq!(cart.vendors_used, vec![vendor("site-a"), vendor("site-b")]);
    assert_eq!(cart.pricing.base_subtotal, Decimal::from(20));
    assert_eq!(cart.pricing.delivery_fee, Decimal::from(70));
    assert_eq!(cart.delivery.per_vendor.len(), 2);
    assert!(cart.totals_by_vendor.iter().all(|t| t.total.is_none()));
}

#[tokio::test]
async fn test_unavailable_line_is_reported_not_priced() {
    let store = seeded_store(
        [35, 25, 15],
        vec![
            MedicationLine::new("Paracetamol 500 mg").with_quantity(6),
            MedicationLine::new("Unobtainium"),
        ],
    )
    .await;

    let cart = builder_with(store, vendors())
        .build(&CartBuildRequest::preview(rx()))
        .await
        .unwrap();

    let missing: Vec<_> = cart.unavailable_items().map(|i| i.name.as_str()).collect();
    assert_eq!(missing, vec!["Unobtainium"]);
    assert_eq!(cart.items[1].unit_price, None);
    // No vendor stocks everything, so the first configured vendor is used
    assert_eq!(cart.vendor, CartVendor::Single(vendor("site-a")));
    assert_eq!(cart.pricing.base_subtotal, Decimal::from(108));
}

#[tokio::test]
async fn test_equal_totals_go_to_first_configured_vendor() {
    let lines = vec![MedicationLine::new("Drug T").with_quantity(2)];
    let store = seeded_store([35, 35, 50], lines).await;
    set_inventory(&store, "site-a", "Drug T", 5, 20).await;
    set_inventory(&store, "site-b", "Drug T", 5, 20).await;

    let cart = builder_with(store.clone(), vendors())
        .build(&CartBuildRequest::preview(rx()))
        .await
        .unwrap();
    assert_eq!(cart.vendor, CartVendor::Single(vendor("site-a")));

    let reordered = vec![vendor("site-b"), vendor("site-a"), vendor("site-c")];
    let cart = builder_with(store, reordered)
        .build(&CartBuildRequest::preview(rx()))
        .await
        .unwrap();
    assert_eq!(cart.vendor, CartVendor::Single(vendor("site-b")));
}

#[tokio::test]
async fn test_preferred_vendor_is_honoured_when_complete() {
    let store = seeded_store([35, 25, 15], paracetamol()).await;

    let cart = builder_with(store, vendors())
        .build(
            &CartBuildRequest::preview(rx()).with_preferred_vendor(Some(vendor("site-a"))),
        )
        .await
        .unwrap();

    assert_eq!(cart.vendor, CartVendor::Single(vendor("site-a")));
    assert_eq!(cart.preferred_vendor_id, Some(vendor("site-a")));
    assert_eq!(cart.pricing.total, Decimal::from(143));
}

#[tokio::test]
async fn test_preview_builds_are_repeatable() {
    let store = seeded_store([35, 25, 15], paracetamol()).await;
    let builder = builder_with(store, vendors());

    let first = builder.build(&CartBuildRequest::preview(rx())).await.unwrap();
    let second = builder.build(&CartBuildRequest::preview(rx())).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_off_peak_discount_uses_cart_clock() {
    let store = seeded_store([35, 25, 15], paracetamol()).await;
    let builder = CartBuilder::new(
        store,
        QuoteReconciler::disabled(),
        Arc::new(FixedClock::parse("2026-03-01T23:30:00+05:30").unwrap()),
        vendors(),
        "INR",
    );

    let cart = builder.build(&CartBuildRequest::preview(rx())).await.unwrap();

    // site-b off-peak is 6% of 102
    let off_peak = cart.pricing.discount("OFF_PEAK").unwrap();
    assert_eq!(off_peak.amount, Decimal::new(612, 2));
    assert_eq!(cart.pricing.total, Decimal::new(12088, 2));
}
