//! Order placement and loyalty redemption across rebuilds

use medcart::adapters::store::{InMemoryStore, PharmacyStore};
use medcart::core::cart::{CartBuildRequest, CartBuilder};
use medcart::core::clock::FixedClock;
use medcart::core::order::OrderService;
use medcart::core::quote::QuoteReconciler;
use medcart::core::vendors::ensure_vendor_seed;
use medcart::domain::{
    CartVendor, CustomerAccount, CustomerId, FulfillmentStatus, MedicationLine, OrderStatus,
    PrescriptionExtraction, PrescriptionId, PrescriptionRecord, VendorId,
};
use rust_decimal::Decimal;
use std::sync::Arc;

fn vendor(id: &str) -> VendorId {
    VendorId::new(id).unwrap()
}

fn vendors() -> Vec<VendorId> {
    vec![vendor("site-a"), vendor("site-b"), vendor("site-c")]
}

fn rx() -> PrescriptionId {
    PrescriptionId::new("rx-200").unwrap()
}

fn customer() -> CustomerId {
    CustomerId::new("cust-200").unwrap()
}

async fn prepare(store: &InMemoryStore) {
    ensure_vendor_seed(store, &vendors(), "INR").await.unwrap();
    for (vendor_id, fee) in vendors().iter().zip([35, 25, 15]) {
        let mut profile = store.get_vendor(vendor_id).await.unwrap().unwrap();
        profile.base_delivery_fee = Decimal::from(fee);
        store.put_vendor(profile).await.unwrap();
    }

    store
        .put_customer(
            CustomerAccount::new(customer())
                .with_loyalty_points(30)
                .with_insurance(Decimal::from(10)),
        )
        .await
        .unwrap();
    store
        .put_prescription(PrescriptionRecord::new(rx(), Some(customer())))
        .await
        .unwrap();
    store
        .put_extraction(
            &rx(),
            PrescriptionExtraction::from_medications(vec![
                MedicationLine::new("Paracetamol 500 mg").with_quantity(6)
            ]),
        )
        .await
        .unwrap();
}

fn builder(store: Arc<dyn PharmacyStore>) -> CartBuilder {
    CartBuilder::new(
        store,
        QuoteReconciler::disabled(),
        Arc::new(FixedClock::parse("2026-03-01T14:00:00+05:30").unwrap()),
        vendors(),
        "INR",
    )
}

async fn balance(store: &dyn PharmacyStore) -> u64 {
    store
        .get_customer(&customer())
        .await
        .unwrap()
        .unwrap()
        .loyalty_points
}

#[tokio::test]
async fn test_preview_shows_loyalty_without_spending_it() {
    let store = Arc::new(InMemoryStore::new());
    prepare(&store).await;
    let builder = builder(store.clone());

    for _ in 0..3 {
        let cart = builder.build(&CartBuildRequest::preview(rx())).await.unwrap();
        // 102 - 10% insurance = 91.80, then 30 points
        let insurance = cart.pricing.discount("INSURANCE").unwrap();
        assert_eq!(insurance.amount, Decimal::new(1020, 2));
        assert_eq!(cart.pricing.loyalty_points_used, 30);
        assert_eq!(cart.pricing.total, Decimal::new(8680, 2));
    }
    assert_eq!(balance(store.as_ref()).await, 30);
}

#[tokio::test]
async fn test_order_spends_loyalty_exactly_once() {
    let store = Arc::new(InMemoryStore::new());
    prepare(&store).await;
    let builder = Arc::new(builder(store.clone()));

    let order = OrderService::new(builder.clone())
        .place_cash_on_delivery(&rx())
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::PlacedWithPharmacy);
    assert_eq!(order.vendor, CartVendor::Single(vendor("site-b")));
    assert_eq!(order.loyalty_points_used, 30);
    assert_eq!(order.total, Decimal::new(8680, 2));
    assert_eq!(balance(store.as_ref()).await, 0);

    // The next quote for the same prescription has no points left
    let cart = builder.build(&CartBuildRequest::preview(rx())).await.unwrap();
    assert_eq!(cart.pricing.loyalty_points_used, 0);
    assert!(cart.pricing.discount("LOYALTY").is_none());
    assert_eq!(cart.pricing.total, Decimal::new(11680, 2));
}

#[tokio::test]
async fn test_order_writes_fulfillment_and_payment() {
    let store = Arc::new(InMemoryStore::new());
    prepare(&store).await;

    let order = OrderService::new(Arc::new(builder(store.clone())))
        .place_cash_on_delivery(&rx())
        .await
        .unwrap();

    let requests = store
        .list_fulfillment_requests(&vendor("site-b"))
        .await
        .unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].status, FulfillmentStatus::Pending);
    assert_eq!(requests[0].lines[0].unit_price, Decimal::from(17));
    assert!(store
        .list_fulfillment_requests(&vendor("site-a"))
        .await
        .unwrap()
        .is_empty());

    let prescription = store.get_prescription(&rx()).await.unwrap().unwrap();
    assert_eq!(prescription.payment_type.as_deref(), Some("COD"));
    assert_eq!(prescription.payment_id.as_deref(), Some(order.payment_ref.as_str()));
}

#[tokio::test]
async fn test_order_survives_snapshot_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("medcart.json");

    let store = Arc::new(InMemoryStore::open(&path).await.unwrap());
    prepare(&store).await;
    let order = OrderService::new(Arc::new(builder(store.clone())))
        .place_cash_on_delivery(&rx())
        .await
        .unwrap();
    store.persist().await.unwrap();

    let reopened = InMemoryStore::open(&path).await.unwrap();
    assert_eq!(reopened.get_order(&order.id).await.unwrap(), Some(order));
    assert_eq!(balance(&reopened).await, 0);
    assert!(reopened.get_cart_document(&rx()).await.unwrap().is_some());
}
