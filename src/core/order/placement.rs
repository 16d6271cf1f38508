//! Cash-on-delivery order placement
//!
//! Orders are always placed against a freshly rebuilt cart priced in
//! commit mode, so the customer pays current prices and loyalty points
//! are deducted exactly once, keyed by the new order id.

use crate::core::cart::{CartBuildRequest, CartBuilder};
use crate::core::pricing::PricingMode;
use crate::domain::{
    Cart, CartItem, CartStatus, FulfillmentRequest, FulfillmentStatus, MedcartError, Order,
    OrderId, OrderLine, OrderStatus, PrescriptionId, Result, VendorOrder,
};
use std::sync::Arc;

pub const COD_PROVIDER: &str = "cod";
pub const COD_PAYMENT_TYPE: &str = "COD";

/// Places orders on top of the cart builder
pub struct OrderService {
    builder: Arc<CartBuilder>,
}

impl OrderService {
    pub fn new(builder: Arc<CartBuilder>) -> Self {
        Self { builder }
    }

    /// Place a cash-on-delivery order for a prescription
    ///
    /// Rebuilds the cart with the stored preferred vendor, commits pricing,
    /// then writes the order, one pending fulfillment request per vendor,
    /// and the payment reference on the prescription.
    ///
    /// Loyalty points are redeemed by the commit build, keyed by the new
    /// order id, before the order is written. A store failure after that
    /// point leaves the points spent without an order; carts with nothing
    /// to supply are refused before any write and redeem nothing, since
    /// their subtotal is zero.
    ///
    /// # Errors
    ///
    /// * `MedcartError::MissingData` if the prescription or extraction is absent
    /// * `MedcartError::Validation` if no line of the cart can be supplied
    /// * store errors
    pub async fn place_cash_on_delivery(&self, prescription_id: &PrescriptionId) -> Result<Order> {
        let store = self.builder.store();

        let mut prescription = store
            .get_prescription(prescription_id)
            .await?
            .ok_or_else(|| MedcartError::MissingData(format!("prescription {prescription_id}")))?;

        let order_id = OrderId::generate();
        let cart = self
            .builder
            .build(
                &CartBuildRequest::preview(prescription_id.clone())
                    .with_mode(PricingMode::commit(order_id.as_str())),
            )
            .await?;

        if cart.status != CartStatus::Confirmed {
            return Err(MedcartError::Validation(format!(
                "cart for {prescription_id} is not confirmed"
            )));
        }

        let vendor_orders = group_by_vendor(&cart);
        if vendor_orders.is_empty() {
            return Err(MedcartError::Validation(format!(
                "no medication of {prescription_id} can be supplied"
            )));
        }

        let payment_ref = format!("cod_{}", uuid::Uuid::new_v4());
        let order = Order {
            id: order_id.clone(),
            created_at: cart.priced_at,
            prescription_id: prescription_id.clone(),
            cart_id: prescription_id.clone(),
            status: OrderStatus::PlacedWithPharmacy,
            payment_provider: COD_PROVIDER.to_string(),
            payment_ref: payment_ref.clone(),
            vendor: cart.vendor.clone(),
            vendors_used: cart.vendors_used.clone(),
            vendor_orders: vendor_orders.clone(),
            currency: cart.pricing.currency.clone(),
            total: cart.pricing.total,
            loyalty_points_used: cart.pricing.loyalty_points_used,
        };
        store.put_order(order.clone()).await?;

        for vendor_order in vendor_orders {
            store
                .put_fulfillment_request(FulfillmentRequest {
                    id: uuid::Uuid::new_v4().to_string(),
                    created_at: cart.priced_at,
                    order_id: order_id.clone(),
                    prescription_id: prescription_id.clone(),
                    vendor_id: vendor_order.vendor,
                    status: FulfillmentStatus::Pending,
                    lines: vendor_order.lines,
                })
                .await?;
        }

        prescription.payment_type = Some(COD_PAYMENT_TYPE.to_string());
        prescription.payment_id = Some(payment_ref);
        prescription.updated_at = Some(cart.priced_at);
        store.put_prescription(prescription).await?;

        tracing::info!(
            order_id = %order.id,
            prescription_id = %prescription_id,
            vendor = %order.vendor,
            total = %order.total,
            vendors = order.vendor_orders.len(),
            "Order placed"
        );

        Ok(order)
    }
}

fn order_line(item: &CartItem) -> Option<OrderLine> {
    Some(OrderLine {
        name: item.name.clone(),
        quantity: item.requested_quantity(),
        unit_price: item.unit_price?,
    })
}

/// Available items grouped per vendor, vendors in first-use order
fn group_by_vendor(cart: &Cart) -> Vec<VendorOrder> {
    let mut orders: Vec<VendorOrder> = Vec::new();
    for item in cart.items.iter().filter(|item| item.available) {
        let (Some(vendor), Some(line)) = (item.vendor.as_ref(), order_line(item)) else {
            continue;
        };
        match orders.iter_mut().find(|o| &o.vendor == vendor) {
            Some(existing) => existing.lines.push(line),
            None => orders.push(VendorOrder {
                vendor: vendor.clone(),
                lines: vec![line],
            }),
        }
    }
    orders
}
