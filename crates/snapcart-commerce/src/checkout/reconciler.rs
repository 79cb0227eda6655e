//! Checkout reconciliation: cart + form -> order -> payment handoff.

use crate::buyer::BuyerProfile;
use crate::cart::{current_timestamp, CartStore};
use crate::checkout::{
    Address, ContactDetails, Order, OrderLine, OrderStatus, PaymentMethod, ShippingMethod,
    ShippingSelection,
};
use crate::error::CommerceError;
use crate::ids::OrderId;
use crate::money::Money;
use crate::pricing;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{info, warn};

/// What the buyer filled in on the checkout page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckoutRequest {
    pub shipping_method: ShippingMethod,
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub shipping_address: Address,
    #[serde(default)]
    pub remark: Option<String>,
}

/// Order API acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderReceipt {
    pub order_id: OrderId,
    /// Fields to post to the payment gateway.
    pub gateway_fields: BTreeMap<String, String>,
}

/// Why the order API refused an order.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmissionError {
    /// The order references albums, packages or options the backend no
    /// longer recognises.
    #[error("stale catalog reference: {0}")]
    StaleCatalog(String),

    /// Rejected for any other reason (validation, closed store).
    #[error("order rejected: {0}")]
    Rejected(String),

    /// Network or server failure.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Everything the caller needs to redirect the buyer to the gateway.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentHandoff {
    pub order_id: OrderId,
    pub payment_method: PaymentMethod,
    pub gateway_fields: BTreeMap<String, String>,
    pub amount: Money,
}

/// Remote order service.
#[async_trait]
pub trait OrderApi: Send + Sync {
    async fn submit(&self, order: &Order) -> Result<OrderReceipt, SubmissionError>;
}

/// Build the order payload.
///
/// Checks run in order and stop at the first failure: empty cart, missing
/// payment method, then (for delivery methods) blank address fields.
pub fn build_order(
    cart: &CartStore,
    buyer: &BuyerProfile,
    request: &CheckoutRequest,
) -> Result<Order, CommerceError> {
    if cart.is_empty() {
        return Err(CommerceError::EmptyCart);
    }

    let payment_method = request
        .payment_method
        .clone()
        .ok_or(CommerceError::MissingPaymentMethod)?;

    let shipping_address = if request.shipping_method.requires_address {
        let missing = request.shipping_address.missing_fields();
        if !missing.is_empty() {
            return Err(CommerceError::ShippingAddressRequired { missing });
        }
        Some(request.shipping_address.clone())
    } else {
        None
    };

    let shipping_total = request.shipping_method.fee;
    let subtotal = cart.subtotal()?;
    let grand_total = pricing::order_total(cart.entries(), shipping_total)?;

    let remark = request
        .remark
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string);

    Ok(Order {
        contact: ContactDetails::from_buyer(buyer),
        lines: cart.entries().iter().map(OrderLine::from_entry).collect(),
        shipping: ShippingSelection::from_method(&request.shipping_method),
        shipping_address,
        payment_method,
        remark,
        subtotal,
        shipping_total,
        grand_total,
        currency: cart.currency(),
        status: OrderStatus::PendingPayment,
        created_at: current_timestamp(),
    })
}

/// Build and submit the order once.
///
/// The cart is cleared only after the API accepts the order.
pub async fn submit_order<A: OrderApi + ?Sized>(
    api: &A,
    cart: &mut CartStore,
    buyer: &BuyerProfile,
    request: &CheckoutRequest,
) -> Result<PaymentHandoff, CommerceError> {
    let order = build_order(cart, buyer, request)?;
    send_order(api, cart, order).await
}

/// Submit an order already built from `cart`, clearing the cart only if the
/// API accepts it.
pub async fn send_order<A: OrderApi + ?Sized>(
    api: &A,
    cart: &mut CartStore,
    order: Order,
) -> Result<PaymentHandoff, CommerceError> {
    match api.submit(&order).await {
        Ok(receipt) => {
            info!(
                order_id = %receipt.order_id,
                lines = order.lines.len(),
                items = order.item_count(),
                grand_total = order.grand_total.amount_cents,
                "Order accepted"
            );
            cart.clear();
            Ok(PaymentHandoff {
                order_id: receipt.order_id,
                payment_method: order.payment_method,
                gateway_fields: receipt.gateway_fields,
                amount: order.grand_total,
            })
        }
        Err(e) => {
            let restart_required = matches!(e, SubmissionError::StaleCatalog(_));
            warn!(error = %e, restart_required, "Order submission failed");
            Err(CommerceError::OrderSubmissionFailed {
                message: e.to_string(),
                restart_required,
            })
        }
    }
}
