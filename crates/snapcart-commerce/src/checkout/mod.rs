//! Checkout module.
//!
//! Contains addresses, shipping and payment methods, the order payload, and
//! the reconciler that turns a cart into a submitted order.

mod address;
mod order;
mod reconciler;
mod shipping;

pub use address::Address;
pub use order::{ContactDetails, Order, OrderLine, OrderLineItem, OrderStatus, OrderVariation};
pub use reconciler::{
    build_order, send_order, submit_order, CheckoutRequest, OrderApi, OrderReceipt, PaymentHandoff,
    SubmissionError,
};
pub use shipping::{PaymentMethod, ShippingMethod, ShippingSelection};
