//! Shipping and payment method types.

use crate::ids::{PaymentMethodId, ShippingMethodId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A way to get the order to the buyer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShippingMethod {
    /// Unique identifier.
    pub id: ShippingMethodId,
    /// Display name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Flat fee added to the order.
    pub fee: Money,
    /// Home delivery; requires a complete shipping address.
    #[serde(default)]
    pub requires_address: bool,
}

impl ShippingMethod {
    /// Collect-at-school method with no fee.
    pub fn pickup(id: impl Into<ShippingMethodId>, name: impl Into<String>, fee: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            fee,
            requires_address: false,
        }
    }

    /// Courier delivery to the buyer's address.
    pub fn delivery(id: impl Into<ShippingMethodId>, name: impl Into<String>, fee: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            fee,
            requires_address: true,
        }
    }

    /// Check if this is free shipping.
    pub fn is_free(&self) -> bool {
        self.fee.is_zero()
    }
}

/// The shipping method recorded on an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShippingSelection {
    /// Selected method ID.
    pub method_id: ShippingMethodId,
    /// Method name (denormalized).
    pub method_name: String,
    /// Fee charged.
    pub fee: Money,
    /// Whether a shipping address was collected.
    pub delivered: bool,
}

impl ShippingSelection {
    /// Create from a shipping method.
    pub fn from_method(method: &ShippingMethod) -> Self {
        Self {
            method_id: method.id.clone(),
            method_name: method.name.clone(),
            fee: method.fee,
            delivered: method.requires_address,
        }
    }
}

/// A payment option offered at checkout (e.g., online banking, card).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentMethod {
    pub id: PaymentMethodId,
    pub name: String,
    /// Payment gateway channel code passed to the order API.
    #[serde(default)]
    pub gateway_channel: Option<String>,
}

impl PaymentMethod {
    pub fn new(id: impl Into<PaymentMethodId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            gateway_channel: None,
        }
    }
}
