//! Storefront configuration.

use crate::cart::MAX_QUANTITY_PER_ENTRY;
use crate::checkout::{PaymentMethod, ShippingMethod};
use crate::error::CommerceError;
use crate::ids::{PaymentMethodId, ShippingMethodId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Settings for one storefront (one photo studio).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorefrontConfig {
    /// Currency every price in the catalog is quoted in.
    #[serde(default)]
    pub currency: Currency,

    /// Per-entry quantity limit.
    #[serde(default = "default_max_quantity")]
    pub max_quantity_per_entry: i64,

    /// Route prefix used to build cart entry edit links.
    #[serde(default = "default_edit_route_prefix")]
    pub edit_route_prefix: String,

    /// Key-value store holding the cart and draft selection.
    #[serde(default = "default_store_name")]
    pub store_name: String,

    #[serde(default = "default_shipping_methods")]
    pub shipping_methods: Vec<ShippingMethod>,

    #[serde(default = "default_payment_methods")]
    pub payment_methods: Vec<PaymentMethod>,
}

fn default_max_quantity() -> i64 {
    MAX_QUANTITY_PER_ENTRY
}

fn default_edit_route_prefix() -> String {
    "/cart/edit".to_string()
}

fn default_store_name() -> String {
    snapcart_cache::DEFAULT_STORE.to_string()
}

fn default_shipping_methods() -> Vec<ShippingMethod> {
    vec![
        ShippingMethod::pickup("pickup", "Collect at school", Money::zero(Currency::MYR)),
        ShippingMethod::delivery("courier", "Courier delivery", Money::from_units(15, Currency::MYR)),
    ]
}

fn default_payment_methods() -> Vec<PaymentMethod> {
    vec![PaymentMethod::new("fpx", "Online Banking (FPX)")]
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            max_quantity_per_entry: default_max_quantity(),
            edit_route_prefix: default_edit_route_prefix(),
            store_name: default_store_name(),
            shipping_methods: default_shipping_methods(),
            payment_methods: default_payment_methods(),
        }
    }
}

impl StorefrontConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, CommerceError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a TOML file.
    pub fn load(path: &str) -> Result<Self, CommerceError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CommerceError::ConfigurationError(format!("Failed to read config file {}: {}", path, e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Reject limits and methods the storefront cannot honour.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.max_quantity_per_entry < 1 {
            return Err(CommerceError::ConfigurationError(format!(
                "max_quantity_per_entry must be at least 1, got {}",
                self.max_quantity_per_entry
            )));
        }

        let mut seen = HashSet::new();
        for method in &self.shipping_methods {
            if method.id.is_blank() {
                return Err(CommerceError::ConfigurationError(format!(
                    "shipping method {:?} has a blank id",
                    method.name
                )));
            }
            if !seen.insert(&method.id) {
                return Err(CommerceError::ConfigurationError(format!(
                    "duplicate shipping method {}",
                    method.id
                )));
            }
            if method.fee.currency != self.currency {
                return Err(CommerceError::CurrencyMismatch {
                    expected: self.currency.code().to_string(),
                    got: method.fee.currency.code().to_string(),
                });
            }
            if method.fee.is_negative() {
                return Err(CommerceError::ConfigurationError(format!(
                    "shipping method {} has a negative fee",
                    method.id
                )));
            }
        }

        if let Some(method) = self.payment_methods.iter().find(|m| m.id.is_blank()) {
            return Err(CommerceError::ConfigurationError(format!(
                "payment method {:?} has a blank id",
                method.name
            )));
        }

        Ok(())
    }

    pub fn shipping_method(&self, id: &ShippingMethodId) -> Result<&ShippingMethod, CommerceError> {
        self.shipping_methods
            .iter()
            .find(|m| &m.id == id)
            .ok_or_else(|| CommerceError::UnknownShippingMethod(id.to_string()))
    }

    pub fn payment_method(&self, id: &PaymentMethodId) -> Option<&PaymentMethod> {
        self.payment_methods.iter().find(|m| &m.id == id)
    }
}
