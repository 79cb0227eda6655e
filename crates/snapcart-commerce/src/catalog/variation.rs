//! Product variation (add-on) types.

use crate::ids::{OptionId, VariationId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// One priced choice on a variation axis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductVariationOption {
    pub id: OptionId,
    pub name: String,
    pub price: Money,
}

/// A named add-on axis (e.g., "Frame", "Lamination").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductVariation {
    pub id: VariationId,
    pub name: String,
    pub options: Vec<ProductVariationOption>,
}

impl ProductVariation {
    /// Get an option by ID.
    pub fn option(&self, option_id: &OptionId) -> Option<&ProductVariationOption> {
        self.options.iter().find(|o| &o.id == option_id)
    }
}
