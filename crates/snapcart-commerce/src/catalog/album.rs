//! Album, photo and product type types.

use crate::ids::{AlbumId, OptionId, PhotoId, ProductTypeId, VariationId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Pricing unit for an album (e.g., "5R print", "Digital copy").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductType {
    /// Unique product type identifier.
    pub id: ProductTypeId,
    /// Display name.
    pub name: String,
    /// Price of one photo bought outside a package.
    pub price: Money,
    /// Whether the product is physically delivered (vs. downloaded).
    pub deliverable: bool,
}

/// A photo inside an album.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Photo {
    pub id: PhotoId,
    pub name: String,
    pub url: String,
    pub thumbnail_url: String,
}

/// Which variation applies to an album, and how.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlbumVariationBinding {
    /// Bound variation.
    pub variation_id: VariationId,
    /// A choice is required before the slot is complete.
    #[serde(default)]
    pub mandatory: bool,
    /// Options of the variation not offered for this album.
    #[serde(default)]
    pub hidden_option_ids: Vec<OptionId>,
}

impl AlbumVariationBinding {
    /// Check if an option is offered for this album.
    pub fn offers(&self, option_id: &OptionId) -> bool {
        !self.hidden_option_ids.contains(option_id)
    }
}

/// Grouping labels shown on cart entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct AlbumLabels {
    pub institution: String,
    pub year: String,
    pub course: String,
    #[serde(default)]
    pub standard: String,
}

/// A named photo collection sharing one product type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Album {
    /// Unique album identifier.
    pub id: AlbumId,
    /// Album name.
    pub name: String,
    /// Pricing unit and deliverability.
    pub product_type: ProductType,
    /// Photos in display order.
    pub photos: Vec<Photo>,
    /// Variation bindings in display order.
    #[serde(default)]
    pub variations: Vec<AlbumVariationBinding>,
    /// Institution / year / course labels.
    #[serde(default)]
    pub labels: AlbumLabels,
}

impl Album {
    /// Get a photo by ID.
    pub fn photo(&self, photo_id: &PhotoId) -> Option<&Photo> {
        self.photos.iter().find(|p| &p.id == photo_id)
    }

    /// Get the binding for a variation, if the album offers it.
    pub fn binding(&self, variation_id: &VariationId) -> Option<&AlbumVariationBinding> {
        self.variations
            .iter()
            .find(|b| &b.variation_id == variation_id)
    }

    /// IDs of variations that must be chosen, in binding order.
    pub fn mandatory_variation_ids(&self) -> Vec<VariationId> {
        self.variations
            .iter()
            .filter(|b| b.mandatory)
            .map(|b| b.variation_id.clone())
            .collect()
    }
}
