//! Per-slot selection records.

use crate::catalog::{Album, Photo, ProductVariation, ProductVariationOption};
use crate::ids::{AlbumId, OptionId, PhotoId, VariationId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// The album facts a selection needs after the catalog is gone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlbumSummary {
    pub id: AlbumId,
    pub name: String,
    pub product_type_name: String,
    pub deliverable: bool,
    /// Variations that must be chosen before the slot is complete.
    pub mandatory_variation_ids: Vec<VariationId>,
}

impl AlbumSummary {
    pub fn from_album(album: &Album) -> Self {
        Self {
            id: album.id.clone(),
            name: album.name.clone(),
            product_type_name: album.product_type.name.clone(),
            deliverable: album.product_type.deliverable,
            mandatory_variation_ids: album.mandatory_variation_ids(),
        }
    }
}

/// The photo chosen for a slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhotoChoice {
    pub id: PhotoId,
    pub name: String,
    pub url: String,
    pub thumbnail_url: String,
}

impl From<&Photo> for PhotoChoice {
    fn from(photo: &Photo) -> Self {
        Self {
            id: photo.id.clone(),
            name: photo.name.clone(),
            url: photo.url.clone(),
            thumbnail_url: photo.thumbnail_url.clone(),
        }
    }
}

/// A chosen option on one variation, with its price frozen at choice time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariationChoice {
    pub variation_id: VariationId,
    pub variation_name: String,
    pub option_id: OptionId,
    pub option_name: String,
    pub price: Money,
}

impl VariationChoice {
    pub fn new(variation: &ProductVariation, option: &ProductVariationOption) -> Self {
        Self {
            variation_id: variation.id.clone(),
            variation_name: variation.name.clone(),
            option_id: option.id.clone(),
            option_name: option.name.clone(),
            price: option.price,
        }
    }
}

/// One slot's choices.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectionItem {
    /// Album this slot draws from.
    pub album: AlbumSummary,
    /// Chosen photo (`None` = slot not filled yet).
    pub photo: Option<PhotoChoice>,
    /// Child the photo is bought for.
    pub child_name: Option<String>,
    /// At most one choice per variation.
    pub variation_choices: Vec<VariationChoice>,
}

impl SelectionItem {
    /// An unfilled slot for an album.
    pub fn empty(album: &Album) -> Self {
        Self {
            album: AlbumSummary::from_album(album),
            photo: None,
            child_name: None,
            variation_choices: Vec::new(),
        }
    }

    /// Check if the slot has a photo.
    pub fn is_filled(&self) -> bool {
        self.photo.is_some()
    }

    /// Replace the choice for its variation, or add it.
    pub fn upsert_choice(&mut self, choice: VariationChoice) {
        match self
            .variation_choices
            .iter_mut()
            .find(|c| c.variation_id == choice.variation_id)
        {
            Some(existing) => *existing = choice,
            None => self.variation_choices.push(choice),
        }
    }

    /// Remove the choice for a variation. Returns whether one was removed.
    pub fn remove_choice(&mut self, variation_id: &VariationId) -> bool {
        let before = self.variation_choices.len();
        self.variation_choices
            .retain(|c| &c.variation_id != variation_id);
        self.variation_choices.len() < before
    }

    pub fn choice(&self, variation_id: &VariationId) -> Option<&VariationChoice> {
        self.variation_choices
            .iter()
            .find(|c| &c.variation_id == variation_id)
    }

    /// Mandatory variations without a choice, in binding order.
    pub fn missing_mandatory(&self) -> Vec<VariationId> {
        self.album
            .mandatory_variation_ids
            .iter()
            .filter(|id| self.choice(id).is_none())
            .cloned()
            .collect()
    }
}
