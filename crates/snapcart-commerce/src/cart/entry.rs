//! Cart entry type.

use crate::catalog::{AlbumLabels, CatalogSnapshot};
use crate::error::CommerceError;
use crate::ids::CartEntryId;
use crate::money::Money;
use crate::pricing;
use crate::selection::FinalizedSelection;
use serde::{Deserialize, Serialize};

/// Grouping key for the cart page: institution + year + course.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CourseKey {
    pub institution: String,
    pub year: String,
    pub course: String,
}

/// A finalized selection in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartEntry {
    /// Unique entry identifier, stable across edits.
    pub id: CartEntryId,
    /// Route that reopens this entry in the selection wizard.
    pub edit_url: String,
    /// Institution / year / course / standard labels (denormalized).
    pub labels: AlbumLabels,
    /// The selection, with prices frozen when it was finalized.
    pub selection: FinalizedSelection,
    /// Quantity (at least 1).
    pub quantity: i64,
    /// `package_price + items_price` of the selection.
    pub unit_price: Money,
    /// `unit_price * quantity`.
    pub total_price: Money,
    /// Unix timestamp when first added.
    pub added_at: i64,
}

impl CartEntry {
    /// Create an entry with quantity 1.
    ///
    /// Labels come from the album of the first slot; packages are grouped
    /// under the class their first album belongs to.
    pub fn new(
        id: CartEntryId,
        selection: FinalizedSelection,
        catalog: &CatalogSnapshot,
        edit_route_prefix: &str,
    ) -> Result<Self, CommerceError> {
        let first = selection.items().first().ok_or(CommerceError::NoActiveSelection)?;
        let labels = catalog.get_album(&first.album.id)?.labels.clone();
        let unit_price = selection.unit_price();
        let edit_url = format!("{}/{}", edit_route_prefix.trim_end_matches('/'), id);

        Ok(Self {
            id,
            edit_url,
            labels,
            selection,
            quantity: 1,
            unit_price,
            total_price: unit_price,
            added_at: current_timestamp(),
        })
    }

    /// Recompute prices from the frozen selection.
    ///
    /// The selection is checked first, so an entry whose frozen unit price
    /// no longer adds up from its package and option prices is rejected
    /// instead of being trusted.
    pub fn update_total(&mut self) -> Result<(), CommerceError> {
        self.selection
            .verify()
            .map_err(|e| CommerceError::StaleCartEntry {
                entry_id: self.id.clone(),
                reason: e.to_string(),
            })?;
        self.unit_price = self.selection.unit_price();
        self.total_price = pricing::line_total(self)?;
        Ok(())
    }

    pub fn is_package(&self) -> bool {
        self.selection.package_id().is_some()
    }

    /// Package name, or the album name for single-album entries.
    pub fn display_name(&self) -> String {
        match self.selection.package() {
            Some(package) => package.name.clone(),
            None => self
                .selection
                .items()
                .first()
                .map(|item| item.album.name.clone())
                .unwrap_or_default(),
        }
    }

    pub fn course_key(&self) -> CourseKey {
        CourseKey {
            institution: self.labels.institution.clone(),
            year: self.labels.year.clone(),
            course: self.labels.course.clone(),
        }
    }

    /// Check the entry still matches the catalog it will be ordered against.
    ///
    /// Every referenced package, album, photo and option must still exist
    /// (and the option still be offered for its album) with the price frozen
    /// in the entry.
    pub fn verify_against(&self, catalog: &CatalogSnapshot) -> Result<(), CommerceError> {
        let stale = |reason: String| CommerceError::StaleCartEntry {
            entry_id: self.id.clone(),
            reason,
        };

        match self.selection.package_id() {
            Some(package_id) => {
                let package = catalog
                    .get_package(package_id)
                    .map_err(|e| stale(e.to_string()))?;
                if package.price != self.selection.package_price() {
                    return Err(stale(format!("package {} price changed", package_id)));
                }
            }
            None => {
                let album_id = &self
                    .selection
                    .items()
                    .first()
                    .ok_or_else(|| stale("entry has no items".to_string()))?
                    .album
                    .id;
                let album = catalog.get_album(album_id).map_err(|e| stale(e.to_string()))?;
                if album.product_type.price != self.selection.package_price() {
                    return Err(stale(format!("album {} price changed", album_id)));
                }
            }
        }

        for item in self.selection.items() {
            let album = catalog
                .get_album(&item.album.id)
                .map_err(|e| stale(e.to_string()))?;
            if let Some(photo) = &item.photo {
                if album.photo(&photo.id).is_none() {
                    return Err(stale(format!("photo {} was removed", photo.id)));
                }
            }
            for choice in &item.variation_choices {
                let offered = album
                    .binding(&choice.variation_id)
                    .is_some_and(|b| b.offers(&choice.option_id));
                if !offered {
                    return Err(stale(format!(
                        "option {} is no longer offered for album {}",
                        choice.option_id, album.id
                    )));
                }
                let current = catalog
                    .get_product_variation(&choice.variation_id)
                    .ok()
                    .and_then(|v| v.option(&choice.option_id));
                match current {
                    Some(option) if option.price == choice.price => {}
                    Some(_) => {
                        return Err(stale(format!("option {} price changed", choice.option_id)))
                    }
                    None => {
                        return Err(stale(format!("option {} was removed", choice.option_id)))
                    }
                }
            }
        }

        Ok(())
    }
}

/// Get current Unix timestamp.
pub(crate) fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
