//! Selection session state machine.
//!
//! A session is either empty, a single-album purchase (one prefilled item),
//! or a package purchase with one item per expanded slot. Every mutation
//! builds the new item list completely before swapping it in, so a failed
//! operation leaves the session exactly as it was.

use crate::catalog::{Album, CatalogSnapshot, Package};
use crate::error::CommerceError;
use crate::ids::{OptionId, PackageId, PhotoId, VariationId};
use crate::money::{Currency, Money};
use crate::pricing::{self, PricedSelection};
use crate::selection::{expand, ExpandedSlot, SelectionItem, VariationChoice};
use serde::{Deserialize, Serialize};

/// Where the session is in the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// Nothing selected.
    Empty,
    /// One photo from one album, no package.
    SingleAlbum,
    /// Package purchase, currently on the given slot.
    PackageStage(usize),
}

/// The in-progress configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectionSession {
    package_id: Option<PackageId>,
    package: Option<Package>,
    package_price: Money,
    current_stage: usize,
    first_stage: usize,
    slots: Vec<ExpandedSlot>,
    items: Vec<SelectionItem>,
    items_price: Money,
    currency: Currency,
}

impl Default for SelectionSession {
    fn default() -> Self {
        Self::new(Currency::default())
    }
}

impl SelectionSession {
    /// Create an empty session.
    pub fn new(currency: Currency) -> Self {
        Self {
            package_id: None,
            package: None,
            package_price: Money::zero(currency),
            current_stage: 0,
            first_stage: 0,
            slots: Vec::new(),
            items: Vec::new(),
            items_price: Money::zero(currency),
            currency,
        }
    }

    /// Reopen a finalized selection for editing.
    pub fn from_finalized(selection: &FinalizedSelection) -> Self {
        let mut session = selection.session.clone();
        session.current_stage = 0;
        session
    }

    pub fn state(&self) -> SessionState {
        if self.items.is_empty() {
            SessionState::Empty
        } else if self.package_id.is_none() {
            SessionState::SingleAlbum
        } else {
            SessionState::PackageStage(self.current_stage)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.state() == SessionState::Empty
    }

    pub fn package_id(&self) -> Option<&PackageId> {
        self.package_id.as_ref()
    }

    pub fn package(&self) -> Option<&Package> {
        self.package.as_ref()
    }

    pub fn current_stage(&self) -> usize {
        self.current_stage
    }

    /// First slot without a photo (0 when every slot is filled).
    pub fn first_stage(&self) -> usize {
        self.first_stage
    }

    pub fn slots(&self) -> &[ExpandedSlot] {
        &self.slots
    }

    pub fn items(&self) -> &[SelectionItem] {
        &self.items
    }

    pub fn item(&self, stage: usize) -> Result<&SelectionItem, CommerceError> {
        self.check_stage(stage)?;
        Ok(&self.items[stage])
    }

    pub fn items_price(&self) -> Money {
        self.items_price
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Stages whose slot still has no photo.
    pub fn empty_stages(&self) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.is_filled())
            .map(|(i, _)| i)
            .collect()
    }

    /// Start a single-album purchase of one photo.
    ///
    /// Replaces whatever the session held before.
    pub fn start_single(&mut self, album: &Album, photo_id: &PhotoId) -> Result<(), CommerceError> {
        let price = album.product_type.price;
        self.check_currency(&price)?;
        let photo = album
            .photo(photo_id)
            .ok_or_else(|| CommerceError::PhotoNotFound {
                album_id: album.id.clone(),
                photo_id: photo_id.clone(),
            })?;

        let mut item = SelectionItem::empty(album);
        item.photo = Some(photo.into());

        *self = Self {
            package_id: None,
            package: None,
            package_price: price,
            current_stage: 0,
            first_stage: 0,
            slots: Vec::new(),
            items: vec![item],
            items_price: Money::zero(self.currency),
            currency: self.currency,
        };
        tracing::debug!(album = %album.id, photo = %photo_id, "single-album selection started");
        Ok(())
    }

    /// Start a package purchase.
    ///
    /// Items already in the session are carried into slots for the same
    /// album, so a photo picked in single-album mode is not lost.
    pub fn start_package(
        &mut self,
        package: &Package,
        catalog: &CatalogSnapshot,
    ) -> Result<(), CommerceError> {
        self.switch_package(package, catalog)
    }

    /// Switch to another package, remapping existing items by album.
    ///
    /// Each existing item fills at most one slot, first slot first. A slot
    /// takes a filled item for its album before an empty one, and slots with
    /// no matching item start empty.
    pub fn switch_package(
        &mut self,
        package: &Package,
        catalog: &CatalogSnapshot,
    ) -> Result<(), CommerceError> {
        self.check_currency(&package.price)?;
        let slots = expand(package, catalog.albums())?;
        if slots.is_empty() {
            return Err(CommerceError::ConfigurationError(format!(
                "package {} has no albums",
                package.id
            )));
        }

        let mut pool: Vec<Option<SelectionItem>> =
            self.items.iter().cloned().map(Some).collect();
        let mut items = Vec::with_capacity(slots.len());
        for slot in &slots {
            let matches = |candidate: &Option<SelectionItem>, filled: bool| {
                candidate.as_ref().is_some_and(|item| {
                    item.album.id == slot.album_id && item.is_filled() == filled
                })
            };
            let index = pool
                .iter()
                .position(|c| matches(c, true))
                .or_else(|| pool.iter().position(|c| matches(c, false)));
            let carried = index.and_then(|i| pool[i].take());
            let item = match carried {
                Some(item) => item,
                None => SelectionItem::empty(catalog.get_album(&slot.album_id)?),
            };
            items.push(item);
        }

        if items.len() != slots.len() {
            return Err(CommerceError::ConfigurationError(format!(
                "package {} expanded to {} slots but {} items",
                package.id,
                slots.len(),
                items.len()
            )));
        }
        let items_price = pricing::items_price(&items, self.currency)?;
        let first_stage = first_empty(&items).unwrap_or(0);

        let dropped = pool.iter().filter(|p| p.is_some()).count();
        *self = Self {
            package_id: Some(package.id.clone()),
            package: Some(package.clone()),
            package_price: package.price,
            current_stage: first_stage,
            first_stage,
            slots,
            items,
            items_price,
            currency: self.currency,
        };
        tracing::debug!(
            package = %package.id,
            slots = self.slots.len(),
            dropped,
            "package selection started"
        );
        Ok(())
    }

    /// Leave package mode, keeping the first filled item as a single-album
    /// purchase.
    pub fn switch_to_single(&mut self, catalog: &CatalogSnapshot) -> Result<(), CommerceError> {
        let item = self
            .items
            .iter()
            .find(|item| item.is_filled())
            .cloned()
            .ok_or(CommerceError::IncompleteSelection {
                stages: self.empty_stages(),
            })?;
        let album = catalog.get_album(&item.album.id)?;
        self.check_currency(&album.product_type.price)?;

        let items = vec![item];
        let items_price = pricing::items_price(&items, self.currency)?;
        *self = Self {
            package_id: None,
            package: None,
            package_price: album.product_type.price,
            current_stage: 0,
            first_stage: 0,
            slots: Vec::new(),
            items,
            items_price,
            currency: self.currency,
        };
        Ok(())
    }

    /// Fill or replace the photo of a slot.
    ///
    /// Variation choices belong to the slot's album and are kept.
    pub fn select_photo(
        &mut self,
        stage: usize,
        photo_id: &PhotoId,
        catalog: &CatalogSnapshot,
    ) -> Result<(), CommerceError> {
        self.check_stage(stage)?;
        let album = catalog.get_album(&self.items[stage].album.id)?;
        let photo = album
            .photo(photo_id)
            .ok_or_else(|| CommerceError::PhotoNotFound {
                album_id: album.id.clone(),
                photo_id: photo_id.clone(),
            })?;

        self.items[stage].photo = Some(photo.into());
        if self.package_id.is_some() {
            self.first_stage = first_empty(&self.items).unwrap_or(0);
        }
        tracing::debug!(stage, photo = %photo_id, "photo selected");
        Ok(())
    }

    /// Choose an option for a variation, or clear the choice with `None`.
    pub fn choose_variation_option(
        &mut self,
        stage: usize,
        variation_id: &VariationId,
        option_id: Option<&OptionId>,
        catalog: &CatalogSnapshot,
    ) -> Result<(), CommerceError> {
        self.check_stage(stage)?;
        let album = catalog.get_album(&self.items[stage].album.id)?;
        let binding = album
            .binding(variation_id)
            .ok_or_else(|| CommerceError::VariationNotBound {
                album_id: album.id.clone(),
                variation_id: variation_id.clone(),
            })?;

        let mut items = self.items.clone();
        match option_id {
            None => {
                items[stage].remove_choice(variation_id);
            }
            Some(option_id) => {
                let variation = catalog.get_product_variation(variation_id)?;
                let option = variation
                    .option(option_id)
                    .filter(|_| binding.offers(option_id))
                    .ok_or_else(|| CommerceError::OptionUnavailable {
                        variation_id: variation_id.clone(),
                        option_id: option_id.clone(),
                    })?;
                self.check_currency(&option.price)?;
                items[stage].upsert_choice(VariationChoice::new(variation, option));
            }
        }

        let items_price = pricing::items_price(&items, self.currency)?;
        self.items = items;
        self.items_price = items_price;
        tracing::debug!(
            stage,
            variation = %variation_id,
            items_price = self.items_price.amount_cents,
            "variation choice updated"
        );
        Ok(())
    }

    /// Set the child a slot is bought for. Blank names clear it.
    pub fn set_child_name(&mut self, stage: usize, name: &str) -> Result<(), CommerceError> {
        self.check_stage(stage)?;
        let name = name.trim();
        self.items[stage].child_name = if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        };
        Ok(())
    }

    /// Mandatory variations with no choice on a slot.
    pub fn validate_mandatory(&self, stage: usize) -> Result<Vec<VariationId>, CommerceError> {
        self.check_stage(stage)?;
        Ok(self.items[stage].missing_mandatory())
    }

    /// Move to the next slot without a photo.
    ///
    /// Searches forward from the current slot, wrapping around. Returns
    /// `true` when every slot is filled, leaving the cursor where it was.
    pub fn advance(&mut self) -> Result<bool, CommerceError> {
        if self.package_id.is_none() || self.items.is_empty() {
            return Err(CommerceError::NotPackageSelection);
        }

        let len = self.items.len();
        let next = (1..=len)
            .map(|offset| (self.current_stage + offset) % len)
            .find(|&stage| !self.items[stage].is_filled());
        match next {
            Some(stage) => {
                self.current_stage = stage;
                Ok(false)
            }
            None => Ok(true),
        }
    }

    /// Jump to a slot.
    pub fn go_to(&mut self, stage: usize) -> Result<(), CommerceError> {
        if self.package_id.is_none() {
            return Err(CommerceError::NotPackageSelection);
        }
        self.check_stage(stage)?;
        self.current_stage = stage;
        Ok(())
    }

    /// Complete the selection.
    ///
    /// Fails without changing anything if a slot has no photo or misses a
    /// mandatory variation. On success the session is reset to empty.
    pub fn finalize(&mut self) -> Result<FinalizedSelection, CommerceError> {
        if self.items.is_empty() {
            return Err(CommerceError::NoActiveSelection);
        }

        let stages = self.empty_stages();
        if !stages.is_empty() {
            return Err(CommerceError::IncompleteSelection { stages });
        }
        for (stage, item) in self.items.iter().enumerate() {
            let variation_ids = item.missing_mandatory();
            if !variation_ids.is_empty() {
                return Err(CommerceError::MissingMandatoryVariation {
                    stage,
                    variation_ids,
                });
            }
        }

        let unit_price = pricing::unit_price(&*self)?;
        let currency = self.currency;
        let session = std::mem::replace(self, Self::new(currency));
        tracing::debug!(
            package = ?session.package_id,
            items = session.items.len(),
            unit_price = unit_price.amount_cents,
            "selection finalized"
        );
        Ok(FinalizedSelection {
            session,
            unit_price,
        })
    }

    /// Drop the draft.
    pub fn abandon(&mut self) {
        *self = Self::new(self.currency);
    }

    /// Check structural invariants, e.g. after restoring from storage.
    pub fn verify(&self) -> Result<(), CommerceError> {
        let corrupt = |reason: String| Err(CommerceError::ConfigurationError(reason));

        if self.package_id.is_some() {
            if self.slots.len() != self.items.len() {
                return corrupt(format!(
                    "{} slots paired with {} items",
                    self.slots.len(),
                    self.items.len()
                ));
            }
            if let Some((i, _)) = self
                .slots
                .iter()
                .zip(&self.items)
                .enumerate()
                .find(|(_, (slot, item))| slot.album_id != item.album.id)
            {
                return corrupt(format!("slot {} album does not match its item", i));
            }
        } else if self.items.len() > 1 || !self.slots.is_empty() {
            return corrupt("single-album selection with several items".to_string());
        }

        if !self.items.is_empty() && self.current_stage >= self.items.len() {
            return corrupt(format!("current stage {} out of range", self.current_stage));
        }
        for item in &self.items {
            let mut seen: Vec<&VariationId> = Vec::new();
            for choice in &item.variation_choices {
                if seen.contains(&&choice.variation_id) {
                    return corrupt(format!("duplicate choice for {}", choice.variation_id));
                }
                seen.push(&choice.variation_id);
            }
        }
        if pricing::items_price(&self.items, self.currency)? != self.items_price {
            return corrupt("items price does not match choices".to_string());
        }
        Ok(())
    }

    fn check_stage(&self, stage: usize) -> Result<(), CommerceError> {
        if self.items.is_empty() {
            return Err(CommerceError::NoActiveSelection);
        }
        if stage >= self.items.len() {
            return Err(CommerceError::StageOutOfRange {
                stage,
                len: self.items.len(),
            });
        }
        Ok(())
    }

    fn check_currency(&self, price: &Money) -> Result<(), CommerceError> {
        if price.currency != self.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: price.currency.code().to_string(),
            });
        }
        Ok(())
    }
}

impl PricedSelection for SelectionSession {
    fn package_price(&self) -> Money {
        self.package_price
    }

    fn items(&self) -> &[SelectionItem] {
        &self.items
    }

    fn currency(&self) -> Currency {
        self.currency
    }
}

fn first_empty(items: &[SelectionItem]) -> Option<usize> {
    items.iter().position(|item| !item.is_filled())
}

/// A completed selection, ready to become a cart entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinalizedSelection {
    session: SelectionSession,
    unit_price: Money,
}

impl FinalizedSelection {
    pub fn package_id(&self) -> Option<&PackageId> {
        self.session.package_id.as_ref()
    }

    pub fn package(&self) -> Option<&Package> {
        self.session.package.as_ref()
    }

    pub fn package_price(&self) -> Money {
        self.session.package_price
    }

    pub fn items(&self) -> &[SelectionItem] {
        &self.session.items
    }

    pub fn items_price(&self) -> Money {
        self.session.items_price
    }

    /// `package_price + items_price`, frozen at finalize time.
    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn currency(&self) -> Currency {
        self.session.currency
    }

    /// Check a restored selection: the session invariants hold, every slot
    /// has a photo, and the frozen unit price equals its components.
    pub fn verify(&self) -> Result<(), CommerceError> {
        self.session.verify()?;
        if self.session.items.is_empty() {
            return Err(CommerceError::ConfigurationError(
                "finalized selection has no items".to_string(),
            ));
        }
        let stages = self.session.empty_stages();
        if !stages.is_empty() {
            return Err(CommerceError::IncompleteSelection { stages });
        }
        if self.unit_price.currency != self.session.currency
            || pricing::unit_price(self)? != self.unit_price
        {
            return Err(CommerceError::ConfigurationError(
                "frozen unit price does not match package and items price".to_string(),
            ));
        }
        Ok(())
    }
}

impl PricedSelection for FinalizedSelection {
    fn package_price(&self) -> Money {
        self.session.package_price
    }

    fn items(&self) -> &[SelectionItem] {
        &self.session.items
    }

    fn currency(&self) -> Currency {
        self.session.currency
    }
}
