//! Storefront: one buyer's selection wizard, cart and checkout.
//!
//! The storefront owns the draft [`SelectionSession`] and the [`CartStore`]
//! for a buyer session. Every mutation is applied to a copy, written to the
//! store, and only then kept in memory, so a rejected operation or failed
//! write leaves both untouched. `add_to_cart` writes the cart before the
//! draft; if the draft write fails the entry stays in the cart and the draft
//! is kept. A successful checkout clears the cart in memory even when the
//! cleared cart cannot be written, since the order has been placed.

use crate::buyer::BuyerProfile;
use crate::cart::{CartEntry, CartStore, CourseGroup};
use crate::catalog::CatalogSnapshot;
use crate::checkout::{self, Address, CheckoutRequest, OrderApi, PaymentHandoff};
use crate::config::StorefrontConfig;
use crate::error::CommerceError;
use crate::ids::{
    AlbumId, CartEntryId, OptionId, PackageId, PaymentMethodId, PhotoId, ShippingMethodId,
    VariationId,
};
use crate::pricing::CartPricing;
use crate::selection::SelectionSession;
use serde::{Deserialize, Serialize};
use snapcart_cache::{Cache, CacheError, Namespace, SessionId};
use tracing::{debug, info, warn};

/// Namespace holding the cart entries.
pub const CART_NAMESPACE: &str = "cart";
/// Namespace holding the in-progress selection.
pub const DRAFT_NAMESPACE: &str = "draftSelection";

/// Persisted form of the draft: the session plus the cart entry it was
/// reopened from, if any.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DraftSelection {
    pub session: SelectionSession,
    #[serde(default)]
    pub editing: Option<CartEntryId>,
}

/// Checkout page input, by configured method IDs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckoutForm {
    pub shipping_method_id: ShippingMethodId,
    #[serde(default)]
    pub payment_method_id: Option<PaymentMethodId>,
    #[serde(default)]
    pub shipping_address: Address,
    #[serde(default)]
    pub remark: Option<String>,
}

pub struct Storefront {
    config: StorefrontConfig,
    catalog: CatalogSnapshot,
    buyer: BuyerProfile,
    session_id: SessionId,
    draft: DraftSelection,
    cart: CartStore,
    carts: Namespace<Vec<CartEntry>>,
    drafts: Namespace<DraftSelection>,
}

impl Storefront {
    /// Open the storefront on the configured Key-Value store.
    pub fn open(
        config: StorefrontConfig,
        catalog: CatalogSnapshot,
        buyer: BuyerProfile,
        session_id: SessionId,
    ) -> Result<Self, CommerceError> {
        let cache = Cache::open(&config.store_name)?;
        Self::new(config, catalog, buyer, cache, session_id)
    }

    /// Open the storefront for a buyer session, restoring any persisted cart
    /// and draft.
    ///
    /// Corrupt snapshots are logged and reset to empty. Storage failures are
    /// returned.
    pub fn new(
        config: StorefrontConfig,
        catalog: CatalogSnapshot,
        buyer: BuyerProfile,
        cache: Cache,
        session_id: SessionId,
    ) -> Result<Self, CommerceError> {
        config.validate()?;
        let carts: Namespace<Vec<CartEntry>> = Namespace::new(cache.clone(), CART_NAMESPACE);
        let drafts: Namespace<DraftSelection> = Namespace::new(cache, DRAFT_NAMESPACE);

        let empty_cart =
            CartStore::new(config.currency).with_max_quantity(config.max_quantity_per_entry);
        let cart = match restore(&carts, &session_id)? {
            Some(entries) => match empty_cart.clone().restore(entries) {
                Ok(cart) => cart,
                Err(e) => {
                    warn!(session = %session_id, error = %e, "Persisted cart invalid, resetting");
                    carts.clear(&session_id)?;
                    empty_cart
                }
            },
            None => empty_cart,
        };

        let draft = match restore(&drafts, &session_id)? {
            Some(draft) => match draft.session.verify() {
                Ok(()) if draft.session.currency() == config.currency => draft,
                Ok(()) => {
                    warn!(session = %session_id, "Persisted draft has wrong currency, resetting");
                    drafts.clear(&session_id)?;
                    DraftSelection::new(&config)
                }
                Err(e) => {
                    warn!(session = %session_id, error = %e, "Persisted draft invalid, resetting");
                    drafts.clear(&session_id)?;
                    DraftSelection::new(&config)
                }
            },
            None => DraftSelection::new(&config),
        };

        info!(
            session = %session_id,
            buyer = %buyer.id,
            entries = cart.len(),
            draft = !draft.session.is_empty(),
            "Storefront opened"
        );

        Ok(Self {
            config,
            catalog,
            buyer,
            session_id,
            draft,
            cart,
            carts,
            drafts,
        })
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    pub fn catalog(&self) -> &CatalogSnapshot {
        &self.catalog
    }

    pub fn buyer(&self) -> &BuyerProfile {
        &self.buyer
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Swap in a freshly fetched catalog.
    pub fn replace_catalog(&mut self, catalog: CatalogSnapshot) {
        self.catalog = catalog;
    }

    // ---- selection ----

    pub fn current_session(&self) -> &SelectionSession {
        &self.draft.session
    }

    /// Cart entry the draft was reopened from.
    pub fn editing_entry(&self) -> Option<&CartEntryId> {
        self.draft.editing.as_ref()
    }

    pub fn start_single(&mut self, album_id: &AlbumId, photo_id: &PhotoId) -> Result<(), CommerceError> {
        self.update_draft(|draft, catalog| {
            draft.session.start_single(catalog.get_album(album_id)?, photo_id)
        })?;
        debug!(album = %album_id, photo = %photo_id, "Single-album selection started");
        Ok(())
    }

    pub fn start_package(&mut self, package_id: &PackageId) -> Result<(), CommerceError> {
        self.update_draft(|draft, catalog| {
            draft.session.start_package(catalog.get_package(package_id)?, catalog)
        })?;
        debug!(package = %package_id, slots = self.draft.session.slots().len(), "Package selection started");
        Ok(())
    }

    pub fn switch_package(&mut self, package_id: &PackageId) -> Result<(), CommerceError> {
        self.update_draft(|draft, catalog| {
            draft.session.switch_package(catalog.get_package(package_id)?, catalog)
        })?;
        debug!(package = %package_id, stage = self.draft.session.current_stage(), "Package switched");
        Ok(())
    }

    pub fn switch_to_single(&mut self) -> Result<(), CommerceError> {
        self.update_draft(|draft, catalog| draft.session.switch_to_single(catalog))?;
        debug!("Switched to single-album selection");
        Ok(())
    }

    pub fn select_photo(&mut self, stage: usize, photo_id: &PhotoId) -> Result<(), CommerceError> {
        self.update_draft(|draft, catalog| draft.session.select_photo(stage, photo_id, catalog))?;
        debug!(stage, photo = %photo_id, "Photo selected");
        Ok(())
    }

    /// Set or (with `None`) clear the option chosen for a variation.
    pub fn choose_variation_option(
        &mut self,
        stage: usize,
        variation_id: &VariationId,
        option_id: Option<&OptionId>,
    ) -> Result<(), CommerceError> {
        self.update_draft(|draft, catalog| {
            draft
                .session
                .choose_variation_option(stage, variation_id, option_id, catalog)
        })?;
        debug!(
            stage,
            variation = %variation_id,
            option = ?option_id,
            items_price = self.draft.session.items_price().amount_cents,
            "Variation option chosen"
        );
        Ok(())
    }

    /// Label a slot with one of the buyer's registered children. A blank name
    /// clears the label.
    pub fn set_child_name(&mut self, stage: usize, name: &str) -> Result<(), CommerceError> {
        if !name.trim().is_empty() && !self.buyer.has_child(name) {
            return Err(CommerceError::UnknownChild(name.trim().to_string()));
        }
        self.update_draft(|draft, _| draft.session.set_child_name(stage, name))
    }

    pub fn validate_mandatory(&self, stage: usize) -> Result<Vec<VariationId>, CommerceError> {
        self.draft.session.validate_mandatory(stage)
    }

    /// Move to the next slot without a photo; true once every slot is filled.
    pub fn advance(&mut self) -> Result<bool, CommerceError> {
        self.update_draft(|draft, _| draft.session.advance())
    }

    pub fn go_to(&mut self, stage: usize) -> Result<(), CommerceError> {
        self.update_draft(|draft, _| draft.session.go_to(stage))
    }

    /// Discard the draft. The cart is not touched.
    pub fn abandon(&mut self) -> Result<(), CommerceError> {
        let draft = DraftSelection::new(&self.config);
        self.save_draft(&draft)?;
        self.draft = draft;
        debug!("Selection abandoned");
        Ok(())
    }

    // ---- cart ----

    /// Finalize the draft into the cart and return the entry ID.
    ///
    /// A draft reopened from the cart replaces its entry in place, keeping
    /// the entry's quantity.
    pub fn add_to_cart(&mut self) -> Result<CartEntryId, CommerceError> {
        let mut session = self.draft.session.clone();
        let selection = session.finalize()?;

        let id = self
            .draft
            .editing
            .clone()
            .unwrap_or_else(CartEntryId::generate);
        let mut entry = CartEntry::new(id.clone(), selection, &self.catalog, &self.config.edit_route_prefix)?;
        let replaced = match self.cart.get(&id) {
            Some(existing) => {
                entry.quantity = existing.quantity;
                entry.added_at = existing.added_at;
                true
            }
            None => false,
        };

        self.update_cart(|cart| cart.upsert(entry))?;
        info!(
            entry = %id,
            replaced,
            entries = self.cart.len(),
            "Selection added to cart"
        );

        let draft = DraftSelection {
            session,
            editing: None,
        };
        self.save_draft(&draft)?;
        self.draft = draft;
        Ok(id)
    }

    /// Reopen a cart entry in the wizard. Replaces any current draft.
    pub fn edit_entry(&mut self, id: &CartEntryId) -> Result<(), CommerceError> {
        let entry = self
            .cart
            .get(id)
            .ok_or_else(|| CommerceError::EntryNotFound(id.clone()))?;
        let draft = DraftSelection {
            session: SelectionSession::from_finalized(&entry.selection),
            editing: Some(id.clone()),
        };
        self.save_draft(&draft)?;
        self.draft = draft;
        debug!(entry = %id, "Cart entry reopened for editing");
        Ok(())
    }

    pub fn update_quantity(&mut self, id: &CartEntryId, quantity: i64) -> Result<(), CommerceError> {
        self.update_cart(|cart| cart.update_quantity(id, quantity).map(|_| ()))
    }

    /// Remove an entry; returns whether it was present.
    pub fn remove_entry(&mut self, id: &CartEntryId) -> Result<bool, CommerceError> {
        if self.cart.get(id).is_none() {
            return Ok(false);
        }
        self.update_cart(|cart| Ok(cart.remove(id)))
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn cart_grouped_by_course(&self) -> Vec<CourseGroup<'_>> {
        self.cart.grouped_by_course()
    }

    /// Price breakdown for the cart with the given shipping method.
    pub fn pricing(&self, shipping_method_id: &ShippingMethodId) -> Result<CartPricing, CommerceError> {
        let method = self.config.shipping_method(shipping_method_id)?;
        self.cart.pricing(method.fee)
    }

    // ---- checkout ----

    /// Build the order, re-check the cart against the current catalog and
    /// submit it.
    ///
    /// Form validation runs before the catalog check. On success the cart is
    /// cleared and the payment handoff returned. Any failure leaves the cart
    /// as it was.
    pub async fn checkout<A: OrderApi + ?Sized>(
        &mut self,
        api: &A,
        form: &CheckoutForm,
    ) -> Result<PaymentHandoff, CommerceError> {
        let request = self.checkout_request(form)?;
        let order = checkout::build_order(&self.cart, &self.buyer, &request)?;

        for entry in self.cart.entries() {
            if let Err(e) = entry.verify_against(&self.catalog) {
                warn!(entry = %entry.id, error = %e, "Cart entry out of date");
                return Err(e);
            }
        }

        let mut cart = self.cart.clone();
        let handoff = checkout::send_order(api, &mut cart, order).await?;
        // The order is placed, so the cleared cart is kept even if it cannot
        // be written.
        if let Err(e) = self.save_cart(&cart) {
            warn!(order_id = %handoff.order_id, error = %e, "Failed to persist cleared cart");
        }
        self.cart = cart;
        Ok(handoff)
    }

    fn checkout_request(&self, form: &CheckoutForm) -> Result<CheckoutRequest, CommerceError> {
        let shipping_method = self.config.shipping_method(&form.shipping_method_id)?.clone();
        let payment_method = form
            .payment_method_id
            .as_ref()
            .and_then(|id| self.config.payment_method(id))
            .cloned();
        Ok(CheckoutRequest {
            shipping_method,
            payment_method,
            shipping_address: form.shipping_address.clone(),
            remark: form.remark.clone(),
        })
    }

    // ---- persistence ----

    /// Apply a change to a copy of the draft, persist it, then keep it.
    fn update_draft<R, F>(&mut self, apply: F) -> Result<R, CommerceError>
    where
        F: FnOnce(&mut DraftSelection, &CatalogSnapshot) -> Result<R, CommerceError>,
    {
        let mut draft = self.draft.clone();
        let result = apply(&mut draft, &self.catalog)?;
        self.save_draft(&draft)?;
        self.draft = draft;
        Ok(result)
    }

    /// Apply a change to a copy of the cart, persist it, then keep it.
    fn update_cart<R, F>(&mut self, apply: F) -> Result<R, CommerceError>
    where
        F: FnOnce(&mut CartStore) -> Result<R, CommerceError>,
    {
        let mut cart = self.cart.clone();
        let result = apply(&mut cart)?;
        self.save_cart(&cart)?;
        self.cart = cart;
        Ok(result)
    }

    fn save_cart(&self, cart: &CartStore) -> Result<(), CommerceError> {
        if cart.is_empty() {
            self.carts.clear(&self.session_id)?;
        } else {
            self.carts.save(&self.session_id, &cart.entries().to_vec())?;
        }
        Ok(())
    }

    fn save_draft(&self, draft: &DraftSelection) -> Result<(), CommerceError> {
        if draft.session.is_empty() && draft.editing.is_none() {
            self.drafts.clear(&self.session_id)?;
        } else {
            self.drafts.save(&self.session_id, draft)?;
        }
        Ok(())
    }
}

impl DraftSelection {
    fn new(config: &StorefrontConfig) -> Self {
        Self {
            session: SelectionSession::new(config.currency),
            editing: None,
        }
    }
}

/// Load a snapshot, treating an undecodable one as absent.
fn restore<T>(namespace: &Namespace<T>, session_id: &SessionId) -> Result<Option<T>, CommerceError>
where
    T: Serialize + serde::de::DeserializeOwned,
{
    match namespace.load(session_id) {
        Ok(value) => Ok(value),
        Err(CacheError::CorruptSnapshot { key, reason }) => {
            warn!(key = %key, reason = %reason, "Corrupt snapshot, resetting");
            namespace.clear(session_id)?;
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
