//! Cart store: the buyer's finalized entries.

use crate::cart::{CartEntry, CourseKey};
use crate::error::CommerceError;
use crate::ids::CartEntryId;
use crate::money::{Currency, Money};
use crate::pricing::{self, CartPricing};
use serde::{Deserialize, Serialize};

/// Maximum quantity allowed per cart entry.
pub const MAX_QUANTITY_PER_ENTRY: i64 = 9999;

/// Ordered, id-unique collection of cart entries.
///
/// Mutations validate first and swap the new entry in last, so a rejected
/// call leaves the store unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartStore {
    entries: Vec<CartEntry>,
    currency: Currency,
    max_quantity: i64,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new(Currency::default())
    }
}

impl CartStore {
    /// Create an empty cart.
    pub fn new(currency: Currency) -> Self {
        Self {
            entries: Vec::new(),
            currency,
            max_quantity: MAX_QUANTITY_PER_ENTRY,
        }
    }

    /// Set the per-entry quantity limit.
    pub fn with_max_quantity(mut self, max_quantity: i64) -> Self {
        self.max_quantity = max_quantity;
        self
    }

    /// Rebuild a cart from persisted entries.
    ///
    /// Entries are revalidated, including their frozen prices; the first
    /// malformed one rejects the whole list.
    pub fn restore(mut self, entries: Vec<CartEntry>) -> Result<Self, CommerceError> {
        for entry in entries {
            if self.position(&entry.id).is_some() {
                return Err(CommerceError::SerializationError(format!(
                    "duplicate cart entry {}",
                    entry.id
                )));
            }
            let entry = self.checked(entry)?;
            self.entries.push(entry);
        }
        Ok(self)
    }

    /// Insert an entry, replacing the one with the same id in place.
    pub fn upsert(&mut self, entry: CartEntry) -> Result<(), CommerceError> {
        let entry = self.checked(entry)?;
        match self.position(&entry.id) {
            Some(index) => {
                tracing::info!(entry = %entry.id, "cart entry replaced");
                self.entries[index] = entry;
            }
            None => {
                tracing::info!(entry = %entry.id, unit_price = entry.unit_price.amount_cents, "cart entry added");
                self.entries.push(entry);
            }
        }
        Ok(())
    }

    /// Change an entry's quantity, recomputing its totals from the price
    /// frozen at add time.
    pub fn update_quantity(
        &mut self,
        id: &CartEntryId,
        quantity: i64,
    ) -> Result<&CartEntry, CommerceError> {
        let index = self
            .position(id)
            .ok_or_else(|| CommerceError::EntryNotFound(id.clone()))?;

        let mut entry = self.entries[index].clone();
        entry.quantity = quantity;
        let entry = self.checked(entry)?;
        tracing::info!(entry = %id, quantity, "cart quantity updated");

        self.entries[index] = entry;
        Ok(&self.entries[index])
    }

    /// Remove an entry. Returns whether it was present.
    pub fn remove(&mut self, id: &CartEntryId) -> bool {
        let len_before = self.entries.len();
        self.entries.retain(|e| &e.id != id);
        let removed = self.entries.len() < len_before;
        if removed {
            tracing::info!(entry = %id, "cart entry removed");
        }
        removed
    }

    /// Clear all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn get(&self, id: &CartEntryId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get total unit count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.entries.iter().map(|e| e.quantity).sum()
    }

    pub fn subtotal(&self) -> Result<Money, CommerceError> {
        pricing::cart_subtotal(&self.entries, self.currency)
    }

    /// Price the cart with a shipping fee.
    pub fn pricing(&self, shipping_fee: Money) -> Result<CartPricing, CommerceError> {
        CartPricing::calculate(&self.entries, shipping_fee)
    }

    /// Entries grouped by institution, year and course, in first-seen order.
    pub fn grouped_by_course(&self) -> Vec<CourseGroup<'_>> {
        let mut groups: Vec<CourseGroup<'_>> = Vec::new();
        for entry in &self.entries {
            let key = entry.course_key();
            match groups.iter_mut().find(|g| g.key == key) {
                Some(group) => group.entries.push(entry),
                None => groups.push(CourseGroup {
                    key,
                    entries: vec![entry],
                }),
            }
        }
        groups
    }

    fn position(&self, id: &CartEntryId) -> Option<usize> {
        self.entries.iter().position(|e| &e.id == id)
    }

    fn checked(&self, mut entry: CartEntry) -> Result<CartEntry, CommerceError> {
        if entry.quantity < 1 {
            return Err(CommerceError::InvalidQuantity(entry.quantity));
        }
        if entry.quantity > self.max_quantity {
            return Err(CommerceError::QuantityExceedsLimit(
                entry.quantity,
                self.max_quantity,
            ));
        }
        if entry.selection.currency() != self.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: entry.selection.currency().code().to_string(),
            });
        }
        entry.update_total()?;
        Ok(entry)
    }
}

/// Cart entries sharing one class.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseGroup<'a> {
    pub key: CourseKey,
    pub entries: Vec<&'a CartEntry>,
}

impl CourseGroup<'_> {
    pub fn subtotal(&self) -> Result<Money, CommerceError> {
        self.entries.iter().try_fold(
            Money::zero(self.entries.first().map(|e| e.unit_price.currency).unwrap_or_default()),
            |acc, entry| {
                acc.try_add(&pricing::line_total(entry)?)
                    .ok_or(CommerceError::Overflow)
            },
        )
    }
}
