//! Pricing aggregation.
//!
//! Pure functions over integer cents. Malformed inputs (negative quantity or
//! price) are rejected where they enter the system, so the only failure left
//! here is arithmetic overflow.

use crate::cart::CartEntry;
use crate::error::CommerceError;
use crate::ids::CartEntryId;
use crate::money::{Currency, Money};
use crate::selection::SelectionItem;
use serde::{Deserialize, Serialize};

/// Anything priced as `package_price + Σ variation choices`.
pub trait PricedSelection {
    /// Package base price, or the album unit price in single-album mode.
    fn package_price(&self) -> Money;

    fn items(&self) -> &[SelectionItem];

    fn currency(&self) -> Currency;
}

/// `Σ_items Σ_choices price`.
pub fn items_price(items: &[SelectionItem], currency: Currency) -> Result<Money, CommerceError> {
    Money::try_sum(
        items
            .iter()
            .flat_map(|item| item.variation_choices.iter().map(|c| &c.price)),
        currency,
    )
    .ok_or(CommerceError::Overflow)
}

/// `package_price + items_price`.
pub fn unit_price<S: PricedSelection + ?Sized>(selection: &S) -> Result<Money, CommerceError> {
    let items = items_price(selection.items(), selection.currency())?;
    selection
        .package_price()
        .try_add(&items)
        .ok_or(CommerceError::Overflow)
}

/// `unit_price * quantity`.
pub fn line_total(entry: &CartEntry) -> Result<Money, CommerceError> {
    entry
        .unit_price
        .try_multiply(entry.quantity)
        .ok_or(CommerceError::Overflow)
}

/// `Σ line_total`.
pub fn cart_subtotal(cart: &[CartEntry], currency: Currency) -> Result<Money, CommerceError> {
    cart.iter().try_fold(Money::zero(currency), |acc, entry| {
        acc.try_add(&line_total(entry)?).ok_or(CommerceError::Overflow)
    })
}

/// `cart_subtotal + shipping_fee`.
pub fn order_total(cart: &[CartEntry], shipping_fee: Money) -> Result<Money, CommerceError> {
    cart_subtotal(cart, shipping_fee.currency)?
        .try_add(&shipping_fee)
        .ok_or(CommerceError::Overflow)
}

/// Complete pricing breakdown for a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartPricing {
    /// Sum of line totals.
    pub subtotal: Money,
    /// Shipping fee of the selected method.
    pub shipping_total: Money,
    /// `subtotal + shipping_total`.
    pub grand_total: Money,
    /// Per-entry breakdown, in cart order.
    pub lines: Vec<LinePricing>,
}

impl CartPricing {
    /// Price a cart with a shipping fee.
    pub fn calculate(cart: &[CartEntry], shipping_fee: Money) -> Result<Self, CommerceError> {
        let lines = cart
            .iter()
            .map(|entry| {
                Ok(LinePricing {
                    entry_id: entry.id.clone(),
                    unit_price: entry.unit_price,
                    quantity: entry.quantity,
                    total: line_total(entry)?,
                })
            })
            .collect::<Result<Vec<_>, CommerceError>>()?;

        Ok(Self {
            subtotal: cart_subtotal(cart, shipping_fee.currency)?,
            shipping_total: shipping_fee,
            grand_total: order_total(cart, shipping_fee)?,
            lines,
        })
    }

    /// Total number of units across the cart.
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

/// Pricing for a single cart entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinePricing {
    pub entry_id: CartEntryId,
    pub unit_price: Money,
    pub quantity: i64,
    pub total: Money,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{AlbumId, OptionId, VariationId};
    use crate::selection::{AlbumSummary, VariationChoice};

    fn rm_cents(cents: i64) -> Money {
        Money::new(cents, Currency::MYR)
    }

    fn item_with(prices: &[i64]) -> SelectionItem {
        SelectionItem {
            album: AlbumSummary {
                id: AlbumId::new("a"),
                name: "A".to_string(),
                product_type_name: "Print".to_string(),
                deliverable: true,
                mandatory_variation_ids: vec![],
            },
            photo: None,
            child_name: None,
            variation_choices: prices
                .iter()
                .enumerate()
                .map(|(i, cents)| VariationChoice {
                    variation_id: VariationId::new(format!("v{}", i)),
                    variation_name: format!("V{}", i),
                    option_id: OptionId::new("o"),
                    option_name: "O".to_string(),
                    price: rm_cents(*cents),
                })
                .collect(),
        }
    }

    struct Fixed {
        base: Money,
        items: Vec<SelectionItem>,
    }

    impl PricedSelection for Fixed {
        fn package_price(&self) -> Money {
            self.base
        }

        fn items(&self) -> &[SelectionItem] {
            &self.items
        }

        fn currency(&self) -> Currency {
            Currency::MYR
        }
    }

    #[test]
    fn test_items_price_sums_every_choice() {
        let items = vec![item_with(&[500, 250]), item_with(&[]), item_with(&[10])];
        assert_eq!(items_price(&items, Currency::MYR).unwrap(), rm_cents(760));
    }

    #[test]
    fn test_items_price_no_float_drift() {
        // Ten RM0.10 add-ons are exactly RM1.00.
        let items: Vec<SelectionItem> = (0..10).map(|_| item_with(&[10])).collect();
        assert_eq!(items_price(&items, Currency::MYR).unwrap(), rm_cents(100));
    }

    #[test]
    fn test_unit_price_adds_package_price() {
        let selection = Fixed {
            base: rm_cents(5000),
            items: vec![item_with(&[500]), item_with(&[300])],
        };
        assert_eq!(unit_price(&selection).unwrap(), rm_cents(5800));
    }

    #[test]
    fn test_items_price_overflow() {
        let items = vec![item_with(&[i64::MAX, 1])];
        assert!(matches!(
            items_price(&items, Currency::MYR),
            Err(CommerceError::Overflow)
        ));
    }
}
