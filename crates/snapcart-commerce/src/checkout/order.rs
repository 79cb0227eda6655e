//! Order types.
//!
//! An [`Order`] is the outbound payload for the order API: the cart entries
//! stripped of wizard-only fields (edit routes, slot bookkeeping, thumbnails)
//! plus the checkout form.

use crate::buyer::BuyerProfile;
use crate::cart::CartEntry;
use crate::catalog::AlbumLabels;
use crate::checkout::{Address, PaymentMethod, ShippingSelection};
use crate::ids::{AlbumId, BuyerId, CartEntryId, OptionId, PackageId, PhotoId, VariationId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Order placed, buyer not yet back from the payment gateway.
    #[default]
    PendingPayment,
    /// Gateway confirmed payment.
    Paid,
    /// Payment failed or was cancelled at the gateway.
    PaymentFailed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::PendingPayment => "pending_payment",
            OrderStatus::Paid => "paid",
            OrderStatus::PaymentFailed => "payment_failed",
        }
    }
}

/// Buyer contact details sent with the order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactDetails {
    pub buyer_id: BuyerId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl ContactDetails {
    pub fn from_buyer(buyer: &BuyerProfile) -> Self {
        Self {
            buyer_id: buyer.id.clone(),
            name: buyer.name.clone(),
            email: buyer.email.clone(),
            phone: buyer.phone.clone(),
        }
    }
}

/// Chosen option for one variation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderVariation {
    pub variation_id: VariationId,
    pub variation_name: String,
    pub option_id: OptionId,
    pub option_name: String,
    pub price: Money,
}

/// One photo slot on the order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLineItem {
    pub album_id: AlbumId,
    pub album_name: String,
    pub product_type_name: String,
    pub photo_id: PhotoId,
    pub photo_name: String,
    pub child_name: Option<String>,
    pub variations: Vec<OrderVariation>,
}

/// One cart entry on the order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    /// Cart entry this line came from.
    pub entry_id: CartEntryId,
    pub package_id: Option<PackageId>,
    /// Package name, or album name for single-album lines.
    pub name: String,
    pub labels: AlbumLabels,
    pub items: Vec<OrderLineItem>,
    pub quantity: i64,
    pub unit_price: Money,
    pub total_price: Money,
}

impl OrderLine {
    /// Project a cart entry onto the order payload.
    ///
    /// Only filled slots exist in a cart entry, so every item has a photo.
    pub fn from_entry(entry: &CartEntry) -> Self {
        let items = entry
            .selection
            .items()
            .iter()
            .filter_map(|item| {
                let photo = item.photo.as_ref()?;
                Some(OrderLineItem {
                    album_id: item.album.id.clone(),
                    album_name: item.album.name.clone(),
                    product_type_name: item.album.product_type_name.clone(),
                    photo_id: photo.id.clone(),
                    photo_name: photo.name.clone(),
                    child_name: item.child_name.clone(),
                    variations: item
                        .variation_choices
                        .iter()
                        .map(|choice| OrderVariation {
                            variation_id: choice.variation_id.clone(),
                            variation_name: choice.variation_name.clone(),
                            option_id: choice.option_id.clone(),
                            option_name: choice.option_name.clone(),
                            price: choice.price,
                        })
                        .collect(),
                })
            })
            .collect();

        Self {
            entry_id: entry.id.clone(),
            package_id: entry.selection.package_id().cloned(),
            name: entry.display_name(),
            labels: entry.labels.clone(),
            items,
            quantity: entry.quantity,
            unit_price: entry.unit_price,
            total_price: entry.total_price,
        }
    }
}

/// A complete order ready for submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub contact: ContactDetails,
    pub lines: Vec<OrderLine>,
    pub shipping: ShippingSelection,
    /// Present only when the shipping method delivers.
    pub shipping_address: Option<Address>,
    pub payment_method: PaymentMethod,
    pub remark: Option<String>,
    pub subtotal: Money,
    pub shipping_total: Money,
    pub grand_total: Money,
    pub currency: Currency,
    pub status: OrderStatus,
    /// Unix timestamp when the order was built.
    pub created_at: i64,
}

impl Order {
    /// Total units across all lines.
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|line| line.quantity).sum()
    }
}
