//! Photo-studio storefront engine for SnapCart.
//!
//! Schools buy class and portrait photos either one album at a time or as
//! packages that bundle several albums. This crate provides:
//!
//! - **Catalog**: albums, photos, product variations and packages, fetched
//!   once per session into an immutable snapshot
//! - **Selection**: the package expander and the selection wizard state
//!   machine
//! - **Pricing**: integer-cent totals for selections, cart entries and orders
//! - **Cart**: finalized, priced entries grouped by class
//! - **Checkout**: order building and submission to the order API
//! - **Storefront**: the buyer-facing façade that persists the cart and draft
//!
//! # Example
//!
//! ```rust,ignore
//! use snapcart_commerce::prelude::*;
//! use snapcart_cache::{Cache, SessionId};
//!
//! let catalog = CatalogSnapshot::fetch(&api, &[], &[PackageId::new("duo")]).await?;
//! let mut store = Storefront::new(
//!     StorefrontConfig::default(),
//!     catalog,
//!     buyer,
//!     Cache::open_default()?,
//!     SessionId::generate(),
//! )?;
//!
//! store.start_package(&PackageId::new("duo"))?;
//! store.select_photo(0, &PhotoId::new("A-2"))?;
//! store.advance()?;
//! store.select_photo(1, &PhotoId::new("B-1"))?;
//! store.add_to_cart()?;
//!
//! let pricing = store.pricing(&ShippingMethodId::new("pickup"))?;
//! println!("Total: {}", pricing.grand_total.display());
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod buyer;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod pricing;
pub mod selection;
pub mod storefront;

#[cfg(test)]
mod fixtures;

pub use error::{CommerceError, ErrorKind};
pub use ids::*;
pub use money::{Currency, Money};
pub use storefront::{CheckoutForm, Storefront};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CommerceError, ErrorKind};
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    pub use crate::buyer::BuyerProfile;
    pub use crate::config::StorefrontConfig;

    // Catalog
    pub use crate::catalog::{
        Album, AlbumLabels, AlbumVariationBinding, CatalogApi, CatalogSnapshot, Package,
        PackageAlbum, Photo, ProductType, ProductVariation, ProductVariationOption,
    };

    // Selection
    pub use crate::selection::{
        expand, ExpandedSlot, FinalizedSelection, SelectionItem, SelectionSession, SessionState,
        VariationChoice,
    };

    // Pricing and cart
    pub use crate::cart::{CartEntry, CartStore, CourseGroup, CourseKey};
    pub use crate::pricing::{CartPricing, LinePricing};

    // Checkout
    pub use crate::checkout::{
        Address, CheckoutRequest, Order, OrderApi, OrderLine, OrderReceipt, OrderStatus,
        PaymentHandoff, PaymentMethod, ShippingMethod, SubmissionError,
    };

    pub use crate::storefront::{CheckoutForm, Storefront};
}
