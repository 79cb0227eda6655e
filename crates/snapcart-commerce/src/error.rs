//! Commerce error types.

use crate::ids::{AlbumId, CartEntryId, OptionId, PackageId, PhotoId, VariationId};
use thiserror::Error;

/// How the buyer-facing layer should react to an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Reference data or persisted state is unusable; restart selection.
    Fatal,
    /// Input was rejected; nothing was lost and the buyer can correct it.
    Recoverable,
    /// An external collaborator failed; retry or restart.
    External,
}

/// Errors that can occur in storefront operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Malformed reference data (e.g., a package album with quantity 0).
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Album not found in the catalog snapshot.
    #[error("Album not found: {0}")]
    AlbumNotFound(AlbumId),

    /// Package not found in the catalog snapshot.
    #[error("Package not found: {0}")]
    PackageNotFound(PackageId),

    /// Variation not found in the catalog snapshot.
    #[error("Variation not found: {0}")]
    VariationNotFound(VariationId),

    /// Photo does not belong to the slot's album.
    #[error("Photo {photo_id} not found in album {album_id}")]
    PhotoNotFound { album_id: AlbumId, photo_id: PhotoId },

    /// Variation is not offered for the slot's album.
    #[error("Variation {variation_id} is not available for album {album_id}")]
    VariationNotBound {
        album_id: AlbumId,
        variation_id: VariationId,
    },

    /// Option missing from the variation or hidden for the album.
    #[error("Option {option_id} is not available for variation {variation_id}")]
    OptionUnavailable {
        variation_id: VariationId,
        option_id: OptionId,
    },

    /// No selection has been started.
    #[error("No selection in progress")]
    NoActiveSelection,

    /// Operation only valid for package selections.
    #[error("Selection is not a package selection")]
    NotPackageSelection,

    /// Stage index outside the expanded slots.
    #[error("Stage {stage} out of range (selection has {len} slots)")]
    StageOutOfRange { stage: usize, len: usize },

    /// Some slots have no photo yet.
    #[error("Selection incomplete: stages {stages:?} have no photo")]
    IncompleteSelection { stages: Vec<usize> },

    /// A mandatory variation has no choice.
    #[error("Stage {stage} is missing mandatory variations {variation_ids:?}")]
    MissingMandatoryVariation {
        stage: usize,
        variation_ids: Vec<VariationId>,
    },

    /// Child name is not registered to the buyer.
    #[error("Unknown child: {0}")]
    UnknownChild(String),

    /// Entry not in cart.
    #[error("Cart entry not found: {0}")]
    EntryNotFound(CartEntryId),

    /// Cart entry no longer matches the catalog.
    #[error("Cart entry {entry_id} is out of date: {reason}")]
    StaleCartEntry {
        entry_id: CartEntryId,
        reason: String,
    },

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Checkout with an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Checkout without a payment method.
    #[error("Payment method is required")]
    MissingPaymentMethod,

    /// Delivery requested with blank address fields.
    #[error("Shipping address required: missing {missing:?}")]
    ShippingAddressRequired { missing: Vec<&'static str> },

    /// Shipping method not configured.
    #[error("Unknown shipping method: {0}")]
    UnknownShippingMethod(String),

    /// The order API rejected or failed the submission.
    #[error("Order submission failed: {message}")]
    OrderSubmissionFailed {
        message: String,
        restart_required: bool,
    },

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Cache error.
    #[error("Cache error: {0}")]
    CacheError(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CommerceError {
    /// Classify the error for the buyer-facing layer.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommerceError::ConfigurationError(_)
            | CommerceError::AlbumNotFound(_)
            | CommerceError::PackageNotFound(_)
            | CommerceError::VariationNotFound(_)
            | CommerceError::StaleCartEntry { .. }
            | CommerceError::CurrencyMismatch { .. }
            | CommerceError::Overflow
            | CommerceError::SerializationError(_) => ErrorKind::Fatal,
            CommerceError::OrderSubmissionFailed { .. } | CommerceError::CacheError(_) => {
                ErrorKind::External
            }
            _ => ErrorKind::Recoverable,
        }
    }

    /// Whether the buyer should be sent back to start a fresh selection.
    pub fn requires_restart(&self) -> bool {
        match self {
            CommerceError::OrderSubmissionFailed {
                restart_required, ..
            } => *restart_required,
            _ => self.kind() == ErrorKind::Fatal,
        }
    }
}

impl From<snapcart_cache::CacheError> for CommerceError {
    fn from(e: snapcart_cache::CacheError) -> Self {
        CommerceError::CacheError(e.to_string())
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}

impl From<toml::de::Error> for CommerceError {
    fn from(e: toml::de::Error) -> Self {
        CommerceError::ConfigurationError(e.to_string())
    }
}
