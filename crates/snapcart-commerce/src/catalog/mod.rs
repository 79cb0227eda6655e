//! Catalog snapshot module.
//!
//! Read-only reference data: albums with their photos and variation
//! bindings, product variations, and packages. Fetched once per buyer
//! session and never mutated by the engine.

mod album;
mod package;
mod snapshot;
mod variation;

pub use album::{Album, AlbumLabels, AlbumVariationBinding, Photo, ProductType};
pub use package::{Package, PackageAlbum};
pub use snapshot::{CatalogApi, CatalogSnapshot};
pub use variation::{ProductVariation, ProductVariationOption};
