//! Immutable catalog snapshot and the read API it is fetched from.

use crate::catalog::{Album, Package, ProductVariation};
use crate::error::CommerceError;
use crate::ids::{AlbumId, PackageId, VariationId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Catalog read API provided by the back office.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetch one album with its photos and variation bindings.
    async fn get_album(&self, id: &AlbumId) -> Result<Album, CommerceError>;

    /// Fetch one package.
    async fn get_package(&self, id: &PackageId) -> Result<Package, CommerceError>;

    /// Fetch one product variation with its options.
    async fn get_product_variation(
        &self,
        id: &VariationId,
    ) -> Result<ProductVariation, CommerceError>;
}

/// Reference data for one buyer session.
///
/// Built once (usually through [`CatalogSnapshot::fetch`]) and then shared
/// read-only by every selection and checkout operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CatalogSnapshot {
    albums: HashMap<AlbumId, Album>,
    packages: HashMap<PackageId, Package>,
    variations: HashMap<VariationId, ProductVariation>,
}

impl CatalogSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an album.
    pub fn with_album(mut self, album: Album) -> Self {
        self.albums.insert(album.id.clone(), album);
        self
    }

    /// Add a package.
    pub fn with_package(mut self, package: Package) -> Self {
        self.packages.insert(package.id.clone(), package);
        self
    }

    /// Add a variation.
    pub fn with_variation(mut self, variation: ProductVariation) -> Self {
        self.variations.insert(variation.id.clone(), variation);
        self
    }

    /// Fetch everything reachable from the given albums and packages.
    ///
    /// Package albums are fetched along with the requested albums, then every
    /// variation bound to any of them. Each ID is fetched once.
    pub async fn fetch<A: CatalogApi + ?Sized>(
        api: &A,
        album_ids: &[AlbumId],
        package_ids: &[PackageId],
    ) -> Result<Self, CommerceError> {
        let mut snapshot = Self::new();

        for id in package_ids {
            if !snapshot.packages.contains_key(id) {
                let package = api.get_package(id).await?;
                snapshot.packages.insert(id.clone(), package);
            }
        }

        let mut wanted: Vec<AlbumId> = album_ids.to_vec();
        for package in snapshot.packages.values() {
            wanted.extend(package.albums.iter().map(|a| a.album_id.clone()));
        }
        for id in wanted {
            if !snapshot.albums.contains_key(&id) {
                let album = api.get_album(&id).await?;
                snapshot.albums.insert(id, album);
            }
        }

        let bound: Vec<VariationId> = snapshot
            .albums
            .values()
            .flat_map(|a| a.variations.iter().map(|b| b.variation_id.clone()))
            .collect();
        for id in bound {
            if !snapshot.variations.contains_key(&id) {
                let variation = api.get_product_variation(&id).await?;
                snapshot.variations.insert(id, variation);
            }
        }

        snapshot.validate()?;
        tracing::debug!(
            albums = snapshot.albums.len(),
            packages = snapshot.packages.len(),
            variations = snapshot.variations.len(),
            "catalog snapshot fetched"
        );
        Ok(snapshot)
    }

    /// Check cross-references between albums, packages and variations.
    pub fn validate(&self) -> Result<(), CommerceError> {
        for package in self.packages.values() {
            for entry in &package.albums {
                if entry.quantity < 1 {
                    return Err(CommerceError::ConfigurationError(format!(
                        "package {} lists album {} with quantity {}",
                        package.id, entry.album_id, entry.quantity
                    )));
                }
                if !self.albums.contains_key(&entry.album_id) {
                    return Err(CommerceError::ConfigurationError(format!(
                        "package {} references unknown album {}",
                        package.id, entry.album_id
                    )));
                }
            }
        }

        for album in self.albums.values() {
            if album.product_type.price.is_negative() {
                return Err(CommerceError::ConfigurationError(format!(
                    "album {} has a negative price",
                    album.id
                )));
            }
            for binding in &album.variations {
                let variation = self.variations.get(&binding.variation_id).ok_or_else(|| {
                    CommerceError::ConfigurationError(format!(
                        "album {} binds unknown variation {}",
                        album.id, binding.variation_id
                    ))
                })?;
                if variation.options.iter().any(|o| o.price.is_negative()) {
                    return Err(CommerceError::ConfigurationError(format!(
                        "variation {} has a negative option price",
                        variation.id
                    )));
                }
            }
        }

        Ok(())
    }

    /// Get an album.
    pub fn get_album(&self, id: &AlbumId) -> Result<&Album, CommerceError> {
        self.albums
            .get(id)
            .ok_or_else(|| CommerceError::AlbumNotFound(id.clone()))
    }

    /// Get a package.
    pub fn get_package(&self, id: &PackageId) -> Result<&Package, CommerceError> {
        self.packages
            .get(id)
            .ok_or_else(|| CommerceError::PackageNotFound(id.clone()))
    }

    /// Get a product variation.
    pub fn get_product_variation(&self, id: &VariationId) -> Result<&ProductVariation, CommerceError> {
        self.variations
            .get(id)
            .ok_or_else(|| CommerceError::VariationNotFound(id.clone()))
    }

    /// All albums, keyed by ID.
    pub fn albums(&self) -> &HashMap<AlbumId, Album> {
        &self.albums
    }
}
