//! Package (bundle) types.

use crate::ids::{AlbumId, PackageId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// One album reference in a package, with how many photos it contributes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackageAlbum {
    pub album_id: AlbumId,
    /// Expected to be at least 1; validated on expansion.
    pub quantity: i64,
}

/// A bundle of albums sold as one SKU.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Package {
    /// Unique package identifier.
    pub id: PackageId,
    /// Display name.
    pub name: String,
    /// Bundle price, independent of add-ons.
    pub price: Money,
    /// Package is delivered as downloads only.
    #[serde(default)]
    pub downloadable: bool,
    /// Albums in display order.
    pub albums: Vec<PackageAlbum>,
}

impl Package {
    /// Check if the package references an album.
    pub fn contains(&self, album_id: &AlbumId) -> bool {
        self.albums.iter().any(|a| &a.album_id == album_id)
    }
}
