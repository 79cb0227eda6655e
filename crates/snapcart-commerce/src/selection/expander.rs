//! Package expansion into selection slots.

use crate::catalog::{Album, Package};
use crate::error::CommerceError;
use crate::ids::AlbumId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One occurrence of an album within an expanded package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExpandedSlot {
    pub album_id: AlbumId,
    /// 0-based occurrence of this album among the package's slots.
    pub occurrence: usize,
}

/// Expand a package's `(album, quantity)` list into slots.
///
/// Slots follow the package's album order, each album repeated `quantity`
/// times. A quantity below 1 or an album missing from `albums` is a
/// configuration error.
pub fn expand(
    package: &Package,
    albums: &HashMap<AlbumId, Album>,
) -> Result<Vec<ExpandedSlot>, CommerceError> {
    let mut slots = Vec::new();
    let mut seen: HashMap<&AlbumId, usize> = HashMap::new();

    for entry in &package.albums {
        if entry.quantity < 1 {
            return Err(CommerceError::ConfigurationError(format!(
                "package {} lists album {} with quantity {}",
                package.id, entry.album_id, entry.quantity
            )));
        }
        if !albums.contains_key(&entry.album_id) {
            return Err(CommerceError::ConfigurationError(format!(
                "package {} references unknown album {}",
                package.id, entry.album_id
            )));
        }

        let occurrence = seen.entry(&entry.album_id).or_insert(0);
        for _ in 0..entry.quantity {
            slots.push(ExpandedSlot {
                album_id: entry.album_id.clone(),
                occurrence: *occurrence,
            });
            *occurrence += 1;
        }
    }

    Ok(slots)
}
