//! Shared catalog fixtures for unit tests.

use crate::cart::CartEntry;
use crate::catalog::{
    Album, AlbumLabels, AlbumVariationBinding, CatalogSnapshot, Package, PackageAlbum, Photo,
    ProductType, ProductVariation, ProductVariationOption,
};
use crate::ids::{AlbumId, CartEntryId, OptionId, PackageId, PhotoId, ProductTypeId, VariationId};
use crate::money::{Currency, Money};
use crate::selection::SelectionSession;

pub fn rm(units: i64) -> Money {
    Money::from_units(units, Currency::MYR)
}

fn labels(course: &str) -> AlbumLabels {
    AlbumLabels {
        institution: "SK Taman Melati".to_string(),
        year: "2026".to_string(),
        course: course.to_string(),
        standard: "Standard 5".to_string(),
    }
}

fn album(id: &str, course: &str, variations: Vec<AlbumVariationBinding>) -> Album {
    Album {
        id: AlbumId::new(id),
        name: format!("Album {}", id),
        product_type: ProductType {
            id: ProductTypeId::new("print-8r"),
            name: "8R Print".to_string(),
            price: rm(10),
            deliverable: true,
        },
        photos: (1..=3)
            .map(|n| Photo {
                id: PhotoId::new(format!("{}-{}", id, n)),
                name: format!("IMG_{:04}", n),
                url: format!("https://photos.example/{}/{}.jpg", id, n),
                thumbnail_url: format!("https://photos.example/{}/{}_thumb.jpg", id, n),
            })
            .collect(),
        variations,
        labels: labels(course),
    }
}

/// Albums A (optional frame), B (mandatory finish) and C (no add-ons, other
/// class); packages "duo" = A+B at RM50 and "trio" = C+B+A at RM80.
pub fn catalog() -> CatalogSnapshot {
    CatalogSnapshot::new()
        .with_album(album(
            "A",
            "5 Amanah",
            vec![AlbumVariationBinding {
                variation_id: VariationId::new("frame"),
                mandatory: false,
                hidden_option_ids: vec![],
            }],
        ))
        .with_album(album(
            "B",
            "5 Amanah",
            vec![AlbumVariationBinding {
                variation_id: VariationId::new("finish"),
                mandatory: true,
                hidden_option_ids: vec![],
            }],
        ))
        .with_album(album("C", "5 Bestari", vec![]))
        .with_variation(ProductVariation {
            id: VariationId::new("frame"),
            name: "Frame".to_string(),
            options: vec![ProductVariationOption {
                id: OptionId::new("wooden"),
                name: "Wooden frame".to_string(),
                price: rm(5),
            }],
        })
        .with_variation(ProductVariation {
            id: VariationId::new("finish"),
            name: "Finish".to_string(),
            options: vec![
                ProductVariationOption {
                    id: OptionId::new("matte"),
                    name: "Matte".to_string(),
                    price: Money::zero(Currency::MYR),
                },
                ProductVariationOption {
                    id: OptionId::new("laminated"),
                    name: "Laminated".to_string(),
                    price: rm(3),
                },
            ],
        })
        .with_package(Package {
            id: PackageId::new("duo"),
            name: "Duo Package".to_string(),
            price: rm(50),
            downloadable: false,
            albums: vec![
                PackageAlbum {
                    album_id: AlbumId::new("A"),
                    quantity: 1,
                },
                PackageAlbum {
                    album_id: AlbumId::new("B"),
                    quantity: 1,
                },
            ],
        })
        .with_package(Package {
            id: PackageId::new("trio"),
            name: "Trio Package".to_string(),
            price: rm(80),
            downloadable: false,
            albums: vec![
                PackageAlbum {
                    album_id: AlbumId::new("C"),
                    quantity: 1,
                },
                PackageAlbum {
                    album_id: AlbumId::new("B"),
                    quantity: 1,
                },
                PackageAlbum {
                    album_id: AlbumId::new("A"),
                    quantity: 1,
                },
            ],
        })
}

/// A single-album entry for album A (RM10), with the frame add-on (RM5) if
/// `framed`.
pub fn single_entry(catalog: &CatalogSnapshot, id: &str, framed: bool) -> CartEntry {
    let mut session = SelectionSession::new(Currency::MYR);
    session
        .start_single(catalog.get_album(&AlbumId::new("A")).unwrap(), &PhotoId::new("A-1"))
        .unwrap();
    if framed {
        session
            .choose_variation_option(
                0,
                &VariationId::new("frame"),
                Some(&OptionId::new("wooden")),
                catalog,
            )
            .unwrap();
    }
    let selection = session.finalize().unwrap();
    CartEntry::new(CartEntryId::new(id), selection, catalog, "/cart/edit").unwrap()
}

/// A single-album entry for album C (other class, RM10).
pub fn other_class_entry(catalog: &CatalogSnapshot, id: &str) -> CartEntry {
    let mut session = SelectionSession::new(Currency::MYR);
    session
        .start_single(catalog.get_album(&AlbumId::new("C")).unwrap(), &PhotoId::new("C-2"))
        .unwrap();
    let selection = session.finalize().unwrap();
    CartEntry::new(CartEntryId::new(id), selection, catalog, "/cart/edit").unwrap()
}

/// A "duo" package entry with both slots filled (RM50, matte finish).
pub fn package_entry(catalog: &CatalogSnapshot, id: &str) -> CartEntry {
    let mut session = SelectionSession::new(Currency::MYR);
    session
        .start_package(catalog.get_package(&PackageId::new("duo")).unwrap(), catalog)
        .unwrap();
    session
        .select_photo(0, &PhotoId::new("A-2"), catalog)
        .unwrap();
    session
        .select_photo(1, &PhotoId::new("B-1"), catalog)
        .unwrap();
    session
        .choose_variation_option(
            1,
            &VariationId::new("finish"),
            Some(&OptionId::new("matte")),
            catalog,
        )
        .unwrap();
    let selection = session.finalize().unwrap();
    CartEntry::new(CartEntryId::new(id), selection, catalog, "/cart/edit").unwrap()
}
