//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use snapcart_commerce::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

pub fn rm(units: i64) -> Money {
    Money::from_units(units, Currency::MYR)
}

fn album(id: &str, course: &str, bindings: Vec<AlbumVariationBinding>) -> Album {
    Album {
        id: AlbumId::new(id),
        name: format!("{} album", id),
        product_type: ProductType {
            id: ProductTypeId::new("print-8r"),
            name: "8R Print".to_string(),
            price: rm(10),
            deliverable: true,
        },
        photos: (1..=4)
            .map(|n| Photo {
                id: PhotoId::new(format!("{}-{}", id, n)),
                name: format!("DSC_{:04}", n),
                url: format!("https://cdn.example/{}/{}.jpg", id, n),
                thumbnail_url: format!("https://cdn.example/{}/{}_t.jpg", id, n),
            })
            .collect(),
        variations: bindings,
        labels: AlbumLabels {
            institution: "SK Seri Indah".to_string(),
            year: "2026".to_string(),
            course: course.to_string(),
            standard: "Standard 6".to_string(),
        },
    }
}

fn optional_frame() -> AlbumVariationBinding {
    AlbumVariationBinding {
        variation_id: VariationId::new("frame"),
        mandatory: false,
        hidden_option_ids: vec![],
    }
}

/// Catalog read API over fixed data.
pub struct FakeCatalogApi {
    pub albums: HashMap<AlbumId, Album>,
    pub packages: HashMap<PackageId, Package>,
    pub variations: HashMap<VariationId, ProductVariation>,
}

impl FakeCatalogApi {
    /// Albums "class" and "portrait" (optional RM5 frame, class 6 Cekal) and
    /// "sports" (mandatory finish, class 6 Dedikasi); packages "duo"
    /// (class + portrait, RM50) and "family" (portrait x2 + class, RM90).
    pub fn school() -> Self {
        let albums = vec![
            album("class", "6 Cekal", vec![optional_frame()]),
            album("portrait", "6 Cekal", vec![optional_frame()]),
            album(
                "sports",
                "6 Dedikasi",
                vec![AlbumVariationBinding {
                    variation_id: VariationId::new("finish"),
                    mandatory: true,
                    hidden_option_ids: vec![OptionId::new("metallic")],
                }],
            ),
        ];
        let packages = vec![
            Package {
                id: PackageId::new("duo"),
                name: "Duo".to_string(),
                price: rm(50),
                downloadable: false,
                albums: vec![
                    PackageAlbum {
                        album_id: AlbumId::new("class"),
                        quantity: 1,
                    },
                    PackageAlbum {
                        album_id: AlbumId::new("portrait"),
                        quantity: 1,
                    },
                ],
            },
            Package {
                id: PackageId::new("family"),
                name: "Family".to_string(),
                price: rm(90),
                downloadable: false,
                albums: vec![
                    PackageAlbum {
                        album_id: AlbumId::new("portrait"),
                        quantity: 2,
                    },
                    PackageAlbum {
                        album_id: AlbumId::new("class"),
                        quantity: 1,
                    },
                ],
            },
        ];
        let variations = vec![
            ProductVariation {
                id: VariationId::new("frame"),
                name: "Frame".to_string(),
                options: vec![ProductVariationOption {
                    id: OptionId::new("wooden"),
                    name: "Wooden".to_string(),
                    price: rm(5),
                }],
            },
            ProductVariation {
                id: VariationId::new("finish"),
                name: "Finish".to_string(),
                options: vec![
                    ProductVariationOption {
                        id: OptionId::new("gloss"),
                        name: "Gloss".to_string(),
                        price: rm(0),
                    },
                    ProductVariationOption {
                        id: OptionId::new("metallic"),
                        name: "Metallic".to_string(),
                        price: rm(8),
                    },
                ],
            },
        ];

        Self {
            albums: albums.into_iter().map(|a| (a.id.clone(), a)).collect(),
            packages: packages.into_iter().map(|p| (p.id.clone(), p)).collect(),
            variations: variations.into_iter().map(|v| (v.id.clone(), v)).collect(),
        }
    }
}

#[async_trait]
impl CatalogApi for FakeCatalogApi {
    async fn get_album(&self, id: &AlbumId) -> Result<Album, CommerceError> {
        self.albums
            .get(id)
            .cloned()
            .ok_or_else(|| CommerceError::AlbumNotFound(id.clone()))
    }

    async fn get_package(&self, id: &PackageId) -> Result<Package, CommerceError> {
        self.packages
            .get(id)
            .cloned()
            .ok_or_else(|| CommerceError::PackageNotFound(id.clone()))
    }

    async fn get_product_variation(
        &self,
        id: &VariationId,
    ) -> Result<ProductVariation, CommerceError> {
        self.variations
            .get(id)
            .cloned()
            .ok_or_else(|| CommerceError::VariationNotFound(id.clone()))
    }
}

pub async fn school_catalog() -> CatalogSnapshot {
    let api = FakeCatalogApi::school();
    CatalogSnapshot::fetch(
        &api,
        &[AlbumId::new("sports")],
        &[PackageId::new("duo"), PackageId::new("family")],
    )
    .await
    .unwrap()
}

pub fn buyer() -> BuyerProfile {
    BuyerProfile::new("buyer-1", "Farah", "farah@example.com").with_child("Iman")
}

/// Order API that records submissions and answers with a fixed result.
pub struct FakeOrderApi {
    result: Result<OrderReceipt, SubmissionError>,
    pub submitted: Mutex<Vec<Order>>,
}

impl FakeOrderApi {
    pub fn accepting(order_id: &str) -> Self {
        let mut gateway_fields = BTreeMap::new();
        gateway_fields.insert("billCode".to_string(), format!("bill-{}", order_id));
        Self {
            result: Ok(OrderReceipt {
                order_id: OrderId::new(order_id),
                gateway_fields,
            }),
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: SubmissionError) -> Self {
        Self {
            result: Err(error),
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn submissions(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }
}

#[async_trait]
impl OrderApi for FakeOrderApi {
    async fn submit(&self, order: &Order) -> Result<OrderReceipt, SubmissionError> {
        self.submitted.lock().unwrap().push(order.clone());
        self.result.clone()
    }
}

pub fn pickup_form() -> CheckoutForm {
    CheckoutForm {
        shipping_method_id: ShippingMethodId::new("pickup"),
        payment_method_id: Some(PaymentMethodId::new("fpx")),
        shipping_address: Address::default(),
        remark: None,
    }
}

pub fn courier_form() -> CheckoutForm {
    CheckoutForm {
        shipping_method_id: ShippingMethodId::new("courier"),
        payment_method_id: Some(PaymentMethodId::new("fpx")),
        shipping_address: Address::new(
            "Farah",
            "019-8765432",
            "8 Jalan Kenanga",
            "Petaling Jaya",
            "46000",
            "Selangor",
        ),
        remark: Some("Leave at guardhouse".to_string()),
    }
}
