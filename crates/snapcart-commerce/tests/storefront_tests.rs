//! End-to-end storefront flows: selection, cart, persistence and checkout.

mod common;

use common::*;
use snapcart_cache::{Cache, SessionId};
use snapcart_commerce::prelude::*;

async fn open(cache: &Cache, session: &SessionId) -> Storefront {
    Storefront::new(
        StorefrontConfig::default(),
        school_catalog().await,
        buyer(),
        cache.clone(),
        session.clone(),
    )
    .unwrap()
}

#[tokio::test]
async fn single_album_with_add_on_through_checkout() {
    let cache = Cache::in_memory();
    let mut store = open(&cache, &SessionId::new("sess-a")).await;

    store
        .start_single(&AlbumId::new("class"), &PhotoId::new("class-3"))
        .unwrap();
    store
        .choose_variation_option(0, &VariationId::new("frame"), Some(&OptionId::new("wooden")))
        .unwrap();
    let id = store.add_to_cart().unwrap();

    let entry = store.cart().get(&id).unwrap();
    assert_eq!(entry.unit_price.display(), "RM15.00");

    store.update_quantity(&id, 2).unwrap();
    assert_eq!(store.cart().get(&id).unwrap().total_price.display(), "RM30.00");

    let pickup = store.pricing(&ShippingMethodId::new("pickup")).unwrap();
    assert_eq!(pickup.grand_total.display(), "RM30.00");
    let courier = store.pricing(&ShippingMethodId::new("courier")).unwrap();
    assert_eq!(courier.grand_total.display(), "RM45.00");

    let api = FakeOrderApi::accepting("ord-100");
    let handoff = store.checkout(&api, &courier_form()).await.unwrap();
    assert_eq!(handoff.amount.display(), "RM45.00");
    assert_eq!(handoff.order_id.as_str(), "ord-100");
    assert!(store.cart().is_empty());

    let submitted = api.submitted.lock().unwrap();
    let order = &submitted[0];
    assert_eq!(order.lines.len(), 1);
    assert_eq!(order.lines[0].quantity, 2);
    assert_eq!(order.status, OrderStatus::PendingPayment);
    assert_eq!(order.remark.as_deref(), Some("Leave at guardhouse"));
    assert!(order.shipping_address.is_some());
}

#[tokio::test]
async fn package_finalizes_only_when_every_slot_has_a_photo() {
    let cache = Cache::in_memory();
    let mut store = open(&cache, &SessionId::new("sess-b")).await;

    store.start_package(&PackageId::new("duo")).unwrap();
    match store.add_to_cart() {
        Err(CommerceError::IncompleteSelection { stages }) => assert_eq!(stages, vec![0, 1]),
        other => panic!("expected IncompleteSelection, got {:?}", other),
    }

    store.select_photo(0, &PhotoId::new("class-1")).unwrap();
    assert!(!store.advance().unwrap());
    assert_eq!(store.current_session().current_stage(), 1);
    assert!(matches!(
        store.add_to_cart(),
        Err(CommerceError::IncompleteSelection { .. })
    ));

    store.select_photo(1, &PhotoId::new("portrait-2")).unwrap();
    assert!(store.advance().unwrap());
    let id = store.add_to_cart().unwrap();

    let entry = store.cart().get(&id).unwrap();
    assert_eq!(entry.unit_price.display(), "RM50.00");
    assert!(entry.is_package());
    assert!(store.current_session().is_empty());
}

#[tokio::test]
async fn mandatory_variation_blocks_finalize() {
    let cache = Cache::in_memory();
    let mut store = open(&cache, &SessionId::new("sess-m")).await;

    store
        .start_single(&AlbumId::new("sports"), &PhotoId::new("sports-1"))
        .unwrap();
    assert_eq!(
        store.validate_mandatory(0).unwrap(),
        vec![VariationId::new("finish")]
    );
    assert!(matches!(
        store.add_to_cart(),
        Err(CommerceError::MissingMandatoryVariation { stage: 0, .. })
    ));

    assert!(matches!(
        store.choose_variation_option(0, &VariationId::new("finish"), Some(&OptionId::new("metallic"))),
        Err(CommerceError::OptionUnavailable { .. })
    ));
    store
        .choose_variation_option(0, &VariationId::new("finish"), Some(&OptionId::new("gloss")))
        .unwrap();
    assert!(store.validate_mandatory(0).unwrap().is_empty());
    store.add_to_cart().unwrap();
}

#[tokio::test]
async fn switching_package_keeps_matching_album_choices() {
    let cache = Cache::in_memory();
    let mut store = open(&cache, &SessionId::new("sess-s")).await;

    store.start_package(&PackageId::new("duo")).unwrap();
    store.select_photo(0, &PhotoId::new("class-2")).unwrap();
    store
        .choose_variation_option(0, &VariationId::new("frame"), Some(&OptionId::new("wooden")))
        .unwrap();
    store.select_photo(1, &PhotoId::new("portrait-4")).unwrap();
    store.set_child_name(1, "Iman").unwrap();

    store.switch_package(&PackageId::new("family")).unwrap();
    let session = store.current_session();
    let albums: Vec<_> = session.items().iter().map(|i| i.album.id.as_str()).collect();
    assert_eq!(albums, vec!["portrait", "portrait", "class"]);

    let portrait = &session.items()[0];
    assert_eq!(portrait.photo.as_ref().unwrap().id.as_str(), "portrait-4");
    assert_eq!(portrait.child_name.as_deref(), Some("Iman"));
    assert!(session.items()[1].photo.is_none());

    let class = &session.items()[2];
    assert_eq!(class.photo.as_ref().unwrap().id.as_str(), "class-2");
    assert!(class.choice(&VariationId::new("frame")).is_some());
    assert_eq!(session.items_price().display(), "RM5.00");
    assert_eq!(session.current_stage(), 1);
}

#[tokio::test]
async fn cart_and_draft_survive_reload() {
    let cache = Cache::in_memory();
    let session = SessionId::new("sess-r");

    let (entry_id, draft) = {
        let mut store = open(&cache, &session).await;
        store
            .start_single(&AlbumId::new("class"), &PhotoId::new("class-1"))
            .unwrap();
        let id = store.add_to_cart().unwrap();
        store.update_quantity(&id, 4).unwrap();

        store.start_package(&PackageId::new("duo")).unwrap();
        store.select_photo(1, &PhotoId::new("portrait-1")).unwrap();
        (id, store.current_session().clone())
    };

    let store = open(&cache, &session).await;
    assert_eq!(store.cart().len(), 1);
    assert_eq!(store.cart().get(&entry_id).unwrap().quantity, 4);
    assert_eq!(store.cart().subtotal().unwrap().display(), "RM40.00");
    assert_eq!(store.current_session(), &draft);

    let other = open(&cache, &SessionId::new("sess-other")).await;
    assert!(other.cart().is_empty());
    assert!(other.current_session().is_empty());
}

#[tokio::test]
async fn corrupt_persisted_state_resets() {
    let cache = Cache::in_memory();
    let session = SessionId::new("sess-c");
    cache.set_raw("cart:sess-c", b"{not json").unwrap();
    cache
        .set_raw("draftSelection:sess-c", br#"{"version":1,"saved_at":0,"data":42}"#)
        .unwrap();

    let store = open(&cache, &session).await;
    assert!(store.cart().is_empty());
    assert!(store.current_session().is_empty());
    assert!(!cache.exists("cart:sess-c").unwrap());
    assert!(!cache.exists("draftSelection:sess-c").unwrap());
}

#[tokio::test]
async fn cart_with_edited_prices_resets_on_reload() {
    let cache = Cache::in_memory();
    let session = SessionId::new("sess-t");
    {
        let mut store = open(&cache, &session).await;
        store
            .start_single(&AlbumId::new("class"), &PhotoId::new("class-1"))
            .unwrap();
        store
            .choose_variation_option(0, &VariationId::new("frame"), Some(&OptionId::new("wooden")))
            .unwrap();
        store.add_to_cart().unwrap();
    }

    let mut snapshot: serde_json::Value = cache.get("cart:sess-t").unwrap().unwrap();
    let entry = &mut snapshot["data"][0];
    entry["selection"]["unit_price"]["amount_cents"] = serde_json::json!(100);
    entry["unit_price"]["amount_cents"] = serde_json::json!(100);
    entry["total_price"]["amount_cents"] = serde_json::json!(100);
    cache.set("cart:sess-t", &snapshot).unwrap();

    let store = open(&cache, &session).await;
    assert!(store.cart().is_empty());
    assert!(!cache.exists("cart:sess-t").unwrap());
}

#[tokio::test]
async fn failed_submission_keeps_cart() {
    let cache = Cache::in_memory();
    let session = SessionId::new("sess-f");
    let mut store = open(&cache, &session).await;
    store
        .start_single(&AlbumId::new("portrait"), &PhotoId::new("portrait-1"))
        .unwrap();
    store.add_to_cart().unwrap();

    let api = FakeOrderApi::failing(SubmissionError::Transport("connection reset".into()));
    let err = store.checkout(&api, &pickup_form()).await.unwrap_err();
    assert!(matches!(
        err,
        CommerceError::OrderSubmissionFailed {
            restart_required: false,
            ..
        }
    ));
    assert_eq!(err.kind(), ErrorKind::External);
    assert_eq!(store.cart().len(), 1);

    let reopened = open(&cache, &session).await;
    assert_eq!(reopened.cart().len(), 1);
}

#[tokio::test]
async fn repriced_catalog_stops_checkout_before_submission() {
    let cache = Cache::in_memory();
    let mut store = open(&cache, &SessionId::new("sess-p")).await;
    store
        .start_single(&AlbumId::new("class"), &PhotoId::new("class-1"))
        .unwrap();
    store.add_to_cart().unwrap();

    let mut api = FakeCatalogApi::school();
    if let Some(album) = api.albums.get_mut(&AlbumId::new("class")) {
        album.product_type.price = rm(12);
    }
    let fresh = CatalogSnapshot::fetch(&api, &[AlbumId::new("class")], &[])
        .await
        .unwrap();
    store.replace_catalog(fresh);

    let orders = FakeOrderApi::accepting("ord-200");
    let mut no_payment = pickup_form();
    no_payment.payment_method_id = None;
    assert!(matches!(
        store.checkout(&orders, &no_payment).await,
        Err(CommerceError::MissingPaymentMethod)
    ));

    let err = store.checkout(&orders, &pickup_form()).await.unwrap_err();
    assert!(matches!(err, CommerceError::StaleCartEntry { .. }));
    assert!(err.requires_restart());
    assert_eq!(orders.submissions(), 0);
    assert_eq!(store.cart().len(), 1);
}

#[tokio::test]
async fn checkout_validation_order() {
    let cache = Cache::in_memory();
    let mut store = open(&cache, &SessionId::new("sess-v")).await;
    let api = FakeOrderApi::accepting("ord-300");

    assert!(matches!(
        store.checkout(&api, &pickup_form()).await,
        Err(CommerceError::EmptyCart)
    ));

    store
        .start_single(&AlbumId::new("class"), &PhotoId::new("class-1"))
        .unwrap();
    store.add_to_cart().unwrap();

    let mut form = courier_form();
    form.payment_method_id = None;
    form.shipping_address = Address::default();
    assert!(matches!(
        store.checkout(&api, &form).await,
        Err(CommerceError::MissingPaymentMethod)
    ));

    form.payment_method_id = Some(PaymentMethodId::new("fpx"));
    assert!(matches!(
        store.checkout(&api, &form).await,
        Err(CommerceError::ShippingAddressRequired { .. })
    ));
    assert_eq!(api.submissions(), 0);

    let handoff = store.checkout(&api, &pickup_form()).await.unwrap();
    assert_eq!(handoff.amount.display(), "RM10.00");
    assert!(api.submitted.lock().unwrap()[0].shipping_address.is_none());
}

#[tokio::test]
async fn cart_groups_by_class() {
    let cache = Cache::in_memory();
    let mut store = open(&cache, &SessionId::new("sess-g")).await;

    store
        .start_single(&AlbumId::new("class"), &PhotoId::new("class-1"))
        .unwrap();
    store.add_to_cart().unwrap();
    store
        .start_single(&AlbumId::new("sports"), &PhotoId::new("sports-2"))
        .unwrap();
    store
        .choose_variation_option(0, &VariationId::new("finish"), Some(&OptionId::new("gloss")))
        .unwrap();
    store.add_to_cart().unwrap();
    store
        .start_single(&AlbumId::new("portrait"), &PhotoId::new("portrait-3"))
        .unwrap();
    store.add_to_cart().unwrap();

    let groups = store.cart_grouped_by_course();
    let courses: Vec<_> = groups.iter().map(|g| g.key.course.as_str()).collect();
    assert_eq!(courses, vec!["6 Cekal", "6 Dedikasi"]);
    assert_eq!(groups[0].entries.len(), 2);
    assert_eq!(groups[0].subtotal().unwrap().display(), "RM20.00");
}
