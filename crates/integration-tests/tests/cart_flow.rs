//! Catalog and cart workflows against the fake backend.
//!
//! Run with: cargo test -p qkart-integration-tests

use secrecy::SecretString;

use qkart_core::{CartError, ProductId};
use qkart_integration_tests::{
    ATOMIC_HABITS, BADMINTON_RACQUET, BROKEN_RATING, DUFFLE_BAG, FakeBackend, PASSWORD,
    RUNNING_SHOES, USERNAME,
};
use qkart_storefront::error::AppError;
use qkart_storefront::services::{AuthService, CartService, CatalogService};
use qkart_storefront::{ApiClient, Session};

async fn logged_in() -> (FakeBackend, ApiClient, Session) {
    let backend = FakeBackend::start().await.expect("start backend");
    let api = backend.client().expect("build client");
    let session = AuthService::new(&api)
        .login(USERNAME, &SecretString::from(PASSWORD))
        .await
        .expect("login");
    (backend, api, session)
}

fn id(s: &str) -> ProductId {
    ProductId::new(s)
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_products_keep_out_of_range_rating() {
    let backend = FakeBackend::start().await.expect("start backend");
    let api = backend.client().expect("build client");

    let products = CatalogService::new(&api).products().await.expect("products");

    let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![ATOMIC_HABITS, DUFFLE_BAG, RUNNING_SHOES, BADMINTON_RACQUET, BROKEN_RATING]
    );
    let clamped = products
        .iter()
        .find(|p| p.id.as_str() == BROKEN_RATING)
        .expect("product kept");
    assert_eq!(clamped.rating.stars(), 5);
}

#[tokio::test]
async fn test_products_are_cached() {
    let backend = FakeBackend::start().await.expect("start backend");
    let api = backend.client().expect("build client");
    let catalog = CatalogService::new(&api);

    catalog.products().await.expect("first fetch");
    catalog.products().await.expect("second fetch");

    assert_eq!(backend.product_requests(), 1);
}

#[tokio::test]
async fn test_search() {
    let backend = FakeBackend::start().await.expect("start backend");
    let api = backend.client().expect("build client");
    let catalog = CatalogService::new(&api);

    let sports = catalog.search("Sports").await.expect("search");
    assert_eq!(sports.len(), 2);

    let again = catalog.search("  sports ").await.expect("search");
    assert_eq!(again.len(), 2);
    assert_eq!(backend.search_requests(), 1);

    let none = catalog.search("spaceship").await.expect("search");
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_search_sends_normalized_text() {
    let backend = FakeBackend::start().await.expect("start backend");
    let api = backend.client().expect("build client");
    let catalog = CatalogService::new(&api);

    catalog.search("  SPORTS ").await.expect("search");
    assert_eq!(backend.last_search().await.as_deref(), Some("sports"));

    // Same key, served from the cache
    catalog.search("Sports").await.expect("search");
    assert_eq!(backend.search_requests(), 1);
}

#[tokio::test]
async fn test_blank_search_lists_catalog() {
    let backend = FakeBackend::start().await.expect("start backend");
    let api = backend.client().expect("build client");

    let all = CatalogService::new(&api).search("   ").await.expect("search");

    assert_eq!(all.len(), 5);
    assert_eq!(backend.search_requests(), 0);
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
async fn test_add_to_cart() {
    let (backend, api, session) = logged_in().await;
    let cart = CartService::new(&api);

    let view = cart
        .add(&session, &id(ATOMIC_HABITS), 2)
        .await
        .expect("add");

    assert_eq!(view.quantity, 2);
    assert!((view.value - 80.0).abs() < f64::EPSILON);
    assert_eq!(
        backend.cart(USERNAME).await,
        vec![(ATOMIC_HABITS.to_string(), 2)]
    );
}

#[tokio::test]
async fn test_adding_again_overwrites_quantity() {
    let (backend, api, session) = logged_in().await;
    let cart = CartService::new(&api);

    cart.add(&session, &id(ATOMIC_HABITS), 2).await.expect("add");
    let view = cart
        .add(&session, &id(ATOMIC_HABITS), 5)
        .await
        .expect("add again");

    assert_eq!(view.quantity_of(&id(ATOMIC_HABITS)), 5);
    assert_eq!(
        backend.cart(USERNAME).await,
        vec![(ATOMIC_HABITS.to_string(), 5)]
    );
}

#[tokio::test]
async fn test_increment_and_decrement() {
    let (backend, api, session) = logged_in().await;
    let cart = CartService::new(&api);
    let duffle = id(DUFFLE_BAG);

    let view = cart.increment(&session, &duffle).await.expect("increment");
    assert_eq!(view.quantity_of(&duffle), 1);

    let view = cart.increment(&session, &duffle).await.expect("increment");
    assert_eq!(view.quantity_of(&duffle), 2);

    let view = cart.decrement(&session, &duffle).await.expect("decrement");
    assert_eq!(view.quantity_of(&duffle), 1);

    let view = cart.decrement(&session, &duffle).await.expect("decrement");
    assert!(view.is_empty());
    assert!(backend.cart(USERNAME).await.is_empty());
}

#[tokio::test]
async fn test_non_positive_quantity_removes() {
    let (backend, api, session) = logged_in().await;
    let cart = CartService::new(&api);

    cart.add(&session, &id(RUNNING_SHOES), 3).await.expect("add");
    cart.add(&session, &id(ATOMIC_HABITS), 1).await.expect("add");

    let view = cart
        .set_quantity(&session, &id(RUNNING_SHOES), -4)
        .await
        .expect("set negative");

    assert_eq!(view.quantity_of(&id(RUNNING_SHOES)), 0);
    assert_eq!(view.quantity, 1);
    assert_eq!(
        backend.cart(USERNAME).await,
        vec![(ATOMIC_HABITS.to_string(), 1)]
    );
}

#[tokio::test]
async fn test_remove_absent_product_is_noop() {
    let (backend, api, session) = logged_in().await;

    let view = CartService::new(&api)
        .remove(&session, &id(BADMINTON_RACQUET))
        .await
        .expect("remove");

    assert!(view.is_empty());
    assert!(backend.cart(USERNAME).await.is_empty());
}

#[tokio::test]
async fn test_add_unknown_product() {
    let (backend, api, session) = logged_in().await;

    let err = CartService::new(&api)
        .add(&session, &id("no-such-product"), 1)
        .await
        .expect_err("unknown product");

    assert!(matches!(
        err,
        AppError::Cart(CartError::UnknownProduct(ref p)) if p.as_str() == "no-such-product"
    ));
    assert_eq!(err.user_message(), "This product is no longer available.");
    assert!(backend.cart(USERNAME).await.is_empty());
}

#[tokio::test]
async fn test_load_reconciles_stored_cart() {
    let (backend, api, session) = logged_in().await;
    backend
        .set_cart(
            USERNAME,
            &[
                (RUNNING_SHOES, 1),
                ("discontinued", 4),
                (ATOMIC_HABITS, 2),
                (DUFFLE_BAG, 0),
            ],
        )
        .await;

    let view = CartService::new(&api).load(&session).await.expect("load");

    // Catalog order, unknown products and empty lines dropped
    let ids: Vec<&str> = view.items.iter().map(|i| i.product_id.as_str()).collect();
    assert_eq!(ids, vec![ATOMIC_HABITS, RUNNING_SHOES]);
    assert_eq!(view.quantity, 3);
    assert!((view.value - 155.0).abs() < f64::EPSILON);
}
