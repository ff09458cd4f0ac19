//! Cart to order through the checkout service.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use secrecy::SecretString;

use elitecart_client::services::{CheckoutError, OrderSummary};
use elitecart_client::storage::keys;
use elitecart_client::{CartStore, MemoryStorage, Storefront};
use elitecart_core::ProductId;
use elitecart_integration_tests::MockBackend;

async fn fill_cart(storefront: &mut Storefront, lines: &[(i32, u32)]) {
    for &(id, quantity) in lines {
        let product = storefront
            .api()
            .get_product(ProductId::new(id))
            .await
            .unwrap();
        storefront.cart_mut().add_item(&product, quantity);
    }
}

async fn log_in(storefront: &Storefront) {
    storefront
        .auth()
        .login("jane@example.com", &SecretString::from("secret123".to_string()))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_successful_checkout_empties_cart() {
    let backend = MockBackend::start().await;
    let storage = MemoryStorage::new();
    let mut storefront = backend.storefront(&storage);
    log_in(&storefront).await;
    fill_cart(&mut storefront, &[(1, 2), (2, 1)]).await;

    let summary = OrderSummary::for_cart(storefront.cart());
    assert_eq!(summary.subtotal, Decimal::new(12_948, 2));
    assert_eq!(summary.tax, Decimal::new(1_295, 2));
    assert_eq!(summary.total, Decimal::new(14_243, 2));

    let (checkout, cart) = storefront.checkout();
    let confirmation = checkout.place_order(cart).await.unwrap();

    assert_eq!(confirmation.items_count, 2);
    assert_eq!(confirmation.total_amount.amount(), Decimal::new(12_948, 2));
    assert!(storefront.cart().is_empty());
    assert!(!storage.contains(keys::CART));
    assert_eq!(backend.stock_of(1), Some(10));
    assert_eq!(backend.stock_of(2), Some(2));

    let order = backend.requests_to("/api/orders");
    assert_eq!(order[0].authorization.as_deref(), Some("Bearer token-1"));

    // Nothing to restore on the next run
    assert!(CartStore::load(std::sync::Arc::new(storage)).is_empty());
}

#[tokio::test]
async fn test_checkout_needs_login_and_items() {
    let backend = MockBackend::start().await;
    let mut storefront = backend.storefront(&MemoryStorage::new());
    fill_cart(&mut storefront, &[(1, 1)]).await;

    let (checkout, cart) = storefront.checkout();
    let err = checkout.place_order(cart).await.unwrap_err();
    assert!(matches!(err, CheckoutError::LoginRequired));
    assert_eq!(storefront.cart().len(), 1);

    log_in(&storefront).await;
    storefront.cart_mut().clear();
    let (checkout, cart) = storefront.checkout();
    let err = checkout.place_order(cart).await.unwrap_err();
    assert!(matches!(err, CheckoutError::EmptyCart));

    assert!(backend.requests_to("/api/orders").is_empty());
}

#[tokio::test]
async fn test_rejected_order_keeps_cart() {
    let backend = MockBackend::start().await;
    let storage = MemoryStorage::new();
    let mut storefront = backend.storefront(&storage);
    log_in(&storefront).await;
    fill_cart(&mut storefront, &[(2, 1)]).await;
    // More than the 3 in stock; the cart itself does not enforce stock
    storefront.cart_mut().update_quantity(ProductId::new(2), 5);

    let (checkout, cart) = storefront.checkout();
    let err = checkout.place_order(cart).await.unwrap_err();

    assert_eq!(
        err.user_message("Failed to place order"),
        "Insufficient stock for product 2"
    );
    assert_eq!(storefront.cart().total_item_count(), 5);
    assert!(storage.contains(keys::CART));
    assert_eq!(backend.order_count(), 0);
}
