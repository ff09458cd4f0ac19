//! Checkout command.

use elitecart_client::services::OrderSummary;
use elitecart_client::{CartStore, Storefront};

use super::cart::render_summary;
use super::{CommandError, OrExplain};

/// Print what the order would cost.
#[allow(clippy::print_stdout)]
pub fn summary(cart: &CartStore) {
    if cart.is_empty() {
        println!("Your cart is empty");
        return;
    }
    println!("{}", render_summary(&OrderSummary::for_cart(cart)));
}

/// Place an order for the whole cart.
#[allow(clippy::print_stdout)]
pub async fn place_order(storefront: &mut Storefront) -> Result<(), CommandError> {
    let summary = OrderSummary::for_cart(storefront.cart());
    let (checkout, cart) = storefront.checkout();

    let confirmation = checkout
        .place_order(cart)
        .await
        .or_explain("Failed to place order. Please try again.")?;

    println!("{}", render_summary(&summary));
    println!();
    println!(
        "{} Order #{}: {} items, total {}",
        confirmation.message.as_deref().unwrap_or("Order placed!"),
        confirmation.order_id,
        confirmation.items_count,
        confirmation.total_amount
    );
    Ok(())
}
