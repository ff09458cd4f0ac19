//! Cart commands.

use elitecart_client::services::OrderSummary;
use elitecart_client::{CartStore, Storefront};
use elitecart_core::{LineItem, ProductId, format_amount};

use super::{CommandError, OrExplain};

/// Print the cart and its totals.
#[allow(clippy::print_stdout)]
pub fn show(cart: &CartStore) {
    if cart.is_empty() {
        println!("Your cart is empty");
        return;
    }
    for item in cart.items() {
        println!("{}", render_line(item));
    }
    println!();
    println!("{}", render_summary(&OrderSummary::for_cart(cart)));
    println!("Items: {}", cart.total_item_count());
}

/// Add a product after checking it can be bought.
///
/// The quantity is capped at what the product page would let the shopper
/// pick: the stock, and never more than 10 at once.
#[allow(clippy::print_stdout)]
pub async fn add(
    storefront: &mut Storefront,
    id: ProductId,
    quantity: u32,
) -> Result<(), CommandError> {
    let product = storefront
        .api()
        .get_product(id)
        .await
        .or_explain("Failed to load product")?;

    if !product.in_stock() {
        return Err(CommandError::new(format!("{} is out of stock", product.name)));
    }
    if quantity == 0 {
        return Err(CommandError::new("Quantity must be at least 1"));
    }
    let max = product.max_selectable_quantity();
    if quantity > max {
        println!("Only {max} can be added at once; adding {max}");
    }
    let quantity = quantity.min(max);

    storefront.cart_mut().add_item(&product, quantity);
    println!("Added {quantity} x {} to your cart", product.name);
    Ok(())
}

/// Remove a product.
#[allow(clippy::print_stdout)]
pub fn remove(cart: &mut CartStore, id: ProductId) -> Result<(), CommandError> {
    let Some(name) = cart.get(id).map(|item| item.name.clone()) else {
        return Err(CommandError::new(format!("Product #{id} is not in your cart")));
    };
    cart.remove_item(id);
    println!("Removed {name} from your cart");
    Ok(())
}

/// Set a product's quantity; zero or less removes it.
#[allow(clippy::print_stdout)]
pub fn update(cart: &mut CartStore, id: ProductId, quantity: i64) -> Result<(), CommandError> {
    if cart.get(id).is_none() {
        return Err(CommandError::new(format!("Product #{id} is not in your cart")));
    }
    cart.update_quantity(id, quantity);
    match cart.get(id) {
        Some(item) => println!("{} quantity set to {}", item.name, item.quantity),
        None => println!("Removed product #{id} from your cart"),
    }
    Ok(())
}

/// Empty the cart.
#[allow(clippy::print_stdout)]
pub fn clear(cart: &mut CartStore) {
    cart.clear();
    println!("Cart cleared");
}

fn render_line(item: &LineItem) -> String {
    format!(
        "#{:<5} {:<32} {:>10} x {:<3} {:>10}",
        item.product_id,
        item.name,
        item.price.to_string(),
        item.quantity,
        format_amount(item.line_total())
    )
}

/// Subtotal, shipping, tax and total, one per line.
pub fn render_summary(summary: &OrderSummary) -> String {
    format!(
        "Subtotal: {}\nShipping: Free\nTax (10%): {}\nTotal: {}",
        format_amount(summary.subtotal),
        format_amount(summary.tax),
        format_amount(summary.total)
    )
}
