//! Order history commands.
//!
//! A rejected token (401/403/422) ends the local session so the next command
//! starts from a clean login.

use std::fmt::Write as _;

use elitecart_client::{ApiClient, ApiError};
use elitecart_core::{Order, OrderId, UserProfile};

use super::CommandError;

const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";

/// List the signed-in user's orders.
#[allow(clippy::print_stdout)]
pub async fn list(api: &ApiClient) -> Result<(), CommandError> {
    let user = signed_in_user(api)?;

    let orders = api
        .orders_for_user(user.user_id)
        .await
        .map_err(|e| explain(api, e, "Failed to load orders"))?;

    if orders.orders.is_empty() {
        println!("No orders yet");
        return Ok(());
    }
    for order in &orders.orders {
        println!("{}", render_row(order));
    }
    Ok(())
}

/// Show one order with its items.
#[allow(clippy::print_stdout)]
pub async fn show(api: &ApiClient, id: OrderId) -> Result<(), CommandError> {
    signed_in_user(api)?;

    let order = api
        .get_order(id)
        .await
        .map_err(|e| explain(api, e, "Failed to load order"))?;

    println!("{}", render_detail(&order));
    Ok(())
}

fn signed_in_user(api: &ApiClient) -> Result<UserProfile, CommandError> {
    let session = api.session();
    if !session.is_authenticated() {
        return Err(CommandError::new("Please log in to view your orders"));
    }
    // A token without a profile cannot say whose orders to fetch
    session.user().ok_or_else(|| {
        session.logout();
        CommandError::new(SESSION_EXPIRED)
    })
}

fn explain(api: &ApiClient, error: ApiError, fallback: &str) -> CommandError {
    if error.requires_reauth() {
        tracing::warn!(status = ?error.status(), "Token rejected, logging out");
        api.session().logout();
        return CommandError::new(SESSION_EXPIRED);
    }
    CommandError::explain(error, fallback)
}

fn render_row(order: &Order) -> String {
    let placed = order
        .placed_on()
        .map_or_else(|| "-".to_string(), |d| d.format("%b %-d, %Y").to_string());
    format!(
        "Order #{:<6} {:<14} {:>3} items  {:>10}",
        order.order_id,
        placed,
        order.item_count(),
        order.total_amount.to_string()
    )
}

fn render_detail(order: &Order) -> String {
    let mut out = render_row(order);
    for item in &order.items {
        let _ = write!(
            out,
            "\n  product #{:<5} {:>3} x {:>10}",
            item.product_id,
            item.quantity,
            item.price.to_string()
        );
    }
    out
}
