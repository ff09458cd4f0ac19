//! Checkout: order summary and placing the order.

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;
use tracing::{info, instrument};

use elitecart_core::{OrderConfirmation, OrderRequest};

use crate::api::{ApiClient, ApiError};
use crate::cart::CartStore;

/// Sales tax applied on top of the cart subtotal.
pub const TAX_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Please log in to place an order")]
    LoginRequired,

    #[error("Your cart is empty")]
    EmptyCart,

    #[error("{0}")]
    Api(#[from] ApiError),
}

impl CheckoutError {
    /// Text to show the shopper.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api(e) => e.user_message(fallback),
            other => other.to_string(),
        }
    }
}

/// Money breakdown shown before the order is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSummary {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl OrderSummary {
    /// Summarize a cart. Shipping is always free.
    #[must_use]
    pub fn for_cart(cart: &CartStore) -> Self {
        Self::from_subtotal(cart.total_price())
    }

    #[must_use]
    pub fn from_subtotal(subtotal: Decimal) -> Self {
        let tax = round_cents(subtotal.saturating_mul(TAX_RATE));
        let shipping = Decimal::ZERO;
        Self {
            subtotal,
            shipping,
            tax,
            total: subtotal.saturating_add(shipping).saturating_add(tax),
        }
    }
}

fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Checkout service.
pub struct CheckoutService<'a> {
    api: &'a ApiClient,
}

impl<'a> CheckoutService<'a> {
    #[must_use]
    pub const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Submit the cart as an order.
    ///
    /// On success the cart is cleared and the backend's confirmation is
    /// returned. On any failure the cart is left as it was.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::LoginRequired` if no one is signed in.
    /// Returns `CheckoutError::EmptyCart` if there is nothing to order.
    /// Returns `CheckoutError::Api` if the backend rejects the order.
    #[instrument(skip_all, fields(lines = cart.len()))]
    pub async fn place_order(
        &self,
        cart: &mut CartStore,
    ) -> Result<OrderConfirmation, CheckoutError> {
        if !self.api.session().is_authenticated() {
            return Err(CheckoutError::LoginRequired);
        }
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let request = OrderRequest::from_line_items(cart.items());
        let confirmation = self.api.create_order(&request).await?;

        cart.clear();
        info!(order_id = %confirmation.order_id, "Order placed");
        Ok(confirmation)
    }
}
