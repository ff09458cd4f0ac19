//! Flows that span the stores and the API client.
//!
//! # Services
//!
//! - `auth` - Signup, login and logout
//! - `checkout` - Order summary and placing an order from the cart

pub mod auth;
pub mod checkout;

pub use auth::{AuthError, AuthService, MIN_PASSWORD_LENGTH, SignupForm};
pub use checkout::{CheckoutError, CheckoutService, OrderSummary, TAX_RATE};
