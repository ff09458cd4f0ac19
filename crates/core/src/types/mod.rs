//! Core types for EliteCart.
//!
//! This module provides type-safe wrappers for common domain concepts and the
//! payloads exchanged with the EliteCart backend.

pub mod email;
pub mod id;
pub mod line_item;
pub mod order;
pub mod price;
pub mod product;
pub mod user;

pub use email::{Email, EmailError};
pub use id::*;
pub use line_item::LineItem;
pub use order::{Order, OrderConfirmation, OrderItem, OrderItemRequest, OrderList, OrderRequest};
pub use price::{Price, format_amount};
pub use product::{
    CATEGORIES, MAX_SELECTABLE_QUANTITY, Product, ProductFilter, ProductInput, ProductList,
    ProductMutation, ProductUpdate,
};
pub use user::{AuthResponse, LoginRequest, SignupRequest, UserProfile};
