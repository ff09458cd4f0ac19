//! EliteCart Core - Shared types library.
//!
//! This crate provides common types used across all EliteCart components:
//! - `client` - Cart and session stores, local storage, and the REST gateway
//! - `cli` - The `elitecart` command line storefront
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, lenient prices, emails, line items, and backend DTOs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
