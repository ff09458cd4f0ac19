//! EliteCart storefront client library.
//!
//! Holds the state a shopper's client keeps between runs and the gateway it
//! uses to talk to the EliteCart backend:
//!
//! - [`cart`] - persistent cart store
//! - [`session`] - persistent login session (profile and bearer token)
//! - [`storage`] - durable key/value storage the stores write through to
//! - [`api`] - REST gateway that attaches the session's bearer token
//! - [`services`] - signup/login and checkout flows built on the above
//!
//! Stores are plain values constructed explicitly and handed to whoever needs
//! them; nothing here is global.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod config;
pub mod error;
pub mod services;
pub mod session;
pub mod state;
pub mod storage;

pub use api::{ApiClient, ApiError};
pub use cart::CartStore;
pub use config::{ApiConfig, ClientConfig, ConfigError};
pub use error::{Error, Result};
pub use session::{Session, SessionStore};
pub use state::Storefront;
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
