//! Crate-level error type.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::services::{AuthError, CheckoutError};
use crate::storage::StorageError;

/// Any error the client library can return.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),
}

impl Error {
    /// Text to show the shopper; `fallback` covers backend failures that
    /// came without a message.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api(e) => e.user_message(fallback),
            Self::Auth(e) => e.user_message(fallback),
            Self::Checkout(e) => e.user_message(fallback),
            Self::Config(_) | Self::Storage(_) => self.to_string(),
        }
    }

    /// Whether the backend rejected the session's token.
    #[must_use]
    pub fn requires_reauth(&self) -> bool {
        match self {
            Self::Api(e)
            | Self::Auth(AuthError::Api(e))
            | Self::Checkout(CheckoutError::Api(e)) => e.requires_reauth(),
            _ => false,
        }
    }
}

/// Result alias for client operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
