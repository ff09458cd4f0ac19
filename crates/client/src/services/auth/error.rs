//! Authentication error types.

use thiserror::Error;

use crate::api::ApiError;

/// Errors that can occur during signup and login.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] elitecart_core::EmailError),

    /// Signup needs a display name.
    #[error("name is required")]
    MissingName,

    /// No password was entered.
    #[error("password is required")]
    MissingPassword,

    /// Password and confirmation differ.
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Password too weak or invalid.
    #[error("{0}")]
    WeakPassword(String),

    /// The backend rejected the request.
    #[error("{0}")]
    Api(#[from] ApiError),
}

impl AuthError {
    /// Text to show the shopper.
    ///
    /// Local validation failures describe themselves; backend failures use
    /// the server's message or `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api(e) => e.user_message(fallback),
            other => other.to_string(),
        }
    }
}
