//! Command implementations.
//!
//! Each command prints its result to stdout and returns a [`CommandError`]
//! whose `Display` is the one line shown to the shopper on failure.

pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;

use thiserror::Error;

/// A failed command, already phrased for the shopper.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CommandError {
    message: String,
    #[source]
    source: Option<elitecart_client::Error>,
}

impl CommandError {
    /// A failure detected by the command itself.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// A library failure, using the backend's message if it sent one and
    /// `fallback` otherwise.
    pub fn explain(error: impl Into<elitecart_client::Error>, fallback: &str) -> Self {
        let error = error.into();
        Self {
            message: error.user_message(fallback),
            source: Some(error),
        }
    }
}

/// Turn a library error into the shopper-facing message.
pub trait OrExplain<T> {
    /// Use the backend's message if it sent one, `fallback` otherwise.
    fn or_explain(self, fallback: &str) -> Result<T, CommandError>;
}

impl<T, E: Into<elitecart_client::Error>> OrExplain<T> for Result<T, E> {
    fn or_explain(self, fallback: &str) -> Result<T, CommandError> {
        self.map_err(|e| CommandError::explain(e, fallback))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use elitecart_client::services::CheckoutError;

    use super::*;

    #[test]
    fn test_or_explain_uses_error_text() {
        let result: Result<(), CheckoutError> = Err(CheckoutError::EmptyCart);
        let err = result.or_explain("Failed to place order").unwrap_err();
        assert_eq!(err.to_string(), "Your cart is empty");
        assert!(std::error::Error::source(&err).is_some());
    }
}
