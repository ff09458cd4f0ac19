use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the EliteCart backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("API error: {status}{}", format_server_message(.message.as_deref()))]
    Status {
        status: StatusCode,
        message: Option<String>,
    },

    /// A success response whose body did not match the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured base URL cannot carry the endpoint path.
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// HTTP status of the failed response, if one was received.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status(),
            Self::Parse(_) | Self::InvalidUrl(_) => None,
        }
    }

    /// Whether the backend rejected the bearer token.
    ///
    /// Expired or malformed tokens come back as 401, 403 or 422. Callers
    /// fetching protected data should log out when this is true.
    #[must_use]
    pub fn requires_reauth(&self) -> bool {
        self.status().is_some_and(|s| {
            matches!(
                s,
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::UNPROCESSABLE_ENTITY
            )
        })
    }

    /// The message the backend put in the error body, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Text to show the shopper: the backend's message, or `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }
}

fn format_server_message(message: Option<&str>) -> String {
    message.map_or_else(String::new, |m| format!(" - {m}"))
}

/// Pull the human-readable message out of an error body.
///
/// Route handlers answer `{"error": "..."}`; token failures answer
/// `{"msg": "..."}`.
pub(crate) fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error", "msg", "message"]
        .iter()
        .find_map(|key| value.get(key).and_then(serde_json::Value::as_str))
        .filter(|m| !m.trim().is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16, message: Option<&str>) -> ApiError {
        ApiError::Status {
            status: StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            message: message.map(str::to_owned),
        }
    }

    #[test]
    fn test_requires_reauth() {
        for code in [401, 403, 422] {
            assert!(status(code, None).requires_reauth(), "{code}");
        }
        for code in [400, 404, 500] {
            assert!(!status(code, None).requires_reauth(), "{code}");
        }
    }

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = status(400, Some("Email already exists"));
        assert_eq!(err.user_message("Signup failed"), "Email already exists");
        assert_eq!(status(500, None).user_message("Signup failed"), "Signup failed");
    }

    #[test]
    fn test_display() {
        assert_eq!(
            status(404, Some("Product not found")).to_string(),
            "API error: 404 Not Found - Product not found"
        );
        assert_eq!(status(500, None).to_string(), "API error: 500 Internal Server Error");
    }

    #[test]
    fn test_extract_message() {
        assert_eq!(
            extract_message(r#"{"error":"Invalid credentials"}"#).as_deref(),
            Some("Invalid credentials")
        );
        assert_eq!(
            extract_message(r#"{"msg":"Token has expired"}"#).as_deref(),
            Some("Token has expired")
        );
        assert_eq!(extract_message(r#"{"error":""}"#), None);
        assert_eq!(extract_message("<html>502</html>"), None);
        assert_eq!(extract_message(r#"{"error":42}"#), None);
    }
}
