//! Identity payloads.

use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::UserId;

/// The signed-in shopper, as kept in the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    #[serde(default)]
    pub name: String,
    pub email: Email,
}

/// Body of `POST /auth/signup`.
#[derive(Debug, Serialize)]
pub struct SignupRequest<'a> {
    pub name: &'a str,
    pub email: &'a Email,
    pub password: &'a str,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a Email,
    pub password: &'a str,
}

/// Response of both auth endpoints.
///
/// Older backends omit `name` from the signup response.
#[derive(Deserialize)]
pub struct AuthResponse {
    pub user_id: UserId,
    #[serde(default)]
    pub name: Option<String>,
    pub email: Email,
    pub access_token: String,
}

impl AuthResponse {
    /// Split into the profile to store and the bearer token.
    ///
    /// `fallback_name` is used when the response carries no name, which is
    /// how signup fills in the name the shopper typed.
    #[must_use]
    pub fn into_session(self, fallback_name: Option<&str>) -> (UserProfile, String) {
        let name = self
            .name
            .filter(|n| !n.is_empty())
            .or_else(|| fallback_name.map(str::to_owned))
            .unwrap_or_default();
        (
            UserProfile {
                user_id: self.user_id,
                name,
                email: self.email,
            },
            self.access_token,
        )
    }
}

impl std::fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthResponse")
            .field("user_id", &self.user_id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}
