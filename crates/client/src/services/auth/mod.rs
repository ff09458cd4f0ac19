//! Authentication service.
//!
//! Validates signup and login input locally, calls the backend, and starts
//! the session from the response.

mod error;

pub use error::AuthError;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

use elitecart_core::{Email, LoginRequest, SignupRequest, UserProfile};

use crate::api::ApiClient;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// What the shopper typed into the signup form.
pub struct SignupForm<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a SecretString,
    pub confirm_password: &'a SecretString,
}

/// Authentication service.
///
/// Handles registration, login and logout against the backend and keeps the
/// session of the wrapped [`ApiClient`] in step.
pub struct AuthService<'a> {
    api: &'a ApiClient,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Register a new account and sign in as it.
    ///
    /// Nothing is sent unless the form passes local validation.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::PasswordMismatch` if the confirmation differs.
    /// Returns `AuthError::WeakPassword` if the password is too short.
    /// Returns `AuthError::Api` if the backend rejects the signup.
    #[instrument(skip_all)]
    pub async fn signup(&self, form: &SignupForm<'_>) -> Result<UserProfile, AuthError> {
        let name = form.name.trim();
        if name.is_empty() {
            return Err(AuthError::MissingName);
        }
        let email = Email::parse(form.email)?;

        let password = form.password.expose_secret();
        if password != form.confirm_password.expose_secret() {
            return Err(AuthError::PasswordMismatch);
        }
        validate_password(password)?;

        let response = self
            .api
            .signup(&SignupRequest {
                name,
                email: &email,
                password,
            })
            .await?;

        let (profile, token) = response.into_session(Some(name));
        self.api.session().login(profile.clone(), token);
        debug!(user_id = %profile.user_id, "Signed up");
        Ok(profile)
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::Api` if the backend rejects the credentials.
    #[instrument(skip_all)]
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<UserProfile, AuthError> {
        let email = Email::parse(email)?;
        let password = password.expose_secret();
        if password.is_empty() {
            return Err(AuthError::MissingPassword);
        }

        let response = self
            .api
            .login(&LoginRequest {
                email: &email,
                password,
            })
            .await?;

        let (profile, token) = response.into_session(None);
        self.api.session().login(profile.clone(), token);
        debug!(user_id = %profile.user_id, "Logged in");
        Ok(profile)
    }

    /// Sign out locally. The backend keeps no session state to revoke.
    pub fn logout(&self) {
        self.api.session().logout();
    }
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}
