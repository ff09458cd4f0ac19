//! Signup and login through the auth service.

#![allow(clippy::unwrap_used)]

use secrecy::{ExposeSecret, SecretString};

use elitecart_client::services::{AuthError, SignupForm};
use elitecart_client::storage::keys;
use elitecart_client::{MemoryStorage, SessionStore, Storage};
use elitecart_integration_tests::MockBackend;

fn secret(s: &str) -> SecretString {
    SecretString::from(s.to_string())
}

#[tokio::test]
async fn test_signup_logs_in_with_typed_name() {
    let backend = MockBackend::start().await;
    let storage = MemoryStorage::new();
    let storefront = backend.storefront(&storage);
    let password = secret("hunter22");

    let profile = storefront
        .auth()
        .signup(&SignupForm {
            name: "Sam Lee",
            email: "sam@example.com",
            password: &password,
            confirm_password: &password,
        })
        .await
        .unwrap();

    // The signup response carries no name, so the typed one is kept
    assert_eq!(profile.name, "Sam Lee");
    assert_eq!(profile.email.as_str(), "sam@example.com");

    let session = storefront.session();
    assert!(session.is_authenticated());
    assert_eq!(
        session.token().unwrap().expose_secret(),
        format!("token-{}", profile.user_id)
    );
    assert!(storage.contains(keys::USER));
    assert!(storage.contains(keys::TOKEN));
}

#[tokio::test]
async fn test_signup_validation_sends_nothing() {
    let backend = MockBackend::start().await;
    let storefront = backend.storefront(&MemoryStorage::new());
    let auth = storefront.auth();

    let err = auth
        .signup(&SignupForm {
            name: "Sam",
            email: "sam@example.com",
            password: &secret("hunter22"),
            confirm_password: &secret("hunter23"),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::PasswordMismatch));

    let err = auth
        .signup(&SignupForm {
            name: "Sam",
            email: "sam@example.com",
            password: &secret("abc"),
            confirm_password: &secret("abc"),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::WeakPassword(_)));

    assert!(backend.requests().is_empty());
    assert!(!storefront.session().is_authenticated());
}

#[tokio::test]
async fn test_duplicate_signup_shows_server_message() {
    let backend = MockBackend::start().await;
    let storefront = backend.storefront(&MemoryStorage::new());
    let password = secret("hunter22");

    let err = storefront
        .auth()
        .signup(&SignupForm {
            name: "Jane",
            email: "jane@example.com",
            password: &password,
            confirm_password: &password,
        })
        .await
        .unwrap_err();

    assert_eq!(
        err.user_message("Signup failed. Please try again."),
        "Email already exists"
    );
    assert!(!storefront.session().is_authenticated());
}

#[tokio::test]
async fn test_login_restores_after_restart() {
    let backend = MockBackend::start().await;
    let storage = MemoryStorage::new();

    let profile = backend
        .storefront(&storage)
        .auth()
        .login("jane@example.com", &secret("secret123"))
        .await
        .unwrap();
    assert_eq!(profile.name, "Jane Doe");

    // A new process over the same records picks the session back up
    let restored = SessionStore::load(std::sync::Arc::new(storage.clone()));
    assert!(restored.is_authenticated());
    assert_eq!(restored.user(), Some(profile));
    assert_eq!(storage.get(keys::TOKEN).unwrap().as_deref(), Some("token-1"));
}

#[tokio::test]
async fn test_bad_credentials() {
    let backend = MockBackend::start().await;
    let storefront = backend.storefront(&MemoryStorage::new());

    let err = storefront
        .auth()
        .login("jane@example.com", &secret("wrong-password"))
        .await
        .unwrap_err();

    assert_eq!(
        err.user_message("Login failed. Please try again."),
        "Invalid email or password"
    );
    assert!(!storefront.session().is_authenticated());
}

#[tokio::test]
async fn test_logout_clears_records() {
    let backend = MockBackend::start().await;
    let storage = MemoryStorage::new();
    let storefront = backend.storefront(&storage);
    storefront
        .auth()
        .login("jane@example.com", &secret("secret123"))
        .await
        .unwrap();

    storefront.auth().logout();

    assert!(!storefront.session().is_authenticated());
    assert!(!storage.contains(keys::USER));
    assert!(!storage.contains(keys::TOKEN));
}
