//! Signed-in identity and bearer token.
//!
//! The session is a cloneable handle: the API client holds one clone to read
//! the token for outgoing requests, the views hold another to log in and out.
//! Both see the same state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument, warn};

use elitecart_core::UserProfile;

use crate::storage::{self, Restored, Storage, keys};

/// Point-in-time copy of the session, for display.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: Option<UserProfile>,
    pub authenticated: bool,
}

#[derive(Default)]
struct SessionState {
    user: Option<UserProfile>,
    token: Option<SecretString>,
}

struct SessionInner {
    storage: Arc<dyn Storage>,
    state: Mutex<SessionState>,
}

/// The shopper's session.
///
/// The profile is persisted as JSON under `user` and the token as a plain
/// string under `token`. Login and logout always write or remove both.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionInner>,
}

impl SessionStore {
    /// Restore the session from storage.
    ///
    /// Never fails. A profile record that cannot be decoded or a token record
    /// that cannot be read gives a logged-out session. A token with no profile
    /// still counts as signed in.
    #[must_use]
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let state = restore(storage.as_ref());
        debug!(
            authenticated = state.token.is_some(),
            has_user = state.user.is_some(),
            "Session restored"
        );
        Self {
            inner: Arc::new(SessionInner {
                storage,
                state: Mutex::new(state),
            }),
        }
    }

    /// Start a session and persist it.
    #[instrument(skip_all, fields(user_id = %user.user_id))]
    pub fn login(&self, user: UserProfile, token: impl Into<String>) {
        let token: String = token.into();
        let storage = self.inner.storage.as_ref();

        match serde_json::to_string(&user) {
            Ok(json) => storage::write_best_effort(storage, keys::USER, &json),
            Err(e) => warn!(error = %e, "Failed to serialize user profile"),
        }
        storage::write_best_effort(storage, keys::TOKEN, &token);

        let mut state = self.state();
        state.user = Some(user);
        state.token = Some(SecretString::from(token));
        debug!("Logged in");
    }

    /// End the session and delete both persisted records.
    #[instrument(skip_all)]
    pub fn logout(&self) {
        {
            let mut state = self.state();
            state.user = None;
            state.token = None;
        }
        let storage = self.inner.storage.as_ref();
        storage::remove_best_effort(storage, keys::USER);
        storage::remove_best_effort(storage, keys::TOKEN);
        debug!("Logged out");
    }

    /// Whether a non-empty bearer token is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// The signed-in user's profile, if known.
    #[must_use]
    pub fn user(&self) -> Option<UserProfile> {
        self.state().user.clone()
    }

    /// The bearer token to send with requests.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.state()
            .token
            .as_ref()
            .filter(|t| !t.expose_secret().is_empty())
            .cloned()
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        let state = self.state();
        Session {
            user: state.user.clone(),
            authenticated: state
                .token
                .as_ref()
                .is_some_and(|t| !t.expose_secret().is_empty()),
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("SessionStore")
            .field("user", &state.user)
            .field("token", &state.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

fn restore(storage: &dyn Storage) -> SessionState {
    let user = match storage::restore_json::<UserProfile>(storage, keys::USER) {
        Restored::Present(user) => Some(user),
        Restored::Absent => None,
        Restored::Corrupt(reason) => {
            warn!(%reason, "Discarding unreadable session");
            return SessionState::default();
        }
    };

    let token = match storage.get(keys::TOKEN) {
        Ok(token) => token.filter(|t| !t.is_empty()).map(SecretString::from),
        Err(e) => {
            warn!(error = %e, "Discarding unreadable session token");
            return SessionState::default();
        }
    };

    if token.is_some() && user.is_none() {
        warn!("Session token restored without a user profile");
    }

    SessionState { user, token }
}
