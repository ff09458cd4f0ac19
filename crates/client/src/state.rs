//! Client state for one run of a front end.

use std::sync::Arc;

use tracing::debug;

use crate::api::ApiClient;
use crate::cart::CartStore;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::services::{AuthService, CheckoutService};
use crate::session::SessionStore;
use crate::storage::{FileStorage, Storage};

/// Everything a front end needs: configuration, the API client (which owns
/// the session) and the cart.
pub struct Storefront {
    config: ClientConfig,
    api: ApiClient,
    cart: CartStore,
}

impl Storefront {
    /// Open the data directory from `config` and restore the stores from it.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created or the HTTP
    /// client fails to build.
    pub fn open(config: ClientConfig) -> Result<Self> {
        let storage: Arc<dyn Storage> = Arc::new(FileStorage::open(&config.data_dir)?);
        debug!(data_dir = %config.data_dir.display(), "Opening storefront state");
        Self::with_storage(config, storage)
    }

    /// Restore the stores from an arbitrary storage backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_storage(config: ClientConfig, storage: Arc<dyn Storage>) -> Result<Self> {
        let session = SessionStore::load(Arc::clone(&storage));
        let cart = CartStore::load(storage);
        let api = ApiClient::new(&config.api, session)?;

        Ok(Self { config, api, cart })
    }

    /// Get a reference to the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get a reference to the API client.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Get a reference to the session.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        self.api.session()
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    #[must_use]
    pub const fn auth(&self) -> AuthService<'_> {
        AuthService::new(&self.api)
    }

    /// Split into the checkout service and the cart it empties.
    pub const fn checkout(&mut self) -> (CheckoutService<'_>, &mut CartStore) {
        (CheckoutService::new(&self.api), &mut self.cart)
    }
}
