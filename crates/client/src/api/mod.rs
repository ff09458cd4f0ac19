//! EliteCart REST API client.
//!
//! Every request is sent relative to the configured base URL and carries
//! `Authorization: Bearer <token>` whenever the session holds a token. Bodies
//! are JSON both ways.
//!
//! # Example
//!
//! ```rust,ignore
//! let api = ApiClient::new(&config.api, session.clone())?;
//!
//! let products = api.list_products(&ProductFilter::default().category("Men")).await?;
//! let order = api.create_order(&OrderRequest::from_line_items(cart.items())).await?;
//! ```

mod error;

pub use error::ApiError;
pub use reqwest::StatusCode;

use std::sync::Arc;

use reqwest::{Method, RequestBuilder};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use elitecart_core::{
    AuthResponse, LoginRequest, Order, OrderConfirmation, OrderId, OrderList, OrderRequest,
    Product, ProductFilter, ProductId, ProductInput, ProductList, ProductMutation, ProductUpdate,
    SignupRequest, UserId,
};

use crate::config::ApiConfig;
use crate::session::SessionStore;

/// Client for the EliteCart backend.
///
/// Cheap to clone; clones share the connection pool and the session.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    session: SessionStore,
}

impl ApiClient {
    /// Create a client that authenticates with `session`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig, session: SessionStore) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                session,
            }),
        })
    }

    /// The session whose token is attached to requests.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// The backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Start a request to `path`, relative to the base URL.
    ///
    /// The bearer token is read from the session at this point, so a login
    /// that happens afterwards does not affect the returned builder.
    ///
    /// # Errors
    ///
    /// Returns error if `path` cannot be joined onto the base URL.
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(path)?;
        let builder = self.inner.client.request(method, url);
        Ok(match self.inner.session.token() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        })
    }

    /// Send a request and decode the JSON body of a success response.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` for non-2xx responses, carrying the
    /// backend's error message when the body has one.
    pub async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            debug!(
                status = %status,
                body = %body.chars().take(200).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(ApiError::Status {
                status,
                message: error::extract_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(
                error = %e,
                body = %body.chars().take(200).collect::<String>(),
                "Failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(self.request(Method::GET, path)?).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(self.request(Method::POST, path)?.json(body)).await
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        let joined = format!("{base}/{}", path.trim_start_matches('/'));
        Url::parse(&joined).map_err(|e| ApiError::InvalidUrl(format!("{joined}: {e}")))
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the email is taken.
    #[instrument(skip_all, fields(email = %request.email))]
    pub async fn signup(&self, request: &SignupRequest<'_>) -> Result<AuthResponse, ApiError> {
        self.post("auth/signup", request).await
    }

    /// Exchange credentials for a token.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the credentials are rejected.
    #[instrument(skip_all, fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest<'_>) -> Result<AuthResponse, ApiError> {
        self.post("auth/login", request).await
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// List products matching a filter.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self, filter: &ProductFilter) -> Result<ProductList, ApiError> {
        self.send(self.request(Method::GET, "products")?.query(filter))
            .await
    }

    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the product does not exist.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        self.get(&format!("products/{id}")).await
    }

    /// Create a product (admin).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the input is rejected.
    #[instrument(skip_all, fields(name = %input.name))]
    pub async fn create_product(&self, input: &ProductInput) -> Result<ProductMutation, ApiError> {
        self.post("products", input).await
    }

    /// Update some fields of a product (admin).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the product does not exist.
    #[instrument(skip(self, update))]
    pub async fn update_product(
        &self,
        id: ProductId,
        update: &ProductUpdate,
    ) -> Result<ProductMutation, ApiError> {
        self.send(self.request(Method::PUT, &format!("products/{id}"))?.json(update))
            .await
    }

    /// Delete a product (admin).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the product does not exist.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<ProductMutation, ApiError> {
        self.send(self.request(Method::DELETE, &format!("products/{id}"))?)
            .await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Place an order.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the token is rejected or stock is
    /// insufficient.
    #[instrument(skip_all, fields(lines = request.items.len()))]
    pub async fn create_order(
        &self,
        request: &OrderRequest,
    ) -> Result<OrderConfirmation, ApiError> {
        self.post("orders", request).await
    }

    /// Order history for a user.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the token is rejected.
    #[instrument(skip(self))]
    pub async fn orders_for_user(&self, user_id: UserId) -> Result<OrderList, ApiError> {
        self.get(&format!("orders/user/{user_id}")).await
    }

    /// Fetch one order.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the token is rejected or the order
    /// does not exist.
    #[instrument(skip(self))]
    pub async fn get_order(&self, id: OrderId) -> Result<Order, ApiError> {
        self.get(&format!("orders/{id}")).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("session", &self.inner.session)
            .finish()
    }
}
