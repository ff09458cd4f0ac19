//! Integration tests for the EliteCart client.
//!
//! The tests drive the real client library against [`MockBackend`], an
//! in-process axum server on an ephemeral port that speaks the same REST
//! surface as the EliteCart backend and records what it was sent.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p elitecart-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    Json, Router,
    extract::{Path, Query, Request, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use elitecart_client::{ClientConfig, MemoryStorage, Storefront};

/// A request as the mock backend saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
}

#[derive(Debug, Clone)]
struct Account {
    user_id: i32,
    name: String,
    email: String,
    password: String,
}

#[derive(Debug, Default)]
struct Backend {
    accounts: Vec<Account>,
    products: Vec<Value>,
    orders: Vec<Value>,
    requests: Vec<RecordedRequest>,
    next_product_id: i64,
    next_order_id: i64,
    next_order_item_id: i64,
}

#[derive(Clone, Default)]
struct MockState {
    inner: Arc<Mutex<Backend>>,
}

impl MockState {
    fn lock(&self) -> MutexGuard<'_, Backend> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// In-process stand-in for the EliteCart REST backend.
///
/// Tokens are `token-<user_id>`; anything else is rejected with 422 the way
/// an invalid JWT is.
pub struct MockBackend {
    addr: SocketAddr,
    state: MockState,
    task: JoinHandle<()>,
}

impl MockBackend {
    /// Start a backend seeded with a small catalog and one account,
    /// `jane@example.com` / `secret123` (user 1).
    pub async fn start() -> Self {
        let state = MockState::default();
        {
            let mut backend = state.lock();
            backend.accounts.push(Account {
                user_id: 1,
                name: "Jane Doe".to_string(),
                email: "jane@example.com".to_string(),
                password: "secret123".to_string(),
            });
            backend.products = seed_products();
            backend.next_product_id = 4;
            backend.next_order_id = 1;
            backend.next_order_item_id = 1;
        }

        let app = Router::new()
            .route("/api/auth/signup", post(signup))
            .route("/api/auth/login", post(login))
            .route("/api/products", get(list_products).post(create_product))
            .route(
                "/api/products/{id}",
                get(get_product).put(update_product).delete(delete_product),
            )
            .route("/api/orders", post(create_order))
            .route("/api/orders/user/{id}", get(orders_for_user))
            .route("/api/orders/{id}", get(get_order))
            .layer(middleware::from_fn_with_state(state.clone(), record))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Mock backend has no address");
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state, task }
    }

    /// Base URL to configure the client with.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// A storefront pointed at this backend, with in-memory storage.
    #[must_use]
    pub fn storefront(&self, storage: &MemoryStorage) -> Storefront {
        Storefront::with_storage(self.config(), Arc::new(storage.clone()))
            .expect("Failed to build storefront")
    }

    /// Client configuration pointed at this backend.
    #[must_use]
    pub fn config(&self) -> ClientConfig {
        let base_url = self.base_url();
        ClientConfig::from_lookup(|key| (key == "ELITECART_API_URL").then(|| base_url.clone()))
            .expect("Invalid mock backend config")
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().requests.clone()
    }

    /// Requests whose path is exactly `path`.
    #[must_use]
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    /// Current stock of a product.
    #[must_use]
    pub fn stock_of(&self, product_id: i64) -> Option<i64> {
        self.state
            .lock()
            .products
            .iter()
            .find(|p| p["product_id"] == product_id)
            .and_then(|p| p["stock"].as_i64())
    }

    /// Number of orders placed.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.state.lock().orders.len()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn seed_products() -> Vec<Value> {
    vec![
        json!({
            "product_id": 1,
            "name": "Classic Oxford Shirt",
            "description": "Crisp cotton oxford.",
            "price": 49.99,
            "image_url": "https://img.example.com/1.jpg",
            "stock": 12,
            "category": "Men",
            "created_at": "2025-01-10T09:00:00"
        }),
        json!({
            "product_id": 2,
            "name": "Silk Scarf",
            "description": "Hand-rolled edges.",
            "price": 29.5,
            "image_url": "https://img.example.com/2.jpg",
            "stock": 3,
            "category": "Women",
            "created_at": "2025-01-11T09:00:00"
        }),
        json!({
            "product_id": 3,
            "name": "Canvas Tote",
            "description": "Sold out until spring.",
            "price": 19.0,
            "image_url": "https://img.example.com/3.jpg",
            "stock": 0,
            "category": "Unisex",
            "created_at": "2025-01-12T09:00:00"
        }),
    ]
}

// =============================================================================
// Middleware and helpers
// =============================================================================

async fn record(State(state): State<MockState>, request: Request, next: Next) -> Response {
    let recorded = RecordedRequest {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        query: request.uri().query().map(str::to_owned),
        authorization: request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
    };
    state.lock().requests.push(recorded);
    next.run(request).await
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Resolve the bearer token to a user id, answering the way a JWT guard does.
fn authenticate(headers: &HeaderMap) -> Result<i32, Response> {
    let Some(value) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) else {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "msg": "Missing Authorization Header" })),
        )
            .into_response());
    };
    value
        .strip_prefix("Bearer token-")
        .and_then(|id| id.parse::<i32>().ok())
        .ok_or_else(|| {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "msg": "Signature verification failed" })),
            )
                .into_response()
        })
}

fn price_of(product: &Value) -> f64 {
    product["price"].as_f64().unwrap_or_default()
}

// =============================================================================
// Auth
// =============================================================================

#[derive(Deserialize)]
struct SignupBody {
    name: String,
    email: String,
    password: String,
}

async fn signup(State(state): State<MockState>, Json(body): Json<SignupBody>) -> Response {
    let mut backend = state.lock();
    if backend.accounts.iter().any(|a| a.email == body.email) {
        return error(StatusCode::BAD_REQUEST, "Email already exists");
    }
    let user_id = i32::try_from(backend.accounts.len()).unwrap_or(i32::MAX) + 1;
    backend.accounts.push(Account {
        user_id,
        name: body.name,
        email: body.email.clone(),
        password: body.password,
    });
    (
        StatusCode::CREATED,
        Json(json!({
            "message": "User created successfully",
            "user_id": user_id,
            "email": body.email,
            "access_token": format!("token-{user_id}")
        })),
    )
        .into_response()
}

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

async fn login(State(state): State<MockState>, Json(body): Json<LoginBody>) -> Response {
    let backend = state.lock();
    match backend
        .accounts
        .iter()
        .find(|a| a.email == body.email && a.password == body.password)
    {
        Some(account) => Json(json!({
            "message": "Login successful",
            "user_id": account.user_id,
            "name": account.name,
            "email": account.email,
            "access_token": format!("token-{}", account.user_id)
        }))
        .into_response(),
        None => error(StatusCode::UNAUTHORIZED, "Invalid email or password"),
    }
}

// =============================================================================
// Products
// =============================================================================

#[derive(Deserialize)]
struct ProductQuery {
    category: Option<String>,
    min_price: Option<f64>,
    max_price: Option<f64>,
    in_stock: Option<String>,
    limit: Option<usize>,
}

async fn list_products(
    State(state): State<MockState>,
    Query(query): Query<ProductQuery>,
) -> Response {
    let backend = state.lock();
    let products: Vec<Value> = backend
        .products
        .iter()
        .filter(|p| {
            query
                .category
                .as_ref()
                .is_none_or(|c| p["category"].as_str() == Some(c.as_str()))
        })
        .filter(|p| query.min_price.is_none_or(|min| price_of(p) >= min))
        .filter(|p| query.max_price.is_none_or(|max| price_of(p) <= max))
        .filter(|p| query.in_stock.is_none() || p["stock"].as_i64().unwrap_or_default() > 0)
        .take(query.limit.unwrap_or(usize::MAX))
        .cloned()
        .collect();
    let count = products.len();
    Json(json!({ "products": products, "count": count })).into_response()
}

async fn get_product(State(state): State<MockState>, Path(id): Path<i64>) -> Response {
    let backend = state.lock();
    backend
        .products
        .iter()
        .find(|p| p["product_id"] == id)
        .map_or_else(
            || error(StatusCode::NOT_FOUND, "Product not found"),
            |p| Json(p.clone()).into_response(),
        )
}

async fn create_product(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    if let Err(response) = authenticate(&headers) {
        return response;
    }
    for field in ["name", "price", "stock", "category"] {
        if body.get(field).is_none() {
            return error(StatusCode::BAD_REQUEST, &format!("Missing field: {field}"));
        }
    }
    let mut backend = state.lock();
    let product_id = backend.next_product_id;
    backend.next_product_id += 1;
    body["product_id"] = json!(product_id);
    backend.products.push(body);
    (
        StatusCode::CREATED,
        Json(json!({ "message": "Product created successfully", "product_id": product_id })),
    )
        .into_response()
}

async fn update_product(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(response) = authenticate(&headers) {
        return response;
    }
    let mut backend = state.lock();
    let Some(product) = backend.products.iter_mut().find(|p| p["product_id"] == id) else {
        return error(StatusCode::NOT_FOUND, "Product not found");
    };
    if let (Some(target), Some(changes)) = (product.as_object_mut(), body.as_object()) {
        for (key, value) in changes {
            target.insert(key.clone(), value.clone());
        }
    }
    Json(json!({ "message": "Product updated successfully" })).into_response()
}

async fn delete_product(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if let Err(response) = authenticate(&headers) {
        return response;
    }
    let mut backend = state.lock();
    let before = backend.products.len();
    backend.products.retain(|p| p["product_id"] != id);
    if backend.products.len() == before {
        return error(StatusCode::NOT_FOUND, "Product not found");
    }
    Json(json!({ "message": "Product deleted successfully" })).into_response()
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Deserialize)]
struct OrderBody {
    #[serde(default)]
    items: Vec<OrderLine>,
}

#[derive(Deserialize)]
struct OrderLine {
    product_id: i64,
    quantity: i64,
}

async fn create_order(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<OrderBody>,
) -> Response {
    let user_id = match authenticate(&headers) {
        Ok(id) => id,
        Err(response) => return response,
    };
    if body.items.is_empty() {
        return error(StatusCode::BAD_REQUEST, "No items in order");
    }

    let mut backend = state.lock();

    // Validate everything before touching stock
    let mut prices = HashMap::new();
    for line in &body.items {
        if line.quantity <= 0 {
            return error(StatusCode::BAD_REQUEST, "Invalid item data");
        }
        let Some(product) = backend
            .products
            .iter()
            .find(|p| p["product_id"] == line.product_id)
        else {
            return error(
                StatusCode::NOT_FOUND,
                &format!("Product {} not found", line.product_id),
            );
        };
        if product["stock"].as_i64().unwrap_or_default() < line.quantity {
            return error(
                StatusCode::BAD_REQUEST,
                &format!("Insufficient stock for product {}", line.product_id),
            );
        }
        prices.insert(line.product_id, price_of(product));
    }

    let order_id = backend.next_order_id;
    backend.next_order_id += 1;
    let mut items = Vec::new();
    let mut total = 0.0;
    for line in &body.items {
        let price = prices.get(&line.product_id).copied().unwrap_or_default();
        total += price * f64::from(i32::try_from(line.quantity).unwrap_or(i32::MAX));
        if let Some(product) = backend
            .products
            .iter_mut()
            .find(|p| p["product_id"] == line.product_id)
        {
            let stock = product["stock"].as_i64().unwrap_or_default();
            product["stock"] = json!(stock - line.quantity);
        }
        let order_item_id = backend.next_order_item_id;
        backend.next_order_item_id += 1;
        items.push(json!({
            "order_item_id": order_item_id,
            "product_id": line.product_id,
            "quantity": line.quantity,
            "price": price
        }));
    }
    let total = (total * 100.0).round() / 100.0;
    let items_count = items.len();
    backend.orders.push(json!({
        "order_id": order_id,
        "user_id": user_id,
        "created_at": "Tue, 14 Jan 2025 10:30:00 GMT",
        "total_amount": total,
        "items": items
    }));

    (
        StatusCode::CREATED,
        Json(json!({
            "message": "Order created successfully",
            "order_id": order_id,
            "total_amount": total,
            "items_count": items_count
        })),
    )
        .into_response()
}

async fn orders_for_user(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Response {
    let user_id = match authenticate(&headers) {
        Ok(id) => id,
        Err(response) => return response,
    };
    if user_id != id {
        return error(StatusCode::FORBIDDEN, "Unauthorized");
    }
    let backend = state.lock();
    let orders: Vec<Value> = backend
        .orders
        .iter()
        .filter(|o| o["user_id"] == id)
        .cloned()
        .collect();
    let count = orders.len();
    Json(json!({ "orders": orders, "count": count })).into_response()
}

async fn get_order(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    let user_id = match authenticate(&headers) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let backend = state.lock();
    let Some(order) = backend.orders.iter().find(|o| o["order_id"] == id) else {
        return error(StatusCode::NOT_FOUND, "Order not found");
    };
    if order["user_id"] != user_id {
        return error(StatusCode::FORBIDDEN, "Unauthorized");
    }
    Json(order.clone()).into_response()
}
