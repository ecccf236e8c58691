//! Integration test support for QKart.
//!
//! [`FakeBackend`] serves the QKart REST API from memory on an ephemeral
//! port, so the storefront services can be exercised end to end without a
//! real backend.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p qkart-integration-tests
//! ```
//!
//! # Fixture
//!
//! The backend starts with the products in [`default_products`] (one of
//! which has an out-of-range rating that the client clamps) and a single
//! account, [`USERNAME`] / [`PASSWORD`], with a balance of
//! [`STARTING_BALANCE`].

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::Mutex;
use url::Url;

use qkart_storefront::{ApiClient, ApiError, ClientConfig};

/// Username of the seeded account.
pub const USERNAME: &str = "crio.do";
/// Password of the seeded account.
pub const PASSWORD: &str = "learnwithcrio";
/// Wallet balance of every new account.
pub const STARTING_BALANCE: f64 = 5000.0;

pub const ATOMIC_HABITS: &str = "BW0jAAeDJmlZCF8i";
pub const DUFFLE_BAG: &str = "KCRwjF7lN97HnEaY";
pub const RUNNING_SHOES: &str = "UPNoBSY7JbQBw4jq";
pub const BADMINTON_RACQUET: &str = "v4sLtEcMpzabRyfx";
/// Served with a rating above five stars.
pub const BROKEN_RATING: &str = "a4sLtEcMpzabRyfx";

/// A product as the backend stores it.
#[derive(Debug, Clone)]
pub struct ProductFixture {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub cost: f64,
    pub rating: i64,
}

impl ProductFixture {
    fn to_json(&self) -> Value {
        json!({
            "_id": self.id,
            "name": self.name,
            "category": self.category,
            "cost": self.cost,
            "rating": self.rating,
            "image": format!("https://images.qkart.test/{}.png", self.id),
        })
    }
}

/// Products the backend is seeded with.
#[must_use]
pub fn default_products() -> Vec<ProductFixture> {
    vec![
        ProductFixture {
            id: ATOMIC_HABITS,
            name: "Atomic Habits",
            category: "Books",
            cost: 40.0,
            rating: 5,
        },
        ProductFixture {
            id: DUFFLE_BAG,
            name: "Tan Leatherette Weekender Duffle",
            category: "Fashion",
            cost: 150.0,
            rating: 4,
        },
        ProductFixture {
            id: RUNNING_SHOES,
            name: "Running Shoes - Black",
            category: "Sports",
            cost: 75.0,
            rating: 3,
        },
        ProductFixture {
            id: BADMINTON_RACQUET,
            name: "YONEX Smash Badminton Racquet",
            category: "Sports",
            cost: 100.0,
            rating: 5,
        },
        ProductFixture {
            id: BROKEN_RATING,
            name: "Mystery Box",
            category: "Misc",
            cost: 10.0,
            rating: 9,
        },
    ]
}

// =============================================================================
// Backend state
// =============================================================================

#[derive(Debug, Clone)]
struct Account {
    password: String,
    balance: f64,
    cart: Vec<(String, i64)>,
    addresses: Vec<(String, String)>,
}

impl Account {
    fn new(password: &str) -> Self {
        Self {
            password: password.to_string(),
            balance: STARTING_BALANCE,
            cart: Vec::new(),
            addresses: Vec::new(),
        }
    }
}

struct BackendState {
    products: Vec<ProductFixture>,
    accounts: HashMap<String, Account>,
    tokens: HashMap<String, String>,
    next_id: usize,
}

impl BackendState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn product(&self, id: &str) -> Option<&ProductFixture> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Resolve the bearer token to the account it belongs to.
    fn authenticate(&mut self, headers: &HeaderMap) -> Option<&mut Account> {
        let token = headers
            .get(header::AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")?;
        let username = self.tokens.get(token)?;
        self.accounts.get_mut(username)
    }
}

struct Shared {
    state: Mutex<BackendState>,
    product_requests: AtomicUsize,
    search_requests: AtomicUsize,
    last_search: Mutex<Option<String>>,
}

type AppState = Arc<Shared>;

// =============================================================================
// FakeBackend
// =============================================================================

/// In-process QKart backend.
///
/// The server task runs until the test's runtime shuts down.
pub struct FakeBackend {
    endpoint: Url,
    shared: AppState,
}

impl FakeBackend {
    /// Start a backend with the default fixture.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn start() -> std::io::Result<Self> {
        Self::start_with_products(default_products()).await
    }

    /// Start a backend serving `products`.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn start_with_products(products: Vec<ProductFixture>) -> std::io::Result<Self> {
        let mut accounts = HashMap::new();
        accounts.insert(USERNAME.to_string(), Account::new(PASSWORD));

        let shared = Arc::new(Shared {
            state: Mutex::new(BackendState {
                products,
                accounts,
                tokens: HashMap::new(),
                next_id: 0,
            }),
            product_requests: AtomicUsize::new(0),
            search_requests: AtomicUsize::new(0),
            last_search: Mutex::new(None),
        });

        let api = Router::new()
            .route("/auth/register", post(register))
            .route("/auth/login", post(login))
            .route("/products", get(list_products))
            .route("/products/search", get(search_products))
            .route("/cart", get(get_cart).post(update_cart))
            .route("/cart/checkout", post(checkout))
            .route("/user/addresses", get(get_addresses).post(add_address))
            .route("/user/addresses/{id}", delete(delete_address))
            .with_state(Arc::clone(&shared));
        let app = Router::new().nest("/api/v1", api);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let endpoint = api_endpoint(addr)?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { endpoint, shared })
    }

    /// Base URL of the API, as `QKART_API_ENDPOINT` would hold it.
    #[must_use]
    pub fn endpoint(&self) -> Url {
        self.endpoint.clone()
    }

    /// Client configuration pointing at this backend.
    #[must_use]
    pub fn config(&self) -> ClientConfig {
        ClientConfig::with_endpoint(self.endpoint())
    }

    /// API client pointing at this backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn client(&self) -> Result<ApiClient, ApiError> {
        ApiClient::new(&self.config())
    }

    /// Number of `GET /products` requests served.
    #[must_use]
    pub fn product_requests(&self) -> usize {
        self.shared.product_requests.load(Ordering::SeqCst)
    }

    /// Number of `GET /products/search` requests served.
    #[must_use]
    pub fn search_requests(&self) -> usize {
        self.shared.search_requests.load(Ordering::SeqCst)
    }

    /// The `value` of the most recent search request.
    pub async fn last_search(&self) -> Option<String> {
        self.shared.last_search.lock().await.clone()
    }

    /// Replace a user's stored cart, bypassing validation.
    pub async fn set_cart(&self, username: &str, cart: &[(&str, i64)]) {
        let mut state = self.shared.state.lock().await;
        if let Some(account) = state.accounts.get_mut(username) {
            account.cart = cart.iter().map(|(id, qty)| ((*id).to_string(), *qty)).collect();
        }
    }

    /// A user's stored cart.
    pub async fn cart(&self, username: &str) -> Vec<(String, i64)> {
        let state = self.shared.state.lock().await;
        state
            .accounts
            .get(username)
            .map(|a| a.cart.clone())
            .unwrap_or_default()
    }

    /// A user's wallet balance.
    pub async fn balance(&self, username: &str) -> Option<f64> {
        let state = self.shared.state.lock().await;
        state.accounts.get(username).map(|a| a.balance)
    }

    /// Set a user's wallet balance.
    pub async fn set_balance(&self, username: &str, balance: f64) {
        let mut state = self.shared.state.lock().await;
        if let Some(account) = state.accounts.get_mut(username) {
            account.balance = balance;
        }
    }
}

fn api_endpoint(addr: SocketAddr) -> std::io::Result<Url> {
    Url::parse(&format!("http://{addr}/api/v1"))
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
}

// =============================================================================
// Handlers
// =============================================================================

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}

fn unauthorized() -> Response {
    failure(StatusCode::UNAUTHORIZED, "Please authenticate")
}

fn cart_json(cart: &[(String, i64)]) -> Value {
    cart.iter()
        .map(|(id, qty)| json!({ "productId": id, "qty": qty }))
        .collect()
}

fn addresses_json(addresses: &[(String, String)]) -> Value {
    addresses
        .iter()
        .map(|(id, address)| json!({ "_id": id, "address": address }))
        .collect()
}

#[derive(Deserialize)]
struct Credentials {
    username: String,
    password: String,
}

async fn register(State(shared): State<AppState>, Json(body): Json<Credentials>) -> Response {
    let mut state = shared.state.lock().await;
    if state.accounts.contains_key(&body.username) {
        return failure(StatusCode::BAD_REQUEST, "Username is already taken");
    }
    state
        .accounts
        .insert(body.username, Account::new(&body.password));
    (StatusCode::CREATED, Json(json!({ "success": true }))).into_response()
}

async fn login(State(shared): State<AppState>, Json(body): Json<Credentials>) -> Response {
    let mut state = shared.state.lock().await;
    let balance = match state.accounts.get(&body.username) {
        None => return failure(StatusCode::BAD_REQUEST, "Username does not exist"),
        Some(account) if account.password != body.password => {
            return failure(StatusCode::BAD_REQUEST, "Password is incorrect");
        }
        Some(account) => account.balance,
    };

    let token = state.next_id("token");
    state.tokens.insert(token.clone(), body.username.clone());

    (
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "token": token,
            "username": body.username,
            "balance": balance,
        })),
    )
        .into_response()
}

async fn list_products(State(shared): State<AppState>) -> Response {
    shared.product_requests.fetch_add(1, Ordering::SeqCst);
    let state = shared.state.lock().await;
    let products: Value = state.products.iter().map(ProductFixture::to_json).collect();
    Json(products).into_response()
}

#[derive(Deserialize)]
struct SearchQuery {
    value: String,
}

async fn search_products(State(shared): State<AppState>, Query(query): Query<SearchQuery>) -> Response {
    shared.search_requests.fetch_add(1, Ordering::SeqCst);
    let needle = query.value.to_lowercase();
    *shared.last_search.lock().await = Some(query.value);
    let state = shared.state.lock().await;
    let matches: Vec<Value> = state
        .products
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle) || p.category.to_lowercase().contains(&needle)
        })
        .map(ProductFixture::to_json)
        .collect();

    if matches.is_empty() {
        return (StatusCode::NOT_FOUND, Json(json!([]))).into_response();
    }
    Json(matches).into_response()
}

async fn get_cart(State(shared): State<AppState>, headers: HeaderMap) -> Response {
    let mut state = shared.state.lock().await;
    let Some(account) = state.authenticate(&headers) else {
        return unauthorized();
    };
    Json(cart_json(&account.cart)).into_response()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartUpdate {
    product_id: String,
    qty: i64,
}

async fn update_cart(
    State(shared): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CartUpdate>,
) -> Response {
    let mut state = shared.state.lock().await;
    let known = state.product(&body.product_id).is_some();
    let Some(account) = state.authenticate(&headers) else {
        return unauthorized();
    };
    if !known {
        return failure(StatusCode::BAD_REQUEST, "Product doesn't exist");
    }

    if body.qty <= 0 {
        account.cart.retain(|(id, _)| *id != body.product_id);
    } else if let Some(entry) = account.cart.iter_mut().find(|(id, _)| *id == body.product_id) {
        entry.1 = body.qty;
    } else {
        account.cart.push((body.product_id, body.qty));
    }

    Json(cart_json(&account.cart)).into_response()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutBody {
    address_id: String,
}

async fn checkout(
    State(shared): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CheckoutBody>,
) -> Response {
    let mut state = shared.state.lock().await;
    let costs: HashMap<String, f64> = state
        .products
        .iter()
        .map(|p| (p.id.to_string(), p.cost))
        .collect();
    let Some(account) = state.authenticate(&headers) else {
        return unauthorized();
    };

    if account.cart.is_empty() {
        return failure(StatusCode::BAD_REQUEST, "Cart is empty");
    }
    if !account.addresses.iter().any(|(id, _)| *id == body.address_id) {
        return failure(StatusCode::BAD_REQUEST, "Bad address specified");
    }

    #[allow(clippy::cast_precision_loss)]
    let total: f64 = account
        .cart
        .iter()
        .filter_map(|(id, qty)| costs.get(id).map(|cost| cost * *qty as f64))
        .sum();
    if total > account.balance {
        return failure(
            StatusCode::BAD_REQUEST,
            "Wallet balance not sufficient to place order",
        );
    }

    account.balance -= total;
    account.cart.clear();
    Json(json!({ "success": true })).into_response()
}

async fn get_addresses(State(shared): State<AppState>, headers: HeaderMap) -> Response {
    let mut state = shared.state.lock().await;
    let Some(account) = state.authenticate(&headers) else {
        return unauthorized();
    };
    Json(addresses_json(&account.addresses)).into_response()
}

#[derive(Deserialize)]
struct AddressBody {
    address: String,
}

async fn add_address(
    State(shared): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<AddressBody>,
) -> Response {
    let mut state = shared.state.lock().await;
    let id = state.next_id("address");
    let Some(account) = state.authenticate(&headers) else {
        return unauthorized();
    };
    if body.address.chars().count() < 20 {
        return failure(
            StatusCode::BAD_REQUEST,
            "Address should be greater than 20 characters",
        );
    }
    account.addresses.push((id, body.address));
    Json(addresses_json(&account.addresses)).into_response()
}

async fn delete_address(
    State(shared): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let mut state = shared.state.lock().await;
    let Some(account) = state.authenticate(&headers) else {
        return unauthorized();
    };
    let before = account.addresses.len();
    account.addresses.retain(|(address_id, _)| *address_id != id);
    if account.addresses.len() == before {
        return failure(StatusCode::NOT_FOUND, "Address to delete was not found");
    }
    Json(addresses_json(&account.addresses)).into_response()
}
