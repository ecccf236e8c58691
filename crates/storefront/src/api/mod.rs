//! QKart backend REST API client.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP with `reqwest`
//! - The backend is the source of truth for the catalog, carts and orders
//! - In-memory caching via `moka` for catalog listings (TTL from config)
//! - Authenticated calls take an explicit [`Session`]
//!
//! # Example
//!
//! ```rust,ignore
//! use qkart_storefront::api::ApiClient;
//!
//! let client = ApiClient::new(&config)?;
//!
//! let session = client.login("criodo", &password).await?;
//! let catalog = client.products().await?;
//! let cart = client.get_cart(&session).await?;
//! ```

mod cache;
mod conversions;
pub mod types;

use std::sync::Arc;

use moka::future::Cache;
use reqwest::{RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use qkart_core::{Address, AddressId, CartRecord, CatalogEntry, ProductId, Username};

use crate::config::ClientConfig;
use crate::session::Session;

use cache::{CacheKey, normalize_search};
use conversions::{convert_addresses, convert_cart, convert_products};
use types::{
    AddressDto, AddressRequest, CartItemDto, CartUpdateRequest, CheckoutRequest,
    CredentialsRequest, ErrorBody, LoginResponse, ProductDto, SuccessResponse,
};

/// Maximum number of response body characters kept in logs and errors.
const BODY_SNIPPET_LEN: usize = 200;

/// Errors that can occur when talking to the QKart backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection refused, timeout, TLS, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The backend refused the request and explained why.
    #[error("Request rejected ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Message from the backend.
        message: String,
    },

    /// The session token is missing, invalid or expired.
    #[error("Unauthorized")]
    Unauthorized,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend answered with a status this client does not handle.
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Start of the response body.
        body: String,
    },

    /// The configured endpoint cannot have paths appended to it.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl ApiError {
    /// Whether the failure lies with the transport or the backend rather
    /// than with the request.
    #[must_use]
    pub const fn is_server_side(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Parse(_) | Self::UnexpectedStatus { .. } | Self::InvalidEndpoint(_)
        )
    }
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the QKart backend API.
///
/// Cheap to clone; clones share the HTTP connection pool and the catalog
/// cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    endpoint: Url,
    cache: Cache<CacheKey, Arc<[CatalogEntry]>>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (e.g. the TLS
    /// backend fails to initialize).
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(100)
            .time_to_live(config.catalog_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                endpoint: config.endpoint.clone(),
                cache,
            }),
        })
    }

    /// Build the URL for a path below the configured endpoint.
    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.inner.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidEndpoint(self.inner.endpoint.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and decode a JSON response.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %snippet(&body),
                "Failed to parse QKart API response"
            );
            ApiError::Parse(e)
        })
    }

    // =========================================================================
    // Auth Methods
    // =========================================================================

    /// Log in and open a session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` with the backend's message for bad
    /// credentials, or another `ApiError` if the request fails.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<Session, ApiError> {
        let request = self
            .inner
            .client
            .post(self.url(&["auth", "login"])?)
            .json(&CredentialsRequest {
                username,
                password: password.expose_secret(),
            });

        let response: LoginResponse = self.send(request).await?;

        match response {
            LoginResponse {
                success: true,
                token: Some(token),
                username: Some(username),
                balance,
                ..
            } => Ok(Session::new(
                username,
                SecretString::from(token),
                balance.unwrap_or_default(),
            )),
            LoginResponse { message, .. } => Err(ApiError::Rejected {
                status: StatusCode::OK.as_u16(),
                message: message.unwrap_or_else(|| "Login failed".to_string()),
            }),
        }
    }

    /// Create a new account.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` if the backend refuses the registration
    /// (e.g. the username is taken).
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn register(&self, username: &Username, password: &SecretString) -> Result<(), ApiError> {
        let request = self
            .inner
            .client
            .post(self.url(&["auth", "register"])?)
            .json(&CredentialsRequest {
                username: username.as_str(),
                password: password.expose_secret(),
            });

        let response: SuccessResponse = self.send(request).await?;
        expect_success(response, "Registration failed")
    }

    // =========================================================================
    // Catalog Methods
    // =========================================================================

    /// Get the full product catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Arc<[CatalogEntry]>, ApiError> {
        if let Some(catalog) = self.inner.cache.get(&CacheKey::Catalog).await {
            debug!("Cache hit for catalog");
            return Ok(catalog);
        }

        let request = self.inner.client.get(self.url(&["products"])?);
        let products: Vec<ProductDto> = self.send(request).await?;
        let catalog: Arc<[CatalogEntry]> = convert_products(products).into();

        self.inner
            .cache
            .insert(CacheKey::Catalog, Arc::clone(&catalog))
            .await;

        Ok(catalog)
    }

    /// Search products by name or category.
    ///
    /// The backend answers 404 when nothing matches; that is returned as an
    /// empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(text = %text))]
    pub async fn search_products(&self, text: &str) -> Result<Arc<[CatalogEntry]>, ApiError> {
        let query = normalize_search(text);
        let key = CacheKey::Search(query.clone());
        if let Some(results) = self.inner.cache.get(&key).await {
            debug!("Cache hit for search");
            return Ok(results);
        }

        let mut url = self.url(&["products", "search"])?;
        url.query_pairs_mut().append_pair("value", &query);

        let results: Arc<[CatalogEntry]> =
            match self.send::<Vec<ProductDto>>(self.inner.client.get(url)).await {
                Ok(products) => convert_products(products).into(),
                Err(ApiError::NotFound(_)) => Arc::from(Vec::new()),
                Err(e) => return Err(e),
            };

        self.inner.cache.insert(key, Arc::clone(&results)).await;

        Ok(results)
    }

    // =========================================================================
    // Cart Methods
    // =========================================================================

    /// Get the user's persisted cart.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if the session is no longer valid.
    #[instrument(skip(self, session), fields(username = %session.username()))]
    pub async fn get_cart(&self, session: &Session) -> Result<Vec<CartRecord>, ApiError> {
        let request = self
            .inner
            .client
            .get(self.url(&["cart"])?)
            .bearer_auth(session.bearer_token());

        let items: Vec<CartItemDto> = self.send(request).await?;
        Ok(convert_cart(items))
    }

    /// Persist the quantity of one product. A quantity of zero removes it.
    ///
    /// Returns the full cart as stored by the backend afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the update or the request fails.
    #[instrument(skip(self, session), fields(username = %session.username(), product_id = %product_id))]
    pub async fn update_cart_item(
        &self,
        session: &Session,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<Vec<CartRecord>, ApiError> {
        let request = self
            .inner
            .client
            .post(self.url(&["cart"])?)
            .bearer_auth(session.bearer_token())
            .json(&CartUpdateRequest {
                product_id: product_id.as_str(),
                qty: quantity,
            });

        let items: Vec<CartItemDto> = self.send(request).await?;
        Ok(convert_cart(items))
    }

    /// Place an order for the current cart, shipped to `address_id`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` with the backend's message if the order
    /// cannot be placed (e.g. insufficient balance).
    #[instrument(skip(self, session), fields(username = %session.username(), address_id = %address_id))]
    pub async fn checkout(&self, session: &Session, address_id: &AddressId) -> Result<(), ApiError> {
        let request = self
            .inner
            .client
            .post(self.url(&["cart", "checkout"])?)
            .bearer_auth(session.bearer_token())
            .json(&CheckoutRequest {
                address_id: address_id.as_str(),
            });

        let response: SuccessResponse = self.send(request).await?;
        expect_success(response, "Checkout failed")
    }

    // =========================================================================
    // Address Methods
    // =========================================================================

    /// List the user's saved addresses.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, session), fields(username = %session.username()))]
    pub async fn addresses(&self, session: &Session) -> Result<Vec<Address>, ApiError> {
        let request = self
            .inner
            .client
            .get(self.url(&["user", "addresses"])?)
            .bearer_auth(session.bearer_token());

        let addresses: Vec<AddressDto> = self.send(request).await?;
        Ok(convert_addresses(addresses))
    }

    /// Save a new address. Returns the updated address list.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the address or the request fails.
    #[instrument(skip(self, session, address), fields(username = %session.username()))]
    pub async fn add_address(&self, session: &Session, address: &str) -> Result<Vec<Address>, ApiError> {
        let request = self
            .inner
            .client
            .post(self.url(&["user", "addresses"])?)
            .bearer_auth(session.bearer_token())
            .json(&AddressRequest { address });

        let addresses: Vec<AddressDto> = self.send(request).await?;
        Ok(convert_addresses(addresses))
    }

    /// Delete a saved address. Returns the updated address list.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the address does not exist.
    #[instrument(skip(self, session), fields(username = %session.username(), address_id = %address_id))]
    pub async fn delete_address(
        &self,
        session: &Session,
        address_id: &AddressId,
    ) -> Result<Vec<Address>, ApiError> {
        let request = self
            .inner
            .client
            .delete(self.url(&["user", "addresses", address_id.as_str()])?)
            .bearer_auth(session.bearer_token());

        let addresses: Vec<AddressDto> = self.send(request).await?;
        Ok(convert_addresses(addresses))
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Map a non-success response to an `ApiError`.
fn status_error(status: StatusCode, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| snippet(body));

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized,
        StatusCode::NOT_FOUND => ApiError::NotFound(message),
        s if s.is_client_error() => ApiError::Rejected {
            status: s.as_u16(),
            message,
        },
        s => {
            tracing::error!(
                status = %s,
                body = %snippet(body),
                "QKart API returned non-success status"
            );
            ApiError::UnexpectedStatus {
                status: s.as_u16(),
                body: snippet(body),
            }
        }
    }
}

/// Turn a `{ success: false }` body into `ApiError::Rejected`.
fn expect_success(response: SuccessResponse, fallback: &str) -> Result<(), ApiError> {
    if response.success {
        return Ok(());
    }
    Err(ApiError::Rejected {
        status: StatusCode::OK.as_u16(),
        message: response.message.unwrap_or_else(|| fallback.to_string()),
    })
}

fn snippet(body: &str) -> String {
    body.chars().take(BODY_SNIPPET_LEN).collect()
}
