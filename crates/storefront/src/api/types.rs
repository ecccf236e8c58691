//! Wire types of the QKart backend REST API.
//!
//! These mirror the JSON the backend sends and accepts. They are converted
//! into `qkart_core` types in [`super::conversions`] before leaving the
//! `api` module.

use serde::{Deserialize, Serialize};

/// A product as returned by `GET /products`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub category: String,
    pub cost: f64,
    pub rating: i64,
    pub image: String,
}

/// One entry of the persisted cart.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemDto {
    pub product_id: String,
    pub qty: i64,
}

/// Body of `POST /cart`. A `qty` of zero removes the product.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartUpdateRequest<'a> {
    pub product_id: &'a str,
    pub qty: u32,
}

/// Body of `POST /auth/login` and `POST /auth/register`.
#[derive(Serialize)]
pub struct CredentialsRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Response of `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: Option<String>,
    pub username: Option<String>,
    pub balance: Option<f64>,
    pub message: Option<String>,
}

/// Generic `{ success, message }` response.
#[derive(Debug, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: Option<String>,
}

/// Error body sent with 4xx responses.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub message: Option<String>,
}

/// A saved address.
#[derive(Debug, Clone, Deserialize)]
pub struct AddressDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub address: String,
}

/// Body of `POST /user/addresses`.
#[derive(Debug, Serialize)]
pub struct AddressRequest<'a> {
    pub address: &'a str,
}

/// Body of `POST /cart/checkout`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest<'a> {
    pub address_id: &'a str,
}
