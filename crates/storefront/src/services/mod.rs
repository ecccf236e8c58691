//! Business logic services for the storefront.
//!
//! Each service borrows a shared [`ApiClient`](crate::api::ApiClient) and
//! takes the caller's [`Session`](crate::session::Session) explicitly.
//!
//! # Services
//!
//! - `auth` - Login, registration and logout
//! - `catalog` - Product listing and search
//! - `cart` - Cart reconciliation and quantity changes
//! - `checkout` - Order summary, shipping addresses and placing orders

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;

pub use auth::{AuthError, AuthService};
pub use cart::{CartService, CartView};
pub use catalog::CatalogService;
pub use checkout::{CheckoutError, CheckoutService, PlacedOrder};
