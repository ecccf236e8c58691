//! QKart Storefront library.
//!
//! Client-side storefront logic on top of the QKart REST backend: the API
//! client, the session context, and the services the CLI drives.
//!
//! # Architecture
//!
//! - `api` - `reqwest` client for the backend, with a `moka` catalog cache
//! - `services` - Auth, catalog, cart and checkout workflows
//! - `session` - Explicit logged-in user context
//! - Cart reconciliation itself lives in `qkart_core`

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod session;

pub use api::{ApiClient, ApiError};
pub use config::{ClientConfig, ConfigError};
pub use error::AppError;
pub use session::Session;
