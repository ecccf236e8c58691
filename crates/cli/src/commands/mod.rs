//! Command implementations.
//!
//! Every command receives a [`Context`] holding the API client and the
//! session store. Results are printed to stdout; diagnostics go through
//! `tracing` to stderr.

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod products;

use qkart_storefront::{ApiClient, AppError, Session};

use crate::error::Result;
use crate::session_store::SessionStore;

/// Shared state for one CLI invocation.
pub struct Context {
    pub api: ApiClient,
    pub store: SessionStore,
}

impl Context {
    /// The stored session, or `AppError::NotLoggedIn`.
    pub async fn require_session(&self) -> Result<Session> {
        self.store
            .load()
            .await?
            .ok_or_else(|| AppError::NotLoggedIn.into())
    }
}

/// Format an amount of money the way the storefront shows it.
#[must_use]
pub fn money(amount: f64) -> String {
    format!("${amount:.2}")
}
