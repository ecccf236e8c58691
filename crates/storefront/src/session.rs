//! Authenticated session context.
//!
//! A [`Session`] is created by a successful login and passed explicitly to
//! every call that needs the user's identity. Nothing in this crate reads
//! the logged-in user from global state.

use secrecy::{ExposeSecret, SecretString};

/// The logged-in user's identity, API token and wallet balance.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct Session {
    username: String,
    token: SecretString,
    balance: f64,
}

impl Session {
    /// Create a session from the values returned by the login endpoint.
    #[must_use]
    pub const fn new(username: String, token: SecretString, balance: f64) -> Self {
        Self {
            username,
            token,
            balance,
        }
    }

    /// Username the session belongs to.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// API token used to authenticate backend requests.
    #[must_use]
    pub const fn token(&self) -> &SecretString {
        &self.token
    }

    /// Wallet balance as last reported by the backend.
    #[must_use]
    pub const fn balance(&self) -> f64 {
        self.balance
    }

    /// The same session with an updated wallet balance.
    #[must_use]
    pub fn with_balance(self, balance: f64) -> Self {
        Self { balance, ..self }
    }

    pub(crate) fn bearer_token(&self) -> &str {
        self.token.expose_secret()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username)
            .field("token", &"[REDACTED]")
            .field("balance", &self.balance)
            .finish()
    }
}
