//! CLI error type.

use thiserror::Error;

use qkart_storefront::AppError;

use crate::session_store::SessionStoreError;

/// Errors a command can fail with.
#[derive(Debug, Error)]
pub enum CliError {
    /// A storefront operation failed.
    #[error(transparent)]
    App(#[from] AppError),

    /// The session file could not be read or written.
    #[error(transparent)]
    SessionStore(#[from] SessionStoreError),
}

impl CliError {
    /// Report the error to Sentry when it is not the user's fault.
    pub fn capture(&self) {
        if let Self::App(err) = self {
            err.capture();
        }
    }

    /// Text suitable for showing to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::App(err) => err.user_message(),
            Self::SessionStore(err) => err.to_string(),
        }
    }
}

impl From<qkart_storefront::services::AuthError> for CliError {
    fn from(err: qkart_storefront::services::AuthError) -> Self {
        Self::App(err.into())
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
