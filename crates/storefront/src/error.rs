//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for every storefront service. Callers
//! show [`AppError::user_message`] to the user and call
//! [`AppError::capture`] so failures on the backend's side reach Sentry.

use thiserror::Error;

use qkart_core::CartError;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::services::auth::AuthError;
use crate::services::checkout::CheckoutError;

/// Message shown when the backend cannot be reached or misbehaves.
pub const BACKEND_UNAVAILABLE_MESSAGE: &str =
    "Something went wrong. Check that the backend is running, reachable and returns valid JSON.";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend API operation failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Cart change could not be applied.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Order could not be placed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Configuration is missing or invalid.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The operation needs a logged-in user.
    #[error("Not logged in")]
    NotLoggedIn,
}

impl AppError {
    /// Whether the error originates outside the user's control.
    #[must_use]
    pub const fn is_server_side(&self) -> bool {
        match self {
            Self::Api(err) => err.is_server_side(),
            Self::Auth(AuthError::Api(err)) => err.is_server_side(),
            _ => false,
        }
    }

    /// Report server-side errors to Sentry and the log.
    pub fn capture(&self) {
        if self.is_server_side() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }
    }

    /// Text suitable for showing to the user.
    ///
    /// Internal details of transport failures are not exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) | Self::Auth(AuthError::Api(err)) => api_message(err),
            Self::Cart(CartError::UnknownProduct(_)) => {
                "This product is no longer available.".to_string()
            }
            Self::Cart(err) => err.to_string(),
            Self::Auth(err) => err.to_string(),
            Self::Checkout(err) => err.to_string(),
            Self::Config(err) => err.to_string(),
            Self::NotLoggedIn => "Login to add an item to the Cart".to_string(),
        }
    }
}

fn api_message(err: &ApiError) -> String {
    match err {
        ApiError::Rejected { message, .. } | ApiError::NotFound(message) => message.clone(),
        ApiError::Unauthorized => "Your session has expired. Please log in again.".to_string(),
        _ => BACKEND_UNAVAILABLE_MESSAGE.to_string(),
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context.
///
/// Call this after a successful login to associate errors with users.
pub fn set_sentry_user(username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            username: Some(username.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Changed quantity", Some(&[("product_id", "BW0jAAeDJmlZCF8i")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use qkart_core::ProductId;

    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotLoggedIn;
        assert_eq!(err.to_string(), "Not logged in");

        let err = AppError::Api(ApiError::NotFound("no such address".to_string()));
        assert_eq!(err.to_string(), "API error: Not found: no such address");
    }

    #[test]
    fn test_user_message_hides_transport_details() {
        let err = AppError::Api(ApiError::UnexpectedStatus {
            status: 500,
            body: "stack trace".to_string(),
        });
        assert_eq!(err.user_message(), BACKEND_UNAVAILABLE_MESSAGE);
        assert!(err.is_server_side());
    }

    #[test]
    fn test_user_message_passes_backend_rejection() {
        let err = AppError::Api(ApiError::Rejected {
            status: 400,
            message: "Password is incorrect".to_string(),
        });
        assert_eq!(err.user_message(), "Password is incorrect");
        assert!(!err.is_server_side());
    }

    #[test]
    fn test_user_message_for_auth_api_error() {
        let err = AppError::Auth(AuthError::Api(ApiError::UnexpectedStatus {
            status: 503,
            body: String::new(),
        }));
        assert_eq!(err.user_message(), BACKEND_UNAVAILABLE_MESSAGE);
        assert!(err.is_server_side());
    }

    #[test]
    fn test_user_message_variants() {
        assert_eq!(
            AppError::NotLoggedIn.user_message(),
            "Login to add an item to the Cart"
        );
        assert_eq!(
            AppError::Cart(CartError::UnknownProduct(ProductId::new("p9"))).user_message(),
            "This product is no longer available."
        );
        assert_eq!(
            AppError::Auth(AuthError::PasswordMismatch).user_message(),
            "Passwords do not match"
        );
        assert_eq!(
            AppError::Api(ApiError::Unauthorized).user_message(),
            "Your session has expired. Please log in again."
        );
    }
}
