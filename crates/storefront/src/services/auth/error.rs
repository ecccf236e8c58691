//! Authentication error types.

use thiserror::Error;

use crate::api::ApiError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username left blank on login.
    #[error("Username is a required field")]
    MissingUsername,

    /// Password left blank.
    #[error("Password is a required field")]
    MissingPassword,

    /// Username does not meet the registration rules.
    #[error("{0}")]
    InvalidUsername(#[from] qkart_core::UsernameError),

    /// Password too short.
    #[error("Password must be at least {min} characters")]
    WeakPassword {
        /// Minimum allowed length.
        min: usize,
    },

    /// Password and confirmation differ.
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// The backend refused the credentials or the registration.
    #[error("{0}")]
    Rejected(String),

    /// Backend API error.
    #[error("api error: {0}")]
    Api(ApiError),
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Rejected { message, .. } => Self::Rejected(message),
            other => Self::Api(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_becomes_message() {
        let err = AuthError::from(ApiError::Rejected {
            status: 400,
            message: "Username is already taken".to_string(),
        });
        assert!(matches!(err, AuthError::Rejected(ref m) if m == "Username is already taken"));
        assert_eq!(err.to_string(), "Username is already taken");
    }

    #[test]
    fn test_other_api_errors_are_wrapped() {
        let err = AuthError::from(ApiError::Unauthorized);
        assert!(matches!(err, AuthError::Api(ApiError::Unauthorized)));
    }
}
