//! Authentication service.
//!
//! Validates login and registration input before it reaches the backend,
//! and turns a successful login into a [`Session`].

mod error;

pub use error::AuthError;

use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument};

use qkart_core::Username;

use crate::api::ApiClient;
use crate::error::{add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::session::Session;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Authentication service.
///
/// Handles user registration, login and logout.
pub struct AuthService<'a> {
    api: &'a ApiClient,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` if the username breaks the rules.
    /// Returns `AuthError::WeakPassword` or `AuthError::PasswordMismatch` for bad passwords.
    /// Returns `AuthError::Rejected` if the backend refuses (e.g. the username is taken).
    #[instrument(skip(self, password, confirm_password))]
    pub async fn register(
        &self,
        username: &str,
        password: &SecretString,
        confirm_password: &SecretString,
    ) -> Result<Username, AuthError> {
        let username = validate_registration(username, password, confirm_password)?;

        self.api.register(&username, password).await?;

        add_breadcrumb("auth", "Registered", Some(&[("username", username.as_str())]));
        info!(username = %username, "Registered successfully");
        Ok(username)
    }

    /// Log in with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingUsername` / `AuthError::MissingPassword` for blank input.
    /// Returns `AuthError::Rejected` with the backend's message for bad credentials.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<Session, AuthError> {
        validate_login(username, password)?;

        let session = self.api.login(username, password).await?;

        set_sentry_user(session.username());
        add_breadcrumb("auth", "Logged in", Some(&[("username", session.username())]));
        info!(username = %session.username(), "Logged in successfully");
        Ok(session)
    }

    /// End a session.
    ///
    /// The backend keeps no server-side session state, so this only forgets
    /// the user locally.
    pub fn logout(session: Session) {
        add_breadcrumb("auth", "Logged out", Some(&[("username", session.username())]));
        clear_sentry_user();
        info!(username = %session.username(), "Logged out");
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Check login form input before calling the backend.
fn validate_login(username: &str, password: &SecretString) -> Result<(), AuthError> {
    if username.is_empty() {
        return Err(AuthError::MissingUsername);
    }
    if password.expose_secret().is_empty() {
        return Err(AuthError::MissingPassword);
    }
    Ok(())
}

/// Check registration form input before calling the backend.
fn validate_registration(
    username: &str,
    password: &SecretString,
    confirm_password: &SecretString,
) -> Result<Username, AuthError> {
    let username = Username::parse(username)?;
    validate_password(password.expose_secret())?;

    if password.expose_secret() != confirm_password.expose_secret() {
        return Err(AuthError::PasswordMismatch);
    }

    Ok(username)
}

/// Validate password requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.is_empty() {
        return Err(AuthError::MissingPassword);
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword {
            min: MIN_PASSWORD_LENGTH,
        });
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use qkart_core::UsernameError;

    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::from(s)
    }

    #[test]
    fn test_validate_login_requires_username() {
        let err = validate_login("", &secret("learnwithcrio")).unwrap_err();
        assert!(matches!(err, AuthError::MissingUsername));
        assert_eq!(err.to_string(), "Username is a required field");
    }

    #[test]
    fn test_validate_login_requires_password() {
        let err = validate_login("criodo", &secret("")).unwrap_err();
        assert!(matches!(err, AuthError::MissingPassword));
        assert_eq!(err.to_string(), "Password is a required field");
    }

    #[test]
    fn test_validate_login_accepts_short_values() {
        // Login only checks presence; length rules apply to registration
        assert!(validate_login("abc", &secret("x")).is_ok());
    }

    #[test]
    fn test_validate_registration_ok() {
        let username =
            validate_registration("criodo", &secret("learnwithcrio"), &secret("learnwithcrio"))
                .unwrap();
        assert_eq!(username.as_str(), "criodo");
    }

    #[test]
    fn test_validate_registration_short_username() {
        let err = validate_registration("crio", &secret("learnwithcrio"), &secret("learnwithcrio"))
            .unwrap_err();
        assert!(matches!(
            err,
            AuthError::InvalidUsername(UsernameError::TooShort { min: 6 })
        ));
        assert_eq!(err.to_string(), "Username must be at least 6 characters");
    }

    #[test]
    fn test_validate_registration_short_password() {
        let err = validate_registration("criodo", &secret("abc"), &secret("abc")).unwrap_err();
        assert!(matches!(err, AuthError::WeakPassword { min: 6 }));
        assert_eq!(err.to_string(), "Password must be at least 6 characters");
    }

    #[test]
    fn test_validate_registration_empty_password() {
        let err = validate_registration("criodo", &secret(""), &secret("")).unwrap_err();
        assert!(matches!(err, AuthError::MissingPassword));
    }

    #[test]
    fn test_validate_registration_mismatch() {
        let err = validate_registration("criodo", &secret("learnwithcrio"), &secret("learnwithcrio!"))
            .unwrap_err();
        assert!(matches!(err, AuthError::PasswordMismatch));
    }
}
