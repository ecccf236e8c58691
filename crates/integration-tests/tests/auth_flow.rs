//! Login, registration and session expiry against the fake backend.
//!
//! Run with: cargo test -p qkart-integration-tests

use secrecy::SecretString;

use qkart_integration_tests::{FakeBackend, PASSWORD, STARTING_BALANCE, USERNAME};
use qkart_storefront::error::AppError;
use qkart_storefront::services::{AuthError, AuthService, CartService};
use qkart_storefront::{ApiError, Session};

fn secret(s: &str) -> SecretString {
    SecretString::from(s)
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_opens_session() {
    let backend = FakeBackend::start().await.expect("start backend");
    let api = backend.client().expect("build client");

    let session = AuthService::new(&api)
        .login(USERNAME, &secret(PASSWORD))
        .await
        .expect("login");

    assert_eq!(session.username(), USERNAME);
    assert!((session.balance() - STARTING_BALANCE).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let backend = FakeBackend::start().await.expect("start backend");
    let api = backend.client().expect("build client");

    let err = AuthService::new(&api)
        .login(USERNAME, &secret("not-the-password"))
        .await
        .expect_err("login should fail");

    assert!(matches!(err, AuthError::Rejected(ref m) if m == "Password is incorrect"));
    assert_eq!(AppError::from(err).user_message(), "Password is incorrect");
}

#[tokio::test]
async fn test_login_unknown_user() {
    let backend = FakeBackend::start().await.expect("start backend");
    let api = backend.client().expect("build client");

    let err = AuthService::new(&api)
        .login("nobody-here", &secret(PASSWORD))
        .await
        .expect_err("login should fail");

    assert!(matches!(err, AuthError::Rejected(ref m) if m == "Username does not exist"));
}

#[tokio::test]
async fn test_login_blank_password_is_not_sent() {
    let backend = FakeBackend::start().await.expect("start backend");
    let api = backend.client().expect("build client");

    let err = AuthService::new(&api)
        .login(USERNAME, &secret(""))
        .await
        .expect_err("login should fail");

    assert!(matches!(err, AuthError::MissingPassword));
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_register_then_login() {
    let backend = FakeBackend::start().await.expect("start backend");
    let api = backend.client().expect("build client");
    let auth = AuthService::new(&api);

    let username = auth
        .register("new.shopper", &secret("hunter22"), &secret("hunter22"))
        .await
        .expect("register");
    assert_eq!(username.as_str(), "new.shopper");

    let session = auth
        .login("new.shopper", &secret("hunter22"))
        .await
        .expect("login");
    assert_eq!(session.username(), "new.shopper");
}

#[tokio::test]
async fn test_register_taken_username() {
    let backend = FakeBackend::start().await.expect("start backend");
    let api = backend.client().expect("build client");

    let err = AuthService::new(&api)
        .register(USERNAME, &secret("hunter22"), &secret("hunter22"))
        .await
        .expect_err("register should fail");

    assert!(matches!(err, AuthError::Rejected(ref m) if m == "Username is already taken"));
}

#[tokio::test]
async fn test_register_validation_happens_before_request() {
    let backend = FakeBackend::start().await.expect("start backend");
    let api = backend.client().expect("build client");
    let auth = AuthService::new(&api);

    let err = auth
        .register("abc", &secret("hunter22"), &secret("hunter22"))
        .await
        .expect_err("short username");
    assert_eq!(err.to_string(), "Username must be at least 6 characters");

    let err = auth
        .register("new.shopper", &secret("hunter22"), &secret("hunter23"))
        .await
        .expect_err("mismatched passwords");
    assert!(matches!(err, AuthError::PasswordMismatch));

    // Neither attempt created the account
    let err = auth
        .login("new.shopper", &secret("hunter22"))
        .await
        .expect_err("account should not exist");
    assert!(matches!(err, AuthError::Rejected(_)));
}

// ============================================================================
// Session expiry
// ============================================================================

#[tokio::test]
async fn test_unknown_token_is_unauthorized() {
    let backend = FakeBackend::start().await.expect("start backend");
    let api = backend.client().expect("build client");
    let stale = Session::new(USERNAME.to_string(), secret("expired-token"), 0.0);

    let err = CartService::new(&api)
        .load(&stale)
        .await
        .expect_err("stale token should be rejected");

    assert!(matches!(err, AppError::Api(ApiError::Unauthorized)));
    assert_eq!(
        err.user_message(),
        "Your session has expired. Please log in again."
    );
    assert!(!err.is_server_side());
}
