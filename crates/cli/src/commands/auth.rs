//! `login`, `register` and `logout` commands.

use secrecy::SecretString;
use tracing::info;

use qkart_storefront::services::AuthService;

use super::{Context, money};
use crate::error::Result;

/// Log in and store the session.
pub async fn login(ctx: &Context, username: &str, password: &SecretString) -> Result<()> {
    let session = AuthService::new(&ctx.api).login(username, password).await?;
    ctx.store.save(&session).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("Logged in as {}", session.username());
        println!("Wallet balance: {}", money(session.balance()));
    }
    Ok(())
}

/// Register a new account.
pub async fn register(
    ctx: &Context,
    username: &str,
    password: &SecretString,
    confirm_password: &SecretString,
) -> Result<()> {
    let username = AuthService::new(&ctx.api)
        .register(username, password, confirm_password)
        .await?;

    #[allow(clippy::print_stdout)]
    {
        println!("Registered successfully as {username}");
        println!("Run `qkart login` to start shopping.");
    }
    Ok(())
}

/// Forget the stored session.
pub async fn logout(ctx: &Context) -> Result<()> {
    match ctx.store.load().await? {
        Some(session) => {
            AuthService::logout(session);
            ctx.store.clear().await?;
            #[allow(clippy::print_stdout)]
            {
                println!("Logged out");
            }
        }
        None => {
            info!(path = %ctx.store.path().display(), "No stored session");
            #[allow(clippy::print_stdout)]
            {
                println!("Not logged in");
            }
        }
    }
    Ok(())
}
