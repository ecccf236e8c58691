//! `checkout` subcommands.

use qkart_core::{Address, AddressId};
use qkart_storefront::services::CheckoutService;

use super::{Context, money};
use crate::error::Result;

/// Print the order details of the current cart.
pub async fn summary(ctx: &Context) -> Result<()> {
    let session = ctx.require_session().await?;
    let summary = CheckoutService::new(&ctx.api).summary(&session).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("Products:      {}", summary.products);
        println!("Subtotal:      {}", money(summary.subtotal));
        println!("Shipping:      {}", money(summary.shipping));
        println!("Total:         {}", money(summary.total));
        println!("Balance:       {}", money(session.balance()));
    }
    Ok(())
}

/// List saved shipping addresses.
pub async fn addresses(ctx: &Context) -> Result<()> {
    let session = ctx.require_session().await?;
    let addresses = CheckoutService::new(&ctx.api).addresses(&session).await?;
    print_addresses(&addresses);
    Ok(())
}

/// Save a new shipping address.
pub async fn add_address(ctx: &Context, address: &str) -> Result<()> {
    let session = ctx.require_session().await?;
    let addresses = CheckoutService::new(&ctx.api)
        .add_address(&session, address)
        .await?;
    print_addresses(&addresses);
    Ok(())
}

/// Delete a saved shipping address.
pub async fn delete_address(ctx: &Context, address_id: &AddressId) -> Result<()> {
    let session = ctx.require_session().await?;
    let addresses = CheckoutService::new(&ctx.api)
        .delete_address(&session, address_id)
        .await?;
    print_addresses(&addresses);
    Ok(())
}

/// Place the order and store the reduced wallet balance.
pub async fn place(ctx: &Context, address_id: &AddressId) -> Result<()> {
    let session = ctx.require_session().await?;
    let order = CheckoutService::new(&ctx.api)
        .checkout(session, address_id)
        .await?;
    ctx.store.save(&order.session).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("Order placed successfully");
        println!("Paid:          {}", money(order.summary.total));
        println!("Balance:       {}", money(order.session.balance()));
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_addresses(addresses: &[Address]) {
    if addresses.is_empty() {
        println!("No addresses found for this account. Please add one to proceed");
        return;
    }
    for address in addresses {
        println!("{:<26} {}", address.id, address.text);
    }
}
