//! `cart` subcommands.

use qkart_core::ProductId;
use qkart_storefront::services::{CartService, CartView};

use super::{Context, money};
use crate::error::Result;

/// Print the reconciled cart.
pub async fn show(ctx: &Context) -> Result<()> {
    let session = ctx.require_session().await?;
    let cart = CartService::new(&ctx.api).load(&session).await?;
    print_cart(&cart);
    Ok(())
}

/// Put `quantity` units of a product in the cart.
pub async fn add(ctx: &Context, product_id: &ProductId, quantity: u32) -> Result<()> {
    let session = ctx.require_session().await?;
    let cart = CartService::new(&ctx.api)
        .add(&session, product_id, quantity)
        .await?;
    print_cart(&cart);
    Ok(())
}

/// Set the quantity of a product. Zero or less removes it.
pub async fn set(ctx: &Context, product_id: &ProductId, quantity: i64) -> Result<()> {
    let session = ctx.require_session().await?;
    let cart = CartService::new(&ctx.api)
        .set_quantity(&session, product_id, quantity)
        .await?;
    print_cart(&cart);
    Ok(())
}

/// Add one unit of a product.
pub async fn increment(ctx: &Context, product_id: &ProductId) -> Result<()> {
    let session = ctx.require_session().await?;
    let cart = CartService::new(&ctx.api)
        .increment(&session, product_id)
        .await?;
    print_cart(&cart);
    Ok(())
}

/// Remove one unit of a product.
pub async fn decrement(ctx: &Context, product_id: &ProductId) -> Result<()> {
    let session = ctx.require_session().await?;
    let cart = CartService::new(&ctx.api)
        .decrement(&session, product_id)
        .await?;
    print_cart(&cart);
    Ok(())
}

/// Remove a product entirely.
pub async fn remove(ctx: &Context, product_id: &ProductId) -> Result<()> {
    let session = ctx.require_session().await?;
    let cart = CartService::new(&ctx.api)
        .remove(&session, product_id)
        .await?;
    print_cart(&cart);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_cart(cart: &CartView) {
    for line in render_cart(cart) {
        println!("{line}");
    }
}

fn render_cart(cart: &CartView) -> Vec<String> {
    if cart.is_empty() {
        return vec!["Cart is empty. Add more items to the cart to checkout.".to_string()];
    }

    let mut lines: Vec<String> = cart
        .items
        .iter()
        .map(|item| {
            format!(
                "{:<18} {:<40} {:>4} x {:>10} = {:>10}",
                item.product_id,
                item.name,
                item.quantity,
                money(item.unit_cost),
                money(item.line_cost())
            )
        })
        .collect();
    lines.push(format!(
        "Order total: {} ({} items)",
        money(cart.value),
        cart.quantity
    ));
    lines
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use qkart_core::{CartRecord, CatalogEntry, Rating};

    use super::*;

    #[test]
    fn test_render_empty_cart() {
        let lines = render_cart(&CartView::empty());
        assert_eq!(
            lines,
            vec!["Cart is empty. Add more items to the cart to checkout.".to_string()]
        );
    }

    #[test]
    fn test_render_cart_totals() {
        let catalog = vec![CatalogEntry {
            id: ProductId::new("p1"),
            name: "Atomic Habits".to_string(),
            category: "Books".to_string(),
            cost: 40.0,
            rating: Rating::new(5).unwrap(),
            image_url: String::new(),
        }];
        let cart = CartView::reconcile(&[CartRecord::try_new(ProductId::new("p1"), 3).unwrap()], &catalog);

        let lines = render_cart(&cart);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Atomic Habits"));
        assert!(lines[0].ends_with("$120.00"));
        assert_eq!(lines[1], "Order total: $120.00 (3 items)");
    }
}
