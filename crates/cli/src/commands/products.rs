//! `products` command.

use qkart_core::CatalogEntry;
use qkart_storefront::services::CatalogService;

use super::{Context, money};
use crate::error::Result;

/// List the catalog, or the products matching `search`.
pub async fn list(ctx: &Context, search: Option<&str>) -> Result<()> {
    let catalog = CatalogService::new(&ctx.api);
    let products = match search {
        Some(text) => catalog.search(text).await?,
        None => catalog.products().await?,
    };

    #[allow(clippy::print_stdout)]
    {
        if products.is_empty() {
            println!("No products found");
            return Ok(());
        }
        for product in products.iter() {
            println!("{}", product_line(product));
        }
    }
    Ok(())
}

fn product_line(product: &CatalogEntry) -> String {
    format!(
        "{:<18} {:<40} {:<12} {:>10}  {}",
        product.id,
        product.name,
        product.category,
        money(product.cost),
        product.rating
    )
}
