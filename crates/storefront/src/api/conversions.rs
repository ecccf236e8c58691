//! Wire type conversion functions.
//!
//! Backend data that would break a core invariant (non-positive cart
//! quantities, negative costs) is dropped here with a warning instead of
//! failing the whole response. Ratings outside 0..=5 only affect display, so
//! they are clamped and the product is kept: it can still be bought and
//! charged for.

use tracing::warn;

use qkart_core::{Address, AddressId, CartRecord, CatalogEntry, ProductId, Rating};

use super::types::{AddressDto, CartItemDto, ProductDto};

// =============================================================================
// Products
// =============================================================================

pub fn convert_products(products: Vec<ProductDto>) -> Vec<CatalogEntry> {
    products.into_iter().filter_map(convert_product).collect()
}

fn convert_product(product: ProductDto) -> Option<CatalogEntry> {
    let rating = Rating::saturating(product.rating);
    if i64::from(rating.stars()) != product.rating {
        warn!(product_id = %product.id, rating = product.rating, "Clamping out-of-range product rating");
    }

    if !product.cost.is_finite() || product.cost < 0.0 {
        warn!(product_id = %product.id, cost = product.cost, "Skipping product with invalid cost");
        return None;
    }

    Some(CatalogEntry {
        id: ProductId::new(product.id),
        name: product.name,
        category: product.category,
        cost: product.cost,
        rating,
        image_url: product.image,
    })
}

// =============================================================================
// Cart
// =============================================================================

pub fn convert_cart(items: Vec<CartItemDto>) -> Vec<CartRecord> {
    items.into_iter().filter_map(convert_cart_item).collect()
}

fn convert_cart_item(item: CartItemDto) -> Option<CartRecord> {
    let record = u32::try_from(item.qty)
        .ok()
        .and_then(|quantity| CartRecord::try_new(ProductId::new(&item.product_id), quantity));

    if record.is_none() {
        warn!(product_id = %item.product_id, qty = item.qty, "Skipping cart item with invalid quantity");
    }
    record
}

// =============================================================================
// Addresses
// =============================================================================

pub fn convert_addresses(addresses: Vec<AddressDto>) -> Vec<Address> {
    addresses
        .into_iter()
        .map(|a| Address {
            id: AddressId::new(a.id),
            text: a.address,
        })
        .collect()
}
