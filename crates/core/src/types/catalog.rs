//! Catalog entries.

use serde::{Deserialize, Serialize};

use super::{ProductId, Rating};

/// Canonical description of a product available to buy.
///
/// Owned by the backend catalog and treated as read-only input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// Unique product ID.
    pub id: ProductId,
    /// Name or title of the product.
    pub name: String,
    /// Category the product belongs to.
    pub category: String,
    /// Price of one unit, never negative.
    pub cost: f64,
    /// Aggregate rating out of five.
    pub rating: Rating,
    /// URL of the product image.
    pub image_url: String,
}
