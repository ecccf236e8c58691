//! Cart records and reconciled line items.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::{CatalogEntry, ProductId, Rating};

/// The persisted fact "this product, this quantity" in a user's cart.
///
/// `quantity` is strictly positive. A change that would bring it to zero
/// removes the record instead (see [`crate::apply_quantity_change`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartRecord {
    pub product_id: ProductId,
    pub quantity: NonZeroU32,
}

impl CartRecord {
    #[must_use]
    pub const fn new(product_id: ProductId, quantity: NonZeroU32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }

    /// Create a record, or `None` when `quantity` is zero.
    #[must_use]
    pub fn try_new(product_id: ProductId, quantity: u32) -> Option<Self> {
        NonZeroU32::new(quantity).map(|quantity| Self::new(product_id, quantity))
    }
}

/// A cart record joined with its catalog entry.
///
/// Line items are view objects recomputed on every reconciliation; they are
/// never persisted on their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: ProductId,
    pub name: String,
    pub category: String,
    pub unit_cost: f64,
    pub rating: Rating,
    pub image_url: String,
    pub quantity: u32,
}

impl LineItem {
    /// Join a catalog entry with the quantity held in the cart.
    #[must_use]
    pub fn from_entry(entry: &CatalogEntry, quantity: u32) -> Self {
        Self {
            product_id: entry.id.clone(),
            name: entry.name.clone(),
            category: entry.category.clone(),
            unit_cost: entry.cost,
            rating: entry.rating,
            image_url: entry.image_url.clone(),
            quantity,
        }
    }

    /// Cost of this line (`unit_cost * quantity`).
    #[must_use]
    pub fn line_cost(&self) -> f64 {
        self.unit_cost * f64::from(self.quantity)
    }

    /// The cart record this line item was built from, `None` for an empty
    /// line.
    #[must_use]
    pub fn to_record(&self) -> Option<CartRecord> {
        CartRecord::try_new(self.product_id.clone(), self.quantity)
    }
}
