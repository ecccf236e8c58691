//! Cart reconciliation.
//!
//! The backend persists a cart as a sparse list of [`CartRecord`]s. Everything
//! shown to a user (names, prices, totals) comes from joining those records
//! with the catalog at read time. This module holds that join plus the
//! quantity-change rule that produces the next record list.
//!
//! All functions are pure: they borrow their inputs, never mutate them, and
//! return freshly built values. Persisting the result is the caller's job.

use std::collections::HashMap;
use std::num::NonZeroU32;

use thiserror::Error;

use crate::types::{CartRecord, CatalogEntry, LineItem, ProductId};

/// Errors produced when applying a quantity change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The product to add does not exist in the catalog.
    #[error("product {0} is not in the catalog")]
    UnknownProduct(ProductId),

    /// The requested quantity cannot be represented in a cart record.
    #[error("quantity {requested} exceeds the maximum of {max}")]
    QuantityTooLarge {
        /// The requested quantity.
        requested: i64,
        /// Largest quantity a record can hold.
        max: u32,
    },
}

/// Join cart records against the catalog.
///
/// Produces one [`LineItem`] per record whose product exists in `catalog`.
/// Records without a catalog match (e.g. a discontinued product still held
/// by a stale cart) are left out. The result follows the order of `catalog`,
/// not the order of `cart_records`.
///
/// When a product appears in several records the first one wins; when it
/// appears in several catalog entries only the first entry is used.
///
/// Runs in `O(|cart_records| + |catalog|)`.
///
/// # Example
///
/// ```
/// use qkart_core::{CartRecord, CatalogEntry, ProductId, Rating, reconcile};
///
/// let catalog = vec![CatalogEntry {
///     id: ProductId::new("p1"),
///     name: "Sneakers".to_string(),
///     category: "Fashion".to_string(),
///     cost: 10.0,
///     rating: Rating::default(),
///     image_url: String::new(),
/// }];
/// let cart = vec![
///     CartRecord::try_new(ProductId::new("p1"), 2).unwrap(),
///     CartRecord::try_new(ProductId::new("gone"), 1).unwrap(),
/// ];
///
/// let items = reconcile(&cart, &catalog);
/// assert_eq!(items.len(), 1);
/// assert_eq!(items[0].quantity, 2);
/// ```
#[must_use]
pub fn reconcile(cart_records: &[CartRecord], catalog: &[CatalogEntry]) -> Vec<LineItem> {
    let mut quantities: HashMap<&str, u32> = HashMap::with_capacity(cart_records.len());
    for record in cart_records {
        quantities
            .entry(record.product_id.as_str())
            .or_insert(record.quantity.get());
    }

    let mut items = Vec::with_capacity(quantities.len().min(catalog.len()));
    for entry in catalog {
        // Removing the key means a repeated catalog id finds nothing.
        if let Some(quantity) = quantities.remove(entry.id.as_str()) {
            items.push(LineItem::from_entry(entry, quantity));
        }
    }
    items
}

/// Total value of the cart: the sum of `unit_cost * quantity`.
///
/// Returns `0.0` for an empty list. No rounding is applied.
#[must_use]
pub fn total_value(items: &[LineItem]) -> f64 {
    items.iter().map(LineItem::line_cost).sum()
}

/// Total number of units in the cart.
///
/// Returns `0` for an empty list.
#[must_use]
pub fn total_quantity(items: &[LineItem]) -> u64 {
    items.iter().map(|item| u64::from(item.quantity)).sum()
}

/// Produce the next cart record list after setting `target` to `new_quantity`.
///
/// - `new_quantity <= 0` removes every record for `target`.
/// - A present `target` has its quantity replaced (not incremented); callers
///   pass the already adjusted value, e.g. `current + 1`.
/// - An absent `target` is appended, which is how products get added. Only
///   this case consults `catalog`.
///
/// The relative order of the other records is preserved.
///
/// # Errors
///
/// Returns `CartError::UnknownProduct` when adding a product that is not in
/// `catalog`, and `CartError::QuantityTooLarge` when `new_quantity` does not
/// fit in a record.
pub fn apply_quantity_change(
    current: &[CartRecord],
    catalog: &[CatalogEntry],
    target: &ProductId,
    new_quantity: i64,
) -> Result<Vec<CartRecord>, CartError> {
    if new_quantity <= 0 {
        return Ok(current
            .iter()
            .filter(|record| record.product_id != *target)
            .cloned()
            .collect());
    }

    let quantity = u32::try_from(new_quantity)
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or(CartError::QuantityTooLarge {
            requested: new_quantity,
            max: u32::MAX,
        })?;

    let mut next = Vec::with_capacity(current.len() + 1);
    let mut replaced = false;
    for record in current {
        if record.product_id != *target {
            next.push(record.clone());
        } else if !replaced {
            next.push(CartRecord::new(target.clone(), quantity));
            replaced = true;
        }
    }

    if !replaced {
        if !catalog.iter().any(|entry| entry.id == *target) {
            return Err(CartError::UnknownProduct(target.clone()));
        }
        next.push(CartRecord::new(target.clone(), quantity));
    }

    Ok(next)
}
