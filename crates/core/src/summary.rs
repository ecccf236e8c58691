//! Checkout order breakdown.

use serde::{Deserialize, Serialize};

use crate::reconciler::{total_quantity, total_value};
use crate::types::LineItem;

/// Order details shown before placing an order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    /// Number of units across all line items.
    pub products: u64,
    /// Sum of line costs.
    pub subtotal: f64,
    /// Shipping charges. QKart ships for free.
    pub shipping: f64,
    /// Amount charged to the wallet.
    pub total: f64,
}

impl OrderSummary {
    /// Shipping charged on every order.
    pub const SHIPPING: f64 = 0.0;

    /// Build the summary for a reconciled cart.
    #[must_use]
    pub fn from_line_items(items: &[LineItem]) -> Self {
        let subtotal = total_value(items);
        Self {
            products: total_quantity(items),
            subtotal,
            shipping: Self::SHIPPING,
            total: subtotal + Self::SHIPPING,
        }
    }

    /// Whether a wallet holding `balance` can pay for this order.
    #[must_use]
    pub fn is_affordable(&self, balance: f64) -> bool {
        self.total <= balance
    }
}
