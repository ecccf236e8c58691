//! Cart operations.
//!
//! The backend stores a cart as `(product, quantity)` records. Every read
//! joins those records with the catalog; every change is computed with
//! [`apply_quantity_change`] against the freshly fetched cart and then
//! persisted. The backend's answer is authoritative: the returned view is
//! built from what it stored, not from the locally computed list.

use tracing::{debug, info, instrument};

use qkart_core::{
    CartRecord, CatalogEntry, LineItem, OrderSummary, ProductId, apply_quantity_change,
    reconcile, total_quantity, total_value,
};

use crate::api::ApiClient;
use crate::error::{Result, add_breadcrumb};
use crate::session::Session;

/// Reconciled cart with its totals.
#[derive(Debug, Clone, PartialEq)]
pub struct CartView {
    /// Line items in catalog order.
    pub items: Vec<LineItem>,
    /// Sum of line costs.
    pub value: f64,
    /// Number of units.
    pub quantity: u64,
}

impl CartView {
    /// Join cart records with the catalog and compute totals.
    #[must_use]
    pub fn reconcile(records: &[CartRecord], catalog: &[CatalogEntry]) -> Self {
        let items = reconcile(records, catalog);
        Self {
            value: total_value(&items),
            quantity: total_quantity(&items),
            items,
        }
    }

    /// Create an empty cart.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            value: 0.0,
            quantity: 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Quantity of `product_id` in the cart, zero if absent.
    #[must_use]
    pub fn quantity_of(&self, product_id: &ProductId) -> u32 {
        self.items
            .iter()
            .find(|item| item.product_id == *product_id)
            .map_or(0, |item| item.quantity)
    }

    /// Checkout breakdown of this cart.
    #[must_use]
    pub fn summary(&self) -> OrderSummary {
        OrderSummary::from_line_items(&self.items)
    }
}

/// Cart service.
pub struct CartService<'a> {
    api: &'a ApiClient,
}

impl<'a> CartService<'a> {
    #[must_use]
    pub const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Fetch the user's cart and reconcile it with the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if either request fails.
    #[instrument(skip(self, session), fields(username = %session.username()))]
    pub async fn load(&self, session: &Session) -> Result<CartView> {
        let (catalog, records) =
            tokio::try_join!(self.api.products(), self.api.get_cart(session))?;
        Ok(CartView::reconcile(&records, &catalog))
    }

    /// Set the quantity of one product. Zero or less removes it.
    ///
    /// # Errors
    ///
    /// Returns `CartError::UnknownProduct` when adding a product that is not
    /// in the catalog, or an API error if a request fails.
    pub async fn set_quantity(
        &self,
        session: &Session,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<CartView> {
        self.change_quantity(session, product_id, |_| quantity).await
    }

    /// Put `quantity` units of a product in the cart.
    ///
    /// Adding a product that is already in the cart overwrites its quantity.
    ///
    /// # Errors
    ///
    /// See [`CartService::set_quantity`].
    pub async fn add(
        &self,
        session: &Session,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<CartView> {
        self.set_quantity(session, product_id, i64::from(quantity))
            .await
    }

    /// Add one more unit of a product.
    ///
    /// # Errors
    ///
    /// See [`CartService::set_quantity`].
    pub async fn increment(&self, session: &Session, product_id: &ProductId) -> Result<CartView> {
        self.change_quantity(session, product_id, |current| {
            current.map_or(1, |q| i64::from(q) + 1)
        })
        .await
    }

    /// Remove one unit of a product. The last unit removes the product.
    ///
    /// # Errors
    ///
    /// See [`CartService::set_quantity`].
    pub async fn decrement(&self, session: &Session, product_id: &ProductId) -> Result<CartView> {
        self.change_quantity(session, product_id, |current| {
            current.map_or(0, |q| i64::from(q) - 1)
        })
        .await
    }

    /// Remove a product from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if a request fails.
    pub async fn remove(&self, session: &Session, product_id: &ProductId) -> Result<CartView> {
        self.set_quantity(session, product_id, 0).await
    }

    /// Fetch the current cart, compute the requested quantity from the
    /// current one, and persist the change.
    #[instrument(skip(self, session, new_quantity), fields(username = %session.username(), product_id = %product_id))]
    async fn change_quantity(
        &self,
        session: &Session,
        product_id: &ProductId,
        new_quantity: impl FnOnce(Option<u32>) -> i64 + Send,
    ) -> Result<CartView> {
        let (catalog, records) =
            tokio::try_join!(self.api.products(), self.api.get_cart(session))?;

        let current = quantity_in(&records, product_id);
        let requested = new_quantity(current);
        let next = apply_quantity_change(&records, &catalog, product_id, requested)?;

        if next == records {
            debug!(requested, "Cart unchanged, skipping update");
            return Ok(CartView::reconcile(&records, &catalog));
        }

        let quantity = quantity_in(&next, product_id).unwrap_or(0);
        let stored = self
            .api
            .update_cart_item(session, product_id, quantity)
            .await?;

        let quantity_str = quantity.to_string();
        add_breadcrumb(
            "cart",
            "Changed quantity",
            Some(&[
                ("product_id", product_id.as_str()),
                ("quantity", quantity_str.as_str()),
            ]),
        );
        info!(quantity, "Cart updated");

        Ok(CartView::reconcile(&stored, &catalog))
    }
}

fn quantity_in(records: &[CartRecord], product_id: &ProductId) -> Option<u32> {
    records
        .iter()
        .find(|record| record.product_id == *product_id)
        .map(|record| record.quantity.get())
}
