//! Checkout and shipping addresses.

use thiserror::Error;
use tracing::{info, instrument};

use qkart_core::{Address, AddressId, OrderSummary};

use crate::api::ApiClient;
use crate::error::{Result, add_breadcrumb};
use crate::services::cart::CartView;
use crate::session::Session;

/// Minimum length of a new shipping address.
const MIN_ADDRESS_LENGTH: usize = 20;

/// Reasons an order cannot be placed.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing to order.
    #[error("Cart is empty. Add more items to the cart to checkout.")]
    EmptyCart,

    /// The chosen address is not one of the user's saved addresses.
    #[error("Please select one shipping address to proceed.")]
    UnknownAddress(AddressId),

    /// Address text left blank.
    #[error("Address cannot be empty")]
    EmptyAddress,

    /// Address text too short to be a real address.
    #[error("Address should be at least {min} characters")]
    AddressTooShort {
        /// Minimum allowed length.
        min: usize,
    },

    /// The wallet cannot pay for the order.
    #[error("You do not have enough balance in your wallet for this purchase")]
    InsufficientBalance {
        /// Order total.
        total: f64,
        /// Wallet balance.
        balance: f64,
    },
}

/// Result of a successful checkout.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    /// What was paid for.
    pub summary: OrderSummary,
    /// The session with the wallet balance reduced by the order total.
    pub session: Session,
}

/// Checkout service.
pub struct CheckoutService<'a> {
    api: &'a ApiClient,
}

impl<'a> CheckoutService<'a> {
    #[must_use]
    pub const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Order details for the current cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be loaded.
    pub async fn summary(&self, session: &Session) -> Result<OrderSummary> {
        let (catalog, records) =
            tokio::try_join!(self.api.products(), self.api.get_cart(session))?;
        Ok(CartView::reconcile(&records, &catalog).summary())
    }

    /// Saved shipping addresses.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn addresses(&self, session: &Session) -> Result<Vec<Address>> {
        Ok(self.api.addresses(session).await?)
    }

    /// Save a new shipping address.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyAddress` or `CheckoutError::AddressTooShort`
    /// for unusable input, or an API error if the request fails.
    #[instrument(skip(self, session, address), fields(username = %session.username()))]
    pub async fn add_address(&self, session: &Session, address: &str) -> Result<Vec<Address>> {
        let address = validate_address(address)?;
        let addresses = self.api.add_address(session, address).await?;

        add_breadcrumb("checkout", "Added address", None);
        Ok(addresses)
    }

    /// Delete a saved shipping address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address does not exist or the request fails.
    pub async fn delete_address(
        &self,
        session: &Session,
        address_id: &AddressId,
    ) -> Result<Vec<Address>> {
        let addresses = self.api.delete_address(session, address_id).await?;

        add_breadcrumb(
            "checkout",
            "Deleted address",
            Some(&[("address_id", address_id.as_str())]),
        );
        Ok(addresses)
    }

    /// Place an order for the current cart.
    ///
    /// The cart, the address and the wallet balance are checked before the
    /// backend is asked to place the order.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart`, `CheckoutError::UnknownAddress` or
    /// `CheckoutError::InsufficientBalance` when the order cannot be placed,
    /// or an API error if the backend refuses it.
    #[instrument(skip(self, session), fields(username = %session.username(), address_id = %address_id))]
    pub async fn checkout(&self, session: Session, address_id: &AddressId) -> Result<PlacedOrder> {
        let (catalog, records, addresses) = tokio::try_join!(
            self.api.products(),
            self.api.get_cart(&session),
            self.api.addresses(&session)
        )?;

        let cart = CartView::reconcile(&records, &catalog);
        let summary = validate_order(&cart, &addresses, address_id, session.balance())?;

        self.api.checkout(&session, address_id).await?;

        let balance = session.balance() - summary.total;
        add_breadcrumb(
            "checkout",
            "Placed order",
            Some(&[("address_id", address_id.as_str())]),
        );
        info!(total = summary.total, balance, "Order placed successfully");

        Ok(PlacedOrder {
            summary,
            session: session.with_balance(balance),
        })
    }
}

// =============================================================================
// Validation
// =============================================================================

fn validate_address(address: &str) -> std::result::Result<&str, CheckoutError> {
    let address = address.trim();

    if address.is_empty() {
        return Err(CheckoutError::EmptyAddress);
    }

    if address.chars().count() < MIN_ADDRESS_LENGTH {
        return Err(CheckoutError::AddressTooShort {
            min: MIN_ADDRESS_LENGTH,
        });
    }

    Ok(address)
}

fn validate_order(
    cart: &CartView,
    addresses: &[Address],
    address_id: &AddressId,
    balance: f64,
) -> std::result::Result<OrderSummary, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    if !addresses.iter().any(|a| a.id == *address_id) {
        return Err(CheckoutError::UnknownAddress(address_id.clone()));
    }

    let summary = cart.summary();
    if !summary.is_affordable(balance) {
        return Err(CheckoutError::InsufficientBalance {
            total: summary.total,
            balance,
        });
    }

    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use qkart_core::{CartRecord, CatalogEntry, ProductId, Rating};

    use super::*;

    fn cart(quantity: u32) -> CartView {
        let catalog = vec![CatalogEntry {
            id: ProductId::new("p1"),
            name: "Atomic Habits".to_string(),
            category: "Books".to_string(),
            cost: 40.0,
            rating: Rating::new(5).unwrap(),
            image_url: String::new(),
        }];
        let records: Vec<_> = CartRecord::try_new(ProductId::new("p1"), quantity)
            .into_iter()
            .collect();
        CartView::reconcile(&records, &catalog)
    }

    fn addresses() -> Vec<Address> {
        vec![Address {
            id: AddressId::new("home"),
            text: "12 MG Road, Bengaluru, Karnataka 560001".to_string(),
        }]
    }

    #[test]
    fn test_validate_address() {
        assert!(matches!(validate_address("   "), Err(CheckoutError::EmptyAddress)));
        assert!(matches!(
            validate_address("12 MG Road"),
            Err(CheckoutError::AddressTooShort { min: 20 })
        ));
        assert_eq!(
            validate_address("  12 MG Road, Bengaluru 560001 ").unwrap(),
            "12 MG Road, Bengaluru 560001"
        );
    }

    #[test]
    fn test_validate_order_ok() {
        let summary =
            validate_order(&cart(2), &addresses(), &AddressId::new("home"), 100.0).unwrap();
        assert_eq!(summary.products, 2);
        assert!((summary.total - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_order_empty_cart() {
        let err = validate_order(&cart(0), &addresses(), &AddressId::new("home"), 100.0)
            .unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
    }

    #[test]
    fn test_validate_order_unknown_address() {
        let err =
            validate_order(&cart(1), &addresses(), &AddressId::new("work"), 100.0).unwrap_err();
        assert!(matches!(err, CheckoutError::UnknownAddress(ref id) if id.as_str() == "work"));
        assert_eq!(err.to_string(), "Please select one shipping address to proceed.");
    }

    #[test]
    fn test_validate_order_insufficient_balance() {
        let err =
            validate_order(&cart(3), &addresses(), &AddressId::new("home"), 100.0).unwrap_err();
        assert!(matches!(err, CheckoutError::InsufficientBalance { .. }));
        assert_eq!(
            err.to_string(),
            "You do not have enough balance in your wallet for this purchase"
        );
    }

    #[test]
    fn test_validate_order_exact_balance() {
        assert!(validate_order(&cart(2), &addresses(), &AddressId::new("home"), 80.0).is_ok());
    }
}
