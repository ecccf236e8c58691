//! Shipping addresses.

use serde::{Deserialize, Serialize};

use super::AddressId;

/// A shipping address saved on the user's account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    /// Backend ID of the address.
    pub id: AddressId,
    /// Free-form address text as entered by the user.
    pub text: String,
}
