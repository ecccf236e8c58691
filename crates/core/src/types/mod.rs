//! Core types for QKart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod cart;
pub mod catalog;
pub mod id;
pub mod rating;
pub mod username;

pub use address::Address;
pub use cart::{CartRecord, LineItem};
pub use catalog::CatalogEntry;
pub use id::*;
pub use rating::{Rating, RatingError};
pub use username::{Username, UsernameError};
