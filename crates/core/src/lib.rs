//! QKart Core - Shared types and cart reconciliation.
//!
//! This crate provides the domain types and pure cart logic used across all
//! QKart components:
//! - `storefront` - Backend API client and storefront services
//! - `cli` - Command-line shopping client
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no global state. Every operation is a deterministic function of
//! its inputs, so it can be used anywhere and tested without a backend.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, usernames, ratings, catalog and cart records
//! - [`reconciler`] - Joins cart records against the catalog and applies quantity changes
//! - [`summary`] - Checkout order breakdown

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod reconciler;
pub mod summary;
pub mod types;

pub use reconciler::{CartError, apply_quantity_change, reconcile, total_quantity, total_value};
pub use summary::OrderSummary;
pub use types::*;
