//! Watchpost Core - Shared domain types.
//!
//! This crate provides the types used across all Watchpost components:
//! - `storefront` - Marketing site, catalog, cart, checkout and admin panel
//! - `cli` - Operator tools (catalog seeding, credential checks)
//!
//! # Architecture
//!
//! The core crate contains only types, pure logic and static data - no I/O,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Products, cart, hero slides, checkout input, emails and prices
//! - [`catalog`] - Hardcoded product list used when the inventory provider is unavailable

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod types;

pub use types::*;
