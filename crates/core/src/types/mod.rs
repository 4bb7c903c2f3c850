//! Core types for Watchpost.
//!
//! This module provides type-safe wrappers for the site's domain concepts.

pub mod cart;
pub mod email;
pub mod hero;
pub mod order;
pub mod price;
pub mod product;

pub use cart::{Cart, CartLineItem, MAX_QUANTITY};
pub use email::{Email, EmailError};
pub use hero::{HeroSlide, HeroTheme, ResolvedSlide, missing_products, resolve_slides};
pub use order::{OrderReceipt, ShippingDetails, ShippingError};
pub use price::Price;
pub use product::{Category, ParseEnumError, Product, Subcategory};
