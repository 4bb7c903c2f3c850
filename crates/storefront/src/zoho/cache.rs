//! Cache types for Zoho Inventory responses.

use std::sync::Arc;

use watchpost_core::Product;

use super::client::ItemImage;

/// Cache key for listings and item images.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products,
    Image(String),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Arc<Vec<Product>>),
    Image(ItemImage),
}
