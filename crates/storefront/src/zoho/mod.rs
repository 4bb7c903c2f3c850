//! Zoho Inventory API client.
//!
//! Zoho is the system of record for products, customers and sales orders.
//!
//! # Architecture
//!
//! - OAuth2 refresh-token grant: a long-lived refresh token is exchanged for
//!   a short-lived access token, cached in memory with a 60 second margin
//! - Listings are cached via `moka` (60 second TTL) and invalidated by admin
//!   mutations
//! - Any listing failure degrades to the static catalog in `watchpost_core`
//!
//! The integration is optional. Without `ZOHO_REFRESH_TOKEN` the site serves
//! the static catalog and mutations report [`ZohoError::NotConfigured`].

pub mod auth;
mod cache;
pub mod client;
mod conversions;
pub mod types;

pub use client::{Catalog, CatalogSource, InventoryClient, ItemImage};
pub use types::{ItemInput, OrderLine};

use thiserror::Error;

/// Errors that can occur when interacting with the Zoho Inventory API.
#[derive(Debug, Error)]
pub enum ZohoError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Zoho answered with a non-zero `code`.
    #[error("Zoho error {code}: {message}")]
    Api {
        /// Zoho status code (or HTTP status when the body is not JSON).
        code: i64,
        /// Message reported by Zoho.
        message: String,
    },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Zoho.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Refresh token exchange was rejected.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// No access token could be obtained.
    #[error("No access token - Zoho authentication required")]
    NoAccessToken,

    /// No Zoho credentials are configured.
    #[error("Zoho Inventory is not configured")]
    NotConfigured,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ZohoError::Api {
            code: 1001,
            message: "Item name already exists".to_string(),
        };
        assert_eq!(err.to_string(), "Zoho error 1001: Item name already exists");
    }

    #[test]
    fn test_rate_limited_error() {
        let err = ZohoError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }

    #[test]
    fn test_not_configured_error() {
        assert_eq!(
            ZohoError::NotConfigured.to_string(),
            "Zoho Inventory is not configured"
        );
    }
}
