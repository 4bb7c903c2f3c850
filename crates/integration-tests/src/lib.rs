//! End-to-end tests for the Watchpost site.
//!
//! Each test builds the full router from `watchpost_storefront::app` and
//! drives it with `tower::ServiceExt::oneshot`. Zoho, GitHub and Resend are
//! replaced by axum routers bound to `127.0.0.1:0`, so no network access or
//! credentials are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p watchpost-integration-tests
//! ```
//!
//! # Test Files
//!
//! - `storefront` - public pages, filters, policies, contact form
//! - `cart` - session cart
//! - `checkout` - orders and tracking against a fake Zoho
//! - `admin` - cookie gate, product management, hero editor, seeding
