//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page with hero carousel
//! GET  /about, /services, /process
//! GET  /policies/{slug}        - Markdown policy pages
//! GET  /contact                - Contact page
//! POST /api/contact            - Contact form (JSON, rate limited)
//!
//! # Catalog
//! GET  /products               - Listing with filters and sorting
//! GET  /products/{id}          - Product detail
//!
//! # Cart (session backed)
//! GET  /cart
//! POST /cart/add, /cart/update, /cart/remove
//!
//! # Checkout & orders
//! GET  /checkout?product=&quantity=
//! POST /checkout               - Create a Zoho sales order (rate limited)
//! GET  /track                  - Order tracking page
//! GET  /api/orders/{id}        - Order status (JSON)
//! GET  /api/images/{item_id}   - Zoho item image proxy
//! POST /api/seed               - Push the static catalog into Zoho (bearer token)
//!
//! # Admin (cookie gated, see `middleware::admin_auth`)
//! GET  /admin/login   POST /api/admin/login   POST /api/admin/logout
//! GET  /admin/products, /admin/products/new, /admin/products/{id}/edit
//! POST /admin/products, /admin/products/{id}, /admin/products/{id}/delete
//! GET  /admin/hero    POST /admin/hero
//! ```

pub mod admin;
pub mod cart;
pub mod checkout;
pub mod contact;
pub mod home;
pub mod orders;
pub mod pages;
pub mod products;
pub mod seed;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::form_rate_limiter;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
}

/// Create the checkout and order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/checkout",
            get(checkout::show).merge(post(checkout::submit).layer(form_rate_limiter())),
        )
        .route("/track", get(orders::track))
        .route("/api/orders/{id}", get(orders::status))
        .route("/api/images/{item_id}", get(orders::image))
        .route("/api/seed", post(seed::seed))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Marketing and policy pages
        .merge(pages::router())
        .merge(contact::router())
        // Catalog and cart
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .merge(order_routes())
        // Admin panel
        .merge(admin::router())
}
