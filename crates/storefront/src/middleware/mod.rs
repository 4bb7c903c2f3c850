//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers
//! 5. Session layer (tower-sessions, in-memory store, holds the cart)
//! 6. Admin gate (cookie check for `/admin`)
//! 7. Rate limiting (governor, per route)

pub mod admin_auth;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use admin_auth::{admin_cookie, admin_gate, clear_admin_cookie, has_admin_cookie};
pub use rate_limit::{form_rate_limiter, login_rate_limiter};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
