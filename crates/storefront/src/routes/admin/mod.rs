//! Admin panel route handlers.
//!
//! Everything under `/admin` passes through `middleware::admin_gate`. The
//! login and logout actions live under `/api/admin` so they stay reachable
//! without the cookie.

pub mod auth;
pub mod hero;
pub mod products;

use axum::{Router, response::Redirect, routing::get};

use crate::middleware::admin_auth::HOME_PATH;
use crate::state::AppState;

/// Create the admin routes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin", get(|| async { Redirect::to(HOME_PATH) }))
        .merge(auth::router())
        .merge(products::router())
        .merge(hero::router())
}
