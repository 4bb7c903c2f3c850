//! Admin panel gate.
//!
//! The admin flag is a plain, unsigned `wp_admin=1` cookie set after the
//! shared password is checked. Every request under `/admin` passes through
//! [`admin_gate`]:
//!
//! - without the cookie, anything but `/admin/login` redirects to the login page
//! - with the cookie, `/admin/login` redirects to the product list

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::cookie::{Cookie, SameSite};

/// Admin cookie name.
pub const ADMIN_COOKIE: &str = "wp_admin";

/// Admin login page path.
pub const LOGIN_PATH: &str = "/admin/login";

/// Landing page after login.
pub const HOME_PATH: &str = "/admin/products";

/// Whether the request carries the admin cookie.
#[must_use]
pub fn has_admin_cookie(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .any(|c| c.name() == ADMIN_COOKIE && c.value() == "1")
}

/// `Set-Cookie` value granting admin access.
#[must_use]
pub fn admin_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((ADMIN_COOKIE, "1"))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .build()
}

/// `Set-Cookie` value revoking admin access.
#[must_use]
pub fn clear_admin_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build((ADMIN_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .build();
    cookie.make_removal();
    cookie
}

/// Header value for a cookie.
#[must_use]
pub fn set_cookie_header(cookie: &Cookie<'_>) -> Option<HeaderValue> {
    HeaderValue::from_str(&cookie.to_string()).ok()
}

fn is_admin_path(path: &str) -> bool {
    path == "/admin" || path.starts_with("/admin/")
}

/// Redirect admin requests according to the cookie flag.
pub async fn admin_gate(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    if !is_admin_path(&path) {
        return next.run(request).await;
    }

    let authed = has_admin_cookie(request.headers());
    let on_login = path.trim_end_matches('/') == LOGIN_PATH;

    match (authed, on_login) {
        (true, true) => Redirect::to(HOME_PATH).into_response(),
        (false, false) => {
            tracing::debug!(path = %path, "Admin cookie missing, redirecting to login");
            Redirect::to(LOGIN_PATH).into_response()
        }
        _ => next.run(request).await,
    }
}
