//! Admin login and logout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::admin_auth::{HOME_PATH, LOGIN_PATH, set_cookie_header};
use crate::middleware::{admin_cookie, clear_admin_cookie, login_rate_limiter};
use crate::state::AppState;

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
}

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub password: String,
}

/// Render the login page.
///
/// GET /admin/login
pub async fn login_page() -> impl IntoResponse {
    LoginTemplate { error: None }
}

/// Check the shared password and set the admin cookie.
///
/// POST /api/admin/login
///
/// # Errors
///
/// Returns an error if the cookie header cannot be built.
#[instrument(skip(state, form))]
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Result<Response> {
    if form.password != state.config().admin_password.expose_secret() {
        tracing::warn!("Admin login failed");
        return Ok((
            StatusCode::UNAUTHORIZED,
            LoginTemplate {
                error: Some("Incorrect password.".to_string()),
            },
        )
            .into_response());
    }

    let cookie = set_cookie_header(&admin_cookie(state.config().is_secure()))
        .ok_or_else(|| AppError::Internal("invalid admin cookie".to_string()))?;

    tracing::info!("Admin logged in");
    Ok(([(header::SET_COOKIE, cookie)], Redirect::to(HOME_PATH)).into_response())
}

/// Clear the admin cookie.
///
/// POST /api/admin/logout
///
/// # Errors
///
/// Returns an error if the cookie header cannot be built.
pub async fn logout() -> Result<Response> {
    let cookie = set_cookie_header(&clear_admin_cookie())
        .ok_or_else(|| AppError::Internal("invalid admin cookie".to_string()))?;
    Ok(([(header::SET_COOKIE, cookie)], Redirect::to(LOGIN_PATH)).into_response())
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(LOGIN_PATH, get(login_page))
        .route("/api/admin/login", post(login).layer(login_rate_limiter()))
        .route("/api/admin/logout", post(logout))
}
