//! One-off catalog seeding endpoint.
//!
//! POST /api/seed with `Authorization: Bearer <SEED_TOKEN>`. Disabled when
//! `SEED_TOKEN` is unset.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header},
};
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::services::{SeedReport, seed_catalog};
use crate::state::AppState;

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
}

/// Create every static catalog product in Zoho.
///
/// # Errors
///
/// Returns 404 when seeding is disabled, 401 for a wrong token and 503 when
/// Zoho is not configured.
#[instrument(skip(state, headers))]
pub async fn seed(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<SeedReport>> {
    let Some(expected) = state.config().seed_token.as_ref() else {
        return Err(AppError::NotFound("Seeding is disabled".to_string()));
    };

    if bearer_token(&headers) != Some(expected.expose_secret()) {
        tracing::warn!("Seed request with invalid token");
        return Err(AppError::Unauthorized("Invalid seed token".to_string()));
    }

    Ok(Json(seed_catalog(state.inventory()).await?))
}
