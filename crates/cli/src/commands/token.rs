//! Zoho credential check.

use chrono::DateTime;
use tracing::info;

use super::{CommandError, inventory_client};

/// Exchange the refresh token once and log when the access token expires.
///
/// # Errors
///
/// Returns an error if Zoho is not configured or the exchange is rejected.
pub async fn check() -> Result<(), CommandError> {
    let client = inventory_client()?;
    let token = client.refresh_token().await?;

    let expires = DateTime::from_timestamp(token.expires_at, 0)
        .map_or_else(|| token.expires_at.to_string(), |t| t.to_rfc3339());
    info!(expires_at = %expires, "Zoho token exchange succeeded");
    Ok(())
}
