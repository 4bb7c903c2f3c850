//! Zoho OAuth token exchange.
//!
//! Exchanges the long-lived refresh token for a short-lived access token.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;

use super::ZohoError;
use crate::config::ZohoCredentials;

/// Seconds before expiry at which a token is treated as stale.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Access token obtained from the accounts server.
#[derive(Debug, Clone)]
pub struct AccessToken {
    /// Token sent as `Authorization: Zoho-oauthtoken <token>`.
    pub value: SecretString,
    /// Unix timestamp when the token expires.
    pub expires_at: i64,
}

/// Response from the token endpoint.
///
/// Zoho answers HTTP 200 with an `error` field when the grant is rejected.
#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    /// Token lifetime in seconds.
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    error: Option<String>,
}

impl AccessToken {
    /// Check if the token has expired or is within the safety margin.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        now >= self.expires_at - EXPIRY_MARGIN_SECS
    }
}

/// Exchange the refresh token for a new access token.
///
/// # Errors
///
/// Returns `ZohoError::AuthenticationFailed` if Zoho rejects the grant, or
/// `ZohoError::Http` on network failures.
#[instrument(skip(client, credentials), fields(client_id = %credentials.client_id))]
pub async fn exchange_refresh_token(
    client: &reqwest::Client,
    accounts_url: &str,
    credentials: &ZohoCredentials,
) -> Result<AccessToken, ZohoError> {
    let now = chrono::Utc::now().timestamp();

    let response = client
        .post(format!("{accounts_url}/oauth/v2/token"))
        .form(&[
            ("refresh_token", credentials.refresh_token.expose_secret()),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.expose_secret()),
            ("grant_type", "refresh_token"),
        ])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(ZohoError::AuthenticationFailed(format!(
            "HTTP {status}: {}",
            error_text.chars().take(200).collect::<String>()
        )));
    }

    let body: TokenResponse = response.json().await?;
    match (body.access_token, body.error) {
        (Some(token), None) => Ok(AccessToken {
            value: SecretString::from(token),
            expires_at: now + body.expires_in.unwrap_or(3600),
        }),
        (_, Some(error)) => Err(ZohoError::AuthenticationFailed(error)),
        (None, None) => Err(ZohoError::AuthenticationFailed(
            "Token response had no access_token".to_string(),
        )),
    }
}
