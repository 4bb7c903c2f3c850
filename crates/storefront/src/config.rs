//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_PASSWORD` - Shared admin panel password (min 12 chars, not a placeholder)
//!
//! ## Optional
//! - `WATCHPOST_HOST` - Bind address (default: 127.0.0.1)
//! - `WATCHPOST_PORT` - Listen port (default: 3000)
//! - `WATCHPOST_BASE_URL` - Public URL (default: <http://localhost:3000>)
//! - `HERO_CONFIG_PATH` - Hero slides JSON file (default: crates/storefront/content/hero.json)
//! - `CONTENT_DIR` - Markdown content directory (default: crates/storefront/content)
//! - `STATIC_DIR` - Static assets directory (default: crates/storefront/static)
//! - `SEED_TOKEN` - Bearer token accepted by `POST /api/seed` (endpoint disabled if unset)
//!
//! ## Zoho Inventory (enabled when `ZOHO_REFRESH_TOKEN` is set)
//! - `ZOHO_REFRESH_TOKEN` - Long-lived OAuth refresh token
//! - `ZOHO_CLIENT_ID`, `ZOHO_CLIENT_SECRET` - OAuth client credentials
//! - `ZOHO_ORGANIZATION_ID` - Inventory organization
//! - `ZOHO_ACCOUNTS_URL` - Accounts server (default: <https://accounts.zoho.com>)
//! - `ZOHO_API_URL` - Inventory API base (default: <https://www.zohoapis.com/inventory/v1>)
//!
//! ## GitHub hero publishing (enabled when `GITHUB_TOKEN` is set)
//! - `GITHUB_TOKEN` - Personal access token with contents write access
//! - `GITHUB_REPO` - `owner/name`
//! - `GITHUB_BRANCH` - Branch to commit to (default: main)
//! - `GITHUB_HERO_PATH` - Path of the hero file in the repo (default: crates/storefront/content/hero.json)
//! - `GITHUB_API_URL` - API base (default: <https://api.github.com>)
//!
//! ## Mailer (enabled when `RESEND_API_KEY` is set)
//! - `RESEND_API_KEY` - Resend API key
//! - `MAIL_FROM` - Sender address
//! - `MAIL_TO` - Shop inbox receiving contact messages and order alerts
//! - `RESEND_API_URL` - API base (default: <https://api.resend.com>)
//!
//! ## Error tracking
//! - `SENTRY_DSN`, `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`, `SENTRY_TRACES_SAMPLE_RATE`

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const MIN_ADMIN_PASSWORD_LENGTH: usize = 12;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the site
    pub base_url: String,
    /// Shared admin panel password
    pub admin_password: SecretString,
    /// Bearer token for the seeding endpoint
    pub seed_token: Option<SecretString>,
    /// Hero slides JSON file on disk
    pub hero_config_path: PathBuf,
    /// Markdown content directory
    pub content_dir: PathBuf,
    /// Static assets directory
    pub static_dir: PathBuf,
    /// Zoho Inventory configuration
    pub zoho: ZohoConfig,
    /// GitHub publishing for the hero file
    pub github: Option<GitHubConfig>,
    /// Transactional mailer
    pub mailer: Option<MailerConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Zoho Inventory endpoints and credentials.
#[derive(Debug, Clone)]
pub struct ZohoConfig {
    /// OAuth accounts server base URL
    pub accounts_url: String,
    /// Inventory API base URL
    pub api_url: String,
    /// Credentials; `None` means the site runs on the static catalog
    pub credentials: Option<ZohoCredentials>,
}

/// Zoho OAuth credentials.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct ZohoCredentials {
    pub client_id: String,
    pub client_secret: SecretString,
    pub refresh_token: SecretString,
    pub organization_id: String,
}

impl std::fmt::Debug for ZohoCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZohoCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("organization_id", &self.organization_id)
            .finish()
    }
}

/// GitHub contents API configuration for publishing the hero file.
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub api_url: String,
    pub token: SecretString,
    /// Repository as `owner/name`
    pub repo: String,
    pub branch: String,
    /// Path of the hero file inside the repository
    pub path: String,
}

/// Resend mailer configuration.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    pub api_url: String,
    pub api_key: SecretString,
    pub from_address: String,
    /// Shop inbox for contact messages and order alerts
    pub shop_address: String,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("WATCHPOST_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("WATCHPOST_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("WATCHPOST_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("WATCHPOST_PORT".to_string(), e.to_string()))?;
        let base_url = get_url_or_default("WATCHPOST_BASE_URL", "http://localhost:3000")?;

        let admin_password = SecretString::from(get_required_env("ADMIN_PASSWORD")?);
        validate_admin_password(&admin_password, "ADMIN_PASSWORD")?;

        let seed_token = get_optional_validated_secret("SEED_TOKEN")?;

        Ok(Self {
            host,
            port,
            base_url,
            admin_password,
            seed_token,
            hero_config_path: PathBuf::from(get_env_or_default(
                "HERO_CONFIG_PATH",
                "crates/storefront/content/hero.json",
            )),
            content_dir: PathBuf::from(get_env_or_default(
                "CONTENT_DIR",
                "crates/storefront/content",
            )),
            static_dir: PathBuf::from(get_env_or_default("STATIC_DIR", "crates/storefront/static")),
            zoho: ZohoConfig::from_env()?,
            github: GitHubConfig::from_env()?,
            mailer: MailerConfig::from_env()?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: get_rate("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: get_rate("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the site is served over HTTPS (controls the `Secure` cookie flag).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl ZohoConfig {
    /// Load the Zoho configuration.
    ///
    /// Credentials are only read when `ZOHO_REFRESH_TOKEN` is present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the refresh token is set but other
    /// credentials are missing or insecure, or a URL is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let accounts_url = get_url_or_default("ZOHO_ACCOUNTS_URL", "https://accounts.zoho.com")?;
        let api_url = get_url_or_default("ZOHO_API_URL", "https://www.zohoapis.com/inventory/v1")?;

        let credentials = match get_optional_env("ZOHO_REFRESH_TOKEN") {
            Some(refresh_token) => Some(ZohoCredentials {
                client_id: get_required_env("ZOHO_CLIENT_ID")?,
                client_secret: get_validated_secret("ZOHO_CLIENT_SECRET")?,
                refresh_token: SecretString::from(refresh_token),
                organization_id: get_required_env("ZOHO_ORGANIZATION_ID")?,
            }),
            None => None,
        };

        Ok(Self {
            accounts_url,
            api_url,
            credentials,
        })
    }
}

impl GitHubConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(token) = get_optional_validated_secret("GITHUB_TOKEN")? else {
            return Ok(None);
        };

        let repo = get_required_env("GITHUB_REPO")?;
        if repo.split('/').filter(|part| !part.is_empty()).count() != 2 {
            return Err(ConfigError::InvalidEnvVar(
                "GITHUB_REPO".to_string(),
                "expected owner/name".to_string(),
            ));
        }

        Ok(Some(Self {
            api_url: get_url_or_default("GITHUB_API_URL", "https://api.github.com")?,
            token,
            repo,
            branch: get_env_or_default("GITHUB_BRANCH", "main"),
            path: get_env_or_default("GITHUB_HERO_PATH", "crates/storefront/content/hero.json"),
        }))
    }
}

impl MailerConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(api_key) = get_optional_validated_secret("RESEND_API_KEY")? else {
            return Ok(None);
        };

        Ok(Some(Self {
            api_url: get_url_or_default("RESEND_API_URL", "https://api.resend.com")?,
            api_key,
            from_address: get_required_env("MAIL_FROM")?,
            shop_address: get_required_env("MAIL_TO")?,
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable (blank counts as unset).
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Get a URL from the environment, validated and without a trailing slash.
fn get_url_or_default(key: &str, default: &str) -> Result<String, ConfigError> {
    let value = get_env_or_default(key, default);
    Url::parse(&value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    Ok(value.trim_end_matches('/').to_string())
}

/// Get a sampling rate in `0.0..=1.0`.
fn get_rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    let Some(value) = get_optional_env(key) else {
        return Ok(default);
    };
    let rate = value
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be between 0.0 and 1.0".to_string(),
        ));
    }
    Ok(rate)
}

/// Validate the admin password: minimum length and no placeholder text.
fn validate_admin_password(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.chars().count() < MIN_ADMIN_PASSWORD_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_ADMIN_PASSWORD_LENGTH,
                value.chars().count()
            ),
        ));
    }
    check_placeholder(value, var_name)
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

fn check_placeholder(value: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = value.to_lowercase();
    match PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        Some(pattern) => Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        )),
        None => Ok(()),
    }
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    check_placeholder(secret, var_name)?;

    // Real API keys and tokens have high entropy
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a required secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

/// Load and validate an optional secret from environment.
fn get_optional_validated_secret(key: &str) -> Result<Option<SecretString>, ConfigError> {
    get_optional_env(key)
        .map(|value| {
            validate_secret_strength(&value, key)?;
            Ok(SecretString::from(value))
        })
        .transpose()
}
