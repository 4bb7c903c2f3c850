//! Command implementations.

pub mod hero;
pub mod seed;
pub mod token;

use thiserror::Error;
use watchpost_storefront::config::{ConfigError, ZohoConfig};
use watchpost_storefront::zoho::{InventoryClient, ZohoError};

/// Errors that end a command with a non-zero exit status.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Zoho error: {0}")]
    Zoho(#[from] ZohoError),

    #[error("Zoho is not configured: set ZOHO_REFRESH_TOKEN and the other ZOHO_* variables")]
    NotConfigured,

    #[error("Could not read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid hero file: {0}")]
    InvalidHero(#[from] serde_json::Error),

    #[error("{0} slide(s) link products that are not in the catalog")]
    UnknownProducts(usize),

    #[error("{0} product(s) failed to seed")]
    SeedFailures(usize),
}

/// Build a configured inventory client from the environment.
fn inventory_client() -> Result<InventoryClient, CommandError> {
    dotenvy::dotenv().ok();

    let client = InventoryClient::new(&ZohoConfig::from_env()?)?;
    if !client.is_configured() {
        return Err(CommandError::NotConfigured);
    }
    Ok(client)
}
