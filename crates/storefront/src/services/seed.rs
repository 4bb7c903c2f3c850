//! Push the static catalog into Zoho Inventory.
//!
//! Used by `POST /api/seed` and `wp-cli seed`.

use serde::Serialize;
use tracing::{info, instrument, warn};
use watchpost_core::catalog;

use crate::zoho::{InventoryClient, ItemInput, ZohoError};

/// A product that could not be created.
#[derive(Debug, Clone, Serialize)]
pub struct SeedFailure {
    pub name: String,
    pub error: String,
}

/// Outcome of a seeding run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SeedReport {
    pub created: Vec<String>,
    pub failed: Vec<SeedFailure>,
}

/// Create every static catalog product in Zoho.
///
/// Failures are collected per product; the run never stops early.
///
/// # Errors
///
/// Returns `ZohoError::NotConfigured` if Zoho credentials are missing.
#[instrument(skip(client))]
pub async fn seed_catalog(client: &InventoryClient) -> Result<SeedReport, ZohoError> {
    if !client.is_configured() {
        return Err(ZohoError::NotConfigured);
    }

    let mut report = SeedReport::default();
    for product in catalog::products() {
        match client.create_item(&ItemInput::from(product)).await {
            Ok(_) => report.created.push(product.name.clone()),
            Err(e) => {
                warn!(product = %product.id, error = %e, "Failed to seed product");
                report.failed.push(SeedFailure {
                    name: product.name.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    info!(
        created = report.created.len(),
        failed = report.failed.len(),
        "Catalog seeding finished"
    );
    Ok(report)
}
