//! Push the static catalog into Zoho Inventory.

use tracing::{error, info};
use watchpost_storefront::services::seed_catalog;

use super::{CommandError, inventory_client};

/// Create every catalog product in Zoho.
///
/// Running it twice creates duplicates; Zoho does not deduplicate by name.
///
/// # Errors
///
/// Returns an error if Zoho is not configured or any product fails.
pub async fn catalog() -> Result<(), CommandError> {
    let client = inventory_client()?;

    info!("Seeding static catalog into Zoho Inventory");
    let report = seed_catalog(&client).await?;

    for name in &report.created {
        info!(product = %name, "Created");
    }
    for failure in &report.failed {
        error!(product = %failure.name, error = %failure.error, "Failed");
    }

    info!(
        created = report.created.len(),
        failed = report.failed.len(),
        "Seeding finished"
    );

    if report.failed.is_empty() {
        Ok(())
    } else {
        Err(CommandError::SeedFailures(report.failed.len()))
    }
}
