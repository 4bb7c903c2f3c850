//! Hero file validation.

use std::path::Path;

use tracing::{info, warn};
use watchpost_core::{HeroSlide, catalog, missing_products};

use super::CommandError;

/// Parse hero JSON and return the product ids the static catalog lacks.
///
/// # Errors
///
/// Returns an error if the JSON is not a slide array.
pub fn unknown_products(json: &str) -> Result<(usize, Vec<String>), CommandError> {
    let slides: Vec<HeroSlide> = serde_json::from_str(json)?;
    let missing = missing_products(&slides, catalog::products())
        .into_iter()
        .map(|s| s.product_id.clone())
        .collect();
    Ok((slides.len(), missing))
}

/// Validate a hero file.
///
/// # Errors
///
/// Returns an error if the file can't be read or parsed, or if any slide
/// links an unknown product.
pub async fn validate(path: &Path) -> Result<(), CommandError> {
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CommandError::Read {
            path: path.display().to_string(),
            source,
        })?;

    let (count, missing) = unknown_products(&json)?;
    info!(path = %path.display(), slides = count, "Parsed hero file");

    if missing.is_empty() {
        info!("Every slide links a catalog product");
        return Ok(());
    }

    for product_id in &missing {
        warn!(product_id = %product_id, "Slide links a product that is not in the catalog");
    }
    Err(CommandError::UnknownProducts(missing.len()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_unknown_products() {
        let json = r#"[
            {"id":"a","productId":"wp-cam-4mp-turret"},
            {"id":"b","productId":"wp-retired-cam"}
        ]"#;
        let (count, missing) = unknown_products(json).unwrap();
        assert_eq!(count, 2);
        assert_eq!(missing, vec!["wp-retired-cam"]);
    }

    #[test]
    fn test_rejects_non_array() {
        assert!(matches!(
            unknown_products(r#"{"slides":[]}"#),
            Err(CommandError::InvalidHero(_))
        ));
    }

    #[tokio::test]
    async fn test_validate_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id":"a","productId":"wp-nvr-16ch"}}]"#).unwrap();
        assert!(validate(file.path()).await.is_ok());

        let missing = Path::new("/nonexistent/hero.json");
        assert!(matches!(validate(missing).await, Err(CommandError::Read { .. })));
    }
}
