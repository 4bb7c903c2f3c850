//! Hero carousel persistence.
//!
//! Slides live in a JSON file on disk that is rewritten wholesale on every
//! save. When GitHub publishing is configured the same content is committed
//! to the repository so the change survives redeploys.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};
use watchpost_core::{HeroSlide, Product};

use crate::services::GitHubClient;

/// Errors reading or writing the hero file.
#[derive(Debug, Error)]
pub enum HeroStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid hero file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result of a successful local save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Commit SHA when the file was published to GitHub.
    pub commit: Option<String>,
    /// Publishing failure, reported alongside the successful local save.
    pub warning: Option<String>,
}

/// Reads and writes the hero slides file.
pub struct HeroStore {
    path: PathBuf,
    github: Option<GitHubClient>,
    /// Serializes saves so two editors never interleave writes.
    write_lock: Mutex<()>,
}

impl HeroStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, github: Option<GitHubClient>) -> Self {
        Self {
            path: path.into(),
            github,
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load slides. A missing file is an empty carousel.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a slide array.
    pub async fn load(&self) -> Result<Vec<HeroSlide>, HeroStoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Fill empty slide fields from their products, write the file, then publish.
    ///
    /// Only slides whose product differs from the last saved version are
    /// filled, so a field the editor cleared on purpose stays empty. Slides
    /// are updated in place so the caller can re-render what was saved.
    ///
    /// # Errors
    ///
    /// Returns an error only if the local write fails. Publishing failures
    /// are returned as [`SaveOutcome::warning`].
    #[instrument(skip(self, slides, products), fields(slides = slides.len()))]
    pub async fn save(
        &self,
        slides: &mut [HeroSlide],
        products: &[Product],
    ) -> Result<SaveOutcome, HeroStoreError> {
        let _guard = self.write_lock.lock().await;

        let saved = self.load().await.unwrap_or_else(|e| {
            warn!(error = %e, "Ignoring unreadable hero file when filling slides");
            Vec::new()
        });
        for slide in slides.iter_mut() {
            let product_unchanged = saved
                .iter()
                .any(|s| s.id == slide.id && s.product_id == slide.product_id);
            if product_unchanged {
                continue;
            }
            if let Some(product) = products.iter().find(|p| p.id == slide.product_id) {
                slide.fill_from_product(product);
            }
        }

        let mut json = serde_json::to_string_pretty(&slides)?;
        json.push('\n');

        self.write_file(&json).await?;
        info!(path = %self.path.display(), "Hero slides saved");

        let Some(github) = &self.github else {
            return Ok(SaveOutcome::default());
        };

        match github.publish(&json, "Update homepage hero slides").await {
            Ok(commit) => Ok(SaveOutcome {
                commit: Some(commit),
                warning: None,
            }),
            Err(e) => {
                warn!(error = %e, "Failed to publish hero slides to GitHub");
                Ok(SaveOutcome {
                    commit: None,
                    warning: Some(format!(
                        "Saved locally, but publishing to GitHub failed: {e}"
                    )),
                })
            }
        }
    }

    /// Write via a sibling temp file and rename so readers never see a partial file.
    async fn write_file(&self, json: &str) -> Result<(), HeroStoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use watchpost_core::catalog;

    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = HeroStore::new(dir.path().join("hero.json"), None);
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_fills_and_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let store = HeroStore::new(dir.path().join("content/hero.json"), None);
        let product = &catalog::products()[0];

        let mut typed = HeroSlide::new(product.id.clone());
        typed.custom_title = Some("Spring Install Special".to_string());
        let mut slides = vec![typed, HeroSlide::new("unknown-product")];

        let outcome = store.save(&mut slides, catalog::products()).await.unwrap();
        assert_eq!(outcome, SaveOutcome::default());

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].custom_title.as_deref(), Some("Spring Install Special"));
        assert_eq!(
            loaded[0].custom_description.as_deref(),
            Some(product.description.as_str())
        );
        assert_eq!(loaded[0].image, product.image);
        // Unknown products are kept but not filled
        assert!(loaded[1].custom_title.is_none());
    }

    #[tokio::test]
    async fn test_cleared_field_stays_cleared_until_product_changes() {
        let dir = tempfile::tempdir().unwrap();
        let store = HeroStore::new(dir.path().join("hero.json"), None);
        let first = &catalog::products()[0];
        let second = &catalog::products()[1];

        let mut slides = vec![HeroSlide::new(first.id.clone())];
        store.save(&mut slides, catalog::products()).await.unwrap();
        assert_eq!(slides[0].custom_title.as_deref(), Some(first.name.as_str()));

        slides[0].custom_title = None;
        store.save(&mut slides, catalog::products()).await.unwrap();
        assert!(store.load().await.unwrap()[0].custom_title.is_none());

        slides[0].product_id.clone_from(&second.id);
        store.save(&mut slides, catalog::products()).await.unwrap();
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded[0].custom_title.as_deref(), Some(second.name.as_str()));
        // Text kept from the first product is not overwritten
        assert_eq!(
            loaded[0].custom_description.as_deref(),
            Some(first.description.as_str())
        );
    }

    #[tokio::test]
    async fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hero.json");
        std::fs::write(&path, "{\"not\": \"an array\"}").unwrap();

        let store = HeroStore::new(path, None);
        assert!(matches!(store.load().await, Err(HeroStoreError::Parse(_))));
    }

    #[tokio::test]
    async fn test_publish_failure_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let github = GitHubClient::new(&crate::config::GitHubConfig {
            api_url: "http://127.0.0.1:9".to_string(),
            token: secrecy::SecretString::from("ghp_test"),
            repo: "watchpost/site".to_string(),
            branch: "main".to_string(),
            path: "hero.json".to_string(),
        })
        .unwrap();
        let store = HeroStore::new(dir.path().join("hero.json"), Some(github));

        let mut slides = vec![HeroSlide::new("wp-nvr-16ch")];
        let outcome = store.save(&mut slides, catalog::products()).await.unwrap();

        assert!(outcome.commit.is_none());
        assert!(outcome.warning.unwrap().contains("publishing to GitHub failed"));
        assert_eq!(store.load().await.unwrap().len(), 1);
    }
}
