//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::content::{ContentError, ContentStore};
use crate::hero::HeroStore;
use crate::services::{GitHubClient, GitHubError, Mailer, MailerError};
use crate::zoho::{InventoryClient, ZohoError};

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("inventory client: {0}")]
    Zoho(#[from] ZohoError),
    #[error("github client: {0}")]
    GitHub(#[from] GitHubError),
    #[error("mailer: {0}")]
    Mailer(#[from] MailerError),
    #[error("content: {0}")]
    Content(#[from] ContentError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the configuration and the outbound clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    inventory: InventoryClient,
    mailer: Option<Mailer>,
    hero: HeroStore,
    content: ContentStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Loads policy pages from `config.content_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if a client cannot be built or the content
    /// directory cannot be read.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let inventory = InventoryClient::new(&config.zoho)?;
        let github = config.github.as_ref().map(GitHubClient::new).transpose()?;
        let mailer = config.mailer.as_ref().map(Mailer::new).transpose()?;
        let hero = HeroStore::new(config.hero_config_path.clone(), github);
        let content = ContentStore::load(&config.content_dir)?;

        if !inventory.is_configured() {
            tracing::warn!("ZOHO_REFRESH_TOKEN not set, serving the static catalog");
        }

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                inventory,
                mailer,
                hero,
                content,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the Zoho Inventory client.
    #[must_use]
    pub fn inventory(&self) -> &InventoryClient {
        &self.inner.inventory
    }

    /// Get the mailer, if configured.
    #[must_use]
    pub fn mailer(&self) -> Option<&Mailer> {
        self.inner.mailer.as_ref()
    }

    #[must_use]
    pub fn hero(&self) -> &HeroStore {
        &self.inner.hero
    }

    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.inner.content
    }
}
