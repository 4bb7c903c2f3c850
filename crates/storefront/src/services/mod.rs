//! Outbound integrations other than the inventory provider.
//!
//! - `github` - publishes the hero file through the contents API
//! - `mailer` - contact messages and order alerts via Resend
//! - `seed` - pushes the static catalog into Zoho

pub mod github;
pub mod mailer;
pub mod seed;

pub use github::{GitHubClient, GitHubError};
pub use mailer::{ContactMessage, Mailer, MailerError};
pub use seed::{SeedReport, seed_catalog};
