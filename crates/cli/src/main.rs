//! Watchpost CLI - operator tools for the inventory integration.
//!
//! # Usage
//!
//! ```bash
//! # Create every static catalog product in Zoho Inventory
//! wp-cli seed
//!
//! # Check the Zoho credentials with one token exchange
//! wp-cli token
//!
//! # Check a hero file against the static catalog
//! wp-cli hero validate crates/storefront/content/hero.json
//! ```
//!
//! # Commands
//!
//! - `seed` - Push the static catalog into Zoho
//! - `token` - Exchange the refresh token once and report the expiry
//! - `hero validate` - Parse a hero file and list unknown products

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "wp-cli")]
#[command(author, version, about = "Watchpost CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create every static catalog product in Zoho Inventory
    Seed,
    /// Exchange the Zoho refresh token once and report the result
    Token,
    /// Hero carousel file tools
    Hero {
        #[command(subcommand)]
        action: HeroAction,
    },
}

#[derive(Subcommand)]
enum HeroAction {
    /// Parse a hero file and report slides whose product is not in the catalog
    Validate {
        /// Path to the hero JSON file
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wp_cli=info,watchpost_storefront=info".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Seed => commands::seed::catalog().await,
        Commands::Token => commands::token::check().await,
        Commands::Hero { action } => match action {
            HeroAction::Validate { path } => commands::hero::validate(&path).await,
        },
    }
}
