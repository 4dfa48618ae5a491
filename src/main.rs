// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wardrobe command-line client
//!
//! Signs in against the wardrobe backend, keeps credentials in the OS
//! keychain (falling back to a file in the home directory), and calls the item, analysis, outfit and metadata endpoints.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wardrobe_client::{
    config::Config,
    models::{ImageUpload, LoginRequest, MetadataKind},
    storage::{FileStore, KeyringStore},
    WardrobeClient,
};

#[derive(Parser, Debug)]
#[command(name = "wardrobe", about = "Smart wardrobe API client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store credentials
    Login {
        #[arg(long, env = "WARDROBE_EMAIL")]
        email: String,
        #[arg(long, env = "WARDROBE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and delete stored credentials
    Logout,
    /// Print the signed-in user id
    Whoami,
    /// List wardrobe items
    Items,
    /// Analyze a clothing photo
    Analyze { image: PathBuf },
    /// List saved outfits
    Outfits,
    /// Print a metadata table (categories, styles, seasons, occasions)
    Metadata { kind: MetadataKind },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::debug!(
        api = %config.api_base_url,
        keyring = %config.keyring_service,
        fallback = %config.credentials_path.display(),
        "Configuration loaded"
    );

    let store = Arc::new(KeyringStore::new(
        config.keyring_service.clone(),
        FileStore::new(config.credentials_path.clone()),
    ));
    let client = WardrobeClient::new(&config, store)?;

    match cli.command {
        Command::Login { email, password } => {
            let session = client.auth.login(&LoginRequest { email, password }).await?;
            match session.user_id {
                Some(id) => println!("Signed in as user {}", id),
                None => println!("Signed in"),
            }
        }
        Command::Logout => {
            client.auth.logout().await?;
            println!("Signed out");
        }
        Command::Whoami => match client.auth.current_user_id()? {
            Some(id) => println!("{}", id),
            None => println!("Not signed in"),
        },
        Command::Items => {
            for item in client.wardrobe.list_items().await? {
                println!(
                    "{:>6}  {:<30} {:<14} {:<10} {}",
                    item.id,
                    item.name,
                    item.category,
                    item.color,
                    item.added_on()
                );
            }
        }
        Command::Analyze { image } => {
            let bytes = tokio::fs::read(&image)
                .await
                .with_context(|| format!("Failed to read {}", image.display()))?;
            let file_name = image
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "upload.jpg".to_string());

            let attrs = client
                .wardrobe
                .analyze_image(ImageUpload::new(file_name, bytes))
                .await?;
            println!("{}", serde_json::to_string_pretty(&attrs)?);
            if let Some(rgb) = attrs.rgb() {
                println!("color: {}", rgb);
            }
        }
        Command::Outfits => {
            for outfit in client.wardrobe.list_outfits().await? {
                println!("{:>6}  {} ({} items)", outfit.id, outfit.name, outfit.item_ids.len());
            }
        }
        Command::Metadata { kind } => {
            for tag in client.wardrobe.metadata(kind).await? {
                println!("{:>6}  {}", tag.id, tag.name);
            }
        }
    }

    Ok(())
}

/// Initialize compact logging to stderr.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("wardrobe_client=info,warn"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
