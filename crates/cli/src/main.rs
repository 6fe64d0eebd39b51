//! Shopfront CLI - Storefront client for the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Search for a product
//! shopfront search mug
//!
//! # Add two units of product 1 to the cart
//! shopfront add 1 --quantity 2
//!
//! # Interactive session (keeps one backend session, and so one cart)
//! shopfront shell
//!
//! # Talk to another backend and save the rendered page after each action
//! shopfront --base-url http://localhost:5000 --html page.html shell
//! ```
//!
//! # Commands
//!
//! - `search` - Search products by name
//! - `add` - Add a product to the cart
//! - `checkout` - Check out the cart
//! - `shell` - Interactive session
//!
//! Each one-shot command runs in a fresh backend session, so the cart only
//! persists within `shell`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shopfront_client::telemetry::{DEFAULT_LOG_FILTER, init_sentry, init_tracing};
use shopfront_client::{ClientConfig, PageController};
use shopfront_core::ProductId;

mod commands;

use commands::{Action, Session};

#[derive(Parser)]
#[command(name = "shopfront")]
#[command(author, version, about = "Storefront client: search, cart and checkout")]
struct Cli {
    /// Backend base URL (overrides `SHOPFRONT_BASE_URL`)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Write the rendered HTML page to this file after each action
    #[arg(long, global = true)]
    html: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search products by name
    Search {
        /// Product name
        query: String,
    },
    /// Add a product to the cart
    Add {
        /// Product ID from the search results
        product_id: ProductId,

        /// Number of units
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Check out the cart
    Checkout,
    /// Start an interactive session
    Shell,
}

#[tokio::main]
async fn main() {
    let result: Result<(), Box<dyn std::error::Error>> = run(Cli::parse()).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Tracing before config so config errors are logged; the Sentry layer
    // picks up the client once it is bound below
    init_tracing(DEFAULT_LOG_FILTER);

    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = cli.base_url.as_deref() {
        config = config.with_base_url(base_url)?;
    }

    let _sentry_guard = init_sentry(&config);

    tracing::debug!(base_url = %config.base_url, "Using backend");

    let page = PageController::connect(&config)?;
    let mut session = Session::new(page, cli.html);

    match cli.command {
        Commands::Search { query } => {
            session.perform(Action::Search(query)).await?;
        }
        Commands::Add {
            product_id,
            quantity,
        } => {
            session.perform(Action::Add(product_id, quantity)).await?;
        }
        Commands::Checkout => {
            session.perform(Action::Checkout).await?;
        }
        Commands::Shell => commands::shell::run(&mut session).await?,
    }
    Ok(())
}
