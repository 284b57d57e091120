//! CLI command implementations.

pub mod add;
pub mod classify;
pub mod config;
pub mod delete;
pub mod edit;
pub mod ingest;
pub mod list;
pub mod migrate;
pub mod reset;
pub mod show;

use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::Confirm;

use crate::context::Context;

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// Case-insensitive name filter.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only show one category (e.g. `cooking-oil`).
    #[arg(long)]
    pub category: Option<String>,

    /// Hide out-of-stock products.
    #[arg(long)]
    pub in_stock: bool,

    /// Minimum rating.
    #[arg(long)]
    pub min_rating: Option<f64>,

    /// Sort order: featured, price-asc, price-desc, name-asc, rating, discount.
    #[arg(long, default_value = "featured")]
    pub sort: String,

    /// Page number.
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Products per page.
    #[arg(long, default_value = "50")]
    pub per_page: usize,

    /// Show how many products each category holds.
    #[arg(long)]
    pub counts: bool,
}

/// Arguments for the show command.
#[derive(Args)]
pub struct ShowArgs {
    /// Product id.
    pub id: String,
}

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    /// Product name.
    pub name: String,

    /// Price in rupees.
    pub price: f64,

    /// Explicit id (generated when omitted).
    #[arg(long)]
    pub id: Option<String>,

    /// Category to use when the name is not recognized.
    #[arg(long)]
    pub category: Option<String>,

    /// Image URL.
    #[arg(long, default_value = "")]
    pub image: String,

    /// Rating, 0 to 5.
    #[arg(long, default_value = "0")]
    pub rating: f64,

    /// Discount percentage.
    #[arg(long, default_value = "0")]
    pub discount: u8,

    /// Mark the product as out of stock.
    #[arg(long)]
    pub out_of_stock: bool,
}

/// Arguments for the edit command.
#[derive(Args)]
pub struct EditArgs {
    /// Product id.
    pub id: String,

    /// New name.
    #[arg(long)]
    pub name: Option<String>,

    /// New price.
    #[arg(long)]
    pub price: Option<f64>,

    /// New category tag.
    #[arg(long)]
    pub category: Option<String>,

    /// New image URL.
    #[arg(long)]
    pub image: Option<String>,

    /// New rating.
    #[arg(long)]
    pub rating: Option<f64>,

    /// New discount percentage.
    #[arg(long)]
    pub discount: Option<u8>,

    /// Mark as in stock.
    #[arg(long, conflicts_with = "out_of_stock")]
    pub in_stock: bool,

    /// Mark as out of stock.
    #[arg(long)]
    pub out_of_stock: bool,
}

/// Arguments for the delete command.
#[derive(Args)]
pub struct DeleteArgs {
    /// Product ids.
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the classify command.
#[derive(Args)]
pub struct ClassifyArgs {
    /// Product names.
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Category to use when nothing matches.
    #[arg(short, long)]
    pub fallback: Option<String>,
}

/// Arguments for the ingest command.
#[derive(Args)]
pub struct IngestArgs {
    /// JSON array of scraped records.
    pub input: String,

    /// Write the resulting products to this file as a base catalog.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Add the resulting products to the overlay.
    #[arg(long)]
    pub add: bool,
}

/// Arguments for the migrate command.
#[derive(Args)]
pub struct MigrateArgs {
    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the reset command.
#[derive(Args)]
pub struct ResetArgs {
    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Get a config value.
    Get {
        /// Config key (dot-separated).
        key: String,
    },
    /// Set a config value.
    Set {
        /// Config key (dot-separated).
        key: String,
        /// Value to set.
        value: String,
    },
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}

/// Ask before a destructive change. `--yes` skips the prompt; JSON mode
/// never prompts and requires `--yes`.
pub(crate) fn confirm(ctx: &Context, yes: bool, prompt: &str) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    if ctx.output.is_json() {
        anyhow::bail!("Refusing to prompt in JSON mode; pass --yes to confirm");
    }
    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?;
    Ok(confirmed)
}
