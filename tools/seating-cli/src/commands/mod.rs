//! CLI command implementations.

pub mod catalog;
pub mod config;
pub mod configure;
pub mod price;

use clap::{Args, Subcommand};

/// Arguments for the price command.
#[derive(Args)]
pub struct PriceArgs {
    /// Base price, e.g. 999.00.
    #[arg(long)]
    pub base: f64,

    /// Amount the protection-plan fee is derived from.
    #[arg(long)]
    pub fee_basis: f64,

    /// ISO currency code.
    #[arg(long, default_value = "USD")]
    pub currency: String,
}

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    /// Configuration id to fetch.
    pub config_id: String,

    /// Override the configured API base URL.
    #[arg(long)]
    pub base_url: Option<String>,
}

/// Arguments for the configure command.
#[derive(Args)]
pub struct ConfigureArgs {
    /// Render inputs (JSON) as passed by the product page.
    #[arg(short, long)]
    pub props: String,

    /// Read the seating options from a local JSON file instead of the API.
    #[arg(long)]
    pub catalog: Option<String>,

    /// Color value; defaults to the first color.
    #[arg(long)]
    pub color: Option<String>,

    /// Seating option value; defaults to the first seating entry.
    #[arg(long)]
    pub seating: Option<String>,

    /// Override the configuration id from the props.
    #[arg(long)]
    pub config_id: Option<String>,

    /// Prompt for color and seating.
    #[arg(short, long)]
    pub interactive: bool,

    /// Stop before the cart call.
    #[arg(long)]
    pub dry_run: bool,
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
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
