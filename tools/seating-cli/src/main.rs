//! Seating CLI - drive the seating configurator from a terminal.
//!
//! Commands:
//! - `seating price` - Compute a protection-plan total
//! - `seating catalog` - Fetch the seating options for a configuration id
//! - `seating configure` - Load, select and add to cart
//! - `seating config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{CatalogArgs, ConfigArgs, ConfigureArgs, PriceArgs};
use config::{LogFormat, LoggingConfig};

/// Seating CLI - Configure seating products and add them to the cart
#[derive(Parser)]
#[command(name = "seating")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Environment whose overrides apply
    #[arg(short, long, global = true)]
    env: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the total for a base price and fee basis
    Price(PriceArgs),

    /// Fetch seating options for a configuration id
    Catalog(CatalogArgs),

    /// Configure a product and add it to the cart
    Configure(ConfigureArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);

    let ctx = context::Context::load(cli.config.as_deref(), cli.env.as_deref(), output)?;
    init_logging(&ctx.config.logging, cli.verbose);

    let result = match cli.command {
        Commands::Price(args) => commands::price::run(args, &ctx).await,
        Commands::Catalog(args) => commands::catalog::run(args, &ctx).await,
        Commands::Configure(args) => commands::configure::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

/// Logs go to stderr so stdout stays parseable in `--json` mode.
fn init_logging(logging: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match logging.format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Pretty => subscriber.pretty().init(),
        LogFormat::Compact => subscriber.compact().init(),
    }
}
