//! Fetch the seating options for a configuration id.

use anyhow::{bail, Result};
use seating_core::catalog::CatalogSource;
use seating_core::ConfigId;
use seating_data::HttpCatalogSource;

use super::CatalogArgs;
use crate::context::Context;

/// Run the catalog command.
pub async fn run(args: CatalogArgs, ctx: &Context) -> Result<()> {
    let config_id = ConfigId::new(args.config_id);
    if config_id.is_blank() {
        bail!("Configuration id must not be empty");
    }

    let mut client = ctx.client();
    if let Some(base_url) = args.base_url {
        client = client.with_base_url(base_url);
    }
    let source = HttpCatalogSource::new(client).with_timeout(ctx.config.api.fetch_timeout());
    ctx.output.debug(&format!("GET {}", source.url_for(&config_id)?));

    let spinner = ctx.output.spinner(&format!("Fetching configuration {}...", config_id));
    let result = source.fetch_config(&config_id).await;
    spinner.finish_and_clear();
    let config = result?;

    if ctx.output.is_json() {
        ctx.output.json(&config);
        return Ok(());
    }

    ctx.output.header(&format!("Seating options for {}", config_id));
    if config.is_empty() {
        ctx.output.warn("No seating options returned");
        return Ok(());
    }

    let width = config
        .seating_options
        .iter()
        .map(|option| option.value.len())
        .max()
        .unwrap_or(0)
        .max("VALUE".len());
    ctx.output.table_row(&["VALUE", "TITLE"], &[width, 0]);
    for option in &config.seating_options {
        ctx.output
            .table_row(&[option.value.as_str(), option.title.as_str()], &[width, 0]);
    }

    Ok(())
}
