//! Load a configuration, pick color and seating, and add to cart.

use std::sync::Arc;

use anyhow::{bail, Context as _, Result};
use console::Term;
use dialoguer::Select;
use seating_core::catalog::{CatalogSource, SupplementalConfig};
use seating_core::configurator::{Configurator, ConfiguratorView, ReadyView, Services};
use seating_core::memory::StaticCatalogSource;
use seating_core::props::ConfiguratorProps;
use seating_core::submission::{CartAddition, Navigator, SubmissionOutcome};
use seating_core::ConfigId;
use seating_data::{HttpCartService, HttpCatalogSource};
use tracing::info;

use super::ConfigureArgs;
use crate::context::Context;
use crate::output::{status_badge, Output};

/// Reports the post-submit navigation target instead of following it.
struct TerminalNavigator {
    output: Output,
}

impl Navigator for TerminalNavigator {
    fn navigate_to(&self, path: &str) {
        self.output.info(&format!("Continue at {}", path));
    }
}

/// A choice offered to the shopper.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Choice {
    value: String,
    title: String,
}

/// Run the configure command.
pub async fn run(args: ConfigureArgs, ctx: &Context) -> Result<()> {
    let props_path = ctx.resolve_path(&args.props);
    let content = std::fs::read_to_string(&props_path)
        .with_context(|| format!("Failed to read props file: {}", props_path.display()))?;
    let mut props = ConfiguratorProps::from_json(&content)
        .with_context(|| format!("Failed to parse props file: {}", props_path.display()))?;
    if let Some(config_id) = args.config_id.clone() {
        props.config_id = ConfigId::new(config_id);
    }
    if props.config_id.is_blank() {
        bail!("Props carry no configuration id");
    }

    let settings = ctx.config.settings(props.currency()?)?;
    let services = Services {
        catalog: catalog_source(&args, &props, ctx)?,
        cart: Arc::new(
            HttpCartService::new(ctx.client()).with_timeout(ctx.config.api.submit_timeout()),
        ),
        navigator: Arc::new(TerminalNavigator {
            output: ctx.output.clone(),
        }),
    };
    let configurator = Configurator::new(props, services, settings)?;

    let spinner = ctx.output.spinner("Loading configurations...");
    configurator.load_catalog().await;
    spinner.finish_and_clear();

    let catalog = match configurator.view() {
        ConfiguratorView::Ready(_) => configurator.catalog().unwrap_or_default(),
        ConfiguratorView::Loading { message, .. } | ConfiguratorView::Unavailable { message, .. } => {
            bail!("{}", message)
        }
    };
    configurator.seed_defaults();

    let colors = color_choices(&configurator.props());
    let seating = seating_choices(&catalog);
    let interactive = args.interactive && !ctx.output.is_json();
    if interactive && !Term::stdout().is_term() {
        bail!("--interactive needs a terminal");
    }

    let color = match (&args.color, interactive) {
        (Some(value), _) => Some(validate_choice("color", value, &colors)?),
        (None, true) => prompt("Color", &colors, configurator.selection().color())?,
        (None, false) => None,
    };
    if let Some(color) = color {
        configurator.select_color(color);
    }

    let seating_option = match (&args.seating, interactive) {
        (Some(value), _) => Some(validate_choice("seating option", value, &seating)?),
        (None, true) => prompt(
            "Seating",
            &seating,
            configurator.selection().seating_option(),
        )?,
        (None, false) => None,
    };
    if let Some(seating_option) = seating_option {
        configurator.select_seating(seating_option);
    }

    if let ConfiguratorView::Ready(view) = configurator.view() {
        render(&ctx.output, &view);
    }

    if args.dry_run {
        let selection = configurator.selection();
        match (selection.color(), selection.seating_option()) {
            (Some(color), Some(seating)) => {
                let addition =
                    CartAddition::single(configurator.config_id(), color, seating);
                if ctx.output.is_json() {
                    ctx.output.json(&addition);
                } else {
                    ctx.output.info("Dry run, cart not called");
                    ctx.output.kv("Payload", &serde_json::to_string(&addition)?);
                }
                return Ok(());
            }
            _ => bail!("{}", seating_core::submission::SELECT_BOTH_MESSAGE),
        }
    }

    let spinner = ctx.output.spinner(seating_core::configurator::ADDING_TO_CART_LABEL);
    let outcome = configurator.add_to_cart().await;
    spinner.finish_and_clear();

    let state = configurator.submission().state();
    ctx.output
        .debug(&format!("Submission {}", status_badge(&state)));
    info!(state = state.as_str(), "submission finished");

    match outcome {
        SubmissionOutcome::Succeeded => {
            if ctx.output.is_json() {
                ctx.output.json(&serde_json::json!({
                    "status": state.as_str(),
                    "configId": configurator.config_id(),
                    "selection": configurator.selection(),
                    "cartPath": configurator.settings().cart_path,
                }));
            } else {
                ctx.output.success("Added to cart");
            }
            Ok(())
        }
        SubmissionOutcome::Failed { reason } => bail!("{}", reason),
        SubmissionOutcome::Rejected(rejection) => bail!("{}", rejection),
        SubmissionOutcome::Pending => bail!("Submission did not finish"),
    }
}

fn catalog_source(
    args: &ConfigureArgs,
    props: &ConfiguratorProps,
    ctx: &Context,
) -> Result<Arc<dyn CatalogSource>> {
    match &args.catalog {
        Some(path) => {
            let path = ctx.resolve_path(path);
            let bytes = std::fs::read(&path)
                .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;
            let config = SupplementalConfig::from_json(&bytes)
                .with_context(|| format!("Invalid catalog file: {}", path.display()))?;
            ctx.output
                .debug(&format!("Using local catalog {}", path.display()));
            Ok(Arc::new(
                StaticCatalogSource::new().with_config(props.config_id.clone(), config),
            ))
        }
        None => Ok(Arc::new(
            HttpCatalogSource::new(ctx.client()).with_timeout(ctx.config.api.fetch_timeout()),
        )),
    }
}

/// Colors with titles, falling back to the bare product collection.
fn color_choices(props: &ConfiguratorProps) -> Vec<Choice> {
    if !props.colors_data.is_empty() {
        return props
            .colors_data
            .iter()
            .map(|c| Choice {
                value: c.value.clone(),
                title: c.title.clone(),
            })
            .collect();
    }
    props
        .seating
        .option1_options_collection
        .iter()
        .map(|o| Choice {
            value: o.value.clone(),
            title: o.value.clone(),
        })
        .collect()
}

fn seating_choices(catalog: &SupplementalConfig) -> Vec<Choice> {
    catalog
        .seating_options
        .iter()
        .map(|o| Choice {
            value: o.value.clone(),
            title: o.title.clone(),
        })
        .collect()
}

fn validate_choice(field: &str, value: &str, choices: &[Choice]) -> Result<String> {
    if choices.iter().any(|c| c.value == value) {
        return Ok(value.to_string());
    }
    let known: Vec<&str> = choices.iter().map(|c| c.value.as_str()).collect();
    bail!("Unknown {} '{}' (expected one of: {})", field, value, known.join(", "))
}

fn prompt(label: &str, choices: &[Choice], current: Option<&str>) -> Result<Option<String>> {
    if choices.is_empty() {
        return Ok(None);
    }
    let items: Vec<String> = choices
        .iter()
        .map(|c| format!("{} ({})", c.title, c.value))
        .collect();
    let default = current
        .and_then(|value| choices.iter().position(|c| c.value == value))
        .unwrap_or(0);

    let index = Select::new()
        .with_prompt(label)
        .items(&items)
        .default(default)
        .interact()?;
    Ok(Some(choices[index].value.clone()))
}

fn render(output: &Output, view: &ReadyView) {
    if output.is_json() {
        return;
    }
    if let Some(title) = &view.title {
        output.header(title);
    }

    output.kv("Color", "");
    for color in &view.colors {
        output.list_item(&color.title, view.selection.color() == Some(color.value.as_str()));
    }
    output.kv("Seating", "");
    for option in &view.seating_options {
        output.list_item(
            &option.title,
            view.selection.seating_option() == Some(option.value.as_str()),
        );
    }
    if let Some(error) = &view.error {
        output.warn(error);
    }
    output.kv("Button", &view.button_label);
}
