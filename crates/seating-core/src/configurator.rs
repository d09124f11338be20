//! The configurator: render inputs, catalog, selection and submission in one
//! owner, plus a framework-independent view of what to display.
//!
//! Lifecycle effects are explicit calls. The host calls
//! [`Configurator::set_config_id`] (or [`Configurator::load_catalog`]) when
//! the configuration id changes and [`Configurator::seed_defaults`] once the
//! option collections are available.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::catalog::{
    CatalogLoader, CatalogSource, ColorOption, LoadState, LoadTicket, SeatingOption,
    SupplementalConfig,
};
use crate::error::{ConfiguratorError, SourceError};
use crate::ids::ConfigId;
use crate::pricing::{PriceQuote, ProtectionPlanSchedule};
use crate::props::{ConfiguratorProps, SeatingCollections};
use crate::selection::{ConfigurationSelection, SelectionStore, SelectionUpdate};
use crate::submission::{
    CartService, Navigator, SubmissionController, SubmissionOutcome, DEFAULT_CART_PATH,
    DEFAULT_SUBMIT_TIMEOUT,
};

pub const LOADING_MESSAGE: &str = "Loading configurations...";
pub const NO_DATA_MESSAGE: &str = "No configuration data available";
pub const ADDING_TO_CART_LABEL: &str = "Adding to Cart...";

/// Default bound on the catalog fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// External collaborators.
#[derive(Clone)]
pub struct Services {
    pub catalog: Arc<dyn CatalogSource>,
    pub cart: Arc<dyn CartService>,
    pub navigator: Arc<dyn Navigator>,
}

/// Tunables, usually loaded from the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguratorSettings {
    pub fetch_timeout: Duration,
    pub submit_timeout: Duration,
    pub cart_path: String,
    pub schedule: ProtectionPlanSchedule,
}

impl Default for ConfiguratorSettings {
    fn default() -> Self {
        Self {
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            submit_timeout: DEFAULT_SUBMIT_TIMEOUT,
            cart_path: DEFAULT_CART_PATH.to_string(),
            schedule: ProtectionPlanSchedule::default(),
        }
    }
}

/// What the host should display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConfiguratorView {
    Loading {
        title: Option<String>,
        message: String,
    },
    Ready(ReadyView),
    Unavailable {
        title: Option<String>,
        message: String,
    },
}

/// Display state once the catalog is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadyView {
    pub title: Option<String>,
    pub colors: Vec<ColorOption>,
    pub seating_options: Vec<SeatingOption>,
    pub selection: ConfigurationSelection,
    pub error: Option<String>,
    pub button_label: String,
    /// The add-to-cart action is disabled.
    pub busy: bool,
}

/// Owns the configurator state.
///
/// Every method takes `&self`: a pending [`Configurator::add_to_cart`] does
/// not block catalog updates or selection changes. Locks are never held
/// across an await.
pub struct Configurator {
    props: Mutex<ConfiguratorProps>,
    settings: ConfiguratorSettings,
    catalog: Arc<dyn CatalogSource>,
    loader: Mutex<CatalogLoader>,
    selection: Mutex<SelectionStore>,
    submission: SubmissionController,
}

impl Configurator {
    /// Build a configurator. Fails when the price inputs cannot be
    /// represented (unknown currency, non-finite amounts).
    pub fn new(
        props: ConfiguratorProps,
        services: Services,
        settings: ConfiguratorSettings,
    ) -> Result<Self, ConfiguratorError> {
        for amount in [props.base_price()?, props.fee_basis()?] {
            if amount.is_negative() {
                return Err(ConfiguratorError::InvalidAmount(amount.display()));
            }
        }

        let submission = SubmissionController::new(services.cart, services.navigator)
            .with_cart_path(settings.cart_path.clone())
            .with_timeout(settings.submit_timeout);

        Ok(Self {
            props: Mutex::new(props),
            settings,
            catalog: services.catalog,
            loader: Mutex::new(CatalogLoader::new()),
            selection: Mutex::new(SelectionStore::new()),
            submission,
        })
    }

    fn lock_props(&self) -> MutexGuard<'_, ConfiguratorProps> {
        self.props.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_loader(&self) -> MutexGuard<'_, CatalogLoader> {
        self.loader.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_selection(&self) -> MutexGuard<'_, SelectionStore> {
        self.selection.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the render inputs.
    pub fn props(&self) -> ConfiguratorProps {
        self.lock_props().clone()
    }

    pub fn config_id(&self) -> ConfigId {
        self.lock_props().config_id.clone()
    }

    pub fn settings(&self) -> &ConfiguratorSettings {
        &self.settings
    }

    pub fn selection(&self) -> ConfigurationSelection {
        self.lock_selection().selection().clone()
    }

    pub fn load_state(&self) -> LoadState {
        self.lock_loader().state().clone()
    }

    /// Loaded catalog, if any.
    pub fn catalog(&self) -> Option<SupplementalConfig> {
        self.lock_loader().config().cloned()
    }

    pub fn submission(&self) -> &SubmissionController {
        &self.submission
    }

    /// Catalog source, for owners that run the fetch themselves.
    pub fn catalog_source(&self) -> Arc<dyn CatalogSource> {
        Arc::clone(&self.catalog)
    }

    /// The configuration id changed. Returns a ticket when a fetch is needed.
    pub fn set_config_id(&self, config_id: ConfigId) -> Option<LoadTicket> {
        self.lock_props().config_id = config_id.clone();
        self.lock_loader().begin(config_id)
    }

    /// Hand a fetch result back. Results for superseded ids are dropped.
    pub fn apply_catalog(
        &self,
        ticket: LoadTicket,
        result: Result<SupplementalConfig, SourceError>,
    ) -> bool {
        self.lock_loader().complete(ticket, result)
    }

    /// Fetch the catalog for the current id, if not already requested.
    /// Returns whether a result was applied.
    pub async fn load_catalog(&self) -> bool {
        let ticket = self.lock_loader().begin(self.config_id());
        match ticket {
            Some(ticket) => self.run_fetch(ticket).await,
            None => false,
        }
    }

    /// Refetch after a failure.
    pub async fn retry_catalog(&self) -> bool {
        let ticket = self.lock_loader().retry();
        match ticket {
            Some(ticket) => self.run_fetch(ticket).await,
            None => false,
        }
    }

    async fn run_fetch(&self, ticket: LoadTicket) -> bool {
        let source = self.catalog_source();
        let result = ticket.fetch(source.as_ref(), self.settings.fetch_timeout).await;
        self.apply_catalog(ticket, result)
    }

    /// Seed the selection from the first entries of the option collections.
    pub fn seed_defaults(&self) -> bool {
        let defaults = self.lock_props().seating.defaults();
        self.lock_selection().seed(&defaults)
    }

    /// The option collections changed; seeds any field still unset.
    pub fn set_seating_collections(&self, seating: SeatingCollections) -> bool {
        self.lock_props().seating = seating;
        self.seed_defaults()
    }

    pub fn select_color(&self, value: impl Into<String>) {
        self.update_selection(SelectionUpdate::color(value));
    }

    pub fn select_seating(&self, value: impl Into<String>) {
        self.update_selection(SelectionUpdate::seating_option(value));
    }

    pub fn update_selection(&self, update: SelectionUpdate) {
        self.lock_selection().update(update);
    }

    /// Submit the current selection for the current configuration id.
    ///
    /// Both are read when the call starts; later changes do not affect the
    /// addition in flight.
    pub async fn add_to_cart(&self) -> SubmissionOutcome {
        let selection = self.selection();
        let config_id = self.config_id();
        self.submission.submit(&selection, &config_id).await
    }

    /// Base price and protection-plan fee basis.
    pub fn quote(&self) -> Result<PriceQuote<'_>, ConfiguratorError> {
        let (base_price, fee_basis) = {
            let props = self.lock_props();
            (props.base_price()?, props.fee_basis()?)
        };
        Ok(PriceQuote::new(base_price, fee_basis, &self.settings.schedule))
    }

    pub fn view(&self) -> ConfiguratorView {
        let (title, colors) = {
            let props = self.lock_props();
            (props.title().map(str::to_string), props.colors_data.clone())
        };
        match self.load_state() {
            LoadState::Loading => ConfiguratorView::Loading {
                title,
                message: LOADING_MESSAGE.to_string(),
            },
            LoadState::Loaded(config) => {
                let busy = self.submission.is_busy();
                ConfiguratorView::Ready(ReadyView {
                    title,
                    colors,
                    seating_options: config.seating_options,
                    selection: self.selection(),
                    error: self.submission.message(),
                    button_label: self.button_label(busy),
                    busy,
                })
            }
            LoadState::Failed { message } => ConfiguratorView::Unavailable { title, message },
            LoadState::Idle => ConfiguratorView::Unavailable {
                title,
                message: NO_DATA_MESSAGE.to_string(),
            },
        }
    }

    fn button_label(&self, busy: bool) -> String {
        if busy {
            return ADDING_TO_CART_LABEL.to_string();
        }
        match self.quote().and_then(|quote| quote.display_total()) {
            Ok(total) => format!("Add to Cart - {}", total),
            Err(e) => {
                debug!(error = %e, "total unavailable");
                "Add to Cart".to_string()
            }
        }
    }
}
