//! Catalog loading with discard-on-arrival for superseded requests.
//!
//! The owner calls [`CatalogLoader::begin`] whenever the configuration id may
//! have changed, awaits [`LoadTicket::fetch`] without holding the loader, and
//! hands the result back through [`CatalogLoader::complete`]. Each `begin`
//! bumps a generation counter; a result whose ticket is no longer current is
//! dropped, so the state always belongs to the most recently requested id.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::SupplementalConfig;
use crate::error::SourceError;
use crate::ids::ConfigId;

/// Message surfaced when the catalog cannot be fetched.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch additional configuration data";

/// Fetches the supplementary configuration for an id.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_config(&self, config_id: &ConfigId) -> Result<SupplementalConfig, SourceError>;
}

/// Loader state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded(SupplementalConfig),
    Failed { message: String },
}

impl LoadState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadState::Idle => "idle",
            LoadState::Loading => "loading",
            LoadState::Loaded(_) => "loaded",
            LoadState::Failed { .. } => "failed",
        }
    }
}

/// Claim on one fetch. Only the ticket from the latest `begin` may apply
/// its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    config_id: ConfigId,
    generation: u64,
}

impl LoadTicket {
    pub fn config_id(&self) -> &ConfigId {
        &self.config_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Run the fetch with a bounded timeout. An elapsed timeout is reported
    /// as [`SourceError::Timeout`].
    pub async fn fetch(
        &self,
        source: &dyn CatalogSource,
        timeout: Duration,
    ) -> Result<SupplementalConfig, SourceError> {
        debug!(config_id = %self.config_id, generation = self.generation, "fetching catalog");
        match tokio::time::timeout(timeout, source.fetch_config(&self.config_id)).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout(timeout)),
        }
    }
}

/// Tracks the catalog for the current configuration id.
#[derive(Debug, Default)]
pub struct CatalogLoader {
    config_id: Option<ConfigId>,
    generation: u64,
    state: LoadState,
}

impl CatalogLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading `config_id`.
    ///
    /// Returns `None` when that id is already loading, loaded or failed:
    /// a fetch happens once per distinct id. Any ticket issued earlier
    /// becomes stale.
    pub fn begin(&mut self, config_id: ConfigId) -> Option<LoadTicket> {
        if self.config_id.as_ref() == Some(&config_id) && self.state != LoadState::Idle {
            debug!(config_id = %config_id, state = self.state.as_str(), "catalog already requested");
            return None;
        }
        Some(self.issue(config_id))
    }

    /// Refetch the current id after a failure. Never called automatically.
    pub fn retry(&mut self) -> Option<LoadTicket> {
        match (&self.state, self.config_id.clone()) {
            (LoadState::Failed { .. }, Some(config_id)) => Some(self.issue(config_id)),
            _ => None,
        }
    }

    fn issue(&mut self, config_id: ConfigId) -> LoadTicket {
        self.generation += 1;
        self.config_id = Some(config_id.clone());
        self.state = LoadState::Loading;
        info!(config_id = %config_id, generation = self.generation, "catalog load started");
        LoadTicket {
            config_id,
            generation: self.generation,
        }
    }

    /// Apply a fetch result. Returns `false` when the ticket was superseded
    /// and the result was discarded.
    pub fn complete(
        &mut self,
        ticket: LoadTicket,
        result: Result<SupplementalConfig, SourceError>,
    ) -> bool {
        if ticket.generation != self.generation {
            debug!(
                config_id = %ticket.config_id,
                generation = ticket.generation,
                current = self.generation,
                "discarding stale catalog result"
            );
            return false;
        }

        match result.and_then(|config| config.validate().map(|()| config)) {
            Ok(config) => {
                info!(
                    config_id = %ticket.config_id,
                    seating_options = config.seating_options.len(),
                    "catalog loaded"
                );
                self.state = LoadState::Loaded(config);
            }
            Err(e) => {
                warn!(config_id = %ticket.config_id, error = %e, "catalog fetch failed");
                self.state = LoadState::Failed {
                    message: FETCH_FAILED_MESSAGE.to_string(),
                };
            }
        }
        true
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn config_id(&self) -> Option<&ConfigId> {
        self.config_id.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    /// Loaded catalog, if any.
    pub fn config(&self) -> Option<&SupplementalConfig> {
        match &self.state {
            LoadState::Loaded(config) => Some(config),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed { message } => Some(message),
            _ => None,
        }
    }
}
