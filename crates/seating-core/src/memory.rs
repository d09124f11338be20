//! In-memory collaborators (for development/testing).

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::catalog::{CatalogSource, SupplementalConfig};
use crate::error::SourceError;
use crate::ids::ConfigId;
use crate::submission::{CartAddition, CartService, Navigator};

/// Catalog source backed by a fixed map.
#[derive(Debug, Default)]
pub struct StaticCatalogSource {
    configs: HashMap<ConfigId, SupplementalConfig>,
}

impl StaticCatalogSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config_id: impl Into<ConfigId>, config: SupplementalConfig) -> Self {
        self.configs.insert(config_id.into(), config);
        self
    }
}

#[async_trait]
impl CatalogSource for StaticCatalogSource {
    async fn fetch_config(&self, config_id: &ConfigId) -> Result<SupplementalConfig, SourceError> {
        self.configs
            .get(config_id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(config_id.to_string()))
    }
}

/// Cart that records every addition and can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingCart {
    failing: AtomicBool,
    additions: Mutex<Vec<CartAddition>>,
}

impl RecordingCart {
    pub fn succeeding() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let cart = Self::default();
        cart.set_failing(true);
        cart
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Release);
    }

    /// Every addition attempted, including failed ones.
    pub fn additions(&self) -> Vec<CartAddition> {
        self.additions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn calls(&self) -> usize {
        self.additions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl CartService for RecordingCart {
    async fn add_to_cart(&self, addition: CartAddition) -> Result<(), SourceError> {
        self.additions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(addition);
        if self.failing.load(Ordering::Acquire) {
            return Err(SourceError::Status {
                status: 503,
                message: "cart unavailable".to_string(),
            });
        }
        Ok(())
    }
}

/// Navigator that records requested paths.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    paths: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn paths(&self) -> Vec<String> {
        self.paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate_to(&self, path: &str) {
        self.paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_string());
    }
}
