//! HTTP implementations of the configurator's collaborators.

use std::time::Duration;

use async_trait::async_trait;
use seating_core::catalog::{CatalogSource, SupplementalConfig};
use seating_core::submission::{CartAddition, CartService};
use seating_core::{ConfigId, SourceError};
use tracing::{debug, warn};

use crate::{FetchClient, FetchError, Response};

/// Path of the configuration endpoint, before the id.
pub const CONFIGURATION_SEGMENTS: [&str; 2] = ["api", "configuration"];

/// Path of the cart mutation endpoint.
pub const CART_SEGMENTS: [&str; 2] = ["api", "cart"];

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Fetches `SupplementalConfig` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    client: FetchClient,
    timeout: Duration,
}

impl HttpCatalogSource {
    pub fn new(client: FetchClient) -> Self {
        Self {
            client,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// URL fetched for `config_id`.
    pub fn url_for(&self, config_id: &ConfigId) -> Result<String, FetchError> {
        let [api, configuration] = CONFIGURATION_SEGMENTS;
        self.client
            .endpoint(&[api, configuration, config_id.as_str()])
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_config(&self, config_id: &ConfigId) -> Result<SupplementalConfig, SourceError> {
        let url = self.url_for(config_id)?;
        debug!(config_id = %config_id, url = %url, "requesting configuration");

        let response = self
            .client
            .get(url)
            .accept("application/json")
            .timeout(self.timeout)
            .send()
            .await?;
        decode_configuration(config_id, response)
    }
}

/// Decode a configuration response. Non-2xx statuses become
/// `SourceError::Status`; undecodable or invalid bodies become
/// `SourceError::Malformed`.
pub fn decode_configuration(
    config_id: &ConfigId,
    response: Response,
) -> Result<SupplementalConfig, SourceError> {
    let response = response.error_for_status()?;
    if !response.is_json() {
        warn!(
            config_id = %config_id,
            content_type = response.content_type.as_deref().unwrap_or("none"),
            "configuration response is not declared as JSON"
        );
    }
    SupplementalConfig::from_json(&response.body)
}

/// Posts cart additions over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCartService {
    client: FetchClient,
    timeout: Duration,
}

impl HttpCartService {
    pub fn new(client: FetchClient) -> Self {
        Self {
            client,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> Result<String, FetchError> {
        self.client.endpoint(&CART_SEGMENTS)
    }
}

#[async_trait]
impl CartService for HttpCartService {
    async fn add_to_cart(&self, addition: CartAddition) -> Result<(), SourceError> {
        let url = self.url()?;
        debug!(variant_id = %addition.variant_id, url = %url, "posting cart addition");

        let response = self
            .client
            .post(url)
            .json(&addition)?
            .timeout(self.timeout)
            .send()
            .await?;
        check_cart_response(response)
    }
}

/// The cart accepts any 2xx; the body is ignored.
pub fn check_cart_response(response: Response) -> Result<(), SourceError> {
    response.error_for_status()?;
    Ok(())
}
