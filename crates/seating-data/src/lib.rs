//! HTTP transport for the seating configurator.
//!
//! Provides a small builder-style client over `reqwest` and the two HTTP
//! collaborators the configurator needs:
//!
//! - [`HttpCatalogSource`]: `GET {base}/api/configuration/{configId}`
//! - [`HttpCartService`]: `POST {base}/api/cart`
//!
//! # Example
//!
//! ```rust,ignore
//! use seating_data::{FetchClient, HttpCatalogSource};
//!
//! let client = FetchClient::new().with_base_url("https://shop.example.com");
//! let source = HttpCatalogSource::new(client);
//! let config = source.fetch_config(&ConfigId::new("luna-sofa")).await?;
//! ```

mod error;
mod request;
mod response;
mod services;

use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;

pub use error::FetchError;
pub use request::{Method, RequestBuilder};
pub use response::Response;
pub use services::{
    check_cart_response, decode_configuration, HttpCartService, HttpCatalogSource, CART_SEGMENTS,
    CONFIGURATION_SEGMENTS,
};

/// HTTP client for outbound requests.
#[derive(Debug, Clone)]
pub struct FetchClient {
    client: reqwest::Client,
    base_url: Option<String>,
    default_headers: HashMap<String, String>,
}

impl Default for FetchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchClient {
    /// Create a new HTTP client.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: None,
            default_headers: HashMap::new(),
        }
    }

    /// Create a client with a base URL that will be prepended to all requests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Absolute URL for path segments under the base URL. Each segment is
    /// percent-encoded, so ids may contain `/` or spaces.
    pub fn endpoint(&self, segments: &[&str]) -> Result<String, FetchError> {
        let base = self
            .base_url
            .as_deref()
            .ok_or_else(|| FetchError::InvalidUrl("no base URL configured".to_string()))?;
        let mut url = reqwest::Url::parse(base)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", base, e)))?;
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(format!("{}: cannot be a base", base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url.into())
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Get, url)
    }

    /// Create a POST request.
    pub fn post(&self, url: impl Into<String>) -> ClientRequestBuilder {
        self.request(Method::Post, url)
    }

    /// Create a request with a custom method.
    pub fn request(&self, method: Method, url: impl Into<String>) -> ClientRequestBuilder {
        let url = url.into();
        let full_url = match &self.base_url {
            Some(base) if !url.starts_with("http://") && !url.starts_with("https://") => {
                format!("{}{}", base.trim_end_matches('/'), url)
            }
            _ => url,
        };

        let mut builder = RequestBuilder::new(method, full_url);
        for (key, value) in &self.default_headers {
            builder = builder.header(key.clone(), value.clone());
        }

        ClientRequestBuilder {
            client: self.client.clone(),
            builder,
        }
    }
}

/// A request builder bound to a client.
pub struct ClientRequestBuilder {
    client: reqwest::Client,
    builder: RequestBuilder,
}

impl ClientRequestBuilder {
    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Result<Self, FetchError> {
        self.builder = self.builder.json(value)?;
        Ok(self)
    }

    /// Set the Accept header.
    pub fn accept(mut self, content_type: impl Into<String>) -> Self {
        self.builder = self.builder.accept(content_type);
        self
    }

    /// Bound the whole request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.builder = self.builder.timeout(timeout);
        self
    }

    /// Inspect the request before sending.
    pub fn builder(&self) -> &RequestBuilder {
        &self.builder
    }

    /// Send the request and read the whole body.
    pub async fn send(self) -> Result<Response, FetchError> {
        let RequestBuilder {
            method,
            url,
            headers,
            body,
            timeout,
        } = self.builder;

        let http_method = match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };

        let mut request = self.client.request(http_method, &url);
        for (key, value) in &headers {
            request = request.header(key.as_str(), value.as_str());
        }
        if let Some(body) = body {
            request = request.body(body);
        }
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(e, timeout))?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(e, timeout))?
            .to_vec();

        debug!(method = method.as_str(), url = %url, status, bytes = body.len(), "http response");
        Ok(Response::new(status, content_type, body))
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, HttpCartService, HttpCatalogSource, Method, Response};
}
