//! HTTP client utilities for TurboCart.
//!
//! Provides a small, ergonomic async API over `reqwest` for talking to JSON
//! services: base URL joining, default headers, a per-client timeout and
//! status-aware JSON decoding.
//!
//! # Example
//!
//! ```rust,ignore
//! use turbo_data::FetchClient;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Stock {
//!     id: u64,
//!     amount: u32,
//! }
//!
//! let client = FetchClient::builder()
//!     .base_url("http://localhost:3333")
//!     .timeout(std::time::Duration::from_secs(5))
//!     .build()?;
//!
//! let stock: Stock = client.get_json("/stock/1").await?;
//! ```

mod error;

use std::collections::HashMap;
use std::time::Duration;

use serde::de::DeserializeOwned;

pub use error::FetchError;

/// Builder for [`FetchClient`].
#[derive(Debug, Default)]
pub struct FetchClientBuilder {
    base_url: Option<String>,
    default_headers: HashMap<String, String>,
    timeout: Option<Duration>,
}

impl FetchClientBuilder {
    /// Set a base URL that will be prepended to relative request paths.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header that will be included in all requests.
    pub fn default_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set the total timeout applied to every request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<FetchClient, FetchError> {
        let mut headers = reqwest::header::HeaderMap::new();
        for (key, value) in &self.default_headers {
            let name = reqwest::header::HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| FetchError::ClientError(format!("invalid header name {key}: {e}")))?;
            let value = reqwest::header::HeaderValue::from_str(value)
                .map_err(|e| FetchError::ClientError(format!("invalid header value for {key}: {e}")))?;
            headers.insert(name, value);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let inner = builder
            .build()
            .map_err(|e| FetchError::ClientError(e.to_string()))?;

        Ok(FetchClient {
            inner,
            base_url: self.base_url,
        })
    }
}

/// HTTP client for making outbound requests.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct FetchClient {
    inner: reqwest::Client,
    base_url: Option<String>,
}

impl FetchClient {
    /// Create a client with no base URL and default settings.
    pub fn new() -> Result<Self, FetchError> {
        Self::builder().build()
    }

    /// Start building a client.
    pub fn builder() -> FetchClientBuilder {
        FetchClientBuilder::default()
    }

    /// The configured base URL, if any.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Resolve a request path against the base URL.
    ///
    /// Absolute `http://` / `https://` URLs pass through unchanged.
    pub fn url(&self, path: &str) -> String {
        match &self.base_url {
            Some(base) if !(path.starts_with("http://") || path.starts_with("https://")) => {
                format!(
                    "{}/{}",
                    base.trim_end_matches('/'),
                    path.trim_start_matches('/')
                )
            }
            _ => path.to_string(),
        }
    }

    /// Send a GET request.
    ///
    /// Non-2xx responses are returned as-is; use [`FetchClient::get_json`]
    /// to reject them.
    pub async fn get(&self, path: &str) -> Result<reqwest::Response, FetchError> {
        let url = self.url(path);
        tracing::trace!(%url, "GET");
        Ok(self.inner.get(&url).send().await?)
    }

    /// Send a GET request and decode a successful JSON body.
    ///
    /// Non-2xx statuses become [`FetchError::HttpError`].
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        Ok(self.get(path).await?.error_for_status()?.json().await?)
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchClientBuilder, FetchError};
}
