//! HTTP document fetcher built on `reqwest`.
//!
//! Root-relative paths (`/conf.yml`) are joined onto the configured base URL;
//! absolute `http(s)` URLs are fetched as-is, which lets a sub-page live on a
//! different host.
//!
//! # Failure classification
//!
//! | What happened                                  | `FetchError`   |
//! |------------------------------------------------|----------------|
//! | Response with a non-2xx status                 | `Status(code)` |
//! | Request could not be built (bad URL or header) | `Other`        |
//! | Anything else (refused, reset, timed out)      | `NoResponse`   |

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::is_absolute_url;
use crate::application::collaborators::{ConfigFetcher, FetchError};

/// Fetches documents over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    /// Creates a fetcher resolving relative paths against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Other`] if the HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Other(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// The full URL requested for `path`.
    pub fn url_for(&self, path: &str) -> String {
        if is_absolute_url(path) {
            return path.to_string();
        }
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}

fn classify(err: reqwest::Error) -> FetchError {
    if err.is_builder() {
        FetchError::Other(err.to_string())
    } else if let Some(status) = err.status() {
        FetchError::Status(status.as_u16())
    } else {
        FetchError::NoResponse(err.to_string())
    }
}

#[async_trait]
impl ConfigFetcher for HttpFetcher {
    async fn get(&self, path: &str, headers: &[(String, String)]) -> Result<String, FetchError> {
        let url = self.url_for(path);
        debug!(url = %url, "GET");

        let mut request = self.client.get(&url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await.map_err(classify)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        response.text().await.map_err(classify)
    }
}
