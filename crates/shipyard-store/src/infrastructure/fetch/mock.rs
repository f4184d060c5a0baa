//! Scripted fetcher for tests.
//!
//! Returns canned bodies or errors per path and records every request, so
//! tests can assert both on what the store did with a response and on which
//! documents it asked for.  Unknown paths answer with status 404.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::application::collaborators::{ConfigFetcher, FetchError};

/// A [`ConfigFetcher`] driven by a table of canned responses.
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    responses: Mutex<HashMap<String, Result<String, FetchError>>>,
    requests: Mutex<Vec<String>>,
    headers: Mutex<Vec<Vec<(String, String)>>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set_body`](Self::set_body).
    pub fn with_body(self, path: &str, body: &str) -> Self {
        self.set_body(path, body);
        self
    }

    /// Builder form of [`set_error`](Self::set_error).
    pub fn with_error(self, path: &str, error: FetchError) -> Self {
        self.set_error(path, error);
        self
    }

    /// Answers `path` with `body` from now on.
    pub fn set_body(&self, path: &str, body: &str) {
        self.script(path, Ok(body.to_string()));
    }

    /// Answers `path` with `error` from now on.
    pub fn set_error(&self, path: &str, error: FetchError) {
        self.script(path, Err(error));
    }

    fn script(&self, path: &str, response: Result<String, FetchError>) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_string(), response);
    }

    /// Every requested path, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Headers sent with the most recent request.
    pub fn last_headers(&self) -> Option<Vec<(String, String)>> {
        self.headers.lock().unwrap_or_else(PoisonError::into_inner).last().cloned()
    }
}

#[async_trait]
impl ConfigFetcher for ScriptedFetcher {
    async fn get(&self, path: &str, headers: &[(String, String)]) -> Result<String, FetchError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_string());
        self.headers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(headers.to_vec());
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
            .unwrap_or(Err(FetchError::Status(404)))
    }
}
