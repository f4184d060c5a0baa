//! Serves documents from a local directory.
//!
//! Lets the CLI resolve a dashboard straight from the folder holding
//! `conf.yml` without running a web server.  I/O failures are reported with
//! the status a static file server would have answered with.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::is_absolute_url;
use crate::application::collaborators::{ConfigFetcher, FetchError};

/// Reads documents from files below `root`.
#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a root-relative document path onto a file below `root`.
    /// Paths that would escape `root` are refused.
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative.components().any(|c| !matches!(c, Component::Normal(_))) {
            return None;
        }
        Some(self.root.join(relative))
    }
}

#[async_trait]
impl ConfigFetcher for DirectoryFetcher {
    async fn get(&self, path: &str, _headers: &[(String, String)]) -> Result<String, FetchError> {
        if is_absolute_url(path) {
            return Err(FetchError::Other(format!(
                "{path} is a remote URL and cannot be read from {}",
                self.root.display()
            )));
        }
        let file = self.resolve(path).ok_or(FetchError::Status(403))?;
        debug!(file = %file.display(), "reading document");

        tokio::fs::read_to_string(&file).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => FetchError::Status(404),
            ErrorKind::PermissionDenied => FetchError::Status(403),
            _ => FetchError::Other(format!("{}: {e}", file.display())),
        })
    }
}
