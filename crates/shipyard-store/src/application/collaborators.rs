//! Traits for everything the store talks to but does not own.
//!
//! The resolution engine never performs I/O itself.  It is handed a fetcher,
//! an auth provider, a key/value store, and an event reporter at construction
//! time.  Infrastructure supplies the real implementations; tests supply
//! scripted or mocked ones.
//!
//! # Why traits? (for beginners)
//!
//! A trait is Rust's way of describing "something that can do X" without
//! saying *how*.  `ConfigStore` holds an `Arc<dyn ConfigFetcher>`, so it works
//! the same whether documents come from an HTTP server, a directory on disk,
//! or a test double that returns canned text.

use async_trait::async_trait;
use thiserror::Error;

// ── Fetch ─────────────────────────────────────────────────────────────────────

/// How a document fetch failed.
///
/// The three variants mirror the three things that can go wrong with an HTTP
/// request: the server answered with an error, nothing answered, or the
/// request never left the client.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// A response arrived with a non-2xx status.
    #[error("server responded with status {0}")]
    Status(u16),

    /// The request was sent but no response arrived (network down, timeout).
    #[error("no response from server: {0}")]
    NoResponse(String),

    /// The request could not be built (bad URL, invalid header).
    #[error("{0}")]
    Other(String),
}

/// Fetches raw document text by path.
#[async_trait]
pub trait ConfigFetcher: Send + Sync {
    /// Returns the body at `path`.
    ///
    /// `path` is either root-relative (`/conf.yml`) or an absolute `http(s)`
    /// URL.  `headers` come from [`AuthProvider::make_auth_headers`].
    async fn get(&self, path: &str, headers: &[(String, String)]) -> Result<String, FetchError>;
}

// ── Auth ──────────────────────────────────────────────────────────────────────

/// The current user's authentication state.
///
/// Queried on every permission check, never cached: the user can log in or
/// out without the configuration being reloaded.
#[cfg_attr(test, mockall::automock)]
pub trait AuthProvider: Send + Sync {
    fn is_user_admin(&self) -> bool;

    fn is_logged_in_as_guest(&self) -> bool;

    /// Headers to attach to every document fetch.
    fn make_auth_headers(&self) -> Vec<(String, String)>;

    /// Name of the logged-in user, used by section visibility rules.
    fn current_username(&self) -> Option<String>;
}

// ── Durable key/value storage ─────────────────────────────────────────────────

/// Durable string key/value storage (the browser's `localStorage` equivalent).
///
/// Values are opaque to the storage.  Encoding and shape validation belong to
/// the caller.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;

    fn set_item(&self, key: &str, value: &str);

    fn remove_item(&self, key: &str);
}

// ── Reporting ─────────────────────────────────────────────────────────────────

/// Category of an informational event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoKey {
    /// Structural edits made in the editor (sections, items, pages).
    Editor,
    /// Look-and-feel changes (theme, layout, icon size, colours).
    Visual,
    /// Configuration lifecycle (loads, local saves, resets).
    Config,
}

impl InfoKey {
    pub fn as_str(self) -> &'static str {
        match self {
            InfoKey::Editor => "editor",
            InfoKey::Visual => "visual",
            InfoKey::Config => "config",
        }
    }
}

/// Fire-and-forget sink for errors and audit events.  Must never fail.
#[cfg_attr(test, mockall::automock)]
pub trait EventReporter: Send + Sync {
    /// Reports a critical error, with optional extra detail.
    fn report(&self, message: &str, trace: Option<String>);

    /// Records an informational event.
    fn info(&self, message: &str, key: InfoKey);
}
