//! Document fetchers.
//!
//! - **`http`** – `HttpFetcher`, which talks to the web server hosting the
//!   dashboard's documents.
//! - **`directory`** – `DirectoryFetcher`, which serves documents from a local
//!   folder the way a static file server would.
//! - **`mock`** – `ScriptedFetcher`, a test double returning canned bodies and
//!   recording every requested path.

pub mod directory;
pub mod http;
pub mod mock;

pub use directory::DirectoryFetcher;
pub use http::HttpFetcher;
pub use mock::ScriptedFetcher;

/// `true` for absolute `http://` and `https://` URLs.
pub(crate) fn is_absolute_url(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}
