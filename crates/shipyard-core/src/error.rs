//! The critical-error taxonomy.
//!
//! Every member is terminal to the operation that hit it but never to the
//! process: the store records the `Display` text in its single
//! critical-error slot, reports it, and carries on with a best-effort
//! configuration.  The wording below is what users see.

use thiserror::Error;

/// A fatal condition hit while resolving the configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CriticalError {
    /// The server answered with a non-2xx status.
    #[error("Failed to fetch configuration: Server responded with status {0}")]
    FetchServerError(u16),

    /// The request was sent but nothing came back.
    #[error("Failed to fetch configuration: No response from server")]
    FetchNoResponse,

    /// The request could not even be constructed.
    #[error("Failed to fetch configuration: {0}")]
    FetchOtherError(String),

    /// The document was fetched but could not be parsed.
    #[error("Failed to parse {format}: {message}")]
    ParseError { format: String, message: String },

    /// The locally stored section override could not be decoded.
    #[error("Malformed section data in local storage{}", scope_suffix(.sub_config))]
    MalformedLocalOverride { sub_config: bool, message: String },

    /// No page in the root's `pages` list matches the requested slug.
    #[error("Unable to find config for '{0}'")]
    SubConfigNotFound(String),

    /// The sub-config was found but could not be fetched or parsed.
    #[error("Unable to load config: {0}")]
    SubConfigLoadError(String),
}

fn scope_suffix(sub_config: &bool) -> &'static str {
    if *sub_config {
        " for sub-config"
    } else {
        ""
    }
}
