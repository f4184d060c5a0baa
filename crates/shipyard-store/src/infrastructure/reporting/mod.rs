//! Event reporter backed by `tracing`.
//!
//! Critical errors go to `error!`, informational events to `info!` with the
//! event category as a structured `key` field, e.g.:
//!
//! ```text
//! INFO shipyard_store::infrastructure::reporting: Theme updated key="visual"
//! ```

use tracing::{error, info};

use crate::application::collaborators::{EventReporter, InfoKey};

/// Forwards store events to the installed `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl EventReporter for TracingReporter {
    fn report(&self, message: &str, trace: Option<String>) {
        match trace {
            Some(trace) => error!(trace = %trace, "{message}"),
            None => error!("{message}"),
        }
    }

    fn info(&self, message: &str, key: InfoKey) {
        info!(key = key.as_str(), "{message}");
    }
}
