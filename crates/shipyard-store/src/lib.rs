//! shipyard-store library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.

pub mod application;
pub mod infrastructure;

pub use application::collaborators::{
    AuthProvider, ConfigFetcher, EventReporter, FetchError, InfoKey, KeyValueStore,
};
pub use application::mutations::{reduce, AppendTo, Effect, Mutation, Transition};
pub use application::resolve_config::{ConfigStore, StoreError};
pub use application::state::StoreState;
