//! Application layer: the configuration store and the contracts it depends on.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (pure rules in `shipyard-core`) and the infrastructure (HTTP, files, logs).
//!
//! Code in this layer:
//!
//! - **Orchestrates** domain objects to fulfil a user goal (e.g., "show the
//!   Work page with my local edits applied").
//! - **Depends on abstractions** (traits) rather than concrete implementations,
//!   so the infrastructure can be swapped without changing this code.
//! - **Performs no I/O of its own**.
//!
//! # Sub-modules
//!
//! - **`collaborators`** – The traits for fetching documents, asking who the
//!   user is, durable key/value storage, and error/info reporting.
//!
//! - **`state`** – The `StoreState` value and its read-only views.
//!
//! - **`mutations`** – The named state transitions and the pure reducer that
//!   applies them.
//!
//! - **`resolve_config`** – `ConfigStore`, the resolution engine that fetches
//!   the root and sub-page documents and layers local overrides on top.

pub mod collaborators;
pub mod mutations;
pub mod resolve_config;
pub mod state;
