//! Infrastructure layer for the configuration store.
//!
//! Contains the adapters behind the application traits: document fetchers
//! (HTTP and local directory), durable key/value storage, the settings file,
//! static authentication, and the tracing-backed event reporter.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `shipyard_core`, but MUST NOT be imported by the `application` or domain
//! layers outside of tests.

pub mod auth;
pub mod fetch;
pub mod reporting;
pub mod storage;
