//! Domain entities for the Shipyard dashboard.
//!
//! This module contains pure business logic with no infrastructure dependencies.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! Clean Architecture organises code into concentric layers.  The innermost
//! layer is called the **domain** (or "entities" layer).  Domain code:
//!
//! - Contains the core business rules of the application.
//! - Has **no** imports from HTTP clients, storage drivers, or UI frameworks.
//! - Can be compiled and tested on any platform without any external setup.
//!
//! Here that means: what a configuration looks like, how a page name turns
//! into a routing slug, how item ids are derived, which sections a viewer may
//! see, and who may edit or persist the configuration.

/// The configuration document tree.
///
/// See [`config::Configuration`] for the root type.
pub mod config;

/// Page slugs, sub-config paths, and the active-config marker.
pub mod pages;

/// Read/write permission rules.
pub mod permissions;

/// Item id derivation, item lookup, and section visibility.
pub mod sections;

/// Names of the persisted local override keys.
pub mod storage_keys;
