//! # shipyard-core
//!
//! Shared library for the Shipyard dashboard containing the configuration
//! document model, the document parsers, and the rules that decide who may
//! view or persist an edited configuration.
//!
//! It has zero dependencies on network clients, async runtimes, or browser
//! storage.  Those live in `shipyard-store`, which drives the types defined
//! here.
//!
//! # Architecture overview (for beginners)
//!
//! A Shipyard dashboard is described by a user-authored document (usually
//! `conf.yml`).  The root document can list extra *pages*, each pointing at
//! its own sub-document.  The store fetches these documents, layers any
//! in-browser edits on top, and hands the result to the UI.
//!
//! This crate (`shipyard-core`) is the shared foundation.  It defines:
//!
//! - **`domain`** – Pure business rules with no I/O.  The `Configuration`
//!   tree, page slugs, item id derivation, section visibility, the permission
//!   evaluator, and the naming of persisted override keys.
//!
//! - **`document`** – How raw text becomes a `Configuration`.  YAML is the
//!   default format; JSON is accepted too.
//!
//! - **`error`** – The critical-error taxonomy.  Every failure the store can
//!   hit while resolving a configuration maps to exactly one message.
//!
//! - **`defaults`** – Built-in fallback values (theme, layout, icon size,
//!   config path).

pub mod defaults;
pub mod document;
pub mod domain;
pub mod error;

// Re-export the most-used types at the crate root so callers can write
// `shipyard_core::Configuration` instead of `shipyard_core::domain::config::Configuration`.
pub use defaults::VisibleComponents;
pub use document::{parser_for_path, ConfigParser, JsonConfigParser, ParseError, YamlConfigParser};
pub use domain::config::{AppConfig, Configuration, Item, Page, PageInfo, Section};
pub use domain::pages::{format_config_path, make_page_name, CurrentConfigInfo};
pub use domain::permissions::{compute_permissions, AuthRole, PermissionSet};
pub use domain::sections::{
    apply_item_ids, filter_visible_sections, find_item, find_parent_section, Viewer,
};
pub use domain::storage_keys::StorageKey;
pub use error::CriticalError;
