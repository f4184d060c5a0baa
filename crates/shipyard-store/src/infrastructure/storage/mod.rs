//! Storage infrastructure: the settings file and durable key/value storage.
//!
//! - **`settings`** – Reads the TOML settings file from the platform config
//!   directory, falling back to defaults on first run.
//! - **`local`** – `KeyValueStore` implementations: an in-memory map and a
//!   JSON file that survives between CLI runs (the command-line counterpart
//!   of the browser's `localStorage`).

pub mod local;
pub mod settings;
