//! TOML settings for the `shipyard` tool itself.
//!
//! Read from the platform-appropriate settings file:
//! - Windows:  `%APPDATA%\Shipyard\settings.toml`
//! - Linux:    `~/.config/shipyard/settings.toml`
//! - macOS:    `~/Library/Application Support/Shipyard/settings.toml`
//!
//! Example:
//!
//! ```toml
//! log_level = "debug"
//!
//! [source]
//! base = "https://dash.example.com"
//! config_path = "/conf.yml"
//! timeout_secs = 10
//!
//! [auth]
//! role = "admin"
//! username = "alice"
//! password = "s3cret"
//!
//! [storage]
//! file = "/var/lib/shipyard/local-storage.json"
//! ```
//!
//! # Serde default values
//!
//! Every field carries `#[serde(default = "some_fn")]`, so an empty or
//! partial file is valid and the tool works on first run before a settings
//! file exists.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shipyard_core::defaults::DEFAULT_CONFIG_PATH;
use thiserror::Error;

use crate::infrastructure::auth::Role;

/// Name of the settings file inside the platform config directory.
pub const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Name of the default local-storage file, next to the settings file.
pub const LOCAL_STORAGE_FILE_NAME: &str = "local-storage.json";

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Settings schema ───────────────────────────────────────────────────────────

/// Top-level settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreSettings {
    /// `tracing` level used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub source: SourceSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Where the dashboard's documents come from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceSettings {
    /// Base URL of the web server, or a local directory holding the documents.
    #[serde(default = "default_base")]
    pub base: String,
    /// Path of the root document relative to `base`.
    #[serde(default = "default_config_path")]
    pub config_path: String,
    /// Request timeout for HTTP fetches.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Who the tool acts as.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AuthSettings {
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Where local overrides are kept between runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StorageSettings {
    /// Defaults to `local-storage.json` next to the settings file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_base() -> String {
    "http://localhost:4000".to_string()
}
fn default_config_path() -> String {
    DEFAULT_CONFIG_PATH.to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            source: SourceSettings::default(),
            auth: AuthSettings::default(),
            storage: StorageSettings::default(),
        }
    }
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            base: default_base(),
            config_path: default_config_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl StoreSettings {
    /// The root document path: `env_override` (the value of
    /// `SHIPYARD_CONFIG_PATH`), then `source.config_path`, then `/conf.yml`.
    pub fn root_config_path(&self, env_override: Option<&str>) -> String {
        env_override
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .or_else(|| Some(self.source.config_path.trim()).filter(|p| !p.is_empty()))
            .unwrap_or(DEFAULT_CONFIG_PATH)
            .to_string()
    }

    /// The local-storage file: `storage.file`, else `local-storage.json` in
    /// `settings_dir`.
    pub fn storage_file(&self, settings_dir: Option<&Path>) -> Option<PathBuf> {
        self.storage
            .file
            .clone()
            .or_else(|| settings_dir.map(|dir| dir.join(LOCAL_STORAGE_FILE_NAME)))
    }
}

// ── Settings file ─────────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the settings file.
///
/// # Errors
///
/// Returns [`SettingsError::NoPlatformConfigDir`] when the platform config
/// base directory cannot be determined from the environment.
pub fn settings_dir() -> Result<PathBuf, SettingsError> {
    platform_config_dir().ok_or(SettingsError::NoPlatformConfigDir)
}

/// Loads settings from the platform settings file.
///
/// # Errors
///
/// See [`load_settings_from`].
pub fn load_settings() -> Result<StoreSettings, SettingsError> {
    load_settings_from(&settings_dir()?.join(SETTINGS_FILE_NAME))
}

/// Loads settings from `path`, returning `StoreSettings::default()` if the
/// file does not exist.
///
/// # Errors
///
/// Returns [`SettingsError::Io`] for file-system errors other than "not
/// found", and [`SettingsError::Parse`] if the TOML is malformed.
pub fn load_settings_from(path: &Path) -> Result<StoreSettings, SettingsError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoreSettings::default()),
        Err(source) => Err(SettingsError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Resolves the platform config directory including the `Shipyard` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("Shipyard"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("shipyard"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME")
            .map(|h| PathBuf::from(h).join("Library").join("Application Support").join("Shipyard"))
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
