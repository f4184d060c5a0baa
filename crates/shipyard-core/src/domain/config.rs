//! The configuration document model.
//!
//! A dashboard document has three always-present parts and one optional part:
//!
//! ```yaml
//! pageInfo:
//!   title: Home Lab
//! appConfig:
//!   theme: nord
//!   preventWriteToDisk: true
//! sections:
//!   - name: Media
//!     items:
//!       - title: Jellyfin
//!         url: http://jellyfin.lan
//! pages:
//!   - name: Work Stuff
//!     path: work.yml
//! ```
//!
//! `appConfig` is a free-form mapping: the dashboard grows new flags faster
//! than a typed struct could follow, so it is kept as a JSON object with typed
//! accessors for the keys the store itself reads.  Everything the store does
//! not understand (extra top-level keys, extra item fields) is preserved
//! verbatim through `#[serde(flatten)]` so that a load/save cycle never
//! silently drops user data.
//!
//! # Absent vs. null
//!
//! `appConfig:` with nothing after it is `null` in YAML.  The store treats a
//! null `appConfig`, `pageInfo`, `sections`, or `items` exactly like a missing
//! one and substitutes the empty default.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::defaults::FALLBACK_TITLE;

/// Deserializes `null` as `T::default()`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserializes a string field that YAML may have typed as a number or a
/// bool (`title: 2048`, `name: 2024`) into its string form.
fn scalar_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_scalar_as_string(deserializer)?.unwrap_or_default())
}

/// Like [`scalar_as_string`], keeping `null` as `None`.
fn optional_scalar_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "invalid type: expected a string, found {other}"
        ))),
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

/// A fully-loaded dashboard configuration.
///
/// `app_config`, `page_info`, and `sections` are never absent on a resolved
/// configuration: missing or null values are replaced by empty defaults at
/// deserialization time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    #[serde(default, deserialize_with = "null_as_default")]
    pub page_info: PageInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub app_config: AppConfig,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sections: Vec<Section>,
    /// Sub-configurations owned by the root.  Only ever read from the root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<Vec<Page>>,
    /// Top-level keys the store does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Configuration {
    /// The configuration handed out when the root document cannot be loaded:
    /// `{appConfig: {}, pageInfo: {title: 'Shipyard'}, sections: []}`.
    pub fn fallback() -> Self {
        Self {
            page_info: PageInfo::titled(FALLBACK_TITLE),
            ..Self::default()
        }
    }

    /// Returns the page list, or an empty slice when the document has none.
    pub fn pages(&self) -> &[Page] {
        self.pages.as_deref().unwrap_or(&[])
    }
}

// ── AppConfig ─────────────────────────────────────────────────────────────────

/// Free-form display and behaviour flags (`appConfig`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppConfig(Map<String, Value>);

impl AppConfig {
    /// Creates an empty `appConfig`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the value under `key` when it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// `true` only when the flag is literally the boolean `true`.
    pub fn is_true(&self, key: &str) -> bool {
        matches!(self.0.get(key), Some(Value::Bool(true)))
    }

    /// `true` only when the flag is literally the boolean `false`.
    ///
    /// An absent flag is *not* false.  This matters for the legacy
    /// `allowConfigEdit` flag, which only restricts when explicitly disabled.
    pub fn is_false(&self, key: &str) -> bool {
        matches!(self.0.get(key), Some(Value::Bool(false)))
    }

    /// The configured theme, ignoring empty strings.
    pub fn theme(&self) -> Option<&str> {
        self.get_str("theme").filter(|t| !t.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrows the underlying JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for AppConfig {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

// ── PageInfo ──────────────────────────────────────────────────────────────────

/// Title, description, navigation links, and footer text (`pageInfo`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(
        default,
        deserialize_with = "optional_scalar_as_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "optional_scalar_as_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nav_links: Option<Vec<Value>>,
    #[serde(
        default,
        deserialize_with = "optional_scalar_as_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub footer_text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PageInfo {
    /// A `pageInfo` carrying only a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

// ── Sections and items ────────────────────────────────────────────────────────

/// A named group of items.
///
/// `name` is the lookup key used by removal and item moves, so it is expected
/// to be unique within one configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<Item>,
    /// Icon, `displayData`, widgets, and anything else the UI reads.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder-style helper used mostly by tests and the CLI.
    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        self.items = items;
        self
    }

    /// The section's `displayData` object, if any.
    pub fn display_data(&self) -> Option<&Map<String, Value>> {
        self.extra.get("displayData").and_then(Value::as_object)
    }
}

/// A single link or widget tile.
///
/// `id` is assigned by the store (see [`crate::domain::sections::apply_item_ids`])
/// and regenerated whenever the owning section list is restructured.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(
        default,
        deserialize_with = "optional_scalar_as_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "optional_scalar_as_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

// ── Pages ─────────────────────────────────────────────────────────────────────

/// An entry of the root's `pages` list pointing at a sub-configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "optional_scalar_as_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub path: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Page {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: Some(path.into()),
            extra: Map::new(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
