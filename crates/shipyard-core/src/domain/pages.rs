//! Page slugs, sub-config paths, and the active-config marker.
//!
//! A page's display name ("Work Stuff") doubles as its routing token and as
//! the suffix of its local-storage keys.  [`make_page_name`] turns the display
//! name into that token ("work-stuff"); the store then looks pages up by
//! comparing slugs, never raw names.

use serde::{Deserialize, Serialize};

use crate::defaults::UNNAMED_PAGE;

/// Derives the routing slug for a page display name.
///
/// Lowercases, turns spaces into hyphens, drops a trailing `.yml`/`.yaml`
/// extension, and strips every character outside `[a-z0-9-]`.  An empty name
/// yields `"unnamed-page"`.
///
/// # Example
///
/// ```rust
/// use shipyard_core::make_page_name;
///
/// assert_eq!(make_page_name("Sub Page"), "sub-page");
/// assert_eq!(make_page_name("work.yml"), "work");
/// assert_eq!(make_page_name(""), "unnamed-page");
/// ```
pub fn make_page_name(name: &str) -> String {
    if name.is_empty() {
        return UNNAMED_PAGE.to_string();
    }
    let lowered = name.to_lowercase().replace(' ', "-");
    let without_ext = lowered
        .strip_suffix(".yml")
        .or_else(|| lowered.strip_suffix(".yaml"))
        .unwrap_or(&lowered);
    without_ext
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}

/// Normalises a page's `path` into something the fetch collaborator accepts.
///
/// Absolute `http(s)` URLs pass through untouched; anything else is made
/// root-relative.  Blank paths are unusable and yield `None`.
pub fn format_config_path(path: Option<&str>) -> Option<String> {
    let path = path.map(str::trim).filter(|p| !p.is_empty())?;
    if path.starts_with("http://") || path.starts_with("https://") {
        Some(path.to_string())
    } else if path.starts_with('/') {
        Some(path.to_string())
    } else {
        Some(format!("/{path}"))
    }
}

/// Identifies which configuration is being displayed.
///
/// Both fields empty means the root configuration is active.  Otherwise
/// `conf_id` is the page slug, used to namespace every local override key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConfigInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conf_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conf_id: Option<String>,
}

impl CurrentConfigInfo {
    /// The marker for "root configuration active".
    pub fn root() -> Self {
        Self::default()
    }

    /// The marker for a resolved sub-page.
    pub fn sub_page(conf_path: impl Into<String>, conf_id: impl Into<String>) -> Self {
        Self {
            conf_path: Some(conf_path.into()),
            conf_id: Some(conf_id.into()),
        }
    }

    /// The active page slug, or `None` on the root.
    pub fn conf_id(&self) -> Option<&str> {
        self.conf_id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn is_root(&self) -> bool {
        self.conf_id().is_none()
    }
}
