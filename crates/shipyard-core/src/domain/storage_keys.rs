//! Names of the persisted local override keys.
//!
//! These names are shared with existing browser installs, so they must not
//! change.  On a sub-page every key is suffixed with `-{confId}`.

/// A local override slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// Theme chosen in the UI (`theme`).
    Theme,
    /// Item layout orientation (`layoutOrientation`).
    LayoutOrientation,
    /// Item icon size (`iconSize`).
    IconSize,
    /// JSON-encoded section list edited in the browser (`confSections`).
    ConfSections,
}

impl StorageKey {
    /// Every key, in a stable order.
    pub const ALL: [StorageKey; 4] = [
        StorageKey::Theme,
        StorageKey::LayoutOrientation,
        StorageKey::IconSize,
        StorageKey::ConfSections,
    ];

    /// The unscoped key name.
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKey::Theme => "theme",
            StorageKey::LayoutOrientation => "layoutOrientation",
            StorageKey::IconSize => "iconSize",
            StorageKey::ConfSections => "confSections",
        }
    }

    /// The key name for the given page scope (`None` = root).
    pub fn scoped(self, conf_id: Option<&str>) -> String {
        match conf_id {
            Some(id) if !id.is_empty() => format!("{}-{id}", self.as_str()),
            _ => self.as_str().to_string(),
        }
    }
}
