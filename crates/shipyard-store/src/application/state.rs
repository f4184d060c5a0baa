//! The store's state value and its read-only views.
//!
//! [`StoreState`] is a plain owned value.  Nothing in this module performs
//! I/O: views that depend on a local override (theme, layout, icon size) take
//! the override as an argument and the caller reads it from storage.

use serde_json::Value;
use shipyard_core::{
    compute_permissions, filter_visible_sections, find_item, find_parent_section, AppConfig,
    AuthRole, Configuration, CurrentConfigInfo, Item, PageInfo, PermissionSet, Section,
    StorageKey, Viewer, VisibleComponents,
};

use shipyard_core::defaults::{DEFAULT_ICON_SIZE, DEFAULT_LAYOUT, DEFAULT_THEME};

/// Everything the store knows at one instant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    /// The configuration being displayed and edited.
    pub config: Configuration,
    /// The last successfully loaded root document.  `None` until the first
    /// successful load or after an explicit invalidation.
    pub root_config: Option<Configuration>,
    /// While true the user can drag and edit items and sections.
    pub edit_mode: bool,
    /// Keyboard shortcuts are suspended while a modal is open.
    pub modal_open: bool,
    /// Which configuration (root or sub-page) `config` came from.
    pub current_config_info: CurrentConfigInfo,
    /// True when `config.sections` came from a local override.
    pub is_using_local_config: bool,
    /// The single critical-error slot.
    pub critical_error: Option<String>,
    /// Tab the configuration menu should open on.
    pub conf_menu_index: Option<usize>,
}

/// Picks the first non-empty value of local override, document value, default.
fn first_set(local: Option<&str>, from_doc: Option<&str>, fallback: &str) -> String {
    local
        .filter(|v| !v.is_empty())
        .or_else(|| from_doc.filter(|v| !v.is_empty()))
        .unwrap_or(fallback)
        .to_string()
}

impl StoreState {
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn page_info(&self) -> &PageInfo {
        &self.config.page_info
    }

    pub fn app_config(&self) -> &AppConfig {
        &self.config.app_config
    }

    /// The local-storage key for `key` in the active scope.
    pub fn scoped_key(&self, key: StorageKey) -> String {
        key.scoped(self.current_config_info.conf_id())
    }

    /// Local theme override, then `appConfig.theme`, then `"default"`.
    pub fn theme(&self, local: Option<&str>) -> String {
        first_set(local, self.app_config().theme(), DEFAULT_THEME)
    }

    /// Local layout override, then `appConfig.layout`, then `"auto"`.
    pub fn layout(&self, local: Option<&str>) -> String {
        first_set(local, self.app_config().get_str("layout"), DEFAULT_LAYOUT)
    }

    /// Local icon size override, then `appConfig.iconSize`, then `"medium"`.
    pub fn icon_size(&self, local: Option<&str>) -> String {
        first_set(local, self.app_config().get_str("iconSize"), DEFAULT_ICON_SIZE)
    }

    pub fn visible_components(&self) -> VisibleComponents {
        VisibleComponents::from_app_config(self.app_config())
    }

    pub fn web_search(&self) -> Option<&Value> {
        self.app_config().get("webSearch")
    }

    /// Recomputed on every call.
    pub fn permissions(&self, role: AuthRole) -> PermissionSet {
        compute_permissions(self.app_config(), role)
    }

    /// Sections `viewer` may see.
    pub fn visible_sections(&self, viewer: &Viewer) -> Vec<Section> {
        filter_visible_sections(&self.config.sections, viewer)
    }

    /// Looks an item up among the sections visible to `viewer`.
    pub fn item_by_id(&self, item_id: &str, viewer: &Viewer) -> Option<Item> {
        find_item(&self.visible_sections(viewer), item_id).cloned()
    }

    /// The visible section owning `item_id`.
    pub fn parent_section_of_item(&self, item_id: &str, viewer: &Viewer) -> Option<Section> {
        find_parent_section(&self.visible_sections(viewer), item_id).cloned()
    }
}
