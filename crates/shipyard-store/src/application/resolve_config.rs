//! ConfigStore: the configuration resolution engine.
//!
//! Owns the [`StoreState`] and is the only thing allowed to change it.  Every
//! change goes through [`ConfigStore::commit`], which runs the pure reducer,
//! swaps the new state in, and then performs the reducer's effects against the
//! injected collaborators.
//!
//! # Resolution in one picture
//!
//! ```text
//!   resolve_config(None)                 resolve_config(Some("work"))
//!          │                                        │
//!   root cached? ── no ──► load_root_config ◄── no ─┤
//!          │ yes                                    │ yes
//!          ▼                                        ▼
//!   config := root                       find page whose slug == "work"
//!   read confSections                    fetch + parse its document
//!          │                             appConfig := root's (theme from sub)
//!          │                             pages := root's
//!          │                             read confSections-work
//!          ▼                                        ▼
//!                   sections := local override, if any
//! ```
//!
//! # Failure policy
//!
//! Resolution never returns an error.  Every failure is recorded in the
//! critical-error slot, reported, and the caller receives a best-effort
//! configuration: the fallback for a failed root load, or the unchanged
//! current configuration for a failed sub-page.
//!
//! # Overlapping resolves
//!
//! `resolve_config` takes `&mut self`, so two resolves on the same store can
//! never overlap: the second waits for the first and its result is the one
//! left in the store.  Callers that share a store across tasks wrap it in a
//! `tokio::sync::Mutex` and get the same last-call-wins ordering.

use std::sync::Arc;

use serde_json::Value;
use shipyard_core::defaults::{DEFAULT_CONFIG_PATH, DEFAULT_THEME};
use shipyard_core::{
    format_config_path, make_page_name, parser_for_path, AuthRole, ConfigParser, Configuration,
    CriticalError, CurrentConfigInfo, Item, PermissionSet, Section, StorageKey, Viewer,
    VisibleComponents,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::collaborators::{
    AuthProvider, ConfigFetcher, EventReporter, FetchError, InfoKey, KeyValueStore,
};
use super::mutations::{reduce, Effect, Mutation, Transition};
use super::state::StoreState;

/// Error returned by the permission-gated store operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The current user's permissions do not allow the operation.
    #[error("{0} is not allowed for the current user")]
    PermissionDenied(&'static str),

    /// The configuration could not be encoded for storage or export.
    #[error("failed to encode configuration: {0}")]
    Encode(String),
}

/// Maps a fetch failure onto the critical-error taxonomy.
fn classify_fetch_error(err: FetchError) -> CriticalError {
    match err {
        FetchError::Status(status) => CriticalError::FetchServerError(status),
        FetchError::NoResponse(_) => CriticalError::FetchNoResponse,
        FetchError::Other(message) => CriticalError::FetchOtherError(message),
    }
}

/// The configuration resolution engine.
pub struct ConfigStore {
    state: StoreState,
    fetcher: Arc<dyn ConfigFetcher>,
    auth: Arc<dyn AuthProvider>,
    storage: Arc<dyn KeyValueStore>,
    reporter: Arc<dyn EventReporter>,
    parser: Box<dyn ConfigParser>,
    root_config_path: String,
}

impl ConfigStore {
    /// Creates a store reading the root document from `/conf.yml`.
    pub fn new(
        fetcher: Arc<dyn ConfigFetcher>,
        auth: Arc<dyn AuthProvider>,
        storage: Arc<dyn KeyValueStore>,
        reporter: Arc<dyn EventReporter>,
    ) -> Self {
        Self {
            state: StoreState::default(),
            fetcher,
            auth,
            storage,
            reporter,
            parser: parser_for_path(DEFAULT_CONFIG_PATH),
            root_config_path: DEFAULT_CONFIG_PATH.to_string(),
        }
    }

    /// Reads the root document from `path` instead.  The document format is
    /// picked from the path's extension.
    pub fn with_root_config_path(mut self, path: impl Into<String>) -> Self {
        self.root_config_path = path.into();
        self.parser = parser_for_path(&self.root_config_path);
        self
    }

    pub fn root_config_path(&self) -> &str {
        &self.root_config_path
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    // ── Commit ────────────────────────────────────────────────────────────────

    /// Applies one mutation atomically, then runs its effects.
    pub fn commit(&mut self, mutation: Mutation) {
        let Transition { state, effects } = reduce(std::mem::take(&mut self.state), mutation);
        self.state = state;
        self.run_effects(effects);
    }

    fn run_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Persist { key, value } => self.storage.set_item(&key, &value),
                Effect::Info { message, key } => self.reporter.info(message, key),
                Effect::ReportError { message, trace } => self.reporter.report(&message, trace),
            }
        }
    }

    fn raise(&mut self, error: CriticalError, trace: Option<String>) {
        warn!(error = %error, "critical error");
        self.commit(Mutation::RaiseCriticalError { error, trace });
    }

    // ── Resolution ────────────────────────────────────────────────────────────

    /// Fetches and parses the root document.
    ///
    /// On success the result becomes both the displayed and the cached root
    /// configuration and the critical-error slot is cleared.  On failure the
    /// slot is set and the fallback configuration is returned; nothing is
    /// cached, so the next resolve tries again.
    pub async fn load_root_config(&mut self) -> Configuration {
        let headers = self.auth.make_auth_headers();
        info!(path = %self.root_config_path, "loading root configuration");

        let text = match self.fetcher.get(&self.root_config_path, &headers).await {
            Ok(text) => text,
            Err(err) => {
                let trace = err.to_string();
                self.raise(classify_fetch_error(err), Some(trace));
                return Configuration::fallback();
            }
        };

        match self.parser.parse(&text) {
            Ok(config) => {
                debug!(sections = config.sections.len(), "root configuration loaded");
                self.commit(Mutation::SetConfig(config.clone()));
                self.commit(Mutation::SetRootConfig(Some(config.clone())));
                self.commit(Mutation::SetCriticalError(None));
                config
            }
            Err(err) => {
                let error = CriticalError::ParseError {
                    format: self.parser.format_name().to_string(),
                    message: err.to_string(),
                };
                self.raise(error, None);
                Configuration::fallback()
            }
        }
    }

    /// Resolves the configuration to display.
    ///
    /// `None` (or an empty id) selects the root.  Otherwise `sub_config_id` is
    /// a page slug as produced by [`make_page_name`].
    pub async fn resolve_config(&mut self, sub_config_id: Option<&str>) -> Configuration {
        let root = match self.state.root_config.clone() {
            Some(root) => root,
            None => self.load_root_config().await,
        };

        self.commit(Mutation::SetIsUsingLocalConfig(false));

        match sub_config_id.filter(|id| !id.is_empty()) {
            None => {
                self.commit(Mutation::SetConfig(root));
                self.commit(Mutation::SetCurrentConfigInfo(CurrentConfigInfo::root()));
                self.apply_local_sections(None);
            }
            Some(id) => self.resolve_sub_config(&root, id).await,
        }

        self.state.config.clone()
    }

    async fn resolve_sub_config(&mut self, root: &Configuration, id: &str) {
        let path = root
            .pages()
            .iter()
            .find(|page| make_page_name(&page.name) == id)
            .and_then(|page| format_config_path(page.path.as_deref()));

        let Some(path) = path else {
            self.raise(CriticalError::SubConfigNotFound(id.to_string()), None);
            return;
        };

        // Set before fetching so errors and override keys are scoped to the page.
        self.commit(Mutation::SetCurrentConfigInfo(CurrentConfigInfo::sub_page(&path, id)));
        info!(page = id, path = %path, "loading sub-page configuration");

        let headers = self.auth.make_auth_headers();
        let text = match self.fetcher.get(&path, &headers).await {
            Ok(text) => text,
            Err(err) => {
                self.raise(CriticalError::SubConfigLoadError(err.to_string()), None);
                return;
            }
        };

        // A sub-page's format follows its own path, not the root's.
        let parser = parser_for_path(&path);
        let mut sub = match parser.parse_sub_config(&text) {
            Ok(sub) => sub,
            Err(err) => {
                let parse_error = CriticalError::ParseError {
                    format: parser.format_name().to_string(),
                    message: err.to_string(),
                };
                self.raise(CriticalError::SubConfigLoadError(parse_error.to_string()), None);
                return;
            }
        };

        let theme = sub
            .app_config
            .theme()
            .or_else(|| root.app_config.theme())
            .unwrap_or(DEFAULT_THEME)
            .to_string();
        sub.app_config = root.app_config.clone();
        sub.app_config.set("theme", theme);
        sub.pages = root.pages.clone();

        self.commit(Mutation::SetConfig(sub));
        self.apply_local_sections(Some(id));
    }

    /// Replaces the displayed sections with the locally stored override for
    /// `scope`, if one exists.
    ///
    /// Invalid JSON or an array that is not a section list raises a critical
    /// error.  A non-array or an empty array is treated as no override.
    fn apply_local_sections(&mut self, scope: Option<&str>) {
        let key = StorageKey::ConfSections.scoped(scope);
        let Some(raw) = self.storage.get_item(&key).filter(|raw| !raw.is_empty()) else {
            return;
        };
        let malformed = |message: String| CriticalError::MalformedLocalOverride {
            sub_config: scope.is_some(),
            message,
        };

        let value: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                self.raise(malformed(err.to_string()), Some(err.to_string()));
                return;
            }
        };

        match value {
            Value::Array(entries) if !entries.is_empty() => {
                match serde_json::from_value::<Vec<Section>>(Value::Array(entries)) {
                    Ok(sections) => {
                        debug!(key = %key, sections = sections.len(), "using local section override");
                        self.commit(Mutation::SetSections(sections));
                        self.commit(Mutation::SetIsUsingLocalConfig(true));
                    }
                    Err(err) => self.raise(malformed(err.to_string()), Some(err.to_string())),
                }
            }
            _ => debug!(key = %key, "ignoring local override that is not a non-empty list"),
        }
    }

    /// Drops the cached root so the next resolve fetches it again.
    pub fn invalidate_root_config(&mut self) {
        self.commit(Mutation::SetRootConfig(None));
    }

    /// Switches back to the root configuration.
    pub async fn use_main_config(&mut self) -> Configuration {
        self.resolve_config(None).await
    }

    // ── Read model ────────────────────────────────────────────────────────────

    pub fn config(&self) -> &Configuration {
        self.state.config()
    }

    pub fn critical_error(&self) -> Option<&str> {
        self.state.critical_error.as_deref()
    }

    pub fn is_using_local_config(&self) -> bool {
        self.state.is_using_local_config
    }

    fn local_value(&self, key: StorageKey) -> Option<String> {
        self.storage.get_item(&self.state.scoped_key(key))
    }

    pub fn theme(&self) -> String {
        self.state.theme(self.local_value(StorageKey::Theme).as_deref())
    }

    pub fn layout(&self) -> String {
        self.state.layout(self.local_value(StorageKey::LayoutOrientation).as_deref())
    }

    pub fn icon_size(&self) -> String {
        self.state.icon_size(self.local_value(StorageKey::IconSize).as_deref())
    }

    pub fn visible_components(&self) -> VisibleComponents {
        self.state.visible_components()
    }

    pub fn web_search(&self) -> Option<&Value> {
        self.state.web_search()
    }

    /// The auth collaborator's current answers.
    pub fn auth_role(&self) -> AuthRole {
        AuthRole {
            is_admin: self.auth.is_user_admin(),
            is_guest: self.auth.is_logged_in_as_guest(),
        }
    }

    /// Recomputed from the live auth state on every call.
    pub fn permissions(&self) -> PermissionSet {
        self.state.permissions(self.auth_role())
    }

    fn viewer(&self) -> Viewer {
        Viewer {
            username: self.auth.current_username(),
            is_guest: self.auth.is_logged_in_as_guest(),
        }
    }

    pub fn visible_sections(&self) -> Vec<Section> {
        self.state.visible_sections(&self.viewer())
    }

    pub fn item_by_id(&self, item_id: &str) -> Option<Item> {
        self.state.item_by_id(item_id, &self.viewer())
    }

    pub fn parent_section_of_item(&self, item_id: &str) -> Option<Section> {
        self.state.parent_section_of_item(item_id, &self.viewer())
    }

    // ── Named mutations ───────────────────────────────────────────────────────

    pub fn set_theme(&mut self, theme: impl Into<String>) {
        self.commit(Mutation::SetTheme(theme.into()));
    }

    pub fn set_item_layout(&mut self, layout: impl Into<String>) {
        self.commit(Mutation::SetItemLayout(layout.into()));
    }

    pub fn set_item_size(&mut self, size: impl Into<String>) {
        self.commit(Mutation::SetItemSize(size.into()));
    }

    pub fn set_sections(&mut self, sections: Vec<Section>) {
        self.commit(Mutation::SetSections(sections));
    }

    pub fn insert_section(&mut self, section: Section, index: usize) {
        self.commit(Mutation::InsertSection { section, index });
    }

    pub fn remove_section(&mut self, name: impl Into<String>) {
        self.commit(Mutation::RemoveSection(name.into()));
    }

    pub fn update_section(&mut self, index: usize, section: Section) {
        self.commit(Mutation::UpdateSection { index, section });
    }

    pub fn update_item(&mut self, item_id: impl Into<String>, item: Item) {
        self.commit(Mutation::UpdateItem { item_id: item_id.into(), item });
    }

    pub fn set_edit_mode(&mut self, edit_mode: bool) {
        self.commit(Mutation::SetEditMode(edit_mode));
    }

    pub fn set_critical_error(&mut self, message: Option<String>) {
        self.commit(Mutation::SetCriticalError(message));
    }

    // ── Persistence ───────────────────────────────────────────────────────────

    /// Writes the current sections as the local override for the active scope.
    ///
    /// # Errors
    ///
    /// [`StoreError::PermissionDenied`] when saving locally is disabled.
    pub fn save_sections_locally(&mut self) -> Result<(), StoreError> {
        if !self.permissions().allow_save_locally {
            return Err(StoreError::PermissionDenied("saving locally"));
        }
        let encoded = serde_json::to_string(&self.state.config.sections)
            .map_err(|e| StoreError::Encode(e.to_string()))?;
        let key = self.state.scoped_key(StorageKey::ConfSections);
        self.storage.set_item(&key, &encoded);
        self.commit(Mutation::SetIsUsingLocalConfig(true));
        self.reporter.info("Config saved locally", InfoKey::Config);
        Ok(())
    }

    /// Removes every local override for the active scope.
    ///
    /// The displayed configuration is left alone; resolve again to see the
    /// fetched document.
    pub fn clear_local_overrides(&mut self) {
        for key in StorageKey::ALL {
            self.storage.remove_item(&self.state.scoped_key(key));
        }
        self.commit(Mutation::SetIsUsingLocalConfig(false));
        self.reporter.info("Local overrides cleared", InfoKey::Config);
    }

    /// Renders the displayed configuration as YAML.
    ///
    /// # Errors
    ///
    /// [`StoreError::PermissionDenied`] when viewing the configuration is
    /// disabled, [`StoreError::Encode`] if serialization fails.
    pub fn export_config(&self) -> Result<String, StoreError> {
        if !self.permissions().allow_view_config {
            return Err(StoreError::PermissionDenied("viewing the configuration"));
        }
        serde_yaml::to_string(&self.state.config).map_err(|e| StoreError::Encode(e.to_string()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
