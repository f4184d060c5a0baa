//! The mutation surface: every named state transition the store accepts.
//!
//! # How mutations work (for beginners)
//!
//! A [`Mutation`] is a value describing one change ("set the theme to nord",
//! "remove the section called Media").  [`reduce`] takes the current
//! [`StoreState`] by value and a mutation, and returns a [`Transition`]: the
//! next state plus a list of [`Effect`]s (things to write to local storage,
//! events to report).
//!
//! `reduce` itself never touches storage or the reporter.  The caller swaps
//! the new state in as a whole and only then runs the effects, so no
//! half-applied state can ever be observed.
//!
//! # Item ids
//!
//! Inserting or removing a section or an item re-derives every item id with
//! [`apply_item_ids`].  Replacing the whole section list (`SetSections`) or a
//! single section (`UpdateSection`) keeps whatever ids the caller supplied.

use serde_json::Value;
use shipyard_core::{
    apply_item_ids, AppConfig, Configuration, CriticalError, CurrentConfigInfo, Item, Page,
    PageInfo, Section, StorageKey,
};

use super::collaborators::InfoKey;
use super::state::StoreState;

/// Where an inserted or copied item lands within its section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AppendTo {
    Beginning,
    #[default]
    End,
}

/// A named state transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    // ── Engine internals ─────────────────────────────────────────────────
    /// Replaces the displayed configuration.
    SetConfig(Configuration),
    /// Caches the root configuration.
    SetRootConfig(Option<Configuration>),
    SetCurrentConfigInfo(CurrentConfigInfo),
    SetIsUsingLocalConfig(bool),

    // ── Session flags ────────────────────────────────────────────────────
    SetEditMode(bool),
    SetModalOpen(bool),
    SetConfMenuIndex(Option<usize>),
    /// Overwrites the critical-error slot.  `Some` is reported.
    SetCriticalError(Option<String>),
    /// Records a typed critical error together with optional detail.
    RaiseCriticalError {
        error: CriticalError,
        trace: Option<String>,
    },

    // ── Look and feel ────────────────────────────────────────────────────
    SetTheme(String),
    SetItemLayout(String),
    SetItemSize(String),
    SetLanguage(String),
    SetCustomColors(Value),
    UpdateCustomCss(String),

    // ── Document parts ───────────────────────────────────────────────────
    SetPageInfo(PageInfo),
    SetAppConfig(AppConfig),
    SetPages(Vec<Page>),

    // ── Sections ─────────────────────────────────────────────────────────
    SetSections(Vec<Section>),
    InsertSection {
        section: Section,
        index: usize,
    },
    RemoveSection(String),
    UpdateSection {
        index: usize,
        section: Section,
    },

    // ── Items ────────────────────────────────────────────────────────────
    UpdateItem {
        item_id: String,
        item: Item,
    },
    InsertItem {
        item: Item,
        target_section: String,
        append_to: AppendTo,
    },
    RemoveItem {
        item_id: String,
        section_name: String,
    },
    CopyItem {
        item: Item,
        to_section: String,
        append_to: AppendTo,
    },
}

/// A side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Write `value` under `key` in durable storage.
    Persist { key: String, value: String },
    /// Record an informational event.
    Info { message: &'static str, key: InfoKey },
    /// Forward a critical error to the reporter.
    ReportError { message: String, trace: Option<String> },
}

/// The result of applying one mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: StoreState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn quiet(state: StoreState) -> Self {
        Self { state, effects: Vec::new() }
    }

    fn with(state: StoreState, effects: Vec<Effect>) -> Self {
        Self { state, effects }
    }
}

fn info(message: &'static str, key: InfoKey) -> Effect {
    Effect::Info { message, key }
}

fn editor(message: &'static str) -> Effect {
    info(message, InfoKey::Editor)
}

/// Sets `appConfig[field]`, persists the value under the scoped `storage_key`,
/// and emits a visual event.
fn set_persisted_display_value(
    mut state: StoreState,
    field: &str,
    storage_key: StorageKey,
    value: String,
    message: &'static str,
) -> Transition {
    state.config.app_config.set(field, value.clone());
    let key = state.scoped_key(storage_key);
    Transition::with(
        state,
        vec![Effect::Persist { key, value }, info(message, InfoKey::Visual)],
    )
}

fn place_item(items: &mut Vec<Item>, item: Item, append_to: AppendTo) {
    match append_to {
        AppendTo::Beginning => items.insert(0, item),
        AppendTo::End => items.push(item),
    }
}

/// Adds `item` to every section named `section_name`, then re-derives ids.
fn add_item_to_section(
    mut state: StoreState,
    item: Item,
    section_name: &str,
    append_to: AppendTo,
    message: &'static str,
) -> Transition {
    let mut effects = Vec::new();
    for section in state.config.sections.iter_mut().filter(|s| s.name == section_name) {
        place_item(&mut section.items, item.clone(), append_to);
        effects.push(editor(message));
    }
    state.config.sections = apply_item_ids(std::mem::take(&mut state.config.sections));
    Transition::with(state, effects)
}

/// Applies `mutation` to `state`.
pub fn reduce(mut state: StoreState, mutation: Mutation) -> Transition {
    match mutation {
        Mutation::SetConfig(config) => {
            state.config = config;
            Transition::quiet(state)
        }
        Mutation::SetRootConfig(config) => {
            state.root_config = config;
            Transition::quiet(state)
        }
        Mutation::SetCurrentConfigInfo(info) => {
            state.current_config_info = info;
            Transition::quiet(state)
        }
        Mutation::SetIsUsingLocalConfig(flag) => {
            state.is_using_local_config = flag;
            Transition::quiet(state)
        }

        Mutation::SetEditMode(edit_mode) => {
            if state.edit_mode == edit_mode {
                return Transition::quiet(state);
            }
            state.edit_mode = edit_mode;
            let message = if edit_mode { "Edit session started" } else { "Edit session ended" };
            Transition::with(state, vec![editor(message)])
        }
        Mutation::SetModalOpen(open) => {
            state.modal_open = open;
            Transition::quiet(state)
        }
        Mutation::SetConfMenuIndex(index) => {
            state.conf_menu_index = index;
            Transition::quiet(state)
        }
        Mutation::SetCriticalError(message) => {
            let effects = message
                .iter()
                .map(|m| Effect::ReportError { message: m.clone(), trace: None })
                .collect();
            state.critical_error = message;
            Transition::with(state, effects)
        }
        Mutation::RaiseCriticalError { error, trace } => {
            let message = error.to_string();
            state.critical_error = Some(message.clone());
            Transition::with(state, vec![Effect::ReportError { message, trace }])
        }

        Mutation::SetTheme(theme) => {
            set_persisted_display_value(state, "theme", StorageKey::Theme, theme, "Theme updated")
        }
        Mutation::SetItemLayout(layout) => set_persisted_display_value(
            state,
            "layout",
            StorageKey::LayoutOrientation,
            layout,
            "Layout updated",
        ),
        Mutation::SetItemSize(size) => set_persisted_display_value(
            state,
            "iconSize",
            StorageKey::IconSize,
            size,
            "Item size updated",
        ),
        Mutation::SetLanguage(lang) => {
            state.config.app_config.set("language", lang);
            Transition::quiet(state)
        }
        Mutation::SetCustomColors(colors) => {
            state.config.app_config.set("customColors", colors);
            Transition::with(state, vec![info("Color palette updated", InfoKey::Visual)])
        }
        Mutation::UpdateCustomCss(css) => {
            state.config.app_config.set("customCss", css);
            Transition::with(state, vec![info("Custom colors updated", InfoKey::Visual)])
        }

        Mutation::SetPageInfo(page_info) => {
            state.config.page_info = page_info;
            Transition::with(state, vec![editor("Page info updated")])
        }
        Mutation::SetAppConfig(app_config) => {
            state.config.app_config = app_config;
            Transition::with(state, vec![editor("App config updated")])
        }
        Mutation::SetPages(pages) => {
            state.config.pages = Some(pages);
            Transition::with(state, vec![editor("Pages updated")])
        }

        Mutation::SetSections(sections) => {
            state.config.sections = sections;
            Transition::with(state, vec![editor("Sections updated")])
        }
        Mutation::InsertSection { section, index } => {
            let mut sections = std::mem::take(&mut state.config.sections);
            let index = index.min(sections.len());
            sections.insert(index, section);
            state.config.sections = apply_item_ids(sections);
            Transition::with(state, vec![editor("Section added")])
        }
        Mutation::RemoveSection(name) => {
            let Some(position) = state.config.sections.iter().position(|s| s.name == name) else {
                return Transition::quiet(state);
            };
            let mut sections = std::mem::take(&mut state.config.sections);
            sections.remove(position);
            state.config.sections = apply_item_ids(sections);
            Transition::with(state, vec![editor("Section removed")])
        }
        Mutation::UpdateSection { index, section } => {
            let Some(slot) = state.config.sections.get_mut(index) else {
                return Transition::quiet(state);
            };
            *slot = section;
            Transition::with(state, vec![editor("Section updated")])
        }

        Mutation::UpdateItem { item_id, item } => {
            let slot = state
                .config
                .sections
                .iter_mut()
                .flat_map(|s| s.items.iter_mut())
                .find(|existing| existing.id.as_deref() == Some(item_id.as_str()));
            match slot {
                Some(slot) => {
                    *slot = item;
                    Transition::with(state, vec![editor("Item updated")])
                }
                None => Transition::quiet(state),
            }
        }
        Mutation::InsertItem { item, target_section, append_to } => {
            add_item_to_section(state, item, &target_section, append_to, "Item added")
        }
        Mutation::CopyItem { item, to_section, append_to } => {
            add_item_to_section(state, item, &to_section, append_to, "Item copied")
        }
        Mutation::RemoveItem { item_id, section_name } => {
            let mut effects = Vec::new();
            for section in state.config.sections.iter_mut().filter(|s| s.name == section_name) {
                let before = section.items.len();
                section.items.retain(|item| item.id.as_deref() != Some(item_id.as_str()));
                if section.items.len() != before {
                    effects.push(editor("Item removed"));
                }
            }
            state.config.sections = apply_item_ids(std::mem::take(&mut state.config.sections));
            Transition::with(state, effects)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(name: &str, titles: &[&str]) -> Section {
        Section::new(name).with_items(titles.iter().map(|t| Item::new(*t, "http://x")).collect())
    }

    fn state_with(sections: Vec<Section>) -> StoreState {
        let mut state = StoreState::default();
        state.config.sections = apply_item_ids(sections);
        state
    }

    fn names(state: &StoreState) -> Vec<&str> {
        state.config.sections.iter().map(|s| s.name.as_str()).collect()
    }

    fn info_messages(effects: &[Effect]) -> Vec<&'static str> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Info { message, .. } => Some(*message),
                _ => None,
            })
            .collect()
    }

    // ── Look and feel ────────────────────────────────────────────────────────

    #[test]
    fn test_set_theme_updates_app_config_and_persists_root_key() {
        // Act
        let t = reduce(StoreState::default(), Mutation::SetTheme("nord".into()));

        // Assert
        assert_eq!(t.state.config.app_config.theme(), Some("nord"));
        assert_eq!(
            t.effects,
            vec![
                Effect::Persist { key: "theme".into(), value: "nord".into() },
                Effect::Info { message: "Theme updated", key: InfoKey::Visual },
            ]
        );
    }

    #[test]
    fn test_set_item_layout_persists_page_scoped_key() {
        let mut state = StoreState::default();
        state.current_config_info = CurrentConfigInfo::sub_page("/work.yml", "work");

        let t = reduce(state, Mutation::SetItemLayout("vertical".into()));

        assert_eq!(t.state.config.app_config.get_str("layout"), Some("vertical"));
        assert_eq!(
            t.effects[0],
            Effect::Persist { key: "layoutOrientation-work".into(), value: "vertical".into() }
        );
    }

    #[test]
    fn test_set_item_size_persists_icon_size() {
        let t = reduce(StoreState::default(), Mutation::SetItemSize("small".into()));
        assert_eq!(t.state.config.app_config.get_str("iconSize"), Some("small"));
        assert_eq!(t.effects[0], Effect::Persist { key: "iconSize".into(), value: "small".into() });
    }

    #[test]
    fn test_set_language_and_custom_css_write_app_config() {
        let t = reduce(StoreState::default(), Mutation::SetLanguage("de".into()));
        assert_eq!(t.state.config.app_config.get_str("language"), Some("de"));
        assert!(t.effects.is_empty());

        let t = reduce(t.state, Mutation::UpdateCustomCss("body{}".into()));
        assert_eq!(t.state.config.app_config.get_str("customCss"), Some("body{}"));
        assert_eq!(info_messages(&t.effects), vec!["Custom colors updated"]);
    }

    // ── Session flags ────────────────────────────────────────────────────────

    #[test]
    fn test_set_edit_mode_emits_only_on_change() {
        let t = reduce(StoreState::default(), Mutation::SetEditMode(false));
        assert!(t.effects.is_empty());

        let t = reduce(t.state, Mutation::SetEditMode(true));
        assert!(t.state.edit_mode);
        assert_eq!(info_messages(&t.effects), vec!["Edit session started"]);

        let t = reduce(t.state, Mutation::SetEditMode(true));
        assert!(t.effects.is_empty());

        let t = reduce(t.state, Mutation::SetEditMode(false));
        assert_eq!(info_messages(&t.effects), vec!["Edit session ended"]);
    }

    #[test]
    fn test_set_critical_error_reports_only_non_null() {
        let t = reduce(StoreState::default(), Mutation::SetCriticalError(Some("boom".into())));
        assert_eq!(t.state.critical_error.as_deref(), Some("boom"));
        assert_eq!(t.effects, vec![Effect::ReportError { message: "boom".into(), trace: None }]);

        let t = reduce(t.state, Mutation::SetCriticalError(None));
        assert!(t.state.critical_error.is_none());
        assert!(t.effects.is_empty());
    }

    #[test]
    fn test_raise_critical_error_overwrites_slot_with_display_text() {
        let mut state = StoreState::default();
        state.critical_error = Some("older".into());

        let t = reduce(
            state,
            Mutation::RaiseCriticalError {
                error: CriticalError::SubConfigNotFound("nope".into()),
                trace: None,
            },
        );

        assert_eq!(t.state.critical_error.as_deref(), Some("Unable to find config for 'nope'"));
    }

    // ── Sections ─────────────────────────────────────────────────────────────

    #[test]
    fn test_insert_section_at_index_reassigns_ids() {
        // Arrange
        let state = state_with(vec![section("A", &["One"]), section("C", &["Three"])]);

        // Act
        let t = reduce(
            state,
            Mutation::InsertSection { section: section("B", &["Two"]), index: 1 },
        );

        // Assert
        assert_eq!(names(&t.state), vec!["A", "B", "C"]);
        assert!(t.state.config.sections[1].items[0].id.is_some());
        assert_eq!(info_messages(&t.effects), vec!["Section added"]);
    }

    #[test]
    fn test_insert_section_past_end_appends() {
        let state = state_with(vec![section("A", &[])]);
        let t = reduce(state, Mutation::InsertSection { section: section("Z", &[]), index: 99 });
        assert_eq!(names(&t.state), vec!["A", "Z"]);
    }

    #[test]
    fn test_remove_section_missing_name_is_noop_without_event() {
        let state = state_with(vec![section("A", &["x"]), section("B", &["y"])]);
        let before = state.clone();

        let t = reduce(state, Mutation::RemoveSection("Nope".into()));

        assert_eq!(t.state, before);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn test_remove_section_by_name() {
        let state = state_with(vec![section("A", &["x"]), section("B", &["y"])]);
        let t = reduce(state, Mutation::RemoveSection("A".into()));
        assert_eq!(names(&t.state), vec!["B"]);
        assert_eq!(info_messages(&t.effects), vec!["Section removed"]);
    }

    #[test]
    fn test_update_section_replaces_in_place_and_ignores_bad_index() {
        let state = state_with(vec![section("A", &[]), section("B", &[])]);

        let t = reduce(state, Mutation::UpdateSection { index: 1, section: section("B2", &[]) });
        assert_eq!(names(&t.state), vec!["A", "B2"]);
        assert_eq!(info_messages(&t.effects), vec!["Section updated"]);

        let t = reduce(t.state, Mutation::UpdateSection { index: 7, section: section("X", &[]) });
        assert_eq!(names(&t.state), vec!["A", "B2"]);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn test_set_sections_keeps_supplied_ids() {
        let supplied = vec![Section::new("A").with_items(vec![Item::new("t", "u").with_id("custom")])];
        let t = reduce(StoreState::default(), Mutation::SetSections(supplied.clone()));
        assert_eq!(t.state.config.sections, supplied);
        assert_eq!(info_messages(&t.effects), vec!["Sections updated"]);
    }

    // ── Items ────────────────────────────────────────────────────────────────

    #[test]
    fn test_update_item_replaces_first_match_only() {
        // Arrange
        let mut state = state_with(vec![section("A", &["x"]), section("B", &["y"])]);
        state.config.sections[0].items[0].id = Some("dup".into());
        state.config.sections[1].items[0].id = Some("dup".into());

        // Act
        let t = reduce(
            state,
            Mutation::UpdateItem { item_id: "dup".into(), item: Item::new("new", "http://new") },
        );

        // Assert
        assert_eq!(t.state.config.sections[0].items[0].title.as_deref(), Some("new"));
        assert_eq!(t.state.config.sections[1].items[0].title.as_deref(), Some("y"));
        assert_eq!(info_messages(&t.effects), vec!["Item updated"]);
    }

    #[test]
    fn test_update_item_unknown_id_is_quiet() {
        let state = state_with(vec![section("A", &["x"])]);
        let t = reduce(state.clone(), Mutation::UpdateItem { item_id: "nope".into(), item: Item::default() });
        assert_eq!(t.state, state);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn test_insert_item_at_beginning_and_end() {
        let state = state_with(vec![section("A", &["Middle"])]);

        let t = reduce(
            state,
            Mutation::InsertItem {
                item: Item::new("First", "u"),
                target_section: "A".into(),
                append_to: AppendTo::Beginning,
            },
        );
        let t = reduce(
            t.state,
            Mutation::InsertItem {
                item: Item::new("Last", "u"),
                target_section: "A".into(),
                append_to: AppendTo::End,
            },
        );

        let titles: Vec<_> = t.state.config.sections[0]
            .items
            .iter()
            .map(|i| i.title.as_deref().unwrap())
            .collect();
        assert_eq!(titles, vec!["First", "Middle", "Last"]);
        assert!(t.state.config.sections[0].items[2].id.as_deref().unwrap().starts_with("2_"));
    }

    #[test]
    fn test_remove_item_from_named_section() {
        let state = state_with(vec![section("A", &["x", "y"])]);
        let id = state.config.sections[0].items[0].id.clone().unwrap();

        let t = reduce(state, Mutation::RemoveItem { item_id: id, section_name: "A".into() });

        assert_eq!(t.state.config.sections[0].items.len(), 1);
        assert_eq!(t.state.config.sections[0].items[0].title.as_deref(), Some("y"));
        assert!(t.state.config.sections[0].items[0].id.as_deref().unwrap().starts_with("0_"));
        assert_eq!(info_messages(&t.effects), vec!["Item removed"]);
    }

    #[test]
    fn test_copy_item_to_other_section() {
        let state = state_with(vec![section("A", &["x"]), section("B", &[])]);
        let item = state.config.sections[0].items[0].clone();

        let t = reduce(
            state,
            Mutation::CopyItem { item, to_section: "B".into(), append_to: AppendTo::End },
        );

        assert_eq!(t.state.config.sections[0].items.len(), 1);
        assert_eq!(t.state.config.sections[1].items.len(), 1);
        assert_ne!(t.state.config.sections[0].items[0].id, t.state.config.sections[1].items[0].id);
        assert_eq!(info_messages(&t.effects), vec!["Item copied"]);
    }

    #[test]
    fn test_set_pages_and_page_info_emit_editor_events() {
        let t = reduce(StoreState::default(), Mutation::SetPages(vec![Page::new("Work", "work.yml")]));
        assert_eq!(t.state.config.pages().len(), 1);
        assert_eq!(t.effects, vec![Effect::Info { message: "Pages updated", key: InfoKey::Editor }]);

        let t = reduce(t.state, Mutation::SetPageInfo(PageInfo::titled("New")));
        assert_eq!(t.state.config.page_info.title.as_deref(), Some("New"));
    }
}
