//! Item id derivation, item lookup, and section visibility.
//!
//! # Item ids
//!
//! Ids are derived, not authored.  Every structural edit to the section list
//! re-runs [`apply_item_ids`], so an item's id can change when a section is
//! inserted or removed before it.  Anything that keeps a reference to an item
//! across structural edits must look it up again afterwards.

use std::collections::HashSet;

use serde_json::Value;

use crate::domain::config::{Item, Section};

/// Derives the id of the item at `index` within `section_name`.
///
/// Format: `{index}_{charSum(section_name)}_{title}` where the title is
/// lowercased with spaces replaced by underscores.
fn make_item_id(section_name: &str, title: &str, index: usize) -> String {
    let char_sum: u32 = section_name.encode_utf16().map(u32::from).sum();
    let title = title.replace(' ', "_").to_lowercase();
    format!("{index}_{char_sum}_{title}")
}

/// Reassigns an id to every item of every section.
///
/// Ids are unique across the whole list.  Sections whose names share a
/// character sum ("AB" and "BA") would derive the same id for a same-titled
/// item at the same position, so a clash is suffixed with the section's
/// position until it is free.
pub fn apply_item_ids(mut sections: Vec<Section>) -> Vec<Section> {
    let mut taken = HashSet::new();
    for (position, section) in sections.iter_mut().enumerate() {
        let name = section.name.clone();
        for (index, item) in section.items.iter_mut().enumerate() {
            let title = item.title.as_deref().unwrap_or("item");
            let mut id = make_item_id(&name, title, index);
            while taken.contains(&id) {
                id = format!("{id}_{position}");
            }
            taken.insert(id.clone());
            item.id = Some(id);
        }
    }
    sections
}

/// Finds the first item whose id is `item_id`, across all sections.
pub fn find_item<'a>(sections: &'a [Section], item_id: &str) -> Option<&'a Item> {
    sections
        .iter()
        .flat_map(|s| s.items.iter())
        .find(|item| item.id.as_deref() == Some(item_id))
}

/// Finds the section owning the first item whose id is `item_id`.
pub fn find_parent_section<'a>(sections: &'a [Section], item_id: &str) -> Option<&'a Section> {
    sections
        .iter()
        .find(|s| s.items.iter().any(|item| item.id.as_deref() == Some(item_id)))
}

// ── Visibility ────────────────────────────────────────────────────────────────

/// Who is looking at the dashboard, as far as section visibility cares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewer {
    pub username: Option<String>,
    pub is_guest: bool,
}

fn name_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|names| {
            names
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_lowercase)
                .collect()
        })
        .unwrap_or_default()
}

fn is_visible_to(section: &Section, viewer: &Viewer) -> bool {
    let Some(display) = section.display_data() else {
        return true;
    };
    let username = viewer.username.as_deref().map(str::to_lowercase);

    if viewer.is_guest && matches!(display.get("hideForGuests"), Some(Value::Bool(true))) {
        return false;
    }

    let hide_for = name_list(display.get("hideForUsers"));
    if let Some(name) = &username {
        if hide_for.contains(name) {
            return false;
        }
    }

    let show_for = name_list(display.get("showForUsers"));
    if !show_for.is_empty() {
        return username.map_or(false, |name| show_for.contains(&name));
    }

    true
}

/// Returns the sections `viewer` is allowed to see, in order.
///
/// Reads `displayData.hideForGuests`, `displayData.hideForUsers`, and
/// `displayData.showForUsers`.  User names compare case-insensitively.
pub fn filter_visible_sections(sections: &[Section], viewer: &Viewer) -> Vec<Section> {
    sections
        .iter()
        .filter(|section| is_visible_to(section, viewer))
        .cloned()
        .collect()
}
