//! Integration tests for configuration resolution.
//!
//! These tests assemble a `ConfigStore` from the real infrastructure adapters
//! (directory fetcher, JSON file storage, static auth) and drive it through
//! the scenarios a dashboard session goes through: first load, sub-page
//! navigation, local edits saved and reloaded, and recovery from bad data.

use std::path::Path;
use std::sync::{Arc, Mutex};

use shipyard_core::{CurrentConfigInfo, Item, PermissionSet, Section};
use shipyard_store::infrastructure::auth::{Role, StaticAuth};
use shipyard_store::infrastructure::fetch::{DirectoryFetcher, ScriptedFetcher};
use shipyard_store::infrastructure::reporting::TracingReporter;
use shipyard_store::infrastructure::storage::local::{JsonFileStorage, MemoryStorage};
use shipyard_store::{ConfigStore, EventReporter, InfoKey, KeyValueStore};

const ROOT: &str = r#"
pageInfo:
  title: Home Lab
appConfig:
  theme: dark
  layout: vertical
  disableConfigurationForNonAdmin: true
sections:
  - name: Media
    items:
      - title: Jellyfin
        url: http://jellyfin.lan
  - name: Monitoring
    items:
      - title: Grafana
        url: http://grafana.lan
pages:
  - name: Sub Page
    path: sub-page.yml
"#;

const SUB_PAGE: &str = r#"
pageInfo:
  title: Sub
appConfig:
  theme: light
  layout: horizontal
sections:
  - name: Work
    items:
      - title: Tracker
        url: http://tracker.lan
"#;

/// Records every reported event so tests can assert on them.
#[derive(Default)]
struct RecordingReporter {
    errors: Mutex<Vec<String>>,
    infos: Mutex<Vec<(String, InfoKey)>>,
}

impl RecordingReporter {
    fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    fn info_count(&self) -> usize {
        self.infos.lock().unwrap().len()
    }
}

impl EventReporter for RecordingReporter {
    fn report(&self, message: &str, _trace: Option<String>) {
        self.errors.lock().unwrap().push(message.to_string());
    }

    fn info(&self, message: &str, key: InfoKey) {
        self.infos.lock().unwrap().push((message.to_string(), key));
    }
}

fn write_documents(dir: &Path) {
    std::fs::write(dir.join("conf.yml"), ROOT).expect("write root");
    std::fs::write(dir.join("sub-page.yml"), SUB_PAGE).expect("write sub page");
}

fn directory_store(dir: &Path, role: Role) -> ConfigStore {
    let storage = JsonFileStorage::open(dir.join("local-storage.json")).expect("storage");
    ConfigStore::new(
        Arc::new(DirectoryFetcher::new(dir)),
        Arc::new(StaticAuth::new(role)),
        Arc::new(storage),
        Arc::new(TracingReporter),
    )
}

fn names(sections: &[Section]) -> Vec<&str> {
    sections.iter().map(|s| s.name.as_str()).collect()
}

#[tokio::test]
async fn test_root_then_sub_page_navigation_from_directory() {
    // Arrange
    let dir = tempfile::tempdir().expect("tempdir");
    write_documents(dir.path());
    let mut store = directory_store(dir.path(), Role::Admin);

    // Act
    let root = store.resolve_config(None).await;
    let sub = store.resolve_config(Some("sub-page")).await;

    // Assert
    assert_eq!(names(&root.sections), vec!["Media", "Monitoring"]);
    assert_eq!(names(&sub.sections), vec!["Work"]);
    assert_eq!(sub.app_config.theme(), Some("light"));
    assert_eq!(sub.app_config.get_str("layout"), Some("vertical"));
    assert_eq!(sub.pages(), root.pages());
    assert_eq!(
        store.state().current_config_info,
        CurrentConfigInfo::sub_page("/sub-page.yml", "sub-page")
    );
    assert!(store.critical_error().is_none());
}

#[tokio::test]
async fn test_sub_page_fetch_path_and_unknown_page() {
    // Arrange
    let fetcher = Arc::new(
        ScriptedFetcher::new()
            .with_body("/conf.yml", ROOT)
            .with_body("/sub-page.yml", SUB_PAGE),
    );
    let mut store = ConfigStore::new(
        fetcher.clone(),
        Arc::new(StaticAuth::new(Role::Admin)),
        Arc::new(MemoryStorage::new()),
        Arc::new(TracingReporter),
    );

    // Act
    store.resolve_config(Some("sub-page")).await;
    store.resolve_config(Some("no-such-page")).await;

    // Assert
    assert_eq!(fetcher.requests(), vec!["/conf.yml", "/sub-page.yml"]);
    assert!(store
        .critical_error()
        .unwrap()
        .contains("Unable to find config for"));
}

#[tokio::test]
async fn test_local_edits_survive_a_new_session() {
    // Arrange
    let dir = tempfile::tempdir().expect("tempdir");
    write_documents(dir.path());
    let mut first = directory_store(dir.path(), Role::Admin);
    first.resolve_config(Some("sub-page")).await;

    // Act
    first.insert_section(
        Section::new("Notes").with_items(vec![Item::new("Wiki", "http://wiki.lan")]),
        0,
    );
    first.set_theme("nord");
    first.save_sections_locally().expect("save");
    drop(first);

    let mut second = directory_store(dir.path(), Role::Admin);
    let root = second.resolve_config(None).await;
    let root_theme = second.theme();
    let sub = second.resolve_config(Some("sub-page")).await;

    // Assert
    assert_eq!(names(&root.sections), vec!["Media", "Monitoring"]);
    assert_eq!(root_theme, "dark");
    assert!(second.is_using_local_config());
    assert_eq!(names(&sub.sections), vec!["Notes", "Work"]);
    assert_eq!(second.theme(), "nord");
}

#[tokio::test]
async fn test_malformed_local_override_is_reported_and_ignored() {
    // Arrange
    let storage = Arc::new(MemoryStorage::new());
    storage.set_item("confSections", "{invalid}");
    let reporter = Arc::new(RecordingReporter::default());
    let mut store = ConfigStore::new(
        Arc::new(ScriptedFetcher::new().with_body("/conf.yml", ROOT)),
        Arc::new(StaticAuth::new(Role::Admin)),
        storage,
        reporter.clone(),
    );

    // Act
    let config = store.resolve_config(None).await;

    // Assert
    assert_eq!(names(&config.sections), vec!["Media", "Monitoring"]);
    assert!(!store.is_using_local_config());
    assert_eq!(reporter.errors(), vec!["Malformed section data in local storage"]);
}

#[tokio::test]
async fn test_missing_root_document_yields_fallback() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = directory_store(dir.path(), Role::User);

    let config = store.resolve_config(None).await;

    assert_eq!(config.page_info.title.as_deref(), Some("Shipyard"));
    assert!(config.sections.is_empty());
    assert_eq!(
        store.critical_error(),
        Some("Failed to fetch configuration: Server responded with status 404")
    );
}

#[tokio::test]
async fn test_permissions_follow_role() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_documents(dir.path());

    let mut admin = directory_store(dir.path(), Role::Admin);
    admin.resolve_config(None).await;
    let mut user = directory_store(dir.path(), Role::User);
    user.resolve_config(None).await;

    assert_eq!(admin.permissions(), PermissionSet::ALL);
    assert_eq!(user.permissions(), PermissionSet::NONE);
    assert!(user.save_sections_locally().is_err());
}

#[tokio::test]
async fn test_remove_unknown_section_changes_nothing() {
    // Arrange
    let reporter = Arc::new(RecordingReporter::default());
    let mut store = ConfigStore::new(
        Arc::new(ScriptedFetcher::new().with_body("/conf.yml", ROOT)),
        Arc::new(StaticAuth::new(Role::Admin)),
        Arc::new(MemoryStorage::new()),
        reporter.clone(),
    );
    let before = store.resolve_config(None).await;
    let events_before = reporter.info_count();

    // Act
    store.remove_section("Does Not Exist");

    // Assert
    assert_eq!(store.config(), &before);
    assert_eq!(reporter.info_count(), events_before);
}
