//! Integration tests for the shipyard-core document model.
//!
//! These tests drive realistic dashboard documents through the public API,
//! exercising the parser, the document types, item id derivation, page slugs,
//! and the permission evaluator together.

use shipyard_core::{
    apply_item_ids, compute_permissions, format_config_path, make_page_name, parser_for_path,
    AuthRole, ConfigParser, Configuration, JsonConfigParser, ParseError, PermissionSet,
    YamlConfigParser,
};

const HOME_LAB: &str = r#"
pageInfo:
  title: Home Lab
  description: Everything on the LAN
  navLinks:
    - title: GitHub
      path: https://github.com
  footerText: ''
appConfig:
  theme: colorful
  layout: horizontal
  iconSize: large
  preventLocalSave: true
  webSearch:
    searchEngine: duckduckgo
sections:
  - name: Media
    displayData:
      cols: 2
    items:
      - title: Jellyfin
        url: http://jellyfin.lan
        icon: hl-jellyfin
      - title: Sonarr
        url: http://sonarr.lan
  - name: Monitoring
    items:
      - title: Grafana
        url: http://grafana.lan
pages:
  - name: Work Stuff
    path: work.yml
  - name: Remote
    path: https://example.com/remote.yml
"#;

fn parse_home_lab() -> Configuration {
    YamlConfigParser.parse(HOME_LAB).expect("home lab document must parse")
}

#[test]
fn test_home_lab_document_parses_every_part() {
    let cfg = parse_home_lab();

    assert_eq!(cfg.page_info.title.as_deref(), Some("Home Lab"));
    assert_eq!(cfg.page_info.nav_links.as_ref().map(Vec::len), Some(1));
    assert_eq!(cfg.app_config.get_str("layout"), Some("horizontal"));
    assert_eq!(cfg.sections.len(), 2);
    assert_eq!(cfg.sections[0].items.len(), 2);
    assert_eq!(cfg.pages().len(), 2);
}

#[test]
fn test_page_paths_resolve_through_slug_lookup() {
    let cfg = parse_home_lab();

    let work = cfg
        .pages()
        .iter()
        .find(|p| make_page_name(&p.name) == "work-stuff")
        .expect("work page must be found by slug");
    assert_eq!(format_config_path(work.path.as_deref()).as_deref(), Some("/work.yml"));

    let remote = cfg
        .pages()
        .iter()
        .find(|p| make_page_name(&p.name) == "remote")
        .expect("remote page must be found by slug");
    assert_eq!(
        format_config_path(remote.path.as_deref()).as_deref(),
        Some("https://example.com/remote.yml")
    );
}

#[test]
fn test_yaml_and_json_documents_produce_equal_configurations() {
    let from_yaml = parse_home_lab();
    let json = serde_json::to_string(&from_yaml).expect("serialize to JSON");
    let from_json = JsonConfigParser.parse(&json).expect("parse JSON");

    assert_eq!(from_yaml, from_json);
}

#[test]
fn test_item_ids_are_unique_after_assignment() {
    // "AB" and "BA" have the same character sum.
    let mut cfg = parse_home_lab();
    let extra = YamlConfigParser
        .parse("sections:\n  - name: AB\n    items:\n      - title: Plex\n  - name: BA\n    items:\n      - title: Plex\n")
        .expect("parse extra sections");
    cfg.sections.extend(extra.sections);
    let sections = apply_item_ids(cfg.sections);

    let mut ids: Vec<String> = sections
        .iter()
        .flat_map(|s| s.items.iter())
        .filter_map(|i| i.id.clone())
        .collect();
    let total = ids.len();
    ids.sort();
    ids.dedup();

    assert_eq!(total, 5);
    assert_eq!(ids.len(), total, "item ids must be unique");
}

#[test]
fn test_document_flags_feed_permission_evaluator() {
    let cfg = parse_home_lab();

    let perms = compute_permissions(&cfg.app_config, AuthRole::admin());

    assert_eq!(
        perms,
        PermissionSet {
            allow_write_to_disk: true,
            allow_save_locally: false,
            allow_view_config: true,
        }
    );
}

#[test]
fn test_parser_selected_from_path_reports_format_in_errors() {
    let parser = parser_for_path("/conf.yml");
    let err = parser.parse("sections: [").unwrap_err();

    assert_eq!(parser.format_name(), "YAML");
    assert!(matches!(err, ParseError::Syntax(_)));
}
