//! Built-in fallback values used when neither the document nor a local
//! override supplies one.

use serde_json::Value;

use crate::domain::config::AppConfig;

/// Path of the root configuration document when nothing else is configured.
pub const DEFAULT_CONFIG_PATH: &str = "/conf.yml";

/// Environment variable that overrides the root configuration path.
pub const CONFIG_PATH_ENV: &str = "SHIPYARD_CONFIG_PATH";

/// Page title of the fallback configuration returned after a failed load.
pub const FALLBACK_TITLE: &str = "Shipyard";

/// Theme applied when neither local storage nor `appConfig.theme` sets one.
pub const DEFAULT_THEME: &str = "default";

/// Item layout applied when neither local storage nor `appConfig.layout` sets one.
pub const DEFAULT_LAYOUT: &str = "auto";

/// Icon size applied when neither local storage nor `appConfig.iconSize` sets one.
pub const DEFAULT_ICON_SIZE: &str = "medium";

/// Slug given to pages whose display name is empty.
pub const UNNAMED_PAGE: &str = "unnamed-page";

/// Which page furniture is shown when `appConfig.hideComponents` is silent.
///
/// | Component     | Default |
/// |---------------|---------|
/// | splash screen | hidden  |
/// | navigation    | shown   |
/// | page title    | shown   |
/// | search bar    | shown   |
/// | settings      | shown   |
/// | footer        | shown   |
pub const DEFAULT_VISIBLE_COMPONENTS: VisibleComponents = VisibleComponents {
    splash_screen: false,
    navigation: true,
    page_title: true,
    search_bar: true,
    settings: true,
    footer: true,
};

/// Visibility of the page furniture around the section grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleComponents {
    pub splash_screen: bool,
    pub navigation: bool,
    pub page_title: bool,
    pub search_bar: bool,
    pub settings: bool,
    pub footer: bool,
}

impl Default for VisibleComponents {
    fn default() -> Self {
        DEFAULT_VISIBLE_COMPONENTS
    }
}

impl VisibleComponents {
    /// Applies `appConfig.hideComponents` on top of the defaults.
    ///
    /// Only literal booleans count; `hideNav: "true"` is ignored.  The splash
    /// screen is opted into with `appConfig.showSplashScreen: true`.
    pub fn from_app_config(app_config: &AppConfig) -> Self {
        let mut visible = DEFAULT_VISIBLE_COMPONENTS;
        if let Some(true) = app_config.get("showSplashScreen").and_then(Value::as_bool) {
            visible.splash_screen = true;
        }
        let Some(hide) = app_config.get("hideComponents").and_then(Value::as_object) else {
            return visible;
        };
        let flag = |key: &str| hide.get(key).and_then(Value::as_bool);
        if let Some(hidden) = flag("hideHeading") {
            visible.page_title = !hidden;
        }
        if let Some(hidden) = flag("hideNav") {
            visible.navigation = !hidden;
        }
        if let Some(hidden) = flag("hideSearch") {
            visible.search_bar = !hidden;
        }
        if let Some(hidden) = flag("hideSettings") {
            visible.settings = !hidden;
        }
        if let Some(hidden) = flag("hideFooter") {
            visible.footer = !hidden;
        }
        visible
    }
}
