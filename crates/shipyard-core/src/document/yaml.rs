//! YAML documents (`conf.yml`), the default format.

use tracing::debug;

use super::{ConfigParser, ParseError};
use crate::domain::config::Configuration;

/// Parses YAML configuration documents with `serde_yaml`.
///
/// The text is first read into a generic `serde_yaml::Value` so an empty
/// document (`null`) can be told apart from a malformed one, then converted
/// into the typed [`Configuration`].
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlConfigParser;

impl ConfigParser for YamlConfigParser {
    fn format_name(&self) -> &'static str {
        "YAML"
    }

    fn parse(&self, text: &str) -> Result<Configuration, ParseError> {
        if text.trim().is_empty() {
            return Err(ParseError::Empty);
        }
        let value: serde_yaml::Value =
            serde_yaml::from_str(text).map_err(|e| ParseError::Syntax(e.to_string()))?;
        if value.is_null() {
            return Err(ParseError::Empty);
        }
        let config: Configuration =
            serde_yaml::from_value(value).map_err(|e| ParseError::Syntax(e.to_string()))?;
        debug!(sections = config.sections.len(), "parsed YAML configuration");
        Ok(config)
    }
}
