//! JSON documents (`conf.json`).

use serde_json::Value;

use super::{ConfigParser, ParseError};
use crate::domain::config::Configuration;

/// Parses JSON configuration documents with `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonConfigParser;

impl ConfigParser for JsonConfigParser {
    fn format_name(&self) -> &'static str {
        "JSON"
    }

    fn parse(&self, text: &str) -> Result<Configuration, ParseError> {
        if text.trim().is_empty() {
            return Err(ParseError::Empty);
        }
        let value: Value =
            serde_json::from_str(text).map_err(|e| ParseError::Syntax(e.to_string()))?;
        if value.is_null() {
            return Err(ParseError::Empty);
        }
        serde_json::from_value(value).map_err(|e| ParseError::Syntax(e.to_string()))
    }
}
