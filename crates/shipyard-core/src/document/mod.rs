//! Turning raw document text into a [`Configuration`].
//!
//! The store never talks to a parsing library directly.  It holds a
//! [`ConfigParser`] trait object so the document format can be swapped
//! (YAML by default, JSON when the root path ends in `.json`) and so that
//! parse failures surface as a [`ParseError`] that the store can tell apart
//! from fetch failures.
//!
//! # Empty documents
//!
//! An empty root document is a parse failure: there is nothing to display
//! and the user almost certainly pointed at the wrong file.  An empty
//! sub-page document is legal and resolves to an empty configuration that
//! then inherits `appConfig` and `pages` from the root.

mod json;
mod yaml;

pub use json::JsonConfigParser;
pub use yaml::YamlConfigParser;

use thiserror::Error;

use crate::domain::config::Configuration;

/// Error returned when document text cannot become a [`Configuration`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The text is not well-formed, or its shape does not match a configuration.
    #[error("{0}")]
    Syntax(String),

    /// The document contains no value at all.
    #[error("document is empty")]
    Empty,
}

/// Structured-document parser used for both root and sub-page documents.
pub trait ConfigParser: Send + Sync {
    /// Human-readable format name used in error messages (`"YAML"`, `"JSON"`).
    fn format_name(&self) -> &'static str;

    /// Parses a root document.  Empty documents are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Empty`] for a blank or null document and
    /// [`ParseError::Syntax`] for anything malformed.
    fn parse(&self, text: &str) -> Result<Configuration, ParseError>;

    /// Parses a sub-page document.  Empty documents yield an empty configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Syntax`] for anything malformed.
    fn parse_sub_config(&self, text: &str) -> Result<Configuration, ParseError> {
        match self.parse(text) {
            Err(ParseError::Empty) => Ok(Configuration::default()),
            other => other,
        }
    }
}

/// Picks a parser from a document path's extension.  Anything that is not
/// `.json` is treated as YAML.
pub fn parser_for_path(path: &str) -> Box<dyn ConfigParser> {
    if path.to_ascii_lowercase().ends_with(".json") {
        Box::new(JsonConfigParser)
    } else {
        Box::new(YamlConfigParser)
    }
}
