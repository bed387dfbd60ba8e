//! Ruleset configuration: which rules run and with what options.
//!
//! A ruleset maps rule identifiers to option values. It can be written as a
//! JSON object (the `.htmlhintrc` shape) or as TOML:
//!
//! ```toml
//! [block-words]
//! all = ["bad-name"]
//! attributeValues = ['\bshare-panel\b']
//! ```
//!
//! An entry set to `false` turns the rule off; a missing entry leaves the
//! rule uninitialized.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Errors loading a ruleset.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum ConfigError {
    /// The ruleset file could not be read.
    #[error("failed to read {path}: {source}")]
    #[diagnostic(code(markguard::config::io))]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// JSON syntax or shape error.
    #[error("invalid JSON ruleset: {message}")]
    #[diagnostic(
        code(markguard::config::json),
        help("a ruleset is an object mapping rule ids to options")
    )]
    Json {
        /// Parser message.
        message: String,
    },

    /// TOML syntax or shape error.
    #[error("invalid TOML ruleset: {message}")]
    #[diagnostic(
        code(markguard::config::toml),
        help("a ruleset is a table of rule ids, e.g. `[block-words]`")
    )]
    Toml {
        /// Parser message.
        message: String,
    },

    /// File extension is neither `.json`, `.toml`, nor a bare rc file.
    #[error("unsupported ruleset format: {path}")]
    #[diagnostic(code(markguard::config::format), help("use a .json or .toml file"))]
    UnsupportedFormat {
        /// Offending path.
        path: PathBuf,
    },
}

/// Per-rule options keyed by rule identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ruleset {
    rules: Map<String, Value>,
}

impl Ruleset {
    /// Creates an empty ruleset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the options for one rule.
    #[must_use]
    pub fn with_rule(mut self, id: impl Into<String>, options: Value) -> Self {
        self.rules.insert(id.into(), options);
        self
    }

    /// Loads a ruleset from a file, choosing the format by extension.
    ///
    /// Files ending in `.toml` are read as TOML; `.json` and extensionless
    /// rc files (e.g. `.htmlhintrc`) are read as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::parse_toml(&content),
            Some("json") | None => Self::parse_json(&content),
            Some(_) => Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Parses a ruleset from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or not an object.
    pub fn parse_json(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::Json {
            message: e.to_string(),
        })
    }

    /// Parses a ruleset from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Toml {
            message: e.to_string(),
        })
    }

    /// Returns the options configured for a rule, if any.
    #[must_use]
    pub fn options(&self, id: &str) -> Option<&Value> {
        self.rules.get(id)
    }

    /// Checks whether a rule should be initialized.
    #[must_use]
    pub fn is_enabled(&self, id: &str) -> bool {
        self.rules
            .get(id)
            .is_some_and(|options| *options != Value::Bool(false))
    }

    /// Returns the configured rule identifiers in file order.
    pub fn rule_ids(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rules are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
