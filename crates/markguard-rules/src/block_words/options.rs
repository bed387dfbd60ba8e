//! Option schema and validation for `block-words`.

use miette::Diagnostic;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// A named list of blocked patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternGroup {
    /// Matched against the raw markup of every non-comment event.
    All,
    /// Matched against attribute names.
    AttributeNames,
    /// Matched against attribute values.
    AttributeValues,
    /// Matched against start tag names.
    TagNames,
    /// Matched against text nodes.
    Text,
}

impl PatternGroup {
    /// Every group, in the order their keys are listed to users.
    pub const ALL: [Self; 5] = [
        Self::All,
        Self::AttributeNames,
        Self::AttributeValues,
        Self::TagNames,
        Self::Text,
    ];

    /// Returns the option key for this group.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::AttributeNames => "attributeNames",
            Self::AttributeValues => "attributeValues",
            Self::TagNames => "tagNames",
            Self::Text => "text",
        }
    }

    /// Looks up a group by option key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|group| group.key() == key)
    }
}

impl fmt::Display for PatternGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Options were given but have the wrong shape.
///
/// The message lists the accepted keys and echoes the whole input.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Diagnostic)]
#[error(
    "Expected an object with keys from \"{keys}\" and string array values for rule {rule} but got {input}"
)]
#[diagnostic(code(markguard::block_words::invalid_options))]
pub struct InvalidOptions {
    rule: &'static str,
    keys: String,
    input: String,
}

/// Validated pattern lists; a `None` group is not checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockWordsOptions {
    /// Patterns for raw markup of any event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all: Option<Vec<String>>,
    /// Patterns for attribute names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_names: Option<Vec<String>>,
    /// Patterns for attribute values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_values: Option<Vec<String>>,
    /// Patterns for tag names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_names: Option<Vec<String>>,
    /// Patterns for text nodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
}

impl BlockWordsOptions {
    /// Returns the patterns configured for `group`.
    #[must_use]
    pub fn patterns(&self, group: PatternGroup) -> Option<&[String]> {
        let slot = match group {
            PatternGroup::All => &self.all,
            PatternGroup::AttributeNames => &self.attribute_names,
            PatternGroup::AttributeValues => &self.attribute_values,
            PatternGroup::TagNames => &self.tag_names,
            PatternGroup::Text => &self.text,
        };
        slot.as_deref()
    }

    fn slot_mut(&mut self, group: PatternGroup) -> &mut Option<Vec<String>> {
        match group {
            PatternGroup::All => &mut self.all,
            PatternGroup::AttributeNames => &mut self.attribute_names,
            PatternGroup::AttributeValues => &mut self.attribute_values,
            PatternGroup::TagNames => &mut self.tag_names,
            PatternGroup::Text => &mut self.text,
        }
    }

    /// Sets the patterns for one group.
    #[must_use]
    pub fn with_group<I, S>(mut self, group: PatternGroup, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.slot_mut(group) = Some(patterns.into_iter().map(Into::into).collect());
        self
    }
}

/// The accepted option keys of a rule, shared by validation and defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionsSchema {
    rule: &'static str,
    groups: &'static [PatternGroup],
}

impl OptionsSchema {
    /// Creates a schema for `rule` accepting `groups`.
    #[must_use]
    pub const fn new(rule: &'static str, groups: &'static [PatternGroup]) -> Self {
        Self { rule, groups }
    }

    /// Returns the accepted keys in listing order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.groups.iter().map(|group| group.key())
    }

    /// Returns an object with every accepted key mapped to an empty list.
    #[must_use]
    pub fn default_options(&self) -> Value {
        let map: Map<String, Value> = self
            .keys()
            .map(|key| (key.to_string(), Value::Array(Vec::new())))
            .collect();
        Value::Object(map)
    }

    /// Validates raw options.
    ///
    /// `Ok(None)` means options are absent (`null`, `false`, `0` or `""`) and
    /// the rule should stay inert. Any other non-object, unknown key, or value that is
    /// not an array of strings rejects the input as a whole.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidOptions`] describing the entire input.
    pub fn validate(&self, input: &Value) -> Result<Option<BlockWordsOptions>, InvalidOptions> {
        let object = match input {
            Value::Object(object) => object,
            _ if is_falsy(input) => return Ok(None),
            _ => return Err(self.invalid(input)),
        };

        let mut options = BlockWordsOptions::default();
        for (key, value) in object {
            let group = PatternGroup::from_key(key)
                .filter(|group| self.groups.contains(group))
                .ok_or_else(|| self.invalid(input))?;
            let patterns = string_array(value).ok_or_else(|| self.invalid(input))?;
            *options.slot_mut(group) = Some(patterns);
        }
        Ok(Some(options))
    }

    fn invalid(&self, input: &Value) -> InvalidOptions {
        InvalidOptions {
            rule: self.rule,
            keys: self.keys().collect::<Vec<_>>().join(", "),
            input: normalized(input).to_string(),
        }
    }
}

/// Largest integer every float can represent exactly.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

#[allow(clippy::float_cmp)]
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::Number(n) => n.as_f64().is_some_and(|n| n == 0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Rewrites integral floats as integers so `4.0` echoes as `4`.
#[allow(clippy::float_cmp, clippy::cast_possible_truncation)]
fn normalized(value: &Value) -> Value {
    match value {
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < MAX_EXACT_INTEGER => Value::from(f as i64),
            _ => value.clone(),
        },
        Value::Array(items) => Value::Array(items.iter().map(normalized).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), normalized(value)))
                .collect(),
        ),
        _ => value.clone(),
    }
}

fn string_array(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|entry| entry.as_str().map(str::to_string))
        .collect()
}
