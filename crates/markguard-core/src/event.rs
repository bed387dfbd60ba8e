//! Parse events delivered by a markup tokenizer.
//!
//! The tokenizer itself lives outside this crate. Hosts either construct
//! events directly or deserialize them from JSON:
//!
//! ```json
//! {"type": "tagstart", "tagName": "div", "line": 1, "col": 1,
//!  "raw": "<div class=\"x\">", "attrs": [{"name": "class", "value": "x"}]}
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single attribute on a start tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name as written in the source.
    pub name: String,
    /// Attribute value with quotes removed (empty for bare attributes).
    #[serde(default)]
    pub value: String,
    /// Quote character used around the value, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
    /// Byte offset of the attribute inside the tag's raw text.
    #[serde(default)]
    pub index: usize,
    /// Raw source text of the attribute.
    #[serde(default)]
    pub raw: String,
}

impl Attribute {
    /// Creates a double-quoted attribute, synthesizing its raw text.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        let raw = format!("{name}=\"{value}\"");
        Self {
            name,
            value,
            quote: Some("\"".to_string()),
            index: 0,
            raw,
        }
    }
}

/// What kind of markup construct an event represents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventKind {
    /// `<!-- ... -->`
    Comment,
    /// An opening (or self-closing) tag with its attributes in document order.
    TagStart {
        /// Attributes in document order; duplicates are kept.
        #[serde(default)]
        attrs: Vec<Attribute>,
    },
    /// A closing tag.
    TagEnd,
    /// Character data between tags.
    Text,
    /// `<![CDATA[ ... ]]>` or raw-text element content.
    CData,
    /// Any other tokenizer event, such as document `start`/`end` markers.
    #[serde(other)]
    Other,
}

impl EventKind {
    /// Returns the wire name of this kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::TagStart { .. } => "tagstart",
            Self::TagEnd => "tagend",
            Self::Text => "text",
            Self::CData => "cdata",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One markup construct emitted by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseEvent {
    /// Event discriminant and kind-specific payload.
    #[serde(flatten)]
    pub kind: EventKind,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub col: usize,
    /// Raw source slice covered by the event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    /// Tag name as written, for tag events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,
}

impl ParseEvent {
    /// Creates an event at line 1, column 1 with no raw text or tag name.
    #[must_use]
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            line: 1,
            col: 1,
            raw: None,
            tag_name: None,
        }
    }

    /// Creates a start tag event with raw text synthesized from its parts.
    #[must_use]
    pub fn tag_start(tag_name: impl Into<String>, attrs: Vec<Attribute>) -> Self {
        let tag_name = tag_name.into();
        let mut raw = format!("<{tag_name}");
        for attr in &attrs {
            raw.push(' ');
            raw.push_str(&attr.raw);
        }
        raw.push('>');
        Self {
            raw: Some(raw),
            tag_name: Some(tag_name),
            ..Self::new(EventKind::TagStart { attrs })
        }
    }

    /// Creates an end tag event (`</name>`).
    #[must_use]
    pub fn tag_end(tag_name: impl Into<String>) -> Self {
        let tag_name = tag_name.into();
        Self {
            raw: Some(format!("</{tag_name}>")),
            tag_name: Some(tag_name),
            ..Self::new(EventKind::TagEnd)
        }
    }

    /// Creates a text event.
    #[must_use]
    pub fn text(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
            ..Self::new(EventKind::Text)
        }
    }

    /// Creates a comment event wrapping `content` in comment delimiters.
    #[must_use]
    pub fn comment(content: &str) -> Self {
        Self {
            raw: Some(format!("<!--{content}-->")),
            ..Self::new(EventKind::Comment)
        }
    }

    /// Sets the source position.
    #[must_use]
    pub fn at(mut self, line: usize, col: usize) -> Self {
        self.line = line;
        self.col = col;
        self
    }

    /// Replaces the raw source slice.
    #[must_use]
    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = Some(raw.into());
        self
    }

    /// Returns the raw text, or `""` when the event carries none.
    #[must_use]
    pub fn raw_str(&self) -> &str {
        self.raw.as_deref().unwrap_or_default()
    }

    /// Returns the raw text only when it is present and non-empty.
    #[must_use]
    pub fn non_empty_raw(&self) -> Option<&str> {
        self.raw.as_deref().filter(|raw| !raw.is_empty())
    }

    /// Returns the tag name only when it is present and non-empty.
    #[must_use]
    pub fn non_empty_tag_name(&self) -> Option<&str> {
        self.tag_name.as_deref().filter(|name| !name.is_empty())
    }

    /// Returns the start tag attributes (empty for every other kind).
    #[must_use]
    pub fn attrs(&self) -> &[Attribute] {
        match &self.kind {
            EventKind::TagStart { attrs } => attrs,
            _ => &[],
        }
    }

    /// Returns true for comment events.
    #[must_use]
    pub fn is_comment(&self) -> bool {
        matches!(self.kind, EventKind::Comment)
    }

    /// Returns true for start tag events.
    #[must_use]
    pub fn is_tag_start(&self) -> bool {
        matches!(self.kind, EventKind::TagStart { .. })
    }

    /// Returns true for text events.
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self.kind, EventKind::Text)
    }
}

/// Which events a listener subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventFilter {
    /// Every event, comments included.
    All,
    /// Comment events only.
    Comment,
    /// Start tag events only.
    TagStart,
    /// End tag events only.
    TagEnd,
    /// Text events only.
    Text,
    /// CDATA events only.
    CData,
    /// Events of any kind without a dedicated filter.
    Other,
}

impl EventFilter {
    /// Returns true if an event of `kind` should be delivered.
    #[must_use]
    pub fn accepts(self, kind: &EventKind) -> bool {
        match self {
            Self::All => true,
            Self::Comment => matches!(kind, EventKind::Comment),
            Self::TagStart => matches!(kind, EventKind::TagStart { .. }),
            Self::TagEnd => matches!(kind, EventKind::TagEnd),
            Self::Text => matches!(kind, EventKind::Text),
            Self::CData => matches!(kind, EventKind::CData),
            Self::Other => matches!(kind, EventKind::Other),
        }
    }
}
