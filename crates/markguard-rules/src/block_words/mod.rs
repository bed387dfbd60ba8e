//! Rule to block user-configured words anywhere in markup.
//!
//! # Rationale
//!
//! Built-in checks such as "no ad-like class names" hard-code their word
//! lists. This rule lets the user supply the list, as regular expressions,
//! and choose where each list applies.
//!
//! # Configuration
//!
//! An object whose keys are optional pattern groups, each an array of
//! pattern strings:
//!
//! - `all`: raw markup of every event except comments
//! - `attributeNames`: start tag attribute names
//! - `attributeValues`: start tag attribute values
//! - `tagNames`: start tag names
//! - `text`: text nodes
//!
//! Patterns and checked text are lower-cased before matching.

mod matcher;
mod message;
mod options;

pub use matcher::{find_matches, BlockPattern, BlockedMatch, MatchCategory, PatternCache};
pub use message::blocked_word_message;
pub use options::{BlockWordsOptions, InvalidOptions, OptionsSchema, PatternGroup};

use markguard_core::{
    AttributeMap, EventFilter, EventListener, EventParser, HtmlRule, ParseEvent, Reporter,
    RuleError,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, trace};

/// Rule name for block-words.
pub const NAME: &str = "block-words";

/// Human-readable description of block-words.
pub const DESCRIPTION: &str = "Block a user defined set of words from appearing in tag names, \
attributes, or text. Like the built-in ad-class checks but more powerful, since the user \
sets the list of blocked words.";

/// Accepted option keys for block-words.
pub const SCHEMA: OptionsSchema = OptionsSchema::new(NAME, &PatternGroup::ALL);

/// Reports every occurrence of configured blocked patterns.
#[derive(Debug, Clone, Copy)]
pub struct BlockWords {
    schema: OptionsSchema,
}

impl Default for BlockWords {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockWords {
    /// Creates the rule with the standard option schema.
    #[must_use]
    pub fn new() -> Self {
        Self { schema: SCHEMA }
    }
}

impl HtmlRule for BlockWords {
    fn id(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn default_options(&self) -> Value {
        self.schema.default_options()
    }

    fn init(
        &self,
        parser: &mut dyn EventParser,
        reporter: &mut dyn Reporter,
        options: Option<&Value>,
    ) {
        let Some(raw) = options else {
            debug!("{NAME}: no options, staying inert");
            return;
        };

        match self.schema.validate(raw) {
            Ok(Some(options)) => {
                debug!("{NAME}: listening with {:?}", options);
                parser.add_listener(EventFilter::All, Box::new(BlockWordsListener::new(options)));
            }
            Ok(None) => debug!("{NAME}: options absent, staying inert"),
            Err(invalid) => {
                debug!("{NAME}: rejected options {raw}");
                reporter.error(&invalid.to_string(), 1, 1, NAME, "");
            }
        }
    }
}

/// Classifies events and reports matches for the configured groups.
#[derive(Debug, Clone)]
pub struct BlockWordsListener {
    options: Arc<BlockWordsOptions>,
    patterns: PatternCache,
}

impl BlockWordsListener {
    /// Creates a listener for already validated options.
    #[must_use]
    pub fn new(options: BlockWordsOptions) -> Self {
        Self {
            options: Arc::new(options),
            patterns: PatternCache::new(),
        }
    }
}

impl EventListener for BlockWordsListener {
    fn on_event(
        &self,
        event: &ParseEvent,
        attrs: &dyn AttributeMap,
        reporter: &mut dyn Reporter,
    ) -> Result<(), RuleError> {
        if event.is_comment() {
            return Ok(());
        }
        trace!("{NAME}: checking {} at {}:{}", event.kind, event.line, event.col);

        let tag_name = event.non_empty_tag_name().map(str::to_lowercase);
        let mut sink = EventSink {
            event,
            patterns: &self.patterns,
            tag_name: tag_name.as_deref(),
            reporter,
        };

        if let (Some(patterns), Some(name)) =
            (self.options.patterns(PatternGroup::TagNames), tag_name.as_deref())
        {
            if event.is_tag_start() {
                sink.report(name, patterns, Some(MatchCategory::TagName))?;
            }
        }

        if let (Some(patterns), Some(raw)) =
            (self.options.patterns(PatternGroup::Text), event.non_empty_raw())
        {
            if event.is_text() {
                sink.report(raw, patterns, Some(MatchCategory::Text))?;
            }
        }

        if event.is_tag_start() && event.non_empty_raw().is_some() {
            for (name, value) in attrs.map_attrs(event.attrs()) {
                if let Some(patterns) = self.options.patterns(PatternGroup::AttributeValues) {
                    sink.report(&value, patterns, Some(MatchCategory::Attribute))?;
                }
                if let Some(patterns) = self.options.patterns(PatternGroup::AttributeNames) {
                    sink.report(&name, patterns, Some(MatchCategory::Attribute))?;
                }
            }
        }

        if let (Some(patterns), Some(raw)) =
            (self.options.patterns(PatternGroup::All), event.non_empty_raw())
        {
            sink.report(raw, patterns, None)?;
        }

        Ok(())
    }
}

/// Forwards matches for one event to the reporter.
struct EventSink<'a> {
    event: &'a ParseEvent,
    patterns: &'a PatternCache,
    tag_name: Option<&'a str>,
    reporter: &'a mut dyn Reporter,
}

impl EventSink<'_> {
    fn report(
        &mut self,
        text: &str,
        patterns: &[String],
        category: Option<MatchCategory>,
    ) -> Result<(), RuleError> {
        for found in self.patterns.find_matches(text, patterns, category)? {
            self.reporter.error(
                &found.message(self.tag_name),
                self.event.line,
                self.event.col,
                NAME,
                self.event.raw_str(),
            );
        }
        Ok(())
    }
}
