//! Rule traits and the host contract rules plug into.

use crate::event::{Attribute, EventFilter, ParseEvent};
use crate::reporter::Reporter;
use miette::Diagnostic;
use serde_json::Value;

/// Errors a rule can raise while handling an event.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum RuleError {
    /// A user-supplied pattern is not a valid regular expression.
    #[error("invalid pattern `{pattern}`: {reason}")]
    #[diagnostic(
        code(markguard::invalid_pattern),
        help("patterns use regular expression syntax; escape metacharacters to match them literally")
    )]
    InvalidPattern {
        /// The pattern as configured.
        pattern: String,
        /// Compiler error message.
        reason: String,
    },
}

/// Turns a start tag's attribute list into name/value pairs.
///
/// Pairs keep document order and duplicate names stay separate entries.
pub trait AttributeMap {
    /// Returns `(name, value)` pairs for `attrs`.
    fn map_attrs(&self, attrs: &[Attribute]) -> Vec<(String, String)> {
        attrs
            .iter()
            .map(|attr| (attr.name.clone(), attr.value.clone()))
            .collect()
    }
}

/// Callback invoked synchronously for each delivered event.
pub trait EventListener {
    /// Handles one event.
    ///
    /// # Errors
    ///
    /// Returns an error the host must surface to its caller.
    fn on_event(
        &self,
        event: &ParseEvent,
        attrs: &dyn AttributeMap,
        reporter: &mut dyn Reporter,
    ) -> Result<(), RuleError>;
}

impl<F> EventListener for F
where
    F: Fn(&ParseEvent, &dyn AttributeMap, &mut dyn Reporter) -> Result<(), RuleError>,
{
    fn on_event(
        &self,
        event: &ParseEvent,
        attrs: &dyn AttributeMap,
        reporter: &mut dyn Reporter,
    ) -> Result<(), RuleError> {
        self(event, attrs, reporter)
    }
}

/// Event subscription side of a markup parser.
pub trait EventParser: AttributeMap {
    /// Subscribes `listener` to events accepted by `filter`.
    fn add_listener(&mut self, filter: EventFilter, listener: Box<dyn EventListener>);
}

/// A markup lint rule descriptor.
///
/// The host calls [`HtmlRule::init`] once per run with the rule's options.
/// The rule validates them, and subscribes listeners on `parser`
/// when it has work to do.
///
/// # Example
///
/// ```ignore
/// use markguard_core::{EventFilter, EventParser, HtmlRule, ParseEvent, Reporter};
///
/// pub struct NoMarquee;
///
/// impl HtmlRule for NoMarquee {
///     fn id(&self) -> &'static str { "no-marquee" }
///
///     fn init(&self, parser: &mut dyn EventParser, _: &mut dyn Reporter, _: Option<&Value>) {
///         parser.add_listener(EventFilter::TagStart, Box::new(|event: &ParseEvent, _: &dyn AttributeMap, reporter: &mut dyn Reporter| {
///             if event.tag_name.as_deref() == Some("marquee") {
///                 reporter.error("marquee is not allowed", event.line, event.col, "no-marquee", event.raw_str());
///             }
///             Ok(())
///         }));
///     }
/// }
/// ```
pub trait HtmlRule: Send + Sync {
    /// Returns the stable kebab-case identifier (e.g., "block-words").
    fn id(&self) -> &'static str;

    /// Returns a human-readable description.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the options a host should advertise when none are configured.
    fn default_options(&self) -> Value {
        Value::Null
    }

    /// Validates `options` and subscribes listeners.
    ///
    /// `None` means the rule was given no options at all.
    fn init(
        &self,
        parser: &mut dyn EventParser,
        reporter: &mut dyn Reporter,
        options: Option<&Value>,
    );
}

/// Type alias for boxed [`HtmlRule`] trait objects.
pub type RuleBox = Box<dyn HtmlRule>;
