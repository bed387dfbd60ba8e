//! Reference host: initializes rules and replays an event stream through them.

use crate::config::Ruleset;
use crate::event::{EventFilter, ParseEvent};
use crate::reporter::CollectingReporter;
use crate::rule::{AttributeMap, EventListener, EventParser, HtmlRule, RuleBox, RuleError};
use crate::types::LintResult;

use miette::Diagnostic;
use tracing::{debug, info, trace, warn};

/// Errors that abort a lint run.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum LintError {
    /// A rule listener failed while handling an event.
    #[error("rule `{rule}` failed at {line}:{col}: {source}")]
    #[diagnostic(code(markguard::rule_failed))]
    Rule {
        /// Identifier of the failing rule.
        rule: String,
        /// Line of the event being handled.
        line: usize,
        /// Column of the event being handled.
        col: usize,
        /// The rule's error.
        #[source]
        #[diagnostic_source]
        source: RuleError,
    },

    /// A serialized event stream could not be decoded.
    #[error("invalid event stream: {message}")]
    #[diagnostic(
        code(markguard::events),
        help("expected a JSON array of events tagged by `type`")
    )]
    Events {
        /// Decoder message.
        message: String,
    },
}

/// Builder for configuring a [`Linter`].
#[derive(Default)]
pub struct LinterBuilder {
    rules: Vec<RuleBox>,
    ruleset: Ruleset,
}

impl LinterBuilder {
    /// Creates a new builder with no rules and an empty ruleset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a rule.
    #[must_use]
    pub fn rule<R: HtmlRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Registers a boxed rule.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Registers several boxed rules.
    #[must_use]
    pub fn rules<I>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = RuleBox>,
    {
        self.rules.extend(rules);
        self
    }

    /// Sets the ruleset that selects and configures rules.
    #[must_use]
    pub fn ruleset(mut self, ruleset: Ruleset) -> Self {
        self.ruleset = ruleset;
        self
    }

    /// Builds the linter.
    #[must_use]
    pub fn build(self) -> Linter {
        Linter {
            rules: self.rules,
            ruleset: self.ruleset,
        }
    }
}

/// Runs registered rules over event streams.
///
/// Use [`Linter::builder()`] to construct an instance.
pub struct Linter {
    rules: Vec<RuleBox>,
    ruleset: Ruleset,
}

impl Linter {
    /// Creates a new builder for configuring a linter.
    #[must_use]
    pub fn builder() -> LinterBuilder {
        LinterBuilder::new()
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns registered rule identifiers in registration order.
    pub fn rule_ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|rule| rule.id())
    }

    /// Initializes every enabled rule, then delivers `events` in order.
    ///
    /// Diagnostics raised during initialization come first, followed by
    /// event diagnostics in delivery order.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::Rule`] as soon as a listener fails; no further
    /// events are delivered.
    pub fn verify(&self, events: &[ParseEvent]) -> Result<LintResult, LintError> {
        info!("Verifying {} events with {} rules", events.len(), self.rules.len());

        let mut reporter = CollectingReporter::new();
        let mut registry = ListenerRegistry::default();

        for rule in &self.rules {
            if !self.ruleset.is_enabled(rule.id()) {
                debug!("Skipping disabled rule: {}", rule.id());
                continue;
            }
            registry.current_rule = rule.id();
            rule.init(&mut registry, &mut reporter, self.ruleset.options(rule.id()));
        }

        debug!("{} listeners attached", registry.listeners.len());

        for event in events {
            trace!("Dispatching {} at {}:{}", event.kind, event.line, event.col);
            for entry in &registry.listeners {
                if !entry.filter.accepts(&event.kind) {
                    continue;
                }
                if let Err(source) = entry.listener.on_event(event, &registry, &mut reporter) {
                    warn!("Rule {} failed: {}", entry.rule, source);
                    return Err(LintError::Rule {
                        rule: entry.rule.to_string(),
                        line: event.line,
                        col: event.col,
                        source,
                    });
                }
            }
        }

        let result = LintResult {
            diagnostics: reporter.into_diagnostics(),
            events_checked: events.len(),
        };

        info!(
            "Verification complete: {} diagnostics in {} events",
            result.diagnostics.len(),
            result.events_checked
        );

        Ok(result)
    }

    /// Decodes a JSON array of events and verifies it.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::Events`] if decoding fails, otherwise as
    /// [`Linter::verify`].
    pub fn verify_json(&self, events: &str) -> Result<LintResult, LintError> {
        let events: Vec<ParseEvent> =
            serde_json::from_str(events).map_err(|e| LintError::Events {
                message: e.to_string(),
            })?;
        self.verify(&events)
    }
}

struct RegisteredListener {
    rule: &'static str,
    filter: EventFilter,
    listener: Box<dyn EventListener>,
}

#[derive(Default)]
struct ListenerRegistry {
    current_rule: &'static str,
    listeners: Vec<RegisteredListener>,
}

impl AttributeMap for ListenerRegistry {}

impl EventParser for ListenerRegistry {
    fn add_listener(&mut self, filter: EventFilter, listener: Box<dyn EventListener>) {
        self.listeners.push(RegisteredListener {
            rule: self.current_rule,
            filter,
            listener,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Attribute, EventKind};
    use crate::reporter::Reporter;
    use serde_json::{json, Value};

    /// Reports every tag start and echoes its options on init.
    struct EchoRule;

    impl HtmlRule for EchoRule {
        fn id(&self) -> &'static str {
            "echo"
        }

        fn init(
            &self,
            parser: &mut dyn EventParser,
            reporter: &mut dyn Reporter,
            options: Option<&Value>,
        ) {
            let shown = options.map_or_else(|| "none".to_string(), Value::to_string);
            reporter.info(&shown, 1, 1, "echo", "");
            parser.add_listener(
                EventFilter::TagStart,
                Box::new(
                    |event: &ParseEvent,
                     attrs: &dyn AttributeMap,
                     reporter: &mut dyn Reporter|
                     -> Result<(), RuleError> {
                        let names: Vec<String> = attrs
                            .map_attrs(event.attrs())
                            .into_iter()
                            .map(|(name, _)| name)
                            .collect();
                        let tag = event.tag_name.as_deref().unwrap_or_default();
                        reporter.error(
                            &format!("{tag} [{}]", names.join(",")),
                            event.line,
                            event.col,
                            "echo",
                            event.raw_str(),
                        );
                        Ok(())
                    },
                ),
            );
        }
    }

    struct FailingRule;

    impl HtmlRule for FailingRule {
        fn id(&self) -> &'static str {
            "failing"
        }

        fn init(&self, parser: &mut dyn EventParser, _: &mut dyn Reporter, _: Option<&Value>) {
            parser.add_listener(
                EventFilter::Text,
                Box::new(|_: &ParseEvent, _: &dyn AttributeMap, _: &mut dyn Reporter| {
                    Err(RuleError::InvalidPattern {
                        pattern: "(".to_string(),
                        reason: "unclosed group".to_string(),
                    })
                }),
            );
        }
    }

    /// Reports the kind of every event.
    struct KindRule;

    impl HtmlRule for KindRule {
        fn id(&self) -> &'static str {
            "kinds"
        }

        fn init(&self, parser: &mut dyn EventParser, _: &mut dyn Reporter, _: Option<&Value>) {
            parser.add_listener(
                EventFilter::All,
                Box::new(
                    |event: &ParseEvent,
                     _: &dyn AttributeMap,
                     reporter: &mut dyn Reporter|
                     -> Result<(), RuleError> {
                        let kind = event.kind.name();
                        reporter.info(kind, event.line, event.col, "kinds", event.raw_str());
                        Ok(())
                    },
                ),
            );
        }
    }

    fn sample_events() -> Vec<ParseEvent> {
        vec![
            ParseEvent::tag_start(
                "div",
                vec![Attribute::new("class", "a"), Attribute::new("class", "b")],
            )
            .at(2, 5),
            ParseEvent::text("hello").at(2, 25),
            ParseEvent::tag_end("div").at(2, 30),
        ]
    }

    #[test]
    fn test_builder() {
        let linter = Linter::builder().rule(EchoRule).rule(FailingRule).build();
        assert_eq!(linter.rule_count(), 2);
        assert_eq!(linter.rule_ids().collect::<Vec<_>>(), ["echo", "failing"]);
    }

    #[test]
    fn rules_without_ruleset_entry_are_not_initialized() {
        let linter = Linter::builder().rule(EchoRule).build();
        let result = linter.verify(&sample_events()).expect("verify");
        assert!(result.diagnostics.is_empty());
        assert_eq!(result.events_checked, 3);
    }

    #[test]
    fn init_diagnostics_precede_event_diagnostics() {
        let linter = Linter::builder()
            .rule(EchoRule)
            .ruleset(Ruleset::new().with_rule("echo", json!({"k": 1})))
            .build();
        let result = linter.verify(&sample_events()).expect("verify");
        assert_eq!(result.messages(), [r#"{"k":1}"#, "div [class,class]"]);
        assert_eq!(result.diagnostics[1].location.line, 2);
        assert_eq!(result.diagnostics[1].location.column, 5);
        assert_eq!(result.diagnostics[1].evidence, r#"<div class="a" class="b">"#);
    }

    #[test]
    fn false_entry_skips_rule() {
        let linter = Linter::builder()
            .rule(EchoRule)
            .ruleset(Ruleset::new().with_rule("echo", json!(false)))
            .build();
        let result = linter.verify(&sample_events()).expect("verify");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn listener_error_aborts_run() {
        let linter = Linter::builder()
            .rule(FailingRule)
            .ruleset(Ruleset::new().with_rule("failing", json!(true)))
            .build();
        let err = linter.verify(&sample_events()).expect_err("should fail");
        match err {
            LintError::Rule { rule, line, col, .. } => {
                assert_eq!(rule, "failing");
                assert_eq!((line, col), (2, 25));
            }
            LintError::Events { .. } => panic!("unexpected error kind"),
        }
    }

    #[test]
    fn verify_json_decodes_events() {
        let linter = Linter::builder()
            .rule(EchoRule)
            .ruleset(Ruleset::new().with_rule("echo", Value::Null))
            .build();
        let result = linter
            .verify_json(
                r#"[
                    {"type": "comment", "line": 1, "col": 1, "raw": "<!-- x -->"},
                    {"type": "tagstart", "line": 1, "col": 11, "tagName": "p", "raw": "<p>"}
                ]"#,
            )
            .expect("verify");
        assert_eq!(result.messages(), ["null", "p []"]);
    }

    #[test]
    fn verify_json_dispatches_unknown_event_types() {
        let linter = Linter::builder()
            .rule(KindRule)
            .ruleset(Ruleset::new().with_rule("kinds", json!(true)))
            .build();
        let result = linter
            .verify_json(
                r#"[
                    {"type": "start", "line": 1, "col": 1, "raw": "<!doctype html>"},
                    {"type": "text", "line": 1, "col": 16, "raw": "bad"},
                    {"type": "end", "line": 1, "col": 19}
                ]"#,
            )
            .expect("verify");
        assert_eq!(result.events_checked, 3);
        assert_eq!(result.messages(), ["other", "text", "other"]);
    }

    #[test]
    fn verify_json_rejects_malformed_stream() {
        let linter = Linter::builder().build();
        let err = linter
            .verify_json(r#"[{"line": 1, "col": 1}]"#)
            .expect_err("missing type");
        assert!(matches!(err, LintError::Events { .. }));
    }

    #[test]
    fn filters_limit_delivery() {
        let mut registry = ListenerRegistry::default();
        registry.add_listener(
            EventFilter::TagEnd,
            Box::new(
                |_: &ParseEvent, _: &dyn AttributeMap, _: &mut dyn Reporter| -> Result<(), RuleError> {
                    Ok(())
                },
            ),
        );
        assert!(registry.listeners[0].filter.accepts(&EventKind::TagEnd));
        assert!(!registry.listeners[0].filter.accepts(&EventKind::Text));
    }
}
