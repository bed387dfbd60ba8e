//! Core types for lint diagnostics and results.

use serde::{Deserialize, Serialize};

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Position of a diagnostic in the markup source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl Location {
    /// Creates a new location.
    #[must_use]
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A single finding reported by a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Identifier of the rule that produced this diagnostic (e.g., "block-words").
    pub rule: String,
    /// Severity of this diagnostic.
    pub severity: Severity,
    /// Where the offending markup starts.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Raw markup of the offending event (may be empty).
    pub evidence: String,
}

impl Diagnostic {
    /// Creates a new diagnostic with no evidence.
    #[must_use]
    pub fn new(
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
            evidence: String::new(),
        }
    }

    /// Attaches the raw markup snippet.
    #[must_use]
    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence = evidence.into();
        self
    }

    /// Formats the diagnostic for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} at {}:{}\n",
            self.rule, self.location.line, self.location.column,
        );
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        if !self.evidence.is_empty() {
            let _ = writeln!(output, "  | {}", self.evidence);
        }
        output
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {} [{}] {}",
            self.location.line, self.location.column, self.severity, self.rule, self.message
        )
    }
}

/// Result of running rules over one event stream.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All diagnostics, in emission order.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of events delivered.
    pub events_checked: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Returns the messages in emission order.
    #[must_use]
    pub fn messages(&self) -> Vec<&str> {
        self.diagnostics.iter().map(|d| d.message.as_str()).collect()
    }

    /// Returns diagnostics produced by one rule.
    #[must_use]
    pub fn by_rule(&self, rule: &str) -> Vec<&Diagnostic> {
        self.diagnostics.iter().filter(|d| d.rule == rule).collect()
    }

    /// Counts diagnostics by severity as `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |severity: Severity| {
            self.diagnostics
                .iter()
                .filter(|d| d.severity == severity)
                .count()
        };
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }

    /// Formats diagnostics as a multi-line report, suitable for test failure output.
    #[must_use]
    pub fn format_report(&self) -> String {
        use std::fmt::Write;

        let mut report = String::new();
        for d in &self.diagnostics {
            let _ = write!(report, "{}", d.format());
        }
        let (errors, warnings, infos) = self.count_by_severity();
        let _ = writeln!(
            report,
            "Total: {} error(s), {} warning(s), {} info(s) in {} event(s)",
            errors, warnings, infos, self.events_checked
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_diagnostic(severity: Severity) -> Diagnostic {
        Diagnostic::new(
            "block-words",
            severity,
            Location::new(4, 9),
            r#"Blocked word from /ad/g detected in div: "ad""#,
        )
    }

    #[test]
    fn display_is_single_line() {
        let d = make_diagnostic(Severity::Error);
        insta::assert_snapshot!(d.to_string(), @r#"4:9: error [block-words] Blocked word from /ad/g detected in div: "ad""#);
    }

    #[test]
    fn format_includes_evidence_when_present() {
        let d = make_diagnostic(Severity::Error).with_evidence(r#"<div class="ad">"#);
        assert!(d.format().contains(r#"| <div class="ad">"#));
    }

    #[test]
    fn format_omits_empty_evidence() {
        let d = make_diagnostic(Severity::Error);
        assert!(!d.format().contains('|'));
    }

    #[test]
    fn counts_by_severity() {
        let mut result = LintResult::new();
        result.diagnostics.push(make_diagnostic(Severity::Error));
        result.diagnostics.push(make_diagnostic(Severity::Warning));
        result.diagnostics.push(make_diagnostic(Severity::Error));
        assert_eq!(result.count_by_severity(), (2, 1, 0));
        assert!(result.has_errors());
    }

    #[test]
    fn report_has_totals_line() {
        let mut result = LintResult::new();
        result.events_checked = 12;
        result.diagnostics.push(make_diagnostic(Severity::Warning));
        let report = result.format_report();
        assert!(report.ends_with("Total: 0 error(s), 1 warning(s), 0 info(s) in 12 event(s)\n"));
        assert!(!result.has_errors());
    }
}
