//! Diagnostic sinks.

use crate::types::{Diagnostic, Location, Severity};

/// Receives diagnostics from rules.
///
/// Rules call [`Reporter::error`] (or the lower-severity variants) once per
/// finding; the sink owns aggregation and presentation.
pub trait Reporter {
    /// Accepts one fully built diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);

    /// Reports an error-level finding.
    fn error(&mut self, message: &str, line: usize, col: usize, rule: &str, raw: &str) {
        self.report(
            Diagnostic::new(rule, Severity::Error, Location::new(line, col), message)
                .with_evidence(raw),
        );
    }

    /// Reports a warning-level finding.
    fn warn(&mut self, message: &str, line: usize, col: usize, rule: &str, raw: &str) {
        self.report(
            Diagnostic::new(rule, Severity::Warning, Location::new(line, col), message)
                .with_evidence(raw),
        );
    }

    /// Reports an info-level finding.
    fn info(&mut self, message: &str, line: usize, col: usize, rule: &str, raw: &str) {
        self.report(
            Diagnostic::new(rule, Severity::Info, Location::new(line, col), message)
                .with_evidence(raw),
        );
    }
}

/// Reporter that keeps every diagnostic in emission order.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    diagnostics: Vec<Diagnostic>,
}

impl CollectingReporter {
    /// Creates an empty reporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the collected diagnostics.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consumes the reporter, returning its diagnostics.
    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl Reporter for CollectingReporter {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}
