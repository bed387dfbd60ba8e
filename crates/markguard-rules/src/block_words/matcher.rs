//! Blocked-pattern compilation and occurrence extraction.

use markguard_core::RuleError;
use regex::Regex;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

/// Where in the markup a blocked word was found.
///
/// Matches from the `all` sweep carry no category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchCategory {
    /// Inside a text node.
    Text,
    /// Inside an attribute name or value.
    Attribute,
    /// Inside a start tag name.
    TagName,
}

impl MatchCategory {
    /// Returns the label used in messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Attribute => "attribute",
            Self::TagName => "tag name",
        }
    }
}

impl fmt::Display for MatchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A compiled blocked pattern.
///
/// The configured pattern is lower-cased before compiling and matched against
/// lower-cased text. Displays as `/source/g`.
#[derive(Debug, Clone)]
pub struct BlockPattern {
    source: String,
    regex: Regex,
}

impl BlockPattern {
    /// Compiles a configured pattern.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::InvalidPattern`] if the lower-cased pattern is not
    /// a valid regular expression.
    pub fn compile(pattern: &str) -> Result<Self, RuleError> {
        let source = pattern.to_lowercase();
        let regex = Regex::new(&source).map_err(|e| RuleError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { source, regex })
    }

    /// Returns the lower-cased pattern source.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Yields every non-overlapping occurrence in `text`, left to right.
    pub fn occurrences<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.regex.find_iter(text).map(|m| m.as_str())
    }
}

impl PartialEq for BlockPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for BlockPattern {}

impl fmt::Display for BlockPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("/")?;
        write_escaped_source(f, &self.source)?;
        f.write_str("/g")
    }
}

/// Writes a pattern source in slash-delimited literal form.
///
/// Unescaped `/` outside character classes becomes `\/`, line breaks are
/// written as escapes, and an empty source is written as `(?:)`.
fn write_escaped_source(f: &mut fmt::Formatter<'_>, source: &str) -> fmt::Result {
    if source.is_empty() {
        return f.write_str("(?:)");
    }

    let mut in_class = false;
    let mut escaped = false;
    for c in source.chars() {
        match c {
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\u{2028}' => f.write_str("\\u2028")?,
            '\u{2029}' => f.write_str("\\u2029")?,
            _ if escaped => fmt::Write::write_char(f, c)?,
            '\\' => fmt::Write::write_char(f, c)?,
            '/' if !in_class => f.write_str("\\/")?,
            '[' => {
                in_class = true;
                fmt::Write::write_char(f, c)?;
            }
            ']' => {
                in_class = false;
                fmt::Write::write_char(f, c)?;
            }
            _ => fmt::Write::write_char(f, c)?,
        }
        escaped = c == '\\' && !escaped;
    }
    Ok(())
}

/// One occurrence of a blocked pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockedMatch {
    /// The matched (lower-cased) substring.
    pub text: String,
    /// The pattern that produced it.
    pub pattern: BlockPattern,
    /// Where the checked text came from.
    pub category: Option<MatchCategory>,
}

/// Compiled patterns keyed by their configured text.
///
/// A pattern is compiled the first time it is used. Failures are not
/// cached, so a malformed pattern fails again on every use.
#[derive(Debug, Clone, Default)]
pub struct PatternCache {
    compiled: RefCell<HashMap<String, BlockPattern>>,
}

impl PatternCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the compiled form of `pattern`, compiling it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::InvalidPattern`] if the pattern does not compile.
    pub fn get(&self, pattern: &str) -> Result<BlockPattern, RuleError> {
        if let Some(found) = self.compiled.borrow().get(pattern) {
            return Ok(found.clone());
        }
        let compiled = BlockPattern::compile(pattern)?;
        self.compiled
            .borrow_mut()
            .insert(pattern.to_string(), compiled.clone());
        Ok(compiled)
    }

    /// Number of patterns compiled so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.compiled.borrow().len()
    }

    /// Returns true if nothing has been compiled yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Finds every occurrence of every pattern in `text`.
    ///
    /// Patterns are scanned in list order; occurrences of one pattern come
    /// out left to right. Both sides are lower-cased first.
    ///
    /// # Errors
    ///
    /// Returns the first pattern compilation failure.
    pub fn find_matches(
        &self,
        text: &str,
        patterns: &[String],
        category: Option<MatchCategory>,
    ) -> Result<Vec<BlockedMatch>, RuleError> {
        let text = text.to_lowercase();
        let mut matches = Vec::new();
        for raw in patterns {
            let pattern = self.get(raw)?;
            matches.extend(pattern.occurrences(&text).map(|found| BlockedMatch {
                text: found.to_string(),
                pattern: pattern.clone(),
                category,
            }));
        }
        Ok(matches)
    }
}

/// Finds every occurrence of every pattern in `text` without caching.
///
/// # Errors
///
/// Returns the first pattern compilation failure.
pub fn find_matches(
    text: &str,
    patterns: &[String],
    category: Option<MatchCategory>,
) -> Result<Vec<BlockedMatch>, RuleError> {
    PatternCache::new().find_matches(text, patterns, category)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    fn texts(matches: &[BlockedMatch]) -> Vec<&str> {
        matches.iter().map(|m| m.text.as_str()).collect()
    }

    #[test]
    fn finds_every_occurrence_in_order() {
        let found = find_matches(
            "bad-name lots of other words bad-name more words bad-name",
            &patterns(&["bad-name"]),
            Some(MatchCategory::Attribute),
        )
        .expect("valid pattern");
        assert_eq!(texts(&found), ["bad-name", "bad-name", "bad-name"]);
        assert!(found
            .iter()
            .all(|m| m.category == Some(MatchCategory::Attribute)));
    }

    #[test]
    fn patterns_are_processed_in_configuration_order() {
        let found =
            find_matches("ab ba", &patterns(&["b", "a"]), None).expect("valid patterns");
        let summary: Vec<(&str, &str)> = found
            .iter()
            .map(|m| (m.pattern.source(), m.text.as_str()))
            .collect();
        assert_eq!(summary, [("b", "b"), ("b", "b"), ("a", "a"), ("a", "a")]);
    }

    #[test]
    fn matching_ignores_case_on_both_sides() {
        let found = find_matches("<Thing-BAD-Name>", &patterns(&["Bad-NAME"]), None)
            .expect("valid pattern");
        assert_eq!(texts(&found), ["bad-name"]);
        assert_eq!(found[0].pattern.source(), "bad-name");
    }

    #[test]
    fn whitespace_anchored_pattern_reports_surrounding_space() {
        let pattern = patterns(&[r"(?:^|\s)share-panel(?:$|\s)"]);
        let cases = [
            ("share-panel", "share-panel"),
            ("other class names before share-panel", " share-panel"),
            ("share-panel other class names after", "share-panel "),
            ("class names before share-panel and class names after", " share-panel "),
        ];
        for (value, expected) in cases {
            let found = find_matches(value, &pattern, None).expect("valid pattern");
            assert_eq!(texts(&found), [expected], "value: {value}");
        }
    }

    #[test]
    fn word_boundaries_are_supported() {
        let found = find_matches(
            "other class names before share-panel",
            &patterns(&[r"\bshare-panel\b"]),
            None,
        )
        .expect("valid pattern");
        assert_eq!(texts(&found), ["share-panel"]);
        assert!(find_matches("share-panels", &patterns(&[r"\bshare-panel\b"]), None)
            .expect("valid pattern")
            .is_empty());
    }

    #[test]
    fn empty_pattern_list_yields_nothing() {
        assert!(find_matches("anything", &[], None)
            .expect("no patterns")
            .is_empty());
    }

    #[test]
    fn repeated_runs_are_identical() {
        let list = patterns(&["a.", "c"]);
        let first = find_matches("abcacd", &list, None).expect("valid");
        let second = find_matches("abcacd", &list, None).expect("valid");
        assert_eq!(first, second);
    }

    #[test]
    fn malformed_pattern_is_surfaced() {
        let err = find_matches("text", &patterns(&["ok", "(unclosed"]), None)
            .expect_err("pattern should not compile");
        match err {
            RuleError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "(unclosed"),
        }
    }

    #[test]
    fn cache_compiles_each_pattern_once() {
        let cache = PatternCache::new();
        let list = patterns(&["Bad", "bad", "ad"]);
        let first = cache.find_matches("bad ad", &list, None).expect("valid");
        let second = cache.find_matches("BAD", &list, None).expect("valid");
        assert_eq!(cache.len(), 3);
        assert_eq!(texts(&first), ["bad", "bad", "ad", "ad"]);
        assert_eq!(texts(&second), ["bad", "bad", "ad"]);
    }

    #[test]
    fn cache_does_not_remember_failures() {
        let cache = PatternCache::new();
        let list = patterns(&["(unclosed"]);
        assert!(cache.find_matches("a", &list, None).is_err());
        assert!(cache.find_matches("b", &list, None).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn displays_as_slash_literal() {
        let pattern = BlockPattern::compile("Bad-Name").expect("valid");
        assert_eq!(pattern.to_string(), "/bad-name/g");
        let pattern = BlockPattern::compile(r"\bshare-panel\b").expect("valid");
        assert_eq!(pattern.to_string(), r"/\bshare-panel\b/g");
    }

    #[test]
    fn display_escapes_slashes_outside_classes() {
        let pattern = BlockPattern::compile(r"a/b[/]c\.d").expect("valid");
        assert_eq!(pattern.to_string(), r"/a\/b[/]c\.d/g");
    }

    #[test]
    fn display_of_empty_source() {
        let pattern = BlockPattern::compile("").expect("valid");
        assert_eq!(pattern.to_string(), "/(?:)/g");
    }
}
