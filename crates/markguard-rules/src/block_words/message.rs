//! Diagnostic text for blocked words.

use super::matcher::{BlockPattern, BlockedMatch, MatchCategory};

/// Renders the diagnostic for one blocked occurrence.
///
/// `Blocked {category }word from {pattern} detected{ in tag}: "{matched}"`,
/// where the category and tag parts are left out when absent.
#[must_use]
pub fn blocked_word_message(
    matched: &str,
    pattern: &BlockPattern,
    tag_name: Option<&str>,
    category: Option<MatchCategory>,
) -> String {
    let context = category.map_or_else(String::new, |c| format!("{c} "));
    let tag = tag_name
        .filter(|name| !name.is_empty())
        .map_or_else(String::new, |name| format!(" in {name}"));
    format!("Blocked {context}word from {pattern} detected{tag}: \"{matched}\"")
}

impl BlockedMatch {
    /// Renders this match as a diagnostic message.
    #[must_use]
    pub fn message(&self, tag_name: Option<&str>) -> String {
        blocked_word_message(&self.text, &self.pattern, tag_name, self.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(source: &str) -> BlockPattern {
        BlockPattern::compile(source).expect("valid pattern")
    }

    #[test]
    fn all_sweep_has_no_category() {
        insta::assert_snapshot!(
            blocked_word_message("bad-name", &pattern("bad-name"), Some("div"), None),
            @r#"Blocked word from /bad-name/g detected in div: "bad-name""#
        );
    }

    #[test]
    fn categories_are_labelled() {
        let p = pattern("bad-name");
        insta::assert_snapshot!(
            blocked_word_message("bad-name", &p, Some("thing-bad-name-thing"), Some(MatchCategory::TagName)),
            @r#"Blocked tag name word from /bad-name/g detected in thing-bad-name-thing: "bad-name""#
        );
        insta::assert_snapshot!(
            blocked_word_message(" share-panel", &pattern(r"(?:^|\s)share-panel(?:$|\s)"), Some("thing-ad-name-thing"), Some(MatchCategory::Attribute)),
            @r#"Blocked attribute word from /(?:^|\s)share-panel(?:$|\s)/g detected in thing-ad-name-thing: " share-panel""#
        );
    }

    #[test]
    fn text_without_tag_omits_location() {
        insta::assert_snapshot!(
            blocked_word_message("lorem", &pattern("lorem"), None, Some(MatchCategory::Text)),
            @r#"Blocked text word from /lorem/g detected: "lorem""#
        );
    }

    #[test]
    fn empty_tag_name_is_treated_as_absent() {
        assert_eq!(
            blocked_word_message("x", &pattern("x"), Some(""), None),
            r#"Blocked word from /x/g detected: "x""#
        );
    }

    #[test]
    fn match_renders_itself() {
        let m = BlockedMatch {
            text: "share-panel".to_string(),
            pattern: pattern(r"\bshare-panel\b"),
            category: Some(MatchCategory::Attribute),
        };
        assert_eq!(
            m.message(Some("span")),
            r#"Blocked attribute word from /\bshare-panel\b/g detected in span: "share-panel""#
        );
    }
}
