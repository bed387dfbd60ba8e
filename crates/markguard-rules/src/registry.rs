//! Registry of built-in rules.

use crate::BlockWords;
use markguard_core::{LinterBuilder, RuleBox};

/// Returns all available rules.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![Box::new(BlockWords::new())]
}

/// Looks up a built-in rule by identifier.
#[must_use]
pub fn find_rule(id: &str) -> Option<RuleBox> {
    all_rules().into_iter().find(|rule| rule.id() == id)
}

/// Registers every built-in rule with a linter builder.
#[must_use]
pub fn add_all_rules(builder: LinterBuilder) -> LinterBuilder {
    builder.rules(all_rules())
}

#[cfg(test)]
mod tests {
    use super::*;
    use markguard_core::Linter;
    use std::collections::HashSet;

    #[test]
    fn rule_ids_are_unique_and_described() {
        let rules = all_rules();
        let ids: HashSet<&str> = rules.iter().map(|rule| rule.id()).collect();
        assert_eq!(ids.len(), rules.len());
        assert!(rules.iter().all(|rule| !rule.description().is_empty()));
    }

    #[test]
    fn finds_block_words() {
        assert!(find_rule("block-words").is_some());
        assert!(find_rule("no-such-rule").is_none());
    }

    #[test]
    fn registers_with_linter() {
        let linter = add_all_rules(Linter::builder()).build();
        assert_eq!(linter.rule_count(), all_rules().len());
    }
}
