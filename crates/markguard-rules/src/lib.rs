//! # markguard-rules
//!
//! Built-in markup lint rules for markguard.
//!
//! ## Available Rules
//!
//! | Name | Description |
//! |------|-------------|
//! | `block-words` | Reports user-configured patterns in tag names, attributes, text, or raw markup |
//!
//! ## Usage
//!
//! ```ignore
//! use markguard_core::{Linter, Ruleset};
//! use markguard_rules::add_all_rules;
//! use serde_json::json;
//!
//! let linter = add_all_rules(Linter::builder())
//!     .ruleset(Ruleset::new().with_rule("block-words", json!({"attributeValues": ["\\bshare-panel\\b"]})))
//!     .build();
//! let result = linter.verify(&events)?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod block_words;
mod registry;

pub use block_words::{BlockWords, BlockWordsOptions, PatternGroup};
pub use registry::{add_all_rules, all_rules, find_rule};

/// Re-export core types for convenience.
pub use markguard_core::{Diagnostic, HtmlRule, Severity};
