//! # markguard-core
//!
//! Core framework for markup linting driven by tokenizer events.
//!
//! This crate provides the contract between a markup tokenizer and lint
//! rules. It includes:
//!
//! - [`ParseEvent`] for the events a tokenizer emits
//! - [`HtmlRule`] trait for rule descriptors
//! - [`EventParser`], [`AttributeMap`], and [`Reporter`] for the host side
//! - [`Linter`] as an in-memory reference host
//! - [`Ruleset`] for per-rule options loaded from JSON or TOML
//!
//! ## Example
//!
//! ```ignore
//! use markguard_core::{Linter, Ruleset};
//!
//! let linter = Linter::builder()
//!     .rule(MyRule::new())
//!     .ruleset(Ruleset::from_file(".htmlhintrc".as_ref())?)
//!     .build();
//!
//! let result = linter.verify(&events)?;
//! print!("{}", result.format_report());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod event;
mod linter;
mod reporter;
mod rule;
mod types;

pub use config::{ConfigError, Ruleset};
pub use event::{Attribute, EventFilter, EventKind, ParseEvent};
pub use linter::{LintError, Linter, LinterBuilder};
pub use reporter::{CollectingReporter, Reporter};
pub use rule::{AttributeMap, EventListener, EventParser, HtmlRule, RuleBox, RuleError};
pub use types::{Diagnostic, LintResult, Location, Severity};
