//! Parser module for CODEOWNERS files.
//!
//! This module turns raw rule-file text into an ordered list of
//! [`Rule`]s. Parsing is best-effort: comments and blank lines are skipped,
//! and lines that cannot be understood are reported as [`ParseWarning`]s
//! instead of aborting.
//!
//! # Example
//!
//! ```rust
//! use codeowners_tree_core::parse::parse_rules;
//!
//! let input = r#"
//! ## CODEOWNERS file
//! *.rs @rustacean
//! /docs/ @docs-team
//! "#;
//!
//! let result = parse_rules(input);
//! assert_eq!(result.rules.len(), 2);
//! assert_eq!(result.rules[1].pattern, "docs");
//! ```

mod error;
mod lexer;
mod parser;
mod rule;

// Re-export public types
pub use error::{ParseResult, ParseWarning};
pub use parser::parse_rules;
pub use rule::Rule;

// Re-export lexer utilities that may be useful for custom parsing
pub use lexer::{is_owner_token, strip_inline_comment};
