//! Soft diagnostics produced while parsing CODEOWNERS files.
//!
//! Parsing never fails. Lines that cannot contribute a usable rule are
//! reported here and otherwise left inert.

use super::rule::Rule;
use serde::Serialize;
use thiserror::Error;

/// A non-fatal problem found on a single line.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParseWarning {
    /// A token after the pattern is not an `@owner` identifier.
    #[error("line {line}: ignoring token '{token}' (owners must start with '@')")]
    IgnoredToken {
        /// The line number (1-based).
        line: usize,
        /// The ignored token.
        token: String,
    },

    /// A rule line has no owners; it still takes part in matching.
    #[error("line {line}: pattern '{pattern}' has no owners")]
    MissingOwners {
        /// The line number (1-based).
        line: usize,
        /// The pattern without owners.
        pattern: String,
    },

    /// The pattern is empty after normalization (for example a bare `/`).
    #[error("line {line}: empty pattern, line ignored")]
    EmptyPattern {
        /// The line number (1-based).
        line: usize,
    },
}

impl ParseWarning {
    /// Creates an ignored token warning.
    pub fn ignored_token(line: usize, token: impl Into<String>) -> Self {
        Self::IgnoredToken {
            line,
            token: token.into(),
        }
    }

    /// Creates a missing owners warning.
    pub fn missing_owners(line: usize, pattern: impl Into<String>) -> Self {
        Self::MissingOwners {
            line,
            pattern: pattern.into(),
        }
    }

    /// Creates an empty pattern warning.
    pub fn empty_pattern(line: usize) -> Self {
        Self::EmptyPattern { line }
    }

    /// Returns the line number where this warning occurred.
    pub fn line(&self) -> usize {
        match self {
            ParseWarning::IgnoredToken { line, .. } => *line,
            ParseWarning::MissingOwners { line, .. } => *line,
            ParseWarning::EmptyPattern { line } => *line,
        }
    }
}

/// The result of parsing a CODEOWNERS file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseResult {
    /// Rules in declaration order.
    pub rules: Vec<Rule>,
    /// Soft problems found along the way.
    pub warnings: Vec<ParseWarning>,
}

impl ParseResult {
    /// Returns true if no warnings were produced.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Returns true if the file holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_messages() {
        let warning = ParseWarning::ignored_token(3, "dev@example.com");
        assert_eq!(warning.line(), 3);
        assert!(warning.to_string().contains("dev@example.com"));

        let warning = ParseWarning::missing_owners(4, "vendor");
        assert!(warning.to_string().contains("no owners"));

        assert_eq!(ParseWarning::empty_pattern(9).line(), 9);
    }

    #[test]
    fn default_result_is_clean_and_empty() {
        let result = ParseResult::default();
        assert!(result.is_clean());
        assert!(result.is_empty());
    }
}
