//! Rule data structures for CODEOWNERS files.

use crate::matching::normalize;
use crate::rank::{Rank, specificity};
use serde::Serialize;
use std::fmt::{self, Display};

/// One ownership rule: a pattern and the owners assigned to it.
///
/// Rules are immutable once parsed. The pattern is stored without a leading
/// or trailing `/`, so `/docs/` and `docs` describe the same rule pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    /// The normalized, repository-relative pattern.
    pub pattern: String,
    /// Owner identifiers in declaration order (each starts with `@`).
    pub owners: Vec<String>,
    /// Specificity score derived from the pattern text.
    pub specificity: u32,
    /// The line the rule was declared on (1-based).
    pub line: usize,
    /// Zero-based position among all rules of the file.
    pub index: usize,
}

impl Rule {
    /// Creates a rule from a raw pattern token.
    ///
    /// Leading `/` are stripped before scoring; trailing `/` are stripped
    /// from the stored pattern after scoring.
    pub fn new(raw_pattern: &str, owners: Vec<String>, line: usize, index: usize) -> Self {
        let unanchored = raw_pattern.trim_start_matches('/');
        Self {
            pattern: normalize(raw_pattern).to_string(),
            owners,
            specificity: specificity(unanchored),
            line,
            index,
        }
    }

    /// Returns the precedence of this rule.
    pub fn rank(&self) -> Rank {
        Rank::new(self.specificity, self.index)
    }

    /// Returns true if the pattern contains a `*` wildcard.
    pub fn is_wildcard(&self) -> bool {
        self.pattern.contains('*')
    }

    /// Returns true if `owner` is one of this rule's owners.
    pub fn is_owned_by(&self, owner: &str) -> bool {
        self.owners.iter().any(|o| o == owner)
    }

    /// Returns the first listed owner, if any.
    pub fn primary_owner(&self) -> Option<&str> {
        self.owners.first().map(String::as_str)
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)?;
        for owner in &self.owners {
            write!(f, " {}", owner)?;
        }
        Ok(())
    }
}
