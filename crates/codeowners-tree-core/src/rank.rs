//! Specificity scoring for ownership rules.
//!
//! When several rules cover the same path, the rule with the highest
//! specificity owns it. Equal scores fall back to declaration order, where
//! the later rule wins.

use serde::Serialize;

/// Score contributed by each non-empty path segment.
pub const SEGMENT_WEIGHT: u32 = 100;

/// Bonus for patterns without any `*` wildcard.
pub const LITERAL_BONUS: u32 = 50;

/// Bonus for patterns that look like they name a specific file.
pub const FILE_BONUS: u32 = 25;

/// Calculates the specificity score of a pattern.
///
/// Higher scores mean more specific patterns:
/// - Each non-empty `/`-delimited segment: +100
/// - No `*` anywhere in the pattern: +50
/// - Contains a `.` and does not end with `/`: +25
///
/// The score depends only on the pattern text.
pub fn specificity(pattern: &str) -> u32 {
    let segments = pattern.split('/').filter(|s| !s.is_empty()).count() as u32;
    let mut score = segments * SEGMENT_WEIGHT;

    if !pattern.contains('*') {
        score += LITERAL_BONUS;
    }

    if pattern.contains('.') && !pattern.ends_with('/') {
        score += FILE_BONUS;
    }

    score
}

/// The precedence of a rule relative to the other rules of the same file.
///
/// Ordering compares specificity first and declaration index second, so the
/// greater `Rank` always wins and no two rules of one file compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Rank {
    /// Specificity score of the rule's pattern.
    pub specificity: u32,
    /// Zero-based position of the rule in the file.
    pub index: usize,
}

impl Rank {
    /// Creates a rank from a specificity score and declaration index.
    pub fn new(specificity: u32, index: usize) -> Self {
        Self { specificity, index }
    }

    /// Returns true if this rank takes precedence over `other`.
    pub fn outranks(&self, other: &Rank) -> bool {
        self > other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deeper_patterns_are_more_specific() {
        assert!(specificity("src/sub") > specificity("src"));
        assert!(specificity("a/b/c") > specificity("a/b"));
    }

    #[test]
    fn literal_bonus() {
        assert_eq!(specificity("src"), 150);
        assert_eq!(specificity("src/*"), 200);
        assert_eq!(specificity("src/**"), 200);
    }

    #[test]
    fn file_bonus() {
        assert_eq!(specificity("src/main.rs"), 275);
        assert_eq!(specificity("*.ts"), 125);
        // Trailing slash marks a directory, not a file.
        assert_eq!(specificity("conf.d/"), 150);
    }

    #[test]
    fn empty_segments_do_not_count() {
        assert_eq!(specificity("docs/"), specificity("docs"));
        assert_eq!(specificity("a//b"), specificity("a/b"));
    }

    #[test]
    fn score_is_deterministic() {
        for pattern in ["", "*", "docs/api", "src/**/*.rs", "README.md"] {
            assert_eq!(specificity(pattern), specificity(pattern));
        }
    }

    #[test]
    fn rank_prefers_specificity_then_later_index() {
        let early_specific = Rank::new(250, 0);
        let late_general = Rank::new(150, 5);
        assert!(early_specific.outranks(&late_general));

        let early = Rank::new(150, 1);
        let late = Rank::new(150, 2);
        assert!(late.outranks(&early));
        assert!(!early.outranks(&late));
    }
}
