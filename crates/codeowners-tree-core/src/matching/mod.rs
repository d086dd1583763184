//! Pattern matching for CODEOWNERS files.
//!
//! This is the one matcher used everywhere a rule is compared with a path:
//! by the resolver for rule containment and by the tree builder when it
//! expands wildcard rules against a real listing. Patterns follow these
//! rules:
//!
//! - A pattern equal to the path matches it
//! - A literal pattern owns everything beneath it (`src` matches `src/a/b.rs`)
//! - `prefix/*` matches direct children of `prefix` only
//! - `prefix/**` matches anything beneath `prefix`, at any depth
//! - Elsewhere `*` matches any run of non-slash characters and `**` any run
//!   including slashes; every other character is literal
//! - A wildcard pattern without a `/` (such as `*.ts`) matches at any depth
//!
//! Both paths and patterns are repository-relative with forward slashes.

use log::debug;
use regex::Regex;

/// A compiled CODEOWNERS pattern that can match file paths.
#[derive(Debug, Clone)]
pub struct Pattern {
    /// The normalized pattern string.
    original: String,
    /// How the pattern is matched.
    kind: PatternKind,
}

#[derive(Debug, Clone)]
enum PatternKind {
    /// No wildcard: exact or directory-prefix match.
    Literal,
    /// `prefix/*` with a literal prefix.
    Children(String),
    /// `prefix/**` with a literal prefix (empty for `**`).
    Descendants(String),
    /// Any other wildcard pattern.
    Glob(Regex),
}

impl Pattern {
    /// Compiles a CODEOWNERS pattern for matching.
    ///
    /// Leading and trailing `/` are ignored.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let original = normalize(pattern).to_string();
        let kind = classify(&original)?;
        Ok(Self { original, kind })
    }

    /// Returns the normalized pattern string.
    pub fn as_str(&self) -> &str {
        &self.original
    }

    /// Returns true if the pattern contains a `*` wildcard.
    pub fn is_wildcard(&self) -> bool {
        self.original.contains('*')
    }

    /// Checks if this pattern matches the given path.
    pub fn is_match(&self, path: &str) -> bool {
        let path = path.trim_start_matches('/');
        if path == self.original {
            return true;
        }

        match &self.kind {
            PatternKind::Literal => {
                !self.original.is_empty() && strip_dir_prefix(&self.original, path).is_some()
            }
            PatternKind::Children(prefix) => strip_dir_prefix(prefix, path)
                .is_some_and(|rest| !rest.is_empty() && !rest.contains('/')),
            PatternKind::Descendants(prefix) => {
                strip_dir_prefix(prefix, path).is_some_and(|rest| !rest.is_empty())
            }
            PatternKind::Glob(regex) => regex.is_match(path),
        }
    }

    /// Returns true if `other` is a different pattern whose text this
    /// pattern matches, i.e. `other` names a subset of this pattern's paths.
    pub fn covers(&self, other: &str) -> bool {
        let other = normalize(other);
        other != self.original && self.is_match(other)
    }

    /// Returns the literal directory before the first wildcard segment.
    ///
    /// For a literal pattern this is the pattern itself; for `*.ts` it is the
    /// repository root (`""`).
    pub fn base_dir(&self) -> &str {
        let Some(star) = self.original.find('*') else {
            return &self.original;
        };
        let end = self.original[..star].rfind('/').unwrap_or(0);
        &self.original[..end]
    }

    /// Returns true if matches can sit more than one level below
    /// [`base_dir`](Self::base_dir), so expanding the pattern needs a
    /// recursive listing.
    pub fn is_recursive(&self) -> bool {
        let Some(star) = self.original.find('*') else {
            return false;
        };
        self.original.contains("**")
            || !self.original.contains('/')
            || self.original[star..].contains('/')
    }
}

/// Checks if `path` matches `pattern`.
///
/// Compiles the pattern on every call; hold a [`Pattern`] to match many
/// paths against the same pattern.
pub fn matches(path: &str, pattern: &str) -> bool {
    match Pattern::new(pattern) {
        Ok(compiled) => compiled.is_match(path),
        Err(e) => {
            debug!("Pattern '{}' could not be compiled: {}", pattern, e);
            false
        }
    }
}

/// Returns true if `ancestor` equals `path` or is one of its parent
/// directories. Only whole segments are compared.
pub fn is_ancestor_or_equal(ancestor: &str, path: &str) -> bool {
    ancestor == path || (!ancestor.is_empty() && strip_dir_prefix(ancestor, path).is_some())
}

/// Strips every leading and trailing `/` from a pattern.
///
/// Applying it twice gives the same result as applying it once, so rule
/// patterns and compiled patterns always agree.
pub fn normalize(pattern: &str) -> &str {
    pattern.trim_start_matches('/').trim_end_matches('/')
}

/// Returns what follows `prefix/` in `path`; an empty prefix is the root.
fn strip_dir_prefix<'a>(prefix: &str, path: &'a str) -> Option<&'a str> {
    if prefix.is_empty() {
        return Some(path);
    }
    path.strip_prefix(prefix)?.strip_prefix('/')
}

fn classify(pattern: &str) -> Result<PatternKind, regex::Error> {
    if !pattern.contains('*') {
        return Ok(PatternKind::Literal);
    }
    if pattern == "**" {
        return Ok(PatternKind::Descendants(String::new()));
    }
    if let Some(prefix) = pattern.strip_suffix("/**")
        && !prefix.contains('*')
    {
        return Ok(PatternKind::Descendants(prefix.to_string()));
    }
    if let Some(prefix) = pattern.strip_suffix("/*")
        && !prefix.contains('*')
    {
        return Ok(PatternKind::Children(prefix.to_string()));
    }
    Regex::new(&glob_to_regex(pattern)).map(PatternKind::Glob)
}

/// Translates a wildcard pattern into an anchored regular expression.
fn glob_to_regex(pattern: &str) -> String {
    let mut out = String::from("^");
    if !pattern.contains('/') {
        out.push_str("(?:.*/)?");
    }

    let mut literal = String::new();
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '*' {
            literal.push(c);
            continue;
        }
        out.push_str(&regex::escape(&literal));
        literal.clear();

        if chars.peek() == Some(&'*') {
            chars.next();
            if chars.peek() == Some(&'/') {
                // `**/` also matches zero directories
                chars.next();
                out.push_str("(?:.*/)?");
            } else {
                out.push_str(".*");
            }
        } else {
            out.push_str("[^/]*");
        }
    }
    out.push_str(&regex::escape(&literal));

    // A literal last segment names a directory or file; a directory owns
    // its contents.
    let last_segment = pattern.rsplit('/').next().unwrap_or(pattern);
    if pattern.contains('/') && !last_segment.contains('*') {
        out.push_str("(?:/.*)?");
    }

    out.push('$');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match() {
        for pattern in ["src", "src/main.rs", "a/b/c", "README.md"] {
            assert!(matches(pattern, pattern), "{pattern} should match itself");
        }
    }

    #[test]
    fn directory_prefix() {
        assert!(matches("src/a/b.ts", "src"));
        assert!(matches("src/a/b.ts", "/src/"));
        assert!(!matches("srcfoo/b.ts", "src"));
        assert!(!matches("lib/src/b.ts", "src"));
        assert!(!matches("src", "src/a"));
    }

    #[test]
    fn single_level_wildcard() {
        assert!(matches("a/b", "a/*"));
        assert!(!matches("a/b/c", "a/*"));
        assert!(!matches("a", "a/*"));
        assert!(!matches("ab/c", "a/*"));
    }

    #[test]
    fn recursive_wildcard() {
        assert!(matches("a/b", "a/**"));
        assert!(matches("a/b/c/d", "a/**"));
        assert!(!matches("b/c", "a/**"));
        assert!(matches("anything/at/all", "**"));
    }

    #[test]
    fn slashless_wildcard_matches_at_any_depth() {
        assert!(matches("a.ts", "*.ts"));
        assert!(matches("src/a.ts", "*.ts"));
        assert!(matches("src/deep/a.ts", "*.ts"));
        assert!(!matches("src/b.js", "*.ts"));
        assert!(matches("src/b.js", "*"));
    }

    #[test]
    fn mid_pattern_wildcards() {
        assert!(matches("src/a/test", "src/*/test"));
        assert!(matches("src/a/test/unit.rs", "src/*/test"));
        assert!(!matches("src/a/b/test", "src/*/test"));
        assert!(matches("src/a/b/test", "src/**/test"));
        assert!(matches("src/test", "src/**/test"));
        assert!(matches("docs/README.md", "docs/*.md"));
        assert!(!matches("docs/api/index.md", "docs/*.md"));
    }

    #[test]
    fn inline_double_star_crosses_directories() {
        assert!(matches("src/a/b/x.rs", "src/**.rs"));
        assert!(!matches("src/a/b/x.rs", "src/*.rs"));
    }

    #[test]
    fn dot_is_literal() {
        assert!(matches("src/a.ts", "src/*.ts"));
        assert!(!matches("src/axts", "src/*.ts"));
    }

    #[test]
    fn wildcard_pattern_text_covers_more_specific_pattern_text() {
        let general = Pattern::new("*.ts").unwrap();
        assert!(general.covers("src/*.ts"));
        assert!(!general.covers("*.ts"));

        let dir = Pattern::new("src").unwrap();
        assert!(dir.covers("src/sub"));
        assert!(dir.covers("/src/sub/"));
        assert!(!dir.covers("srcfoo"));
    }

    #[test]
    fn base_dir_and_recursion() {
        let p = Pattern::new("src/*.ts").unwrap();
        assert_eq!(p.base_dir(), "src");
        assert!(!p.is_recursive());

        let p = Pattern::new("*.ts").unwrap();
        assert_eq!(p.base_dir(), "");
        assert!(p.is_recursive());

        let p = Pattern::new("a/b/**").unwrap();
        assert_eq!(p.base_dir(), "a/b");
        assert!(p.is_recursive());

        let p = Pattern::new("src/*/test").unwrap();
        assert_eq!(p.base_dir(), "src");
        assert!(p.is_recursive());

        let p = Pattern::new("docs").unwrap();
        assert_eq!(p.base_dir(), "docs");
        assert!(!p.is_recursive());
    }

    #[test]
    fn ancestor_or_equal() {
        assert!(is_ancestor_or_equal("docs", "docs"));
        assert!(is_ancestor_or_equal("docs", "docs/api/readme.md"));
        assert!(!is_ancestor_or_equal("docs", "docsite/index.md"));
        assert!(!is_ancestor_or_equal("", "docs"));
    }

    #[test]
    fn matching_is_repeatable() {
        let p = Pattern::new("src/**/test").unwrap();
        for _ in 0..3 {
            assert!(p.is_match("src/x/test"));
            assert!(!p.is_match("lib/x/test"));
        }
    }

    #[test]
    fn leading_slash_on_path_is_ignored() {
        assert!(matches("/src/a.rs", "src"));
    }
}
