//! Compact include expressions for search tools.
//!
//! A directory with many listed paths is written once as `dir/**` instead
//! of path by path.

use std::collections::{HashMap, HashSet};

/// A directory holding more than this many listed paths is collapsed.
pub const DEFAULT_COLLAPSE_THRESHOLD: usize = 3;

/// Joins `paths` with `,`, collapsing crowded directories into `dir/**`.
///
/// # Example
///
/// ```rust
/// use codeowners_tree_core::include::format_as_include_pattern;
///
/// let paths = ["src/a.rs", "src/b.rs", "src/c.rs", "src/d.rs", "README.md"];
/// assert_eq!(format_as_include_pattern(&paths), "src/**,README.md");
/// ```
pub fn format_as_include_pattern<S: AsRef<str>>(paths: &[S]) -> String {
    format_as_include_pattern_with_threshold(paths, DEFAULT_COLLAPSE_THRESHOLD)
}

/// Like [`format_as_include_pattern`] with an explicit collapse threshold.
///
/// Paths are deduplicated. Wildcard paths are kept as they are, and
/// root-level paths are never collapsed. A collapsed `dir/**` takes the
/// place of the first path it covers, including paths in subdirectories.
pub fn format_as_include_pattern_with_threshold<S: AsRef<str>>(
    paths: &[S],
    threshold: usize,
) -> String {
    let mut seen = HashSet::new();
    let unique: Vec<&str> = paths
        .iter()
        .map(|p| p.as_ref().trim_matches('/'))
        .filter(|p| !p.is_empty() && seen.insert(*p))
        .collect();

    let mut per_dir: HashMap<&str, usize> = HashMap::new();
    for path in unique.iter().filter(|p| !p.contains('*')) {
        if let Some((dir, _)) = path.rsplit_once('/') {
            *per_dir.entry(dir).or_default() += 1;
        }
    }
    let crowded: HashSet<&str> = per_dir
        .into_iter()
        .filter(|&(_, count)| count > threshold)
        .map(|(dir, _)| dir)
        .collect();

    let mut emitted = HashSet::new();
    let mut parts: Vec<String> = Vec::new();
    for path in unique {
        let collapsed = if path.contains('*') {
            None
        } else {
            outermost_crowded_ancestor(path, &crowded)
        };
        match collapsed {
            Some(dir) => {
                if emitted.insert(dir) {
                    parts.push(format!("{}/**", dir));
                }
            }
            None => parts.push(path.to_string()),
        }
    }
    parts.join(",")
}

fn outermost_crowded_ancestor<'a>(path: &'a str, crowded: &HashSet<&str>) -> Option<&'a str> {
    path.match_indices('/')
        .map(|(i, _)| &path[..i])
        .find(|dir| crowded.contains(dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_with_commas() {
        assert_eq!(
            format_as_include_pattern(&["src/a.rs", "docs/b.md"]),
            "src/a.rs,docs/b.md"
        );
        assert_eq!(format_as_include_pattern::<&str>(&[]), "");
    }

    #[test]
    fn collapses_above_threshold_only() {
        let three = ["src/a", "src/b", "src/c"];
        assert_eq!(format_as_include_pattern(&three), "src/a,src/b,src/c");

        let four = ["lib/x", "src/a", "src/b", "src/c", "src/d"];
        assert_eq!(format_as_include_pattern(&four), "lib/x,src/**");
    }

    #[test]
    fn collapsed_directory_swallows_subdirectories() {
        let paths = ["src/deep/x", "src/a", "src/b", "src/c", "src/d", "srcx/e"];
        assert_eq!(format_as_include_pattern(&paths), "src/**,srcx/e");
    }

    #[test]
    fn root_paths_never_collapse() {
        let paths = ["a", "b", "c", "d", "e"];
        assert_eq!(format_as_include_pattern(&paths), "a,b,c,d,e");
    }

    #[test]
    fn wildcards_pass_through() {
        let paths = ["*.ts", "src/*.rs", "src/a", "src/b", "src/c", "src/d"];
        assert_eq!(format_as_include_pattern(&paths), "*.ts,src/*.rs,src/**");
    }

    #[test]
    fn duplicates_are_removed() {
        let paths = ["src/a", "/src/a/", "src/a", "README.md"];
        assert_eq!(format_as_include_pattern(&paths), "src/a,README.md");
    }

    #[test]
    fn explicit_threshold() {
        let paths = vec!["d/a".to_string(), "d/b".to_string()];
        assert_eq!(format_as_include_pattern_with_threshold(&paths, 1), "d/**");
        assert_eq!(format_as_include_pattern_with_threshold(&paths, 2), "d/a,d/b");
    }
}
