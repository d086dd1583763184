//! In-memory file system for embedding hosts and tests.

use super::{Entry, EntryKind, FileSystem};
use std::collections::{BTreeMap, BTreeSet};
use std::io;

/// A [`FileSystem`] backed by a map of file paths to contents.
///
/// Directories are implied by the files beneath them. Paths marked
/// unreadable fail every probe and read, which lets callers exercise the
/// per-entry failure handling of the tree builder.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: BTreeMap<String, String>,
    unreadable: BTreeSet<String>,
}

impl MemoryFileSystem {
    /// Creates an empty file system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file with the given contents.
    pub fn with_file(mut self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    /// Adds several empty files.
    pub fn with_files<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for path in paths {
            self.insert(path, String::new());
        }
        self
    }

    /// Marks a path as unreadable.
    pub fn with_unreadable(mut self, path: impl Into<String>) -> Self {
        self.unreadable.insert(path.into());
        self
    }

    /// Adds or replaces a file.
    pub fn insert(&mut self, path: impl Into<String>, contents: impl Into<String>) {
        self.files.insert(path.into(), contents.into());
    }

    /// Removes a file, returning its contents.
    pub fn remove(&mut self, path: &str) -> Option<String> {
        self.files.remove(path)
    }

    fn check_readable(&self, path: &str) -> io::Result<()> {
        if self.unreadable.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("'{}' is unreadable", path),
            ));
        }
        Ok(())
    }

    fn is_directory(&self, path: &str) -> bool {
        path.is_empty() || self.files_under(path).next().is_some()
    }

    /// Yields `(full path, remainder)` for every file beneath `dir`.
    fn files_under<'a>(&'a self, dir: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.files.keys().filter_map(move |path| {
            let rest = if dir.is_empty() {
                path.as_str()
            } else {
                path.strip_prefix(dir)?.strip_prefix('/')?
            };
            Some((path.as_str(), rest))
        })
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &str) -> io::Result<String> {
        self.check_readable(path)?;
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("'{}' not found", path))
        })
    }

    fn probe(&self, path: &str) -> io::Result<EntryKind> {
        self.check_readable(path)?;
        if self.files.contains_key(path) {
            Ok(EntryKind::File)
        } else if self.is_directory(path) {
            Ok(EntryKind::Directory)
        } else {
            Ok(EntryKind::Absent)
        }
    }

    fn list_directory(&self, dir: &str, recursive: bool) -> io::Result<Vec<Entry>> {
        self.check_readable(dir)?;
        if !self.is_directory(dir) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("'{}' is not a directory", dir),
            ));
        }

        let join = |name: &str| {
            if dir.is_empty() {
                name.to_string()
            } else {
                format!("{}/{}", dir, name)
            }
        };

        let mut entries = BTreeSet::new();
        for (path, rest) in self.files_under(dir) {
            let segments: Vec<&str> = rest.split('/').collect();
            if recursive {
                for depth in 1..segments.len() {
                    entries.insert((join(&segments[..depth].join("/")), EntryKind::Directory));
                }
                entries.insert((path.to_string(), EntryKind::File));
            } else if segments.len() == 1 {
                entries.insert((path.to_string(), EntryKind::File));
            } else {
                entries.insert((join(segments[0]), EntryKind::Directory));
            }
        }

        Ok(entries
            .into_iter()
            .map(|(path, kind)| Entry { path, kind })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MemoryFileSystem {
        MemoryFileSystem::new()
            .with_file(".github/CODEOWNERS", "* @all\n")
            .with_files(["src/a.ts", "src/b.js", "src/deep/c.ts", "README.md"])
    }

    #[test]
    fn probe_kinds() {
        let fs = sample();
        assert_eq!(fs.probe("src").unwrap(), EntryKind::Directory);
        assert_eq!(fs.probe("src/a.ts").unwrap(), EntryKind::File);
        assert_eq!(fs.probe("sr").unwrap(), EntryKind::Absent);
        assert_eq!(fs.probe("").unwrap(), EntryKind::Directory);
    }

    #[test]
    fn single_level_listing() {
        let fs = sample();
        let entries = fs.list_directory("src", false).unwrap();
        assert_eq!(
            entries,
            vec![
                Entry::file("src/a.ts"),
                Entry::file("src/b.js"),
                Entry::directory("src/deep"),
            ]
        );
    }

    #[test]
    fn recursive_listing_from_root() {
        let fs = sample();
        let entries = fs.list_directory("", true).unwrap();
        let paths: Vec<_> = entries.iter().map(|e| e.path.as_str()).collect();
        assert!(paths.contains(&".github"));
        assert!(paths.contains(&"src/deep"));
        assert!(paths.contains(&"src/deep/c.ts"));
        assert!(paths.contains(&"README.md"));
        assert_eq!(entries.iter().filter(|e| e.path == "src/deep").count(), 1);
    }

    #[test]
    fn unreadable_paths_fail() {
        let fs = sample().with_unreadable("src/a.ts");
        assert_eq!(
            fs.probe("src/a.ts").unwrap_err().kind(),
            io::ErrorKind::PermissionDenied
        );
        assert!(fs.read_to_string("src/a.ts").is_err());
        // Other paths are unaffected.
        assert_eq!(fs.probe("src/b.js").unwrap(), EntryKind::File);
    }

    #[test]
    fn listing_a_file_fails() {
        let fs = sample();
        assert!(fs.list_directory("README.md", false).is_err());
        assert!(fs.list_directory("missing", true).is_err());
    }

    #[test]
    fn insert_and_remove() {
        let mut fs = MemoryFileSystem::new();
        fs.insert("a/b.txt", "x");
        assert!(fs.is_dir("a"));
        assert_eq!(fs.remove("a/b.txt").as_deref(), Some("x"));
        assert!(!fs.exists("a"));
    }
}
