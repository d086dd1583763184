//! File-system capabilities consumed by the ownership engine.
//!
//! The engine never touches the disk directly. It reads the rule file,
//! probes paths and lists directories through a [`FileSystem`], so hosts
//! can plug in whatever backing store they have.
//!
//! All paths are repository-relative with forward slashes; `""` is the
//! repository root.

mod disk;
mod memory;

pub use disk::{DiskFileSystem, ListingConfig};
pub use memory::MemoryFileSystem;

use serde::Serialize;
use std::io;

/// What a path refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A regular file.
    File,
    /// A directory.
    Directory,
    /// Nothing exists at the path.
    Absent,
}

/// A single listed entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    /// Repository-relative path of the entry.
    pub path: String,
    /// File or directory.
    pub kind: EntryKind,
}

impl Entry {
    /// Creates a file entry.
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
        }
    }

    /// Creates a directory entry.
    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Directory,
        }
    }

    /// Returns true if this entry is a file.
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// Access to repository files.
pub trait FileSystem {
    /// Reads a file as UTF-8 text.
    fn read_to_string(&self, path: &str) -> io::Result<String>;

    /// Reports whether `path` is a file, a directory, or absent.
    ///
    /// Errors are reserved for paths that exist but cannot be inspected.
    fn probe(&self, path: &str) -> io::Result<EntryKind>;

    /// Lists the entries beneath `dir`, descending into subdirectories when
    /// `recursive` is set. The directory itself is not included.
    fn list_directory(&self, dir: &str, recursive: bool) -> io::Result<Vec<Entry>>;

    /// Returns true if something exists at `path`.
    fn exists(&self, path: &str) -> bool {
        matches!(
            self.probe(path),
            Ok(EntryKind::File | EntryKind::Directory)
        )
    }

    /// Returns true if `path` is a directory.
    fn is_dir(&self, path: &str) -> bool {
        matches!(self.probe(path), Ok(EntryKind::Directory))
    }

    /// Returns true if `path` is a file.
    fn is_file(&self, path: &str) -> bool {
        matches!(self.probe(path), Ok(EntryKind::File))
    }
}

impl<F: FileSystem + ?Sized> FileSystem for &F {
    fn read_to_string(&self, path: &str) -> io::Result<String> {
        (**self).read_to_string(path)
    }

    fn probe(&self, path: &str) -> io::Result<EntryKind> {
        (**self).probe(path)
    }

    fn list_directory(&self, dir: &str, recursive: bool) -> io::Result<Vec<Entry>> {
        (**self).list_directory(dir, recursive)
    }
}

/// Normalizes a path to the repository-relative form used by [`FileSystem`].
///
/// Backslashes become `/`, and leading `./` or `/` plus trailing `/` are
/// removed.
pub fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let mut trimmed = path.as_str();
    loop {
        if let Some(rest) = trimmed.strip_prefix("./") {
            trimmed = rest;
        } else if let Some(rest) = trimmed.strip_prefix('/') {
            trimmed = rest;
        } else {
            break;
        }
    }
    let trimmed = trimmed.trim_end_matches('/');
    if trimmed == "." {
        return String::new();
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provided_probes() {
        let fs = MemoryFileSystem::new().with_file("src/main.rs", "");
        assert!(fs.exists("src"));
        assert!(fs.is_dir("src"));
        assert!(!fs.is_file("src"));
        assert!(fs.is_file("src/main.rs"));
        assert!(!fs.exists("missing"));
    }

    fn read_through<F: FileSystem>(fs: F, path: &str) -> String {
        fs.read_to_string(path).unwrap()
    }

    #[test]
    fn reference_forwards() {
        let fs = MemoryFileSystem::new().with_file("a.txt", "hi");
        assert_eq!(read_through(&fs, "a.txt"), "hi");
    }

    #[test]
    fn normalize_paths() {
        assert_eq!(normalize_path("./src/main.rs"), "src/main.rs");
        assert_eq!(normalize_path("/docs/"), "docs");
        assert_eq!(normalize_path("src\\lib\\mod.rs"), "src/lib/mod.rs");
        assert_eq!(normalize_path("."), "");
        assert_eq!(normalize_path(""), "");
    }
}
