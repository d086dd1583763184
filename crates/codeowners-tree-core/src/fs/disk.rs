//! Disk-backed file system rooted at a repository checkout.

use super::{Entry, EntryKind, FileSystem};
use ignore::WalkBuilder;
use log::{debug, trace};
use std::io;
use std::path::{Path, PathBuf};

/// Configuration for directory listing behavior.
#[derive(Debug, Clone)]
pub struct ListingConfig {
    /// Whether to include hidden files and directories (starting with `.`).
    /// Default: true
    pub include_hidden: bool,
    /// Whether to respect `.gitignore` rules (only works in git repos).
    /// Default: true
    pub respect_gitignore: bool,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            include_hidden: true,
            respect_gitignore: true,
        }
    }
}

impl ListingConfig {
    /// Creates a new config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to include hidden files.
    pub fn with_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Sets whether to respect .gitignore rules.
    pub fn with_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }
}

/// A [`FileSystem`] over a directory on disk.
#[derive(Debug, Clone)]
pub struct DiskFileSystem {
    root: PathBuf,
    config: ListingConfig,
}

impl DiskFileSystem {
    /// Creates a file system rooted at `root` with default listing settings.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_config(root, ListingConfig::default())
    }

    /// Creates a file system rooted at `root` with the given listing settings.
    pub fn with_config(root: impl Into<PathBuf>, config: ListingConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Returns the repository root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the listing configuration.
    pub fn config(&self) -> &ListingConfig {
        &self.config
    }

    fn resolve(&self, path: &str) -> PathBuf {
        if path.is_empty() {
            self.root.clone()
        } else {
            self.root.join(path)
        }
    }

    fn relative(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        // Normalize to forward slashes
        relative.to_str().map(|s| s.replace('\\', "/"))
    }
}

impl FileSystem for DiskFileSystem {
    fn read_to_string(&self, path: &str) -> io::Result<String> {
        std::fs::read_to_string(self.resolve(path))
    }

    fn probe(&self, path: &str) -> io::Result<EntryKind> {
        match std::fs::metadata(self.resolve(path)) {
            Ok(meta) if meta.is_dir() => Ok(EntryKind::Directory),
            Ok(meta) if meta.is_file() => Ok(EntryKind::File),
            // Sockets, devices and the like are not ownable content.
            Ok(_) => Ok(EntryKind::Absent),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(EntryKind::Absent),
            Err(e) => Err(e),
        }
    }

    fn list_directory(&self, dir: &str, recursive: bool) -> io::Result<Vec<Entry>> {
        let start = self.resolve(dir);
        if !start.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("'{}' is not a directory", start.display()),
            ));
        }

        debug!(
            "Listing {:?} (recursive={}, hidden={}, gitignore={})",
            start, recursive, self.config.include_hidden, self.config.respect_gitignore
        );

        // Git metadata is never repository content, hidden files or not.
        let walker = WalkBuilder::new(&start)
            .max_depth(if recursive { None } else { Some(1) })
            .hidden(!self.config.include_hidden) // hidden(true) = skip hidden files
            .ignore(false) // Don't respect .ignore files (not a git standard)
            .git_ignore(self.config.respect_gitignore)
            .git_global(self.config.respect_gitignore)
            .git_exclude(self.config.respect_gitignore)
            .follow_links(false)
            .filter_entry(|entry| entry.file_name() != ".git")
            .build();

        let mut entries = Vec::new();
        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable entry under {:?}: {}", start, e);
                    continue;
                }
            };

            if entry.depth() == 0 {
                continue;
            }

            let kind = match entry.file_type() {
                Some(ft) if ft.is_file() => EntryKind::File,
                Some(ft) if ft.is_dir() => EntryKind::Directory,
                _ => continue,
            };

            if let Some(path) = self.relative(entry.path()) {
                entries.push(Entry { path, kind });
            }
        }

        entries.sort_by(|a, b| a.path.cmp(&b.path));
        debug!("Found {} entries", entries.len());
        trace!("Entries: {:?}", entries);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn setup_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();

        // Create visible files and dirs
        fs::create_dir_all(dir.path().join("src/nested")).unwrap();
        File::create(dir.path().join("src/main.rs")).unwrap();
        File::create(dir.path().join("src/nested/mod.rs")).unwrap();
        File::create(dir.path().join("visible.txt")).unwrap();

        // Create hidden files and dirs
        fs::create_dir_all(dir.path().join(".github")).unwrap();
        fs::write(dir.path().join(".github/CODEOWNERS"), "* @all\n").unwrap();
        File::create(dir.path().join(".hidden_file")).unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        File::create(dir.path().join(".git/HEAD")).unwrap();

        dir
    }

    fn paths(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.path.as_str()).collect()
    }

    #[test]
    fn probe_kinds() {
        let dir = setup_test_dir();
        let fs = DiskFileSystem::new(dir.path());
        assert_eq!(fs.probe("src").unwrap(), EntryKind::Directory);
        assert_eq!(fs.probe("src/main.rs").unwrap(), EntryKind::File);
        assert_eq!(fs.probe("nope").unwrap(), EntryKind::Absent);
        assert_eq!(fs.probe("").unwrap(), EntryKind::Directory);
    }

    #[test]
    fn read_rule_file() {
        let dir = setup_test_dir();
        let fs = DiskFileSystem::new(dir.path());
        assert_eq!(fs.read_to_string(".github/CODEOWNERS").unwrap(), "* @all\n");
        assert!(fs.read_to_string("missing").is_err());
    }

    #[test]
    fn single_level_listing() {
        let dir = setup_test_dir();
        let fs = DiskFileSystem::new(dir.path());
        let entries = fs.list_directory("src", false).unwrap();
        assert_eq!(paths(&entries), vec!["src/main.rs", "src/nested"]);
        assert_eq!(entries[1].kind, EntryKind::Directory);
    }

    #[test]
    fn recursive_listing() {
        let dir = setup_test_dir();
        let fs = DiskFileSystem::new(dir.path());
        let entries = fs.list_directory("src", true).unwrap();
        assert!(paths(&entries).contains(&"src/nested/mod.rs"));
        assert!(entries.iter().any(|e| e.path == "src/nested/mod.rs" && e.is_file()));
    }

    #[test]
    fn hidden_files_follow_config() {
        let dir = setup_test_dir();

        let fs = DiskFileSystem::new(dir.path());
        let all = fs.list_directory("", true).unwrap();
        assert!(paths(&all).contains(&".github/CODEOWNERS"));
        assert!(paths(&all).contains(&".hidden_file"));
        assert!(!all.iter().any(|e| e.path.starts_with(".git/") || e.path == ".git"));

        let fs = DiskFileSystem::with_config(dir.path(), ListingConfig::new().with_hidden(false));
        let visible = fs.list_directory("", true).unwrap();
        assert!(!visible.iter().any(|e| e.path.starts_with('.')));
        assert!(paths(&visible).contains(&"visible.txt"));
    }

    #[test]
    fn gitignore_follows_config() {
        let dir = setup_test_dir();
        fs::write(dir.path().join(".gitignore"), "*.log\nbuild/\n").unwrap();
        File::create(dir.path().join("debug.log")).unwrap();
        fs::create_dir_all(dir.path().join("build")).unwrap();
        File::create(dir.path().join("build/out.bin")).unwrap();

        let fs = DiskFileSystem::new(dir.path());
        let listed = fs.list_directory("", true).unwrap();
        assert!(!paths(&listed).contains(&"debug.log"));
        assert!(!paths(&listed).contains(&"build/out.bin"));
        assert!(paths(&listed).contains(&"visible.txt"));

        let fs = DiskFileSystem::with_config(dir.path(), ListingConfig::new().with_gitignore(false));
        let listed = fs.list_directory("", true).unwrap();
        assert!(paths(&listed).contains(&"debug.log"));
        assert!(paths(&listed).contains(&"build/out.bin"));
    }

    #[test]
    fn gitignore_requires_git_repo() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".gitignore"), "*.log\n").unwrap();
        File::create(dir.path().join("debug.log")).unwrap();

        let fs = DiskFileSystem::new(dir.path());
        let listed = fs.list_directory("", true).unwrap();
        assert!(paths(&listed).contains(&"debug.log"));
    }

    #[test]
    fn listing_missing_directory_fails() {
        let dir = setup_test_dir();
        let fs = DiskFileSystem::new(dir.path());
        assert!(fs.list_directory("nope", false).is_err());
        assert!(fs.list_directory("visible.txt", false).is_err());
    }

    #[test]
    fn config_builders() {
        let config = ListingConfig::new().with_hidden(false).with_gitignore(false);
        assert!(!config.include_hidden);
        assert!(!config.respect_gitignore);

        let defaults = ListingConfig::default();
        assert!(defaults.include_hidden);
        assert!(defaults.respect_gitignore);
    }
}
