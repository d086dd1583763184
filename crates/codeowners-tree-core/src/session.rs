//! Refresh cycles over a rule file.
//!
//! A [`Session`] owns the file-system capability and nothing else. Each
//! [`refresh`](Session::refresh) reads the rule file again and returns a
//! new immutable [`Snapshot`]; nothing is cached between refreshes, so
//! snapshots from different threads or tests never interfere.

use crate::error::{OwnershipError, Result};
use crate::fs::{EntryKind, FileSystem, normalize_path};
use crate::parse::{ParseWarning, Rule, parse_rules};
use crate::resolve::{OwnerIndex, Resolver};
use crate::tree::{PathTree, TreeBuilder};
use crate::RULE_FILE_LOCATIONS;
use log::{debug, info};

/// Entry point for resolving ownership in one repository.
#[derive(Debug, Clone)]
pub struct Session<F: FileSystem> {
    fs: F,
    rule_file: Option<String>,
    root_name: String,
}

impl<F: FileSystem> Session<F> {
    /// Creates a session that searches the standard rule file locations.
    pub fn new(fs: F) -> Self {
        Self {
            fs,
            rule_file: None,
            root_name: ".".to_string(),
        }
    }

    /// Uses the given repository-relative rule file instead of searching.
    pub fn with_rule_file(mut self, path: impl AsRef<str>) -> Self {
        self.rule_file = Some(normalize_path(path.as_ref()));
        self
    }

    /// Sets the repository name used in error messages.
    pub fn with_root_name(mut self, name: impl Into<String>) -> Self {
        self.root_name = name.into();
        self
    }

    /// Returns the file-system capability.
    pub fn fs(&self) -> &F {
        &self.fs
    }

    /// Reads and resolves the rule file, building `owner`'s tree if given.
    ///
    /// # Errors
    ///
    /// [`OwnershipError::NotFound`] when no rule file exists and
    /// [`OwnershipError::Read`] when one exists but cannot be read.
    pub fn refresh(&self, owner: Option<&str>) -> Result<Snapshot> {
        let (rule_file, text) =
            read_rule_file(&self.fs, self.rule_file.as_deref(), &self.root_name)?;

        let parsed = parse_rules(&text);
        for warning in &parsed.warnings {
            debug!("{}: {}", rule_file, warning);
        }
        info!(
            "Loaded {} rules from {} ({} warnings)",
            parsed.rules.len(),
            rule_file,
            parsed.warnings.len()
        );

        let resolver = Resolver::new(parsed.rules);
        let tree = owner.map(|owner| TreeBuilder::new(&resolver, &self.fs).build(owner));

        Ok(Snapshot {
            rule_file,
            warnings: parsed.warnings,
            resolver,
            owner: owner.map(str::to_string),
            tree,
        })
    }

    /// Builds another owner's tree against an existing snapshot.
    pub fn build_tree(&self, snapshot: &Snapshot, owner: &str) -> PathTree {
        TreeBuilder::new(&snapshot.resolver, &self.fs).build(owner)
    }
}

/// Locates the rule file and reads it, returning its path and contents.
///
/// `explicit` replaces the standard candidates. A candidate that exists but
/// cannot be inspected is a read failure, not a miss.
pub(crate) fn read_rule_file<F: FileSystem>(
    fs: &F,
    explicit: Option<&str>,
    root_name: &str,
) -> Result<(String, String)> {
    let candidates: Vec<&str> = match explicit {
        Some(path) => vec![path],
        None => RULE_FILE_LOCATIONS.to_vec(),
    };

    for candidate in &candidates {
        match fs.probe(candidate) {
            Ok(EntryKind::File) => {
                debug!("Using rule file {}", candidate);
                let text = fs
                    .read_to_string(candidate)
                    .map_err(|e| OwnershipError::read(*candidate, e))?;
                return Ok((candidate.to_string(), text));
            }
            Ok(_) => continue,
            Err(e) => return Err(OwnershipError::read(*candidate, e)),
        }
    }
    Err(OwnershipError::not_found(root_name, &candidates))
}

/// The immutable result of one refresh.
#[derive(Debug, Clone)]
pub struct Snapshot {
    rule_file: String,
    warnings: Vec<ParseWarning>,
    resolver: Resolver,
    owner: Option<String>,
    tree: Option<PathTree>,
}

impl Snapshot {
    /// The rule file the snapshot was read from.
    pub fn rule_file(&self) -> &str {
        &self.rule_file
    }

    /// Soft anomalies found while parsing.
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    /// Parsed rules in declaration order.
    pub fn rules(&self) -> &[Rule] {
        self.resolver.rules()
    }

    /// The resolver built from [`rules`](Self::rules).
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Every owner's effective patterns.
    pub fn owner_index(&self) -> &OwnerIndex {
        self.resolver.owner_index()
    }

    /// See [`Resolver::most_specific_owner`].
    pub fn most_specific_owner(&self, path: &str) -> Option<&str> {
        self.resolver.most_specific_owner(path)
    }

    /// See [`Resolver::resolve_path`].
    pub fn resolve_path(&self, path: &str) -> Option<&Rule> {
        self.resolver.resolve_path(path)
    }

    /// The owner selected for this refresh.
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// The selected owner's tree.
    pub fn tree(&self) -> Option<&PathTree> {
        self.tree.as_ref()
    }
}
