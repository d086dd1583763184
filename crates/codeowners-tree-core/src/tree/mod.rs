//! Hierarchical view of the paths an owner controls.
//!
//! [`TreeBuilder`] expands an owner's effective patterns against the real
//! file tree, re-applies override exclusion to every concrete path and
//! folds the survivors into a sorted [`PathTree`].

use crate::fs::{EntryKind, FileSystem};
use crate::matching::Pattern;
use crate::resolve::Resolver;
use log::{debug, trace, warn};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

/// A node of an ownership tree.
///
/// A node is identified by its `full_path`; no tree holds two nodes with the
/// same one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathNode {
    /// The last path segment.
    pub label: String,
    /// Repository-relative path from the root to this node.
    pub full_path: String,
    /// True if this exact path is owned after override exclusion. False for
    /// ancestors that were only synthesized to hold their children.
    pub is_directly_owned: bool,
    /// True for files, false for directories.
    pub is_file: bool,
    /// Children, directories first and then by label.
    pub children: Vec<PathNode>,
}

impl PathNode {
    /// Returns true for directory nodes.
    pub fn is_directory(&self) -> bool {
        !self.is_file
    }
}

/// The root-level nodes of an ownership tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PathTree {
    roots: Vec<PathNode>,
}

impl PathTree {
    /// Returns the root-level nodes.
    pub fn roots(&self) -> &[PathNode] {
        &self.roots
    }

    /// Looks a node up by its full path.
    pub fn find(&self, full_path: &str) -> Option<&PathNode> {
        let mut level = self.roots.as_slice();
        let mut found = None;
        for segment in full_path.split('/').filter(|s| !s.is_empty()) {
            let node = level.iter().find(|node| node.label == segment)?;
            level = &node.children;
            found = Some(node);
        }
        found
    }

    /// Iterates every node depth-first, parents before children.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            stack: self.roots.iter().rev().collect(),
        }
    }

    /// Returns the full paths of all directly owned nodes, in tree order.
    pub fn owned_paths(&self) -> Vec<&str> {
        self.iter()
            .filter(|node| node.is_directly_owned)
            .map(|node| node.full_path.as_str())
            .collect()
    }

    /// Returns the full paths of all directly owned files, in tree order.
    pub fn owned_files(&self) -> Vec<&str> {
        self.iter()
            .filter(|node| node.is_directly_owned && node.is_file)
            .map(|node| node.full_path.as_str())
            .collect()
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns true if the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Depth-first iterator over a [`PathTree`].
pub struct Iter<'a> {
    stack: Vec<&'a PathNode>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a PathNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Builds ownership trees from a resolved rule set and a file system.
pub struct TreeBuilder<'a, F: FileSystem> {
    resolver: &'a Resolver,
    fs: &'a F,
}

impl<'a, F: FileSystem> TreeBuilder<'a, F> {
    /// Creates a builder over `resolver` and `fs`.
    pub fn new(resolver: &'a Resolver, fs: &'a F) -> Self {
        Self { resolver, fs }
    }

    /// Returns the concrete paths `owner` controls, sorted and unique.
    ///
    /// Wildcard patterns are expanded against a listing of their base
    /// directory, literal directories are flattened to the files beneath
    /// them, and every path whose winning rule does not list `owner` is
    /// dropped.
    pub fn owned_paths(&self, owner: &str) -> Vec<String> {
        let Some(entries) = self.resolver.owner_index().get(owner) else {
            debug!("No patterns for owner {}", owner);
            return Vec::new();
        };

        let mut working = BTreeSet::new();
        for entry in entries {
            let pattern = match Pattern::new(&entry.pattern) {
                Ok(pattern) => pattern,
                Err(e) => {
                    debug!("Skipping pattern '{}': {}", entry.pattern, e);
                    continue;
                }
            };
            if pattern.is_wildcard() {
                self.expand_wildcard(&pattern, &mut working);
            } else {
                self.expand_literal(pattern.as_str(), &mut working);
            }
        }
        debug!("{} candidate paths for {}", working.len(), owner);

        working
            .into_iter()
            .filter(|path| match self.resolver.resolve_path(path) {
                Some(rule) if !rule.is_owned_by(owner) => {
                    trace!("'{}' is overridden by line {}", path, rule.line);
                    false
                }
                _ => true,
            })
            .collect()
    }

    /// Builds the tree of paths `owner` controls.
    pub fn build(&self, owner: &str) -> PathTree {
        let mut arena = Arena::default();
        for path in self.owned_paths(owner) {
            match self.fs.probe(&path) {
                Ok(EntryKind::Absent) => debug!("Skipping '{}': no longer exists", path),
                Ok(kind) => arena.insert(&path, kind == EntryKind::File),
                Err(e) => warn!("Skipping '{}': {}", path, e),
            }
        }
        let tree = arena.finish();
        debug!("Built tree for {} with {} roots", owner, tree.roots.len());
        tree
    }

    fn expand_wildcard(&self, pattern: &Pattern, working: &mut BTreeSet<String>) {
        let base = pattern.base_dir();
        match self.fs.list_directory(base, pattern.is_recursive()) {
            Ok(listing) => {
                working.extend(
                    listing
                        .into_iter()
                        .filter(|entry| pattern.is_match(&entry.path))
                        .map(|entry| entry.path),
                );
                if !base.is_empty() {
                    working.insert(base.to_string());
                }
            }
            Err(e) => debug!("Cannot expand '{}': {}", pattern.as_str(), e),
        }
    }

    fn expand_literal(&self, pattern: &str, working: &mut BTreeSet<String>) {
        working.insert(pattern.to_string());
        if !matches!(self.fs.probe(pattern), Ok(EntryKind::Directory)) {
            return;
        }
        match self.fs.list_directory(pattern, true) {
            Ok(listing) => working.extend(
                listing
                    .into_iter()
                    .filter(|entry| entry.is_file())
                    .map(|entry| entry.path),
            ),
            Err(e) => debug!("Cannot list '{}': {}", pattern, e),
        }
    }
}

#[derive(Default)]
struct Arena {
    nodes: Vec<Draft>,
    lookup: HashMap<String, usize>,
    roots: Vec<usize>,
}

struct Draft {
    label: String,
    full_path: String,
    is_directly_owned: bool,
    is_file: bool,
    children: Vec<usize>,
}

impl Arena {
    fn insert(&mut self, path: &str, is_file: bool) {
        let mut parent: Option<usize> = None;
        let mut prefix = String::new();

        for segment in path.split('/').filter(|s| !s.is_empty()) {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(segment);

            let id = match self.lookup.get(&prefix) {
                Some(&id) => id,
                None => {
                    let id = self.nodes.len();
                    self.nodes.push(Draft {
                        label: segment.to_string(),
                        full_path: prefix.clone(),
                        is_directly_owned: false,
                        is_file: false,
                        children: Vec::new(),
                    });
                    self.lookup.insert(prefix.clone(), id);
                    match parent {
                        Some(p) => self.nodes[p].children.push(id),
                        None => self.roots.push(id),
                    }
                    id
                }
            };
            parent = Some(id);
        }

        if let Some(id) = parent {
            let node = &mut self.nodes[id];
            node.is_directly_owned = true;
            node.is_file = is_file;
        }
    }

    fn finish(self) -> PathTree {
        let roots = self.materialize(&self.roots);
        PathTree { roots }
    }

    fn materialize(&self, ids: &[usize]) -> Vec<PathNode> {
        let mut nodes: Vec<PathNode> = ids
            .iter()
            .map(|&id| {
                let draft = &self.nodes[id];
                PathNode {
                    label: draft.label.clone(),
                    full_path: draft.full_path.clone(),
                    is_directly_owned: draft.is_directly_owned,
                    is_file: draft.is_file,
                    children: self.materialize(&draft.children),
                }
            })
            .collect();
        nodes.sort_by(compare_siblings);
        nodes
    }
}

/// Directories first, then case-insensitive label, then raw label.
fn compare_siblings(a: &PathNode, b: &PathNode) -> Ordering {
    a.is_file
        .cmp(&b.is_file)
        .then_with(|| a.label.to_lowercase().cmp(&b.label.to_lowercase()))
        .then_with(|| a.label.cmp(&b.label))
}
