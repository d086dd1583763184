//! CODEOWNERS Tree Core
//!
//! A library for resolving CODEOWNERS rules into per-owner ownership.
//!
//! # Features
//!
//! - **Parser**: Best-effort tokenization of CODEOWNERS files into ordered rules
//! - **Precedence**: The most specific rule wins; later rules win ties
//! - **Resolution**: Per-owner effective patterns with override exclusion
//! - **Trees**: An owner's patterns expanded against the real file tree
//! - **Include expressions**: Compact `dir/**` summaries for search tools
//!
//! # Quick Start
//!
//! ```rust
//! use codeowners_tree_core::fs::MemoryFileSystem;
//! use codeowners_tree_core::Session;
//!
//! let fs = MemoryFileSystem::new()
//!     .with_file(".github/CODEOWNERS", "*.ts @ts-owners\nsrc/legacy/ @legacy\n")
//!     .with_files(["src/a.ts", "src/b.js", "src/legacy/old.ts"]);
//!
//! let snapshot = Session::new(fs).refresh(Some("@ts-owners")).unwrap();
//!
//! for (owner, patterns) in snapshot.owner_index().iter() {
//!     println!("{} owns {} patterns", owner, patterns.len());
//! }
//!
//! let tree = snapshot.tree().unwrap();
//! assert_eq!(tree.owned_files(), vec!["src/a.ts"]);
//! ```
//!
//! # Modules
//!
//! - [`parse`]: Parser for CODEOWNERS files
//! - [`rank`]: Specificity scoring and rule precedence
//! - [`matching`]: Pattern matching for CODEOWNERS files
//! - [`resolve`]: Owner index and path lookups
//! - [`tree`]: Ownership trees
//! - [`include`]: Include-expression formatting
//! - [`fs`]: File-system capability and implementations
//! - [`session`]: Refresh cycles producing immutable snapshots

pub mod error;
pub mod fs;
pub mod include;
pub mod matching;
pub mod parse;
pub mod rank;
pub mod resolve;
pub mod session;
pub mod tree;

// Re-export commonly used types at the crate root
pub use error::{OwnershipError, Result};
pub use fs::{DiskFileSystem, FileSystem, ListingConfig, MemoryFileSystem};
pub use include::{format_as_include_pattern, format_as_include_pattern_with_threshold};
pub use parse::{ParseResult, ParseWarning, Rule, parse_rules};
pub use resolve::{EffectivePattern, OwnerIndex, Resolver, resolve};
pub use session::{Session, Snapshot};
pub use tree::{PathNode, PathTree, TreeBuilder};

/// Rule file locations searched, in order; the first file found wins.
pub const RULE_FILE_LOCATIONS: [&str; 3] = [".github/CODEOWNERS", "CODEOWNERS", "docs/CODEOWNERS"];

/// Finds the CODEOWNERS file in a repository.
///
/// Searches [`RULE_FILE_LOCATIONS`] in order and returns the first one that
/// is a file, or `None`.
///
/// # Example
///
/// ```no_run
/// use codeowners_tree_core::{DiskFileSystem, find_codeowners_file};
///
/// let fs = DiskFileSystem::new("/path/to/repo");
/// if let Some(codeowners_path) = find_codeowners_file(&fs) {
///     println!("Found CODEOWNERS at: {}", codeowners_path);
/// } else {
///     eprintln!("CODEOWNERS file not found");
/// }
/// ```
pub fn find_codeowners_file<F: FileSystem>(fs: &F) -> Option<&'static str> {
    RULE_FILE_LOCATIONS.into_iter().find(|path| fs.is_file(path))
}

/// Locates the rule file and parses it without building a resolver.
///
/// Returns the path of the file that was read along with the parsed rules.
///
/// # Errors
///
/// [`OwnershipError::NotFound`] when no candidate exists and
/// [`OwnershipError::Read`] when the located file cannot be read.
pub fn load_rules<F: FileSystem>(fs: &F) -> Result<(String, ParseResult)> {
    let (path, text) = session::read_rule_file(fs, None, ".")?;
    Ok((path, parse_rules(&text)))
}
