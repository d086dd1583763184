//! CLI module for the CODEOWNERS tree explorer.
//!
//! Command-line argument parsing using Clap. Every global option can also be
//! set through an environment variable.

pub mod config;
pub mod output;
pub mod report;

use clap::{Parser, Subcommand};
use codeowners_tree_core::include::DEFAULT_COLLAPSE_THRESHOLD;
use std::path::PathBuf;

/// CODEOWNERS tree explorer - shows who owns what in a repository.
///
/// Resolves a CODEOWNERS file with "most specific rule wins" precedence and
/// shows the result per path or per owner. Supports both human-readable and
/// JSON output formats.
#[derive(Parser, Debug)]
#[command(name = "codeowners-tree")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the repository root.
    #[arg(long, env = "REPOSITORY_PATH", default_value = ".", global = true)]
    pub repository_path: PathBuf,

    /// Path to the CODEOWNERS file, relative to the repository root.
    /// Searched in .github/, the root and docs/ when not given.
    #[arg(long, env = "CODEOWNERS_PATH", global = true)]
    pub codeowners_path: Option<PathBuf>,

    /// Include hidden files and directories when expanding patterns.
    #[arg(
        long,
        env = "INCLUDE_HIDDEN",
        default_value_t = true,
        action = clap::ArgAction::Set,
        global = true
    )]
    pub include_hidden: bool,

    /// Skip files ignored by .gitignore when expanding patterns.
    #[arg(
        long,
        env = "RESPECT_GITIGNORE",
        default_value_t = true,
        action = clap::ArgAction::Set,
        global = true
    )]
    pub respect_gitignore: bool,

    /// Give up after this many seconds.
    #[arg(long, env = "OWNERSHIP_TIMEOUT_SECS", global = true)]
    pub timeout: Option<u64>,

    /// Output results as JSON instead of human-readable format.
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Increase verbosity level (-v for info, -vv for debug, -vvv for trace).
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// What to show.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List every owner with the number of patterns it owns.
    Owners,
    /// Show who owns a path.
    Who {
        /// Repository-relative path to look up.
        path: String,
    },
    /// Print an owner's effective patterns and what is carved out of them.
    Patterns {
        /// Owner identifier, e.g. @org/team.
        owner: String,
    },
    /// Render the tree of paths an owner controls.
    Tree {
        /// Owner identifier, e.g. @org/team.
        owner: String,
    },
    /// Print a compact include expression for the files an owner controls.
    Include {
        /// Owner identifier, e.g. @org/team.
        owner: String,

        /// Collapse a directory into `dir/**` above this many files.
        #[arg(long, default_value_t = DEFAULT_COLLAPSE_THRESHOLD)]
        threshold: usize,
    },
}

impl Command {
    /// Returns the owner the command is about, if any.
    pub fn owner(&self) -> Option<&str> {
        match self {
            Self::Owners | Self::Who { .. } => None,
            Self::Patterns { owner } | Self::Tree { owner } | Self::Include { owner, .. } => {
                Some(owner.as_str())
            }
        }
    }

    /// Returns true if the command needs the owner's expanded tree.
    pub fn needs_tree(&self) -> bool {
        matches!(self, Self::Tree { .. } | Self::Include { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owners_command() {
        let args = Args::parse_from(["codeowners-tree", "owners"]);
        assert_eq!(args.command, Command::Owners);
        assert_eq!(args.command.owner(), None);
    }

    #[test]
    fn test_who_command() {
        let args = Args::parse_from(["codeowners-tree", "who", "src/main.rs"]);
        assert_eq!(
            args.command,
            Command::Who {
                path: "src/main.rs".to_string()
            }
        );
        assert!(!args.command.needs_tree());
    }

    #[test]
    fn test_owner_commands() {
        let args = Args::parse_from(["codeowners-tree", "tree", "@org/team"]);
        assert_eq!(args.command.owner(), Some("@org/team"));
        assert!(args.command.needs_tree());

        let args = Args::parse_from(["codeowners-tree", "patterns", "@org/team"]);
        assert!(!args.command.needs_tree());
    }

    #[test]
    fn test_include_threshold() {
        let args = Args::parse_from(["codeowners-tree", "include", "@a"]);
        assert_eq!(
            args.command,
            Command::Include {
                owner: "@a".to_string(),
                threshold: DEFAULT_COLLAPSE_THRESHOLD
            }
        );

        let args = Args::parse_from(["codeowners-tree", "include", "@a", "--threshold", "10"]);
        assert!(matches!(args.command, Command::Include { threshold: 10, .. }));
    }

    #[test]
    fn test_listing_flags() {
        let args = Args::parse_from(["codeowners-tree", "owners"]);
        assert!(args.include_hidden);
        assert!(args.respect_gitignore);

        let args = Args::parse_from([
            "codeowners-tree",
            "--include-hidden",
            "false",
            "--respect-gitignore",
            "false",
            "owners",
        ]);
        assert!(!args.include_hidden);
        assert!(!args.respect_gitignore);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::parse_from(["codeowners-tree", "owners", "--json", "-vv"]);
        assert!(args.json);
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_json_output_flag() {
        let args = Args::parse_from(["codeowners-tree", "-j", "owners"]);
        assert!(args.json);
    }

    #[test]
    fn test_verbose_flag() {
        let args = Args::parse_from(["codeowners-tree", "owners"]);
        assert_eq!(args.verbose, 0);

        let args = Args::parse_from(["codeowners-tree", "-v", "owners"]);
        assert_eq!(args.verbose, 1);
    }

    #[test]
    fn test_default_paths() {
        let args = Args::parse_from(["codeowners-tree", "owners"]);
        assert_eq!(args.repository_path, PathBuf::from("."));
        assert!(args.codeowners_path.is_none());
        assert!(args.timeout.is_none());
    }

    #[test]
    fn test_missing_subcommand_is_an_error() {
        assert!(Args::try_parse_from(["codeowners-tree"]).is_err());
    }
}
