//! Configuration handling for the CLI.
//!
//! This module converts CLI arguments into a validated configuration and
//! the library's session types.

use crate::cli::{Args, Command};
use codeowners_tree_core::{DiskFileSystem, ListingConfig, Session};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Application exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// The command ran and found what it was asked for.
    Success = 0,
    /// Application startup failed (bad configuration, missing or unreadable
    /// CODEOWNERS file).
    StartupFailure = 1,
    /// Application terminated by signal (SIGINT/SIGTERM).
    Terminated = 2,
    /// The path has no owner, or the owner has no rules.
    NoMatch = 3,
    /// The timeout elapsed before the command finished.
    TimedOut = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl From<ExitCode> for u8 {
    fn from(code: ExitCode) -> Self {
        code as u8
    }
}

/// Validated and processed configuration for one run.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Path to the repository root.
    pub repo_path: PathBuf,
    /// Repository-relative CODEOWNERS location, if given explicitly.
    pub codeowners_path: Option<String>,
    /// How directories are listed while expanding patterns.
    pub listing: ListingConfig,
    /// Upper bound for the whole run.
    pub timeout: Option<Duration>,
    /// Whether to output JSON.
    pub json_output: bool,
    /// The command to run, with owner identifiers normalized.
    pub command: Command,
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments.
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let repo_path = args.repository_path.canonicalize().map_err(|e| {
            ConfigError::Invalid(format!(
                "repository path '{}' is invalid: {}",
                args.repository_path.display(),
                e
            ))
        })?;
        if !repo_path.is_dir() {
            return Err(ConfigError::Invalid(format!(
                "repository path '{}' is not a directory",
                repo_path.display()
            )));
        }

        let codeowners_path = args
            .codeowners_path
            .as_deref()
            .map(|path| repo_relative(&repo_path, path))
            .transpose()?;

        let timeout = match args.timeout {
            Some(0) => {
                return Err(ConfigError::Invalid(
                    "OWNERSHIP_TIMEOUT_SECS must be greater than zero".to_string(),
                ));
            }
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        let listing = ListingConfig::new()
            .with_hidden(args.include_hidden)
            .with_gitignore(args.respect_gitignore);

        Ok(Self {
            repo_path,
            codeowners_path,
            listing,
            timeout,
            json_output: args.json,
            command: normalize_command(args.command.clone()),
        })
    }

    /// Creates a disk-backed session for the configured repository.
    pub fn session(&self) -> Session<DiskFileSystem> {
        let fs = DiskFileSystem::with_config(&self.repo_path, self.listing.clone());
        let session = Session::new(fs).with_root_name(self.repo_path.display().to_string());
        match &self.codeowners_path {
            Some(path) => session.with_rule_file(path),
            None => session,
        }
    }
}

/// Converts a CODEOWNERS path into a repository-relative, `/`-separated one.
fn repo_relative(repo_path: &Path, path: &Path) -> Result<String, ConfigError> {
    let relative = if path.is_absolute() {
        let absolute = path.canonicalize().map_err(|e| {
            ConfigError::Invalid(format!(
                "CODEOWNERS path '{}' is invalid: {}",
                path.display(),
                e
            ))
        })?;
        absolute
            .strip_prefix(repo_path)
            .map(Path::to_path_buf)
            .map_err(|_| {
                ConfigError::Invalid(format!(
                    "CODEOWNERS path '{}' is outside the repository '{}'",
                    path.display(),
                    repo_path.display()
                ))
            })?
    } else {
        path.to_path_buf()
    };

    relative
        .to_str()
        .map(|s| s.replace('\\', "/"))
        .ok_or_else(|| {
            ConfigError::Invalid(format!(
                "CODEOWNERS path '{}' is not valid UTF-8",
                relative.display()
            ))
        })
}

/// Owners are written with a leading `@`; accept them without one too.
fn normalize_owner(owner: String) -> String {
    if owner.starts_with('@') {
        owner
    } else {
        format!("@{}", owner)
    }
}

fn normalize_command(command: Command) -> Command {
    match command {
        Command::Patterns { owner } => Command::Patterns {
            owner: normalize_owner(owner),
        },
        Command::Tree { owner } => Command::Tree {
            owner: normalize_owner(owner),
        },
        Command::Include { owner, threshold } => Command::Include {
            owner: normalize_owner(owner),
            threshold,
        },
        other => other,
    }
}
