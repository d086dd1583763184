//! Errors surfaced when loading a rule file.

use std::io;
use thiserror::Error;

/// Failures that stop a refresh.
///
/// Everything else (malformed lines, unreadable entries while building a
/// tree) is soft and reported through warnings or logs.
#[derive(Debug, Error)]
pub enum OwnershipError {
    /// No rule file exists at any candidate location.
    #[error("no CODEOWNERS file found under '{root}' (searched: {searched})")]
    NotFound { root: String, searched: String },

    /// A rule file exists but could not be read.
    #[error("failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl OwnershipError {
    /// Creates a not-found error listing the searched locations.
    pub fn not_found(root: impl Into<String>, searched: &[&str]) -> Self {
        Self::NotFound {
            root: root.into(),
            searched: searched.join(", "),
        }
    }

    /// Creates a read error.
    pub fn read(path: impl Into<String>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for rule-file loading.
pub type Result<T> = std::result::Result<T, OwnershipError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_lists_candidates() {
        let err = OwnershipError::not_found(".", &[".github/CODEOWNERS", "CODEOWNERS"]);
        assert_eq!(
            err.to_string(),
            "no CODEOWNERS file found under '.' (searched: .github/CODEOWNERS, CODEOWNERS)"
        );
    }

    #[test]
    fn read_keeps_source() {
        let err = OwnershipError::read(
            "CODEOWNERS",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().starts_with("failed to read 'CODEOWNERS'"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
