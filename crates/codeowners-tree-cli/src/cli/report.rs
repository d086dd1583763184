//! Runs a command against a fresh snapshot.
//!
//! The result is plain owned data so it can leave the blocking task that
//! computed it and be rendered on the async side.

use crate::cli::Command;
use codeowners_tree_core::{
    EffectivePattern, FileSystem, OwnershipError, ParseWarning, PathTree, Rule, Session,
    format_as_include_pattern_with_threshold,
};
use serde::Serialize;
use tracing::debug;

/// One owner's line in the `owners` listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerSummary {
    pub owner: String,
    pub patterns: usize,
    pub excluded: usize,
}

/// What a command produced.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum Report {
    Owners {
        owners: Vec<OwnerSummary>,
    },
    Who {
        path: String,
        /// First owner of the closest literal rule.
        owner: Option<String>,
        /// The rule that wins for the path, wildcards included.
        rule: Option<Rule>,
    },
    Patterns {
        owner: String,
        patterns: Vec<EffectivePattern>,
    },
    Tree {
        owner: String,
        tree: PathTree,
    },
    Include {
        owner: String,
        files: usize,
        expression: String,
    },
}

/// A report plus the context it was computed in.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub rule_file: String,
    pub warnings: Vec<ParseWarning>,
    /// False when the path has no owner or the owner has no rules.
    #[serde(rename = "match")]
    pub matched: bool,
    #[serde(flatten)]
    pub report: Report,
}

impl Outcome {
    /// Refreshes `session` and runs `command` against the snapshot.
    pub fn collect<F: FileSystem>(
        session: &Session<F>,
        command: &Command,
    ) -> Result<Self, OwnershipError> {
        let tree_owner = command.owner().filter(|_| command.needs_tree());
        let snapshot = session.refresh(tree_owner)?;
        let index = snapshot.owner_index();
        let known_owner = command.owner().is_some_and(|o| index.contains_owner(o));

        let (report, matched) = match command {
            Command::Owners => {
                let owners = index
                    .iter()
                    .map(|(owner, patterns)| OwnerSummary {
                        owner: owner.to_string(),
                        patterns: patterns.len(),
                        excluded: patterns.iter().map(|p| p.excluded.len()).sum(),
                    })
                    .collect::<Vec<_>>();
                let matched = !owners.is_empty();
                (Report::Owners { owners }, matched)
            }
            Command::Who { path } => {
                let owner = snapshot.most_specific_owner(path).map(str::to_string);
                let rule = snapshot.resolve_path(path).cloned();
                let matched =
                    owner.is_some() || rule.as_ref().is_some_and(|r| !r.owners.is_empty());
                (
                    Report::Who {
                        path: path.clone(),
                        owner,
                        rule,
                    },
                    matched,
                )
            }
            Command::Patterns { owner } => (
                Report::Patterns {
                    owner: owner.clone(),
                    patterns: index.get(owner).unwrap_or_default().to_vec(),
                },
                known_owner,
            ),
            Command::Tree { owner } => (
                Report::Tree {
                    owner: owner.clone(),
                    tree: snapshot.tree().cloned().unwrap_or_default(),
                },
                known_owner,
            ),
            Command::Include { owner, threshold } => {
                let files = snapshot
                    .tree()
                    .map(|tree| tree.owned_files())
                    .unwrap_or_default();
                let expression =
                    format_as_include_pattern_with_threshold(files.as_slice(), *threshold);
                (
                    Report::Include {
                        owner: owner.clone(),
                        files: files.len(),
                        expression,
                    },
                    known_owner,
                )
            }
        };
        debug!("Command finished (match={})", matched);

        Ok(Self {
            rule_file: snapshot.rule_file().to_string(),
            warnings: snapshot.warnings().to_vec(),
            matched,
            report,
        })
    }
}
