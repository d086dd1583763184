//! Output formatting for the CLI.
//!
//! This module provides human-readable and JSON output formatters for
//! command results.

use crate::cli::report::{Outcome, OwnerSummary, Report};
use codeowners_tree_core::{EffectivePattern, PathNode, PathTree, Rule};
use colored::Colorize;
use std::io::Write;

/// Writes an outcome as pretty-printed JSON.
pub fn write_json<W: Write>(outcome: &Outcome, writer: &mut W) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(outcome).map_err(std::io::Error::other)?;
    writeln!(writer, "{}", json)
}

/// Output formatter for human-readable console output.
pub struct HumanOutput<W: Write> {
    writer: W,
    use_colors: bool,
}

impl<W: Write> HumanOutput<W> {
    /// Creates a new human output formatter.
    pub fn new(writer: W, use_colors: bool) -> Self {
        Self { writer, use_colors }
    }

    /// Writes a full command outcome.
    pub fn write_outcome(&mut self, outcome: &Outcome) -> std::io::Result<()> {
        match &outcome.report {
            Report::Owners { owners } => {
                self.write_owners(owners)?;
                self.write_summary(
                    &format!("{} owner(s) in {}", owners.len(), outcome.rule_file),
                    outcome.matched,
                )
            }
            Report::Who { path, owner, rule } => {
                self.write_who(path, owner.as_deref(), rule.as_ref())
            }
            Report::Patterns { owner, patterns } => {
                if !outcome.matched {
                    return self.write_unknown_owner(owner, &outcome.rule_file);
                }
                self.write_patterns(patterns)
            }
            Report::Tree { owner, tree } => {
                if !outcome.matched {
                    return self.write_unknown_owner(owner, &outcome.rule_file);
                }
                self.write_tree(tree)?;
                let files = tree.owned_files().len();
                self.write_summary(&format!("{} file(s) owned by {}", files, owner), true)
            }
            Report::Include {
                owner, expression, ..
            } => {
                if !outcome.matched {
                    return self.write_unknown_owner(owner, &outcome.rule_file);
                }
                writeln!(self.writer, "{}", expression)
            }
        }
    }

    /// Writes one line per owner.
    pub fn write_owners(&mut self, owners: &[OwnerSummary]) -> std::io::Result<()> {
        let width = owners.iter().map(|o| o.owner.len()).max().unwrap_or(0);
        for summary in owners {
            let padded = format!("{:<width$}", summary.owner, width = width);
            let owner = if self.use_colors {
                padded.cyan().bold().to_string()
            } else {
                padded
            };
            write!(self.writer, "{}  {} pattern(s)", owner, summary.patterns)?;
            if summary.excluded > 0 {
                write!(self.writer, ", {} carved out", summary.excluded)?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }

    /// Writes the owner of a path and the rule that decides it.
    pub fn write_who(
        &mut self,
        path: &str,
        owner: Option<&str>,
        rule: Option<&Rule>,
    ) -> std::io::Result<()> {
        let resolved = rule.filter(|r| !r.owners.is_empty());
        match (owner, resolved) {
            (None, None) => {
                let message = format!("✗ {} has no owner", path);
                return self.write_summary(&message, false);
            }
            (Some(owner), _) => {
                writeln!(self.writer, "{}: {}", path, self.highlight(owner))?;
            }
            (None, Some(rule)) => {
                let owners = rule.owners.join(" ");
                writeln!(self.writer, "{}: {}", path, self.highlight(&owners))?;
            }
        }

        if let Some(rule) = rule {
            writeln!(self.writer, "  matched by line {}: {}", rule.line, rule)?;
        }
        Ok(())
    }

    /// Writes an owner's effective patterns with their exclusions.
    pub fn write_patterns(&mut self, patterns: &[EffectivePattern]) -> std::io::Result<()> {
        for entry in patterns {
            writeln!(self.writer, "{}", self.highlight(&entry.pattern))?;
            for excluded in &entry.excluded {
                writeln!(self.writer, "  except {}", excluded)?;
            }
        }
        Ok(())
    }

    /// Writes a tree with box-drawing connectors, directories first.
    pub fn write_tree(&mut self, tree: &PathTree) -> std::io::Result<()> {
        self.write_nodes(tree.roots(), "")
    }

    fn write_nodes(&mut self, nodes: &[PathNode], prefix: &str) -> std::io::Result<()> {
        for (i, node) in nodes.iter().enumerate() {
            let last = i + 1 == nodes.len();
            let connector = if last { "└── " } else { "├── " };
            writeln!(self.writer, "{}{}{}", prefix, connector, self.node_label(node))?;

            let child_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
            self.write_nodes(&node.children, &child_prefix)?;
        }
        Ok(())
    }

    fn node_label(&self, node: &PathNode) -> String {
        let name = if node.is_directory() {
            format!("{}/", node.label)
        } else {
            node.label.clone()
        };
        if !self.use_colors {
            return name;
        }
        match (node.is_directory(), node.is_directly_owned) {
            (true, true) => name.blue().bold().to_string(),
            (true, false) => name.dimmed().to_string(),
            (false, _) => name.green().to_string(),
        }
    }

    fn highlight(&self, text: &str) -> String {
        if self.use_colors {
            text.cyan().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn write_unknown_owner(&mut self, owner: &str, rule_file: &str) -> std::io::Result<()> {
        let message = format!("✗ {} has no rules in {}", owner, rule_file);
        self.write_summary(&message, false)
    }

    /// Writes a closing summary line.
    pub fn write_summary(&mut self, message: &str, ok: bool) -> std::io::Result<()> {
        writeln!(self.writer)?;
        match (self.use_colors, ok) {
            (true, true) => writeln!(self.writer, "{}", message.green().bold()),
            (true, false) => writeln!(self.writer, "{}", message.red().bold()),
            (false, _) => writeln!(self.writer, "{}", message),
        }
    }

    /// Writes a startup error.
    pub fn write_error(&mut self, message: &str) -> std::io::Result<()> {
        if self.use_colors {
            writeln!(self.writer, "{} {}", "Error:".red().bold(), message)?;
        } else {
            writeln!(self.writer, "Error: {}", message)?;
        }
        Ok(())
    }
}
