//! Ownership resolution.
//!
//! Turns an ordered rule set into the per-owner [`OwnerIndex`] and answers
//! path-level "who owns this" questions. Precedence is decided by
//! [`Rank`]: higher specificity wins and, on equal specificity, the rule
//! declared later wins.
//!
//! # Example
//!
//! ```rust
//! use codeowners_tree_core::parse::parse_rules;
//! use codeowners_tree_core::resolve::Resolver;
//!
//! let rules = parse_rules("docs/ @writers\ndocs/api/ @api-team\n").rules;
//! let resolver = Resolver::new(rules);
//!
//! assert_eq!(resolver.most_specific_owner("docs/api/readme.md"), Some("@api-team"));
//! assert_eq!(resolver.most_specific_owner("docs/intro.md"), Some("@writers"));
//!
//! let writers = resolver.owner_index().get("@writers").unwrap();
//! assert_eq!(writers[0].pattern, "docs");
//! assert_eq!(writers[0].excluded, vec!["docs/api".to_string()]);
//! ```

use crate::matching::{Pattern, is_ancestor_or_equal};
use crate::parse::Rule;
use crate::rank::Rank;
use log::{debug, trace};
use serde::Serialize;
use std::collections::BTreeMap;

/// One pattern in an owner's effective list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectivePattern {
    /// The rule pattern.
    pub pattern: String,
    /// Rank of the strongest rule that assigned this pattern to the owner.
    pub rank: Rank,
    /// Patterns of higher-ranked, differently-owned rules nested inside this
    /// one. Paths under them belong to those rules' owners.
    pub excluded: Vec<String>,
}

/// Owner identifier to effective patterns, sorted by owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OwnerIndex {
    entries: BTreeMap<String, Vec<EffectivePattern>>,
}

impl OwnerIndex {
    /// Returns the owners in sorted order.
    pub fn owners(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns an owner's effective patterns in declaration order.
    pub fn get(&self, owner: &str) -> Option<&[EffectivePattern]> {
        self.entries.get(owner).map(Vec::as_slice)
    }

    /// Returns just the pattern strings for an owner; empty if unknown.
    pub fn patterns(&self, owner: &str) -> Vec<&str> {
        self.get(owner)
            .unwrap_or_default()
            .iter()
            .map(|entry| entry.pattern.as_str())
            .collect()
    }

    /// Iterates `(owner, patterns)` pairs in owner order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[EffectivePattern])> {
        self.entries
            .iter()
            .map(|(owner, patterns)| (owner.as_str(), patterns.as_slice()))
    }

    /// Returns true if `owner` has at least one pattern.
    pub fn contains_owner(&self, owner: &str) -> bool {
        self.entries.contains_key(owner)
    }

    /// Number of owners.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no rule has an owner.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolved view of a rule set.
#[derive(Debug, Clone)]
pub struct Resolver {
    rules: Vec<Rule>,
    /// Compiled matcher per rule; `None` if the pattern could not compile.
    compiled: Vec<Option<Pattern>>,
    /// Rule positions, strongest rank first.
    ranked: Vec<usize>,
    index: OwnerIndex,
}

impl Resolver {
    /// Resolves a rule set given in declaration order.
    pub fn new(rules: Vec<Rule>) -> Self {
        let compiled: Vec<Option<Pattern>> = rules
            .iter()
            .map(|rule| match Pattern::new(&rule.pattern) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    debug!("Rule on line {} never matches: {}", rule.line, e);
                    None
                }
            })
            .collect();

        let mut ranked: Vec<usize> = (0..rules.len()).collect();
        ranked.sort_by(|&a, &b| rules[b].rank().cmp(&rules[a].rank()));

        let mut resolver = Self {
            rules,
            compiled,
            ranked,
            index: OwnerIndex::default(),
        };
        resolver.index = resolver.build_index();
        debug!(
            "Resolved {} owners from {} rules",
            resolver.index.len(),
            resolver.rules.len()
        );
        resolver
    }

    /// Returns the rules in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Returns the per-owner effective patterns.
    pub fn owner_index(&self) -> &OwnerIndex {
        &self.index
    }

    /// Returns the highest-ranked literal rule naming `path` or one of its
    /// ancestors. Wildcard rules do not take part.
    pub fn most_specific_rule(&self, path: &str) -> Option<&Rule> {
        let path = trim_path(path);
        self.ranked_rules()
            .find(|rule| !rule.is_wildcard() && is_ancestor_or_equal(&rule.pattern, path))
    }

    /// Returns the first owner of [`most_specific_rule`](Self::most_specific_rule).
    pub fn most_specific_owner(&self, path: &str) -> Option<&str> {
        self.most_specific_rule(path)?.primary_owner()
    }

    /// Returns the highest-ranked rule of any kind whose pattern matches
    /// `path`.
    pub fn resolve_path(&self, path: &str) -> Option<&Rule> {
        let path = trim_path(path);
        self.ranked
            .iter()
            .find(|&&i| self.compiled[i].as_ref().is_some_and(|p| p.is_match(path)))
            .map(|&i| &self.rules[i])
    }

    fn ranked_rules(&self) -> impl Iterator<Item = &Rule> {
        self.ranked.iter().map(|&i| &self.rules[i])
    }

    fn build_index(&self) -> OwnerIndex {
        let mut entries: BTreeMap<String, Vec<EffectivePattern>> = BTreeMap::new();

        for rule in &self.rules {
            let rank = rule.rank();
            for owner in &rule.owners {
                let list = entries.entry(owner.clone()).or_default();
                match list.iter_mut().find(|e| e.pattern == rule.pattern) {
                    Some(existing) => existing.rank = existing.rank.max(rank),
                    None => list.push(EffectivePattern {
                        pattern: rule.pattern.clone(),
                        rank,
                        excluded: Vec::new(),
                    }),
                }
            }
        }

        for (owner, list) in entries.iter_mut() {
            for entry in list.iter_mut() {
                entry.excluded = self.exclusions(owner, entry);
                if !entry.excluded.is_empty() {
                    trace!(
                        "{} keeps '{}' minus {:?}",
                        owner, entry.pattern, entry.excluded
                    );
                }
            }
        }

        OwnerIndex { entries }
    }

    fn exclusions(&self, owner: &str, entry: &EffectivePattern) -> Vec<String> {
        let Ok(outer) = Pattern::new(&entry.pattern) else {
            return Vec::new();
        };

        let mut excluded: Vec<String> = Vec::new();
        for rule in self.ranked_rules() {
            if rule.rank() <= entry.rank {
                break;
            }
            if rule.is_owned_by(owner) || !outer.covers(&rule.pattern) {
                continue;
            }
            if !excluded.contains(&rule.pattern) {
                excluded.push(rule.pattern.clone());
            }
        }
        excluded
    }
}

/// Resolves `rules` straight to an [`OwnerIndex`].
pub fn resolve(rules: Vec<Rule>) -> OwnerIndex {
    Resolver::new(rules).index
}

fn trim_path(path: &str) -> &str {
    crate::matching::normalize(path)
}
