//! Status resolver: maps one graph node to an outcome.
//!
//! Tiers are tried in order and the first hit wins:
//!
//! ```text
//! for path in [relative_path, full_path]:
//!     1. ExactLine   (name, path, start_line)
//!     2. ExactPath   (name, path)
//!     3. FuzzyPath   same name, one path contains the other, line-aware
//! 4. name only       UniqueName | UnanimousName | ambiguous -> None
//! ```
//!
//! The resolver never guesses: several same-named records that disagree on
//! the outcome leave the node unresolved.

use serde::Serialize;

use crate::types::{GraphNode, Outcome};
use super::index::{EntryKey, IdentityIndex};
use super::path::{normalize, overlaps};

/// Resolver tier that produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// (name, path, line) hit
    ExactLine,
    /// (name, path) hit
    ExactPath,
    /// Substring path overlap under the same name
    FuzzyPath,
    /// Exactly one report record carries the name
    UniqueName,
    /// Several records carry the name and all agree
    UnanimousName,
}

impl MatchStrategy {
    pub const ALL: [MatchStrategy; 5] = [
        MatchStrategy::ExactLine,
        MatchStrategy::ExactPath,
        MatchStrategy::FuzzyPath,
        MatchStrategy::UniqueName,
        MatchStrategy::UnanimousName,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MatchStrategy::ExactLine => "exact_line",
            MatchStrategy::ExactPath => "exact_path",
            MatchStrategy::FuzzyPath => "fuzzy_path",
            MatchStrategy::UniqueName => "unique_name",
            MatchStrategy::UnanimousName => "unanimous_name",
        }
    }

    /// Whether the decision used location information at all.
    pub fn is_path_based(self) -> bool {
        matches!(
            self,
            MatchStrategy::ExactLine | MatchStrategy::ExactPath | MatchStrategy::FuzzyPath
        )
    }
}

/// A resolved status together with the tier that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub outcome: Outcome,
    pub strategy: MatchStrategy,
}

impl Resolution {
    fn new(outcome: Outcome, strategy: MatchStrategy) -> Self {
        Self { outcome, strategy }
    }
}

/// Read-only query front end over an `IdentityIndex`.
#[derive(Debug, Clone, Copy)]
pub struct StatusResolver<'a> {
    index: &'a IdentityIndex,
}

impl<'a> StatusResolver<'a> {
    pub fn new(index: &'a IdentityIndex) -> Self {
        Self { index }
    }

    /// Outcome for a node, or `None` when it cannot be matched unambiguously.
    pub fn resolve(&self, node: &GraphNode) -> Option<Outcome> {
        self.explain(node).map(|r| r.outcome)
    }

    /// Like `resolve`, but also reports which tier decided.
    pub fn explain(&self, node: &GraphNode) -> Option<Resolution> {
        node.candidate_paths()
            .find_map(|path| self.match_location(node, &normalize(path)))
            .or_else(|| self.match_name(&node.display_name))
    }

    fn match_location(&self, node: &GraphNode, path: &str) -> Option<Resolution> {
        let name: &str = &node.display_name;

        if let Some(line) = node.start_line {
            if let Some(outcome) = self.index.lookup_line(name, path, line) {
                return Some(Resolution::new(outcome, MatchStrategy::ExactLine));
            }
        }

        if let Some(outcome) = self.index.lookup_path(name, path) {
            return Some(Resolution::new(outcome, MatchStrategy::ExactPath));
        }

        // A line entry that disagrees with the node only rules out that
        // entry, scanning continues.
        self.index
            .entries_named(name)
            .iter()
            .filter(|entry| overlaps(&entry.path, path))
            .find(|entry| match entry.key {
                EntryKey::Path => true,
                EntryKey::Line(Some(line)) => node.start_line == Some(line),
                EntryKey::Line(None) => false,
            })
            .map(|entry| Resolution::new(entry.outcome, MatchStrategy::FuzzyPath))
    }

    fn match_name(&self, name: &str) -> Option<Resolution> {
        let records = self.index.records_named(name);
        let (first, rest) = records.split_first()?;

        if rest.is_empty() {
            return Some(Resolution::new(first.outcome, MatchStrategy::UniqueName));
        }
        if rest.iter().all(|r| r.outcome == first.outcome) {
            return Some(Resolution::new(first.outcome, MatchStrategy::UnanimousName));
        }
        None
    }
}

/// Resolve a single node against an index.
pub fn resolve(node: &GraphNode, index: &IdentityIndex) -> Option<Outcome> {
    StatusResolver::new(index).resolve(node)
}
