//! Identity index: lookup tables built once from the verification report.
//!
//! Three key shapes at decreasing specificity:
//!
//! ```text
//! (name, path, line)  -> outcome     last writer wins
//! (name, path)        -> outcome     first writer wins, in category order
//!  name               -> [records]   every record kept, duplicates included
//! ```
//!
//! The first two shapes together form the "exact" table. Its entries are kept
//! in insertion order because the fuzzy resolver tier accepts the first
//! matching entry. Entries are grouped by name so that tier only ever scans
//! same-named candidates.

use std::collections::HashMap;

use crate::report::VerificationReport;
use crate::types::{FunctionRecord, Outcome};
use super::path::normalize;

/// Key shape of an exact-table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKey {
    /// (name, path, line) entry. The line may be absent when the report had none.
    Line(Option<u32>),
    /// (name, path) entry, no line component.
    Path,
}

/// One entry of the exact table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactEntry {
    pub path: String,
    pub key: EntryKey,
    pub outcome: Outcome,
}

/// One record in the name-only table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRecord {
    pub path: String,
    pub outcome: Outcome,
    pub lines_start: Option<u32>,
    pub lines_end: Option<u32>,
}

/// Exact-table slots for one normalized path under one name.
#[derive(Debug, Default)]
struct Location {
    pair: Option<usize>,
    lines: HashMap<Option<u32>, usize>,
}

/// Everything indexed under one display name.
#[derive(Debug, Default)]
struct NameSlot {
    /// Exact entries in insertion order
    entries: Vec<ExactEntry>,
    /// path -> positions in `entries`
    locations: HashMap<String, Location>,
    /// Name-only records in report order
    records: Vec<NameRecord>,
}

impl NameSlot {
    fn insert(&mut self, record: &FunctionRecord) {
        let path = normalize(&record.code_path);
        let location = self.locations.entry(path.clone()).or_default();

        match location.lines.get(&record.lines_start) {
            Some(&pos) => self.entries[pos].outcome = record.outcome,
            None => {
                location.lines.insert(record.lines_start, self.entries.len());
                self.entries.push(ExactEntry {
                    path: path.clone(),
                    key: EntryKey::Line(record.lines_start),
                    outcome: record.outcome,
                });
            }
        }

        if location.pair.is_none() {
            location.pair = Some(self.entries.len());
            self.entries.push(ExactEntry {
                path: path.clone(),
                key: EntryKey::Path,
                outcome: record.outcome,
            });
        }

        self.records.push(NameRecord {
            path,
            outcome: record.outcome,
            lines_start: record.lines_start,
            lines_end: record.lines_end,
        });
    }
}

/// Read-only lookup structures over a verification report.
#[derive(Debug, Default)]
pub struct IdentityIndex {
    names: HashMap<String, NameSlot>,
    record_count: usize,
}

impl IdentityIndex {
    /// Build the index. Records are inserted category by category in
    /// `Outcome::CATEGORY_ORDER`, keeping report order within a category.
    pub fn build(report: &VerificationReport) -> Self {
        let mut index = Self::default();

        for outcome in Outcome::CATEGORY_ORDER {
            for record in report.records().iter().filter(|r| r.outcome == outcome) {
                index.insert(record);
            }
        }

        index
    }

    fn insert(&mut self, record: &FunctionRecord) {
        self.names
            .entry(record.display_name.clone())
            .or_default()
            .insert(record);
        self.record_count += 1;
    }

    /// (name, path, line) lookup. `path` must already be normalized.
    pub fn lookup_line(&self, name: &str, path: &str, line: u32) -> Option<Outcome> {
        let slot = self.names.get(name)?;
        let pos = slot.locations.get(path)?.lines.get(&Some(line))?;
        Some(slot.entries[*pos].outcome)
    }

    /// (name, path) lookup. `path` must already be normalized.
    pub fn lookup_path(&self, name: &str, path: &str) -> Option<Outcome> {
        let slot = self.names.get(name)?;
        let pos = slot.locations.get(path)?.pair?;
        Some(slot.entries[pos].outcome)
    }

    /// Exact entries for a name, in insertion order.
    pub fn entries_named(&self, name: &str) -> &[ExactEntry] {
        self.names.get(name).map(|s| s.entries.as_slice()).unwrap_or_default()
    }

    /// Every report record with this name, duplicates included.
    pub fn records_named(&self, name: &str) -> &[NameRecord] {
        self.names.get(name).map(|s| s.records.as_slice()).unwrap_or_default()
    }

    /// Total entries in the exact table (both key shapes).
    pub fn exact_len(&self) -> usize {
        self.names.values().map(|s| s.entries.len()).sum()
    }

    /// Number of distinct display names.
    pub fn name_count(&self) -> usize {
        self.names.len()
    }

    /// Number of records indexed by name.
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// One-line summary for verbose output.
    pub fn summary(&self) -> String {
        format!(
            "{} exact entries, {} unique names, {} records",
            self.exact_len(),
            self.name_count(),
            self.record_count()
        )
    }
}
