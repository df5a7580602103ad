//! Core types shared by the index, the resolver and the enrichment pass.
//!
//! Both datasets are read-only once loaded:
//! - `FunctionRecord` comes from the verification report
//! - `GraphNode` is a typed view of one call graph node
//!
//! The graph document itself stays a `serde_json::Value` so that fields we do
//! not model survive the round trip untouched.

use std::borrow::Cow;
use std::fmt;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Verification outcome of a function or lemma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Verified,
    Failed,
    Unverified,
}

impl Outcome {
    /// Order in which report categories are indexed.
    ///
    /// The pair key of the identity index is first-writer-wins, so this order
    /// decides which outcome survives a (name, path) collision.
    pub const CATEGORY_ORDER: [Outcome; 3] = [Outcome::Verified, Outcome::Failed, Outcome::Unverified];

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Verified => "verified",
            Outcome::Failed => "failed",
            Outcome::Unverified => "unverified",
        }
    }

    /// Report collection holding records of this outcome.
    pub fn report_key(self) -> &'static str {
        match self {
            Outcome::Verified => "verified_functions",
            Outcome::Failed => "failed_functions",
            Outcome::Unverified => "unverified_functions",
        }
    }

    /// Display color used by the graph viewer.
    pub fn color(self) -> &'static str {
        match self {
            Outcome::Verified => "green",
            Outcome::Failed => "red",
            Outcome::Unverified => "grey",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One function entry of the verification report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionRecord {
    /// Function/lemma name, not unique across the report
    pub display_name: String,
    /// Source path as the verifier saw it
    pub code_path: String,
    /// First line of the item (1-indexed)
    pub lines_start: Option<u32>,
    /// Last line of the item (1-indexed)
    pub lines_end: Option<u32>,
    /// Which report collection the record came from
    pub outcome: Outcome,
}

impl FunctionRecord {
    pub fn new(display_name: impl Into<String>, code_path: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            display_name: display_name.into(),
            code_path: code_path.into(),
            lines_start: None,
            lines_end: None,
            outcome,
        }
    }

    pub fn with_lines(mut self, start: u32, end: u32) -> Self {
        self.lines_start = Some(start);
        self.lines_end = Some(end);
        self
    }

    pub fn with_start(mut self, start: u32) -> Self {
        self.lines_start = Some(start);
        self
    }
}

/// Typed view of a call graph node, borrowed from the graph document.
///
/// Missing string fields read as empty; they never make a node invalid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GraphNode<'a> {
    pub id: &'a str,
    /// Identity key of the name, see `name_key`
    pub display_name: Cow<'a, str>,
    pub relative_path: &'a str,
    pub full_path: &'a str,
    pub start_line: Option<u32>,
}

impl<'a> GraphNode<'a> {
    pub fn new(display_name: &'a str, relative_path: &'a str) -> Self {
        Self {
            display_name: Cow::Borrowed(display_name),
            relative_path,
            ..Default::default()
        }
    }

    pub fn with_full_path(mut self, full_path: &'a str) -> Self {
        self.full_path = full_path;
        self
    }

    pub fn with_start_line(mut self, line: u32) -> Self {
        self.start_line = Some(line);
        self
    }

    /// Candidate paths in lookup order: relative first, then full.
    /// Empty paths are skipped.
    pub fn candidate_paths(&self) -> impl Iterator<Item = &'a str> {
        [self.relative_path, self.full_path]
            .into_iter()
            .filter(|p| !p.is_empty())
    }
}

/// Prefix of name keys built from non-string JSON values.
/// NUL never occurs in a function name, so these keys cannot collide with one.
const RAW_NAME_PREFIX: char = '\0';

/// Identity key for a JSON name field.
///
/// A string is used as is and a missing field reads as empty. Any other value
/// (null, a number) keys by its JSON text, so it only ever matches the same
/// raw value on the other side.
pub fn name_key(value: Option<&Value>) -> Cow<'_, str> {
    match value {
        None => Cow::Borrowed(""),
        Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
        Some(other) => Cow::Owned(format!("{}{}", RAW_NAME_PREFIX, other)),
    }
}

/// Line number from a JSON field: a non-negative integer, or a float with no
/// fractional part (`20.0` is line 20).
pub fn line_number(value: Option<&Value>) -> Option<u32> {
    let value = value?;
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    let f = value.as_f64()?;
    (f.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&f)).then_some(f as u32)
}
