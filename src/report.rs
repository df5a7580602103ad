//! Verification report loading.
//!
//! The report groups functions into three collections under `verification`:
//!
//! ```json
//! {
//!   "verification": {
//!     "verified_functions":   [{ "display-name": "...", "code-path": "...",
//!                                "code-text": { "lines-start": 10, "lines-end": 20 } }],
//!     "failed_functions":     [],
//!     "unverified_functions": []
//!   }
//! }
//! ```
//!
//! Extraction is lenient: a record with missing or mistyped fields is still
//! kept, with empty strings and absent line numbers in place of the bad
//! values. Only unreadable files and invalid JSON are errors.

use std::path::Path;
use anyhow::{Context, Result};
use serde_json::Value;

use crate::types::{line_number, name_key, FunctionRecord, Outcome};

/// All function records of one report, in category order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    records: Vec<FunctionRecord>,
}

impl VerificationReport {
    pub fn from_records(records: Vec<FunctionRecord>) -> Self {
        Self { records }
    }

    /// Extract records from a parsed report document. Never fails.
    pub fn from_value(doc: &Value) -> Self {
        let verification = doc.get("verification");
        let mut records = Vec::new();

        for outcome in Outcome::CATEGORY_ORDER {
            let entries = verification
                .and_then(|v| v.get(outcome.report_key()))
                .and_then(Value::as_array);

            for entry in entries.into_iter().flatten() {
                records.push(record_from_value(entry, outcome));
            }
        }

        Self { records }
    }

    pub fn records(&self) -> &[FunctionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records reported with the given outcome.
    pub fn count(&self, outcome: Outcome) -> usize {
        self.records.iter().filter(|r| r.outcome == outcome).count()
    }
}

fn record_from_value(entry: &Value, outcome: Outcome) -> FunctionRecord {
    let text = |key: &str| entry.get(key).and_then(Value::as_str).unwrap_or_default().to_string();
    let line = |key: &str| line_number(entry.get("code-text").and_then(|t| t.get(key)));

    FunctionRecord {
        display_name: name_key(entry.get("display-name")).into_owned(),
        code_path: text("code-path"),
        lines_start: line("lines-start"),
        lines_end: line("lines-end"),
        outcome,
    }
}

/// Read and parse a verification report from disk.
pub fn load_report(path: &Path) -> Result<VerificationReport> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read verification report {}", path.display()))?;
    let doc: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse verification report {}", path.display()))?;
    Ok(VerificationReport::from_value(&doc))
}
