//! verimap - verification status for call graphs
//!
//! Annotates the nodes of a function/lemma call graph with the outcome
//! recorded for them in an independently produced verification report.
//!
//! # Architecture
//!
//! ```text
//! verification_results.json → report → IdentityIndex ─┐
//!                                                     ├→ StatusResolver → enrich → graph.json
//! graph.json ──────────────→ graph → GraphNode ───────┘
//! ```
//!
//! The two documents describe the same functions with different path
//! prefixes and reused names. The `status` module reconciles them, walking
//! from (name, path, line) down to name-only matching and refusing to guess
//! when candidates disagree.

pub mod config;
pub mod enrich;
pub mod graph;
pub mod report;
pub mod status;
pub mod types;

// Re-export core types
pub use types::{FunctionRecord, GraphNode, Outcome};

// Re-export matching engine
pub use status::{
    normalize, resolve, EntryKey, ExactEntry, IdentityIndex, MatchStrategy, NameRecord,
    Resolution, StatusResolver,
};

pub use enrich::{enrich_graph, EnrichStats};
pub use report::VerificationReport;
