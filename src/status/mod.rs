//! Status matching between a call graph and a verification report.
//!
//! # Pipeline
//!
//! ```text
//! report ──> [index] ──> IdentityIndex ──┐
//!                                        ├──> [resolver] ──> Option<Outcome> per node
//! graph node ──> [path] normalize ───────┘
//! ```
//!
//! The two datasets name the same functions with different path prefixes and
//! reuse names across files. Resolution therefore walks from the most
//! specific identity key down to name-only matching, stopping at the first
//! tier that answers.
//!
//! # Quick Start
//!
//! ```ignore
//! let index = IdentityIndex::build(&report);
//! let resolver = StatusResolver::new(&index);
//! let status = resolver.resolve(&GraphNode::new("add", "crate/src/lib.rs").with_start_line(10));
//! ```
//!
//! Building the index is the only mutation; every query afterwards is
//! read-only, so nodes can be resolved in any order or in parallel.

mod index;
mod path;
mod resolver;

pub use index::{EntryKey, ExactEntry, IdentityIndex, NameRecord};
pub use path::{normalize, overlaps};
pub use resolver::{resolve, MatchStrategy, Resolution, StatusResolver};
