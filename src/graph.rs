//! Call graph document handling.
//!
//! The graph is kept as a `serde_json::Value` so every field we do not model
//! (edges, metrics, layout hints) is written back unchanged. Only
//! `verification_status` is ever added to a node.

use std::path::Path;
use anyhow::{bail, Context, Result};
use serde_json::Value;

use crate::types::{line_number, name_key, GraphNode, Outcome};

/// Node field written by the enrichment pass.
pub const STATUS_FIELD: &str = "verification_status";

/// Read and parse a call graph document. The top level must be an object.
pub fn load_graph(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read graph {}", path.display()))?;
    let doc: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse graph {}", path.display()))?;

    if !doc.is_object() {
        bail!("Graph {} is not a JSON object", path.display());
    }
    Ok(doc)
}

/// Write a graph document as pretty-printed JSON.
pub fn write_graph(path: &Path, doc: &Value) -> Result<()> {
    let content = serde_json::to_string_pretty(doc)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write graph {}", path.display()))
}

/// Nodes of a graph document. A missing or non-array `nodes` reads as empty.
pub fn nodes(doc: &Value) -> &[Value] {
    doc.get("nodes").and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default()
}

/// Typed view of one node. Missing or mistyped paths read as empty, lines
/// as absent. Names go through `name_key`.
pub fn node_view(node: &Value) -> GraphNode<'_> {
    let text = |key: &str| node.get(key).and_then(Value::as_str).unwrap_or_default();

    GraphNode {
        id: text("id"),
        display_name: name_key(node.get("display_name")),
        relative_path: text("relative_path"),
        full_path: text("full_path"),
        start_line: line_number(node.get("start_line")),
    }
}

/// Attach a status to a node. Returns false when the node is not an object.
pub fn set_status(node: &mut Value, outcome: Outcome) -> bool {
    match node.as_object_mut() {
        Some(fields) => {
            fields.insert(STATUS_FIELD.to_string(), Value::from(outcome.as_str()));
            true
        }
        None => false,
    }
}
