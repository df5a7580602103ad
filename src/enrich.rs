//! Enrichment pass: annotate every graph node with its verification status.
//!
//! Resolution is a pure per-node query over a shared read-only index, so the
//! nodes are resolved in parallel with rayon. Results are collected in node
//! order and applied sequentially, which keeps the output identical to a
//! sequential pass.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;

use crate::graph::{self, load_graph, write_graph};
use crate::report::{load_report, VerificationReport};
use crate::status::{IdentityIndex, MatchStrategy, Resolution, StatusResolver};
use crate::types::Outcome;

/// Per-run counters. The four status buckets always sum to `total`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnrichStats {
    pub verified: usize,
    pub failed: usize,
    pub unverified: usize,
    pub unknown: usize,
    pub total: usize,
    /// Decisions per resolver tier
    pub by_strategy: BTreeMap<MatchStrategy, usize>,
}

impl EnrichStats {
    pub fn record(&mut self, resolution: Option<Resolution>) {
        self.total += 1;
        let Some(resolution) = resolution else {
            self.unknown += 1;
            return;
        };

        match resolution.outcome {
            Outcome::Verified => self.verified += 1,
            Outcome::Failed => self.failed += 1,
            Outcome::Unverified => self.unverified += 1,
        }
        *self.by_strategy.entry(resolution.strategy).or_insert(0) += 1;
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        match outcome {
            Outcome::Verified => self.verified,
            Outcome::Failed => self.failed,
            Outcome::Unverified => self.unverified,
        }
    }

    pub fn resolved(&self) -> usize {
        self.total - self.unknown
    }

    pub fn resolution_rate(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.resolved() as f64 / self.total as f64
    }

    /// Human-readable statistics block.
    pub fn render(&self) -> String {
        let mut lines = vec!["Verification status statistics:".to_string()];
        for outcome in Outcome::CATEGORY_ORDER {
            let label = format!("{} ({}):", capitalize(outcome.as_str()), outcome.color());
            lines.push(format!("  {:<20}{}", label, self.count(outcome)));
        }
        lines.push(format!("  {:<20}{}", "Unknown (blue):", self.unknown));
        lines.push(format!("  {:<20}{}", "Total nodes:", self.total));
        lines.join("\n")
    }

    /// Per-tier breakdown, one line per tier that fired.
    pub fn render_strategies(&self) -> String {
        let mut lines = vec!["Matches by strategy:".to_string()];
        for strategy in MatchStrategy::ALL {
            if let Some(count) = self.by_strategy.get(&strategy) {
                let basis = if strategy.is_path_based() { "by path" } else { "by name" };
                lines.push(format!("  {:<20}{:<8}({})", strategy.name(), count, basis));
            }
        }
        lines.join("\n")
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Resolve every node of a graph document, without mutating it.
pub fn resolve_nodes(doc: &Value, index: &IdentityIndex) -> Vec<Option<Resolution>> {
    let resolver = StatusResolver::new(index);
    graph::nodes(doc)
        .par_iter()
        .map(|node| resolver.explain(&graph::node_view(node)))
        .collect()
}

/// Annotate a graph document in place. Unmatched nodes are left untouched.
pub fn enrich_graph(doc: &mut Value, index: &IdentityIndex) -> EnrichStats {
    let resolutions = resolve_nodes(doc, index);
    let mut stats = EnrichStats::default();

    if let Some(nodes) = doc.get_mut("nodes").and_then(Value::as_array_mut) {
        for (node, resolution) in nodes.iter_mut().zip(resolutions) {
            let applied = match resolution {
                Some(r) => graph::set_status(node, r.outcome).then_some(r),
                None => None,
            };
            stats.record(applied);
        }
    }

    stats
}

/// Input and output locations for one run.
#[derive(Debug, Clone)]
pub struct EnrichPaths {
    pub graph: PathBuf,
    pub verification: PathBuf,
    /// Where to write the enriched graph; `None` skips writing
    pub output: Option<PathBuf>,
}

/// Everything a run produced, for reporting.
#[derive(Debug)]
pub struct EnrichRun {
    pub report: VerificationReport,
    pub index: IdentityIndex,
    pub stats: EnrichStats,
}

/// Load both documents, enrich the graph and write it out.
pub fn run(paths: &EnrichPaths) -> Result<EnrichRun> {
    let mut doc = load_graph(&paths.graph)?;
    let report = load_report(&paths.verification)?;

    let index = IdentityIndex::build(&report);
    let stats = enrich_graph(&mut doc, &index);

    if let Some(output) = &paths.output {
        write_graph(output, &doc)?;
    }

    Ok(EnrichRun { report, index, stats })
}

/// Write statistics as pretty JSON.
pub fn write_stats(path: &Path, stats: &EnrichStats) -> Result<()> {
    let content = serde_json::to_string_pretty(stats)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write statistics {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::STATUS_FIELD;
    use serde_json::json;

    fn sample_report() -> Value {
        json!({
            "verification": {
                "verified_functions": [
                    { "display-name": "add", "code-path": "crate/src/lib.rs",
                      "code-text": { "lines-start": 10, "lines-end": 14 } },
                    { "display-name": "foo", "code-path": "crate/src/a.rs" },
                    { "display-name": "foo", "code-path": "crate/src/b.rs" }
                ],
                "failed_functions": [
                    { "display-name": "bar", "code-path": "crate/src/c.rs" }
                ],
                "unverified_functions": [
                    { "display-name": "bar", "code-path": "crate/src/d.rs" }
                ]
            }
        })
    }

    fn sample_graph() -> Value {
        json!({
            "nodes": [
                { "id": "1", "display_name": "add", "relative_path": "crate/crate/src/lib.rs",
                  "full_path": "", "start_line": 10 },
                { "id": "2", "display_name": "foo", "relative_path": "crate/src/zzz.rs" },
                { "id": "3", "display_name": "bar", "relative_path": "crate/src/zzz.rs" },
                { "id": "4", "display_name": "missing", "relative_path": "crate/src/lib.rs" },
                { "id": "5", "display_name": "bar", "relative_path": "x/src/d.rs", "full_path": "" }
            ],
            "links": [{ "source": "1", "target": "2" }]
        })
    }

    #[test]
    fn test_enrich_graph() {
        let index = IdentityIndex::build(&VerificationReport::from_value(&sample_report()));
        let mut doc = sample_graph();
        let stats = enrich_graph(&mut doc, &index);

        let nodes = doc["nodes"].as_array().unwrap();
        assert_eq!(nodes[0][STATUS_FIELD], "verified");
        assert_eq!(nodes[1][STATUS_FIELD], "verified");
        assert!(nodes[2].get(STATUS_FIELD).is_none());
        assert!(nodes[3].get(STATUS_FIELD).is_none());
        assert_eq!(nodes[4][STATUS_FIELD], "unverified");
        assert_eq!(doc["links"], sample_graph()["links"]);

        assert_eq!(stats.verified, 2);
        assert_eq!(stats.unverified, 1);
        assert_eq!(stats.failed, 0);
        assert_eq!(stats.unknown, 2);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.by_strategy[&MatchStrategy::ExactLine], 1);
        assert_eq!(stats.by_strategy[&MatchStrategy::UnanimousName], 1);
        assert_eq!(stats.by_strategy[&MatchStrategy::ExactPath], 1);
    }

    #[test]
    fn test_buckets_sum_to_total() {
        let index = IdentityIndex::build(&VerificationReport::from_value(&sample_report()));
        let mut doc = sample_graph();
        let stats = enrich_graph(&mut doc, &index);

        let sum: usize = Outcome::CATEGORY_ORDER.iter().map(|o| stats.count(*o)).sum();
        assert_eq!(sum + stats.unknown, stats.total);
        assert_eq!(stats.resolved(), 3);
    }

    #[test]
    fn test_non_object_nodes_count_as_unknown() {
        let index = IdentityIndex::build(&VerificationReport::from_value(&sample_report()));
        let mut doc = json!({ "nodes": ["add", 1, null] });
        let stats = enrich_graph(&mut doc, &index);

        assert_eq!(stats.unknown, 3);
        assert_eq!(doc, json!({ "nodes": ["add", 1, null] }));
    }

    #[test]
    fn test_graph_without_nodes() {
        let index = IdentityIndex::default();
        let mut doc = json!({ "meta": "x" });
        let stats = enrich_graph(&mut doc, &index);

        assert_eq!(stats, EnrichStats::default());
        assert_eq!(stats.resolution_rate(), 1.0);
    }

    #[test]
    fn test_render() {
        let mut stats = EnrichStats::default();
        stats.record(Some(Resolution { outcome: Outcome::Failed, strategy: MatchStrategy::FuzzyPath }));
        stats.record(Some(Resolution { outcome: Outcome::Verified, strategy: MatchStrategy::UniqueName }));
        stats.record(None);

        let text = stats.render();
        assert!(text.contains("Failed (red):"));
        assert!(text.contains("Unknown (blue):     1"));
        assert!(text.contains("Total nodes:        3"));

        let strategies = stats.render_strategies();
        assert!(strategies.contains("  fuzzy_path          1       (by path)"));
        assert!(strategies.contains("  unique_name         1       (by name)"));
        assert!(!strategies.contains("exact_line"));
    }

    #[test]
    fn test_whole_float_lines_pick_the_right_record() {
        let report = json!({
            "verification": {
                "verified_functions": [
                    { "display-name": "f", "code-path": "crate/src/f.rs",
                      "code-text": { "lines-start": 10.0 } }
                ],
                "failed_functions": [
                    { "display-name": "f", "code-path": "crate/src/f.rs",
                      "code-text": { "lines-start": 20 } }
                ]
            }
        });
        let index = IdentityIndex::build(&VerificationReport::from_value(&report));
        let mut doc = json!({
            "nodes": [
                { "display_name": "f", "relative_path": "x/src/f.rs", "start_line": 20.0 },
                { "display_name": "f", "relative_path": "x/src/f.rs", "start_line": 10 }
            ]
        });
        let stats = enrich_graph(&mut doc, &index);

        assert_eq!(doc["nodes"][0][STATUS_FIELD], "failed");
        assert_eq!(doc["nodes"][1][STATUS_FIELD], "verified");
        assert_eq!(stats.by_strategy[&MatchStrategy::ExactLine], 2);
    }

    #[test]
    fn test_non_string_names_do_not_match_missing_names() {
        let report = json!({
            "verification": {
                "verified_functions": [
                    { "display-name": 42, "code-path": "crate/src/x.rs" }
                ]
            }
        });
        let index = IdentityIndex::build(&VerificationReport::from_value(&report));
        let mut doc = json!({
            "nodes": [
                { "display_name": null, "relative_path": "src/y.rs" },
                { "relative_path": "src/z.rs" },
                { "display_name": "42", "relative_path": "src/x.rs" },
                { "display_name": 42, "relative_path": "p/src/x.rs" }
            ]
        });
        let stats = enrich_graph(&mut doc, &index);

        let nodes = doc["nodes"].as_array().unwrap();
        assert!(nodes[..3].iter().all(|n| n.get(STATUS_FIELD).is_none()));
        assert_eq!(nodes[3][STATUS_FIELD], "verified");
        assert_eq!(stats.unknown, 3);
    }

    #[test]
    fn test_run_end_to_end() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let graph_path = dir.path().join("graph.json");
        let report_path = dir.path().join("verification_results.json");
        let output_path = dir.path().join("out.json");

        std::fs::write(&graph_path, serde_json::to_string(&json!({
            "nodes": [
                { "id": "add", "display_name": "add",
                  "relative_path": "crate/crate/src/lib.rs", "start_line": 10 },
                { "id": "ghost", "display_name": "ghost", "relative_path": "crate/src/lib.rs" }
            ]
        }))?)?;
        std::fs::write(&report_path, serde_json::to_string(&json!({
            "verification": {
                "verified_functions": [{
                    "display-name": "add",
                    "code-path": "crate/src/lib.rs",
                    "code-text": { "lines-start": 10 }
                }],
                "failed_functions": [],
                "unverified_functions": []
            }
        }))?)?;

        let result = run(&EnrichPaths {
            graph: graph_path.clone(),
            verification: report_path,
            output: Some(output_path.clone()),
        })?;

        assert_eq!(result.stats.verified, 1);
        assert_eq!(result.stats.unknown, 1);
        assert_eq!(result.index.record_count(), 1);

        let out = load_graph(&output_path)?;
        assert_eq!(out["nodes"][0][STATUS_FIELD], "verified");
        assert!(out["nodes"][1].get(STATUS_FIELD).is_none());

        // Input untouched when writing elsewhere
        let input = load_graph(&graph_path)?;
        assert!(input["nodes"][0].get(STATUS_FIELD).is_none());
        Ok(())
    }

    #[test]
    fn test_run_missing_input_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(&EnrichPaths {
            graph: dir.path().join("nope.json"),
            verification: dir.path().join("nope2.json"),
            output: None,
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_write_stats() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("stats.json");
        let mut stats = EnrichStats::default();
        stats.record(Some(Resolution { outcome: Outcome::Verified, strategy: MatchStrategy::ExactLine }));

        write_stats(&path, &stats)?;
        let back: Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        assert_eq!(back["verified"], 1);
        assert_eq!(back["by_strategy"]["exact_line"], 1);
        Ok(())
    }
}
