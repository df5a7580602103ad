//! verimap CLI - annotate a call graph with verification status
//!
//! Pipeline:
//!
//! 1. Load the call graph and the verification report
//! 2. Build the identity index over the report
//! 3. Resolve every graph node against the index
//! 4. Write the enriched graph and print statistics
//!
//! Nodes that cannot be matched unambiguously are left without a
//! `verification_status` field and counted as unknown.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;

use verimap::config::Config;
use verimap::enrich::{self, EnrichPaths};
use verimap::types::Outcome;

/// Add verification status to call graph nodes
///
/// Matches each node against the verification report by name, normalized
/// source path and start line, falling back to name-only matching when the
/// name is unique or all candidates agree.
///
/// Examples:
///   verimap                                   # Defaults or verimap.toml
///   verimap --graph graph.json --verification results.json
///   verimap --output enriched.json --stats-json stats.json
#[derive(Parser, Debug)]
#[command(name = "verimap")]
#[command(version)]
#[command(about, long_about = None)]
pub struct Cli {
    /// Call graph JSON to enrich
    ///
    /// Defaults to web/public/graph.json unless set in verimap.toml.
    #[arg(long, value_name = "PATH")]
    pub graph: Option<PathBuf>,

    /// Verification report JSON
    ///
    /// Defaults to data/verification_results.json unless set in verimap.toml.
    #[arg(long, value_name = "PATH")]
    pub verification: Option<PathBuf>,

    /// Output path for the enriched graph
    ///
    /// Defaults to overwriting the input graph.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Resolve and report without writing the graph
    #[arg(long)]
    pub dry_run: bool,

    /// Also write statistics as JSON
    #[arg(long, value_name = "PATH")]
    pub stats_json: Option<PathBuf>,

    /// Directory to search for verimap.toml / pyproject.toml
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Verbose output
    ///
    /// Shows input paths, report composition, index sizes, per-strategy
    /// match counts and timings.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress the statistics block
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let start = Instant::now();
    let config = Config::load(&cli.root);

    let graph = config.graph_path(cli.graph.as_deref());
    let verification = config.verification_path(cli.verification.as_deref());
    let output = config.output_path(cli.output.as_deref(), &graph);

    if cli.verbose {
        eprintln!("verimap v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("{}", config.display_summary());
        eprintln!("Reading graph from: {}", graph.display());
        eprintln!("Reading verification results from: {}", verification.display());
    }

    let paths = EnrichPaths {
        graph,
        verification,
        output: (!cli.dry_run).then(|| output.clone()),
    };
    let result = enrich::run(&paths)?;

    if cli.verbose {
        let counts: Vec<_> = Outcome::CATEGORY_ORDER
            .iter()
            .map(|o| format!("{} {}", result.report.count(*o), o))
            .collect();
        eprintln!("✓ Loaded {} report records ({})", result.report.len(), counts.join(", "));
        eprintln!("✓ Built lookup: {}", result.index.summary());
        eprintln!("{}", result.stats.render_strategies());
        eprintln!(
            "✓ Resolved {}/{} nodes ({:.1}%) in {:.2?}",
            result.stats.resolved(),
            result.stats.total,
            result.stats.resolution_rate() * 100.0,
            start.elapsed()
        );
    }

    if !cli.quiet {
        eprintln!("\n{}", result.stats.render());
    }

    if let Some(ref stats_path) = cli.stats_json {
        enrich::write_stats(stats_path, &result.stats)?;
        if cli.verbose {
            eprintln!("✓ Wrote statistics to: {}", stats_path.display());
        }
    }

    if !cli.quiet {
        if cli.dry_run {
            eprintln!("\nDry run: graph not written");
        } else {
            eprintln!("\nWrote enriched graph to: {}", output.display());
        }
    }

    Ok(())
}
