//! Configuration loading from verimap.toml and pyproject.toml.
//!
//! Same lookup conventions as ruff/black/mypy:
//! - Standalone verimap.toml in the working directory
//! - `[tool.verimap]` section in pyproject.toml, searched upward
//!
//! ## Example
//!
//! ```toml
//! [tool.verimap]
//! graph = "web/public/graph.json"
//! verification = "data/verification_results.json"
//! output = "web/public/graph.enriched.json"
//! ```
//!
//! Relative paths are resolved against the directory holding the config file.
//! Command-line flags always win over the file.

use std::path::{Path, PathBuf};
use serde::Deserialize;

/// Graph document used when neither flag nor config names one.
pub const DEFAULT_GRAPH: &str = "web/public/graph.json";

/// Verification report used when neither flag nor config names one.
pub const DEFAULT_VERIFICATION: &str = "data/verification_results.json";

/// verimap configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Source file for this config (for display).
    pub source: Option<PathBuf>,

    /// Call graph to enrich.
    pub graph: Option<PathBuf>,

    /// Verification report to read statuses from.
    pub verification: Option<PathBuf>,

    /// Where to write the enriched graph. Defaults to overwriting `graph`.
    pub output: Option<PathBuf>,
}

/// Raw config as deserialized from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
struct RawConfig {
    graph: Option<String>,
    verification: Option<String>,
    output: Option<String>,
}

/// Wrapper for pyproject.toml structure.
#[derive(Debug, Deserialize)]
struct PyProject {
    tool: Option<PyProjectTool>,
}

#[derive(Debug, Deserialize)]
struct PyProjectTool {
    verimap: Option<RawConfig>,
}

impl Config {
    /// Load configuration for the given directory.
    ///
    /// Search order:
    /// 1. verimap.toml in directory
    /// 2. pyproject.toml [tool.verimap] in directory
    /// 3. Walk up to find pyproject.toml with a [tool.verimap] section
    /// 4. Default config if nothing found
    pub fn load(directory: &Path) -> Self {
        let verimap_toml = directory.join("verimap.toml");
        if verimap_toml.exists() {
            if let Some(config) = Self::load_verimap_toml(&verimap_toml) {
                return config;
            }
        }

        let mut current = Some(directory);
        while let Some(dir) = current {
            let pyproject = dir.join("pyproject.toml");
            if pyproject.exists() {
                if let Some(config) = Self::load_pyproject(&pyproject) {
                    return config;
                }
            }
            current = dir.parent();
        }

        Self::default()
    }

    fn load_verimap_toml(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        let raw: RawConfig = toml::from_str(&content).ok()?;
        Some(Self::from_raw(raw, path))
    }

    fn load_pyproject(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        let pyproject: PyProject = toml::from_str(&content).ok()?;
        let raw = pyproject.tool?.verimap?;
        Some(Self::from_raw(raw, path))
    }

    fn from_raw(raw: RawConfig, source: &Path) -> Self {
        let base = source.parent().unwrap_or(Path::new(""));
        let resolve = |p: Option<String>| p.map(|p| base.join(p));

        Self {
            source: Some(source.to_path_buf()),
            graph: resolve(raw.graph),
            verification: resolve(raw.verification),
            output: resolve(raw.output),
        }
    }

    /// Effective graph path: flag, then config, then default.
    pub fn graph_path(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.graph.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_GRAPH))
    }

    /// Effective verification report path: flag, then config, then default.
    pub fn verification_path(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.verification.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_VERIFICATION))
    }

    /// Effective output path: flag, then config, then the graph itself.
    pub fn output_path(&self, flag: Option<&Path>, graph: &Path) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.output.clone())
            .unwrap_or_else(|| graph.to_path_buf())
    }

    /// Format config for verbose display.
    pub fn display_summary(&self) -> String {
        let mut lines = Vec::new();

        if let Some(ref source) = self.source {
            lines.push(format!("   Config: {}", source.display()));
        } else {
            lines.push("   Config: (defaults)".to_string());
        }

        for (label, value) in [
            ("Graph", &self.graph),
            ("Verification", &self.verification),
            ("Output", &self.output),
        ] {
            if let Some(path) = value {
                lines.push(format!("   {}: {}", label, path.display()));
            }
        }

        lines.join("\n")
    }
}
