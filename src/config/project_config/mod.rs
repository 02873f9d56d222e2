//! Project-level configuration support
//!
//! Loads configuration from `slop-detector.toml`, `.slopconfig.toml` or
//! `.slopconfig.json` in the project root, or from an explicit path.
//!
//! # Configuration Format
//!
//! ```toml
//! # slop-detector.toml
//! use_weighted_analysis = true
//! ignore = ["tests/fixtures/**"]
//!
//! [weights]
//! ldr = 0.4
//! inflation = 0.3
//! ddc = 0.3
//!
//! [thresholds.ldr]
//! critical = 0.3
//! warning = 0.6
//!
//! [patterns]
//! disabled = ["todo_comment"]
//!
//! [jargon]
//! marketing = ["synergy", "paradigm-shifting"]
//! ```
//!
//! Tables given in a file replace the built-in table of the same name.

use super::defaults;
use crate::error::{SlopError, SlopResult};
use globset::{Glob, GlobSet, GlobSetBuilder};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// File names searched, in order, by [`load_project_config`]
pub const CONFIG_FILE_NAMES: &[&str] = &["slop-detector.toml", ".slopconfig.toml", ".slopconfig.json"];

/// Weights of the three primary metrics in the deficit score
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MetricWeights {
    #[serde(default = "default_ldr_weight")]
    pub ldr: f64,

    #[serde(default = "default_inflation_weight")]
    pub inflation: f64,

    #[serde(default = "default_ddc_weight")]
    pub ddc: f64,
}

impl Default for MetricWeights {
    fn default() -> Self {
        Self {
            ldr: default_ldr_weight(),
            inflation: default_inflation_weight(),
            ddc: default_ddc_weight(),
        }
    }
}

fn default_ldr_weight() -> f64 {
    0.40
}
fn default_inflation_weight() -> f64 {
    0.30
}
fn default_ddc_weight() -> f64 {
    0.30
}

impl MetricWeights {
    /// Validate that weights sum to 1.0 (with tolerance)
    pub fn is_valid(&self) -> bool {
        let sum = self.ldr + self.inflation + self.ddc;
        (sum - 1.0).abs() < 0.001
    }
}

/// A warning/critical pair for one metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub critical: f64,
    pub warning: f64,
}

impl Threshold {
    pub const fn new(critical: f64, warning: f64) -> Self {
        Self { critical, warning }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Lower is worse
    pub ldr: Threshold,
    /// Higher is worse
    pub inflation: Threshold,
    /// Lower is worse
    pub ddc: Threshold,
    /// Higher is worse
    pub deficit: Threshold,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            ldr: Threshold::new(0.30, 0.60),
            inflation: Threshold::new(1.0, 0.5),
            ddc: Threshold::new(0.50, 0.70),
            deficit: Threshold::new(70.0, 30.0),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternsConfig {
    /// Pattern ids excluded from the registry
    pub disabled: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExceptionsConfig {
    /// Globs of files whose inflation score is forced to 0.0
    pub config_files: Vec<String>,

    /// Floor applied to the logic density of abstract interface files
    pub abc_interface_baseline: f64,
}

impl Default for ExceptionsConfig {
    fn default() -> Self {
        Self {
            config_files: defaults::config_file_patterns(),
            abc_interface_baseline: 0.75,
        }
    }
}

/// Complete analysis configuration
///
/// Constructed once, validated, then shared read-only (behind an `Arc`)
/// by the engine, every calculator and the pattern registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Weight the project deficit average by file line count
    pub use_weighted_analysis: bool,

    /// Globs (relative to the project root) skipped by project scans
    pub ignore: Vec<String>,

    pub weights: MetricWeights,
    pub thresholds: Thresholds,

    /// Jargon terms keyed by category, matched case-insensitively
    pub jargon: IndexMap<String, Vec<String>>,

    /// Jargon term -> libraries whose real use justifies it
    pub justifications: IndexMap<String, Vec<String>>,

    /// Category -> top-level module names of heavyweight libraries
    pub heavy_libraries: IndexMap<String, Vec<String>>,

    pub patterns: PatternsConfig,

    pub exceptions: ExceptionsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            weights: MetricWeights::default(),
            thresholds: Thresholds::default(),
            jargon: defaults::jargon(),
            justifications: defaults::justifications(),
            heavy_libraries: defaults::heavy_libraries(),
            patterns: PatternsConfig::default(),
            ignore: defaults::ignore_patterns(),
            use_weighted_analysis: true,
            exceptions: ExceptionsConfig::default(),
        }
    }
}

impl Config {
    /// Load and validate configuration from an explicit file.
    ///
    /// `.json` files are read as JSON; anything else as TOML.
    pub fn from_file(path: &Path) -> SlopResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SlopError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content)?,
            _ => Self::from_toml_str(&content)?,
        };
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> SlopResult<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> SlopResult<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the scorer cannot use
    pub fn validate(&self) -> SlopResult<()> {
        let w = &self.weights;
        if w.ldr < 0.0 || w.inflation < 0.0 || w.ddc < 0.0 {
            return Err(SlopError::Config(format!(
                "weights must be non-negative (ldr={}, inflation={}, ddc={})",
                w.ldr, w.inflation, w.ddc
            )));
        }
        if !w.is_valid() {
            return Err(SlopError::Config(format!(
                "weights must sum to 1.0, got {:.3}",
                w.ldr + w.inflation + w.ddc
            )));
        }

        let t = &self.thresholds;
        // ldr and ddc get worse as they fall; inflation and deficit as they rise
        for (name, threshold, lower_is_worse) in [
            ("ldr", t.ldr, true),
            ("ddc", t.ddc, true),
            ("inflation", t.inflation, false),
            ("deficit", t.deficit, false),
        ] {
            let ordered = if lower_is_worse {
                threshold.critical <= threshold.warning
            } else {
                threshold.critical >= threshold.warning
            };
            if !ordered {
                return Err(SlopError::Config(format!(
                    "thresholds.{name}: critical ({}) and warning ({}) are out of order",
                    threshold.critical, threshold.warning
                )));
            }
        }

        let baseline = self.exceptions.abc_interface_baseline;
        if !(0.0..=1.0).contains(&baseline) {
            return Err(SlopError::Config(format!(
                "exceptions.abc_interface_baseline must be within [0, 1], got {baseline}"
            )));
        }

        Ok(())
    }

    /// Heavy-library categories a top-level module belongs to
    pub fn heavy_categories(&self, module: &str) -> Vec<String> {
        self.heavy_libraries
            .iter()
            .filter(|(_, libs)| libs.iter().any(|l| l == module))
            .map(|(category, _)| category.clone())
            .collect()
    }

    pub fn is_heavy_library(&self, module: &str) -> bool {
        self.heavy_libraries
            .values()
            .any(|libs| libs.iter().any(|l| l == module))
    }

    /// Compiled `ignore` globs
    pub fn ignore_set(&self) -> SlopResult<GlobSet> {
        build_glob_set(&self.ignore)
    }

    /// Compiled `exceptions.config_files` globs
    pub fn config_file_set(&self) -> SlopResult<GlobSet> {
        build_glob_set(&self.exceptions.config_files)
    }
}

/// Compile glob patterns into one matcher
pub fn build_glob_set(patterns: &[String]) -> SlopResult<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| SlopError::Glob {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| SlopError::Glob {
        pattern: patterns.join(", "),
        source,
    })
}

/// Load project configuration from the project root.
///
/// Searches for configuration files in this order:
/// 1. `slop-detector.toml`
/// 2. `.slopconfig.toml`
/// 3. `.slopconfig.json`
///
/// A file that fails to load is logged and skipped. Returns the default
/// configuration if nothing usable is found.
pub fn load_project_config(root: &Path) -> Config {
    let dir = if root.is_file() {
        root.parent().unwrap_or(root)
    } else {
        root
    };

    for name in CONFIG_FILE_NAMES {
        let path = dir.join(name);
        if !path.exists() {
            continue;
        }
        match Config::from_file(&path) {
            Ok(config) => return config,
            Err(e) => {
                warn!("Failed to load {}: {}", path.display(), e);
            }
        }
    }

    debug!("No project config found, using defaults");
    Config::default()
}
