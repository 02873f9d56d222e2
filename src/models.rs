//! Core data models for the slop detector
//!
//! These models are shared by the metric calculators, the pattern registry
//! and the scoring layer, and are what downstream consumers (reporters,
//! API wrappers) receive. They are plain values: once an analysis is built
//! nothing in the engine mutates it again.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::parsers::ParseError;

/// Severity levels for pattern issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Points added to the deficit score for each issue of this severity
    pub fn penalty_weight(&self) -> f64 {
        match self {
            Severity::Critical => 10.0,
            Severity::High => 5.0,
            Severity::Medium => 2.0,
            Severity::Low => 1.0,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// The dimension an issue speaks to. Used for grouping, never for scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Quality,
    Noise,
    Style,
    Security,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Quality => write!(f, "quality"),
            Axis::Noise => write!(f, "noise"),
            Axis::Style => write!(f, "style"),
            Axis::Security => write!(f, "security"),
        }
    }
}

/// A single finding emitted by one pattern invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub pattern_id: String,
    pub severity: Severity,
    pub axis: Axis,
    pub file: PathBuf,
    /// 1-based line
    pub line: usize,
    /// 0-based byte column
    pub column: usize,
    pub message: String,
    #[serde(default)]
    pub suggestion: Option<String>,
}

/// Per-file verdict, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlopStatus {
    Clean,
    Suspicious,
    InflatedSignal,
    DependencyNoise,
    CriticalDeficit,
}

impl std::fmt::Display for SlopStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SlopStatus::Clean => "CLEAN",
            SlopStatus::Suspicious => "SUSPICIOUS",
            SlopStatus::InflatedSignal => "INFLATED_SIGNAL",
            SlopStatus::DependencyNoise => "DEPENDENCY_NOISE",
            SlopStatus::CriticalDeficit => "CRITICAL_DEFICIT",
        };
        write!(f, "{}", s)
    }
}

/// Logic density (LDR) result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LdrResult {
    pub logic_lines: usize,
    /// Every line that is not logic: blank, comment, docstring or placeholder
    pub empty_lines: usize,
    pub total_lines: usize,
    pub blank_lines: usize,
    pub comment_lines: usize,
    pub docstring_lines: usize,
    pub placeholder_lines: usize,
    pub score: f64,
    pub grade: String,
    pub is_abc_interface: bool,
    pub is_type_stub: bool,
}

impl LdrResult {
    /// Neutral result used when a file could not be parsed
    pub fn degenerate() -> Self {
        Self {
            logic_lines: 0,
            empty_lines: 0,
            total_lines: 0,
            blank_lines: 0,
            comment_lines: 0,
            docstring_lines: 0,
            placeholder_lines: 0,
            score: 0.0,
            grade: "N/A".to_string(),
            is_abc_interface: false,
            is_type_stub: false,
        }
    }
}

/// Inflation threshold verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InflationStatus {
    Pass,
    Warn,
    Fail,
}

/// A jargon term found in a docstring or comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JargonHit {
    pub word: String,
    pub category: String,
    pub line: usize,
}

/// Jargon inflation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InflationResult {
    /// `f64::INFINITY` when the file is all jargon and no logic
    #[serde(with = "unbounded_f64")]
    pub score: f64,
    pub jargon_count: usize,
    pub complexity_baseline: f64,
    pub status: InflationStatus,
    /// Unjustified hits in source order
    pub jargon_details: Vec<JargonHit>,
    /// Terms excluded from the score because the code backs them up
    pub justified_jargon: Vec<String>,
    pub is_config_file: bool,
}

impl InflationResult {
    pub fn degenerate() -> Self {
        Self {
            score: 0.0,
            jargon_count: 0,
            complexity_baseline: 0.0,
            status: InflationStatus::Pass,
            jargon_details: Vec::new(),
            justified_jargon: Vec::new(),
            is_config_file: false,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.score.is_infinite()
    }
}

/// Dependency usage (DDC) result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DdcResult {
    pub imported: BTreeSet<String>,
    pub actually_used: BTreeSet<String>,
    pub unused: BTreeSet<String>,
    /// Unused imports of heavyweight libraries
    pub fake_imports: BTreeSet<String>,
    pub type_checking_imports: BTreeSet<String>,
    pub usage_ratio: f64,
    pub grade: String,
}

impl DdcResult {
    pub fn degenerate() -> Self {
        Self {
            imported: BTreeSet::new(),
            actually_used: BTreeSet::new(),
            unused: BTreeSet::new(),
            fake_imports: BTreeSet::new(),
            type_checking_imports: BTreeSet::new(),
            usage_ratio: 0.0,
            grade: "N/A".to_string(),
        }
    }
}

/// Status of the hallucinated-dependency correlator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HallucinationStatus {
    Clean,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HallucinatedDependency {
    pub name: String,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HallucinationDepsResult {
    pub hallucinated: Vec<HallucinatedDependency>,
    pub total_hallucinated: usize,
    /// Hallucinated count divided by total runtime imports
    pub ratio: f64,
    pub category_counts: indexmap::IndexMap<String, usize>,
    pub status: HallucinationStatus,
}

/// Kind of definition a finding is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefinitionKind {
    Module,
    Function,
    Class,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InflationSeverity {
    Warning,
    Critical,
}

/// A definition whose docstring outweighs its body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocstringInflationFinding {
    pub name: String,
    pub kind: DefinitionKind,
    pub line: usize,
    pub docstring_lines: usize,
    pub implementation_lines: usize,
    pub jargon_count: usize,
    /// docstring lines per implementation line
    pub doc_to_code_ratio: f64,
    /// docstring jargon terms per implementation line
    pub jargon_density: f64,
    pub severity: InflationSeverity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocstringInflationResult {
    pub total_documented: usize,
    pub findings: Vec<DocstringInflationFinding>,
    pub critical_count: usize,
    pub warning_count: usize,
}

/// A jargon hit located inside the definition that makes the claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextJargonHit {
    pub word: String,
    pub category: String,
    pub line: usize,
    pub context: String,
    pub context_kind: DefinitionKind,
    pub implementation_lines: usize,
    /// Claims made in the same definition, this one included
    pub claims_in_context: usize,
    pub supported: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextJargonResult {
    pub hits: Vec<ContextJargonHit>,
    pub unsupported_count: usize,
}

/// Complete per-file analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileAnalysis {
    pub file_path: PathBuf,
    pub ldr: LdrResult,
    pub inflation: InflationResult,
    pub ddc: DdcResult,
    pub deficit_score: f64,
    pub status: SlopStatus,
    pub warnings: Vec<String>,
    pub pattern_issues: Vec<Issue>,
    #[serde(default)]
    pub docstring_inflation: Option<DocstringInflationResult>,
    #[serde(default)]
    pub hallucination_deps: Option<HallucinationDepsResult>,
    #[serde(default)]
    pub context_jargon: Option<ContextJargonResult>,
    #[serde(default)]
    pub parse_error: Option<ParseError>,
}

/// Roll-up of many file analyses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectAnalysis {
    pub project_path: PathBuf,
    pub total_files: usize,
    pub deficit_files: usize,
    pub clean_files: usize,
    pub avg_deficit_score: f64,
    pub weighted_deficit_score: f64,
    pub avg_ldr: f64,
    pub avg_inflation: f64,
    pub avg_ddc: f64,
    pub overall_status: SlopStatus,
    pub file_results: Vec<FileAnalysis>,
}

/// Serializes an inflation score, writing the unbounded sentinel as `"inf"`
/// because JSON has no infinity.
mod unbounded_f64 {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_infinite() {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_f64(*value)
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(n),
            Raw::Text(s) if s == "inf" => Ok(f64::INFINITY),
            Raw::Text(s) => Err(de::Error::custom(format!("invalid score: {s}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_weights() {
        assert_eq!(Severity::Critical.penalty_weight(), 10.0);
        assert_eq!(Severity::High.penalty_weight(), 5.0);
        assert_eq!(Severity::Medium.penalty_weight(), 2.0);
        assert_eq!(Severity::Low.penalty_weight(), 1.0);
        assert!(Severity::Critical > Severity::Low);
    }

    #[test]
    fn test_status_serializes_screaming_case() {
        let json = serde_json::to_string(&SlopStatus::CriticalDeficit).unwrap();
        assert_eq!(json, "\"CRITICAL_DEFICIT\"");
        assert_eq!(SlopStatus::InflatedSignal.to_string(), "INFLATED_SIGNAL");
    }

    #[test]
    fn test_unbounded_inflation_score_survives_json() {
        let mut result = InflationResult::degenerate();
        result.score = f64::INFINITY;
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["score"], "inf");

        let back: InflationResult = serde_json::from_value(json).unwrap();
        assert!(back.is_unbounded());
    }
}
