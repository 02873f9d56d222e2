//! Base pattern trait and types
//!
//! This module defines the core abstractions for pattern matching:
//! - `Pattern` trait that every rule implements
//! - `PatternResult` for capturing one pattern's execution
//! - `issue_at` for building issues with the pattern's fixed metadata

use crate::models::{Axis, Issue, Severity};
use crate::parsers::SourceUnit;
use anyhow::Result;

/// Whether a pattern inspects the syntax tree or raw text/comments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    Tree,
    Text,
}

/// Result from running a single pattern
#[derive(Debug, Clone)]
pub struct PatternResult {
    pub pattern_id: String,
    pub issues: Vec<Issue>,
    pub success: bool,
    /// Error or panic message if the pattern failed
    pub error: Option<String>,
}

impl PatternResult {
    pub fn success(pattern_id: String, issues: Vec<Issue>) -> Self {
        Self {
            pattern_id,
            issues,
            success: true,
            error: None,
        }
    }

    pub fn failure(pattern_id: String, error: String) -> Self {
        Self {
            pattern_id,
            issues: Vec::new(),
            success: false,
            error: Some(error),
        }
    }
}

/// Trait for all slop patterns
///
/// A pattern is a single, independent rule. It has a stable id, a fixed
/// severity and axis, and a side-effect-free `check` that reads the parsed
/// unit and reports zero or more issues.
///
/// # Example Implementation
///
/// ```ignore
/// pub struct PrintCallPattern;
///
/// impl Pattern for PrintCallPattern {
///     fn id(&self) -> &'static str { "print_call" }
///     fn severity(&self) -> Severity { Severity::Low }
///     fn axis(&self) -> Axis { Axis::Noise }
///     fn kind(&self) -> PatternKind { PatternKind::Tree }
///
///     fn check(&self, unit: &SourceUnit) -> Result<Vec<Issue>> {
///         Ok(vec![])
///     }
/// }
/// ```
pub trait Pattern: Send + Sync {
    /// Unique, stable identifier (e.g. "bare_except")
    fn id(&self) -> &'static str;

    fn severity(&self) -> Severity;

    fn axis(&self) -> Axis;

    fn kind(&self) -> PatternKind;

    /// Run the rule against one parsed file
    fn check(&self, unit: &SourceUnit) -> Result<Vec<Issue>>;
}

/// Build an issue carrying `pattern`'s id, severity and axis
pub fn issue_at<P: Pattern + ?Sized>(
    pattern: &P,
    unit: &SourceUnit,
    line: usize,
    column: usize,
    message: &str,
    suggestion: Option<&str>,
) -> Issue {
    Issue {
        pattern_id: pattern.id().to_string(),
        severity: pattern.severity(),
        axis: pattern.axis(),
        file: unit.path().to_path_buf(),
        line,
        column,
        message: message.to_string(),
        suggestion: suggestion.map(str::to_string),
    }
}
