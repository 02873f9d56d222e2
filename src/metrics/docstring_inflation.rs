//! Docstring inflation
//!
//! Per-definition view of jargon inflation: each documented function or
//! class is measured against its own body, which catches "impressive docs,
//! empty body" definitions that a whole-file score dilutes.

use super::jargon::JargonMatcher;
use crate::models::{
    DefinitionKind, DocstringInflationFinding, DocstringInflationResult, InflationSeverity,
};
use crate::parsers::{DefKind, SourceUnit};
use std::sync::Arc;

/// Docstring lines per implementation line that marks a definition inflated
const DOC_RATIO_WARNING: f64 = 2.0;
/// Above this the docstring alone makes the definition critical
const DOC_RATIO_CRITICAL: f64 = 5.0;
/// Jargon terms per implementation line
const JARGON_DENSITY_LIMIT: f64 = 1.0;

pub(crate) fn definition_kind(kind: DefKind) -> DefinitionKind {
    match kind {
        DefKind::Class => DefinitionKind::Class,
        DefKind::Function | DefKind::AsyncFunction => DefinitionKind::Function,
    }
}

fn classify(doc_to_code_ratio: f64, jargon_density: f64) -> Option<InflationSeverity> {
    let dense = jargon_density > JARGON_DENSITY_LIMIT;
    let long = doc_to_code_ratio >= DOC_RATIO_WARNING;
    if (dense && long) || doc_to_code_ratio >= DOC_RATIO_CRITICAL {
        Some(InflationSeverity::Critical)
    } else if dense || long {
        Some(InflationSeverity::Warning)
    } else {
        None
    }
}

pub struct DocstringInflationDetector {
    matcher: Arc<JargonMatcher>,
}

impl DocstringInflationDetector {
    pub fn new(matcher: Arc<JargonMatcher>) -> Self {
        Self { matcher }
    }

    pub fn analyze(&self, unit: &SourceUnit) -> DocstringInflationResult {
        let docstrings = unit.docstring_lines();
        let mut findings = Vec::new();
        let mut total_documented = 0;

        for def in unit.definitions() {
            let Some(doc) = &def.docstring else {
                continue;
            };
            total_documented += 1;

            let implementation_lines = unit
                .implementation_lines(def.body_start_line(), def.end_line, &docstrings)
                .max(1);
            let docstring_lines = doc.line_count();
            let jargon_count = self.matcher.count(&doc.text);
            let doc_to_code_ratio = docstring_lines as f64 / implementation_lines as f64;
            let jargon_density = jargon_count as f64 / implementation_lines as f64;

            if let Some(severity) = classify(doc_to_code_ratio, jargon_density) {
                findings.push(DocstringInflationFinding {
                    name: def.qualified_name.clone(),
                    kind: definition_kind(def.kind),
                    line: def.line,
                    docstring_lines,
                    implementation_lines,
                    jargon_count,
                    doc_to_code_ratio,
                    jargon_density,
                    severity,
                });
            }
        }

        let critical_count = findings
            .iter()
            .filter(|f| f.severity == InflationSeverity::Critical)
            .count();
        let warning_count = findings.len() - critical_count;

        DocstringInflationResult {
            total_documented,
            findings,
            critical_count,
            warning_count,
        }
    }
}
