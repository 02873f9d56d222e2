//! Patterns command - list the registered patterns

use super::analyze::resolve_config;
use anyhow::Result;
use console::style;
use serde::Serialize;
use slop_detector::models::{Axis, Severity};
use slop_detector::patterns::{PatternKind, PatternRegistry};
use std::path::Path;

#[derive(Debug, Serialize)]
struct PatternInfo {
    id: &'static str,
    severity: Severity,
    axis: Axis,
    kind: &'static str,
    enabled: bool,
}

fn describe(registry: &PatternRegistry) -> Vec<PatternInfo> {
    registry
        .ids()
        .filter_map(|id| registry.get(id))
        .map(|p| PatternInfo {
            id: p.id(),
            severity: p.severity(),
            axis: p.axis(),
            kind: match p.kind() {
                PatternKind::Tree => "tree",
                PatternKind::Text => "text",
            },
            enabled: registry.is_enabled(p.id()),
        })
        .collect()
}

/// Run the patterns command
pub fn run(path: &Path, config: Option<&Path>, json: bool) -> Result<()> {
    let config = resolve_config(path, config)?;
    let mut registry = PatternRegistry::with_builtin();
    for id in &config.patterns.disabled {
        registry.disable(id);
    }

    let patterns = describe(&registry);
    if json {
        println!("{}", serde_json::to_string_pretty(&patterns)?);
        return Ok(());
    }

    for p in &patterns {
        let severity = format!("{:<9}", p.severity.to_string());
        let severity = match p.severity {
            Severity::Critical => style(severity).red().bold(),
            Severity::High => style(severity).yellow(),
            Severity::Medium => style(severity).cyan(),
            Severity::Low => style(severity).dim(),
        };
        let state = if p.enabled {
            String::new()
        } else {
            style(" (disabled)").dim().to_string()
        };
        println!(
            "{:<26} {} {:<9} {}{}",
            p.id,
            severity,
            p.axis.to_string(),
            p.kind,
            state
        );
    }
    println!("\n{} patterns", style(patterns.len()).bold());
    Ok(())
}
