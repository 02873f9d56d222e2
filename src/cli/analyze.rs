//! Analyze command - score a file or a project and emit JSON

use anyhow::{Context, Result};
use serde::Serialize;
use slop_detector::config::{load_project_config, Config};
use slop_detector::engine::SlopDetector;
use slop_detector::models::SlopStatus;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

pub struct AnalyzeOptions<'a> {
    pub path: &'a Path,
    pub config: Option<&'a Path>,
    pub workers: usize,
    pub compact: bool,
    pub project: bool,
    pub output: Option<&'a Path>,
    pub fail_on: Option<String>,
}

/// Explicit config errors are fatal; discovery falls back to defaults
pub(super) fn resolve_config(path: &Path, explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(file) => Config::from_file(file)
            .with_context(|| format!("Failed to load config from {}", file.display())),
        None => Ok(load_project_config(path)),
    }
}

fn render<T: Serialize>(value: &T, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(json)
}

fn emit(json: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(file) => std::fs::write(file, format!("{}\n", json))
            .with_context(|| format!("Failed to write {}", file.display())),
        None => {
            println!("{}", json);
            Ok(())
        }
    }
}

/// Whether a verdict meets the `--fail-on` level
fn should_fail(fail_on: Option<&str>, status: SlopStatus) -> bool {
    match fail_on {
        Some("critical") => status == SlopStatus::CriticalDeficit,
        Some("suspicious") => status != SlopStatus::Clean,
        _ => false,
    }
}

/// Run the analyze command
pub fn run(options: AnalyzeOptions<'_>) -> Result<()> {
    let start = Instant::now();
    let path = options.path;
    if !path.exists() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(options.workers)
        .build_global()
    {
        debug!("Thread pool already initialized: {}", e);
    }

    let config = resolve_config(path, options.config)?;
    let detector = SlopDetector::new(config).context("Invalid configuration")?;

    let status = if path.is_dir() || options.project {
        let project = detector.analyze_project(path)?;
        info!(
            "Analyzed {} files in {:.2}s: {}",
            project.total_files,
            start.elapsed().as_secs_f64(),
            project.overall_status
        );
        emit(&render(&project, options.compact)?, options.output)?;
        project.overall_status
    } else {
        let analysis = detector.analyze_file(path)?;
        info!(
            "Analyzed {} in {:.2}s: {}",
            path.display(),
            start.elapsed().as_secs_f64(),
            analysis.status
        );
        emit(&render(&analysis, options.compact)?, options.output)?;
        analysis.status
    };

    if should_fail(options.fail_on.as_deref(), status) {
        eprintln!(
            "Failing due to --fail-on={} threshold",
            options.fail_on.as_deref().unwrap_or_default()
        );
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_fail_levels() {
        assert!(!should_fail(None, SlopStatus::CriticalDeficit));
        assert!(should_fail(Some("critical"), SlopStatus::CriticalDeficit));
        assert!(!should_fail(Some("critical"), SlopStatus::Suspicious));
        assert!(should_fail(Some("suspicious"), SlopStatus::DependencyNoise));
        assert!(!should_fail(Some("suspicious"), SlopStatus::Clean));
    }

    #[test]
    fn test_explicit_missing_config_is_error() {
        let err = resolve_config(Path::new("."), Some(Path::new("/nonexistent/slop.toml")));
        assert!(err.is_err());
    }
}
