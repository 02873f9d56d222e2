//! Analysis engine
//!
//! `SlopDetector` owns the validated configuration, every calculator and the
//! pattern registry. All of it is fixed at construction and only read while
//! analyzing, so one detector can score many files in parallel.
//!
//! A file is parsed exactly once; the metrics, the correlators and the
//! patterns all read the same `SourceUnit`.

use crate::config::Config;
use crate::error::{SlopError, SlopResult};
use crate::metrics::{
    ContextJargonDetector, DdcCalculator, DocstringInflationDetector, HallucinationDepsDetector,
    InflationCalculator, JargonMatcher, LdrCalculator,
};
use crate::models::{DdcResult, FileAnalysis, InflationResult, LdrResult, ProjectAnalysis, SlopStatus};
use crate::parsers::{is_python_file, ParseError, SourceUnit};
use crate::patterns::PatternRegistry;
use crate::scoring::{aggregate_project, calculate_status};
use globset::GlobSet;
use ignore::WalkBuilder;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct SlopDetector {
    config: Arc<Config>,
    registry: PatternRegistry,
    ldr: LdrCalculator,
    inflation: InflationCalculator,
    ddc: DdcCalculator,
    docstring_inflation: DocstringInflationDetector,
    hallucination_deps: HallucinationDepsDetector,
    context_jargon: ContextJargonDetector,
    ignore: GlobSet,
}

impl SlopDetector {
    /// Detector with the built-in pattern catalog minus `patterns.disabled`
    pub fn new(config: Config) -> SlopResult<Self> {
        let mut registry = PatternRegistry::with_builtin();
        for id in &config.patterns.disabled {
            registry.disable(id);
        }
        Self::with_registry(config, registry)
    }

    /// Detector running exactly the patterns of `registry`
    pub fn with_registry(config: Config, registry: PatternRegistry) -> SlopResult<Self> {
        config.validate()?;
        let config = Arc::new(config);
        let matcher = Arc::new(JargonMatcher::new(&config.jargon)?);

        Ok(Self {
            ldr: LdrCalculator::new(Arc::clone(&config)),
            inflation: InflationCalculator::new(Arc::clone(&config), Arc::clone(&matcher))?,
            ddc: DdcCalculator::new(Arc::clone(&config)),
            docstring_inflation: DocstringInflationDetector::new(matcher),
            hallucination_deps: HallucinationDepsDetector::new(Arc::clone(&config)),
            context_jargon: ContextJargonDetector::new(),
            ignore: config.ignore_set()?,
            registry,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    /// Analyze in-memory source. Never fails: unparseable source becomes a
    /// critical result.
    pub fn analyze_source(&self, path: &Path, content: &str) -> FileAnalysis {
        match SourceUnit::parse(path, content) {
            Ok(unit) => self.analyze_unit(&unit),
            Err(e) => {
                debug!("Parse error in {}: {}", path.display(), e);
                Self::parse_failure(path, e)
            }
        }
    }

    /// Read and analyze one file
    pub fn analyze_file(&self, path: &Path) -> SlopResult<FileAnalysis> {
        let content = std::fs::read_to_string(path).map_err(|source| SlopError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.analyze_source(path, &content))
    }

    fn analyze_unit(&self, unit: &SourceUnit) -> FileAnalysis {
        let ldr = self.ldr.calculate(unit);
        let inflation = self.inflation.calculate(unit);
        let ddc = self.ddc.calculate(unit);
        let pattern_issues = self.registry.run(unit);

        let evaluation = calculate_status(&ldr, &inflation, &ddc, &pattern_issues, &self.config);

        let docstring_inflation = self.docstring_inflation.analyze(unit);
        let hallucination_deps = self.hallucination_deps.analyze(&ddc);
        let context_jargon = self.context_jargon.analyze(unit, &inflation);

        FileAnalysis {
            file_path: unit.path().to_path_buf(),
            ldr,
            inflation,
            ddc,
            deficit_score: evaluation.deficit_score,
            status: evaluation.status,
            warnings: evaluation.warnings,
            pattern_issues,
            docstring_inflation: Some(docstring_inflation),
            hallucination_deps: Some(hallucination_deps),
            context_jargon: Some(context_jargon),
            parse_error: None,
        }
    }

    fn parse_failure(path: &Path, error: ParseError) -> FileAnalysis {
        FileAnalysis {
            file_path: path.to_path_buf(),
            ldr: LdrResult::degenerate(),
            inflation: InflationResult::degenerate(),
            ddc: DdcResult::degenerate(),
            deficit_score: 100.0,
            status: SlopStatus::CriticalDeficit,
            warnings: vec![format!("Parse error: {}", error)],
            pattern_issues: Vec::new(),
            docstring_inflation: None,
            hallucination_deps: None,
            context_jargon: None,
            parse_error: Some(error),
        }
    }

    fn is_ignored(&self, root: &Path, path: &Path) -> bool {
        let relative = path.strip_prefix(root).unwrap_or(path);
        self.ignore.is_match(relative)
    }

    /// Python files under `root`, honoring `.gitignore` and the `ignore` globs
    fn collect_files(&self, root: &Path) -> Vec<PathBuf> {
        let walker = WalkBuilder::new(root)
            .hidden(true)
            .git_ignore(true)
            .git_global(false)
            .git_exclude(true)
            .build();

        let mut files: Vec<PathBuf> = walker
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .map(|entry| entry.into_path())
            .filter(|path| path.is_file() && is_python_file(path))
            .filter(|path| !self.is_ignored(root, path))
            .collect();
        files.sort();
        files
    }

    /// Analyze every Python file under `root` and roll the results up.
    ///
    /// All files are read before analysis starts. Files that cannot be read
    /// are logged and left out of the aggregate.
    pub fn analyze_project(&self, root: &Path) -> SlopResult<ProjectAnalysis> {
        let files = if root.is_file() {
            vec![root.to_path_buf()]
        } else {
            self.collect_files(root)
        };
        info!("Analyzing {} Python files under {}", files.len(), root.display());

        let sources: Vec<(PathBuf, String)> = files
            .into_iter()
            .filter_map(|path| match std::fs::read_to_string(&path) {
                Ok(content) => Some((path, content)),
                Err(e) => {
                    warn!("Failed to read {}: {}", path.display(), e);
                    None
                }
            })
            .collect();

        let mut results: Vec<FileAnalysis> = sources
            .par_iter()
            .map(|(path, content)| self.analyze_source(path, content))
            .collect();
        results.sort_by(|a, b| a.file_path.cmp(&b.file_path));

        Ok(aggregate_project(root, results, &self.config))
    }
}
