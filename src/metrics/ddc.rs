//! Dependency usage (DDC)
//!
//! Compares what a module imports with what it references. Imports under an
//! `if TYPE_CHECKING:` guard are compile-time only and stay out of the ratio.

use super::ratio_or;
use crate::config::Config;
use crate::models::DdcResult;
use crate::parsers::{collect_imports, collect_used_names, dunder_all, SourceUnit};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

pub fn grade(usage_ratio: f64) -> &'static str {
    match usage_ratio {
        r if r >= 0.9 => "EXCELLENT",
        r if r >= 0.7 => "GOOD",
        r if r >= 0.5 => "ACCEPTABLE",
        r if r >= 0.3 => "POOR",
        _ => "CRITICAL",
    }
}

pub struct DdcCalculator {
    config: Arc<Config>,
}

impl DdcCalculator {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    pub fn calculate(&self, unit: &SourceUnit) -> DdcResult {
        let records = collect_imports(unit.tree());

        let mut used = collect_used_names(unit.tree());
        used.extend(dunder_all(unit.tree()));

        let (guarded, runtime): (Vec<_>, Vec<_>) = records.into_iter().partition(|r| r.type_checking);

        let imported: BTreeSet<String> = runtime.iter().map(|r| r.tracked.clone()).collect();
        let type_checking_imports: BTreeSet<String> = guarded
            .into_iter()
            .map(|r| r.tracked)
            .filter(|name| !imported.contains(name))
            .collect();
        let actually_used: BTreeSet<String> = runtime
            .iter()
            .filter(|r| used.contains(&r.bound))
            .map(|r| r.tracked.clone())
            .collect();
        let unused: BTreeSet<String> = imported.difference(&actually_used).cloned().collect();
        let fake_imports: BTreeSet<String> = unused
            .iter()
            .filter(|name| self.config.is_heavy_library(name))
            .cloned()
            .collect();

        let usage_ratio = ratio_or(actually_used.len() as f64, imported.len() as f64, 1.0);

        debug!(
            "DDC {}: {}/{} imports used",
            unit.path().display(),
            actually_used.len(),
            imported.len()
        );

        DdcResult {
            imported,
            actually_used,
            unused,
            fake_imports,
            type_checking_imports,
            usage_ratio,
            grade: grade(usage_ratio).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::parse;
    use std::path::Path;

    fn calculate(source: &str) -> DdcResult {
        let unit = parse(Path::new("deps.py"), source).unwrap();
        DdcCalculator::new(Arc::new(Config::default())).calculate(&unit)
    }

    #[test]
    fn test_aliased_import_tracked_by_module() {
        let result = calculate("import numpy as np\n\nprint(np.zeros(3))\n");
        assert!(result.imported.contains("numpy"));
        assert!(result.actually_used.contains("numpy"));
        assert_eq!(result.usage_ratio, 1.0);
    }

    #[test]
    fn test_type_checking_imports_excluded() {
        let source = r#"from typing import TYPE_CHECKING

if TYPE_CHECKING:
    from torch import Tensor


def f(x: "Tensor") -> int:
    return 1
"#;
        let result = calculate(source);
        assert!(result.type_checking_imports.contains("torch"));
        assert!(!result.unused.contains("torch"));
        assert!(!result.imported.contains("torch"));
        assert_eq!(result.usage_ratio, 1.0);
    }

    #[test]
    fn test_all_used_is_excellent() {
        let result = calculate("import os\nimport json\n\nprint(os.getcwd(), json.dumps({}))\n");
        assert_eq!(result.usage_ratio, 1.0);
        assert_eq!(result.grade, "EXCELLENT");
        assert!(result.unused.is_empty());
    }

    #[test]
    fn test_unused_heavy_libraries_are_fake() {
        let source = "import torch\nimport tensorflow as tf\nimport json\n\nprint(json.dumps([]))\n";
        let result = calculate(source);
        assert!(result.fake_imports.contains("torch"));
        assert!(result.fake_imports.contains("tensorflow"));
        assert!(!result.fake_imports.contains("json"));
        assert!(result.usage_ratio < 0.5);
    }

    #[test]
    fn test_no_imports_ratio_is_one() {
        let result = calculate("x = 1\n");
        assert!(result.imported.is_empty());
        assert_eq!(result.usage_ratio, 1.0);
    }

    #[test]
    fn test_dunder_all_counts_as_use() {
        let result = calculate("from .engine import Engine\n\n__all__ = ['Engine']\n");
        assert!(result.actually_used.contains("Engine"));
        assert_eq!(result.usage_ratio, 1.0);
    }

    #[test]
    fn test_future_and_star_imports_ignored() {
        let result = calculate("from __future__ import annotations\nfrom os.path import *\n");
        assert!(result.imported.is_empty());
    }

    #[test]
    fn test_grade_bands() {
        assert_eq!(grade(0.95), "EXCELLENT");
        assert_eq!(grade(0.7), "GOOD");
        assert_eq!(grade(0.5), "ACCEPTABLE");
        assert_eq!(grade(0.3), "POOR");
        assert_eq!(grade(0.1), "CRITICAL");
    }
}
