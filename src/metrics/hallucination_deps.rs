//! Hallucinated dependencies
//!
//! Maps each unused import onto the heavy-library categories it belongs to.
//! Only names in the unused set are considered, so a heavy library that is
//! actually used is never reported.

use crate::config::Config;
use crate::models::{DdcResult, HallucinatedDependency, HallucinationDepsResult, HallucinationStatus};
use indexmap::IndexMap;
use std::sync::Arc;

/// Hallucinated imports at or above this count are critical
const CRITICAL_COUNT: usize = 3;
/// Hallucinated share of runtime imports at or above this is critical
const CRITICAL_RATIO: f64 = 0.5;

pub struct HallucinationDepsDetector {
    config: Arc<Config>,
}

impl HallucinationDepsDetector {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    pub fn analyze(&self, ddc: &DdcResult) -> HallucinationDepsResult {
        let mut hallucinated = Vec::new();
        let mut category_counts: IndexMap<String, usize> = IndexMap::new();

        for name in &ddc.unused {
            let categories = self.config.heavy_categories(name);
            if categories.is_empty() {
                continue;
            }
            for category in &categories {
                *category_counts.entry(category.clone()).or_default() += 1;
            }
            hallucinated.push(HallucinatedDependency {
                name: name.clone(),
                categories,
            });
        }

        let total_hallucinated = hallucinated.len();
        let ratio = super::ratio_or(total_hallucinated as f64, ddc.imported.len() as f64, 0.0);
        let status = if total_hallucinated == 0 {
            HallucinationStatus::Clean
        } else if total_hallucinated >= CRITICAL_COUNT || ratio >= CRITICAL_RATIO {
            HallucinationStatus::Critical
        } else {
            HallucinationStatus::Warning
        };

        HallucinationDepsResult {
            hallucinated,
            total_hallucinated,
            ratio,
            category_counts,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::DdcCalculator;
    use crate::parsers::parse;
    use std::path::Path;

    fn analyze(source: &str) -> HallucinationDepsResult {
        let config = Arc::new(Config::default());
        let unit = parse(Path::new("h.py"), source).unwrap();
        let ddc = DdcCalculator::new(config.clone()).calculate(&unit);
        HallucinationDepsDetector::new(config).analyze(&ddc)
    }

    #[test]
    fn test_unused_heavy_imports_reported_by_category() {
        let source = r#"import torch
import tensorflow as tf
from transformers import AutoModel
import numpy as np
import requests
import sqlalchemy
import json


def main():
    print(json.dumps({}))
"#;
        let result = analyze(source);
        assert_eq!(result.total_hallucinated, 6);
        assert_eq!(result.status, HallucinationStatus::Critical);
        assert_eq!(result.category_counts["ml"], 3);
        assert_eq!(result.category_counts["data"], 1);
        assert_eq!(result.category_counts["http"], 1);
        assert_eq!(result.category_counts["database"], 1);
        assert!(result.hallucinated.iter().all(|h| h.name != "json"));
    }

    #[test]
    fn test_used_heavy_library_never_reported() {
        let result = analyze("import numpy as np\n\nprint(np.ones(2))\n");
        assert_eq!(result.total_hallucinated, 0);
        assert_eq!(result.status, HallucinationStatus::Clean);
    }

    #[test]
    fn test_single_hallucination_among_many_is_warning() {
        let result = analyze(
            "import requests\nimport os\nimport sys\nimport json\n\nprint(os.sep, sys.argv, json.dumps(1))\n",
        );
        assert_eq!(result.total_hallucinated, 1);
        assert!((result.ratio - 0.25).abs() < 1e-9);
        assert_eq!(result.status, HallucinationStatus::Warning);
    }

    #[test]
    fn test_no_imports_is_clean() {
        let result = analyze("x = 1\n");
        assert_eq!(result.ratio, 0.0);
        assert_eq!(result.status, HallucinationStatus::Clean);
    }
}
