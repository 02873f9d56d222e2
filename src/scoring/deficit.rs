//! Per-file deficit score and status

use crate::config::Config;
use crate::models::{DdcResult, InflationResult, Issue, LdrResult, Severity, SlopStatus};

/// Pattern penalties never add more than this many points
pub const MAX_PATTERN_PENALTY: f64 = 50.0;

/// Number of critical issues that forces CRITICAL_DEFICIT on its own
pub const CRITICAL_ISSUE_LIMIT: usize = 3;

/// Upper end of the inflation range before normalization
const INFLATION_CAP: f64 = 2.0;

/// Deficit score, status and the human-readable threshold crossings
#[derive(Debug, Clone, PartialEq)]
pub struct StatusEvaluation {
    pub deficit_score: f64,
    pub status: SlopStatus,
    pub warnings: Vec<String>,
}

/// Sum of severity weights over all issues, capped
pub fn pattern_penalty(issues: &[Issue]) -> f64 {
    let total: f64 = issues.iter().map(|i| i.severity.penalty_weight()).sum();
    total.min(MAX_PATTERN_PENALTY)
}

/// Inflation mapped into [0, 1]; the unbounded sentinel is the maximum
pub fn normalized_inflation(score: f64) -> f64 {
    if score.is_infinite() {
        return 1.0;
    }
    score.clamp(0.0, INFLATION_CAP) / INFLATION_CAP
}

fn deficit_score(ldr: &LdrResult, inflation: &InflationResult, ddc: &DdcResult, issues: &[Issue], config: &Config) -> f64 {
    let w = &config.weights;
    let base_quality = ldr.score * w.ldr
        + (1.0 - normalized_inflation(inflation.score)) * w.inflation
        + ddc.usage_ratio * w.ddc;
    let base_deficit = (100.0 * (1.0 - base_quality)).max(0.0);
    (base_deficit + pattern_penalty(issues)).min(100.0)
}

fn count_severity(issues: &[Issue], severity: Severity) -> usize {
    issues.iter().filter(|i| i.severity == severity).count()
}

/// Threshold crossings, independent of the status decision
fn collect_warnings(
    ldr: &LdrResult,
    inflation: &InflationResult,
    ddc: &DdcResult,
    issues: &[Issue],
    config: &Config,
) -> Vec<String> {
    let t = &config.thresholds;
    let mut warnings = Vec::new();

    if ldr.score < t.ldr.critical {
        warnings.push(format!("CRITICAL: Logic density {:.2} is very low", ldr.score));
    } else if ldr.score < t.ldr.warning {
        warnings.push(format!("WARNING: Logic density {:.2} is low", ldr.score));
    }

    if inflation.is_unbounded() {
        warnings.push("CRITICAL: Jargon with no supporting logic".to_string());
    } else if inflation.score > t.inflation.critical {
        warnings.push(format!("CRITICAL: Jargon inflation {:.2} exceeds the code", inflation.score));
    } else if inflation.score > t.inflation.warning {
        warnings.push(format!("WARNING: Jargon inflation {:.2} is elevated", inflation.score));
    }

    if ddc.usage_ratio < t.ddc.critical {
        warnings.push(format!("CRITICAL: Only {:.0}% of imports are used", ddc.usage_ratio * 100.0));
    } else if ddc.usage_ratio < t.ddc.warning {
        warnings.push(format!("WARNING: {:.0}% of imports are used", ddc.usage_ratio * 100.0));
    }

    if !ddc.fake_imports.is_empty() {
        let names: Vec<&str> = ddc.fake_imports.iter().map(String::as_str).collect();
        warnings.push(format!("FAKE IMPORTS: {}", names.join(", ")));
    }

    let critical = count_severity(issues, Severity::Critical);
    let high = count_severity(issues, Severity::High);
    if critical > 0 || high > 0 {
        warnings.push(format!("PATTERNS: {} critical, {} high", critical, high));
    }

    warnings
}

/// Score a parsed file and decide its status
pub fn calculate_status(
    ldr: &LdrResult,
    inflation: &InflationResult,
    ddc: &DdcResult,
    issues: &[Issue],
    config: &Config,
) -> StatusEvaluation {
    let t = &config.thresholds;
    let deficit = deficit_score(ldr, inflation, ddc, issues, config);

    let status = if deficit >= t.deficit.critical {
        SlopStatus::CriticalDeficit
    } else if count_severity(issues, Severity::Critical) >= CRITICAL_ISSUE_LIMIT {
        SlopStatus::CriticalDeficit
    } else if inflation.score > t.inflation.critical {
        SlopStatus::InflatedSignal
    } else if ddc.usage_ratio < t.ddc.critical {
        SlopStatus::DependencyNoise
    } else if deficit >= t.deficit.warning {
        SlopStatus::Suspicious
    } else {
        SlopStatus::Clean
    };

    StatusEvaluation {
        deficit_score: deficit,
        status,
        warnings: collect_warnings(ldr, inflation, ddc, issues, config),
    }
}
