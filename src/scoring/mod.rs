//! Deficit scoring
//!
//! Combines the three primary metrics and the pattern issues of a file into
//! one deficit score and a status, and rolls file results up into a project
//! verdict.
//!
//! # Scoring Formula
//!
//! ```text
//! normalized_inflation = min(inflation, 2.0) / 2.0      (inf -> 1.0)
//! base_quality = ldr × W_ldr + (1 - normalized_inflation) × W_inflation + ddc × W_ddc
//! base_deficit = 100 × (1 - base_quality)
//! pattern_penalty = min(Σ severity_weight, 50)
//! deficit = min(base_deficit + pattern_penalty, 100)
//! ```
//!
//! # Severity Weights
//!
//! - Critical: 10
//! - High: 5
//! - Medium: 2
//! - Low: 1
//!
//! # Status (first match wins)
//!
//! 1. deficit ≥ 70 → CRITICAL_DEFICIT
//! 2. ≥ 3 critical issues → CRITICAL_DEFICIT
//! 3. inflation > 1.0 → INFLATED_SIGNAL
//! 4. usage ratio < 0.50 → DEPENDENCY_NOISE
//! 5. deficit ≥ 30 → SUSPICIOUS
//! 6. otherwise → CLEAN
//!
//! Parse failures never reach this decision; they are fixed at 100 and
//! CRITICAL_DEFICIT by the engine.

mod deficit;
mod project;

pub use deficit::{
    calculate_status, normalized_inflation, pattern_penalty, StatusEvaluation,
    CRITICAL_ISSUE_LIMIT, MAX_PATTERN_PENALTY,
};
pub use project::{aggregate_project, PROJECT_CRITICAL_DEFICIT, PROJECT_SUSPICIOUS_DEFICIT};
