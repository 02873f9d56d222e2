//! Metric calculators
//!
//! The three primary metrics (logic density, jargon inflation, dependency
//! usage) each read a parsed [`SourceUnit`](crate::parsers::SourceUnit)
//! independently. The secondary correlators refine one or two primary
//! results into narrower, localized findings.

pub mod context_jargon;
pub mod ddc;
pub mod docstring_inflation;
pub mod hallucination_deps;
pub mod inflation;
pub mod jargon;
pub mod ldr;

pub use context_jargon::ContextJargonDetector;
pub use ddc::DdcCalculator;
pub use docstring_inflation::DocstringInflationDetector;
pub use hallucination_deps::HallucinationDepsDetector;
pub use inflation::InflationCalculator;
pub use jargon::JargonMatcher;
pub use ldr::LdrCalculator;

/// `numerator / denominator`, or `default` when the denominator is zero
pub(crate) fn ratio_or(numerator: f64, denominator: f64, default: f64) -> f64 {
    if denominator == 0.0 {
        default
    } else {
        numerator / denominator
    }
}
