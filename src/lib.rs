//! Slop detection for Python source
//!
//! Three primary metrics (logic density, jargon inflation, dependency
//! usage) and a catalog of pattern checks are combined into one deficit
//! score and a status per file. [`engine::SlopDetector`] is the entry point.

pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod models;
pub mod parsers;
pub mod patterns;
pub mod scoring;

pub use config::Config;
pub use engine::SlopDetector;
pub use error::{SlopError, SlopResult};
pub use models::{FileAnalysis, Issue, ProjectAnalysis, Severity, SlopStatus};
