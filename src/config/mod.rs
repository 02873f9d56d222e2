//! Configuration module for the slop detector
//!
//! This module handles:
//! - Project-level configuration (slop-detector.toml / .slopconfig.*)
//! - Metric weights and thresholds
//! - Jargon, justification and heavy-library tables

pub mod defaults;
mod project_config;

pub use project_config::{
    build_glob_set, load_project_config, Config, ExceptionsConfig, MetricWeights, PatternsConfig,
    Threshold, Thresholds, CONFIG_FILE_NAMES,
};
