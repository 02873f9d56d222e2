//! Pattern registry
//!
//! Holds every pattern keyed by id in registration order. Patterns are
//! enabled or disabled while the registry is being built; once the engine
//! owns it the registry is only ever read, so the enabled set cannot change
//! in the middle of a batch.

use super::base::{Pattern, PatternResult};
use crate::models::Issue;
use crate::parsers::SourceUnit;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, error, warn};

#[derive(Default)]
pub struct PatternRegistry {
    patterns: IndexMap<&'static str, Box<dyn Pattern>>,
    disabled: HashSet<String>,
}

impl PatternRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in catalog
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for pattern in super::get_all_patterns() {
            registry.register(pattern);
        }
        registry
    }

    /// Add a pattern, replacing any earlier one with the same id
    pub fn register(&mut self, pattern: Box<dyn Pattern>) {
        if self.patterns.insert(pattern.id(), pattern).is_some() {
            debug!("Replaced pattern with duplicate id");
        }
    }

    pub fn disable(&mut self, id: &str) {
        if !self.patterns.contains_key(id) {
            warn!("Disabling unknown pattern '{}'", id);
        }
        self.disabled.insert(id.to_string());
    }

    pub fn enable(&mut self, id: &str) {
        self.disabled.remove(id);
    }

    pub fn is_enabled(&self, id: &str) -> bool {
        self.patterns.contains_key(id) && !self.disabled.contains(id)
    }

    pub fn get(&self, id: &str) -> Option<&dyn Pattern> {
        self.patterns.get(id).map(|p| p.as_ref())
    }

    /// All registered ids in registration order
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.patterns.keys().copied()
    }

    pub fn enabled(&self) -> impl Iterator<Item = &dyn Pattern> + '_ {
        self.patterns
            .values()
            .map(|p| p.as_ref())
            .filter(|p| !self.disabled.contains(p.id()))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Run one pattern, converting errors and panics into a failed result
    fn run_single(pattern: &dyn Pattern, unit: &SourceUnit) -> PatternResult {
        let id = pattern.id().to_string();
        match catch_unwind(AssertUnwindSafe(|| pattern.check(unit))) {
            Ok(Ok(issues)) => PatternResult::success(id, issues),
            Ok(Err(e)) => {
                warn!("Pattern {} failed on {}: {}", id, unit.path().display(), e);
                PatternResult::failure(id, e.to_string())
            }
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                error!("Pattern {} panicked on {}: {}", id, unit.path().display(), panic_msg);
                PatternResult::failure(id, format!("Panic: {}", panic_msg))
            }
        }
    }

    /// Run every enabled pattern independently
    pub fn run_all(&self, unit: &SourceUnit) -> Vec<PatternResult> {
        self.enabled().map(|p| Self::run_single(p, unit)).collect()
    }

    /// Issues from every enabled pattern that succeeded, in registry order
    pub fn run(&self, unit: &SourceUnit) -> Vec<Issue> {
        self.run_all(unit)
            .into_iter()
            .flat_map(|result| result.issues)
            .collect()
    }
}
