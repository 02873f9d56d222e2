//! Context jargon
//!
//! Places each unjustified jargon hit inside the innermost definition that
//! contains it and weighs the claim against that definition's real code.

use super::docstring_inflation::definition_kind;
use crate::models::{ContextJargonHit, ContextJargonResult, DefinitionKind, InflationResult};
use crate::parsers::{Definition, SourceUnit};
use std::collections::HashMap;

/// Implementation lines each claim needs behind it
const LINES_PER_CLAIM: f64 = 3.0;

const MODULE_CONTEXT: &str = "<module>";

#[derive(Default)]
pub struct ContextJargonDetector;

impl ContextJargonDetector {
    pub fn new() -> Self {
        Self
    }

    fn innermost<'a>(definitions: &'a [Definition], line: usize) -> Option<&'a Definition> {
        definitions
            .iter()
            .filter(|d| d.line <= line && line <= d.end_line)
            .min_by_key(|d| d.end_line - d.line)
    }

    pub fn analyze(&self, unit: &SourceUnit, inflation: &InflationResult) -> ContextJargonResult {
        let docstrings = unit.docstring_lines();
        let definitions = unit.definitions();

        let located: Vec<_> = inflation
            .jargon_details
            .iter()
            .map(|hit| (hit, Self::innermost(definitions, hit.line)))
            .collect();

        let mut claims: HashMap<Option<&str>, usize> = HashMap::new();
        for (_, def) in &located {
            *claims.entry(def.map(|d| d.qualified_name.as_str())).or_default() += 1;
        }

        let mut hits = Vec::with_capacity(located.len());
        for (hit, def) in located {
            let (context, context_kind, implementation_lines) = match def {
                Some(d) => (
                    d.qualified_name.clone(),
                    definition_kind(d.kind),
                    unit.implementation_lines(d.body_start_line(), d.end_line, &docstrings),
                ),
                None => (
                    MODULE_CONTEXT.to_string(),
                    DefinitionKind::Module,
                    unit.implementation_lines(1, unit.line_count(), &docstrings),
                ),
            };
            let claims_in_context = claims
                .get(&def.map(|d| d.qualified_name.as_str()))
                .copied()
                .unwrap_or(1);
            let supported = implementation_lines as f64 / claims_in_context as f64 >= LINES_PER_CLAIM;

            hits.push(ContextJargonHit {
                word: hit.word.clone(),
                category: hit.category.clone(),
                line: hit.line,
                context,
                context_kind,
                implementation_lines,
                claims_in_context,
                supported,
            });
        }

        let unsupported_count = hits.iter().filter(|h| !h.supported).count();
        ContextJargonResult {
            hits,
            unsupported_count,
        }
    }
}
