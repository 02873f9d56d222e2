//! Logic density (LDR)
//!
//! Classifies each physical line as logic, blank, comment, docstring or
//! placeholder body and reports the logic share of the file. Abstract
//! interface files are floored at a configured baseline; type stubs keep
//! their `...` bodies as logic.

use super::ratio_or;
use crate::config::Config;
use crate::models::LdrResult;
use crate::parsers::{is_stub_file, BodyShape, DefKind, Definition, LineKind, SourceUnit};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

const INTERFACE_BASES: &[&str] = &[
    "ABC",
    "abc.ABC",
    "Protocol",
    "typing.Protocol",
    "typing_extensions.Protocol",
];

/// Letter grade for a logic density score
pub fn grade(score: f64) -> &'static str {
    match score {
        s if s >= 0.85 => "S++",
        s if s >= 0.75 => "S",
        s if s >= 0.60 => "A",
        s if s >= 0.45 => "B",
        s if s >= 0.30 => "C",
        s if s >= 0.15 => "D",
        _ => "F",
    }
}

pub struct LdrCalculator {
    config: Arc<Config>,
}

impl LdrCalculator {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    pub fn calculate(&self, unit: &SourceUnit) -> LdrResult {
        let is_type_stub = is_type_stub(unit);
        let is_abc_interface = has_abstract_interface(unit.definitions());

        let docstrings = unit.docstring_lines();
        let placeholders: BTreeSet<usize> = if is_type_stub {
            BTreeSet::new()
        } else {
            unit.definitions()
                .iter()
                .filter(|d| d.is_function() && d.body_shape.is_noop())
                .filter_map(|d| d.sole_statement_lines)
                .flat_map(|(start, end)| start..=end)
                .collect()
        };

        let total_lines = unit.line_count();
        let (mut blank, mut comment, mut docstring, mut placeholder, mut logic) = (0, 0, 0, 0, 0);
        for line in 1..=total_lines {
            match unit.line_kind(line) {
                LineKind::Blank => blank += 1,
                _ if docstrings.contains(&line) => docstring += 1,
                LineKind::Comment => comment += 1,
                LineKind::Code if placeholders.contains(&line) => placeholder += 1,
                LineKind::Code => logic += 1,
            }
        }

        let mut score = ratio_or(logic as f64, total_lines as f64, 0.0);
        if is_abc_interface {
            score = score.max(self.config.exceptions.abc_interface_baseline);
        }

        debug!(
            "LDR {}: {}/{} logic lines, score {:.3}",
            unit.path().display(),
            logic,
            total_lines,
            score
        );

        LdrResult {
            logic_lines: logic,
            empty_lines: total_lines - logic,
            total_lines,
            blank_lines: blank,
            comment_lines: comment,
            docstring_lines: docstring,
            placeholder_lines: placeholder,
            score,
            grade: grade(score).to_string(),
            is_abc_interface,
            is_type_stub,
        }
    }
}

/// `.pyi` files, or modules written in the stub idiom: every function body is
/// a bare `...` without a docstring, and every function declares its return
/// type or is an `@overload` signature
pub fn is_type_stub(unit: &SourceUnit) -> bool {
    if is_stub_file(unit.path()) {
        return true;
    }
    let mut functions = unit.definitions().iter().filter(|d| d.is_function()).peekable();
    functions.peek().is_some()
        && functions.all(|f| {
            f.body_shape == BodyShape::Ellipsis
                && f.docstring.is_none()
                && (f.returns_annotated || f.is_overload())
        })
}

/// Declares an abstract base: `ABC`, `Protocol` or an `ABCMeta` metaclass
pub fn is_interface_class(class: &Definition) -> bool {
    class.bases.iter().any(|b| INTERFACE_BASES.contains(&b.as_str()))
        || class
            .metaclass
            .as_deref()
            .is_some_and(|m| m == "ABCMeta" || m.ends_with(".ABCMeta"))
}

/// True when some class declares an abstract base and every one of its
/// methods is either stub-shaped or marked `@abstractmethod`
pub fn has_abstract_interface(definitions: &[Definition]) -> bool {
    definitions
        .iter()
        .filter(|d| d.kind == DefKind::Class && is_interface_class(d))
        .any(|class| {
            let mut methods = definitions
                .iter()
                .filter(|d| d.is_function() && d.parent_class.as_deref() == Some(class.qualified_name.as_str()))
                .peekable();
            methods.peek().is_some()
                && methods.all(|m| m.body_shape.is_stub() || m.is_abstract_method())
        })
}
