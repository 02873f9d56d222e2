//! Jargon inflation
//!
//! Counts buzzwords in docstrings and comments and divides them by a
//! structural complexity baseline of the code. A term is justified, and
//! left out of the score, when one of the libraries that backs it is
//! imported and actually called.

use super::jargon::{JargonMatcher, TermMatch};
use crate::config::Config;
use crate::error::SlopResult;
use crate::models::{InflationResult, InflationStatus, JargonHit};
use crate::parsers::{
    called_roots, child_bodies, collect_imports, walk_expr, walk_stmt, SourceUnit, Visitor,
};
use globset::GlobSet;
use rustpython_parser::ast::{Comprehension, Constant, Expr, Stmt};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Every jargon term in the file's docstrings and comments, ordered by line
pub fn jargon_hits(unit: &SourceUnit, matcher: &JargonMatcher) -> Vec<JargonHit> {
    let mut hits = Vec::new();

    let docstrings = unit
        .module_docstring()
        .into_iter()
        .chain(unit.definitions().iter().filter_map(|d| d.docstring.as_ref()));
    for doc in docstrings {
        for TermMatch { word, category, offset } in matcher.find(&doc.text) {
            let line = doc.start_line + doc.text[..offset].matches('\n').count();
            hits.push(JargonHit { word, category, line });
        }
    }

    for comment in unit.comments() {
        for TermMatch { word, category, .. } in matcher.find(&comment.text) {
            hits.push(JargonHit {
                word,
                category,
                line: comment.line,
            });
        }
    }

    hits.sort_by_key(|h| h.line);
    hits
}

/// Decision points counted toward the complexity baseline
#[derive(Default)]
struct DecisionCounter {
    decisions: usize,
}

impl Visitor for DecisionCounter {
    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            // Nested functions are scored on their own
            Stmt::FunctionDef(_) | Stmt::AsyncFunctionDef(_) => return,
            Stmt::If(_) | Stmt::For(_) | Stmt::AsyncFor(_) | Stmt::While(_) => self.decisions += 1,
            Stmt::Try(t) => self.decisions += t.handlers.len(),
            Stmt::TryStar(t) => self.decisions += t.handlers.len(),
            Stmt::Match(m) => self.decisions += m.cases.len(),
            _ => {}
        }
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::BoolOp(b) => self.decisions += b.values.len().saturating_sub(1),
            Expr::IfExp(_) => self.decisions += 1,
            Expr::ListComp(c) => self.decisions += comprehension_decisions(&c.generators),
            Expr::SetComp(c) => self.decisions += comprehension_decisions(&c.generators),
            Expr::DictComp(c) => self.decisions += comprehension_decisions(&c.generators),
            Expr::GeneratorExp(c) => self.decisions += comprehension_decisions(&c.generators),
            _ => {}
        }
        walk_expr(self, expr);
    }
}

fn comprehension_decisions(generators: &[Comprehension]) -> usize {
    generators.iter().map(|g| 1 + g.ifs.len()).sum()
}

/// Collects decisions per function and outside all functions
#[derive(Default)]
struct BaselineWalker {
    baseline: usize,
}

impl Visitor for BaselineWalker {
    fn visit_stmt(&mut self, stmt: &Stmt) {
        let mut counter = DecisionCounter::default();
        match stmt {
            Stmt::FunctionDef(f) => {
                counter.visit_body(&f.body);
                self.baseline += 1 + counter.decisions;
                visit_functions_in(self, &f.body);
            }
            Stmt::AsyncFunctionDef(f) => {
                counter.visit_body(&f.body);
                self.baseline += 1 + counter.decisions;
                visit_functions_in(self, &f.body);
            }
            _ => {
                // The counter stops at function boundaries, so this is the
                // statement's own share outside any function
                counter.visit_stmt(stmt);
                self.baseline += counter.decisions;
                visit_nested_functions(self, stmt);
            }
        }
    }

    fn visit_expr(&mut self, _expr: &Expr) {}
}

/// Hand every function in `body`, however deeply nested in compound
/// statements, to the walker
fn visit_functions_in(walker: &mut BaselineWalker, body: &[Stmt]) {
    for inner in body {
        match inner {
            Stmt::FunctionDef(_) | Stmt::AsyncFunctionDef(_) => walker.visit_stmt(inner),
            _ => visit_nested_functions(walker, inner),
        }
    }
}

fn visit_nested_functions(walker: &mut BaselineWalker, stmt: &Stmt) {
    let bodies = match stmt {
        Stmt::ClassDef(c) => vec![c.body.as_slice()],
        _ => child_bodies(stmt),
    };
    for body in bodies {
        visit_functions_in(walker, body);
    }
}

/// `Σ(1 + decisions per function) + decisions outside functions`, floored at 1
pub fn complexity_baseline(tree: &[Stmt]) -> f64 {
    let mut walker = BaselineWalker::default();
    walker.visit_body(tree);
    (walker.baseline as f64).max(1.0)
}

fn is_docstring_or_ellipsis(expr: &Expr) -> bool {
    matches!(expr, Expr::Constant(c) if matches!(c.value, Constant::Str(_) | Constant::Ellipsis))
}

#[derive(Default)]
struct LogicCounter {
    statements: usize,
}

impl Visitor for LogicCounter {
    fn visit_stmt(&mut self, stmt: &Stmt) {
        let counts = !matches!(
            stmt,
            Stmt::FunctionDef(_)
                | Stmt::AsyncFunctionDef(_)
                | Stmt::ClassDef(_)
                | Stmt::Import(_)
                | Stmt::ImportFrom(_)
                | Stmt::Pass(_)
                | Stmt::Global(_)
                | Stmt::Nonlocal(_)
        ) && !matches!(stmt, Stmt::Expr(e) if is_docstring_or_ellipsis(&e.value));
        if counts {
            self.statements += 1;
        }
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, _expr: &Expr) {}
}

/// Statements that do something: everything but definitions, imports,
/// `pass`, docstrings, `...` and scope declarations
pub fn logic_statements(tree: &[Stmt]) -> usize {
    let mut counter = LogicCounter::default();
    counter.visit_body(tree);
    counter.statements
}

pub struct InflationCalculator {
    config: Arc<Config>,
    matcher: Arc<JargonMatcher>,
    config_files: GlobSet,
}

impl InflationCalculator {
    pub fn new(config: Arc<Config>, matcher: Arc<JargonMatcher>) -> SlopResult<Self> {
        let config_files = config.config_file_set()?;
        Ok(Self {
            config,
            matcher,
            config_files,
        })
    }

    fn is_config_file(&self, unit: &SourceUnit) -> bool {
        let path = unit.path();
        self.config_files.is_match(path)
            || path
                .file_name()
                .is_some_and(|name| self.config_files.is_match(name))
    }

    /// Libraries that are imported at runtime and called
    fn exercised_libraries(unit: &SourceUnit) -> BTreeSet<String> {
        let roots = called_roots(unit.tree());
        collect_imports(unit.tree())
            .into_iter()
            .filter(|r| !r.type_checking && roots.contains(&r.bound))
            .map(|r| r.tracked)
            .collect()
    }

    fn status(&self, score: f64) -> InflationStatus {
        let threshold = self.config.thresholds.inflation;
        if score > threshold.critical {
            InflationStatus::Fail
        } else if score < threshold.warning {
            InflationStatus::Pass
        } else {
            InflationStatus::Warn
        }
    }

    pub fn calculate(&self, unit: &SourceUnit) -> InflationResult {
        let exercised = Self::exercised_libraries(unit);
        let mut justified_jargon: Vec<String> = Vec::new();
        let mut jargon_details = Vec::new();

        for hit in jargon_hits(unit, &self.matcher) {
            let justified = self
                .config
                .justifications
                .get(&hit.word)
                .is_some_and(|libs| libs.iter().any(|l| exercised.contains(l)));
            if justified {
                if !justified_jargon.contains(&hit.word) {
                    justified_jargon.push(hit.word);
                }
            } else {
                jargon_details.push(hit);
            }
        }

        let jargon_count = jargon_details.len();
        let complexity_baseline = complexity_baseline(unit.tree());
        let is_config_file = self.is_config_file(unit);

        let score = if is_config_file || jargon_count == 0 {
            0.0
        } else if logic_statements(unit.tree()) == 0 {
            f64::INFINITY
        } else {
            jargon_count as f64 / complexity_baseline
        };

        debug!(
            "Inflation {}: {} jargon / baseline {:.1} = {}",
            unit.path().display(),
            jargon_count,
            complexity_baseline,
            score
        );

        InflationResult {
            score,
            jargon_count,
            complexity_baseline,
            status: self.status(score),
            jargon_details,
            justified_jargon,
            is_config_file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::parse;
    use std::path::Path;

    fn calculator() -> InflationCalculator {
        let config = Arc::new(Config::default());
        let matcher = Arc::new(JargonMatcher::new(&config.jargon).unwrap());
        InflationCalculator::new(config, matcher).unwrap()
    }

    fn calculate(path: &str, source: &str) -> InflationResult {
        let unit = parse(Path::new(path), source).unwrap();
        calculator().calculate(&unit)
    }

    #[test]
    fn test_no_jargon_passes() {
        let result = calculate("a.py", "def f(x):\n    return x + 1\n");
        assert_eq!(result.score, 0.0);
        assert_eq!(result.status, InflationStatus::Pass);
        assert!(result.jargon_details.is_empty());
    }

    #[test]
    fn test_jargon_exceeding_logic_fails() {
        let source = r#"def handler(x):
    """A robust, scalable, enterprise-grade, production-ready handler."""
    return x
"#;
        let result = calculate("h.py", source);
        assert_eq!(result.jargon_count, 4);
        assert_eq!(result.complexity_baseline, 1.0);
        assert_eq!(result.score, 4.0);
        assert_eq!(result.status, InflationStatus::Fail);
        assert_eq!(result.jargon_details[0].line, 2);
    }

    #[test]
    fn test_all_jargon_no_logic_is_unbounded() {
        let result = calculate("m.py", "\"\"\"Cutting-edge, world-class module.\"\"\"\n");
        assert!(result.is_unbounded());
        assert_eq!(result.status, InflationStatus::Fail);
    }

    #[test]
    fn test_comment_jargon_lines() {
        let result = calculate("c.py", "x = 1\n# blazing fast path\ny = 2\n");
        assert_eq!(result.jargon_count, 1);
        assert_eq!(result.jargon_details[0].line, 2);
        assert_eq!(result.jargon_details[0].category, "performance");
    }

    #[test]
    fn test_multiline_docstring_line_numbers() {
        let source = "def f():\n    \"\"\"Summary.\n\n    Truly seamless.\n    \"\"\"\n    return 1\n";
        let result = calculate("d.py", source);
        assert_eq!(result.jargon_details[0].word, "seamless");
        assert_eq!(result.jargon_details[0].line, 4);
    }

    #[test]
    fn test_called_library_justifies_term() {
        let source = r#"import torch


def model(x):
    """Neural scoring."""
    return torch.sigmoid(x)
"#;
        let result = calculate("n.py", source);
        assert_eq!(result.jargon_count, 0);
        assert_eq!(result.justified_jargon, vec!["neural".to_string()]);
    }

    #[test]
    fn test_imported_but_uncalled_library_does_not_justify() {
        let source = "import torch\n\n\ndef model(x):\n    \"\"\"Neural scoring.\"\"\"\n    return x\n";
        let result = calculate("n.py", source);
        assert_eq!(result.jargon_count, 1);
        assert!(result.justified_jargon.is_empty());
    }

    #[test]
    fn test_config_file_exempt() {
        let result = calculate(
            "project/settings.py",
            "# Robust, scalable, enterprise-grade defaults\nDEBUG = False\n",
        );
        assert!(result.is_config_file);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.status, InflationStatus::Pass);
    }

    #[test]
    fn test_complexity_baseline_counts_decisions() {
        let tree = parse(
            Path::new("b.py"),
            r#"def f(xs):
    for x in xs:
        if x and x > 1:
            return x
    return None


def g():
    return [y for y in range(3) if y]


if __name__ == "__main__":
    f([])
"#,
        )
        .unwrap();
        // f: 1 + for + if + and = 4; g: 1 + generator + filter = 3; module: if = 1
        assert_eq!(complexity_baseline(tree.tree()), 8.0);
    }

    #[test]
    fn test_class_methods_counted_in_baseline() {
        let tree = parse(
            Path::new("k.py"),
            "class K:\n    def a(self):\n        if self:\n            return 1\n\n    def b(self):\n        return 2\n",
        )
        .unwrap();
        assert_eq!(complexity_baseline(tree.tree()), 3.0);
    }

    #[test]
    fn test_functions_inside_match_cases_counted() {
        let tree = parse(
            Path::new("m.py"),
            "match cmd:\n    case \"go\":\n        def run():\n            if cmd:\n                return 1\n",
        )
        .unwrap();
        // module: one case = 1; run: 1 + if = 2
        assert_eq!(complexity_baseline(tree.tree()), 3.0);
    }

    #[test]
    fn test_logic_statements_skip_scaffolding() {
        let tree = parse(
            Path::new("s.py"),
            "\"\"\"Doc.\"\"\"\nimport os\n\n\ndef f():\n    \"\"\"Doc.\"\"\"\n    pass\n\n\ndef g():\n    ...\n",
        )
        .unwrap();
        assert_eq!(logic_statements(tree.tree()), 0);
    }
}
