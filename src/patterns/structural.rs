//! Structural patterns
//!
//! Tree-based rules about exception handling, argument defaults, imports,
//! module state and dynamic code execution.

use super::base::{issue_at, Pattern, PatternKind};
use crate::models::{Axis, Issue, Severity};
use crate::parsers::{walk_except_handler, walk_expr, walk_stmt, SourceUnit, Visitor};
use anyhow::Result;
use rustpython_parser::ast::{Arguments, Constant, ExceptHandler, Expr, Stmt};
use rustpython_parser::text_size::TextRange;

fn start(range: TextRange) -> usize {
    usize::from(range.start())
}

/// Byte offsets of except handlers satisfying a predicate
struct HandlerFinder<F> {
    predicate: F,
    offsets: Vec<usize>,
}

impl<F: Fn(&ExceptHandler) -> bool> Visitor for HandlerFinder<F> {
    fn visit_except_handler(&mut self, handler: &ExceptHandler) {
        if (self.predicate)(handler) {
            let ExceptHandler::ExceptHandler(h) = handler;
            self.offsets.push(start(h.range));
        }
        walk_except_handler(self, handler);
    }
}

fn find_handlers<F: Fn(&ExceptHandler) -> bool>(unit: &SourceUnit, predicate: F) -> Vec<usize> {
    let mut finder = HandlerFinder {
        predicate,
        offsets: Vec::new(),
    };
    finder.visit_body(unit.tree());
    finder.offsets
}

fn issues_at_offsets<P: Pattern>(
    pattern: &P,
    unit: &SourceUnit,
    offsets: Vec<usize>,
    message: &str,
    suggestion: &str,
) -> Vec<Issue> {
    offsets
        .into_iter()
        .map(|off| {
            issue_at(
                pattern,
                unit,
                unit.line_of(off),
                unit.column_of(off),
                message,
                Some(suggestion),
            )
        })
        .collect()
}

/// `except:` with no exception type
pub struct BareExceptPattern;

impl Pattern for BareExceptPattern {
    fn id(&self) -> &'static str {
        "bare_except"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn axis(&self) -> Axis {
        Axis::Quality
    }

    fn kind(&self) -> PatternKind {
        PatternKind::Tree
    }

    fn check(&self, unit: &SourceUnit) -> Result<Vec<Issue>> {
        let offsets = find_handlers(unit, |handler| {
            let ExceptHandler::ExceptHandler(h) = handler;
            h.type_.is_none()
        });
        Ok(issues_at_offsets(
            self,
            unit,
            offsets,
            "Using bare except catches everything, including SystemExit and KeyboardInterrupt",
            "Catch a specific exception, e.g. `except ValueError:`",
        ))
    }
}

/// A handler whose whole body is `pass` or `...`
pub struct EmptyExceptPattern;

impl Pattern for EmptyExceptPattern {
    fn id(&self) -> &'static str {
        "empty_except"
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn axis(&self) -> Axis {
        Axis::Quality
    }

    fn kind(&self) -> PatternKind {
        PatternKind::Tree
    }

    fn check(&self, unit: &SourceUnit) -> Result<Vec<Issue>> {
        let offsets = find_handlers(unit, |handler| {
            let ExceptHandler::ExceptHandler(h) = handler;
            match h.body.as_slice() {
                [Stmt::Pass(_)] => true,
                [Stmt::Expr(e)] => {
                    matches!(&*e.value, Expr::Constant(c) if matches!(c.value, Constant::Ellipsis))
                }
                _ => false,
            }
        });
        Ok(issues_at_offsets(
            self,
            unit,
            offsets,
            "Empty exception handler silently swallows errors",
            "Handle the error, log it, or re-raise",
        ))
    }
}

#[derive(Default)]
struct MutableDefaultFinder {
    /// (offset, literal kind)
    found: Vec<(usize, &'static str)>,
}

impl MutableDefaultFinder {
    fn check_arguments(&mut self, args: &Arguments) {
        let defaults = args
            .posonlyargs
            .iter()
            .chain(args.args.iter())
            .chain(args.kwonlyargs.iter())
            .filter_map(|a| a.default.as_deref());
        for default in defaults {
            let hit = match default {
                Expr::List(l) => Some((start(l.range), "list")),
                Expr::ListComp(l) => Some((start(l.range), "list")),
                Expr::Dict(d) => Some((start(d.range), "dict")),
                Expr::DictComp(d) => Some((start(d.range), "dict")),
                Expr::Set(s) => Some((start(s.range), "set")),
                Expr::SetComp(s) => Some((start(s.range), "set")),
                _ => None,
            };
            self.found.extend(hit);
        }
    }
}

impl Visitor for MutableDefaultFinder {
    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::FunctionDef(f) => self.check_arguments(&f.args),
            Stmt::AsyncFunctionDef(f) => self.check_arguments(&f.args),
            _ => {}
        }
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        if let Expr::Lambda(lambda) = expr {
            self.check_arguments(&lambda.args);
        }
        walk_expr(self, expr);
    }
}

/// A parameter default that is a mutable literal
pub struct MutableDefaultArgPattern;

impl Pattern for MutableDefaultArgPattern {
    fn id(&self) -> &'static str {
        "mutable_default_arg"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn axis(&self) -> Axis {
        Axis::Quality
    }

    fn kind(&self) -> PatternKind {
        PatternKind::Tree
    }

    fn check(&self, unit: &SourceUnit) -> Result<Vec<Issue>> {
        let mut finder = MutableDefaultFinder::default();
        finder.visit_body(unit.tree());
        Ok(finder
            .found
            .into_iter()
            .map(|(off, kind)| {
                issue_at(
                    self,
                    unit,
                    unit.line_of(off),
                    unit.column_of(off),
                    &format!("Mutable default argument ({kind}) is shared across calls"),
                    Some("Default to None and create the value inside the function"),
                )
            })
            .collect())
    }
}

/// `from module import *`
pub struct StarImportPattern;

impl Pattern for StarImportPattern {
    fn id(&self) -> &'static str {
        "star_import"
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn axis(&self) -> Axis {
        Axis::Noise
    }

    fn kind(&self) -> PatternKind {
        PatternKind::Tree
    }

    fn check(&self, unit: &SourceUnit) -> Result<Vec<Issue>> {
        #[derive(Default)]
        struct Finder(Vec<usize>);

        impl Visitor for Finder {
            fn visit_stmt(&mut self, stmt: &Stmt) {
                if let Stmt::ImportFrom(import) = stmt {
                    if import.names.iter().any(|a| a.name.as_str() == "*") {
                        self.0.push(start(import.range));
                    }
                }
                walk_stmt(self, stmt);
            }
        }

        let mut finder = Finder::default();
        finder.visit_body(unit.tree());
        Ok(issues_at_offsets(
            self,
            unit,
            finder.0,
            "Wildcard import pollutes the namespace",
            "Import the names you use explicitly",
        ))
    }
}

#[derive(Default)]
struct GlobalFinder {
    function_depth: usize,
    offsets: Vec<usize>,
}

impl Visitor for GlobalFinder {
    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::FunctionDef(_) | Stmt::AsyncFunctionDef(_) => {
                self.function_depth += 1;
                walk_stmt(self, stmt);
                self.function_depth -= 1;
            }
            Stmt::Global(g) if self.function_depth > 0 => {
                self.offsets.push(start(g.range));
            }
            _ => walk_stmt(self, stmt),
        }
    }
}

/// `global` declarations inside a function
pub struct GlobalStatementPattern;

impl Pattern for GlobalStatementPattern {
    fn id(&self) -> &'static str {
        "global_statement"
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn axis(&self) -> Axis {
        Axis::Quality
    }

    fn kind(&self) -> PatternKind {
        PatternKind::Tree
    }

    fn check(&self, unit: &SourceUnit) -> Result<Vec<Issue>> {
        let mut finder = GlobalFinder::default();
        finder.visit_body(unit.tree());
        Ok(issues_at_offsets(
            self,
            unit,
            finder.offsets,
            "Function rebinds module-level state through a global declaration",
            "Pass state explicitly or encapsulate it in a class",
        ))
    }
}

/// Calls to the builtin `exec` or `eval`
pub struct ExecEvalPattern;

impl Pattern for ExecEvalPattern {
    fn id(&self) -> &'static str {
        "exec_eval_usage"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn axis(&self) -> Axis {
        Axis::Security
    }

    fn kind(&self) -> PatternKind {
        PatternKind::Tree
    }

    fn check(&self, unit: &SourceUnit) -> Result<Vec<Issue>> {
        #[derive(Default)]
        struct Finder(Vec<(usize, String)>);

        impl Visitor for Finder {
            fn visit_expr(&mut self, expr: &Expr) {
                if let Expr::Call(call) = expr {
                    if let Expr::Name(name) = &*call.func {
                        if matches!(name.id.as_str(), "exec" | "eval") {
                            self.0.push((start(call.range), name.id.to_string()));
                        }
                    }
                }
                walk_expr(self, expr);
            }
        }

        let mut finder = Finder::default();
        finder.visit_body(unit.tree());
        Ok(finder
            .0
            .into_iter()
            .map(|(off, name)| {
                issue_at(
                    self,
                    unit,
                    unit.line_of(off),
                    unit.column_of(off),
                    &format!("{name}() executes arbitrary code"),
                    Some("Use ast.literal_eval, a dispatch table or explicit parsing"),
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn check(pattern: &dyn Pattern, source: &str) -> Vec<Issue> {
        let unit = SourceUnit::parse(Path::new("s.py"), source).unwrap();
        pattern.check(&unit).unwrap()
    }

    #[test]
    fn test_bare_except() {
        let source = "try:\n    run()\nexcept:\n    pass\n";
        let issues = check(&BareExceptPattern, source);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 3);
        assert_eq!(issues[0].severity, Severity::Critical);
        assert!(issues[0].message.to_lowercase().contains("bare except"));
    }

    #[test]
    fn test_typed_except_is_fine() {
        let source = "try:\n    run()\nexcept ValueError:\n    handle()\n";
        assert!(check(&BareExceptPattern, source).is_empty());
        assert!(check(&EmptyExceptPattern, source).is_empty());
    }

    #[test]
    fn test_empty_except() {
        let source = "try:\n    run()\nexcept ValueError:\n    pass\nexcept KeyError:\n    ...\n";
        let issues = check(&EmptyExceptPattern, source);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[1].line, 5);
    }

    #[test]
    fn test_nested_handlers_found() {
        let source = "def f():\n    try:\n        a()\n    except:\n        try:\n            b()\n        except:\n            pass\n";
        assert_eq!(check(&BareExceptPattern, source).len(), 2);
    }

    #[test]
    fn test_mutable_defaults() {
        let source = "def f(a, b=[], *, c={}, d=None, e=(), g={1}):\n    return a\n\nh = lambda x=[]: x\n";
        let issues = check(&MutableDefaultArgPattern, source);
        assert_eq!(issues.len(), 4);
        assert!(issues[0].message.contains("list"));
        assert!(issues[1].message.contains("dict"));
        assert!(issues[2].message.contains("set"));
        assert_eq!(issues[3].line, 4);
    }

    #[test]
    fn test_star_import() {
        let issues = check(&StarImportPattern, "from os.path import *\nfrom os import sep\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 1);
    }

    #[test]
    fn test_global_only_inside_functions() {
        let source = "global counter\ncounter = 0\n\ndef bump():\n    global counter\n    counter += 1\n";
        let issues = check(&GlobalStatementPattern, source);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 5);
        assert_eq!(issues[0].column, 4);
    }

    #[test]
    fn test_exec_eval() {
        let source = "eval(expr)\nexec(code)\nobj.eval(x)\n";
        let issues = check(&ExecEvalPattern, source);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].axis, Axis::Security);
        assert!(issues[1].message.starts_with("exec()"));
    }
}
