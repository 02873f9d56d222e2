//! Cross-language idioms
//!
//! Calls and attribute accesses that are idiomatic in JavaScript, Java,
//! Ruby, Go, C# or PHP but wrong in Python. Each rule is a narrow syntactic
//! match on one shape; nothing is inferred about the receiver's type.

use super::base::{issue_at, Pattern, PatternKind};
use crate::models::{Axis, Issue, Severity};
use crate::parsers::{walk_expr, SourceUnit, Visitor};
use anyhow::Result;
use rustpython_parser::ast::Expr;

/// The syntactic shape a cross-language rule matches
#[derive(Debug, Clone, Copy)]
pub enum Shape {
    /// `receiver.name(...)`
    MethodCall(&'static str),
    /// `receiver.name`, called or not
    Attribute(&'static str),
    /// `name(...)`
    FreeCall(&'static str),
    /// `module.name(...)` for any of the names
    QualifiedCall(&'static str, &'static [&'static str]),
}

impl Shape {
    fn matches(&self, expr: &Expr) -> bool {
        match (self, expr) {
            (Shape::MethodCall(name), Expr::Call(call)) => {
                matches!(&*call.func, Expr::Attribute(attr) if attr.attr.as_str() == *name)
            }
            (Shape::Attribute(name), Expr::Attribute(attr)) => attr.attr.as_str() == *name,
            (Shape::FreeCall(name), Expr::Call(call)) => {
                matches!(&*call.func, Expr::Name(n) if n.id.as_str() == *name)
            }
            (Shape::QualifiedCall(module, names), Expr::Call(call)) => match &*call.func {
                Expr::Attribute(attr) => {
                    names.iter().any(|n| *n == attr.attr.as_str())
                        && matches!(&*attr.value, Expr::Name(n) if n.id.as_str() == *module)
                }
                _ => false,
            },
            _ => false,
        }
    }
}

fn expr_start(expr: &Expr) -> Option<usize> {
    let range = match expr {
        Expr::Call(call) => call.range,
        Expr::Attribute(attr) => attr.range,
        _ => return None,
    };
    Some(usize::from(range.start()))
}

struct ShapeFinder {
    shape: Shape,
    offsets: Vec<usize>,
}

impl Visitor for ShapeFinder {
    fn visit_expr(&mut self, expr: &Expr) {
        if self.shape.matches(expr) {
            self.offsets.extend(expr_start(expr));
        }
        walk_expr(self, expr);
    }
}

/// One cross-language rule
pub struct CrossLanguagePattern {
    id: &'static str,
    shape: Shape,
    message: &'static str,
    suggestion: &'static str,
}

impl CrossLanguagePattern {
    pub const fn new(
        id: &'static str,
        shape: Shape,
        message: &'static str,
        suggestion: &'static str,
    ) -> Self {
        Self {
            id,
            shape,
            message,
            suggestion,
        }
    }
}

impl Pattern for CrossLanguagePattern {
    fn id(&self) -> &'static str {
        self.id
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn axis(&self) -> Axis {
        Axis::Style
    }

    fn kind(&self) -> PatternKind {
        PatternKind::Tree
    }

    fn check(&self, unit: &SourceUnit) -> Result<Vec<Issue>> {
        let mut finder = ShapeFinder {
            shape: self.shape,
            offsets: Vec::new(),
        };
        finder.visit_body(unit.tree());
        Ok(finder
            .offsets
            .into_iter()
            .map(|off| {
                issue_at(
                    self,
                    unit,
                    unit.line_of(off),
                    unit.column_of(off),
                    self.message,
                    Some(self.suggestion),
                )
            })
            .collect())
    }
}

const GO_PRINT_FUNCS: &[&str] = &["Println", "Printf", "Sprintf", "Print"];

/// The built-in cross-language rules
pub fn cross_language_patterns() -> Vec<CrossLanguagePattern> {
    vec![
        CrossLanguagePattern::new(
            "js_push",
            Shape::MethodCall("push"),
            "JavaScript array method push() used on a Python list",
            "Use list.append() instead",
        ),
        CrossLanguagePattern::new(
            "java_equals",
            Shape::MethodCall("equals"),
            "Java-style .equals() comparison",
            "Compare with == instead",
        ),
        CrossLanguagePattern::new(
            "ruby_each",
            Shape::MethodCall("each"),
            "Ruby-style .each iteration",
            "Use a for loop or a comprehension",
        ),
        CrossLanguagePattern::new(
            "go_print",
            Shape::QualifiedCall("fmt", GO_PRINT_FUNCS),
            "Go fmt printing call",
            "Use print() or an f-string",
        ),
        CrossLanguagePattern::new(
            "csharp_length",
            Shape::Attribute("Length"),
            "C#-style .Length property",
            "Use len() instead",
        ),
        CrossLanguagePattern::new(
            "php_strlen",
            Shape::FreeCall("strlen"),
            "PHP strlen() function",
            "Use len() instead",
        ),
        CrossLanguagePattern::new(
            "js_length",
            Shape::Attribute("length"),
            "JavaScript-style .length property",
            "Use len() instead",
        ),
        CrossLanguagePattern::new(
            "js_foreach",
            Shape::MethodCall("forEach"),
            "JavaScript forEach() iteration",
            "Use a for loop or a comprehension",
        ),
        CrossLanguagePattern::new(
            "java_tostring",
            Shape::MethodCall("toString"),
            "Java-style .toString() conversion",
            "Use str() instead",
        ),
        CrossLanguagePattern::new(
            "java_isempty",
            Shape::MethodCall("isEmpty"),
            "Java-style .isEmpty() check",
            "Use `not collection` instead",
        ),
        CrossLanguagePattern::new(
            "csharp_tolower",
            Shape::MethodCall("ToLower"),
            "C#-style .ToLower() call",
            "Use str.lower() instead",
        ),
        CrossLanguagePattern::new(
            "csharp_contains",
            Shape::MethodCall("Contains"),
            "C#-style .Contains() membership test",
            "Use the `in` operator instead",
        ),
        CrossLanguagePattern::new(
            "php_array_push",
            Shape::FreeCall("array_push"),
            "PHP array_push() function",
            "Use list.append() instead",
        ),
        CrossLanguagePattern::new(
            "php_explode",
            Shape::FreeCall("explode"),
            "PHP explode() function",
            "Use str.split() instead",
        ),
        CrossLanguagePattern::new(
            "php_implode",
            Shape::FreeCall("implode"),
            "PHP implode() function",
            "Use str.join() instead",
        ),
    ]
}
