//! Python source units
//!
//! A [`SourceUnit`] is the immutable product of parsing one file: the
//! syntax tree, the raw text, the comments recovered from the token
//! stream, a per-line map and the list of definitions with their body
//! shape. Every calculator and pattern reads the same unit, so the file
//! is parsed exactly once.

use line_numbers::LinePositions;
use super::visit::child_bodies;
use rustpython_parser::ast::{Constant, Expr, Mod, Ranged, Stmt, StmtExpr, Suite};
use rustpython_parser::text_size::TextRange;
use rustpython_parser::{lexer::lex, parse, Mode, Tok};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A syntax error reported by the parser
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message} (line {line}, column {column})")]
pub struct ParseError {
    /// 1-based line
    pub line: usize,
    /// 0-based byte column
    pub column: usize,
    pub message: String,
}

/// What a single physical line contains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Comment,
    Code,
}

/// A `#` comment recovered from the token stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// 1-based line
    pub line: usize,
    pub column: usize,
    /// Comment text including the leading `#`
    pub text: String,
}

/// A docstring and the lines it spans (1-based, inclusive)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Docstring {
    pub text: String,
    pub start_line: usize,
    pub end_line: usize,
}

impl Docstring {
    pub fn line_count(&self) -> usize {
        self.end_line + 1 - self.start_line
    }
}

/// Shape of a function body once a leading docstring is stripped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyShape {
    /// Exactly one `pass`
    Pass,
    /// Exactly one `...` expression
    Ellipsis,
    /// Nothing but the docstring
    DocOnly,
    /// Exactly one `raise NotImplementedError[...]`
    Raises,
    /// Exactly one `return` or `return None`
    ReturnsNone,
    Real,
}

impl BodyShape {
    /// Pass or ellipsis: the two shapes the density calculator and the
    /// placeholder patterns treat as no-op bodies
    pub fn is_noop(&self) -> bool {
        matches!(self, BodyShape::Pass | BodyShape::Ellipsis)
    }

    /// Any shape that does not implement anything
    pub fn is_stub(&self) -> bool {
        !matches!(self, BodyShape::Real)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefKind {
    Function,
    AsyncFunction,
    Class,
}

/// A function, async function or class definition, nested ones included
#[derive(Debug, Clone)]
pub struct Definition {
    pub name: String,
    /// Dotted path through enclosing definitions, e.g. `Service.run`
    pub qualified_name: String,
    pub kind: DefKind,
    /// Line of the `def`/`class` keyword (after decorators)
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub docstring: Option<Docstring>,
    /// Line of the first statement after the docstring
    pub body_line: usize,
    /// Classification of the body; `Real` for classes
    pub body_shape: BodyShape,
    /// Lines of the statement left after stripping the docstring, when the
    /// body is a single statement
    pub sole_statement_lines: Option<(usize, usize)>,
    pub decorators: Vec<String>,
    /// `-> T` present on a function
    pub returns_annotated: bool,
    /// Base class names for classes, as written (`abc.ABC`, `Protocol`)
    pub bases: Vec<String>,
    /// `metaclass=` keyword for classes
    pub metaclass: Option<String>,
    /// Qualified name of the class directly containing a method
    pub parent_class: Option<String>,
}

impl Definition {
    pub fn is_function(&self) -> bool {
        matches!(self.kind, DefKind::Function | DefKind::AsyncFunction)
    }

    pub fn is_abstract_method(&self) -> bool {
        self.decorators
            .iter()
            .any(|d| d == "abstractmethod" || d.ends_with(".abstractmethod"))
    }

    pub fn is_overload(&self) -> bool {
        self.decorators
            .iter()
            .any(|d| d == "overload" || d.ends_with(".overload"))
    }

    /// First line of the body after the header and the docstring
    pub fn body_start_line(&self) -> usize {
        self.body_line
    }
}

/// Parsed file shared read-only by every calculator and pattern
pub struct SourceUnit {
    path: PathBuf,
    content: String,
    tree: Suite,
    positions: LinePositions,
    comments: Vec<Comment>,
    line_kinds: Vec<LineKind>,
    module_docstring: Option<Docstring>,
    definitions: Vec<Definition>,
}

impl std::fmt::Debug for SourceUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceUnit")
            .field("path", &self.path)
            .field("lines", &self.line_kinds.len())
            .field("definitions", &self.definitions.len())
            .finish()
    }
}

impl SourceUnit {
    /// Parse Python source into a unit, or report where it failed
    pub fn parse(path: &Path, content: &str) -> Result<Self, ParseError> {
        let source_path = path.to_string_lossy();
        let module = parse(content, Mode::Module, &source_path).map_err(|e| {
            let offset = usize::from(e.offset);
            let (line, column) = offset_to_line_col(content, offset);
            ParseError {
                line,
                column,
                message: e.error.to_string(),
            }
        })?;

        let tree = match module {
            Mod::Module(m) => m.body,
            _ => Vec::new(),
        };

        let positions = LinePositions::from(content);
        let mut unit = Self {
            path: path.to_path_buf(),
            content: content.to_string(),
            tree,
            positions,
            comments: Vec::new(),
            line_kinds: Vec::new(),
            module_docstring: None,
            definitions: Vec::new(),
        };

        let (comments, line_kinds) = scan_tokens(&unit);
        unit.comments = comments;
        unit.line_kinds = line_kinds;
        unit.module_docstring = docstring_of(&unit, &unit.tree);

        let mut definitions = Vec::new();
        collect_definitions(&unit, &unit.tree, "", None, &mut definitions);
        unit.definitions = definitions;

        Ok(unit)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn tree(&self) -> &Suite {
        &self.tree
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn module_docstring(&self) -> Option<&Docstring> {
        self.module_docstring.as_ref()
    }

    pub fn definitions(&self) -> &[Definition] {
        &self.definitions
    }

    /// Every line covered by the module docstring or a definition docstring
    pub fn docstring_lines(&self) -> BTreeSet<usize> {
        self.module_docstring
            .iter()
            .chain(self.definitions.iter().filter_map(|d| d.docstring.as_ref()))
            .flat_map(|doc| doc.start_line..=doc.end_line)
            .collect()
    }

    /// Code lines in an inclusive range that are not part of a docstring
    pub fn implementation_lines(&self, start: usize, end: usize, docstrings: &BTreeSet<usize>) -> usize {
        (start..=end)
            .filter(|l| self.line_kind(*l) == LineKind::Code && !docstrings.contains(l))
            .count()
    }

    /// Number of physical lines
    pub fn line_count(&self) -> usize {
        self.line_kinds.len()
    }

    /// Kind of a 1-based line; lines past the end read as blank
    pub fn line_kind(&self, line: usize) -> LineKind {
        line.checked_sub(1)
            .and_then(|i| self.line_kinds.get(i))
            .copied()
            .unwrap_or(LineKind::Blank)
    }

    /// Code lines in an inclusive 1-based range
    pub fn code_lines_between(&self, start: usize, end: usize) -> usize {
        (start..=end)
            .filter(|&l| self.line_kind(l) == LineKind::Code)
            .count()
    }

    /// 1-based line of a byte offset
    pub fn line_of(&self, offset: usize) -> usize {
        if self.content.is_empty() {
            return 1;
        }
        let clamped = offset.min(self.content.len() - 1);
        self.positions.from_offset(clamped).as_usize() + 1
    }

    /// 0-based byte column of a byte offset
    pub fn column_of(&self, offset: usize) -> usize {
        offset_to_line_col(&self.content, offset).1
    }

    /// Inclusive 1-based line span of a range
    pub fn span_lines(&self, range: TextRange) -> (usize, usize) {
        let start = usize::from(range.start());
        // The end offset is exclusive; step back so a trailing newline
        // does not push the span onto the next line.
        let end = usize::from(range.end()).saturating_sub(1).max(start);
        (self.line_of(start), self.line_of(end))
    }

    /// The `def`/`class` line of a definition whose range may start at a decorator
    fn header_line(&self, start_line: usize, keyword: &str) -> usize {
        let mut lines = self.content.lines().enumerate().skip(start_line - 1);
        lines
            .find(|(_, text)| {
                let trimmed = text.trim_start();
                trimmed.starts_with(keyword) || trimmed.starts_with(&format!("async {keyword}"))
            })
            .map(|(i, _)| i + 1)
            .unwrap_or(start_line)
    }
}

fn offset_to_line_col(content: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(content.len());
    let before = content.get(..offset).unwrap_or("");
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    (line, offset - line_start)
}

/// Recover comments and classify physical lines from the token stream
fn scan_tokens(unit: &SourceUnit) -> (Vec<Comment>, Vec<LineKind>) {
    let line_total = unit.content.lines().count();
    let mut kinds: Vec<LineKind> = unit
        .content
        .lines()
        .map(|l| {
            if l.trim().is_empty() {
                LineKind::Blank
            } else {
                LineKind::Comment
            }
        })
        .collect();
    let mut comments = Vec::new();

    // Content already parsed, so lexing cannot fail; stray errors are skipped
    for (tok, range) in lex(&unit.content, Mode::Module).flatten() {
        match tok {
            Tok::Comment(text) => {
                let start = usize::from(range.start());
                comments.push(Comment {
                    line: unit.line_of(start),
                    column: unit.column_of(start),
                    text,
                });
            }
            Tok::Newline | Tok::NonLogicalNewline | Tok::Indent | Tok::Dedent | Tok::EndOfFile => {}
            _ => {
                let (first, last) = unit.span_lines(range);
                for line in first..=last.min(line_total) {
                    kinds[line - 1] = LineKind::Code;
                }
            }
        }
    }

    // Non-blank lines no token touched (e.g. a lone backslash) still hold code
    for (i, text) in unit.content.lines().enumerate() {
        if kinds[i] == LineKind::Comment && !text.trim_start().starts_with('#') {
            kinds[i] = LineKind::Code;
        }
    }

    (comments, kinds)
}

fn string_constant(expr: &Expr) -> Option<&str> {
    match expr {
        Expr::Constant(c) => match &c.value {
            Constant::Str(s) => Some(s.as_str()),
            _ => None,
        },
        _ => None,
    }
}

fn docstring_stmt(body: &[Stmt]) -> Option<&StmtExpr> {
    match body.first() {
        Some(Stmt::Expr(expr_stmt)) if string_constant(&expr_stmt.value).is_some() => {
            Some(expr_stmt)
        }
        _ => None,
    }
}

fn docstring_of(unit: &SourceUnit, body: &[Stmt]) -> Option<Docstring> {
    let stmt = docstring_stmt(body)?;
    let text = string_constant(&stmt.value)?.to_string();
    let (start_line, end_line) = unit.span_lines(stmt.range);
    Some(Docstring {
        text,
        start_line,
        end_line,
    })
}

/// Line of the first statement after the docstring. A body holding only a
/// docstring starts past it.
fn body_line_of(unit: &SourceUnit, body: &[Stmt], end_line: usize) -> usize {
    let docstring = docstring_stmt(body);
    let rest = if docstring.is_some() { &body[1..] } else { body };
    match (rest.first(), docstring) {
        (Some(stmt), _) => unit.span_lines(stmt.range()).0,
        (None, Some(doc)) => unit.span_lines(doc.range).1 + 1,
        (None, None) => end_line + 1,
    }
}

fn is_not_implemented(expr: &Expr) -> bool {
    match expr {
        Expr::Name(name) => name.id.as_str() == "NotImplementedError",
        Expr::Call(call) => is_not_implemented(&call.func),
        _ => false,
    }
}

fn is_none(expr: &Expr) -> bool {
    matches!(expr, Expr::Constant(c) if matches!(c.value, Constant::None))
}

/// Classify a function body, ignoring a leading docstring
pub fn classify_body(body: &[Stmt]) -> BodyShape {
    let rest = if docstring_stmt(body).is_some() {
        &body[1..]
    } else {
        body
    };

    match rest {
        [] => BodyShape::DocOnly,
        [Stmt::Pass(_)] => BodyShape::Pass,
        [Stmt::Expr(e)] if matches!(&*e.value, Expr::Constant(c) if matches!(c.value, Constant::Ellipsis)) => {
            BodyShape::Ellipsis
        }
        [Stmt::Raise(r)] if r.exc.as_deref().is_some_and(is_not_implemented) => BodyShape::Raises,
        [Stmt::Return(r)] if r.value.as_deref().map_or(true, is_none) => BodyShape::ReturnsNone,
        _ => BodyShape::Real,
    }
}

fn sole_statement_range(body: &[Stmt]) -> Option<TextRange> {
    let rest = if docstring_stmt(body).is_some() {
        &body[1..]
    } else {
        body
    };
    match rest {
        [Stmt::Pass(p)] => Some(p.range),
        [Stmt::Expr(e)] => Some(e.range),
        [Stmt::Raise(r)] => Some(r.range),
        [Stmt::Return(r)] => Some(r.range),
        _ => None,
    }
}

/// Dotted name of an expression such as `abc.ABC` or `abstractmethod`
pub fn dotted_name(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Name(name) => Some(name.id.to_string()),
        Expr::Attribute(attr) => dotted_name(&attr.value).map(|base| format!("{}.{}", base, attr.attr)),
        Expr::Call(call) => dotted_name(&call.func),
        Expr::Subscript(sub) => dotted_name(&sub.value),
        _ => None,
    }
}

fn qualify(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

#[allow(clippy::too_many_arguments)]
fn function_definition(
    unit: &SourceUnit,
    name: &str,
    prefix: &str,
    kind: DefKind,
    range: TextRange,
    body: &[Stmt],
    decorators: &[Expr],
    returns: Option<&Expr>,
    parent_class: Option<&str>,
) -> Definition {
    let (start_line, end_line) = unit.span_lines(range);
    let line = unit.header_line(start_line, "def ");
    let column = unit
        .content
        .lines()
        .nth(line - 1)
        .map(|l| l.len() - l.trim_start().len())
        .unwrap_or(0);
    let sole_statement_lines = sole_statement_range(body).map(|r| unit.span_lines(r));

    Definition {
        name: name.to_string(),
        qualified_name: qualify(prefix, name),
        kind,
        line,
        column,
        end_line,
        docstring: docstring_of(unit, body),
        body_line: body_line_of(unit, body, end_line),
        body_shape: classify_body(body),
        sole_statement_lines,
        decorators: decorators.iter().filter_map(dotted_name).collect(),
        returns_annotated: returns.is_some(),
        bases: Vec::new(),
        metaclass: None,
        parent_class: parent_class.map(str::to_string),
    }
}

fn collect_definitions(
    unit: &SourceUnit,
    body: &[Stmt],
    prefix: &str,
    parent_class: Option<&str>,
    out: &mut Vec<Definition>,
) {
    for stmt in body {
        match stmt {
            Stmt::FunctionDef(func) => {
                let def = function_definition(
                    unit,
                    func.name.as_str(),
                    prefix,
                    DefKind::Function,
                    func.range,
                    &func.body,
                    &func.decorator_list,
                    func.returns.as_deref(),
                    parent_class,
                );
                let qualified = def.qualified_name.clone();
                out.push(def);
                collect_definitions(unit, &func.body, &qualified, None, out);
            }
            Stmt::AsyncFunctionDef(func) => {
                let def = function_definition(
                    unit,
                    func.name.as_str(),
                    prefix,
                    DefKind::AsyncFunction,
                    func.range,
                    &func.body,
                    &func.decorator_list,
                    func.returns.as_deref(),
                    parent_class,
                );
                let qualified = def.qualified_name.clone();
                out.push(def);
                collect_definitions(unit, &func.body, &qualified, None, out);
            }
            Stmt::ClassDef(class) => {
                let (start_line, end_line) = unit.span_lines(class.range);
                let line = unit.header_line(start_line, "class ");
                let qualified = qualify(prefix, class.name.as_str());
                let metaclass = class
                    .keywords
                    .iter()
                    .find(|kw| kw.arg.as_ref().is_some_and(|a| a.as_str() == "metaclass"))
                    .and_then(|kw| dotted_name(&kw.value));

                out.push(Definition {
                    name: class.name.to_string(),
                    qualified_name: qualified.clone(),
                    kind: DefKind::Class,
                    line,
                    column: unit.column_of(usize::from(class.range.start())),
                    end_line,
                    docstring: docstring_of(unit, &class.body),
                    body_line: body_line_of(unit, &class.body, end_line),
                    body_shape: BodyShape::Real,
                    sole_statement_lines: None,
                    decorators: class.decorator_list.iter().filter_map(dotted_name).collect(),
                    returns_annotated: false,
                    bases: class.bases.iter().filter_map(dotted_name).collect(),
                    metaclass,
                    parent_class: parent_class.map(str::to_string),
                });
                collect_definitions(unit, &class.body, &qualified, Some(&qualified), out);
            }
            _ => {
                for block in child_bodies(stmt) {
                    collect_definitions(unit, block, prefix, parent_class, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(source: &str) -> SourceUnit {
        SourceUnit::parse(Path::new("test.py"), source).expect("valid python")
    }

    #[test]
    fn test_parse_error_location() {
        let err = SourceUnit::parse(Path::new("bad.py"), "def broken(\n    pass\n").unwrap_err();
        assert!(err.line >= 1);
        assert!(!err.message.is_empty());
    }

    #[test]
    fn test_comments_and_line_kinds() {
        let u = unit("# header\n\nx = 1  # trailing\ns = '# not a comment'\n");
        assert_eq!(u.comments().len(), 2);
        assert_eq!(u.comments()[0].line, 1);
        assert_eq!(u.comments()[1].line, 3);
        assert_eq!(u.line_kind(1), LineKind::Comment);
        assert_eq!(u.line_kind(2), LineKind::Blank);
        assert_eq!(u.line_kind(3), LineKind::Code);
        assert_eq!(u.line_kind(4), LineKind::Code);
    }

    #[test]
    fn test_multiline_string_lines_are_code() {
        let u = unit("x = '''\n# inside string\n'''\n");
        assert!(u.comments().is_empty());
        assert_eq!(u.line_kind(2), LineKind::Code);
    }

    #[test]
    fn test_body_shapes() {
        let u = unit(
            r#"
def a():
    """Doc."""
    pass

def b(): ...

def c():
    """Only doc."""

def d():
    raise NotImplementedError("later")

def e():
    return None

def f():
    return 1
"#,
        );
        let shapes: Vec<_> = u.definitions().iter().map(|d| d.body_shape).collect();
        assert_eq!(
            shapes,
            vec![
                BodyShape::Pass,
                BodyShape::Ellipsis,
                BodyShape::DocOnly,
                BodyShape::Raises,
                BodyShape::ReturnsNone,
                BodyShape::Real,
            ]
        );
    }

    #[test]
    fn test_definitions_qualified_and_decorated() {
        let u = unit(
            r#"
from abc import ABC, abstractmethod

class Base(ABC):
    """Interface."""

    @abstractmethod
    def run(self):
        pass
"#,
        );
        let class = &u.definitions()[0];
        assert_eq!(class.name, "Base");
        assert_eq!(class.bases, vec!["ABC".to_string()]);
        assert_eq!(class.line, 4);
        assert_eq!(class.docstring.as_ref().map(|d| d.start_line), Some(5));

        let method = &u.definitions()[1];
        assert_eq!(method.qualified_name, "Base.run");
        assert_eq!(method.parent_class.as_deref(), Some("Base"));
        assert!(method.is_abstract_method());
        assert_eq!(method.line, 8);
        assert_eq!(method.sole_statement_lines, Some((9, 9)));
    }

    #[test]
    fn test_body_start_skips_header_and_docstring() {
        let u = unit(
            r#"def plain(a,
          b):
    total = a + b
    return total

def documented(a, b):
    """Add."""
    total = a + b
    return total

def one_liner(x): return x
"#,
        );
        let defs = u.definitions();
        assert_eq!(defs[0].body_start_line(), 3);
        assert_eq!(defs[1].body_start_line(), 8);
        assert_eq!(defs[2].body_start_line(), 11);

        let docstrings = u.docstring_lines();
        let plain = u.implementation_lines(defs[0].body_start_line(), defs[0].end_line, &docstrings);
        let documented = u.implementation_lines(defs[1].body_start_line(), defs[1].end_line, &docstrings);
        assert_eq!(plain, 2);
        assert_eq!(plain, documented);
    }

    #[test]
    fn test_definitions_found_in_every_block() {
        let u = unit(
            r#"try:
    import fast
except ImportError:
    def a(): pass
else:
    def b(): pass
finally:
    def c(): pass

for i in range(2):
    def d(): pass
else:
    def e(): pass

while i:
    def f(): pass

with ctx:
    def g(): pass

match i:
    case 1:
        def h(): pass
"#,
        );
        let names: Vec<&str> = u.definitions().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d", "e", "f", "g", "h"]);
        assert!(u.definitions().iter().all(|d| d.body_shape == BodyShape::Pass));
    }

    #[test]
    fn test_module_docstring_span() {
        let u = unit("\"\"\"\nModule docs.\n\"\"\"\nx = 1\n");
        let doc = u.module_docstring().expect("docstring");
        assert_eq!((doc.start_line, doc.end_line), (1, 3));
        assert_eq!(doc.line_count(), 3);
    }
}
