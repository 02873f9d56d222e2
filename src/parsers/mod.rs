//! Python source parsing
//!
//! Every file is parsed once into a [`SourceUnit`]; calculators and
//! patterns read from it and never reparse.

pub mod names;
pub mod python;
pub mod visit;

pub use names::{collect_imports, collect_used_names, called_roots, dunder_all, ImportRecord};
pub use python::{
    BodyShape, Comment, DefKind, Definition, Docstring, LineKind, ParseError, SourceUnit,
};
pub use visit::{child_bodies, walk_except_handler, walk_expr, walk_stmt, Visitor};

use std::path::Path;

/// Extensions treated as Python sources
pub const PYTHON_EXTENSIONS: &[&str] = &["py", "pyi"];

/// Whether a path names a Python source or stub file
pub fn is_python_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| PYTHON_EXTENSIONS.contains(&ext))
}

/// Whether a path names a `.pyi` stub
pub fn is_stub_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("pyi")
}

/// Parse a Python file's content
pub fn parse(path: &Path, content: &str) -> Result<SourceUnit, ParseError> {
    SourceUnit::parse(path, content)
}
