//! Name-level facts about a module: imports, referenced names, call roots

use super::visit::{walk_expr, walk_stmt, Visitor};
use rustpython_parser::ast::{Constant, Expr, ExprContext, Stmt};
use std::collections::BTreeSet;

/// One name bound by an import statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    /// Name the import is tracked under: the top-level package for absolute
    /// imports (`numpy` for `import numpy.linalg as la`), the bound name for
    /// relative ones
    pub tracked: String,
    /// Name visible in the module after the import (`la`, `Tensor`)
    pub bound: String,
    /// Byte offset of the import statement
    pub offset: usize,
    /// Inside an `if TYPE_CHECKING:` block
    pub type_checking: bool,
}

fn is_type_checking_guard(test: &Expr) -> bool {
    match test {
        Expr::Name(name) => name.id.as_str() == "TYPE_CHECKING",
        Expr::Attribute(attr) => attr.attr.as_str() == "TYPE_CHECKING",
        _ => false,
    }
}

fn root_segment(module: &str) -> String {
    module.split('.').next().unwrap_or(module).to_string()
}

#[derive(Default)]
struct ImportCollector {
    records: Vec<ImportRecord>,
    type_checking: bool,
}

impl Visitor for ImportCollector {
    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Import(import) => {
                for alias in &import.names {
                    let module = alias.name.as_str();
                    let bound = match &alias.asname {
                        Some(asname) => asname.to_string(),
                        None => root_segment(module),
                    };
                    self.records.push(ImportRecord {
                        tracked: root_segment(module),
                        bound,
                        offset: usize::from(import.range.start()),
                        type_checking: self.type_checking,
                    });
                }
            }
            Stmt::ImportFrom(import) => {
                let module = import.module.as_ref().map(|m| m.as_str());
                if module == Some("__future__") {
                    return;
                }
                let relative = import.level.map_or(false, |l| l.to_u32() > 0);
                for alias in &import.names {
                    if alias.name.as_str() == "*" {
                        continue;
                    }
                    let bound = alias
                        .asname
                        .as_ref()
                        .unwrap_or(&alias.name)
                        .to_string();
                    let tracked = match module {
                        Some(m) if !relative => root_segment(m),
                        _ => bound.clone(),
                    };
                    self.records.push(ImportRecord {
                        tracked,
                        bound,
                        offset: usize::from(import.range.start()),
                        type_checking: self.type_checking,
                    });
                }
            }
            Stmt::If(if_stmt) if is_type_checking_guard(&if_stmt.test) => {
                let outer = self.type_checking;
                self.type_checking = true;
                self.visit_body(&if_stmt.body);
                self.type_checking = outer;
                self.visit_body(&if_stmt.orelse);
            }
            _ => walk_stmt(self, stmt),
        }
    }

    // Imports never sit inside expressions
    fn visit_expr(&mut self, _expr: &Expr) {}
}

/// Every name bound by an import, in source order, nested scopes included.
/// `from __future__` and star imports bind nothing trackable and are skipped.
pub fn collect_imports(tree: &[Stmt]) -> Vec<ImportRecord> {
    let mut collector = ImportCollector::default();
    collector.visit_body(tree);
    collector.records
}

#[derive(Default)]
struct NameCollector {
    names: BTreeSet<String>,
}

impl Visitor for NameCollector {
    fn visit_expr(&mut self, expr: &Expr) {
        if let Expr::Name(name) = expr {
            if !matches!(name.ctx, ExprContext::Store) {
                self.names.insert(name.id.to_string());
            }
        }
        walk_expr(self, expr);
    }
}

/// Names read anywhere in the module; import statements contribute nothing
pub fn collect_used_names(tree: &[Stmt]) -> BTreeSet<String> {
    let mut collector = NameCollector::default();
    collector.visit_body(tree);
    collector.names
}

fn call_root(func: &Expr) -> Option<&str> {
    match func {
        Expr::Name(name) => Some(name.id.as_str()),
        Expr::Attribute(attr) => call_root(&attr.value),
        Expr::Call(call) => call_root(&call.func),
        Expr::Subscript(sub) => call_root(&sub.value),
        _ => None,
    }
}

#[derive(Default)]
struct CallRootCollector {
    roots: BTreeSet<String>,
}

impl Visitor for CallRootCollector {
    fn visit_expr(&mut self, expr: &Expr) {
        if let Expr::Call(call) = expr {
            if let Some(root) = call_root(&call.func) {
                self.roots.insert(root.to_string());
            }
        }
        walk_expr(self, expr);
    }
}

/// Leftmost names of every call target: `np` for `np.linalg.norm(x)`
pub fn called_roots(tree: &[Stmt]) -> BTreeSet<String> {
    let mut collector = CallRootCollector::default();
    collector.visit_body(tree);
    collector.roots
}

fn string_elements(expr: &Expr) -> Vec<String> {
    let elts = match expr {
        Expr::List(list) => &list.elts,
        Expr::Tuple(tuple) => &tuple.elts,
        _ => return Vec::new(),
    };
    elts.iter()
        .filter_map(|e| match e {
            Expr::Constant(c) => match &c.value {
                Constant::Str(s) => Some(s.clone()),
                _ => None,
            },
            _ => None,
        })
        .collect()
}

fn targets_dunder_all(target: &Expr) -> bool {
    matches!(target, Expr::Name(name) if name.id.as_str() == "__all__")
}

/// String entries of module-level `__all__` assignments and extensions
pub fn dunder_all(tree: &[Stmt]) -> BTreeSet<String> {
    let mut exported = BTreeSet::new();
    for stmt in tree {
        match stmt {
            Stmt::Assign(assign) if assign.targets.iter().any(targets_dunder_all) => {
                exported.extend(string_elements(&assign.value));
            }
            Stmt::AugAssign(aug) if targets_dunder_all(&aug.target) => {
                exported.extend(string_elements(&aug.value));
            }
            Stmt::AnnAssign(ann) if targets_dunder_all(&ann.target) => {
                if let Some(value) = &ann.value {
                    exported.extend(string_elements(value));
                }
            }
            _ => {}
        }
    }
    exported
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustpython_parser::{ast::Mod, parse, Mode};

    fn body(source: &str) -> Vec<Stmt> {
        match parse(source, Mode::Module, "<test>").unwrap() {
            Mod::Module(m) => m.body,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_import_forms() {
        let tree = body(
            "import numpy as np\nimport os.path\nfrom torch import nn as tnn\nfrom . import sibling\nfrom __future__ import annotations\nfrom math import *\n",
        );
        let imports = collect_imports(&tree);
        let pairs: Vec<_> = imports
            .iter()
            .map(|r| (r.tracked.as_str(), r.bound.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("numpy", "np"),
                ("os", "os"),
                ("torch", "tnn"),
                ("sibling", "sibling"),
            ]
        );
    }

    #[test]
    fn test_type_checking_imports_flagged() {
        let tree = body(
            "import typing\nif typing.TYPE_CHECKING:\n    from torch import Tensor\nelse:\n    import json\n",
        );
        let imports = collect_imports(&tree);
        let torch = imports.iter().find(|r| r.tracked == "torch").unwrap();
        let json = imports.iter().find(|r| r.tracked == "json").unwrap();
        assert!(torch.type_checking);
        assert!(!json.type_checking);
    }

    #[test]
    fn test_nested_imports_collected() {
        let tree = body("def load():\n    import pandas as pd\n    return pd.read_csv('x')\n");
        let imports = collect_imports(&tree);
        assert_eq!(imports.len(), 1);
        assert_eq!(imports[0].tracked, "pandas");
    }

    #[test]
    fn test_used_names_skip_stores_and_imports() {
        let tree = body("import json\nresult = json.dumps(payload)\n");
        let used = collect_used_names(&tree);
        assert!(used.contains("json"));
        assert!(used.contains("payload"));
        assert!(!used.contains("result"));
    }

    #[test]
    fn test_called_roots() {
        let tree = body("x = np.linalg.norm(v)\nclient().get(url)\nvalue = data['k']\n");
        let roots = called_roots(&tree);
        assert!(roots.contains("np"));
        assert!(roots.contains("client"));
        assert!(!roots.contains("data"));
    }

    #[test]
    fn test_dunder_all_entries() {
        let tree = body("__all__ = ['Engine', 'run']\n__all__ += ('extra',)\n");
        let exported = dunder_all(&tree);
        assert_eq!(exported.len(), 3);
        assert!(exported.contains("Engine"));
        assert!(exported.contains("extra"));
    }
}
