//! Depth-first traversal over the Python syntax tree
//!
//! Consumers implement [`Visitor`] and override only the hooks they care
//! about; the default methods recurse through every child via
//! [`walk_stmt`] and [`walk_expr`]. Overriding a hook and calling the
//! matching `walk_*` function keeps the traversal going.

use rustpython_parser::ast::{Arguments, ExceptHandler, Expr, Stmt};

pub trait Visitor {
    fn visit_stmt(&mut self, stmt: &Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }

    fn visit_except_handler(&mut self, handler: &ExceptHandler) {
        walk_except_handler(self, handler);
    }

    fn visit_body(&mut self, body: &[Stmt]) {
        for stmt in body {
            self.visit_stmt(stmt);
        }
    }
}

fn visit_arguments<V: Visitor + ?Sized>(visitor: &mut V, args: &Arguments) {
    for arg in args
        .posonlyargs
        .iter()
        .chain(args.args.iter())
        .chain(args.kwonlyargs.iter())
    {
        if let Some(annotation) = &arg.def.annotation {
            visitor.visit_expr(annotation);
        }
        if let Some(default) = &arg.default {
            visitor.visit_expr(default);
        }
    }
    for extra in args.vararg.iter().chain(args.kwarg.iter()) {
        if let Some(annotation) = &extra.annotation {
            visitor.visit_expr(annotation);
        }
    }
}

pub fn walk_stmt<V: Visitor + ?Sized>(visitor: &mut V, stmt: &Stmt) {
    match stmt {
        Stmt::FunctionDef(func) => {
            for dec in &func.decorator_list {
                visitor.visit_expr(dec);
            }
            visit_arguments(visitor, &func.args);
            if let Some(ret) = &func.returns {
                visitor.visit_expr(ret);
            }
            visitor.visit_body(&func.body);
        }
        Stmt::AsyncFunctionDef(func) => {
            for dec in &func.decorator_list {
                visitor.visit_expr(dec);
            }
            visit_arguments(visitor, &func.args);
            if let Some(ret) = &func.returns {
                visitor.visit_expr(ret);
            }
            visitor.visit_body(&func.body);
        }
        Stmt::ClassDef(class) => {
            for dec in &class.decorator_list {
                visitor.visit_expr(dec);
            }
            for base in &class.bases {
                visitor.visit_expr(base);
            }
            for kw in &class.keywords {
                visitor.visit_expr(&kw.value);
            }
            visitor.visit_body(&class.body);
        }
        Stmt::Return(ret) => {
            if let Some(val) = &ret.value {
                visitor.visit_expr(val);
            }
        }
        Stmt::Delete(del) => {
            for target in &del.targets {
                visitor.visit_expr(target);
            }
        }
        Stmt::Assign(assign) => {
            for target in &assign.targets {
                visitor.visit_expr(target);
            }
            visitor.visit_expr(&assign.value);
        }
        Stmt::AugAssign(aug) => {
            visitor.visit_expr(&aug.target);
            visitor.visit_expr(&aug.value);
        }
        Stmt::AnnAssign(ann) => {
            visitor.visit_expr(&ann.target);
            visitor.visit_expr(&ann.annotation);
            if let Some(val) = &ann.value {
                visitor.visit_expr(val);
            }
        }
        Stmt::For(for_stmt) => {
            visitor.visit_expr(&for_stmt.target);
            visitor.visit_expr(&for_stmt.iter);
            visitor.visit_body(&for_stmt.body);
            visitor.visit_body(&for_stmt.orelse);
        }
        Stmt::AsyncFor(for_stmt) => {
            visitor.visit_expr(&for_stmt.target);
            visitor.visit_expr(&for_stmt.iter);
            visitor.visit_body(&for_stmt.body);
            visitor.visit_body(&for_stmt.orelse);
        }
        Stmt::While(while_stmt) => {
            visitor.visit_expr(&while_stmt.test);
            visitor.visit_body(&while_stmt.body);
            visitor.visit_body(&while_stmt.orelse);
        }
        Stmt::If(if_stmt) => {
            visitor.visit_expr(&if_stmt.test);
            visitor.visit_body(&if_stmt.body);
            visitor.visit_body(&if_stmt.orelse);
        }
        Stmt::With(with_stmt) => {
            for item in &with_stmt.items {
                visitor.visit_expr(&item.context_expr);
                if let Some(vars) = &item.optional_vars {
                    visitor.visit_expr(vars);
                }
            }
            visitor.visit_body(&with_stmt.body);
        }
        Stmt::AsyncWith(with_stmt) => {
            for item in &with_stmt.items {
                visitor.visit_expr(&item.context_expr);
                if let Some(vars) = &item.optional_vars {
                    visitor.visit_expr(vars);
                }
            }
            visitor.visit_body(&with_stmt.body);
        }
        Stmt::Match(match_stmt) => {
            visitor.visit_expr(&match_stmt.subject);
            for case in &match_stmt.cases {
                if let Some(guard) = &case.guard {
                    visitor.visit_expr(guard);
                }
                visitor.visit_body(&case.body);
            }
        }
        Stmt::Raise(raise) => {
            if let Some(exc) = &raise.exc {
                visitor.visit_expr(exc);
            }
            if let Some(cause) = &raise.cause {
                visitor.visit_expr(cause);
            }
        }
        Stmt::Try(try_stmt) => {
            visitor.visit_body(&try_stmt.body);
            for handler in &try_stmt.handlers {
                visitor.visit_except_handler(handler);
            }
            visitor.visit_body(&try_stmt.orelse);
            visitor.visit_body(&try_stmt.finalbody);
        }
        Stmt::TryStar(try_stmt) => {
            visitor.visit_body(&try_stmt.body);
            for handler in &try_stmt.handlers {
                visitor.visit_except_handler(handler);
            }
            visitor.visit_body(&try_stmt.orelse);
            visitor.visit_body(&try_stmt.finalbody);
        }
        Stmt::Assert(assert) => {
            visitor.visit_expr(&assert.test);
            if let Some(msg) = &assert.msg {
                visitor.visit_expr(msg);
            }
        }
        Stmt::Expr(expr_stmt) => {
            visitor.visit_expr(&expr_stmt.value);
        }
        // Imports, global/nonlocal, pass, break and continue hold no expressions
        _ => {}
    }
}

/// Statement blocks nested directly in a control-flow statement, in source
/// order. Function and class bodies are not included.
pub fn child_bodies(stmt: &Stmt) -> Vec<&[Stmt]> {
    fn handler_bodies(handlers: &[ExceptHandler]) -> impl Iterator<Item = &[Stmt]> {
        handlers.iter().map(|handler| {
            let ExceptHandler::ExceptHandler(h) = handler;
            h.body.as_slice()
        })
    }

    match stmt {
        Stmt::If(s) => vec![s.body.as_slice(), s.orelse.as_slice()],
        Stmt::For(s) => vec![s.body.as_slice(), s.orelse.as_slice()],
        Stmt::AsyncFor(s) => vec![s.body.as_slice(), s.orelse.as_slice()],
        Stmt::While(s) => vec![s.body.as_slice(), s.orelse.as_slice()],
        Stmt::With(s) => vec![s.body.as_slice()],
        Stmt::AsyncWith(s) => vec![s.body.as_slice()],
        Stmt::Match(s) => s.cases.iter().map(|case| case.body.as_slice()).collect(),
        Stmt::Try(s) => std::iter::once(s.body.as_slice())
            .chain(handler_bodies(&s.handlers))
            .chain([s.orelse.as_slice(), s.finalbody.as_slice()])
            .collect(),
        Stmt::TryStar(s) => std::iter::once(s.body.as_slice())
            .chain(handler_bodies(&s.handlers))
            .chain([s.orelse.as_slice(), s.finalbody.as_slice()])
            .collect(),
        _ => Vec::new(),
    }
}

pub fn walk_except_handler<V: Visitor + ?Sized>(visitor: &mut V, handler: &ExceptHandler) {
    let ExceptHandler::ExceptHandler(h) = handler;
    if let Some(typ) = &h.type_ {
        visitor.visit_expr(typ);
    }
    visitor.visit_body(&h.body);
}

pub fn walk_expr<V: Visitor + ?Sized>(visitor: &mut V, expr: &Expr) {
    match expr {
        Expr::BoolOp(boolop) => {
            for val in &boolop.values {
                visitor.visit_expr(val);
            }
        }
        Expr::NamedExpr(named) => {
            visitor.visit_expr(&named.target);
            visitor.visit_expr(&named.value);
        }
        Expr::BinOp(binop) => {
            visitor.visit_expr(&binop.left);
            visitor.visit_expr(&binop.right);
        }
        Expr::UnaryOp(unary) => {
            visitor.visit_expr(&unary.operand);
        }
        Expr::Lambda(lambda) => {
            visit_arguments(visitor, &lambda.args);
            visitor.visit_expr(&lambda.body);
        }
        Expr::IfExp(ifexp) => {
            visitor.visit_expr(&ifexp.test);
            visitor.visit_expr(&ifexp.body);
            visitor.visit_expr(&ifexp.orelse);
        }
        Expr::Dict(dict) => {
            for key in dict.keys.iter().flatten() {
                visitor.visit_expr(key);
            }
            for val in &dict.values {
                visitor.visit_expr(val);
            }
        }
        Expr::Set(set) => {
            for elt in &set.elts {
                visitor.visit_expr(elt);
            }
        }
        Expr::ListComp(comp) => {
            visitor.visit_expr(&comp.elt);
            for gen in &comp.generators {
                visitor.visit_expr(&gen.target);
                visitor.visit_expr(&gen.iter);
                for if_clause in &gen.ifs {
                    visitor.visit_expr(if_clause);
                }
            }
        }
        Expr::SetComp(comp) => {
            visitor.visit_expr(&comp.elt);
            for gen in &comp.generators {
                visitor.visit_expr(&gen.target);
                visitor.visit_expr(&gen.iter);
                for if_clause in &gen.ifs {
                    visitor.visit_expr(if_clause);
                }
            }
        }
        Expr::DictComp(comp) => {
            visitor.visit_expr(&comp.key);
            visitor.visit_expr(&comp.value);
            for gen in &comp.generators {
                visitor.visit_expr(&gen.target);
                visitor.visit_expr(&gen.iter);
                for if_clause in &gen.ifs {
                    visitor.visit_expr(if_clause);
                }
            }
        }
        Expr::GeneratorExp(gen) => {
            visitor.visit_expr(&gen.elt);
            for generator in &gen.generators {
                visitor.visit_expr(&generator.target);
                visitor.visit_expr(&generator.iter);
                for if_clause in &generator.ifs {
                    visitor.visit_expr(if_clause);
                }
            }
        }
        Expr::Await(await_expr) => {
            visitor.visit_expr(&await_expr.value);
        }
        Expr::Yield(yield_expr) => {
            if let Some(val) = &yield_expr.value {
                visitor.visit_expr(val);
            }
        }
        Expr::YieldFrom(yf) => {
            visitor.visit_expr(&yf.value);
        }
        Expr::Compare(cmp) => {
            visitor.visit_expr(&cmp.left);
            for comp in &cmp.comparators {
                visitor.visit_expr(comp);
            }
        }
        Expr::Call(call) => {
            visitor.visit_expr(&call.func);
            for arg in &call.args {
                visitor.visit_expr(arg);
            }
            for keyword in &call.keywords {
                visitor.visit_expr(&keyword.value);
            }
        }
        Expr::FormattedValue(fv) => {
            visitor.visit_expr(&fv.value);
            if let Some(spec) = &fv.format_spec {
                visitor.visit_expr(spec);
            }
        }
        Expr::JoinedStr(js) => {
            for val in &js.values {
                visitor.visit_expr(val);
            }
        }
        Expr::Attribute(attr) => {
            visitor.visit_expr(&attr.value);
        }
        Expr::Subscript(sub) => {
            visitor.visit_expr(&sub.value);
            visitor.visit_expr(&sub.slice);
        }
        Expr::Starred(starred) => {
            visitor.visit_expr(&starred.value);
        }
        Expr::List(list) => {
            for elt in &list.elts {
                visitor.visit_expr(elt);
            }
        }
        Expr::Tuple(tuple) => {
            for elt in &tuple.elts {
                visitor.visit_expr(elt);
            }
        }
        Expr::Slice(slice) => {
            if let Some(lower) = &slice.lower {
                visitor.visit_expr(lower);
            }
            if let Some(upper) = &slice.upper {
                visitor.visit_expr(upper);
            }
            if let Some(step) = &slice.step {
                visitor.visit_expr(step);
            }
        }
        // Names and constants are leaves
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustpython_parser::{ast::Mod, parse, Mode};

    struct NameCounter {
        names: Vec<String>,
        stmts: usize,
    }

    impl Visitor for NameCounter {
        fn visit_stmt(&mut self, stmt: &Stmt) {
            self.stmts += 1;
            walk_stmt(self, stmt);
        }

        fn visit_expr(&mut self, expr: &Expr) {
            if let Expr::Name(name) = expr {
                self.names.push(name.id.to_string());
            }
            walk_expr(self, expr);
        }
    }

    #[test]
    fn test_walk_reaches_nested_names() {
        let source = "def f(a=default):\n    for x in items:\n        if x:\n            total += helper(x)\n";
        let body = match parse(source, Mode::Module, "<test>").unwrap() {
            Mod::Module(m) => m.body,
            _ => unreachable!(),
        };
        let mut counter = NameCounter { names: vec![], stmts: 0 };
        counter.visit_body(&body);

        assert_eq!(counter.stmts, 4);
        for name in ["default", "items", "x", "total", "helper"] {
            assert!(counter.names.iter().any(|n| n == name), "missing {name}");
        }
    }
}
