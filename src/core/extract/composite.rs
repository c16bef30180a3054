//! Embedded templates of single-file components.
//!
//! After `<template>` preprocessing every region is a call to the `template`
//! function of `@ember/template-compiler`. Calls are only trusted when the
//! callee still refers to that import, so a parameter or local variable named
//! like the import hides it:
//!
//! ```js
//! import { template } from '@ember/template-compiler';
//! template('{{t "used"}}');                   // confirmed
//! function render(template) {
//!   return template('{{t "not.analyzed"}}');  // shadowed
//! }
//! ```

use std::collections::HashSet;

use swc_ecma_ast::{
    ArrowExpr, BlockStmt, CallExpr, Callee, CatchClause, Class, Constructor, Decl, Expr, FnExpr,
    ForHead, ForInStmt, ForOfStmt, ForStmt, Function, ImportSpecifier, Lit, Module, ModuleDecl,
    ModuleExportName, ModuleItem, ObjectPatProp, ParamOrTsParamProp, Pat, Stmt, TsParamPropParam,
    VarDecl, VarDeclKind, VarDeclOrExpr,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::core::extract::script::unwrap_paren;
use crate::core::parsers::content_tag::{TEMPLATE_COMPILER_MODULE, TEMPLATE_EXPORT};

/// Local names a pattern binds.
pub fn extract_binding_names(pat: &Pat) -> Vec<String> {
    match pat {
        Pat::Ident(ident) => vec![ident.id.sym.to_string()],
        Pat::Object(obj) => obj
            .props
            .iter()
            .flat_map(|prop| match prop {
                ObjectPatProp::KeyValue(kv) => extract_binding_names(&kv.value),
                ObjectPatProp::Assign(assign) => vec![assign.key.sym.to_string()],
                ObjectPatProp::Rest(rest) => extract_binding_names(&rest.arg),
            })
            .collect(),
        Pat::Array(arr) => arr
            .elems
            .iter()
            .flatten()
            .flat_map(extract_binding_names)
            .collect(),
        Pat::Assign(assign) => extract_binding_names(&assign.left),
        Pat::Rest(rest) => extract_binding_names(&rest.arg),
        Pat::Expr(_) | Pat::Invalid(_) => vec![],
    }
}

fn var_decl_names(decl: &VarDecl) -> Vec<String> {
    decl.decls
        .iter()
        .flat_map(|declarator| extract_binding_names(&declarator.name))
        .collect()
}

fn decl_names(decl: &Decl) -> Vec<String> {
    match decl {
        Decl::Var(var) => var_decl_names(var),
        Decl::Fn(func) => vec![func.ident.sym.to_string()],
        Decl::Class(class) => vec![class.ident.sym.to_string()],
        Decl::Using(using) => using
            .decls
            .iter()
            .flat_map(|declarator| extract_binding_names(&declarator.name))
            .collect(),
        _ => vec![],
    }
}

/// Names declared directly in a block; nested blocks get their own scope.
fn hoisted_names(stmts: &[Stmt]) -> HashSet<String> {
    stmts
        .iter()
        .filter_map(|stmt| match stmt {
            Stmt::Decl(decl) => Some(decl_names(decl)),
            _ => None,
        })
        .flatten()
        .collect()
}

/// `var` names anywhere in a function body, outside nested functions and classes.
#[derive(Default)]
struct FunctionVars {
    names: HashSet<String>,
}

impl Visit for FunctionVars {
    fn visit_var_decl(&mut self, node: &VarDecl) {
        if node.kind == VarDeclKind::Var {
            self.names.extend(var_decl_names(node));
        }
        node.visit_children_with(self);
    }

    fn visit_function(&mut self, _: &Function) {}

    fn visit_arrow_expr(&mut self, _: &ArrowExpr) {}

    fn visit_class(&mut self, _: &Class) {}
}

fn function_vars<N: VisitWith<FunctionVars>>(body: &N) -> HashSet<String> {
    let mut vars = FunctionVars::default();
    body.visit_with(&mut vars);
    vars.names
}

/// Local names bound to `template` of `@ember/template-compiler`.
pub fn template_imports(module: &Module) -> HashSet<String> {
    let mut names = HashSet::new();
    for item in &module.body {
        let ModuleItem::ModuleDecl(ModuleDecl::Import(import)) = item else {
            continue;
        };
        if import.type_only || import.src.value.as_str() != Some(TEMPLATE_COMPILER_MODULE) {
            continue;
        }
        for specifier in &import.specifiers {
            let ImportSpecifier::Named(named) = specifier else {
                continue;
            };
            let imported = match &named.imported {
                Some(ModuleExportName::Ident(ident)) => ident.sym.to_string(),
                Some(ModuleExportName::Str(s)) => s.value.to_string_lossy().to_string(),
                None => named.local.sym.to_string(),
            };
            if imported == TEMPLATE_EXPORT && !named.is_type_only {
                names.insert(named.local.sym.to_string());
            }
        }
    }
    names
}

/// Collects the template text of every confirmed `template(...)` call.
pub struct TemplateCallCollector {
    template_fns: HashSet<String>,
    /// Declarations of enclosing functions and blocks, innermost last.
    scopes: Vec<HashSet<String>>,
    pub templates: Vec<String>,
}

impl TemplateCallCollector {
    pub fn new(template_fns: HashSet<String>) -> Self {
        Self {
            template_fns,
            scopes: Vec::new(),
            templates: Vec::new(),
        }
    }

    fn is_template_fn(&self, name: &str) -> bool {
        self.template_fns.contains(name) && !self.scopes.iter().any(|scope| scope.contains(name))
    }

    fn with_scope<F: FnOnce(&mut Self)>(&mut self, names: HashSet<String>, visit: F) {
        self.scopes.push(names);
        visit(self);
        self.scopes.pop();
    }
}

/// The text of a string literal or an interpolation-free template literal.
fn static_text(expr: &Expr) -> Option<String> {
    match unwrap_paren(expr) {
        Expr::Lit(Lit::Str(s)) => s.value.as_str().map(|s| s.to_string()),
        Expr::Tpl(tpl) if tpl.exprs.is_empty() => tpl
            .quasis
            .first()
            .and_then(|q| q.cooked.as_ref())
            .and_then(|s| s.as_str())
            .map(|s| s.to_string()),
        _ => None,
    }
}

impl Visit for TemplateCallCollector {
    fn visit_call_expr(&mut self, node: &CallExpr) {
        if let Callee::Expr(callee) = &node.callee
            && let Expr::Ident(ident) = &**callee
            && self.is_template_fn(ident.sym.as_str())
            && let Some(arg) = node.args.first()
            && arg.spread.is_none()
            && let Some(text) = static_text(&arg.expr)
        {
            self.templates.push(text);
        }
        node.visit_children_with(self);
    }

    fn visit_function(&mut self, node: &Function) {
        let mut names: HashSet<String> = node
            .params
            .iter()
            .flat_map(|param| extract_binding_names(&param.pat))
            .collect();
        names.extend(function_vars(&node.body));
        self.with_scope(names, |this| node.visit_children_with(this));
    }

    fn visit_constructor(&mut self, node: &Constructor) {
        let mut names: HashSet<String> = node
            .params
            .iter()
            .flat_map(|param| match param {
                ParamOrTsParamProp::Param(param) => extract_binding_names(&param.pat),
                ParamOrTsParamProp::TsParamProp(prop) => match &prop.param {
                    TsParamPropParam::Ident(ident) => vec![ident.id.sym.to_string()],
                    TsParamPropParam::Assign(assign) => extract_binding_names(&assign.left),
                },
            })
            .collect();
        names.extend(function_vars(&node.body));
        self.with_scope(names, |this| node.visit_children_with(this));
    }

    fn visit_fn_expr(&mut self, node: &FnExpr) {
        let names = node
            .ident
            .iter()
            .map(|ident| ident.sym.to_string())
            .collect();
        self.with_scope(names, |this| node.visit_children_with(this));
    }

    fn visit_arrow_expr(&mut self, node: &ArrowExpr) {
        let mut names: HashSet<String> =
            node.params.iter().flat_map(extract_binding_names).collect();
        names.extend(function_vars(&node.body));
        self.with_scope(names, |this| node.visit_children_with(this));
    }

    fn visit_block_stmt(&mut self, node: &BlockStmt) {
        let names = hoisted_names(&node.stmts);
        self.with_scope(names, |this| node.visit_children_with(this));
    }

    fn visit_catch_clause(&mut self, node: &CatchClause) {
        let names = node
            .param
            .iter()
            .flat_map(extract_binding_names)
            .collect();
        self.with_scope(names, |this| node.visit_children_with(this));
    }

    fn visit_for_stmt(&mut self, node: &ForStmt) {
        let names = match &node.init {
            Some(VarDeclOrExpr::VarDecl(decl)) => var_decl_names(decl).into_iter().collect(),
            _ => HashSet::new(),
        };
        self.with_scope(names, |this| node.visit_children_with(this));
    }

    fn visit_for_in_stmt(&mut self, node: &ForInStmt) {
        let names = match &node.left {
            ForHead::VarDecl(decl) => var_decl_names(decl).into_iter().collect(),
            _ => HashSet::new(),
        };
        self.with_scope(names, |this| node.visit_children_with(this));
    }

    fn visit_for_of_stmt(&mut self, node: &ForOfStmt) {
        let names = match &node.left {
            ForHead::VarDecl(decl) => var_decl_names(decl).into_iter().collect(),
            _ => HashSet::new(),
        };
        self.with_scope(names, |this| node.visit_children_with(this));
    }
}

/// Texts of every confirmed template call in `module`.
pub fn confirmed_templates(module: &Module) -> Vec<String> {
    let mut collector = TemplateCallCollector::new(template_imports(module));
    module.visit_with(&mut collector);
    collector.templates
}

#[cfg(test)]
mod tests {
    use crate::core::extract::composite::*;
    use crate::core::parsers::script::{ScriptSyntax, parse_script};
    use pretty_assertions::assert_eq;

    fn templates(code: &str) -> Vec<String> {
        let module = parse_script(code, "app/components/test.gjs", ScriptSyntax::default()).unwrap();
        confirmed_templates(&module)
    }

    #[test]
    fn test_confirmed_calls() {
        let code = r#"
import { template } from '@ember/template-compiler';
import { template as compile } from '@ember/template-compiler';

export const A = template('one');
export const B = compile(`two`);
export const C = template(`three ${x}`);
"#;
        assert_eq!(templates(code), vec!["one", "two"]);
    }

    #[test]
    fn test_other_modules_are_ignored() {
        let code = r#"
import { template } from 'some-other-package';
template('not.confirmed');
"#;
        assert!(templates(code).is_empty());
    }

    #[test]
    fn test_parameters_shadow_the_import() {
        let code = r#"
import { template } from '@ember/template-compiler';

function render(template) {
  return template('shadowed.by.param');
}
const arrow = ({ template }) => template('shadowed.by.destructuring');
template('visible');
"#;
        assert_eq!(templates(code), vec!["visible"]);
    }

    #[test]
    fn test_block_declarations_shadow_before_declaration() {
        let code = r#"
import { template } from '@ember/template-compiler';

{
  template('hoisted.shadow');
  let template = (s) => s;
}
if (ok) {
  template('outer.visible');
}
try {} catch (template) { template('catch.param'); }
for (const template of list) { template('loop.binding'); }
"#;
        assert_eq!(templates(code), vec!["outer.visible"]);
    }

    #[test]
    fn test_var_in_nested_block_shadows_whole_function() {
        let code = r#"
import { template } from '@ember/template-compiler';

function render(ready) {
  template('before.var');
  if (ready) {
    var template = (s) => s;
  }
  return template('after.var');
}
const arrow = () => {
  for (;;) { var template = 1; }
  template('arrow.var');
};
function outer() {
  function inner() { var template = 1; }
  return template('inner.var.stays.local');
}
"#;
        assert_eq!(templates(code), vec!["inner.var.stays.local"]);
    }

    #[test]
    fn test_static_blocks_in_classes() {
        let code = r#"
import { template } from '@ember/template-compiler';

export default class Greeting {
  static { template('class.member'); }

  render(template) {
    return template('method.param');
  }
}
"#;
        assert_eq!(templates(code), vec!["class.member"]);
    }

    #[test]
    fn test_binding_names_of_patterns() {
        let module = parse_script(
            "const { a, b: [c, ...d], e = 1, ...f } = obj;",
            "app/x.js",
            ScriptSyntax::default(),
        )
        .unwrap();
        let ModuleItem::Stmt(Stmt::Decl(decl)) = &module.body[0] else {
            panic!("expected a declaration");
        };
        let mut names = decl_names(decl);
        names.sort();
        assert_eq!(names, vec!["a", "c", "d", "e", "f"]);
    }
}
