//! Translation keys in script modules.
//!
//! Recognized call shapes:
//!
//! - `t('key')`, `this.intl.t('key')`, `anything.t('key')` (plus custom helpers)
//! - `formatMessage({ id: 'key' })`, `intl.formatMessage({ id: 'key' })`
//! - `<FormattedMessage id="key" />` in JSX
//!
//! The key argument may be a string literal or a conditional whose literal
//! branches are recorded.

use std::collections::BTreeSet;

use swc_ecma_ast::{
    CallExpr, Callee, Expr, JSXAttr, JSXAttrName, JSXAttrOrSpread, JSXAttrValue, JSXElementName,
    JSXExpr, JSXOpeningElement, Lit, MemberProp, Module, Prop, PropName, PropOrSpread,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::core::AnalysisOptions;
use crate::core::extract::KeyShape;

const FORMAT_MESSAGE: &str = "formatMessage";
const FORMATTED_MESSAGE: &str = "FormattedMessage";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallKind {
    Translate,
    FormatMessage,
}

/// Strip wrappers that do not change the runtime value.
pub fn unwrap_paren(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(paren) => unwrap_paren(&paren.expr),
        Expr::TsAs(ts_as) => unwrap_paren(&ts_as.expr),
        Expr::TsConstAssertion(ts_const) => unwrap_paren(&ts_const.expr),
        Expr::TsSatisfies(ts_sat) => unwrap_paren(&ts_sat.expr),
        _ => expr,
    }
}

fn string_literal(expr: &Expr) -> Option<&str> {
    match unwrap_paren(expr) {
        Expr::Lit(Lit::Str(s)) => s.value.as_str(),
        _ => None,
    }
}

/// Literal/ternary resolution of a key argument.
pub fn lower_key_expr(expr: &Expr) -> KeyShape {
    let literal_branch =
        |branch: &Expr| string_literal(branch).map_or(KeyShape::Unknown, KeyShape::literal);

    match unwrap_paren(expr) {
        Expr::Lit(Lit::Str(s)) => s.value.as_str().map_or(KeyShape::Unknown, KeyShape::literal),
        Expr::Cond(cond) => KeyShape::conditional(literal_branch(&cond.cons), literal_branch(&cond.alt)),
        _ => KeyShape::Unknown,
    }
}

/// The `id` property value of a `formatMessage` descriptor object.
fn message_id(expr: &Expr) -> Option<&Expr> {
    let Expr::Object(object) = unwrap_paren(expr) else {
        return None;
    };
    object.props.iter().find_map(|prop| match prop {
        PropOrSpread::Prop(prop) => match &**prop {
            Prop::KeyValue(kv) => {
                let is_id = match &kv.key {
                    PropName::Ident(ident) => ident.sym.as_str() == "id",
                    PropName::Str(s) => s.value.as_str() == Some("id"),
                    _ => false,
                };
                is_id.then_some(&*kv.value)
            }
            _ => None,
        },
        PropOrSpread::Spread(_) => None,
    })
}

pub struct ScriptKeyVisitor<'a> {
    options: &'a AnalysisOptions,
    pub keys: BTreeSet<String>,
}

impl<'a> ScriptKeyVisitor<'a> {
    pub fn new(options: &'a AnalysisOptions) -> Self {
        Self {
            options,
            keys: BTreeSet::new(),
        }
    }

    fn record(&mut self, shape: KeyShape) {
        for key in shape.candidates() {
            if !key.is_empty() {
                self.keys.insert(key);
            }
        }
    }

    fn call_kind(&self, callee: &Callee) -> Option<CallKind> {
        let Callee::Expr(callee) = callee else {
            return None;
        };
        match &**callee {
            Expr::Ident(ident) => {
                let name = ident.sym.as_str();
                if self.options.is_translation_helper(name) {
                    Some(CallKind::Translate)
                } else if name == FORMAT_MESSAGE {
                    Some(CallKind::FormatMessage)
                } else {
                    None
                }
            }
            Expr::Member(member) => {
                let MemberProp::Ident(prop) = &member.prop else {
                    return None;
                };
                let name = prop.sym.as_str();
                if self.options.is_translation_helper(name) {
                    Some(CallKind::Translate)
                } else if name == FORMAT_MESSAGE
                    && matches!(&*member.obj, Expr::Ident(obj) if obj.sym.as_str() == "intl")
                {
                    Some(CallKind::FormatMessage)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

impl Visit for ScriptKeyVisitor<'_> {
    fn visit_call_expr(&mut self, node: &CallExpr) {
        if let Some(kind) = self.call_kind(&node.callee)
            && let Some(arg) = node.args.first()
            && arg.spread.is_none()
        {
            let shape = match kind {
                CallKind::Translate => lower_key_expr(&arg.expr),
                CallKind::FormatMessage => {
                    message_id(&arg.expr).map_or(KeyShape::Unknown, lower_key_expr)
                }
            };
            self.record(shape);
        }

        node.visit_children_with(self);
    }

    fn visit_jsx_opening_element(&mut self, node: &JSXOpeningElement) {
        let is_formatted_message = matches!(
            &node.name,
            JSXElementName::Ident(ident) if ident.sym.as_str() == FORMATTED_MESSAGE
        );

        if is_formatted_message {
            for attr in &node.attrs {
                if let JSXAttrOrSpread::JSXAttr(JSXAttr {
                    name: JSXAttrName::Ident(name),
                    value: Some(value),
                    ..
                }) = attr
                    && name.sym.as_str() == "id"
                {
                    let shape = match value {
                        JSXAttrValue::Str(s) => {
                            s.value.as_str().map_or(KeyShape::Unknown, KeyShape::literal)
                        }
                        JSXAttrValue::JSXExprContainer(container) => match &container.expr {
                            JSXExpr::Expr(expr) => lower_key_expr(expr),
                            JSXExpr::JSXEmptyExpr(_) => KeyShape::Unknown,
                        },
                        _ => KeyShape::Unknown,
                    };
                    self.record(shape);
                }
            }
        }

        node.visit_children_with(self);
    }
}

/// Keys referenced by a parsed script module.
pub fn script_keys(module: &Module, options: &AnalysisOptions) -> BTreeSet<String> {
    let mut visitor = ScriptKeyVisitor::new(options);
    module.visit_with(&mut visitor);
    visitor.keys
}
