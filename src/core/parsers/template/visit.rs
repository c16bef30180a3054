use crate::core::parsers::template::ast::{Block, Call, Expr, Mustache, Statement, Template};

/// Visitor over the markup tree.
///
/// Default methods walk into every child; override a method and call the
/// matching `walk_*` function to keep descending.
pub trait TemplateVisitor {
    fn visit_mustache(&mut self, mustache: &Mustache) {
        walk_call(self, &mustache.call);
    }

    fn visit_block(&mut self, block: &Block) {
        walk_block(self, block);
    }

    fn visit_sub_expression(&mut self, call: &Call) {
        walk_call(self, call);
    }

    fn visit_text(&mut self, _text: &str) {}

    fn visit_comment(&mut self, _text: &str) {}
}

pub fn walk_template<V: TemplateVisitor + ?Sized>(visitor: &mut V, template: &Template) {
    walk_statements(visitor, &template.body);
}

pub fn walk_statements<V: TemplateVisitor + ?Sized>(visitor: &mut V, statements: &[Statement]) {
    for statement in statements {
        match statement {
            Statement::Text(text) => visitor.visit_text(text),
            Statement::Comment(text) => visitor.visit_comment(text),
            Statement::Mustache(mustache) => visitor.visit_mustache(mustache),
            Statement::Block(block) => visitor.visit_block(block),
        }
    }
}

pub fn walk_block<V: TemplateVisitor + ?Sized>(visitor: &mut V, block: &Block) {
    walk_call(visitor, &block.call);
    walk_statements(visitor, &block.program);
    if let Some(inverse) = &block.inverse {
        walk_statements(visitor, inverse);
    }
}

pub fn walk_call<V: TemplateVisitor + ?Sized>(visitor: &mut V, call: &Call) {
    walk_expr(visitor, &call.path);
    for param in &call.params {
        walk_expr(visitor, param);
    }
    for pair in &call.hash {
        walk_expr(visitor, &pair.value);
    }
}

pub fn walk_expr<V: TemplateVisitor + ?Sized>(visitor: &mut V, expr: &Expr) {
    match expr {
        Expr::SubExpr(call) => visitor.visit_sub_expression(call),
        Expr::Path(_)
        | Expr::Str(_)
        | Expr::Number(_)
        | Expr::Bool(_)
        | Expr::Null
        | Expr::Undefined => {}
    }
}
