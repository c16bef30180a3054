//! Component-template markup (`.hbs`): syntax tree, parser and visitor.

pub mod ast;
pub mod parser;
pub mod visit;

pub use ast::{Block, Call, Expr, HashPair, Mustache, Statement, Template};
pub use parser::parse_template;
pub use visit::{TemplateVisitor, walk_block, walk_call, walk_expr, walk_statements, walk_template};
