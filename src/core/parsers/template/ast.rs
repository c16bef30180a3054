//! Syntax tree of component-template markup.
//!
//! Only the mustache layer is modeled. HTML is kept as opaque text because no
//! translation key can live in plain markup.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Text(String),
    /// `{{! }}`, `{{!-- --}}` or `<!-- -->`.
    Comment(String),
    Mustache(Mustache),
    Block(Block),
}

/// `{{path params hash}}` or the trusting `{{{ }}}` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mustache {
    pub call: Call,
    pub trusted: bool,
    pub line: usize,
}

/// `{{#path ...}} program {{else}} inverse {{/path}}`.
///
/// `{{else if x}}` chains are nested blocks inside `inverse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub call: Call,
    pub block_params: Vec<String>,
    pub program: Vec<Statement>,
    pub inverse: Option<Vec<Statement>>,
    /// Opened with `{{^path}}`.
    pub inverted: bool,
    pub line: usize,
}

/// The head of a mustache, block or sub-expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub path: Expr,
    pub params: Vec<Expr>,
    pub hash: Vec<HashPair>,
}

impl Call {
    /// The helper name when the head is a path.
    pub fn name(&self) -> Option<&str> {
        match &self.path {
            Expr::Path(path) => Some(path),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashPair {
    pub key: String,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// `foo`, `this.foo`, `@arg`, `../parent`.
    Path(String),
    /// `(helper params hash)`.
    SubExpr(Box<Call>),
    Str(String),
    /// Kept as written.
    Number(String),
    Bool(bool),
    Null,
    Undefined,
}
