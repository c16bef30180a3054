//! Hand-written parser for component-template markup.
//!
//! Parsing runs in two passes: a scanner turns the source into a flat list
//! of nodes (text, comments, mustaches, block open/else/close markers), then
//! `build_tree` folds the markers into nested blocks.

use memchr::{memchr_iter, memchr2, memchr3, memmem};

use crate::core::parsers::template::ast::{Block, Call, Expr, HashPair, Mustache, Statement, Template};
use crate::core::{AnalyzerError, AnalyzerResult};

/// Parse markup source into a [`Template`].
///
/// Errors carry the 1-based line of the construct that failed.
pub fn parse_template(source: &str, file_path: &str) -> AnalyzerResult<Template> {
    let nodes = Scanner::new(source)
        .scan()
        .map_err(|err| err.into_error(file_path))?;
    build_tree(nodes).map_err(|err| err.into_error(file_path))
}

#[derive(Debug)]
struct SyntaxError {
    line: usize,
    message: String,
}

impl SyntaxError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }

    fn into_error(self, file_path: &str) -> AnalyzerError {
        AnalyzerError::parse(file_path, format!("line {}: {}", self.line, self.message))
    }
}

type ScanResult<T> = Result<T, SyntaxError>;

#[derive(Debug)]
enum Node {
    Text(String),
    Comment(String),
    Mustache(Mustache),
    Open {
        call: Call,
        block_params: Vec<String>,
        inverted: bool,
        line: usize,
    },
    Else {
        call: Option<Call>,
        block_params: Vec<String>,
        line: usize,
    },
    Close {
        name: String,
        line: usize,
    },
}

fn is_ident_byte(b: u8) -> bool {
    !b.is_ascii_whitespace()
        && !matches!(
            b,
            b'(' | b')' | b'{' | b'}' | b'=' | b'|' | b'"' | b'\'' | b'~'
        )
}

fn classify_word(word: &str) -> Expr {
    match word {
        "true" => Expr::Bool(true),
        "false" => Expr::Bool(false),
        "null" => Expr::Null,
        "undefined" => Expr::Undefined,
        _ if is_number(word) => Expr::Number(word.to_string()),
        _ => Expr::Path(word.to_string()),
    }
}

fn is_number(word: &str) -> bool {
    let digits = word.strip_prefix('-').unwrap_or(word);
    digits.as_bytes().first().is_some_and(u8::is_ascii_digit) && word.parse::<f64>().is_ok()
}

struct Scanner<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    /// Line of the mustache being scanned, for "unclosed" errors.
    open_line: usize,
    text: String,
    nodes: Vec<Node>,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            open_line: 1,
            text: String::new(),
            nodes: Vec::new(),
        }
    }

    fn scan(mut self) -> ScanResult<Vec<Node>> {
        while self.pos < self.bytes.len() {
            let Some(offset) = memchr3(b'{', b'<', b'\\', &self.bytes[self.pos..]) else {
                self.text.push_str(&self.source[self.pos..]);
                break;
            };
            let at = self.pos + offset;
            self.text.push_str(&self.source[self.pos..at]);
            self.pos = at;

            if self.starts_with("\\{{") {
                self.text.push_str("{{");
                self.pos += 3;
            } else if self.starts_with("{{") {
                self.flush_text();
                self.scan_mustache()?;
            } else if self.starts_with("<!--") {
                self.flush_text();
                self.scan_html_comment()?;
            } else {
                self.text.push(self.bytes[at] as char);
                self.pos += 1;
            }
        }
        self.flush_text();
        Ok(self.nodes)
    }

    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            self.nodes.push(Node::Text(std::mem::take(&mut self.text)));
        }
    }

    fn line_at(&self, pos: usize) -> usize {
        memchr_iter(b'\n', &self.bytes[..pos]).count() + 1
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn starts_with(&self, s: &str) -> bool {
        self.bytes[self.pos..].starts_with(s.as_bytes())
    }

    fn eat(&mut self, s: &str) -> bool {
        if self.starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(self.line_at(self.pos), message)
    }

    fn unclosed(&self, what: &str) -> SyntaxError {
        SyntaxError::new(self.open_line, format!("Unclosed {}", what))
    }

    fn unexpected(&self) -> SyntaxError {
        match self.source[self.pos..].chars().next() {
            Some(c) => self.error(format!("Unexpected character '{}'", c)),
            None => self.unclosed("mustache"),
        }
    }

    fn scan_html_comment(&mut self) -> ScanResult<()> {
        let line = self.line_at(self.pos);
        let body_start = self.pos + 4;
        let Some(offset) = memmem::find(&self.bytes[body_start..], b"-->") else {
            return Err(SyntaxError::new(line, "Unclosed comment"));
        };
        let body_end = body_start + offset;
        self.nodes
            .push(Node::Comment(self.source[body_start..body_end].to_string()));
        self.pos = body_end + 3;
        Ok(())
    }

    fn scan_mustache(&mut self) -> ScanResult<()> {
        let line = self.line_at(self.pos);
        self.open_line = line;
        self.pos += 2;

        if self.eat("{") {
            self.eat("~");
            let call = self.parse_inline_call()?;
            self.expect_close(true)?;
            self.nodes.push(Node::Mustache(Mustache {
                call,
                trusted: true,
                line,
            }));
            return Ok(());
        }

        self.eat("~");
        match self.peek() {
            Some(b'!') => self.scan_mustache_comment(),
            Some(b'>') => Err(SyntaxError::new(line, "Partials are not supported")),
            Some(b'#') => {
                self.pos += 1;
                if matches!(self.peek(), Some(b'>' | b'*')) {
                    return Err(SyntaxError::new(
                        line,
                        "Partial blocks and decorators are not supported",
                    ));
                }
                self.scan_block_open(false, line)
            }
            Some(b'^') => {
                self.pos += 1;
                let after_sigil = self.pos;
                self.skip_ws();
                self.eat("~");
                if self.eat("}}") {
                    self.nodes.push(Node::Else {
                        call: None,
                        block_params: Vec::new(),
                        line,
                    });
                    return Ok(());
                }
                self.pos = after_sigil;
                self.scan_block_open(true, line)
            }
            Some(b'/') => {
                self.pos += 1;
                self.skip_ws();
                let name = self.parse_word();
                if name.is_empty() {
                    return Err(self.error("Expected a block name"));
                }
                self.expect_close(false)?;
                self.nodes.push(Node::Close { name, line });
                Ok(())
            }
            Some(b'&') => {
                self.pos += 1;
                let call = self.parse_inline_call()?;
                self.expect_close(false)?;
                self.nodes.push(Node::Mustache(Mustache {
                    call,
                    trusted: true,
                    line,
                }));
                Ok(())
            }
            _ if self.at_keyword("else") => {
                self.pos += 4;
                let after_keyword = self.pos;
                self.skip_ws();
                self.eat("~");
                if self.eat("}}") {
                    self.nodes.push(Node::Else {
                        call: None,
                        block_params: Vec::new(),
                        line,
                    });
                    return Ok(());
                }
                self.pos = after_keyword;
                let (call, block_params) = self.parse_call(false)?;
                self.expect_close(false)?;
                self.nodes.push(Node::Else {
                    call: Some(call),
                    block_params,
                    line,
                });
                Ok(())
            }
            _ => {
                let call = self.parse_inline_call()?;
                self.expect_close(false)?;
                self.nodes.push(Node::Mustache(Mustache {
                    call,
                    trusted: false,
                    line,
                }));
                Ok(())
            }
        }
    }

    fn scan_mustache_comment(&mut self) -> ScanResult<()> {
        self.pos += 1;
        if self.eat("--") {
            let body_start = self.pos;
            loop {
                let Some(offset) = memmem::find(&self.bytes[self.pos..], b"--") else {
                    return Err(self.unclosed("comment"));
                };
                let dashes = self.pos + offset;
                self.pos = dashes + 2;
                if self.eat("}}") || self.eat("~}}") {
                    self.nodes
                        .push(Node::Comment(self.source[body_start..dashes].to_string()));
                    return Ok(());
                }
                self.pos = dashes + 1;
            }
        }

        let body_start = self.pos;
        let Some(offset) = memmem::find(&self.bytes[body_start..], b"}}") else {
            return Err(self.unclosed("comment"));
        };
        let body_end = body_start + offset;
        let body = self.source[body_start..body_end].trim_end_matches('~');
        self.nodes.push(Node::Comment(body.to_string()));
        self.pos = body_end + 2;
        Ok(())
    }

    fn scan_block_open(&mut self, inverted: bool, line: usize) -> ScanResult<()> {
        let (call, block_params) = self.parse_call(false)?;
        self.expect_close(false)?;
        self.nodes.push(Node::Open {
            call,
            block_params,
            inverted,
            line,
        });
        Ok(())
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        self.starts_with(keyword)
            && !self
                .bytes
                .get(self.pos + keyword.len())
                .is_some_and(|b| is_ident_byte(*b))
    }

    fn expect_close(&mut self, triple: bool) -> ScanResult<()> {
        self.skip_ws();
        self.eat("~");
        let close = if triple { "}}}" } else { "}}" };
        if self.eat(close) {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    /// A mustache call, which cannot declare block params.
    fn parse_inline_call(&mut self) -> ScanResult<Call> {
        let (call, block_params) = self.parse_call(false)?;
        if !block_params.is_empty() {
            return Err(self.error("Block params are only allowed on blocks"));
        }
        Ok(call)
    }

    fn parse_call(&mut self, in_sub_expr: bool) -> ScanResult<(Call, Vec<String>)> {
        self.skip_ws();
        if matches!(self.peek(), Some(b'}' | b'~' | b')')) {
            return Err(self.error("Expected an expression"));
        }
        let path = self.parse_expr(in_sub_expr)?;
        let mut params = Vec::new();
        let mut hash = Vec::new();
        let mut block_params = Vec::new();

        loop {
            self.skip_ws();
            match self.peek() {
                None if in_sub_expr => return Err(self.unclosed("sub-expression")),
                None => return Err(self.unclosed("mustache")),
                Some(b')') if in_sub_expr => break,
                Some(b'}' | b'~') if in_sub_expr => return Err(self.unclosed("sub-expression")),
                Some(b'}' | b'~') => break,
                Some(b')' | b'|' | b'=') => return Err(self.unexpected()),
                _ => {}
            }

            if let Some(key) = self.parse_hash_key() {
                let value = self.parse_expr(in_sub_expr)?;
                hash.push(HashPair { key, value });
            } else if self.eat_block_params_start() {
                block_params = self.parse_block_params()?;
            } else {
                params.push(self.parse_expr(in_sub_expr)?);
            }
        }

        Ok((Call { path, params, hash }, block_params))
    }

    fn parse_expr(&mut self, in_sub_expr: bool) -> ScanResult<Expr> {
        self.skip_ws();
        match self.peek() {
            None if in_sub_expr => Err(self.unclosed("sub-expression")),
            None => Err(self.unclosed("mustache")),
            Some(b'(') => {
                self.pos += 1;
                let (call, block_params) = self.parse_call(true)?;
                if !block_params.is_empty() {
                    return Err(self.error("Block params are only allowed on blocks"));
                }
                self.pos += 1;
                Ok(Expr::SubExpr(Box::new(call)))
            }
            Some(quote @ (b'"' | b'\'')) => self.parse_string(quote),
            Some(b) if is_ident_byte(b) => Ok(classify_word(&self.parse_word())),
            Some(_) => Err(self.unexpected()),
        }
    }

    fn parse_word(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_byte) {
            self.pos += 1;
        }
        self.source[start..self.pos].to_string()
    }

    /// `key=` (whitespace allowed around `=`); leaves the cursor untouched
    /// when the next word is not a hash key.
    fn parse_hash_key(&mut self) -> Option<String> {
        let start = self.pos;
        let word = self.parse_word();
        self.skip_ws();
        if !word.is_empty() && self.eat("=") {
            Some(word)
        } else {
            self.pos = start;
            None
        }
    }

    fn eat_block_params_start(&mut self) -> bool {
        let start = self.pos;
        if self.parse_word() == "as" {
            self.skip_ws();
            if self.eat("|") {
                return true;
            }
        }
        self.pos = start;
        false
    }

    fn parse_block_params(&mut self) -> ScanResult<Vec<String>> {
        let mut names = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some(b'|') => {
                    self.pos += 1;
                    return Ok(names);
                }
                Some(b) if is_ident_byte(b) => names.push(self.parse_word()),
                Some(_) => return Err(self.unexpected()),
                None => return Err(self.unclosed("block params")),
            }
        }
    }

    fn parse_string(&mut self, quote: u8) -> ScanResult<Expr> {
        let line = self.line_at(self.pos);
        self.pos += 1;
        let mut value = String::new();
        loop {
            let Some(offset) = memchr2(quote, b'\\', &self.bytes[self.pos..]) else {
                return Err(SyntaxError::new(line, "Unclosed string"));
            };
            let at = self.pos + offset;
            value.push_str(&self.source[self.pos..at]);
            if self.bytes[at] == b'\\' {
                if self.bytes.get(at + 1) == Some(&quote) {
                    value.push(quote as char);
                    self.pos = at + 2;
                } else {
                    value.push('\\');
                    self.pos = at + 1;
                }
            } else {
                self.pos = at + 1;
                return Ok(Expr::Str(value));
            }
        }
    }
}

/// An open block while its body is being collected.
struct Frame {
    call: Call,
    block_params: Vec<String>,
    inverted: bool,
    line: usize,
    program: Vec<Statement>,
    inverse: Option<Vec<Statement>>,
    /// Opened by `{{else if ...}}`; closes together with its parent.
    chained: bool,
}

impl Frame {
    fn push(&mut self, statement: Statement) {
        match &mut self.inverse {
            Some(inverse) => inverse.push(statement),
            None => self.program.push(statement),
        }
    }

    fn name(&self) -> &str {
        self.call.name().unwrap_or_default()
    }

    fn into_block(self) -> Block {
        Block {
            call: self.call,
            block_params: self.block_params,
            program: self.program,
            inverse: self.inverse,
            inverted: self.inverted,
            line: self.line,
        }
    }
}

fn push_statement(stack: &mut [Frame], root: &mut Vec<Statement>, statement: Statement) {
    match stack.last_mut() {
        Some(frame) => frame.push(statement),
        None => root.push(statement),
    }
}

fn build_tree(nodes: Vec<Node>) -> ScanResult<Template> {
    let mut root = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();

    for node in nodes {
        match node {
            Node::Text(text) => push_statement(&mut stack, &mut root, Statement::Text(text)),
            Node::Comment(text) => push_statement(&mut stack, &mut root, Statement::Comment(text)),
            Node::Mustache(mustache) => {
                push_statement(&mut stack, &mut root, Statement::Mustache(mustache))
            }
            Node::Open {
                call,
                block_params,
                inverted,
                line,
            } => stack.push(Frame {
                call,
                block_params,
                inverted,
                line,
                program: Vec::new(),
                inverse: None,
                chained: false,
            }),
            Node::Else {
                call,
                block_params,
                line,
            } => {
                let frame = stack
                    .last_mut()
                    .ok_or_else(|| SyntaxError::new(line, "Unexpected `{{else}}` outside of a block"))?;
                if frame.inverse.is_some() {
                    return Err(SyntaxError::new(
                        line,
                        format!("Duplicate `{{{{else}}}}` in `{{{{#{}}}}}`", frame.name()),
                    ));
                }
                frame.inverse = Some(Vec::new());
                if let Some(call) = call {
                    stack.push(Frame {
                        call,
                        block_params,
                        inverted: false,
                        line,
                        program: Vec::new(),
                        inverse: None,
                        chained: true,
                    });
                }
            }
            Node::Close { name, line } => {
                let mut frame = stack.pop().ok_or_else(|| {
                    SyntaxError::new(line, format!("Unexpected closing `{{{{/{}}}}}`", name))
                })?;
                while frame.chained {
                    let Some(mut parent) = stack.pop() else {
                        break;
                    };
                    parent.push(Statement::Block(frame.into_block()));
                    frame = parent;
                }
                if frame.name() != name {
                    return Err(SyntaxError::new(
                        line,
                        format!(
                            "`{{{{/{}}}}}` does not match `{{{{#{}}}}}` opened on line {}",
                            name,
                            frame.name(),
                            frame.line
                        ),
                    ));
                }
                push_statement(&mut stack, &mut root, Statement::Block(frame.into_block()));
            }
        }
    }

    if let Some(frame) = stack.iter().rev().find(|frame| !frame.chained) {
        return Err(SyntaxError::new(
            frame.line,
            format!("Unclosed block `{{{{#{}}}}}`", frame.name()),
        ));
    }

    Ok(Template { body: root })
}
