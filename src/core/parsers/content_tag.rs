//! `<template>` preprocessing for single-file components (`.gjs`, `.gts`).
//!
//! Every `<template>…</template>` region is rewritten into a call of
//! `template` from `@ember/template-compiler` so the result is plain script
//! that swc can parse:
//!
//! ```text
//! const Greeting = <template>Hi</template>;     // expression
//! class A { <template>Hi</template> }          // class member
//! <template>Hi</template>                       // top-level statement
//! ```
//!
//! becomes
//!
//! ```text
//! const Greeting = tpl(`Hi`);
//! class A { static { tpl(`Hi`); } }
//! export default tpl(`Hi`);
//! ```
//!
//! Line breaks are kept in place so parse errors still point at the right line.

use memchr::{memchr, memchr_iter, memmem};

use crate::core::{AnalyzerError, AnalyzerResult};

pub const TEMPLATE_COMPILER_MODULE: &str = "@ember/template-compiler";
pub const TEMPLATE_EXPORT: &str = "template";

const OPEN_TAG: &[u8] = b"<template";
const CLOSE_TAG: &[u8] = b"</template";

/// Words after which an expression may start.
const EXPRESSION_KEYWORDS: &[&str] = &[
    "return", "default", "typeof", "yield", "await", "in", "of", "case", "throw", "void",
    "delete", "else", "do", "instanceof", "new", "extends",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Brace {
    Block,
    ClassBody,
    /// `${` inside a template literal.
    Interpolation,
}

/// The last significant token before the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Last {
    Start,
    Punct(u8),
    ExprKeyword,
    /// Identifier, literal, `)` or `]`.
    Operand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Expression,
    ClassMember,
    TopLevel,
    Statement,
}

/// Rewrite all `<template>` regions of `source` into placeholder calls.
pub fn preprocess(source: &str, file_path: &str) -> AnalyzerResult<String> {
    let template_fn = unique_local_name(source);
    let mut scanner = Scanner {
        source,
        bytes: source.as_bytes(),
        pos: 0,
        copied_to: 0,
        braces: Vec::new(),
        paren_depth: 0,
        pending_class: None,
        last: Last::Start,
        output: format!(
            "import {{ {} as {} }} from \"{}\";",
            TEMPLATE_EXPORT, template_fn, TEMPLATE_COMPILER_MODULE
        ),
        template_fn: &template_fn,
    };
    scanner.run(file_path)?;

    Ok(scanner.output)
}

fn unique_local_name(source: &str) -> String {
    let mut name = "__intl_template__".to_string();
    let mut suffix = 0;
    while source.contains(&name) {
        suffix += 1;
        name = format!("__intl_template_{}__", suffix);
    }
    name
}

/// Escape raw text for a template literal whose cooked value is the text.
fn escape_template_literal(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '`' => escaped.push_str("\\`"),
            '$' if chars.peek() == Some(&'{') => escaped.push_str("\\$"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b == b'#' || b >= 0x80
}

struct Scanner<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    copied_to: usize,
    braces: Vec<Brace>,
    paren_depth: usize,
    /// Paren depth at which a `class` keyword is waiting for its body.
    pending_class: Option<usize>,
    last: Last,
    output: String,
    template_fn: &'a str,
}

impl Scanner<'_> {
    fn run(&mut self, file_path: &str) -> AnalyzerResult<()> {
        if self.bytes.starts_with(b"#!") {
            self.skip_line_comment();
        }

        while let Some(&b) = self.bytes.get(self.pos) {
            let next = self.bytes.get(self.pos + 1).copied();
            match b {
                b'/' if next == Some(b'/') => self.skip_line_comment(),
                b'/' if next == Some(b'*') => self.skip_block_comment(),
                b'/' if self.expression_allowed() => {
                    self.skip_regex();
                    self.last = Last::Operand;
                }
                b'\'' | b'"' => {
                    self.skip_string(b);
                    self.last = Last::Operand;
                }
                b'`' => {
                    self.pos += 1;
                    self.skip_template_literal();
                }
                b'<' if self.at_template_open() => self.replace_region(file_path)?,
                b'{' => {
                    let brace = if self.pending_class == Some(self.paren_depth) {
                        self.pending_class = None;
                        Brace::ClassBody
                    } else {
                        Brace::Block
                    };
                    self.braces.push(brace);
                    self.last = Last::Punct(b'{');
                    self.pos += 1;
                }
                b'}' => {
                    self.pos += 1;
                    if self.braces.pop() == Some(Brace::Interpolation) {
                        self.skip_template_literal();
                    } else {
                        self.last = Last::Punct(b'}');
                    }
                }
                b'(' | b'[' => {
                    self.paren_depth += 1;
                    self.last = Last::Punct(b);
                    self.pos += 1;
                }
                b')' | b']' => {
                    self.paren_depth = self.paren_depth.saturating_sub(1);
                    self.last = Last::Operand;
                    self.pos += 1;
                }
                _ if b.is_ascii_whitespace() => self.pos += 1,
                _ if is_word_byte(b) => self.scan_word(),
                _ => {
                    self.last = Last::Punct(b);
                    self.pos += 1;
                }
            }
        }

        self.output.push_str(&self.source[self.copied_to..]);
        Ok(())
    }

    fn expression_allowed(&self) -> bool {
        !matches!(self.last, Last::Operand)
    }

    fn line_at(&self, pos: usize) -> usize {
        memchr_iter(b'\n', &self.bytes[..pos]).count() + 1
    }

    /// Only whitespace precedes `pos` on its line.
    fn at_line_start(&self, pos: usize) -> bool {
        self.bytes[..pos]
            .iter()
            .rev()
            .take_while(|b| **b != b'\n')
            .all(u8::is_ascii_whitespace)
    }

    fn at_tag(&self, pos: usize, tag: &[u8]) -> bool {
        self.bytes[pos..].starts_with(tag)
            && self
                .bytes
                .get(pos + tag.len())
                .is_some_and(|b| *b == b'>' || b.is_ascii_whitespace())
    }

    fn at_template_open(&self) -> bool {
        self.at_tag(self.pos, OPEN_TAG)
            && (self.expression_allowed() || self.at_line_start(self.pos))
    }

    fn placement(&self) -> Placement {
        let statement = match self.last {
            Last::Start | Last::Punct(b';') | Last::Punct(b'}') | Last::Punct(b'{') => true,
            Last::Operand => true,
            Last::Punct(_) | Last::ExprKeyword => false,
        };
        if !statement {
            Placement::Expression
        } else if self.braces.last() == Some(&Brace::ClassBody) {
            Placement::ClassMember
        } else if self.braces.is_empty() && self.paren_depth == 0 {
            Placement::TopLevel
        } else {
            Placement::Statement
        }
    }

    fn replace_region(&mut self, file_path: &str) -> AnalyzerResult<()> {
        let start = self.pos;
        let line = self.line_at(start);
        let unclosed =
            || AnalyzerError::parse(file_path, format!("line {}: Unclosed <template>", line));

        let open_end = memchr(b'>', &self.bytes[start..])
            .map(|offset| start + offset + 1)
            .ok_or_else(unclosed)?;
        let (content_end, region_end) = self.find_close(open_end).ok_or_else(unclosed)?;

        let content = &self.source[open_end..content_end];
        let call = format!("{}(`{}`)", self.template_fn, escape_template_literal(content));
        let replacement = match self.placement() {
            Placement::Expression => call,
            Placement::ClassMember => format!("static {{ {}; }}", call),
            Placement::TopLevel => format!("export default {};", call),
            Placement::Statement => format!("{};", call),
        };

        let tag_newlines = memchr_iter(b'\n', &self.bytes[start..open_end]).count()
            + memchr_iter(b'\n', &self.bytes[content_end..region_end]).count();

        self.output.push_str(&self.source[self.copied_to..start]);
        self.output.push_str(&replacement);
        self.output.push_str(&"\n".repeat(tag_newlines));

        self.pos = region_end;
        self.copied_to = region_end;
        self.last = Last::Operand;
        Ok(())
    }

    /// Matching `</template>` for a region whose content starts at `from`.
    /// Nested `<template>` elements inside the content are balanced.
    fn find_close(&self, from: usize) -> Option<(usize, usize)> {
        let mut depth = 0usize;
        let mut pos = from;
        loop {
            let at = pos + memchr(b'<', &self.bytes[pos..])?;
            if self.at_tag(at, CLOSE_TAG) {
                if depth == 0 {
                    let end = at + memchr(b'>', &self.bytes[at..])? + 1;
                    return Some((at, end));
                }
                depth -= 1;
            } else if self.at_tag(at, OPEN_TAG) {
                depth += 1;
            }
            pos = at + 1;
        }
    }

    fn scan_word(&mut self) {
        let start = self.pos;
        while self.bytes.get(self.pos).is_some_and(|b| is_word_byte(*b)) {
            self.pos += 1;
        }
        let word = &self.source[start..self.pos];
        let after_dot = start > 0 && self.bytes[start - 1] == b'.';

        if word == "class" && !after_dot {
            self.pending_class = Some(self.paren_depth);
            self.last = Last::ExprKeyword;
        } else if EXPRESSION_KEYWORDS.contains(&word) && !after_dot {
            self.last = Last::ExprKeyword;
        } else {
            self.last = Last::Operand;
        }
    }

    fn skip_line_comment(&mut self) {
        self.pos = match memchr(b'\n', &self.bytes[self.pos..]) {
            Some(offset) => self.pos + offset,
            None => self.bytes.len(),
        };
    }

    fn skip_block_comment(&mut self) {
        self.pos = match memmem::find(&self.bytes[self.pos + 2..], b"*/") {
            Some(offset) => self.pos + 2 + offset + 2,
            None => self.bytes.len(),
        };
    }

    fn skip_string(&mut self, quote: u8) {
        self.pos += 1;
        while let Some(&b) = self.bytes.get(self.pos) {
            match b {
                b'\\' => self.pos += 2,
                b'\n' => return,
                _ if b == quote => {
                    self.pos += 1;
                    return;
                }
                _ => self.pos += 1,
            }
        }
    }

    fn skip_regex(&mut self) {
        self.pos += 1;
        let mut in_class = false;
        while let Some(&b) = self.bytes.get(self.pos) {
            match b {
                b'\\' => self.pos += 2,
                b'\n' => return,
                b'[' => {
                    in_class = true;
                    self.pos += 1;
                }
                b']' => {
                    in_class = false;
                    self.pos += 1;
                }
                b'/' if !in_class => {
                    self.pos += 1;
                    while self.bytes.get(self.pos).is_some_and(u8::is_ascii_alphabetic) {
                        self.pos += 1;
                    }
                    return;
                }
                _ => self.pos += 1,
            }
        }
    }

    /// Continue a template literal until its closing backtick or the next
    /// `${`, which hands control back to the main loop.
    fn skip_template_literal(&mut self) {
        self.last = Last::Operand;
        while let Some(&b) = self.bytes.get(self.pos) {
            match b {
                b'\\' => self.pos += 2,
                b'`' => {
                    self.pos += 1;
                    return;
                }
                b'$' if self.bytes.get(self.pos + 1) == Some(&b'{') => {
                    self.pos += 2;
                    self.braces.push(Brace::Interpolation);
                    self.last = Last::Punct(b'$');
                    return;
                }
                _ => self.pos += 1,
            }
        }
    }
}
