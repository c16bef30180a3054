//! Indentation-based templates (`.emblem`), transpiled to markup.
//!
//! Supported subset:
//!
//! ```text
//! / comment                       dropped, with its nested lines
//! | text {{t "inline"}}           text; nested lines are text too
//! ' text                          text followed by a space
//! = t "key"                       {{t "key"}}
//! == t "html"                     {{{t "html"}}}
//! <div>raw html</div>             copied as is
//! h1.title#main = t "title"       <h1 class="title" id="main">{{t "title"}}</h1>
//! input placeholder=(t "hint")    <input placeholder={{t "hint"}}>
//! if cond                         {{#if cond}} ... {{else}} ... {{/if}}
//!   | yes
//! else
//!   | no
//! my-component title=(t "x")      {{my-component title=(t "x")}}
//! ```

use crate::core::{AnalyzerError, AnalyzerResult};

const HTML_TAGS: &[&str] = &[
    "a", "abbr", "address", "article", "aside", "audio", "b", "blockquote", "body", "br",
    "button", "canvas", "caption", "code", "col", "colgroup", "dd", "details", "dialog", "div",
    "dl", "dt", "em", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3",
    "h4", "h5", "h6", "head", "header", "hr", "html", "i", "iframe", "img", "input", "label",
    "legend", "li", "link", "main", "meta", "nav", "ol", "optgroup", "option", "p", "pre",
    "section", "select", "small", "source", "span", "strong", "sub", "summary", "sup", "svg",
    "table", "tbody", "td", "textarea", "tfoot", "th", "thead", "title", "tr", "u", "ul",
    "video",
];

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Transpile an Emblem document into equivalent markup.
pub fn emblem_to_markup(source: &str, file_path: &str) -> AnalyzerResult<String> {
    let into_error = |err: EmblemError| {
        AnalyzerError::parse(file_path, format!("line {}: {}", err.line, err.message))
    };

    let lines = split_lines(source).map_err(into_error)?;
    let mut pos = 0;
    let indent = lines.first().map_or(0, |line| line.indent);
    let nodes = parse_block(&lines, &mut pos, indent).map_err(into_error)?;
    if let Some(line) = lines.get(pos) {
        return Err(into_error(EmblemError::new(
            line.number,
            "Inconsistent indentation",
        )));
    }

    let mut output = Vec::new();
    render_nodes(&nodes, &mut output).map_err(into_error)?;
    let mut markup = output.join("\n");
    markup.push('\n');
    Ok(markup)
}

#[derive(Debug)]
struct EmblemError {
    line: usize,
    message: String,
}

impl EmblemError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

type EmblemResult<T> = Result<T, EmblemError>;

struct SourceLine<'a> {
    number: usize,
    indent: usize,
    text: &'a str,
}

#[derive(Debug)]
struct LineNode<'a> {
    number: usize,
    text: &'a str,
    children: Vec<LineNode<'a>>,
}

fn split_lines(source: &str) -> EmblemResult<Vec<SourceLine<'_>>> {
    let mut lines = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let text = raw.trim();
        if text.is_empty() {
            continue;
        }
        let leading = &raw[..raw.len() - raw.trim_start().len()];
        if leading.contains('\t') {
            return Err(EmblemError::new(
                index + 1,
                "Tabs are not allowed for indentation",
            ));
        }
        lines.push(SourceLine {
            number: index + 1,
            indent: leading.len(),
            text,
        });
    }
    Ok(lines)
}

fn parse_block<'a>(
    lines: &[SourceLine<'a>],
    pos: &mut usize,
    indent: usize,
) -> EmblemResult<Vec<LineNode<'a>>> {
    let mut nodes = Vec::new();
    while let Some(line) = lines.get(*pos) {
        if line.indent < indent {
            break;
        }
        *pos += 1;
        let mut node = LineNode {
            number: line.number,
            text: line.text,
            children: Vec::new(),
        };
        if let Some(next) = lines.get(*pos)
            && next.indent > indent
        {
            let child_indent = next.indent;
            node.children = parse_block(lines, pos, child_indent)?;
            if let Some(after) = lines.get(*pos)
                && after.indent > indent
                && after.indent < child_indent
            {
                return Err(EmblemError::new(after.number, "Inconsistent indentation"));
            }
        }
        nodes.push(node);
    }
    Ok(nodes)
}

fn mustache(expr: &str) -> String {
    format!("{{{{{}}}}}", expr.trim())
}

fn triple_mustache(expr: &str) -> String {
    format!("{{{{{{{}}}}}}}", expr.trim())
}

fn is_else(text: &str) -> bool {
    text == "else" || text.starts_with("else ")
}

fn strip_text_marker(text: &str) -> &str {
    text.strip_prefix(' ').unwrap_or(text)
}

fn push_text_lines(nodes: &[LineNode], output: &mut Vec<String>) {
    for node in nodes {
        output.push(node.text.to_string());
        push_text_lines(&node.children, output);
    }
}

fn render_nodes(nodes: &[LineNode], output: &mut Vec<String>) -> EmblemResult<()> {
    let mut index = 0;
    while let Some(node) = nodes.get(index) {
        index += 1;
        let text = node.text;

        if is_else(text) {
            return Err(EmblemError::new(
                node.number,
                "`else` without a preceding block",
            ));
        }

        if text.starts_with('/') {
            continue;
        }

        if let Some(rest) = text.strip_prefix('|') {
            output.push(strip_text_marker(rest).to_string());
            push_text_lines(&node.children, output);
            continue;
        }

        if let Some(rest) = text.strip_prefix('\'') {
            output.push(format!("{} ", strip_text_marker(rest)));
            push_text_lines(&node.children, output);
            continue;
        }

        if text.starts_with('<') {
            output.push(text.to_string());
            render_nodes(&node.children, output)?;
            continue;
        }

        let (expr, triple) = if let Some(expr) = text.strip_prefix("==") {
            (expr.trim(), true)
        } else if let Some(expr) = text.strip_prefix('=') {
            (expr.trim(), false)
        } else if let Some(element) = parse_element(text).map_err(|message| {
            EmblemError::new(node.number, message)
        })? {
            render_element(&element, node, output)?;
            continue;
        } else {
            (text, false)
        };

        // Following `else` siblings continue this block.
        let else_count = nodes[index..]
            .iter()
            .take_while(|sibling| is_else(sibling.text))
            .count();

        if node.children.is_empty() && else_count == 0 {
            output.push(if triple {
                triple_mustache(expr)
            } else {
                mustache(expr)
            });
            continue;
        }

        let name = expr.split_whitespace().next().unwrap_or_default();
        output.push(mustache(&format!("#{}", expr)));
        render_nodes(&node.children, output)?;
        for branch in &nodes[index..index + else_count] {
            output.push(mustache(branch.text));
            render_nodes(&branch.children, output)?;
        }
        output.push(mustache(&format!("/{}", name)));
        index += else_count;
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
struct Element {
    tag: String,
    classes: Vec<String>,
    id: Option<String>,
    attributes: Vec<String>,
    inline: String,
}

fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn is_attr_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '@')
}

fn take_while_chars(text: &str, pred: fn(char) -> bool) -> (&str, &str) {
    let end = text.find(|c: char| !pred(c)).unwrap_or(text.len());
    text.split_at(end)
}

/// `None` when the line is not an element line.
fn parse_element(text: &str) -> Result<Option<Element>, String> {
    let (tag, mut rest) = if let Some(after) = text.strip_prefix('%') {
        let (tag, rest) = take_while_chars(after, is_tag_char);
        if tag.is_empty() {
            return Ok(None);
        }
        (tag, rest)
    } else if text.starts_with('.') || text.starts_with('#') {
        ("div", text)
    } else {
        let (tag, rest) = take_while_chars(text, is_tag_char);
        let boundary = rest
            .chars()
            .next()
            .is_none_or(|c| c.is_whitespace() || matches!(c, '.' | '#' | '='));
        if !HTML_TAGS.contains(&tag) || !boundary {
            return Ok(None);
        }
        (tag, rest)
    };

    let mut classes = Vec::new();
    let mut id = None;
    loop {
        if let Some(after) = rest.strip_prefix('.') {
            let (name, remaining) = take_while_chars(after, is_name_char);
            if name.is_empty() {
                break;
            }
            classes.push(name.to_string());
            rest = remaining;
        } else if let Some(after) = rest.strip_prefix('#') {
            let (name, remaining) = take_while_chars(after, is_name_char);
            if name.is_empty() {
                break;
            }
            id = Some(name.to_string());
            rest = remaining;
        } else {
            break;
        }
    }

    let mut attributes = Vec::new();
    loop {
        let trimmed = rest.trim_start();
        let (name, after_name) = take_while_chars(trimmed, is_attr_name_char);
        if name.is_empty() || !after_name.starts_with('=') || after_name.starts_with("==") {
            break;
        }
        let (value, remaining) = parse_attr_value(&after_name[1..])?;
        attributes.push(format!("{}={}", name, value));
        rest = remaining;
    }

    let inline = rest.trim();
    let inline = if let Some(expr) = inline.strip_prefix("==") {
        triple_mustache(expr)
    } else if let Some(expr) = inline.strip_prefix('=') {
        mustache(expr)
    } else if let Some(text) = inline.strip_prefix('|') {
        strip_text_marker(text).to_string()
    } else {
        inline.to_string()
    };

    Ok(Some(Element {
        tag: tag.to_string(),
        classes,
        id,
        attributes,
        inline,
    }))
}

/// Attribute value as markup, plus the unparsed remainder of the line.
fn parse_attr_value(text: &str) -> Result<(String, &str), String> {
    match text.chars().next() {
        Some(quote @ ('"' | '\'')) => {
            let close = text[1..]
                .find(quote)
                .ok_or_else(|| "Unclosed attribute value".to_string())?;
            let end = close + 2;
            Ok((text[..end].to_string(), &text[end..]))
        }
        Some('(') => {
            let mut depth = 0usize;
            let mut quote = None;
            for (offset, c) in text.char_indices() {
                match (quote, c) {
                    (Some(q), _) if c == q => quote = None,
                    (Some(_), _) => {}
                    (None, '"' | '\'') => quote = Some(c),
                    (None, '(') => depth += 1,
                    (None, ')') => {
                        depth -= 1;
                        if depth == 0 {
                            let inner = &text[1..offset];
                            return Ok((mustache(inner), &text[offset + 1..]));
                        }
                    }
                    _ => {}
                }
            }
            Err("Unclosed sub-expression".to_string())
        }
        Some(c) if !c.is_whitespace() => {
            let end = text.find(char::is_whitespace).unwrap_or(text.len());
            Ok((mustache(&text[..end]), &text[end..]))
        }
        _ => Err("Missing attribute value".to_string()),
    }
}

fn render_element(element: &Element, node: &LineNode, output: &mut Vec<String>) -> EmblemResult<()> {
    let mut open = format!("<{}", element.tag);
    if !element.classes.is_empty() {
        open.push_str(&format!(" class=\"{}\"", element.classes.join(" ")));
    }
    if let Some(id) = &element.id {
        open.push_str(&format!(" id=\"{}\"", id));
    }
    for attribute in &element.attributes {
        open.push(' ');
        open.push_str(attribute);
    }
    open.push('>');
    open.push_str(&element.inline);

    let is_void = VOID_TAGS.contains(&element.tag.as_str());
    if node.children.is_empty() {
        if !is_void {
            open.push_str(&format!("</{}>", element.tag));
        }
        output.push(open);
        return Ok(());
    }

    output.push(open);
    render_nodes(&node.children, output)?;
    if !is_void {
        output.push(format!("</{}>", element.tag));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::core::parsers::emblem::*;
    use pretty_assertions::assert_eq;

    fn transpile(source: &str) -> String {
        emblem_to_markup(source, "app/templates/test.emblem").unwrap()
    }

    #[test]
    fn test_element_with_shorthands_and_inline_mustache() {
        assert_eq!(
            transpile("h1.title.big#main = t \"page.title\"\n"),
            "<h1 class=\"title big\" id=\"main\">{{t \"page.title\"}}</h1>\n"
        );
    }

    #[test]
    fn test_nested_elements_and_text() {
        let source = "\
section
  p
    | Hello {{t \"greeting\"}}
      still text
  %custom-tag.x
";
        assert_eq!(
            transpile(source),
            "<section>\n<p>\nHello {{t \"greeting\"}}\nstill text\n</p>\n<custom-tag class=\"x\"></custom-tag>\n</section>\n"
        );
    }

    #[test]
    fn test_attributes() {
        assert_eq!(
            transpile("input type=\"text\" placeholder=(t \"form.hint\") value=name\n"),
            "<input type=\"text\" placeholder={{t \"form.hint\"}} value={{name}}>\n"
        );
    }

    #[test]
    fn test_block_with_else_chain() {
        let source = "\
if isOpen
  = t \"state.open\"
else if isPending
  | pending
else
  == t \"state.closed\"
";
        assert_eq!(
            transpile(source),
            "{{#if isOpen}}\n{{t \"state.open\"}}\n{{else if isPending}}\npending\n{{else}}\n{{{t \"state.closed\"}}}\n{{/if}}\n"
        );
    }

    #[test]
    fn test_mustache_lines_and_comments() {
        let source = "\
/ a comment
  with nested lines
my-component title=(t \"component.title\")
= yield
' spaced
<div class=\"raw\">
";
        assert_eq!(
            transpile(source),
            "{{my-component title=(t \"component.title\")}}\n{{yield}}\nspaced \n<div class=\"raw\">\n"
        );
    }

    #[test]
    fn test_each_block_params() {
        assert_eq!(
            transpile("each items as |item|\n  li = item.name\n"),
            "{{#each items as |item|}}\n<li>{{item.name}}</li>\n{{/each}}\n"
        );
    }

    #[test]
    fn test_tabs_are_rejected() {
        let err = emblem_to_markup("div\n\tp\n", "app/templates/test.emblem").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to parse app/templates/test.emblem: line 2: Tabs are not allowed for indentation"
        );
    }

    #[test]
    fn test_inconsistent_dedent() {
        let err = emblem_to_markup("div\n    p\n  span\n", "app/templates/test.emblem").unwrap_err();
        assert!(err.to_string().contains("line 3: Inconsistent indentation"));
    }

    #[test]
    fn test_dedent_below_first_line() {
        let err = emblem_to_markup("  p = t \"a\"\nh1 = t \"b\"\n", "app/templates/test.emblem")
            .unwrap_err();
        assert!(err.to_string().contains("line 2: Inconsistent indentation"));
    }

    #[test]
    fn test_stray_else() {
        let err = emblem_to_markup("p\nelse\n", "app/templates/test.emblem").unwrap_err();
        assert!(err.to_string().contains("`else` without a preceding block"));
    }

    #[test]
    fn test_unclosed_attribute() {
        let err = emblem_to_markup("a href=\"/x\n", "app/templates/test.emblem").unwrap_err();
        assert!(err.to_string().contains("line 1: Unclosed attribute value"));
    }
}
