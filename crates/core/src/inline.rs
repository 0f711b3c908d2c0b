//! Inline formatter: Markdown phrasing content to flat [`TextSpan`] runs.
//!
//! Nested markup is flattened: every emitted span carries the union of the
//! flags active at that point, and adjacent runs with identical style are
//! merged, so the output is the minimal sequence of non-overlapping spans.

use markdown::mdast::Node;

use crate::ir::TextSpan;
use crate::parse::parse_markdown;

/// Formatting active while walking the tree.
#[derive(Debug, Clone, Default)]
struct Style {
    bold: bool,
    italic: bool,
    strike: bool,
    code: bool,
    href: Option<String>,
}

impl Style {
    fn span(&self, text: &str) -> TextSpan {
        TextSpan {
            text: text.to_string(),
            bold: self.bold,
            italic: self.italic,
            strike: self.strike,
            code: self.code,
            superscript: false,
            href: self.href.clone(),
            footnote_ref: None,
        }
    }
}

#[derive(Default)]
struct SpanBuilder {
    spans: Vec<TextSpan>,
}

impl SpanBuilder {
    fn push(&mut self, text: &str, style: &Style) {
        if text.is_empty() {
            return;
        }
        let span = style.span(text);
        match self.spans.last_mut() {
            Some(last) if last.same_style(&span) => last.text.push_str(text),
            _ => self.spans.push(span),
        }
    }

    fn finish(self) -> Vec<TextSpan> {
        self.spans
            .into_iter()
            .flat_map(split_footnote_refs)
            .collect()
    }
}

/// Formats a standalone Markdown snippet (directive values, footnote bodies,
/// callout bodies). Separate blocks are joined with a newline.
pub fn format_inline(source: &str) -> Vec<TextSpan> {
    match parse_markdown(source) {
        Ok(root) => spans_from_blocks(root.children().into_iter().flatten()),
        Err(err) => {
            log::debug!("inline fragment kept verbatim: {}", err);
            let trimmed = source.trim();
            if trimmed.is_empty() {
                Vec::new()
            } else {
                vec![TextSpan::plain(trimmed)]
            }
        }
    }
}

/// Flattens phrasing nodes (the children of a paragraph, heading or cell).
pub fn spans_from_nodes(nodes: &[Node]) -> Vec<TextSpan> {
    let mut builder = SpanBuilder::default();
    let style = Style::default();
    for node in nodes {
        flatten(node, &style, &mut builder);
    }
    builder.finish()
}

/// Flattens block nodes, joining each text-bearing block with a newline.
pub fn spans_from_blocks<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Vec<TextSpan> {
    let mut builder = SpanBuilder::default();
    let mut first = true;
    for phrasing in text_blocks(nodes) {
        if !first {
            builder.push("\n", &Style::default());
        }
        first = false;
        match phrasing {
            TextBlock::Phrasing(children) => {
                for node in children {
                    flatten(node, &Style::default(), &mut builder);
                }
            }
            TextBlock::Code(code) => {
                let style = Style {
                    code: true,
                    ..Style::default()
                };
                builder.push(code, &style);
            }
        }
    }
    builder.finish()
}

enum TextBlock<'a> {
    Phrasing(&'a [Node]),
    Code(&'a str),
}

/// Collects text-bearing blocks in document order, descending into containers.
fn text_blocks<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Vec<TextBlock<'a>> {
    let mut out = Vec::new();
    let mut stack: Vec<&Node> = nodes.into_iter().collect();
    stack.reverse();
    while let Some(node) = stack.pop() {
        match node {
            Node::Paragraph(p) => out.push(TextBlock::Phrasing(&p.children)),
            Node::Heading(h) => out.push(TextBlock::Phrasing(&h.children)),
            Node::TableCell(c) => out.push(TextBlock::Phrasing(&c.children)),
            Node::Code(c) => out.push(TextBlock::Code(&c.value)),
            Node::Blockquote(_) | Node::List(_) | Node::ListItem(_) | Node::Table(_) | Node::TableRow(_) => {
                if let Some(children) = node.children() {
                    stack.extend(children.iter().rev());
                }
            }
            _ => {}
        }
    }
    out
}

fn flatten(node: &Node, style: &Style, out: &mut SpanBuilder) {
    match node {
        Node::Text(text) => out.push(&text.value, style),
        Node::InlineCode(code) => {
            let inner = Style {
                code: true,
                ..style.clone()
            };
            out.push(&code.value, &inner);
        }
        Node::Strong(strong) => {
            let inner = Style {
                bold: true,
                ..style.clone()
            };
            flatten_all(&strong.children, &inner, out);
        }
        Node::Emphasis(emphasis) => {
            let inner = Style {
                italic: true,
                ..style.clone()
            };
            flatten_all(&emphasis.children, &inner, out);
        }
        Node::Delete(delete) => {
            let inner = Style {
                strike: true,
                ..style.clone()
            };
            flatten_all(&delete.children, &inner, out);
        }
        Node::Link(link) => {
            let inner = Style {
                href: Some(link.url.clone()),
                ..style.clone()
            };
            flatten_all(&link.children, &inner, out);
        }
        Node::Break(_) => out.push("\n", style),
        Node::Image(image) => out.push(&image.alt, style),
        Node::ImageReference(image) => out.push(&image.alt, style),
        Node::Html(html) => out.push(&html.value, style),
        Node::FootnoteReference(reference) => {
            let label = reference.label.as_deref().unwrap_or(&reference.identifier);
            out.push(&format!("[^{}]", label), style);
        }
        other => {
            if let Some(children) = other.children() {
                flatten_all(children, style, out);
            }
        }
    }
}

fn flatten_all(nodes: &[Node], style: &Style, out: &mut SpanBuilder) {
    for node in nodes {
        flatten(node, style, out);
    }
}

/// Splits `[^id]` tokens out of a span into footnote reference spans that
/// display as `[id]` until the footnote collector numbers them.
fn split_footnote_refs(span: TextSpan) -> Vec<TextSpan> {
    if span.code || !span.text.contains("[^") {
        return vec![span];
    }

    let mut pieces = Vec::new();
    let mut rest = span.text.as_str();
    while let Some(start) = rest.find("[^") {
        let after = &rest[start + 2..];
        let Some(end) = after.find(']') else {
            break;
        };
        let id = &after[..end];
        if id.is_empty() || id.contains(|c: char| c.is_whitespace() || c == '[' || c == '^') {
            // not a reference; keep the `[^` literally and continue after it
            let (head, tail) = rest.split_at(start + 2);
            push_text(&mut pieces, &span, head);
            rest = tail;
            continue;
        }
        push_text(&mut pieces, &span, &rest[..start]);
        pieces.push(TextSpan {
            text: format!("[{}]", id),
            footnote_ref: Some(id.to_string()),
            ..span.clone()
        });
        rest = &after[end + 1..];
    }
    push_text(&mut pieces, &span, rest);
    pieces
}

fn push_text(pieces: &mut Vec<TextSpan>, template: &TextSpan, text: &str) {
    if text.is_empty() {
        return;
    }
    match pieces.last_mut() {
        Some(last) if last.same_style(template) => last.text.push_str(text),
        _ => pieces.push(TextSpan {
            text: text.to_string(),
            ..template.clone()
        }),
    }
}

/// Trims leading whitespace of the first span and trailing whitespace of the
/// last, dropping spans that become empty.
pub fn trim_spans(mut spans: Vec<TextSpan>) -> Vec<TextSpan> {
    while let Some(first) = spans.first_mut() {
        let trimmed = first.text.trim_start().to_string();
        if trimmed.is_empty() {
            spans.remove(0);
        } else {
            first.text = trimmed;
            break;
        }
    }
    while let Some(last) = spans.last_mut() {
        let trimmed = last.text.trim_end().to_string();
        if trimmed.is_empty() {
            spans.pop();
        } else {
            last.text = trimmed;
            break;
        }
    }
    spans
}
