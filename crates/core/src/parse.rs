//! markdown-rs configuration for the slide dialect.

use markdown::mdast::Node;
use markdown::message::{Message, Place};
use thiserror::Error;

/// markdown-rs rejected a fragment.
#[derive(Debug, Clone, Error)]
#[error("Parse error at {line}:{column}: {message}")]
pub struct MarkdownError {
    /// Parser message.
    pub message: String,
    /// 1-indexed line inside the fragment.
    pub line: usize,
    /// 1-indexed column.
    pub column: usize,
}

/// Parse options for slide bodies.
///
/// GFM tables, strikethrough and autolink literals are on. Frontmatter,
/// footnotes and directives are handled before markdown-rs sees the text,
/// so those constructs stay off. Raw HTML is never interpreted and indented
/// code is disabled because column and directive bodies are often indented.
pub fn markdown_options() -> markdown::ParseOptions {
    let constructs = markdown::Constructs {
        code_indented: false,
        frontmatter: false,
        html_flow: false,
        html_text: false,
        gfm_autolink_literal: true,
        gfm_footnote_definition: false,
        gfm_label_start_footnote: false,
        gfm_strikethrough: true,
        gfm_table: true,
        gfm_task_list_item: false,
        ..markdown::Constructs::default()
    };

    markdown::ParseOptions {
        constructs,
        ..markdown::ParseOptions::default()
    }
}

/// Parse a Markdown fragment into an MDAST root.
pub fn parse_markdown(input: &str) -> Result<Node, MarkdownError> {
    markdown::to_mdast(input, &markdown_options()).map_err(|err| {
        let (line, column) = message_location(&err);
        MarkdownError {
            message: err.to_string(),
            line,
            column,
        }
    })
}

fn message_location(message: &Message) -> (usize, usize) {
    match message.place.as_deref() {
        Some(Place::Point(point)) => (point.line, point.column),
        Some(Place::Position(position)) => (position.start.line, position.start.column),
        None => (1, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_gfm_table() {
        let root = parse_markdown("| a | b |\n|:--|--:|\n| 1 | 2 |").unwrap();
        let children = root.children().unwrap();
        assert!(matches!(children[0], Node::Table(_)));
    }

    #[test]
    fn raw_html_stays_text() {
        let root = parse_markdown("<div>hi</div>").unwrap();
        let children = root.children().unwrap();
        assert!(matches!(children[0], Node::Paragraph(_)));
    }

    #[test]
    fn indented_lines_are_not_code() {
        let root = parse_markdown("    indented").unwrap();
        let children = root.children().unwrap();
        assert!(matches!(children[0], Node::Paragraph(_)));
    }
}
