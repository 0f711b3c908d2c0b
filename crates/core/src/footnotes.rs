//! Footnote definitions and reference numbering.
//!
//! Definitions (`[^id]: text`) may appear anywhere in a slide outside fenced
//! code. They are lifted out of the source before block compilation; after
//! compilation every reference span is numbered in first-reference order and
//! the slide gets one footnotes block.

use std::collections::{HashMap, HashSet};

use crate::code_fence::FenceTracker;
use crate::error::{SlideContext, WarningKind};
use crate::inline::{format_inline, trim_spans};
use crate::ir::{FootnoteItem, SlideBlock, TextSpan, plain_text, visit_spans_mut};

/// A definition lifted out of slide source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FootnoteDefinition {
    /// Label between `[^` and `]`.
    pub id: String,
    /// Raw Markdown body, continuation lines joined with a space.
    pub text: String,
}

/// Parses `[^id]: text` with up to three leading spaces.
fn parse_definition_line(line: &str) -> Option<(&str, &str)> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        return None;
    }
    let rest = line[indent..].strip_prefix("[^")?;
    let (id, body) = rest.split_once("]:")?;
    if id.is_empty() || id.contains(|c: char| c.is_whitespace() || c == '[' || c == ']' || c == '^') {
        return None;
    }
    Some((id, body.trim()))
}

fn is_continuation(line: &str) -> bool {
    !line.trim().is_empty() && (line.starts_with("  ") || line.starts_with('\t'))
}

/// Removes definitions from `source`, returning the remaining source and the
/// definitions in source order. Later duplicates are dropped with a warning.
pub fn extract_definitions(
    source: &str,
    ctx: &mut SlideContext<'_>,
) -> (String, Vec<FootnoteDefinition>) {
    let lines: Vec<&str> = source.lines().collect();
    let mut remaining = String::with_capacity(source.len());
    let mut definitions: Vec<FootnoteDefinition> = Vec::new();
    let mut fence = FenceTracker::new();
    let mut index = 0;

    while index < lines.len() {
        let line = lines[index];
        index += 1;

        if fence.observe(line) {
            remaining.push_str(line);
            remaining.push('\n');
            continue;
        }

        let Some((id, body)) = parse_definition_line(line) else {
            remaining.push_str(line);
            remaining.push('\n');
            continue;
        };

        let mut text = body.to_string();
        while index < lines.len() && is_continuation(lines[index]) {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(lines[index].trim());
            index += 1;
        }
        // keep neighbouring paragraphs apart
        remaining.push('\n');

        if definitions.iter().any(|existing| existing.id == id) {
            ctx.warn(
                WarningKind::DuplicateFootnote,
                format!("Footnote '{}' is defined more than once; keeping the first", id),
            );
            continue;
        }
        definitions.push(FootnoteDefinition {
            id: id.to_string(),
            text,
        });
    }

    (remaining, definitions)
}

/// Numbers footnote references in the slide title, then in `blocks`, and
/// returns the footnotes to show.
///
/// `used_ids` holds ids emitted on earlier slides; a reused label gets a
/// `-N` suffix so ids stay unique across the document.
pub fn collect_footnotes(
    title: &mut Vec<TextSpan>,
    blocks: &mut [SlideBlock],
    definitions: &[FootnoteDefinition],
    used_ids: &mut HashSet<String>,
    ctx: &mut SlideContext<'_>,
) -> Vec<FootnoteItem> {
    let defined: HashMap<&str, &FootnoteDefinition> = definitions
        .iter()
        .map(|definition| (definition.id.as_str(), definition))
        .collect();

    // label -> (number, emitted id), in first-reference order
    let mut order: Vec<(String, u32, String)> = Vec::new();
    let mut unresolved: Vec<String> = Vec::new();

    let mut number_refs = |spans: &mut Vec<TextSpan>| {
        for span in spans.iter_mut() {
            let Some(label) = span.footnote_ref.take() else {
                continue;
            };
            if !defined.contains_key(label.as_str()) {
                if !unresolved.contains(&label) {
                    unresolved.push(label);
                }
                continue;
            }
            let (number, id) = match order.iter().position(|(seen, _, _)| *seen == label) {
                Some(position) => (order[position].1, order[position].2.clone()),
                None => {
                    let number = order.len() as u32 + 1;
                    let id = unique_id(&label, used_ids);
                    order.push((label, number, id.clone()));
                    (number, id)
                }
            };
            span.text = format!("[{}]", number);
            span.footnote_ref = Some(id);
        }
        merge_adjacent(spans);
    };
    number_refs(title);
    visit_spans_mut(blocks, &mut number_refs);

    for label in &unresolved {
        ctx.warn(
            WarningKind::UnresolvedFootnote,
            format!("Footnote reference [^{}] has no definition", label),
        );
    }
    for definition in definitions {
        if !order.iter().any(|(label, _, _)| *label == definition.id) {
            log::debug!("footnote '{}' is never referenced", definition.id);
        }
    }

    order
        .into_iter()
        .filter_map(|(label, number, id)| {
            let definition = defined.get(label.as_str())?;
            let mut spans = trim_spans(format_inline(&definition.text));
            for span in &mut spans {
                span.footnote_ref = None;
            }
            merge_adjacent(&mut spans);
            Some(FootnoteItem {
                id,
                number,
                text: plain_text(&spans),
                spans,
            })
        })
        .collect()
}

fn unique_id(label: &str, used_ids: &mut HashSet<String>) -> String {
    if used_ids.insert(label.to_string()) {
        return label.to_string();
    }
    let mut suffix = 2;
    loop {
        let candidate = format!("{}-{}", label, suffix);
        if used_ids.insert(candidate.clone()) {
            return candidate;
        }
        suffix += 1;
    }
}

/// Merges neighbouring spans that ended up with the same style.
fn merge_adjacent(spans: &mut Vec<TextSpan>) {
    let mut merged: Vec<TextSpan> = Vec::with_capacity(spans.len());
    for span in spans.drain(..) {
        match merged.last_mut() {
            Some(last) if last.same_style(&span) => last.text.push_str(&span.text),
            _ => merged.push(span),
        }
    }
    *spans = merged;
}
