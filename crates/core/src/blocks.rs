//! Block compiler: slide Markdown to [`SlideBlock`]s.

use markdown::mdast::{self, AlignKind, Node};

use crate::directives::{
    DirectiveKind, DirectiveOpening, MAX_COLUMNS, Segment, column_layout, compile_callout,
    compile_figma, split_columns, split_segments,
};
use crate::error::{SlideContext, WarningKind};
use crate::image::compile_image;
use crate::inline::{spans_from_blocks, spans_from_nodes, trim_spans};
use crate::ir::{
    BulletItem, SlideBlock, SlideType, TableAlign, TableCell, TextSpan, plain_text,
};
use crate::normalize::{bullet_marker, ordered_marker};
use crate::parse::parse_markdown;

/// Body of one slide after block compilation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledBody {
    /// Layout chosen by the leading heading.
    pub slide_type: SlideType,
    /// Text of the heading that titled the slide.
    pub title: Option<String>,
    /// Formatted runs of the title heading.
    pub title_spans: Vec<TextSpan>,
    /// Blocks in source order.
    pub blocks: Vec<SlideBlock>,
}

/// Where blocks are being compiled. Headings inside columns never title the slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Slide,
    Column,
}

/// Compiles a slide body whose frontmatter and footnote definitions are already removed.
pub fn compile_slide_body(source: &str, ctx: &mut SlideContext<'_>) -> CompiledBody {
    let mut slide_type = SlideType::default();
    let mut title = None;
    let titles = TitleSlot {
        scope: Scope::Slide,
        slide_type: &mut slide_type,
        title: &mut title,
    };
    let blocks = compile_source(source, titles, ctx);
    let (title, title_spans) = match title {
        Some(spans) => (Some(plain_text(&spans)), spans),
        None => (None, Vec::new()),
    };
    CompiledBody {
        slide_type,
        title,
        title_spans,
        blocks,
    }
}

/// Receives the first level-1 or level-2 heading at slide scope.
struct TitleSlot<'s> {
    scope: Scope,
    slide_type: &'s mut SlideType,
    title: &'s mut Option<Vec<TextSpan>>,
}

impl TitleSlot<'_> {
    /// Takes the heading as the slide title when it qualifies.
    fn offer(&mut self, depth: u8, spans: &[TextSpan]) -> bool {
        if self.scope != Scope::Slide || depth > 2 || self.title.is_some() {
            return false;
        }
        *self.title = Some(spans.to_vec());
        *self.slide_type = if depth == 1 {
            SlideType::Title
        } else {
            SlideType::Content
        };
        true
    }

    fn nested(&mut self, scope: Scope) -> TitleSlot<'_> {
        TitleSlot {
            scope,
            slide_type: &mut *self.slide_type,
            title: &mut *self.title,
        }
    }
}

fn compile_source(
    source: &str,
    mut titles: TitleSlot<'_>,
    ctx: &mut SlideContext<'_>,
) -> Vec<SlideBlock> {
    let mut blocks = Vec::new();
    for segment in split_segments(source) {
        match segment {
            Segment::Markdown(text) => compile_markdown(&text, &mut titles, ctx, &mut blocks),
            Segment::Directive { opening, body } => {
                compile_directive(&opening, &body, &mut titles, ctx, &mut blocks)
            }
        }
    }
    blocks
}

fn compile_nested(
    source: &str,
    titles: &mut TitleSlot<'_>,
    scope: Scope,
    ctx: &mut SlideContext<'_>,
) -> Vec<SlideBlock> {
    compile_source(source, titles.nested(scope), ctx)
}

fn compile_directive(
    opening: &DirectiveOpening,
    body: &[String],
    titles: &mut TitleSlot<'_>,
    ctx: &mut SlideContext<'_>,
    out: &mut Vec<SlideBlock>,
) {
    match &opening.kind {
        DirectiveKind::Columns => compile_columns(opening, body, titles, ctx, out),
        DirectiveKind::Figma => {
            if let Some(card) = compile_figma(opening, body, ctx) {
                out.push(SlideBlock::Figma(card));
            }
        }
        DirectiveKind::Callout(kind) => out.push(compile_callout(*kind, opening, body, ctx)),
        DirectiveKind::Unknown(name) => {
            log::debug!("unknown directive '{}' compiled as markdown", name);
            let scope = titles.scope;
            out.extend(compile_nested(&body.join("\n"), titles, scope, ctx));
        }
    }
}

fn compile_columns(
    opening: &DirectiveOpening,
    body: &[String],
    titles: &mut TitleSlot<'_>,
    ctx: &mut SlideContext<'_>,
    out: &mut Vec<SlideBlock>,
) {
    let sources = split_columns(body);

    if titles.scope == Scope::Column {
        ctx.warn(
            WarningKind::NestedColumns,
            "Columns inside a column were flattened",
        );
        for source in &sources {
            out.extend(compile_nested(source, titles, Scope::Column, ctx));
        }
        return;
    }

    let written = sources.len();
    match written {
        0 => {
            log::debug!("columns directive without columns omitted");
            return;
        }
        1 => {
            ctx.warn(
                WarningKind::ColumnCount,
                "Columns block with a single column was flattened",
            );
            out.extend(compile_nested(&sources[0], titles, Scope::Column, ctx));
            return;
        }
        n if n > MAX_COLUMNS => ctx.warn(
            WarningKind::ColumnCount,
            format!(
                "Columns block has {} columns; keeping the first {}",
                n, MAX_COLUMNS
            ),
        ),
        _ => {}
    }

    let kept = written.min(MAX_COLUMNS);
    let layout = column_layout(opening, written, kept, ctx);
    let columns = sources
        .iter()
        .take(kept)
        .map(|source| compile_nested(source, titles, Scope::Column, ctx))
        .collect();

    out.push(SlideBlock::Columns {
        columns,
        gap: layout.gap,
        widths: layout.widths,
    });
}

fn compile_markdown(
    source: &str,
    titles: &mut TitleSlot<'_>,
    ctx: &mut SlideContext<'_>,
    out: &mut Vec<SlideBlock>,
) {
    let root = match parse_markdown(source) {
        Ok(root) => root,
        Err(err) => {
            log::debug!("markdown kept as text: {}", err);
            let text = source.trim();
            if !text.is_empty() {
                out.push(SlideBlock::paragraph(vec![TextSpan::plain(text)]));
            }
            return;
        }
    };

    for node in root.children().into_iter().flatten() {
        match node {
            Node::Heading(heading) => {
                warn_inline_images(&heading.children, "a heading", ctx);
                let spans = trim_spans(spans_from_nodes(&heading.children));
                let text = plain_text(&spans);
                if text.is_empty() || titles.offer(heading.depth, &spans) {
                    continue;
                }
                out.push(SlideBlock::Heading {
                    level: heading.depth.clamp(1, 4),
                    text,
                    spans,
                });
            }
            Node::Paragraph(paragraph) => split_paragraph(&paragraph.children, ctx, out),
            Node::List(list) => {
                warn_inline_images(&list.children, "a list item", ctx);
                out.push(compile_list(list));
            }
            Node::Code(code) => out.push(SlideBlock::Code {
                language: code.lang.clone().filter(|lang| !lang.is_empty()),
                code: code.value.clone(),
            }),
            Node::Blockquote(quote) => {
                warn_inline_images(&quote.children, "a blockquote", ctx);
                let spans = trim_spans(spans_from_blocks(&quote.children));
                if !spans.is_empty() {
                    out.push(SlideBlock::Blockquote {
                        text: plain_text(&spans),
                        spans,
                    });
                }
            }
            Node::Table(table) => {
                warn_inline_images(&table.children, "a table cell", ctx);
                out.push(compile_table(table));
            }
            Node::ThematicBreak(_) | Node::Definition(_) => {}
            other => log::debug!("skipping unsupported {} block", node_name(other)),
        }
    }
}

fn node_name(node: &Node) -> &'static str {
    match node {
        Node::Html(_) => "html",
        Node::Math(_) => "math",
        Node::Yaml(_) | Node::Toml(_) => "frontmatter",
        _ => "node",
    }
}

/// Emits a paragraph's text runs, splitting images out into their own blocks.
/// An image wrapped in a link becomes an image block carrying the link target.
fn split_paragraph(children: &[Node], ctx: &mut SlideContext<'_>, out: &mut Vec<SlideBlock>) {
    let mut run: Vec<Node> = Vec::new();
    for node in children {
        match node {
            Node::Image(image) => {
                push_paragraph(&std::mem::take(&mut run), out);
                out.push(SlideBlock::Image(compile_image(&image.url, &image.alt, ctx)));
            }
            Node::Link(link) if link.children.iter().any(is_image) => {
                for child in &link.children {
                    if let Node::Image(image) = child {
                        push_paragraph(&std::mem::take(&mut run), out);
                        let mut block = compile_image(&image.url, &image.alt, ctx);
                        block.href = Some(link.url.clone());
                        out.push(SlideBlock::Image(block));
                    } else {
                        warn_inline_images(std::slice::from_ref(child), "formatted text", ctx);
                        run.push(Node::Link(mdast::Link {
                            children: vec![child.clone()],
                            position: None,
                            url: link.url.clone(),
                            title: link.title.clone(),
                        }));
                    }
                }
            }
            other => {
                warn_inline_images(std::slice::from_ref(other), "formatted text", ctx);
                run.push(other.clone());
            }
        }
    }
    push_paragraph(&run, out);
}

fn is_image(node: &Node) -> bool {
    matches!(node, Node::Image(_))
}

/// Warns about images that can only be shown through their alt text.
fn warn_inline_images(nodes: &[Node], place: &str, ctx: &mut SlideContext<'_>) {
    let mut stack: Vec<&Node> = nodes.iter().rev().collect();
    while let Some(node) = stack.pop() {
        if let Node::Image(image) = node {
            ctx.warn(
                WarningKind::UnsupportedImage,
                format!(
                    "Image '{}' inside {} is shown as its alt text",
                    image.url, place
                ),
            );
        }
        if let Some(children) = node.children() {
            stack.extend(children.iter().rev());
        }
    }
}

fn push_paragraph(nodes: &[Node], out: &mut Vec<SlideBlock>) {
    let spans = trim_spans(spans_from_nodes(nodes));
    if !spans.is_empty() {
        out.push(SlideBlock::paragraph(spans));
    }
}

/// A list item waiting to be built, with the metadata of the list it came from.
struct PendingItem<'a> {
    item: &'a mdast::ListItem,
    ordered: bool,
    start: Option<u32>,
    number: u32,
}

fn pending_items(list: &mdast::List) -> Vec<PendingItem<'_>> {
    let first = list.start.unwrap_or(1);
    list.children
        .iter()
        .filter_map(|node| match node {
            Node::ListItem(item) => Some(item),
            _ => None,
        })
        .enumerate()
        .map(|(offset, item)| PendingItem {
            item,
            ordered: list.ordered,
            start: list.ordered.then_some(first),
            number: first.saturating_add(offset as u32),
        })
        .collect()
}

/// Items at one depth: those still to visit and those already built.
struct ListFrame<'a> {
    pending: std::vec::IntoIter<PendingItem<'a>>,
    depth: usize,
    built: Vec<BulletItem>,
}

/// Builds the bullet tree with an explicit stack. A child frame is pushed
/// right after its owner is built, so the owner is always the parent
/// frame's last item when the child frame completes.
fn compile_list(list: &mdast::List) -> SlideBlock {
    let mut stack = vec![ListFrame {
        pending: pending_items(list).into_iter(),
        depth: 0,
        built: Vec::new(),
    }];

    let items = loop {
        let Some(frame) = stack.last_mut() else {
            break Vec::new();
        };
        match frame.pending.next() {
            Some(pending) => {
                let depth = frame.depth;
                frame.built.push(build_item(&pending, depth));

                let nested: Vec<PendingItem<'_>> = pending
                    .item
                    .children
                    .iter()
                    .filter_map(|node| match node {
                        Node::List(list) => Some(pending_items(list)),
                        _ => None,
                    })
                    .flatten()
                    .collect();
                if !nested.is_empty() {
                    stack.push(ListFrame {
                        pending: nested.into_iter(),
                        depth: depth + 1,
                        built: Vec::new(),
                    });
                }
            }
            None => {
                let Some(done) = stack.pop() else {
                    break Vec::new();
                };
                match stack.last_mut() {
                    Some(parent) => {
                        if let Some(owner) = parent.built.last_mut() {
                            owner.children = done.built;
                        }
                    }
                    None => break done.built,
                }
            }
        }
    };

    SlideBlock::Bullets {
        items,
        ordered: list.ordered,
        start: list.ordered.then(|| list.start.unwrap_or(1)),
    }
}

fn build_item(pending: &PendingItem<'_>, depth: usize) -> BulletItem {
    let spans = trim_spans(spans_from_blocks(
        pending
            .item
            .children
            .iter()
            .filter(|node| !matches!(node, Node::List(_))),
    ));
    let marker = if pending.ordered {
        ordered_marker(depth, pending.number)
    } else {
        bullet_marker(depth).to_string()
    };
    BulletItem {
        text: plain_text(&spans),
        spans,
        marker,
        ordered: pending.ordered,
        start: pending.start,
        children: Vec::new(),
    }
}

fn compile_table(table: &mdast::Table) -> SlideBlock {
    let mut rows = table.children.iter().filter_map(|node| match node {
        Node::TableRow(row) => Some(compile_row(row)),
        _ => None,
    });
    let headers = rows.next().unwrap_or_default();
    let rows: Vec<Vec<TableCell>> = rows.collect();
    let align = table
        .align
        .iter()
        .map(|kind| match kind {
            AlignKind::Left => Some(TableAlign::Left),
            AlignKind::Center => Some(TableAlign::Center),
            AlignKind::Right => Some(TableAlign::Right),
            AlignKind::None => None,
        })
        .collect();
    SlideBlock::Table {
        headers,
        rows,
        align,
    }
}

fn compile_row(row: &mdast::TableRow) -> Vec<TableCell> {
    row.children
        .iter()
        .filter_map(|node| match node {
            Node::TableCell(cell) => {
                let spans = trim_spans(spans_from_nodes(&cell.children));
                Some(TableCell {
                    text: plain_text(&spans),
                    spans,
                })
            }
            _ => None,
        })
        .collect()
}
