//! Intermediate representation emitted by the compiler.
//!
//! The serde shape of these types is the wire contract with the renderer:
//! blocks are internally tagged by `kind`, fields are camelCase, absent
//! options and false flags are omitted.

use serde::{Deserialize, Serialize};

use crate::config::{
    Background, HorizontalAlign, SlideNumberConfig, SlideStyles, TitlePrefixConfig,
    TransitionConfig, VerticalAlign,
};
use crate::normalize::link::FigmaLink;

fn is_false(value: &bool) -> bool {
    !*value
}

/// A run of text sharing one set of formatting flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSpan {
    /// Visible text.
    pub text: String,
    /// Bold weight.
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    /// Italic style.
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    /// Strikethrough.
    #[serde(default, skip_serializing_if = "is_false")]
    pub strike: bool,
    /// Monospace inline code.
    #[serde(default, skip_serializing_if = "is_false")]
    pub code: bool,
    /// Superscript.
    #[serde(default, skip_serializing_if = "is_false")]
    pub superscript: bool,
    /// Link target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Footnote id when this span is a resolved footnote reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footnote_ref: Option<String>,
}

impl TextSpan {
    /// An unformatted span.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// True when both spans carry the same flags and link target.
    pub fn same_style(&self, other: &TextSpan) -> bool {
        self.bold == other.bold
            && self.italic == other.italic
            && self.strike == other.strike
            && self.code == other.code
            && self.superscript == other.superscript
            && self.href == other.href
            && self.footnote_ref.is_none()
            && other.footnote_ref.is_none()
    }
}

/// Concatenates span text.
pub fn plain_text(spans: &[TextSpan]) -> String {
    spans.iter().map(|span| span.text.as_str()).collect()
}

/// One list item and its nested items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletItem {
    /// Plain text of the item.
    pub text: String,
    /// Formatted text of the item.
    pub spans: Vec<TextSpan>,
    /// Display marker (`•`, `1.`, `a.`, ...).
    pub marker: String,
    /// Whether the list this item belongs to is ordered.
    #[serde(default, skip_serializing_if = "is_false")]
    pub ordered: bool,
    /// Start number of the ordered list this item belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
    /// Nested items, one level deeper.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BulletItem>,
}

/// One table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    /// Plain text of the cell.
    pub text: String,
    /// Formatted text of the cell.
    pub spans: Vec<TextSpan>,
}

/// Column alignment read from the table delimiter row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub enum TableAlign {
    Left,
    Center,
    Right,
}

/// Where the renderer must load image bytes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageSource {
    /// Schemeless path, resolved by the host's file loader.
    Local,
    /// `http(s)://` URL, fetched by the host.
    Remote,
}

/// Explicit image size in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageSize {
    /// Width in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Height in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

/// Absolute position in pixels on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal offset.
    pub x: f64,
    /// Vertical offset.
    pub y: f64,
}

/// An image reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBlock {
    /// Path or URL as written.
    pub url: String,
    /// Loader that resolves the bytes.
    pub source: ImageSource,
    /// Alt label left after removing sizing tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// Explicit size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<ImageSize>,
    /// Explicit position. Set only when both `x` and `y` are given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// The image cannot be placed; render the alt label instead.
    #[serde(default, skip_serializing_if = "is_false")]
    pub placeholder: bool,
    /// Target of the link wrapping the image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// A text layer override inside a figma card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextOverride {
    /// Layer name inside the linked node.
    pub layer: String,
    /// Plain text.
    pub text: String,
    /// Formatted text.
    pub spans: Vec<TextSpan>,
}

/// A link card pointing at a Figma node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FigmaBlock {
    /// Validated link.
    pub link: FigmaLink,
    /// Absolute x placement in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// Absolute y placement in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// Text overrides in source order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub text_overrides: Vec<TextOverride>,
}

/// Callout flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub enum CalloutKind {
    Note,
    Tip,
    Warning,
    Caution,
}

impl CalloutKind {
    /// Maps a directive name to a callout kind.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "note" => Some(CalloutKind::Note),
            "tip" => Some(CalloutKind::Tip),
            "warning" => Some(CalloutKind::Warning),
            "caution" => Some(CalloutKind::Caution),
            _ => None,
        }
    }
}

/// A resolved footnote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootnoteItem {
    /// Label used in the source (`a` in `[^a]`).
    pub id: String,
    /// Display number, in first-reference order.
    pub number: u32,
    /// Plain text of the definition.
    pub text: String,
    /// Formatted text of the definition.
    pub spans: Vec<TextSpan>,
}

/// One block on a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "kind",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum SlideBlock {
    /// Body paragraph.
    Paragraph {
        /// Plain text.
        text: String,
        /// Formatted text.
        spans: Vec<TextSpan>,
    },
    /// In-body heading, level 1 to 4.
    Heading {
        /// Heading level.
        level: u8,
        /// Plain text.
        text: String,
        /// Formatted text.
        spans: Vec<TextSpan>,
    },
    /// Bullet or numbered list tree.
    Bullets {
        /// Root items.
        items: Vec<BulletItem>,
        /// Whether the root list is ordered.
        #[serde(default, skip_serializing_if = "is_false")]
        ordered: bool,
        /// Start number of the root list.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start: Option<u32>,
    },
    /// Fenced code.
    Code {
        /// Info-string language.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        /// Code text.
        code: String,
    },
    /// Image or unsupported-image placeholder.
    Image(ImageBlock),
    /// Quoted text.
    Blockquote {
        /// Plain text.
        text: String,
        /// Formatted text.
        spans: Vec<TextSpan>,
    },
    /// Table with header row.
    Table {
        /// Header cells.
        headers: Vec<TableCell>,
        /// Body rows.
        rows: Vec<Vec<TableCell>>,
        /// Per-column alignment; `null` when unspecified.
        align: Vec<Option<TableAlign>>,
    },
    /// Link card to a Figma node.
    Figma(FigmaBlock),
    /// Footnote list appended at the end of a slide.
    Footnotes {
        /// Footnotes in first-reference order.
        items: Vec<FootnoteItem>,
    },
    /// Note, tip, warning or caution box.
    Callout {
        /// Callout flavour.
        #[serde(rename = "type")]
        callout_type: CalloutKind,
        /// Optional bracket title.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        /// Plain text.
        text: String,
        /// Formatted text.
        spans: Vec<TextSpan>,
    },
    /// Multi-column layout.
    Columns {
        /// Blocks of each column, left to right.
        columns: Vec<Vec<SlideBlock>>,
        /// Gap between columns in pixels.
        gap: f64,
        /// Column widths as fractions of the column area, summing to 1.
        widths: Vec<f64>,
    },
}

impl SlideBlock {
    /// Paragraph from spans.
    pub fn paragraph(spans: Vec<TextSpan>) -> Self {
        SlideBlock::Paragraph {
            text: plain_text(&spans),
            spans,
        }
    }
}

/// Slide layout chosen by its leading heading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlideType {
    /// Slide led by a level-1 heading.
    Title,
    /// Any other slide.
    #[default]
    Content,
}

/// One compiled slide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideContent {
    /// Title or content layout.
    #[serde(rename = "type")]
    pub slide_type: SlideType,
    /// Text of the leading level-1/level-2 heading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Body blocks in source order.
    pub blocks: Vec<SlideBlock>,
    /// Footnotes bound to this slide.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub footnotes: Vec<FootnoteItem>,
    /// Resolved background.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,
    /// Resolved text styles.
    #[serde(default, skip_serializing_if = "SlideStyles::is_empty")]
    pub styles: SlideStyles,
    /// Slide number display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slide_number: Option<SlideNumberConfig>,
    /// Title prefix component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_prefix: Option<TitlePrefixConfig>,
    /// Horizontal content alignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<HorizontalAlign>,
    /// Vertical content alignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valign: Option<VerticalAlign>,
    /// Transition into this slide.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<TransitionConfig>,
}

/// The compiled deck: slides in source order, serialized as a JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    /// Slides in source order.
    pub slides: Vec<SlideContent>,
}

/// Visits every `(text, spans)` pair in document order and lets the caller
/// rewrite the spans; `text` is recomputed afterwards.
pub fn visit_spans_mut(blocks: &mut [SlideBlock], visit: &mut dyn FnMut(&mut Vec<TextSpan>)) {
    for block in blocks {
        match block {
            SlideBlock::Paragraph { text, spans }
            | SlideBlock::Heading { text, spans, .. }
            | SlideBlock::Blockquote { text, spans }
            | SlideBlock::Callout { text, spans, .. } => rewrite(text, spans, visit),
            SlideBlock::Bullets { items, .. } => {
                // pre-order over the tree without recursion
                let mut stack: Vec<&mut BulletItem> = items.iter_mut().rev().collect();
                while let Some(item) = stack.pop() {
                    rewrite(&mut item.text, &mut item.spans, visit);
                    stack.extend(item.children.iter_mut().rev());
                }
            }
            SlideBlock::Table { headers, rows, .. } => {
                for cell in headers.iter_mut().chain(rows.iter_mut().flatten()) {
                    rewrite(&mut cell.text, &mut cell.spans, visit);
                }
            }
            SlideBlock::Figma(figma) => {
                for text_override in &mut figma.text_overrides {
                    rewrite(&mut text_override.text, &mut text_override.spans, visit);
                }
            }
            SlideBlock::Columns { columns, .. } => {
                for column in columns {
                    visit_spans_mut(column, visit);
                }
            }
            SlideBlock::Code { .. } | SlideBlock::Image(_) | SlideBlock::Footnotes { .. } => {}
        }
    }
}

fn rewrite(text: &mut String, spans: &mut Vec<TextSpan>, visit: &mut dyn FnMut(&mut Vec<TextSpan>)) {
    visit(spans);
    *text = plain_text(spans);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn paragraph_serializes_with_kind_tag() {
        let block = SlideBlock::paragraph(vec![
            TextSpan::plain("Hello "),
            TextSpan {
                text: "world".into(),
                bold: true,
                ..TextSpan::default()
            },
        ]);
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(
            value,
            json!({
                "kind": "paragraph",
                "text": "Hello world",
                "spans": [{"text": "Hello "}, {"text": "world", "bold": true}]
            })
        );
    }

    #[test]
    fn callout_uses_type_field() {
        let block = SlideBlock::Callout {
            callout_type: CalloutKind::Tip,
            title: None,
            text: "x".into(),
            spans: vec![TextSpan::plain("x")],
        };
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["kind"], "callout");
        assert_eq!(value["type"], "tip");
    }

    #[test]
    fn document_is_a_bare_array_and_round_trips() {
        let doc = Document {
            slides: vec![SlideContent {
                slide_type: SlideType::Title,
                title: Some("Hi".into()),
                ..SlideContent::default()
            }],
        };
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json, json!([{"type": "title", "title": "Hi", "blocks": []}]));
        let back: Document = serde_json::from_value(json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn visitor_walks_nested_bullets_in_order() {
        let item = |text: &str, children: Vec<BulletItem>| BulletItem {
            text: text.into(),
            spans: vec![TextSpan::plain(text)],
            marker: "•".into(),
            ordered: false,
            start: None,
            children,
        };
        let mut blocks = vec![SlideBlock::Bullets {
            items: vec![item("a", vec![item("b", vec![])]), item("c", vec![])],
            ordered: false,
            start: None,
        }];
        let mut seen = Vec::new();
        visit_spans_mut(&mut blocks, &mut |spans| {
            seen.push(plain_text(spans));
            spans[0].text.make_ascii_uppercase();
        });
        assert_eq!(seen, vec!["a", "b", "c"]);
        let SlideBlock::Bullets { items, .. } = &blocks[0] else {
            panic!("expected bullets");
        };
        assert_eq!(items[0].children[0].text, "B");
    }
}
