//! Directive parsing.
//!
//! Directives are `:::`-fenced blocks that extend the Markdown dialect:
//!
//! ```text
//! :::columns gap=48 width=1fr/2fr
//! Left column
//! :::column
//! Right column
//! :::
//! ```
//!
//! This module splits slide source into Markdown and directive segments,
//! parses opening lines and attribute lists, and turns figma and callout
//! directives into blocks. Columns bodies are compiled by the block
//! compiler, which calls back into [`split_columns`] and [`column_layout`].

use crate::code_fence::FenceTracker;
use crate::error::{SlideContext, WarningKind};
use crate::inline::format_inline;
use crate::ir::{CalloutKind, FigmaBlock, SlideBlock, TextOverride, plain_text};
use crate::image::{Axis, resolve_length};
use crate::normalize::parse_figma_link;

/// Directive families the compiler understands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DirectiveKind {
    /// Multi-column layout.
    Columns,
    /// Figma link card.
    Figma,
    /// Note, tip, warning or caution box.
    Callout(CalloutKind),
    /// Anything else; the body compiles as plain Markdown.
    Unknown(String),
}

impl DirectiveKind {
    fn from_name(name: &str) -> Self {
        match name {
            "columns" => DirectiveKind::Columns,
            "figma" => DirectiveKind::Figma,
            other => match CalloutKind::from_name(other) {
                Some(kind) => DirectiveKind::Callout(kind),
                None => DirectiveKind::Unknown(other.to_string()),
            },
        }
    }
}

/// Parsed representation of a directive opening line (e.g. `:::note[Title] foo="bar"`).
#[derive(Clone, Debug, PartialEq)]
pub struct DirectiveOpening {
    /// Directive family.
    pub kind: DirectiveKind,
    /// Optional title captured from bracket syntax `[...]`.
    pub title: Option<String>,
    /// `key=value` attributes in source order, quotes removed.
    pub attrs: Vec<(String, String)>,
    /// Attribute tokens that were not `key=value`.
    pub malformed: Vec<String>,
}

impl DirectiveOpening {
    /// Last value given for `key`.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .rev()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }
}

/// Parse an opening directive line like `:::note[Title]`.
///
/// Returns `None` for closers, column separators and non-directive lines.
pub fn parse_opening_directive(line: &str) -> Option<DirectiveOpening> {
    let trimmed = line.trim();
    let after_colons = trimmed.strip_prefix(":::")?;
    let mut chars = after_colons.chars().peekable();

    let mut name = String::new();
    while let Some(&ch) = chars.peek() {
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
            name.push(ch.to_ascii_lowercase());
            chars.next();
        } else {
            break;
        }
    }

    if name.is_empty() || !name.starts_with(|c: char| c.is_ascii_alphabetic()) || name == "column" {
        return None;
    }

    let mut title = None;
    if let Some(&'[') = chars.peek() {
        chars.next();
        let mut text = String::new();
        for ch in chars.by_ref() {
            if ch == ']' {
                break;
            }
            text.push(ch);
        }
        let text = text.trim();
        if !text.is_empty() {
            title = Some(text.to_string());
        }
    }

    let remaining: String = chars.collect();
    let (attrs, malformed) = parse_attrs(&remaining);

    Some(DirectiveOpening {
        kind: DirectiveKind::from_name(&name),
        title,
        attrs,
        malformed,
    })
}

/// Check if a line is a directive closer (`:::`).
pub fn is_directive_closer(line: &str) -> bool {
    line.trim() == ":::"
}

/// Check if a line is a `:::column` separator inside a columns body.
pub fn is_column_separator(line: &str) -> bool {
    line.trim()
        .strip_prefix(":::column")
        .is_some_and(|rest| rest.is_empty() || rest.starts_with([' ', '\t', '{', '[']))
}

/// Splits an attribute string into `key=value` pairs and leftover tokens.
fn parse_attrs(attrs: &str) -> (Vec<(String, String)>, Vec<String>) {
    let attrs = attrs.trim();
    let attrs = attrs
        .strip_prefix('{')
        .and_then(|inner| inner.strip_suffix('}'))
        .unwrap_or(attrs);

    let mut pairs = Vec::new();
    let mut malformed = Vec::new();
    for token in tokenize_attrs(attrs) {
        match token.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                pairs.push((key.trim().to_string(), unquote(value.trim()).to_string()));
            }
            _ => malformed.push(token.to_string()),
        }
    }
    (pairs, malformed)
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2
            && let Some(inner) = value.strip_prefix(quote).and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// Tokenize attributes respecting quoted values.
/// Splits on whitespace but keeps quoted strings intact.
fn tokenize_attrs(attrs: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut token_start: Option<usize> = None;
    let mut in_quotes = false;
    let mut quote_char = '"';

    for (i, c) in attrs.char_indices() {
        match c {
            '"' | '\'' if !in_quotes => {
                if token_start.is_none() {
                    token_start = Some(i);
                }
                in_quotes = true;
                quote_char = c;
            }
            c if c == quote_char && in_quotes => {
                in_quotes = false;
            }
            c if c.is_whitespace() && !in_quotes => {
                if let Some(start) = token_start.take() {
                    tokens.push(&attrs[start..i]);
                }
            }
            _ => {
                if token_start.is_none() {
                    token_start = Some(i);
                }
            }
        }
    }

    if let Some(start) = token_start {
        tokens.push(&attrs[start..]);
    }

    tokens
}

/// A run of slide source: plain Markdown or one directive with its body.
#[derive(Clone, Debug, PartialEq)]
pub enum Segment {
    /// Markdown between directives.
    Markdown(String),
    /// A directive and the lines between its opener and matching closer.
    Directive {
        /// Parsed opening line.
        opening: DirectiveOpening,
        /// Body lines, common indentation removed.
        body: Vec<String>,
    },
}

/// Splits source into Markdown and top-level directive segments.
///
/// Nesting is tracked by depth and fenced code is opaque. An unclosed
/// directive runs to the end of the source; a stray closer is dropped.
pub fn split_segments(source: &str) -> Vec<Segment> {
    let lines: Vec<&str> = source.lines().collect();
    let mut segments = Vec::new();
    let mut markdown = String::new();
    let mut fence = FenceTracker::new();
    let mut index = 0;

    while index < lines.len() {
        let line = lines[index];
        index += 1;

        if fence.observe(line) {
            markdown.push_str(line);
            markdown.push('\n');
            continue;
        }

        if let Some(opening) = parse_opening_directive(line) {
            if !markdown.trim().is_empty() {
                segments.push(Segment::Markdown(std::mem::take(&mut markdown)));
            }
            markdown.clear();
            let (body, next) = collect_body(&lines, index);
            index = next;
            segments.push(Segment::Directive {
                opening,
                body: dedent(body),
            });
            continue;
        }

        if is_directive_closer(line) {
            log::debug!("dropping unmatched directive closer");
            continue;
        }

        markdown.push_str(line);
        markdown.push('\n');
    }

    if !markdown.trim().is_empty() {
        segments.push(Segment::Markdown(markdown));
    }
    segments
}

/// Collects body lines from `start` up to the matching closer.
/// Returns the body and the index just past the closer.
fn collect_body<'a>(lines: &[&'a str], start: usize) -> (Vec<&'a str>, usize) {
    let mut fence = FenceTracker::new();
    let mut depth = 0usize;
    for (index, line) in lines.iter().enumerate().skip(start) {
        if fence.observe(line) {
            continue;
        }
        if parse_opening_directive(line).is_some() {
            depth += 1;
        } else if is_directive_closer(line) {
            if depth == 0 {
                return (lines[start..index].to_vec(), index + 1);
            }
            depth -= 1;
        }
    }
    (lines[start..].to_vec(), lines.len())
}

fn dedent(lines: Vec<&str>) -> Vec<String> {
    let indent = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);
    lines
        .into_iter()
        .map(|line| line.get(indent..).unwrap_or("").to_string())
        .collect()
}

/// Splits a columns body at top-level `:::column` separators.
///
/// Non-blank content before the first separator forms an implicit first column.
pub fn split_columns(body: &[String]) -> Vec<String> {
    let mut columns = Vec::new();
    let mut current = String::new();
    let mut started = false;
    let mut fence = FenceTracker::new();
    let mut depth = 0usize;

    for line in body {
        if fence.observe(line) {
            current.push_str(line);
            current.push('\n');
            continue;
        }
        if depth == 0 && is_column_separator(line) {
            if started || !current.trim().is_empty() {
                columns.push(std::mem::take(&mut current));
            }
            current.clear();
            started = true;
            continue;
        }
        if parse_opening_directive(line).is_some() {
            depth += 1;
        } else if is_directive_closer(line) {
            depth = depth.saturating_sub(1);
        }
        current.push_str(line);
        current.push('\n');
    }

    if started || !current.trim().is_empty() {
        columns.push(current);
    }
    columns
}

/// Maximum number of columns kept in one columns block.
pub const MAX_COLUMNS: usize = 4;

/// One entry of a `width` attribute.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WidthSpec {
    /// Share of the space left after fixed widths.
    Fr(f64),
    /// Percentage of the column area.
    Percent(f64),
    /// Pixels.
    Px(f64),
}

/// Parses `1fr/2fr`, `30%/70%`, `400px/1fr`. A bare number is `fr`.
pub fn parse_width_list(value: &str) -> Option<Vec<WidthSpec>> {
    value
        .split('/')
        .map(|part| {
            let part = part.trim();
            let digits = part.trim_end_matches(|c: char| c.is_ascii_alphabetic() || c == '%');
            let number: f64 = digits.trim().parse().ok()?;
            if !number.is_finite() || number <= 0.0 {
                return None;
            }
            match &part[digits.len()..] {
                "" | "fr" => Some(WidthSpec::Fr(number)),
                "%" => Some(WidthSpec::Percent(number)),
                "px" => Some(WidthSpec::Px(number)),
                _ => None,
            }
        })
        .collect()
}

/// Resolved gap and widths of a columns block.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnLayout {
    /// Gap in pixels, clamped.
    pub gap: f64,
    /// Fractions of the column area, one per kept column, summing to 1.
    pub widths: Vec<f64>,
}

/// Resolves `gap` and `width` attributes for a columns block.
///
/// `written` is the number of columns in the source and `kept` the number
/// that survive truncation; width lists are validated against `written`.
pub fn column_layout(
    opening: &DirectiveOpening,
    written: usize,
    kept: usize,
    ctx: &mut SlideContext<'_>,
) -> ColumnLayout {
    for token in &opening.malformed {
        ctx.warn(
            WarningKind::DirectiveAttribute,
            format!("Ignoring malformed columns attribute '{}'", token),
        );
    }
    for (key, _) in &opening.attrs {
        if !matches!(key.to_ascii_lowercase().as_str(), "gap" | "width" | "widths") {
            ctx.warn(
                WarningKind::DirectiveAttribute,
                format!("Unknown columns attribute '{}'", key),
            );
        }
    }

    let gap = resolve_gap(opening.attr("gap"), ctx);
    let width_attr = opening.attr("width").or_else(|| opening.attr("widths"));
    let widths = resolve_widths(width_attr, written, kept, gap, ctx);
    ColumnLayout { gap, widths }
}

fn resolve_gap(value: Option<&str>, ctx: &mut SlideContext<'_>) -> f64 {
    let default = ctx.options.default_column_gap;
    let Some(value) = value else {
        return default;
    };
    let number = value.trim().trim_end_matches("px").trim().parse::<f64>();
    let gap = match number {
        Ok(gap) if gap.is_finite() => gap,
        _ => {
            ctx.warn(
                WarningKind::DirectiveAttribute,
                format!("Invalid columns gap '{}', using {}", value, default),
            );
            return default;
        }
    };
    let max = ctx.options.max_column_gap;
    let clamped = gap.clamp(0.0, max);
    if clamped != gap {
        ctx.warn(
            WarningKind::ClampedValue,
            format!("Columns gap {} clamped to {}", gap, clamped),
        );
    }
    clamped
}

fn resolve_widths(
    value: Option<&str>,
    written: usize,
    kept: usize,
    gap: f64,
    ctx: &mut SlideContext<'_>,
) -> Vec<f64> {
    let even = || vec![round(1.0 / kept as f64); kept];
    if kept == 0 {
        return Vec::new();
    }
    let Some(value) = value else {
        return even();
    };
    let Some(specs) = parse_width_list(value) else {
        ctx.warn(
            WarningKind::DirectiveAttribute,
            format!("Invalid columns width '{}', using an even split", value),
        );
        return even();
    };
    if specs.len() != written {
        ctx.warn(
            WarningKind::DirectiveAttribute,
            format!(
                "Columns width lists {} values for {} columns, using an even split",
                specs.len(),
                written
            ),
        );
        return even();
    }

    let specs = &specs[..kept];
    let area = (ctx.options.canvas_width - gap * (kept as f64 - 1.0)).max(1.0);
    let fixed = |spec: &WidthSpec| match *spec {
        WidthSpec::Percent(p) => p / 100.0,
        WidthSpec::Px(px) => px / area,
        WidthSpec::Fr(_) => 0.0,
    };
    let fixed_total: f64 = specs.iter().map(fixed).sum();
    let fr_total: f64 = specs
        .iter()
        .map(|spec| match *spec {
            WidthSpec::Fr(fr) => fr,
            _ => 0.0,
        })
        .sum();

    if fr_total > 0.0 {
        let remainder = 1.0 - fixed_total;
        if remainder <= 0.0 {
            ctx.warn(
                WarningKind::DirectiveAttribute,
                format!("Columns width '{}' leaves no room for fr columns, using an even split", value),
            );
            return even();
        }
        specs
            .iter()
            .map(|spec| match *spec {
                WidthSpec::Fr(fr) => round(fr / fr_total * remainder),
                _ => round(fixed(spec)),
            })
            .collect()
    } else {
        specs.iter().map(|spec| round(fixed(spec) / fixed_total)).collect()
    }
}

fn round(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}

/// Builds a figma card from the opening line and `key=value` body lines.
///
/// Returns `None`, with a warning, when `link` is missing or not a Figma node URL.
pub fn compile_figma(
    opening: &DirectiveOpening,
    body: &[String],
    ctx: &mut SlideContext<'_>,
) -> Option<FigmaBlock> {
    let mut attrs = opening.attrs.clone();
    let mut malformed = opening.malformed.clone();
    for line in body {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() && !key.trim().contains(' ') => {
                attrs.push((key.trim().to_string(), unquote(value.trim()).to_string()));
            }
            _ => malformed.push(line.to_string()),
        }
    }
    for token in malformed {
        ctx.warn(
            WarningKind::DirectiveAttribute,
            format!("Ignoring malformed figma line '{}'", token),
        );
    }

    let mut link = None;
    let mut x = None;
    let mut y = None;
    let mut text_overrides: Vec<TextOverride> = Vec::new();

    for (key, value) in attrs {
        let lower = key.to_ascii_lowercase();
        match lower.as_str() {
            "link" => link = Some(value),
            "x" | "y" => {
                let axis = if lower == "x" {
                    Axis::Horizontal
                } else {
                    Axis::Vertical
                };
                match resolve_length(&value, axis, ctx) {
                    Some(px) if lower == "x" => x = Some(px),
                    Some(px) => y = Some(px),
                    None => ctx.warn(
                        WarningKind::DirectiveAttribute,
                        format!("Invalid figma {} '{}'", lower, value),
                    ),
                }
            }
            _ => match key.strip_prefix("text.").filter(|layer| !layer.is_empty()) {
                Some(layer) => {
                    let spans = format_inline(&value);
                    let override_ = TextOverride {
                        layer: layer.to_string(),
                        text: plain_text(&spans),
                        spans,
                    };
                    match text_overrides.iter_mut().find(|o| o.layer == layer) {
                        Some(existing) => *existing = override_,
                        None => text_overrides.push(override_),
                    }
                }
                None => ctx.warn(
                    WarningKind::DirectiveAttribute,
                    format!("Unknown figma attribute '{}'", key),
                ),
            },
        }
    }

    let Some(link) = link else {
        ctx.warn(
            WarningKind::MissingAttribute,
            "Figma directive without a link was dropped",
        );
        return None;
    };
    let Some(link) = parse_figma_link(&link) else {
        ctx.warn(
            WarningKind::MissingAttribute,
            format!("Figma directive with invalid link '{}' was dropped", link),
        );
        return None;
    };

    Some(FigmaBlock {
        link,
        x,
        y,
        text_overrides,
    })
}

/// Builds a callout block. The bracket title wins over a `title` attribute.
pub fn compile_callout(
    kind: CalloutKind,
    opening: &DirectiveOpening,
    body: &[String],
    ctx: &mut SlideContext<'_>,
) -> SlideBlock {
    for (key, _) in &opening.attrs {
        if !key.eq_ignore_ascii_case("title") {
            ctx.warn(
                WarningKind::DirectiveAttribute,
                format!("Unknown callout attribute '{}'", key),
            );
        }
    }
    let title = opening
        .title
        .clone()
        .or_else(|| opening.attr("title").map(str::to_string))
        .filter(|title| !title.trim().is_empty());
    let spans = format_inline(&body.join("\n"));
    SlideBlock::Callout {
        callout_type: kind,
        title,
        text: plain_text(&spans),
        spans,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CompileOptions;

    fn with_ctx<T>(f: impl FnOnce(&mut SlideContext<'_>) -> T) -> (T, Vec<WarningKind>) {
        let options = CompileOptions::default();
        let mut warnings = Vec::new();
        let value = {
            let mut ctx = SlideContext::slide(1, &options, &mut warnings);
            f(&mut ctx)
        };
        (value, warnings.into_iter().map(|w| w.kind).collect())
    }

    #[test]
    fn parses_opening_with_title_and_attrs() {
        let opening = parse_opening_directive(":::note[Heads up] foo=\"a b\" bare").unwrap();
        assert_eq!(opening.kind, DirectiveKind::Callout(CalloutKind::Note));
        assert_eq!(opening.title.as_deref(), Some("Heads up"));
        assert_eq!(opening.attr("foo"), Some("a b"));
        assert_eq!(opening.malformed, vec!["bare".to_string()]);
    }

    #[test]
    fn parses_braced_attrs_and_kinds() {
        let opening = parse_opening_directive(":::columns{gap=48 width='1fr/2fr'}").unwrap();
        assert_eq!(opening.kind, DirectiveKind::Columns);
        assert_eq!(opening.attr("gap"), Some("48"));
        assert_eq!(opening.attr("width"), Some("1fr/2fr"));

        let opening = parse_opening_directive(":::Details").unwrap();
        assert_eq!(opening.kind, DirectiveKind::Unknown("details".into()));
    }

    #[test]
    fn rejects_non_openers() {
        assert!(parse_opening_directive(":::").is_none());
        assert!(parse_opening_directive(":::column").is_none());
        assert!(parse_opening_directive("text :::note").is_none());
        assert!(is_column_separator("  :::column"));
        assert!(!is_column_separator(":::columns"));
        assert!(is_directive_closer(":::  "));
    }

    #[test]
    fn splits_nested_directives_and_ignores_fences() {
        let source = "Intro\n:::columns\n:::note\nInside\n:::\n:::column\n```\n:::\n```\n:::\nOutro\n";
        let segments = split_segments(source);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], Segment::Markdown("Intro\n".into()));
        match &segments[1] {
            Segment::Directive { opening, body } => {
                assert_eq!(opening.kind, DirectiveKind::Columns);
                assert_eq!(body.len(), 7);
            }
            other => panic!("expected directive, got {other:?}"),
        }
        assert_eq!(segments[2], Segment::Markdown("Outro\n".into()));
    }

    #[test]
    fn unclosed_directive_runs_to_end() {
        let segments = split_segments(":::tip\n  one\n  two");
        assert_eq!(
            segments,
            vec![Segment::Directive {
                opening: parse_opening_directive(":::tip").unwrap(),
                body: vec!["one".into(), "two".into()],
            }]
        );
    }

    #[test]
    fn columns_split_with_implicit_first_column() {
        let body: Vec<String> = ["Left", ":::column", "Right", ":::column", "Third"]
            .into_iter()
            .map(String::from)
            .collect();
        let columns = split_columns(&body);
        assert_eq!(columns, vec!["Left\n", "Right\n", "Third\n"]);

        let body: Vec<String> = ["", ":::column", "A", ":::column", "B"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(split_columns(&body).len(), 2);
    }

    #[test]
    fn gap_is_clamped() {
        let opening = parse_opening_directive(":::columns gap=999").unwrap();
        let (layout, warnings) = with_ctx(|ctx| column_layout(&opening, 2, 2, ctx));
        assert_eq!(layout.gap, 200.0);
        assert_eq!(layout.widths, vec![0.5, 0.5]);
        assert_eq!(warnings, vec![WarningKind::ClampedValue]);

        let opening = parse_opening_directive(":::columns gap=wide").unwrap();
        let (layout, warnings) = with_ctx(|ctx| column_layout(&opening, 2, 2, ctx));
        assert_eq!(layout.gap, 32.0);
        assert_eq!(warnings, vec![WarningKind::DirectiveAttribute]);
    }

    #[test]
    fn widths_mix_fixed_and_fr() {
        let opening = parse_opening_directive(":::columns width=1fr/3fr").unwrap();
        let (layout, _) = with_ctx(|ctx| column_layout(&opening, 2, 2, ctx));
        assert_eq!(layout.widths, vec![0.25, 0.75]);

        let opening = parse_opening_directive(":::columns width=40%/1fr/1fr").unwrap();
        let (layout, _) = with_ctx(|ctx| column_layout(&opening, 3, 3, ctx));
        assert_eq!(layout.widths, vec![0.4, 0.3, 0.3]);

        let opening = parse_opening_directive(":::columns width=30%/30%").unwrap();
        let (layout, _) = with_ctx(|ctx| column_layout(&opening, 2, 2, ctx));
        assert_eq!(layout.widths, vec![0.5, 0.5]);
    }

    #[test]
    fn width_mismatch_falls_back_to_even() {
        let opening = parse_opening_directive(":::columns width=1fr/2fr").unwrap();
        let (layout, warnings) = with_ctx(|ctx| column_layout(&opening, 3, 3, ctx));
        assert_eq!(layout.widths.len(), 3);
        assert!(layout.widths.iter().all(|w| (*w - 0.333333).abs() < 1e-6));
        assert_eq!(warnings, vec![WarningKind::DirectiveAttribute]);
    }

    #[test]
    fn figma_reads_body_attributes() {
        let opening = parse_opening_directive(":::figma x=50%").unwrap();
        let body: Vec<String> = [
            "link=https://www.figma.com/design/AbC123/Deck?node-id=12-34",
            "y=100",
            "text.title=**Hello**",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        let (block, warnings) = with_ctx(|ctx| compile_figma(&opening, &body, ctx));
        let block = block.unwrap();
        assert!(warnings.is_empty());
        assert_eq!(block.link.node_id, "12:34");
        assert_eq!(block.x, Some(960.0));
        assert_eq!(block.y, Some(100.0));
        assert_eq!(block.text_overrides[0].layer, "title");
        assert_eq!(block.text_overrides[0].text, "Hello");
        assert!(block.text_overrides[0].spans[0].bold);
    }

    #[test]
    fn figma_without_link_is_dropped() {
        let opening = parse_opening_directive(":::figma").unwrap();
        let (block, warnings) = with_ctx(|ctx| compile_figma(&opening, &[], ctx));
        assert!(block.is_none());
        assert_eq!(warnings, vec![WarningKind::MissingAttribute]);

        let opening = parse_opening_directive(":::figma link=https://example.com/x").unwrap();
        let (block, warnings) = with_ctx(|ctx| compile_figma(&opening, &[], ctx));
        assert!(block.is_none());
        assert_eq!(warnings, vec![WarningKind::MissingAttribute]);
    }

    #[test]
    fn callout_title_sources() {
        let opening = parse_opening_directive(":::warning title=\"Careful\"").unwrap();
        let body = vec!["Mind the *gap*".to_string()];
        let (block, _) = with_ctx(|ctx| compile_callout(CalloutKind::Warning, &opening, &body, ctx));
        match block {
            SlideBlock::Callout {
                callout_type,
                title,
                text,
                spans,
            } => {
                assert_eq!(callout_type, CalloutKind::Warning);
                assert_eq!(title.as_deref(), Some("Careful"));
                assert_eq!(text, "Mind the gap");
                assert!(spans[1].italic);
            }
            other => panic!("expected callout, got {other:?}"),
        }
    }
}
