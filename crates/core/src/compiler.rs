//! Compile entry points: document text in, slide IR plus warnings out.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::blocks::compile_slide_body;
use crate::config::{ConfigMap, ResolvedConfig};
use crate::error::{CompileError, CompileWarning, SlideContext, WarningKind};
use crate::footnotes::{collect_footnotes, extract_definitions};
use crate::frontmatter::{deep_merge, parse_yaml_block};
use crate::ir::{Document, SlideBlock, SlideContent, plain_text};
use crate::options::CompileOptions;
use crate::segment::{FrontmatterBlock, SlideRegion, segment};

/// Result of a successful compile call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompileOutput {
    /// Compiled slides.
    pub document: Document,
    /// Non-fatal problems, in the order they were found.
    pub warnings: Vec<CompileWarning>,
}

/// Compiles UTF-8 bytes.
///
/// # Errors
///
/// [`CompileError::Encoding`] when the bytes are not UTF-8, otherwise as [`compile`].
pub fn compile_bytes(input: &[u8], options: &CompileOptions) -> Result<CompileOutput, CompileError> {
    let text = std::str::from_utf8(input)?;
    compile(text, options)
}

/// Compiles a slide document.
///
/// ```
/// use deckdown_core::{CompileOptions, compile};
///
/// let output = compile("# Hello\n\n---\n\n## Next\n\n- item", &CompileOptions::default()).unwrap();
/// assert_eq!(output.document.slides.len(), 2);
/// assert_eq!(output.document.slides[0].title.as_deref(), Some("Hello"));
/// ```
///
/// # Errors
///
/// [`CompileError::EmptyDocument`] when no slide has a title or any block.
pub fn compile(input: &str, options: &CompileOptions) -> Result<CompileOutput, CompileError> {
    let content = input.strip_prefix('\u{feff}').unwrap_or(input);
    if content.trim().is_empty() {
        return Err(CompileError::EmptyDocument);
    }

    let mut warnings = Vec::new();
    let (segmented, global_map, global_config) = {
        let mut ctx = SlideContext::document(options, &mut warnings);
        let segmented = segment(content, &mut ctx);
        let global_map = segmented
            .global
            .as_ref()
            .map(|block| parse_block(block, &mut ctx))
            .unwrap_or_default();
        let global_config = ResolvedConfig::resolve_global(&global_map, &mut ctx);
        (segmented, global_map, global_config)
    };
    let global_value = Value::Object(global_map);

    let mut used_footnote_ids = HashSet::new();
    let mut slides = Vec::with_capacity(segmented.regions.len());
    for (index, region) in segmented.regions.iter().enumerate() {
        let mut ctx = SlideContext::slide(index + 1, options, &mut warnings);
        slides.push(compile_slide(
            region,
            &global_value,
            &global_config,
            &mut used_footnote_ids,
            &mut ctx,
        ));
    }

    if slides
        .iter()
        .all(|slide| slide.title.is_none() && slide.blocks.is_empty())
    {
        return Err(CompileError::EmptyDocument);
    }

    log::debug!(
        "compiled {} slides with {} warnings",
        slides.len(),
        warnings.len()
    );
    Ok(CompileOutput {
        document: Document { slides },
        warnings,
    })
}

fn parse_block(block: &FrontmatterBlock, ctx: &mut SlideContext<'_>) -> ConfigMap {
    match parse_yaml_block(&block.yaml) {
        Ok(Value::Object(map)) => map,
        Ok(_) => ConfigMap::new(),
        Err(err) => {
            ctx.warn(
                WarningKind::MalformedFrontmatter,
                format!("{} (block at line {})", err, block.line),
            );
            ConfigMap::new()
        }
    }
}

fn compile_slide(
    region: &SlideRegion,
    global: &Value,
    inherited: &ResolvedConfig,
    used_footnote_ids: &mut HashSet<String>,
    ctx: &mut SlideContext<'_>,
) -> SlideContent {
    let warnings_before = ctx.warning_count();
    let overrides = region
        .frontmatter
        .as_ref()
        .map(|block| parse_block(block, ctx))
        .unwrap_or_default();
    let config = if overrides.is_empty() {
        inherited.clone()
    } else {
        let merged = match deep_merge(global, &Value::Object(overrides.clone())) {
            Value::Object(map) => map,
            _ => ConfigMap::new(),
        };
        ResolvedConfig::resolve_slide(inherited, &merged, &overrides, ctx)
    };

    let (source, definitions) = extract_definitions(&region.body, ctx);
    let body = compile_slide_body(&source, ctx);
    let mut blocks = body.blocks;
    let mut title_spans = body.title_spans;
    let footnotes = collect_footnotes(
        &mut title_spans,
        &mut blocks,
        &definitions,
        used_footnote_ids,
        ctx,
    );
    let title = body.title.map(|_| plain_text(&title_spans));
    if !footnotes.is_empty() {
        blocks.push(SlideBlock::Footnotes {
            items: footnotes.clone(),
        });
    }

    log::debug!(
        "slide {:?} (line {}): {} blocks, {} footnotes, {} warnings",
        ctx.slide,
        region.start_line,
        blocks.len(),
        footnotes.len(),
        ctx.warning_count() - warnings_before
    );

    SlideContent {
        slide_type: body.slide_type,
        title,
        blocks,
        footnotes,
        background: config.background,
        styles: config.styles,
        slide_number: config.slide_number,
        title_prefix: config.title_prefix,
        align: config.align,
        valign: config.valign,
        transition: config.transition,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Background;
    use crate::ir::SlideType;

    fn run(input: &str) -> CompileOutput {
        compile(input, &CompileOptions::default()).unwrap()
    }

    #[test]
    fn blank_input_is_empty_document() {
        for input in ["", "  \n\t\n", "\u{feff}", "---\nbackground: \"#000\"\n---\n", "---\n---\n"] {
            let err = compile(input, &CompileOptions::default()).unwrap_err();
            assert!(matches!(err, CompileError::EmptyDocument), "{input:?}");
        }
    }

    #[test]
    fn invalid_utf8_is_an_encoding_error() {
        let err = compile_bytes(&[0x23, 0x20, 0xff, 0xfe], &CompileOptions::default()).unwrap_err();
        assert!(matches!(err, CompileError::Encoding(_)));
    }

    #[test]
    fn slide_override_merges_with_global() {
        let input = "---\nbackground: \"#111\"\nheadings:\n  h1:\n    size: 10\n---\n# A\n---\nheadings:\n  h1:\n    size: 20\n---\n# B\n---\nbackground: \"#abc\"\n---\n# C";
        let output = run(input);
        let slides = &output.document.slides;
        assert_eq!(slides.len(), 3);
        let solid = |color: &str| Some(Background::Solid { color: color.into() });
        assert_eq!(slides[0].background, solid("#111111"));
        assert_eq!(slides[1].background, solid("#111111"));
        assert_eq!(slides[2].background, solid("#aabbcc"));
        let size = |slide: &SlideContent| {
            slide
                .styles
                .headings
                .as_ref()
                .and_then(|headings| headings.h1.as_ref())
                .and_then(|style| style.size)
        };
        assert_eq!(size(&slides[0]), Some(10.0));
        assert_eq!(size(&slides[1]), Some(20.0));
        assert_eq!(size(&slides[2]), Some(10.0));
    }

    #[test]
    fn malformed_override_falls_back_to_global() {
        let input = "---\nbackground: \"#111\"\n---\n# A\n---\nbackground: [unclosed\n---\n# B";
        let output = run(input);
        assert_eq!(output.document.slides.len(), 2);
        assert_eq!(
            output.document.slides[1].background,
            Some(Background::Solid {
                color: "#111111".into()
            })
        );
        assert_eq!(output.warnings.len(), 1);
        assert_eq!(output.warnings[0].kind, WarningKind::MalformedFrontmatter);
        assert_eq!(output.warnings[0].slide, Some(2));
    }

    #[test]
    fn footnotes_are_appended_per_slide() {
        let output = run("Claim[^a]\n\n[^a]: Source\n---\nAgain[^a]\n\n[^a]: Other");
        let first = &output.document.slides[0];
        assert_eq!(first.footnotes.len(), 1);
        assert_eq!(first.footnotes[0].id, "a");
        assert!(matches!(first.blocks.last(), Some(SlideBlock::Footnotes { items }) if items.len() == 1));

        let second = &output.document.slides[1];
        assert_eq!(second.footnotes[0].id, "a-2");
        assert_eq!(second.footnotes[0].number, 1);
        assert_eq!(second.footnotes[0].text, "Other");
    }

    #[test]
    fn title_footnote_is_numbered() {
        let output = run("# Claim[^a]\n\nBody[^b]\n\n[^a]: src\n[^b]: other");
        let slide = &output.document.slides[0];
        assert!(output.warnings.is_empty());
        assert_eq!(slide.title.as_deref(), Some("Claim[1]"));
        let ids: Vec<&str> = slide.footnotes.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(slide.footnotes[0].text, "src");
    }

    #[test]
    fn title_types() {
        let output = run("# Cover\n---\n## Agenda\n---\nplain");
        let types: Vec<SlideType> = output
            .document
            .slides
            .iter()
            .map(|slide| slide.slide_type)
            .collect();
        assert_eq!(
            types,
            vec![SlideType::Title, SlideType::Content, SlideType::Content]
        );
        assert_eq!(output.document.slides[2].title, None);
    }
}
