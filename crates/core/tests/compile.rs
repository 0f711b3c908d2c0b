use deckdown_core::{
    CompileError, CompileOptions, ImageSource, SlideBlock, SlideType, WarningKind, compile,
    compile_bytes,
};

fn compile_default(source: &str) -> deckdown_core::CompileOutput {
    compile(source, &CompileOptions::default()).expect("compile should succeed")
}

fn kinds(output: &deckdown_core::CompileOutput) -> Vec<WarningKind> {
    output.warnings.iter().map(|warning| warning.kind).collect()
}

#[test]
fn two_slide_deck() {
    let output = compile_default("# Title\n\nBody\n\n---\n\n## Second\n\n- A\n- B");
    let slides = &output.document.slides;
    assert!(output.warnings.is_empty());
    assert_eq!(slides.len(), 2);

    assert_eq!(slides[0].slide_type, SlideType::Title);
    assert_eq!(slides[0].title.as_deref(), Some("Title"));
    assert_eq!(slides[0].blocks.len(), 1);
    assert!(matches!(&slides[0].blocks[0], SlideBlock::Paragraph { text, .. } if text == "Body"));

    assert_eq!(slides[1].slide_type, SlideType::Content);
    assert_eq!(slides[1].title.as_deref(), Some("Second"));
    let SlideBlock::Bullets { items, ordered, .. } = &slides[1].blocks[0] else {
        panic!("expected bullets, got {:?}", slides[1].blocks);
    };
    assert!(!ordered);
    let texts: Vec<&str> = items.iter().map(|item| item.text.as_str()).collect();
    assert_eq!(texts, vec!["A", "B"]);
    assert!(items.iter().all(|item| item.marker == "•"));
}

#[test]
fn compilation_is_deterministic() {
    let source = "---\nbackground: \"#abc\"\n---\n# A[^n]\n\nText[^n]\n\n[^n]: Note\n---\n:::columns\nL\n:::column\nR\n:::";
    let first = compile_default(source);
    let second = compile_default(source);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first.document).unwrap(),
        serde_json::to_string(&second.document).unwrap()
    );
}

#[test]
fn separators_define_slide_count() {
    let output = compile_default("one\n---\ntwo\n---\n---\nfour");
    assert_eq!(output.document.slides.len(), 4);
    assert!(output.document.slides[2].blocks.is_empty());
}

#[test]
fn key_value_lines_are_slide_content() {
    for source in [
        "# A\n---\nTODO: finish this\n---\n# C",
        "# A\n---\nAgenda:\n- one\n- two\n---\n# C",
    ] {
        let output = compile_default(source);
        assert_eq!(output.document.slides.len(), 3, "{source:?}");
        assert!(!output.document.slides[1].blocks.is_empty(), "{source:?}");
    }
}

#[test]
fn slide_override_still_applies() {
    let output = compile_default("# A\n---\ntransition: dissolve\n---\n# B");
    assert_eq!(output.document.slides.len(), 2);
    assert!(output.document.slides[1].transition.is_some());
}

#[test]
fn footnote_in_title_is_numbered() {
    let output = compile_default("# Claim[^a]\n\nBody\n\n[^a]: src");
    let slide = &output.document.slides[0];
    assert!(output.warnings.is_empty());
    assert_eq!(slide.title.as_deref(), Some("Claim[1]"));
    assert_eq!(slide.footnotes.len(), 1);
    assert_eq!(slide.footnotes[0].text, "src");
}

#[test]
fn linked_image_is_an_image_block() {
    let output = compile_default("[![Logo](logo.png)](https://x.com)");
    let SlideBlock::Image(image) = &output.document.slides[0].blocks[0] else {
        panic!("expected image");
    };
    assert_eq!(image.href.as_deref(), Some("https://x.com"));
}

#[test]
fn footnotes_resolve_and_warn() {
    let output = compile_default("Claim[^a] and guess[^missing]\n\n[^a]: text");
    let slide = &output.document.slides[0];
    assert_eq!(slide.footnotes.len(), 1);
    assert_eq!(slide.footnotes[0].id, "a");
    assert_eq!(slide.footnotes[0].text, "text");
    let footnote_blocks = slide
        .blocks
        .iter()
        .filter(|block| matches!(block, SlideBlock::Footnotes { .. }))
        .count();
    assert_eq!(footnote_blocks, 1);

    let SlideBlock::Paragraph { text, .. } = &slide.blocks[0] else {
        panic!("expected paragraph");
    };
    assert_eq!(text, "Claim[1] and guess[missing]");
    assert_eq!(kinds(&output), vec![WarningKind::UnresolvedFootnote]);
}

#[test]
fn footnote_references_inside_columns_and_lists() {
    let source = "- item[^b]\n\n:::columns\nLeft[^a]\n:::column\nRight\n:::\n\n[^a]: Alpha\n[^b]: Beta";
    let output = compile_default(source);
    let slide = &output.document.slides[0];
    let numbered: Vec<(&str, u32)> = slide
        .footnotes
        .iter()
        .map(|item| (item.id.as_str(), item.number))
        .collect();
    assert_eq!(numbered, vec![("b", 1), ("a", 2)]);
}

#[test]
fn columns_gap_is_clamped() {
    let output = compile_default(":::columns gap=999\nA\n:::column\nB\n:::");
    let SlideBlock::Columns { gap, widths, .. } = &output.document.slides[0].blocks[0] else {
        panic!("expected columns");
    };
    assert_eq!(*gap, 200.0);
    assert_eq!(widths, &vec![0.5, 0.5]);
    assert_eq!(kinds(&output), vec![WarningKind::ClampedValue]);
}

#[test]
fn five_columns_are_truncated_to_four() {
    let source = ":::columns\n1\n:::column\n2\n:::column\n3\n:::column\n4\n:::column\n5\n:::";
    let output = compile_default(source);
    let SlideBlock::Columns { columns, .. } = &output.document.slides[0].blocks[0] else {
        panic!("expected columns");
    };
    assert_eq!(columns.len(), 4);
    assert!(matches!(&columns[3][0], SlideBlock::Paragraph { text, .. } if text == "4"));
    assert_eq!(kinds(&output), vec![WarningKind::ColumnCount]);
}

#[test]
fn image_alt_grammar() {
    let output = compile_default("![w:50% x:50% y:50% Label](assets/chart.png)");
    let SlideBlock::Image(image) = &output.document.slides[0].blocks[0] else {
        panic!("expected image");
    };
    assert_eq!(image.size.and_then(|size| size.width), Some(960.0));
    let position = image.position.expect("position");
    assert_eq!((position.x, position.y), (960.0, 540.0));
    assert_eq!(image.alt.as_deref(), Some("Label"));
    assert_eq!(image.source, ImageSource::Local);
    assert!(!image.placeholder);
}

#[test]
fn unsupported_image_becomes_placeholder() {
    let output = compile_default("![Logo](logo.svg)");
    let SlideBlock::Image(image) = &output.document.slides[0].blocks[0] else {
        panic!("expected image");
    };
    assert!(image.placeholder);
    assert_eq!(image.alt.as_deref(), Some("Logo"));
    assert_eq!(kinds(&output), vec![WarningKind::UnsupportedImage]);
}

#[test]
fn figma_card_without_link_is_dropped() {
    let output = compile_default("# Deck\n\n:::figma\nx=10\n:::");
    assert!(output.document.slides[0].blocks.is_empty());
    assert_eq!(kinds(&output), vec![WarningKind::MissingAttribute]);
}

#[test]
fn figma_card_with_overrides() {
    let source = ":::figma link=https://www.figma.com/design/Key1/Deck?node-id=1-2\ntext.title=Hello *there*\n:::";
    let output = compile_default(source);
    let SlideBlock::Figma(card) = &output.document.slides[0].blocks[0] else {
        panic!("expected figma card");
    };
    assert_eq!(card.link.file_key, "Key1");
    assert_eq!(card.link.node_id, "1:2");
    assert_eq!(card.text_overrides[0].text, "Hello there");
}

#[test]
fn empty_documents_are_rejected() {
    for source in ["", "   \n\n", "---\n---\n", "---\ntheme: dark\n---\n"] {
        let err = compile(source, &CompileOptions::default()).unwrap_err();
        assert!(matches!(err, CompileError::EmptyDocument), "{source:?}");
    }
}

#[test]
fn invalid_utf8_is_rejected() {
    let err = compile_bytes(b"# Title\n\xc3\x28", &CompileOptions::default()).unwrap_err();
    assert!(matches!(err, CompileError::Encoding(_)));
}

#[test]
fn options_deserialize_from_partial_json() {
    let options: CompileOptions =
        serde_json::from_str(r#"{"canvasWidth": 1000, "maxColumnGap": 50}"#).unwrap();
    assert_eq!(options.canvas_width, 1000.0);
    assert_eq!(options.canvas_height, 1080.0);

    let output = compile("![w:50%](a.png)\n\n:::columns gap=80\nA\n:::column\nB\n:::", &options)
        .expect("compile should succeed");
    let blocks = &output.document.slides[0].blocks;
    let SlideBlock::Image(image) = &blocks[0] else {
        panic!("expected image");
    };
    assert_eq!(image.size.and_then(|size| size.width), Some(500.0));
    assert!(matches!(blocks[1], SlideBlock::Columns { gap, .. } if gap == 50.0));
}

#[test]
fn wire_shape_snapshot() {
    let output = compile_default("## Hi\n\nSome **bold**");
    let json = serde_json::to_string_pretty(&output.document).unwrap();
    insta::assert_snapshot!(json, @r#"
    [
      {
        "type": "content",
        "title": "Hi",
        "blocks": [
          {
            "kind": "paragraph",
            "text": "Some bold",
            "spans": [
              {
                "text": "Some "
              },
              {
                "text": "bold",
                "bold": true
              }
            ]
          }
        ]
      }
    ]
    "#);
}
