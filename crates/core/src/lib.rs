#![deny(missing_docs)]
//! deckdown core: compiles a Markdown slide dialect into a typed slide IR.
//!
//! A document is a sequence of slides separated by `---` lines. Each slide is
//! ordinary Markdown plus a few extensions: cascading YAML frontmatter,
//! `:::` directives (columns, figma cards, callouts), footnotes, and sizing
//! tokens in image alt text. [`compile`] turns the text into a [`Document`]
//! that serializes to the JSON shape the renderer consumes, along with any
//! [`CompileWarning`]s.

/// Block compiler.
pub mod blocks;
/// Fenced code tracking for line scanners.
pub mod code_fence;
/// Compile entry points.
pub mod compiler;
/// Typed per-slide configuration.
pub mod config;
/// Directive parsing.
pub mod directives;
/// Errors, warnings and the per-slide compile context.
pub mod error;
/// Footnote extraction and numbering.
pub mod footnotes;
/// YAML frontmatter parsing and merging.
pub mod frontmatter;
/// Image alt-text grammar and source tagging.
pub mod image;
/// Inline Markdown to text spans.
pub mod inline;
/// Slide IR types.
pub mod ir;
/// Primitive normalizers.
pub mod normalize;
/// Compiler options.
pub mod options;
/// markdown-rs configuration.
pub mod parse;
/// Slide segmentation.
pub mod segment;

pub use compiler::{CompileOutput, compile, compile_bytes};
pub use config::{Background, ResolvedConfig, SlideStyles};
pub use error::{CompileError, CompileWarning, SlideContext, WarningKind};
pub use inline::format_inline;
pub use ir::{
    BulletItem, CalloutKind, Document, FigmaBlock, FootnoteItem, ImageBlock, ImageSource,
    SlideBlock, SlideContent, SlideType, TableAlign, TableCell, TextSpan,
};
pub use options::CompileOptions;
