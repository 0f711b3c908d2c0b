use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::options::CompileOptions;

/// Errors that abort a whole compile call. No partial document is produced.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Input bytes were not valid UTF-8.
    #[error("Encoding error: {0}")]
    Encoding(#[from] std::str::Utf8Error),
    /// Input contained no slide-bearing content at all.
    #[error("Document contains no slide content")]
    EmptyDocument,
}

/// Category of a non-fatal compiler warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WarningKind {
    /// A frontmatter block was not valid YAML or not a mapping.
    MalformedFrontmatter,
    /// A configuration section had an invalid value and fell back.
    InvalidConfig,
    /// A directive attribute was malformed or unknown.
    DirectiveAttribute,
    /// A directive lacked a required attribute and was dropped.
    MissingAttribute,
    /// A numeric value was clamped into its allowed range.
    ClampedValue,
    /// A columns block had an unsupported number of columns.
    ColumnCount,
    /// A columns block appeared inside another column and was flattened.
    NestedColumns,
    /// A footnote reference had no matching definition.
    UnresolvedFootnote,
    /// A footnote id was defined more than once on a slide.
    DuplicateFootnote,
    /// An image format or source was not supported.
    UnsupportedImage,
    /// An image alt sizing token had an invalid value.
    InvalidImageToken,
}

impl WarningKind {
    /// Stable lowercase label used in log lines.
    pub fn label(self) -> &'static str {
        match self {
            WarningKind::MalformedFrontmatter => "malformed-frontmatter",
            WarningKind::InvalidConfig => "invalid-config",
            WarningKind::DirectiveAttribute => "directive-attribute",
            WarningKind::MissingAttribute => "missing-attribute",
            WarningKind::ClampedValue => "clamped-value",
            WarningKind::ColumnCount => "column-count",
            WarningKind::NestedColumns => "nested-columns",
            WarningKind::UnresolvedFootnote => "unresolved-footnote",
            WarningKind::DuplicateFootnote => "duplicate-footnote",
            WarningKind::UnsupportedImage => "unsupported-image",
            WarningKind::InvalidImageToken => "invalid-image-token",
        }
    }
}

/// Non-fatal warning recorded while compiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileWarning {
    /// 1-indexed slide number, or `None` for document-level configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slide: Option<usize>,
    /// Warning category.
    pub kind: WarningKind,
    /// Human readable message.
    pub message: String,
}

impl CompileWarning {
    /// Create a warning attached to a slide.
    pub fn on_slide(slide: usize, kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            slide: Some(slide),
            kind,
            message: message.into(),
        }
    }

    /// Create a document-level warning.
    pub fn document(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            slide: None,
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CompileWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.slide {
            Some(slide) => write!(f, "slide {} [{}]: {}", slide, self.kind.label(), self.message),
            None => write!(f, "document [{}]: {}", self.kind.label(), self.message),
        }
    }
}

/// Explicit per-call compile context handed to every stage.
///
/// Carries the slide being compiled, the options, and the warning sink.
pub struct SlideContext<'a> {
    /// 1-indexed slide number, or `None` while resolving global frontmatter.
    pub slide: Option<usize>,
    /// Options for this compile call.
    pub options: &'a CompileOptions,
    warnings: &'a mut Vec<CompileWarning>,
}

impl<'a> SlideContext<'a> {
    /// Context for document-level work (global frontmatter).
    pub fn document(options: &'a CompileOptions, warnings: &'a mut Vec<CompileWarning>) -> Self {
        Self {
            slide: None,
            options,
            warnings,
        }
    }

    /// Context for one slide.
    pub fn slide(
        slide: usize,
        options: &'a CompileOptions,
        warnings: &'a mut Vec<CompileWarning>,
    ) -> Self {
        Self {
            slide: Some(slide),
            options,
            warnings,
        }
    }

    /// Record a warning and mirror it to the log.
    pub fn warn(&mut self, kind: WarningKind, message: impl Into<String>) {
        let warning = CompileWarning {
            slide: self.slide,
            kind,
            message: message.into(),
        };
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// Number of warnings recorded so far in this call.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }
}
