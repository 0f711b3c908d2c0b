//! Image references: alt-text sizing tokens and source tagging.
//!
//! The alt text of `![w:50% x:10 y:10 Label](chart.png)` carries
//! whitespace-separated `w:`, `h:`, `x:` and `y:` tokens. Values are plain
//! pixels (`960`, `960px`) or canvas percentages (`50%`). Whatever is left
//! over is the alt label.

use crate::error::{SlideContext, WarningKind};
use crate::ir::{ImageBlock, ImageSize, ImageSource, Position};
use crate::normalize::is_remote_url;

/// Canvas axis a percentage resolves against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Width: `w` and `x`.
    Horizontal,
    /// Height: `h` and `y`.
    Vertical,
}

/// Resolves `N`, `Npx` or `N%` to pixels. Negative and non-finite values are rejected.
pub fn resolve_length(value: &str, axis: Axis, ctx: &SlideContext<'_>) -> Option<f64> {
    let value = value.trim();
    let (number, percent) = if let Some(number) = value.strip_suffix('%') {
        (number, true)
    } else if let Some(number) = value.strip_suffix("px") {
        (number, false)
    } else {
        (value, false)
    };
    let number: f64 = number.trim().parse().ok()?;
    if !number.is_finite() || number < 0.0 {
        return None;
    }
    if !percent {
        return Some(number);
    }
    let extent = match axis {
        Axis::Horizontal => ctx.options.canvas_width,
        Axis::Vertical => ctx.options.canvas_height,
    };
    Some(number / 100.0 * extent)
}

#[derive(Default)]
struct Placement {
    width: Option<f64>,
    height: Option<f64>,
    x: Option<f64>,
    y: Option<f64>,
}

/// Builds an image block from a Markdown image's URL and alt text.
pub fn compile_image(url: &str, alt: &str, ctx: &mut SlideContext<'_>) -> ImageBlock {
    let mut placement = Placement::default();
    let mut label = Vec::new();

    for token in alt.split_whitespace() {
        let Some((key, value)) = token.split_once(':') else {
            label.push(token);
            continue;
        };
        let key = key.to_ascii_lowercase();
        let (slot, axis) = match key.as_str() {
            "w" => (&mut placement.width, Axis::Horizontal),
            "h" => (&mut placement.height, Axis::Vertical),
            "x" => (&mut placement.x, Axis::Horizontal),
            "y" => (&mut placement.y, Axis::Vertical),
            _ => {
                label.push(token);
                continue;
            }
        };
        let sizing = matches!(key.as_str(), "w" | "h");
        match resolve_length(value, axis, ctx) {
            Some(px) if !sizing || px > 0.0 => *slot = Some(px),
            _ => {
                ctx.warn(
                    WarningKind::InvalidImageToken,
                    format!("Invalid image token '{}' on {}", token, url),
                );
                label.push(token);
            }
        }
    }

    let position = match (placement.x, placement.y) {
        (Some(x), Some(y)) => Some(Position { x, y }),
        (None, None) => None,
        _ => {
            ctx.warn(
                WarningKind::InvalidImageToken,
                format!("Image {} needs both x and y to be positioned", url),
            );
            None
        }
    };
    let size = (placement.width.is_some() || placement.height.is_some()).then_some(ImageSize {
        width: placement.width,
        height: placement.height,
    });
    let alt = (!label.is_empty()).then(|| label.join(" "));

    let source = if is_remote_url(url) {
        ImageSource::Remote
    } else {
        ImageSource::Local
    };
    let placeholder = match unsupported_reason(url, source, ctx) {
        Some(reason) => {
            ctx.warn(
                WarningKind::UnsupportedImage,
                format!("Unsupported image {}: {}", url, reason),
            );
            true
        }
        None => false,
    };

    ImageBlock {
        url: url.to_string(),
        source,
        alt,
        size,
        position,
        placeholder,
        href: None,
    }
}

fn unsupported_reason(url: &str, source: ImageSource, ctx: &SlideContext<'_>) -> Option<String> {
    if url.trim().is_empty() {
        return Some("empty path".to_string());
    }
    if source == ImageSource::Local && has_scheme(url) {
        return Some("unsupported scheme".to_string());
    }
    match (extension(url), source) {
        (Some(ext), _) if ctx.options.allows_image_extension(ext) => None,
        (Some(ext), _) => Some(format!("unsupported format '{}'", ext)),
        (None, ImageSource::Remote) => None,
        (None, ImageSource::Local) => Some("missing file extension".to_string()),
    }
}

/// `scheme:` prefix of two or more characters; one letter is a drive letter.
fn has_scheme(url: &str) -> bool {
    let Some(colon) = url.find(':') else {
        return false;
    };
    let scheme = &url[..colon];
    scheme.len() > 1
        && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// File extension of the last path segment, ignoring query and fragment.
fn extension(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let path = path
        .strip_prefix("https://")
        .or_else(|| path.strip_prefix("http://"))
        .map(|rest| rest.split_once('/').map_or("", |(_, path)| path))
        .unwrap_or(path);
    let file = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let (stem, ext) = file.rsplit_once('.')?;
    (!stem.is_empty() && !ext.is_empty()).then_some(ext)
}
