//! Pure normalization helpers used by the compiler stages.

/// Color parsing and canonical hex output.
pub mod color;
/// Figma link validation.
pub mod link;
/// Depth to list-marker mapping.
pub mod marker;
/// Transition style and easing names.
pub mod transition;

pub use color::{Rgba, normalize_color, parse_color};
pub use link::{FigmaLink, is_remote_url, parse_figma_link};
pub use marker::{bullet_marker, ordered_marker};
pub use transition::{EasingCurve, TransitionStyle, parse_easing_curve, parse_transition_style};
