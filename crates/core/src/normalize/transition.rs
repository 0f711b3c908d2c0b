//! Transition style and easing curve normalization.

use serde::{Deserialize, Serialize};

/// Shortest transition the renderer accepts, in seconds.
pub const MIN_DURATION: f64 = 0.01;
/// Longest transition the renderer accepts, in seconds.
pub const MAX_DURATION: f64 = 10.0;
/// Duration used when none is given.
pub const DEFAULT_DURATION: f64 = 0.3;

/// Slide transition animation style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum TransitionStyle {
    None,
    Dissolve,
    SmartAnimate,
    SlideFromLeft,
    SlideFromRight,
    SlideFromTop,
    SlideFromBottom,
    PushFromLeft,
    PushFromRight,
    PushFromTop,
    PushFromBottom,
    MoveFromLeft,
    MoveFromRight,
    MoveFromTop,
    MoveFromBottom,
    SlideOutToLeft,
    SlideOutToRight,
    SlideOutToTop,
    SlideOutToBottom,
    MoveOutToLeft,
    MoveOutToRight,
    MoveOutToTop,
    MoveOutToBottom,
}

const STYLES: &[(&str, TransitionStyle)] = &[
    ("none", TransitionStyle::None),
    ("dissolve", TransitionStyle::Dissolve),
    ("smart_animate", TransitionStyle::SmartAnimate),
    ("slide_from_left", TransitionStyle::SlideFromLeft),
    ("slide_from_right", TransitionStyle::SlideFromRight),
    ("slide_from_top", TransitionStyle::SlideFromTop),
    ("slide_from_bottom", TransitionStyle::SlideFromBottom),
    ("push_from_left", TransitionStyle::PushFromLeft),
    ("push_from_right", TransitionStyle::PushFromRight),
    ("push_from_top", TransitionStyle::PushFromTop),
    ("push_from_bottom", TransitionStyle::PushFromBottom),
    ("move_from_left", TransitionStyle::MoveFromLeft),
    ("move_from_right", TransitionStyle::MoveFromRight),
    ("move_from_top", TransitionStyle::MoveFromTop),
    ("move_from_bottom", TransitionStyle::MoveFromBottom),
    ("slide_out_to_left", TransitionStyle::SlideOutToLeft),
    ("slide_out_to_right", TransitionStyle::SlideOutToRight),
    ("slide_out_to_top", TransitionStyle::SlideOutToTop),
    ("slide_out_to_bottom", TransitionStyle::SlideOutToBottom),
    ("move_out_to_left", TransitionStyle::MoveOutToLeft),
    ("move_out_to_right", TransitionStyle::MoveOutToRight),
    ("move_out_to_top", TransitionStyle::MoveOutToTop),
    ("move_out_to_bottom", TransitionStyle::MoveOutToBottom),
];

/// Easing curve applied to a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum EasingCurve {
    EaseIn,
    #[default]
    EaseOut,
    EaseInAndOut,
    Linear,
    Gentle,
    Quick,
    Bouncy,
    Slow,
}

const CURVES: &[(&str, EasingCurve)] = &[
    ("ease_in", EasingCurve::EaseIn),
    ("ease_out", EasingCurve::EaseOut),
    ("ease_in_and_out", EasingCurve::EaseInAndOut),
    ("ease_in_out", EasingCurve::EaseInAndOut),
    ("linear", EasingCurve::Linear),
    ("gentle", EasingCurve::Gentle),
    ("quick", EasingCurve::Quick),
    ("bouncy", EasingCurve::Bouncy),
    ("slow", EasingCurve::Slow),
];

/// Lowercases and folds `-` and spaces into `_`.
fn fold(input: &str) -> String {
    input
        .trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// Parses a transition style name such as `slide-from-right`.
pub fn parse_transition_style(input: &str) -> Option<TransitionStyle> {
    let folded = fold(input);
    STYLES
        .iter()
        .find(|(name, _)| *name == folded)
        .map(|(_, style)| *style)
}

/// Parses an easing curve name such as `ease-in-out`.
pub fn parse_easing_curve(input: &str) -> Option<EasingCurve> {
    let folded = fold(input);
    CURVES
        .iter()
        .find(|(name, _)| *name == folded)
        .map(|(_, curve)| *curve)
}

/// Clamps a duration into the accepted range. Returns the value and whether it changed.
pub fn clamp_duration(seconds: f64) -> (f64, bool) {
    if seconds.is_nan() {
        return (DEFAULT_DURATION, true);
    }
    let clamped = seconds.clamp(MIN_DURATION, MAX_DURATION);
    (clamped, clamped != seconds)
}
