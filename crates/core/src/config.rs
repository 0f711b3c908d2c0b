//! Typed per-slide configuration resolved from merged frontmatter.
//!
//! Resolution happens per top-level section. The global block is resolved
//! once; for each slide, sections the override does not mention inherit the
//! global typed value, and sections it does mention are parsed from the
//! merged value. An invalid section yields a warning and falls back to the
//! inherited value.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{SlideContext, WarningKind};
use crate::ir::ImageSource;
use crate::normalize::color::normalize_color;
use crate::normalize::link::{FigmaLink, is_remote_url, parse_figma_link};
use crate::normalize::transition::{
    DEFAULT_DURATION, EasingCurve, TransitionStyle, clamp_duration, parse_easing_curve,
    parse_transition_style,
};

/// A parsed frontmatter mapping.
pub type ConfigMap = Map<String, Value>;

/// Background keys, highest priority first.
const BACKGROUND_KEYS: [&str; 4] = ["template", "backgroundImage", "gradient", "background"];

const KNOWN_KEYS: &[&str] = &[
    "template",
    "backgroundImage",
    "gradient",
    "background",
    "color",
    "headings",
    "paragraphs",
    "bullets",
    "code",
    "fonts",
    "slideNumber",
    "titlePrefix",
    "align",
    "valign",
    "transition",
];

/// True for the top-level keys a frontmatter block can configure.
pub(crate) fn is_known_key(key: &str) -> bool {
    KNOWN_KEYS.contains(&key)
}

/// Slide background. Only one kind applies to a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Background {
    /// Solid fill.
    Solid {
        /// Canonical hex color.
        color: String,
    },
    /// Linear gradient.
    Gradient {
        /// Color stops in order.
        stops: Vec<GradientStop>,
        /// Angle in degrees.
        angle: f64,
    },
    /// Full-bleed image.
    Image {
        /// Path or URL.
        url: String,
        /// Loader that resolves the bytes.
        source: ImageSource,
    },
    /// Figma component used as the slide template.
    Component {
        /// Validated link to the component.
        link: FigmaLink,
    },
}

/// One gradient stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Canonical hex color.
    pub color: String,
    /// Position between 0 and 1.
    pub position: f64,
}

/// Size and color of one text role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    /// Canonical hex color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Styles per heading level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct HeadingStyles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h1: Option<TextStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h2: Option<TextStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h3: Option<TextStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h4: Option<TextStyle>,
}

/// Bullet list style.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletStyle {
    /// Font size in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    /// Canonical hex color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Indentation per nesting level in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indent_size: Option<f64>,
}

/// Code block style.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeStyle {
    /// Font size in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    /// Highlighting theme name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

/// Font family and style names for one role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontVariant {
    /// Family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    /// Regular style name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Bold style name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<String>,
    /// Italic style name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<String>,
    /// Bold italic style name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold_italic: Option<String>,
}

/// Fonts per text role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct FontStyles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h1: Option<FontVariant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h2: Option<FontVariant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h3: Option<FontVariant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h4: Option<FontVariant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<FontVariant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullets: Option<FontVariant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<FontVariant>,
}

/// Text styles for every role on a slide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlideStyles {
    /// Base text color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Heading styles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headings: Option<HeadingStyles>,
    /// Paragraph style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraphs: Option<TextStyle>,
    /// Bullet style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullets: Option<BulletStyle>,
    /// Code style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeStyle>,
    /// Font families.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fonts: Option<FontStyles>,
}

impl SlideStyles {
    /// True when no style is set.
    pub fn is_empty(&self) -> bool {
        *self == SlideStyles::default()
    }
}

/// Corner the slide number is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[allow(missing_docs)]
pub enum SlideNumberPosition {
    #[serde(alias = "top_left")]
    TopLeft,
    #[serde(alias = "top_right")]
    TopRight,
    #[serde(alias = "bottom_left")]
    BottomLeft,
    #[serde(alias = "bottom_right")]
    BottomRight,
}

/// Pixel offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct Offset {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

/// Slide number display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideNumberConfig {
    /// Whether the number is drawn.
    #[serde(default = "default_true")]
    pub show: bool,
    /// Corner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<SlideNumberPosition>,
    /// Font size in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    /// Canonical hex color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Offset from the corner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<Offset>,
    /// Number shown on the first slide.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_from: Option<u32>,
    /// Format string such as `{{current}} / {{total}}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Hide on title slides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_on_title: Option<bool>,
}

fn default_true() -> bool {
    true
}

/// Component placed before every slide title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitlePrefixConfig {
    /// Validated link to the prefix component.
    pub link: FigmaLink,
    /// Gap between prefix and title in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing: Option<f64>,
}

/// Horizontal content alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

/// Vertical content alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum VerticalAlign {
    Top,
    #[serde(alias = "center")]
    Middle,
    Bottom,
}

/// When a transition fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub enum TimingKind {
    OnClick,
    AfterDelay,
}

/// Transition trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionTiming {
    /// Trigger kind.
    #[serde(rename = "type")]
    pub kind: TimingKind,
    /// Delay in seconds for `afterDelay`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<f64>,
}

/// Normalized transition into a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionConfig {
    /// Animation style.
    pub style: TransitionStyle,
    /// Duration in seconds.
    pub duration: f64,
    /// Easing curve.
    pub curve: EasingCurve,
    /// Trigger.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing: Option<TransitionTiming>,
}

/// Fully resolved configuration for one slide.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedConfig {
    /// Background.
    pub background: Option<Background>,
    /// Text styles.
    pub styles: SlideStyles,
    /// Slide number display.
    pub slide_number: Option<SlideNumberConfig>,
    /// Title prefix.
    pub title_prefix: Option<TitlePrefixConfig>,
    /// Horizontal alignment.
    pub align: Option<HorizontalAlign>,
    /// Vertical alignment.
    pub valign: Option<VerticalAlign>,
    /// Transition.
    pub transition: Option<TransitionConfig>,
}

type SectionParser<T> = fn(&Value, &mut SlideContext<'_>) -> Result<Option<T>, String>;

impl ResolvedConfig {
    /// Resolve the document-global block.
    pub fn resolve_global(global: &ConfigMap, ctx: &mut SlideContext<'_>) -> Self {
        report_unknown_keys(global);
        Self::resolve(global, None, &ResolvedConfig::default(), ctx)
    }

    /// Resolve a slide given the global typed config and the slide override.
    ///
    /// `merged` must be `deep_merge(global, overrides)`.
    pub fn resolve_slide(
        inherited: &ResolvedConfig,
        merged: &ConfigMap,
        overrides: &ConfigMap,
        ctx: &mut SlideContext<'_>,
    ) -> Self {
        report_unknown_keys(overrides);
        Self::resolve(merged, Some(overrides), inherited, ctx)
    }

    fn resolve(
        merged: &ConfigMap,
        touched: Option<&ConfigMap>,
        inherited: &ResolvedConfig,
        ctx: &mut SlideContext<'_>,
    ) -> Self {
        let background = resolve_background(merged, touched, inherited, ctx);

        let styles = SlideStyles {
            color: section(
                "color",
                merged,
                touched,
                &inherited.styles.color,
                ctx,
                parse_color_value,
            ),
            headings: section(
                "headings",
                merged,
                touched,
                &inherited.styles.headings,
                ctx,
                parse_headings,
            ),
            paragraphs: section(
                "paragraphs",
                merged,
                touched,
                &inherited.styles.paragraphs,
                ctx,
                parse_text_style,
            ),
            bullets: section(
                "bullets",
                merged,
                touched,
                &inherited.styles.bullets,
                ctx,
                parse_bullet_style,
            ),
            code: section(
                "code",
                merged,
                touched,
                &inherited.styles.code,
                ctx,
                parse_code_style,
            ),
            fonts: section(
                "fonts",
                merged,
                touched,
                &inherited.styles.fonts,
                ctx,
                parse_serde::<FontStyles>,
            ),
        };

        Self {
            background,
            styles,
            slide_number: section(
                "slideNumber",
                merged,
                touched,
                &inherited.slide_number,
                ctx,
                parse_slide_number,
            ),
            title_prefix: section(
                "titlePrefix",
                merged,
                touched,
                &inherited.title_prefix,
                ctx,
                parse_title_prefix,
            ),
            align: section(
                "align",
                merged,
                touched,
                &inherited.align,
                ctx,
                parse_serde::<HorizontalAlign>,
            ),
            valign: section(
                "valign",
                merged,
                touched,
                &inherited.valign,
                ctx,
                parse_serde::<VerticalAlign>,
            ),
            transition: section(
                "transition",
                merged,
                touched,
                &inherited.transition,
                ctx,
                parse_transition,
            ),
        }
    }
}

fn report_unknown_keys(map: &ConfigMap) {
    for key in map.keys() {
        if !is_known_key(key) {
            log::debug!("ignoring unknown frontmatter key `{}`", key);
        }
    }
}

/// Resolves one section, falling back to the inherited value on error.
fn section<T: Clone>(
    key: &str,
    merged: &ConfigMap,
    touched: Option<&ConfigMap>,
    inherited: &Option<T>,
    ctx: &mut SlideContext<'_>,
    parse: SectionParser<T>,
) -> Option<T> {
    if let Some(overrides) = touched
        && !overrides.contains_key(key)
    {
        return inherited.clone();
    }
    let Some(value) = merged.get(key) else {
        return inherited.clone();
    };
    match parse(value, ctx) {
        Ok(parsed) => parsed,
        Err(message) => {
            ctx.warn(
                WarningKind::InvalidConfig,
                format!("invalid `{}`: {}", key, message),
            );
            inherited.clone()
        }
    }
}

fn resolve_background(
    merged: &ConfigMap,
    touched: Option<&ConfigMap>,
    inherited: &ResolvedConfig,
    ctx: &mut SlideContext<'_>,
) -> Option<Background> {
    let source = match touched {
        Some(overrides) if BACKGROUND_KEYS.iter().any(|k| overrides.contains_key(*k)) => overrides,
        Some(_) => return inherited.background.clone(),
        None => merged,
    };

    for key in BACKGROUND_KEYS {
        let Some(value) = source.get(key) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        match parse_background_key(key, value) {
            Ok(background) => return Some(background),
            Err(message) => ctx.warn(
                WarningKind::InvalidConfig,
                format!("invalid `{}`: {}", key, message),
            ),
        }
    }
    inherited.background.clone()
}

fn parse_background_key(key: &str, value: &Value) -> Result<Background, String> {
    let text = value
        .as_str()
        .ok_or_else(|| "expected a string".to_string())?;
    match key {
        "template" => parse_figma_link(text)
            .map(|link| Background::Component { link })
            .ok_or_else(|| format!("`{}` is not a Figma node link", text)),
        "backgroundImage" => {
            let url = text.trim();
            if url.is_empty() {
                return Err("empty image url".to_string());
            }
            let source = if is_remote_url(url) {
                ImageSource::Remote
            } else {
                ImageSource::Local
            };
            Ok(Background::Image {
                url: url.to_string(),
                source,
            })
        }
        "gradient" => parse_gradient(text),
        _ => normalize_color(text)
            .map(|color| Background::Solid { color })
            .ok_or_else(|| format!("`{}` is not a color", text)),
    }
}

/// Parses `#000:0%,#fff:100%@45`. Stops without a position are spread evenly.
fn parse_gradient(text: &str) -> Result<Background, String> {
    let (stops_part, angle) = match text.rsplit_once('@') {
        Some((stops, angle)) => {
            let angle: f64 = angle
                .trim()
                .trim_end_matches("deg")
                .parse()
                .map_err(|_| format!("invalid angle `{}`", angle))?;
            (stops, angle)
        }
        None => (text, 0.0),
    };

    let raw: Vec<&str> = stops_part
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if raw.len() < 2 {
        return Err("a gradient needs at least two stops".to_string());
    }

    let last = (raw.len() - 1) as f64;
    let mut stops = Vec::with_capacity(raw.len());
    for (index, stop) in raw.iter().enumerate() {
        let (color, position) = match stop.rsplit_once(':') {
            Some((color, position)) => {
                let position = position.trim();
                let value: f64 = position
                    .trim_end_matches('%')
                    .parse()
                    .map_err(|_| format!("invalid stop position `{}`", position))?;
                let fraction = if position.ends_with('%') {
                    value / 100.0
                } else {
                    value
                };
                (color, fraction.clamp(0.0, 1.0))
            }
            None => (*stop, index as f64 / last),
        };
        let color = normalize_color(color).ok_or_else(|| format!("`{}` is not a color", color))?;
        stops.push(GradientStop { color, position });
    }

    Ok(Background::Gradient { stops, angle })
}

fn parse_serde<T: DeserializeOwned>(
    value: &Value,
    _ctx: &mut SlideContext<'_>,
) -> Result<Option<T>, String> {
    if value.is_null() {
        return Ok(None);
    }
    serde_json::from_value(value.clone())
        .map(Some)
        .map_err(|err| err.to_string())
}

fn checked_color(color: Option<String>) -> Result<Option<String>, String> {
    match color {
        Some(raw) => normalize_color(&raw)
            .map(Some)
            .ok_or_else(|| format!("`{}` is not a color", raw)),
        None => Ok(None),
    }
}

fn checked_size(size: Option<f64>) -> Result<Option<f64>, String> {
    match size {
        Some(value) if value <= 0.0 || !value.is_finite() => {
            Err(format!("size must be positive, got {}", value))
        }
        other => Ok(other),
    }
}

fn checked_text_style(style: TextStyle) -> Result<TextStyle, String> {
    Ok(TextStyle {
        size: checked_size(style.size)?,
        color: checked_color(style.color)?,
    })
}

fn parse_color_value(value: &Value, _ctx: &mut SlideContext<'_>) -> Result<Option<String>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(raw) => checked_color(Some(raw.clone())),
        _ => Err("expected a color string".to_string()),
    }
}

fn parse_text_style(value: &Value, ctx: &mut SlideContext<'_>) -> Result<Option<TextStyle>, String> {
    parse_serde::<TextStyle>(value, ctx)?
        .map(checked_text_style)
        .transpose()
}

fn parse_headings(
    value: &Value,
    ctx: &mut SlideContext<'_>,
) -> Result<Option<HeadingStyles>, String> {
    let Some(headings) = parse_serde::<HeadingStyles>(value, ctx)? else {
        return Ok(None);
    };
    let check = |style: Option<TextStyle>| style.map(checked_text_style).transpose();
    Ok(Some(HeadingStyles {
        h1: check(headings.h1)?,
        h2: check(headings.h2)?,
        h3: check(headings.h3)?,
        h4: check(headings.h4)?,
    }))
}

fn parse_bullet_style(
    value: &Value,
    ctx: &mut SlideContext<'_>,
) -> Result<Option<BulletStyle>, String> {
    let Some(style) = parse_serde::<BulletStyle>(value, ctx)? else {
        return Ok(None);
    };
    Ok(Some(BulletStyle {
        size: checked_size(style.size)?,
        color: checked_color(style.color)?,
        indent_size: checked_size(style.indent_size)?,
    }))
}

fn parse_code_style(value: &Value, ctx: &mut SlideContext<'_>) -> Result<Option<CodeStyle>, String> {
    let Some(style) = parse_serde::<CodeStyle>(value, ctx)? else {
        return Ok(None);
    };
    Ok(Some(CodeStyle {
        size: checked_size(style.size)?,
        theme: style.theme,
    }))
}

fn parse_slide_number(
    value: &Value,
    ctx: &mut SlideContext<'_>,
) -> Result<Option<SlideNumberConfig>, String> {
    if let Value::Bool(show) = value {
        return Ok(Some(SlideNumberConfig {
            show: *show,
            position: None,
            size: None,
            color: None,
            offset: None,
            start_from: None,
            format: None,
            hide_on_title: None,
        }));
    }
    let Some(mut config) = parse_serde::<SlideNumberConfig>(value, ctx)? else {
        return Ok(None);
    };
    config.size = checked_size(config.size)?;
    config.color = checked_color(config.color)?;
    if config.start_from == Some(0) {
        return Err("startFrom must be at least 1".to_string());
    }
    Ok(Some(config))
}

fn parse_title_prefix(
    value: &Value,
    _ctx: &mut SlideContext<'_>,
) -> Result<Option<TitlePrefixConfig>, String> {
    match value {
        Value::Null | Value::Bool(false) => Ok(None),
        Value::Object(map) => {
            let link = map
                .get("link")
                .and_then(Value::as_str)
                .ok_or_else(|| "missing `link`".to_string())?;
            let link = parse_figma_link(link)
                .ok_or_else(|| format!("`{}` is not a Figma node link", link))?;
            let spacing = match map.get("spacing") {
                None | Some(Value::Null) => None,
                Some(value) => {
                    let spacing = value
                        .as_f64()
                        .ok_or_else(|| "spacing must be a number".to_string())?;
                    if spacing < 0.0 {
                        return Err("spacing must not be negative".to_string());
                    }
                    Some(spacing)
                }
            };
            Ok(Some(TitlePrefixConfig { link, spacing }))
        }
        _ => Err("expected an object with `link`, or false".to_string()),
    }
}

/// Accepts `"dissolve"`, `"slide-from-right 0.5"`, `"push-from-left 0.4 ease-in"`,
/// or an object with `style`, `duration`, `curve` and `timing`.
fn parse_transition(
    value: &Value,
    ctx: &mut SlideContext<'_>,
) -> Result<Option<TransitionConfig>, String> {
    let (style, duration, curve, timing) = match value {
        Value::Null => return Ok(None),
        Value::String(text) => {
            let mut parts = text.split_whitespace();
            let style = parts.next().ok_or_else(|| "empty transition".to_string())?;
            let duration = parts
                .next()
                .map(|d| {
                    d.trim_end_matches('s')
                        .parse::<f64>()
                        .map_err(|_| format!("invalid duration `{}`", d))
                })
                .transpose()?;
            (style.to_string(), duration, parts.next().map(String::from), None)
        }
        Value::Object(map) => {
            let style = map
                .get("style")
                .and_then(Value::as_str)
                .ok_or_else(|| "missing `style`".to_string())?;
            let duration = match map.get("duration") {
                None | Some(Value::Null) => None,
                Some(d) => Some(d.as_f64().ok_or_else(|| "duration must be a number".to_string())?),
            };
            let curve = match map.get("curve") {
                None | Some(Value::Null) => None,
                Some(c) => Some(
                    c.as_str()
                        .ok_or_else(|| "curve must be a string".to_string())?
                        .to_string(),
                ),
            };
            let timing = match map.get("timing") {
                None | Some(Value::Null) => None,
                Some(t) => Some(parse_timing(t)?),
            };
            (style.to_string(), duration, curve, timing)
        }
        _ => return Err("expected a string or an object".to_string()),
    };

    let style =
        parse_transition_style(&style).ok_or_else(|| format!("unknown transition `{}`", style))?;
    let curve = match curve {
        Some(name) => {
            parse_easing_curve(&name).ok_or_else(|| format!("unknown easing curve `{}`", name))?
        }
        None => EasingCurve::default(),
    };
    let duration = match duration {
        Some(seconds) => {
            let (clamped, changed) = clamp_duration(seconds);
            if changed {
                ctx.warn(
                    WarningKind::ClampedValue,
                    format!("transition duration {} clamped to {}", seconds, clamped),
                );
            }
            clamped
        }
        None => DEFAULT_DURATION,
    };

    Ok(Some(TransitionConfig {
        style,
        duration,
        curve,
        timing,
    }))
}

fn parse_timing(value: &Value) -> Result<TransitionTiming, String> {
    let map = value
        .as_object()
        .ok_or_else(|| "timing must be an object".to_string())?;
    let raw = map
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| "timing needs a `type`".to_string())?;
    let folded: String = raw
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .map(|c| c.to_ascii_lowercase())
        .collect();
    let kind = match folded.as_str() {
        "onclick" => TimingKind::OnClick,
        "afterdelay" => TimingKind::AfterDelay,
        _ => return Err(format!("unknown timing `{}`", raw)),
    };
    let delay = match map.get("delay") {
        None | Some(Value::Null) => None,
        Some(d) => {
            let delay = d
                .as_f64()
                .ok_or_else(|| "delay must be a number".to_string())?;
            if delay < 0.0 {
                return Err("delay must not be negative".to_string());
            }
            Some(delay)
        }
    };
    Ok(TransitionTiming { kind, delay })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompileWarning;
    use crate::frontmatter::{deep_merge, parse_yaml_block};
    use crate::options::CompileOptions;

    fn map(yaml: &str) -> ConfigMap {
        match parse_yaml_block(yaml).expect("valid yaml") {
            Value::Object(map) => map,
            other => panic!("expected mapping, got {other:?}"),
        }
    }

    fn resolve_pair(global: &str, slide: &str) -> (ResolvedConfig, Vec<CompileWarning>) {
        let options = CompileOptions::default();
        let mut warnings = Vec::new();
        let global = map(global);
        let overrides = map(slide);
        let inherited = {
            let mut ctx = SlideContext::document(&options, &mut warnings);
            ResolvedConfig::resolve_global(&global, &mut ctx)
        };
        let merged = deep_merge(&Value::Object(global), &Value::Object(overrides.clone()));
        let Value::Object(merged) = merged else {
            panic!("merge of mappings is a mapping");
        };
        let mut ctx = SlideContext::slide(1, &options, &mut warnings);
        let resolved = ResolvedConfig::resolve_slide(&inherited, &merged, &overrides, &mut ctx);
        (resolved, warnings)
    }

    #[test]
    fn cascade_inherits_and_overrides_nested_keys() {
        let (resolved, warnings) = resolve_pair(
            "background: \"#111\"\nheadings:\n  h1:\n    size: 10\n    color: \"#f00\"",
            "headings:\n  h1:\n    size: 20",
        );
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(
            resolved.background,
            Some(Background::Solid {
                color: "#111111".into()
            })
        );
        let h1 = resolved.styles.headings.unwrap().h1.unwrap();
        assert_eq!(h1.size, Some(20.0));
        assert_eq!(h1.color.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn invalid_override_falls_back_to_global() {
        let (resolved, warnings) = resolve_pair(
            "paragraphs:\n  size: 24",
            "paragraphs:\n  size: -3",
        );
        assert_eq!(resolved.styles.paragraphs.unwrap().size, Some(24.0));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::InvalidConfig);
        assert_eq!(warnings[0].slide, Some(1));
    }

    #[test]
    fn slide_background_replaces_global_template() {
        let (resolved, _) = resolve_pair(
            "template: https://www.figma.com/design/KEY/Deck?node-id=1-2",
            "background: \"#fff\"",
        );
        assert_eq!(
            resolved.background,
            Some(Background::Solid {
                color: "#ffffff".into()
            })
        );
    }

    #[test]
    fn background_priority_within_one_block() {
        let (resolved, _) = resolve_pair(
            "background: \"#000\"\ngradient: \"#000:0%,#fff:100%@45\"",
            "",
        );
        let Some(Background::Gradient { stops, angle }) = resolved.background else {
            panic!("expected gradient");
        };
        assert_eq!(angle, 45.0);
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[1].color, "#ffffff");
        assert_eq!(stops[1].position, 1.0);
    }

    #[test]
    fn transition_string_and_object_forms() {
        let (resolved, warnings) = resolve_pair(
            "transition:\n  style: dissolve\n  duration: 1\n  timing:\n    type: after-delay\n    delay: 2",
            "transition:\n  duration: 30\n  curve: ease-in-out",
        );
        let transition = resolved.transition.unwrap();
        assert_eq!(transition.style, TransitionStyle::Dissolve);
        assert_eq!(transition.duration, 10.0);
        assert_eq!(transition.curve, EasingCurve::EaseInAndOut);
        assert_eq!(transition.timing.unwrap().kind, TimingKind::AfterDelay);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::ClampedValue);

        let (resolved, _) = resolve_pair("transition: slide-from-right 0.5", "");
        let transition = resolved.transition.unwrap();
        assert_eq!(transition.style, TransitionStyle::SlideFromRight);
        assert_eq!(transition.duration, 0.5);
        assert_eq!(transition.curve, EasingCurve::EaseOut);
    }

    #[test]
    fn slide_number_bool_and_title_prefix_disable() {
        let (resolved, warnings) = resolve_pair(
            "slideNumber: true\ntitlePrefix:\n  link: https://figma.com/file/K/x?node-id=3-4\n  spacing: 16",
            "titlePrefix: false",
        );
        assert!(warnings.is_empty(), "{warnings:?}");
        assert!(resolved.slide_number.unwrap().show);
        assert_eq!(resolved.title_prefix, None);
    }

    #[test]
    fn alignment_values() {
        let (resolved, warnings) = resolve_pair("align: center\nvalign: middle", "valign: sideways");
        assert_eq!(resolved.align, Some(HorizontalAlign::Center));
        assert_eq!(resolved.valign, Some(VerticalAlign::Middle));
        assert_eq!(warnings.len(), 1);
    }
}
