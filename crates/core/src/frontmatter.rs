//! YAML frontmatter blocks: recognition, parsing and two-level merge.

use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

/// The line that opens and closes frontmatter and separates slides.
pub const DELIMITER: &str = "---";

/// Errors emitted while parsing a frontmatter block.
#[derive(Debug, Error)]
pub enum FrontmatterError {
    /// YAML failed to parse.
    #[error("Frontmatter parse error: {0}")]
    Parse(String),
    /// Top-level YAML node was not a mapping.
    #[error("Frontmatter must be a YAML mapping at the top level")]
    InvalidRootType,
}

/// True when the line is exactly the delimiter (trailing whitespace allowed).
pub fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

/// Parses a YAML block into a JSON object. An empty block is an empty object.
pub fn parse_yaml_block(block: &str) -> Result<JsonValue, FrontmatterError> {
    if block.trim().is_empty() {
        return Ok(JsonValue::Object(Map::new()));
    }

    let yaml_value: serde_yaml::Value =
        serde_yaml::from_str(block).map_err(|err| FrontmatterError::Parse(err.to_string()))?;
    let json_value =
        serde_json::to_value(yaml_value).map_err(|err| FrontmatterError::Parse(err.to_string()))?;

    match json_value {
        JsonValue::Null => Ok(JsonValue::Object(Map::new())),
        JsonValue::Object(_) => Ok(json_value),
        _ => Err(FrontmatterError::InvalidRootType),
    }
}

/// Deep merge: objects merge key by key, everything else is replaced.
///
/// ```
/// use deckdown_core::frontmatter::deep_merge;
/// use serde_json::json;
///
/// let merged = deep_merge(
///     &json!({"background": "#111", "headings": {"h1": {"size": 10}}}),
///     &json!({"headings": {"h1": {"size": 20}}}),
/// );
/// assert_eq!(merged, json!({"background": "#111", "headings": {"h1": {"size": 20}}}));
/// ```
pub fn deep_merge(base: &JsonValue, overlay: &JsonValue) -> JsonValue {
    match (base, overlay) {
        (JsonValue::Object(base_map), JsonValue::Object(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, value) in overlay_map {
                let next = match base_map.get(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), next);
            }
            JsonValue::Object(merged)
        }
        (_, overlay) => overlay.clone(),
    }
}

/// Shape of a candidate frontmatter line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineShape {
    Blank,
    Key,
    Continuation,
    Other,
}

fn line_shape(line: &str) -> LineShape {
    if line.trim().is_empty() {
        return LineShape::Blank;
    }
    if line.starts_with(' ') || line.starts_with('\t') {
        return LineShape::Continuation;
    }
    if line.starts_with("- ") || line == "-" || line.starts_with("# ") || line == "#" {
        return LineShape::Continuation;
    }
    if is_key_line(line) {
        return LineShape::Key;
    }
    LineShape::Other
}

/// `name:` followed by whitespace or end of line; name may be quoted.
pub(crate) fn is_key_line(line: &str) -> bool {
    key_name(line).is_some()
}

/// Key of an unindented `name:` line, without quotes.
pub(crate) fn key_name(line: &str) -> Option<&str> {
    let (key, after) = line.split_once(':')?;
    if !(after.is_empty() || after.starts_with(' ') || after.starts_with('\t')) {
        return None;
    }
    let key = key.trim_matches(|c| c == '"' || c == '\'');
    let mut chars = key.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    valid.then_some(key)
}

/// Looks for a frontmatter block whose content starts at `lines[start]`.
///
/// Returns the index of the closing delimiter when every line up to it is
/// YAML-shaped. With `require_key`, at least one `key:` line must be present,
/// which keeps a heading such as `# Title` from being read as a YAML comment.
pub fn find_block_end(lines: &[&str], start: usize, require_key: bool) -> Option<usize> {
    let mut saw_key = false;
    let mut saw_content = false;
    for (index, line) in lines.iter().enumerate().skip(start) {
        let line = line.trim_end_matches('\r');
        if is_delimiter(line) {
            return (saw_key || !saw_content || !require_key).then_some(index);
        }
        match line_shape(line) {
            LineShape::Key => {
                saw_key = true;
                saw_content = true;
            }
            LineShape::Continuation => saw_content = true,
            LineShape::Blank => {}
            LineShape::Other => return None,
        }
    }
    None
}
