//! Compiler options.

use serde::{Deserialize, Serialize};

/// Options controlling a compile call.
///
/// Every field has a default so hosts can pass a partial JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileOptions {
    /// Canvas width in pixels; percentages on the x axis resolve against it.
    #[serde(default = "default_canvas_width")]
    pub canvas_width: f64,
    /// Canvas height in pixels; percentages on the y axis resolve against it.
    #[serde(default = "default_canvas_height")]
    pub canvas_height: f64,
    /// Gap between columns when a columns directive has no `gap` attribute.
    #[serde(default = "default_column_gap")]
    pub default_column_gap: f64,
    /// Upper bound for column gaps.
    #[serde(default = "default_max_column_gap")]
    pub max_column_gap: f64,
    /// Lowercase image file extensions the renderer can place.
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,
}

fn default_canvas_width() -> f64 {
    1920.0
}

fn default_canvas_height() -> f64 {
    1080.0
}

fn default_column_gap() -> f64 {
    32.0
}

fn default_max_column_gap() -> f64 {
    200.0
}

fn default_image_extensions() -> Vec<String> {
    ["png", "jpg", "jpeg", "gif"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl CompileOptions {
    /// Returns whether the extension (without dot, any case) is allowed.
    pub fn allows_image_extension(&self, extension: &str) -> bool {
        self.image_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(extension))
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            canvas_width: default_canvas_width(),
            canvas_height: default_canvas_height(),
            default_column_gap: default_column_gap(),
            max_column_gap: default_max_column_gap(),
            image_extensions: default_image_extensions(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let options: CompileOptions =
            serde_json::from_str(r#"{"canvasWidth": 1280}"#).expect("valid options");
        assert_eq!(options.canvas_width, 1280.0);
        assert_eq!(options.canvas_height, 1080.0);
        assert_eq!(options.max_column_gap, 200.0);
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        let options = CompileOptions::default();
        assert!(options.allows_image_extension("PNG"));
        assert!(!options.allows_image_extension("svg"));
    }
}
