//! Slide segmentation.
//!
//! A document is split into slide regions at `---` lines outside fenced
//! code. The same delimiter also opens and closes frontmatter, so a block is
//! only read as frontmatter where it is structurally unambiguous:
//!
//! * at the start of the document (the global block), or
//! * right after a separator, starting with a `key:` line (optionally behind
//!   one more `---` line), closed by `---`, with only YAML-shaped lines inside
//!   and at least one configuration key at the top level.
//!
//! Anything else is slide content, and every other `---` is a separator.

use serde_json::Value;

use crate::code_fence::FenceTracker;
use crate::config::is_known_key;
use crate::error::{SlideContext, WarningKind};
use crate::frontmatter::{find_block_end, is_delimiter, is_key_line, key_name, parse_yaml_block};

/// Raw YAML lifted out of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontmatterBlock {
    /// YAML text without delimiters.
    pub yaml: String,
    /// 1-indexed line of the first YAML line.
    pub line: usize,
}

/// Source of one slide.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideRegion {
    /// Per-slide override block.
    pub frontmatter: Option<FrontmatterBlock>,
    /// Markdown body.
    pub body: String,
    /// 1-indexed line where the body starts.
    pub start_line: usize,
}

/// A document split into its global block and slide regions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segmented {
    /// Document-level frontmatter.
    pub global: Option<FrontmatterBlock>,
    /// Slide regions in source order; N separators give N + 1 regions.
    pub regions: Vec<SlideRegion>,
}

/// Splits a document into slide regions.
pub fn segment(input: &str, ctx: &mut SlideContext<'_>) -> Segmented {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let lines: Vec<&str> = input.lines().collect();
    let mut index = 0;
    let mut global = None;

    if let Some(first) = lines.iter().position(|line| !line.trim().is_empty())
        && is_delimiter(lines[first])
    {
        match find_block_end(&lines, first + 1, true) {
            Some(end) => {
                global = Some(block(&lines, first + 1, end));
                index = end + 1;
            }
            None => {
                if lines.get(first + 1).is_some_and(|line| is_key_line(line)) {
                    ctx.warn(
                        WarningKind::MalformedFrontmatter,
                        format!(
                            "Frontmatter opened at line {} is not closed; reading it as slide content",
                            first + 1
                        ),
                    );
                }
            }
        }
    }

    let mut regions = Vec::new();
    let mut current = SlideRegion {
        start_line: index + 1,
        ..SlideRegion::default()
    };
    let mut fence = FenceTracker::new();

    while index < lines.len() {
        let line = lines[index];
        if !fence.observe(line) && is_delimiter(line) {
            regions.push(std::mem::take(&mut current));
            let (frontmatter, next) = slide_frontmatter(&lines, index + 1);
            current = SlideRegion {
                frontmatter,
                body: String::new(),
                start_line: next + 1,
            };
            index = next;
            continue;
        }
        current.body.push_str(line);
        current.body.push('\n');
        index += 1;
    }
    regions.push(current);
    if fence.in_fence() {
        log::debug!("code fence left open at end of document");
    }

    log::debug!(
        "segmented {} lines into {} slide regions (global frontmatter: {})",
        lines.len(),
        regions.len(),
        global.is_some()
    );

    Segmented { global, regions }
}

/// Reads an override block starting at `start`, the line after a separator.
/// Returns the block and the index of the first body line.
fn slide_frontmatter(lines: &[&str], start: usize) -> (Option<FrontmatterBlock>, usize) {
    let content_start = if lines.get(start).is_some_and(|line| is_delimiter(line)) {
        start + 1
    } else {
        start
    };

    let first_content = (content_start..lines.len()).find(|&i| !lines[i].trim().is_empty());
    let Some(first_content) = first_content else {
        return (None, start);
    };
    if !is_key_line(lines[first_content].trim_end()) {
        return (None, start);
    }

    let Some(end) = find_block_end(lines, content_start, true) else {
        return (None, start);
    };
    let candidate = block(lines, content_start, end);
    if !declares_config(&candidate.yaml) {
        log::debug!(
            "block at line {} has no configuration keys; kept as slide content",
            candidate.line
        );
        return (None, start);
    }
    (Some(candidate), end + 1)
}

/// True when a YAML block sets at least one configuration key. A block that
/// does not parse is judged by its top-level key lines, so the parse error
/// still surfaces as a warning.
fn declares_config(yaml: &str) -> bool {
    match parse_yaml_block(yaml) {
        Ok(Value::Object(map)) => map.keys().any(|key| is_known_key(key)),
        Ok(_) => false,
        Err(_) => yaml.lines().filter_map(key_name).any(is_known_key),
    }
}

fn block(lines: &[&str], start: usize, end: usize) -> FrontmatterBlock {
    FrontmatterBlock {
        yaml: lines[start..end].join("\n"),
        line: start + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CompileOptions;

    fn split(input: &str) -> (Segmented, Vec<WarningKind>) {
        let options = CompileOptions::default();
        let mut warnings = Vec::new();
        let segmented = {
            let mut ctx = SlideContext::document(&options, &mut warnings);
            segment(input, &mut ctx)
        };
        (segmented, warnings.into_iter().map(|w| w.kind).collect())
    }

    fn bodies(segmented: &Segmented) -> Vec<&str> {
        segmented
            .regions
            .iter()
            .map(|region| region.body.trim())
            .collect()
    }

    #[test]
    fn separators_split_regions() {
        let (segmented, _) = split("# One\n---\n# Two\n---\n---\n# Four");
        assert_eq!(bodies(&segmented), vec!["# One", "# Two", "", "# Four"]);
    }

    #[test]
    fn global_block_at_start() {
        let (segmented, warnings) = split("\u{feff}---\nbackground: \"#111\"\n---\n# Title");
        assert!(warnings.is_empty());
        let global = segmented.global.as_ref().unwrap();
        assert_eq!(global.yaml, "background: \"#111\"");
        assert_eq!(global.line, 2);
        assert_eq!(bodies(&segmented), vec!["# Title"]);
    }

    #[test]
    fn per_slide_block_after_separator() {
        let input = "# A\n---\nbackground: red\ntransition: dissolve\n---\n# B\n---\n# C";
        let (segmented, _) = split(input);
        assert_eq!(bodies(&segmented), vec!["# A", "# B", "# C"]);
        let override_block = segmented.regions[1].frontmatter.as_ref().unwrap();
        assert_eq!(override_block.yaml, "background: red\ntransition: dissolve");
        assert!(segmented.regions[2].frontmatter.is_none());
    }

    #[test]
    fn explicit_opener_is_accepted() {
        let (segmented, _) = split("# A\n---\n---\ncolor: blue\n---\n# B");
        assert_eq!(bodies(&segmented), vec!["# A", "# B"]);
        assert!(segmented.regions[1].frontmatter.is_some());
    }

    #[test]
    fn prose_and_headings_are_not_frontmatter() {
        let (segmented, _) = split("# A\n---\n## B\n---\nText: with a colon\nmore prose\n---\nEnd");
        assert_eq!(segmented.regions.len(), 4);
        assert!(segmented.regions.iter().all(|r| r.frontmatter.is_none()));
    }

    #[test]
    fn key_value_prose_stays_content() {
        let (segmented, warnings) =
            split("# A\n---\nTODO: finish this\n---\nAgenda:\n- one\n- two\n---\n# D");
        assert!(warnings.is_empty());
        assert_eq!(
            bodies(&segmented),
            vec!["# A", "TODO: finish this", "Agenda:\n- one\n- two", "# D"]
        );
        assert!(segmented.regions.iter().all(|r| r.frontmatter.is_none()));
    }

    #[test]
    fn unparsable_config_block_is_still_frontmatter() {
        let (segmented, _) = split("# A\n---\nbackground: [unclosed\n---\n# B");
        assert_eq!(bodies(&segmented), vec!["# A", "# B"]);
        assert!(segmented.regions[1].frontmatter.is_some());
    }

    #[test]
    fn separators_inside_code_are_ignored() {
        let (segmented, _) = split("```yaml\n---\nkey: v\n---\n```\n---\nNext");
        assert_eq!(segmented.regions.len(), 2);
        assert!(segmented.regions[0].body.contains("key: v"));
    }

    #[test]
    fn unterminated_global_block_warns() {
        let (segmented, warnings) = split("---\ntitle: Deck\n# Slide");
        assert!(segmented.global.is_none());
        assert_eq!(warnings, vec![WarningKind::MalformedFrontmatter]);
        assert_eq!(segmented.regions.len(), 2);
    }
}
