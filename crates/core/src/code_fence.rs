//! Fenced code tracking for the line scanners.
//!
//! The segmenter, directive splitter and footnote extractor all walk raw
//! lines; none of them may interpret `---`, `:::` or `[^id]:` inside a
//! fenced code block. [`FenceTracker`] answers "is this line code?".

/// Open fence marker and its run length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenFence {
    marker: char,
    length: usize,
}

/// Line-by-line fenced code state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FenceTracker {
    open: Option<OpenFence>,
}

impl FenceTracker {
    /// Create a tracker positioned outside any fence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the tracker is currently inside a fence.
    pub fn in_fence(&self) -> bool {
        self.open.is_some()
    }

    /// Feed one line. Returns true when the line is part of a fence
    /// (opener, content or closer).
    pub fn observe(&mut self, line: &str) -> bool {
        let (columns, bytes) = leading_whitespace(line);
        let rest = &line[bytes..];

        match self.open {
            None => {
                // 4+ columns is indented code, not a fence opener
                if columns <= 3
                    && let Some((marker, length)) = fence_run(rest)
                    && (marker == '~' || !rest[length..].contains('`'))
                {
                    self.open = Some(OpenFence { marker, length });
                    return true;
                }
                false
            }
            Some(open) => {
                if columns <= 3
                    && let Some((marker, length)) = fence_run(rest)
                    && marker == open.marker
                    && length >= open.length
                    && rest[length..].trim().is_empty()
                {
                    self.open = None;
                }
                true
            }
        }
    }
}

/// Returns (visual columns, byte length) of leading whitespace; tabs stop every 4 columns.
fn leading_whitespace(line: &str) -> (usize, usize) {
    let mut columns = 0;
    let mut bytes = 0;
    for b in line.bytes() {
        match b {
            b' ' => columns += 1,
            b'\t' => columns += 4 - (columns % 4),
            _ => break,
        }
        bytes += 1;
    }
    (columns, bytes)
}

/// Detects a run of at least three backticks or tildes.
fn fence_run(text: &str) -> Option<(char, usize)> {
    let first = text.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }
    let length = text.chars().take_while(|c| *c == first).count();
    (length >= 3).then_some((first, length))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_lines(input: &str) -> Vec<bool> {
        let mut tracker = FenceTracker::new();
        input.lines().map(|line| tracker.observe(line)).collect()
    }

    #[test]
    fn tracks_backtick_fence() {
        assert_eq!(
            code_lines("text\n```rust\n---\n```\n---"),
            vec![false, true, true, true, false]
        );
    }

    #[test]
    fn longer_fence_survives_shorter_closer() {
        assert_eq!(
            code_lines("````md\n```\n:::\n````\n:::"),
            vec![true, true, true, true, false]
        );
    }

    #[test]
    fn mismatched_marker_does_not_close() {
        let mut tracker = FenceTracker::new();
        tracker.observe("~~~");
        tracker.observe("```");
        assert!(tracker.in_fence());
        tracker.observe("~~~~");
        assert!(!tracker.in_fence());
    }

    #[test]
    fn indented_fence_is_not_an_opener() {
        assert_eq!(code_lines("    ```\n---"), vec![false, false]);
        assert_eq!(code_lines("\t```\n---"), vec![false, false]);
        assert_eq!(code_lines("   ```\nx\n  ```"), vec![true, true, true]);
    }

    #[test]
    fn closer_with_info_string_stays_open() {
        let mut tracker = FenceTracker::new();
        tracker.observe("```");
        tracker.observe("```js");
        assert!(tracker.in_fence());
    }

    #[test]
    fn inline_code_run_is_not_a_fence() {
        assert_eq!(code_lines("``` a ` b\n---"), vec![false, false]);
    }
}
