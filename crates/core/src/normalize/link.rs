//! Link validation and node-id extraction for Figma links.

use serde::{Deserialize, Serialize};

/// A validated link to a node inside a Figma file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FigmaLink {
    /// The link as written in the source.
    pub url: String,
    /// File key path segment.
    pub file_key: String,
    /// Node id in `12:34` form.
    pub node_id: String,
}

const FILE_KINDS: &[&str] = &["file", "design", "proto", "board", "slides"];

/// Returns true for `http://` and `https://` URLs.
pub fn is_remote_url(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Validates a Figma node link and extracts the file key and node id.
///
/// ```
/// use deckdown_core::normalize::link::parse_figma_link;
///
/// let link = parse_figma_link("https://www.figma.com/design/AbC123/Deck?node-id=12-34").unwrap();
/// assert_eq!(link.file_key, "AbC123");
/// assert_eq!(link.node_id, "12:34");
/// ```
pub fn parse_figma_link(url: &str) -> Option<FigmaLink> {
    let url = url.trim();
    let rest = strip_scheme(url)?;

    let (authority, after_host) = match rest.find('/') {
        Some(idx) => (&rest[..idx], &rest[idx + 1..]),
        None => return None,
    };
    if !is_figma_host(authority) {
        return None;
    }

    let (path, query) = match after_host.find('?') {
        Some(idx) => (&after_host[..idx], &after_host[idx + 1..]),
        None => return None,
    };
    let query = query.split('#').next().unwrap_or_default();

    let mut segments = path.split('/').filter(|s| !s.is_empty());
    let kind = segments.next()?;
    if !FILE_KINDS.contains(&kind) {
        return None;
    }
    let file_key = segments.next()?;
    if !file_key.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }

    let raw_node = query
        .split('&')
        .find_map(|pair| pair.strip_prefix("node-id="))?;
    let node_id = normalize_node_id(raw_node)?;

    Some(FigmaLink {
        url: url.to_string(),
        file_key: file_key.to_string(),
        node_id,
    })
}

fn strip_scheme(url: &str) -> Option<&str> {
    let lower = url.get(..8).map(str::to_ascii_lowercase).unwrap_or_default();
    if lower.starts_with("https://") {
        Some(&url[8..])
    } else if lower.starts_with("http://") {
        Some(&url[7..])
    } else {
        None
    }
}

fn is_figma_host(authority: &str) -> bool {
    let host = authority.to_ascii_lowercase();
    host == "figma.com" || host.ends_with(".figma.com")
}

/// Accepts `12-34`, `12:34` and `12%3A34`, returning `12:34`.
fn normalize_node_id(raw: &str) -> Option<String> {
    let decoded = raw.replace("%3A", ":").replace("%3a", ":");
    let (left, right) = decoded
        .split_once(':')
        .or_else(|| decoded.split_once('-'))?;
    let is_number = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if is_number(left) && is_number(right) {
        Some(format!("{left}:{right}"))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_all_node_id_spellings() {
        for node in ["1-2", "1:2", "1%3A2"] {
            let url = format!("https://figma.com/file/KEY9/Name?node-id={node}&t=abc");
            let link = parse_figma_link(&url).expect("valid link");
            assert_eq!(link.node_id, "1:2");
            assert_eq!(link.file_key, "KEY9");
        }
    }

    #[test]
    fn rejects_missing_node_id() {
        assert!(parse_figma_link("https://www.figma.com/design/KEY/Name").is_none());
        assert!(parse_figma_link("https://www.figma.com/design/KEY/Name?t=1").is_none());
    }

    #[test]
    fn rejects_foreign_hosts_and_paths() {
        assert!(parse_figma_link("https://example.com/design/KEY/N?node-id=1-2").is_none());
        assert!(parse_figma_link("https://notfigma.com/design/KEY/N?node-id=1-2").is_none());
        assert!(parse_figma_link("https://figma.com/community/KEY?node-id=1-2").is_none());
        assert!(parse_figma_link("ftp://figma.com/design/KEY?node-id=1-2").is_none());
    }

    #[test]
    fn detects_remote_urls() {
        assert!(is_remote_url("https://example.com/a.png"));
        assert!(is_remote_url("HTTP://example.com/a.png"));
        assert!(!is_remote_url("./images/a.png"));
    }
}
