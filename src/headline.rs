use std::sync::LazyLock;

use regex::Regex;

static LODR_ACQUISITION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:Regulation\s+30|LODR)[-\s]*Acquisition").unwrap());
static LODR_SEGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:Regulation\s+30|LODR).*?[-:]\s*(.*?)(?:\s*$|\s*\.)").unwrap()
});

/// Reject captures longer than this; they are prose, not a label.
const MAX_SEGMENT_LEN: usize = 30;

/// Last-resort subcategory extraction from the announcement headline.
/// Only regulation-anchored phrasings count; anything else is `None`.
pub fn extract_from_headline(headline: &str) -> Option<String> {
    if headline.trim().is_empty() {
        return None;
    }

    if LODR_ACQUISITION_RE.is_match(headline) {
        return Some("Acquisition".to_string());
    }

    if let Some(caps) = LODR_SEGMENT_RE.captures(headline) {
        let segment = caps[1].trim();
        if !segment.is_empty() && segment.len() < MAX_SEGMENT_LEN {
            return Some(segment.to_string());
        }
    }

    None
}
