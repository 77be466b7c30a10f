use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::client::BseClient;
use crate::page::announcement_url;

// Detail pages that have a structured filing reference it by its storage
// filename under AttachLive/.
static FILING_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"AttachLive/([a-zA-Z0-9\-]+)\.xml").unwrap());

/// Locate the structured-filing identifier referenced by an announcement's
/// detail page. `None` when the fetch fails or no reference is present.
pub async fn resolve_filing_id(client: &BseClient, news_id: &str) -> Option<String> {
    let fetched = match client.get(&announcement_url(news_id)).await {
        Ok(f) => f,
        Err(e) => {
            warn!("Failed to fetch announcement page for {}: {}", news_id, e);
            return None;
        }
    };
    if !fetched.status.is_success() {
        warn!(
            "Failed to fetch announcement page for {}: status {}",
            news_id, fetched.status
        );
        return None;
    }

    find_filing_id(&fetched.body)
}

/// Scan raw markup for the filing filename pattern.
pub fn find_filing_id(body: &str) -> Option<String> {
    FILING_ID_RE.captures(body).map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_found_in_markup() {
        let body = r#"<a href="https://www.bseindia.com/xml-data/corpfiling/AttachLive/1a2b3c-4d5e.xml">XBRL</a>"#;
        assert_eq!(find_filing_id(body).as_deref(), Some("1a2b3c-4d5e"));
    }

    #[test]
    fn no_reference_yields_none() {
        assert_eq!(find_filing_id("<html><body>plain page</body></html>"), None);
    }

    #[test]
    fn first_reference_wins() {
        let body = "AttachLive/first.xml AttachLive/second.xml";
        assert_eq!(find_filing_id(body).as_deref(), Some("first"));
    }
}
