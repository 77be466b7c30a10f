use std::sync::LazyLock;

use regex::Regex;

pub const BSE_BASE: &str = "https://www.bseindia.com";
const BSE_HOST: &str = "bseindia.com";

static DOUBLED_HOST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"bseindia\.com.*?bseindia\.com(.+)").unwrap());

/// Normalize a raw attachment link into a single absolute URL.
///
/// Filing attachment URLs sometimes arrive with the site base prepended
/// twice; detail pages hand out bare relative paths. Idempotent on
/// well-formed input.
pub fn repair_link(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    if raw.matches(BSE_HOST).count() > 1 {
        if let Some(caps) = DOUBLED_HOST_RE.captures(raw) {
            return format!("{}{}", BSE_BASE, &caps[1]);
        }
    }

    if !raw.starts_with("http://") && !raw.starts_with("https://") {
        return if raw.starts_with('/') {
            format!("{}{}", BSE_BASE, raw)
        } else {
            format!("{}/{}", BSE_BASE, raw)
        };
    }

    raw.to_string()
}
