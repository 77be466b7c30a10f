use std::sync::LazyLock;

use regex::Regex;

pub const DEFAULT_CATEGORY: &str = "General Announcement";
pub const DEFAULT_SUBCATEGORY: &str = "General";

/// Passthrough cutoff: unmapped text shorter than this (and at most four
/// words) is title-cased instead of collapsing to the default.
const PASSTHROUGH_MAX_LEN: usize = 30;
const PASSTHROUGH_MAX_WORDS: usize = 4;

static REG30_SEGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:Regulation\s+30|LODR)[^-]*-\s*(.*?)(?:\s*$|\s*\.)").unwrap()
});

/// Main-category rules, evaluated top to bottom; any keyword hit wins.
const CATEGORY_RULES: &[(&[&str], &str)] = &[
    (&["regulation 30", "lodr"], "Announcement under Regulation 30 (LODR)"),
    (&["general"], "General Announcement"),
    (&["board meeting"], "Board Meeting"),
    (&["financial result"], "Financial Results"),
    (&["agm", "annual general", "egm", "extraordinary"], "AGM/EGM"),
    (&["dividend"], "Dividend"),
    (&["investor", "presentation"], "Investor Presentation"),
];

/// Subcategory keyword table mirroring the exchange's own dropdown labels.
/// Order matters: the first key found as a substring wins.
const SUBCATEGORY_RULES: &[(&str, &str)] = &[
    ("acquisition", "Acquisition"),
    ("agreement", "Agreement"),
    ("allotment of equity", "Allotment of Equity Shares"),
    ("allotment of warrant", "Allotment of Warrants"),
    ("award of order", "Award of Order / Receipt of Order"),
    ("receipt of order", "Award of Order / Receipt of Order"),
    ("buy back", "Buy back"),
    ("change in director", "Change in Directorate"),
    ("change in registered", "Change in Registered Office"),
    ("clarification", "Clarification"),
    ("declaration of nav", "Declaration of NAV"),
    ("delisting", "Delisting"),
    ("fccb", "FCCBs"),
    ("joint venture", "Joint Venture"),
    ("open offer", "Open Offer"),
    ("press release", "Press Release / Media Release"),
    ("media release", "Press Release / Media Release"),
    ("sale of share", "Sale of shares"),
    ("strike", "Strike"),
    ("utilisation of fund", "Utilisation of Funds"),
    ("debt securit", "Debt Securities"),
    ("credit rating", "Credit Rating"),
    ("change of name", "Change of Name"),
    ("shareholding", "Shareholding"),
    ("investor meet", "Analyst / Investor Meet"),
    ("analyst", "Analyst / Investor Meet"),
    ("investor complaint", "Reg. 13(3) - Statement of Investor Complaints"),
    ("compliance certificate", "Reg. 7(3) – Compliance Certificate"),
    ("pcs certificate", "Reg. 40 (10) - PCS Certificate"),
    ("deviation", "Reg. 32 (1), (3) - Statement of Deviation & Variation"),
    ("clarification of news", "Clarification of News Item"),
    (
        "disclosure under clause",
        "Disclosure under Clause 35A of the Listing Agreement",
    ),
    ("nav declaration", "NAV Declaration"),
    ("appointment of director", "Appointment of Director"),
    ("appointment of chairman", "Appointment of Chairman"),
    ("appointment of managing director", "Appointment of Managing Director"),
    ("appointment of ceo", "Appointment of Chief Executive Officer (CEO)"),
    (
        "appointment of chief executive",
        "Appointment of Chief Executive Officer (CEO)",
    ),
    ("appointment of cfo", "Appointment of Chief Financial Officer (CFO)"),
    (
        "appointment of chief financial",
        "Appointment of Chief Financial Officer (CFO)",
    ),
    ("acquire", "Acquisition"),
    ("merger", "Acquisition"),
    ("purchase of", "Acquisition"),
    ("buying", "Acquisition"),
    ("acquired", "Acquisition"),
    ("lodr-acquisition", "Acquisition"),
    ("regulation 30-acquisition", "Acquisition"),
];

/// Looser acquisition synonyms, checked only after the table misses.
const ACQUISITION_HINTS: &[&str] = &["acquisition", "acquire", "merger", "take over", "buyout"];

/// Map arbitrary category text to one of the canonical main categories.
/// Total: unmapped text falls back to a title-cased passthrough, empty
/// input to the default.
pub fn normalize_category(text: &str) -> String {
    let lower = text.trim().to_lowercase();
    if lower.is_empty() {
        return DEFAULT_CATEGORY.to_string();
    }

    for (keys, label) in CATEGORY_RULES {
        if keys.iter().any(|k| lower.contains(k)) {
            return (*label).to_string();
        }
    }

    title_case(&lower)
}

/// Map arbitrary subcategory text to a canonical subcategory label.
///
/// Resolution order: keyword table, acquisition synonyms, the segment
/// after the hyphen in a Regulation 30 / LODR reference (normalized
/// recursively), short-text passthrough, then the default. Total and
/// deterministic for every input.
pub fn normalize_subcategory(text: &str) -> String {
    let lower = text.trim().to_lowercase();
    if lower.is_empty() {
        return DEFAULT_SUBCATEGORY.to_string();
    }

    for (key, label) in SUBCATEGORY_RULES {
        if lower.contains(key) {
            return (*label).to_string();
        }
    }

    if ACQUISITION_HINTS.iter().any(|k| lower.contains(k)) {
        return "Acquisition".to_string();
    }

    // "Regulation 30 ... - <subject>" carries the real label after the
    // hyphen; recursion terminates because the segment is strictly shorter.
    if lower.contains("regulation 30") || lower.contains("lodr") {
        if let Some(caps) = REG30_SEGMENT_RE.captures(&lower) {
            return normalize_subcategory(caps[1].trim());
        }
    }

    if lower.len() < PASSTHROUGH_MAX_LEN
        && lower.split_whitespace().count() <= PASSTHROUGH_MAX_WORDS
    {
        return title_case(&lower);
    }

    DEFAULT_SUBCATEGORY.to_string()
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}
