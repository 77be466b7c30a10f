use crate::client::BseClient;
use crate::normalize::{self, DEFAULT_CATEGORY, DEFAULT_SUBCATEGORY};
use crate::{filing, filing_id, headline, page};

/// Partial result from a single source. `None` means the source was never
/// consulted or errored; an empty string means it responded but found
/// nothing. Merging produces a new value, never mutates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub doc_link: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
}

/// Final per-announcement outcome after merge, normalization and defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub doc_link: String,
    pub category: String,
    pub subcategory: String,
}

/// Resolve document link, category and subcategory for one announcement:
/// detail page first, then the structured filing when the page left gaps,
/// then the headline as a last resort for the subcategory.
pub async fn resolve(client: &BseClient, news_id: &str, headline_text: &str) -> Resolved {
    let mut extraction = page::parse_page(client, news_id).await;

    if needs_filing_pass(&extraction) {
        if let Some(filing_id) = filing_id::resolve_filing_id(client, news_id).await {
            let from_filing = filing::parse_filing(client, &filing_id).await;
            extraction = merge(extraction, from_filing);
        }
    }

    let mut resolved = finalize(extraction);
    apply_headline_fallback(&mut resolved, headline_text);
    resolved
}

/// When every other source left the subcategory at its default, the
/// headline gets one regulation-anchored attempt.
fn apply_headline_fallback(resolved: &mut Resolved, headline_text: &str) {
    if resolved.subcategory != DEFAULT_SUBCATEGORY {
        return;
    }
    if let Some(extracted) = headline::extract_from_headline(headline_text) {
        resolved.subcategory = normalize::normalize_subcategory(&extracted);
    }
}

/// The filing is consulted when any field is still missing or carries only
/// a generic placeholder.
pub fn needs_filing_pass(extraction: &Extraction) -> bool {
    !present(&extraction.doc_link)
        || !present(&extraction.category)
        || !present(&extraction.subcategory)
        || extraction.category.as_deref() == Some(DEFAULT_CATEGORY)
        || extraction.subcategory.as_deref() == Some(DEFAULT_SUBCATEGORY)
}

/// Merge filing-derived values into the page result. A page field survives
/// unless it is missing, empty, or a generic placeholder; specific page
/// values are never overwritten.
pub fn merge(page: Extraction, filing: Extraction) -> Extraction {
    let doc_link = if !present(&page.doc_link) && present(&filing.doc_link) {
        filing.doc_link
    } else {
        page.doc_link
    };

    let category_generic = page
        .category
        .as_deref()
        .map_or(true, |c| c.is_empty() || c == "Uncategorized" || c == DEFAULT_CATEGORY);
    let category = if category_generic && present(&filing.category) {
        filing.category
    } else {
        page.category
    };

    let subcategory_generic = page
        .subcategory
        .as_deref()
        .map_or(true, |s| s.is_empty() || s == DEFAULT_SUBCATEGORY);
    let subcategory = if subcategory_generic && present(&filing.subcategory) {
        filing.subcategory
    } else {
        page.subcategory
    };

    Extraction {
        doc_link,
        category,
        subcategory,
    }
}

/// Normalize whatever text was found and fill defaults for the rest.
pub fn finalize(extraction: Extraction) -> Resolved {
    let category = match extraction.category.as_deref().filter(|c| !c.trim().is_empty()) {
        Some(c) => normalize::normalize_category(c),
        None => DEFAULT_CATEGORY.to_string(),
    };
    let subcategory = match extraction
        .subcategory
        .as_deref()
        .filter(|s| !s.trim().is_empty())
    {
        Some(s) => normalize::normalize_subcategory(s),
        None => DEFAULT_SUBCATEGORY.to_string(),
    };

    Resolved {
        doc_link: extraction.doc_link.unwrap_or_default(),
        category,
        subcategory,
    }
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}
