use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use crate::client::BseClient;
use crate::links::{repair_link, BSE_BASE};
use crate::resolve::Extraction;

static ANCHOR_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());
static HIDDEN_INPUT_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"input[type="hidden"]"#).unwrap());
static SELECT_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("select").unwrap());
static SELECTED_OPTION_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("option[selected]").unwrap());

// Label markup has drifted across site revisions; every known id scheme
// stays in the list.
static CATEGORY_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [
        r#"span[id*="lblCat"]"#,
        r#"span[id*="Category"]"#,
        ".announcement-category",
        "#ctl00_ContentPlaceHolder1_lblCategory",
    ]
    .iter()
    .map(|s| Selector::parse(s).unwrap())
    .collect()
});

static SUBCATEGORY_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [
        r#"span[id*="SubCat"]"#,
        r#"span[id*="SubCategory"]"#,
        ".announcement-subcategory",
        "#ctl00_ContentPlaceHolder1_lblSubCategory",
        r#"select[id*="ddlSubCategory"] option[selected]"#,
    ]
    .iter()
    .map(|s| Selector::parse(s).unwrap())
    .collect()
});

static SUBCATEGORY_TEXT_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"Sub[- ]?[Cc]ategory\s*:\s*([^\n]+)",
        r"Subject\s*:\s*([^\n]+)",
        r"Type\s*:\s*([^\n]+)",
        r"Acquisition\s*:\s*([^\n]+)",
        r"Regulation\s+30.*?-\s*(.*?)(?:\s*$|\s*\.)",
        r"LODR.*?-\s*(.*?)(?:\s*$|\s*\.)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

pub fn announcement_url(news_id: &str) -> String {
    format!("{}/corporates/anndet_new.aspx?newsid={}", BSE_BASE, news_id)
}

/// Fetch and parse the rendered detail page for one announcement.
/// Transport failures and non-success statuses yield an all-absent result.
pub async fn parse_page(client: &BseClient, news_id: &str) -> Extraction {
    let fetched = match client.get(&announcement_url(news_id)).await {
        Ok(f) => f,
        Err(e) => {
            warn!("Failed to fetch announcement page for {}: {}", news_id, e);
            return Extraction::default();
        }
    };
    if !fetched.status.is_success() {
        warn!(
            "Failed to fetch announcement page for {}: status {}",
            news_id, fetched.status
        );
        return Extraction::default();
    }

    extract_from_html(&fetched.body)
}

/// Pure markup inspection. Per-field fallback order: hidden inputs,
/// selection controls, labeled regions, visible-text regex (subcategory
/// only). The first non-empty value wins at each step.
pub fn extract_from_html(html: &str) -> Extraction {
    let doc = Html::parse_document(html);

    let doc_link = document_link(&doc).unwrap_or_default();
    let (hidden_category, hidden_subcategory) = hidden_field_values(&doc);

    let category = hidden_category.or_else(|| labeled_text(&doc, &CATEGORY_SELECTORS));

    let subcategory = hidden_subcategory
        .or_else(|| selected_dropdown_text(&doc))
        .or_else(|| labeled_text(&doc, &SUBCATEGORY_SELECTORS))
        .or_else(|| subcategory_from_visible_text(&doc));

    Extraction {
        doc_link: Some(doc_link),
        category,
        subcategory,
    }
}

/// First hyperlink pointing at a PDF, repaired to an absolute URL.
fn document_link(doc: &Html) -> Option<String> {
    doc.select(&ANCHOR_SEL)
        .filter_map(|a| a.value().attr("href"))
        .find(|href| href.to_lowercase().contains(".pdf"))
        .map(repair_link)
}

fn hidden_field_values(doc: &Html) -> (Option<String>, Option<String>) {
    let mut category = None;
    let mut subcategory = None;

    for field in doc.select(&HIDDEN_INPUT_SEL) {
        let name = field.value().attr("name").unwrap_or("").to_lowercase();
        let value = field.value().attr("value").unwrap_or("").trim();
        if value.is_empty() {
            continue;
        }
        if name.contains("category") && !name.contains("sub") {
            category = Some(value.to_string());
        } else if name.contains("subcategory")
            || (name.contains("category") && name.contains("sub"))
        {
            subcategory = Some(value.to_string());
        }
    }

    (category, subcategory)
}

/// Currently-selected option of a subcategory dropdown; falls back to any
/// select whose markup mentions "category".
fn selected_dropdown_text(doc: &Html) -> Option<String> {
    for select in doc.select(&SELECT_SEL) {
        let id = select.value().attr("id").unwrap_or("").to_lowercase();
        if !id.contains("subcategory") {
            continue;
        }
        if let Some(text) = selected_option_text(select) {
            return Some(text);
        }
    }

    for select in doc.select(&SELECT_SEL) {
        if !select.html().to_lowercase().contains("category") {
            continue;
        }
        if let Some(text) = selected_option_text(select) {
            return Some(text);
        }
    }

    None
}

fn selected_option_text(select: ElementRef) -> Option<String> {
    let option = select.select(&SELECTED_OPTION_SEL).next()?;
    let text = option.text().collect::<String>().trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn labeled_text(doc: &Html, selectors: &[Selector]) -> Option<String> {
    for selector in selectors {
        for element in doc.select(selector) {
            let text = element.text().collect::<String>().trim().to_string();
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

fn subcategory_from_visible_text(doc: &Html) -> Option<String> {
    let text: String = doc.root_element().text().collect();
    for re in SUBCATEGORY_TEXT_RES.iter() {
        if let Some(caps) = re.captures(&text) {
            let found = caps[1].trim();
            if !found.is_empty() {
                return Some(found.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_page() {
        let extraction = extract_from_html("");
        assert_eq!(extraction.doc_link.as_deref(), Some(""));
        assert_eq!(extraction.category, None);
        assert_eq!(extraction.subcategory, None);
    }

    #[test]
    fn pdf_link_repaired() {
        let html = r#"<html><body>
            <a href="/corporates/ann/doc123.pdf">Attachment</a>
        </body></html>"#;
        let extraction = extract_from_html(html);
        assert_eq!(
            extraction.doc_link.as_deref(),
            Some("https://www.bseindia.com/corporates/ann/doc123.pdf")
        );
    }

    #[test]
    fn first_pdf_link_wins() {
        let html = r#"<a href="/page.aspx">Home</a>
            <a href="/a/first.PDF">one</a>
            <a href="/a/second.pdf">two</a>"#;
        let extraction = extract_from_html(html);
        assert_eq!(
            extraction.doc_link.as_deref(),
            Some("https://www.bseindia.com/a/first.PDF")
        );
    }

    #[test]
    fn hidden_fields() {
        let html = r#"<form>
            <input type="hidden" name="ctl00$hdnCategory" value="Board Meeting" />
            <input type="hidden" name="ctl00$hdnSubCategory" value="Acquisition" />
            <input type="hidden" name="__VIEWSTATE" value="xyz" />
        </form>"#;
        let extraction = extract_from_html(html);
        assert_eq!(extraction.category.as_deref(), Some("Board Meeting"));
        assert_eq!(extraction.subcategory.as_deref(), Some("Acquisition"));
    }

    #[test]
    fn empty_hidden_values_skipped() {
        let html = r#"<input type="hidden" name="hdnCategory" value="" />"#;
        let extraction = extract_from_html(html);
        assert_eq!(extraction.category, None);
    }

    #[test]
    fn dropdown_selected_option() {
        let html = r#"<select id="ctl00_ddlSubcategory">
            <option>Agreement</option>
            <option selected="selected">Open Offer</option>
        </select>"#;
        let extraction = extract_from_html(html);
        assert_eq!(extraction.subcategory.as_deref(), Some("Open Offer"));
    }

    #[test]
    fn category_dropdown_fallback() {
        // No subcategory id; matched because the markup mentions "category".
        let html = r#"<select id="ddlSomething" name="category_pick">
            <option selected="selected">Delisting</option>
        </select>"#;
        let extraction = extract_from_html(html);
        assert_eq!(extraction.subcategory.as_deref(), Some("Delisting"));
    }

    #[test]
    fn labeled_spans() {
        let html = r#"
            <span id="ctl00_ContentPlaceHolder1_lblCategory">AGM/EGM</span>
            <span id="ctl00_SubCat_lbl">Agreement</span>
        "#;
        let extraction = extract_from_html(html);
        assert_eq!(extraction.category.as_deref(), Some("AGM/EGM"));
        assert_eq!(extraction.subcategory.as_deref(), Some("Agreement"));
    }

    #[test]
    fn hidden_field_beats_labeled_span() {
        let html = r#"
            <input type="hidden" name="hdnCategory" value="Board Meeting" />
            <span id="lblCategory">Dividend</span>
        "#;
        let extraction = extract_from_html(html);
        assert_eq!(extraction.category.as_deref(), Some("Board Meeting"));
    }

    #[test]
    fn subcategory_regex_fallback() {
        let html = "<div><p>Subject: Allotment of Warrants</p></div>";
        let extraction = extract_from_html(html);
        assert_eq!(extraction.subcategory.as_deref(), Some("Allotment of Warrants"));
    }

    #[test]
    fn subcategory_regulation_text_fallback() {
        let html = "<p>Disclosure under Regulation 30 of SEBI LODR - Joint Venture.</p>";
        let extraction = extract_from_html(html);
        assert_eq!(extraction.subcategory.as_deref(), Some("Joint Venture"));
    }
}
