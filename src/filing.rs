use anyhow::Result;
use quick_xml::events::Event;
use tracing::{error, warn};

use crate::client::BseClient;
use crate::links::{repair_link, BSE_BASE};
use crate::resolve::Extraction;

// Field paths tried in order; the schema has drifted across filing
// versions, so namespaced and bare spellings both stay in the lists.
const ATTACHMENT_FIELDS: &[&str] = &["in-bse-co:AttachmentURL", "AttachmentURL"];

const CATEGORY_FIELDS: &[&str] = &[
    "in-bse-co:CategoryOfAnnouncement",
    "in-bse-co:TypeOfAnnouncement",
    "CategoryOfAnnouncement",
    "TypeOfAnnouncement",
    "xbrl:CategoryOfAnnouncement",
    "bse-coi:CategoryName",
    "AnnouncementType",
];

const SUBCATEGORY_FIELDS: &[&str] = &[
    "in-bse-co:SubjectOfAnnouncement",
    "in-bse-co:SubCategoryOfAnnouncement",
    "SubjectOfAnnouncement",
    "SubCategoryOfAnnouncement",
    "xbrl:SubCategoryOfAnnouncement",
    "bse-coi:SubCategoryName",
    "in-bse-co:AcquisitionDetails",
    "AcquisitionOrDisposalAnnouncement",
];

pub fn filing_url(filing_id: &str) -> String {
    format!("{}/xml-data/corpfiling/AttachLive/{}.xml", BSE_BASE, filing_id)
}

/// Fetch and parse the structured filing for one identifier. Transport
/// and parse failures are logged and yield an all-absent result.
pub async fn parse_filing(client: &BseClient, filing_id: &str) -> Extraction {
    let fetched = match client.get(&filing_url(filing_id)).await {
        Ok(f) => f,
        Err(e) => {
            warn!("Failed to fetch filing {}: {}", filing_id, e);
            return Extraction::default();
        }
    };
    if !fetched.status.is_success() {
        warn!("Failed to fetch filing {}: status {}", filing_id, fetched.status);
        return Extraction::default();
    }

    match extract_from_xml(&fetched.body) {
        Ok(extraction) => extraction,
        Err(e) => {
            error!("Filing {} did not parse: {}", filing_id, e);
            Extraction::default()
        }
    }
}

/// Pure document inspection: collect element texts, then walk each
/// field-path list until one yields non-empty text. The three extractions
/// are independent.
pub fn extract_from_xml(xml: &str) -> Result<Extraction> {
    let fields = collect_element_texts(xml)?;

    let doc_link = repair_link(first_field(&fields, ATTACHMENT_FIELDS).unwrap_or(""));
    let category = first_field(&fields, CATEGORY_FIELDS).map(String::from);
    let subcategory =
        first_field(&fields, SUBCATEGORY_FIELDS).map(subject_to_subcategory);

    Ok(Extraction {
        doc_link: Some(doc_link),
        category,
        subcategory,
    })
}

/// Subject texts often read "Regulation 30 (LODR) - <label>"; the label
/// after the hyphen is the subcategory. Anything else passes through.
fn subject_to_subcategory(text: &str) -> String {
    if let Some((before, after)) = text.split_once('-') {
        if before.contains("Regulation") || before.contains("LODR") {
            return after.trim().to_string();
        }
    }
    text.to_string()
}

fn collect_element_texts(xml: &str) -> Result<Vec<(String, String)>> {
    let mut reader = quick_xml::Reader::from_reader(xml.as_bytes());
    let mut fields = Vec::new();
    let mut current: Option<String> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                current = Some(String::from_utf8_lossy(e.name().as_ref()).into_owned());
            }
            Ok(Event::Text(e)) => {
                if let Some(name) = &current {
                    let text = e.unescape()?.trim().to_string();
                    if !text.is_empty() {
                        fields.push((name.clone(), text));
                    }
                }
            }
            Ok(Event::End(_)) => current = None,
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }

    Ok(fields)
}

/// First listed field name carrying non-empty text.
fn first_field<'a>(fields: &'a [(String, String)], names: &[&str]) -> Option<&'a str> {
    names
        .iter()
        .find_map(|name| fields.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str()))
}
