use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use tracing::info;

use crate::client::BseClient;

const ANN_API_URL: &str = "https://api.bseindia.com/BseIndiaAPI/api/AnnGetData/w";

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"];

/// One exchange-reported disclosure event, as listed by the announcement
/// API. Immutable once fetched.
#[derive(Debug, Clone, Deserialize)]
pub struct Announcement {
    #[serde(rename = "NEWSID", default)]
    pub news_id: Option<String>,
    #[serde(rename = "SCRIP_CD", default, deserialize_with = "string_or_number")]
    pub scrip_cd: Option<String>,
    #[serde(rename = "SSHORTNAME", default)]
    pub short_name: Option<String>,
    #[serde(rename = "SLONGNAME", default)]
    pub long_name: Option<String>,
    #[serde(rename = "HEADLINE", default)]
    pub headline: Option<String>,
    #[serde(rename = "NEWSSUB", default)]
    pub news_sub: Option<String>,
    #[serde(rename = "NEWS_DT", default)]
    pub news_dt: Option<String>,
}

impl Announcement {
    pub fn id(&self) -> &str {
        self.news_id.as_deref().unwrap_or("").trim()
    }

    pub fn stock_code(&self) -> String {
        self.scrip_cd.as_deref().unwrap_or("").trim().to_string()
    }

    /// Long name, falling back to the short name.
    pub fn stock_name(&self) -> String {
        for candidate in [&self.long_name, &self.short_name] {
            if let Some(name) = candidate.as_deref() {
                let name = name.trim();
                if !name.is_empty() {
                    return name.to_string();
                }
            }
        }
        String::new()
    }

    /// Headline text, falling back to the subject line.
    pub fn headline(&self) -> String {
        for candidate in [&self.headline, &self.news_sub] {
            if let Some(text) = candidate.as_deref() {
                let text = text.trim();
                if !text.is_empty() {
                    return text.to_string();
                }
            }
        }
        "No headline".to_string()
    }

    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        let raw = self.news_dt.as_deref()?.trim();
        DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    }

    /// Disclosure date for output rows; empty when the timestamp is
    /// absent or unparseable.
    pub fn date_field(&self) -> String {
        self.timestamp()
            .map(|dt| dt.format("%d/%m/%y").to_string())
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct AnnouncementsResponse {
    #[serde(rename = "Table", default, deserialize_with = "one_or_many")]
    table: Vec<Announcement>,
}

/// Fetch the announcement list for a date and keep rows actually dated
/// that day with a usable identifier. This is the only call whose failure
/// aborts the run.
pub async fn fetch_announcements(client: &BseClient, date: NaiveDate) -> Result<Vec<Announcement>> {
    let day = date.format("%Y%m%d");
    let url = format!(
        "{}?pageno=1&strCat=-1&strPrevDate={}&strScrip=&strSearch=P&strToDate={}&strType=C",
        ANN_API_URL, day, day
    );

    let fetched = client
        .get(&url)
        .await
        .context("Failed to fetch announcement list")?;
    if !fetched.status.is_success() {
        bail!("Announcement list returned status {}", fetched.status);
    }

    let response: AnnouncementsResponse =
        serde_json::from_str(&fetched.body).context("Announcement list did not parse")?;
    let total = response.table.len();

    let announcements: Vec<Announcement> = response
        .table
        .into_iter()
        .filter(|a| a.timestamp().map(|dt| dt.date()) == Some(date))
        .filter(|a| !a.id().is_empty())
        .collect();

    info!(
        "Announcements for {}: {} of {} listed",
        date,
        announcements.len(),
        total
    );
    Ok(announcements)
}

/// `SCRIP_CD` arrives as a number or a string depending on API mood.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Int(i) => i.to_string(),
        Raw::Float(f) => f.to_string(),
    }))
}

/// The API returns a single object instead of an array when the day has
/// exactly one announcement.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<Announcement>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Many(Vec<Announcement>),
        One(Box<Announcement>),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Many(v)) => v,
        Some(Raw::One(a)) => vec![*a],
        None => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_json(json: &str) -> Announcement {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn numeric_stock_code() {
        let a = from_json(r#"{"NEWSID":"n1","SCRIP_CD":500325}"#);
        assert_eq!(a.stock_code(), "500325");
    }

    #[test]
    fn string_stock_code() {
        let a = from_json(r#"{"NEWSID":"n1","SCRIP_CD":" 500325 "}"#);
        assert_eq!(a.stock_code(), "500325");
    }

    #[test]
    fn name_falls_back_to_short_name() {
        let a = from_json(r#"{"SSHORTNAME":"RELIANCE","SLONGNAME":""}"#);
        assert_eq!(a.stock_name(), "RELIANCE");
        let b = from_json(r#"{"SSHORTNAME":"RELIANCE","SLONGNAME":"Reliance Industries Ltd"}"#);
        assert_eq!(b.stock_name(), "Reliance Industries Ltd");
    }

    #[test]
    fn headline_falls_back_to_subject() {
        let a = from_json(r#"{"NEWSSUB":"Board Meeting Intimation"}"#);
        assert_eq!(a.headline(), "Board Meeting Intimation");
        let b = from_json(r#"{"HEADLINE":null,"NEWSSUB":null}"#);
        assert_eq!(b.headline(), "No headline");
    }

    #[test]
    fn timestamp_formats() {
        let a = from_json(r#"{"NEWS_DT":"2026-08-07T14:05:32.27"}"#);
        assert_eq!(a.date_field(), "07/08/26");
        let b = from_json(r#"{"NEWS_DT":"2026-08-07T14:05:32"}"#);
        assert_eq!(b.date_field(), "07/08/26");
        let c = from_json(r#"{"NEWS_DT":"garbage"}"#);
        assert_eq!(c.date_field(), "");
    }

    #[test]
    fn single_object_table() {
        let response: AnnouncementsResponse =
            serde_json::from_str(r#"{"Table":{"NEWSID":"n1"}}"#).unwrap();
        assert_eq!(response.table.len(), 1);
        assert_eq!(response.table[0].id(), "n1");
    }

    #[test]
    fn array_table() {
        let response: AnnouncementsResponse =
            serde_json::from_str(r#"{"Table":[{"NEWSID":"n1"},{"NEWSID":"n2"}]}"#).unwrap();
        assert_eq!(response.table.len(), 2);
    }

    #[test]
    fn missing_table() {
        let response: AnnouncementsResponse = serde_json::from_str("{}").unwrap();
        assert!(response.table.is_empty());
    }
}
