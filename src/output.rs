use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// One CSV row per announcement, in input order.
#[derive(Debug, Serialize)]
pub struct OutputRow {
    #[serde(rename = "Stock Code")]
    pub stock_code: String,
    #[serde(rename = "Stock Name")]
    pub stock_name: String,
    #[serde(rename = "Headline")]
    pub headline: String,
    #[serde(rename = "Main Category")]
    pub category: String,
    #[serde(rename = "Subcategory")]
    pub subcategory: String,
    #[serde(rename = "PDF Link")]
    pub pdf_link: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "News ID")]
    pub news_id: String,
}

pub fn write_rows(path: &Path, rows: &[OutputRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_row_order() {
        let dir = std::env::temp_dir().join("bse_scraper_output_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("rows.csv");

        let rows = vec![OutputRow {
            stock_code: "500325".into(),
            stock_name: "Reliance Industries Ltd".into(),
            headline: "Board Meeting Intimation".into(),
            category: "Board Meeting".into(),
            subcategory: "General".into(),
            pdf_link: "https://www.bseindia.com/a.pdf".into(),
            date: "07/08/26".into(),
            news_id: "n1".into(),
        }];
        write_rows(&path, &rows).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let mut lines = written.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Stock Code,Stock Name,Headline,Main Category,Subcategory,PDF Link,Date,News ID"
        );
        assert!(lines.next().unwrap().starts_with("500325,Reliance Industries Ltd"));
        std::fs::remove_file(&path).ok();
    }
}
