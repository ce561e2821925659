/// Labeled evaluation data loading.
///
/// The training CSV maps queries to relevant assessment URLs, one row per
/// (query, url) pair. Column headers vary between exports: the query column is
/// `query` (with `csvquery` as a known alias) and the URL column is
/// `Assessment_url`. Headers are trimmed before matching.
use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context};

/// One evaluation query with its labeled relevant URLs.
#[derive(Debug, Clone)]
pub struct LabeledQuery {
    pub query: String,
    pub relevant_urls: Vec<String>,
}

const QUERY_COLUMNS: &[&str] = &["query", "csvquery"];
const URL_COLUMN: &str = "Assessment_url";

/// Load and group the labeled CSV. Non-UTF-8 bytes are replaced rather than
/// rejected; some exports of this data are latin-1 encoded.
pub fn load_labeled_csv(path: &Path) -> anyhow::Result<Vec<LabeledQuery>> {
    let raw = std::fs::read(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let content = String::from_utf8_lossy(&raw);
    parse_labeled_csv(&content)
        .with_context(|| format!("failed to parse {}", path.display()))
}

/// Parse CSV content, grouping relevant URLs per query in first-seen order.
pub fn parse_labeled_csv(content: &str) -> anyhow::Result<Vec<LabeledQuery>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers().context("missing CSV headers")?.clone();
    let query_idx = headers
        .iter()
        .position(|h| QUERY_COLUMNS.contains(&h))
        .with_context(|| format!("CSV must contain a query column (one of: {})", QUERY_COLUMNS.join(", ")))?;
    let url_idx = headers
        .iter()
        .position(|h| h == URL_COLUMN)
        .with_context(|| format!("CSV must contain '{URL_COLUMN}' column"))?;

    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<String>> = HashMap::new();

    for (row_idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("invalid CSV record at row {}", row_idx + 2))?;
        let query = record.get(query_idx).unwrap_or("").trim();
        let url = record.get(url_idx).unwrap_or("").trim();
        if query.is_empty() || url.is_empty() {
            continue;
        }

        let urls = groups.entry(query.to_string()).or_insert_with(|| {
            order.push(query.to_string());
            Vec::new()
        });
        urls.push(url.to_string());
    }

    if order.is_empty() {
        bail!("no labeled queries found in CSV");
    }

    Ok(order
        .into_iter()
        .map(|query| {
            let relevant_urls = groups.remove(&query).unwrap_or_default();
            LabeledQuery {
                query,
                relevant_urls,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_urls_per_query_in_first_seen_order() {
        let csv = "query,Assessment_url\n\
                   Java developer,https://example.com/a\n\
                   Python developer,https://example.com/b\n\
                   Java developer,https://example.com/c\n";
        let labeled = parse_labeled_csv(csv).unwrap();
        assert_eq!(labeled.len(), 2);
        assert_eq!(labeled[0].query, "Java developer");
        assert_eq!(
            labeled[0].relevant_urls,
            ["https://example.com/a", "https://example.com/c"]
        );
        assert_eq!(labeled[1].query, "Python developer");
    }

    #[test]
    fn accepts_csvquery_column_alias() {
        let csv = "csvquery,Assessment_url\nSales manager,https://example.com/s\n";
        let labeled = parse_labeled_csv(csv).unwrap();
        assert_eq!(labeled[0].query, "Sales manager");
    }

    #[test]
    fn trims_padded_headers_and_fields() {
        let csv = " query , Assessment_url \nAnalyst , https://example.com/x \n";
        let labeled = parse_labeled_csv(csv).unwrap();
        assert_eq!(labeled[0].query, "Analyst");
        assert_eq!(labeled[0].relevant_urls, ["https://example.com/x"]);
    }

    #[test]
    fn missing_url_column_is_an_error() {
        let csv = "query,other\nJava developer,x\n";
        let err = parse_labeled_csv(csv).unwrap_err();
        assert!(err.to_string().contains("Assessment_url"));
    }

    #[test]
    fn rows_with_blank_fields_are_skipped() {
        let csv = "query,Assessment_url\n,https://example.com/a\nAnalyst,\nAnalyst,https://example.com/b\n";
        let labeled = parse_labeled_csv(csv).unwrap();
        assert_eq!(labeled.len(), 1);
        assert_eq!(labeled[0].relevant_urls, ["https://example.com/b"]);
    }
}
