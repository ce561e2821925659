/// Catalog loading and normalization.
///
/// The scraped catalog is a JSON array of assessment records with no guaranteed
/// schema beyond `name` and `url`. Loading dedupes by URL (the unique key) and
/// cleans up the fields the scraper fills on a best-effort basis: untyped
/// records get a keyword-classified test type, and free-text durations are
/// reduced to the first "NN minutes/hours" match.
use std::collections::HashSet;
use std::path::Path;

use regex::Regex;
use tracing::{info, warn};

use crate::error::CoreError;
use crate::model::{Assessment, TestType};

/// Load and normalize the assessment catalog from a JSON file.
///
/// Fails if the file is missing or not a JSON array; individual records only
/// need `name` and `url`, everything else is defaulted.
pub fn load_catalog(path: &Path) -> Result<Vec<Assessment>, CoreError> {
    if !path.exists() {
        return Err(CoreError::Catalog(format!(
            "catalog file not found: {} (run the scraper export first)",
            path.display()
        )));
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| CoreError::Catalog(format!("failed to read {}: {e}", path.display())))?;
    let assessments: Vec<Assessment> = serde_json::from_str(&raw)
        .map_err(|e| CoreError::Catalog(format!("invalid catalog JSON in {}: {e}", path.display())))?;

    let normalized = normalize_catalog(assessments);
    info!(count = normalized.len(), path = %path.display(), "catalog loaded");
    Ok(normalized)
}

/// Dedupe by URL (first record wins) and normalize each record.
pub fn normalize_catalog(assessments: Vec<Assessment>) -> Vec<Assessment> {
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(assessments.len());

    for mut a in assessments {
        a.name = a.name.trim().to_string();
        a.url = a.url.trim().to_string();
        if a.url.is_empty() {
            warn!(name = %a.name, "skipping assessment without url");
            continue;
        }
        if !seen_urls.insert(a.url.clone()) {
            warn!(url = %a.url, "duplicate assessment url, keeping first");
            continue;
        }

        if a.name.is_empty() {
            a.name = "Unknown Assessment".to_string();
        }
        a.description = a.description.trim().to_string();
        if a.test_type == TestType::Other {
            a.test_type = classify_test_type(&format!("{} {}", a.name, a.description));
        }
        a.duration = extract_duration(&a.duration);
        out.push(a);
    }

    out
}

/// Classify an untyped assessment from its name and description.
///
/// Same keyword heuristics the scraper applies to raw page text; checked in
/// order, first family that matches wins.
pub fn classify_test_type(text: &str) -> TestType {
    let text = text.to_lowercase();
    const PERSONALITY: &[&str] = &["personality", "behavior", "behaviour", "trait", "opq"];
    const COGNITIVE: &[&str] = &["cognitive", "ability", "reasoning", "numerical", "verbal"];
    const KNOWLEDGE: &[&str] = &["knowledge", "skill", "technical", "coding", "programming"];
    const SITUATIONAL: &[&str] = &["situational", "judgment", "judgement", "sjt"];

    if PERSONALITY.iter().any(|w| text.contains(w)) {
        TestType::Personality
    } else if COGNITIVE.iter().any(|w| text.contains(w)) {
        TestType::Cognitive
    } else if KNOWLEDGE.iter().any(|w| text.contains(w)) {
        TestType::Knowledge
    } else if SITUATIONAL.iter().any(|w| text.contains(w)) {
        TestType::Situational
    } else {
        TestType::Other
    }
}

/// Reduce a free-text duration to its first "NN minutes/hours" match, or "N/A".
pub fn extract_duration(raw: &str) -> String {
    let re = Regex::new(r"(?i)(\d+)\s*(minute|min|hour|hr)s?").expect("valid regex");
    re.find(raw)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Compose the text blob that gets embedded for one assessment.
///
/// Pipe-joined labeled parts, in a fixed order, skipping absent fields. This
/// exact composition is what the catalog embeddings are built from, so any
/// change here requires a re-ingest.
pub fn compose_document_text(a: &Assessment) -> String {
    let mut parts = Vec::new();

    if !a.name.is_empty() {
        parts.push(format!("Assessment: {}", a.name));
    }
    if !a.description.is_empty() {
        parts.push(format!("Description: {}", a.description));
    }
    parts.push(format!("Type: {}", a.test_type.label()));
    if !a.category.is_empty() {
        parts.push(format!("Category: {}", a.category));
    }
    if !a.skills.is_empty() {
        parts.push(format!("Skills: {}", a.skills.join(", ")));
    }
    parts.push(format!("Level: {}", a.level.as_str()));
    if a.duration != "N/A" && !a.duration.is_empty() {
        parts.push(format!("Duration: {}", a.duration));
    }

    parts.join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Level;

    fn assessment(name: &str, url: &str) -> Assessment {
        Assessment {
            name: name.to_string(),
            url: url.to_string(),
            description: String::new(),
            test_type: TestType::Other,
            category: "General".to_string(),
            skills: Vec::new(),
            duration: "N/A".to_string(),
            level: Level::All,
        }
    }

    #[test]
    fn document_text_includes_fields_in_order() {
        let mut a = assessment("Java 8 (New)", "https://example.com/java-8");
        a.description = "Multi-choice test for Java 8".to_string();
        a.test_type = TestType::Knowledge;
        a.category = "Technology".to_string();
        a.skills = vec!["java".to_string(), "programming".to_string()];
        a.duration = "30 minutes".to_string();
        a.level = Level::Mid;

        let text = compose_document_text(&a);
        assert_eq!(
            text,
            "Assessment: Java 8 (New) | Description: Multi-choice test for Java 8 | \
             Type: Knowledge and Skills Assessment | Category: Technology | \
             Skills: java, programming | Level: Mid-Level | Duration: 30 minutes"
        );
    }

    #[test]
    fn document_text_skips_absent_fields() {
        let a = assessment("Verify G+", "https://example.com/verify-g");
        let text = compose_document_text(&a);
        assert_eq!(
            text,
            "Assessment: Verify G+ | Type: General Assessment | Category: General | Level: All Levels"
        );
        assert!(!text.contains("Duration"));
        assert!(!text.contains("Skills"));
    }

    #[test]
    fn normalize_dedupes_by_url_keeping_first() {
        let first = assessment("First", "https://example.com/a");
        let dup = assessment("Second", "https://example.com/a");
        let other = assessment("Third", "https://example.com/b");

        let out = normalize_catalog(vec![first, dup, other]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].name, "First");
        assert_eq!(out[1].url, "https://example.com/b");
    }

    #[test]
    fn normalize_drops_records_without_url() {
        let mut a = assessment("No url", "");
        a.url = "   ".to_string();
        let out = normalize_catalog(vec![a]);
        assert!(out.is_empty());
    }

    #[test]
    fn classify_matches_keyword_families() {
        assert_eq!(classify_test_type("OPQ personality questionnaire"), TestType::Personality);
        assert_eq!(classify_test_type("numerical reasoning for graduates"), TestType::Cognitive);
        assert_eq!(classify_test_type("coding challenge in Python"), TestType::Knowledge);
        assert_eq!(classify_test_type("situational judgment scenarios"), TestType::Situational);
        assert_eq!(classify_test_type("something else entirely"), TestType::Other);
    }

    #[test]
    fn classification_runs_only_for_untyped_records() {
        let mut a = assessment("Workplace Personality Inventory", "https://example.com/wpi");
        a.test_type = TestType::Knowledge;
        let out = normalize_catalog(vec![a]);
        assert_eq!(out[0].test_type, TestType::Knowledge);
    }

    #[test]
    fn duration_extraction() {
        assert_eq!(extract_duration("Approximate completion time: 30 minutes"), "30 minutes");
        assert_eq!(extract_duration("45 min"), "45 min");
        assert_eq!(extract_duration("1 hour untimed"), "1 hour");
        assert_eq!(extract_duration("untimed"), "N/A");
        assert_eq!(extract_duration("N/A"), "N/A");
    }
}
