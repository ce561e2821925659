use serde::{Deserialize, Serialize};

/// A single SHL assessment product from the scraped catalog.
///
/// `url` uniquely identifies an assessment; every other field is optional in
/// the source JSON and defaults to a placeholder. Records are created by the
/// catalog scrape, consumed read-only here; re-ingestion fully replaces the
/// vector collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub test_type: TestType,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default = "default_duration")]
    pub duration: String,
    #[serde(default)]
    pub level: Level,
}

fn default_category() -> String {
    "General".to_string()
}

fn default_duration() -> String {
    "N/A".to_string()
}

/// Assessment test type, stored as a single-letter code in the catalog JSON.
/// Unknown codes deserialize as `Other` rather than failing the whole catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum TestType {
    #[serde(rename = "K")]
    Knowledge,
    #[serde(rename = "P")]
    Personality,
    #[serde(rename = "C")]
    Cognitive,
    #[serde(rename = "S")]
    Situational,
    #[serde(rename = "O")]
    Other,
}

impl From<String> for TestType {
    fn from(code: String) -> Self {
        TestType::from_code(code.trim())
    }
}

impl Default for TestType {
    fn default() -> Self {
        TestType::Other
    }
}

impl TestType {
    /// The single-letter catalog code.
    pub fn code(self) -> &'static str {
        match self {
            TestType::Knowledge => "K",
            TestType::Personality => "P",
            TestType::Cognitive => "C",
            TestType::Situational => "S",
            TestType::Other => "O",
        }
    }

    /// Human-readable label used in embedding documents and rerank prompts.
    pub fn label(self) -> &'static str {
        match self {
            TestType::Knowledge => "Knowledge and Skills Assessment",
            TestType::Personality => "Personality and Behavior Assessment",
            TestType::Cognitive => "Cognitive Ability Assessment",
            TestType::Situational => "Situational Judgment Test",
            TestType::Other => "General Assessment",
        }
    }

    pub fn from_code(code: &str) -> Self {
        match code {
            "K" => TestType::Knowledge,
            "P" => TestType::Personality,
            "C" => TestType::Cognitive,
            "S" => TestType::Situational,
            _ => TestType::Other,
        }
    }
}

/// Target job level for an assessment. The scraped data is free text, so
/// parsing is lenient and anything unrecognized maps to `All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Level {
    #[serde(rename = "Entry-Level")]
    Entry,
    #[serde(rename = "Mid-Level")]
    Mid,
    #[serde(rename = "Senior")]
    Senior,
    #[serde(rename = "All Levels")]
    All,
}

impl From<String> for Level {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "entry-level" | "entry" | "entry level" => Level::Entry,
            "mid-level" | "mid" | "mid level" => Level::Mid,
            "senior" => Level::Senior,
            _ => Level::All,
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::All
    }
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Entry => "Entry-Level",
            Level::Mid => "Mid-Level",
            Level::Senior => "Senior",
            Level::All => "All Levels",
        }
    }
}

/// A single ranked recommendation returned by the service.
///
/// Ephemeral: produced per request (and cached briefly), never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub assessment_name: String,
    pub url: String,
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assessment_defaults_fill_missing_fields() {
        let json = r#"{"name": "Java 8 (New)", "url": "https://example.com/java-8"}"#;
        let a: Assessment = serde_json::from_str(json).unwrap();
        assert_eq!(a.test_type, TestType::Other);
        assert_eq!(a.category, "General");
        assert_eq!(a.duration, "N/A");
        assert_eq!(a.level, Level::All);
        assert!(a.skills.is_empty());
        assert!(a.description.is_empty());
    }

    #[test]
    fn test_type_parses_catalog_codes() {
        let json = r#"{"name": "OPQ", "url": "u", "test_type": "P"}"#;
        let a: Assessment = serde_json::from_str(json).unwrap();
        assert_eq!(a.test_type, TestType::Personality);
        assert_eq!(a.test_type.label(), "Personality and Behavior Assessment");
    }

    #[test]
    fn unknown_test_type_falls_back_to_other() {
        let json = r#"{"name": "X", "url": "u", "test_type": "Z"}"#;
        let a: Assessment = serde_json::from_str(json).unwrap();
        assert_eq!(a.test_type, TestType::Other);
    }

    #[test]
    fn level_accepts_scraper_spellings() {
        for (raw, expected) in [
            ("\"Entry-Level\"", Level::Entry),
            ("\"Mid-Level\"", Level::Mid),
            ("\"Senior\"", Level::Senior),
            ("\"All Levels\"", Level::All),
            ("\"Executive\"", Level::All),
        ] {
            let parsed: Level = serde_json::from_str(raw).unwrap();
            assert_eq!(parsed, expected, "raw level {raw}");
        }
    }
}
