use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A saved page as held in the local store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmarkRecord {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl BookmarkRecord {
    pub fn from_candidate(candidate: NewBookmark) -> Self {
        Self {
            url: candidate.url,
            title: candidate.title,
            excerpt: candidate.excerpt,
            tags: candidate.tags.unwrap_or_default(),
            created_at: Utc::now(),
        }
    }

    /// Case-insensitive substring match on title or excerpt.
    ///
    /// `needle` must already be lower-cased.
    pub fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.title.to_lowercase().contains(needle)
            || self.excerpt.to_lowercase().contains(needle)
    }
}

/// Insert request for the store. `created_at` is assigned on insert.
#[derive(Debug, Clone, Default)]
pub struct NewBookmark {
    pub url: String,
    pub title: String,
    pub excerpt: String,
    pub tags: Option<Vec<String>>,
}

impl NewBookmark {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = excerpt.into();
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }
}

/// Collector wire format. `created_at` stays local.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireBookmark {
    pub url: String,
    pub title: String,
    pub excerpt: String,
    pub tags: Vec<String>,
}

impl From<&BookmarkRecord> for WireBookmark {
    fn from(record: &BookmarkRecord) -> Self {
        Self {
            url: record.url.clone(),
            title: record.title.clone(),
            excerpt: record.excerpt.clone(),
            tags: record.tags.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_candidate_defaults_tags() {
        let record = BookmarkRecord::from_candidate(NewBookmark::new("https://a.test", "A"));
        assert!(record.tags.is_empty());
        assert_eq!(record.excerpt, "");
    }

    #[test]
    fn test_matches_title_or_excerpt() {
        let record = BookmarkRecord::from_candidate(
            NewBookmark::new("https://a.test", "Rust Ownership").with_excerpt("Borrow CHECKER"),
        );
        assert!(record.matches("ownership"));
        assert!(record.matches("checker"));
        assert!(record.matches(""));
        assert!(!record.matches("a.test"));
    }

    #[test]
    fn test_tolerates_missing_optional_fields() {
        let json = r#"{"url":"https://a.test","title":"A","created_at":"2024-01-01T00:00:00Z"}"#;
        let record: BookmarkRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.excerpt, "");
        assert!(record.tags.is_empty());
    }

    #[test]
    fn test_wire_payload_drops_created_at() {
        let record = BookmarkRecord::from_candidate(
            NewBookmark::new("https://a.test", "A")
                .with_excerpt("e")
                .with_tags(vec!["z".into(), "a".into()]),
        );
        let wire = WireBookmark::from(&record);
        let json = serde_json::to_value(&wire).unwrap();
        assert!(json.get("created_at").is_none());

        let back: WireBookmark = serde_json::from_value(json).unwrap();
        assert_eq!(back.url, record.url);
        assert_eq!(back.title, record.title);
        assert_eq!(back.excerpt, record.excerpt);
        assert_eq!(back.tags, vec!["z".to_string(), "a".to_string()]);
    }
}
