use serde::{Deserialize, Serialize};

/// Output of an extraction. Transient: never stored as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    pub url: String,
    pub title: String,
    pub excerpt: String,
    #[serde(default)]
    pub text_content: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub site_name: Option<String>,
}

impl ArticleRecord {
    /// Title, or `fallback` when the page had none.
    pub fn title_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        let title = self.title.trim();
        if title.is_empty() {
            fallback
        } else {
            title
        }
    }
}

/// First `limit` characters of `text`, trimmed.
pub fn excerpt_of(text: &str, limit: usize) -> String {
    text.trim().chars().take(limit).collect::<String>().trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_camel_case() {
        let article = ArticleRecord {
            url: "https://a.test".into(),
            title: "A".into(),
            excerpt: "e".into(),
            text_content: "full".into(),
            content: "<p>full</p>".into(),
            site_name: None,
        };
        let json = serde_json::to_value(&article).unwrap();
        assert_eq!(json["textContent"], "full");
        assert_eq!(json["content"], "<p>full</p>");
        assert!(json["siteName"].is_null());
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        let text = "  日本語のテキスト  ";
        assert_eq!(excerpt_of(text, 3), "日本語");
        assert_eq!(excerpt_of("short", 200), "short");
    }

    #[test]
    fn test_title_or_fallback() {
        let mut article = ArticleRecord {
            url: "https://a.test".into(),
            title: "   ".into(),
            excerpt: String::new(),
            text_content: String::new(),
            content: String::new(),
            site_name: None,
        };
        assert_eq!(article.title_or("Tab"), "Tab");
        article.title = "Real".into();
        assert_eq!(article.title_or("Tab"), "Real");
    }
}
