use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for article extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// User agent sent when fetching pages
    pub user_agent: String,

    /// Maximum excerpt length in characters (default: 200)
    pub excerpt_length: usize,

    /// Minimum text length for an element to count as the article body (default: 140)
    pub min_content_length: usize,

    /// Request timeout in seconds. Unset means the caller's own policy applies.
    pub timeout_secs: Option<u64>,

    /// CSS selectors to try for article content, in priority order
    pub content_selectors: Vec<String>,

    /// CSS selectors for elements to strip before extraction (ads, navigation, etc.)
    pub remove_selectors: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            excerpt_length: 200,
            min_content_length: 140,
            timeout_secs: None,
            content_selectors: vec![
                // Common article content selectors in priority order
                "article".to_string(),
                "[itemprop=\"articleBody\"]".to_string(),
                "[role=\"main\"]".to_string(),
                "main".to_string(),
                ".post-content".to_string(),
                ".article-content".to_string(),
                ".entry-content".to_string(),
                "#content".to_string(),
                ".post".to_string(),
            ],
            remove_selectors: vec![
                "script".to_string(),
                "style".to_string(),
                "noscript".to_string(),
                "template".to_string(),
                "iframe".to_string(),
                "form".to_string(),
                "button".to_string(),
                "nav".to_string(),
                "header".to_string(),
                "footer".to_string(),
                "aside".to_string(),
                "[role=\"navigation\"]".to_string(),
                "[aria-hidden=\"true\"]".to_string(),
                ".sidebar".to_string(),
                ".advertisement".to_string(),
                ".ad".to_string(),
                ".ads".to_string(),
                ".social-share".to_string(),
                ".comments".to_string(),
                ".related-posts".to_string(),
                ".cookie-banner".to_string(),
            ],
        }
    }
}

impl ExtractorConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
