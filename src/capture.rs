//! Saving a browser tab as a bookmark.

use tracing::{info, warn};
use url::Url;

use crate::app::{Result, StashError};
use crate::domain::{BookmarkRecord, NewBookmark};
use crate::extractor::Extractor;
use crate::store::Store;

#[derive(Debug, Clone, Default)]
pub struct CaptureRequest {
    pub url: String,
    /// Title the browser shows for the tab.
    pub tab_title: Option<String>,
    pub tags: Vec<String>,
}

impl CaptureRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    fn fallback_title(&self) -> &str {
        self.tab_title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionStatus {
    Extracted,
    /// No extractor was configured for this capture.
    NotAttempted,
    /// Extraction failed; the record only has the tab title.
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct CaptureOutcome {
    pub record: BookmarkRecord,
    pub extraction: ExtractionStatus,
}

impl CaptureOutcome {
    pub fn extraction_skipped(&self) -> bool {
        self.extraction != ExtractionStatus::Extracted
    }
}

/// Enrich the tab through `extractor` when given, then insert it.
///
/// A URL already in the store fails with [`StashError::Duplicate`] before
/// any fetch. Extraction failure is not an error here: the bookmark is saved
/// with the tab title and an empty excerpt.
pub async fn capture<S, E>(
    store: &S,
    extractor: Option<&E>,
    request: CaptureRequest,
) -> Result<CaptureOutcome>
where
    S: Store + Sync,
    E: Extractor + ?Sized,
{
    Url::parse(&request.url)?;

    if store.contains(&request.url)? {
        return Err(StashError::Duplicate(request.url));
    }

    let fallback = request.fallback_title().to_string();
    let (title, excerpt, extraction) = match extractor {
        None => (fallback, String::new(), ExtractionStatus::NotAttempted),
        Some(extractor) => match extractor.extract(&request.url).await {
            Ok(article) => (
                article.title_or(&fallback).to_string(),
                article.excerpt,
                ExtractionStatus::Extracted,
            ),
            Err(StashError::Extraction(detail)) => {
                warn!(
                    "Full-text capture skipped for {}: {}",
                    request.url, detail
                );
                (fallback, String::new(), ExtractionStatus::Failed(detail))
            }
            Err(e) => return Err(e),
        },
    };

    // Insert re-checks for duplicates atomically; the check above only
    // saves a fetch.
    let record = store.insert(
        NewBookmark::new(request.url, title)
            .with_excerpt(excerpt)
            .with_tags(request.tags),
    )?;

    info!("Captured {} ({:?})", record.url, extraction);
    Ok(CaptureOutcome { record, extraction })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::domain::ArticleRecord;
    use crate::store::SqliteStore;

    struct FixedExtractor {
        result: std::result::Result<(String, String), String>,
        calls: AtomicUsize,
    }

    impl FixedExtractor {
        fn ok(title: &str, excerpt: &str) -> Self {
            Self {
                result: Ok((title.into(), excerpt.into())),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(detail: &str) -> Self {
            Self {
                result: Err(detail.into()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Extractor for FixedExtractor {
        async fn extract(&self, url: &str) -> Result<ArticleRecord> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.result {
                Ok((title, excerpt)) => Ok(ArticleRecord {
                    url: url.into(),
                    title: title.clone(),
                    excerpt: excerpt.clone(),
                    text_content: excerpt.clone(),
                    content: String::new(),
                    site_name: None,
                }),
                Err(detail) => Err(StashError::Extraction(detail.clone())),
            }
        }
    }

    fn request(url: &str, tab_title: &str) -> CaptureRequest {
        CaptureRequest {
            url: url.into(),
            tab_title: Some(tab_title.into()),
            tags: vec!["later".into()],
        }
    }

    #[tokio::test]
    async fn test_capture_with_extraction() {
        let store = SqliteStore::in_memory().unwrap();
        let extractor = FixedExtractor::ok("Article Title", "An excerpt");

        let outcome = capture(&store, Some(&extractor), request("https://a.test", "Tab"))
            .await
            .unwrap();

        assert_eq!(outcome.extraction, ExtractionStatus::Extracted);
        assert!(!outcome.extraction_skipped());
        assert_eq!(outcome.record.title, "Article Title");
        assert_eq!(outcome.record.excerpt, "An excerpt");
        assert_eq!(outcome.record.tags, vec!["later"]);
        assert_eq!(store.load().unwrap(), vec![outcome.record]);
    }

    #[tokio::test]
    async fn test_extraction_failure_falls_back_to_tab_title() {
        let store = SqliteStore::in_memory().unwrap();
        let extractor = FixedExtractor::failing("connection refused");

        let outcome = capture(&store, Some(&extractor), request("https://a.test", "Tab Title"))
            .await
            .unwrap();

        assert!(outcome.extraction_skipped());
        assert_eq!(
            outcome.extraction,
            ExtractionStatus::Failed("connection refused".into())
        );
        assert_eq!(outcome.record.title, "Tab Title");
        assert_eq!(outcome.record.excerpt, "");
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_article_title_uses_tab_title() {
        let store = SqliteStore::in_memory().unwrap();
        let extractor = FixedExtractor::ok("", "text");

        let outcome = capture(&store, Some(&extractor), request("https://a.test", "Tab"))
            .await
            .unwrap();
        assert_eq!(outcome.record.title, "Tab");
    }

    #[tokio::test]
    async fn test_without_extractor_or_tab_title_uses_url() {
        let store = SqliteStore::in_memory().unwrap();

        let outcome = capture::<_, FixedExtractor>(&store, None, CaptureRequest::new("https://a.test"))
            .await
            .unwrap();

        assert_eq!(outcome.extraction, ExtractionStatus::NotAttempted);
        assert_eq!(outcome.record.title, "https://a.test");
        assert!(outcome.record.tags.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_skips_fetch() {
        let store = SqliteStore::in_memory().unwrap();
        let extractor = FixedExtractor::ok("First", "");
        capture(&store, Some(&extractor), request("https://a.test", "Tab"))
            .await
            .unwrap();

        let second = FixedExtractor::ok("Second", "");
        let err = capture(&store, Some(&second), request("https://a.test", "Other"))
            .await
            .unwrap_err();

        assert!(matches!(err, StashError::Duplicate(_)));
        assert_eq!(second.calls.load(Ordering::SeqCst), 0);
        let records = store.load().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "First");
    }

    #[tokio::test]
    async fn test_invalid_url_rejected_before_insert() {
        let store = SqliteStore::in_memory().unwrap();
        let err = capture::<_, FixedExtractor>(&store, None, CaptureRequest::new("not a url"))
            .await
            .unwrap_err();

        assert!(matches!(err, StashError::InvalidUrl(_)));
        assert!(store.load().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dyn_extractor() {
        let store = SqliteStore::in_memory().unwrap();
        let extractor: Box<dyn Extractor> = Box::new(FixedExtractor::ok("Dyn", ""));

        let outcome = capture(&store, Some(extractor.as_ref()), request("https://a.test", "Tab"))
            .await
            .unwrap();
        assert_eq!(outcome.record.title, "Dyn");
    }
}
