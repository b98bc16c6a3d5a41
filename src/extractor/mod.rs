//! Article extraction.
//!
//! # Architecture
//!
//! ```text
//! URL → HTTP fetch → ContentExtractor (readability heuristic) → ArticleRecord
//! ```
//!
//! [`Extractor`] is the capability the rest of the crate depends on, so the
//! heuristic can be swapped for a remote service ([`RemoteExtractor`]) or a
//! stub in tests.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tabstash::extractor::{Extractor, ExtractorConfig, HtmlExtractor};
//!
//! let extractor = HtmlExtractor::new(ExtractorConfig::default())?;
//! let article = extractor.extract("https://example.com/article").await?;
//! println!("{}: {}", article.title, article.excerpt);
//! ```

mod config;
mod http_extractor;
mod readability;
mod remote;

pub use config::ExtractorConfig;
pub use http_extractor::HtmlExtractor;
pub use readability::ContentExtractor;
pub use remote::RemoteExtractor;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::ArticleRecord;

/// Turns a URL into an [`ArticleRecord`].
///
/// Fetch failures, non-HTML responses and pages without an identifiable
/// article all surface as [`StashError::Extraction`](crate::app::StashError::Extraction).
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, url: &str) -> Result<ArticleRecord>;
}
