use std::sync::Arc;

use crate::app::{AppContext, Result, StashError};
use crate::capture::{capture, CaptureRequest, ExtractionStatus};
use crate::config::Config;
use crate::domain::BookmarkRecord;
use crate::extractor::{Extractor, HtmlExtractor};
use crate::server;
use crate::store::Store;

pub async fn save_bookmark(
    ctx: &AppContext,
    url: &str,
    title: Option<String>,
    tags: Vec<String>,
    no_extract: bool,
) -> Result<()> {
    let request = CaptureRequest {
        url: url.to_string(),
        tab_title: title,
        tags,
    };
    let extractor = (!no_extract).then(|| ctx.extractor.as_ref());

    match capture(ctx.store.as_ref(), extractor, request).await {
        Ok(outcome) => {
            println!("Saved: {}", outcome.record.title);
            println!("  {}", outcome.record.url);
            if let ExtractionStatus::Failed(reason) = &outcome.extraction {
                println!("Full-text capture skipped, saved title and URL only ({})", reason);
            }
            Ok(())
        }
        Err(StashError::Duplicate(url)) => {
            println!("Already saved: {}", url);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

pub fn list_bookmarks(ctx: &AppContext) -> Result<()> {
    let records = ctx.store.load()?;

    if records.is_empty() {
        println!("No bookmarks");
        return Ok(());
    }

    print_records(&records);
    Ok(())
}

pub fn search_bookmarks(ctx: &AppContext, query: &str) -> Result<()> {
    let hits = ctx.store.search(query)?;

    if hits.is_empty() {
        println!("No bookmarks match \"{}\"", query);
        return Ok(());
    }

    print_records(&hits);
    Ok(())
}

pub fn delete_bookmark(ctx: &AppContext, index: usize) -> Result<()> {
    let removed = ctx.store.delete_at(index)?;
    println!("Deleted: {}", removed.title);
    Ok(())
}

pub async fn sync_bookmarks(ctx: &AppContext) -> Result<()> {
    let result = ctx.sync.sync(ctx.store.as_ref()).await?;
    println!("Sync complete: {} bookmarks uploaded", result.uploaded);
    Ok(())
}

/// Print `{url, title, excerpt, textContent, content, siteName}` for `url`.
pub async fn extract_article(config: &Config, url: &str) -> Result<()> {
    let extractor = HtmlExtractor::new(config.extractor.clone())?;
    let article = extractor.extract(url).await?;
    println!("{}", serde_json::to_string_pretty(&article)?);
    Ok(())
}

pub async fn serve(config: &Config, bind: Option<&str>) -> Result<()> {
    let extractor = Arc::new(HtmlExtractor::new(config.extractor.clone())?);
    let bind = bind.unwrap_or(&config.server.bind);
    server::serve(bind, extractor).await
}

fn print_records(records: &[BookmarkRecord]) {
    for (index, record) in records.iter().enumerate() {
        println!(
            "{:>3}  {}  {}",
            index,
            record.created_at.format("%Y-%m-%d"),
            record.title
        );
        println!("       {}", record.url);
        if !record.tags.is_empty() {
            println!("       [{}]", record.tags.join(", "));
        }
    }
}
