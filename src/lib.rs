//! # tabstash
//!
//! Capture pages as bookmarks, search them locally, and batch-sync them to a
//! remote collector.
//!
//! ## Architecture
//!
//! ```text
//! capture → Extractor (optional) → Store.insert → SQLite slot
//! search  → Store.search
//! sync    → Store.drain_all → Collector (POST /sync) → Store cleared on ack
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! # Save a page, extracting its title and excerpt
//! tabstash save https://blog.rust-lang.org/ --tag rust
//!
//! # Search titles and excerpts
//! tabstash search ownership
//!
//! # Upload everything to the collector
//! tabstash sync
//!
//! # Print the extracted article as JSON
//! tabstash extract https://blog.rust-lang.org/
//!
//! # Run the extraction service on 127.0.0.1:3000
//! tabstash serve
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the store,
/// the capture extractor and the sync client.
pub mod app;

/// Saving a tab: optional extraction, title fallback, deduplicated insert.
pub mod capture;

/// Command-line interface using clap.
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/tabstash/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`BookmarkRecord`](domain::BookmarkRecord): a stored bookmark
/// - [`WireBookmark`](domain::WireBookmark): the collector payload shape
/// - [`ArticleRecord`](domain::ArticleRecord): extraction output
pub mod domain;

/// Article extraction.
///
/// - [`Extractor`](extractor::Extractor): capability trait
/// - [`HtmlExtractor`](extractor::HtmlExtractor): fetch + readability heuristic
/// - [`RemoteExtractor`](extractor::RemoteExtractor): client for the extraction service
pub mod extractor;

/// HTTP extraction service (`GET /readability`).
pub mod server;

/// Bookmark persistence.
///
/// - [`Store`](store::Store): ordered, URL-unique bookmark collection
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
pub mod store;

/// Batch sync to the collector.
pub mod sync;
