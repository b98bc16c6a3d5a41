pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tabstash")]
#[command(about = "Capture, search and sync bookmarks", long_about = None)]
pub struct Cli {
    /// Bookmark database to use instead of the configured one
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Save a page as a bookmark
    Save {
        /// URL of the page
        url: String,
        /// Title to use if the page cannot be extracted
        #[arg(short, long)]
        title: Option<String>,
        /// Tag to attach (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Skip article extraction
        #[arg(long)]
        no_extract: bool,
    },
    /// List saved bookmarks, newest first
    List,
    /// Search titles and excerpts
    Search {
        /// Case-insensitive text to look for (empty lists everything)
        #[arg(default_value = "")]
        query: String,
    },
    /// Delete the bookmark at a position shown by `list`
    Delete {
        index: usize,
    },
    /// Upload all bookmarks to the collector and clear them locally
    Sync,
    /// Extract a page and print it as JSON
    Extract {
        /// URL of the page
        url: String,
    },
    /// Run the extraction service
    Serve {
        /// Address to bind (default from config)
        #[arg(short, long)]
        bind: Option<String>,
    },
}
