pub mod sqlite;

use std::collections::HashSet;

use tracing::{debug, info};

use crate::app::{Result, StashError};
use crate::domain::{BookmarkRecord, NewBookmark};

pub use sqlite::SqliteStore;

/// Name of the persistent slot holding the bookmark sequence.
pub const BOOKMARKS_SLOT: &str = "bookmarks";

/// Change notification published after a committed mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Inserted { url: String },
    Deleted { index: usize, url: String },
    Cleared { removed: usize },
}

/// Ordered bookmark collection, newest first, unique by URL.
///
/// Implementors provide the two primitives: a snapshot read and a
/// single-writer read-modify-write. Every operation below goes through them.
pub trait Store {
    /// Read the current sequence.
    fn load(&self) -> Result<Vec<BookmarkRecord>>;

    /// Run `mutator` against the sequence and persist the result.
    ///
    /// No other mutator may run between the read and the write. If the
    /// mutator fails, nothing is persisted.
    fn with_store<T, F>(&self, mutator: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<BookmarkRecord>) -> Result<T>;

    /// Called after each committed mutation.
    fn notify(&self, _event: StoreEvent) {}

    fn insert(&self, candidate: NewBookmark) -> Result<BookmarkRecord> {
        let record = self.with_store(|records| {
            if records.iter().any(|r| r.url == candidate.url) {
                return Err(StashError::Duplicate(candidate.url));
            }
            let record = BookmarkRecord::from_candidate(candidate);
            records.insert(0, record.clone());
            Ok(record)
        })?;

        info!("Saved bookmark {}", record.url);
        self.notify(StoreEvent::Inserted {
            url: record.url.clone(),
        });
        Ok(record)
    }

    fn contains(&self, url: &str) -> Result<bool> {
        Ok(self.load()?.iter().any(|r| r.url == url))
    }

    fn search(&self, query: &str) -> Result<Vec<BookmarkRecord>> {
        let needle = query.to_lowercase();
        Ok(self
            .load()?
            .into_iter()
            .filter(|r| r.matches(&needle))
            .collect())
    }

    /// Remove the record at `index`. Later records shift left by one.
    fn delete_at(&self, index: usize) -> Result<BookmarkRecord> {
        let removed = self.with_store(|records| {
            if index >= records.len() {
                return Err(StashError::Index {
                    index,
                    len: records.len(),
                });
            }
            Ok(records.remove(index))
        })?;

        info!("Deleted bookmark {} at position {}", removed.url, index);
        self.notify(StoreEvent::Deleted {
            index,
            url: removed.url.clone(),
        });
        Ok(removed)
    }

    /// Snapshot of the full sequence. Does not mutate.
    fn drain_all(&self) -> Result<Vec<BookmarkRecord>> {
        self.load()
    }

    fn clear(&self) -> Result<usize> {
        let removed = self.with_store(|records| {
            let removed = records.len();
            records.clear();
            Ok(removed)
        })?;

        info!("Cleared {} bookmarks", removed);
        self.notify(StoreEvent::Cleared { removed });
        Ok(removed)
    }

    /// Remove exactly the records of an acknowledged batch.
    ///
    /// Records inserted after the batch was taken are kept.
    fn remove_synced(&self, synced: &[BookmarkRecord]) -> Result<usize> {
        let sent: HashSet<(&str, i64)> = synced
            .iter()
            .map(|r| (r.url.as_str(), r.created_at.timestamp_micros()))
            .collect();

        let removed = self.with_store(|records| {
            let before = records.len();
            records.retain(|r| !sent.contains(&(r.url.as_str(), r.created_at.timestamp_micros())));
            Ok(before - records.len())
        })?;

        debug!("Removed {} synced bookmarks", removed);
        self.notify(StoreEvent::Cleared { removed });
        Ok(removed)
    }
}
