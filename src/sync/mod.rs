//! Batch sync of the local store to a remote collector.
//!
//! The whole store goes up as one batch. The local copy is only removed
//! once the collector acknowledges it; any failure leaves the store as it
//! was, so a failed sync is retried by simply calling [`SyncClient::sync`]
//! again.

pub mod collector;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::app::Result;
use crate::domain::WireBookmark;
use crate::store::Store;

pub use collector::HttpCollector;

/// Receiver of bookmark batches.
#[async_trait]
pub trait Collector: Send + Sync {
    /// Deliver `batch`. `Ok` means the collector accepted all of it.
    async fn submit(&self, batch: &[WireBookmark]) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncResult {
    /// Records sent and acknowledged.
    pub uploaded: usize,
}

pub struct SyncClient<C> {
    collector: C,
}

impl<C: Collector> SyncClient<C> {
    pub fn new(collector: C) -> Self {
        Self { collector }
    }

    pub async fn sync<S: Store + Sync>(&self, store: &S) -> Result<SyncResult> {
        let snapshot = store.drain_all()?;
        let payload: Vec<WireBookmark> = snapshot.iter().map(WireBookmark::from).collect();

        info!("Syncing {} bookmarks", payload.len());
        if let Err(e) = self.collector.submit(&payload).await {
            warn!("Sync rejected, keeping {} local bookmarks: {}", snapshot.len(), e);
            return Err(e);
        }

        store.remove_synced(&snapshot)?;
        info!("Sync complete, {} bookmarks uploaded", payload.len());

        Ok(SyncResult {
            uploaded: payload.len(),
        })
    }
}
