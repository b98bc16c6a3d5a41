use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::{Result, StashError};
use crate::config::Config;
use crate::extractor::{Extractor, HtmlExtractor, RemoteExtractor};
use crate::store::sqlite::SqliteStore;
use crate::sync::{HttpCollector, SyncClient};

pub struct AppContext {
    pub config: Config,
    pub store: Arc<SqliteStore>,
    pub extractor: Arc<dyn Extractor>,
    pub sync: SyncClient<HttpCollector>,
}

impl AppContext {
    /// `db_path` overrides the configured store location.
    pub fn new(config: Config, db_path: Option<PathBuf>) -> Result<Self> {
        let db_path = match db_path.or_else(|| config.store.path.clone()) {
            Some(p) => p,
            None => Self::default_db_path()?,
        };

        let store = Arc::new(SqliteStore::new(&db_path)?);
        Self::with_store(config, store)
    }

    pub fn in_memory(config: Config) -> Result<Self> {
        let store = Arc::new(SqliteStore::in_memory()?);
        Self::with_store(config, store)
    }

    fn with_store(config: Config, store: Arc<SqliteStore>) -> Result<Self> {
        let extractor = Self::capture_extractor(&config)?;
        let collector =
            HttpCollector::new(&config.collector.endpoint, config.collector.timeout())?;

        Ok(Self {
            config,
            store,
            extractor,
            sync: SyncClient::new(collector),
        })
    }

    fn capture_extractor(config: &Config) -> Result<Arc<dyn Extractor>> {
        match &config.capture.extraction_service {
            Some(base) => Ok(Arc::new(RemoteExtractor::new(base, &config.extractor)?)),
            None => Ok(Arc::new(HtmlExtractor::new(config.extractor.clone())?)),
        }
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| StashError::Config("Could not find data directory".into()))?;
        let stash_dir = data_dir.join("tabstash");
        std::fs::create_dir_all(&stash_dir)?;
        Ok(stash_dir.join("tabstash.db"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    #[test]
    fn test_in_memory_context() {
        let ctx = AppContext::in_memory(Config::default()).unwrap();
        assert!(ctx.store.load().unwrap().is_empty());
    }

    #[test]
    fn test_db_path_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("override.db");

        let ctx = AppContext::new(Config::default(), Some(path.clone())).unwrap();
        drop(ctx);
        assert!(path.exists());
    }

    #[test]
    fn test_invalid_collector_endpoint() {
        let mut config = Config::default();
        config.collector.endpoint = "not a url".into();
        assert!(matches!(
            AppContext::in_memory(config),
            Err(StashError::InvalidUrl(_))
        ));
    }
}
