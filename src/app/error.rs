use thiserror::Error;

#[derive(Error, Debug)]
pub enum StashError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bookmark already saved: {0}")]
    Duplicate(String),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("No bookmark at position {index} (store holds {len})")]
    Index { index: usize, len: usize },

    #[error("Sync failed: {0}")]
    Sync(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, StashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_error_carries_detail_verbatim() {
        let err = StashError::Sync("db down".into());
        assert_eq!(err.to_string(), "Sync failed: db down");
    }

    #[test]
    fn test_index_error_message() {
        let err = StashError::Index { index: 5, len: 2 };
        assert_eq!(err.to_string(), "No bookmark at position 5 (store holds 2)");
    }
}
