//! Configuration management for tabstash.
//!
//! Configuration is read from `~/.config/tabstash/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use crate::extractor::ExtractorConfig;
use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub extractor: ExtractorConfig,
    pub collector: CollectorConfig,
    pub server: ServerConfig,
    pub capture: CaptureConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database location. Defaults to the platform data directory.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Base URL of the collector; batches go to `{endpoint}/sync`.
    pub endpoint: String,
    pub timeout_secs: Option<u64>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000".to_string(),
            timeout_secs: None,
        }
    }
}

impl CollectorConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the extraction service binds to.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Base URL of a running extraction service. When set, captures
    /// extract through it instead of fetching pages in-process.
    pub extraction_service: Option<String>,
}

/// Resolve `route` beneath `base`, keeping any path the base already has.
///
/// `http://host/api` and `http://host/api/` both give `http://host/api/{route}`.
pub fn service_url(base: &str, route: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.join(route)
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::from_path(&config_path)
    }

    /// Load configuration from an explicit file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/tabstash/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("tabstash").join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# tabstash configuration

[store]
# Database file. Defaults to <data dir>/tabstash/tabstash.db
# path = "/home/me/.local/share/tabstash/tabstash.db"

[extractor]
# User agent sent when fetching pages
user_agent = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"

# Excerpt length in characters
excerpt_length = 200

# Minimum text length for an element to count as the article body
min_content_length = 140

# Request timeout in seconds (unset: no timeout)
# timeout_secs = 30

# CSS selectors to try for article content (in priority order)
content_selectors = [
    "article",
    "[itemprop=\"articleBody\"]",
    "[role=\"main\"]",
    "main",
    ".post-content",
    ".article-content",
    ".entry-content",
    "#content",
    ".post",
]

# Elements to remove before extraction (ads, navigation, etc.)
remove_selectors = [
    "script",
    "style",
    "noscript",
    "template",
    "iframe",
    "form",
    "button",
    "nav",
    "header",
    "footer",
    "aside",
    "[role=\"navigation\"]",
    "[aria-hidden=\"true\"]",
    ".sidebar",
    ".advertisement",
    ".ad",
    ".ads",
    ".social-share",
    ".comments",
    ".related-posts",
    ".cookie-banner",
]

[collector]
# Batches are POSTed to <endpoint>/sync
endpoint = "http://localhost:8000"

# Request timeout in seconds (unset: no timeout)
# timeout_secs = 30

[server]
# Address for `tabstash serve`
bind = "127.0.0.1:3000"

[capture]
# Extract through a running `tabstash serve` instead of in-process
# extraction_service = "http://localhost:3000"
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_url_keeps_base_path() {
        let url = service_url("http://host/api", "sync").unwrap();
        assert_eq!(url.as_str(), "http://host/api/sync");

        let url = service_url("http://host/api/", "sync").unwrap();
        assert_eq!(url.as_str(), "http://host/api/sync");

        let url = service_url("http://localhost:8000", "readability").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/readability");
    }

    #[test]
    fn test_service_url_rejects_relative_base() {
        assert!(service_url("/api", "sync").is_err());
    }

    #[test]
    fn test_default_config_deserializes() {
        let content = Config::default_config_content();
        let config: Config = toml::from_str(&content).expect("Default config should be valid TOML");

        let defaults = ExtractorConfig::default();
        assert_eq!(config.extractor.user_agent, defaults.user_agent);
        assert_eq!(config.extractor.content_selectors, defaults.content_selectors);
        assert_eq!(config.extractor.remove_selectors, defaults.remove_selectors);
        assert_eq!(config.collector.endpoint, "http://localhost:8000");
        assert_eq!(config.server.bind, "127.0.0.1:3000");
        assert!(config.capture.extraction_service.is_none());
        assert!(config.store.path.is_none());
    }

    #[test]
    fn test_partial_config() {
        let content = r##"
[collector]
endpoint = "https://collector.example.com/api/"
timeout_secs = 10

[extractor]
excerpt_length = 120
"##;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        assert_eq!(config.collector.endpoint, "https://collector.example.com/api/");
        assert_eq!(config.collector.timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.extractor.excerpt_length, 120);
        // Defaults
        assert_eq!(config.extractor.min_content_length, 140);
        assert_eq!(config.server.bind, "127.0.0.1:3000");
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").expect("Empty config should work");
        assert_eq!(config.collector.endpoint, "http://localhost:8000");
        assert_eq!(config.collector.timeout(), None);
        assert_eq!(config.extractor.excerpt_length, 200);
    }

    #[test]
    fn test_from_path_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[collector\nendpoint = 1").unwrap();

        let err = Config::from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[capture]\nextraction_service = \"http://localhost:3000\"\n").unwrap();

        let config = Config::from_path(&path).unwrap();
        assert_eq!(
            config.capture.extraction_service.as_deref(),
            Some("http://localhost:3000")
        );
    }
}
