//! Configuration for the sanctions collector

use crate::error::{Result, ServiceError};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

pub const OFAC_SDN_URL: &str = "https://www.treasury.gov/ofac/downloads/sdn.xml";

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the snapshot slot
    pub data_dir: PathBuf,

    /// File name of the snapshot slot inside `data_dir`
    pub snapshot_file: String,

    /// OFAC SDN feed
    pub ofac: FeedConfig,

    /// Sources without a real feed integration, in collection order
    pub placeholder_sources: Vec<SourceConfig>,

    /// Query defaults
    pub search: SearchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            snapshot_file: "latest.json".to_string(),
            ofac: FeedConfig::default(),
            placeholder_sources: vec![
                SourceConfig::new("EU", "European Union"),
                SourceConfig::new("UN", "United Nations"),
                SourceConfig::new("UK", "United Kingdom"),
                SourceConfig::new("Canada", "Canada"),
                SourceConfig::new("Australia", "Australia"),
                SourceConfig::new("Japan", "Japan"),
            ],
            search: SearchConfig::default(),
        }
    }
}

/// Real feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Download URL
    pub url: String,

    /// Read the list from this file instead of downloading it
    pub path: Option<PathBuf>,

    /// Download timeout (seconds)
    pub timeout_secs: u64,

    /// User-Agent header sent to the publisher
    pub user_agent: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: OFAC_SDN_URL.to_string(),
            path: None,
            timeout_secs: 120,
            user_agent: concat!("sanctions-service/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub code: String,
    pub name: String,
}

impl SourceConfig {
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub default_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { default_limit: 50 }
    }
}

impl Config {
    /// Defaults overridden by environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Ok(dir) = env::var("SANCTIONS_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(url) = env::var("OFAC_FEED_URL") {
            config.ofac.url = url;
        }
        if let Ok(path) = env::var("OFAC_FEED_PATH") {
            config.ofac.path = Some(PathBuf::from(path));
        }
        if let Ok(secs) = env::var("FEED_TIMEOUT_SECS") {
            config.ofac.timeout_secs = secs
                .parse()
                .map_err(|_| ServiceError::Config(format!("FEED_TIMEOUT_SECS is not a number: {}", secs)))?;
        }
        if let Ok(limit) = env::var("SEARCH_DEFAULT_LIMIT") {
            config.search.default_limit = limit
                .parse()
                .map_err(|_| ServiceError::Config(format!("SEARCH_DEFAULT_LIMIT is not a number: {}", limit)))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file; missing keys keep their defaults
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ServiceError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let config: Config = toml::from_str(&raw)
            .map_err(|e| ServiceError::Config(format!("invalid {}: {}", path.display(), e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.snapshot_file.trim().is_empty() {
            return Err(ServiceError::Config("snapshot_file must not be empty".to_string()));
        }
        if self.ofac.timeout_secs == 0 {
            return Err(ServiceError::Config("ofac.timeout_secs must be positive".to_string()));
        }
        if self.ofac.path.is_none() && self.ofac.url.trim().is_empty() {
            return Err(ServiceError::Config("ofac.url or ofac.path is required".to_string()));
        }
        if self.search.default_limit == 0 {
            return Err(ServiceError::Config("search.default_limit must be positive".to_string()));
        }
        for (i, source) in self.placeholder_sources.iter().enumerate() {
            if source.code.trim().is_empty() {
                return Err(ServiceError::Config(format!("placeholder source #{} has no code", i)));
            }
            if source.code == "OFAC"
                || self.placeholder_sources[..i].iter().any(|s| s.code == source.code)
            {
                return Err(ServiceError::Config(format!("duplicate source code {}", source.code)));
            }
        }
        Ok(())
    }

    /// Full path of the snapshot slot
    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(&self.snapshot_file)
    }
}
