/// Service configuration loader: parses floodwatch.toml.
///
/// Every field has a default, so an absent file or an absent section just
/// means "use the defaults". Secrets stay out of the file: the NRW
/// subscription key comes from the environment (`.env` is honoured).

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::ingest::{ea, nrw, sepa};
use crate::model::FloodDataError;

pub const DEFAULT_CONFIG_PATH: &str = "floodwatch.toml";

/// Environment variable holding the NRW API subscription key.
pub const NRW_KEY_VAR: &str = "NRW_API_KEY";

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub cache: CacheConfig,
    pub feeds: FeedsConfig,
    pub logging: LoggingConfig,
    pub history: HistoryConfig,
}

/// Local copies of the JSON feeds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub dir: PathBuf,
    /// When false, feeds are never read from or written to the cache.
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { dir: PathBuf::from("cache"), enabled: true }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeedsConfig {
    pub ea_root_url: String,
    pub nrw_url: String,
    pub sepa_url: String,
    /// EA floods are requested at this severity and above (1 = most severe).
    pub min_severity: u8,
    pub timeout_secs: u64,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            ea_root_url: ea::EA_ROOT_URL.to_string(),
            nrw_url: nrw::NRW_URL.to_string(),
            sepa_url: sepa::SEPA_URL.to_string(),
            min_severity: 2,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// tracing filter directive, e.g. "info" or "floodwatch=debug".
    pub level: String,
    /// Also append log lines to this file.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), file: None }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub path: PathBuf,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { path: PathBuf::from("history/warnings.jsonl") }
    }
}

/// Parses a configuration document.
pub fn parse_config(contents: &str) -> Result<Config, FloodDataError> {
    toml::from_str(contents).map_err(|e| FloodDataError::Config(e.to_string()))
}

/// Loads the configuration file at `path`.
///
/// # Errors
/// `FloodDataError::Config` if the file cannot be read or is malformed.
pub fn load_config(path: &Path) -> Result<Config, FloodDataError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| FloodDataError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
    parse_config(&contents)
        .map_err(|e| FloodDataError::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Like `load_config`, but a missing file yields `Config::default()`.
pub fn load_config_or_default(path: &Path) -> Result<Config, FloodDataError> {
    if path.exists() {
        load_config(path)
    } else {
        Ok(Config::default())
    }
}

/// NRW subscription key from the environment, after loading `.env`.
pub fn nrw_api_key() -> Option<String> {
    dotenv::dotenv().ok();
    env::var(NRW_KEY_VAR).ok().filter(|k| !k.trim().is_empty())
}
