/// Feed retrieval: HTTP access, the local JSON cache, and the per-feed
/// cache-versus-network policy.
///
/// Parsing never touches the network or the filesystem; everything here
/// only produces raw payloads (`serde_json::Value` or page text) for the
/// builders in `stations` and `warnings`.
///
/// | Feed            | Source                   | Cache file                        |
/// |-----------------|--------------------------|-----------------------------------|
/// | stations        | EA `/id/stations`        | `station_data.json`               |
/// | latest levels   | EA `/id/measures`        | `waterlevel_data.json`            |
/// | England floods  | EA `/id/floods`          | `flood_warning_data.json`         |
/// | Wales warnings  | NRW API (keyed)          | `wales_flood_warning_data.json`   |
/// | Scotland page   | SEPA Floodline HTML      | not cached                        |

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::FeedsConfig;
use crate::ingest::{ea, nrw};
use crate::model::FloodDataError;

pub const STATION_CACHE: &str = "station_data.json";
pub const LEVELS_CACHE: &str = "waterlevel_data.json";
pub const FLOODS_CACHE: &str = "flood_warning_data.json";
pub const WALES_CACHE: &str = "wales_flood_warning_data.json";

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Anything that can answer a GET with a body. Implemented over HTTP for
/// the service and in memory for tests.
pub trait JsonSource: Send + Sync {
    fn fetch_text(&self, url: &str, headers: &[(&str, &str)]) -> Result<String, FloodDataError>;

    fn fetch_json(&self, url: &str, headers: &[(&str, &str)]) -> Result<Value, FloodDataError> {
        let body = self.fetch_text(url, headers)?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Blocking HTTP source with a request timeout.
pub struct HttpSource {
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(timeout: Duration) -> Result<Self, FloodDataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("floodwatch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl JsonSource for HttpSource {
    fn fetch_text(&self, url: &str, headers: &[(&str, &str)]) -> Result<String, FloodDataError> {
        debug!(url, "fetching");
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = request.send()?;

        if !response.status().is_success() {
            return Err(FloodDataError::Http(response.status().as_u16()));
        }
        Ok(response.text()?)
    }
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

/// JSON payloads stored as files under an explicit root directory.
#[derive(Debug, Clone)]
pub struct JsonCache {
    root: PathBuf,
}

impl JsonCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn load(&self, name: &str) -> Result<Value, FloodDataError> {
        let contents = fs::read_to_string(self.path(name))?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Writes `data`, creating the cache root if needed.
    pub fn dump(&self, name: &str, data: &Value) -> Result<(), FloodDataError> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.path(name), serde_json::to_vec(data)?)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Feed client
// ---------------------------------------------------------------------------

/// Fetches each feed with the cache policy:
///
/// - `use_cache`: read the cached copy; if that fails, fetch and refresh it.
/// - otherwise: always fetch, then refresh the cached copy.
///
/// Without a cache every call goes to the source. Failing to refresh the
/// cache is logged and does not fail the fetch.
pub struct FeedClient<S> {
    source: S,
    cache: Option<JsonCache>,
    feeds: FeedsConfig,
    nrw_key: Option<String>,
}

impl<S: JsonSource> FeedClient<S> {
    pub fn new(source: S, feeds: FeedsConfig) -> Self {
        Self { source, cache: None, feeds, nrw_key: None }
    }

    pub fn with_cache(mut self, cache: JsonCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_nrw_key(mut self, key: impl Into<String>) -> Self {
        self.nrw_key = Some(key.into());
        self
    }

    pub fn feeds(&self) -> &FeedsConfig {
        &self.feeds
    }

    pub fn station_data(&self, use_cache: bool) -> Result<Value, FloodDataError> {
        let url = ea::build_stations_url(&self.feeds.ea_root_url);
        self.cached_json(STATION_CACHE, use_cache, &url, &[])
    }

    pub fn latest_levels(&self, use_cache: bool) -> Result<Value, FloodDataError> {
        let url = ea::build_latest_levels_url(&self.feeds.ea_root_url);
        self.cached_json(LEVELS_CACHE, use_cache, &url, &[])
    }

    pub fn flood_data(&self, use_cache: bool) -> Result<Value, FloodDataError> {
        let url = ea::build_floods_url(&self.feeds.ea_root_url, self.feeds.min_severity);
        self.cached_json(FLOODS_CACHE, use_cache, &url, &[])
    }

    /// NRW warnings. A cached copy is served without a key; a network
    /// fetch without one is `MissingField`.
    pub fn wales_data(&self, use_cache: bool) -> Result<Value, FloodDataError> {
        if use_cache {
            if let Some(data) = self.load_cached(WALES_CACHE) {
                return Ok(data);
            }
        }
        let key = self
            .nrw_key
            .as_deref()
            .ok_or_else(|| FloodDataError::MissingField(crate::config::NRW_KEY_VAR.to_string()))?;
        let data = self
            .source
            .fetch_json(&self.feeds.nrw_url, &[(nrw::NRW_KEY_HEADER, key)])?;
        self.store_cached(WALES_CACHE, &data);
        Ok(data)
    }

    pub fn scotland_page(&self) -> Result<String, FloodDataError> {
        self.source.fetch_text(&self.feeds.sepa_url, &[])
    }

    /// EA liveness check: true when the floods endpoint lists at least
    /// one warning at the configured severity. Never cached.
    pub fn has_active_warnings(&self) -> Result<bool, FloodDataError> {
        let url = ea::build_floods_url(&self.feeds.ea_root_url, self.feeds.min_severity);
        let data = self.source.fetch_json(&url, &[])?;
        Ok(ea::has_items(&data))
    }

    fn cached_json(
        &self,
        name: &str,
        use_cache: bool,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<Value, FloodDataError> {
        if use_cache {
            if let Some(data) = self.load_cached(name) {
                return Ok(data);
            }
        }
        let data = self.source.fetch_json(url, headers)?;
        self.store_cached(name, &data);
        Ok(data)
    }

    fn load_cached(&self, name: &str) -> Option<Value> {
        let cache = self.cache.as_ref()?;
        match cache.load(name) {
            Ok(data) => {
                info!(file = %cache.path(name).display(), "using cached feed");
                Some(data)
            }
            Err(e) => {
                debug!(file = %cache.path(name).display(), error = %e, "cache miss");
                None
            }
        }
    }

    fn store_cached(&self, name: &str, data: &Value) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.dump(name, data) {
                warn!(file = %cache.path(name).display(), error = %e, "could not refresh cache");
            }
        }
    }
}
