/// floodwatch: UK flood-warning aggregator with station cross-referencing.
///
/// # Module structure
///
/// ```text
/// floodwatch
/// ├── model       — shared data types (MonitoringStation, FloodWarning, FloodArea, FloodDataError, …)
/// ├── utils       — stable key sort
/// ├── geo         — haversine distance, warning-area polygons
/// ├── config      — floodwatch.toml loader, NRW key from the environment
/// ├── logging     — tracing subscriber setup, batch diagnostics
/// ├── stations    — station directory: build, levels, river index, distance
/// ├── warnings    — warning aggregator: England, Wales, Scotland, unified table
/// ├── fetch       — HTTP source, JSON cache, per-feed cache policy
/// ├── snapshot    — concurrent fetch of every feed + build
/// ├── history     — JSON-lines warning archive
/// ├── ingest
/// │   ├── ea      — Environment Agency: URLs, flood parsing, timestamps
/// │   ├── nrw     — Natural Resources Wales feed
/// │   ├── sepa    — SEPA Floodline page scraping
/// │   └── fixtures (test only) — representative feed payloads
/// └── analysis
///     ├── crossref    — warning → river → station resolution
///     ├── transitions — severity changes across snapshots
///     └── unmatched   — warnings missing from the flood-area reference set
/// ```

pub mod analysis;
pub mod config;
pub mod fetch;
pub mod geo;
pub mod history;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod snapshot;
pub mod stations;
pub mod utils;
pub mod warnings;
