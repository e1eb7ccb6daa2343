/// Core data types for the floodwatch service.
///
/// This module defines the shared domain model imported by all other modules:
/// monitoring stations, flood warnings, warning-area polygons, the per-record
/// diagnostics produced when a provider payload is incomplete, and the crate
/// error type. It contains no I/O.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::geo::Polygon;

// ---------------------------------------------------------------------------
// Providers
// ---------------------------------------------------------------------------

/// The national agency a record was sourced from.
///
/// Identifier spaces are disjoint across providers; a flood event reported
/// by two agencies appears twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Provider {
    /// Environment Agency (England, and Wales via the EA REST API).
    EnvironmentAgency,
    /// Natural Resources Wales.
    NaturalResourcesWales,
    /// Scottish Environment Protection Agency.
    Sepa,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::EnvironmentAgency => write!(f, "EA"),
            Provider::NaturalResourcesWales => write!(f, "NRW"),
            Provider::Sepa => write!(f, "SEPA"),
        }
    }
}

// ---------------------------------------------------------------------------
// Station types
// ---------------------------------------------------------------------------

/// WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Historically normal level band for a station, in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TypicalRange {
    pub low: f64,
    pub high: f64,
}

impl TypicalRange {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// A range is only usable when `low < high`. NaN bounds are never consistent.
    pub fn is_consistent(&self) -> bool {
        self.low < self.high
    }
}

/// Outcome of normalising a station's latest reading against its typical range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RelativeLevel {
    /// `(level - low) / (high - low)`; 0.0 is the bottom of the typical band,
    /// 1.0 the top.
    Value(f64),
    /// Range absent, or `low >= high`.
    InconsistentRange,
    /// Range is consistent but the station has no current reading.
    NoReading,
}

impl RelativeLevel {
    pub fn value(self) -> Option<f64> {
        match self {
            RelativeLevel::Value(v) => Some(v),
            RelativeLevel::InconsistentRange | RelativeLevel::NoReading => None,
        }
    }
}

/// A river-level monitoring station, built once per snapshot.
///
/// Identity fields are fixed at construction. `latest_level` is the only
/// mutable state and is written exclusively by
/// `stations::update_water_levels`.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitoringStation {
    pub station_id: String,
    /// Telemetry channel used for level readings (last measure listed by the provider).
    pub measure_id: String,
    pub name: String,
    pub coord: Coordinate,
    pub typical_range: Option<TypicalRange>,
    pub river: Option<String>,
    pub town: Option<String>,
    latest_level: Option<f64>,
}

impl MonitoringStation {
    pub fn new(
        station_id: impl Into<String>,
        measure_id: impl Into<String>,
        name: impl Into<String>,
        coord: Coordinate,
        typical_range: Option<TypicalRange>,
        river: Option<String>,
        town: Option<String>,
    ) -> Self {
        Self {
            station_id: station_id.into(),
            measure_id: measure_id.into(),
            name: name.into(),
            coord,
            typical_range,
            river,
            town,
            latest_level: None,
        }
    }

    pub fn latest_level(&self) -> Option<f64> {
        self.latest_level
    }

    pub(crate) fn set_latest_level(&mut self, level: Option<f64>) {
        self.latest_level = level;
    }

    /// True iff a typical range is present and its low bound is strictly
    /// below its high bound. An absent range is inconsistent, not an error.
    pub fn typical_range_consistent(&self) -> bool {
        self.typical_range.is_some_and(|r| r.is_consistent())
    }

    /// Latest level as a fraction of the typical range, or `None` when the
    /// range is inconsistent or there is no reading. Never defaults to 0.
    pub fn relative_water_level(&self) -> Option<f64> {
        self.relative_level().value()
    }

    /// Tri-state form of [`relative_water_level`](Self::relative_water_level).
    pub fn relative_level(&self) -> RelativeLevel {
        match (self.typical_range, self.latest_level) {
            (Some(range), _) if !range.is_consistent() => RelativeLevel::InconsistentRange,
            (None, _) => RelativeLevel::InconsistentRange,
            (Some(_), None) => RelativeLevel::NoReading,
            (Some(range), Some(level)) => {
                RelativeLevel::Value((level - range.low) / (range.high - range.low))
            }
        }
    }
}

impl fmt::Display for MonitoringStation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opt = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
        writeln!(f, "Station name:          {}", self.name)?;
        writeln!(f, "        id:            {}", self.station_id)?;
        writeln!(f, "        measure id:    {}", self.measure_id)?;
        writeln!(f, "        coordinate:    ({}, {})", self.coord.latitude, self.coord.longitude)?;
        writeln!(f, "        town:          {}", opt(&self.town))?;
        writeln!(f, "        river:         {}", opt(&self.river))?;
        match self.typical_range {
            Some(r) => writeln!(f, "        typical range: ({}, {})", r.low, r.high)?,
            None => writeln!(f, "        typical range: -")?,
        }
        match self.latest_level {
            Some(level) => write!(f, "        latest level:  {}", level),
            None => write!(f, "        latest level:  -"),
        }
    }
}

// ---------------------------------------------------------------------------
// Warning types
// ---------------------------------------------------------------------------

/// One flood warning, normalised across provider schemas.
///
/// Severity is copied as reported. In the England/Wales convention lower is
/// more severe (1 = severe warning, 2 = warning, 3 = alert); no
/// cross-provider normalisation is attempted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloodWarning {
    pub provider: Provider,
    /// Provider URL/id for the warning. NRW warnings carry none.
    pub flood_id: Option<String>,
    pub message: String,
    pub description: String,
    pub area_name: String,
    /// Flood area code (FWS_TACODE / FWACODE).
    pub area_id: String,
    /// Comma separated river or sea names; the join key to stations.
    pub river_sea: String,
    pub severity: u8,
    pub county: Option<String>,
    pub time_raised: DateTime<Utc>,
    pub time_message_changed: DateTime<Utc>,
    pub time_severity_changed: DateTime<Utc>,
}

impl FloodWarning {
    /// Identifier that persists across snapshots: the flood id when the
    /// provider has one, otherwise the area code.
    pub fn key(&self) -> &str {
        self.flood_id.as_deref().unwrap_or(&self.area_id)
    }

    /// Splits `river_sea` on commas and trims each name.
    ///
    /// Empty names are dropped: `"A,"` names only `A`, and a blank
    /// `river_sea` names no rivers. Resolving every token instead would
    /// look up `""` and report a `("", None)` pair for the trailing comma.
    pub fn rivers(&self) -> Vec<&str> {
        split_rivers(&self.river_sea)
    }
}

pub(crate) fn split_rivers(river_sea: &str) -> Vec<&str> {
    river_sea
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

impl fmt::Display for FloodWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Flood description:            {}", self.description)?;
        writeln!(f, "      message:                {}", self.message)?;
        writeln!(f, "      id:                     {}", self.key())?;
        writeln!(f, "      area name:              {}", self.area_name)?;
        writeln!(f, "      area id:                {}", self.area_id)?;
        writeln!(f, "      river/sea:              {}", self.river_sea)?;
        writeln!(f, "      severity:               {}", self.severity)?;
        writeln!(f, "      county:                 {}", self.county.as_deref().unwrap_or("-"))?;
        writeln!(f, "      time raised:            {}", self.time_raised)?;
        writeln!(f, "      message change at:      {}", self.time_message_changed)?;
        write!(f, "      severity change at:     {}", self.time_severity_changed)
    }
}

/// A flood warning/alert area (FWA) with its reference geometry.
///
/// SEPA publishes active warnings as areas rather than discrete events, and
/// the reference polygon set used to detect orphaned alerts has the same shape.
#[derive(Debug, Clone, PartialEq)]
pub struct FloodArea {
    pub provider: Provider,
    /// Area code, matched against `FloodWarning::area_id`.
    pub code: String,
    pub name: String,
    pub area_name: String,
    pub severity: u8,
    pub polygon: Option<Polygon<f64>>,
}

// ---------------------------------------------------------------------------
// Per-record diagnostics
// ---------------------------------------------------------------------------

/// Why a single field of a provider record could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    Missing,
    Invalid(String),
}

/// One failed field in a provider record, e.g. `floodArea.county: missing`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordIssue {
    pub field: String,
    pub problem: Problem,
}

impl fmt::Display for RecordIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.problem {
            Problem::Missing => write!(f, "{}: missing", self.field),
            Problem::Invalid(reason) => write!(f, "{}: {}", self.field, reason),
        }
    }
}

/// A record dropped from a batch, with every field that failed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRecord {
    pub provider: Provider,
    /// Position of the record in the provider payload.
    pub index: usize,
    /// Whatever identifier could be read, for diagnostics only.
    pub id: Option<String>,
    pub issues: Vec<RecordIssue>,
}

impl fmt::Display for RejectedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let issues: Vec<String> = self.issues.iter().map(|i| i.to_string()).collect();
        write!(
            f,
            "{} record #{} ({}) skipped: {}",
            self.provider,
            self.index,
            self.id.as_deref().unwrap_or("no id"),
            issues.join(", ")
        )
    }
}

/// Result of building a collection from a provider payload: the records that
/// validated, plus the ones that were dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch<T> {
    pub records: Vec<T>,
    pub rejected: Vec<RejectedRecord>,
}

impl<T> Batch<T> {
    pub fn new() -> Self {
        Self { records: Vec::new(), rejected: Vec::new() }
    }

    /// Number of records the payload contained, kept or dropped.
    pub fn total(&self) -> usize {
        self.records.len() + self.rejected.len()
    }
}

impl<T> Default for Batch<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that are fatal for a whole batch: fetch failures, unreadable
/// payload envelopes, configuration and archive I/O.
#[derive(Debug, Error)]
pub enum FloodDataError {
    /// Non-2xx HTTP response from a provider.
    #[error("HTTP error: {0}")]
    Http(u16),
    /// The request could not be sent or its body read.
    #[error("Request error: {0}")]
    Request(String),
    /// The payload did not have the expected envelope.
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Missing field: {0}")]
    MissingField(String),
    /// The SEPA page had no script carrying the warning-area literal.
    #[error("Embedded script not found: {0}")]
    ScriptNotFound(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for FloodDataError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => FloodDataError::Http(status.as_u16()),
            None => FloodDataError::Request(e.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
