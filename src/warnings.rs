/// Warning aggregator: builds the unified warning list and table across
/// England, Wales and Scotland.
///
/// The three agencies publish in different shapes:
///
/// | Provider | Payload | Timestamps | Output |
/// |---|---|---|---|
/// | EA (England/Wales) | REST `items` | `YYYY-MM-DDTHH:MM:SS` | `FloodWarning` |
/// | NRW (Wales) | GeoJSON `features` | Unix ms | `FloodWarning` |
/// | SEPA (Scotland) | HTML page with a script literal | none | `FloodArea` |
///
/// Severity integers are copied as reported; no cross-provider
/// normalisation is attempted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ingest::ea::{self, RiverOrSea};
use crate::ingest::{nrw, sepa};
use crate::model::{Batch, FloodArea, FloodDataError, FloodWarning, Provider, RejectedRecord};

// ---------------------------------------------------------------------------
// Lists
// ---------------------------------------------------------------------------

/// EA warnings with every field present, including `floodArea.riverOrSea`.
/// These are the warnings that can be joined to stations.
pub fn build_flood_list(ea_payload: &Value) -> Result<Batch<FloodWarning>, FloodDataError> {
    ea::parse_flood_warnings(ea_payload, RiverOrSea::Required)
}

/// EA warnings for the unified table. A missing `floodArea.riverOrSea`
/// becomes an empty string rather than a rejection.
pub fn build_flood_table_list(ea_payload: &Value) -> Result<Batch<FloodWarning>, FloodDataError> {
    ea::parse_flood_warnings(ea_payload, RiverOrSea::DefaultEmpty)
}

/// NRW warnings with severity 1 or 2.
pub fn build_wales_list(nrw_payload: &Value) -> Result<Batch<FloodWarning>, FloodDataError> {
    nrw::parse_wales_warnings(nrw_payload)
}

/// SEPA warning areas with their outlines.
pub fn build_scotland_areas(sepa_page: &str) -> Result<Batch<FloodArea>, FloodDataError> {
    sepa::parse_warning_areas(sepa_page)
}

// ---------------------------------------------------------------------------
// Unified table
// ---------------------------------------------------------------------------

/// One warning flattened for the unified table. Column names follow the
/// flood-area reference data (`FWS_TACODE` is the area code).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarningRow {
    pub flood_id: Option<String>,
    pub description: String,
    pub message: String,
    pub area_name: String,
    #[serde(rename = "FWS_TACODE")]
    pub fws_tacode: String,
    pub severity: u8,
    pub county: Option<String>,
    pub river_or_sea: String,
    pub time_raised: DateTime<Utc>,
    pub time_message_changed: DateTime<Utc>,
    pub time_severity_changed: DateTime<Utc>,
}

impl WarningRow {
    /// Identifier that persists across snapshots: the flood id when present,
    /// otherwise the area code.
    pub fn key(&self) -> &str {
        self.flood_id.as_deref().unwrap_or(&self.fws_tacode)
    }
}

impl From<&FloodWarning> for WarningRow {
    fn from(w: &FloodWarning) -> Self {
        WarningRow {
            flood_id: w.flood_id.clone(),
            description: w.description.clone(),
            message: w.message.clone(),
            area_name: w.area_name.clone(),
            fws_tacode: w.area_id.clone(),
            severity: w.severity,
            county: w.county.clone(),
            river_or_sea: w.river_sea.clone(),
            time_raised: w.time_raised,
            time_message_changed: w.time_message_changed,
            time_severity_changed: w.time_severity_changed,
        }
    }
}

/// The unified England + Wales warning table for one snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WarningTable {
    pub rows: Vec<WarningRow>,
    /// Rows contributed by each provider, in table order.
    pub per_provider: Vec<(Provider, usize)>,
}

impl WarningTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Table of already-parsed batches: England rows first, then Wales.
    /// Rejections stay with the batches.
    pub fn from_batches(england: &Batch<FloodWarning>, wales: &Batch<FloodWarning>) -> Self {
        let mut table = WarningTable::default();
        for (provider, batch) in [
            (Provider::EnvironmentAgency, england),
            (Provider::NaturalResourcesWales, wales),
        ] {
            table.rows.extend(batch.records.iter().map(WarningRow::from));
            table.per_provider.push((provider, batch.records.len()));
        }
        table
    }
}

/// Builds the unified warning table: EA rows first, then NRW rows.
///
/// EA rows keep warnings with no `riverOrSea` (as an empty string), so
/// coastal warnings appear in the table even though they cannot be joined
/// to stations. Both batches' rejections are returned for reporting.
pub fn build_flood_database(
    ea_payload: &Value,
    nrw_payload: &Value,
) -> Result<(WarningTable, Vec<RejectedRecord>), FloodDataError> {
    let england = build_flood_table_list(ea_payload)?;
    let wales = build_wales_list(nrw_payload)?;
    let table = WarningTable::from_batches(&england, &wales);

    let mut rejected = england.rejected;
    rejected.extend(wales.rejected);
    Ok((table, rejected))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
