/// Station directory: builds the in-memory station collection from the EA
/// station payload, attaches latest levels, and answers river- and
/// distance-indexed lookups.
///
/// Provider station records are frequently incomplete. Optional fields
/// (town, river, typical range) simply come out as `None`; a record without
/// an id, a level measure, a label or a position is dropped from the batch
/// and reported, never aborting the rest of the build.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use serde_json::Value;

use crate::geo::haversine_km;
use crate::ingest::ea;
use crate::ingest::record::RecordReader;
use crate::model::{
    Batch, Coordinate, FloodDataError, MonitoringStation, Provider, RejectedRecord, TypicalRange,
};
use crate::utils::sorted_by_key;

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

/// Builds the station list from an EA `/id/stations` payload.
///
/// - `station_id` from `@id`
/// - `measure_id` from the `@id` of the *last* entry in `measures`
/// - `name` from `label`; when the provider returns a list of labels only
///   the first is kept
/// - `coord` from `lat` / `long` (numbers or numeric strings)
/// - `typical_range` from `stageScale.typicalRangeLow/High`, absent unless
///   both bounds are numeric
/// - `river` / `town` from `riverName` / `town`, absent when missing
///
/// # Errors
/// - `FloodDataError::Parse` — the payload has no `items` array.
pub fn build_station_list(payload: &Value) -> Result<Batch<MonitoringStation>, FloodDataError> {
    let mut batch = Batch::new();

    for (index, item) in ea::items(payload)?.iter().enumerate() {
        let mut r = RecordReader::new(item);

        let station_id = r.required_str(&["@id"]);
        let measure_id = last_measure_id(&mut r);
        let name = label(&mut r);
        let lat = r.required_f64(&["lat"]);
        let long = r.required_f64(&["long"]);

        let typical_range = match (
            r.optional_f64(&["stageScale", "typicalRangeLow"]),
            r.optional_f64(&["stageScale", "typicalRangeHigh"]),
        ) {
            (Some(low), Some(high)) => Some(TypicalRange::new(low, high)),
            _ => None,
        };
        let river = r.optional_str(&["riverName"]);
        let town = r.optional_str(&["town"]);

        let id_hint = r.optional_str(&["@id"]);
        let issues = r.finish();

        match (station_id, measure_id, name, lat, long) {
            (Some(station_id), Some(measure_id), Some(name), Some(lat), Some(long)) => {
                batch.records.push(MonitoringStation::new(
                    station_id,
                    measure_id,
                    name,
                    Coordinate::new(lat, long),
                    typical_range,
                    river,
                    town,
                ))
            }
            _ => batch.rejected.push(RejectedRecord {
                provider: Provider::EnvironmentAgency,
                index,
                id: id_hint,
                issues,
            }),
        }
    }

    Ok(batch)
}

fn last_measure_id(r: &mut RecordReader<'_>) -> Option<String> {
    let measures = r.lookup(&["measures"]).and_then(Value::as_array);
    match measures.and_then(|m| m.last()) {
        Some(last) => match last.get("@id").and_then(Value::as_str) {
            Some(id) => Some(id.to_string()),
            None => {
                r.reject(&["measures", "@id"], "last measure has no id");
                None
            }
        },
        None => {
            r.reject(&["measures"], "no measures listed");
            None
        }
    }
}

fn label(r: &mut RecordReader<'_>) -> Option<String> {
    match r.lookup(&["label"]) {
        Some(Value::Array(labels)) => match labels.first().and_then(Value::as_str) {
            Some(first) => Some(first.to_string()),
            None => {
                r.reject(&["label"], "label list has no text entry");
                None
            }
        },
        _ => r.required_str(&["label"]),
    }
}

// ---------------------------------------------------------------------------
// Levels
// ---------------------------------------------------------------------------

/// Maps measure id to latest numeric reading from an EA `/id/measures`
/// payload. Items without a `latestReading` object, a measure id or a
/// numeric value are skipped. If a measure appears twice the last wins.
///
/// # Errors
/// - `FloodDataError::Parse` — the payload has no `items` array.
pub fn latest_readings(payload: &Value) -> Result<HashMap<String, f64>, FloodDataError> {
    let mut readings = HashMap::new();

    for item in ea::items(payload)? {
        let Some(reading) = item.get("latestReading").filter(|r| r.is_object()) else {
            continue;
        };
        let measure = reading.get("measure").and_then(Value::as_str);
        let value = reading.get("value").and_then(Value::as_f64);
        if let (Some(measure), Some(value)) = (measure, value) {
            readings.insert(measure.to_string(), value);
        }
    }

    Ok(readings)
}

/// Attaches the latest readings in `payload` to `stations`.
///
/// Every station's level is first reset to `None`, then set only if its
/// measure has a numeric reading in this payload, so a station missing
/// from a refresh never keeps a stale level. Returns the number of stations
/// that received a level.
///
/// # Errors
/// - `FloodDataError::Parse` — the payload has no `items` array. Levels are
///   left untouched in that case.
pub fn update_water_levels(
    stations: &mut [MonitoringStation],
    payload: &Value,
) -> Result<usize, FloodDataError> {
    let readings = latest_readings(payload)?;
    Ok(apply_readings(stations, &readings))
}

/// Reset-then-repopulate step of [`update_water_levels`], for callers that
/// already hold a measure → value map.
pub fn apply_readings(stations: &mut [MonitoringStation], readings: &HashMap<String, f64>) -> usize {
    let mut updated = 0;
    for station in stations.iter_mut() {
        let level = readings.get(&station.measure_id).copied();
        if level.is_some() {
            updated += 1;
        }
        station.set_latest_level(level);
    }
    updated
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// Stations grouped by exact river name (case-sensitive, untrimmed).
///
/// Stations with no river are kept in a separate group, so flattening the
/// index reproduces the input set. Within a group, stations keep their
/// input order.
#[derive(Debug, Clone, Default)]
pub struct RiverIndex<'a> {
    by_river: BTreeMap<&'a str, Vec<&'a MonitoringStation>>,
    without_river: Vec<&'a MonitoringStation>,
}

impl<'a> RiverIndex<'a> {
    /// Stations on `river`, or `None` when no station names that river.
    pub fn get(&self, river: &str) -> Option<&[&'a MonitoringStation]> {
        self.by_river.get(river).map(Vec::as_slice)
    }

    /// Stations whose provider record named no river.
    pub fn without_river(&self) -> &[&'a MonitoringStation] {
        &self.without_river
    }

    /// Indexed river names in sorted order.
    pub fn rivers(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.by_river.keys().copied()
    }

    /// Number of distinct river names indexed.
    pub fn river_count(&self) -> usize {
        self.by_river.len()
    }

    /// Each group keyed by river, followed by the no-river group (`None`)
    /// when it is non-empty.
    pub fn iter(&self) -> impl Iterator<Item = (Option<&'a str>, &[&'a MonitoringStation])> + '_ {
        let unassigned = (!self.without_river.is_empty())
            .then(|| (None, self.without_river.as_slice()));
        self.by_river
            .iter()
            .map(|(river, group)| (Some(*river), group.as_slice()))
            .chain(unassigned)
    }

    /// Every indexed station, grouped by river.
    pub fn stations(&self) -> impl Iterator<Item = &'a MonitoringStation> + '_ {
        self.by_river
            .values()
            .flatten()
            .chain(self.without_river.iter())
            .copied()
    }
}

/// Groups stations by river name.
pub fn stations_by_river(stations: &[MonitoringStation]) -> RiverIndex<'_> {
    let mut index = RiverIndex::default();
    for station in stations {
        match station.river.as_deref() {
            Some(river) => index.by_river.entry(river).or_default().push(station),
            None => index.without_river.push(station),
        }
    }
    index
}

/// Every station paired with its great-circle distance (km) from `point`,
/// nearest first. Ties keep input order.
pub fn stations_by_distance(
    stations: &[MonitoringStation],
    point: Coordinate,
) -> Vec<(&MonitoringStation, f64)> {
    let with_distance = stations
        .iter()
        .map(|s| (s, haversine_km(point, s.coord)))
        .collect();
    sorted_by_key(with_distance, |(_, d)| *d, false)
}

/// Stations whose typical range is absent or inverted.
pub fn inconsistent_typical_range_stations(
    stations: &[MonitoringStation],
) -> Vec<&MonitoringStation> {
    stations
        .iter()
        .filter(|s| !s.typical_range_consistent())
        .collect()
}

// ---------------------------------------------------------------------------
// Tabular form
// ---------------------------------------------------------------------------

/// One station flattened for persistence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationRow {
    pub station_id: String,
    pub measure_id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub typical_low: Option<f64>,
    pub typical_high: Option<f64>,
    pub river: Option<String>,
    pub town: Option<String>,
    pub latest_level: Option<f64>,
}

impl From<&MonitoringStation> for StationRow {
    fn from(s: &MonitoringStation) -> Self {
        StationRow {
            station_id: s.station_id.clone(),
            measure_id: s.measure_id.clone(),
            name: s.name.clone(),
            latitude: s.coord.latitude,
            longitude: s.coord.longitude,
            typical_low: s.typical_range.map(|r| r.low),
            typical_high: s.typical_range.map(|r| r.high),
            river: s.river.clone(),
            town: s.town.clone(),
            latest_level: s.latest_level(),
        }
    }
}

/// Flattens stations into rows, one per station, in input order.
pub fn build_station_database(stations: &[MonitoringStation]) -> Vec<StationRow> {
    stations.iter().map(StationRow::from).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
