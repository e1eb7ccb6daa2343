/// Environment Agency flood-monitoring API client.
///
/// Handles URL construction for the EA real-time flood-monitoring REST API
/// and parsing of its flood-warning payload:
///   https://environment.data.gov.uk/flood-monitoring/doc/reference
///
/// Station and latest-level payloads come from the same API but are parsed
/// by the station directory (`crate::stations`). See `fixtures.rs` for
/// annotated examples of each response shape.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use crate::ingest::record::RecordReader;
use crate::model::{Batch, FloodDataError, FloodWarning, Provider, RejectedRecord};

pub const EA_ROOT_URL: &str = "https://environment.data.gov.uk/flood-monitoring/";

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Active stage-level monitoring stations, full view (includes typical ranges).
pub fn build_stations_url(root_url: &str) -> String {
    format!(
        "{}id/stations?status=Active&parameter=level&qualifier=Stage&_view=full",
        root_url
    )
}

/// Latest readings for every level measure.
pub fn build_latest_levels_url(root_url: &str) -> String {
    format!(
        "{}id/measures?parameter=level&qualifier=Stage&qualifier=level",
        root_url
    )
}

/// Current flood warnings at or above `min_severity` (1 = most severe).
pub fn build_floods_url(root_url: &str, min_severity: u8) -> String {
    format!("{}id/floods?min-severity={}", root_url, min_severity)
}

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

/// Parses an EA timestamp such as `"2024-01-04T10:12:03"` by fixed character
/// offsets: year [0:4], month [5:7], day [8:10], hour [11:13], minute
/// [14:16], and the leading digits from offset 17 as seconds. Any suffix
/// after the seconds (fraction, `Z`) is ignored and the result is taken as UTC.
pub fn datetime_from_string(s: &str) -> Result<DateTime<Utc>, String> {
    let field = |start: usize, end: usize| -> Result<u32, String> {
        s.get(start..end)
            .ok_or_else(|| format!("timestamp '{}' is too short", s))?
            .parse::<u32>()
            .map_err(|e| format!("bad timestamp '{}': {}", s, e))
    };

    let year = field(0, 4)? as i32;
    let month = field(5, 7)?;
    let day = field(8, 10)?;
    let hour = field(11, 13)?;
    let minute = field(14, 16)?;

    let tail = s.get(17..).unwrap_or("");
    let digits: String = tail.chars().take_while(|c| c.is_ascii_digit()).collect();
    let second = digits
        .parse::<u32>()
        .map_err(|_| format!("timestamp '{}' has no seconds", s))?;

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, second))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| format!("timestamp '{}' is out of range", s))
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// How to treat a warning whose flood area names no river or sea.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiverOrSea {
    /// Drop the warning: it cannot be joined to stations.
    Required,
    /// Keep the warning with an empty `river_sea`.
    DefaultEmpty,
}

/// Returns the `items` array of an EA envelope.
pub fn items(payload: &Value) -> Result<&Vec<Value>, FloodDataError> {
    payload
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| FloodDataError::Parse("EA payload has no 'items' array".to_string()))
}

/// Parses an EA `/id/floods` payload into `FloodWarning`s.
///
/// Every warning must carry message, description, id, area name, area id,
/// severity, county and all three timestamps; `floodArea.riverOrSea` is
/// governed by `river_or_sea`. Incomplete items are returned in
/// `Batch::rejected` and never fail the batch.
///
/// # Errors
/// - `FloodDataError::Parse` — the payload has no `items` array.
pub fn parse_flood_warnings(
    payload: &Value,
    river_or_sea: RiverOrSea,
) -> Result<Batch<FloodWarning>, FloodDataError> {
    let mut batch = Batch::new();

    for (index, item) in items(payload)?.iter().enumerate() {
        let mut r = RecordReader::new(item);

        let flood_id = r.required_str(&["@id"]);
        let message = r.required_str(&["message"]);
        let description = r.required_str(&["description"]);
        let area_name = r.required_str(&["eaAreaName"]);
        let area_id = r.required_str(&["floodAreaID"]);
        let severity = r.required_u8(&["severityLevel"]);
        let county = r.required_str(&["floodArea", "county"]);
        let river_sea = match river_or_sea {
            RiverOrSea::Required => r.required_str(&["floodArea", "riverOrSea"]),
            RiverOrSea::DefaultEmpty => {
                Some(r.optional_str(&["floodArea", "riverOrSea"]).unwrap_or_default())
            }
        };
        let time_raised = timestamp(&mut r, "timeRaised");
        let time_message_changed = timestamp(&mut r, "timeMessageChanged");
        let time_severity_changed = timestamp(&mut r, "timeSeverityChanged");

        let id_hint = r
            .optional_str(&["floodAreaID"])
            .or_else(|| r.optional_str(&["description"]));
        let issues = r.finish();

        match (
            flood_id,
            message,
            description,
            area_name,
            area_id,
            severity,
            county,
            river_sea,
            time_raised,
            time_message_changed,
            time_severity_changed,
        ) {
            (
                Some(flood_id),
                Some(message),
                Some(description),
                Some(area_name),
                Some(area_id),
                Some(severity),
                Some(county),
                Some(river_sea),
                Some(time_raised),
                Some(time_message_changed),
                Some(time_severity_changed),
            ) if issues.is_empty() => batch.records.push(FloodWarning {
                provider: Provider::EnvironmentAgency,
                flood_id: Some(flood_id),
                message,
                description,
                area_name,
                area_id,
                river_sea,
                severity,
                county: Some(county),
                time_raised,
                time_message_changed,
                time_severity_changed,
            }),
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

fn timestamp(r: &mut RecordReader<'_>, field: &'static str) -> Option<DateTime<Utc>> {
    let raw = r.required_str(&[field])?;
    match datetime_from_string(&raw) {
        Ok(dt) => Some(dt),
        Err(reason) => {
            r.reject(&[field], reason);
            None
        }
    }
}

/// True when an EA floods payload lists at least one warning.
pub fn has_items(payload: &Value) -> bool {
    payload
        .get("items")
        .and_then(Value::as_array)
        .is_some_and(|items| !items.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
