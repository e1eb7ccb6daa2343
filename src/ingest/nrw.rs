/// Natural Resources Wales flood warnings API client.
///
/// The NRW feed is a GeoJSON-like `FeatureCollection`; each feature's
/// `properties` carries one warning with upper-case field names and Unix
/// millisecond timestamps.
///
/// API: https://api.naturalresources.wales/floodwarnings/v3/all
/// Requires an `Ocp-Apim-Subscription-Key` header.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::ingest::record::RecordReader;
use crate::model::{Batch, FloodDataError, FloodWarning, Provider, RejectedRecord};

pub const NRW_URL: &str = "https://api.naturalresources.wales/floodwarnings/v3/all";

/// Header carrying the NRW API subscription key.
pub const NRW_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Only warnings at or above this severity are kept (lower is more severe).
pub const NRW_MAX_SEVERITY: u8 = 2;

/// Converts a Unix timestamp in milliseconds to a UTC datetime.
pub fn datetime_from_unix_ms(ms: i64) -> Option<DateTime<Utc>> {
    let secs = ms.div_euclid(1000);
    let nanos = (ms.rem_euclid(1000) * 1_000_000) as u32;
    DateTime::from_timestamp(secs, nanos)
}

/// Parses the NRW feature collection into `FloodWarning`s.
///
/// Features with `SEVERITYVALUE > 2` (alerts and "no longer in force") are
/// discarded before validation and do not appear in `Batch::rejected`.
/// Field mapping onto the shared warning shape:
///
/// | NRW                  | FloodWarning            |
/// |----------------------|-------------------------|
/// | `RIM_ENGLISH`        | `message`               |
/// | `DESCRIPTION`        | `description`           |
/// | `AREA`               | `area_name` ("<AREA> Wales") |
/// | `FWACODE`            | `area_id`               |
/// | `TIDAL`              | `river_sea` (optional)  |
/// | `SEVERITYVALUE`      | `severity`              |
/// | `TIMERAISED`, `RIM_CHANGED`, `SEVERITY_CHANGED` | timestamps |
///
/// NRW warnings carry no flood id and no county.
///
/// # Errors
/// - `FloodDataError::Parse` — the payload has no `features` array.
pub fn parse_wales_warnings(payload: &Value) -> Result<Batch<FloodWarning>, FloodDataError> {
    let features = payload
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| FloodDataError::Parse("NRW payload has no 'features' array".to_string()))?;

    let mut batch = Batch::new();

    for (index, feature) in features.iter().enumerate() {
        let mut r = RecordReader::new(feature);

        let severity = r.required_u8(&["properties", "SEVERITYVALUE"]);
        if severity.is_some_and(|s| s > NRW_MAX_SEVERITY) {
            continue;
        }

        let area = r.required_str(&["properties", "AREA"]);
        let area_id = r.required_str(&["properties", "FWACODE"]);
        let description = r.required_str(&["properties", "DESCRIPTION"]);
        let message = r.required_str(&["properties", "RIM_ENGLISH"]);
        let river_sea = r.optional_str(&["properties", "TIDAL"]).unwrap_or_default();
        let time_raised = timestamp(&mut r, "TIMERAISED");
        let time_message_changed = timestamp(&mut r, "RIM_CHANGED");
        let time_severity_changed = timestamp(&mut r, "SEVERITY_CHANGED");

        let id_hint = r
            .optional_str(&["properties", "FWACODE"])
            .or_else(|| r.optional_str(&["properties", "DESCRIPTION"]));
        let issues = r.finish();

        match (
            severity,
            area,
            area_id,
            description,
            message,
            time_raised,
            time_message_changed,
            time_severity_changed,
        ) {
            (
                Some(severity),
                Some(area),
                Some(area_id),
                Some(description),
                Some(message),
                Some(time_raised),
                Some(time_message_changed),
                Some(time_severity_changed),
            ) => batch.records.push(FloodWarning {
                provider: Provider::NaturalResourcesWales,
                flood_id: None,
                message,
                description,
                area_name: format!("{} Wales", area),
                area_id,
                river_sea,
                severity,
                county: None,
                time_raised,
                time_message_changed,
                time_severity_changed,
            }),
            _ => batch.rejected.push(RejectedRecord {
                provider: Provider::NaturalResourcesWales,
                index,
                id: id_hint,
                issues,
            }),
        }
    }

    Ok(batch)
}

fn timestamp(r: &mut RecordReader<'_>, field: &'static str) -> Option<DateTime<Utc>> {
    let path = ["properties", field];
    let ms = r.required_i64(&path)?;
    let dt = datetime_from_unix_ms(ms);
    if dt.is_none() {
        r.reject(&path, format!("{} is not a valid timestamp", ms));
    }
    dt
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
