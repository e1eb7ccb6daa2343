/// SEPA Floodline scraper.
///
/// SEPA does not publish a warnings API. The Floodline "flood updates" page
/// embeds its warning map as a JavaScript object literal passed to
/// `jQuery.extend(...)` inside a `<script>` element. Each entry in
/// `floodwarningMap.areas` describes a warning area: its code, name,
/// message type (`mtype`) and outline as two comma-separated coordinate
/// strings (`x`, `y`) in British National Grid metres.
///
/// Page: https://floodline.sepa.org.uk/floodupdates/

use serde_json::Value;

use crate::geo::polygon_from_coordinate_strings;
use crate::ingest::record::RecordReader;
use crate::model::{Batch, FloodArea, FloodDataError, Provider, RejectedRecord};

pub const SEPA_URL: &str = "https://floodline.sepa.org.uk/floodupdates/#tabset-tab-2";

/// Substring identifying the script that carries the warning map.
pub const SCRIPT_MARKER: &str = "jQuery.extend";

/// Severity assigned to every SEPA warning area; the page only
/// distinguishes warnings from alerts by `mtype`.
pub const SEPA_WARNING_SEVERITY: u8 = 2;

// ---------------------------------------------------------------------------
// Script extraction
// ---------------------------------------------------------------------------

/// Returns the `<script ...>...</script>` elements of an HTML document in
/// document order, tags included.
pub fn script_elements(html: &str) -> Vec<&str> {
    let lower = html.to_ascii_lowercase();
    let mut scripts = Vec::new();
    let mut pos = 0;

    while let Some(start) = lower[pos..].find("<script").map(|i| i + pos) {
        let end = match lower[start..].find("</script>") {
            Some(i) => start + i + "</script>".len(),
            None => html.len(),
        };
        scripts.push(&html[start..end]);
        pos = end;
    }

    scripts
}

/// Cuts the object literal out of the marker script: from the first `"{ "`
/// up to, not including, the last `")"`.
pub fn extract_object_literal(script: &str) -> Result<&str, FloodDataError> {
    let start = script
        .find("{ ")
        .ok_or_else(|| FloodDataError::Parse("no '{ ' in warning-map script".to_string()))?;
    let end = script
        .rfind(')')
        .ok_or_else(|| FloodDataError::Parse("no ')' in warning-map script".to_string()))?;
    if end <= start {
        return Err(FloodDataError::Parse(
            "warning-map script closes before its object literal opens".to_string(),
        ));
    }
    Ok(&script[start..end])
}

/// Locates the marker script in the page and parses its object literal.
///
/// # Errors
/// - `FloodDataError::ScriptNotFound` — no script contains `jQuery.extend`.
/// - `FloodDataError::Parse` / `Json` — the literal could not be cut out or
///   is not valid JSON.
pub fn parse_warning_map(html: &str) -> Result<Value, FloodDataError> {
    let script = script_elements(html)
        .into_iter()
        .find(|s| s.contains(SCRIPT_MARKER))
        .ok_or_else(|| FloodDataError::ScriptNotFound(SCRIPT_MARKER.to_string()))?;

    let literal = extract_object_literal(script)?;
    Ok(serde_json::from_str(literal)?)
}

// ---------------------------------------------------------------------------
// Area parsing
// ---------------------------------------------------------------------------

/// Parses the SEPA page into warning areas with polygon outlines.
///
/// Areas without an `mtype` are rejected. Areas whose `mtype` does not
/// contain `"warning"` (alerts) are skipped. Warning areas whose outline
/// cannot form a polygon are rejected.
pub fn parse_warning_areas(html: &str) -> Result<Batch<FloodArea>, FloodDataError> {
    let map = parse_warning_map(html)?;
    let areas = map
        .get("floodwarningMap")
        .and_then(|m| m.get("areas"))
        .and_then(Value::as_array)
        .ok_or_else(|| {
            FloodDataError::Parse("SEPA warning map has no 'floodwarningMap.areas' array".to_string())
        })?;

    let mut batch = Batch::new();

    for (index, area) in areas.iter().enumerate() {
        let mut r = RecordReader::new(area);

        let Some(mtype) = r.required_str(&["mtype"]) else {
            batch.rejected.push(RejectedRecord {
                provider: Provider::Sepa,
                index,
                id: r.optional_str(&["id"]),
                issues: r.finish(),
            });
            continue;
        };
        if !mtype.contains("warning") {
            continue;
        }

        let code = r.required_str(&["id"]);
        let name = r.required_str(&["name"]);
        let xs = r.required_str(&["x"]);
        let ys = r.required_str(&["y"]);
        let polygon = match (&xs, &ys) {
            (Some(xs), Some(ys)) => match polygon_from_coordinate_strings(xs, ys) {
                Ok(p) => Some(p),
                Err(reason) => {
                    r.reject(&["x", "y"], reason);
                    None
                }
            },
            _ => None,
        };

        let id_hint = r.optional_str(&["id"]);
        let issues = r.finish();

        match (code, name, polygon) {
            (Some(code), Some(name), Some(polygon)) => batch.records.push(FloodArea {
                provider: Provider::Sepa,
                code,
                area_name: format!("Scotland: {}", name),
                name,
                severity: SEPA_WARNING_SEVERITY,
                polygon: Some(polygon),
            }),
            _ => batch.rejected.push(RejectedRecord {
                provider: Provider::Sepa,
                index,
                id: id_hint,
                issues,
            }),
        }
    }

    Ok(batch)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
