/// Test fixtures: representative payloads from the EA, NRW and SEPA feeds.
///
/// These are structurally faithful but truncated to the fields the parsers
/// read, plus a few they ignore. Each fixture deliberately mixes complete
/// records with the kinds of incomplete ones the live feeds contain.
///
/// EA station list (`/id/stations?...&_view=full`):
///   items[]
///     .@id, .label (string or list of strings), .lat, .long
///     .measures[].@id        — the last measure is used for levels
///     .riverName, .town      — optional
///     .stageScale.typicalRangeLow/High — optional
///
/// EA latest levels (`/id/measures?parameter=level...`):
///   items[].latestReading.measure / .value — latestReading may be absent,
///   or a bare URL string instead of an object.
///
/// EA floods (`/id/floods?min-severity=N`):
///   items[] .@id .description .message .eaAreaName .floodAreaID
///           .severityLevel .floodArea.county .floodArea.riverOrSea
///           .timeRaised .timeMessageChanged .timeSeverityChanged
///
/// NRW warnings (`/floodwarnings/v3/all`): GeoJSON features[].properties
/// with upper-case keys and Unix-millisecond timestamps.
///
/// SEPA floodline page: HTML whose `jQuery.extend(...)` script carries the
/// warning map as a JS object literal.

/// Five usable stations and two incomplete ones.
///
/// - Jesus Lock: complete, consistent range (0.5, 2.0).
/// - Bin Brook: two labels, two measures, inverted range.
/// - Kingston: no typical range.
/// - Teddington: numbers given as strings, no town.
/// - Whitby: no river, partial range.
/// - item 5: no latitude (dropped).
/// - item 6: no measures (dropped).
#[cfg(test)]
pub(crate) fn fixture_station_list_json() -> &'static str {
    r#"{
      "@context": "http://environment.data.gov.uk/flood-monitoring/meta/context.jsonld",
      "items": [
        {
          "@id": "http://environment.data.gov.uk/flood-monitoring/id/stations/E21136",
          "label": "Cam at Jesus Lock",
          "lat": 52.2109,
          "long": 0.1222,
          "riverName": "River Cam",
          "town": "Cambridge",
          "stageScale": { "typicalRangeHigh": 2.0, "typicalRangeLow": 0.5 },
          "measures": [
            { "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/E21136-level-stage-i-15_min-mASD" }
          ]
        },
        {
          "@id": "http://environment.data.gov.uk/flood-monitoring/id/stations/E60502",
          "label": ["Bin Brook", "Bin Brook at Adams Road"],
          "lat": 52.2025,
          "long": 0.0939,
          "riverName": "Bin Brook",
          "town": "Cambridge",
          "stageScale": { "typicalRangeHigh": 1.0, "typicalRangeLow": 2.0 },
          "measures": [
            { "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/E60502-flow--i-15_min-m3_s" },
            { "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/E60502-level-stage-i-15_min-m" }
          ]
        },
        {
          "@id": "http://environment.data.gov.uk/flood-monitoring/id/stations/3400TH",
          "label": "Kingston",
          "lat": 51.4101,
          "long": -0.3086,
          "riverName": "River Thames",
          "town": "Kingston upon Thames",
          "measures": [
            { "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/3400TH-level-stage-i-15_min-mASD" }
          ]
        },
        {
          "@id": "http://environment.data.gov.uk/flood-monitoring/id/stations/3401TH",
          "label": "Teddington Lock",
          "lat": "51.4285",
          "long": "-0.3251",
          "riverName": "River Thames",
          "stageScale": { "typicalRangeHigh": "1.9", "typicalRangeLow": "0.3" },
          "measures": [
            { "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/3401TH-level-stage-i-15_min-mASD" }
          ]
        },
        {
          "@id": "http://environment.data.gov.uk/flood-monitoring/id/stations/E7050",
          "label": "Whitby",
          "lat": 54.4858,
          "long": -0.6149,
          "town": "Whitby",
          "stageScale": { "typicalRangeLow": 1.0 },
          "measures": [
            { "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/E7050-level-tidal_level-i-15_min-mAOD" }
          ]
        },
        {
          "@id": "http://environment.data.gov.uk/flood-monitoring/id/stations/L0001",
          "label": "No Latitude",
          "long": -1.5,
          "riverName": "River Aire",
          "measures": [
            { "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/L0001-level-stage-i-15_min-m" }
          ]
        },
        {
          "@id": "http://environment.data.gov.uk/flood-monitoring/id/stations/L0002",
          "label": "No Measures",
          "lat": 53.8,
          "long": -1.5,
          "riverName": "River Aire",
          "measures": []
        }
      ]
    }"#
}

/// Latest readings for the stations above.
///
/// - Jesus Lock: 1.25 (relative level 0.5).
/// - Bin Brook: 1.5 on its level measure (flow measure ignored).
/// - Kingston: non-numeric value (skipped).
/// - Teddington: integer value 1.
/// - Whitby: not present.
/// - plus an item with no reading and one whose reading is a bare URL.
#[cfg(test)]
pub(crate) fn fixture_latest_levels_json() -> &'static str {
    r#"{
      "items": [
        {
          "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/E21136-level-stage-i-15_min-mASD",
          "latestReading": {
            "dateTime": "2024-01-04T10:00:00Z",
            "measure": "http://environment.data.gov.uk/flood-monitoring/id/measures/E21136-level-stage-i-15_min-mASD",
            "value": 1.25
          }
        },
        {
          "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/E60502-level-stage-i-15_min-m",
          "latestReading": {
            "dateTime": "2024-01-04T10:00:00Z",
            "measure": "http://environment.data.gov.uk/flood-monitoring/id/measures/E60502-level-stage-i-15_min-m",
            "value": 1.5
          }
        },
        {
          "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/3400TH-level-stage-i-15_min-mASD",
          "latestReading": {
            "measure": "http://environment.data.gov.uk/flood-monitoring/id/measures/3400TH-level-stage-i-15_min-mASD",
            "value": "n/a"
          }
        },
        {
          "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/3401TH-level-stage-i-15_min-mASD",
          "latestReading": {
            "measure": "http://environment.data.gov.uk/flood-monitoring/id/measures/3401TH-level-stage-i-15_min-mASD",
            "value": 1
          }
        },
        {
          "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/X1-level-stage-i-15_min-m"
        },
        {
          "@id": "http://environment.data.gov.uk/flood-monitoring/id/measures/X2-level-stage-i-15_min-m",
          "latestReading": "http://environment.data.gov.uk/flood-monitoring/data/readings/X2-level-stage-i-15_min-m/2024-01-04T10-00-00Z"
        }
      ]
    }"#
}

/// EA floods: two complete warnings, one without `riverOrSea`, one
/// without `message`.
#[cfg(test)]
pub(crate) fn fixture_ea_floods_json() -> &'static str {
    r#"{
      "items": [
        {
          "@id": "http://environment.data.gov.uk/flood-monitoring/id/floods/053FWFCAM01",
          "description": "River Cam at Cambridge",
          "eaAreaName": "East Anglia",
          "eaRegionName": "Anglian",
          "floodArea": {
            "@id": "http://environment.data.gov.uk/flood-monitoring/id/floodAreas/053FWFCAM01",
            "county": "Cambridgeshire",
            "notation": "053FWFCAM01",
            "polygon": "http://environment.data.gov.uk/flood-monitoring/id/floodAreas/053FWFCAM01/polygon",
            "riverOrSea": "River Cam, Bin Brook"
          },
          "floodAreaID": "053FWFCAM01",
          "isTidal": false,
          "message": "River levels are rising at Jesus Lock.",
          "severity": "Flood warning",
          "severityLevel": 2,
          "timeMessageChanged": "2024-01-04T10:10:00",
          "timeRaised": "2024-01-04T10:12:03",
          "timeSeverityChanged": "2024-01-04T10:12:00"
        },
        {
          "@id": "http://environment.data.gov.uk/flood-monitoring/id/floods/065WAF423",
          "description": "Thames and Lea in north London",
          "eaAreaName": "Hertfordshire and North London",
          "floodArea": {
            "county": "Greater London",
            "notation": "065WAF423",
            "riverOrSea": "River Thames, River Lea"
          },
          "floodAreaID": "065WAF423",
          "message": "Flooding of low lying land is possible.",
          "severity": "Flood alert",
          "severityLevel": 3,
          "timeMessageChanged": "2024-01-03T16:45:00",
          "timeRaised": "2024-01-03T16:47:30",
          "timeSeverityChanged": "2024-01-03T16:45:00"
        },
        {
          "@id": "http://environment.data.gov.uk/flood-monitoring/id/floods/122WAC953",
          "description": "Coast at Whitby",
          "eaAreaName": "Yorkshire",
          "floodArea": { "county": "North Yorkshire", "notation": "122WAC953" },
          "floodAreaID": "122WAC953",
          "message": "High tides expected.",
          "severityLevel": 3,
          "timeMessageChanged": "2024-01-04T06:00:00",
          "timeRaised": "2024-01-04T06:00:00",
          "timeSeverityChanged": "2024-01-04T06:00:00"
        },
        {
          "@id": "http://environment.data.gov.uk/flood-monitoring/id/floods/034FWFTRBTAM",
          "description": "River Tame at Birmingham",
          "eaAreaName": "West Midlands",
          "floodArea": { "county": "West Midlands", "riverOrSea": "River Tame" },
          "floodAreaID": "034FWFTRBTAM",
          "severityLevel": 2,
          "timeMessageChanged": "2024-01-04T08:00:00",
          "timeRaised": "2024-01-04T08:00:00",
          "timeSeverityChanged": "2024-01-04T08:00:00"
        }
      ]
    }"#
}

/// NRW features: one warning, one alert (filtered), one warning with no
/// FWACODE (dropped), one severe warning with no TIDAL field.
#[cfg(test)]
pub(crate) fn fixture_nrw_features_json() -> &'static str {
    r#"{
      "type": "FeatureCollection",
      "features": [
        {
          "type": "Feature",
          "properties": {
            "SEVERITYVALUE": 2,
            "AREA": "South West",
            "FWACODE": "C201WX",
            "TIMERAISED": 1704362400000,
            "RIM_CHANGED": 1704364200000,
            "SEVERITY_CHANGED": 1704362400000,
            "DESCRIPTION": "River Taff at Pontypridd",
            "RIM_ENGLISH": "Flooding is expected. Immediate action required.",
            "TIDAL": "River Taff"
          }
        },
        {
          "type": "Feature",
          "properties": {
            "SEVERITYVALUE": 3,
            "AREA": "North West",
            "FWACODE": "A310",
            "TIMERAISED": 1704362400000,
            "RIM_CHANGED": 1704362400000,
            "SEVERITY_CHANGED": 1704362400000,
            "DESCRIPTION": "Lower Dee Valley",
            "RIM_ENGLISH": "Flooding is possible.",
            "TIDAL": "River Dee"
          }
        },
        {
          "type": "Feature",
          "properties": {
            "SEVERITYVALUE": 2,
            "AREA": "South East",
            "TIMERAISED": 1704362400000,
            "RIM_CHANGED": 1704362400000,
            "SEVERITY_CHANGED": 1704362400000,
            "DESCRIPTION": "River Usk at Abergavenny",
            "RIM_ENGLISH": "Flooding is expected."
          }
        },
        {
          "type": "Feature",
          "properties": {
            "SEVERITYVALUE": 1,
            "AREA": "North",
            "FWACODE": "C310",
            "TIMERAISED": 1704067200000,
            "RIM_CHANGED": 1704067200000,
            "SEVERITY_CHANGED": 1704070800000,
            "DESCRIPTION": "Conwy at Llanrwst",
            "RIM_ENGLISH": "Danger to life."
          }
        }
      ]
    }"#
}

/// SEPA floodline page. The third script carries the warning map:
///
/// - 12345 Tay at Perth: flood warning, square polygon.
/// - 2222 Dumfries: flood alert (filtered).
/// - 3333 Aberdeen: no mtype (dropped).
/// - 4444 Stonehaven: severe flood warning.
/// - 5555 Broken: warning with a two-point outline (rejected).
#[cfg(test)]
pub(crate) fn fixture_sepa_page_html() -> &'static str {
    r##"<!DOCTYPE html>
<html lang="en">
<head>
<title>Flood updates | SEPA Floodline</title>
<script type="text/javascript" src="/misc/jquery.js?v=1.4.4"></script>
<script type="text/javascript">var gaProperty = "UA-0000";</script>
<script type="text/javascript">
<!--//--><![CDATA[//><!--
jQuery.extend(Drupal.settings, { "basePath": "/", "floodwarningMap": { "areas": [
  { "id": 12345, "name": "River Tay at Perth", "mtype": "flood warning", "x": "310000,311000,311000,310000", "y": "720000,720000,721000,721000", "color": "#ff0000", "fontColor": "#ffffff", "borderColor": "#000000", "click": "1", "iType": "poly" },
  { "id": "2222", "name": "Dumfries", "mtype": "flood alert", "x": "297000,298000,298000", "y": "575000,575000,576000", "color": "#ffa500", "fontColor": "#000000", "borderColor": "#000000", "click": "1", "iType": "poly" },
  { "id": "3333", "name": "Aberdeen", "mtype": null, "x": "394000,395000,395000", "y": "806000,806000,807000", "color": "#cccccc", "fontColor": "#000000", "borderColor": "#000000", "click": "0", "iType": "poly" },
  { "id": "4444", "name": "Stonehaven", "mtype": "severe flood warning", "x": "387000,388000,388000,387000,387000", "y": "785000,785000,786000,786000,785000", "color": "#990000", "fontColor": "#ffffff", "borderColor": "#000000", "click": "1", "iType": "poly" },
  { "id": "5555", "name": "Broken", "mtype": "flood warning", "x": "1,2", "y": "1,2", "color": "#ff0000", "fontColor": "#ffffff", "borderColor": "#000000", "click": "1", "iType": "poly" }
] } });
//--><!]]>
</script>
</head>
<body><div id="floodwarning-map"></div></body>
</html>"##
}
