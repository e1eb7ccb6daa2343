/// Integration tests for the warning archive
///
/// These tests verify:
/// 1. Snapshots taken at different times append to one JSON-lines archive
/// 2. Reloading the archive yields every row in order
/// 3. Severity changes are detected across snapshots, for every changed warning
/// 4. Wales warnings (no flood id) are tracked by area code

use floodwatch::analysis::transitions::{severity_changed, severity_transitions, Direction};
use floodwatch::history::{append_history, load_history, observations};
use floodwatch::snapshot::{build_snapshot, FeedPayloads};

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

const SEPA_PAGE: &str = r#"<script>jQuery.extend(Drupal.settings, { "floodwarningMap": { "areas": [] } });</script>"#;

fn ea_warning(area: &str, river: &str, severity: u8) -> serde_json::Value {
    json!({
        "@id": format!("http://environment.data.gov.uk/flood-monitoring/id/floods/{}", area),
        "description": format!("{} warning area", river),
        "message": "Flooding is possible.",
        "eaAreaName": "Anglian",
        "floodAreaID": area,
        "severityLevel": severity,
        "floodArea": { "county": "Cambridgeshire", "riverOrSea": river },
        "timeRaised": "2024-03-01T06:00:00",
        "timeMessageChanged": "2024-03-01T06:00:00",
        "timeSeverityChanged": "2024-03-01T06:00:00"
    })
}

fn wales_warning(code: &str, severity: u8) -> serde_json::Value {
    json!({
        "properties": {
            "AREA": "South East",
            "FWACODE": code,
            "DESCRIPTION": "River Usk at Abergavenny",
            "RIM_ENGLISH": "Flooding expected.",
            "SEVERITYVALUE": severity,
            "TIDAL": "River Usk",
            "TIMERAISED": 1709272800000i64,
            "RIM_CHANGED": 1709272800000i64,
            "SEVERITY_CHANGED": 1709272800000i64
        }
    })
}

/// One snapshot's payloads: Cam and Ouse warnings from the EA, Usk from NRW.
fn payloads(cam: u8, ouse: u8, usk: u8) -> FeedPayloads {
    FeedPayloads {
        stations: json!({ "items": [] }),
        levels: json!({ "items": [] }),
        england: json!({
            "items": [ea_warning("033FWF3CAM", "River Cam", cam), ea_warning("034FWF3OUSE", "River Great Ouse", ouse)]
        }),
        wales: json!({ "features": [wales_warning("C401", usk)] }),
        scotland: SEPA_PAGE.to_string(),
    }
}

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
}

#[test]
fn test_archive_accumulates_snapshots() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("warnings.jsonl");

    for (hour, cam) in [(6, 3), (7, 2)] {
        let snapshot = build_snapshot(&payloads(cam, 2, 2), at(hour)).unwrap();
        assert_eq!(append_history(&path, &snapshot.history_rows()).unwrap(), 3);
    }

    let rows = load_history(&path).unwrap();
    assert_eq!(rows.len(), 6);
    assert!(rows[..3].iter().all(|r| r.snapshot_time == at(6)));
    assert!(rows[3..].iter().all(|r| r.snapshot_time == at(7)));
    assert_eq!(rows[2].row.fws_tacode, "C401");
    assert_eq!(rows[2].row.area_name, "South East Wales");
}

#[test]
fn test_every_changed_warning_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history").join("warnings.jsonl");

    // Cam escalates, Ouse stays put, Usk is downgraded.
    let first = build_snapshot(&payloads(3, 2, 1), at(6)).unwrap();
    let second = build_snapshot(&payloads(2, 2, 2), at(9)).unwrap();
    append_history(&path, &first.history_rows()).unwrap();
    append_history(&path, &second.history_rows()).unwrap();

    let obs = observations(&load_history(&path).unwrap());
    let changed: Vec<String> = severity_changed(&obs).into_iter().collect();
    assert_eq!(
        changed,
        vec![
            "C401".to_string(),
            "http://environment.data.gov.uk/flood-monitoring/id/floods/033FWF3CAM".to_string(),
        ]
    );

    let transitions = severity_transitions(&obs);
    let summary: Vec<(&str, u8, u8, Direction)> = transitions
        .iter()
        .map(|t| (t.flood_id.as_str(), t.first, t.latest, t.direction))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("C401", 1, 2, Direction::Downgraded),
            (
                "http://environment.data.gov.uk/flood-monitoring/id/floods/033FWF3CAM",
                3,
                2,
                Direction::Escalated
            ),
        ]
    );
}

#[test]
fn test_unchanged_archive_reports_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("warnings.jsonl");
    for hour in [6, 7, 8] {
        let snapshot = build_snapshot(&payloads(2, 2, 2), at(hour)).unwrap();
        append_history(&path, &snapshot.history_rows()).unwrap();
    }
    let obs = observations(&load_history(&path).unwrap());
    assert_eq!(obs.len(), 9);
    assert!(severity_changed(&obs).is_empty());
}
