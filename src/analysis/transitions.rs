/// Severity-change detection across archived snapshots.
///
/// The history is a flat list of `(id, severity, snapshot time)`
/// observations, one per warning per snapshot. A warning has changed when
/// it was observed at more than one severity.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};

/// One warning's severity as seen in one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeverityObservation {
    pub flood_id: String,
    pub severity: u8,
    pub snapshot_time: DateTime<Utc>,
}

/// Net movement of a warning's severity between its first and latest
/// observation. Lower severity numbers are more severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Escalated,
    Downgraded,
    /// Changed at some point but ended where it started.
    Fluctuated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeverityTransition {
    pub flood_id: String,
    pub first: u8,
    pub latest: u8,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    /// Number of consecutive observations whose severity differs.
    pub changes: usize,
    pub direction: Direction,
}

/// Every id observed at more than one distinct severity.
pub fn severity_changed(history: &[SeverityObservation]) -> BTreeSet<String> {
    let mut seen: BTreeMap<&str, BTreeSet<u8>> = BTreeMap::new();
    for obs in history {
        seen.entry(obs.flood_id.as_str()).or_default().insert(obs.severity);
    }
    seen.into_iter()
        .filter(|(_, severities)| severities.len() > 1)
        .map(|(id, _)| id.to_string())
        .collect()
}

/// Chronological summary for every changed id, ordered by id.
///
/// Observations are ordered by snapshot time; equal times keep history
/// order.
pub fn severity_transitions(history: &[SeverityObservation]) -> Vec<SeverityTransition> {
    let mut by_id: BTreeMap<&str, Vec<&SeverityObservation>> = BTreeMap::new();
    for obs in history {
        by_id.entry(obs.flood_id.as_str()).or_default().push(obs);
    }

    by_id
        .into_iter()
        .filter_map(|(id, mut observed)| {
            observed.sort_by_key(|o| o.snapshot_time);
            let first = *observed.first()?;
            let last = *observed.last()?;
            let changes = observed
                .windows(2)
                .filter(|pair| pair[0].severity != pair[1].severity)
                .count();
            if changes == 0 {
                return None;
            }
            let direction = match last.severity.cmp(&first.severity) {
                std::cmp::Ordering::Less => Direction::Escalated,
                std::cmp::Ordering::Greater => Direction::Downgraded,
                std::cmp::Ordering::Equal => Direction::Fluctuated,
            };
            Some(SeverityTransition {
                flood_id: id.to_string(),
                first: first.severity,
                latest: last.severity,
                first_seen: first.snapshot_time,
                last_seen: last.snapshot_time,
                changes,
                direction,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn obs(id: &str, severity: u8, hour: u32) -> SeverityObservation {
        SeverityObservation {
            flood_id: id.to_string(),
            severity,
            snapshot_time: Utc.with_ymd_and_hms(2024, 1, 4, hour, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_severity_changed_single_id() {
        let history = vec![obs("A", 3, 1), obs("A", 2, 2), obs("B", 2, 1), obs("B", 2, 2)];
        let changed = severity_changed(&history);
        assert_eq!(changed.into_iter().collect::<Vec<_>>(), vec!["A".to_string()]);
    }

    #[test]
    fn test_severity_changed_reports_every_changed_id() {
        let history = vec![
            obs("A", 3, 1),
            obs("A", 2, 2),
            obs("B", 2, 1),
            obs("C", 1, 1),
            obs("C", 2, 2),
        ];
        let changed: Vec<String> = severity_changed(&history).into_iter().collect();
        assert_eq!(changed, vec!["A", "C"]);
    }

    #[test]
    fn test_severity_changed_empty_history() {
        assert!(severity_changed(&[]).is_empty());
        assert!(severity_transitions(&[]).is_empty());
    }

    #[test]
    fn test_transitions_direction() {
        let history = vec![
            obs("up", 3, 1),
            obs("up", 1, 2),
            obs("down", 1, 1),
            obs("down", 2, 2),
            obs("flip", 2, 1),
            obs("flip", 1, 2),
            obs("flip", 2, 3),
            obs("steady", 2, 1),
            obs("steady", 2, 2),
        ];
        let transitions = severity_transitions(&history);
        let summary: Vec<(&str, Direction, usize)> = transitions
            .iter()
            .map(|t| (t.flood_id.as_str(), t.direction, t.changes))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("down", Direction::Downgraded, 1),
                ("flip", Direction::Fluctuated, 2),
                ("up", Direction::Escalated, 1),
            ]
        );
    }

    #[test]
    fn test_transitions_order_by_snapshot_time() {
        // Archive appended out of order: the 05:00 observation is the latest.
        let history = vec![obs("A", 1, 5), obs("A", 3, 1), obs("A", 2, 3)];
        let t = &severity_transitions(&history)[0];
        assert_eq!((t.first, t.latest), (3, 1));
        assert_eq!(t.direction, Direction::Escalated);
        assert_eq!(t.first_seen, Utc.with_ymd_and_hms(2024, 1, 4, 1, 0, 0).unwrap());
        assert_eq!(t.last_seen, Utc.with_ymd_and_hms(2024, 1, 4, 5, 0, 0).unwrap());
        assert_eq!(t.changes, 2);
    }
}
