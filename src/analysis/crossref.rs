/// Warning → river → station resolution.
///
/// A warning's `river_sea` names zero or more rivers; each river maps to
/// zero or more stations through the river index. The result keeps one
/// entry per warning, in warning order, and one entry per named river, in
/// the order the warning lists them.

use crate::model::{FloodWarning, MonitoringStation};
use crate::stations::{stations_by_river, RiverIndex};

/// A river named by a warning, with the stations on it. `None` means no
/// station in the directory names that river.
pub type RiverStations<'w, 's> = (&'w str, Option<Vec<&'s MonitoringStation>>);

/// Resolves each warning's rivers against the full station set.
pub fn warnings_with_stations<'w, 's>(
    warnings: &'w [FloodWarning],
    stations: &'s [MonitoringStation],
) -> Vec<Vec<RiverStations<'w, 's>>> {
    let index = stations_by_river(stations);
    warnings
        .iter()
        .map(|w| rivers_with_stations(w, &index))
        .collect()
}

/// Resolves one warning against a prebuilt index.
pub fn rivers_with_stations<'w, 's>(
    warning: &'w FloodWarning,
    index: &RiverIndex<'s>,
) -> Vec<RiverStations<'w, 's>> {
    warning
        .rivers()
        .into_iter()
        .map(|river| (river, index.get(river).map(<[_]>::to_vec)))
        .collect()
}

/// The station with the highest relative level among `stations`, skipping
/// stations whose relative level is unavailable.
pub fn highest_relative_level<'s>(
    stations: &[&'s MonitoringStation],
) -> Option<(&'s MonitoringStation, f64)> {
    stations
        .iter()
        .filter_map(|s| s.relative_water_level().map(|level| (*s, level)))
        .fold(None, |best, (s, level)| match best {
            Some((_, top)) if top >= level => best,
            _ => Some((s, level)),
        })
}
