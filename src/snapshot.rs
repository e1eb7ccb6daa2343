/// One-shot snapshot: fetch every feed, build stations and warnings, and
/// cross-reference them.
///
/// The five feeds are independent, so they are fetched concurrently on a
/// small thread pool and gathered over a channel. Any fetch failure fails
/// the snapshot. Everything after the fetch is synchronous and pure.

use std::sync::mpsc;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use threadpool::ThreadPool;
use tracing::{debug, info};

use crate::analysis::crossref::{rivers_with_stations, RiverStations};
use crate::fetch::{FeedClient, JsonSource};
use crate::history::{self, HistoryRow};
use crate::logging::log_batch_summary;
use crate::model::{FloodArea, FloodDataError, FloodWarning, MonitoringStation, Provider, RejectedRecord};
use crate::stations::{self, stations_by_river};
use crate::warnings::{self, WarningTable};

// ---------------------------------------------------------------------------
// Fetch
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    Stations,
    Levels,
    England,
    Wales,
    Scotland,
}

impl Feed {
    pub const ALL: [Feed; 5] = [Feed::Stations, Feed::Levels, Feed::England, Feed::Wales, Feed::Scotland];
}

/// Raw payloads for one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedPayloads {
    pub stations: Value,
    pub levels: Value,
    pub england: Value,
    pub wales: Value,
    pub scotland: String,
}

enum Payload {
    Json(Value),
    Page(String),
}

fn fetch_one<S: JsonSource>(client: &FeedClient<S>, feed: Feed, use_cache: bool) -> Result<Payload, FloodDataError> {
    Ok(match feed {
        Feed::Stations => Payload::Json(client.station_data(use_cache)?),
        Feed::Levels => Payload::Json(client.latest_levels(use_cache)?),
        Feed::England => Payload::Json(client.flood_data(use_cache)?),
        Feed::Wales => Payload::Json(client.wales_data(use_cache)?),
        Feed::Scotland => Payload::Page(client.scotland_page()?),
    })
}

/// Fetches all five feeds concurrently.
///
/// # Errors
/// The first failure received, or `Request` if a worker exits without
/// reporting.
pub fn fetch_feeds<S>(client: Arc<FeedClient<S>>, use_cache: bool) -> Result<FeedPayloads, FloodDataError>
where
    S: JsonSource + 'static,
{
    let pool = ThreadPool::new(Feed::ALL.len());
    let (tx, rx) = mpsc::channel();

    for feed in Feed::ALL {
        let tx = tx.clone();
        let client = Arc::clone(&client);
        pool.execute(move || {
            let result = fetch_one(&client, feed, use_cache);
            // The receiver only goes away once the snapshot has already failed.
            let _ = tx.send((feed, result));
        });
    }
    drop(tx);

    let (mut stations, mut levels, mut england, mut wales, mut scotland) = (None, None, None, None, None);
    for (feed, result) in rx.iter() {
        debug!(?feed, ok = result.is_ok(), "feed fetched");
        match (feed, result?) {
            (Feed::Stations, Payload::Json(v)) => stations = Some(v),
            (Feed::Levels, Payload::Json(v)) => levels = Some(v),
            (Feed::England, Payload::Json(v)) => england = Some(v),
            (Feed::Wales, Payload::Json(v)) => wales = Some(v),
            (Feed::Scotland, Payload::Page(p)) => scotland = Some(p),
            (feed, _) => {
                return Err(FloodDataError::Request(format!("{:?} feed returned the wrong payload kind", feed)));
            }
        }
    }

    let missing = |feed: Feed| FloodDataError::Request(format!("{:?} feed worker exited without a result", feed));
    Ok(FeedPayloads {
        stations: stations.ok_or_else(|| missing(Feed::Stations))?,
        levels: levels.ok_or_else(|| missing(Feed::Levels))?,
        england: england.ok_or_else(|| missing(Feed::England))?,
        wales: wales.ok_or_else(|| missing(Feed::Wales))?,
        scotland: scotland.ok_or_else(|| missing(Feed::Scotland))?,
    })
}

// ---------------------------------------------------------------------------
// Build
// ---------------------------------------------------------------------------

/// Everything derived from one set of payloads.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub taken_at: DateTime<Utc>,
    pub stations: Vec<MonitoringStation>,
    /// Stations that received a level reading.
    pub levels_applied: usize,
    /// England warnings that name a river or sea.
    pub flood_list: Vec<FloodWarning>,
    pub wales_list: Vec<FloodWarning>,
    /// Unified England + Wales table.
    pub table: WarningTable,
    pub scotland: Vec<FloodArea>,
    pub rejected: Vec<RejectedRecord>,
}

/// Builds a snapshot from fetched payloads, logging each batch's health.
pub fn build_snapshot(payloads: &FeedPayloads, taken_at: DateTime<Utc>) -> Result<Snapshot, FloodDataError> {
    let station_batch = stations::build_station_list(&payloads.stations)?;
    log_batch_summary("stations", Provider::EnvironmentAgency, &station_batch);
    let mut station_list = station_batch.records;
    let levels_applied = stations::update_water_levels(&mut station_list, &payloads.levels)?;
    info!(levels_applied, stations = station_list.len(), "water levels applied");

    let flood_batch = warnings::build_flood_list(&payloads.england)?;
    log_batch_summary("England warnings", Provider::EnvironmentAgency, &flood_batch);
    let wales_batch = warnings::build_wales_list(&payloads.wales)?;
    log_batch_summary("Wales warnings", Provider::NaturalResourcesWales, &wales_batch);
    let scotland_batch = warnings::build_scotland_areas(&payloads.scotland)?;
    log_batch_summary("Scotland areas", Provider::Sepa, &scotland_batch);

    // The table keeps coastal EA warnings; its rejections are a subset of
    // the flood list's, which are already reported.
    let england_all = warnings::build_flood_table_list(&payloads.england)?;
    let table = WarningTable::from_batches(&england_all, &wales_batch);

    let mut rejected = station_batch.rejected;
    rejected.extend(flood_batch.rejected);
    rejected.extend(wales_batch.rejected);
    rejected.extend(scotland_batch.rejected);

    Ok(Snapshot {
        taken_at,
        stations: station_list,
        levels_applied,
        flood_list: flood_batch.records,
        wales_list: wales_batch.records,
        table,
        scotland: scotland_batch.records,
        rejected,
    })
}

/// Fetches and builds a snapshot stamped with the current time.
pub fn take_snapshot<S>(client: Arc<FeedClient<S>>, use_cache: bool) -> Result<Snapshot, FloodDataError>
where
    S: JsonSource + 'static,
{
    let taken_at = Utc::now();
    let payloads = fetch_feeds(client, use_cache)?;
    build_snapshot(&payloads, taken_at)
}

impl Snapshot {
    /// England and Wales warnings, England first.
    pub fn warnings(&self) -> impl Iterator<Item = &FloodWarning> {
        self.flood_list.iter().chain(self.wales_list.iter())
    }

    /// Each England and Wales warning paired with its rivers and their
    /// stations.
    pub fn river_matches(&self) -> Vec<(&FloodWarning, Vec<RiverStations<'_, '_>>)> {
        let index = stations_by_river(&self.stations);
        self.warnings()
            .map(|w| (w, rivers_with_stations(w, &index)))
            .collect()
    }

    pub fn history_rows(&self) -> Vec<HistoryRow> {
        history::stamp(&self.table, self.taken_at)
    }
}
