//! floodwatch - one-shot UK flood-warning report
//!
//! Fetches the EA station directory and latest levels, England (EA), Wales
//! (NRW) and Scotland (SEPA) warnings, then prints each warning with the
//! monitoring stations on the rivers it names.
//!
//! Usage:
//!   cargo run --release
//!   cargo run --release -- --use-cache
//!   cargo run --release -- --near 52.2053,0.1218 --limit 5
//!   cargo run --release -- --record          # archive this snapshot, report severity changes
//!   cargo run --release -- --config other.toml
//!
//! Environment:
//!   NRW_API_KEY - Natural Resources Wales subscription key (from .env)
//!   RUST_LOG    - overrides [logging] level

use floodwatch::analysis::crossref::highest_relative_level;
use floodwatch::analysis::transitions::{severity_transitions, Direction};
use floodwatch::config::{self, Config};
use floodwatch::fetch::{FeedClient, HttpSource, JsonCache};
use floodwatch::history;
use floodwatch::logging::init_logging;
use floodwatch::model::{Coordinate, FloodDataError, RelativeLevel};
use floodwatch::snapshot::{take_snapshot, Snapshot};
use floodwatch::stations::{inconsistent_typical_range_stations, stations_by_distance};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

const DEFAULT_NEAR_LIMIT: usize = 10;

struct Options {
    config_path: PathBuf,
    use_cache: bool,
    near: Option<Coordinate>,
    limit: usize,
    record: bool,
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {} [--config PATH] [--use-cache] [--near LAT,LON [--limit N]] [--record]",
        program
    )
}

fn parse_coordinate(s: &str) -> Option<Coordinate> {
    let (lat, lon) = s.split_once(',')?;
    let lat: f64 = lat.trim().parse().ok()?;
    let lon: f64 = lon.trim().parse().ok()?;
    ((-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)).then(|| Coordinate::new(lat, lon))
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let program = args.first().map(String::as_str).unwrap_or("floodwatch");
    let mut options = Options {
        config_path: PathBuf::from(config::DEFAULT_CONFIG_PATH),
        use_cache: false,
        near: None,
        limit: DEFAULT_NEAR_LIMIT,
        record: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                let path = args.get(i + 1).ok_or("Error: --config requires a path")?;
                options.config_path = PathBuf::from(path);
                i += 2;
            }
            "--use-cache" => {
                options.use_cache = true;
                i += 1;
            }
            "--near" => {
                let value = args.get(i + 1).ok_or("Error: --near requires LAT,LON")?;
                options.near = Some(
                    parse_coordinate(value).ok_or_else(|| format!("Error: invalid coordinate '{}'", value))?,
                );
                i += 2;
            }
            "--limit" => {
                let value = args.get(i + 1).ok_or("Error: --limit requires a number")?;
                options.limit = value
                    .parse()
                    .map_err(|_| format!("Error: invalid limit '{}'", value))?;
                i += 2;
            }
            "--record" => {
                options.record = true;
                i += 1;
            }
            "--help" | "-h" => return Err(usage(program)),
            other => return Err(format!("Unknown argument: {}\n{}", other, usage(program))),
        }
    }
    Ok(options)
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let options = parse_args(&args).unwrap_or_else(|msg| {
        eprintln!("{}", msg);
        std::process::exit(1);
    });

    let config = config::load_config_or_default(&options.config_path).unwrap_or_else(|e| {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.logging.level, config.logging.file.as_deref()) {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(&options, &config) {
        eprintln!("\n❌ {}", e);
        std::process::exit(1);
    }
}

fn run(options: &Options, config: &Config) -> Result<(), FloodDataError> {
    println!("🌊 UK Flood Warnings");
    println!("====================\n");

    let source = HttpSource::new(Duration::from_secs(config.feeds.timeout_secs))?;
    let mut client = FeedClient::new(source, config.feeds.clone());
    if config.cache.enabled {
        client = client.with_cache(JsonCache::new(&config.cache.dir));
    }
    match config::nrw_api_key() {
        Some(key) => client = client.with_nrw_key(key),
        None => warn!("{} not set; Wales warnings need a cached copy", config::NRW_KEY_VAR),
    }

    println!("📥 Fetching feeds{}...", if options.use_cache { " (cache first)" } else { "" });
    let snapshot = take_snapshot(Arc::new(client), options.use_cache)?;
    println!(
        "✓ {} stations ({} with levels), {} England + {} Wales warnings, {} Scotland areas\n",
        snapshot.stations.len(),
        snapshot.levels_applied,
        snapshot.flood_list.len(),
        snapshot.wales_list.len(),
        snapshot.scotland.len()
    );
    if !snapshot.rejected.is_empty() {
        println!("⚠️  {} provider records skipped (see log)\n", snapshot.rejected.len());
    }

    print_warnings(&snapshot);
    print_scotland(&snapshot);

    let inconsistent = inconsistent_typical_range_stations(&snapshot.stations);
    println!("📋 {} stations have no usable typical range\n", inconsistent.len());

    if let Some(point) = options.near {
        print_nearest(&snapshot, point, options.limit);
    }

    if options.record {
        record(&snapshot, config)?;
    }

    Ok(())
}

fn print_warnings(snapshot: &Snapshot) {
    println!("🚨 England and Wales warnings");
    for (warning, rivers) in snapshot.river_matches() {
        println!("   [{}] {} ({})", warning.severity, warning.description, warning.area_name);
        if rivers.is_empty() {
            println!("       no river named");
        }
        for (river, stations) in rivers {
            match stations {
                None => println!("       {}: no monitoring stations", river),
                Some(stations) => match highest_relative_level(&stations) {
                    Some((top, level)) => println!(
                        "       {}: {} stations, highest {} at {:.2} of typical range",
                        river,
                        stations.len(),
                        top.name,
                        level
                    ),
                    None => println!("       {}: {} stations, no current levels", river, stations.len()),
                },
            }
        }
    }
    println!();
}

fn print_scotland(snapshot: &Snapshot) {
    if snapshot.scotland.is_empty() {
        return;
    }
    println!("🏴 Scotland warning areas");
    for area in &snapshot.scotland {
        println!("   {} ({})", area.area_name, area.code);
    }
    println!();
}

fn print_nearest(snapshot: &Snapshot, point: Coordinate, limit: usize) {
    println!("📍 Stations nearest ({:.4}, {:.4})", point.latitude, point.longitude);
    for (station, km) in stations_by_distance(&snapshot.stations, point).into_iter().take(limit) {
        let level = match station.relative_level() {
            RelativeLevel::Value(v) => format!("{:.2}", v),
            RelativeLevel::InconsistentRange => "range n/a".to_string(),
            RelativeLevel::NoReading => "no reading".to_string(),
        };
        println!("   {:>7.2} km  {} [{}]", km, station.name, level);
    }
    println!();
}

fn record(snapshot: &Snapshot, config: &Config) -> Result<(), FloodDataError> {
    let path = &config.history.path;
    let written = history::append_history(path, &snapshot.history_rows())?;
    println!("💾 Archived {} rows to {}", written, path.display());

    let rows = history::load_history(path)?;
    let transitions = severity_transitions(&history::observations(&rows));
    if transitions.is_empty() {
        println!("   No severity changes in the archive");
    }
    for t in transitions {
        let arrow = match t.direction {
            Direction::Escalated => "⬆",
            Direction::Downgraded => "⬇",
            Direction::Fluctuated => "↕",
        };
        println!("   {} {}: {} → {} ({} changes)", arrow, t.flood_id, t.first, t.latest, t.changes);
    }
    Ok(())
}
