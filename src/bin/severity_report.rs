//! Severity Change Report
//!
//! Reads the warning archive written by `floodwatch --record` and lists
//! every warning whose severity changed between snapshots.
//!
//! Usage:
//!   cargo run --bin severity_report
//!
//! Options:
//!   --config PATH    Configuration file (default: floodwatch.toml)
//!   --history PATH   Archive to read (default: [history] path from config)

use floodwatch::analysis::transitions::{severity_changed, severity_transitions, Direction};
use floodwatch::config;
use floodwatch::history;
use std::env;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("📈 Severity Change Report");
    println!("=========================\n");

    let args: Vec<String> = env::args().collect();
    let config_path = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(config::DEFAULT_CONFIG_PATH));
    let config = config::load_config_or_default(&config_path)?;

    let history_path = args
        .iter()
        .position(|a| a == "--history")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from)
        .unwrap_or(config.history.path);

    let rows = history::load_history(&history_path)?;
    if rows.is_empty() {
        println!("No archived snapshots at {}", history_path.display());
        return Ok(());
    }

    let mut snapshots: Vec<_> = rows.iter().map(|r| r.snapshot_time).collect();
    snapshots.sort();
    snapshots.dedup();
    println!(
        "📋 {} rows across {} snapshots ({} → {})\n",
        rows.len(),
        snapshots.len(),
        snapshots[0].format("%Y-%m-%d %H:%M"),
        snapshots[snapshots.len() - 1].format("%Y-%m-%d %H:%M")
    );

    let observations = history::observations(&rows);
    let changed = severity_changed(&observations);
    if changed.is_empty() {
        println!("✓ No warning changed severity");
        return Ok(());
    }

    println!("⚠️  {} warnings changed severity:", changed.len());
    for t in severity_transitions(&observations) {
        let label = match t.direction {
            Direction::Escalated => "escalated",
            Direction::Downgraded => "downgraded",
            Direction::Fluctuated => "fluctuated",
        };
        println!(
            "   {} {} → {} ({}, {} changes, {} to {})",
            t.flood_id,
            t.first,
            t.latest,
            label,
            t.changes,
            t.first_seen.format("%Y-%m-%d %H:%M"),
            t.last_seen.format("%Y-%m-%d %H:%M")
        );
    }

    Ok(())
}
