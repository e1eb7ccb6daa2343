/// Structured logging for the flood-warning aggregator.
///
/// Console output always goes to stderr; an optional log file receives
/// the same events without ANSI colour. Filtering follows `RUST_LOG` when
/// set, otherwise the configured level.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing::{error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::model::{Batch, FloodDataError, Provider, RejectedRecord};

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

/// Installs the global subscriber. Fails if one is already installed or
/// the level is not a valid filter directive.
pub fn init_logging(level: &str, log_file: Option<&Path>) -> Result<(), FloodDataError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| FloodDataError::Config(format!("invalid log level '{}': {}", level, e)))?,
    };

    let file_layer = match log_file {
        Some(path) => {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                fs::create_dir_all(dir)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    Registry::default()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .map_err(|e| FloodDataError::Config(format!("logging already initialised: {}", e)))
}

// ---------------------------------------------------------------------------
// Batch diagnostics
// ---------------------------------------------------------------------------

/// How much of a provider batch survived validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchHealth {
    /// The feed had no records at all.
    Empty,
    Complete,
    /// Some records were rejected.
    Partial,
    /// Every record was rejected.
    Failed,
}

impl BatchHealth {
    pub fn classify(kept: usize, rejected: usize) -> Self {
        match (kept, rejected) {
            (0, 0) => BatchHealth::Empty,
            (_, 0) => BatchHealth::Complete,
            (0, _) => BatchHealth::Failed,
            _ => BatchHealth::Partial,
        }
    }
}

impl fmt::Display for BatchHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchHealth::Empty => write!(f, "EMPTY"),
            BatchHealth::Complete => write!(f, "COMPLETE"),
            BatchHealth::Partial => write!(f, "PARTIAL"),
            BatchHealth::Failed => write!(f, "FAILED"),
        }
    }
}

pub fn log_rejected(record: &RejectedRecord) {
    warn!(
        provider = %record.provider,
        index = record.index,
        id = record.id.as_deref().unwrap_or("-"),
        "{}",
        record
    );
}

/// Logs every rejection in the batch, then one summary line whose level
/// follows the batch health.
pub fn log_batch_summary<T>(what: &str, provider: Provider, batch: &Batch<T>) -> BatchHealth {
    for record in &batch.rejected {
        log_rejected(record);
    }

    let kept = batch.records.len();
    let rejected = batch.rejected.len();
    let health = BatchHealth::classify(kept, rejected);
    match health {
        BatchHealth::Complete | BatchHealth::Empty => {
            info!(%provider, kept, "{}: {} records", what, kept)
        }
        BatchHealth::Partial => warn!(
            %provider, kept, rejected,
            "{}: kept {} of {} records", what, kept, batch.total()
        ),
        BatchHealth::Failed => error!(
            %provider, rejected,
            "{}: all {} records rejected", what, rejected
        ),
    }
    health
}
