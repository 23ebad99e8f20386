//! Tracing subscriber for the `pinmap` binary.
//!
//! Linux hosts with a running journal get a journald layer. Everywhere else,
//! or when the journal socket is missing, events are appended to
//! `pinmap.log` in a directory that rotates daily.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_ENV: &str = "PINMAP_LOG";

/// Flushes the file writer on exit.
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

fn fallback_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pinmap")
        .join("logs")
}

/// Install the global subscriber. `PINMAP_LOG` takes an `EnvFilter`
/// directive such as `debug` or `pinmap::import=trace`; `info` otherwise.
///
/// `log_dir` only matters for the file backend.
pub fn init(log_dir: Option<PathBuf>) -> Result<()> {
    #[cfg(target_os = "linux")]
    {
        if let Ok(journald) = tracing_journald::layer() {
            tracing_subscriber::registry()
                .with(filter())
                .with(journald)
                .try_init()?;
            tracing::debug!("journald logging active");
            return Ok(());
        }
    }

    let dir = log_dir.unwrap_or_else(fallback_log_dir);
    std::fs::create_dir_all(&dir)?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&dir, "pinmap.log"));
    let _ = FILE_GUARD.set(guard);

    tracing_subscriber::registry()
        .with(filter())
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()?;
    tracing::debug!("file logging active in {}", dir.display());
    Ok(())
}
