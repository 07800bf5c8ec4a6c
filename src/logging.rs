//! Tracing subscriber setup.
//!
//! The subscriber is installed as the default for the current thread only;
//! the returned guard keeps it active and removes it when dropped.

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;
use tracing::subscriber::DefaultGuard;
use tracing::{error, info};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

/// Build the filter: `RUST_LOG` when set, `default` otherwise, with noisy
/// HTTP internals capped at WARN.
fn env_filter(default: LevelFilter) -> EnvFilter {
    let filter = EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy();
    ["reqwest=warn", "hyper=warn", "hyper_util=warn"]
        .into_iter()
        .filter_map(|d| d.parse::<Directive>().ok())
        .fold(filter, |filter, directive| filter.add_directive(directive))
}

/// Log to stderr, errors only unless `RUST_LOG` says otherwise.
pub fn init_stderr() -> DefaultGuard {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter(LevelFilter::ERROR))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_default(subscriber)
}

/// Append INFO and above to `path`.
pub fn init_file(path: &Path) -> Result<DefaultGuard> {
    let file: File = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter(LevelFilter::INFO))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    info!("Logging initialized. Writing to logfile: {}", path.display());
    Ok(guard)
}

/// Install the subscriber for this run, falling back to stderr when the log
/// file cannot be opened.
pub fn init(log_file: Option<&Path>) -> DefaultGuard {
    match log_file {
        Some(path) => init_file(path).unwrap_or_else(|e| {
            let guard = init_stderr();
            error!("{:#}", e);
            guard
        }),
        None => init_stderr(),
    }
}
