use std::fs::{self, File};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

pub const LOG_FILE: &str = "nq_validation.log";

/// Logs to stderr and to `<destination>/nq_validation.log`.
///
/// `RUST_LOG` overrides the default `info` level; `quiet` forces `warn`.
pub fn init(destination: &Path, quiet: bool) -> Result<()> {
    fs::create_dir_all(destination)
        .with_context(|| format!("creating destination {}", destination.display()))?;
    let log_path = destination.join(LOG_FILE);
    let file =
        File::create(&log_path).with_context(|| format!("creating log {}", log_path.display()))?;

    let filter = if quiet {
        EnvFilter::new("warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .try_init()
        .context("installing log subscriber")
}
