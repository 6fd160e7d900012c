use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use color_eyre::eyre::{Result, eyre};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

const FALLBACK_LEVEL: &str = "info";

/// Default log location; the terminal belongs to the charts.
pub fn default_log_path() -> Option<PathBuf> {
    dirs::state_dir()
        .or_else(dirs::cache_dir)
        .map(|p| p.join("syswatch").join("syswatch.log"))
}

/// Install a global subscriber appending to the configured log file.
///
/// `RUST_LOG` wins over `logging.level`; a level that does not parse falls
/// back to `info`. Returns the path written to, or `None` when no log
/// location could be determined.
pub fn init(config: &LoggingConfig) -> Result<Option<PathBuf>> {
    let Some(path) = config.file.clone().or_else(default_log_path) else {
        return Ok(None);
    };
    ensure_parent_dir(&path)?;
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let (filter, fell_back) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, false),
        Err(_) => level_filter(&config.level),
    };

    let builder = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_env_filter(filter)
        .with_thread_names(true)
        .with_writer(Mutex::new(file));

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| eyre!("failed to set tracing subscriber: {e}"))?;

    if fell_back {
        tracing::warn!(level = %config.level, "invalid log level, using {FALLBACK_LEVEL}");
    }
    Ok(Some(path))
}

/// Like [`init`], but a logging failure never stops the monitor: it is
/// reported on stderr and the program runs without a subscriber.
pub fn init_or_report(config: &LoggingConfig) -> Option<PathBuf> {
    match init(config) {
        Ok(path) => path,
        Err(err) => {
            eprintln!("syswatch: logging disabled: {err}");
            None
        }
    }
}

/// Filter for `level`, and whether it had to fall back to `info`.
fn level_filter(level: &str) -> (EnvFilter, bool) {
    match EnvFilter::try_new(level) {
        Ok(filter) => (filter, false),
        Err(_) => (EnvFilter::new(FALLBACK_LEVEL), true),
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
