use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::system::procfs::DEFAULT_PROC_ROOT;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub logging: LoggingConfig,
    pub chart: ChartConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Points of history per chart line, kept within 1..=`history::MAX_CAPACITY`.
    pub window_width: usize,
    pub max_consecutive_failures: u32,
    pub proc_root: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            window_width: 50,
            max_consecutive_failures: 5,
            proc_root: PathBuf::from(DEFAULT_PROC_ROOT),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub show_legend: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig { show_legend: true }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("syswatch").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}
