use std::path::PathBuf;

use super::error::SourceError;
use super::source::{CounterSource, CpuCounters, CpuTicks, MemorySnapshot};

pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Reads counters from a procfs mount (`<root>/stat`, `<root>/meminfo`).
#[derive(Debug, Clone)]
pub struct ProcSource {
    root: PathBuf,
}

impl Default for ProcSource {
    fn default() -> Self {
        Self::new(DEFAULT_PROC_ROOT)
    }
}

impl ProcSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn read(&self, name: &str) -> Result<String, SourceError> {
        let path = self.root.join(name);
        std::fs::read_to_string(&path)
            .map_err(|source| SourceError::Unavailable { path, source })
    }
}

impl CounterSource for ProcSource {
    fn cpu_counters(&mut self) -> Result<CpuCounters, SourceError> {
        parse_stat(&self.read("stat")?)
    }

    fn memory(&mut self) -> Result<MemorySnapshot, SourceError> {
        parse_meminfo(&self.read("meminfo")?)
    }
}

/// Parse the per-core `cpuN` lines of `/proc/stat`.
///
/// The aggregate `cpu` line is skipped. Kernels older than 2.6.33 expose fewer
/// than ten columns; missing trailing counters read as zero.
pub fn parse_stat(contents: &str) -> Result<CpuCounters, SourceError> {
    let mut cores = CpuCounters::new();

    for line in contents.lines() {
        let mut fields = line.split_whitespace();
        let Some(label) = fields.next() else {
            continue;
        };
        let Some(id) = label.strip_prefix("cpu") else {
            continue;
        };
        if id.is_empty() {
            continue;
        }

        let malformed = || SourceError::Malformed {
            file: "stat",
            line: line.to_string(),
        };
        let id: u32 = id.parse().map_err(|_| malformed())?;
        let values = fields
            .take(10)
            .map(|v| v.parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| malformed())?;
        // user nice system idle is the minimum every kernel reports
        if values.len() < 4 {
            return Err(malformed());
        }

        let at = |i: usize| values.get(i).copied().unwrap_or(0);
        cores.insert(
            id,
            CpuTicks {
                user: at(0),
                nice: at(1),
                system: at(2),
                idle: at(3),
                iowait: at(4),
                irq: at(5),
                softirq: at(6),
                steal: at(7),
                guest: at(8),
                guest_nice: at(9),
            },
        );
    }

    Ok(cores)
}

/// Parse `MemTotal` and `MemAvailable` out of `/proc/meminfo`.
pub fn parse_meminfo(contents: &str) -> Result<MemorySnapshot, SourceError> {
    let mut total = None;
    let mut available = None;

    for line in contents.lines() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let slot = match key.trim() {
            "MemTotal" => &mut total,
            "MemAvailable" => &mut available,
            _ => continue,
        };
        let value = rest
            .split_whitespace()
            .next()
            .and_then(|v| v.parse::<u64>().ok())
            .ok_or_else(|| SourceError::Malformed {
                file: "meminfo",
                line: line.to_string(),
            })?;
        *slot = Some(value);
    }

    Ok(MemorySnapshot {
        total_kb: total.ok_or(SourceError::MissingCounter("MemTotal"))?,
        available_kb: available.ok_or(SourceError::MissingCounter("MemAvailable"))?,
    })
}
