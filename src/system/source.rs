use std::collections::BTreeMap;

use super::error::SourceError;

pub type CoreId = u32;

/// Cumulative per-core tick counters, in kernel clock ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTicks {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
    pub guest: u64,
    pub guest_nice: u64,
}

impl CpuTicks {
    /// Sum of all ten counters. Saturates rather than wrapping.
    pub fn total(&self) -> u64 {
        [
            self.user,
            self.nice,
            self.system,
            self.idle,
            self.iowait,
            self.irq,
            self.softirq,
            self.steal,
            self.guest,
            self.guest_nice,
        ]
        .into_iter()
        .fold(0u64, u64::saturating_add)
    }

    /// Only the literal idle counter; iowait counts towards busy time.
    pub fn idle(&self) -> u64 {
        self.idle
    }
}

/// One snapshot of every core, ordered by ascending core id.
pub type CpuCounters = BTreeMap<CoreId, CpuTicks>;

/// Instantaneous memory gauges in kB.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemorySnapshot {
    pub total_kb: u64,
    pub available_kb: u64,
}

/// Where raw counters come from. The sampler only ever reads.
pub trait CounterSource {
    fn cpu_counters(&mut self) -> Result<CpuCounters, SourceError>;
    fn memory(&mut self) -> Result<MemorySnapshot, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_sums_all_ten_counters() {
        let ticks = CpuTicks {
            user: 1,
            nice: 2,
            system: 3,
            idle: 4,
            iowait: 5,
            irq: 6,
            softirq: 7,
            steal: 8,
            guest: 9,
            guest_nice: 10,
        };
        assert_eq!(ticks.total(), 55);
        assert_eq!(ticks.idle(), 4);
    }

    #[test]
    fn total_saturates_instead_of_overflowing() {
        let ticks = CpuTicks {
            user: u64::MAX,
            idle: 10,
            ..CpuTicks::default()
        };
        assert_eq!(ticks.total(), u64::MAX);
    }
}
