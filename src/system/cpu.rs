use std::time::Duration;

use super::error::SampleError;
use super::source::{CoreId, CounterSource, CpuCounters, CpuTicks};

/// Gap between the two counter snapshots of one round.
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(1000);

/// Per-core utilization sampler.
///
/// The core set is read once at construction and every later round must
/// report exactly the same ids; results are always in ascending core-id
/// order so index `i` maps to the same core on every call.
#[derive(Debug, Clone)]
pub struct CpuSampler {
    cores: Vec<CoreId>,
    interval: Duration,
}

impl CpuSampler {
    pub fn new<S: CounterSource + ?Sized>(
        source: &mut S,
        interval: Duration,
    ) -> Result<Self, SampleError> {
        let counters = source.cpu_counters()?;
        if counters.is_empty() {
            return Err(SampleError::NoCores);
        }
        Ok(Self {
            cores: counters.keys().copied().collect(),
            interval,
        })
    }

    pub fn cores(&self) -> &[CoreId] {
        &self.cores
    }

    /// Take one sampling round. Blocks the calling thread for the interval.
    pub fn sample<S: CounterSource + ?Sized>(
        &self,
        source: &mut S,
    ) -> Result<Vec<f64>, SampleError> {
        let first = self.capture(source)?;
        std::thread::sleep(self.interval);
        let second = self.capture(source)?;
        usage_between(&first, &second)
    }

    fn capture<S: CounterSource + ?Sized>(
        &self,
        source: &mut S,
    ) -> Result<CpuCounters, SampleError> {
        let counters = source.cpu_counters()?;
        if !counters.keys().eq(self.cores.iter()) {
            return Err(SampleError::TopologyChanged {
                expected: self.cores.clone(),
                found: counters.keys().copied().collect(),
            });
        }
        Ok(counters)
    }
}

/// Utilization of every core between two snapshots, ascending by core id.
///
/// Both snapshots must cover the same cores.
pub fn usage_between(
    first: &CpuCounters,
    second: &CpuCounters,
) -> Result<Vec<f64>, SampleError> {
    if !first.keys().eq(second.keys()) {
        return Err(SampleError::TopologyChanged {
            expected: first.keys().copied().collect(),
            found: second.keys().copied().collect(),
        });
    }
    Ok(first
        .values()
        .zip(second.values())
        .map(|(before, after)| core_usage(before, after))
        .collect())
}

/// Busy share of the ticks elapsed between `before` and `after`, in percent.
///
/// No elapsed ticks reads as 0%. Counters that went backwards saturate to a
/// zero delta.
pub fn core_usage(before: &CpuTicks, after: &CpuTicks) -> f64 {
    let total = after.total().saturating_sub(before.total());
    if total == 0 {
        return 0.0;
    }
    let idle = after.idle().saturating_sub(before.idle());
    let busy = total.saturating_sub(idle);
    (busy as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
}
