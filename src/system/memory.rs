use super::error::SampleError;
use super::source::{CounterSource, MemorySnapshot};

/// Current memory utilization in percent. Memory counters are gauges, so no
/// interval is involved.
pub fn sample_memory<S: CounterSource + ?Sized>(source: &mut S) -> Result<f64, SampleError> {
    memory_usage(source.memory()?)
}

/// `(total - available) / total`, in percent.
///
/// A zero total means the source is broken and is rejected. More available
/// than total reads as 0%.
pub fn memory_usage(snapshot: MemorySnapshot) -> Result<f64, SampleError> {
    if snapshot.total_kb == 0 {
        return Err(SampleError::ZeroTotalMemory);
    }
    let used = snapshot.total_kb.saturating_sub(snapshot.available_kb);
    Ok(used as f64 / snapshot.total_kb as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mem(total_kb: u64, available_kb: u64) -> MemorySnapshot {
        MemorySnapshot {
            total_kb,
            available_kb,
        }
    }

    #[test]
    fn used_share_of_total() {
        let usage = memory_usage(mem(8000, 2000)).unwrap();
        assert!((usage - 75.0).abs() < 1e-9);
    }

    #[test]
    fn zero_total_is_an_error() {
        assert!(matches!(
            memory_usage(mem(0, 0)),
            Err(SampleError::ZeroTotalMemory)
        ));
    }

    #[test]
    fn available_above_total_clamps_to_zero() {
        assert_eq!(memory_usage(mem(1000, 1500)).unwrap(), 0.0);
    }

    #[test]
    fn nothing_available_is_full() {
        assert_eq!(memory_usage(mem(1000, 0)).unwrap(), 100.0);
    }
}
