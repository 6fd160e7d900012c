use std::time::Duration;

use super::cpu::CpuSampler;
use super::error::SampleError;
use super::history::SlidingWindow;
use super::memory::sample_memory;
use super::snapshot::{ChartSnapshot, Series};
use super::source::{CoreId, CounterSource};

/// Owns the data source, the samplers and one window per tracked metric.
pub struct Monitor<S> {
    source: S,
    cpu: CpuSampler,
    core_windows: Vec<SlidingWindow>,
    memory_window: SlidingWindow,
    round: u64,
}

impl<S: CounterSource> Monitor<S> {
    /// Reads the core set once and allocates a window per core plus one for
    /// memory, all `width` wide.
    pub fn new(mut source: S, width: usize, interval: Duration) -> Result<Self, SampleError> {
        let cpu = CpuSampler::new(&mut source, interval)?;
        let core_windows = cpu
            .cores()
            .iter()
            .map(|_| SlidingWindow::new(width))
            .collect();
        let memory_window = SlidingWindow::new(width);
        tracing::info!(
            cores = cpu.cores().len(),
            width = memory_window.capacity(),
            interval_ms = interval.as_millis() as u64,
            "monitor initialised"
        );
        Ok(Self {
            source,
            cpu,
            core_windows,
            memory_window,
            round: 0,
        })
    }

    pub fn cores(&self) -> &[CoreId] {
        self.cpu.cores()
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    /// Run one sampling round and append the results. Blocks for the CPU
    /// sampling interval. Windows are only touched once every metric has
    /// been sampled, so a failed round leaves them as they were.
    pub fn sample_round(&mut self) -> Result<(), SampleError> {
        let _span = tracing::debug_span!("monitor.sample_round", round = self.round + 1).entered();

        let cpu = self.cpu.sample(&mut self.source)?;
        let memory = sample_memory(&mut self.source)?;

        for (window, value) in self.core_windows.iter_mut().zip(&cpu) {
            window.push(*value);
        }
        self.memory_window.push(memory);
        self.round += 1;

        tracing::debug!(round = self.round, memory, cpu = ?cpu, "round sampled");
        Ok(())
    }

    pub fn snapshot(&self) -> ChartSnapshot {
        let cores = self
            .cpu
            .cores()
            .iter()
            .zip(&self.core_windows)
            .map(|(id, window)| Series {
                label: format!("cpu{id}"),
                values: window.as_slice().to_vec(),
            })
            .collect();

        ChartSnapshot {
            round: self.round,
            cores,
            memory: Series {
                label: "memory".to_string(),
                values: self.memory_window.as_slice().to_vec(),
            },
            last_error: None,
            consecutive_failures: 0,
        }
    }
}
