use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use tokio::sync::watch;

use crate::system::error::SampleError;
use crate::system::monitor::Monitor;
use crate::system::snapshot::ChartSnapshot;
use crate::system::source::CounterSource;

/// Cooperative stop signal, checked by the worker between rounds.
#[derive(Debug, Clone, Default)]
pub struct Shutdown(Arc<AtomicBool>);

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Drives a [`Monitor`] round after round.
///
/// A failed round is logged and skipped; the windows keep their previous
/// contents and the published snapshot carries the error. Once
/// `max_consecutive_failures` rounds in a row have failed the worker gives up
/// and returns the last error.
pub struct Worker<S> {
    monitor: Monitor<S>,
    max_consecutive_failures: u32,
    consecutive_failures: u32,
    last_error: Option<String>,
}

impl<S: CounterSource> Worker<S> {
    /// A limit of 0 is treated as 1: the first failure is fatal.
    pub fn new(monitor: Monitor<S>, max_consecutive_failures: u32) -> Self {
        Self {
            monitor,
            max_consecutive_failures: max_consecutive_failures.max(1),
            consecutive_failures: 0,
            last_error: None,
        }
    }

    /// Snapshot of the windows plus the current failure status.
    pub fn snapshot(&self) -> ChartSnapshot {
        let mut snapshot = self.monitor.snapshot();
        snapshot.last_error = self.last_error.clone();
        snapshot.consecutive_failures = self.consecutive_failures;
        snapshot
    }

    /// One iteration of the loop. `Err` means the failure budget is spent.
    pub fn step(&mut self) -> Result<ChartSnapshot, SampleError> {
        match self.monitor.sample_round() {
            Ok(()) => {
                if self.consecutive_failures > 0 {
                    tracing::info!(
                        after = self.consecutive_failures,
                        "sampling recovered"
                    );
                }
                self.consecutive_failures = 0;
                self.last_error = None;
            }
            Err(err) => {
                self.consecutive_failures += 1;
                if self.consecutive_failures >= self.max_consecutive_failures {
                    tracing::error!(
                        error = %err,
                        failures = self.consecutive_failures,
                        "sampling failed too many times in a row, stopping"
                    );
                    return Err(err);
                }
                tracing::warn!(
                    error = %err,
                    failures = self.consecutive_failures,
                    limit = self.max_consecutive_failures,
                    "skipping failed sampling round"
                );
                self.last_error = Some(err.to_string());
            }
        }
        Ok(self.snapshot())
    }

    /// Loop until shutdown, until every receiver is gone, or until the
    /// failure budget is spent.
    pub fn run(
        mut self,
        tx: &watch::Sender<Arc<ChartSnapshot>>,
        shutdown: &Shutdown,
    ) -> Result<(), SampleError> {
        while !shutdown.is_triggered() {
            let snapshot = self.step()?;
            if shutdown.is_triggered() {
                break;
            }
            if tx.send(Arc::new(snapshot)).is_err() {
                tracing::debug!("no snapshot receivers left");
                break;
            }
        }
        tracing::info!(rounds = self.monitor.round(), "sampler worker stopped");
        Ok(())
    }
}

impl<S: CounterSource + Send + 'static> Worker<S> {
    /// Move the worker onto its own thread. The receiver starts out holding
    /// the zero baseline so the first frame is full width.
    pub fn spawn(
        self,
        shutdown: Shutdown,
    ) -> std::io::Result<(
        watch::Receiver<Arc<ChartSnapshot>>,
        JoinHandle<Result<(), SampleError>>,
    )> {
        let (tx, rx) = watch::channel(Arc::new(self.snapshot()));
        let handle = std::thread::Builder::new()
            .name("syswatch-sampler".to_string())
            .spawn(move || self.run(&tx, &shutdown))?;
        Ok((rx, handle))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::time::Duration;

    use super::*;
    use crate::system::error::SourceError;
    use crate::system::memory::memory_usage;
    use crate::system::source::{CpuCounters, CpuTicks, MemorySnapshot};

    /// Serves a fixed core set; memory reads follow a script of ok/err.
    struct Flaky {
        reads: u64,
        memory: VecDeque<bool>,
    }

    impl Flaky {
        fn new(memory: &[bool]) -> Self {
            Self {
                reads: 0,
                memory: memory.iter().copied().collect(),
            }
        }
    }

    impl CounterSource for Flaky {
        fn cpu_counters(&mut self) -> Result<CpuCounters, SourceError> {
            self.reads += 1;
            let ticks = CpuTicks {
                user: 10 * self.reads,
                idle: 30 * self.reads,
                ..CpuTicks::default()
            };
            Ok([(0, ticks)].into_iter().collect())
        }

        fn memory(&mut self) -> Result<MemorySnapshot, SourceError> {
            match self.memory.pop_front() {
                Some(true) => Ok(MemorySnapshot {
                    total_kb: 1000,
                    available_kb: 250,
                }),
                _ => Err(SourceError::MissingCounter("MemAvailable")),
            }
        }
    }

    fn worker(memory: &[bool], limit: u32) -> Worker<Flaky> {
        let monitor = Monitor::new(Flaky::new(memory), 3, Duration::ZERO).unwrap();
        Worker::new(monitor, limit)
    }

    #[test]
    fn failed_round_is_skipped_and_reported() {
        let mut worker = worker(&[false, true], 3);

        let skipped = worker.step().unwrap();
        assert_eq!(skipped.round, 0);
        assert_eq!(skipped.consecutive_failures, 1);
        assert!(skipped.last_error.unwrap().contains("MemAvailable"));

        let recovered = worker.step().unwrap();
        assert_eq!(recovered.round, 1);
        assert_eq!(recovered.consecutive_failures, 0);
        assert!(recovered.last_error.is_none());
        assert_eq!(recovered.memory.values, vec![0.0, 0.0, 75.0]);
        assert_eq!(recovered.cores[0].values, vec![0.0, 0.0, 25.0]);
    }

    #[test]
    fn failure_budget_terminates() {
        let mut worker = worker(&[false, false, false], 3);
        assert!(worker.step().is_ok());
        assert!(worker.step().is_ok());
        assert!(matches!(worker.step(), Err(SampleError::Source(_))));
    }

    #[test]
    fn zero_budget_means_first_failure_is_fatal() {
        let mut worker = worker(&[false], 0);
        assert!(worker.step().is_err());
    }

    #[test]
    fn run_stops_when_shutdown_is_triggered() {
        let worker = worker(&[true; 8], 1);
        let (tx, rx) = watch::channel(Arc::new(worker.snapshot()));
        let shutdown = Shutdown::new();
        shutdown.trigger();
        worker.run(&tx, &shutdown).unwrap();
        assert_eq!(rx.borrow().round, 0);
    }

    #[test]
    fn run_stops_when_receiver_is_dropped() {
        let worker = worker(&[true; 8], 1);
        let (tx, rx) = watch::channel(Arc::new(worker.snapshot()));
        drop(rx);
        worker.run(&tx, &Shutdown::new()).unwrap();
    }

    #[test]
    fn spawned_worker_publishes_rounds_then_fails() {
        let (mut rx, handle) = worker(&[true, true], 1).spawn(Shutdown::new()).unwrap();
        let result = handle.join().unwrap();
        assert!(matches!(result, Err(SampleError::Source(_))));

        let last = rx.borrow_and_update().clone();
        assert_eq!(last.round, 2);
        assert_eq!(last.memory.values, vec![0.0, 75.0, 75.0]);
        assert!(last.memory.values.len() == last.width());
    }

    /// Never fails; memory read `n` reports `n % 1000` kB in use.
    struct Climbing {
        cpu_reads: u64,
        memory_reads: u64,
    }

    fn climbing_memory(read: u64) -> MemorySnapshot {
        MemorySnapshot {
            total_kb: 1000,
            available_kb: 1000 - read % 1000,
        }
    }

    impl CounterSource for Climbing {
        fn cpu_counters(&mut self) -> Result<CpuCounters, SourceError> {
            self.cpu_reads += 1;
            let ticks = CpuTicks {
                user: self.cpu_reads,
                idle: 3 * self.cpu_reads,
                ..CpuTicks::default()
            };
            Ok([(0, ticks), (1, ticks)].into_iter().collect())
        }

        fn memory(&mut self) -> Result<MemorySnapshot, SourceError> {
            self.memory_reads += 1;
            Ok(climbing_memory(self.memory_reads))
        }
    }

    #[test]
    fn concurrent_reader_only_sees_whole_snapshots() {
        const WIDTH: usize = 7;
        const ROUNDS: u64 = 300;

        let source = Climbing {
            cpu_reads: 0,
            memory_reads: 0,
        };
        let monitor = Monitor::new(source, WIDTH, Duration::ZERO).unwrap();
        let shutdown = Shutdown::new();
        let (mut rx, handle) = Worker::new(monitor, 1).spawn(shutdown.clone()).unwrap();

        let reader = std::thread::spawn(move || {
            let mut last_round = 0;
            let mut observed = 0;
            while last_round < ROUNDS {
                match rx.has_changed() {
                    Ok(true) => {}
                    Ok(false) => {
                        std::thread::yield_now();
                        continue;
                    }
                    Err(_) => break,
                }
                let snapshot = rx.borrow_and_update().clone();
                assert_eq!(snapshot.width(), WIDTH);
                assert_eq!(snapshot.cores.len(), 2);
                for series in snapshot.cores.iter().chain([&snapshot.memory]) {
                    assert_eq!(series.values.len(), WIDTH);
                }
                assert!(snapshot.round >= last_round);
                if snapshot.round > 0 {
                    let expected = memory_usage(climbing_memory(snapshot.round)).unwrap();
                    assert_eq!(snapshot.memory.latest(), expected);
                }
                last_round = snapshot.round;
                observed += 1;
            }
            observed
        });

        let observed = reader.join().unwrap();
        shutdown.trigger();
        handle.join().unwrap().unwrap();
        assert!(observed > 0);
    }
}
