//! Background sampling of process CPU/memory and host network counters.
mod probe;


use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::Duration;

use serde::Serialize;
use tracing::warn;

use probe::Probe;

/// Default interval between background samples.
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(200);

/// Point-in-time read of process and host resource counters.
///
/// A snapshot is a pure read; sampler read errors degrade to zero values
/// rather than failing the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResourceSnapshot {
    pub cpu_percent: f64,
    pub memory_rss_mb: f64,
    pub memory_vms_mb: f64,
    pub memory_percent: f64,
    pub network: NetworkCounters,
    pub disk_read_mb: f64,
    pub disk_write_mb: f64,
}

/// Cumulative host network counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NetworkCounters {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
    pub packets_sent: u64,
    pub packets_recv: u64,
}

/// Interval difference between two counter reads, clamped at zero so a
/// counter reset never reports negative traffic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NetworkDelta {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
    pub packets_sent: u64,
    pub packets_recv: u64,
}

impl NetworkDelta {
    #[must_use]
    pub const fn between(baseline: NetworkCounters, current: NetworkCounters) -> Self {
        Self {
            bytes_sent: current.bytes_sent.saturating_sub(baseline.bytes_sent),
            bytes_recv: current.bytes_recv.saturating_sub(baseline.bytes_recv),
            packets_sent: current.packets_sent.saturating_sub(baseline.packets_sent),
            packets_recv: current.packets_recv.saturating_sub(baseline.packets_recv),
        }
    }
}

/// Aggregate of the background samples collected between start and stop.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResourceReport {
    pub cpu_avg: f64,
    pub cpu_max: f64,
    pub memory_avg: f64,
    pub memory_max: f64,
    pub sample_count: usize,
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    cpu: f64,
    memory: f64,
}

struct SamplerWorker {
    stop_tx: mpsc::Sender<()>,
    handle: JoinHandle<Vec<Sample>>,
}

/// Periodic observer of process CPU/memory and host network I/O.
///
/// Two states: idle and sampling. The background thread is owned
/// explicitly by this instance; there is no process-wide singleton, so
/// tests and callers can run isolated samplers side by side.
pub struct ResourceSampler {
    interval: Duration,
    probe: Probe,
    baseline: Option<NetworkCounters>,
    worker: Option<SamplerWorker>,
}

impl ResourceSampler {
    #[must_use]
    pub fn new() -> Self {
        Self::with_interval(DEFAULT_SAMPLE_INTERVAL)
    }

    #[must_use]
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            probe: Probe::new(),
            baseline: None,
            worker: None,
        }
    }

    #[must_use]
    pub const fn is_sampling(&self) -> bool {
        self.worker.is_some()
    }

    /// Reads all counters once. Never fails; unreadable counters are zero.
    pub fn snapshot(&mut self) -> ResourceSnapshot {
        self.probe.snapshot()
    }

    /// Transitions idle -> sampling: records the network baseline and
    /// spawns the periodic background thread. A second call while already
    /// sampling is a no-op.
    pub fn start_sampling(&mut self) {
        if self.worker.is_some() {
            return;
        }
        self.baseline = Some(self.probe.network_counters());

        let interval = self.interval;
        let (stop_tx, stop_rx) = mpsc::channel();
        let spawned = std::thread::Builder::new()
            .name("resource-sampler".to_owned())
            .spawn(move || {
                // The thread owns its own probe; the resident one stays
                // available for snapshots while sampling runs.
                let mut probe = Probe::new();
                let mut samples = Vec::new();
                loop {
                    let (cpu, memory) = probe.cpu_and_memory();
                    samples.push(Sample { cpu, memory });
                    match stop_rx.recv_timeout(interval) {
                        Err(mpsc::RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
                    }
                }
                samples
            });

        match spawned {
            Ok(handle) => self.worker = Some(SamplerWorker { stop_tx, handle }),
            Err(err) => warn!("Failed to spawn resource sampler thread: {}", err),
        }
    }

    /// Transitions sampling -> idle and aggregates the collected samples.
    ///
    /// Stopping an idle sampler returns a zero-valued report with
    /// `sample_count == 0` instead of failing. The join is bounded: the
    /// background thread wakes at least once per interval.
    pub fn stop_sampling(&mut self) -> ResourceReport {
        let Some(worker) = self.worker.take() else {
            return ResourceReport::default();
        };
        let _ = worker.stop_tx.send(());
        match worker.handle.join() {
            Ok(samples) => aggregate(&samples),
            Err(_) => {
                warn!("Resource sampler thread panicked; reporting zero samples.");
                ResourceReport::default()
            }
        }
    }

    /// Difference between current network counters and the baseline taken
    /// at `start_sampling`. Zero-valued before any baseline exists.
    pub fn network_delta(&mut self) -> NetworkDelta {
        match self.baseline {
            Some(baseline) => NetworkDelta::between(baseline, self.probe.network_counters()),
            None => NetworkDelta::default(),
        }
    }
}

impl Default for ResourceSampler {
    fn default() -> Self {
        Self::new()
    }
}

fn aggregate(samples: &[Sample]) -> ResourceReport {
    if samples.is_empty() {
        return ResourceReport::default();
    }
    let count = samples.len() as f64;
    let cpu_sum: f64 = samples.iter().map(|sample| sample.cpu).sum();
    let memory_sum: f64 = samples.iter().map(|sample| sample.memory).sum();
    ResourceReport {
        cpu_avg: cpu_sum / count,
        cpu_max: samples.iter().map(|sample| sample.cpu).fold(0.0, f64::max),
        memory_avg: memory_sum / count,
        memory_max: samples
            .iter()
            .map(|sample| sample.memory)
            .fold(0.0, f64::max),
        sample_count: samples.len(),
    }
}
