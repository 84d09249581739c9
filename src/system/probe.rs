use sysinfo::{
    MemoryRefreshKind, Networks, Pid, ProcessRefreshKind, ProcessesToUpdate, RefreshKind, System,
};

use super::{NetworkCounters, ResourceSnapshot};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Owns the sysinfo handles for one reader of process/host counters.
pub(super) struct Probe {
    system: System,
    networks: Networks,
    pid: Pid,
}

impl Probe {
    pub(super) fn new() -> Self {
        let pid = Pid::from_u32(std::process::id());
        let mut system = System::new_with_specifics(
            RefreshKind::new()
                .with_processes(ProcessRefreshKind::everything())
                .with_memory(MemoryRefreshKind::everything()),
        );
        // Prime CPU accounting; the first refresh always reports zero.
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::everything(),
        );
        let networks = Networks::new_with_refreshed_list();
        Self {
            system,
            networks,
            pid,
        }
    }

    fn refresh_process(&mut self) {
        self.system.refresh_memory();
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[self.pid]),
            true,
            ProcessRefreshKind::everything(),
        );
    }

    /// Process CPU% and memory% in one refresh. Missing process data
    /// degrades to zeros.
    pub(super) fn cpu_and_memory(&mut self) -> (f64, f64) {
        self.refresh_process();
        let total_memory = self.system.total_memory();
        match self.system.process(self.pid) {
            Some(process) => {
                let memory_percent = if total_memory > 0 {
                    process.memory() as f64 / total_memory as f64 * 100.0
                } else {
                    0.0
                };
                (f64::from(process.cpu_usage()), memory_percent)
            }
            None => (0.0, 0.0),
        }
    }

    pub(super) fn network_counters(&mut self) -> NetworkCounters {
        self.networks.refresh();
        let mut counters = NetworkCounters::default();
        for (_name, data) in &self.networks {
            counters.bytes_sent = counters.bytes_sent.saturating_add(data.total_transmitted());
            counters.bytes_recv = counters.bytes_recv.saturating_add(data.total_received());
            counters.packets_sent = counters
                .packets_sent
                .saturating_add(data.total_packets_transmitted());
            counters.packets_recv = counters
                .packets_recv
                .saturating_add(data.total_packets_received());
        }
        counters
    }

    pub(super) fn snapshot(&mut self) -> ResourceSnapshot {
        self.refresh_process();
        let total_memory = self.system.total_memory();
        let network = self.network_counters();
        match self.system.process(self.pid) {
            Some(process) => {
                let disk = process.disk_usage();
                ResourceSnapshot {
                    cpu_percent: f64::from(process.cpu_usage()),
                    memory_rss_mb: process.memory() as f64 / BYTES_PER_MB,
                    memory_vms_mb: process.virtual_memory() as f64 / BYTES_PER_MB,
                    memory_percent: if total_memory > 0 {
                        process.memory() as f64 / total_memory as f64 * 100.0
                    } else {
                        0.0
                    },
                    network,
                    disk_read_mb: disk.total_read_bytes as f64 / BYTES_PER_MB,
                    disk_write_mb: disk.total_written_bytes as f64 / BYTES_PER_MB,
                }
            }
            None => ResourceSnapshot {
                network,
                ..ResourceSnapshot::default()
            },
        }
    }
}
