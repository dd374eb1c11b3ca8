//! Resource monitoring for the scan guards.

use std::time::{Duration, Instant};

/// Wall clock and memory readings consulted between chunks.
pub trait ScanMonitor {
    /// Time since the scan began.
    fn elapsed(&self) -> Duration;

    /// Resident memory of the process in MiB, or `None` when the platform
    /// does not report it.
    fn resident_memory_mb(&self) -> Option<f64>;
}

/// Monitor backed by the process clock and resident set size.
#[derive(Debug, Clone, Copy)]
pub struct ProcessMonitor {
    started: Instant,
}

impl ProcessMonitor {
    /// Start timing now.
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl ScanMonitor for ProcessMonitor {
    fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn resident_memory_mb(&self) -> Option<f64> {
        memory_stats::memory_stats().map(|m| m.physical_mem as f64 / (1024.0 * 1024.0))
    }
}

impl<M: ScanMonitor + ?Sized> ScanMonitor for &M {
    fn elapsed(&self) -> Duration {
        (**self).elapsed()
    }

    fn resident_memory_mb(&self) -> Option<f64> {
        (**self).resident_memory_mb()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_monitor_reads_plausible_values() {
        let m = ProcessMonitor::start();
        assert!(m.elapsed() < Duration::from_secs(60));
        if let Some(mb) = m.resident_memory_mb() {
            assert!(mb > 0.0 && mb.is_finite());
        }
    }
}
