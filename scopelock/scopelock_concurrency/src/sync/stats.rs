//! Acquisition statistics.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Snapshot of acquisition statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AcquisitionStats {
    /// Number of scopes acquired
    pub acquisition_count: usize,

    /// Number of scopes the coordinator released successfully
    pub released_count: usize,

    /// Number of acquisitions the coordinator refused
    pub failed_count: usize,

    /// Number of operations abandoned before acquisition because the scope
    /// could not be resolved
    pub aborted_count: usize,

    /// Number of releases the coordinator reported as failed
    pub release_failures: usize,

    /// Total time spent waiting for the coordinator (microseconds)
    pub total_wait_time_us: u64,

    /// Maximum time spent waiting for the coordinator (microseconds)
    pub max_wait_time_us: u64,

    /// Total time released scopes were held (microseconds)
    pub total_hold_time_us: u64,

    /// Maximum time a released scope was held (microseconds)
    pub max_hold_time_us: u64,
}

impl AcquisitionStats {
    /// Average time a released scope was held
    ///
    /// # Returns
    ///
    /// `None` until a scope has been released. Scopes still held and scopes
    /// whose release failed are not part of the average.
    pub fn average_hold_time(&self) -> Option<Duration> {
        if self.released_count == 0 {
            return None;
        }

        Some(Duration::from_micros(
            self.total_hold_time_us / self.released_count as u64,
        ))
    }
}

/// Shared counters behind [`AcquisitionStats`]
#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    acquisition_count: AtomicUsize,
    released_count: AtomicUsize,
    failed_count: AtomicUsize,
    aborted_count: AtomicUsize,
    release_failures: AtomicUsize,
    total_wait_time_us: AtomicUsize,
    max_wait_time_us: AtomicUsize,
    total_hold_time_us: AtomicUsize,
    max_hold_time_us: AtomicUsize,
}

impl StatsCounters {
    pub(crate) fn record_acquired(&self, wait_time: Duration) {
        let wait_time_us = wait_time.as_micros() as usize;
        self.acquisition_count.fetch_add(1, Ordering::Relaxed);
        self.total_wait_time_us
            .fetch_add(wait_time_us, Ordering::Relaxed);
        update_max(&self.max_wait_time_us, wait_time_us);
    }

    pub(crate) fn record_failed(&self) {
        self.failed_count.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_aborted(&self) {
        self.aborted_count.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_released(&self, hold_time: Duration) {
        let hold_time_us = hold_time.as_micros() as usize;
        self.released_count.fetch_add(1, Ordering::Relaxed);
        self.total_hold_time_us
            .fetch_add(hold_time_us, Ordering::Relaxed);
        update_max(&self.max_hold_time_us, hold_time_us);
    }

    pub(crate) fn record_release_failure(&self) {
        self.release_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> AcquisitionStats {
        AcquisitionStats {
            acquisition_count: self.acquisition_count.load(Ordering::Relaxed),
            released_count: self.released_count.load(Ordering::Relaxed),
            failed_count: self.failed_count.load(Ordering::Relaxed),
            aborted_count: self.aborted_count.load(Ordering::Relaxed),
            release_failures: self.release_failures.load(Ordering::Relaxed),
            total_wait_time_us: self.total_wait_time_us.load(Ordering::Relaxed) as u64,
            max_wait_time_us: self.max_wait_time_us.load(Ordering::Relaxed) as u64,
            total_hold_time_us: self.total_hold_time_us.load(Ordering::Relaxed) as u64,
            max_hold_time_us: self.max_hold_time_us.load(Ordering::Relaxed) as u64,
        }
    }

    pub(crate) fn reset(&self) {
        self.acquisition_count.store(0, Ordering::Relaxed);
        self.released_count.store(0, Ordering::Relaxed);
        self.failed_count.store(0, Ordering::Relaxed);
        self.aborted_count.store(0, Ordering::Relaxed);
        self.release_failures.store(0, Ordering::Relaxed);
        self.total_wait_time_us.store(0, Ordering::Relaxed);
        self.max_wait_time_us.store(0, Ordering::Relaxed);
        self.total_hold_time_us.store(0, Ordering::Relaxed);
        self.max_hold_time_us.store(0, Ordering::Relaxed);
    }
}

fn update_max(slot: &AtomicUsize, value: usize) {
    let mut current_max = slot.load(Ordering::Relaxed);

    while value > current_max {
        match slot.compare_exchange(current_max, value, Ordering::SeqCst, Ordering::Relaxed) {
            Ok(_) => break,
            Err(actual) => current_max = actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_snapshot() {
        let counters = StatsCounters::default();
        counters.record_acquired(Duration::from_micros(30));
        counters.record_acquired(Duration::from_micros(10));
        counters.record_released(Duration::from_micros(100));
        counters.record_released(Duration::from_micros(300));
        counters.record_failed();
        counters.record_aborted();
        counters.record_release_failure();

        let stats = counters.snapshot();
        assert_eq!(stats.acquisition_count, 2);
        assert_eq!(stats.released_count, 2);
        assert_eq!(stats.failed_count, 1);
        assert_eq!(stats.aborted_count, 1);
        assert_eq!(stats.release_failures, 1);
        assert_eq!(stats.total_wait_time_us, 40);
        assert_eq!(stats.max_wait_time_us, 30);
        assert_eq!(stats.total_hold_time_us, 400);
        assert_eq!(stats.max_hold_time_us, 300);
        assert_eq!(stats.average_hold_time(), Some(Duration::from_micros(200)));
    }

    #[test]
    fn test_average_ignores_scopes_still_held() {
        let counters = StatsCounters::default();
        counters.record_acquired(Duration::from_micros(1));
        counters.record_acquired(Duration::from_micros(1));
        counters.record_acquired(Duration::from_micros(1));
        counters.record_released(Duration::from_micros(600));

        let stats = counters.snapshot();
        assert_eq!(stats.acquisition_count, 3);
        assert_eq!(stats.released_count, 1);
        assert_eq!(stats.average_hold_time(), Some(Duration::from_micros(600)));
    }

    #[test]
    fn test_reset() {
        let counters = StatsCounters::default();
        counters.record_acquired(Duration::from_micros(5));
        counters.reset();

        assert_eq!(counters.snapshot(), AcquisitionStats::default());
        assert_eq!(counters.snapshot().average_hold_time(), None);
    }
}
