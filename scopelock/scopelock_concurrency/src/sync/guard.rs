//! RAII guard over an acquired scope.

use log::{trace, warn};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use scopelock_core::error::Result;
use scopelock_core::{AcquisitionId, LockCoordinator, LockScope};

use super::stats::StatsCounters;

/// A scope held through a coordinator
///
/// The scope is released when the guard is dropped. Use
/// [`release`](Self::release) to observe the outcome of the release; a
/// release that fails during drop is only logged.
pub struct ScopeGuard<'a, C: LockCoordinator> {
    coordinator: &'a C,
    handle: Option<C::Handle>,
    scope: Arc<LockScope>,
    id: AcquisitionId,
    label: String,
    acquired_at: Instant,
    stats: Option<Arc<StatsCounters>>,
}

impl<'a, C: LockCoordinator> ScopeGuard<'a, C> {
    /// Acquires `scope` through `coordinator`
    ///
    /// # Arguments
    ///
    /// * `coordinator` - The coordinator that owns the lock table.
    /// * `scope` - The merged scope to hold, acquired in canonical order.
    ///
    /// # Returns
    ///
    /// A guard that releases the scope when dropped, or the coordinator's
    /// refusal.
    pub fn acquire(coordinator: &'a C, scope: Arc<LockScope>) -> Result<Self> {
        Self::acquire_inner(coordinator, scope, "scope".to_string(), None)
    }

    pub(crate) fn acquire_tracked(
        coordinator: &'a C,
        scope: Arc<LockScope>,
        label: String,
        stats: Arc<StatsCounters>,
    ) -> Result<Self> {
        Self::acquire_inner(coordinator, scope, label, Some(stats))
    }

    fn acquire_inner(
        coordinator: &'a C,
        scope: Arc<LockScope>,
        label: String,
        stats: Option<Arc<StatsCounters>>,
    ) -> Result<Self> {
        let id = AcquisitionId::new();
        let start = Instant::now();

        let handle = match coordinator.acquire(&scope) {
            Ok(handle) => handle,
            Err(e) => {
                if let Some(stats) = &stats {
                    stats.record_failed();
                }
                warn!("Acquisition {} for '{}' failed: {}", id, label, e);
                return Err(e);
            }
        };

        let wait_time = start.elapsed();
        if let Some(stats) = &stats {
            stats.record_acquired(wait_time);
        }

        trace!(
            "Acquisition {} for '{}' holds {} (wait time: {:.2}ms)",
            id,
            label,
            scope,
            wait_time.as_secs_f64() * 1000.0
        );

        Ok(Self {
            coordinator,
            handle: Some(handle),
            scope,
            id,
            label,
            acquired_at: Instant::now(),
            stats,
        })
    }

    /// Gets the identifier used to correlate log lines for this acquisition
    pub fn id(&self) -> AcquisitionId {
        self.id
    }

    /// Gets the held scope
    pub fn scope(&self) -> &LockScope {
        &self.scope
    }

    /// Gets how long the scope has been held
    pub fn held_for(&self) -> Duration {
        self.acquired_at.elapsed()
    }

    /// Releases the scope and reports the coordinator's answer
    ///
    /// # Returns
    ///
    /// `Ok(())` if the coordinator released every name. On error the guard is
    /// still consumed and the drop path does not retry.
    pub fn release(mut self) -> Result<()> {
        self.release_inner()
    }

    fn release_inner(&mut self) -> Result<()> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        let hold_time = self.acquired_at.elapsed();

        match self.coordinator.release(handle) {
            Ok(()) => {
                if let Some(stats) = &self.stats {
                    stats.record_released(hold_time);
                }
                trace!(
                    "Acquisition {} for '{}' released (held for: {:.2}ms)",
                    self.id,
                    self.label,
                    hold_time.as_secs_f64() * 1000.0
                );
                Ok(())
            }
            Err(e) => {
                if let Some(stats) = &self.stats {
                    stats.record_release_failure();
                }
                warn!(
                    "Acquisition {} for '{}' could not be released: {}",
                    self.id, self.label, e
                );
                Err(e)
            }
        }
    }
}

impl<C: LockCoordinator> Drop for ScopeGuard<'_, C> {
    fn drop(&mut self) {
        // Failures are already logged and counted.
        let _ = self.release_inner();
    }
}

impl<C: LockCoordinator> fmt::Debug for ScopeGuard<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeGuard")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("scope", &self.scope)
            .field("held", &self.handle.is_some())
            .finish()
    }
}
