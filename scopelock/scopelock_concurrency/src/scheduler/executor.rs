//! Operation execution under a resolved lock scope.

use log::{debug, warn};
use std::sync::Arc;

use scopelock_capability::class::LockScoped;
use scopelock_core::error::{Error, Result};
use scopelock_core::{LockCoordinator, LockScope};

use crate::sync::guard::ScopeGuard;
use crate::sync::stats::{AcquisitionStats, StatsCounters};

/// Runs operations while their class scope is held through a coordinator
///
/// # Examples
///
/// ```
/// use scopelock_capability::model::StaticUnit;
/// use scopelock_capability::ResourceClass;
/// use scopelock_concurrency::GuardedExecutor;
/// use scopelock_core::error::{Error, Result};
/// use scopelock_core::{LockCoordinator, LockScope};
///
/// struct Permissive;
///
/// impl LockCoordinator for Permissive {
///     type Handle = ();
///
///     fn acquire(&self, _scope: &LockScope) -> Result<()> {
///         Ok(())
///     }
///
///     fn release(&self, _handle: ()) -> Result<()> {
///         Ok(())
///     }
/// }
///
/// let jobs = ResourceClass::builder("jobs")
///     .attach(StaticUnit::from_names("tasks", Vec::<&str>::new(), ["core_tasks"]).unwrap())
///     .build()
///     .unwrap();
///
/// let executor = GuardedExecutor::new(Permissive);
/// let locked = executor
///     .run(&jobs, |scope| Ok::<_, Error>(scope.write().len()))
///     .unwrap();
///
/// assert_eq!(locked, 1);
/// assert_eq!(executor.stats().acquisition_count, 1);
/// ```
pub struct GuardedExecutor<C: LockCoordinator> {
    coordinator: C,
    stats: Arc<StatsCounters>,
    name: String,
}

impl<C: LockCoordinator> GuardedExecutor<C> {
    /// Creates an executor over `coordinator`
    pub fn new(coordinator: C) -> Self {
        Self::with_name(coordinator, "executor")
    }

    /// Creates an executor with a name used in log lines
    ///
    /// # Arguments
    ///
    /// * `coordinator` - The coordinator every acquisition goes through.
    /// * `name` - Prefix for this executor's log lines.
    pub fn with_name(coordinator: C, name: impl Into<String>) -> Self {
        Self {
            coordinator,
            stats: Arc::new(StatsCounters::default()),
            name: name.into(),
        }
    }

    /// Gets the executor name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the underlying coordinator
    pub fn coordinator(&self) -> &C {
        &self.coordinator
    }

    /// Resolves the scope of `class` and acquires it
    ///
    /// Nothing is requested from the coordinator unless the scope resolves
    /// completely.
    ///
    /// # Returns
    ///
    /// A guard holding the class scope. A resolution failure is counted as
    /// an abort and nothing reaches the coordinator.
    pub fn acquire<S: LockScoped + ?Sized>(&self, class: &S) -> Result<ScopeGuard<'_, C>> {
        let class = class.resource_class();

        let scope = class.locks_for_any().map_err(|e| {
            self.stats.record_aborted();
            warn!(
                "{}: not acquiring for class '{}', scope did not resolve: {}",
                self.name,
                class.name(),
                e
            );
            e
        })?;

        ScopeGuard::acquire_tracked(
            &self.coordinator,
            scope,
            class.name().to_string(),
            Arc::clone(&self.stats),
        )
    }

    /// Runs `op` while the scope of `class` is held
    ///
    /// The scope is released after `op` returns, whether it succeeded or not,
    /// and also if it panics. When `op` succeeds but the release fails, the
    /// release error is returned; when both fail, the error of `op` wins.
    ///
    /// # Arguments
    ///
    /// * `class` - The class whose merged scope guards the operation.
    /// * `op` - The operation. It is not called if acquisition fails.
    ///
    /// # Returns
    ///
    /// The value of `op`, or the first error by the rules above.
    pub fn run<S, T, E, F>(&self, class: &S, op: F) -> std::result::Result<T, E>
    where
        S: LockScoped + ?Sized,
        E: From<Error>,
        F: FnOnce(&LockScope) -> std::result::Result<T, E>,
    {
        let guard = self.acquire(class)?;
        debug!(
            "{}: running under acquisition {} for '{}'",
            self.name,
            guard.id(),
            class.resource_class().name()
        );

        let result = op(guard.scope());
        let released = guard.release();

        match (result, released) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(e)) => Err(e.into()),
            (Err(e), _) => Err(e),
        }
    }

    /// Gets a snapshot of the acquisition statistics
    pub fn stats(&self) -> AcquisitionStats {
        self.stats.snapshot()
    }

    /// Resets the acquisition statistics
    pub fn reset_stats(&self) {
        self.stats.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scopelock_capability::model::{CommonLocks, StaticUnit};
    use scopelock_capability::ResourceClass;
    use scopelock_core::error::{ContributionError, CoordinatorError};
    use scopelock_core::Contribute;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct Recording {
        acquired: AtomicUsize,
        released: AtomicUsize,
        fail_release: AtomicBool,
    }

    impl LockCoordinator for Recording {
        type Handle = ();

        fn acquire(&self, _scope: &LockScope) -> Result<()> {
            self.acquired.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn release(&self, _handle: ()) -> Result<()> {
            self.released.fetch_add(1, Ordering::SeqCst);
            if self.fail_release.load(Ordering::SeqCst) {
                return Err(CoordinatorError::ReleaseFailed("lease expired".into()).into());
            }
            Ok(())
        }
    }

    #[derive(Debug)]
    struct Flaky {
        calls: AtomicUsize,
    }

    impl Contribute for Flaky {
        fn unit_name(&self) -> &str {
            "flaky"
        }

        fn contribute(&self) -> Result<Arc<LockScope>> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(Arc::new(LockScope::empty()))
            } else {
                Err(ContributionError::Unavailable("gone".into()).into())
            }
        }
    }

    fn jobs() -> ResourceClass {
        ResourceClass::builder("jobs")
            .attach(CommonLocks)
            .build()
            .unwrap()
    }

    #[test]
    fn test_run_acquires_and_releases() {
        let executor = GuardedExecutor::with_name(Recording::default(), "test");
        let value = executor
            .run(&jobs(), |scope| {
                assert!(scope.write().contains("core_tasks"));
                Ok::<_, Error>(42)
            })
            .unwrap();

        assert_eq!(value, 42);
        assert_eq!(executor.coordinator().acquired.load(Ordering::SeqCst), 1);
        assert_eq!(executor.coordinator().released.load(Ordering::SeqCst), 1);
        assert_eq!(executor.name(), "test");
        assert_eq!(executor.stats().released_count, 1);
    }

    #[test]
    fn test_failed_operation_still_releases() {
        let executor = GuardedExecutor::new(Recording::default());
        let err = executor
            .run(&jobs(), |_| -> Result<()> {
                Err(Error::NotFound("row".into()))
            })
            .unwrap_err();

        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(executor.coordinator().released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unresolvable_scope_aborts_before_acquire() {
        let class = ResourceClass::builder("fragile")
            .attach(Flaky {
                calls: AtomicUsize::new(0),
            })
            .build()
            .unwrap();
        let executor = GuardedExecutor::new(Recording::default());
        let ran = AtomicBool::new(false);

        let err = executor
            .run(&class, |_| {
                ran.store(true, Ordering::SeqCst);
                Ok::<_, Error>(())
            })
            .unwrap_err();

        assert!(matches!(err, Error::Contribution(_)));
        assert!(!ran.load(Ordering::SeqCst));
        assert_eq!(executor.coordinator().acquired.load(Ordering::SeqCst), 0);
        assert_eq!(executor.stats().aborted_count, 1);
    }

    #[test]
    fn test_release_failure_surfaces_after_success() {
        let coordinator = Recording::default();
        coordinator.fail_release.store(true, Ordering::SeqCst);
        let executor = GuardedExecutor::new(coordinator);

        let err = executor.run(&jobs(), |_| Ok::<_, Error>(())).unwrap_err();
        assert!(matches!(
            err,
            Error::Coordinator(CoordinatorError::ReleaseFailed(_))
        ));
        assert_eq!(executor.stats().release_failures, 1);
        assert_eq!(executor.stats().released_count, 0);
    }

    #[test]
    fn test_acquire_returns_guard() {
        let class = ResourceClass::builder("ledger")
            .attach(StaticUnit::from_names("ledger", ["accounts"], ["entries"]).unwrap())
            .build()
            .unwrap();
        let executor = GuardedExecutor::new(Recording::default());

        {
            let guard = executor.acquire(&class).unwrap();
            assert!(guard.scope().read().contains("accounts"));
        }

        let stats = executor.stats();
        assert_eq!(stats.acquisition_count, 1);
        assert_eq!(executor.coordinator().released.load(Ordering::SeqCst), 1);

        executor.reset_stats();
        assert_eq!(executor.stats(), AcquisitionStats::default());
    }
}
