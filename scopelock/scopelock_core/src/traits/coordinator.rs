//! Lock coordinator trait.
//!
//! The coordinator is the external collaborator that actually takes locks. It
//! receives a fully resolved scope, acquires the `read` names in shared mode
//! and the `write` names in exclusive mode, and returns a handle that is
//! later given back to release them. Blocking, lease and distribution
//! strategies are entirely the coordinator's business.

use std::sync::Arc;

use crate::error::Result;
use crate::types::LockScope;

/// Interface of the lock manager that consumes resolved scopes.
///
/// Implementations must acquire in [`LockScope::acquisition_order`] so that
/// concurrently running operations with overlapping scopes always request
/// resources in the same global order.
///
/// # Examples
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use scopelock_core::error::Result;
/// use scopelock_core::{LockCoordinator, LockScope};
///
/// #[derive(Default)]
/// struct CountingCoordinator {
///     held: AtomicUsize,
/// }
///
/// impl LockCoordinator for CountingCoordinator {
///     type Handle = usize;
///
///     fn acquire(&self, scope: &LockScope) -> Result<usize> {
///         self.held.fetch_add(scope.len(), Ordering::SeqCst);
///         Ok(scope.len())
///     }
///
///     fn release(&self, handle: usize) -> Result<()> {
///         self.held.fetch_sub(handle, Ordering::SeqCst);
///         Ok(())
///     }
/// }
///
/// let coordinator = CountingCoordinator::default();
/// let scope = LockScope::from_names(["a"], ["b"]).unwrap();
/// let handle = coordinator.acquire(&scope).unwrap();
/// assert_eq!(coordinator.held.load(Ordering::SeqCst), 2);
/// coordinator.release(handle).unwrap();
/// assert_eq!(coordinator.held.load(Ordering::SeqCst), 0);
/// ```
pub trait LockCoordinator: Send + Sync {
    /// Token representing a held scope.
    type Handle: Send;

    /// Acquire every lock in `scope`.
    ///
    /// Either the whole scope is held when this returns `Ok`, or nothing is.
    fn acquire(&self, scope: &LockScope) -> Result<Self::Handle>;

    /// Release a scope previously returned by `acquire`.
    fn release(&self, handle: Self::Handle) -> Result<()>;
}

impl<C: LockCoordinator + ?Sized> LockCoordinator for Arc<C> {
    type Handle = C::Handle;

    fn acquire(&self, scope: &LockScope) -> Result<Self::Handle> {
        (**self).acquire(scope)
    }

    fn release(&self, handle: Self::Handle) -> Result<()> {
        (**self).release(handle)
    }
}

impl<C: LockCoordinator + ?Sized> LockCoordinator for &C {
    type Handle = C::Handle;

    fn acquire(&self, scope: &LockScope) -> Result<Self::Handle> {
        (**self).acquire(scope)
    }

    fn release(&self, handle: Self::Handle) -> Result<()> {
        (**self).release(handle)
    }
}
