//! Capability contribution trait.
//!
//! A capability unit is a reusable declaration fragment. Attached to a
//! resource class, it contributes the resources that must be locked before any
//! operation on that class runs. Units do not know about each other; the class
//! merges their contributions.

use std::fmt::Debug;
use std::sync::Arc;

use crate::error::Result;
use crate::types::LockScope;

/// Core trait for capability units.
///
/// `contribute` must be pure and deterministic: no I/O and no reliance on
/// instance state, because scopes gate operations that run before any
/// instance exists. The returned scope is shared, so implementations
/// typically build it once and hand out clones of the `Arc`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use scopelock_core::error::Result;
/// use scopelock_core::{Contribute, LockScope};
///
/// #[derive(Debug)]
/// struct TaskQueue {
///     scope: Arc<LockScope>,
/// }
///
/// impl TaskQueue {
///     fn new() -> Result<Self> {
///         Ok(Self {
///             scope: Arc::new(LockScope::write_only(["core_tasks"])?),
///         })
///     }
/// }
///
/// impl Contribute for TaskQueue {
///     fn unit_name(&self) -> &str {
///         "task_queue"
///     }
///
///     fn contribute(&self) -> Result<Arc<LockScope>> {
///         Ok(Arc::clone(&self.scope))
///     }
/// }
///
/// let unit = TaskQueue::new().unwrap();
/// assert!(unit.contribute().unwrap().write().contains("core_tasks"));
/// ```
pub trait Contribute: Send + Sync + Debug {
    /// Returns the name this unit is registered under.
    ///
    /// Names identify units in errors and reports, and a class rejects two
    /// units with the same name.
    fn unit_name(&self) -> &str;

    /// Returns the lock scope this unit contributes.
    ///
    /// # Returns
    ///
    /// * `Ok(Arc<LockScope>)` - The contribution.
    /// * `Err(Error)` - If the unit cannot produce its contribution. The
    ///   failure is propagated to whoever resolves the class scope.
    fn contribute(&self) -> Result<Arc<LockScope>>;
}

impl<T: Contribute + ?Sized> Contribute for Arc<T> {
    fn unit_name(&self) -> &str {
        (**self).unit_name()
    }

    fn contribute(&self) -> Result<Arc<LockScope>> {
        (**self).contribute()
    }
}

impl<T: Contribute + ?Sized> Contribute for Box<T> {
    fn unit_name(&self) -> &str {
        (**self).unit_name()
    }

    fn contribute(&self) -> Result<Arc<LockScope>> {
        (**self).contribute()
    }
}
