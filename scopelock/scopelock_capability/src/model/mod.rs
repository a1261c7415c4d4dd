mod common_locks;
mod unit;

use std::sync::Arc;

use scopelock_core::Contribute;

pub use common_locks::{CommonLocks, COMMON_LOCKS_READ, COMMON_LOCKS_UNIT, COMMON_LOCKS_WRITE};
pub use unit::{LazyUnit, StaticUnit};

/// Names of the units that ship with scopelock.
pub const BUILTIN_UNITS: &[&str] = &[COMMON_LOCKS_UNIT];

/// Look up a built-in unit by name.
///
/// # Returns
///
/// The shared unit, or `None` if `name` is not in [`BUILTIN_UNITS`].
pub fn builtin_unit(name: &str) -> Option<Arc<dyn Contribute>> {
    match name {
        COMMON_LOCKS_UNIT => Some(Arc::new(CommonLocks)),
        _ => None,
    }
}
