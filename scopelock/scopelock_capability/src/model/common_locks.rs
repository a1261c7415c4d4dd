//! The common locks unit.
//!
//! Operations on resource classes that carry this unit need shared access to
//! the authorization catalog and to the core migration ledger, and exclusive
//! access to the core task queue.

use once_cell::sync::OnceCell;
use std::sync::Arc;

use scopelock_core::error::Result;
use scopelock_core::{Contribute, LockScope};

/// Name under which the common locks unit is registered.
pub const COMMON_LOCKS_UNIT: &str = "common_locks";

/// Resources the common locks unit reads.
pub const COMMON_LOCKS_READ: [&str; 11] = [
    "auth_migrations",
    "auth_users",
    "auth_sessions",
    "auth_spaces",
    "auth_roles",
    "auth_space_users",
    "auth_sections",
    "auth_rules",
    "auth_permissions",
    "auth_role_permissions",
    "core_migrations",
];

/// Resources the common locks unit writes.
pub const COMMON_LOCKS_WRITE: [&str; 1] = ["core_tasks"];

// Built once per process and shared by every class carrying the unit.
static COMMON_LOCKS_SCOPE: OnceCell<Arc<LockScope>> = OnceCell::new();

/// Built-in unit contributing the common locks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommonLocks;

impl Contribute for CommonLocks {
    fn unit_name(&self) -> &str {
        COMMON_LOCKS_UNIT
    }

    fn contribute(&self) -> Result<Arc<LockScope>> {
        COMMON_LOCKS_SCOPE
            .get_or_try_init(|| {
                LockScope::from_names(COMMON_LOCKS_READ, COMMON_LOCKS_WRITE).map(Arc::new)
            })
            .cloned()
    }
}
