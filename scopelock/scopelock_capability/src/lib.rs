//! # Scopelock Capability
//!
//! This crate implements the composition side of scopelock: capability units
//! that declare what they need locked, the aggregator that merges those
//! declarations, and the resource classes that expose the merged result.
//!
//! ## Core Components
//!
//! - **Model**: Capability units (static, lazy and the built-in common locks)
//! - **Check**: The aggregator that merges contributions with write-wins and
//!   canonical ordering, and explains where each name came from
//! - **Class**: Resource classes, their builder, and the `LockScoped` slot
//! - **Store**: A thread-safe registry of defined classes
//!
//! ## Usage Example
//!
//! ```rust
//! use scopelock_capability::model::{CommonLocks, StaticUnit};
//! use scopelock_capability::class::{LockScoped, ResourceClass};
//!
//! let audit = StaticUnit::from_names("audit", ["audit_log"], ["audit_queue"]).unwrap();
//!
//! let users = ResourceClass::builder("users")
//!     .attach(CommonLocks)
//!     .attach(audit)
//!     .build()
//!     .unwrap();
//!
//! let scope = users.locks_for_any().unwrap();
//! assert!(scope.read().contains("auth_users"));
//! assert!(scope.read().contains("audit_log"));
//! assert!(scope.write().contains("core_tasks"));
//! assert!(scope.write().contains("audit_queue"));
//! ```

pub mod check;
pub mod class;
pub mod model;
pub mod store;

// Re-export commonly used types
pub use check::{aggregate, Contribution, ScopeAggregator, ScopeReport};
pub use class::{LockScoped, ResourceClass, ResourceClassBuilder};
pub use model::{builtin_unit, CommonLocks, LazyUnit, StaticUnit, COMMON_LOCKS_UNIT};
pub use store::ClassRegistry;
