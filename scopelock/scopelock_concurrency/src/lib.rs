#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

//! # Scopelock Concurrency
//!
//! Acquisition-side helpers for scopelock.
//!
//! Scopelock does not take locks itself. A [`LockCoordinator`] supplied by the
//! application does. This crate wraps a coordinator so that:
//!
//! - a scope is fully resolved before any lock is requested
//! - every acquired scope is released, on success, on error and on panic
//! - acquisitions, aborts and hold times are counted
//!
//! [`LockCoordinator`]: scopelock_core::LockCoordinator

/// Guarded execution of operations under a class scope
pub mod scheduler;

/// Scope guards and acquisition statistics
pub mod sync;

// Re-export key types for easier access
pub use scheduler::executor::GuardedExecutor;
pub use sync::{AcquisitionStats, ScopeGuard};
