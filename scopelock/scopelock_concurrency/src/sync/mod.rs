//! Scope guards and acquisition statistics.
//!
//! A [`ScopeGuard`] holds one acquired scope and gives it back to the
//! coordinator when it goes out of scope. Guards created by an executor
//! report into the executor's [`AcquisitionStats`].

pub mod guard;
pub mod stats;

pub use guard::ScopeGuard;
pub use stats::AcquisitionStats;
