//! Guarded execution.
//!
//! An executor runs an operation only while the full scope of its resource
//! class is held:
//!
//! - the scope is resolved before anything is acquired
//! - resolution failures abort the operation before it starts
//! - the scope is released on every exit path

pub mod executor;

pub use executor::GuardedExecutor;
