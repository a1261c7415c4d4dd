//! Core traits that define the scopelock interfaces.
//!
//! - `Contribute`: implemented by capability units to declare their locking needs
//! - `LockCoordinator`: implemented by the external lock manager that takes and
//!   releases the resolved scope

pub mod contribute;
pub mod coordinator;

pub use contribute::Contribute;
pub use coordinator::LockCoordinator;
