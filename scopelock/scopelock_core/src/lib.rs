//! # Scopelock Core
//!
//! `scopelock_core` provides the fundamental building blocks for composable,
//! declarative lock scopes. This includes error types, identifiers, the
//! resource-name and lock-scope data model, and the traits that sit at the
//! two seams of the system.
//!
//! ## Core Principles
//!
//! 1. **Declarative Contributions**: Independent capability units attached to a
//!    resource class each declare which logical resources must be read-locked
//!    or write-locked before an operation on that class may run.
//!
//! 2. **Deterministic Composition**: Contributions are merged by set union,
//!    with exclusive access subsuming shared access:
//!    ```text
//!    read(class)  := ⋃ read(unit) \ ⋃ write(unit)
//!    write(class) := ⋃ write(unit)
//!    ```
//!
//! 3. **Canonical Ordering**: Resource names are totally ordered, and every
//!    scope iterates in that order. A coordinator that acquires in scope order
//!    acquires in the same global order for every class and every operation.
//!
//! 4. **Complete Before Acquire**: A scope is resolved completely, or not at
//!    all, before the first lock request is issued.
//!
//! ## Crate Structure
//!
//! - **error**: Error types for all scopelock components
//! - **id**: Strongly-typed identifier types
//! - **traits**: The `Contribute` and `LockCoordinator` interfaces
//! - **types**: `ResourceName`, `LockScope` and `LockMode`
//! - **utils**: Configuration and logging helpers

pub mod error;
pub mod id;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export key types and traits for convenience
pub use error::{Error, Result};
pub use id::{AcquisitionId, ClassId};
pub use traits::{Contribute, LockCoordinator};
pub use types::{LockMode, LockScope, ResourceName};
pub use utils::{LogLevel, ScopeConfig};
