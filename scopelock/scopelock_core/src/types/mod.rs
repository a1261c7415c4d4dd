//! Core data types.
//!
//! This module defines the data model shared by every scopelock crate:
//! resource names, lock modes and lock scopes.

pub mod resource;
pub mod scope;

pub use resource::ResourceName;
pub use scope::{LockMode, LockScope};
