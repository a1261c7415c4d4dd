//! Strongly-typed identifiers.
//!
//! Each identifier is a thin wrapper around a UUID with a phantom type
//! parameter, so that identifiers for different entities cannot be mixed up.
//! Identifiers are used for log correlation only; resources themselves are
//! identified by [`ResourceName`](crate::types::ResourceName).
//!
//! # Examples
//!
//! ```
//! use scopelock_core::id::{AcquisitionId, ClassId};
//!
//! let acquisition = AcquisitionId::new();
//! let class = ClassId::new();
//! assert_ne!(acquisition.to_string(), class.to_string());
//! ```

use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

/// A type-safe identifier based on UUID.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Id<T> {
    uuid: Uuid,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    /// Create a new random identifier.
    pub fn new() -> Self {
        Self {
            uuid: Uuid::new_v4(),
            _marker: PhantomData,
        }
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uuid)
    }
}

/// Marker type for lock acquisitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AcquisitionMarker;
/// Identifier for one scoped lock acquisition.
pub type AcquisitionId = Id<AcquisitionMarker>;

/// Marker type for resource classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassMarker;
/// Identifier for one definition of a resource class.
pub type ClassId = Id<ClassMarker>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_new() {
        let id1 = AcquisitionId::new();
        let id2 = AcquisitionId::new();
        assert_ne!(id1, id2, "Generated IDs should be unique");
    }

    #[test]
    fn test_id_display_is_hyphenated_uuid() {
        let rendered = ClassId::new().to_string();
        assert_eq!(rendered.len(), 36);
        assert_eq!(rendered.matches('-').count(), 4);
        assert!(Uuid::parse_str(&rendered).is_ok());
    }
}
