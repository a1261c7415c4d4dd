//! Resource names.
//!
//! A resource name identifies a lockable logical entity such as a table, a
//! collection or a queue. Names are opaque: scopelock only relies on their
//! equality and on their total (lexicographic) order.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use crate::error::{DefinitionError, Result};

/// An opaque, process-wide unique name of a lockable resource.
///
/// The derived ordering is the lexicographic byte order of the name, which is
/// the canonical acquisition order used across the whole system.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceName(String);

impl ResourceName {
    /// Create a resource name, rejecting malformed input.
    ///
    /// A name must be non-empty, must not start or end with whitespace and
    /// must not contain control characters.
    ///
    /// # Examples
    ///
    /// ```
    /// use scopelock_core::ResourceName;
    ///
    /// let name = ResourceName::new("core_tasks").unwrap();
    /// assert_eq!(name.as_str(), "core_tasks");
    ///
    /// assert!(ResourceName::new("").is_err());
    /// assert!(ResourceName::new(" core_tasks").is_err());
    /// ```
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Ok(Self::validated(name.into())?)
    }

    fn validated(name: String) -> std::result::Result<Self, DefinitionError> {
        let malformed = name.is_empty()
            || name.trim() != name
            || name.chars().any(char::is_control);

        if malformed {
            return Err(DefinitionError::InvalidResourceName(name));
        }

        Ok(Self(name))
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the name, returning the underlying string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ResourceName {
    type Error = DefinitionError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Self::validated(value)
    }
}

impl TryFrom<&str> for ResourceName {
    type Error = DefinitionError;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        Self::validated(value.to_string())
    }
}

impl FromStr for ResourceName {
    type Err = DefinitionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::validated(s.to_string())
    }
}

impl From<ResourceName> for String {
    fn from(name: ResourceName) -> Self {
        name.0
    }
}

impl AsRef<str> for ResourceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ResourceName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
