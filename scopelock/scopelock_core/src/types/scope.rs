//! Lock scopes.
//!
//! A lock scope is the pair of resource-name sets that must be held before an
//! operation runs: `read` names in shared mode and `write` names in exclusive
//! mode. Both sets are kept in canonical order, and a name is never a member
//! of both: exclusive access subsumes shared access, so a name requested in
//! both modes is kept in `write` only.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::resource::ResourceName;
use crate::error::Result;

/// The mode in which a resource must be locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockMode {
    /// Shared access, requested through the `read` set.
    Shared,

    /// Exclusive access, requested through the `write` set.
    Exclusive,
}

impl LockMode {
    /// Get the name of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shared => "shared",
            Self::Exclusive => "exclusive",
        }
    }

    /// Returns true if this mode satisfies a requirement for `required`.
    ///
    /// Exclusive access satisfies both modes, shared access only satisfies
    /// shared requirements.
    pub fn satisfies(&self, required: LockMode) -> bool {
        *self >= required
    }
}

impl fmt::Display for LockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The read and write sets required before an operation may run.
///
/// # Examples
///
/// ```
/// use scopelock_core::{LockMode, LockScope};
///
/// let scope = LockScope::from_names(["auth_users", "auth_roles"], ["core_tasks"]).unwrap();
///
/// let order: Vec<(&str, LockMode)> = scope
///     .acquisition_order()
///     .into_iter()
///     .map(|(name, mode)| (name.as_str(), mode))
///     .collect();
///
/// assert_eq!(
///     order,
///     vec![
///         ("auth_roles", LockMode::Shared),
///         ("auth_users", LockMode::Shared),
///         ("core_tasks", LockMode::Exclusive),
///     ]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawLockScope")]
pub struct LockScope {
    read: BTreeSet<ResourceName>,
    write: BTreeSet<ResourceName>,
}

/// Unvalidated form used when deserializing.
#[derive(Deserialize)]
struct RawLockScope {
    #[serde(default)]
    read: Vec<ResourceName>,
    #[serde(default)]
    write: Vec<ResourceName>,
}

impl From<RawLockScope> for LockScope {
    fn from(raw: RawLockScope) -> Self {
        Self::resolve(raw.read.into_iter().collect(), raw.write.into_iter().collect())
    }
}

impl LockScope {
    /// Create an empty scope.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a scope from resource names.
    ///
    /// Duplicates within one set collapse, and a name present in both sets is
    /// kept in `write` only.
    pub fn new<R, W>(read: R, write: W) -> Self
    where
        R: IntoIterator<Item = ResourceName>,
        W: IntoIterator<Item = ResourceName>,
    {
        Self::resolve(read.into_iter().collect(), write.into_iter().collect())
    }

    /// Create a scope from raw names, rejecting malformed ones.
    pub fn from_names<R, W>(read: R, write: W) -> Result<Self>
    where
        R: IntoIterator,
        R::Item: AsRef<str>,
        W: IntoIterator,
        W::Item: AsRef<str>,
    {
        let read = read
            .into_iter()
            .map(|name| ResourceName::new(name.as_ref()))
            .collect::<Result<BTreeSet<_>>>()?;
        let write = write
            .into_iter()
            .map(|name| ResourceName::new(name.as_ref()))
            .collect::<Result<BTreeSet<_>>>()?;

        Ok(Self::resolve(read, write))
    }

    /// Create a scope that only reads the given names.
    pub fn read_only<R>(read: R) -> Result<Self>
    where
        R: IntoIterator,
        R::Item: AsRef<str>,
    {
        Self::from_names(read, std::iter::empty::<&str>())
    }

    /// Create a scope that only writes the given names.
    pub fn write_only<W>(write: W) -> Result<Self>
    where
        W: IntoIterator,
        W::Item: AsRef<str>,
    {
        Self::from_names(std::iter::empty::<&str>(), write)
    }

    /// Create a scope from possibly overlapping sets, applying write-wins.
    ///
    /// Any name present in `write` is removed from `read`.
    pub fn resolve(mut read: BTreeSet<ResourceName>, write: BTreeSet<ResourceName>) -> Self {
        read.retain(|name| !write.contains(name));
        Self { read, write }
    }

    /// Names locked in shared mode, in canonical order.
    pub fn read(&self) -> &BTreeSet<ResourceName> {
        &self.read
    }

    /// Names locked in exclusive mode, in canonical order.
    pub fn write(&self) -> &BTreeSet<ResourceName> {
        &self.write
    }

    /// Returns true if the scope requires no locks at all.
    pub fn is_empty(&self) -> bool {
        self.read.is_empty() && self.write.is_empty()
    }

    /// Number of distinct names in the scope.
    pub fn len(&self) -> usize {
        self.read.len() + self.write.len()
    }

    /// The mode in which `name` must be locked, if the scope mentions it.
    pub fn mode_of(&self, name: &str) -> Option<LockMode> {
        if self.write.contains(name) {
            Some(LockMode::Exclusive)
        } else if self.read.contains(name) {
            Some(LockMode::Shared)
        } else {
            None
        }
    }

    /// Returns true if the scope mentions `name` in either set.
    pub fn contains(&self, name: &str) -> bool {
        self.mode_of(name).is_some()
    }

    /// Every name in the scope with its mode, in one canonical sequence.
    ///
    /// A coordinator that takes locks in this order takes them in the same
    /// global order as every other coordinator using scopelock scopes.
    pub fn acquisition_order(&self) -> Vec<(&ResourceName, LockMode)> {
        let mut order: Vec<(&ResourceName, LockMode)> = self
            .read
            .iter()
            .map(|name| (name, LockMode::Shared))
            .chain(self.write.iter().map(|name| (name, LockMode::Exclusive)))
            .collect();

        order.sort_by(|a, b| a.0.cmp(b.0));
        order
    }

    /// All names in the scope, in canonical order.
    pub fn names(&self) -> Vec<&ResourceName> {
        self.acquisition_order()
            .into_iter()
            .map(|(name, _)| name)
            .collect()
    }

    /// Merge two scopes, applying write-wins.
    pub fn union(&self, other: &LockScope) -> LockScope {
        let read = self.read.union(&other.read).cloned().collect();
        let write = self.write.union(&other.write).cloned().collect();
        Self::resolve(read, write)
    }

    /// Returns true if holding `self` satisfies every requirement of `other`.
    pub fn covers(&self, other: &LockScope) -> bool {
        other
            .acquisition_order()
            .into_iter()
            .all(|(name, required)| {
                self.mode_of(name.as_str())
                    .is_some_and(|held| held.satisfies(required))
            })
    }
}

impl fmt::Display for LockScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |set: &BTreeSet<ResourceName>| {
            set.iter()
                .map(ResourceName::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        };

        write!(f, "read: [{}]; write: [{}]", join(&self.read), join(&self.write))
    }
}
