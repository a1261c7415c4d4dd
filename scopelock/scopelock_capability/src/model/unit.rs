use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;

use scopelock_core::error::Result;
use scopelock_core::utils::UnitConfig;
use scopelock_core::{Contribute, LockScope};

/// A unit whose contribution is a fixed scope.
///
/// The scope is validated when the unit is created and shared by reference
/// afterwards, so contributing never allocates.
#[derive(Debug, Clone)]
pub struct StaticUnit {
    name: String,
    scope: Arc<LockScope>,
}

impl StaticUnit {
    /// Creates a unit contributing `scope`
    pub fn new(name: impl Into<String>, scope: LockScope) -> Self {
        Self {
            name: name.into(),
            scope: Arc::new(scope),
        }
    }

    /// Creates a unit from raw read and write names
    ///
    /// # Arguments
    ///
    /// * `name` - Unit name shown in errors and reports.
    /// * `read` - Names to hold shared.
    /// * `write` - Names to hold exclusively. A name in both lists is written.
    ///
    /// # Returns
    ///
    /// The unit, or an error if any name is invalid.
    pub fn from_names<R, W>(name: impl Into<String>, read: R, write: W) -> Result<Self>
    where
        R: IntoIterator,
        R::Item: AsRef<str>,
        W: IntoIterator,
        W::Item: AsRef<str>,
    {
        Ok(Self::new(name, LockScope::from_names(read, write)?))
    }

    /// Creates a unit from its configuration entry
    ///
    /// # Arguments
    ///
    /// * `name` - The key the unit is declared under.
    /// * `config` - The declared read and write lists.
    pub fn from_config(name: impl Into<String>, config: &UnitConfig) -> Result<Self> {
        Ok(Self::new(name, config.to_scope()?))
    }

    /// Gets the scope this unit contributes
    pub fn scope(&self) -> &LockScope {
        &self.scope
    }
}

impl Contribute for StaticUnit {
    fn unit_name(&self) -> &str {
        &self.name
    }

    fn contribute(&self) -> Result<Arc<LockScope>> {
        Ok(Arc::clone(&self.scope))
    }
}

type ScopeProducer = dyn Fn() -> Result<LockScope> + Send + Sync;

/// A unit whose contribution is produced by a closure on first use.
///
/// The closure runs at most once successfully; its result is memoized for the
/// lifetime of the unit. A failed attempt is not memoized, so the failure
/// surfaces again on the next call instead of turning into an empty scope.
pub struct LazyUnit {
    name: String,
    producer: Box<ScopeProducer>,
    resolved: OnceCell<Arc<LockScope>>,
}

impl LazyUnit {
    /// Creates a unit whose scope is produced by `producer`
    ///
    /// # Arguments
    ///
    /// * `name` - Unit name shown in errors and reports.
    /// * `producer` - Called on first contribution and again after a failure.
    pub fn new<F>(name: impl Into<String>, producer: F) -> Self
    where
        F: Fn() -> Result<LockScope> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            producer: Box::new(producer),
            resolved: OnceCell::new(),
        }
    }

    /// Returns true once the producer has run successfully
    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }
}

impl fmt::Debug for LazyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyUnit")
            .field("name", &self.name)
            .field("resolved", &self.resolved.get())
            .finish()
    }
}

impl Contribute for LazyUnit {
    fn unit_name(&self) -> &str {
        &self.name
    }

    fn contribute(&self) -> Result<Arc<LockScope>> {
        self.resolved
            .get_or_try_init(|| (self.producer)().map(Arc::new))
            .cloned()
    }
}
