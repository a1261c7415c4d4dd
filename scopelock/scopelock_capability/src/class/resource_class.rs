use log::debug;
use once_cell::sync::OnceCell;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use scopelock_core::error::{DefinitionError, Result};
use scopelock_core::id::ClassId;
use scopelock_core::{Contribute, LockScope};

use crate::check::{ScopeAggregator, ScopeReport};

/// A kind of resource whose operations are gated by a lock scope
///
/// A class is the composition of its attached units. Its scope is the merge
/// of their contributions and is the same for every operation on the class.
/// The scope is resolved on the first query and reused afterwards.
pub struct ResourceClass {
    id: ClassId,
    name: String,
    units: Vec<Arc<dyn Contribute>>,
    resolved: OnceCell<Arc<LockScope>>,
}

impl ResourceClass {
    /// Starts defining a class called `name`
    pub fn builder(name: impl Into<String>) -> ResourceClassBuilder {
        ResourceClassBuilder::new(name)
    }

    /// Gets the identifier used to correlate log lines for this class
    pub fn id(&self) -> ClassId {
        self.id
    }

    /// Gets the class name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the attached units, in attachment order
    pub fn units(&self) -> &[Arc<dyn Contribute>] {
        &self.units
    }

    /// Gets the names of the attached units, in attachment order
    pub fn unit_names(&self) -> Vec<&str> {
        self.units.iter().map(|unit| unit.unit_name()).collect()
    }

    /// Returns true once the scope has been resolved and cached
    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }

    /// Returns the merged lock scope for any operation on this class
    ///
    /// The first successful call resolves the scope from the attached units;
    /// later calls return the same shared value. A failing unit fails the
    /// query and nothing is cached, so the next call retries.
    ///
    /// # Returns
    ///
    /// The shared merged scope. Every successful call returns the same `Arc`.
    pub fn locks_for_any(&self) -> Result<Arc<LockScope>> {
        self.resolved
            .get_or_try_init(|| {
                let scope = ScopeAggregator::new(&self.name, &self.units).aggregate()?;
                debug!("Class '{}' ({}) resolved: {}", self.name, self.id, scope);
                Ok(Arc::new(scope))
            })
            .cloned()
    }

    /// Resolves the scope and reports which unit contributed each name
    ///
    /// Always recomputes; the result is not cached.
    pub fn explain(&self) -> Result<ScopeReport> {
        ScopeAggregator::new(&self.name, &self.units).explain()
    }
}

impl fmt::Debug for ResourceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceClass")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("units", &self.unit_names())
            .field("resolved", &self.resolved.get())
            .finish()
    }
}

/// Builder for [`ResourceClass`]
///
/// Units are kept in attachment order. Definition mistakes are reported by
/// [`build`](Self::build), before the class can be queried.
pub struct ResourceClassBuilder {
    name: String,
    units: Vec<Arc<dyn Contribute>>,
}

impl ResourceClassBuilder {
    /// Creates a builder for a class called `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            units: Vec::new(),
        }
    }

    /// Attaches a unit owned by this class
    ///
    /// # Arguments
    ///
    /// * `unit` - The unit to append after the units already attached.
    pub fn attach<U: Contribute + 'static>(mut self, unit: U) -> Self {
        self.units.push(Arc::new(unit));
        self
    }

    /// Attaches a unit shared with other classes
    ///
    /// # Arguments
    ///
    /// * `unit` - A unit that other classes may also hold.
    pub fn attach_shared(mut self, unit: Arc<dyn Contribute>) -> Self {
        self.units.push(unit);
        self
    }

    /// Validates the definition and creates the class
    ///
    /// Every attached unit is asked for its contribution once, so a unit that
    /// cannot describe itself is rejected here instead of at the first lock
    /// acquisition.
    ///
    /// # Returns
    ///
    /// The class, or a `DefinitionError` naming the first problem found:
    /// an empty class or unit name, a unit attached twice, or a unit that
    /// fails to contribute.
    pub fn build(self) -> Result<ResourceClass> {
        if self.name.trim().is_empty() {
            return Err(DefinitionError::EmptyClassName.into());
        }

        let mut seen = BTreeSet::new();
        for unit in &self.units {
            let unit_name = unit.unit_name();
            if unit_name.trim().is_empty() {
                return Err(DefinitionError::EmptyUnitName.into());
            }

            if !seen.insert(unit_name) {
                return Err(DefinitionError::DuplicateUnit {
                    class: self.name.clone(),
                    unit: unit_name.to_string(),
                }
                .into());
            }

            unit.contribute()
                .map_err(|e| DefinitionError::UnitRejected {
                    class: self.name.clone(),
                    unit: unit_name.to_string(),
                    source: Box::new(e),
                })?;
        }

        let class = ResourceClass {
            id: ClassId::new(),
            name: self.name,
            units: self.units,
            resolved: OnceCell::new(),
        };

        debug!(
            "Defined class '{}' ({}) with units [{}]",
            class.name,
            class.id,
            class.unit_names().join(", ")
        );

        Ok(class)
    }
}

/// Implemented by anything that exposes a class-level lock scope
///
/// Executors and coordinators depend on this trait rather than on
/// [`ResourceClass`], so an application type can answer for its own class:
///
/// ```
/// use once_cell::sync::Lazy;
/// use scopelock_capability::class::{LockScoped, ResourceClass};
/// use scopelock_capability::model::StaticUnit;
///
/// struct Invoice;
///
/// static INVOICE_CLASS: Lazy<ResourceClass> = Lazy::new(|| {
///     ResourceClass::builder("invoice")
///         .attach(StaticUnit::from_names("ledger", ["ledger"], ["invoices"]).unwrap())
///         .build()
///         .unwrap()
/// });
///
/// impl LockScoped for Invoice {
///     fn resource_class(&self) -> &ResourceClass {
///         &INVOICE_CLASS
///     }
/// }
///
/// let scope = Invoice.locks_for_any().unwrap();
/// assert!(scope.write().contains("invoices"));
/// ```
pub trait LockScoped {
    /// Gets the class whose scope applies
    fn resource_class(&self) -> &ResourceClass;

    /// Returns the merged lock scope for any operation on the class
    fn locks_for_any(&self) -> Result<Arc<LockScope>> {
        self.resource_class().locks_for_any()
    }
}

impl LockScoped for ResourceClass {
    fn resource_class(&self) -> &ResourceClass {
        self
    }
}

impl<T: LockScoped + ?Sized> LockScoped for Arc<T> {
    fn resource_class(&self) -> &ResourceClass {
        (**self).resource_class()
    }
}
