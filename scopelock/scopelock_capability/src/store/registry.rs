use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::{debug, info};
use std::collections::BTreeMap;
use std::sync::Arc;

use scopelock_core::error::{ConfigError, DefinitionError, Error, Result};
use scopelock_core::utils::ScopeConfig;
use scopelock_core::{Contribute, LockScope};

use crate::check::ScopeReport;
use crate::class::{ResourceClass, ResourceClassBuilder};
use crate::model::{builtin_unit, StaticUnit, BUILTIN_UNITS};

/// A thread-safe registry of defined resource classes
///
/// Classes are registered once and never replaced, so a scope handed out for
/// a class stays valid for the lifetime of the registry.
#[derive(Debug, Default)]
pub struct ClassRegistry {
    classes: DashMap<String, Arc<ResourceClass>>,
}

impl ClassRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self {
            classes: DashMap::new(),
        }
    }

    /// Builds a class and registers it
    ///
    /// # Arguments
    ///
    /// * `builder` - The class definition to validate and register.
    ///
    /// # Returns
    ///
    /// The registered class, shared with the registry.
    pub fn define(&self, builder: ResourceClassBuilder) -> Result<Arc<ResourceClass>> {
        self.register(builder.build()?)
    }

    /// Registers an already built class
    ///
    /// Fails if a class with the same name is already registered.
    ///
    /// # Returns
    ///
    /// The registered class, or `DefinitionError::DuplicateClass`.
    pub fn register(&self, class: ResourceClass) -> Result<Arc<ResourceClass>> {
        match self.classes.entry(class.name().to_string()) {
            Entry::Occupied(entry) => {
                Err(DefinitionError::DuplicateClass(entry.key().clone()).into())
            }
            Entry::Vacant(entry) => {
                let class = Arc::new(class);
                debug!("Registered class '{}'", class.name());
                entry.insert(Arc::clone(&class));
                Ok(class)
            }
        }
    }

    /// Gets a class by name
    ///
    /// # Returns
    ///
    /// The class, or `Error::NotFound` if no class has this name.
    pub fn get(&self, name: &str) -> Result<Arc<ResourceClass>> {
        self.classes
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| Error::NotFound(format!("Class '{}' is not defined", name)))
    }

    /// Returns true if a class with this name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Returns the merged lock scope of the named class
    pub fn locks_for_any(&self, name: &str) -> Result<Arc<LockScope>> {
        self.get(name)?.locks_for_any()
    }

    /// Explains the scope of the named class
    pub fn explain(&self, name: &str) -> Result<ScopeReport> {
        self.get(name)?.explain()
    }

    /// Gets the names of all registered classes, in canonical order
    pub fn class_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.classes.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    /// Number of registered classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns true if no class is registered
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Defines every class of a configuration document
    ///
    /// Classes may attach units declared in the document or built-in units.
    /// A declared unit is shared by every class that attaches it. A document
    /// may not declare a unit under a built-in name.
    ///
    /// # Arguments
    ///
    /// * `config` - A parsed document. It is validated before any class is built.
    ///
    /// # Returns
    ///
    /// A registry holding every class of the document.
    pub fn from_config(config: &ScopeConfig) -> Result<Self> {
        config.validate()?;

        let mut declared: BTreeMap<&str, Arc<dyn Contribute>> = BTreeMap::new();
        for (name, unit) in &config.units {
            if BUILTIN_UNITS.contains(&name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "unit '{}' shadows a built-in unit",
                    name
                ))
                .into());
            }

            declared.insert(name.as_str(), Arc::new(StaticUnit::from_config(name.as_str(), unit)?));
        }

        let registry = Self::new();
        for (class_name, class) in &config.classes {
            let mut builder = ResourceClass::builder(class_name.as_str());

            for unit_name in &class.units {
                let unit = declared
                    .get(unit_name.as_str())
                    .cloned()
                    .or_else(|| builtin_unit(unit_name))
                    .ok_or_else(|| DefinitionError::UnknownUnit {
                        class: class_name.clone(),
                        unit: unit_name.clone(),
                    })?;

                builder = builder.attach_shared(unit);
            }

            registry.define(builder)?;
        }

        info!(
            "Defined {} class(es) from {} declared unit(s)",
            registry.len(),
            declared.len()
        );

        Ok(registry)
    }
}
