//! Configuration for declarative class definitions.
//!
//! Units and classes can be declared in TOML instead of code:
//!
//! ```toml
//! [units.audit]
//! read = ["audit_log"]
//! write = ["audit_queue"]
//!
//! [classes.users]
//! units = ["common_locks", "audit"]
//! ```
//!
//! The order of `units` inside a class is the attachment order. Classes may
//! refer to units declared in the same file or to built-in units; resolving
//! those references is done by the registry that consumes the configuration.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ConfigError, Error, Result};
use crate::types::LockScope;

/// A unit declared in configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitConfig {
    /// Names locked in shared mode
    #[serde(default)]
    pub read: Vec<String>,

    /// Names locked in exclusive mode
    #[serde(default)]
    pub write: Vec<String>,
}

impl UnitConfig {
    /// Build the scope this unit contributes.
    ///
    /// Fails on malformed names. A name listed in both sets is held
    /// exclusively.
    pub fn to_scope(&self) -> Result<LockScope> {
        LockScope::from_names(&self.read, &self.write)
    }
}

/// A class declared in configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassConfig {
    /// Names of the attached units, in attachment order
    #[serde(default)]
    pub units: Vec<String>,
}

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScopeConfig {
    /// Unit declarations, keyed by unit name
    #[serde(default)]
    pub units: BTreeMap<String, UnitConfig>,

    /// Class declarations, keyed by class name
    #[serde(default)]
    pub classes: BTreeMap<String, ClassConfig>,
}

impl ScopeConfig {
    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ScopeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading scope configuration from {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(ConfigError::LoadFailed(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;

        let config = Self::from_toml_str(&content)?;
        debug!(
            "Loaded {} unit(s) and {} class(es) from {}",
            config.units.len(),
            config.classes.len(),
            path.display()
        );

        Ok(config)
    }

    /// Validate the structure of the configuration.
    ///
    /// Checks everything that can be checked without knowing the built-in
    /// units: names are non-empty, every declared unit yields a valid scope,
    /// and no class lists a unit twice.
    pub fn validate(&self) -> Result<()> {
        for (name, unit) in &self.units {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid("Unit name cannot be empty".to_string()).into());
            }

            unit.to_scope().map_err(|e| {
                Error::Config(ConfigError::Invalid(format!("unit '{}': {}", name, e)))
            })?;
        }

        for (name, class) in &self.classes {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid("Class name cannot be empty".to_string()).into());
            }

            let mut seen = std::collections::BTreeSet::new();
            for unit in &class.units {
                if !seen.insert(unit.as_str()) {
                    return Err(ConfigError::Invalid(format!(
                        "class '{}' lists unit '{}' more than once",
                        name, unit
                    ))
                    .into());
                }
            }
        }

        Ok(())
    }

    /// Merge another configuration into this one.
    ///
    /// Declarations in `other` replace declarations with the same name.
    pub fn merge(&mut self, other: ScopeConfig) {
        self.units.extend(other.units);
        self.classes.extend(other.classes);
    }
}
