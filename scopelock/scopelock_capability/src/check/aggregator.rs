use log::{debug, trace};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use scopelock_core::error::{ContributionError, Error, Result};
use scopelock_core::{Contribute, LockMode, LockScope, ResourceName};

/// One unit's request for one resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contribution {
    /// Name of the contributing unit
    pub unit: String,

    /// Mode the unit asked for
    pub mode: LockMode,
}

/// A resolved scope together with where each of its names came from
///
/// This is what `explain` returns. It is meant for diagnostics: the `scope`
/// field is identical to what `aggregate` returns for the same units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopeReport {
    /// Class the report was produced for
    pub class: String,

    /// The merged scope
    pub scope: LockScope,

    /// Every contributed name with the units that asked for it, in attachment order
    pub contributors: BTreeMap<ResourceName, Vec<Contribution>>,

    /// Names some unit read and another unit wrote, now held exclusively
    pub promoted: BTreeSet<ResourceName>,
}

/// Merges the contributions of an ordered list of units into one scope
///
/// The merge is a per-field set union followed by write-wins: a name written
/// by any unit is removed from the read set. Sets are ordered, so the result
/// is independent of the order in which units were attached.
pub struct ScopeAggregator<'a> {
    class: &'a str,
    units: &'a [Arc<dyn Contribute>],
}

impl<'a> ScopeAggregator<'a> {
    /// Creates an aggregator over the units of `class`
    ///
    /// # Arguments
    ///
    /// * `class` - Name of the class, used in errors and reports.
    /// * `units` - The attached units, in attachment order.
    pub fn new(class: &'a str, units: &'a [Arc<dyn Contribute>]) -> Self {
        Self { class, units }
    }

    /// Resolves the merged scope
    ///
    /// Fails if any unit fails to contribute. There is no partial result: a
    /// dropped contribution would under-lock the operation.
    ///
    /// # Returns
    ///
    /// The canonical merged scope, or `ContributionError::Failed` naming the
    /// first unit that failed.
    pub fn aggregate(&self) -> Result<LockScope> {
        let contributions = self.collect()?;
        let (scope, _) = self.merge(&contributions);
        Ok(scope)
    }

    /// Resolves the merged scope and records the provenance of every name
    ///
    /// # Returns
    ///
    /// A `ScopeReport` whose `scope` equals what `aggregate` returns.
    pub fn explain(&self) -> Result<ScopeReport> {
        let contributions = self.collect()?;
        let (scope, promoted) = self.merge(&contributions);

        let mut contributors: BTreeMap<ResourceName, Vec<Contribution>> = BTreeMap::new();
        for (unit, contributed) in &contributions {
            for (name, mode) in contributed.acquisition_order() {
                contributors
                    .entry(name.clone())
                    .or_default()
                    .push(Contribution {
                        unit: unit.to_string(),
                        mode,
                    });
            }
        }

        Ok(ScopeReport {
            class: self.class.to_string(),
            scope,
            contributors,
            promoted,
        })
    }

    /// Asks every unit for its contribution, in attachment order
    fn collect(&self) -> Result<Vec<(&'a str, Arc<LockScope>)>> {
        let mut contributions = Vec::with_capacity(self.units.len());

        for unit in self.units {
            let scope = unit.contribute().map_err(|e| {
                Error::Contribution(ContributionError::Failed {
                    class: self.class.to_string(),
                    unit: unit.unit_name().to_string(),
                    source: Box::new(e),
                })
            })?;

            trace!(
                "Class '{}': unit '{}' contributes {}",
                self.class,
                unit.unit_name(),
                scope
            );

            contributions.push((unit.unit_name(), scope));
        }

        Ok(contributions)
    }

    fn merge(&self, contributions: &[(&str, Arc<LockScope>)]) -> (LockScope, BTreeSet<ResourceName>) {
        let mut read = BTreeSet::new();
        let mut write = BTreeSet::new();

        for (_, scope) in contributions {
            read.extend(scope.read().iter().cloned());
            write.extend(scope.write().iter().cloned());
        }

        let promoted: BTreeSet<ResourceName> = read.intersection(&write).cloned().collect();
        if !promoted.is_empty() {
            debug!(
                "Class '{}': {} name(s) read by one unit and written by another, holding exclusively: {}",
                self.class,
                promoted.len(),
                promoted
                    .iter()
                    .map(ResourceName::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        let scope = LockScope::resolve(read, write);
        debug!(
            "Class '{}': resolved scope from {} unit(s): {}",
            self.class,
            contributions.len(),
            scope
        );

        (scope, promoted)
    }
}

/// Resolves the merged scope of `units` attached to `class`
///
/// # Arguments
///
/// * `class` - Name of the class the units belong to.
/// * `units` - The attached units, in attachment order.
///
/// # Returns
///
/// The canonical merged scope, or the first contribution failure.
pub fn aggregate(class: &str, units: &[Arc<dyn Contribute>]) -> Result<LockScope> {
    ScopeAggregator::new(class, units).aggregate()
}
