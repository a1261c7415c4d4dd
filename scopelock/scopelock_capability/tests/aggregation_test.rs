//! Integration tests for class composition.
//!
//! These tests check the merge properties a coordinator relies on: no
//! contributed name is ever dropped, write-wins, idempotence, and a result
//! that does not depend on the order units were attached in.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use scopelock_capability::model::{CommonLocks, LazyUnit, StaticUnit, COMMON_LOCKS_READ};
use scopelock_capability::{aggregate, ClassRegistry, ResourceClass};
use scopelock_core::error::{ContributionError, Error};
use scopelock_core::{Contribute, LockMode, LockScope, ResourceName};

fn unit(name: &str, read: &[&str], write: &[&str]) -> Arc<dyn Contribute> {
    Arc::new(StaticUnit::from_names(name, read, write).unwrap())
}

fn names(set: &BTreeSet<ResourceName>) -> Vec<&str> {
    set.iter().map(ResourceName::as_str).collect()
}

fn class_of(name: &str, units: &[Arc<dyn Contribute>]) -> ResourceClass {
    units
        .iter()
        .fold(ResourceClass::builder(name), |builder, unit| {
            builder.attach_shared(Arc::clone(unit))
        })
        .build()
        .unwrap()
}

fn sample_units() -> Vec<Arc<dyn Contribute>> {
    vec![
        unit("profiles", &["auth_users", "profiles"], &[]),
        unit("avatars", &["profiles"], &["avatars"]),
        unit("moderation", &["avatars", "auth_roles"], &["moderation_queue"]),
        unit("search", &["search_index"], &["profiles"]),
    ]
}

fn permutations(units: &[Arc<dyn Contribute>]) -> Vec<Vec<Arc<dyn Contribute>>> {
    if units.len() <= 1 {
        return vec![units.to_vec()];
    }

    let mut result = Vec::new();
    for i in 0..units.len() {
        let mut rest = units.to_vec();
        let head = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, Arc::clone(&head));
            result.push(tail);
        }
    }
    result
}

#[test]
fn no_contributed_name_is_dropped() {
    let units = sample_units();
    let scope = aggregate("profiles", &units).unwrap();

    for unit in &units {
        let contributed = unit.contribute().unwrap();
        for (name, mode) in contributed.acquisition_order() {
            let held = scope
                .mode_of(name.as_str())
                .unwrap_or_else(|| panic!("{name} from {} was dropped", unit.unit_name()));
            assert!(held.satisfies(mode));
        }
    }
}

#[test]
fn written_names_are_never_read() {
    let scope = aggregate("profiles", &sample_units()).unwrap();

    assert!(scope.read().is_disjoint(scope.write()));
    assert_eq!(scope.mode_of("profiles"), Some(LockMode::Exclusive));
    assert_eq!(scope.mode_of("avatars"), Some(LockMode::Exclusive));
    assert_eq!(names(scope.read()), vec!["auth_roles", "auth_users", "search_index"]);
}

#[test]
fn attachment_order_does_not_matter() {
    let units = sample_units();
    let expected = aggregate("profiles", &units).unwrap();
    let expected_json = serde_json::to_string(&expected).unwrap();

    for ordering in permutations(&units) {
        let class = class_of("profiles", &ordering);
        let scope = class.locks_for_any().unwrap();
        assert_eq!(*scope, expected);
        assert_eq!(serde_json::to_string(scope.as_ref()).unwrap(), expected_json);
    }
}

#[test]
fn repeated_queries_are_identical() {
    let class = class_of("profiles", &sample_units());
    let first = class.locks_for_any().unwrap();

    for _ in 0..10 {
        assert!(Arc::ptr_eq(&first, &class.locks_for_any().unwrap()));
    }
}

#[test]
fn merging_a_scope_with_itself_changes_nothing() {
    let scope = aggregate("profiles", &sample_units()).unwrap();
    assert_eq!(scope.union(&scope), scope);

    let doubled: Vec<Arc<dyn Contribute>> = vec![
        unit("once", &["a", "b"], &["c"]),
        unit("twice", &["a", "b"], &["c"]),
    ];
    assert_eq!(
        aggregate("doubled", &doubled).unwrap(),
        LockScope::from_names(["a", "b"], ["c"]).unwrap()
    );
}

#[test]
fn read_then_write_example() {
    let scope = aggregate(
        "example",
        &[unit("first", &["A", "B"], &[]), unit("second", &["B", "C"], &["C"])],
    )
    .unwrap();

    assert_eq!(names(scope.read()), vec!["A", "B"]);
    assert_eq!(names(scope.write()), vec!["C"]);
}

#[test]
fn shared_read_promoted_by_writer_example() {
    let scope = aggregate(
        "example",
        &[unit("reader", &["X"], &[]), unit("writer", &[], &["X"])],
    )
    .unwrap();

    assert!(scope.read().is_empty());
    assert_eq!(names(scope.write()), vec!["X"]);
}

#[test]
fn single_writer_example() {
    let scope = aggregate("jobs", &[unit("tasks", &[], &["tasks"])]).unwrap();

    assert!(scope.read().is_empty());
    assert_eq!(names(scope.write()), vec!["tasks"]);
}

#[test]
fn common_locks_class_reads_auth_and_writes_tasks() {
    let class = ResourceClass::builder("users")
        .attach(CommonLocks)
        .build()
        .unwrap();
    let scope = class.locks_for_any().unwrap();

    let mut expected_read: Vec<&str> = COMMON_LOCKS_READ.to_vec();
    expected_read.sort_unstable();
    assert_eq!(names(scope.read()), expected_read);
    assert_eq!(names(scope.write()), vec!["core_tasks"]);
}

#[test]
fn concurrent_first_queries_agree() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let class = Arc::new(
        ResourceClass::builder("catalog")
            .attach(CommonLocks)
            .attach(LazyUnit::new("catalog", move || {
                counter.fetch_add(1, Ordering::SeqCst);
                LockScope::from_names(["catalog_items"], ["catalog_prices"])
            }))
            .build()
            .unwrap(),
    );

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let class = Arc::clone(&class);
            thread::spawn(move || class.locks_for_any().unwrap())
        })
        .collect();

    let scopes: Vec<Arc<LockScope>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for scope in &scopes {
        assert_eq!(scope, &scopes[0]);
    }
    assert!(scopes[0].write().contains("catalog_prices"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

/// Contributes at definition time, then fails for a number of calls.
#[derive(Debug)]
struct Flaky {
    calls: AtomicUsize,
    failing: std::ops::Range<usize>,
    scope: Arc<LockScope>,
}

impl Contribute for Flaky {
    fn unit_name(&self) -> &str {
        "flaky"
    }

    fn contribute(&self) -> scopelock_core::Result<Arc<LockScope>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&call) {
            return Err(ContributionError::Unavailable(format!("call {call}")).into());
        }
        Ok(Arc::clone(&self.scope))
    }
}

#[test]
fn failed_query_is_reported_and_not_cached() {
    let flaky = Flaky {
        calls: AtomicUsize::new(0),
        failing: 1..2,
        scope: Arc::new(LockScope::write_only(["ledger"]).unwrap()),
    };
    let class = ResourceClass::builder("ledger")
        .attach(CommonLocks)
        .attach(flaky)
        .build()
        .unwrap();

    match class.locks_for_any() {
        Err(Error::Contribution(ContributionError::Failed { class, unit, .. })) => {
            assert_eq!(class, "ledger");
            assert_eq!(unit, "flaky");
        }
        other => panic!("expected a contribution failure, got {other:?}"),
    }
    assert!(!class.is_resolved());

    let scope = class.locks_for_any().unwrap();
    assert!(scope.write().contains("ledger"));
    assert!(class.is_resolved());
}

#[test]
fn registry_serves_many_threads() {
    let registry = Arc::new(ClassRegistry::new());
    registry
        .define(
            ResourceClass::builder("profiles")
                .attach_shared(unit("profiles", &["auth_users"], &["profiles"])),
        )
        .unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let scope = registry.locks_for_any("profiles").unwrap();
                scope.acquisition_order().len()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 2);
    }
}
