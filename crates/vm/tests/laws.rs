//! Observational checks of the combinator laws: both sides of each law
//! are driven to completion against the same resolver set and must
//! produce the same terminal outcome.

use std::collections::{BTreeMap, BTreeSet};

use chronicle_vm::{
    ensure, need_key, need_package, run, sequence,
    types::{ContractId, ContractInstance, GlobalKeyWithMaintainers, Package, PackageId, Party},
    Error, Resolvers, Step, VisibleByKey,
};
use pretty_assertions::assert_eq;

struct FixtureLedger {
    packages: BTreeMap<PackageId, Package>,
    keys: BTreeMap<GlobalKeyWithMaintainers, ContractId>,
}

impl FixtureLedger {
    /// A ledger where every lookup used by the law fixtures succeeds.
    fn complete() -> Self {
        Self {
            packages: BTreeMap::from([(PackageId::new("P"), Package { name: "stdlib".into() })]),
            keys: BTreeMap::from([(global_key("k"), ContractId::new("#1:0"))]),
        }
    }

    /// A ledger where every lookup misses.
    fn empty() -> Self {
        Self {
            packages: BTreeMap::new(),
            keys: BTreeMap::new(),
        }
    }

    /// A ledger that knows the packages but has no key assignments.
    fn packages_only() -> Self {
        Self {
            keys: BTreeMap::new(),
            ..Self::complete()
        }
    }
}

impl Resolvers for FixtureLedger {
    fn contract(&self, _id: &ContractId) -> Option<ContractInstance> {
        None
    }

    fn package(&self, id: &PackageId) -> Option<Package> {
        self.packages.get(id).cloned()
    }

    fn contract_key(&self, key: &GlobalKeyWithMaintainers) -> Option<ContractId> {
        self.keys.get(key).cloned()
    }

    fn local_key_visible(&self, _stakeholders: &BTreeSet<Party>) -> VisibleByKey {
        VisibleByKey::Visible
    }
}

fn global_key(key: &str) -> GlobalKeyWithMaintainers {
    GlobalKeyWithMaintainers {
        key: key.into(),
        maintainers: BTreeSet::new(),
    }
}

fn invalid(message: &str) -> Error {
    chronicle_vm::error::ValidationError::Generic(message.into()).into()
}

/// A computation that suspends once.
fn f(n: u64) -> Step<u64> {
    need_package(PackageId::new("P"), move |package| {
        Step::Done(n + package.name.len() as u64)
    })
}

/// A computation that suspends and may fail.
fn g(n: u64) -> Step<u64> {
    need_key(global_key("k"), move |found| {
        ensure(found.is_some(), || invalid("key unassigned")).map(move |()| n * 2)
    })
}

/// Fixture computations covering all three states.
fn candidates() -> Vec<fn() -> Step<u64>> {
    vec![
        || Step::Done(3),
        || Step::Error(invalid("already failed")),
        || f(4).bind(g),
    ]
}

fn outcomes(make: impl Fn() -> Step<u64>) -> Vec<Result<u64, Error>> {
    vec![
        run(make(), &FixtureLedger::complete()),
        run(make(), &FixtureLedger::empty()),
    ]
}

#[test]
fn map_identity() {
    for make in candidates() {
        assert_eq!(outcomes(|| make().map(|n| n)), outcomes(make));
    }
}

#[test]
fn bind_left_identity() {
    assert_eq!(outcomes(|| Step::Done(4).bind(f)), outcomes(|| f(4)));
    assert_eq!(outcomes(|| Step::Done(4).bind(g)), outcomes(|| g(4)));
}

#[test]
fn bind_right_identity() {
    for make in candidates() {
        assert_eq!(outcomes(|| make().bind(Step::Done)), outcomes(make));
    }
}

#[test]
fn bind_associativity() {
    for make in candidates() {
        assert_eq!(
            outcomes(|| make().bind(f).bind(g)),
            outcomes(|| make().bind(|x| f(x).bind(g))),
        );
    }
}

#[test]
fn sequence_preserves_length_and_order() {
    let ledger = FixtureLedger::complete();

    let steps = (0..16u64).map(f);
    let values = run(sequence(steps), &ledger).unwrap();

    assert_eq!(values, (0..16u64).map(|n| n + 6).collect::<Vec<_>>());
}

#[test]
fn sequence_short_circuits_on_the_first_failure() {
    // `f` succeeds on a packages-only ledger while `g` fails, so the
    // sequence must surface `g`'s error even with a later `f` pending.
    let outcome = run(sequence(vec![f(0), g(1), f(2)]), &FixtureLedger::packages_only());

    assert_eq!(outcome, Err(invalid("key unassigned")));
}
