use std::collections::BTreeSet;

use log::trace;

use crate::{
    error::Error,
    step::Step,
    types::{ContractId, ContractInstance, GlobalKeyWithMaintainers, Package, PackageId, Party},
    visibility::VisibleByKey,
};

/// Host-supplied lookups answering the four suspension kinds.
///
/// Implementations must be pure with respect to a single [`run`] call,
/// or own their concurrency; hosts typically back them with a database
/// or cache. Timeouts are the host's concern too: a resolver that
/// gives up returns `None` (or an error through a wrapper), the driver
/// is never interrupted.
pub trait Resolvers {
    fn contract(&self, id: &ContractId) -> Option<ContractInstance>;
    fn package(&self, id: &PackageId) -> Option<Package>;
    fn contract_key(&self, key: &GlobalKeyWithMaintainers) -> Option<ContractId>;
    fn local_key_visible(&self, stakeholders: &BTreeSet<Party>) -> VisibleByKey;
}

/// Drive `step` to completion, answering every request from
/// `resolvers`.
///
/// Single-threaded with respect to the given computation. The loop is
/// iterative: the stack does not grow with the number of suspensions.
pub fn run<A, R: Resolvers + ?Sized>(mut step: Step<A>, resolvers: &R) -> Result<A, Error> {
    loop {
        step = match step {
            Step::Done(a) => return Ok(a),
            Step::Error(e) => return Err(e),
            Step::NeedContract(id, resume) => {
                trace!("resolving contract {id}");
                resume(resolvers.contract(&id))
            }
            Step::NeedPackage(id, resume) => {
                trace!("resolving package {id}");
                resume(resolvers.package(&id))
            }
            Step::NeedKey(key, resume) => {
                trace!("resolving contract key {}", key.key);
                resume(resolvers.contract_key(&key))
            }
            Step::NeedLocalKeyVisible(parties, resume) => resume(resolvers.local_key_visible(&parties)),
        };
    }
}
