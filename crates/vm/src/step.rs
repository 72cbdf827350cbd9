use std::{collections::BTreeSet, fmt};

use crate::{
    error::{Error, InterpretationError},
    types::{ContractId, ContractInstance, GlobalKeyWithMaintainers, Package, PackageId, Party},
    visibility::VisibleByKey,
};

/// Continuation of a paused [`Step`], resumed with the datum the host
/// supplies.
///
/// Continuations are plain values, not live handles: dropping a
/// partially driven computation is sound.
pub type Resume<X, A> = Box<dyn FnOnce(X) -> Step<A>>;

/// A suspendable computation producing an `A`.
///
/// A `Step` is either terminal (`Done`, `Error`) or paused at one of
/// four request points, waiting for the host to supply the datum the
/// computation asked for. The synchronous [`crate::driver::run`] loop
/// feeds requests from a [`crate::driver::Resolvers`]; callers that
/// fulfil requests out-of-band match on the variants directly and
/// invoke the carried continuation themselves.
///
/// A computation never leaves a terminal state, and pending states
/// only advance by having their continuation invoked exactly once.
pub enum Step<A> {
    /// Terminal success.
    Done(A),
    /// Terminal failure.
    Error(Error),
    /// Paused until the host resolves the contract id to an instance,
    /// or `None` if the contract is not active.
    NeedContract(ContractId, Resume<Option<ContractInstance>, A>),
    /// Paused until the host resolves the package id.
    NeedPackage(PackageId, Resume<Option<Package>, A>),
    /// Paused until the host resolves the contract key to the id of
    /// the contract currently assigned to it.
    NeedKey(GlobalKeyWithMaintainers, Resume<Option<ContractId>, A>),
    /// Paused until the host rules whether a contract with the given
    /// stakeholders may be looked up by key by the submitter.
    NeedLocalKeyVisible(BTreeSet<Party>, Resume<VisibleByKey, A>),
}

/// The cached successful unit computation.
pub const UNIT: Step<()> = Step::Done(());

impl<A: 'static> Step<A> {
    /// Rewrite the eventual result through `f`.
    ///
    /// Terminal values are rewritten immediately; a pending request
    /// stays pending, with the projection deferred until its
    /// continuation eventually completes. The continuation itself is
    /// neither inspected nor invoked here.
    pub fn map<B: 'static>(self, f: impl FnOnce(A) -> B + 'static) -> Step<B> {
        match self {
            Step::Done(a) => Step::Done(f(a)),
            Step::Error(e) => Step::Error(e),
            Step::NeedContract(id, resume) => Step::NeedContract(id, Box::new(move |x| resume(x).map(f))),
            Step::NeedPackage(id, resume) => Step::NeedPackage(id, Box::new(move |x| resume(x).map(f))),
            Step::NeedKey(key, resume) => Step::NeedKey(key, Box::new(move |x| resume(x).map(f))),
            Step::NeedLocalKeyVisible(parties, resume) => {
                Step::NeedLocalKeyVisible(parties, Box::new(move |x| resume(x).map(f)))
            }
        }
    }

    /// Continue with `f` once this computation completes.
    ///
    /// `Error` short-circuits; a pending request stays pending with
    /// `f` spliced in at its `Done` leaf.
    pub fn bind<B: 'static>(self, f: impl FnOnce(A) -> Step<B> + 'static) -> Step<B> {
        match self {
            Step::Done(a) => f(a),
            Step::Error(e) => Step::Error(e),
            Step::NeedContract(id, resume) => Step::NeedContract(id, Box::new(move |x| resume(x).bind(f))),
            Step::NeedPackage(id, resume) => Step::NeedPackage(id, Box::new(move |x| resume(x).bind(f))),
            Step::NeedKey(key, resume) => Step::NeedKey(key, Box::new(move |x| resume(x).bind(f))),
            Step::NeedLocalKeyVisible(parties, resume) => {
                Step::NeedLocalKeyVisible(parties, Box::new(move |x| resume(x).bind(f)))
            }
        }
    }
}

impl<A> From<Result<A, Error>> for Step<A> {
    fn from(result: Result<A, Error>) -> Self {
        match result {
            Ok(a) => Step::Done(a),
            Err(e) => Step::Error(e),
        }
    }
}

impl<A: fmt::Debug> fmt::Debug for Step<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Done(a) => f.debug_tuple("Done").field(a).finish(),
            Step::Error(e) => f.debug_tuple("Error").field(e).finish(),
            Step::NeedContract(id, _) => f.debug_tuple("NeedContract").field(id).finish(),
            Step::NeedPackage(id, _) => f.debug_tuple("NeedPackage").field(id).finish(),
            Step::NeedKey(key, _) => f.debug_tuple("NeedKey").field(key).finish(),
            Step::NeedLocalKeyVisible(parties, _) => f.debug_tuple("NeedLocalKeyVisible").field(parties).finish(),
        }
    }
}

/// Run an ordered sequence of computations, collecting their results
/// in input order.
///
/// Pauses on the first pending element; once it completes, the
/// remaining elements are spliced in through [`Step::bind`], so no
/// element is examined twice and none past an `Error` is examined at
/// all.
pub fn sequence<A, I>(steps: I) -> Step<Vec<A>>
where
    A: 'static,
    I: IntoIterator<Item = Step<A>>,
    I::IntoIter: 'static,
{
    advance(Vec::new(), steps.into_iter())
}

fn advance<A, I>(mut done: Vec<A>, mut rest: I) -> Step<Vec<A>>
where
    A: 'static,
    I: Iterator<Item = Step<A>> + 'static,
{
    while let Some(step) = rest.next() {
        match step {
            Step::Done(a) => done.push(a),
            Step::Error(e) => return Step::Error(e),
            pending => {
                return pending.bind(move |a| {
                    done.push(a);
                    advance(done, rest)
                })
            }
        }
    }
    Step::Done(done)
}

/// Look up the contract `id`, failing with
/// [`InterpretationError::ContractNotFound`] if it is not active.
pub fn need_contract<A: 'static>(
    id: ContractId,
    resume: impl FnOnce(ContractInstance) -> Step<A> + 'static,
) -> Step<A> {
    Step::NeedContract(
        id.clone(),
        Box::new(move |found| match found {
            Some(instance) => resume(instance),
            None => Step::Error(InterpretationError::ContractNotFound(id).into()),
        }),
    )
}

/// Look up the package `id`, failing with a generic interpretation
/// error if the host does not know it.
pub fn need_package<A: 'static>(id: PackageId, resume: impl FnOnce(Package) -> Step<A> + 'static) -> Step<A> {
    Step::NeedPackage(
        id.clone(),
        Box::new(move |found| match found {
            Some(package) => resume(package),
            None => Step::Error(InterpretationError::Generic(format!("Couldn't find package {id}")).into()),
        }),
    )
}

/// Look up the contract currently assigned to `key`, if any.
pub fn need_key<A: 'static>(
    key: GlobalKeyWithMaintainers,
    resume: impl FnOnce(Option<ContractId>) -> Step<A> + 'static,
) -> Step<A> {
    Step::NeedKey(key, Box::new(resume))
}

/// Ask the host whether a contract with the given stakeholders is
/// visible to the submitter for a lookup by key.
pub fn need_local_key_visible<A: 'static>(
    stakeholders: BTreeSet<Party>,
    resume: impl FnOnce(VisibleByKey) -> Step<A> + 'static,
) -> Step<A> {
    Step::NeedLocalKeyVisible(stakeholders, Box::new(resume))
}

/// Succeed with `()` if `cond` holds, otherwise fail with `err()`.
pub fn ensure(cond: bool, err: impl FnOnce() -> Error) -> Step<()> {
    if cond {
        UNIT
    } else {
        Step::Error(err())
    }
}
