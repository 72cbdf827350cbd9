use std::collections::BTreeSet;

use derive_more::{Display, From, Into};

/// Opaque identifier of a contract instance on the ledger.
#[derive(Clone, Debug, Display, From, Into, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContractId(String);

impl ContractId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// Opaque identifier of a package of compiled ledger code.
#[derive(Clone, Debug, Display, From, Into, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PackageId(String);

impl PackageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// A party known to the ledger.
#[derive(Clone, Debug, Display, From, Into, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Party(String);

impl Party {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// A contract as stored on the ledger.
///
/// The interpreter core treats both fields as opaque; decoding them is
/// the package runtime's concern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractInstance {
    pub template: String,
    pub arg: String,
}

/// A package of compiled ledger code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Package {
    pub name: String,
}

/// A contract key together with the parties maintaining it.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct GlobalKeyWithMaintainers {
    pub key: String,
    pub maintainers: BTreeSet<Party>,
}
