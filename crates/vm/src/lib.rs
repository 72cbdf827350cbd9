//! Suspendable computations for the Chronicle ledger interpreter.
//!
//! A [`Step`] is a value representing an in-progress computation that
//! may pause whenever it needs an external lookup (contract, package,
//! key, key visibility) and resumes once the host supplies the datum.
//! Steps compose with [`Step::map`], [`Step::bind`] and [`sequence`];
//! the synchronous [`run`] loop drives one to completion against a set
//! of [`Resolvers`].

pub mod driver;
pub mod error;
mod step;
pub mod types;
mod visibility;

pub use crate::{
    driver::{run, Resolvers},
    error::Error,
    step::{ensure, need_contract, need_key, need_local_key_visible, need_package, sequence, Resume, Step, UNIT},
    visibility::VisibleByKey,
};
