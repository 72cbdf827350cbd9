use thiserror::Error;

use crate::types::ContractId;

/// Top-level interpreter error.
///
/// A closed sum over the four failure domains; the arms are part of
/// the interface and callers pattern-match on them to decide recovery.
/// Errors are plain data: no retry or recovery happens at this layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Package(#[from] PackageError),
    #[error(transparent)]
    Preprocessing(#[from] PreprocessingError),
    #[error(transparent)]
    Interpretation(#[from] InterpretationError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Failure loading or checking a package.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackageError {
    #[error("package validation failed: {0}")]
    Validation(String),
}

/// Failure translating a submitted command before interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreprocessingError {
    #[error("preprocessing failed: {0}")]
    Generic(String),
}

/// Failure during interpretation proper.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpretationError {
    #[error("contract {0} not found")]
    ContractNotFound(ContractId),
    #[error("{0}")]
    Generic(String),
}

/// Failure validating a transaction against a submitted one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("validation failed: {0}")]
    Generic(String),
}
