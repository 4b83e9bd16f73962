//! WIP validation error types.
//!
//! Only structural and environmental failures are errors. A package that
//! breaks a business rule still validates cleanly: the check returns
//! `Ok(false)`. Callers can therefore run every check and collect a full
//! picture of a package in one pass.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a validation run for one package.
#[derive(Debug, Error)]
pub enum WipError {
    /// The package directory is missing, not a directory, or unreadable.
    #[error("package unreadable at {path}: {source}")]
    PackageUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The descriptor is absent, ambiguous, unreadable, or violates its schema.
    #[error("descriptor malformed at {path}: {reason}")]
    DescriptorMalformed { path: PathBuf, reason: String },

    /// The account/project/agent registry could not answer.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// A content file could not be read while computing its digest.
    #[error("digest error: {0}")]
    Digest(#[from] daitss_core::DaitssError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by a [`Registry`](crate::registry::Registry) backend.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The backing store could not be reached.
    #[error("registry unavailable: {reason}")]
    Unavailable { reason: String },

    /// A registry snapshot could not be parsed.
    #[error("registry snapshot malformed at {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

/// Result type alias for WIP operations.
pub type WipResult<T> = Result<T, WipError>;
