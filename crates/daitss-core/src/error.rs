//! # Error Types
//!
//! Errors shared by every crate in the workspace. Validation outcomes are
//! never errors; these variants cover malformed identifiers and the I/O
//! failures that abort a validation run.

use thiserror::Error;

/// Top-level error type for the foundational primitives.
#[derive(Error, Debug)]
pub enum DaitssError {
    /// An identifier failed its constructor checks.
    #[error("invalid {kind} {value:?}: {reason}")]
    InvalidIdentifier {
        /// Identifier namespace (e.g. "account code").
        kind: &'static str,
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// IO error while reading content for a digest.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_identifier_display() {
        let err = DaitssError::InvalidIdentifier {
            kind: "account code",
            value: " ".to_string(),
            reason: "must not be empty".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("account code"));
        assert!(msg.contains("must not be empty"));
    }

    #[test]
    fn io_error_from_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = DaitssError::from(io_err);
        assert!(format!("{err}").contains("access denied"));
    }
}
