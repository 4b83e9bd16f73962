//! # Checksum Validator
//!
//! Recomputes the digest of every declared content file whose algorithm
//! can be resolved and compares it to the declared value.
//!
//! Entries resolved to [`ChecksumAlgorithm::Unverified`] are skipped: a
//! package is never rejected because its metadata is incomplete or uses a
//! scheme other than MD5/SHA-1. Entries whose file is absent (or whose name
//! would resolve outside the content directory) are also skipped here;
//! the content reconciler owns that discrepancy.

use std::fmt;
use std::path::Path;

use daitss_core::{checksums_equal, digest_file, ChecksumAlgorithm};

use crate::descriptor::ContentFileEntry;
use crate::error::WipResult;
use crate::naming::is_contained_path;

/// A declared checksum that does not match the file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumFailure {
    pub name: String,
    pub expected: String,
    pub computed: String,
}

impl fmt::Display for ChecksumFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - expected: {} computed: {}",
            self.name, self.expected, self.computed
        )
    }
}

/// Verify every entry against the files under `content_dir`.
///
/// Failures are returned in descriptor order. An empty result means the
/// package passes, including when every entry was skipped.
///
/// # Errors
///
/// Only when a declared path is present but cannot be read as a file.
pub fn verify_entries(
    content_dir: &Path,
    entries: &[ContentFileEntry],
) -> WipResult<Vec<ChecksumFailure>> {
    let mut failures = Vec::new();

    for entry in entries {
        let algorithm = entry.algorithm();
        let Some(declared) = entry.checksum.as_deref().map(str::trim) else {
            tracing::warn!(file = %entry.name, "no declared checksum; skipping verification");
            continue;
        };
        if algorithm == ChecksumAlgorithm::Unverified {
            tracing::warn!(
                file = %entry.name,
                declared_type = ?entry.checksum_type,
                declared_len = declared.len(),
                "checksum algorithm cannot be determined; skipping verification"
            );
            continue;
        }
        if !is_contained_path(&entry.name) {
            tracing::warn!(file = %entry.name, "name escapes content directory; not hashed");
            continue;
        }
        let path = content_dir.join(&entry.name);
        if !path.exists() {
            tracing::debug!(file = %entry.name, "declared file absent; not hashed");
            continue;
        }

        let Some(computed) = digest_file(algorithm, &path)? else {
            continue;
        };
        if checksums_equal(declared, &computed) {
            tracing::debug!(file = %entry.name, %algorithm, "checksum verified");
        } else {
            tracing::warn!(
                file = %entry.name,
                %algorithm,
                expected = %declared,
                computed = %computed,
                "checksum mismatch"
            );
            failures.push(ChecksumFailure {
                name: entry.name.clone(),
                expected: declared.to_string(),
                computed,
            });
        }
    }

    Ok(failures)
}

/// Render failures as the `checksum_failures` metadata value: one
/// `"<name> - expected: <declared> computed: <computed>; "` segment per
/// failure, in order.
pub fn render_failures(failures: &[ChecksumFailure]) -> String {
    failures.iter().map(|f| format!("{f}; ")).collect()
}
