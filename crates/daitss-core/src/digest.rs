//! # Checksum Algorithms and File Digests
//!
//! Package descriptors declare a checksum value and, optionally, the type
//! of that checksum. [`ChecksumAlgorithm::select`] resolves the pair into
//! exactly one of three outcomes:
//!
//! 1. A recognized declared type (`MD5`, `SHA-1`) wins.
//! 2. Otherwise the declared value's length decides: 32 characters is MD5,
//!    40 is SHA-1.
//! 3. Otherwise the entry is [`ChecksumAlgorithm::Unverified`] and no digest
//!    is computed for it.
//!
//! Digests are rendered as lowercase hex. Comparison against declared
//! values is ASCII case-insensitive (see [`checksums_equal`]).

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use sha1::Sha1;

use crate::error::DaitssError;

/// Hex length of an MD5 digest.
const MD5_HEX_LEN: usize = 32;
/// Hex length of a SHA-1 digest.
const SHA1_HEX_LEN: usize = 40;
/// Read buffer size for streaming digests.
const CHUNK_SIZE: usize = 64 * 1024;

/// The checksum algorithm resolved for one declared content file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChecksumAlgorithm {
    /// MD5, 128-bit.
    Md5,
    /// SHA-1, 160-bit.
    Sha1,
    /// No usable algorithm could be determined; the entry is not checked.
    Unverified,
}

impl ChecksumAlgorithm {
    /// Map a declared checksum type to an algorithm.
    ///
    /// Returns `None` for anything other than MD5 or SHA-1 (case-insensitive,
    /// `SHA1` accepted as an alias of `SHA-1`).
    pub fn from_declared_type(declared: &str) -> Option<Self> {
        let declared = declared.trim();
        if declared.eq_ignore_ascii_case("MD5") {
            Some(Self::Md5)
        } else if declared.eq_ignore_ascii_case("SHA-1") || declared.eq_ignore_ascii_case("SHA1") {
            Some(Self::Sha1)
        } else {
            None
        }
    }

    /// Infer an algorithm from the length of a declared hex value.
    pub fn infer_from_value(value: &str) -> Self {
        match value.trim().chars().count() {
            MD5_HEX_LEN => Self::Md5,
            SHA1_HEX_LEN => Self::Sha1,
            _ => Self::Unverified,
        }
    }

    /// Resolve the algorithm for a declared (value, type) pair.
    ///
    /// With no declared value there is nothing to compare against, so the
    /// entry is `Unverified` whatever its declared type.
    pub fn select(declared_value: Option<&str>, declared_type: Option<&str>) -> Self {
        let Some(value) = declared_value else {
            return Self::Unverified;
        };
        declared_type
            .and_then(Self::from_declared_type)
            .unwrap_or_else(|| Self::infer_from_value(value))
    }

    /// Returns the algorithm identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Unverified => "unverified",
        }
    }

    /// Whether a digest is computed for entries resolved to this algorithm.
    pub fn is_verifiable(&self) -> bool {
        !matches!(self, Self::Unverified)
    }
}

impl std::fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compute the lowercase hex digest of everything `reader` yields.
///
/// Returns `Ok(None)` for [`ChecksumAlgorithm::Unverified`] without
/// consuming the reader.
pub fn digest_reader<R: Read>(
    algorithm: ChecksumAlgorithm,
    reader: R,
) -> Result<Option<String>, DaitssError> {
    let hex = match algorithm {
        ChecksumAlgorithm::Md5 => stream_hex::<Md5, R>(reader)?,
        ChecksumAlgorithm::Sha1 => stream_hex::<Sha1, R>(reader)?,
        ChecksumAlgorithm::Unverified => return Ok(None),
    };
    Ok(Some(hex))
}

/// Compute the lowercase hex digest of the file at `path`.
pub fn digest_file(
    algorithm: ChecksumAlgorithm,
    path: &Path,
) -> Result<Option<String>, DaitssError> {
    if !algorithm.is_verifiable() {
        return Ok(None);
    }
    let file = File::open(path)?;
    digest_reader(algorithm, file)
}

/// Compare a declared checksum to a computed one, ignoring hex case and
/// surrounding whitespace on the declared side.
pub fn checksums_equal(declared: &str, computed: &str) -> bool {
    declared.trim().eq_ignore_ascii_case(computed)
}

fn stream_hex<D: Digest, R: Read>(mut reader: R) -> io::Result<String> {
    let mut hasher = D::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => hasher.update(&buf[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(hasher.finalize().iter().map(|b| format!("{b:02x}")).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn declared_type_recognition() {
        assert_eq!(ChecksumAlgorithm::from_declared_type("MD5"), Some(ChecksumAlgorithm::Md5));
        assert_eq!(ChecksumAlgorithm::from_declared_type("md5"), Some(ChecksumAlgorithm::Md5));
        assert_eq!(ChecksumAlgorithm::from_declared_type("SHA-1"), Some(ChecksumAlgorithm::Sha1));
        assert_eq!(ChecksumAlgorithm::from_declared_type("sha1"), Some(ChecksumAlgorithm::Sha1));
        assert_eq!(ChecksumAlgorithm::from_declared_type("SHA-256"), None);
        assert_eq!(ChecksumAlgorithm::from_declared_type("CRC32"), None);
    }

    #[test]
    fn length_inference() {
        assert_eq!(ChecksumAlgorithm::infer_from_value(&"a".repeat(32)), ChecksumAlgorithm::Md5);
        assert_eq!(ChecksumAlgorithm::infer_from_value(&"a".repeat(40)), ChecksumAlgorithm::Sha1);
        assert_eq!(
            ChecksumAlgorithm::infer_from_value(&"a".repeat(64)),
            ChecksumAlgorithm::Unverified
        );
        assert_eq!(ChecksumAlgorithm::infer_from_value(""), ChecksumAlgorithm::Unverified);
    }

    #[test]
    fn select_prefers_declared_type() {
        // A 32-char value declared as SHA-1 is hashed with SHA-1.
        let md5_len = "905ae75bc4595521e350564c90a56d28";
        assert_eq!(
            ChecksumAlgorithm::select(Some(md5_len), Some("SHA-1")),
            ChecksumAlgorithm::Sha1
        );
    }

    #[test]
    fn select_falls_back_to_inference_for_unknown_type() {
        let sha1_len = "95ae75bc4595521e350564c90a56d2a000000008";
        assert_eq!(
            ChecksumAlgorithm::select(Some(sha1_len), Some("SHA-256")),
            ChecksumAlgorithm::Sha1
        );
        assert_eq!(
            ChecksumAlgorithm::select(Some("abc123"), Some("CRC32")),
            ChecksumAlgorithm::Unverified
        );
    }

    #[test]
    fn select_without_value_is_unverified() {
        assert_eq!(ChecksumAlgorithm::select(None, Some("MD5")), ChecksumAlgorithm::Unverified);
        assert_eq!(ChecksumAlgorithm::select(None, None), ChecksumAlgorithm::Unverified);
    }

    #[test]
    fn known_md5_and_sha1_vectors() {
        let md5 = digest_reader(ChecksumAlgorithm::Md5, &b"abc"[..]).unwrap();
        assert_eq!(md5.as_deref(), Some("900150983cd24fb0d6963f7d28e17f72"));
        let sha1 = digest_reader(ChecksumAlgorithm::Sha1, &b"abc"[..]).unwrap();
        assert_eq!(sha1.as_deref(), Some("a9993e364706816aba3e25717850c26c9cd0d89d"));
    }

    #[test]
    fn unverified_digest_is_none() {
        assert!(digest_reader(ChecksumAlgorithm::Unverified, &b"abc"[..])
            .unwrap()
            .is_none());
    }

    #[test]
    fn digest_file_streams_content() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"abc").unwrap();
        let hex = digest_file(ChecksumAlgorithm::Md5, file.path()).unwrap();
        assert_eq!(hex.as_deref(), Some("900150983cd24fb0d6963f7d28e17f72"));
    }

    #[test]
    fn digest_file_missing_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = digest_file(ChecksumAlgorithm::Sha1, &dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, DaitssError::Io(_)));
    }

    #[test]
    fn comparison_ignores_case() {
        assert!(checksums_equal(
            "905AE75BC4595521E350564C90A56D28",
            "905ae75bc4595521e350564c90a56d28"
        ));
        assert!(!checksums_equal(
            "905ae75bc4595521e350564c90a56d28",
            "805ae75bc4595521e350564c90a56d28"
        ));
    }
}
