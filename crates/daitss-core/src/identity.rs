//! # Identifier Newtypes
//!
//! Account, project, and agent identifiers as they appear in package
//! descriptors and in the registry. Each is a trimmed, non-empty string.
//! Deserialization goes through the same constructor as [`AccountCode::new`]
//! and friends, so a descriptor can never smuggle in a blank code.

use serde::{Deserialize, Serialize};

use crate::error::DaitssError;

/// Maximum accepted identifier length, in characters.
const MAX_IDENTIFIER_LEN: usize = 255;

fn validate(kind: &'static str, raw: String) -> Result<String, DaitssError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DaitssError::InvalidIdentifier {
            kind,
            value: raw,
            reason: "must not be empty".to_string(),
        });
    }
    if trimmed.chars().count() > MAX_IDENTIFIER_LEN {
        return Err(DaitssError::InvalidIdentifier {
            kind,
            value: raw,
            reason: format!("must not exceed {MAX_IDENTIFIER_LEN} characters"),
        });
    }
    Ok(trimmed.to_string())
}

/// Code identifying a depositing account (e.g. `ACT`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountCode(String);

/// Code identifying a project within an account (e.g. `PRJ`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectCode(String);

/// Identity presented by a submitter at submission time.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AgentId(String);

macro_rules! identifier_impls {
    ($ty:ident, $kind:literal) => {
        impl $ty {
            #[doc = concat!("Create a validated ", $kind, ".")]
            ///
            /// Surrounding whitespace is trimmed. Empty or over-long input is rejected.
            pub fn new(s: impl Into<String>) -> Result<Self, DaitssError> {
                validate($kind, s.into()).map(Self)
            }

            /// Return the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $ty {
            type Error = DaitssError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl From<$ty> for String {
            fn from(id: $ty) -> String {
                id.0
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl PartialEq<&str> for $ty {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

identifier_impls!(AccountCode, "account code");
identifier_impls!(ProjectCode, "project code");
identifier_impls!(AgentId, "agent id");
