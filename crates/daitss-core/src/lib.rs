//! # daitss-core — Foundational Types for DAITSS Submission
//!
//! The leaf crate of the workspace. It defines the primitives every
//! validation gate shares:
//!
//! 1. **Identifier newtypes.** `AccountCode`, `ProjectCode`, and `AgentId`
//!    are distinct types with validated constructors. An account code can
//!    never be handed to a project lookup by accident.
//!
//! 2. **`ChecksumAlgorithm` tagged enumeration.** Algorithm selection for a
//!    declared checksum (explicit type, then length inference, then
//!    `Unverified`) is resolved once into a closed enum and matched
//!    exhaustively. There is no runtime probing of checksum strings after
//!    selection.
//!
//! 3. **Streaming digests.** Files are hashed in fixed-size chunks so large
//!    content files never need to fit in memory.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `daitss-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod digest;
pub mod error;
pub mod identity;

pub use digest::{checksums_equal, digest_file, digest_reader, ChecksumAlgorithm};
pub use error::DaitssError;
pub use identity::{AccountCode, AgentId, ProjectCode};
