//! # daitss-wip — Submission Package Admission Validation
//!
//! Validates an extracted submission package (a WIP, "work in progress")
//! before it enters the preservation pipeline. Each gate answers one
//! yes/no question:
//!
//! - **Descriptor** (`descriptor.rs`): locates and parses the package's
//!   single descriptor into immutable records.
//! - **Checksums** (`checksum.rs`): recomputes MD5/SHA-1 digests of the
//!   declared content files, inferring the algorithm where the type is
//!   missing and skipping entries that cannot be checked.
//! - **Content** (`content.rs`): declared content files and physical files
//!   must match exactly.
//! - **Naming** (`naming.rs`): package and content file name rules.
//! - **Agent** (`agent.rs`): operator/contact submission authority.
//! - **Registry** (`registry.rs`): account/project/agent lookups.
//! - **Wip** (`wip.rs`): the facade tying these together around one
//!   package directory and its metadata bag.
//!
//! ## Crate Policy
//!
//! - Business-rule violations are `Ok(false)`, never errors.
//! - Only malformed input and environmental failures are `Err`.
//! - The package directory is never modified.

pub mod agent;
pub mod checksum;
pub mod content;
pub mod descriptor;
pub mod error;
pub mod naming;
pub mod registry;
pub mod wip;

pub use agent::{Agent, AgentRole};
pub use descriptor::{ContentFileEntry, Descriptor, PackageHeader};
pub use error::{RegistryError, WipError, WipResult};
pub use registry::{InMemoryRegistry, Registry};
pub use wip::{
    Check, CheckOutcome, ValidationReport, Wip, CHECKSUM_FAILURES, CONTENT_DIR,
    CONTENT_FILE_DISCREPANCIES, INVALID_CONTENT_FILE_NAMES,
};
