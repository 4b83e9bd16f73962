//! # daitss-cli — DAITSS Submission Command-Line Interface
//!
//! ## Subcommands
//!
//! - `validate` — run every admission check against an extracted WIP
//! - `submit` — zip a package directory and send it to the submission service
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from business logic.
//! - Validation semantics live in `daitss-wip`; this crate only renders them.
//! - Reports go to standard output, diagnostics to standard error.

pub mod archive;
pub mod submit;
pub mod validate;
