//! # Package Validation Facade
//!
//! [`Wip`] owns one extracted package directory, loads its descriptor at
//! most once, and exposes every admission gate as an independent query.
//! Checks may run in any order and any number of times. None of them
//! touch the package on disk.
//!
//! ## Metadata bag
//!
//! A check that finds discrepancies records a human-readable detail string
//! under its own key. A key exists only if its check ran and failed.
//! Re-running a check writes the same key with the same value; nothing is
//! appended twice and nothing is ever cleared.

use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::agent::Agent;
use crate::checksum;
use crate::content;
use crate::descriptor::Descriptor;
use crate::error::{WipError, WipResult};
use crate::naming;
use crate::registry::Registry;

/// Metadata key written by [`Wip::checksums_match`].
pub const CHECKSUM_FAILURES: &str = "checksum_failures";
/// Metadata key written by [`Wip::content_file_exists`].
pub const CONTENT_FILE_DISCREPANCIES: &str = "content_file_discrepancies";
/// Metadata key written by [`Wip::content_files_have_valid_names`].
pub const INVALID_CONTENT_FILE_NAMES: &str = "invalid_content_file_names";

/// Directory under the package root holding content files.
pub const CONTENT_DIR: &str = "content";

/// An extracted submission package under validation.
#[derive(Debug)]
pub struct Wip {
    path: PathBuf,
    descriptor: OnceCell<Descriptor>,
    metadata: BTreeMap<String, String>,
}

impl Wip {
    /// Open the package rooted at `path`.
    ///
    /// The descriptor is not read until a check first needs it.
    ///
    /// # Errors
    ///
    /// `PackageUnreadable` if `path` is missing, is not a directory, or
    /// cannot be listed.
    pub fn open(path: impl Into<PathBuf>) -> WipResult<Self> {
        let path = path.into();
        let unreadable = |source: std::io::Error| WipError::PackageUnreadable {
            path: path.clone(),
            source,
        };
        let meta = std::fs::metadata(&path).map_err(unreadable)?;
        if !meta.is_dir() {
            return Err(unreadable(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "not a directory",
            )));
        }
        std::fs::read_dir(&path).map_err(unreadable)?;

        Ok(Self {
            path,
            descriptor: OnceCell::new(),
            metadata: BTreeMap::new(),
        })
    }

    /// Package root directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the package's content files.
    pub fn content_dir(&self) -> PathBuf {
        self.path.join(CONTENT_DIR)
    }

    /// Failure details recorded so far, keyed by check.
    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// The parsed descriptor, loading it on first use.
    pub fn descriptor(&self) -> WipResult<&Descriptor> {
        if let Some(descriptor) = self.descriptor.get() {
            return Ok(descriptor);
        }
        let loaded = Descriptor::load(&self.path)?;
        Ok(self.descriptor.get_or_init(|| loaded))
    }

    /// Does the declared package name satisfy the naming rules?
    pub fn package_name_valid(&self) -> WipResult<bool> {
        let descriptor = self.descriptor()?;
        let valid = naming::package_name_valid(descriptor.name());
        tracing::debug!(package = %descriptor.name(), valid, "package name check");
        Ok(valid)
    }

    /// Does every declared content file have a valid name?
    ///
    /// Offending names are recorded under [`INVALID_CONTENT_FILE_NAMES`].
    pub fn content_files_have_valid_names(&mut self) -> WipResult<bool> {
        let invalid: Vec<String> = self
            .descriptor()?
            .files
            .iter()
            .filter(|f| !naming::content_file_name_valid(&f.name))
            .map(|f| f.name.clone())
            .collect();
        if invalid.is_empty() {
            return Ok(true);
        }
        tracing::warn!(count = invalid.len(), "invalid content file names");
        let detail = invalid.iter().map(|n| format!("{n}; ")).collect();
        self.record(INVALID_CONTENT_FILE_NAMES, detail);
        Ok(false)
    }

    /// Do the declared content files and the files on disk match exactly?
    ///
    /// Discrepancies are recorded under [`CONTENT_FILE_DISCREPANCIES`].
    pub fn content_file_exists(&mut self) -> WipResult<bool> {
        let content_dir = self.content_dir();
        let discrepancies = content::reconcile(&content_dir, &self.descriptor()?.files)?;
        if discrepancies.is_empty() {
            tracing::debug!("content files reconciled");
            return Ok(true);
        }
        tracing::warn!(
            missing = discrepancies.missing.len(),
            undescribed = discrepancies.undescribed.len(),
            "content file discrepancies"
        );
        self.record(CONTENT_FILE_DISCREPANCIES, discrepancies.render());
        Ok(false)
    }

    /// Does every verifiable declared checksum match the file on disk?
    ///
    /// Entries whose algorithm cannot be determined are skipped and never
    /// fail the check. Mismatches are recorded under [`CHECKSUM_FAILURES`].
    pub fn checksums_match(&mut self) -> WipResult<bool> {
        let content_dir = self.content_dir();
        let failures = checksum::verify_entries(&content_dir, &self.descriptor()?.files)?;
        if failures.is_empty() {
            return Ok(true);
        }
        self.record(CHECKSUM_FAILURES, checksum::render_failures(&failures));
        Ok(false)
    }

    /// May `agent` submit this package on behalf of its declared account?
    ///
    /// See [`Agent::may_submit_for`] for the operator/contact rule.
    pub fn package_account_matches_agent(&self, agent: &Agent) -> WipResult<bool> {
        let account = self.descriptor()?.account();
        let matches = agent.may_submit_for(account);
        tracing::debug!(
            agent = %agent.id,
            role = %agent.role,
            %account,
            matches,
            "submitter authorization check"
        );
        Ok(matches)
    }

    /// Does the declared account exist in the registry?
    pub fn package_account_valid(&self, registry: &dyn Registry) -> WipResult<bool> {
        let account = self.descriptor()?.account();
        Ok(registry.account_exists(account)?)
    }

    /// Does the declared project exist under the declared account?
    pub fn package_project_valid(&self, registry: &dyn Registry) -> WipResult<bool> {
        let descriptor = self.descriptor()?;
        Ok(registry.project_exists(descriptor.account(), descriptor.project())?)
    }

    /// Run every check once, in a fixed order, and collect the outcome.
    ///
    /// The agent check runs only when `agent` is supplied.
    pub fn validate_all(
        &mut self,
        registry: &dyn Registry,
        agent: Option<&Agent>,
    ) -> WipResult<ValidationReport> {
        let mut checks = vec![
            CheckOutcome::new(Check::PackageNameValid, self.package_name_valid()?),
            CheckOutcome::new(
                Check::ContentFilesHaveValidNames,
                self.content_files_have_valid_names()?,
            ),
            CheckOutcome::new(Check::ContentFileExists, self.content_file_exists()?),
            CheckOutcome::new(Check::ChecksumsMatch, self.checksums_match()?),
            CheckOutcome::new(Check::PackageAccountValid, self.package_account_valid(registry)?),
            CheckOutcome::new(Check::PackageProjectValid, self.package_project_valid(registry)?),
        ];
        if let Some(agent) = agent {
            checks.push(CheckOutcome::new(
                Check::PackageAccountMatchesAgent,
                self.package_account_matches_agent(agent)?,
            ));
        }

        Ok(ValidationReport {
            package: self.descriptor()?.name().to_string(),
            path: self.path.clone(),
            checks,
            metadata: self.metadata.clone(),
        })
    }

    fn record(&mut self, key: &str, detail: String) {
        self.metadata.insert(key.to_string(), detail);
    }
}

/// Identifies one admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    PackageNameValid,
    ContentFilesHaveValidNames,
    ContentFileExists,
    ChecksumsMatch,
    PackageAccountValid,
    PackageProjectValid,
    PackageAccountMatchesAgent,
}

impl Check {
    /// Return the string representation of this check.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PackageNameValid => "package_name_valid",
            Self::ContentFilesHaveValidNames => "content_files_have_valid_names",
            Self::ContentFileExists => "content_file_exists",
            Self::ChecksumsMatch => "checksums_match",
            Self::PackageAccountValid => "package_account_valid",
            Self::PackageProjectValid => "package_project_valid",
            Self::PackageAccountMatchesAgent => "package_account_matches_agent",
        }
    }
}

impl std::fmt::Display for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    pub check: Check,
    pub passed: bool,
}

impl CheckOutcome {
    fn new(check: Check, passed: bool) -> Self {
        Self { check, passed }
    }
}

/// Everything [`Wip::validate_all`] learned about a package.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub package: String,
    pub path: PathBuf,
    pub checks: Vec<CheckOutcome>,
    pub metadata: BTreeMap<String, String>,
}

impl ValidationReport {
    /// True when every check passed.
    pub fn is_valid(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    /// Checks that did not pass, in run order.
    pub fn failed(&self) -> impl Iterator<Item = Check> + '_ {
        self.checks.iter().filter(|c| !c.passed).map(|c| c.check)
    }
}
