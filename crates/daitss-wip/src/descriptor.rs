//! # Descriptor Loader
//!
//! Every WIP carries exactly one descriptor at its root: `descriptor.yaml`,
//! `descriptor.yml`, or `descriptor.json`. It names the package, the
//! depositing account and project, and lists the content files in order:
//!
//! ```yaml
//! package:
//!   name: E0000199Y_L35FP3
//!   account: ACT
//!   project: PRJ
//! files:
//!   - name: ateam.tiff
//!     checksum: 905ae75bc4595521e350564c90a56d28
//!     checksum_type: MD5
//! ```
//!
//! Checksum value and type are optional per entry. Their absence is not a
//! parse failure; the checksum validator treats such entries as
//! unverifiable. A blank checksum string is normalized to absent.

use std::path::{Path, PathBuf};

use daitss_core::{AccountCode, ChecksumAlgorithm, ProjectCode};
use serde::{Deserialize, Serialize};

use crate::error::{WipError, WipResult};

/// Accepted descriptor file names, in lookup order.
pub const DESCRIPTOR_FILE_NAMES: [&str; 3] =
    ["descriptor.yaml", "descriptor.yml", "descriptor.json"];

/// Parsed package descriptor. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    /// Package identity and ownership.
    pub package: PackageHeader,
    /// Declared content files, in descriptor order.
    #[serde(default)]
    pub files: Vec<ContentFileEntry>,
}

/// The `package` block of a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageHeader {
    pub name: String,
    pub account: AccountCode,
    pub project: ProjectCode,
}

/// One declared content file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentFileEntry {
    /// Path relative to the content directory, `/`-separated.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum_type: Option<String>,
}

impl ContentFileEntry {
    /// Resolve which algorithm (if any) verifies this entry.
    pub fn algorithm(&self) -> ChecksumAlgorithm {
        ChecksumAlgorithm::select(self.checksum.as_deref(), self.checksum_type.as_deref())
    }
}

impl Descriptor {
    /// Package name as declared.
    pub fn name(&self) -> &str {
        &self.package.name
    }

    /// Declared account code.
    pub fn account(&self) -> &AccountCode {
        &self.package.account
    }

    /// Declared project code.
    pub fn project(&self) -> &ProjectCode {
        &self.package.project
    }

    /// Locate and parse the descriptor of the package rooted at `wip_path`.
    ///
    /// # Errors
    ///
    /// `DescriptorMalformed` if no descriptor exists, more than one exists,
    /// or the one found cannot be read or parsed.
    pub fn load(wip_path: &Path) -> WipResult<Self> {
        let path = locate(wip_path)?;
        let content = std::fs::read_to_string(&path).map_err(|e| WipError::DescriptorMalformed {
            path: path.clone(),
            reason: format!("cannot read descriptor: {e}"),
        })?;
        let is_json = path.extension().is_some_and(|ext| ext == "json");
        let parsed = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        };
        let descriptor = parsed.map_err(|reason| WipError::DescriptorMalformed {
            path: path.clone(),
            reason,
        })?;
        tracing::debug!(
            descriptor = %path.display(),
            package = %descriptor.name(),
            files = descriptor.files.len(),
            "loaded package descriptor"
        );
        Ok(descriptor)
    }

    /// Parse a YAML descriptor document.
    pub fn from_yaml_str(content: &str) -> Result<Self, String> {
        serde_yaml::from_str::<Self>(content)
            .map(Self::normalized)
            .map_err(|e| e.to_string())
    }

    /// Parse a JSON descriptor document.
    pub fn from_json_str(content: &str) -> Result<Self, String> {
        serde_json::from_str::<Self>(content)
            .map(Self::normalized)
            .map_err(|e| e.to_string())
    }

    fn normalized(mut self) -> Self {
        for entry in &mut self.files {
            entry.checksum = entry.checksum.take().filter(|c| !c.trim().is_empty());
            entry.checksum_type = entry.checksum_type.take().filter(|t| !t.trim().is_empty());
        }
        self
    }
}

/// Find the single descriptor file in `wip_path`.
fn locate(wip_path: &Path) -> WipResult<PathBuf> {
    let found: Vec<PathBuf> = DESCRIPTOR_FILE_NAMES
        .iter()
        .map(|name| wip_path.join(name))
        .filter(|p| p.is_file())
        .collect();
    match found.as_slice() {
        [single] => Ok(single.clone()),
        [] => Err(WipError::DescriptorMalformed {
            path: wip_path.to_path_buf(),
            reason: format!("no descriptor found (expected one of {DESCRIPTOR_FILE_NAMES:?})"),
        }),
        _ => Err(WipError::DescriptorMalformed {
            path: wip_path.to_path_buf(),
            reason: format!("ambiguous descriptor: {} candidates present", found.len()),
        }),
    }
}
