//! # Content Reconciler
//!
//! Cross-checks declared content files against the files physically
//! present under the package's content directory. Both directions count:
//! a declared file that is missing and a present file that is not
//! described are each a discrepancy.

use std::collections::BTreeSet;
use std::path::Path;

use walkdir::WalkDir;

use crate::descriptor::ContentFileEntry;
use crate::error::{WipError, WipResult};

/// Outcome of reconciling declared and physical content files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentDiscrepancies {
    /// Declared in the descriptor, absent on disk. Descriptor order.
    pub missing: Vec<String>,
    /// Present on disk, absent from the descriptor. Sorted by path.
    pub undescribed: Vec<String>,
}

impl ContentDiscrepancies {
    /// True when declared and physical sets match exactly.
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.undescribed.is_empty()
    }

    /// Render as a metadata value: `"missing: a; undescribed: b; "`.
    pub fn render(&self) -> String {
        let missing = self.missing.iter().map(|n| format!("missing: {n}; "));
        let undescribed = self.undescribed.iter().map(|n| format!("undescribed: {n}; "));
        missing.chain(undescribed).collect()
    }
}

/// Reconcile `entries` against the regular files under `content_dir`.
///
/// A content directory that does not exist holds no files.
///
/// # Errors
///
/// `PackageUnreadable` when the content path exists but is not a directory,
/// or when the directory tree cannot be walked.
pub fn reconcile(content_dir: &Path, entries: &[ContentFileEntry]) -> WipResult<ContentDiscrepancies> {
    let physical = physical_files(content_dir)?;
    let declared: BTreeSet<String> = entries.iter().map(|e| normalize(&e.name)).collect();

    let mut seen = BTreeSet::new();
    let missing = entries
        .iter()
        .map(|e| normalize(&e.name))
        .filter(|name| !physical.contains(name) && seen.insert(name.clone()))
        .collect();
    let undescribed = physical
        .iter()
        .filter(|name| !declared.contains(*name))
        .cloned()
        .collect();

    Ok(ContentDiscrepancies {
        missing,
        undescribed,
    })
}

/// Every regular file under `content_dir`, as `/`-separated relative paths.
fn physical_files(content_dir: &Path) -> WipResult<BTreeSet<String>> {
    let mut files = BTreeSet::new();
    if !content_dir.exists() {
        return Ok(files);
    }
    if !content_dir.is_dir() {
        return Err(WipError::PackageUnreadable {
            path: content_dir.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "content path is not a directory",
            ),
        });
    }

    for entry in WalkDir::new(content_dir).follow_links(false) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(content_dir).to_path_buf();
            WipError::PackageUnreadable {
                path,
                source: e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop detected")),
            }
        })?;
        if entry.file_type().is_dir() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(content_dir) else {
            continue;
        };
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        files.insert(name);
    }
    Ok(files)
}

/// Drop a leading `./` so `./a.tif` and `a.tif` compare equal.
fn normalize(name: &str) -> String {
    name.trim_start_matches("./").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(names: &[&str]) -> Vec<ContentFileEntry> {
        names
            .iter()
            .map(|n| ContentFileEntry {
                name: n.to_string(),
                checksum: None,
                checksum_type: None,
            })
            .collect()
    }

    fn content_dir(files: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for f in files {
            let path = dir.path().join(f);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, b"x").unwrap();
        }
        dir
    }

    #[test]
    fn exact_match_has_no_discrepancies() {
        let dir = content_dir(&["ateam.tiff", "sub/page.jp2"]);
        let result = reconcile(dir.path(), &entries(&["ateam.tiff", "sub/page.jp2"])).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.render(), "");
    }

    #[test]
    fn declared_but_missing() {
        let dir = content_dir(&["ateam.tiff"]);
        let result = reconcile(dir.path(), &entries(&["ateam.tiff", "gone.tiff"])).unwrap();
        assert_eq!(result.missing, ["gone.tiff"]);
        assert!(result.undescribed.is_empty());
    }

    #[test]
    fn present_but_undescribed() {
        let dir = content_dir(&["ateam.tiff", "extra.txt"]);
        let result = reconcile(dir.path(), &entries(&["ateam.tiff"])).unwrap();
        assert!(result.missing.is_empty());
        assert_eq!(result.undescribed, ["extra.txt"]);
    }

    #[test]
    fn both_directions_render_in_order() {
        let dir = content_dir(&["extra.txt"]);
        let result = reconcile(dir.path(), &entries(&["gone.tiff"])).unwrap();
        assert_eq!(result.render(), "missing: gone.tiff; undescribed: extra.txt; ");
    }

    #[test]
    fn absent_content_dir_means_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing_dir = dir.path().join("content");
        assert!(reconcile(&missing_dir, &[]).unwrap().is_empty());
        let result = reconcile(&missing_dir, &entries(&["a.tif"])).unwrap();
        assert_eq!(result.missing, ["a.tif"]);
    }

    #[test]
    fn content_path_that_is_a_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let content = dir.path().join("content");
        std::fs::write(&content, b"not a directory").unwrap();
        let err = reconcile(&content, &entries(&["a.tif"])).unwrap_err();
        assert!(matches!(err, WipError::PackageUnreadable { .. }));
    }

    #[test]
    fn duplicate_declarations_reported_once() {
        let dir = content_dir(&[]);
        let result = reconcile(dir.path(), &entries(&["a.tif", "./a.tif"])).unwrap();
        assert_eq!(result.missing, ["a.tif"]);
    }
}
