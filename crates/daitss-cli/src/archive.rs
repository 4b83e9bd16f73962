//! Zip packaging of a package directory for submission.
//!
//! Entries are stored under the directory's own base name, so extracting
//! the archive recreates `<name>/...`. Files are added in sorted order.

use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Write a deflate-compressed zip of `dir` into `out`.
///
/// Returns the number of files archived.
pub fn zip_directory<W: Write + Seek>(dir: &Path, out: W) -> Result<usize> {
    let Some(base) = dir.file_name().map(|n| n.to_string_lossy().into_owned()) else {
        bail!("cannot derive archive root from {}", dir.display());
    };
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(out);
    let mut count = 0usize;

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to walk {}", dir.display()))?;
        let relative = entry
            .path()
            .strip_prefix(dir)
            .with_context(|| format!("{} escapes {}", entry.path().display(), dir.display()))?;
        let mut name = base.clone();
        for component in relative.components() {
            name.push('/');
            name.push_str(&component.as_os_str().to_string_lossy());
        }

        if entry.file_type().is_dir() {
            zip.add_directory(name, options)?;
        } else {
            zip.start_file(name.as_str(), options)?;
            let mut file = File::open(entry.path())
                .with_context(|| format!("failed to read {}", entry.path().display()))?;
            std::io::copy(&mut file, &mut zip)?;
            tracing::debug!(entry = %name, "archived");
            count += 1;
        }
    }

    zip.finish().context("failed to finalize zip archive")?;
    Ok(count)
}
