//! # Submit Subcommand
//!
//! Packages a directory as a zip archive and sends it to the submission
//! service. The request carries three headers:
//!
//! - `CONTENT_MD5`: lowercase hex MD5 of the whole archive
//! - `X_PACKAGE_NAME`: the package name given on the command line
//! - `X_ARCHIVE_TYPE`: always `zip`
//!
//! The raw response (status line, headers, body) is printed to standard
//! output. Every argument is checked before any archive or network work.

use std::fs::File;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use url::Url;

use daitss_core::{digest_reader, ChecksumAlgorithm};

use crate::archive::zip_directory;

pub const HEADER_CONTENT_MD5: &str = "CONTENT_MD5";
pub const HEADER_PACKAGE_NAME: &str = "X_PACKAGE_NAME";
pub const HEADER_ARCHIVE_TYPE: &str = "X_ARCHIVE_TYPE";
pub const ARCHIVE_TYPE: &str = "zip";

/// Arguments for the `daitss submit` subcommand.
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// URL of the submission service.
    #[arg(long)]
    pub url: String,

    /// Path to the package directory to submit.
    #[arg(long, value_name = "PATH")]
    pub package: PathBuf,

    /// Name of the package being submitted.
    #[arg(long = "name", value_name = "PACKAGE_NAME")]
    pub package_name: String,

    /// HTTP method used for the upload.
    #[arg(long, value_enum, default_value_t = UploadMethod::Post)]
    pub method: UploadMethod,
}

/// HTTP method for the upload request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UploadMethod {
    Post,
    Put,
}

impl UploadMethod {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
        }
    }
}

/// A submission whose arguments have been checked.
#[derive(Debug, Clone)]
pub struct Submission {
    pub url: Url,
    pub package: PathBuf,
    pub package_name: String,
    pub method: UploadMethod,
}

impl SubmitArgs {
    /// Check arguments without touching the network.
    pub fn prepare(&self) -> Result<Submission> {
        let url = Url::parse(&self.url)
            .with_context(|| format!("specified URL {} is not a valid URL", self.url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("specified URL {} does not look like an HTTP URL", self.url);
        }
        if !self.package.is_dir() {
            bail!(
                "specified package path {} is not a directory",
                self.package.display()
            );
        }
        let package = std::fs::canonicalize(&self.package).with_context(|| {
            format!("failed to resolve package path {}", self.package.display())
        })?;
        if package.file_name().is_none() {
            bail!(
                "specified package path {} has no directory name to archive under",
                package.display()
            );
        }
        let package_name = self.package_name.trim();
        if package_name.is_empty() {
            bail!("package name not specified");
        }
        Ok(Submission {
            url,
            package,
            package_name: package_name.to_string(),
            method: self.method,
        })
    }
}

/// Execute the submit subcommand.
pub fn run_submit(args: &SubmitArgs) -> Result<u8> {
    let submission = args.prepare()?;

    let mut archive = tempfile::Builder::new()
        .prefix("daitss-submit-")
        .suffix(".zip")
        .tempfile()
        .context("failed to create temporary archive")?;
    let files = zip_directory(&submission.package, archive.as_file_mut())
        .with_context(|| format!("failed to zip {}", submission.package.display()))?;
    let md5 = archive_md5(archive.path())?;
    tracing::info!(
        package = %submission.package_name,
        files,
        md5 = %md5,
        url = %submission.url,
        "submitting package"
    );

    let body = File::open(archive.path()).context("failed to reopen archive")?;
    let response = reqwest::blocking::Client::new()
        .request(submission.method.as_reqwest(), submission.url.clone())
        .header(HEADER_CONTENT_MD5, &md5)
        .header(HEADER_PACKAGE_NAME, &submission.package_name)
        .header(HEADER_ARCHIVE_TYPE, ARCHIVE_TYPE)
        .body(body)
        .send()
        .with_context(|| format!("request to {} failed", submission.url))?;

    let success = response.status().is_success();
    println!("{:?} {}", response.version(), response.status());
    for (name, value) in response.headers() {
        println!("{}: {}", name, String::from_utf8_lossy(value.as_bytes()));
    }
    println!();
    println!("{}", response.text().context("failed to read response body")?);

    Ok(if success { 0 } else { 1 })
}

/// Lowercase hex MD5 of the archive at `path`.
pub fn archive_md5(path: &std::path::Path) -> Result<String> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    digest_reader(ChecksumAlgorithm::Md5, file)?
        .context("MD5 digest unexpectedly unavailable")
}
