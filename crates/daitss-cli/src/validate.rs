//! # Validate Subcommand
//!
//! Runs every admission check against an extracted WIP and prints one line
//! per check, followed by any failure detail from the metadata bag.
//!
//! Exit codes: `0` every check passed, `1` at least one check failed.
//! Malformed packages and registry failures are errors (exit `2`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use daitss_core::AgentId;
use daitss_wip::{Check, CheckOutcome, InMemoryRegistry, Registry, ValidationReport, Wip};

/// Arguments for the `daitss validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the extracted package directory.
    #[arg(value_name = "PACKAGE")]
    pub package: PathBuf,

    /// YAML registry snapshot listing accounts, projects, and agents.
    #[arg(long, value_name = "FILE")]
    pub registry: PathBuf,

    /// Submitting agent whose authority over the package is checked.
    #[arg(long, value_name = "ID")]
    pub agent: Option<String>,

    /// Report rendering.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Output format for validation reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let registry = InMemoryRegistry::from_yaml_file(&args.registry)
        .with_context(|| format!("failed to load registry {}", args.registry.display()))?;
    let report = validate_package(&args.package, &registry, args.agent.as_deref())?;

    match args.format {
        ReportFormat::Text => print!("{}", render_text(&report)),
        ReportFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("failed to serialize report")?
        ),
    }

    Ok(if report.is_valid() { 0 } else { 1 })
}

/// Validate the package at `path`, resolving `agent_id` through `registry`.
///
/// An agent id the registry does not know fails the authorization check
/// rather than aborting the run.
pub fn validate_package(
    path: &Path,
    registry: &dyn Registry,
    agent_id: Option<&str>,
) -> Result<ValidationReport> {
    let mut wip = Wip::open(path)?;

    let agent = match agent_id {
        Some(raw) => {
            let id = AgentId::new(raw).context("invalid --agent")?;
            let found = registry.agent(&id)?;
            if found.is_none() {
                tracing::warn!(agent = %id, "agent not found in registry");
            }
            Some(found)
        }
        None => None,
    };

    let mut report = wip.validate_all(registry, agent.as_ref().and_then(Option::as_ref))?;
    if let Some(None) = agent {
        report.checks.push(CheckOutcome {
            check: Check::PackageAccountMatchesAgent,
            passed: false,
        });
    }
    tracing::info!(
        package = %report.package,
        valid = report.is_valid(),
        "validation complete"
    );
    Ok(report)
}

/// Render a report as `OK:`/`FAIL:` lines plus metadata detail.
pub fn render_text(report: &ValidationReport) -> String {
    let mut out = format!("package {} ({})\n", report.package, report.path.display());
    for outcome in &report.checks {
        let status = if outcome.passed { "OK:  " } else { "FAIL:" };
        out.push_str(&format!("{status} {}\n", outcome.check));
    }
    for (key, detail) in &report.metadata {
        out.push_str(&format!("  {key}: {}\n", detail.trim_end()));
    }
    out
}
