//! Output formatting for the CI helper.
//!
//! Renders archive reports for humans (stderr progress) and machines (JSON on
//! stdout), plus the dry-run summary.

use crate::archiver::{ArchivePlan, ArchiveReport};
use crate::error::Result;

/// Format a one-line success message after staging.
#[must_use]
pub fn success_message(report: &ArchiveReport) -> String {
    let count = report.entries.len();
    let plural = if count == 1 { "entry" } else { "entries" };
    format!(
        "Successfully staged {count} {plural} to {}",
        report.staging_dir
    )
}

/// Format the report as a human-readable listing.
#[must_use]
pub fn format_report_human(report: &ArchiveReport) -> String {
    let mut lines = vec![format!(
        "Staged for {} in {}:",
        report.platform, report.staging_dir
    )];
    for entry in &report.entries {
        let files = if entry.files == 1 { "file" } else { "files" };
        lines.push(format!(
            "  - {} ({}, {} {files})",
            entry.name, entry.kind, entry.files
        ));
    }
    lines.join("\n")
}

/// Format the report as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`crate::error::ArchiveError::ReportSerialization`] if the
/// report cannot be serialised.
pub fn format_report_json(report: &ArchiveReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Format a planned archive run as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`crate::error::ArchiveError::ReportSerialization`] if the plan
/// cannot be serialised.
pub fn format_plan_json(plan: &ArchivePlan) -> Result<String> {
    Ok(serde_json::to_string_pretty(plan)?)
}

/// Dry-run summary of a planned archive run.
///
/// # Example
///
/// ```
/// use camino::Utf8PathBuf;
/// use spectro2_ci::archiver::plan;
/// use spectro2_ci::layout::{ArchiveLayout, BuildProfile};
/// use spectro2_ci::output::DryRunInfo;
/// use spectro2_ci::platform::Platform;
///
/// let layout = ArchiveLayout::for_profile(Utf8PathBuf::from("/src/spectro2"), BuildProfile::Release);
/// let plan = plan(&layout, &Platform::Linux).expect("linux is supported");
///
/// let output = DryRunInfo { plan: &plan }.display_text();
/// assert!(output.contains("Dry run"));
/// assert!(output.contains("/src/spectro2/target/release/spectro2"));
/// ```
#[derive(Debug)]
pub struct DryRunInfo<'a> {
    /// The plan that would be executed.
    pub plan: &'a ArchivePlan,
}

impl DryRunInfo<'_> {
    /// Format the dry-run information for display.
    #[must_use]
    pub fn display_text(&self) -> String {
        let staging_dir = self.plan.staging_dir();
        let mut lines = vec![
            "Dry run - no files will be modified".to_owned(),
            String::new(),
            format!("Repository root: {}", self.plan.layout.repository_root()),
            format!("Build output: {}", self.plan.layout.build_output_dir()),
            format!("Platform: {}", self.plan.platform),
            format!("Staging directory: {staging_dir}"),
            String::new(),
            "Artefacts to stage:".to_owned(),
        ];

        for copy in &self.plan.copies {
            lines.push(format!(
                "  - {} -> {}",
                copy.source(),
                staging_dir.join(&copy.name)
            ));
        }

        lines.join("\n")
    }
}
