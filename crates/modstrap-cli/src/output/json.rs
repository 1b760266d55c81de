//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use modstrap_core::IssueKind;
use modstrap_core::MaterializeReport;
use modstrap_core::TreeManifest;
use modstrap_core::VerificationReport;
use serde::Serialize;
use std::io;
use std::io::Write;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct EntryOutput {
    path: String,
    kind: &'static str,
    size: u64,
}

#[derive(Serialize)]
struct ManifestOutput {
    root: String,
    total_entries: usize,
    total_files: usize,
    total_directories: usize,
    total_size: u64,
    entries: Vec<EntryOutput>,
}

impl From<&TreeManifest> for ManifestOutput {
    fn from(manifest: &TreeManifest) -> Self {
        Self {
            root: manifest.root.clone(),
            total_entries: manifest.total_entries(),
            total_files: manifest.total_files,
            total_directories: manifest.total_directories,
            total_size: manifest.total_size,
            entries: manifest
                .entries
                .iter()
                .map(|e| EntryOutput {
                    path: e.path.to_string(),
                    kind: e.kind.as_str(),
                    size: e.size,
                })
                .collect(),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_materialize_result(&self, report: &MaterializeReport) -> Result<()> {
        #[derive(Serialize)]
        struct MaterializeOutput {
            dest_root: String,
            files_written: usize,
            directories_created: usize,
            bytes_written: u64,
            duration_ms: u128,
        }

        let data = MaterializeOutput {
            dest_root: report.dest_root.display().to_string(),
            files_written: report.files_written,
            directories_created: report.directories_created,
            bytes_written: report.bytes_written,
            duration_ms: report.duration.as_millis(),
        };

        let output = JsonOutput::success("run", data);
        Self::output(&output)
    }

    fn format_manifest_short(&self, manifest: &TreeManifest) -> Result<()> {
        Self::output(&JsonOutput::success("list", ManifestOutput::from(manifest)))
    }

    fn format_manifest_long(&self, manifest: &TreeManifest, _human_readable: bool) -> Result<()> {
        Self::output(&JsonOutput::success("list", ManifestOutput::from(manifest)))
    }

    fn format_verification_report(&self, report: &VerificationReport) -> Result<()> {
        #[derive(Serialize)]
        struct IssueOutput {
            path: String,
            kind: &'static str,
            #[serde(skip_serializing_if = "Option::is_none")]
            expected: Option<&'static str>,
        }

        #[derive(Serialize)]
        struct VerificationOutput {
            dest_root: String,
            clean: bool,
            entries_checked: usize,
            issues: Vec<IssueOutput>,
        }

        let data = VerificationOutput {
            dest_root: report.dest_root.display().to_string(),
            clean: report.is_clean(),
            entries_checked: report.entries_checked,
            issues: report
                .issues
                .iter()
                .map(|issue| IssueOutput {
                    path: issue.path.to_string(),
                    kind: issue.kind.as_str(),
                    expected: match issue.kind {
                        IssueKind::KindMismatch { expected } => Some(expected.as_str()),
                        _ => None,
                    },
                })
                .collect(),
        };

        Self::output(&JsonOutput::success("verify", data))
    }

    fn format_error(&self, operation: &str, error: &anyhow::Error) {
        let output = JsonOutput::<()>::error(operation, format!("{error:#}"));
        let _ = Self::output(&output);
    }
}
