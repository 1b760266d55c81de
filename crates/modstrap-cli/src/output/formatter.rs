//! Output formatter trait for CLI results.

use anyhow::Result;
use modstrap_core::MaterializeReport;
use modstrap_core::TreeManifest;
use modstrap_core::VerificationReport;
use serde::Serialize;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format materialization result
    fn format_materialize_result(&self, report: &MaterializeReport) -> Result<()>;

    /// Format tree listing (paths only)
    fn format_manifest_short(&self, manifest: &TreeManifest) -> Result<()>;

    /// Format tree listing with kinds and sizes
    fn format_manifest_long(&self, manifest: &TreeManifest, human_readable: bool) -> Result<()>;

    /// Format verification report
    fn format_verification_report(&self, report: &VerificationReport) -> Result<()>;

    /// Format error message
    fn format_error(&self, operation: &str, error: &anyhow::Error);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }
}

impl JsonOutput<()> {
    pub fn error(operation: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Error,
            data: None,
            error: Some(error.into()),
        }
    }
}
