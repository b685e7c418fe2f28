//! Evidence export
//!
//! Serialises the current (filtered) view together with who exported it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

use crate::dashboard::DashboardSession;
use crate::error::EvidenceError;
use crate::evidence::{EvidenceRecord, UserProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Yaml,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = EvidenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(EvidenceError::ValidationError(format!(
                "Unknown export format: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub timestamp: DateTime<Utc>,
    pub user: Option<UserProfile>,
    pub evidence: Vec<EvidenceRecord>,
    pub total_count: usize,
    pub filtered_count: usize,
}

impl ExportDocument {
    pub fn new(
        user: Option<UserProfile>,
        evidence: Vec<EvidenceRecord>,
        total_count: usize,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            user,
            filtered_count: evidence.len(),
            evidence,
            total_count,
        }
    }

    /// Export whatever the session is currently showing
    pub fn from_session(session: &DashboardSession) -> Self {
        Self::new(
            session.user().cloned(),
            session.filtered().to_vec(),
            session.total_count(),
        )
    }

    pub fn render(&self, format: ExportFormat) -> Result<String, EvidenceError> {
        Ok(match format {
            ExportFormat::Json => serde_json::to_string_pretty(self)?,
            ExportFormat::Yaml => serde_yaml::to_string(self)?,
        })
    }

    pub fn write_to(&self, path: &Path, format: ExportFormat) -> Result<(), EvidenceError> {
        let rendered = self.render(format)?;
        std::fs::write(path, rendered).map_err(|e| {
            EvidenceError::ExportError(format!("Failed to write {:?}: {}", path, e))
        })?;

        info!(
            "Exported {} of {} evidence items to {:?}",
            self.filtered_count, self.total_count, path
        );
        Ok(())
    }
}

/// Decode a record's stored payload and write the original file.
///
/// Without `out` the file lands in the working directory under the record's
/// own file name, or `evidence_<id>` when it has none. Returns the path written.
pub fn write_original(
    record: &EvidenceRecord,
    out: Option<&Path>,
) -> Result<PathBuf, EvidenceError> {
    let content = record.content.as_ref().ok_or_else(|| {
        EvidenceError::DecodeError(format!("evidence {} has no stored content", record.id))
    })?;
    let bytes = content.decode()?;

    let path = match out {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(download_file_name(record)),
    };

    std::fs::write(&path, &bytes).map_err(|e| {
        EvidenceError::ExportError(format!("Failed to write {:?}: {}", path, e))
    })?;

    info!(
        "Downloaded evidence {} ({} bytes) to {:?}",
        record.id,
        bytes.len(),
        path
    );
    Ok(path)
}

/// Stored file name stripped to its last component
fn download_file_name(record: &EvidenceRecord) -> String {
    Path::new(&record.file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| format!("evidence_{}", record.id))
}

/// `evidence-export-YYYY-MM-DD.<ext>`
pub fn export_file_name(date: NaiveDate, format: ExportFormat) -> String {
    format!("evidence-export-{}.{}", date.format("%Y-%m-%d"), format.extension())
}
