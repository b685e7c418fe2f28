use thiserror::Error;

use crate::evidence::EvidenceId;

impl From<serde_json::Error> for EvidenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::ExportError(format!("JSON serialization error: {}", err))
    }
}

impl From<serde_yaml::Error> for EvidenceError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::ExportError(format!("YAML serialization error: {}", err))
    }
}

impl From<config::ConfigError> for EvidenceError {
    fn from(err: config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum EvidenceError {
    #[error("Evidence store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Content decode error: {0}")]
    DecodeError(String),

    #[error("Digest computation failed: {0}")]
    DigestUnavailable(String),

    #[error("Evidence not found: {0}")]
    NotFound(EvidenceId),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Export error: {0}")]
    ExportError(String),
}

impl EvidenceError {
    pub fn file_too_large(size: u64, limit: u64) -> Self {
        Self::ValidationError(format!(
            "File size {} exceeds limit of {} bytes",
            size, limit
        ))
    }

    pub fn file_type_not_allowed(mime_type: &str) -> Self {
        Self::ValidationError(format!("File type not allowed: {}", mime_type))
    }

    pub fn unknown_status(value: &str) -> Self {
        Self::ValidationError(format!(
            "Unknown status filter: {}. Must be one of pending, approved, rejected, under_review",
            value
        ))
    }

    /// True for faults that say nothing about whether content was tampered with.
    pub fn is_infrastructure_fault(&self) -> bool {
        matches!(
            self,
            Self::StoreUnavailable(_) | Self::DecodeError(_) | Self::DigestUnavailable(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, EvidenceError>;
