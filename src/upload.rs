//! Evidence submission
//!
//! Validates an uploaded file against the upload policy and turns it into a
//! `NewEvidence` whose digest is computed from the same encoded content that
//! gets stored.

use std::path::Path;
use tracing::{debug, info};

use crate::config::{DEFAULT_ALLOWED_TYPES, DEFAULT_MAX_FILE_SIZE};
use crate::error::EvidenceError;
use crate::evidence::{EncodedContent, NewEvidence};
use crate::integrity::IntegrityVerifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_file_size: u64,
    pub allowed_types: Vec<String>,
}

impl UploadPolicy {
    pub fn new(max_file_size: u64, allowed_types: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_types,
        }
    }

    /// Size limit first, then the MIME type must start with an allowed prefix
    pub fn validate(&self, size: u64, mime_type: &str) -> Result<(), EvidenceError> {
        if size > self.max_file_size {
            return Err(EvidenceError::file_too_large(size, self.max_file_size));
        }

        if !self
            .allowed_types
            .iter()
            .filter(|prefix| !prefix.is_empty())
            .any(|prefix| mime_type.starts_with(prefix.as_str()))
        {
            return Err(EvidenceError::file_type_not_allowed(mime_type));
        }

        Ok(())
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_FILE_SIZE,
            DEFAULT_ALLOWED_TYPES.iter().map(|t| t.to_string()).collect(),
        )
    }
}

/// Metadata typed into the upload form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadForm {
    pub case_id: String,
    pub title: String,
    pub description: String,
    pub evidence_type: String,
}

/// The selected file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn from_path(path: &Path, mime_type: Option<&str>) -> Result<Self, EvidenceError> {
        let bytes = std::fs::read(path).map_err(|e| {
            EvidenceError::ValidationError(format!("Failed to read {:?}: {}", path, e))
        })?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        let mime_type = mime_type
            .map(str::to_string)
            .unwrap_or_else(|| guess_mime_type(&name).to_string());

        Ok(Self {
            name,
            mime_type,
            bytes,
        })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Validate the file, encode it for storage and compute its digest
pub async fn prepare_submission(
    policy: &UploadPolicy,
    verifier: &IntegrityVerifier,
    form: UploadForm,
    file: UploadedFile,
    submitted_by: &str,
) -> Result<NewEvidence, EvidenceError> {
    if form.case_id.trim().is_empty() || form.title.trim().is_empty() {
        return Err(EvidenceError::ValidationError(
            "Case ID and title are required".to_string(),
        ));
    }

    policy.validate(file.size(), &file.mime_type)?;

    let content = EncodedContent::from_bytes(&file.mime_type, &file.bytes);
    let digest = verifier.digest_content(&content).await?;
    debug!("Computed {} digest {} for {}", verifier.algorithm(), digest, file.name);

    info!(
        "Prepared submission of {} ({} bytes) for case {}",
        file.name,
        file.size(),
        form.case_id
    );

    Ok(NewEvidence {
        case_id: form.case_id,
        title: form.title,
        description: form.description,
        evidence_type: form.evidence_type,
        file_size: file.size(),
        file_name: file.name,
        mime_type: file.mime_type,
        content,
        digest,
        submitted_by: submitted_by.to_string(),
    })
}

pub fn guess_mime_type(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "pdf" => "application/pdf",
        "txt" | "log" => "text/plain",
        "csv" => "text/csv",
        "json" => "application/json",
        _ => "application/octet-stream",
    }
}
