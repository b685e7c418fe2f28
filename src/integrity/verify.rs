//! Integrity Verifier
//!
//! Recomputes a record's digest and compares it against the digest recorded
//! at submission. A mismatch is a normal result; failing to decode or hash
//! the content is an error, so a broken payload or hashing backend is never
//! reported as tampering.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::EvidenceError;
use crate::evidence::{EncodedContent, EvidenceId, EvidenceRecord};
use crate::integrity::digest::{DigestProvider, Sha256Digest};

/// Which bytes the digest covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigestInput {
    /// The UTF-8 transport text (data URL) as stored, which is what the
    /// upload form hashed
    #[default]
    Transport,
    /// The decoded file bytes
    Decoded,
}

/// Outcome of comparing a recomputed digest with the recorded one
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verification {
    pub matched: bool,
    pub computed: String,
    pub recorded: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityReport {
    pub evidence_id: EvidenceId,
    pub file_name: String,
    pub algorithm: String,
    pub verification: Verification,
}

impl IntegrityReport {
    pub fn is_intact(&self) -> bool {
        self.verification.matched
    }
}

#[derive(Clone)]
pub struct IntegrityVerifier {
    provider: Arc<dyn DigestProvider>,
    input: DigestInput,
}

impl IntegrityVerifier {
    pub fn new(provider: Arc<dyn DigestProvider>, input: DigestInput) -> Self {
        Self { provider, input }
    }

    pub fn sha256(input: DigestInput, offload_threshold: usize) -> Self {
        Self::new(Arc::new(Sha256Digest::new(offload_threshold)), input)
    }

    pub fn input(&self) -> DigestInput {
        self.input
    }

    pub fn algorithm(&self) -> &'static str {
        self.provider.algorithm()
    }

    /// Compare the digest of `content` against `recorded_digest`, case-sensitively
    pub async fn verify(
        &self,
        content: &[u8],
        recorded_digest: &str,
    ) -> Result<Verification, EvidenceError> {
        let computed = self.provider.digest(content).await?;
        let matched = computed == recorded_digest;

        Ok(Verification {
            matched,
            computed,
            recorded: recorded_digest.to_string(),
        })
    }

    /// Digest of a transport-encoded payload under the configured input mode.
    ///
    /// The payload is always decoded first so corrupt content surfaces as
    /// `DecodeError` in either mode.
    pub async fn digest_content(&self, content: &EncodedContent) -> Result<String, EvidenceError> {
        let decoded = content.decode()?;
        match self.input {
            DigestInput::Decoded => self.provider.digest(&decoded).await,
            DigestInput::Transport => self.provider.digest(content.as_str().as_bytes()).await,
        }
    }

    pub async fn verify_record(
        &self,
        record: &EvidenceRecord,
    ) -> Result<IntegrityReport, EvidenceError> {
        let content = record.content.as_ref().ok_or_else(|| {
            EvidenceError::DecodeError(format!("evidence {} has no stored content", record.id))
        })?;

        let computed = self.digest_content(content).await?;
        let verification = Verification {
            matched: computed == record.digest,
            computed,
            recorded: record.digest.clone(),
        };

        if verification.matched {
            info!("Evidence {} integrity verified", record.id);
        } else {
            warn!(
                "Evidence {} digest mismatch: recorded {}, computed {}",
                record.id, verification.recorded, verification.computed
            );
        }

        Ok(IntegrityReport {
            evidence_id: record.id,
            file_name: record.file_name.clone(),
            algorithm: self.algorithm().to_string(),
            verification,
        })
    }

    /// Verify many records concurrently. Outcomes come back in input order.
    pub async fn verify_all(
        &self,
        records: Vec<EvidenceRecord>,
    ) -> Vec<(EvidenceId, Result<IntegrityReport, EvidenceError>)> {
        debug!("Verifying {} records", records.len());

        let handles: Vec<_> = records
            .into_iter()
            .map(|record| {
                let verifier = self.clone();
                let id = record.id;
                (id, tokio::spawn(async move { verifier.verify_record(&record).await }))
            })
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for (id, handle) in handles {
            let outcome = match handle.await {
                Ok(result) => result,
                Err(e) => Err(EvidenceError::DigestUnavailable(format!(
                    "verification task for evidence {} failed: {}",
                    id, e
                ))),
            };
            outcomes.push((id, outcome));
        }
        outcomes
    }
}

impl Default for IntegrityVerifier {
    fn default() -> Self {
        Self::new(Arc::new(Sha256Digest::default()), DigestInput::default())
    }
}
