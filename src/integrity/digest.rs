//! Digest providers
//!
//! Digest computation is injected into the verifier so callers can swap
//! the SHA-256 backend for a deterministic fake in tests.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::EvidenceError;

/// Computes a lowercase hex digest of a byte payload
#[async_trait]
pub trait DigestProvider: Send + Sync {
    fn algorithm(&self) -> &'static str;

    async fn digest(&self, data: &[u8]) -> Result<String, EvidenceError>;
}

/// SHA-256 of `data`, lowercase hex, two characters per byte
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// SHA-256 provider. Payloads at or above `offload_threshold` bytes are
/// hashed on the blocking thread pool.
#[derive(Debug, Clone)]
pub struct Sha256Digest {
    offload_threshold: usize,
}

impl Sha256Digest {
    pub const DEFAULT_OFFLOAD_THRESHOLD: usize = 1024 * 1024;

    pub fn new(offload_threshold: usize) -> Self {
        Self { offload_threshold }
    }
}

impl Default for Sha256Digest {
    fn default() -> Self {
        Self::new(Self::DEFAULT_OFFLOAD_THRESHOLD)
    }
}

#[async_trait]
impl DigestProvider for Sha256Digest {
    fn algorithm(&self) -> &'static str {
        "sha256"
    }

    async fn digest(&self, data: &[u8]) -> Result<String, EvidenceError> {
        if data.len() < self.offload_threshold {
            return Ok(sha256_hex(data));
        }

        debug!("Offloading SHA-256 of {} bytes to blocking pool", data.len());
        let owned = data.to_vec();
        tokio::task::spawn_blocking(move || sha256_hex(&owned))
            .await
            .map_err(|e| EvidenceError::DigestUnavailable(format!("hashing task failed: {}", e)))
    }
}
