//! Evidence Store boundary
//!
//! The store owns the authoritative evidence collection. Everything else in
//! the crate works on snapshots fetched through this trait.

pub mod file;
pub mod memory;

use async_trait::async_trait;

use crate::error::EvidenceError;
use crate::evidence::{EvidenceId, EvidenceRecord, NewEvidence, UserProfile};

pub use file::JsonlStore;
pub use memory::MemoryStore;

#[async_trait]
pub trait EvidenceStore: Send + Sync {
    /// Full collection. Fails with `StoreUnavailable` when the backing store can't be read.
    async fn get_all_evidence(&self) -> Result<Vec<EvidenceRecord>, EvidenceError>;

    async fn get_evidence(&self, id: EvidenceId) -> Result<Option<EvidenceRecord>, EvidenceError>;

    /// Persist a submission and return its assigned id
    async fn save_evidence(&self, submission: NewEvidence) -> Result<EvidenceId, EvidenceError>;

    async fn get_user(&self, account: &str) -> Result<Option<UserProfile>, EvidenceError>;
}

/// Next id after the highest one in use
pub(crate) fn next_id(records: &[EvidenceRecord]) -> EvidenceId {
    records.iter().map(|r| r.id).max().map_or(1, |max| max + 1)
}
