use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::EvidenceError;
use crate::evidence::{EvidenceId, EvidenceRecord, NewEvidence, UserProfile};
use crate::store::{next_id, EvidenceStore};

/// In-process store for embedding and tests
#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<Vec<EvidenceRecord>>>,
    users: Arc<RwLock<Vec<UserProfile>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<EvidenceRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
            users: Arc::default(),
        }
    }

    pub async fn add_user(&self, user: UserProfile) {
        self.users.write().await.push(user);
    }

    /// Replace a stored record wholesale, e.g. to simulate tampering
    pub async fn replace(&self, record: EvidenceRecord) -> bool {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl EvidenceStore for MemoryStore {
    async fn get_all_evidence(&self) -> Result<Vec<EvidenceRecord>, EvidenceError> {
        Ok(self.records.read().await.clone())
    }

    async fn get_evidence(&self, id: EvidenceId) -> Result<Option<EvidenceRecord>, EvidenceError> {
        Ok(self.records.read().await.iter().find(|r| r.id == id).cloned())
    }

    async fn save_evidence(&self, submission: NewEvidence) -> Result<EvidenceId, EvidenceError> {
        let mut records = self.records.write().await;
        let id = next_id(&records);
        records.push(submission.into_record(id, Utc::now()));
        Ok(id)
    }

    async fn get_user(&self, account: &str) -> Result<Option<UserProfile>, EvidenceError> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.account == account)
            .cloned())
    }
}
