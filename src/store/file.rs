//! JSON Lines evidence store
//!
//! Evidence lives in an append-only JSONL file, one record per line. Accounts
//! live in a separate JSON array file. Records are normalised to the
//! canonical shape as they are read.

use async_trait::async_trait;
use chrono::Utc;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::EvidenceError;
use crate::evidence::{EvidenceId, EvidenceRecord, NewEvidence, UserProfile};
use crate::store::{next_id, EvidenceStore};

#[derive(Clone)]
pub struct JsonlStore {
    evidence_path: PathBuf,
    users_path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl JsonlStore {
    pub fn new(evidence_path: impl Into<PathBuf>, users_path: impl Into<PathBuf>) -> Self {
        Self {
            evidence_path: evidence_path.into(),
            users_path: users_path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn evidence_path(&self) -> &Path {
        &self.evidence_path
    }

    fn read_records(&self) -> Result<Vec<EvidenceRecord>, EvidenceError> {
        if !self.evidence_path.exists() {
            debug!("Evidence file {:?} does not exist yet", self.evidence_path);
            return Ok(vec![]);
        }

        let file = File::open(&self.evidence_path).map_err(|e| {
            EvidenceError::StoreUnavailable(format!(
                "Failed to open {:?}: {}",
                self.evidence_path, e
            ))
        })?;

        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                EvidenceError::StoreUnavailable(format!("Failed to read evidence line: {}", e))
            })?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<EvidenceRecord>(&line) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping unreadable evidence line {}: {}", index + 1, e),
            }
        }

        Ok(records)
    }

    fn append_record(&self, record: &EvidenceRecord) -> Result<(), EvidenceError> {
        if let Some(parent) = self.evidence_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    EvidenceError::StoreUnavailable(format!(
                        "Failed to create evidence directory: {}",
                        e
                    ))
                })?;
            }
        }

        let json = serde_json::to_string(record).map_err(|e| {
            EvidenceError::StoreUnavailable(format!("Failed to serialize evidence: {}", e))
        })?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.evidence_path)
            .map_err(|e| {
                EvidenceError::StoreUnavailable(format!("Failed to open evidence file: {}", e))
            })?;

        writeln!(file, "{}", json)
            .and_then(|_| file.flush())
            .map_err(|e| {
                EvidenceError::StoreUnavailable(format!("Failed to write evidence: {}", e))
            })
    }
}

#[async_trait]
impl EvidenceStore for JsonlStore {
    async fn get_all_evidence(&self) -> Result<Vec<EvidenceRecord>, EvidenceError> {
        let records = self.read_records()?;
        debug!("Loaded {} evidence records", records.len());
        Ok(records)
    }

    async fn get_evidence(&self, id: EvidenceId) -> Result<Option<EvidenceRecord>, EvidenceError> {
        Ok(self.read_records()?.into_iter().find(|r| r.id == id))
    }

    async fn save_evidence(&self, submission: NewEvidence) -> Result<EvidenceId, EvidenceError> {
        let _guard = self.write_lock.lock().await;

        let existing = self.read_records()?;
        let id = next_id(&existing);
        let record = submission.into_record(id, Utc::now());

        self.append_record(&record)?;
        info!("Stored evidence {} ({})", id, record.file_name);
        Ok(id)
    }

    async fn get_user(&self, account: &str) -> Result<Option<UserProfile>, EvidenceError> {
        if !self.users_path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.users_path).map_err(|e| {
            EvidenceError::StoreUnavailable(format!(
                "Failed to read {:?}: {}",
                self.users_path, e
            ))
        })?;

        let users: Vec<UserProfile> = serde_json::from_str(&contents).map_err(|e| {
            EvidenceError::StoreUnavailable(format!(
                "Failed to parse {:?}: {}",
                self.users_path, e
            ))
        })?;

        Ok(users.into_iter().find(|u| u.account == account))
    }
}
