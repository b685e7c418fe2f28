#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use evidence_manager::evidence::{
    EncodedContent, EvidenceId, EvidenceRecord, EvidenceStatus, NewEvidence, UserProfile,
};
use evidence_manager::integrity::sha256_hex;
use evidence_manager::store::EvidenceStore;
use evidence_manager::EvidenceError;

pub fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Record with a valid data URL payload, digested the way the upload form does it
pub fn create_test_record(
    id: EvidenceId,
    title: &str,
    status: EvidenceStatus,
    evidence_type: &str,
    timestamp: DateTime<Utc>,
) -> EvidenceRecord {
    let body = format!("payload for {}", title);
    let content = EncodedContent::from_bytes("text/plain", body.as_bytes());
    EvidenceRecord {
        id,
        case_id: format!("CASE-{:03}", id),
        title: title.to_string(),
        description: format!("{} description", title),
        evidence_type: evidence_type.to_string(),
        file_name: format!("{}.txt", title.to_lowercase()),
        file_size: body.len() as u64,
        mime_type: "text/plain".to_string(),
        digest: sha256_hex(content.as_str().as_bytes()),
        content: Some(content),
        status,
        submitted_by: "0xinvestigator".to_string(),
        timestamp,
        submission_ip: None,
    }
}

/// The two-record collection used in the concrete query scenarios
pub fn alpha_beta() -> Vec<EvidenceRecord> {
    vec![
        create_test_record(1, "Alpha", EvidenceStatus::Pending, "photo", ts(2024, 1, 1)),
        create_test_record(2, "Beta", EvidenceStatus::Approved, "video", ts(2024, 2, 1)),
    ]
}

/// A wider collection with mixed case, ties and statuses
pub fn create_test_collection() -> Vec<EvidenceRecord> {
    vec![
        create_test_record(1, "Alpha", EvidenceStatus::Pending, "photo", ts(2024, 1, 1)),
        create_test_record(2, "Beta", EvidenceStatus::Approved, "video", ts(2024, 2, 1)),
        create_test_record(3, "gamma", EvidenceStatus::Rejected, "Document", ts(2024, 1, 15)),
        create_test_record(4, "Delta", EvidenceStatus::UnderReview, "photo", ts(2023, 12, 31)),
        create_test_record(5, "alpha", EvidenceStatus::Approved, "audio", ts(2024, 2, 1)),
        create_test_record(6, "Epsilon", EvidenceStatus::Pending, "video", ts(2024, 3, 10)),
    ]
}

pub fn ids(records: &[EvidenceRecord]) -> Vec<EvidenceId> {
    records.iter().map(|r| r.id).collect()
}

/// Store whose backend is always unreachable
pub struct UnreachableStore;

#[async_trait]
impl EvidenceStore for UnreachableStore {
    async fn get_all_evidence(&self) -> Result<Vec<EvidenceRecord>, EvidenceError> {
        Err(EvidenceError::StoreUnavailable("connection refused".to_string()))
    }

    async fn get_evidence(&self, _id: EvidenceId) -> Result<Option<EvidenceRecord>, EvidenceError> {
        Err(EvidenceError::StoreUnavailable("connection refused".to_string()))
    }

    async fn save_evidence(&self, _submission: NewEvidence) -> Result<EvidenceId, EvidenceError> {
        Err(EvidenceError::StoreUnavailable("connection refused".to_string()))
    }

    async fn get_user(&self, _account: &str) -> Result<Option<UserProfile>, EvidenceError> {
        Ok(None)
    }
}
