mod common;

use common::*;
use std::sync::Arc;

use evidence_manager::config::AppConfig;
use evidence_manager::dashboard::DashboardSession;
use evidence_manager::evidence::{EncodedContent, EvidenceRecord, EvidenceStatus};
use evidence_manager::integrity::{sha256_hex, DigestInput, IntegrityVerifier};
use evidence_manager::store::MemoryStore;
use evidence_manager::EvidenceError;

#[tokio::test]
async fn test_hello_world_digests() {
    let verifier = IntegrityVerifier::default();

    let same = verifier.verify(b"hello", &sha256_hex(b"hello")).await.unwrap();
    assert!(same.matched);

    let different = verifier.verify(b"hello", &sha256_hex(b"world")).await.unwrap();
    assert!(!different.matched);
}

#[tokio::test]
async fn test_digest_is_deterministic() {
    let verifier = IntegrityVerifier::default();
    let samples: [&[u8]; 4] = [b"", b"a", b"evidence payload", &[0u8, 255, 1, 254]];

    for content in samples {
        let first = verifier.verify(content, &sha256_hex(content)).await.unwrap();
        let second = verifier.verify(content, &first.computed).await.unwrap();
        assert!(first.matched);
        assert!(second.matched);
        assert_eq!(first.computed, second.computed);
    }
}

#[tokio::test]
async fn test_single_byte_change_is_detected() {
    let verifier = IntegrityVerifier::default();
    let original = b"chain of custody log".to_vec();
    let recorded = sha256_hex(&original);

    for index in 0..original.len() {
        let mut altered = original.clone();
        altered[index] ^= 0x01;
        let result = verifier.verify(&altered, &recorded).await.unwrap();
        assert!(!result.matched, "flip at byte {} went unnoticed", index);
    }
}

#[tokio::test]
async fn test_intact_record_verifies() {
    let record = create_test_record(1, "Alpha", EvidenceStatus::Pending, "photo", ts(2024, 1, 1));

    let report = IntegrityVerifier::default().verify_record(&record).await.unwrap();

    assert!(report.is_intact());
    assert_eq!(report.evidence_id, 1);
    assert_eq!(report.algorithm, "sha256");
}

#[tokio::test]
async fn test_file_byte_digests_need_decoded_mode() {
    let mut record =
        create_test_record(1, "Alpha", EvidenceStatus::Pending, "photo", ts(2024, 1, 1));
    record.digest = sha256_hex(b"payload for Alpha");

    assert!(!IntegrityVerifier::default()
        .verify_record(&record)
        .await
        .unwrap()
        .is_intact());

    let decoded = IntegrityVerifier::sha256(DigestInput::Decoded, usize::MAX);
    assert!(decoded.verify_record(&record).await.unwrap().is_intact());
}

#[tokio::test]
async fn test_upload_form_record_verifies_under_default_config() {
    let content = EncodedContent::from_bytes("image/png", &[0x89, b'P', b'N', b'G', 0, 1, 2]);
    let line = serde_json::json!({
        "id": 12,
        "case_id": "CASE-012",
        "title": "Scene photo",
        "file_name": "scene.png",
        "file_size": 7,
        "mime_type": "image/png",
        "file_data": content.as_str(),
        "hash": sha256_hex(content.as_str().as_bytes()),
        "status": "pending",
        "submitted_by": "0xinvestigator",
        "timestamp": "2024-05-01T09:15:00.000Z"
    });
    let record: EvidenceRecord = serde_json::from_value(line).unwrap();

    let verifier = AppConfig::defaults().unwrap().verifier();
    let report = verifier.verify_record(&record).await.unwrap();

    assert!(report.is_intact());
    assert_eq!(report.file_name, "scene.png");
}

#[tokio::test]
async fn test_tampered_store_content_is_a_mismatch_not_an_error() {
    let store = MemoryStore::with_records(create_test_collection());
    let session = DashboardSession::open(Arc::new(store.clone()), IntegrityVerifier::default(), "")
        .await
        .unwrap();

    assert!(session.verify_integrity(2).await.unwrap().is_intact());

    let edited = EncodedContent::from_bytes("text/plain", b"edited afterwards");
    let mut tampered = store_record(&store, 2).await;
    tampered.content = Some(edited.clone());
    assert!(store.replace(tampered).await);

    let report = session.verify_integrity(2).await.unwrap();
    assert!(!report.is_intact());
    assert_eq!(report.verification.computed, sha256_hex(edited.as_str().as_bytes()));
}

#[tokio::test]
async fn test_corrupt_store_content_is_a_decode_error() {
    let store = MemoryStore::with_records(create_test_collection());
    let session = DashboardSession::open(Arc::new(store.clone()), IntegrityVerifier::default(), "")
        .await
        .unwrap();

    let mut corrupt = store_record(&store, 3).await;
    corrupt.content = Some(EncodedContent::new("data:text/plain;base64,@@not-base64@@"));
    store.replace(corrupt).await;

    let err = session.verify_integrity(3).await.unwrap_err();
    assert!(matches!(err, EvidenceError::DecodeError(_)));
    assert!(err.is_infrastructure_fault());
}

#[tokio::test]
async fn test_unknown_record_is_not_found() {
    let session = DashboardSession::open(
        Arc::new(MemoryStore::with_records(alpha_beta())),
        IntegrityVerifier::default(),
        "",
    )
    .await
    .unwrap();

    let err = session.verify_integrity(42).await.unwrap_err();
    assert!(matches!(err, EvidenceError::NotFound(42)));
}

async fn store_record(
    store: &MemoryStore,
    id: u64,
) -> EvidenceRecord {
    use evidence_manager::store::EvidenceStore;
    store.get_evidence(id).await.unwrap().unwrap()
}
