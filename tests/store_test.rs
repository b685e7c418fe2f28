mod common;

use common::*;
use std::io::Write;
use std::sync::Arc;
use tempfile::TempDir;

use evidence_manager::config::AppConfig;
use evidence_manager::dashboard::DashboardSession;
use evidence_manager::evidence::{EncodedContent, EvidenceStatus};
use evidence_manager::integrity::{sha256_hex, IntegrityVerifier};
use evidence_manager::query::Query;
use evidence_manager::store::{EvidenceStore, JsonlStore};
use evidence_manager::upload::{prepare_submission, UploadForm, UploadPolicy, UploadedFile};
use evidence_manager::EvidenceError;

fn store_in(dir: &TempDir) -> JsonlStore {
    JsonlStore::new(
        dir.path().join("evidence.jsonl"),
        dir.path().join("users.json"),
    )
}

fn text_upload(name: &str, body: &[u8]) -> UploadedFile {
    UploadedFile {
        name: name.to_string(),
        mime_type: "text/plain".to_string(),
        bytes: body.to_vec(),
    }
}

fn form(case_id: &str, title: &str) -> UploadForm {
    UploadForm {
        case_id: case_id.to_string(),
        title: title.to_string(),
        description: String::new(),
        evidence_type: "document".to_string(),
    }
}

#[tokio::test]
async fn test_legacy_and_current_lines_are_normalised() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let content = EncodedContent::from_bytes("text/plain", b"witness statement");

    let mut file = std::fs::File::create(store.evidence_path()).unwrap();
    writeln!(
        file,
        r#"{{"id":1,"case_id":"CASE-001","title":"Statement","type":"document","file_name":"statement.txt","file_size":17,"mime_type":"text/plain","file_data":"{}","hash":"{}","status":"approved","submitted_by":"0xabc","timestamp":"2024-01-05 10:30:00"}}"#,
        content.as_str(),
        sha256_hex(content.as_str().as_bytes())
    )
    .unwrap();
    writeln!(
        file,
        r#"{{"id":2,"caseId":"CASE-002","title":"Photo","type":"photo","fileName":"photo.jpg","status":"archived","timestamp":1704067200000}}"#
    )
    .unwrap();
    writeln!(file, "not json at all").unwrap();
    drop(file);

    let records = store.get_all_evidence().await.unwrap();
    assert_eq!(ids(&records), vec![1, 2]);

    let legacy = &records[0];
    assert_eq!(legacy.case_id, "CASE-001");
    assert_eq!(legacy.file_name, "statement.txt");
    assert_eq!(legacy.status, EvidenceStatus::Approved);
    assert_eq!(legacy.content.as_ref(), Some(&content));

    let current = &records[1];
    assert_eq!(current.status, EvidenceStatus::Unknown);
    assert_eq!(current.timestamp, ts(2024, 1, 1));

    let verifier = AppConfig::defaults().unwrap().verifier();
    let report = verifier.verify_record(legacy).await.unwrap();
    assert!(report.is_intact());
}

#[tokio::test]
async fn test_duplicate_and_mistyped_fields_keep_the_record() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let content = EncodedContent::from_bytes("text/plain", b"ledger page");
    let digest = sha256_hex(content.as_str().as_bytes());

    let lines = [
        serde_json::json!({"id": 1, "title": "Alpha", "caseId": "CASE-1", "case_id": "CASE-1"}),
        serde_json::json!({
            "id": 2,
            "title": "Beta",
            "fileData": content.as_str(),
            "file_data": content.as_str(),
            "hash": digest,
            "digest": digest
        }),
        serde_json::json!({"id": 3, "title": "Gamma", "fileSize": "2048"}),
        serde_json::json!({"id": 4, "title": "Delta"}),
    ];
    let body: Vec<String> = lines.iter().map(|line| line.to_string()).collect();
    std::fs::write(store.evidence_path(), body.join("\n")).unwrap();

    let records = store.get_all_evidence().await.unwrap();
    assert_eq!(ids(&records), vec![1, 2, 3, 4]);
    assert_eq!(records[0].case_id, "CASE-1");
    assert_eq!(records[2].file_size, 0);

    let found = evidence_manager::query(&records, &Query::new().term("alpha"));
    assert_eq!(ids(&found), vec![1]);

    let verifier = AppConfig::defaults().unwrap().verifier();
    assert!(verifier.verify_record(&records[1]).await.unwrap().is_intact());
}

#[tokio::test]
async fn test_download_writes_the_submitted_file() {
    let dir = TempDir::new().unwrap();
    let store: Arc<dyn EvidenceStore> = Arc::new(store_in(&dir));
    let verifier = IntegrityVerifier::default();

    let submission = prepare_submission(
        &UploadPolicy::default(),
        &verifier,
        form("CASE-400", "Dashcam"),
        UploadedFile {
            name: "dashcam.mp4".to_string(),
            mime_type: "video/mp4".to_string(),
            bytes: vec![0, 0, 0, 24, b'f', b't', b'y', b'p'],
        },
        "",
    )
    .await
    .unwrap();
    let id = store.save_evidence(submission).await.unwrap();

    let session = DashboardSession::open(store, verifier, "").await.unwrap();
    let out = dir.path().join("restored.mp4");
    let written = session.download(id, Some(&out)).await.unwrap();

    assert_eq!(written, out);
    assert_eq!(std::fs::read(&out).unwrap(), vec![0, 0, 0, 24, b'f', b't', b'y', b'p']);

    let err = session.download(99, Some(&out)).await.unwrap_err();
    assert!(matches!(err, EvidenceError::NotFound(99)));
}

#[tokio::test]
async fn test_submit_then_verify_through_store() {
    let dir = TempDir::new().unwrap();
    let store: Arc<dyn EvidenceStore> = Arc::new(store_in(&dir));
    let verifier = IntegrityVerifier::default();
    let policy = UploadPolicy::default();

    for (case_id, title, body) in [
        ("CASE-100", "Interview notes", b"first".as_slice()),
        ("CASE-101", "Chat export", b"second".as_slice()),
    ] {
        let submission = prepare_submission(
            &policy,
            &verifier,
            form(case_id, title),
            text_upload("notes.txt", body),
            "0xinvestigator",
        )
        .await
        .unwrap();
        store.save_evidence(submission).await.unwrap();
    }

    let mut session = DashboardSession::open(store.clone(), verifier.clone(), "0xinvestigator")
        .await
        .unwrap();
    assert_eq!(session.total_count(), 2);

    let results = session.search(Query::new().term("chat"));
    assert_eq!(ids(&results.records), vec![2]);
    assert_eq!(results.records[0].status, EvidenceStatus::Pending);
    let stored = results.records[0].content.as_ref().unwrap();
    assert_eq!(stored.decode().unwrap(), b"second");
    assert_eq!(results.records[0].digest, sha256_hex(stored.as_str().as_bytes()));

    assert!(session.verify_integrity(1).await.unwrap().is_intact());
    assert!(session.verify_integrity(2).await.unwrap().is_intact());
}

#[tokio::test]
async fn test_rejected_upload_is_not_stored() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let policy = UploadPolicy::new(4, vec!["text/".to_string()]);

    let err = prepare_submission(
        &policy,
        &IntegrityVerifier::default(),
        form("CASE-200", "Too big"),
        text_upload("big.txt", b"more than four bytes"),
        "",
    )
    .await
    .unwrap_err();

    assert!(matches!(err, EvidenceError::ValidationError(_)));
    assert!(store.get_all_evidence().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_ids_continue_after_highest_existing() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let mut file = std::fs::File::create(store.evidence_path()).unwrap();
    writeln!(file, r#"{{"id":7,"title":"Existing"}}"#).unwrap();
    drop(file);

    let submission = prepare_submission(
        &UploadPolicy::default(),
        &IntegrityVerifier::default(),
        form("CASE-300", "Next"),
        text_upload("next.txt", b"next"),
        "",
    )
    .await
    .unwrap();

    assert_eq!(store.save_evidence(submission).await.unwrap(), 8);
    assert_eq!(store.get_evidence(8).await.unwrap().unwrap().title, "Next");
}
