//! Dashboard session state
//!
//! Holds the current evidence snapshot and the last search for one viewer.
//! All filtering and verification logic lives in `query` and `integrity`;
//! this type only keeps the pieces together and numbers each result set so
//! callers can drop stale ones.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

use crate::error::EvidenceError;
use crate::evidence::{EvidenceId, EvidenceRecord, UserProfile};
use crate::export::write_original;
use crate::integrity::{IntegrityReport, IntegrityVerifier};
use crate::presentation::results_summary;
use crate::query::{query, Query};
use crate::store::EvidenceStore;

/// One query result, tagged with the generation it was computed for
#[derive(Debug, Clone)]
pub struct SearchResults {
    pub generation: u64,
    pub records: Vec<EvidenceRecord>,
    pub total: usize,
}

pub struct DashboardSession {
    store: Arc<dyn EvidenceStore>,
    verifier: IntegrityVerifier,
    user: Option<UserProfile>,
    snapshot: Arc<Vec<EvidenceRecord>>,
    filtered: Vec<EvidenceRecord>,
    last_query: Query,
    generation: u64,
}

impl DashboardSession {
    pub fn new(store: Arc<dyn EvidenceStore>, verifier: IntegrityVerifier) -> Self {
        Self {
            store,
            verifier,
            user: None,
            snapshot: Arc::new(Vec::new()),
            filtered: Vec::new(),
            last_query: Query::default(),
            generation: 0,
        }
    }

    /// Open a session for `account` and load the collection
    pub async fn open(
        store: Arc<dyn EvidenceStore>,
        verifier: IntegrityVerifier,
        account: &str,
    ) -> Result<Self, EvidenceError> {
        let mut session = Self::new(store, verifier);
        session.user = session.store.get_user(account).await?;
        session.reload().await?;
        Ok(session)
    }

    /// Replace the snapshot with a fresh copy of the store's collection and
    /// show it unfiltered. On failure the previous snapshot is kept.
    pub async fn reload(&mut self) -> Result<u64, EvidenceError> {
        let records = self.store.get_all_evidence().await.map_err(|e| {
            error!("Error loading evidence: {}", e);
            e
        })?;

        self.snapshot = Arc::new(records);
        self.filtered = self.snapshot.as_ref().clone();
        self.last_query = Query::default();
        self.generation += 1;

        info!(
            "Loaded {} evidence items (generation {})",
            self.snapshot.len(),
            self.generation
        );
        Ok(self.generation)
    }

    pub fn search(&mut self, q: Query) -> SearchResults {
        self.generation += 1;
        self.filtered = query(&self.snapshot, &q);
        self.last_query = q;

        SearchResults {
            generation: self.generation,
            records: self.filtered.clone(),
            total: self.snapshot.len(),
        }
    }

    /// Reset every filter and sort back to the defaults and search again
    pub fn clear_filters(&mut self) -> SearchResults {
        self.search(Query::default())
    }

    /// True if `generation` is still the latest result set
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshot(&self) -> Arc<Vec<EvidenceRecord>> {
        Arc::clone(&self.snapshot)
    }

    pub fn filtered(&self) -> &[EvidenceRecord] {
        &self.filtered
    }

    pub fn last_query(&self) -> &Query {
        &self.last_query
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn total_count(&self) -> usize {
        self.snapshot.len()
    }

    pub fn results_summary(&self) -> String {
        results_summary(self.filtered.len(), self.snapshot.len())
    }

    /// Fetch a single record fresh from the store
    pub async fn evidence(&self, id: EvidenceId) -> Result<EvidenceRecord, EvidenceError> {
        self.store
            .get_evidence(id)
            .await?
            .ok_or(EvidenceError::NotFound(id))
    }

    /// Re-read a record from the store and write out its original file
    pub async fn download(
        &self,
        id: EvidenceId,
        out: Option<&Path>,
    ) -> Result<PathBuf, EvidenceError> {
        let record = self.evidence(id).await?;
        write_original(&record, out)
    }

    /// Re-read a record from the store and check its digest
    pub async fn verify_integrity(&self, id: EvidenceId) -> Result<IntegrityReport, EvidenceError> {
        let record = self.evidence(id).await?;
        self.verifier.verify_record(&record).await
    }
}
