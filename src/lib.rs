pub mod config;
pub mod dashboard;
pub mod error;
pub mod evidence;
pub mod export;
pub mod integrity;
pub mod presentation;
pub mod query;
pub mod store;
pub mod upload;

pub use error::EvidenceError;
pub use evidence::{EvidenceId, EvidenceRecord, EvidenceStatus};
pub use integrity::{IntegrityVerifier, Verification};
pub use query::{query, Query};
pub use store::EvidenceStore;
