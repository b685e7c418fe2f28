//! Evidence data model
//!
//! Records, submissions, transport-encoded payloads and the accounts that
//! submit them.

pub mod content;
pub mod record;
pub mod user;

pub use content::EncodedContent;
pub use record::{
    parse_timestamp, EvidenceId, EvidenceRecord, EvidenceStatus, FieldValue, NewEvidence,
};
pub use user::{Role, UserProfile};
