//! Content integrity checks
//!
//! SHA-256 digests over evidence payloads, computed at submission and
//! recomputed on demand to detect tampering.

pub mod digest;
pub mod verify;

pub use digest::{sha256_hex, DigestProvider, Sha256Digest};
pub use verify::{DigestInput, IntegrityReport, IntegrityVerifier, Verification};
