//! Transport encoding of stored file payloads
//!
//! Payloads travel as `data:<mime>;base64,<payload>` URLs, the form the
//! upload form produced. Bare base64 is accepted as well.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::EvidenceError;

const DATA_URL_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64";

/// Transport-encoded file payload, kept exactly as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedContent(String);

impl EncodedContent {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encode raw file bytes as a base64 data URL
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        Self(format!(
            "{}{}{},{}",
            DATA_URL_PREFIX,
            mime_type,
            BASE64_MARKER,
            STANDARD.encode(bytes)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Media type declared in the data URL header, if any
    pub fn media_type(&self) -> Option<&str> {
        let header = self.0.strip_prefix(DATA_URL_PREFIX)?.split(',').next()?;
        let media_type = header.strip_suffix(BASE64_MARKER).unwrap_or(header);
        if media_type.is_empty() {
            None
        } else {
            Some(media_type)
        }
    }

    /// Decode the payload back to the original file bytes
    pub fn decode(&self) -> Result<Vec<u8>, EvidenceError> {
        let payload = match self.0.strip_prefix(DATA_URL_PREFIX) {
            Some(rest) => {
                let (header, payload) = rest.split_once(',').ok_or_else(|| {
                    EvidenceError::DecodeError("data URL has no payload separator".to_string())
                })?;
                if !header.ends_with(BASE64_MARKER) {
                    return Err(EvidenceError::DecodeError(format!(
                        "unsupported data URL encoding: {}",
                        header
                    )));
                }
                payload
            }
            None => self.0.as_str(),
        };

        STANDARD
            .decode(payload.trim())
            .map_err(|e| EvidenceError::DecodeError(format!("invalid base64 payload: {}", e)))
    }
}
