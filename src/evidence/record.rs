//! Evidence Record
//!
//! Canonical shape of a stored evidence item. Records written by older
//! front-ends use snake_case keys and `hash`/`fileData` names; all of those
//! are folded into this one shape when the record is deserialised.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::EvidenceError;
use crate::evidence::content::EncodedContent;

pub type EvidenceId = u64;

/// Review status of an evidence item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceStatus {
    Pending,
    Approved,
    Rejected,
    UnderReview,
    /// Missing or unrecognised status in the stored record
    #[default]
    #[serde(other)]
    Unknown,
}

impl EvidenceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::UnderReview => "under_review",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for EvidenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvidenceStatus {
    type Err = EvidenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "under_review" => Ok(Self::UnderReview),
            other => Err(EvidenceError::unknown_status(other)),
        }
    }
}

/// One submitted evidence item, read-only to this crate
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceRecord {
    pub id: EvidenceId,
    pub case_id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub evidence_type: String,
    pub file_name: String,
    pub file_size: u64,
    pub mime_type: String,
    pub content: Option<EncodedContent>,
    pub digest: String,
    pub status: EvidenceStatus,
    pub submitted_by: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission_ip: Option<String>,
}

impl EvidenceRecord {
    /// Lowercased haystack for free-text search: title, description, case id, file name
    pub fn search_text(&self) -> String {
        [
            self.title.as_str(),
            self.description.as_str(),
            self.case_id.as_str(),
            self.file_name.as_str(),
        ]
        .join(" ")
        .to_lowercase()
    }

    /// Raw value of a field looked up by its wire name, for ad-hoc sort keys.
    /// Unknown names yield empty text.
    pub fn field_value(&self, name: &str) -> FieldValue {
        match name {
            "id" => FieldValue::Number(self.id),
            "caseId" | "case_id" => FieldValue::Text(self.case_id.clone()),
            "title" => FieldValue::Text(self.title.clone()),
            "description" => FieldValue::Text(self.description.clone()),
            "type" => FieldValue::Text(self.evidence_type.clone()),
            "fileName" | "file_name" => FieldValue::Text(self.file_name.clone()),
            "fileSize" | "file_size" => FieldValue::Number(self.file_size),
            "mimeType" | "mime_type" => FieldValue::Text(self.mime_type.clone()),
            "digest" | "hash" => FieldValue::Text(self.digest.clone()),
            "status" => FieldValue::Text(self.status.as_str().to_string()),
            "submittedBy" | "submitted_by" => FieldValue::Text(self.submitted_by.clone()),
            "timestamp" => FieldValue::Time(self.timestamp),
            "submissionIp" | "submission_ip" => {
                FieldValue::Text(self.submission_ip.clone().unwrap_or_default())
            }
            _ => FieldValue::Text(String::new()),
        }
    }
}

impl Default for EvidenceRecord {
    fn default() -> Self {
        Self {
            id: 0,
            case_id: String::new(),
            title: String::new(),
            description: String::new(),
            evidence_type: String::new(),
            file_name: String::new(),
            file_size: 0,
            mime_type: String::new(),
            content: None,
            digest: String::new(),
            status: EvidenceStatus::Unknown,
            submitted_by: String::new(),
            timestamp: unix_epoch(),
            submission_ip: None,
        }
    }
}

/// A field's raw value. A given field always produces the same variant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldValue {
    Number(u64),
    Time(DateTime<Utc>),
    Text(String),
}

/// A submission handed to the store; the store assigns id, status and timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvidence {
    pub case_id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub evidence_type: String,
    pub file_name: String,
    pub file_size: u64,
    pub mime_type: String,
    pub content: EncodedContent,
    pub digest: String,
    pub submitted_by: String,
}

impl NewEvidence {
    pub fn into_record(self, id: EvidenceId, timestamp: DateTime<Utc>) -> EvidenceRecord {
        EvidenceRecord {
            id,
            case_id: self.case_id,
            title: self.title,
            description: self.description,
            evidence_type: self.evidence_type,
            file_name: self.file_name,
            file_size: self.file_size,
            mime_type: self.mime_type,
            content: Some(self.content),
            digest: self.digest,
            status: EvidenceStatus::Pending,
            submitted_by: self.submitted_by,
            timestamp,
            submission_ip: None,
        }
    }
}

pub fn unix_epoch() -> DateTime<Utc> {
    DateTime::<Utc>::from(std::time::UNIX_EPOCH)
}

/// Parse the timestamp spellings found in stored records.
///
/// Accepts RFC 3339, naive date-times (taken as UTC) and bare dates
/// (midnight UTC).
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Records are read field by field from a loose JSON object so that one
/// bad or duplicated key never costs the whole record. Each field takes the
/// first spelling that holds a usable value, canonical name first; values of
/// the wrong type count as absent.
impl<'de> Deserialize<'de> for EvidenceRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fields = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self::from_fields(&fields))
    }
}

impl EvidenceRecord {
    fn from_fields(fields: &Map<String, Value>) -> Self {
        let text = |names: &[&str]| first(fields, names, as_text).unwrap_or_default();
        let number = |names: &[&str]| first(fields, names, Value::as_u64).unwrap_or_default();

        Self {
            id: number(&["id"]),
            case_id: text(&["caseId", "case_id"]),
            title: text(&["title"]),
            description: text(&["description"]),
            evidence_type: text(&["type"]),
            file_name: text(&["fileName", "file_name"]),
            file_size: number(&["fileSize", "file_size"]),
            mime_type: text(&["mimeType", "mime_type"]),
            content: first(fields, &["content", "fileData", "file_data"], as_text)
                .map(EncodedContent::new),
            digest: text(&["digest", "hash"]),
            status: first(fields, &["status"], |v| v.as_str().map(str::to_string))
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            submitted_by: text(&["submittedBy", "submitted_by"]),
            timestamp: first(fields, &["timestamp"], as_timestamp).unwrap_or_else(unix_epoch),
            submission_ip: first(fields, &["submissionIp", "submission_ip"], as_text),
        }
    }
}

fn first<T>(
    fields: &Map<String, Value>,
    names: &[&str],
    convert: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    names
        .iter()
        .filter_map(|name| fields.get(*name))
        .find_map(convert)
}

fn as_text(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

/// Epoch milliseconds (integral or fractional) or any `parse_timestamp` spelling
fn as_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|ms| ms as i64))
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        Value::String(text) => parse_timestamp(text),
        _ => None,
    }
}
