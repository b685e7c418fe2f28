//! Sort keys and ordering of query results

use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::evidence::{EvidenceRecord, FieldValue};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Case-insensitive title
    Title,
    #[default]
    Timestamp,
    /// Case-insensitive evidence type
    Type,
    /// Any other field, compared on its raw value
    Field(String),
}

impl SortKey {
    pub fn key_for(&self, record: &EvidenceRecord) -> FieldValue {
        match self {
            Self::Title => FieldValue::Text(record.title.to_lowercase()),
            Self::Timestamp => FieldValue::Time(record.timestamp),
            Self::Type => FieldValue::Text(record.evidence_type.to_lowercase()),
            Self::Field(name) => record.field_value(name),
        }
    }
}

impl FromStr for SortKey {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "" | "timestamp" => Self::Timestamp,
            "title" => Self::Title,
            "type" => Self::Type,
            other => Self::Field(other.to_string()),
        })
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title => f.write_str("title"),
            Self::Timestamp => f.write_str("timestamp"),
            Self::Type => f.write_str("type"),
            Self::Field(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = Infallible;

    /// Only `asc` is ascending; any other value sorts descending.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == "asc" { Self::Asc } else { Self::Desc })
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("asc"),
            Self::Desc => f.write_str("desc"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sort {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Order records by this key. Stable: equal keys keep their input order
    /// in both directions.
    pub fn apply(&self, records: Vec<EvidenceRecord>) -> Vec<EvidenceRecord> {
        let mut keyed: Vec<(FieldValue, EvidenceRecord)> = records
            .into_iter()
            .map(|record| (self.key.key_for(&record), record))
            .collect();

        keyed.sort_by(|a, b| self.direction.apply(a.0.cmp(&b.0)));

        keyed.into_iter().map(|(_, record)| record).collect()
    }
}
