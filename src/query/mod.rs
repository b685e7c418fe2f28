//! Evidence Query Engine
//!
//! Narrows and orders a snapshot of evidence records. Queries are pure: the
//! input collection is never modified, and running a query over its own
//! output returns the same output.

pub mod filter;
pub mod sort;

use chrono::NaiveDate;
use tracing::debug;

use crate::error::EvidenceError;
use crate::evidence::{EvidenceRecord, EvidenceStatus};

pub use filter::{DateRange, Filter};
pub use sort::{Sort, SortDirection, SortKey};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query {
    pub filter: Filter,
    pub sort: Sort,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn term(mut self, term: impl Into<String>) -> Self {
        self.filter.term = term.into();
        self
    }

    pub fn status(mut self, status: EvidenceStatus) -> Self {
        self.filter.status = Some(status);
        self
    }

    pub fn evidence_type(mut self, evidence_type: impl Into<String>) -> Self {
        self.filter.evidence_type = Some(evidence_type.into());
        self
    }

    pub fn date_from(mut self, from: NaiveDate) -> Self {
        self.filter.date_range.from = Some(from);
        self
    }

    pub fn date_to(mut self, to: NaiveDate) -> Self {
        self.filter.date_range.to = Some(to);
        self
    }

    pub fn sorted_by(mut self, key: SortKey, direction: SortDirection) -> Self {
        self.sort = Sort::new(key, direction);
        self
    }

    /// Build a query from raw form values. Empty strings mean "unset".
    pub fn from_params(params: &QueryParams) -> Result<Self, EvidenceError> {
        let status = non_empty(&params.status)
            .map(str::parse::<EvidenceStatus>)
            .transpose()?;
        let date_from = non_empty(&params.date_from).map(parse_date).transpose()?;
        let date_to = non_empty(&params.date_to).map(parse_date).transpose()?;

        let key = params.sort_by.parse::<SortKey>().unwrap_or_default();
        let direction = params.sort_order.parse::<SortDirection>().unwrap_or_default();

        Ok(Self {
            filter: Filter {
                term: params.term.clone(),
                status,
                evidence_type: non_empty(&params.evidence_type).map(str::to_string),
                date_range: DateRange::new(date_from, date_to),
            },
            sort: Sort::new(key, direction),
        })
    }
}

/// Raw search form values as typed by the user
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryParams {
    pub term: String,
    pub status: String,
    pub evidence_type: String,
    pub date_from: String,
    pub date_to: String,
    pub sort_by: String,
    pub sort_order: String,
}

/// Run a query over a snapshot and return the matching records in order
pub fn query(records: &[EvidenceRecord], q: &Query) -> Vec<EvidenceRecord> {
    let retained: Vec<EvidenceRecord> = records
        .iter()
        .filter(|record| q.filter.matches(record))
        .cloned()
        .collect();

    debug!(
        "Query retained {} of {} records, sorting by {} {}",
        retained.len(),
        records.len(),
        q.sort.key,
        q.sort.direction
    );

    q.sort.apply(retained)
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, EvidenceError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| {
        EvidenceError::ValidationError(format!("Invalid date {}: expected YYYY-MM-DD ({})", value, e))
    })
}
