//! Record filters: free-text term, status, type and date range

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::evidence::{EvidenceRecord, EvidenceStatus};

/// Inclusive calendar-day range in UTC.
///
/// `from` starts at 00:00:00 and `to` ends at 23:59:59 of the given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn lower_bound(&self) -> Option<DateTime<Utc>> {
        self.from
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Utc.from_utc_datetime(&naive))
    }

    pub fn upper_bound(&self) -> Option<DateTime<Utc>> {
        self.to
            .and_then(|date| date.and_hms_opt(23, 59, 59))
            .map(|naive| Utc.from_utc_datetime(&naive))
    }

    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        if let Some(lower) = self.lower_bound() {
            if *timestamp < lower {
                return false;
            }
        }
        if let Some(upper) = self.upper_bound() {
            if *timestamp > upper {
                return false;
            }
        }
        true
    }
}

/// The filtering half of a query. A record is kept only if every set criterion holds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Filter {
    /// Free-text term; empty matches everything
    pub term: String,
    pub status: Option<EvidenceStatus>,
    pub evidence_type: Option<String>,
    pub date_range: DateRange,
}

impl Filter {
    pub fn is_empty(&self) -> bool {
        self.term.is_empty()
            && self.status.is_none()
            && self.evidence_type.is_none()
            && self.date_range.is_unbounded()
    }

    pub fn matches(&self, record: &EvidenceRecord) -> bool {
        self.matches_term(record)
            && self.status.map_or(true, |status| record.status == status)
            && self
                .evidence_type
                .as_deref()
                .map_or(true, |wanted| record.evidence_type == wanted)
            && self.date_range.contains(&record.timestamp)
    }

    fn matches_term(&self, record: &EvidenceRecord) -> bool {
        if self.term.is_empty() {
            return true;
        }
        record.search_text().contains(&self.term.to_lowercase())
    }
}
