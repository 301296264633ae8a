//! Time and date helpers shared by the ledger and the rating aggregator

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};

use crate::error::DomainError;

/// Naive layouts accepted in addition to RFC 3339. Naive values are UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO-8601 timestamp.
///
/// An explicit offset is kept as written so the calendar date the guest chose
/// survives; a timestamp without an offset is taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, DomainError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DomainError::InvalidArgument(
            "timestamp is required".to_string(),
        ));
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed);
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc().fixed_offset())
        .ok_or_else(|| {
            DomainError::InvalidArgument(format!("unparsable ISO-8601 timestamp: {}", raw))
        })
}

/// Parse a calendar date (`YYYY-MM-DD`)
pub fn parse_date(raw: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| DomainError::InvalidArgument(format!("unparsable date: {}", raw)))
}

/// Calendar date a booking occupies
pub fn slot_date(requested_time: &DateTime<FixedOffset>) -> NaiveDate {
    requested_time.date_naive()
}

/// Reject times that are not strictly after `now`
pub fn ensure_future(
    requested_time: &DateTime<FixedOffset>,
    now: DateTime<Utc>,
) -> Result<(), DomainError> {
    if requested_time.with_timezone(&Utc) <= now {
        return Err(DomainError::InvalidArgument(format!(
            "requested time {} is not in the future",
            requested_time.to_rfc3339()
        )));
    }
    Ok(())
}

/// Inclusive range of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateRange {
    /// Build a range spanning at most `max_days` days
    pub fn new(from: NaiveDate, to: NaiveDate, max_days: u32) -> Result<Self, DomainError> {
        if to < from {
            return Err(DomainError::InvalidArgument(format!(
                "date range is reversed: {} > {}",
                from, to
            )));
        }
        let range = Self { from, to };
        if range.len_days() > i64::from(max_days) {
            return Err(DomainError::InvalidArgument(format!(
                "date range spans {} days, at most {} allowed",
                range.len_days(),
                max_days
            )));
        }
        Ok(range)
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    pub fn len_days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let to = self.to;
        self.from.iter_days().take_while(move |day| *day <= to)
    }
}
