//! Query-string types and parsing shared by several handlers.

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use myco_core::pagination::PageRequest;
use myco_core::types::Timestamp;
use serde::Deserialize;

use crate::error::AppError;

/// `?page=&limit=` pagination parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PaginationParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

/// Optional `?parent_id=` filter for taxonomy listings.
#[derive(Debug, Default, Deserialize)]
pub struct ParentFilter {
    pub parent_id: Option<i64>,
}

/// Which end of a date range a bound belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    End,
}

/// Parse a date filter value.
///
/// Accepts RFC 3339 timestamps as-is. A bare `YYYY-MM-DD` date expands to
/// the first instant of that day for a start bound and the last for an end
/// bound, so `end_date=2024-09-30` includes the whole day.
pub fn parse_date_bound(field: &str, raw: &str, bound: Bound) -> Result<Timestamp, AppError> {
    let raw = raw.trim();
    if let Ok(ts) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        AppError::BadRequest(format!(
            "{field} must be a date (YYYY-MM-DD) or RFC 3339 timestamp, got '{raw}'"
        ))
    })?;
    let time = match bound {
        Bound::Start => NaiveTime::MIN,
        Bound::End => NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN),
    };
    Ok(Utc.from_utc_datetime(&date.and_time(time)))
}
