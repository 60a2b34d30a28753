//! Time window resolution for dashboard queries
//!
//! A request either names no `start_date` (live mode: today, midnight
//! through now) or an explicit range. Range bounds combine a date with
//! an optional clock time, defaulting to 00:00 for the start and 23:59
//! for the end. A reversed range is legal input and simply yields
//! empty aggregates downstream.

use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

/// Format for a combined range bound, e.g. "2025-08-08 13:30"
pub const BOUND_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Format of the people record's calendar-date keys
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Raw query parameters as they arrive from the transport layer
#[derive(Debug, Clone, Default)]
pub struct WindowParams {
    pub start_date: Option<String>,
    pub start_time: Option<String>,
    pub end_date: Option<String>,
    pub end_time: Option<String>,
}

/// Resolved request window
#[derive(Debug, Clone, PartialEq)]
pub enum TimeWindow {
    /// No explicit range: today's data only. People filtering matches
    /// today's date key by string equality; vehicle counting takes the
    /// whole event list.
    Live,
    /// Explicit range with full-instant bounds
    Range { start: NaiveDateTime, end: NaiveDateTime },
}

/// Malformed date/time request parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterError {
    field: &'static str,
    value: String,
}

impl ParameterError {
    fn new(field: &'static str, value: impl Into<String>) -> Self {
        Self { field, value: value.into() }
    }
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {} parameter: {:?}", self.field, self.value)
    }
}

impl std::error::Error for ParameterError {}

impl TimeWindow {
    /// Resolve request parameters into a window
    ///
    /// Absent or empty `start_date` selects live mode and ignores the
    /// remaining parameters. Otherwise both dates must parse; clock
    /// times default to 00:00 / 23:59.
    pub fn resolve(params: &WindowParams) -> Result<Self, ParameterError> {
        let start_date = params.start_date.as_deref().unwrap_or("").trim();
        if start_date.is_empty() {
            return Ok(TimeWindow::Live);
        }

        let start_time = non_empty(params.start_time.as_deref()).unwrap_or("00:00");
        let start = parse_bound(start_date, start_time)
            .ok_or_else(|| ParameterError::new("start", format!("{start_date} {start_time}")))?;

        let end_date = non_empty(params.end_date.as_deref())
            .ok_or_else(|| ParameterError::new("end_date", ""))?;
        let end_time = non_empty(params.end_time.as_deref()).unwrap_or("23:59");
        let end = parse_bound(end_date, end_time)
            .ok_or_else(|| ParameterError::new("end", format!("{end_date} {end_time}")))?;

        Ok(TimeWindow::Range { start, end })
    }

    /// Calendar-date bounds for the people side, which filters at day
    /// granularity and ignores the clock-time components.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            TimeWindow::Live => None,
            TimeWindow::Range { start, end } => Some((start.date(), end.date())),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_bound(date: &str, time: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(&format!("{date} {time}"), BOUND_FORMAT).ok()
}
