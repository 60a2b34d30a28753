//! People-count aggregation
//!
//! Sums per-stream in/out tallies over the resolved window. People
//! counts are aggregated per calendar day at the source, so filtered
//! mode compares dates only and ignores the clock-time components of
//! the window bounds. Live mode matches today's date key by string
//! equality.
//!
//! Key behaviors:
//! - Absent date key in live mode means all totals are zero
//! - Date keys that do not parse as YYYY-MM-DD are skipped, not errors
//! - Malformed stream entries contribute nothing
//! - The designated stream's last_updated comes from the most recent
//!   in-scope day that carries it

use crate::domain::types::PeopleRecord;
use crate::domain::window::{TimeWindow, DATE_KEY_FORMAT};
use chrono::NaiveDate;

/// Aggregated people totals for one request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeopleTotals {
    pub people_in: u64,
    pub people_out: u64,
    /// last_updated of the designated stream, if present in scope
    pub last_updated: Option<String>,
}

/// Sum stream counts over the days selected by the window
///
/// `today` is passed in rather than read from the clock so callers and
/// tests control what "live" means.
pub fn aggregate_people(
    record: Option<&PeopleRecord>,
    window: &TimeWindow,
    today: NaiveDate,
    designated_stream: &str,
) -> PeopleTotals {
    let Some(record) = record else {
        return PeopleTotals::default();
    };

    let mut totals = PeopleTotals::default();
    let mut last_updated_day: Option<NaiveDate> = None;

    for (date_key, streams) in &record.data {
        let Ok(date) = NaiveDate::parse_from_str(date_key, DATE_KEY_FORMAT) else {
            // Producer wrote a key that is not a calendar date; skip it
            continue;
        };

        let in_scope = match window.date_bounds() {
            None => date == today,
            Some((lo, hi)) => lo <= date && date <= hi,
        };
        if !in_scope {
            continue;
        }

        for entry in streams.values() {
            if let Some(counts) = entry.counts() {
                totals.people_in += counts.in_count;
                totals.people_out += counts.out_count;
            }
        }

        if let Some(counts) = streams.get(designated_stream).and_then(|e| e.counts()) {
            if counts.last_updated.is_some() && last_updated_day.map_or(true, |d| date > d) {
                totals.last_updated = counts.last_updated.clone();
                last_updated_day = Some(date);
            }
        }
    }

    totals
}
