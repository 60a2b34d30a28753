//! Vehicle-event aggregation
//!
//! Vehicle events carry full timestamps, so filtered mode compares
//! complete instants. This is a deliberate asymmetry with the people
//! side, which only has per-day granularity.
//!
//! Key behaviors:
//! - Live mode counts the whole event list, no timestamp filtering
//! - Filtered mode includes an event iff start <= timestamp <= end;
//!   events with absent or unparsable timestamps are skipped silently
//! - Unrecognized classes count toward the source total but no named
//!   bucket, and contribute zero to the pedestrian estimate

use crate::domain::types::{ClassMultipliers, EventEntry, VehicleClass, VehicleRecord};
use crate::domain::window::TimeWindow;
use chrono::NaiveDateTime;

/// Timestamp format of stored vehicle events
pub const EVENT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Per-class breakdown for the primary (VIP) source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleBreakdown {
    pub motorcycle: u64,
    pub car: u64,
    pub truck: u64,
    pub bus: u64,
    /// All included events, recognized or not
    pub total: u64,
    /// Class-weighted pedestrian-equivalent estimate
    pub estimated_people: u64,
}

/// Count included events for a source without classifying them
///
/// Used for the front gate, which contributes only a raw count.
pub fn count_source(record: Option<&VehicleRecord>, window: &TimeWindow) -> u64 {
    match record {
        Some(record) => {
            record.data.iter().filter(|entry| included(entry, window)).count() as u64
        }
        None => 0,
    }
}

/// Classify included events and compute the pedestrian estimate
pub fn classify_source(
    record: Option<&VehicleRecord>,
    window: &TimeWindow,
    multipliers: &ClassMultipliers,
) -> VehicleBreakdown {
    let Some(record) = record else {
        return VehicleBreakdown::default();
    };

    let mut breakdown = VehicleBreakdown::default();
    for entry in &record.data {
        if !included(entry, window) {
            continue;
        }
        breakdown.total += 1;

        let class = entry
            .event()
            .and_then(|e| e.class.as_deref())
            .and_then(VehicleClass::parse);
        let Some(class) = class else {
            continue;
        };

        match class {
            VehicleClass::Motorcycle => breakdown.motorcycle += 1,
            VehicleClass::Car => breakdown.car += 1,
            VehicleClass::Truck => breakdown.truck += 1,
            VehicleClass::Bus => breakdown.bus += 1,
        }
        breakdown.estimated_people += multipliers.for_class(class);
    }

    breakdown
}

/// Window membership for a single stored entry
fn included(entry: &EventEntry, window: &TimeWindow) -> bool {
    let TimeWindow::Range { start, end } = window else {
        // Live mode: every stored event counts, whenever it occurred
        return true;
    };

    let Some(timestamp) = entry.event().and_then(|e| e.timestamp.as_deref()) else {
        return false;
    };
    match NaiveDateTime::parse_from_str(timestamp, EVENT_TIMESTAMP_FORMAT) {
        Ok(instant) => *start <= instant && instant <= *end,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::window::WindowParams;
    use serde_json::json;

    fn record(value: serde_json::Value) -> VehicleRecord {
        serde_json::from_value(value).unwrap()
    }

    fn filtered(start: &str, start_time: &str, end: &str, end_time: &str) -> TimeWindow {
        let params = WindowParams {
            start_date: Some(start.to_string()),
            start_time: Some(start_time.to_string()),
            end_date: Some(end.to_string()),
            end_time: Some(end_time.to_string()),
        };
        TimeWindow::resolve(&params).unwrap()
    }

    #[test]
    fn test_live_counts_entire_list() {
        let record = record(json!({
            "data": [
                { "Class": "Car", "Timestamp": "2020-01-01 00:00:00" },
                { "Class": "Bus" },
                "garbage"
            ]
        }));

        assert_eq!(count_source(Some(&record), &TimeWindow::Live), 3);
    }

    #[test]
    fn test_missing_record_counts_zero() {
        assert_eq!(count_source(None, &TimeWindow::Live), 0);
        let breakdown = classify_source(None, &TimeWindow::Live, &ClassMultipliers::default());
        assert_eq!(breakdown, VehicleBreakdown::default());
    }

    #[test]
    fn test_filtered_is_sensitive_to_time_of_day() {
        let record = record(json!({
            "data": [
                { "Class": "Car", "Timestamp": "2025-08-08 09:00:00" },
                { "Class": "Car", "Timestamp": "2025-08-08 18:00:00" }
            ]
        }));

        let morning = filtered("2025-08-08", "08:00", "2025-08-08", "12:00");
        assert_eq!(count_source(Some(&record), &morning), 1);

        let all_day = filtered("2025-08-08", "00:00", "2025-08-08", "23:59");
        assert_eq!(count_source(Some(&record), &all_day), 2);
    }

    #[test]
    fn test_filtered_bounds_inclusive() {
        let record = record(json!({
            "data": [
                { "Class": "Car", "Timestamp": "2025-08-08 09:00:00" },
                { "Class": "Car", "Timestamp": "2025-08-08 10:00:00" }
            ]
        }));

        let window = filtered("2025-08-08", "09:00", "2025-08-08", "10:00");
        assert_eq!(count_source(Some(&record), &window), 2);
    }

    #[test]
    fn test_filtered_skips_missing_and_malformed_timestamps() {
        let record = record(json!({
            "data": [
                { "Class": "Car" },
                { "Class": "Car", "Timestamp": "yesterday-ish" },
                { "Class": "Car", "Timestamp": 12345 },
                { "Class": "Car", "Timestamp": "2025-08-08 09:00:00" }
            ]
        }));

        let window = filtered("2025-08-08", "00:00", "2025-08-08", "23:59");
        assert_eq!(count_source(Some(&record), &window), 1);
    }

    #[test]
    fn test_reversed_window_counts_zero() {
        let record = record(json!({
            "data": [ { "Class": "Car", "Timestamp": "2025-08-08 09:00:00" } ]
        }));

        let window = filtered("2025-08-09", "00:00", "2025-08-08", "23:59");
        assert_eq!(count_source(Some(&record), &window), 0);
    }

    #[test]
    fn test_classify_weighted_estimate() {
        let record = record(json!({
            "data": [
                { "Class": "Car" },
                { "Class": "car" },
                { "Class": "Bus" },
                { "Class": "Golf Cart" }
            ]
        }));

        let breakdown =
            classify_source(Some(&record), &TimeWindow::Live, &ClassMultipliers::default());
        assert_eq!(breakdown.car, 2);
        assert_eq!(breakdown.bus, 1);
        assert_eq!(breakdown.motorcycle, 0);
        assert_eq!(breakdown.truck, 0);
        assert_eq!(breakdown.total, 4);
        // 4 + 4 + 20, golf cart contributes nothing
        assert_eq!(breakdown.estimated_people, 28);
    }

    #[test]
    fn test_unrecognized_class_counts_total_only() {
        let record = record(json!({
            "data": [ { "Class": "Rickshaw" }, {} ]
        }));

        let breakdown =
            classify_source(Some(&record), &TimeWindow::Live, &ClassMultipliers::default());
        assert_eq!(breakdown.total, 2);
        assert_eq!(breakdown.estimated_people, 0);
        assert_eq!(
            breakdown.motorcycle + breakdown.car + breakdown.truck + breakdown.bus,
            0
        );
    }

    #[test]
    fn test_custom_multipliers() {
        let record = record(json!({
            "data": [ { "Class": "Truck" }, { "Class": "Motorcycle" } ]
        }));
        let multipliers = ClassMultipliers { motorcycle: 1, car: 3, truck: 5, bus: 7 };

        let breakdown = classify_source(Some(&record), &TimeWindow::Live, &multipliers);
        assert_eq!(breakdown.estimated_people, 6);
    }

    #[test]
    fn test_classify_filtered_only_included_events() {
        let record = record(json!({
            "data": [
                { "Class": "Bus", "Timestamp": "2025-08-08 09:00:00" },
                { "Class": "Bus", "Timestamp": "2025-08-09 09:00:00" }
            ]
        }));

        let window = filtered("2025-08-08", "00:00", "2025-08-08", "23:59");
        let breakdown = classify_source(Some(&record), &window, &ClassMultipliers::default());
        assert_eq!(breakdown.bus, 1);
        assert_eq!(breakdown.total, 1);
        assert_eq!(breakdown.estimated_people, 20);
    }
}
