//! Summary composition - the dashboard response record
//!
//! Combines people and vehicle aggregates into the one JSON object the
//! dashboard consumes. Composition itself never fails; upstream errors
//! surface before reaching it.

use crate::services::people::PeopleTotals;
use crate::services::vehicles::VehicleBreakdown;
use serde::Serialize;

/// Per-class vehicle counts in the response
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VehicleCounts {
    pub motorcycle: u64,
    pub car: u64,
    pub truck: u64,
    pub bus: u64,
    pub total: u64,
}

/// The dashboard response record, recomputed per request
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Summary {
    pub people_in: u64,
    pub people_out: u64,
    pub vehicle_counts: VehicleCounts,
    pub estimated_people_from_vehicles: u64,
    pub cumulative_total: u64,
    pub front_gate_vehicle_count: u64,
    /// "N/A" when the designated stream has no last_updated in scope
    pub stream_0_last_updated: String,
}

/// Assemble the response from the two aggregators' outputs
pub fn compose(people: PeopleTotals, vip: VehicleBreakdown, front_count: u64) -> Summary {
    Summary {
        people_in: people.people_in,
        people_out: people.people_out,
        vehicle_counts: VehicleCounts {
            motorcycle: vip.motorcycle,
            car: vip.car,
            truck: vip.truck,
            bus: vip.bus,
            total: vip.total,
        },
        estimated_people_from_vehicles: vip.estimated_people,
        cumulative_total: people.people_in + vip.estimated_people,
        front_gate_vehicle_count: front_count,
        stream_0_last_updated: people.last_updated.unwrap_or_else(|| "N/A".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cumulative_total_is_people_in_plus_estimate() {
        let people = PeopleTotals { people_in: 15, people_out: 4, last_updated: None };
        let vip = VehicleBreakdown {
            car: 2,
            bus: 1,
            total: 4,
            estimated_people: 28,
            ..Default::default()
        };

        let summary = compose(people, vip, 2);
        assert_eq!(summary.cumulative_total, 43);
        assert_eq!(
            summary.cumulative_total,
            summary.people_in + summary.estimated_people_from_vehicles
        );
    }

    #[test]
    fn test_missing_last_updated_reports_not_available() {
        let summary = compose(PeopleTotals::default(), VehicleBreakdown::default(), 0);
        assert_eq!(summary.stream_0_last_updated, "N/A");
    }

    #[test]
    fn test_response_field_names() {
        let people = PeopleTotals {
            people_in: 1,
            people_out: 2,
            last_updated: Some("2025-08-08 12:00:00".to_string()),
        };
        let summary = compose(people, VehicleBreakdown::default(), 3);
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["people_in"], 1);
        assert_eq!(json["people_out"], 2);
        assert_eq!(json["front_gate_vehicle_count"], 3);
        assert_eq!(json["stream_0_last_updated"], "2025-08-08 12:00:00");
        assert_eq!(json["vehicle_counts"]["total"], 0);
        assert_eq!(json["vehicle_counts"]["motorcycle"], 0);
        assert_eq!(json["estimated_people_from_vehicles"], 0);
        assert_eq!(json["cumulative_total"], 1);
    }
}
