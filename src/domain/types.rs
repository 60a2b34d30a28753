//! Shared types for the occupancy dashboard
//!
//! These mirror the document shapes written by the external counting
//! producers. Producers are not trusted to write clean data, so
//! deserialization is lenient: a malformed stream entry or vehicle
//! event decodes into a placeholder instead of failing the whole
//! record.

use serde::de::{self, IgnoredAny, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

/// Vehicle detection source. VIP and front gate are independently
/// operated detectors with separate records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateSource {
    Vip,
    Front,
}

impl GateSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateSource::Vip => "vip",
            GateSource::Front => "front",
        }
    }
}

/// Fixed vehicle categories used for the class breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleClass {
    Motorcycle,
    Car,
    Truck,
    Bus,
}

impl VehicleClass {
    /// Case-insensitive parse; anything outside the fixed categories
    /// is unrecognized and contributes to no named bucket.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "motorcycle" => Some(VehicleClass::Motorcycle),
            "car" => Some(VehicleClass::Car),
            "truck" => Some(VehicleClass::Truck),
            "bus" => Some(VehicleClass::Bus),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleClass::Motorcycle => "motorcycle",
            VehicleClass::Car => "car",
            VehicleClass::Truck => "truck",
            VehicleClass::Bus => "bus",
        }
    }
}

/// Pedestrian-equivalent multipliers per vehicle class
///
/// Defaults are the documented estimates (motorcycle=2, car=4,
/// truck=10, bus=20); deployments may override them in config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassMultipliers {
    pub motorcycle: u64,
    pub car: u64,
    pub truck: u64,
    pub bus: u64,
}

impl Default for ClassMultipliers {
    fn default() -> Self {
        Self { motorcycle: 2, car: 4, truck: 10, bus: 20 }
    }
}

impl ClassMultipliers {
    pub fn for_class(&self, class: VehicleClass) -> u64 {
        match class {
            VehicleClass::Motorcycle => self.motorcycle,
            VehicleClass::Car => self.car,
            VehicleClass::Truck => self.truck,
            VehicleClass::Bus => self.bus,
        }
    }
}

/// Singleton people-counting document
///
/// `data` maps calendar-date strings ("YYYY-MM-DD") to per-stream
/// counts for that day.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PeopleRecord {
    #[serde(default)]
    pub data: HashMap<String, HashMap<String, StreamEntry>>,
}

/// One stream's entry under a date key. Producers occasionally write
/// garbage here; anything that is not a counts object is retained as
/// `Malformed` and skipped by the aggregator.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StreamEntry {
    Counts(StreamCounts),
    Malformed(IgnoredAny),
}

impl StreamEntry {
    pub fn counts(&self) -> Option<&StreamCounts> {
        match self {
            StreamEntry::Counts(c) => Some(c),
            StreamEntry::Malformed(_) => None,
        }
    }
}

/// In/out tallies for one stream on one day. Missing counts default
/// to zero.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamCounts {
    #[serde(default)]
    pub in_count: u64,
    #[serde(default)]
    pub out_count: u64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub last_updated: Option<String>,
}

/// Singleton vehicle-detection document for one gate source
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VehicleRecord {
    #[serde(default)]
    pub data: Vec<EventEntry>,
}

/// One element of a vehicle record's event list. Non-object entries
/// decode as `Malformed`; they still count toward the live-mode source
/// total (that total is the list length) but carry no class or
/// timestamp.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EventEntry {
    Event(VehicleEvent),
    Malformed(IgnoredAny),
}

impl EventEntry {
    pub fn event(&self) -> Option<&VehicleEvent> {
        match self {
            EventEntry::Event(e) => Some(e),
            EventEntry::Malformed(_) => None,
        }
    }
}

/// A single detection event. `Timestamp` is sometimes absent or
/// written as a non-string value; both decode as `None`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VehicleEvent {
    #[serde(rename = "Class", default, deserialize_with = "lenient_string")]
    pub class: Option<String>,
    #[serde(rename = "Timestamp", default, deserialize_with = "lenient_string")]
    pub timestamp: Option<String>,
}

/// Accept a string, treat any other value (int, null, nested object)
/// as absent rather than failing the record.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct LenientStringVisitor;

    impl<'de> Visitor<'de> for LenientStringVisitor {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string or any other value")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_bool<E>(self, _: bool) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_i64<E>(self, _: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_u64<E>(self, _: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_f64<E>(self, _: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: de::MapAccess<'de>,
        {
            while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
            Ok(None)
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            while seq.next_element::<IgnoredAny>()?.is_some() {}
            Ok(None)
        }
    }

    deserializer.deserialize_any(LenientStringVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_vehicle_class_parse_case_insensitive() {
        assert_eq!(VehicleClass::parse("Car"), Some(VehicleClass::Car));
        assert_eq!(VehicleClass::parse("BUS"), Some(VehicleClass::Bus));
        assert_eq!(VehicleClass::parse("motorcycle"), Some(VehicleClass::Motorcycle));
        assert_eq!(VehicleClass::parse("Golf Cart"), None);
        assert_eq!(VehicleClass::parse(""), None);
    }

    #[test]
    fn test_default_multipliers() {
        let m = ClassMultipliers::default();
        assert_eq!(m.for_class(VehicleClass::Motorcycle), 2);
        assert_eq!(m.for_class(VehicleClass::Car), 4);
        assert_eq!(m.for_class(VehicleClass::Truck), 10);
        assert_eq!(m.for_class(VehicleClass::Bus), 20);
    }

    #[test]
    fn test_people_record_missing_counts_default_zero() {
        let record: PeopleRecord = serde_json::from_value(json!({
            "data": { "2025-08-08": { "stream_0": { "in_count": 7 } } }
        }))
        .unwrap();

        let counts = record.data["2025-08-08"]["stream_0"].counts().unwrap();
        assert_eq!(counts.in_count, 7);
        assert_eq!(counts.out_count, 0);
        assert!(counts.last_updated.is_none());
    }

    #[test]
    fn test_people_record_malformed_stream_entry_retained() {
        let record: PeopleRecord = serde_json::from_value(json!({
            "data": { "2025-08-08": { "stream_0": "not an object" } }
        }))
        .unwrap();

        assert!(record.data["2025-08-08"]["stream_0"].counts().is_none());
    }

    #[test]
    fn test_vehicle_event_non_string_timestamp_decodes_as_none() {
        let record: VehicleRecord = serde_json::from_value(json!({
            "data": [
                { "Class": "Car", "Timestamp": 1723111200 },
                { "Class": "Bus", "Timestamp": "2025-08-08 10:00:00" },
                { "Class": "Truck" },
                "garbage"
            ]
        }))
        .unwrap();

        assert_eq!(record.data.len(), 4);
        assert!(record.data[0].event().unwrap().timestamp.is_none());
        assert_eq!(
            record.data[1].event().unwrap().timestamp.as_deref(),
            Some("2025-08-08 10:00:00")
        );
        assert!(record.data[2].event().unwrap().timestamp.is_none());
        assert!(record.data[3].event().is_none());
    }

    #[test]
    fn test_empty_documents_decode() {
        let people: PeopleRecord = serde_json::from_value(json!({})).unwrap();
        assert!(people.data.is_empty());

        let vehicles: VehicleRecord = serde_json::from_value(json!({})).unwrap();
        assert!(vehicles.data.is_empty());
    }
}
