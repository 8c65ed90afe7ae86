//! Trip-revenue records and the immutable store that holds them.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Fixed set of survey time slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeSlot {
    #[serde(rename = "07:00-10:00")]
    Morning,
    #[serde(rename = "10:00-16:00")]
    Midday,
    #[serde(rename = "16:00-20:00")]
    Evening,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 3] = [TimeSlot::Morning, TimeSlot::Midday, TimeSlot::Evening];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::Morning => "07:00-10:00",
            TimeSlot::Midday => "10:00-16:00",
            TimeSlot::Evening => "16:00-20:00",
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeSlot {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeSlot::ALL
            .into_iter()
            .find(|slot| slot.as_str() == s.trim())
            .ok_or_else(|| anyhow::anyhow!("unknown time slot '{}'", s))
    }
}

/// Bus line identifier. The domain is discovered from the data at load time.
///
/// The backend sends line numbers as JSON integers; strings are accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BusLine(String);

impl BusLine {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Label used by filter options and the PDF header.
    pub fn label(&self) -> String {
        format!("Bus Line {}", self.0)
    }
}

impl fmt::Display for BusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BusLine {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl Serialize for BusLine {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for BusLine {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawLine {
            Int(i64),
            Text(String),
        }

        Ok(match RawLine::deserialize(deserializer)? {
            RawLine::Int(n) => BusLine(n.to_string()),
            RawLine::Text(s) => BusLine(s),
        })
    }
}

/// One aggregated trip-revenue observation row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub time_slot: TimeSlot,
    pub bus_line: BusLine,
    pub age_group: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(deserialize_with = "trip_count")]
    pub total_trips: u64,
    pub total_yield: f64,
    pub total_revenue: f64,
    pub avg_yield_per_trip: f64,
    pub avg_yield_per_km: f64,
    pub avg_yield_per_vehicle: f64,
}

/// Trip counts arrive as integers or, from summed dataframe columns, as
/// integral floats (`5.0`). Fractional or negative counts are rejected.
fn trip_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCount {
        Int(u64),
        Float(f64),
    }

    match RawCount::deserialize(deserializer)? {
        RawCount::Int(n) => Ok(n),
        RawCount::Float(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => {
            Ok(f as u64)
        }
        RawCount::Float(f) => Err(serde::de::Error::custom(format!("invalid trip count {}", f))),
    }
}

/// Base dataset. Written once by the load step, read by every derivation.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Store for the state before the fetch resolves (or after it failed).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct bus lines in first-occurrence order.
    pub fn bus_lines(&self) -> Vec<BusLine> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|r| seen.insert(&r.bus_line))
            .map(|r| r.bus_line.clone())
            .collect()
    }

    /// Distinct age groups in first-occurrence order.
    pub fn age_groups(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|r| seen.insert(r.age_group.as_str()))
            .map(|r| r.age_group.clone())
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(
        slot: TimeSlot,
        line: &str,
        age: &str,
        revenue: f64,
        trips: u64,
    ) -> Record {
        Record {
            time_slot: slot,
            bus_line: BusLine::new(line),
            age_group: age.to_string(),
            gender: None,
            total_trips: trips,
            total_yield: revenue * 0.8,
            total_revenue: revenue,
            avg_yield_per_trip: revenue * 0.8 / trips.max(1) as f64,
            avg_yield_per_km: 0.5,
            avg_yield_per_vehicle: 12.0,
        }
    }

    #[test]
    fn test_record_deserializes_integer_bus_line() {
        let json = r#"{
            "time_slot": "07:00-10:00",
            "bus_line": 12,
            "age_group": "18-25",
            "total_trips": 5,
            "total_yield": 80.0,
            "total_revenue": 100.0,
            "avg_yield_per_trip": 16.0,
            "avg_yield_per_km": 0.004,
            "avg_yield_per_vehicle": 2.5
        }"#;

        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.bus_line, BusLine::new("12"));
        assert_eq!(record.time_slot, TimeSlot::Morning);
        assert_eq!(record.gender, None);
    }

    #[test]
    fn test_trip_count_accepts_integral_float() {
        let json = |trips: &str| {
            format!(
                r#"{{"time_slot": "10:00-16:00", "bus_line": "4", "age_group": "65+",
                    "total_trips": {}, "total_yield": 1.0, "total_revenue": 1.0,
                    "avg_yield_per_trip": 1.0, "avg_yield_per_km": 1.0,
                    "avg_yield_per_vehicle": 1.0}}"#,
                trips
            )
        };

        let record: Record = serde_json::from_str(&json("5.0")).unwrap();
        assert_eq!(record.total_trips, 5);
        let record: Record = serde_json::from_str(&json("7")).unwrap();
        assert_eq!(record.total_trips, 7);

        assert!(serde_json::from_str::<Record>(&json("2.5")).is_err());
        assert!(serde_json::from_str::<Record>(&json("-1.0")).is_err());
        assert!(serde_json::from_str::<Record>(&json("\"3\"")).is_err());
    }

    #[test]
    fn test_unknown_time_slot_is_rejected() {
        assert!("06:00-07:00".parse::<TimeSlot>().is_err());
        assert_eq!("16:00-20:00".parse::<TimeSlot>().unwrap(), TimeSlot::Evening);
    }

    #[test]
    fn test_store_discovers_lines_in_first_seen_order() {
        let store = RecordStore::new(vec![
            record(TimeSlot::Morning, "7", "18-25", 10.0, 1),
            record(TimeSlot::Midday, "3", "26-35", 10.0, 1),
            record(TimeSlot::Evening, "7", "18-25", 10.0, 1),
        ]);

        assert_eq!(store.bus_lines(), vec![BusLine::new("7"), BusLine::new("3")]);
        assert_eq!(store.age_groups(), vec!["18-25", "26-35"]);
        assert_eq!(BusLine::new("7").label(), "Bus Line 7");
    }
}
