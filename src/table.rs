//! Display rows for the paginated data table.

use crate::analyzers::utility::{fixed2, grouped};
use crate::record::Record;
use serde::Serialize;

/// Shown in place of the table when the filtered set is empty.
pub const EMPTY_TABLE_MESSAGE: &str = "No data available for the selected filters.";

pub const TABLE_HEADERS: [&str; 8] = [
    "Time Slot",
    "Bus Line",
    "Age Group",
    "Total Revenue",
    "Total Trips",
    "Avg Yield/Trip",
    "Avg Yield/KM",
    "Avg Yield/Vehicle",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub time_slot: String,
    pub bus_line: String,
    pub age_group: String,
    pub total_revenue: String,
    pub total_trips: String,
    pub avg_yield_per_trip: String,
    pub avg_yield_per_km: String,
    pub avg_yield_per_vehicle: String,
}

impl TableRow {
    pub fn from_record(record: &Record) -> Self {
        Self {
            time_slot: record.time_slot.to_string(),
            bus_line: record.bus_line.to_string(),
            age_group: record.age_group.clone(),
            total_revenue: format!("LEK {}", grouped(record.total_revenue)),
            total_trips: record.total_trips.to_string(),
            avg_yield_per_trip: format!("LEK {}", fixed2(record.avg_yield_per_trip)),
            avg_yield_per_km: format!("LEK {:.6}", record.avg_yield_per_km),
            avg_yield_per_vehicle: format!("LEK {}", fixed2(record.avg_yield_per_vehicle)),
        }
    }

    pub fn cells(&self) -> [&str; 8] {
        [
            &self.time_slot,
            &self.bus_line,
            &self.age_group,
            &self.total_revenue,
            &self.total_trips,
            &self.avg_yield_per_trip,
            &self.avg_yield_per_km,
            &self.avg_yield_per_vehicle,
        ]
    }
}

/// Formats a page of records.
pub fn rows(page: &[&Record]) -> Vec<TableRow> {
    page.iter().map(|r| TableRow::from_record(r)).collect()
}
