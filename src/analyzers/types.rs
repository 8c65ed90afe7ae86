//! Aggregate views derived from the filtered set.

use crate::analyzers::utility::{fixed2, grouped, pct};
use crate::record::{BusLine, TimeSlot};
use serde::Serialize;

/// Scalar totals over the filtered set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub record_count: usize,
    pub total_trips: u64,
    pub total_yield: f64,
    pub total_revenue: f64,
    /// Mean of `avg_yield_per_trip` over the records; 0 for an empty set.
    pub avg_yield: f64,
}

/// Summary values formatted for the metric cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryDisplay {
    pub total_trips: String,
    pub total_yield: String,
    pub total_revenue: String,
    pub avg_yield: String,
}

impl Summary {
    pub fn display(&self) -> SummaryDisplay {
        SummaryDisplay {
            total_trips: grouped(self.total_trips as f64),
            total_yield: fixed2(self.total_yield),
            total_revenue: grouped(self.total_revenue),
            avg_yield: fixed2(self.avg_yield),
        }
    }
}

/// Summed yield for one bus line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarEntry {
    pub bus_line: BusLine,
    pub total_yield: f64,
}

/// Yield per bus line, in first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BarSeries {
    pub entries: Vec<BarEntry>,
}

impl BarSeries {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.total_yield).sum()
    }
}

/// One category share of a pie.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieEntry {
    pub category: String,
    pub value: f64,
}

/// Categorical distribution, in first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PieSeries {
    pub entries: Vec<PieEntry>,
}

impl PieSeries {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.value).sum()
    }

    /// Percentage of entry `index` within this series.
    ///
    /// The denominator is the sum of the current (filtered) series, not the
    /// unfiltered dataset, so the shares describe the distribution within the
    /// active filters and always add up to 100. Computed on every call.
    pub fn percentage(&self, index: usize) -> Option<f64> {
        self.entries
            .get(index)
            .map(|entry| pct(entry.value, self.total()))
    }
}

/// Revenue and trips for one time slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendEntry {
    pub time_slot: TimeSlot,
    pub total_revenue: f64,
    pub total_trips: u64,
}

/// Per-time-slot trend, in first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TrendSeries {
    pub entries: Vec<TrendEntry>,
}

impl TrendSeries {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_trips(&self) -> u64 {
        self.entries.iter().map(|e| e.total_trips).sum()
    }
}

/// All four aggregate views, derived together from one filtered set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregates {
    pub summary: Summary,
    pub bars: BarSeries,
    pub pie: PieSeries,
    pub trend: TrendSeries,
}
