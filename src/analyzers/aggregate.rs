use crate::analyzers::group::OrderedGroups;
use crate::analyzers::types::{
    Aggregates, BarEntry, BarSeries, PieEntry, PieSeries, Summary, TrendEntry, TrendSeries,
};
use crate::analyzers::utility::mean;
use crate::record::{BusLine, Record, TimeSlot};
use tracing::debug;

/// Label for records that carry no gender.
pub const UNSPECIFIED_GENDER: &str = "Unspecified";

/// Computes every aggregate view for a filtered set.
pub fn aggregate(records: &[&Record]) -> Aggregates {
    let aggregates = Aggregates {
        summary: summarize(records),
        bars: bar_series(records),
        pie: pie_series(records),
        trend: trend_series(records),
    };

    debug!(
        records = records.len(),
        bus_lines = aggregates.bars.entries.len(),
        age_groups = aggregates.pie.entries.len(),
        time_slots = aggregates.trend.entries.len(),
        "Aggregates recomputed"
    );

    aggregates
}

/// Reduces the filtered set to scalar totals.
///
/// `avg_yield` is the mean of the upstream per-trip averages and is 0 for an
/// empty set.
pub fn summarize(records: &[&Record]) -> Summary {
    let mut total_trips = 0u64;
    let mut total_yield = 0.0;
    let mut total_revenue = 0.0;

    for row in records {
        total_trips += row.total_trips;
        total_yield += row.total_yield;
        total_revenue += row.total_revenue;
    }

    Summary {
        record_count: records.len(),
        total_trips,
        total_yield,
        total_revenue,
        avg_yield: mean(records.iter().map(|r| r.avg_yield_per_trip)),
    }
}

/// Sums `total_yield` per bus line.
pub fn bar_series(records: &[&Record]) -> BarSeries {
    let mut groups: OrderedGroups<&BusLine, f64> = OrderedGroups::new();
    for row in records {
        *groups.entry(&row.bus_line) += row.total_yield;
    }

    BarSeries {
        entries: groups
            .into_vec()
            .into_iter()
            .map(|(line, total_yield)| BarEntry {
                bus_line: line.clone(),
                total_yield,
            })
            .collect(),
    }
}

/// Sums `total_revenue` per age group.
pub fn pie_series(records: &[&Record]) -> PieSeries {
    categorical(records, |r| r.age_group.as_str(), |r| r.total_revenue)
}

/// Sums `total_yield` per gender.
pub fn gender_series(records: &[&Record]) -> PieSeries {
    categorical(
        records,
        |r| r.gender.as_deref().unwrap_or(UNSPECIFIED_GENDER),
        |r| r.total_yield,
    )
}

fn categorical<'a>(
    records: &[&'a Record],
    key: impl Fn(&'a Record) -> &'a str,
    value: impl Fn(&Record) -> f64,
) -> PieSeries {
    let mut groups: OrderedGroups<&str, f64> = OrderedGroups::new();
    for &row in records {
        *groups.entry(key(row)) += value(row);
    }

    PieSeries {
        entries: groups
            .into_vec()
            .into_iter()
            .map(|(category, value)| PieEntry {
                category: category.to_string(),
                value,
            })
            .collect(),
    }
}

/// Sums revenue and trips per time slot in a single pass.
pub fn trend_series(records: &[&Record]) -> TrendSeries {
    let mut groups: OrderedGroups<TimeSlot, (f64, u64)> = OrderedGroups::new();
    for row in records {
        let acc = groups.entry(row.time_slot);
        acc.0 += row.total_revenue;
        acc.1 += row.total_trips;
    }

    TrendSeries {
        entries: groups
            .into_vec()
            .into_iter()
            .map(|(time_slot, (total_revenue, total_trips))| TrendEntry {
                time_slot,
                total_revenue,
                total_trips,
            })
            .collect(),
    }
}
