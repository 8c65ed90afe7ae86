//! Filter state and the filter engine.
//!
//! Dimensions combine with AND; values selected within one dimension combine
//! with OR. An empty multi-select matches everything.

use crate::record::{BusLine, Record, TimeSlot};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Single-select age group filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AgeGroupFilter {
    #[default]
    All,
    Only(String),
}

impl AgeGroupFilter {
    fn matches(&self, age_group: &str) -> bool {
        match self {
            AgeGroupFilter::All => true,
            AgeGroupFilter::Only(value) => value == age_group,
        }
    }
}

impl FromStr for AgeGroupFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(if s.is_empty() || s == "All" {
            AgeGroupFilter::All
        } else {
            AgeGroupFilter::Only(s.to_string())
        })
    }
}

impl fmt::Display for AgeGroupFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgeGroupFilter::All => f.write_str("All"),
            AgeGroupFilter::Only(value) => f.write_str(value),
        }
    }
}

/// Active filter predicates. Values keep selection order and never repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    bus_lines: Vec<BusLine>,
    time_slots: Vec<TimeSlot>,
    age_group: AgeGroupFilter,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bus_lines<I: IntoIterator<Item = BusLine>>(mut self, lines: I) -> Self {
        self.bus_lines = dedup(lines);
        self
    }

    pub fn with_time_slots<I: IntoIterator<Item = TimeSlot>>(mut self, slots: I) -> Self {
        self.time_slots = dedup(slots);
        self
    }

    pub fn with_age_group(mut self, age_group: AgeGroupFilter) -> Self {
        self.age_group = age_group;
        self
    }

    pub fn bus_lines(&self) -> &[BusLine] {
        &self.bus_lines
    }

    pub fn time_slots(&self) -> &[TimeSlot] {
        &self.time_slots
    }

    pub fn age_group(&self) -> &AgeGroupFilter {
        &self.age_group
    }

    /// Returns `true` if no dimension restricts the dataset.
    pub fn is_identity(&self) -> bool {
        self.bus_lines.is_empty()
            && self.time_slots.is_empty()
            && self.age_group == AgeGroupFilter::All
    }

    pub fn matches(&self, record: &Record) -> bool {
        (self.bus_lines.is_empty() || self.bus_lines.contains(&record.bus_line))
            && (self.time_slots.is_empty() || self.time_slots.contains(&record.time_slot))
            && self.age_group.matches(&record.age_group)
    }

    /// Human-readable labels of the applied filters.
    pub fn labels(&self) -> FilterLabels {
        FilterLabels {
            time_slots: self.time_slots.iter().map(|s| s.to_string()).collect(),
            bus_lines: self.bus_lines.iter().map(BusLine::label).collect(),
            age_groups: match &self.age_group {
                AgeGroupFilter::All => Vec::new(),
                AgeGroupFilter::Only(value) => vec![value.clone()],
            },
        }
    }
}

fn dedup<T: PartialEq, I: IntoIterator<Item = T>>(values: I) -> Vec<T> {
    let mut out: Vec<T> = Vec::new();
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

/// Applied-filter label lists, as shown in exports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterLabels {
    pub time_slots: Vec<String>,
    pub bus_lines: Vec<String>,
    pub age_groups: Vec<String>,
}

impl FilterLabels {
    /// Joins a label list, rendering `All` for an empty one.
    pub fn join(labels: &[String]) -> String {
        if labels.is_empty() {
            "All".to_string()
        } else {
            labels.join(", ")
        }
    }
}

/// Filters `records` by `state`, preserving input order.
pub fn apply<'a>(records: &'a [Record], state: &FilterState) -> Vec<&'a Record> {
    records.iter().filter(|r| state.matches(r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::tests::record;

    fn dataset() -> Vec<Record> {
        vec![
            record(TimeSlot::Morning, "1", "18-25", 100.0, 5),
            record(TimeSlot::Morning, "2", "26-35", 200.0, 10),
            record(TimeSlot::Midday, "1", "18-25", 50.0, 2),
            record(TimeSlot::Evening, "3", "36-50", 75.0, 3),
        ]
    }

    #[test]
    fn test_empty_filters_match_everything() {
        let records = dataset();
        let filtered = apply(&records, &FilterState::new());

        assert_eq!(filtered.len(), records.len());
        assert!(filtered.iter().zip(&records).all(|(a, b)| std::ptr::eq(*a, b)));
    }

    #[test]
    fn test_or_within_dimension() {
        let records = dataset();
        let state = FilterState::new().with_bus_lines([BusLine::from("1"), BusLine::from("3")]);
        let filtered = apply(&records, &state);

        let lines: Vec<_> = filtered.iter().map(|r| r.bus_line.as_str()).collect();
        assert_eq!(lines, vec!["1", "1", "3"]);
    }

    #[test]
    fn test_and_across_dimensions() {
        let records = dataset();
        let state = FilterState::new()
            .with_bus_lines([BusLine::from("1")])
            .with_time_slots([TimeSlot::Midday])
            .with_age_group(AgeGroupFilter::Only("18-25".to_string()));
        let filtered = apply(&records, &state);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].total_revenue, 50.0);
    }

    #[test]
    fn test_age_group_without_match_yields_nothing() {
        let records = dataset();
        let state = FilterState::new().with_age_group("65+".parse().unwrap());

        assert!(apply(&records, &state).is_empty());
    }

    #[test]
    fn test_all_sentinel_parses_to_no_restriction() {
        assert_eq!("All".parse::<AgeGroupFilter>().unwrap(), AgeGroupFilter::All);
        assert!(FilterState::new().with_age_group("All".parse().unwrap()).is_identity());
    }

    #[test]
    fn test_selection_is_deduplicated_in_order() {
        let state = FilterState::new().with_time_slots([
            TimeSlot::Evening,
            TimeSlot::Morning,
            TimeSlot::Evening,
        ]);

        assert_eq!(state.time_slots(), &[TimeSlot::Evening, TimeSlot::Morning]);
    }

    #[test]
    fn test_labels_render_all_for_empty_lists() {
        let labels = FilterState::new().with_bus_lines([BusLine::from("4")]).labels();

        assert_eq!(FilterLabels::join(&labels.bus_lines), "Bus Line 4");
        assert_eq!(FilterLabels::join(&labels.time_slots), "All");
        assert_eq!(FilterLabels::join(&labels.age_groups), "All");
    }
}
