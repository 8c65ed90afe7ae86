//! Pipeline composer.
//!
//! The dashboard owns the three pieces of mutable state (record store, filter
//! state, page cursor). Everything else is derived: [`Dashboard::view`] runs the
//! filter engine, the aggregate engine and the pagination engine from scratch
//! and hands back one consistent view.

use crate::analyzers::aggregate::{aggregate, gender_series};
use crate::analyzers::types::{Aggregates, BarSeries, PieSeries, Summary, TrendSeries};
use crate::chart::bar::{BarChart, bar_chart};
use crate::chart::line::{LineChart, TrendMetric, line_chart, trend_points};
use crate::chart::pie::{PieCanvas, PieChart, pie_chart};
use crate::chart::Canvas;
use crate::filter::{AgeGroupFilter, FilterLabels, FilterState, apply};
use crate::pagination::{PageCursor, page_count};
use crate::record::{BusLine, Record, RecordStore, TimeSlot};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    store: RecordStore,
    filters: FilterState,
    cursor: PageCursor,
}

impl Dashboard {
    pub fn new(store: RecordStore) -> Self {
        Self {
            store,
            filters: FilterState::default(),
            cursor: PageCursor::default(),
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn cursor(&self) -> &PageCursor {
        &self.cursor
    }

    /// Replaces the whole filter state and rewinds the table to page 1.
    pub fn set_filters(&mut self, filters: FilterState) {
        debug!(?filters, "Filters changed");
        self.filters = filters;
        self.cursor.reset();
    }

    pub fn set_bus_lines<I: IntoIterator<Item = BusLine>>(&mut self, lines: I) {
        let filters = self.filters.clone().with_bus_lines(lines);
        self.set_filters(filters);
    }

    pub fn set_time_slots<I: IntoIterator<Item = TimeSlot>>(&mut self, slots: I) {
        let filters = self.filters.clone().with_time_slots(slots);
        self.set_filters(filters);
    }

    pub fn set_age_group(&mut self, age_group: AgeGroupFilter) {
        let filters = self.filters.clone().with_age_group(age_group);
        self.set_filters(filters);
    }

    /// Page navigation. These never touch the filters.
    pub fn go_to_page(&mut self, page: usize) {
        self.cursor.go_to(page);
    }

    pub fn next_page(&mut self) {
        let total = self.filtered().len();
        self.cursor.next(total);
    }

    pub fn previous_page(&mut self) {
        let total = self.filtered().len();
        self.cursor.previous(total);
    }

    pub fn filtered(&self) -> Vec<&Record> {
        apply(self.store.records(), &self.filters)
    }

    /// Recomputes every derived stage from the current state.
    pub fn view(&self) -> DashboardView<'_> {
        let filtered = self.filtered();
        let aggregates = aggregate(&filtered);
        let page_rows = self.cursor.slice(&filtered).to_vec();
        let page_count = page_count(filtered.len(), self.cursor.rows_per_page());

        DashboardView {
            filters: self.filters.clone(),
            current_page: self.cursor.current(),
            page_count,
            page_rows,
            aggregates,
            filtered,
        }
    }
}

/// One consistent snapshot of every derived stage.
#[derive(Debug, Clone)]
pub struct DashboardView<'a> {
    pub filters: FilterState,
    pub filtered: Vec<&'a Record>,
    pub aggregates: Aggregates,
    pub current_page: usize,
    pub page_count: usize,
    pub page_rows: Vec<&'a Record>,
}

impl<'a> DashboardView<'a> {
    pub fn summary(&self) -> &Summary {
        &self.aggregates.summary
    }

    pub fn bars(&self) -> &BarSeries {
        &self.aggregates.bars
    }

    pub fn pie(&self) -> &PieSeries {
        &self.aggregates.pie
    }

    pub fn trend(&self) -> &TrendSeries {
        &self.aggregates.trend
    }

    pub fn bar_chart(&self) -> Option<BarChart> {
        bar_chart(self.bars(), Canvas::default())
    }

    pub fn line_chart(&self) -> Option<LineChart> {
        line_chart(
            &trend_points(self.trend(), TrendMetric::Revenue),
            Canvas::default(),
        )
    }

    pub fn pie_chart(&self) -> Option<PieChart> {
        pie_chart(self.pie(), PieCanvas::default())
    }

    /// Yield-by-gender pie over the same filtered set.
    pub fn gender_pie_chart(&self) -> Option<PieChart> {
        pie_chart(&gender_series(&self.filtered), PieCanvas::default())
    }

    pub fn report(&self) -> DashboardReport {
        DashboardReport {
            generated_at: Utc::now(),
            filters: self.filters.labels(),
            summary: self.aggregates.summary.clone(),
            bars: self.aggregates.bars.clone(),
            pie: self.aggregates.pie.clone(),
            trend: self.aggregates.trend.clone(),
        }
    }
}

/// Serializable snapshot of the aggregate views.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub generated_at: DateTime<Utc>,
    pub filters: FilterLabels,
    pub summary: Summary,
    pub bars: BarSeries,
    pub pie: PieSeries,
    pub trend: TrendSeries,
}
