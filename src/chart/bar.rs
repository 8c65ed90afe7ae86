//! Yield-by-bus-line bar chart geometry.

use crate::analyzers::types::BarSeries;
use crate::chart::scale::{BandScale, LinearScale};
use crate::chart::tooltip::HitTest;
use crate::chart::{Canvas, Tick, value_ticks};
use serde::Serialize;

const BAND_PADDING: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub category: String,
    pub value: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bar {
    fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub canvas: Canvas,
    pub bars: Vec<Bar>,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
}

/// Lays out one bar per bus line. Returns `None` for an empty series.
pub fn bar_chart(series: &BarSeries, canvas: Canvas) -> Option<BarChart> {
    if series.is_empty() {
        return None;
    }

    let categories: Vec<String> = series.entries.iter().map(|e| e.bus_line.to_string()).collect();
    let x = BandScale::new(categories, canvas.x_range(), BAND_PADDING);
    let max = series
        .entries
        .iter()
        .map(|e| e.total_yield)
        .fold(f64::NEG_INFINITY, f64::max);
    let y = LinearScale::zero_based(max, canvas.y_range());
    let baseline = canvas.baseline();

    let bars = series
        .entries
        .iter()
        .filter_map(|entry| {
            let category = entry.bus_line.to_string();
            let left = x.position(&category)?;
            let top = y.apply(entry.total_yield);
            Some(Bar {
                category,
                value: entry.total_yield,
                x: left,
                y: top,
                width: x.bandwidth(),
                height: baseline - top,
            })
        })
        .collect();

    let x_ticks = x
        .domain()
        .iter()
        .filter_map(|category| {
            Some(Tick {
                label: format!("Bus {}", category),
                position: x.position(category)? + x.bandwidth() / 2.0,
            })
        })
        .collect();

    Some(BarChart {
        canvas,
        bars,
        x_ticks,
        y_ticks: value_ticks(&y),
    })
}

impl HitTest for BarChart {
    fn hit(&self, x: f64, y: f64) -> Option<usize> {
        self.bars.iter().position(|bar| bar.contains(x, y))
    }

    fn describe(&self, index: usize) -> Vec<String> {
        self.bars
            .get(index)
            .map(|bar| {
                vec![
                    format!("Bus Line: {}", bar.category),
                    format!("Yield: {:.2} LEK", bar.value),
                ]
            })
            .unwrap_or_default()
    }
}
