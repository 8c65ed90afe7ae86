//! Pie chart geometry with legend.
//!
//! Angles run clockwise from 12 o'clock. Wedges are laid out largest first
//! (ties keep series order) but returned in series order, so `wedges[i]`
//! always belongs to `series.entries[i]` and takes palette color `i`.

use crate::analyzers::types::PieSeries;
use crate::chart::tooltip::HitTest;
use serde::Serialize;
use std::f64::consts::{PI, TAU};

/// Ten-color categorical palette, assigned by entry index.
pub const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

const LEGEND_ROW: f64 = 20.0;
const LEGEND_SWATCH: f64 = 12.0;

pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PieCanvas {
    pub width: f64,
    pub height: f64,
    /// Extra space to the right of the pie for the legend.
    pub legend_width: f64,
}

impl Default for PieCanvas {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 400.0,
            legend_width: 160.0,
        }
    }
}

impl PieCanvas {
    pub fn radius(&self) -> f64 {
        self.width.min(self.height) / 2.0
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Wedge {
    pub category: String,
    pub value: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub color: &'static str,
    /// Label anchor, in canvas coordinates.
    pub centroid: (f64, f64),
}

impl Wedge {
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// SVG path of the wedge, relative to the pie center.
    pub fn path_data(&self, radius: f64) -> String {
        let sweep = self.sweep();
        if sweep <= 0.0 {
            return String::new();
        }
        if sweep >= TAU - 1e-9 {
            return format!(
                "M0,{:.3}A{r:.3},{r:.3},0,1,1,0,{:.3}A{r:.3},{r:.3},0,1,1,0,{:.3}Z",
                -radius,
                radius,
                -radius,
                r = radius
            );
        }
        let (x0, y0) = polar(radius, self.start_angle);
        let (x1, y1) = polar(radius, self.end_angle);
        let large_arc = if sweep > PI { 1 } else { 0 };
        format!(
            "M{:.3},{:.3}A{r:.3},{r:.3},0,{},1,{:.3},{:.3}L0,0Z",
            x0,
            y0,
            large_arc,
            x1,
            y1,
            r = radius
        )
    }
}

// Point on the circle for a clockwise-from-north angle.
fn polar(radius: f64, angle: f64) -> (f64, f64) {
    (radius * angle.sin(), -radius * angle.cos())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub category: String,
    pub color: &'static str,
    pub x: f64,
    pub y: f64,
    pub swatch: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub canvas: PieCanvas,
    pub wedges: Vec<Wedge>,
    pub legend: Vec<LegendEntry>,
    #[serde(skip)]
    series: PieSeries,
}

/// Lays out one wedge per series entry. Returns `None` for an empty series.
pub fn pie_chart(series: &PieSeries, canvas: PieCanvas) -> Option<PieChart> {
    if series.is_empty() {
        return None;
    }

    let radius = canvas.radius();
    let (cx, cy) = canvas.center();
    let values: Vec<f64> = series.entries.iter().map(|e| e.value.max(0.0)).collect();
    let total: f64 = values.iter().sum();
    let k = if total > 0.0 { TAU / total } else { 0.0 };

    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));

    let mut angles = vec![(0.0, 0.0); values.len()];
    let mut angle = 0.0;
    for index in order {
        let end = angle + values[index] * k;
        angles[index] = (angle, end);
        angle = end;
    }

    let wedges = series
        .entries
        .iter()
        .zip(angles)
        .enumerate()
        .map(|(index, (entry, (start, end)))| {
            let mid = (start + end) / 2.0 - PI / 2.0;
            Wedge {
                category: entry.category.clone(),
                value: entry.value,
                start_angle: start,
                end_angle: end,
                color: palette_color(index),
                centroid: (cx + mid.cos() * radius / 2.0, cy + mid.sin() * radius / 2.0),
            }
        })
        .collect();

    let legend = series
        .entries
        .iter()
        .enumerate()
        .map(|(index, entry)| LegendEntry {
            category: entry.category.clone(),
            color: palette_color(index),
            x: canvas.width + LEGEND_ROW,
            y: LEGEND_ROW + index as f64 * LEGEND_ROW,
            swatch: LEGEND_SWATCH,
        })
        .collect();

    Some(PieChart {
        canvas,
        wedges,
        legend,
        series: series.clone(),
    })
}

impl PieChart {
    pub fn radius(&self) -> f64 {
        self.canvas.radius()
    }
}

impl HitTest for PieChart {
    fn hit(&self, x: f64, y: f64) -> Option<usize> {
        let (cx, cy) = self.canvas.center();
        let (dx, dy) = (x - cx, y - cy);
        if dx.hypot(dy) > self.radius() {
            return None;
        }
        let angle = dx.atan2(-dy).rem_euclid(TAU);
        self.wedges
            .iter()
            .position(|w| w.sweep() > 0.0 && angle >= w.start_angle && angle < w.end_angle)
    }

    fn describe(&self, index: usize) -> Vec<String> {
        let (Some(wedge), Some(share)) = (self.wedges.get(index), self.series.percentage(index))
        else {
            return Vec::new();
        };
        vec![
            wedge.category.clone(),
            format!("{:.2} LEK", wedge.value),
            format!("{:.1}%", share),
        ]
    }
}
