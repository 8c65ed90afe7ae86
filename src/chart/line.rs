//! Time-slot trend line chart geometry.
//!
//! Input points are sanitized before any scale is built: entries without a
//! category or with a non-finite value are dropped and logged. The points are
//! joined by a monotone cubic curve in x, which never overshoots between
//! neighbouring values.

use crate::analyzers::types::TrendSeries;
use crate::chart::scale::{LinearScale, PointScale};
use crate::chart::tooltip::HitTest;
use crate::chart::{Canvas, Tick, value_ticks};
use serde::Serialize;
use std::fmt::Write as _;
use tracing::{error, warn};

/// Hover radius around a plotted point.
const HIT_RADIUS: f64 = 8.0;

/// One possibly malformed input point.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePoint {
    pub category: Option<String>,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendMetric {
    Revenue,
    Trips,
}

/// Converts a trend series into line input for `metric`.
pub fn trend_points(series: &TrendSeries, metric: TrendMetric) -> Vec<LinePoint> {
    series
        .entries
        .iter()
        .map(|e| LinePoint {
            category: Some(e.time_slot.to_string()),
            value: match metric {
                TrendMetric::Revenue => e.total_revenue,
                TrendMetric::Trips => e.total_trips as f64,
            },
        })
        .collect()
}

/// Drops points without a category or with a non-finite value.
pub fn sanitize(points: &[LinePoint]) -> Vec<(String, f64)> {
    points
        .iter()
        .enumerate()
        .filter_map(|(index, point)| match &point.category {
            Some(category) if point.value.is_finite() => Some((category.clone(), point.value)),
            _ => {
                warn!(index, category = ?point.category, value = point.value, "Dropping malformed line point");
                None
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PathCommand {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    CubicTo {
        c1: (f64, f64),
        c2: (f64, f64),
        to: (f64, f64),
    },
}

/// Renders path commands as an SVG `d` attribute.
pub fn path_data(commands: &[PathCommand]) -> String {
    let mut d = String::new();
    for command in commands {
        let _ = match command {
            PathCommand::MoveTo(x, y) => write!(d, "M{:.3},{:.3}", x, y),
            PathCommand::LineTo(x, y) => write!(d, "L{:.3},{:.3}", x, y),
            PathCommand::CubicTo { c1, c2, to } => write!(
                d,
                "C{:.3},{:.3},{:.3},{:.3},{:.3},{:.3}",
                c1.0, c1.1, c2.0, c2.1, to.0, to.1
            ),
        };
    }
    d
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlottedPoint {
    pub category: String,
    pub value: f64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub canvas: Canvas,
    pub points: Vec<PlottedPoint>,
    pub path: Vec<PathCommand>,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
}

/// Lays out the trend line. Returns `None` for an empty series, or when
/// sanitation leaves nothing to draw.
pub fn line_chart(points: &[LinePoint], canvas: Canvas) -> Option<LineChart> {
    if points.is_empty() {
        return None;
    }

    let clean = sanitize(points);
    if clean.is_empty() {
        error!(input = points.len(), "No valid data available for line chart");
        return None;
    }

    let x = PointScale::new(clean.iter().map(|(c, _)| c.clone()).collect(), canvas.x_range());
    let max = clean.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);
    let y = LinearScale::zero_based(max, canvas.y_range());

    let plotted: Vec<PlottedPoint> = clean
        .into_iter()
        .filter_map(|(category, value)| {
            Some(PlottedPoint {
                x: x.position(&category)?,
                y: y.apply(value),
                category,
                value,
            })
        })
        .collect();

    let coords: Vec<(f64, f64)> = plotted.iter().map(|p| (p.x, p.y)).collect();
    let x_ticks = x
        .domain()
        .iter()
        .filter_map(|category| {
            Some(Tick {
                label: category.clone(),
                position: x.position(category)?,
            })
        })
        .collect();

    Some(LineChart {
        canvas,
        path: monotone_x(&coords),
        points: plotted,
        x_ticks,
        y_ticks: value_ticks(&y),
    })
}

impl HitTest for LineChart {
    fn hit(&self, x: f64, y: f64) -> Option<usize> {
        self.points
            .iter()
            .position(|p| (p.x - x).hypot(p.y - y) <= HIT_RADIUS)
    }

    fn describe(&self, index: usize) -> Vec<String> {
        self.points
            .get(index)
            .map(|p| vec![format!("Time Slot: {}", p.category), format!("Value: {:.2}", p.value)])
            .unwrap_or_default()
    }
}

/// Monotone cubic interpolation in x through `points`.
pub fn monotone_x(points: &[(f64, f64)]) -> Vec<PathCommand> {
    let mut path = Vec::with_capacity(points.len());
    let Some(&(x0, y0)) = points.first() else {
        return path;
    };
    path.push(PathCommand::MoveTo(x0, y0));

    match points.len() {
        1 => return path,
        2 => {
            path.push(PathCommand::LineTo(points[1].0, points[1].1));
            return path;
        }
        _ => {}
    }

    // Tangent at every interior point, from its two neighbouring secants.
    let mut tangents = vec![0.0; points.len()];
    for i in 1..points.len() - 1 {
        tangents[i] = interior_tangent(points[i - 1], points[i], points[i + 1]);
    }
    let last = points.len() - 1;
    tangents[0] = end_tangent(points[0], points[1], tangents[1]);
    tangents[last] = end_tangent(points[last - 1], points[last], tangents[last - 1]);

    for i in 0..last {
        let (xa, ya) = points[i];
        let (xb, yb) = points[i + 1];
        let dx = (xb - xa) / 3.0;
        path.push(PathCommand::CubicTo {
            c1: (xa + dx, ya + dx * tangents[i]),
            c2: (xb - dx, yb - dx * tangents[i + 1]),
            to: (xb, yb),
        });
    }
    path
}

fn sign(v: f64) -> f64 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

fn interior_tangent(p0: (f64, f64), p1: (f64, f64), p2: (f64, f64)) -> f64 {
    let h0 = p1.0 - p0.0;
    let h1 = p2.0 - p1.0;
    let s0 = (p1.1 - p0.1) / if h0 != 0.0 { h0 } else if h1 < 0.0 { -0.0 } else { 0.0 };
    let s1 = (p2.1 - p1.1) / if h1 != 0.0 { h1 } else if h0 < 0.0 { -0.0 } else { 0.0 };
    let p = (s0 * h1 + s1 * h0) / (h0 + h1);
    let t = (sign(s0) + sign(s1)) * s0.abs().min(s1.abs()).min(0.5 * p.abs());
    if t.is_nan() { 0.0 } else { t }
}

fn end_tangent(a: (f64, f64), b: (f64, f64), neighbour: f64) -> f64 {
    let h = b.0 - a.0;
    if h != 0.0 {
        (3.0 * (b.1 - a.1) / h - neighbour) / 2.0
    } else {
        neighbour
    }
}
