//! Chart geometry engine.
//!
//! Each chart variant maps one derived series onto positioned primitives plus
//! axis ticks. Geometry is pure data; [`svg`] turns it into markup. An empty
//! series produces no geometry at all (`None`), so no scale is ever built over
//! an empty domain.

pub mod bar;
pub mod line;
pub mod pie;
pub mod scale;
pub mod svg;
pub mod tooltip;

use scale::{LinearScale, format_tick};
use serde::Serialize;

/// Number of ticks requested from value axes.
pub const VALUE_TICKS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Drawing surface for the cartesian charts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
            margin: Margin {
                top: 20.0,
                right: 30.0,
                bottom: 50.0,
                left: 50.0,
            },
        }
    }
}

impl Canvas {
    /// Horizontal pixel span of the plot area.
    pub fn x_range(&self) -> (f64, f64) {
        (self.margin.left, self.width - self.margin.right)
    }

    /// Vertical pixel span, inverted: the first value is the bottom edge.
    pub fn y_range(&self) -> (f64, f64) {
        (self.height - self.margin.bottom, self.margin.top)
    }

    /// Y coordinate of the x-axis.
    pub fn baseline(&self) -> f64 {
        self.height - self.margin.bottom
    }
}

/// One labelled axis tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub label: String,
    pub position: f64,
}

pub(crate) fn value_ticks(scale: &LinearScale) -> Vec<Tick> {
    scale
        .ticks(VALUE_TICKS)
        .into_iter()
        .map(|value| Tick {
            label: format_tick(value),
            position: scale.apply(value),
        })
        .collect()
}
