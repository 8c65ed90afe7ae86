//! Stateless SVG rendering of chart geometry.
//!
//! Every call produces a complete document from the full shape list; nothing
//! is retained between renders.

use crate::chart::bar::BarChart;
use crate::chart::line::{LineChart, path_data};
use crate::chart::pie::PieChart;
use crate::chart::{Canvas, Tick};

const BAR_FILL: &str = "steelblue";
const AXIS_STROKE: &str = "#000";
const TICK_TEXT: &str = "#333";

/// Escapes text for use in SVG content and attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

fn open(width: f64, height: f64) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" width="{}" height="{}" preserveAspectRatio="xMidYMid meet">"#,
        width, height, width, height
    )
}

fn axes(canvas: &Canvas, x_ticks: &[Tick], y_ticks: &[Tick]) -> String {
    let (left, right) = canvas.x_range();
    let (bottom, top) = canvas.y_range();
    let mut out = String::new();

    out.push_str(&format!(
        r#"<g class="x-axis"><line x1="{:.3}" y1="{:.3}" x2="{:.3}" y2="{:.3}" stroke="{}"/>"#,
        left, bottom, right, bottom, AXIS_STROKE
    ));
    for tick in x_ticks {
        out.push_str(&format!(
            r#"<line x1="{p:.3}" y1="{b:.3}" x2="{p:.3}" y2="{:.3}" stroke="{}"/><text x="{p:.3}" y="{:.3}" text-anchor="middle" font-size="10" fill="{}">{}</text>"#,
            bottom + 6.0,
            AXIS_STROKE,
            bottom + 18.0,
            TICK_TEXT,
            escape(&tick.label),
            p = tick.position,
            b = bottom
        ));
    }
    out.push_str("</g>");

    out.push_str(&format!(
        r#"<g class="y-axis"><line x1="{:.3}" y1="{:.3}" x2="{:.3}" y2="{:.3}" stroke="{}"/>"#,
        left, top, left, bottom, AXIS_STROKE
    ));
    for tick in y_ticks {
        out.push_str(&format!(
            r#"<line x1="{:.3}" y1="{p:.3}" x2="{l:.3}" y2="{p:.3}" stroke="{}"/><text x="{:.3}" y="{p:.3}" dy="0.32em" text-anchor="end" font-size="10" fill="{}">{}</text>"#,
            left - 6.0,
            AXIS_STROKE,
            left - 9.0,
            TICK_TEXT,
            escape(&tick.label),
            p = tick.position,
            l = left
        ));
    }
    out.push_str("</g>");
    out
}

pub fn render_bar(chart: &BarChart) -> String {
    let mut svg = open(chart.canvas.width, chart.canvas.height);
    svg.push_str(&axes(&chart.canvas, &chart.x_ticks, &chart.y_ticks));
    svg.push_str(r#"<g class="bars">"#);
    for bar in &chart.bars {
        svg.push_str(&format!(
            r#"<rect x="{:.3}" y="{:.3}" width="{:.3}" height="{:.3}" fill="{}"><title>{}</title></rect>"#,
            bar.x,
            bar.y,
            bar.width,
            bar.height,
            BAR_FILL,
            escape(&bar.category)
        ));
    }
    svg.push_str("</g></svg>");
    svg
}

pub fn render_line(chart: &LineChart) -> String {
    let mut svg = open(chart.canvas.width, chart.canvas.height);
    svg.push_str(&axes(&chart.canvas, &chart.x_ticks, &chart.y_ticks));
    svg.push_str(&format!(
        r#"<path class="trend" fill="none" stroke="{}" stroke-width="2" d="{}"/>"#,
        BAR_FILL,
        path_data(&chart.path)
    ));
    svg.push_str("</svg>");
    svg
}

pub fn render_pie(chart: &PieChart) -> String {
    let canvas = chart.canvas;
    let (cx, cy) = canvas.center();
    let mut svg = open(canvas.width + canvas.legend_width, canvas.height);

    svg.push_str(&format!(r#"<g transform="translate({},{})">"#, cx, cy));
    for wedge in &chart.wedges {
        let d = wedge.path_data(chart.radius());
        if d.is_empty() {
            continue;
        }
        svg.push_str(&format!(r#"<path d="{}" fill="{}"/>"#, d, wedge.color));
    }
    svg.push_str("</g>");

    for wedge in chart.wedges.iter().filter(|w| w.sweep() > 0.0) {
        svg.push_str(&format!(
            r#"<text x="{:.3}" y="{:.3}" text-anchor="middle" font-size="12">{}</text>"#,
            wedge.centroid.0,
            wedge.centroid.1,
            escape(&wedge.category)
        ));
    }

    svg.push_str(r#"<g class="legend">"#);
    for entry in &chart.legend {
        svg.push_str(&format!(
            r#"<rect x="{:.3}" y="{:.3}" width="{s}" height="{s}" fill="{}"/><text x="{:.3}" y="{:.3}" dy="0.85em" font-size="12">{}</text>"#,
            entry.x,
            entry.y,
            entry.color,
            entry.x + entry.swatch + 6.0,
            entry.y,
            escape(&entry.category),
            s = entry.swatch
        ));
    }
    svg.push_str("</g></svg>");
    svg
}

/// Placeholder for a chart whose series is empty.
pub fn render_empty(width: f64, height: f64, message: &str) -> String {
    format!(
        r##"{}<text x="{}" y="{}" text-anchor="middle" font-size="14" fill="#6b7280">{}</text></svg>"##,
        open(width, height),
        width / 2.0,
        height / 2.0,
        escape(message)
    )
}
