//! Export sinks: CSV of the filtered set, standalone SVG of one chart, and the
//! PDF report of the dashboard snapshot.

use anyhow::{Context, Result};
use csv::{QuoteStyle, WriterBuilder};
use serde::Deserialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::filter::FilterLabels;
use crate::record::{BusLine, Record};

pub const CSV_FILE_NAME: &str = "filtered_aggregated_data.csv";
pub const PDF_FILE_NAME: &str = "dashboard_filtered_data.pdf";
pub const SVG_FILE_NAME: &str = "piechart.svg";

pub const CSV_HEADERS: [&str; 6] = [
    "Time Slot",
    "Bus Line",
    "Age Group",
    "Total Revenue (LEK)",
    "Total Trips",
    "Average Yield Per Trip (LEK)",
];

/// Writes `records` as CSV, every field quoted, in the given order.
///
/// Numbers keep their source precision (shortest round-trip form).
pub fn write_csv<W: Write>(writer: W, records: &[&Record]) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(writer);

    debug!(rows = records.len(), "Writing CSV");
    writer.write_record(CSV_HEADERS)?;
    for row in records {
        writer.write_record([
            row.time_slot.to_string(),
            row.bus_line.to_string(),
            row.age_group.clone(),
            row.total_revenue.to_string(),
            row.total_trips.to_string(),
            row.avg_yield_per_trip.to_string(),
        ])?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes the CSV export into `dir` and returns its path.
pub fn export_csv(dir: &Path, records: &[&Record]) -> Result<PathBuf> {
    let path = dir.join(CSV_FILE_NAME);
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    write_csv(file, records)?;

    info!(path = %path.display(), rows = records.len(), "CSV exported");
    Ok(path)
}

/// One row of an exported CSV file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CsvRow {
    #[serde(rename = "Time Slot")]
    pub time_slot: String,
    #[serde(rename = "Bus Line")]
    pub bus_line: String,
    #[serde(rename = "Age Group")]
    pub age_group: String,
    #[serde(rename = "Total Revenue (LEK)")]
    pub total_revenue: f64,
    #[serde(rename = "Total Trips")]
    pub total_trips: u64,
    #[serde(rename = "Average Yield Per Trip (LEK)")]
    pub avg_yield_per_trip: f64,
}

impl CsvRow {
    /// Rebuilds a record from an exported row. Columns the export leaves out
    /// (yield totals, per-km and per-vehicle averages, gender) come back empty.
    pub fn to_record(&self) -> Result<Record> {
        Ok(Record {
            time_slot: self.time_slot.parse()?,
            bus_line: BusLine::new(self.bus_line.as_str()),
            age_group: self.age_group.clone(),
            gender: None,
            total_trips: self.total_trips,
            total_yield: 0.0,
            total_revenue: self.total_revenue,
            avg_yield_per_trip: self.avg_yield_per_trip,
            avg_yield_per_km: 0.0,
            avg_yield_per_vehicle: 0.0,
        })
    }
}

/// Parses a CSV export back into rows.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<CsvRow>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();

    for result in rdr.deserialize() {
        let row: CsvRow = result?;
        rows.push(row);
    }

    Ok(rows)
}

/// Turns one chart's markup into a standalone SVG file body.
pub fn standalone_svg(markup: &str) -> String {
    let markup = markup.trim();
    let markup = if markup.contains("xmlns=") {
        markup.to_string()
    } else {
        markup.replacen("<svg", r#"<svg xmlns="http://www.w3.org/2000/svg""#, 1)
    };
    format!("<?xml version=\"1.0\" standalone=\"no\"?>\r\n{}", markup)
}

/// Writes a chart's markup to `dir/file_name`.
pub fn export_svg(dir: &Path, file_name: &str, markup: &str) -> Result<PathBuf> {
    let path = dir.join(file_name);
    std::fs::write(&path, standalone_svg(markup))
        .with_context(|| format!("writing {}", path.display()))?;

    info!(path = %path.display(), "SVG exported");
    Ok(path)
}

/// A4 portrait, millimetres.
pub const A4_WIDTH_MM: f64 = 210.0;
pub const A4_HEIGHT_MM: f64 = 297.0;

/// Text placed at a page position measured from the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub x_mm: f64,
    pub y_mm: f64,
}

/// Image placement, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageBox {
    pub x_mm: f64,
    pub y_mm: f64,
    pub width_mm: f64,
    pub height_mm: f64,
}

/// Page layout of the PDF report.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfLayout {
    pub width_mm: f64,
    pub height_mm: f64,
    pub lines: Vec<TextLine>,
    pub snapshot: ImageBox,
}

impl PdfLayout {
    /// Header lines describing the applied filters, then the snapshot.
    pub fn for_filters(labels: &FilterLabels) -> Self {
        let line = |text: String, y_mm: f64| TextLine {
            text,
            x_mm: 10.0,
            y_mm,
        };

        Self {
            width_mm: A4_WIDTH_MM,
            height_mm: A4_HEIGHT_MM,
            lines: vec![
                line("Filters Applied:".to_string(), 10.0),
                line(format!("Time Slots: {}", FilterLabels::join(&labels.time_slots)), 20.0),
                line(format!("Bus Lines: {}", FilterLabels::join(&labels.bus_lines)), 30.0),
                line(format!("Age Groups: {}", FilterLabels::join(&labels.age_groups)), 40.0),
            ],
            snapshot: ImageBox {
                x_mm: 10.0,
                y_mm: 50.0,
                width_mm: 190.0,
                height_mm: 120.0,
            },
        }
    }
}

/// Raster capture of the dashboard region, 8-bit RGB, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

impl Snapshot {
    pub fn new(width: u32, height: u32, rgb: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 3;
        anyhow::ensure!(
            rgb.len() == expected,
            "snapshot has {} bytes, expected {} for {}x{} RGB",
            rgb.len(),
            expected,
            width,
            height
        );
        Ok(Self { width, height, rgb })
    }

    /// Decodes a PNG capture, dropping any alpha channel.
    #[cfg(feature = "pdf")]
    pub fn from_png(path: &Path) -> Result<Self> {
        let image = image::open(path)
            .with_context(|| format!("reading snapshot {}", path.display()))?
            .to_rgb8();
        let (width, height) = image.dimensions();
        Self::new(width, height, image.into_raw())
    }
}

#[cfg(not(feature = "pdf"))]
impl Snapshot {
    pub fn from_png(_path: &Path) -> Result<Self> {
        Err(anyhow::anyhow!("PNG snapshots need the 'pdf' feature"))
    }
}

#[cfg(feature = "pdf")]
pub fn write_pdf(path: &Path, layout: &PdfLayout, snapshot: &Snapshot) -> Result<()> {
    use printpdf::{
        BuiltinFont, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, Mm, PdfDocument,
        Px,
    };
    use std::io::BufWriter;

    const MM_PER_INCH: f64 = 25.4;
    const FONT_SIZE: f64 = 16.0;

    let (doc, page, layer) = PdfDocument::new(
        "Dashboard",
        Mm(layout.width_mm),
        Mm(layout.height_mm),
        "Layer 1",
    );
    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let layer = doc.get_page(page).get_layer(layer);

    for line in &layout.lines {
        layer.use_text(
            line.text.clone(),
            FONT_SIZE,
            Mm(line.x_mm),
            Mm(layout.height_mm - line.y_mm),
            &font,
        );
    }

    let image = Image::from(ImageXObject {
        width: Px(snapshot.width as usize),
        height: Px(snapshot.height as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: snapshot.rgb.clone(),
        image_filter: None,
        clipping_bbox: None,
    });

    // Scale the raster so it fills the target box at the chosen dpi.
    let target = layout.snapshot;
    let dpi = snapshot.width as f64 * MM_PER_INCH / target.width_mm;
    let natural_height_mm = snapshot.height as f64 * MM_PER_INCH / dpi;
    image.add_to_layer(
        layer,
        ImageTransform {
            translate_x: Some(Mm(target.x_mm)),
            translate_y: Some(Mm(layout.height_mm - target.y_mm - target.height_mm)),
            scale_y: Some(target.height_mm / natural_height_mm),
            dpi: Some(dpi),
            ..Default::default()
        },
    );

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    doc.save(&mut BufWriter::new(file))?;

    info!(path = %path.display(), "PDF exported");
    Ok(())
}

#[cfg(not(feature = "pdf"))]
pub fn write_pdf(_path: &Path, _layout: &PdfLayout, _snapshot: &Snapshot) -> Result<()> {
    Err(anyhow::anyhow!("PDF export not enabled (compile with the 'pdf' feature)"))
}
