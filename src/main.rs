//! CLI entry point for the transit revenue dashboard.
//!
//! Loads the aggregated trip records once, applies the requested filters and
//! prints or exports the derived views.

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use transit_dashboard::analyzers::aggregate::gender_series;
use transit_dashboard::chart::pie::PieCanvas;
use transit_dashboard::chart::{Canvas, svg};
use transit_dashboard::config::Settings;
use transit_dashboard::dashboard::{Dashboard, DashboardView};
use transit_dashboard::fetch::load_records;
use transit_dashboard::filter::{AgeGroupFilter, FilterState};
use transit_dashboard::output::{self, PdfLayout, Snapshot};
use transit_dashboard::record::{BusLine, RecordStore, TimeSlot};
use transit_dashboard::table::{self, EMPTY_TABLE_MESSAGE, TABLE_HEADERS};

const NO_DATA: &str = "No data available";

#[derive(Parser)]
#[command(name = "transit_dashboard")]
#[command(about = "Filter, aggregate, chart and export transit revenue data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// Path to a JSON file or URL to fetch (defaults to DASHBOARD_API_URL)
    #[arg(long, value_name = "FILE_OR_URL")]
    source: Option<String>,

    /// Only include this bus line (repeatable)
    #[arg(long = "bus-line", value_name = "ID")]
    bus_lines: Vec<String>,

    /// Only include this time slot, e.g. "07:00-10:00" (repeatable)
    #[arg(long = "time-slot", value_name = "SLOT")]
    time_slots: Vec<TimeSlot>,

    /// Only include this age group
    #[arg(long, default_value = "All")]
    age_group: AgeGroupFilter,
}

impl FilterArgs {
    fn state(&self) -> FilterState {
        FilterState::new()
            .with_bus_lines(self.bus_lines.iter().map(|id| BusLine::new(id.as_str())))
            .with_time_slots(self.time_slots.iter().copied())
            .with_age_group(self.age_group.clone())
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ChartKind {
    Bar,
    Line,
    Pie,
    /// Yield by gender
    Gender,
}

impl ChartKind {
    fn file_name(self) -> &'static str {
        match self {
            ChartKind::Bar => "barchart.svg",
            ChartKind::Line => "linechart.svg",
            ChartKind::Pie => output::SVG_FILE_NAME,
            ChartKind::Gender => "gender_piechart.svg",
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the summary metrics and chart series
    Summary {
        #[command(flatten)]
        filters: FilterArgs,

        /// Print a JSON report instead of log lines
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print one page of the data table
    Table {
        #[command(flatten)]
        filters: FilterArgs,

        /// 1-based page number
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Export the filtered records as CSV
    ExportCsv {
        #[command(flatten)]
        filters: FilterArgs,

        /// Directory to write into (defaults to DASHBOARD_OUTPUT_DIR)
        #[arg(short = 'd', long)]
        output_dir: Option<PathBuf>,
    },
    /// Export one chart as a standalone SVG file
    ExportSvg {
        #[command(flatten)]
        filters: FilterArgs,

        #[arg(long, value_enum)]
        chart: ChartKind,

        /// Directory to write into (defaults to DASHBOARD_OUTPUT_DIR)
        #[arg(short = 'd', long)]
        output_dir: Option<PathBuf>,
    },
    /// Export the filter header and a dashboard snapshot as PDF
    ExportPdf {
        #[command(flatten)]
        filters: FilterArgs,

        /// PNG capture of the dashboard region
        #[arg(long, value_name = "PNG")]
        snapshot: PathBuf,

        /// Directory to write into (defaults to DASHBOARD_OUTPUT_DIR)
        #[arg(short = 'd', long)]
        output_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file
    let settings = Settings::from_env()?;

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = settings
        .log_file_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = settings
        .log_file_path
        .file_name()
        .unwrap_or(OsStr::new("transit_dashboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new("info")));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(
            EnvFilter::try_from_env("RUST_LOG_JSON").unwrap_or_else(|_| EnvFilter::new("debug")),
        );

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Summary { filters, json } => {
            let dashboard = load_dashboard(&settings, &filters).await?;
            let view = dashboard.view();

            if json {
                println!("{}", serde_json::to_string_pretty(&view.report())?);
            } else {
                log_summary(&dashboard, &view);
            }
        }
        Commands::Table { filters, page } => {
            let mut dashboard = load_dashboard(&settings, &filters).await?;
            dashboard.go_to_page(page);
            print_table(&dashboard, &dashboard.view());
        }
        Commands::ExportCsv {
            filters,
            output_dir,
        } => {
            let dashboard = load_dashboard(&settings, &filters).await?;
            let dir = prepare_dir(output_dir, &settings)?;
            output::export_csv(&dir, &dashboard.view().filtered)?;
        }
        Commands::ExportSvg {
            filters,
            chart,
            output_dir,
        } => {
            let dashboard = load_dashboard(&settings, &filters).await?;
            let dir = prepare_dir(output_dir, &settings)?;
            let markup = chart_markup(&dashboard.view(), chart);
            output::export_svg(&dir, chart.file_name(), &markup)?;
        }
        Commands::ExportPdf {
            filters,
            snapshot,
            output_dir,
        } => {
            let dashboard = load_dashboard(&settings, &filters).await?;
            let dir = prepare_dir(output_dir, &settings)?;
            let snapshot = Snapshot::from_png(&snapshot)?;
            let layout = PdfLayout::for_filters(&dashboard.filters().labels());
            output::write_pdf(&dir.join(output::PDF_FILE_NAME), &layout, &snapshot)?;
        }
    }

    Ok(())
}

/// Loads the record store and applies the CLI filters. Ctrl+C cancels the load.
#[tracing::instrument(skip(settings))]
async fn load_dashboard(settings: &Settings, filters: &FilterArgs) -> Result<Dashboard> {
    let source = filters.source.as_deref().unwrap_or(&settings.api_url);
    let timeout: Duration = settings.fetch_timeout;

    let records = tokio::select! {
        records = load_records(source, timeout) => records,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted while loading data");
            anyhow::bail!("interrupted");
        }
    };

    let mut dashboard = Dashboard::new(RecordStore::new(records));
    dashboard.set_filters(filters.state());
    Ok(dashboard)
}

fn prepare_dir(output_dir: Option<PathBuf>, settings: &Settings) -> Result<PathBuf> {
    let dir = output_dir.unwrap_or_else(|| settings.output_dir.clone());
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn log_summary(dashboard: &Dashboard, view: &DashboardView<'_>) {
    let store = dashboard.store();
    info!(
        records = store.len(),
        bus_lines = ?store.bus_lines().iter().map(BusLine::label).collect::<Vec<_>>(),
        age_groups = ?store.age_groups(),
        "Filter options"
    );

    let cards = view.summary().display();
    info!(
        filtered = view.filtered.len(),
        total_trips = %cards.total_trips,
        total_yield = %cards.total_yield,
        total_revenue = %cards.total_revenue,
        avg_yield = %cards.avg_yield,
        "Summary"
    );

    for entry in &view.bars().entries {
        info!(bus_line = %entry.bus_line, total_yield = entry.total_yield, "Yield by bus line");
    }
    for (index, entry) in view.pie().entries.iter().enumerate() {
        info!(
            age_group = %entry.category,
            revenue = entry.value,
            share = view.pie().percentage(index).unwrap_or_default(),
            "Revenue by age group"
        );
    }
    for entry in gender_series(&view.filtered).entries {
        info!(gender = %entry.category, total_yield = entry.value, "Yield by gender");
    }
    for entry in &view.trend().entries {
        info!(
            time_slot = %entry.time_slot,
            revenue = entry.total_revenue,
            trips = entry.total_trips,
            "Trend by time slot"
        );
    }
}

fn print_table(dashboard: &Dashboard, view: &DashboardView<'_>) {
    if view.filtered.is_empty() {
        println!("{}", EMPTY_TABLE_MESSAGE);
        return;
    }

    println!("{}", TABLE_HEADERS.join("\t"));
    for row in table::rows(&view.page_rows) {
        println!("{}", row.cells().join("\t"));
    }

    info!(
        page = view.current_page,
        page_count = view.page_count,
        rows = view.page_rows.len(),
        has_previous = dashboard.cursor().has_previous(),
        has_next = dashboard.cursor().has_next(view.filtered.len()),
        "Table page"
    );
}

fn chart_markup(view: &DashboardView<'_>, chart: ChartKind) -> String {
    let canvas = Canvas::default();
    let pie_canvas = PieCanvas::default();

    let empty_pie = || {
        svg::render_empty(
            pie_canvas.width + pie_canvas.legend_width,
            pie_canvas.height,
            NO_DATA,
        )
    };

    match chart {
        ChartKind::Bar => view
            .bar_chart()
            .map(|c| svg::render_bar(&c))
            .unwrap_or_else(|| svg::render_empty(canvas.width, canvas.height, NO_DATA)),
        ChartKind::Line => view
            .line_chart()
            .map(|c| svg::render_line(&c))
            .unwrap_or_else(|| svg::render_empty(canvas.width, canvas.height, NO_DATA)),
        ChartKind::Pie => view
            .pie_chart()
            .map(|c| svg::render_pie(&c))
            .unwrap_or_else(empty_pie),
        ChartKind::Gender => view
            .gender_pie_chart()
            .map(|c| svg::render_pie(&c))
            .unwrap_or_else(empty_pie),
    }
}
