use std::fs::{self, File};
use std::path::PathBuf;
use std::time::Duration;
use transit_dashboard::analyzers::aggregate::summarize;
use transit_dashboard::chart::svg;
use transit_dashboard::dashboard::Dashboard;
use transit_dashboard::fetch::{load_records, parse_records};
use transit_dashboard::filter::AgeGroupFilter;
use transit_dashboard::output::{self, PdfLayout};
use transit_dashboard::record::{BusLine, Record, RecordStore, TimeSlot};
use transit_dashboard::table;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/records.json");

fn fixture_dashboard() -> Dashboard {
    let bytes = include_bytes!("fixtures/records.json");
    let records = parse_records(bytes).expect("Failed to parse fixture");
    Dashboard::new(RecordStore::new(records))
}

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(name);
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[tokio::test]
async fn test_full_pipeline() {
    let records = load_records(FIXTURE, Duration::from_secs(1)).await;
    // One fixture row is missing its numeric fields and gets dropped.
    assert_eq!(records.len(), 7);

    let dashboard = Dashboard::new(RecordStore::new(records));
    let view = dashboard.view();
    let summary = view.summary();

    assert_eq!(summary.record_count, 7);
    assert_eq!(summary.total_trips, 28);
    assert!(close(summary.total_revenue, 547.75));
    assert!(close(summary.total_yield, 439.75));
    assert!(close(summary.avg_yield, 106.5 / 7.0));

    let lines: Vec<_> = view.bars().entries.iter().map(|e| e.bus_line.as_str()).collect();
    assert_eq!(lines, vec!["1", "2", "3"]);
    assert!(close(view.bars().total(), summary.total_yield));

    let slots: Vec<_> = view.trend().entries.iter().map(|e| e.time_slot).collect();
    assert_eq!(slots, vec![TimeSlot::Morning, TimeSlot::Midday, TimeSlot::Evening]);
    assert_eq!(view.trend().total_trips(), summary.total_trips);
    assert!(close(view.trend().entries[0].total_revenue, 290.5));

    assert_eq!(view.pie().entries[0].category, "18-25");
    assert!(close(view.pie().entries[0].value, 270.0));

    assert!(view.bar_chart().is_some());
    assert!(view.line_chart().is_some());
    assert_eq!(view.pie_chart().unwrap().wedges.len(), 4);
}

#[test]
fn test_filter_options_follow_data() {
    let dashboard = fixture_dashboard();
    let lines: Vec<_> = dashboard.store().bus_lines().iter().map(BusLine::label).collect();

    assert_eq!(lines, vec!["Bus Line 1", "Bus Line 2", "Bus Line 3"]);
    assert_eq!(
        dashboard.store().age_groups(),
        vec!["18-25", "26-35", "36-50", "65+"]
    );
}

#[test]
fn test_bus_line_filter() {
    let mut dashboard = fixture_dashboard();
    dashboard.set_bus_lines([BusLine::from("1")]);
    let view = dashboard.view();

    assert_eq!(view.filtered.len(), 3);
    assert_eq!(view.summary().total_trips, 8);
    assert!(close(view.summary().total_revenue, 162.25));
    assert_eq!(view.bars().entries.len(), 1);
    assert!(close(view.bars().entries[0].total_yield, 129.5));
}

#[test]
fn test_combined_filters() {
    let mut dashboard = fixture_dashboard();
    dashboard.set_time_slots([TimeSlot::Morning, TimeSlot::Evening]);
    dashboard.set_age_group(AgeGroupFilter::Only("18-25".into()));
    let view = dashboard.view();

    assert_eq!(view.filtered.len(), 2);
    assert_eq!(view.summary().total_trips, 11);
    assert_eq!(view.pie().entries.len(), 1);
    assert_eq!(view.pie().percentage(0), Some(100.0));
}

#[test]
fn test_empty_result() {
    let mut dashboard = fixture_dashboard();
    dashboard.set_age_group(AgeGroupFilter::Only("0-17".into()));
    let view = dashboard.view();

    assert!(view.filtered.is_empty());
    assert_eq!(view.summary().avg_yield, 0.0);
    assert_eq!(view.summary().total_trips, 0);
    assert!(view.bar_chart().is_none());
    assert!(view.line_chart().is_none());
    assert!(view.pie_chart().is_none());
    assert_eq!(view.page_count, 0);
    assert!(table::rows(&view.page_rows).is_empty());
}

#[test]
fn test_csv_round_trip_reproduces_totals() {
    let dashboard = fixture_dashboard();
    let view = dashboard.view();
    let dir = temp_dir("transit_dashboard_it_csv");

    let path = output::export_csv(&dir, &view.filtered).unwrap();
    let rows = output::read_csv(File::open(&path).unwrap()).unwrap();
    let rebuilt: Vec<Record> = rows.iter().map(|r| r.to_record().unwrap()).collect();
    let rebuilt_refs: Vec<&Record> = rebuilt.iter().collect();

    let expected = summarize(&view.filtered);
    let summary = summarize(&rebuilt_refs);
    assert_eq!(summary.record_count, expected.record_count);
    assert_eq!(summary.total_trips, expected.total_trips);
    assert!(close(summary.total_revenue, expected.total_revenue));
    assert!(close(summary.avg_yield, expected.avg_yield));
    assert_eq!(rows[0].time_slot, "07:00-10:00");
    assert_eq!(rows[6].bus_line, "3");

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_svg_export() {
    let dashboard = fixture_dashboard();
    let dir = temp_dir("transit_dashboard_it_svg");
    let chart = dashboard.view().pie_chart().unwrap();

    let path = output::export_svg(&dir, output::SVG_FILE_NAME, &svg::render_pie(&chart)).unwrap();
    let text = fs::read_to_string(&path).unwrap();

    assert!(text.starts_with("<?xml"));
    assert_eq!(text.matches("<path").count(), 4);
    assert!(text.contains(">65+</text>"));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_pdf_layout_reflects_filters() {
    let mut dashboard = fixture_dashboard();
    dashboard.set_bus_lines([BusLine::from("2"), BusLine::from("3")]);
    let layout = PdfLayout::for_filters(&dashboard.filters().labels());

    assert_eq!(layout.lines[1].text, "Time Slots: All");
    assert_eq!(layout.lines[2].text, "Bus Lines: Bus Line 2, Bus Line 3");
}

#[test]
fn test_pagination_over_fixture() {
    let mut dashboard = fixture_dashboard();
    let view = dashboard.view();
    assert_eq!(view.page_count, 1);
    assert_eq!(view.page_rows.len(), 7);

    dashboard.next_page();
    assert_eq!(dashboard.cursor().current(), 1);
    dashboard.go_to_page(2);
    assert!(dashboard.view().page_rows.is_empty());
}
