//! Loading the record dataset from the aggregation endpoint or a local file.
//!
//! A failed load never aborts the dashboard: errors are logged and an empty
//! dataset comes back, which every downstream stage renders as "no data".

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use crate::record::Record;
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

/// Parses a JSON array of records, dropping rows that don't fit the schema.
pub fn parse_records(bytes: &[u8]) -> Result<Vec<Record>> {
    let rows: Vec<serde_json::Value> =
        serde_json::from_slice(bytes).context("response is not a JSON array")?;
    let total = rows.len();

    let records: Vec<Record> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value(row) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(index, error = %e, "Dropping malformed record");
                None
            }
        })
        .collect();

    debug!(total, kept = records.len(), "Records parsed");
    Ok(records)
}

/// Fetches the dataset over HTTP. Any failure yields an empty dataset.
#[tracing::instrument(skip(client))]
pub async fn fetch_records<C: HttpClient>(client: &C, url: &str) -> Vec<Record> {
    match fetch_bytes(client, url).await.and_then(|b| parse_records(&b)) {
        Ok(records) => {
            info!(count = records.len(), "Records fetched");
            records
        }
        Err(e) => {
            error!(error = %e, "Error fetching data");
            Vec::new()
        }
    }
}

/// Loads records from an `http(s)` URL or a local JSON file.
#[tracing::instrument(skip(timeout), fields(source = %source))]
pub async fn load_records(source: &str, timeout: Duration) -> Vec<Record> {
    if source.starts_with("http") {
        return match BasicClient::with_timeout(timeout) {
            Ok(client) => fetch_records(&client, source).await,
            Err(e) => {
                error!(error = %e, "Failed to build HTTP client");
                Vec::new()
            }
        };
    }

    match tokio::fs::read(source).await {
        Ok(bytes) => parse_records(&bytes).unwrap_or_else(|e| {
            error!(error = %e, "Error parsing data file");
            Vec::new()
        }),
        Err(e) => {
            error!(error = %e, "Error reading data file");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reqwest::{Request, Response};

    struct StubClient {
        status: u16,
        body: &'static str,
    }

    #[async_trait]
    impl HttpClient for StubClient {
        async fn execute(&self, _req: Request) -> reqwest::Result<Response> {
            let resp = http::Response::builder()
                .status(self.status)
                .body(self.body)
                .unwrap();
            Ok(Response::from(resp))
        }
    }

    const ROWS: &str = r#"[
        {"time_slot": "07:00-10:00", "bus_line": 1, "age_group": "18-25",
         "total_trips": 5, "total_yield": 80.0, "total_revenue": 100.0,
         "avg_yield_per_trip": 16.0, "avg_yield_per_km": 0.5, "avg_yield_per_vehicle": 12.0},
        {"time_slot": "07:00-10:00", "bus_line": 2},
        {"time_slot": "16:00-20:00", "bus_line": "3", "age_group": "65+", "gender": "F",
         "total_trips": 2, "total_yield": 8.0, "total_revenue": 10.0,
         "avg_yield_per_trip": 4.0, "avg_yield_per_km": 0.1, "avg_yield_per_vehicle": 2.0}
    ]"#;

    #[test]
    fn test_parse_records_drops_malformed_rows() {
        let records = parse_records(ROWS.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].bus_line.as_str(), "1");
        assert_eq!(records[1].gender.as_deref(), Some("F"));
    }

    #[test]
    fn test_parse_records_accepts_float_trip_counts() {
        let rows = r#"[
            {"time_slot": "07:00-10:00", "bus_line": 1, "age_group": "18-25",
             "total_trips": 5.0, "total_yield": 80.0, "total_revenue": 100.0,
             "avg_yield_per_trip": 16.0, "avg_yield_per_km": 0.5, "avg_yield_per_vehicle": 12.0}
        ]"#;
        let records = parse_records(rows.as_bytes()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].total_trips, 5);
    }

    #[test]
    fn test_parse_records_rejects_non_array() {
        assert!(parse_records(br#"{"detail": "oops"}"#).is_err());
    }

    #[tokio::test]
    async fn test_fetch_records_success() {
        let client = StubClient {
            status: 200,
            body: ROWS,
        };
        let records = fetch_records(&client, "http://localhost/api/").await;
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_records_error_status_is_empty() {
        let client = StubClient {
            status: 500,
            body: ROWS,
        };
        assert!(fetch_records(&client, "http://localhost/api/").await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_records_bad_json_is_empty() {
        let client = StubClient {
            status: 200,
            body: "not json",
        };
        assert!(fetch_records(&client, "http://localhost/api/").await.is_empty());
    }

    #[tokio::test]
    async fn test_load_records_missing_file_is_empty() {
        assert!(
            load_records("/nonexistent/records.json", Duration::from_secs(1))
                .await
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_load_records_from_file() {
        let path = std::env::temp_dir().join("transit_dashboard_test_load.json");
        std::fs::write(&path, ROWS).unwrap();

        let records = load_records(path.to_str().unwrap(), Duration::from_secs(1)).await;
        assert_eq!(records.len(), 2);

        std::fs::remove_file(&path).unwrap();
    }
}
