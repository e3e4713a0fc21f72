//! Integration tests for complete scans
//!
//! These tests run `run_scan` against mock servers with a temporary data
//! directory and check what lands in the outcome tables.

use std::path::Path;
use tempfile::TempDir;
use web_url_scanner::config::Config;
use web_url_scanner::crawler::run_scan;
use web_url_scanner::ScannerError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

/// Creates a config whose seed file and data directory live in `dir`
fn create_test_config(dir: &TempDir, seeds: &[String]) -> Config {
    let seeds_file = dir.path().join("input.txt");
    std::fs::write(&seeds_file, seeds.join("\n")).expect("Failed to write seed file");

    let mut config = Config::default();
    config.scanner.max_depth = 2;
    config.scanner.workers_per_session = 3;
    config.scanner.concurrent_sessions = 2;
    config.scanner.seed_wait_secs = 1;
    config.http.timeout_secs = 2;
    config.input.seeds_file = seeds_file;
    config.output.data_dir = dir.path().join("data");
    config
}

/// Reads a table as its header plus rows sorted by URL
fn read_table(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).expect("Failed to open table");
    let header = reader
        .headers()
        .expect("Failed to read header")
        .iter()
        .map(str::to_string)
        .collect();
    let mut rows: Vec<Vec<String>> = reader
        .records()
        .map(|row| row.expect("Bad row").iter().map(str::to_string).collect())
        .collect();
    rows.sort();
    (header, rows)
}

async fn mount_site(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/one">One</a> <a href="/missing">Missing</a>"#))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/one"))
        .respond_with(html("One"))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_scan_writes_both_tables() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let base = server.uri();

    let dir = TempDir::new().unwrap();
    let seeds = vec![
        "# comment lines and blank lines are skipped".to_string(),
        String::new(),
        format!("{}/start", base),
        "not a url".to_string(),
    ];
    let config = create_test_config(&dir, &seeds);
    let reached_path = config.output.reached_path();
    let broken_path = config.output.broken_path();

    let summary = run_scan(config).await.expect("Scan failed");

    assert_eq!(summary.sessions, 1);
    assert_eq!(summary.skipped_seeds, 1);
    assert_eq!(summary.pages_fetched, 3);
    assert_eq!(summary.reached_rows, 2);
    assert_eq!(summary.broken_rows, 1);

    let (header, rows) = read_table(&reached_path);
    assert_eq!(header, vec!["URL", "Depth", "Timestamp"]);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][..2], [base.clone(), "0".to_string()]);
    assert_eq!(rows[1][..2], [format!("{}/one", base), "1".to_string()]);
    assert!(rows[0][2].parse::<f64>().is_ok());

    let (header, rows) = read_table(&broken_path);
    assert_eq!(header, vec!["URL", "Timestamp"]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], format!("{}/missing", base));
}

#[tokio::test]
async fn test_scan_runs_every_seed() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    let third = MockServer::start().await;
    for server in [&first, &second, &third] {
        mount_site(server).await;
    }

    let dir = TempDir::new().unwrap();
    let seeds = vec![first.uri(), second.uri(), third.uri()];
    let config = create_test_config(&dir, &seeds);
    let reached_path = config.output.reached_path();

    let summary = run_scan(config).await.expect("Scan failed");

    assert_eq!(summary.sessions, 3);
    assert_eq!(summary.reached_rows, 6);
    assert_eq!(summary.broken_rows, 3);

    let (_header, rows) = read_table(&reached_path);
    for seed in &seeds {
        assert!(rows.iter().any(|row| &row[0] == seed && row[1] == "0"));
    }
}

#[tokio::test]
async fn test_rerun_appends_without_second_header() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, &[server.uri()]);
    let reached_path = config.output.reached_path();

    run_scan(config.clone()).await.expect("First scan failed");
    run_scan(config).await.expect("Second scan failed");

    let content = std::fs::read_to_string(&reached_path).unwrap();
    assert_eq!(content.matches("URL,Depth,Timestamp").count(), 1);

    let (_header, rows) = read_table(&reached_path);
    assert_eq!(rows.len(), 4);
}

#[tokio::test]
async fn test_missing_seed_file_fails() {
    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&dir, &[]);
    config.input.seeds_file = dir.path().join("absent.txt");

    let result = run_scan(config).await;

    assert!(matches!(result, Err(ScannerError::SeedFile { .. })));
}

#[tokio::test]
async fn test_empty_seed_file_creates_empty_tables() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir, &[]);
    let reached_path = config.output.reached_path();

    let summary = run_scan(config).await.expect("Scan failed");

    assert_eq!(summary.sessions, 0);
    assert_eq!(summary.reached_rows, 0);
    let (header, rows) = read_table(&reached_path);
    assert_eq!(header, vec!["URL", "Depth", "Timestamp"]);
    assert!(rows.is_empty());
}
