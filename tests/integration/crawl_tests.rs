//! Integration tests for crawl sessions
//!
//! These tests use wiremock to create mock HTTP servers and run single
//! sessions end-to-end, collecting the published records afterwards.

use web_url_scanner::config::{HttpConfig, ScannerConfig};
use web_url_scanner::crawler::scan;
use web_url_scanner::output::{BrokenRecord, OutcomeSink, ReachedRecord};
use web_url_scanner::SessionSummary;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Large enough that no test blocks on an undrained channel
const CAPACITY: usize = 256;

fn scanner_config(max_depth: u32) -> ScannerConfig {
    ScannerConfig {
        max_depth,
        workers_per_session: 4,
        concurrent_sessions: 1,
        seed_wait_secs: 1,
    }
}

fn http_config() -> HttpConfig {
    HttpConfig {
        timeout_secs: 2,
        ..HttpConfig::default()
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html(body))
        .mount(server)
        .await;
}

/// Runs one session and returns its summary with every record published
async fn run_session(
    seed: &str,
    max_depth: u32,
) -> (SessionSummary, Vec<ReachedRecord>, Vec<BrokenRecord>) {
    let (sink, mut receivers) = OutcomeSink::channel(CAPACITY);
    let summary = scan(seed, &scanner_config(max_depth), &http_config(), sink)
        .await
        .expect("Session failed");
    let (mut reached, mut broken) = receivers.drain_ready();
    reached.sort_by(|a, b| a.url.cmp(&b.url));
    broken.sort_by(|a, b| a.url.cmp(&b.url));
    (summary, reached, broken)
}

fn urls_and_depths(records: &[ReachedRecord]) -> Vec<(String, u32)> {
    records.iter().map(|r| (r.url.clone(), r.depth)).collect()
}

#[tokio::test]
async fn test_same_site_link_followed_and_external_link_ignored() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"<a href="/about">About</a> <a href="https://elsewhere.invalid/x">Out</a>"#,
    )
    .await;
    mount_page(&server, "/about", "About us").await;

    let (summary, reached, broken) = run_session(&base, 5).await;

    // The home page keeps the seed's form, without a trailing slash
    assert_eq!(
        urls_and_depths(&reached),
        vec![(base.clone(), 0), (format!("{}/about", base), 1)]
    );
    assert!(broken.is_empty());
    assert_eq!(summary.home_page, base);
    assert_eq!(summary.fetched, 2);
    assert_eq!(summary.reached, 2);
    assert_eq!(summary.broken, 0);
}

#[tokio::test]
async fn test_seed_path_is_replaced_by_home_page() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(html("never requested"))
        .expect(0)
        .mount(&server)
        .await;

    let (summary, reached, broken) = run_session(&format!("{}/missing", base), 5).await;

    assert!(reached.is_empty());
    assert_eq!(broken.len(), 1);
    assert_eq!(broken[0].url, base);
    assert_eq!(summary.broken, 1);
}

#[tokio::test]
async fn test_broken_link_reported_with_requested_url() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"<a href="/gone">Gone</a> <a href="/down">Down</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (summary, reached, broken) = run_session(&base, 5).await;

    assert_eq!(urls_and_depths(&reached), vec![(base.clone(), 0)]);
    let broken_urls: Vec<_> = broken.iter().map(|r| r.url.clone()).collect();
    assert_eq!(
        broken_urls,
        vec![format!("{}/down", base), format!("{}/gone", base)]
    );
    assert_eq!(summary.fetched, 3);
}

#[tokio::test]
async fn test_redirect_target_is_not_fetched_again() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/a">A</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", format!("{}/b", base)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html(r#"<a href="/b">Self</a> <a href="/a">Back</a>"#))
        .expect(1)
        .mount(&server)
        .await;

    let (summary, reached, broken) = run_session(&base, 5).await;

    // The redirect is reported under its final URL at the requesting depth
    assert_eq!(
        urls_and_depths(&reached),
        vec![(base.clone(), 0), (format!("{}/b", base), 1)]
    );
    assert!(broken.is_empty());
    assert_eq!(summary.fetched, 2);
    assert_eq!(summary.visited, 3);
}

#[tokio::test]
async fn test_max_depth_stops_the_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/d1">1</a>"#).await;
    mount_page(&server, "/d1", r#"<a href="/d2">2</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/d2"))
        .respond_with(html("too deep"))
        .expect(0)
        .mount(&server)
        .await;

    let (summary, reached, _broken) = run_session(&base, 1).await;

    assert_eq!(
        urls_and_depths(&reached),
        vec![(base.clone(), 0), (format!("{}/d1", base), 1)]
    );
    assert_eq!(summary.fetched, 2);
}

#[tokio::test]
async fn test_depth_zero_fetches_only_home_page() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/child">Child</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/child"))
        .respond_with(html("child"))
        .expect(0)
        .mount(&server)
        .await;

    let (summary, reached, _broken) = run_session(&base, 0).await;

    assert_eq!(urls_and_depths(&reached), vec![(base, 0)]);
    assert_eq!(summary.fetched, 1);
}

#[tokio::test]
async fn test_each_url_fetched_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"<a href="/p">P</a> <a href="p">P again</a> <a href="/q">Q</a>"#,
    )
    .await;
    mount_page(&server, "/q", r#"<a href="/p">P</a> <a href="/q">Q</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/p"))
        .respond_with(html(r#"<a href="/q">Q</a>"#))
        .expect(1)
        .mount(&server)
        .await;

    let (summary, reached, _broken) = run_session(&base, 5).await;

    assert_eq!(
        urls_and_depths(&reached),
        vec![
            (base.clone(), 0),
            (format!("{}/p", base), 1),
            (format!("{}/q", base), 1)
        ]
    );
    assert_eq!(summary.fetched, 3);
}

#[tokio::test]
async fn test_links_resolve_against_home_page() {
    let server = MockServer::start().await;
    let base = server.uri();

    // A relative link on a nested page still resolves from the site root
    mount_page(&server, "/", r#"<a href="/docs/guide">Guide</a>"#).await;
    mount_page(&server, "/docs/guide", r#"<a href="intro">Intro</a>"#).await;
    mount_page(&server, "/intro", "Intro").await;
    Mock::given(method("GET"))
        .and(path("/docs/intro"))
        .respond_with(html("not this one"))
        .expect(0)
        .mount(&server)
        .await;

    let (_summary, reached, _broken) = run_session(&base, 5).await;

    assert_eq!(
        urls_and_depths(&reached),
        vec![
            (base.clone(), 0),
            (format!("{}/docs/guide", base), 1),
            (format!("{}/intro", base), 2)
        ]
    );
}

#[tokio::test]
async fn test_redirect_off_site_is_reached_but_not_followed() {
    let site = MockServer::start().await;
    let other = MockServer::start().await;
    let base = site.uri();

    mount_page(&site, "/", r#"<a href="/out">Out</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/out"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", format!("{}/landing", other.uri())),
        )
        .mount(&site)
        .await;
    mount_page(&other, "/landing", r#"<a href="/next">Next</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(html("next"))
        .expect(0)
        .mount(&other)
        .await;

    let (summary, reached, broken) = run_session(&base, 5).await;

    let mut expected = vec![
        (base.clone(), 0),
        (format!("{}/landing", other.uri()), 1),
    ];
    expected.sort();
    assert_eq!(urls_and_depths(&reached), expected);
    assert!(broken.is_empty());
    assert_eq!(summary.reached, 2);
}

#[tokio::test]
async fn test_non_html_body_yields_no_links() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"links": ["/a", "/b"]}"#)
                .insert_header("content-type", "application/json"),
        )
        .mount(&server)
        .await;

    let (summary, reached, broken) = run_session(&base, 5).await;

    assert_eq!(urls_and_depths(&reached), vec![(base, 0)]);
    assert!(broken.is_empty());
    assert_eq!(summary.fetched, 1);
}

#[tokio::test]
async fn test_unreachable_seed_is_broken() {
    // Bind then drop a listener to get a port nothing listens on
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let seed = format!("http://127.0.0.1:{}", port);

    let (summary, reached, broken) = run_session(&seed, 5).await;

    assert!(reached.is_empty());
    assert_eq!(broken.len(), 1);
    assert_eq!(broken[0].url, seed);
    assert_eq!(summary.fetched, 1);
}
