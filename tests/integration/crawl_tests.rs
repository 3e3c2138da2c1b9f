//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use page_harvest::config::{Config, CrawlerConfig, HttpConfig, OutputFormat};
use page_harvest::output::{store_records, DirectorySink, MemorySink};
use page_harvest::{CrawlConfig, CrawlEngine, PageRecord};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html_page(title: &str, body: &str) -> String {
    format!(
        "<html><head><title>{}</title></head><body><main>{}</main></body></html>",
        title, body
    )
}

async fn mount_html(server: &MockServer, route: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html"))
        .mount(server)
        .await;
}

fn test_engine(seed: &str) -> CrawlEngine {
    let config = Config {
        crawler: CrawlerConfig {
            seed_url: Some(seed.to_string()),
            root_domain: Some("127.0.0.1".to_string()),
            ..CrawlerConfig::default()
        },
        http: HttpConfig {
            timeout_secs: 5,
            ..HttpConfig::default()
        },
        ..Config::default()
    };
    CrawlEngine::from_config(&config).expect("Failed to build engine")
}

async fn crawl_all(server: &MockServer, max_depth: u32) -> Vec<PageRecord> {
    let seed = format!("{}/", server.uri());
    let crawl = CrawlConfig::new(&seed, "127.0.0.1", max_depth).expect("Invalid crawl config");

    let mut handle = test_engine(&seed).crawl(crawl);
    let mut records = Vec::new();
    while let Some(record) = handle.next().await {
        records.push(record);
    }
    handle.finish().await.expect("Crawl task panicked");
    records
}

async fn mount_site(server: &MockServer) {
    mount_html(
        server,
        "/",
        html_page(
            "Home",
            r#"<h1>Admissions</h1>
            <p>Welcome to <a href="/apply">our university</a>.</p>
            <a href="/apply">Apply</a>
            <a href="/tuition#fees">Tuition</a>
            <a href="https://example.org/elsewhere">Partner</a>"#,
        ),
    )
    .await;
    mount_html(
        server,
        "/apply",
        html_page(
            "Apply",
            r#"<h2>How to apply</h2><ul><li>Submit transcripts</li></ul>
            <a href="/apply/deadlines">Deadlines</a>"#,
        ),
    )
    .await;
    mount_html(
        server,
        "/tuition",
        html_page("Tuition", "<p>Tuition is listed per semester.</p>"),
    )
    .await;
    mount_html(
        server,
        "/apply/deadlines",
        html_page("Deadlines", "<p>Applications close in January.</p>"),
    )
    .await;
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let base = server.uri();

    let records = crawl_all(&server, 2).await;
    let urls: Vec<_> = records.iter().map(|r| r.url.clone()).collect();

    assert_eq!(
        urls,
        vec![
            format!("{}/", base),
            format!("{}/apply", base),
            format!("{}/tuition", base),
            format!("{}/apply/deadlines", base),
        ]
    );

    let home = &records[0];
    assert_eq!(home.title, "Home");
    assert_eq!(home.depth, 0);
    assert!(home.text.contains("Admissions"));
    assert!(home.text.contains("our university"));
    assert!(!home.text.contains("](/apply)"));

    let apply = &records[1];
    assert_eq!(apply.depth, 1);
    assert!(apply.text.contains("How to apply"));
    assert!(apply.text.contains("Submit transcripts"));

    assert_eq!(records[3].depth, 2);
}

#[tokio::test]
async fn test_depth_limit() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let records = crawl_all(&server, 1).await;

    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.depth <= 1));
    assert!(!records.iter().any(|r| r.url.ends_with("/apply/deadlines")));
}

#[tokio::test]
async fn test_failed_page_does_not_stop_crawl() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/",
        html_page(
            "Home",
            r#"<a href="/one">One</a><a href="/broken">Broken</a><a href="/three">Three</a>"#,
        ),
    )
    .await;
    mount_html(&server, "/one", html_page("One", "<p>first</p>")).await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_html(&server, "/three", html_page("Three", "<p>third</p>")).await;

    let records = crawl_all(&server, 1).await;
    let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();

    assert_eq!(titles, vec!["Home", "One", "Three"]);
}

#[tokio::test]
async fn test_off_site_links_are_not_requested() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    crawl_all(&server, 3).await;

    let requests = server.received_requests().await.unwrap_or_default();
    let mut paths: Vec<_> = requests.iter().map(|r| r.url.path().to_string()).collect();
    paths.sort();

    assert_eq!(paths, vec!["/", "/apply", "/apply/deadlines", "/tuition"]);
}

#[tokio::test]
async fn test_non_html_response_is_skipped() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/",
        html_page(
            "Home",
            r#"<a href="/brochure.pdf">Brochure</a><a href="/visit">Visit</a>"#,
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/brochure.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"))
        .mount(&server)
        .await;
    mount_html(&server, "/visit", html_page("Visit", "<p>Campus tours</p>")).await;

    let records = crawl_all(&server, 1).await;
    let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();

    assert_eq!(titles, vec!["Home", "Visit"]);
}

#[tokio::test]
async fn test_records_stored_as_json() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let output = TempDir::new().unwrap();

    let seed = format!("{}/", server.uri());
    let crawl = CrawlConfig::new(&seed, "127.0.0.1", 1).unwrap();
    let mut sink = DirectorySink::new(output.path(), OutputFormat::Json).unwrap();

    let mut handle = test_engine(&seed).crawl(crawl);
    let summary = store_records(&mut handle, &mut sink).await;
    let stats = handle.finish().await.unwrap();

    assert_eq!(summary.stored, 3);
    assert_eq!(summary.failed, 0);
    assert_eq!(stats.pages_emitted, 3);

    let home_path = sink.path_for(&seed);
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(home_path).unwrap()).unwrap();
    assert_eq!(value["title"], "Home");
    assert_eq!(value["depth"], 0);
    assert_eq!(value["url"], seed);
}

#[tokio::test]
async fn test_memory_sink_collects_in_order() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let seed = format!("{}/", server.uri());
    let crawl = CrawlConfig::new(&seed, "127.0.0.1", 2).unwrap();
    let mut sink = MemorySink::default();

    let mut handle = test_engine(&seed).with_workers(4).crawl(crawl);
    store_records(&mut handle, &mut sink).await;
    handle.finish().await.unwrap();

    let depths: Vec<_> = sink.records.iter().map(|r| r.depth).collect();
    assert_eq!(depths, vec![0, 1, 1, 2]);
}
