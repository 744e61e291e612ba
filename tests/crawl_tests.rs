//! End-to-end crawl tests
//!
//! These tests run the full crawl pipeline against wiremock HTTP servers and
//! assert on the resulting index.

use driftnet::config::{Config, CrawlerConfig, ScopeConfig, StorageConfig, UserAgentConfig};
use driftnet::crawler::crawl;
use driftnet::search::search;
use driftnet::storage::{open_store, IndexStore};
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling the given seeds within scope
fn create_test_config(seeds: Vec<String>, allow: Vec<String>, db_path: &str) -> Config {
    Config {
        seeds,
        crawler: CrawlerConfig {
            workers: 3,
            max_pages: 100,
            politeness_floor_ms: 100, // Very short for testing
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        storage: StorageConfig {
            database_path: db_path.to_string(),
        },
        scope: ScopeConfig { allow },
    }
}

/// Returns a temp directory and a database path inside it
fn temp_db() -> (TempDir, String) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path: PathBuf = dir.path().join("index.db");
    let path = path.to_str().unwrap().to_string();
    (dir, path)
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_html(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            // set_body_raw honors the explicit mime; set_body_string would
            // force text/plain and override the content-type header below
            ResponseTemplate::new(200).set_body_raw(body.into_bytes(), "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_and_index() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let host = url::Url::parse(&base_url).unwrap().host_str().unwrap().to_string();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;

    mount_html(
        &mock_server,
        "/",
        format!(
            r#"<html><head><title>Home</title>
            <meta name="description" content="the landing page"></head><body>
            <p>harbor harbor harbor</p>
            <a href="{}/page1">Page 1</a>
            <a href="{}/page2">Page 2</a>
            </body></html>"#,
            base_url, base_url
        ),
    )
    .await;

    mount_html(
        &mock_server,
        "/page1",
        r#"<html><head><title>Page 1</title></head>
           <body>ocean ocean ocean waves</body></html>"#
            .to_string(),
    )
    .await;

    mount_html(
        &mock_server,
        "/page2",
        r#"<html><head><title>Page 2</title></head>
           <body>ocean river river</body></html>"#
            .to_string(),
    )
    .await;

    let (_dir, db_path) = temp_db();
    let config = create_test_config(vec![format!("{}/", base_url)], vec![host], &db_path);

    let report = crawl(config).await.expect("Crawl failed");

    assert_eq!(report.pages_visited, 3);
    assert_eq!(report.pages_indexed, 3);

    let store = open_store(std::path::Path::new(&db_path)).expect("Failed to open store");
    assert_eq!(store.count_pages().unwrap(), 3);

    let home = store
        .get_page_by_url(&format!("{}/", base_url))
        .unwrap()
        .expect("seed page should be indexed");
    assert_eq!(home.title.as_deref(), Some("Home"));
    assert_eq!(home.description.as_deref(), Some("the landing page"));
    assert!(home.content.contains("harbor"));

    // The index is queryable: page1 has more "ocean" than page2
    let results = search(&store, "ocean", 10).unwrap();
    assert_eq!(results.len(), 2);
    assert!(results[0].url.ends_with("/page1"));
    assert!(results[1].url.ends_with("/page2"));
}

#[tokio::test]
async fn test_out_of_scope_link_never_visited() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let host = url::Url::parse(&base_url).unwrap().host_str().unwrap().to_string();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;

    // Seed links to two in-scope pages and one out-of-scope host
    mount_html(
        &mock_server,
        "/",
        format!(
            r#"<html><body>
            <a href="{}/page1">One</a>
            <a href="{}/page2">Two</a>
            <a href="https://elsewhere.invalid/offsite">Offsite</a>
            </body></html>"#,
            base_url, base_url
        ),
    )
    .await;

    mount_html(&mock_server, "/page1", "<html><body>alpha</body></html>".to_string()).await;
    mount_html(&mock_server, "/page2", "<html><body>beta</body></html>".to_string()).await;

    let (_dir, db_path) = temp_db();
    let config = create_test_config(vec![format!("{}/", base_url)], vec![host], &db_path);

    let report = crawl(config).await.expect("Crawl failed");

    // Visited set is exactly the seed plus the two in-scope links
    assert_eq!(report.pages_visited, 3);

    let store = open_store(std::path::Path::new(&db_path)).unwrap();
    assert_eq!(store.count_pages().unwrap(), 3);
    assert!(store
        .get_page_by_url("https://elsewhere.invalid/offsite")
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_robots_disallowed_seed_indexes_nothing() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let host = url::Url::parse(&base_url).unwrap().host_str().unwrap().to_string();

    mount_robots(&mock_server, "User-agent: *\nDisallow: /").await;

    // The page itself must never be fetched
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><a href=\"/next\">next</a></body></html>")
                .insert_header("content-type", "text/html"),
        )
        .expect(0)
        .mount(&mock_server)
        .await;

    let (_dir, db_path) = temp_db();
    let config = create_test_config(vec![format!("{}/", base_url)], vec![host], &db_path);

    let report = crawl(config).await.expect("Crawl failed");

    assert_eq!(report.pages_visited, 1);
    assert_eq!(report.pages_indexed, 0);

    let store = open_store(std::path::Path::new(&db_path)).unwrap();
    assert_eq!(store.count_pages().unwrap(), 0);
}

#[tokio::test]
async fn test_non_html_content_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let host = url::Url::parse(&base_url).unwrap().host_str().unwrap().to_string();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;

    mount_html(
        &mock_server,
        "/",
        format!(
            r#"<html><body>report text<a href="{}/report.pdf">PDF</a></body></html>"#,
            base_url
        ),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0x25, 0x50, 0x44, 0x46]) // %PDF
                .insert_header("content-type", "application/pdf"),
        )
        .mount(&mock_server)
        .await;

    let (_dir, db_path) = temp_db();
    let config = create_test_config(vec![format!("{}/", base_url)], vec![host], &db_path);

    let report = crawl(config).await.expect("Crawl failed");

    // The PDF is visited but never indexed
    assert_eq!(report.pages_visited, 2);
    assert_eq!(report.pages_indexed, 1);

    let store = open_store(std::path::Path::new(&db_path)).unwrap();
    assert_eq!(store.count_pages().unwrap(), 1);
    assert!(store
        .get_page_by_url(&format!("{}/report.pdf", base_url))
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_max_pages_budget_caps_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let host = url::Url::parse(&base_url).unwrap().host_str().unwrap().to_string();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;

    let links: String = (0..10)
        .map(|n| format!(r#"<a href="{}/p{}">link</a>"#, base_url, n))
        .collect();
    mount_html(
        &mock_server,
        "/",
        format!("<html><body>{}</body></html>", links),
    )
    .await;

    for n in 0..10 {
        mount_html(
            &mock_server,
            &format!("/p{}", n),
            "<html><body>leaf page</body></html>".to_string(),
        )
        .await;
    }

    let (_dir, db_path) = temp_db();
    let mut config = create_test_config(vec![format!("{}/", base_url)], vec![host], &db_path);
    config.crawler.max_pages = 3;

    let report = crawl(config).await.expect("Crawl failed");

    // Seed plus exactly two admitted links, regardless of how many exist
    assert_eq!(report.pages_visited, 3);

    let store = open_store(std::path::Path::new(&db_path)).unwrap();
    assert_eq!(store.count_pages().unwrap(), 3);
}

#[tokio::test]
async fn test_recrawl_updates_pages_in_place() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let host = url::Url::parse(&base_url).unwrap().host_str().unwrap().to_string();

    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_html(
        &mock_server,
        "/",
        "<html><head><title>Only</title></head><body>stable content</body></html>".to_string(),
    )
    .await;

    let (_dir, db_path) = temp_db();
    let config = create_test_config(
        vec![format!("{}/", base_url)],
        vec![host.clone()],
        &db_path,
    );

    crawl(config.clone()).await.expect("First crawl failed");
    crawl(config).await.expect("Second crawl failed");

    // Re-crawling the same URL updates in place rather than duplicating
    let store = open_store(std::path::Path::new(&db_path)).unwrap();
    assert_eq!(store.count_pages().unwrap(), 1);

    let stats = store.stats().unwrap();
    let results = search(&store, "stable content", 10).unwrap();
    assert_eq!(results.len(), 1);
    assert!(stats.postings >= 2);
}

#[tokio::test]
async fn test_crawl_delay_directive_is_read() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let host = url::Url::parse(&base_url).unwrap().host_str().unwrap().to_string();

    // Sub-second delay so the test stays fast; the directive still exceeds
    // the configured floor and must be honored between items
    mount_robots(&mock_server, "User-agent: *\nCrawl-delay: 0.3\nAllow: /").await;
    mount_html(
        &mock_server,
        "/",
        "<html><body>timed page</body></html>".to_string(),
    )
    .await;

    let (_dir, db_path) = temp_db();
    let config = create_test_config(vec![format!("{}/", base_url)], vec![host], &db_path);

    let started = std::time::Instant::now();
    let report = crawl(config).await.expect("Crawl failed");
    let elapsed = started.elapsed();

    assert_eq!(report.pages_indexed, 1);
    // One processed item sleeps max(100ms floor, 300ms directive)
    assert!(elapsed >= std::time::Duration::from_millis(300));
}
