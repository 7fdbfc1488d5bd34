//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for both the crawled site and the
//! Tika server, and run the full fetch, extract, store and search cycle
//! against an on-disk store.

use crawldex::config::{ExtractorConfig, FetcherConfig};
use crawldex::crawler::{CrawlContext, HttpFetcher, Spider, TaskRegistry, TikaExtractor};
use crawldex::storage::{DocumentStore, SqliteStore, TaskStatus};
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts an HTML page on the mock site
async fn mount_page(server: &MockServer, page: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Mounts a Tika answer for documents containing `marker`
async fn mount_extraction(tika: &MockServer, marker: &str, text: &str, calls: u64) {
    Mock::given(method("PUT"))
        .and(path("/tika"))
        .and(body_string_contains(marker))
        .respond_with(ResponseTemplate::new(200).set_body_string(text))
        .expect(calls)
        .mount(tika)
        .await;
}

/// Site layout:
///
/// ```text
/// /       -> /b, c, mailto, http://other.com
/// /b      -> d (relative, so /b/d), /c (already seen), / (normalizes to nothing)
/// /c      -> /gone (404)
/// /b/d    -> nothing
/// ```
async fn mount_site(site: &MockServer) {
    mount_page(
        site,
        "/",
        r#"<html><body><p>alpha home</p>
        <a href="/b">B</a>
        <a href="c">C</a>
        <a href="mailto:owner@site.com">Mail</a>
        <a href="http://other.com/">Other</a>
        </body></html>"#,
    )
    .await;
    mount_page(
        site,
        "/b",
        r#"<html><body><p>bravo section</p>
        <a href="d">D</a><a href="/c">C again</a><a href="/">Home</a>
        </body></html>"#,
    )
    .await;
    mount_page(
        site,
        "/c",
        r#"<html><body><p>charlie notes</p><a href="/gone">Gone</a></body></html>"#,
    )
    .await;
    mount_page(site, "/b/d", "<html><body><p>delta appendix</p></body></html>").await;
}

struct Harness {
    store: Arc<SqliteStore>,
    context: CrawlContext,
    fqdn: String,
    _dir: TempDir,
}

fn harness(site: &MockServer, tika: &MockServer) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SqliteStore::open(&dir.path().join("crawldex.db")).unwrap());
    store.build_index().unwrap();

    let fetcher = HttpFetcher::new(&FetcherConfig {
        scheme: "http".to_string(),
        user_agent: "TestBot/1.0".to_string(),
        timeout_secs: 5,
        connect_timeout_secs: 2,
    })
    .unwrap();
    let extractor = TikaExtractor::new(&ExtractorConfig {
        url: tika.uri(),
        timeout_secs: 5,
    })
    .unwrap();

    let context = CrawlContext::new(Arc::new(fetcher), Arc::new(extractor), store.clone());

    Harness {
        store,
        context,
        fqdn: site.address().to_string(),
        _dir: dir,
    }
}

#[tokio::test]
async fn test_full_crawl_indexes_and_searches() {
    let site = MockServer::start().await;
    let tika = MockServer::start().await;
    mount_site(&site).await;
    mount_extraction(&tika, "alpha", "alpha home", 1).await;
    mount_extraction(&tika, "bravo", "bravo section", 1).await;
    mount_extraction(&tika, "charlie", "charlie notes", 1).await;
    mount_extraction(&tika, "delta", "delta appendix", 1).await;

    let h = harness(&site, &tika);
    let outcome = Spider::new(h.fqdn.clone(), h.context.clone()).crawl().await;

    assert_eq!(outcome.stats.indexed, 4);
    assert_eq!(outcome.stats.errors, 1);
    assert_eq!(outcome.visited, 4);

    let root = h.store.document(&h.fqdn).unwrap().unwrap();
    assert_eq!(root.text, "alpha home");
    assert_eq!(root.hash.len(), 64);

    assert_eq!(
        h.store.search("bravo").unwrap(),
        vec![format!("{}/b", h.fqdn)]
    );
    assert_eq!(
        h.store.search("appendix").unwrap(),
        vec![format!("{}/b/d", h.fqdn)]
    );
    assert!(h.store.search("nowhere").unwrap().is_empty());
}

#[tokio::test]
async fn test_recrawl_unchanged_site_skips_extraction() {
    let site = MockServer::start().await;
    let tika = MockServer::start().await;
    mount_site(&site).await;
    // One extraction per document across both runs
    for marker in ["alpha", "bravo", "charlie", "delta"] {
        mount_extraction(&tika, marker, marker, 1).await;
    }

    let h = harness(&site, &tika);
    let first = Spider::new(h.fqdn.clone(), h.context.clone()).crawl().await;
    let second = Spider::new(h.fqdn.clone(), h.context.clone()).crawl().await;

    assert_eq!(first.stats.indexed, 4);
    assert_eq!(second.stats.indexed, 0);
    assert_eq!(second.stats.errors, 1);
    assert_eq!(second.visited, 4);
    assert_eq!(second.iterations, first.iterations);
}

#[tokio::test]
async fn test_extraction_outage_is_counted() {
    let site = MockServer::start().await;
    let tika = MockServer::start().await;
    mount_page(&site, "/", r#"<p>alpha</p><a href="/b">B</a>"#).await;
    mount_page(&site, "/b", "<p>bravo</p>").await;
    Mock::given(method("PUT"))
        .and(path("/tika"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&tika)
        .await;

    let h = harness(&site, &tika);
    let outcome = Spider::new(h.fqdn.clone(), h.context.clone()).crawl().await;

    // The root fails before its links are read, so /b is never reached
    assert_eq!(outcome.stats.indexed, 0);
    assert_eq!(outcome.stats.errors, 1);
    assert!(h.store.document(&h.fqdn).unwrap().is_none());
}

#[tokio::test]
async fn test_launched_task_reports_completion() {
    let site = MockServer::start().await;
    let tika = MockServer::start().await;
    mount_site(&site).await;
    Mock::given(method("PUT"))
        .and(path("/tika"))
        .respond_with(ResponseTemplate::new(200).set_body_string("text"))
        .mount(&tika)
        .await;

    let h = harness(&site, &tika);
    let registry = TaskRegistry::new(h.context.clone(), 2);

    let task_id = registry.launch(&h.fqdn).unwrap();
    registry.join_all().await;

    let task = h.store.task(&task_id).unwrap().unwrap();
    assert_eq!(task.status, TaskStatus::Complete);
    let stats = task.stats.unwrap();
    assert_eq!(stats.indexed, 4);
    assert_eq!(stats.errors, 1);

    let ttl = h.store.ttl(&format!("taskID:{}", task_id)).unwrap().unwrap();
    assert!(ttl > 60 * 60 * 23 && ttl <= 60 * 60 * 24);
}
