//! Integration tests for the harvester
//!
//! These tests use wiremock to stand in for the search endpoint and the
//! image hosts, and tempfile for output directories, so full runs can be
//! exercised end-to-end.

use image_seine::config::Config;
use image_seine::crawler::crawl;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a config pointing at the mock server with instant pagination
fn test_config(server: &MockServer, out: &TempDir, max_per_keyword: u32) -> Config {
    let mut config = Config::default();
    config.search.endpoint = format!("{}/images/search", server.uri());
    config.crawl.max_per_keyword = max_per_keyword;
    config.crawl.delay_min_secs = 0.0;
    config.crawl.delay_max_secs = 0.0;
    config.crawl.timeout_secs = 5;
    config.output.image_root = out.path().join("images").display().to_string();
    config.output.metadata_path = out.path().join("metadata.csv").display().to_string();
    config
}

/// One result anchor whose image and source page live on the mock server
fn result_anchor(server: &MockServer, image_path: &str) -> String {
    format!(
        r#"<a class="iusc" m='{{"murl":"{base}{img}","purl":"{base}/page{img}","turl":"{base}/t{img}","t":"title"}}'>r</a>"#,
        base = server.uri(),
        img = image_path,
    )
}

fn results_page(anchors: &[String]) -> String {
    format!("<html><body>{}</body></html>", anchors.join("\n"))
}

const EMPTY_PAGE: &str = "<html><body>no results</body></html>";

async fn mount_search_page(server: &MockServer, keyword: &str, first: usize, body: String) {
    Mock::given(method("GET"))
        .and(path("/images/search"))
        .and(query_param("q", keyword))
        .and(query_param("first", first.to_string().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_image(server: &MockServer, image_path: &str, bytes: &[u8]) {
    Mock::given(method("GET"))
        .and(path(image_path))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes.to_vec()))
        .mount(server)
        .await;
}

fn read_metadata_rows(metadata_path: &str) -> Vec<Vec<String>> {
    let mut reader = csv::Reader::from_path(metadata_path).expect("metadata file should exist");
    reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect()
}

fn list_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("keyword directory should exist")
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_full_run_single_keyword() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    let page = results_page(&[
        result_anchor(&server, "/img/1.png"),
        result_anchor(&server, "/img/2.jpg"),
    ]);
    mount_search_page(&server, "cat", 0, page).await;
    mount_search_page(&server, "cat", 2, EMPTY_PAGE.to_string()).await;
    mount_image(&server, "/img/1.png", b"png bytes one").await;
    mount_image(&server, "/img/2.jpg", b"jpg bytes two").await;

    let config = test_config(&server, &out, 5);
    let image_root = config.output.image_root.clone();
    let metadata_path = config.output.metadata_path.clone();

    let summary = crawl(config, &["cat".to_string()]).await.unwrap();
    assert_eq!(summary.keywords, 1);
    assert_eq!(summary.keywords_aborted, 0);
    assert_eq!(summary.images_accepted, 2);

    let files = list_files(&Path::new(&image_root).join("cat"));
    assert_eq!(files, vec!["cat_0001.png", "cat_0002.jpg"]);

    let rows = read_metadata_rows(&metadata_path);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], "cat");
    assert!(rows[0][1].ends_with("cat_0001.png"));
    assert!(rows[0][2].ends_with("/img/1.png"));
    assert!(rows[0][3].ends_with("/page/img/1.png"));
    assert_eq!(rows[0][4], "127.0.0.1");
}

#[tokio::test]
async fn test_duplicates_late_in_page_never_reached_under_quota() {
    // Spec scenario: 5 candidates, 2 and 4 byte-identical, max 3. The quota
    // fills from candidates 1-3, so exactly one of {2, 4} is recorded.
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    let page = results_page(&[
        result_anchor(&server, "/img/a.jpg"),
        result_anchor(&server, "/img/b.jpg"),
        result_anchor(&server, "/img/c.jpg"),
        result_anchor(&server, "/img/d.jpg"),
        result_anchor(&server, "/img/e.jpg"),
    ]);
    mount_search_page(&server, "cat", 0, page).await;
    mount_image(&server, "/img/a.jpg", b"content a").await;
    mount_image(&server, "/img/b.jpg", b"twin content").await;
    mount_image(&server, "/img/c.jpg", b"content c").await;
    mount_image(&server, "/img/d.jpg", b"twin content").await;
    mount_image(&server, "/img/e.jpg", b"content e").await;

    let config = test_config(&server, &out, 3);
    let image_root = config.output.image_root.clone();
    let metadata_path = config.output.metadata_path.clone();

    let summary = crawl(config, &["cat".to_string()]).await.unwrap();
    assert_eq!(summary.images_accepted, 3);

    let files = list_files(&Path::new(&image_root).join("cat"));
    assert_eq!(files, vec!["cat_0001.jpg", "cat_0002.jpg", "cat_0003.jpg"]);

    let rows = read_metadata_rows(&metadata_path);
    assert_eq!(rows.len(), 3);
    let twins: Vec<_> = rows
        .iter()
        .filter(|r| r[2].ends_with("/img/b.jpg") || r[2].ends_with("/img/d.jpg"))
        .collect();
    assert_eq!(twins.len(), 1);
}

#[tokio::test]
async fn test_duplicate_removed_and_sequence_stays_gapless() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    // Candidate 2 duplicates candidate 1, so acceptance falls to 1, 3, 4.
    let page = results_page(&[
        result_anchor(&server, "/img/a.jpg"),
        result_anchor(&server, "/img/a-again.jpg"),
        result_anchor(&server, "/img/b.jpg"),
        result_anchor(&server, "/img/c.jpg"),
    ]);
    mount_search_page(&server, "cat", 0, page).await;
    mount_image(&server, "/img/a.jpg", b"same bytes").await;
    mount_image(&server, "/img/a-again.jpg", b"same bytes").await;
    mount_image(&server, "/img/b.jpg", b"other bytes").await;
    mount_image(&server, "/img/c.jpg", b"third bytes").await;

    let config = test_config(&server, &out, 3);
    let image_root = config.output.image_root.clone();
    let metadata_path = config.output.metadata_path.clone();

    let summary = crawl(config, &["cat".to_string()]).await.unwrap();
    assert_eq!(summary.images_accepted, 3);

    // No gaps, no leftover file from the removed duplicate
    let files = list_files(&Path::new(&image_root).join("cat"));
    assert_eq!(files, vec!["cat_0001.jpg", "cat_0002.jpg", "cat_0003.jpg"]);

    let rows = read_metadata_rows(&metadata_path);
    assert!(rows.iter().all(|r| !r[2].ends_with("/img/a-again.jpg")));
}

#[tokio::test]
async fn test_dedup_is_global_across_keywords() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_search_page(
        &server,
        "cat",
        0,
        results_page(&[result_anchor(&server, "/img/shared.jpg")]),
    )
    .await;
    mount_search_page(&server, "cat", 1, EMPTY_PAGE.to_string()).await;
    mount_search_page(
        &server,
        "dog",
        0,
        results_page(&[
            result_anchor(&server, "/img/shared-copy.jpg"),
            result_anchor(&server, "/img/dog.jpg"),
        ]),
    )
    .await;
    mount_search_page(&server, "dog", 2, EMPTY_PAGE.to_string()).await;

    mount_image(&server, "/img/shared.jpg", b"shared bytes").await;
    mount_image(&server, "/img/shared-copy.jpg", b"shared bytes").await;
    mount_image(&server, "/img/dog.jpg", b"dog bytes").await;

    let config = test_config(&server, &out, 5);
    let metadata_path = config.output.metadata_path.clone();

    let summary = crawl(config, &["cat".to_string(), "dog".to_string()])
        .await
        .unwrap();
    assert_eq!(summary.images_accepted, 2);

    let rows = read_metadata_rows(&metadata_path);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], "cat");
    assert_eq!(rows[1][0], "dog");
    assert!(rows[1][2].ends_with("/img/dog.jpg"));
}

#[tokio::test]
async fn test_empty_results_page_ends_keyword_immediately() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_search_page(&server, "cat", 0, EMPTY_PAGE.to_string()).await;

    let config = test_config(&server, &out, 5);
    let metadata_path = config.output.metadata_path.clone();

    let summary = crawl(config, &["cat".to_string()]).await.unwrap();
    assert_eq!(summary.keywords, 1);
    assert_eq!(summary.keywords_aborted, 0);
    assert_eq!(summary.images_accepted, 0);

    let rows = read_metadata_rows(&metadata_path);
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_unrecognized_extension_defaults_to_jpg() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_search_page(
        &server,
        "cat",
        0,
        results_page(&[result_anchor(&server, "/img/noext")]),
    )
    .await;
    mount_search_page(&server, "cat", 1, EMPTY_PAGE.to_string()).await;
    mount_image(&server, "/img/noext", b"mystery bytes").await;

    let config = test_config(&server, &out, 5);
    let image_root = config.output.image_root.clone();

    crawl(config, &["cat".to_string()]).await.unwrap();

    let files = list_files(&Path::new(&image_root).join("cat"));
    assert_eq!(files, vec!["cat_0001.jpg"]);
}

#[tokio::test]
async fn test_failed_download_skips_candidate_without_consuming_quota() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    let page = results_page(&[
        result_anchor(&server, "/img/ok1.png"),
        result_anchor(&server, "/img/missing.png"),
        result_anchor(&server, "/img/ok2.png"),
    ]);
    mount_search_page(&server, "cat", 0, page).await;
    mount_search_page(&server, "cat", 3, EMPTY_PAGE.to_string()).await;
    mount_image(&server, "/img/ok1.png", b"first ok").await;
    Mock::given(method("GET"))
        .and(path("/img/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_image(&server, "/img/ok2.png", b"second ok").await;

    let config = test_config(&server, &out, 5);
    let image_root = config.output.image_root.clone();
    let metadata_path = config.output.metadata_path.clone();

    let summary = crawl(config, &["cat".to_string()]).await.unwrap();
    assert_eq!(summary.images_accepted, 2);
    assert_eq!(summary.keywords_aborted, 0);

    // The failed candidate's sequence number was reused by the next one
    let files = list_files(&Path::new(&image_root).join("cat"));
    assert_eq!(files, vec!["cat_0001.png", "cat_0002.png"]);

    let rows = read_metadata_rows(&metadata_path);
    assert!(rows[1][2].ends_with("/img/ok2.png"));
}

#[tokio::test]
async fn test_page_fetch_failure_aborts_keyword_but_run_continues() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/images/search"))
        .and(query_param("q", "fail"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_search_page(
        &server,
        "cat",
        0,
        results_page(&[result_anchor(&server, "/img/1.jpg")]),
    )
    .await;
    mount_search_page(&server, "cat", 1, EMPTY_PAGE.to_string()).await;
    mount_image(&server, "/img/1.jpg", b"cat bytes").await;

    let config = test_config(&server, &out, 5);
    let metadata_path = config.output.metadata_path.clone();

    let summary = crawl(config, &["fail".to_string(), "cat".to_string()])
        .await
        .unwrap();
    assert_eq!(summary.keywords, 2);
    assert_eq!(summary.keywords_aborted, 1);
    assert_eq!(summary.images_accepted, 1);

    let rows = read_metadata_rows(&metadata_path);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "cat");
}

#[tokio::test]
async fn test_pagination_offset_advances_by_candidates_seen() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    // Page at first=0 yields 2 candidates (one a duplicate), so the next
    // request must use first=2 regardless of how many were accepted.
    let page0 = results_page(&[
        result_anchor(&server, "/img/a.jpg"),
        result_anchor(&server, "/img/a-twin.jpg"),
    ]);
    let page2 = results_page(&[result_anchor(&server, "/img/b.jpg")]);

    Mock::given(method("GET"))
        .and(path("/images/search"))
        .and(query_param("q", "cat"))
        .and(query_param("first", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page0))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/images/search"))
        .and(query_param("q", "cat"))
        .and(query_param("first", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page2))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/images/search"))
        .and(query_param("q", "cat"))
        .and(query_param("first", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(EMPTY_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    mount_image(&server, "/img/a.jpg", b"same").await;
    mount_image(&server, "/img/a-twin.jpg", b"same").await;
    mount_image(&server, "/img/b.jpg", b"different").await;

    let config = test_config(&server, &out, 5);
    let summary = crawl(config, &["cat".to_string()]).await.unwrap();
    assert_eq!(summary.images_accepted, 2);

    // Mock expectations (one request per offset) verified on drop
    server.verify().await;
}

#[tokio::test]
async fn test_quota_reached_on_first_page_stops_pagination() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    let page = results_page(&[
        result_anchor(&server, "/img/1.jpg"),
        result_anchor(&server, "/img/2.jpg"),
        result_anchor(&server, "/img/3.jpg"),
    ]);
    Mock::given(method("GET"))
        .and(path("/images/search"))
        .and(query_param("q", "cat"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .expect(1)
        .mount(&server)
        .await;
    mount_image(&server, "/img/1.jpg", b"one").await;
    mount_image(&server, "/img/2.jpg", b"two").await;
    mount_image(&server, "/img/3.jpg", b"three").await;

    let config = test_config(&server, &out, 2);
    let image_root = config.output.image_root.clone();

    let summary = crawl(config, &["cat".to_string()]).await.unwrap();
    assert_eq!(summary.images_accepted, 2);

    let files = list_files(&Path::new(&image_root).join("cat"));
    assert_eq!(files, vec!["cat_0001.jpg", "cat_0002.jpg"]);

    server.verify().await;
}

#[tokio::test]
async fn test_keyword_with_spaces_maps_to_underscored_directory() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    mount_search_page(
        &server,
        "red panda",
        0,
        results_page(&[result_anchor(&server, "/img/rp.jpg")]),
    )
    .await;
    mount_search_page(&server, "red panda", 1, EMPTY_PAGE.to_string()).await;
    mount_image(&server, "/img/rp.jpg", b"red panda bytes").await;

    let config = test_config(&server, &out, 5);
    let image_root = config.output.image_root.clone();

    crawl(config, &["red panda".to_string()]).await.unwrap();

    let files = list_files(&Path::new(&image_root).join("red_panda"));
    assert_eq!(files, vec!["red_panda_0001.jpg"]);
}
