//! Integration tests for the batch change-detection run

use urlmon::{parse_batch_lines, run_batch, Fingerprinter, HttpChecker, StateStore};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn full_checker() -> HttpChecker {
    HttpChecker::new().with_fingerprinter(Fingerprinter::full())
}

#[tokio::test]
async fn test_unchanged_content_reports_nothing() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("stable content"))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = StateStore::new(dir.path().join("previous_states.json"));
    let checker = full_checker();
    let url = format!("{}/page", mock_server.uri());
    let entries = parse_batch_lines(&url).unwrap();

    // First run: URL is new, never reported as changed
    let first = run_batch(&checker, &store, &entries).await.unwrap();
    assert!(first.changed.is_empty());
    assert_eq!(
        first.current.get(&url).map(String::as_str),
        Some(Fingerprinter::full().digest(b"stable content").as_str())
    );

    // Second run with identical content: still nothing
    let second = run_batch(&checker, &store, &entries).await.unwrap();
    assert!(second.changed.is_empty());
    assert_eq!(second.report_line(), "");
}

#[tokio::test]
async fn test_changed_content_is_reported_once() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("version one"))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = StateStore::new(dir.path().join("previous_states.json"));
    let checker = full_checker();
    let url = format!("{}/page", mock_server.uri());
    let entries = parse_batch_lines(&url).unwrap();

    run_batch(&checker, &store, &entries).await.unwrap();

    // Swap the content
    mock_server.reset().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("version two"))
        .mount(&mock_server)
        .await;

    let changed_run = run_batch(&checker, &store, &entries).await.unwrap();
    assert_eq!(changed_run.changed, vec![url.clone()]);
    assert_eq!(changed_run.report_line(), url);

    // And once recorded, the new fingerprint is the baseline
    let settled = run_batch(&checker, &store, &entries).await.unwrap();
    assert!(settled.changed.is_empty());
}

#[tokio::test]
async fn test_error_status_body_is_still_hashed() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = StateStore::new(dir.path().join("previous_states.json"));
    let url = format!("{}/flaky", mock_server.uri());
    let entries = parse_batch_lines(&url).unwrap();

    // The batch form hashes whatever body came back, status included
    let report = run_batch(&full_checker(), &store, &entries).await.unwrap();
    assert_eq!(
        report.current.get(&url).map(String::as_str),
        Some(Fingerprinter::full().digest(b"not here").as_str())
    );
    assert!(report.failed.is_empty());
}

#[tokio::test]
async fn test_failed_fetch_keeps_previous_fingerprint() {
    let dir = tempfile::tempdir().unwrap();
    let store = StateStore::new(dir.path().join("previous_states.json"));

    let url = "http://127.0.0.1:1/".to_string();
    let mut previous = std::collections::BTreeMap::new();
    previous.insert(url.clone(), "deadbeef".to_string());
    store.save(&previous).unwrap();

    let entries = parse_batch_lines(&url).unwrap();
    let report = run_batch(&full_checker(), &store, &entries).await.unwrap();

    assert!(report.changed.is_empty());
    assert_eq!(report.failed, vec![url.clone()]);
    // Baseline carried forward in the rewritten file
    assert_eq!(store.load().unwrap().get(&url).map(String::as_str), Some("deadbeef"));
}

#[tokio::test]
async fn test_state_file_holds_full_current_set() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200).set_body_string("aaa"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(200).set_body_string("bbb"))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = StateStore::new(dir.path().join("previous_states.json"));

    // A stale URL from an earlier run is dropped on overwrite
    let mut previous = std::collections::BTreeMap::new();
    previous.insert("https://gone.example/".to_string(), "cafef00d".to_string());
    store.save(&previous).unwrap();

    let input = format!("{0}/a\n{0}/b\n", mock_server.uri());
    let entries = parse_batch_lines(&input).unwrap();
    run_batch(&full_checker(), &store, &entries).await.unwrap();

    let saved = store.load().unwrap();
    assert_eq!(saved.len(), 2);
    assert!(!saved.contains_key("https://gone.example/"));
}
