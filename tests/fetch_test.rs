//! Integration tests for listing collection and snapshot persistence.

use qiita_zenn_export::config::Config;
use qiita_zenn_export::qiita::{build_client, fetch_all_posts};
use qiita_zenn_export::snapshot::Snapshot;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ITEMS_PATH: &str = "/users/testuser/items";

/// Create a test configuration pointed at the mock server.
fn create_test_config(api_base: &str) -> Config {
    Config {
        api_base: api_base.to_string(),
        ..Config::for_testing()
    }
}

fn item(id: &str, title: &str) -> Value {
    json!({
        "id": id,
        "created_at": "2024-03-07T12:00:00Z",
        "title": title,
        "body": "body",
        "tags": [{"name": "Rust"}]
    })
}

async fn mount_page(server: &MockServer, page: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(ITEMS_PATH))
        .and(query_param("page", page))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fetch_collects_all_pages_in_order() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "1", json!([item("a", "A"), item("b", "B")])).await;
    mount_page(&mock_server, "2", json!([item("c", "C")])).await;
    mount_page(&mock_server, "3", json!([])).await;

    let config = create_test_config(&mock_server.uri());
    let client = build_client().unwrap();

    let posts = fetch_all_posts(&client, &config)
        .await
        .expect("fetch failed");

    assert_eq!(posts.len(), 3);
    let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["a", "b", "c"]);
}

#[tokio::test]
async fn test_fetch_empty_first_page_yields_empty_list() {
    let mock_server = MockServer::start().await;

    // Only page 1 is mounted; a request for any later page would 404 and
    // fail the fetch, so success here also proves no further requests.
    Mock::given(method("GET"))
        .and(path(ITEMS_PATH))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let client = build_client().unwrap();

    let posts = fetch_all_posts(&client, &config)
        .await
        .expect("fetch failed");
    assert!(posts.is_empty());
}

#[tokio::test]
async fn test_fetch_errors_on_http_failure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ITEMS_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let client = build_client().unwrap();

    let result = fetch_all_posts(&client, &config).await;
    assert!(result.is_err(), "Should fail on HTTP 500");
}

#[tokio::test]
async fn test_fetch_errors_on_non_array_body() {
    let mock_server = MockServer::start().await;

    // An error object is a malformed response, not the end of the listing.
    Mock::given(method("GET"))
        .and(path(ITEMS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "rate limited"})))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let client = build_client().unwrap();

    let result = fetch_all_posts(&client, &config).await;
    assert!(result.is_err(), "Non-array body should fail loudly");
}

#[tokio::test]
async fn test_snapshot_save_and_load_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let snapshot_path = temp_dir.path().join("data").join("pages.json");

    let posts = vec![
        serde_json::from_value(item("a", "A")).unwrap(),
        serde_json::from_value(item("b", "B")).unwrap(),
    ];
    let snapshot = Snapshot::new(posts);
    snapshot.save(&snapshot_path).await.expect("save failed");

    // The file is a single object keyed by `list`.
    let raw: Value = serde_json::from_slice(&std::fs::read(&snapshot_path).unwrap()).unwrap();
    assert_eq!(raw["list"].as_array().unwrap().len(), 2);
    assert_eq!(raw["list"][0]["id"], "a");

    let loaded = Snapshot::load(&snapshot_path).await.expect("load failed");
    assert_eq!(loaded.list.len(), 2);
    assert_eq!(loaded.list[1].title, "B");
}

#[tokio::test]
async fn test_snapshot_save_replaces_previous_file() {
    let temp_dir = TempDir::new().unwrap();
    let snapshot_path = temp_dir.path().join("pages.json");

    let first = Snapshot::new(vec![
        serde_json::from_value(item("a", "A")).unwrap(),
        serde_json::from_value(item("b", "B")).unwrap(),
    ]);
    first.save(&snapshot_path).await.unwrap();

    let second = Snapshot::new(vec![serde_json::from_value(item("c", "C")).unwrap()]);
    second.save(&snapshot_path).await.unwrap();

    let loaded = Snapshot::load(&snapshot_path).await.unwrap();
    assert_eq!(loaded.list.len(), 1);
    assert_eq!(loaded.list[0].id, "c");
}
