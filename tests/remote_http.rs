use chrono::NaiveDate;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lingua_core::config::RemoteConfig;
use lingua_core::store::types::{ProfileStats, VocabularyItem};
use lingua_core::sync::http::HttpRemoteStore;
use lingua_core::sync::remote::{ProfileRow, RemoteError, RemoteStore, VocabularyRow};

fn remote_for(server: &MockServer) -> HttpRemoteStore {
    HttpRemoteStore::new(&RemoteConfig {
        base_url: server.uri(),
        api_key: "test-key".to_string(),
        timeout_secs: 5,
    })
}

#[tokio::test]
async fn upsert_profile_uses_merge_duplicates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/profiles"))
        .and(header("Prefer", "resolution=merge-duplicates"))
        .and(header("apikey", "test-key"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let remote = remote_for(&server);
    let row = ProfileRow::from_stats("u1", None, &ProfileStats::default());
    remote.upsert_profile(&row).await.expect("upsert profile");
}

#[tokio::test]
async fn fetch_vocabulary_filters_by_user() {
    let server = MockServer::start().await;

    let item = VocabularyItem::new(
        "w1".into(),
        "bonjour".into(),
        "hello".into(),
        "greetings".into(),
        NaiveDate::from_ymd_opt(2025, 6, 1).expect("date"),
    );
    let rows = vec![VocabularyRow::from_item("u1", &item)];

    Mock::given(method("GET"))
        .and(path("/vocabulary"))
        .and(query_param("user_id", "eq.u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&rows))
        .expect(1)
        .mount(&server)
        .await;

    let remote = remote_for(&server);
    let fetched = remote.fetch_vocabulary("u1").await.expect("fetch vocabulary");
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].front, "bonjour");
}

#[tokio::test]
async fn fetch_profile_empty_result_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/profiles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<ProfileRow>::new()))
        .mount(&server)
        .await;

    let remote = remote_for(&server);
    let fetched = remote.fetch_profile("nobody").await.expect("fetch profile");
    assert!(fetched.is_none());
}

#[tokio::test]
async fn server_error_maps_to_api_variant() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vocabulary"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let remote = remote_for(&server);
    let error = remote.fetch_vocabulary("u1").await.expect_err("should fail");
    match error {
        RemoteError::Api { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "maintenance");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn fetch_daily_progress_filters_by_date() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/daily_progress"))
        .and(query_param("user_id", "eq.u1"))
        .and(query_param("date", "eq.2025-06-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<serde_json::Value>::new()))
        .expect(1)
        .mount(&server)
        .await;

    let remote = remote_for(&server);
    let date = NaiveDate::from_ymd_opt(2025, 6, 1).expect("date");
    let fetched = remote
        .fetch_daily_progress("u1", date)
        .await
        .expect("fetch daily");
    assert!(fetched.is_none());
}
