use providers::tmdb::{TmdbConfig, TmdbProvider};
use providers::{MetadataProvider, ProviderError};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider_for(server: &MockServer, api_key: &str) -> TmdbProvider {
    let mut cfg = TmdbConfig::new(api_key);
    cfg.base_url = format!("{}/3", server.uri());
    cfg.image_base_url = format!("{}/t/p", server.uri());
    TmdbProvider::new(cfg).unwrap()
}

#[tokio::test]
async fn search_sends_key_and_query_and_takes_first_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/search/movie"))
        .and(query_param("api_key", "secret"))
        .and(query_param("query", "The Matrix"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "results": [
                {"id": 603, "title": "The Matrix", "overview": "A hacker learns the truth.",
                 "release_date": "1999-03-31", "poster_path": "/matrix.jpg"},
                {"id": 604, "title": "The Matrix Reloaded", "overview": "",
                 "release_date": "2003-05-15", "poster_path": "/reloaded.jpg"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let found = provider_for(&server, "secret")
        .search("The Matrix")
        .await
        .unwrap()
        .expect("a match");
    assert_eq!(found.title, "The Matrix");
    assert_eq!(found.overview, "A hacker learns the truth.");
    assert_eq!(found.release_date.as_deref(), Some("1999-03-31"));
    assert_eq!(found.poster_path.as_deref(), Some("/matrix.jpg"));
}

#[tokio::test]
async fn search_with_no_results_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/search/movie"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"page": 1, "results": []})))
        .mount(&server)
        .await;

    let found = provider_for(&server, "secret").search("zzzz").await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn rejected_key_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/search/movie"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status_code": 7,
            "status_message": "Invalid API key: You must be granted a valid key."
        })))
        .mount(&server)
        .await;

    let err = provider_for(&server, "wrong").search("Heat").await.unwrap_err();
    assert!(matches!(err, ProviderError::Auth(_)), "got {err:?}");
}

#[tokio::test]
async fn missing_key_fails_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = provider_for(&server, "  ").search("Heat").await.unwrap_err();
    assert!(matches!(err, ProviderError::Auth(_)), "got {err:?}");
}

#[tokio::test]
async fn server_error_is_status_without_key_in_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/search/movie"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = provider_for(&server, "secret").search("Heat").await.unwrap_err();
    match &err {
        ProviderError::Status { status, .. } => assert_eq!(*status, 503),
        other => panic!("expected status error, got {other:?}"),
    }
    assert!(!err.to_string().contains("secret"));
}

#[tokio::test]
async fn malformed_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/search/movie"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": [{"id": 1}]})))
        .mount(&server)
        .await;

    let err = provider_for(&server, "secret").search("Heat").await.unwrap_err();
    assert!(matches!(err, ProviderError::InvalidResponse(_)), "got {err:?}");
}

#[tokio::test]
async fn unreachable_host_is_network_error() {
    let mut cfg = TmdbConfig::new("secret");
    cfg.base_url = "http://127.0.0.1:1/3".into();
    let err = TmdbProvider::new(cfg).unwrap().search("Heat").await.unwrap_err();
    assert!(matches!(err, ProviderError::Network(_)), "got {err:?}");
    assert!(!err.to_string().contains("secret"));
}

#[tokio::test]
async fn slow_reply_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/3/search/movie"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"results": []}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let mut cfg = TmdbConfig::new("secret");
    cfg.base_url = format!("{}/3", server.uri());
    cfg.timeout = Duration::from_millis(200);
    let err = TmdbProvider::new(cfg).unwrap().search("Heat").await.unwrap_err();
    assert!(matches!(err, ProviderError::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn fetch_poster_uses_fixed_size_tier() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/t/p/w342/matrix.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\x89PNG fake".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let bytes = provider_for(&server, "secret")
        .fetch_poster("/matrix.jpg")
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"\x89PNG fake");
}

#[tokio::test]
async fn missing_poster_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = provider_for(&server, "secret")
        .fetch_poster("/gone.jpg")
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Status { status: 404, .. }), "got {err:?}");
}
