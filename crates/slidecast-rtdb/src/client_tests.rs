//! Tests for the database client and result store against a mock server.

use std::sync::Mutex;

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use slidecast_models::{Presentation, VideoAnalysis, VideoId};

use crate::client::{DatabaseAuth, RealtimeDbClient, RtdbConfig};
use crate::error::RtdbError;
use crate::retry::RetryConfig;
use crate::store::ResultStore;

// =============================================================================
// Test Helpers
// =============================================================================

/// Minimal in-memory Realtime Database: `PUT` replaces a node, `GET` reads it.
#[derive(Default)]
struct FakeDatabase {
    root: Mutex<Value>,
}

fn segments(request: &Request) -> Vec<String> {
    request
        .url
        .path()
        .trim_end_matches(".json")
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| urlencoding::decode(s).map(|c| c.into_owned()).unwrap_or_default())
        .collect()
}

impl Respond for FakeDatabase {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut root = self.root.lock().unwrap();
        let segs = segments(request);

        match request.method.as_str() {
            "GET" => {
                let mut node = &*root;
                for s in &segs {
                    node = match node.get(s) {
                        Some(child) => child,
                        None => return ResponseTemplate::new(200).set_body_json(Value::Null),
                    };
                }
                ResponseTemplate::new(200).set_body_json(node.clone())
            }
            "PUT" => {
                let value: Value = serde_json::from_slice(&request.body).unwrap();
                let mut node = &mut *root;
                for s in &segs {
                    if !node.is_object() {
                        *node = json!({});
                    }
                    node = node
                        .as_object_mut()
                        .unwrap()
                        .entry(s.clone())
                        .or_insert(Value::Null);
                }
                *node = value.clone();
                ResponseTemplate::new(200).set_body_json(value)
            }
            _ => ResponseTemplate::new(405),
        }
    }
}

fn test_config(base_url: &str) -> RtdbConfig {
    RtdbConfig {
        retry: RetryConfig {
            max_retries: 2,
            base_delay_ms: 1,
            max_delay_ms: 5,
        },
        ..RtdbConfig::new(base_url)
    }
}

async fn fake_store() -> (MockServer, ResultStore) {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(FakeDatabase::default())
        .mount(&server)
        .await;
    let db = RealtimeDbClient::new(test_config(&server.uri()), DatabaseAuth::Anonymous).unwrap();
    (server, ResultStore::new(db))
}

fn deck(name: &str) -> Presentation {
    Presentation::from_value(json!({
        "presentation_name": name,
        "slides": [
            {"slide_number": 1, "title": "Overview", "sub_points": ["Why", "How"]},
            {"slide_number": 2, "title": "Details", "sub_points": []}
        ]
    }))
    .unwrap()
}

// =============================================================================
// Error mapping
// =============================================================================

#[test]
fn test_error_from_http_status() {
    assert!(matches!(RtdbError::from_http_status(429, "slow down"), RtdbError::RateLimited(_)));
    assert!(matches!(RtdbError::from_http_status(503, "down"), RtdbError::ServerError(503, _)));
    assert!(matches!(RtdbError::from_http_status(401, "who"), RtdbError::AuthError(_)));
    assert!(matches!(RtdbError::from_http_status(403, "no"), RtdbError::PermissionDenied(_)));
    assert!(matches!(RtdbError::from_http_status(400, "bad"), RtdbError::RequestFailed(_)));
}

#[test]
fn test_retryable_errors() {
    assert!(RtdbError::from_http_status(500, "x").is_retryable());
    assert!(RtdbError::from_http_status(429, "x").is_retryable());
    assert!(!RtdbError::from_http_status(400, "x").is_retryable());
    assert!(!RtdbError::from_http_status(403, "x").is_retryable());
    assert_eq!(RtdbError::RateLimited(1000).retry_after_ms(), Some(1000));
}

// =============================================================================
// Client
// =============================================================================

#[tokio::test]
async fn test_secret_is_sent_as_auth_param() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/video_analysis/v1.json"))
        .and(query_param("auth", "s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"analysis": "text"})))
        .expect(1)
        .mount(&server)
        .await;

    let db = RealtimeDbClient::new(test_config(&server.uri()), DatabaseAuth::Secret("s3cret".into())).unwrap();
    let analysis = ResultStore::new(db).get_analysis(&VideoId::from("v1")).await.unwrap();
    assert_eq!(analysis.unwrap().analysis, json!("text"));
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/presentations.json"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/presentations.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Null))
        .with_priority(2)
        .mount(&server)
        .await;

    let db = RealtimeDbClient::new(test_config(&server.uri()), DatabaseAuth::Anonymous).unwrap();
    let all = ResultStore::new(db).list_presentations().await.unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn test_permission_denied_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"error": "Permission denied"})))
        .expect(1)
        .mount(&server)
        .await;

    let db = RealtimeDbClient::new(test_config(&server.uri()), DatabaseAuth::Anonymous).unwrap();
    let err = ResultStore::new(db)
        .save_presentation(&VideoId::from("v1"), &deck("Deck"))
        .await
        .unwrap_err();
    assert!(matches!(err, RtdbError::PermissionDenied(_)));
}

#[tokio::test]
async fn test_unreachable_database_is_an_error() {
    let config = RtdbConfig {
        retry: RetryConfig::none(),
        ..RtdbConfig::new("http://127.0.0.1:9")
    };
    let db = RealtimeDbClient::new(config, DatabaseAuth::Anonymous).unwrap();
    let err = ResultStore::new(db).get_analysis(&VideoId::from("v1")).await.unwrap_err();
    assert!(matches!(err, RtdbError::Network(_)));
}

#[tokio::test]
async fn test_network_error_does_not_expose_secret() {
    let config = RtdbConfig {
        retry: RetryConfig::none(),
        ..RtdbConfig::new("http://127.0.0.1:9")
    };
    let db = RealtimeDbClient::new(config, DatabaseAuth::Secret("s3cret-db-token".to_string())).unwrap();
    let err = ResultStore::new(db).get_analysis(&VideoId::from("v1")).await.unwrap_err();

    let message = err.to_string();
    assert!(message.starts_with("Network error"), "{}", message);
    assert!(!message.contains("s3cret-db-token"), "{}", message);
}

// =============================================================================
// Result store
// =============================================================================

#[tokio::test]
async fn test_analysis_round_trip() {
    let (_server, store) = fake_store().await;
    let id = VideoId::from("v1");
    let analysis = VideoAnalysis::new(json!({
        "summary": "A lecture on borrowing",
        "topics": ["lifetimes", "aliasing"]
    }));

    store.save_analysis(&id, &analysis).await.unwrap();
    let loaded = store.get_analysis(&id).await.unwrap();

    assert_eq!(loaded, Some(analysis));
}

#[tokio::test]
async fn test_missing_analysis_is_none() {
    let (_server, store) = fake_store().await;
    assert_eq!(store.get_analysis(&VideoId::from("nope")).await.unwrap(), None);
}

#[tokio::test]
async fn test_reanalysis_overwrites() {
    let (_server, store) = fake_store().await;
    let id = VideoId::from("v1");

    store.save_analysis(&id, &VideoAnalysis::new(json!("first"))).await.unwrap();
    store.save_analysis(&id, &VideoAnalysis::new(json!("second"))).await.unwrap();

    let loaded = store.get_analysis(&id).await.unwrap().unwrap();
    assert_eq!(loaded.analysis, json!("second"));
}

#[tokio::test]
async fn test_presentations_are_keyed_by_video() {
    let (_server, store) = fake_store().await;
    let a = VideoId::from("video-a");
    let b = VideoId::from("video-b");

    let deck_a = deck("Deck A");
    let deck_b = deck("Deck B");
    let (ra, rb) = tokio::join!(
        store.save_presentation(&a, &deck_a),
        store.save_presentation(&b, &deck_b),
    );
    ra.unwrap();
    rb.unwrap();

    assert_eq!(store.get_presentation(&a).await.unwrap().unwrap().name(), Some("Deck A"));
    assert_eq!(store.get_presentation(&b).await.unwrap().unwrap().name(), Some("Deck B"));

    let all = store.list_presentations().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all["video-a"], deck("Deck A"));
    assert_eq!(all["video-b"], deck("Deck B"));
}

#[tokio::test]
async fn test_list_presentations_skips_malformed_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/presentations.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "good": {"presentation_name": "Deck", "slides": []},
            "bad": "not a deck",
            "worse": [1, 2]
        })))
        .mount(&server)
        .await;

    let db = RealtimeDbClient::new(test_config(&server.uri()), DatabaseAuth::Anonymous).unwrap();
    let all = ResultStore::new(db).list_presentations().await.unwrap();
    assert_eq!(all.keys().collect::<Vec<_>>(), vec!["good"]);
}

#[tokio::test]
async fn test_invalid_key_is_rejected_without_request() {
    let (server, store) = fake_store().await;
    let err = store.get_analysis(&VideoId::from("a/b")).await.unwrap_err();
    assert!(matches!(err, RtdbError::InvalidKey(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}
