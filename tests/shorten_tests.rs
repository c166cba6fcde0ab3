//! Batch shortening tests
//!
//! Drives POST /shorten and GET /urls through the actix test harness, plus
//! core orchestrator behavior that needs a misbehaving storage.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use actix_web::{web, App};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use batchlink::config::Config;
use batchlink::errors::{BatchlinkError, Result};
use batchlink::services::{ShortenRequest, ShortenService};
use batchlink::storages::memory::MemoryStorage;
use batchlink::storages::{ShortUrl, Storage};

fn test_config() -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 8080,
        storage_backend: "memory".to_string(),
        urls_file: "urls.json".to_string(),
        random_code_length: 6,
        default_validity_minutes: 30,
        click_flush_interval_secs: 3600,
        environment: "test".to_string(),
        default_url: "https://example.com".to_string(),
    }
}

macro_rules! shorten_app {
    ($storage:expr) => {
        actix_test::init_service(
            App::new()
                .app_data(web::Data::new($storage.clone()))
                .app_data(web::Data::new(test_config()))
                .route("/shorten", web::post().to(ShortenService::post_shorten))
                .route("/urls", web::get().to(ShortenService::get_all_urls)),
        )
        .await
    };
}

#[actix_web::test]
async fn test_batch_success_with_default_validity() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let app = shorten_app!(storage);

    let req = actix_test::TestRequest::post()
        .uri("/shorten")
        .set_json(json!({ "urls": ["https://a.example.com", "https://b.example.com"] }))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = actix_test::read_body_json(resp).await;
    let urls = body["urls"].as_array().unwrap();
    assert_eq!(urls.len(), 2);
    assert!(body["failed"].as_array().unwrap().is_empty());

    for entry in urls {
        let created: DateTime<Utc> = entry["createdAt"].as_str().unwrap().parse().unwrap();
        let expires: DateTime<Utc> = entry["expiresAt"].as_str().unwrap().parse().unwrap();
        assert_eq!(expires - created, chrono::Duration::minutes(30));
        assert_eq!(entry["clicks"], 0);

        let code = entry["shortcode"].as_str().unwrap();
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}

#[actix_web::test]
async fn test_batch_partial_failure_still_succeeds() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let app = shorten_app!(storage);

    let req = actix_test::TestRequest::post()
        .uri("/shorten")
        .set_json(json!({ "urls": ["https://a.com", "not-a-url"], "validity": 30 }))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = actix_test::read_body_json(resp).await;
    assert_eq!(body["urls"].as_array().unwrap().len(), 1);
    assert_eq!(body["urls"][0]["originalUrl"], "https://a.com");

    let failed = body["failed"].as_array().unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0]["url"], "not-a-url");
    assert_eq!(failed[0]["code"], "E001");

    assert_eq!(storage.count_urls().await, 1);
}

#[actix_web::test]
async fn test_batch_all_failed_is_bad_request() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let app = shorten_app!(storage);

    let req = actix_test::TestRequest::post()
        .uri("/shorten")
        .set_json(json!({ "urls": ["not-a-url", "ftp://x.example.com"] }))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = actix_test::read_body_json(resp).await;
    assert_eq!(body["failed"].as_array().unwrap().len(), 2);
    assert_eq!(storage.count_urls().await, 0);
}

#[actix_web::test]
async fn test_empty_batch_is_rejected() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let app = shorten_app!(storage);

    for payload in [json!({ "urls": [] }), json!({ "urls": ["  ", ""] })] {
        let req = actix_test::TestRequest::post()
            .uri("/shorten")
            .set_json(payload)
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = actix_test::read_body_json(resp).await;
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("At least one URL is required"));
    }
}

#[actix_web::test]
async fn test_oversized_batch_is_rejected() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let app = shorten_app!(storage);

    let urls: Vec<String> = (0..6).map(|i| format!("https://e{}.example.com", i)).collect();
    let req = actix_test::TestRequest::post()
        .uri("/shorten")
        .set_json(json!({ "urls": urls }))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(storage.count_urls().await, 0);
}

#[actix_web::test]
async fn test_validity_out_of_range_is_rejected() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let app = shorten_app!(storage);

    for validity in [0, -5, 10081] {
        let req = actix_test::TestRequest::post()
            .uri("/shorten")
            .set_json(json!({ "urls": ["https://a.example.com"], "validity": validity }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
    assert_eq!(storage.count_urls().await, 0);
}

#[actix_web::test]
async fn test_custom_shortcode_applies_to_first_item() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let app = shorten_app!(storage);

    let req = actix_test::TestRequest::post()
        .uri("/shorten")
        .set_json(json!({
            "urls": ["https://a.example.com", "https://b.example.com"],
            "validity": 60,
            "shortcode": "abc123"
        }))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = actix_test::read_body_json(resp).await;
    let urls = body["urls"].as_array().unwrap();
    assert_eq!(urls[0]["shortcode"], "abc123");
    assert_eq!(urls[0]["originalUrl"], "https://a.example.com");
    assert_ne!(urls[1]["shortcode"], "abc123");
}

#[actix_web::test]
async fn test_custom_shortcode_collision_is_conflict() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let app = shorten_app!(storage);

    let payload = json!({ "urls": ["https://a.example.com"], "shortcode": "abc123" });

    let req = actix_test::TestRequest::post()
        .uri("/shorten")
        .set_json(payload.clone())
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // same shortcode again while the first mapping is live
    let req = actix_test::TestRequest::post()
        .uri("/shorten")
        .set_json(payload)
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = actix_test::read_body_json(resp).await;
    assert_eq!(body["failed"][0]["code"], "E003");
}

#[actix_web::test]
async fn test_invalid_shortcode_fails_only_first_item() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let app = shorten_app!(storage);

    let req = actix_test::TestRequest::post()
        .uri("/shorten")
        .set_json(json!({
            "urls": ["https://a.example.com", "https://b.example.com"],
            "shortcode": "has-dash"
        }))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = actix_test::read_body_json(resp).await;
    assert_eq!(body["urls"].as_array().unwrap().len(), 1);
    assert_eq!(body["urls"][0]["originalUrl"], "https://b.example.com");
    assert_eq!(body["failed"][0]["code"], "E002");
}

#[actix_web::test]
async fn test_get_urls_lists_in_creation_order() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let app = shorten_app!(storage);

    for (code, target) in [("first1", "https://a.example.com"), ("second", "https://b.example.com")] {
        let req = actix_test::TestRequest::post()
            .uri("/shorten")
            .set_json(json!({ "urls": [target], "shortcode": code }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = actix_test::TestRequest::get().uri("/urls").to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = actix_test::read_body_json(resp).await;
    let urls = body["urls"].as_array().unwrap();
    assert_eq!(urls.len(), 2);
    assert_eq!(urls[0]["shortcode"], "first1");
    assert_eq!(urls[1]["shortcode"], "second");
}

// =============================================================================
// Orchestrator behavior against a storage where every code is taken
// =============================================================================

struct SaturatedStorage;

#[async_trait]
impl Storage for SaturatedStorage {
    async fn get(&self, _code: &str) -> Option<ShortUrl> {
        None
    }

    async fn load_all(&self) -> Vec<ShortUrl> {
        Vec::new()
    }

    async fn insert(&self, url: ShortUrl) -> Result<()> {
        Err(BatchlinkError::code_taken(format!(
            "Shortcode '{}' is already in use",
            url.code
        )))
    }

    async fn increment_clicks(&self, _code: &str, _n: u64) -> Result<()> {
        Ok(())
    }

    async fn count_urls(&self) -> u64 {
        0
    }

    async fn total_clicks(&self) -> u64 {
        0
    }

    async fn get_backend_name(&self) -> String {
        "saturated".to_string()
    }
}

#[tokio::test]
async fn test_generation_exhausted_after_retry_budget() {
    let storage = SaturatedStorage;

    let outcome = ShortenService::create_batch(
        &storage,
        &test_config(),
        ShortenRequest {
            urls: vec!["https://a.example.com".to_string()],
            validity: None,
            shortcode: None,
        },
    )
    .await
    .unwrap();

    assert!(outcome.created.is_empty());
    assert_eq!(outcome.failed.len(), 1);
    assert!(matches!(
        outcome.failed[0].error,
        BatchlinkError::GenerationExhausted(_)
    ));
}

#[tokio::test]
async fn test_custom_code_collision_is_terminal_not_retried() {
    let storage = SaturatedStorage;

    let outcome = ShortenService::create_batch(
        &storage,
        &test_config(),
        ShortenRequest {
            urls: vec!["https://a.example.com".to_string()],
            validity: None,
            shortcode: Some("abc123".to_string()),
        },
    )
    .await
    .unwrap();

    assert!(matches!(
        outcome.failed[0].error,
        BatchlinkError::CodeTaken(_)
    ));
}
